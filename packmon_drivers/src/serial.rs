//! USART console with a `core::fmt::Write` front so command handlers can
//! use the formatting macros.

use core::fmt;

use hal::{
    pac::USART1,
    usart::{Usart, UsartInterrupt},
};

pub struct Console {
    usart: Usart<USART1>,
}

impl Console {
    pub fn new(mut usart: Usart<USART1>) -> Self {
        usart.enable_interrupt(UsartInterrupt::ReadNotEmpty);
        Self { usart }
    }

    /// One received byte; call from the RX interrupt.
    pub fn read_byte(&mut self) -> u8 {
        self.usart.read_one()
    }

    /// Clears the RX interrupt flag; call once per RX interrupt.
    pub fn clear_rx_interrupt(&mut self) {
        self.usart.clear_interrupt(UsartInterrupt::ReadNotEmpty);
    }
}

impl fmt::Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.usart.write(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
