use hal::gpio::{Pin, PinMode, Port};

pub mod analog;
pub mod console;
pub mod led;

/// Compile time definition of one GPIO pin.
pub struct PinDef {
    port: Port,
    pin: u8,
    mode: PinMode,
}

impl PinDef {
    /// Claims and configures the pin.
    pub fn init(&self) -> Pin {
        Pin::new(self.port, self.pin, self.mode)
    }
}
