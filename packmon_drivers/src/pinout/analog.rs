use super::PinDef;
use hal::gpio::{PinMode, Port};

/// Divider taps of cells 1..3, in channel order.
pub const CELL0: PinDef = PinDef {
    port: Port::A,
    pin: 0,
    mode: PinMode::Analog,
};

pub const CELL1: PinDef = PinDef {
    port: Port::A,
    pin: 1,
    mode: PinMode::Analog,
};

pub const CELL2: PinDef = PinDef {
    port: Port::A,
    pin: 2,
    mode: PinMode::Analog,
};

/// ADC1 channel per cell tap, same order as the cell channels.
pub const CELL_CHANNELS: [u8; 3] = [1, 2, 3];

/// ADC1 internal channels.
pub const VREFINT_CHANNEL: u8 = 18;
pub const TEMP_CHANNEL: u8 = 16;
