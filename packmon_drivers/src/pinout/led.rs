use super::PinDef;
use hal::gpio::{PinMode, Port};

pub const STATUS: PinDef = PinDef {
    port: Port::B,
    pin: 8,
    mode: PinMode::Output,
};
