use super::PinDef;
use hal::gpio::{PinMode, Port};

pub const TX: PinDef = PinDef {
    port: Port::A,
    pin: 9,
    mode: PinMode::Alt(7),
};

pub const RX: PinDef = PinDef {
    port: Port::A,
    pin: 10,
    mode: PinMode::Alt(7),
};
