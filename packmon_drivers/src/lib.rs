#![no_std]

//! Board side of the packmon firmware: pin map, the ADC behind the
//! monitor's sample source, the serial console and the flash-backed
//! parameter record.

pub mod adc;
pub mod flash_params;
pub mod pinout;
pub mod serial;
