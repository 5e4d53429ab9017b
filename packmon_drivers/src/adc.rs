//! Blocking one-shot ADC behind the monitor's sample source.

use hal::{
    adc::{Adc, SampleTime},
    pac::ADC1,
};

use packmon_algo::analog::source::SampleSource;

use crate::pinout::analog::{CELL_CHANNELS, TEMP_CHANNEL, VREFINT_CHANNEL};

pub struct PackAdc {
    adc: Adc<ADC1>,
}

impl PackAdc {
    /// Takes the configured ADC; the divider taps need a long sample time
    /// because of their high source impedance, the internal channels
    /// require one by datasheet.
    pub fn new(mut adc: Adc<ADC1>) -> Self {
        for channel in CELL_CHANNELS {
            adc.set_sample_time(channel, SampleTime::T47);
        }
        adc.set_sample_time(VREFINT_CHANNEL, SampleTime::T247);
        adc.set_sample_time(TEMP_CHANNEL, SampleTime::T247);
        Self { adc }
    }

    /// Raw code of the internal temperature sensor, for the `temp` command.
    pub fn read_temp_raw(&mut self) -> u16 {
        self.adc.read(TEMP_CHANNEL)
    }
}

impl SampleSource for PackAdc {
    fn read_cell_raw(&mut self, channel: usize) -> u16 {
        // the monitor never passes an out-of-range channel, but an indexing
        // panic in the sample path is not an acceptable failure mode
        let channel = CELL_CHANNELS
            .get(channel)
            .copied()
            .unwrap_or(CELL_CHANNELS[0]);
        self.adc.read(channel)
    }

    fn read_vref_raw(&mut self) -> u16 {
        self.adc.read(VREFINT_CHANNEL)
    }
}
