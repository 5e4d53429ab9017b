//! Per-cell scale factor store.
//!
//! Owns the live calibration values and the compiled-in defaults they reset
//! to. Mutation is validated here so a bad calibration request can never
//! leave a channel with an unusable scale; persistence timing stays with the
//! caller (an explicit `param save` writes the snapshot out, nothing here
//! touches non-volatile memory).

use crate::params::BatteryParams;
use crate::Error;

pub struct CellCalibration<const CELLS: usize> {
    scale: [u16; CELLS],
    defaults: [u16; CELLS],
}

impl<const CELLS: usize> CellCalibration<CELLS> {
    /// Starts from the injected default table.
    pub const fn new(defaults: [u16; CELLS]) -> Self {
        Self {
            scale: defaults,
            defaults,
        }
    }

    /// Scale factor of one channel.
    pub fn get(&self, channel: usize) -> Result<u16, Error> {
        if channel >= CELLS {
            return Err(Error::InvalidChannel);
        }
        Ok(self.scale[channel])
    }

    /// Overwrites one channel in memory. A zero scale would turn every
    /// reading into 0 mV, so it is rejected instead of stored.
    pub fn set(&mut self, channel: usize, scale: u16) -> Result<(), Error> {
        if channel >= CELLS {
            return Err(Error::InvalidChannel);
        }
        if scale == 0 {
            return Err(Error::InvalidInput);
        }
        self.scale[channel] = scale;
        Ok(())
    }

    /// All channels back to the compiled-in table.
    pub fn load_defaults(&mut self) {
        self.scale = self.defaults;
    }

    /// Direct view for conversion loops that already bounds-check channels.
    pub fn scales(&self) -> &[u16; CELLS] {
        &self.scale
    }

    /// Snapshot for the persistence collaborator.
    pub fn params(&self) -> BatteryParams<CELLS> {
        BatteryParams {
            cell_scale: self.scale,
        }
    }

    /// Adopts a persisted snapshot.
    pub fn restore(&mut self, params: &BatteryParams<CELLS>) {
        self.scale = params.cell_scale;
    }
}
