//! Flash-page record store for the calibration parameters.
//!
//! The last page of the bank is reserved for one framed
//! [`BatteryParams`] record. Validity lives in the record framing (magic +
//! CRC), so an erased page simply decodes to `None` and first boot falls
//! back to the compiled-in defaults.

use hal::{
    flash::{Bank, Flash},
    pac::FLASH,
};

use packmon_algo::params::BatteryParams;

/// Last 2 KB page of the 128 KB part.
const PARAM_PAGE: usize = 63;

/// Big enough for the record of any supported cell count.
const RECORD_BUF: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum StoreError {
    Erase,
    Write,
}

pub struct ParamFlash {
    flash: Flash,
}

impl ParamFlash {
    pub fn new(flash: FLASH) -> Self {
        Self {
            flash: Flash::new(flash),
        }
    }

    /// The persisted calibration table, or `None` when the page holds no
    /// valid record.
    pub fn read<const CELLS: usize>(&mut self) -> Option<BatteryParams<CELLS>> {
        let mut buf = [0u8; RECORD_BUF];
        self.flash.read(Bank::B1, PARAM_PAGE, 0, &mut buf);
        BatteryParams::decode(&buf)
    }

    /// Replaces the stored record with `params`.
    pub fn save<const CELLS: usize>(
        &mut self,
        params: &BatteryParams<CELLS>,
    ) -> Result<(), StoreError> {
        let mut buf = [0xFFu8; RECORD_BUF];
        // RECORD_BUF covers every configured cell count
        let _ = params.encode(&mut buf);
        self.flash
            .erase_page(Bank::B1, PARAM_PAGE)
            .map_err(|_| StoreError::Erase)?;
        self.flash
            .write_page(Bank::B1, PARAM_PAGE, &buf)
            .map_err(|_| StoreError::Write)?;
        Ok(())
    }

    /// Erases the stored record; the next boot starts from defaults.
    pub fn discard(&mut self) -> Result<(), StoreError> {
        self.flash
            .erase_page(Bank::B1, PARAM_PAGE)
            .map_err(|_| StoreError::Erase)
    }
}
