#![no_std]

pub mod analog;
pub mod calibration;
pub mod dev_temp;
pub mod params;

use analog::conversion;
use analog::source::SampleSource;
use calibration::CellCalibration;
use params::BatteryParams;

/// Errors surfaced by the monitoring core. Invalid channel indices are
/// always reported instead of clamped, silently redirecting a calibration
/// write to another channel would corrupt its scale factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, defmt::Format)]
pub enum Error {
    /// Channel index at or beyond the configured cell count.
    InvalidChannel,
    /// Calibration target of zero, or a derived scale outside [1, u16::MAX].
    InvalidInput,
    /// Raw or reference code of zero while deriving a scale factor.
    DivisionByZero,
}

/// Returned by [`LipoMonitor::num_cells`] when the reference rail is below
/// the detection threshold.
pub const NO_PACK: i8 = -1;

/// Board configuration injected at construction.
#[derive(Clone, Copy, Debug, defmt::Format)]
pub struct LipoConfig<const CELLS: usize> {
    /// Scale factor per cell channel until a persisted table is restored.
    pub default_scale: [u16; CELLS],
    /// Reference rail below this many millivolts means no pack attached.
    pub vref_min_mv: u32,
    /// A cell channel at or above this many millivolts counts as present.
    pub cell_min_mv: u32,
}

/// Monitors the per-cell voltages of a series LiPo pack.
///
/// One `tick` per control-loop cycle reads the reference channel and then
/// every cell channel, so all conversions of a cycle share one reference
/// code. Readings are cached for the command handlers; calibration runs
/// against fresh samples and only ever touches the in-memory scale table,
/// persisting is the caller's `param save`.
pub struct LipoMonitor<S: SampleSource, const CELLS: usize> {
    source: S,
    calibration: CellCalibration<CELLS>,

    vref_raw: u16,    // last reference code
    vref_mv: u32,     // last reference rail in mV
    cell_raw: [u16; CELLS], // last raw code per channel
    cell_mv: [u32; CELLS],  // last converted reading per channel

    vref_min_mv: u32,
    cell_min_mv: u32,

    last_tick: Option<u32>, // debounce, one sample cycle per tick value
    clamped: u32,           // diagnostic count of out-of-range codes
}

impl<S: SampleSource, const CELLS: usize> LipoMonitor<S, CELLS> {
    /// Until the first `tick` the monitor reports a 1200 mV rail, which is
    /// below any sane detection threshold, so `num_cells` stays at
    /// [`NO_PACK`] instead of reporting garbage.
    pub fn new(source: S, config: LipoConfig<CELLS>) -> Self {
        Self {
            source,
            calibration: CellCalibration::new(config.default_scale),
            vref_raw: conversion::ADC_MAX,
            vref_mv: conversion::vref_millivolts(conversion::ADC_MAX),
            cell_raw: [0; CELLS],
            cell_mv: [0; CELLS],
            vref_min_mv: config.vref_min_mv,
            cell_min_mv: config.cell_min_mv,
            last_tick: None,
            clamped: 0,
        }
    }

    /// One sample cycle: reference first, then every cell channel against
    /// that fresh reference. Repeated calls with the same tick value do
    /// nothing, the producing loop may run faster than its tick source.
    pub fn tick(&mut self, now: u32) {
        if self.last_tick == Some(now) {
            return;
        }
        self.last_tick = Some(now);

        self.sample_vref();
        for channel in 0..CELLS {
            self.sample_cell(channel);
        }
    }

    /// Configured cell channel count.
    pub const fn channel_count(&self) -> usize {
        CELLS
    }

    /// Last reference rail reading in millivolts.
    pub fn vref_mv(&self) -> u32 {
        self.vref_mv
    }

    /// Number of cells present, or [`NO_PACK`].
    ///
    /// A rail below `vref_min_mv` means nothing is powering the dividers.
    /// Otherwise cells are counted from channel 0 upward until the first
    /// one below `cell_min_mv`, a tap can only be live if everything
    /// beneath it is.
    pub fn num_cells(&self) -> i8 {
        if self.vref_mv < self.vref_min_mv {
            return NO_PACK;
        }
        let mut present: i8 = 0;
        for mv in self.cell_mv.iter() {
            if *mv < self.cell_min_mv {
                break;
            }
            present += 1;
        }
        present
    }

    /// Cached reading of one cell channel in millivolts.
    ///
    /// With `force_refresh` a fresh raw sample is taken first and converted
    /// against the cached reference, and the cache is updated.
    pub fn cell_mv(&mut self, channel: usize, force_refresh: bool) -> Result<u32, Error> {
        if channel >= CELLS {
            return Err(Error::InvalidChannel);
        }
        if force_refresh {
            self.sample_cell(channel);
        }
        Ok(self.cell_mv[channel])
    }

    /// Calibrates one channel against an externally measured voltage.
    ///
    /// Always samples fresh, reference then cell: calibrating against a
    /// stale code would bake in whatever drifted since the last tick. On
    /// success the derived scale is stored and the channel's cached reading
    /// recomputed, so an immediate `cell_mv` returns the calibrated value
    /// without another conversion. On any error nothing is modified.
    pub fn calibrate(&mut self, channel: usize, known_mv: u32) -> Result<(), Error> {
        if channel >= CELLS {
            return Err(Error::InvalidChannel);
        }
        let vref_raw = self.source.read_vref_raw();
        let vref_raw = self.clamp_code(vref_raw);
        let raw = self.source.read_cell_raw(channel);
        let raw = self.clamp_code(raw);
        let scale = conversion::derive_scale(raw, vref_raw, known_mv)?;
        self.calibration.set(channel, scale)?;

        self.vref_raw = vref_raw;
        self.vref_mv = conversion::vref_millivolts(vref_raw);
        self.cell_raw[channel] = raw;
        self.cell_mv[channel] = conversion::cell_millivolts(raw, vref_raw, scale);
        Ok(())
    }

    /// Snapshot of the calibration table for the persistence collaborator.
    pub fn params(&self) -> BatteryParams<CELLS> {
        self.calibration.params()
    }

    /// Adopts a persisted calibration table.
    pub fn restore_params(&mut self, params: &BatteryParams<CELLS>) {
        self.calibration.restore(params);
    }

    /// Calibration table back to the compiled-in defaults.
    pub fn load_default_params(&mut self) {
        self.calibration.load_defaults();
    }

    /// Diagnostic count of raw codes that arrived out of range and were
    /// clamped.
    pub fn clamped_samples(&self) -> u32 {
        self.clamped
    }

    /// Access to the sample source for channels outside the monitor's own
    /// scope, such as the internal temperature sensor.
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn clamp_code(&mut self, raw: u16) -> u16 {
        if conversion::out_of_range(raw) {
            self.clamped = self.clamped.wrapping_add(1);
            conversion::ADC_MAX
        } else {
            raw
        }
    }

    fn sample_vref(&mut self) {
        let raw = self.source.read_vref_raw();
        let raw = self.clamp_code(raw);
        self.vref_raw = raw;
        self.vref_mv = conversion::vref_millivolts(raw);
    }

    fn sample_cell(&mut self, channel: usize) {
        let raw = self.source.read_cell_raw(channel);
        let raw = self.clamp_code(raw);
        self.cell_raw[channel] = raw;
        let scale = self.calibration.scales()[channel];
        self.cell_mv[channel] = conversion::cell_millivolts(raw, self.vref_raw, scale);
    }
}
