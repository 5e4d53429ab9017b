//! Board configuration for the 3 cell pack monitor.

use packmon_algo::LipoConfig;

pub const CELL_COUNT: usize = 3;

/// Control loop rate driving the monitor.
pub const TICK_HZ: u16 = 100;

/// Heartbeat LED half-period in ticks (250 ms at 100 Hz).
pub const LED_PERIOD_TICKS: u32 = 25;

pub const CONSOLE_BAUD: u32 = 115_200;

/// Scale factors measured on the reference board; `cal` overwrites them per
/// device, `param save` persists the result.
pub const LIPO: LipoConfig<CELL_COUNT> = LipoConfig {
    default_scale: [2669, 5803, 8806],
    vref_min_mv: 3000,
    cell_min_mv: 2500,
};
