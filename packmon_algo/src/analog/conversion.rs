// Fixed numeric contract between raw ADC codes and millivolts.
//
// Every conversion in the firmware goes through the functions below, and
// calibration derives scale factors through the exact inverse of the readout
// formula, so a calibrate-then-read round trip reproduces the target value
// up to the documented rounding tolerance.
//
// Contract (all integer, round-half-up division):
// - vref_millivolts(vref_raw)      = (VREF_INT_MV * ADC_MAX) / vref_raw
// - cell_millivolts(raw, vref, s)  = (raw * s) / vref
// - derive_scale(raw, vref, mv)    = (mv * vref) / raw
//
// The reference code sits in the divisor of the cell conversion, so a drift
// of the supply rail moves `raw` and `vref_raw` together and cancels out.
// Tolerance: a calibrate-then-read round trip is within 1 mV of the target
// for raw codes up to twice the reference code, within 2 mV over the full
// code range while the reference code stays above ADC_MAX / 3 (the rounding
// error is bounded by raw / (2 * vref_raw) plus one half).

use crate::Error;

/// Full scale code of the 12 bit ADC.
pub const ADC_MAX: u16 = 4095;

/// Typical internal reference voltage in millivolts. Device to device
/// variation of the reference lands in the per-cell scale factors during
/// calibration, so the reference conversion itself stays fixed.
pub const VREF_INT_MV: u32 = 1200;

/// Round-half-up integer division.
///
/// # Arguments
/// * `num` - Numerator [u32]
/// * `den` - Denominator, must be non-zero [u32]
///
/// # Returns
/// The quotient rounded to the nearest integer [u32]
pub(crate) const fn div_round(num: u32, den: u32) -> u32 {
    (num + den / 2) / den
}

/// True if a raw code is outside the ADC range and will be clamped.
pub const fn out_of_range(raw: u16) -> bool {
    raw > ADC_MAX
}

const fn clamp_code(raw: u16) -> u32 {
    if raw > ADC_MAX {
        ADC_MAX as u32
    } else {
        raw as u32
    }
}

/// Converts a raw reference-channel code to the rail voltage in millivolts.
///
/// Fixed, non-calibratable scale: the internal reference is a known voltage,
/// so the code it produces reveals the rail the ADC runs from. A code of 0
/// is treated as 1 so the conversion is total.
///
/// # Arguments
/// * `vref_raw` - Raw code of the internal reference channel [u16]
///
/// # Returns
/// The reference rail voltage in millivolts [u32]
pub const fn vref_millivolts(vref_raw: u16) -> u32 {
    let vref = if vref_raw == 0 { 1 } else { clamp_code(vref_raw) };
    div_round(VREF_INT_MV * ADC_MAX as u32, vref)
}

/// Converts a raw cell-channel code to millivolts.
///
/// # Arguments
/// * `raw` - Raw code of the cell channel, clamped to [0, ADC_MAX] [u16]
/// * `vref_raw` - Raw code of the reference channel, clamped to [1, ADC_MAX] [u16]
/// * `scale` - Calibration scale factor for this channel [u16]
///
/// # Returns
/// The cell tap voltage in millivolts [u32]
pub const fn cell_millivolts(raw: u16, vref_raw: u16, scale: u16) -> u32 {
    let raw = clamp_code(raw);
    let vref = if vref_raw == 0 { 1 } else { clamp_code(vref_raw) };
    // raw <= 4095 and scale <= 65535, the product fits u32 with margin
    div_round(raw * scale as u32, vref)
}

/// Derives the scale factor that makes `cell_millivolts` report `known_mv`
/// for the given pair of raw codes. Inverse of [`cell_millivolts`] under the
/// shared rounding rule.
///
/// # Arguments
/// * `raw` - Raw code of the cell channel at calibration time [u16]
/// * `vref_raw` - Raw code of the reference channel at calibration time [u16]
/// * `known_mv` - Externally measured cell tap voltage in millivolts [u32]
///
/// # Returns
/// The derived scale factor, or an error when the inputs cannot produce a
/// usable one. `DivisionByZero` for a zero raw or reference code,
/// `InvalidInput` for a zero target or a result outside [1, u16::MAX].
pub fn derive_scale(raw: u16, vref_raw: u16, known_mv: u32) -> Result<u16, Error> {
    if raw == 0 || vref_raw == 0 {
        return Err(Error::DivisionByZero);
    }
    if known_mv == 0 {
        return Err(Error::InvalidInput);
    }
    let raw = clamp_code(raw) as u64;
    let vref = clamp_code(vref_raw) as u64;
    let scale = (known_mv as u64 * vref + raw / 2) / raw;
    if scale == 0 || scale > u16::MAX as u64 {
        return Err(Error::InvalidInput);
    }
    Ok(scale as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vref_literal() {
        // 1200 mV reference read as code 1489 means a 3300 mV rail
        assert_eq!(vref_millivolts(1489), 3300);
    }

    #[test]
    fn vref_is_total() {
        assert_eq!(vref_millivolts(0), vref_millivolts(1));
        assert_eq!(vref_millivolts(u16::MAX), vref_millivolts(ADC_MAX));
        assert_eq!(vref_millivolts(ADC_MAX), VREF_INT_MV);
    }

    #[test]
    fn cell_literal() {
        // documented reference point for the default channel 0 scale
        assert_eq!(cell_millivolts(2048, 1489, 2669), 3671);
    }

    #[test]
    fn cell_clamps_out_of_range_codes() {
        assert_eq!(
            cell_millivolts(5000, 1489, 2669),
            cell_millivolts(ADC_MAX, 1489, 2669)
        );
        assert_eq!(cell_millivolts(2048, 0, 2669), cell_millivolts(2048, 1, 2669));
    }

    #[test]
    fn derive_scale_rejects_bad_inputs() {
        assert_eq!(derive_scale(0, 1489, 3700), Err(Error::DivisionByZero));
        assert_eq!(derive_scale(2048, 0, 3700), Err(Error::DivisionByZero));
        assert_eq!(derive_scale(2048, 1489, 0), Err(Error::InvalidInput));
        // raw of 1 against a large target overflows the u16 scale range
        assert_eq!(derive_scale(1, 1489, 60000), Err(Error::InvalidInput));
    }

    #[test]
    fn calibration_round_trip_is_exact_at_half_scale() {
        let scale = derive_scale(2048, 1489, 3700).unwrap();
        assert_eq!(scale, 2690);
        assert_eq!(cell_millivolts(2048, 1489, scale), 3700);
    }

    #[test]
    fn calibration_round_trip_within_tolerance_at_full_scale() {
        // raw above 2 * vref_raw: tolerance widens to 2 mV, actual error 1
        let scale = derive_scale(4095, 1489, 12600).unwrap();
        assert_eq!(scale, 4582);
        let mv = cell_millivolts(4095, 1489, scale);
        assert!(mv.abs_diff(12600) <= 2, "round trip off by {}", mv.abs_diff(12600));
    }

    #[test]
    fn out_of_range_flags_only_above_full_scale() {
        assert!(!out_of_range(0));
        assert!(!out_of_range(ADC_MAX));
        assert!(out_of_range(ADC_MAX + 1));
    }
}
