//! EXS to XPM value conversions
//!
//! All results are plain `f64`; the XPM schema formats them with six
//! decimals on output.

/// Shortest envelope stage the MPC can express, in seconds
pub const MIN_ENV_TIME: f64 = 0.001;

/// Longest envelope stage the MPC can express, in seconds
pub const MAX_ENV_TIME: f64 = 10.0;

/// Linear curve shape
pub const LINEAR_CURVE: f64 = 0.5;

/// Instrument gain at -12 dB on the MPC's legacy volume scale
const LEGACY_GAIN_FLOOR: f64 = 0.353;

/// Zone volume in dB to a linear gain factor
///
/// Input is clamped to -60..=12 dB.
pub fn volume_db_to_linear(db: i32) -> f64 {
    let db = db.clamp(-60, 12);
    10f64.powf(f64::from(db) / 20.0)
}

/// Group volume in dB to the MPC instrument volume scale
///
/// -12 dB maps to 0.353 and +6 dB to 1.0, linearly in between.
pub fn legacy_gain(db: i32) -> f64 {
    let db = f64::from(db.clamp(-12, 6));
    LEGACY_GAIN_FLOOR + (1.0 - LEGACY_GAIN_FLOOR) * (db + 12.0) / 18.0
}

/// Pan (-64..=63) to 0..=1
pub fn pan_to_normalized(pan: i32) -> f64 {
    f64::from(pan.clamp(-64, 63) + 64) / 127.0
}

/// Zone key scaling (0..=100) to a key-track amount
pub fn scale_to_key_track(scale: i32) -> f64 {
    f64::from(scale.clamp(0, 100)) / 100.0
}

/// Zone output to an MPC audio route index
pub fn output_to_audio_route(output: i32) -> i32 {
    output.clamp(0, 15)
}

/// Logarithmic taper for an envelope time in seconds
pub fn env_time_normalize(seconds: f64) -> f64 {
    let seconds = seconds.clamp(MIN_ENV_TIME, MAX_ENV_TIME);
    (seconds / MIN_ENV_TIME).ln() / (MAX_ENV_TIME / MIN_ENV_TIME).ln()
}

/// Raw envelope time (0..=127 spanning 0..=10 s) to 0..=1
///
/// Negative values are treated as the shortest stage.
pub fn env_time(raw: i32) -> f64 {
    if raw < 0 {
        return env_time_normalize(MIN_ENV_TIME);
    }
    env_time_normalize(f64::from(raw) / 127.0 * MAX_ENV_TIME)
}

/// Raw level (0..=127) to 0..=1
pub fn env_level(raw: i32) -> f64 {
    f64::from(raw.clamp(0, 127)) / 127.0
}

/// Filter cutoff or resonance (0..=127) to 0..=1
pub fn filter_normalize(raw: i32) -> f64 {
    f64::from(raw.clamp(0, 127)) / 127.0
}

/// Signed curve amount (-99..=99) to 0..=1 with 0.5 linear
///
/// Values stored as `0xFF00 + n` encode negatives.
pub fn envelope_curve(raw: i32) -> f64 {
    let raw = if raw >= 0xFF00 { raw - 0xFF00 - 0x100 } else { raw };
    let slope = (f64::from(raw) / 99.0).clamp(-1.0, 1.0);
    ((slope + 1.0) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt6(value: f64) -> String {
        format!("{value:.6}")
    }

    #[test]
    fn test_volume_db_to_linear() {
        assert_eq!(fmt6(volume_db_to_linear(0)), "1.000000");
        assert_eq!(fmt6(volume_db_to_linear(-6)), "0.501187");
        assert_eq!(fmt6(volume_db_to_linear(12)), "3.981072");
        assert_eq!(fmt6(volume_db_to_linear(-60)), "0.001000");
        for db in -60..=12 {
            assert_eq!(
                fmt6(volume_db_to_linear(db)),
                fmt6(10f64.powf(f64::from(db) / 20.0))
            );
        }
    }

    #[test]
    fn test_volume_db_to_linear_clamps() {
        assert_eq!(volume_db_to_linear(-100), volume_db_to_linear(-60));
        assert_eq!(volume_db_to_linear(40), volume_db_to_linear(12));
    }

    #[test]
    fn test_legacy_gain() {
        assert_eq!(fmt6(legacy_gain(-12)), "0.353000");
        assert_eq!(fmt6(legacy_gain(6)), "1.000000");
        assert_eq!(fmt6(legacy_gain(0)), "0.784333");
        assert_eq!(legacy_gain(-40), legacy_gain(-12));
    }

    #[test]
    fn test_pan_to_normalized() {
        assert_eq!(fmt6(pan_to_normalized(-64)), "0.000000");
        assert_eq!(fmt6(pan_to_normalized(63)), "1.000000");
        assert_eq!(fmt6(pan_to_normalized(0)), "0.503937");
        assert_eq!(pan_to_normalized(-100), pan_to_normalized(-64));
        for pan in -64..=63 {
            assert_eq!(
                fmt6(pan_to_normalized(pan)),
                fmt6(f64::from(pan + 64) / 127.0)
            );
        }
    }

    #[test]
    fn test_scale_to_key_track() {
        assert_eq!(fmt6(scale_to_key_track(100)), "1.000000");
        assert_eq!(fmt6(scale_to_key_track(50)), "0.500000");
        assert_eq!(fmt6(scale_to_key_track(-20)), "0.000000");
        assert_eq!(fmt6(scale_to_key_track(127)), "1.000000");
    }

    #[test]
    fn test_output_to_audio_route() {
        assert_eq!(output_to_audio_route(-1), 0);
        assert_eq!(output_to_audio_route(7), 7);
        assert_eq!(output_to_audio_route(40), 15);
    }

    #[test]
    fn test_env_time_normalize_bounds_and_monotonic() {
        assert_eq!(fmt6(env_time_normalize(MIN_ENV_TIME)), "0.000000");
        assert_eq!(fmt6(env_time_normalize(MAX_ENV_TIME)), "1.000000");
        assert_eq!(fmt6(env_time_normalize(0.1)), "0.500000");

        let mut previous = env_time_normalize(MIN_ENV_TIME);
        let mut seconds = MIN_ENV_TIME;
        while seconds < MAX_ENV_TIME {
            seconds *= 1.5;
            let value = env_time_normalize(seconds);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_env_time_raw() {
        assert_eq!(fmt6(env_time(-5)), "0.000000");
        assert_eq!(fmt6(env_time(0)), "0.000000");
        assert_eq!(fmt6(env_time(127)), "1.000000");
        assert_eq!(
            fmt6(env_time(64)),
            fmt6(env_time_normalize(64.0 / 127.0 * 10.0))
        );
    }

    #[test]
    fn test_levels() {
        assert_eq!(fmt6(env_level(127)), "1.000000");
        assert_eq!(fmt6(env_level(200)), "1.000000");
        assert_eq!(fmt6(env_level(-3)), "0.000000");
        assert_eq!(fmt6(filter_normalize(64)), "0.503937");
    }

    #[test]
    fn test_envelope_curve() {
        assert_eq!(fmt6(envelope_curve(0)), "0.500000");
        assert_eq!(fmt6(envelope_curve(99)), "1.000000");
        assert_eq!(fmt6(envelope_curve(-99)), "0.000000");
        assert_eq!(fmt6(envelope_curve(150)), "1.000000");
        // 0xFFFF decodes to -1
        assert_eq!(fmt6(envelope_curve(0xFFFF)), fmt6(envelope_curve(-1)));
    }
}
