//! Window level measurement for the silence gate.

/// Mean square of the window.
#[inline]
pub fn level_lin(window: &[f32]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let energy: f32 = window.iter().map(|s| s * s).sum();
    energy / window.len() as f32
}

/// Window level in dB (`10 * log10(mean square)`). `-inf` for digital silence.
#[inline]
pub fn db_spl(window: &[f32]) -> f32 {
    10.0 * level_lin(window).log10()
}

#[inline]
pub fn is_silent(window: &[f32], threshold_db: f32) -> bool {
    db_spl(window) < threshold_db
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_digital_silence() {
        let window = [0.0f32; 64];
        assert_eq!(level_lin(&window), 0.0);
        assert_eq!(db_spl(&window), f32::NEG_INFINITY);
        assert!(is_silent(&window, -30.0));
    }

    #[test]
    fn test_full_scale_dc_is_zero_db() {
        let window = [1.0f32; 64];
        assert_relative_eq!(db_spl(&window), 0.0, epsilon = 1e-6);
        assert!(!is_silent(&window, -30.0));
    }

    #[test]
    fn test_threshold_boundary() {
        // mean square 1e-3 -> exactly -30 dB, which is not below -30
        let amplitude = 1e-3f32.sqrt();
        let window = [amplitude; 32];
        assert_relative_eq!(db_spl(&window), -30.0, epsilon = 1e-3);
        assert!(is_silent(&window, -29.0));
        assert!(!is_silent(&window, -31.0));
    }

    #[test]
    fn test_empty_window_is_silent() {
        assert!(is_silent(&[], -30.0));
    }
}
