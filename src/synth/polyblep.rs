//! PolyBLEP (polynomial band-limited step) correction
//!
//! A naive square or sawtooth jumps instantly between levels, which aliases
//! badly. Subtracting a short two-sample polynomial residual around each jump
//! approximates a band-limited step at almost no cost.

/// Whether a phase increment admits a PolyBLEP correction.
///
/// At `dt >= 0.5` the two polynomial segments overlap and the correction is
/// meaningless; at `dt <= 0` there is no discontinuity to correct.
#[inline]
pub fn is_correctable(dt: f64) -> bool {
    dt.is_finite() && dt > 0.0 && dt < 0.5
}

/// Correction term for a single fractional phase `t` in [0, 1).
///
/// Returns 0.0 everywhere except within one increment of the wrap point,
/// and for any increment outside `(0, 0.5)`.
#[inline]
pub fn poly_blep(t: f64, dt: f64) -> f64 {
    if !is_correctable(dt) {
        return 0.0;
    }
    if t < dt {
        // Just after the discontinuity
        let x = t / dt;
        x + x - x * x - 1.0
    } else if t > 1.0 - dt {
        // Just before the next discontinuity
        let x = (t - 1.0) / dt;
        x * x + x + x + 1.0
    } else {
        0.0
    }
}

/// Correction sequence for a run of phases sharing one increment.
pub fn poly_blep_block(phases: &[f64], dt: f64) -> Vec<f64> {
    phases.iter().map(|&t| poly_blep(t, dt)).collect()
}
