//! Core units, constants, and shared numeric primitives for the SRocket workspace.
//!
//! All geometry in the workspace is expressed in millimetres, pressure in MPa,
//! force in newtons and time in seconds. Conversions below are only needed where
//! a formula mixes those with SI base units (mass flow, c*).

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const G0: f64 = 9.80665;
    /// Universal gas constant (J/(kmol·K)).
    pub const UNIVERSAL_GAS_CONSTANT: f64 = 8_314.462_618;
    /// Standard sea-level atmospheric pressure (MPa).
    pub const STANDARD_ATMOSPHERE_MPA: f64 = 0.101_325;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert square millimetres to square metres.
    #[inline]
    pub fn mm2_to_m2(v: f64) -> f64 {
        v * 1.0e-6
    }

    /// Convert cubic millimetres to cubic metres.
    #[inline]
    pub fn mm3_to_m3(v: f64) -> f64 {
        v * 1.0e-9
    }

    /// Convert millimetres per second to metres per second.
    #[inline]
    pub fn mm_s_to_m_s(v: f64) -> f64 {
        v * 1.0e-3
    }

    /// Convert megapascals to pascals.
    #[inline]
    pub fn mpa_to_pa(v: f64) -> f64 {
        v * 1.0e6
    }
}

/// Planar area primitives shared by every grain shape.
pub mod area {
    use std::f64::consts::PI;

    /// Area of a circle of the given radius.
    #[inline]
    pub fn circle(radius: f64) -> f64 {
        PI * radius * radius
    }

    /// Area between two concentric circles; zero when the inner circle is larger.
    #[inline]
    pub fn annulus(outer_radius: f64, inner_radius: f64) -> f64 {
        (PI * (outer_radius * outer_radius - inner_radius * inner_radius)).max(0.0)
    }

    /// Lateral (curved) surface of a right cylinder.
    #[inline]
    pub fn cylinder_lateral(radius: f64, length: f64) -> f64 {
        2.0 * PI * radius * length
    }

    /// Chord between two adjacent vertices of a regular polygon inscribed in a circle.
    #[inline]
    pub fn chord(radius: f64, sides: u32) -> f64 {
        2.0 * radius * (PI / sides as f64).sin()
    }
}

/// Small numeric toolkit: integration and root bracketing.
pub mod numeric {
    use thiserror::Error;

    /// Errors surfaced by [`bisect_log`].
    #[derive(Debug, Clone, Copy, PartialEq, Error)]
    pub enum RootError {
        #[error("root not bracketed between {lower} and {upper}")]
        NotBracketed { lower: f64, upper: f64 },
        #[error("bracket bounds must be positive and ordered ({lower}, {upper})")]
        InvalidBracket { lower: f64, upper: f64 },
        #[error("no convergence after {iterations} iterations")]
        MaxIterations { iterations: usize },
    }

    /// Trapezoidal integral of `values` over the (possibly uneven) abscissae `times`.
    ///
    /// Extra entries in the longer slice are ignored.
    pub fn trapezoid(times: &[f64], values: &[f64]) -> f64 {
        times
            .windows(2)
            .zip(values.windows(2))
            .map(|(t, v)| 0.5 * (v[0] + v[1]) * (t[1] - t[0]))
            .sum()
    }

    /// Find a root of `f` on `[lower, upper]` by bisecting in logarithmic space.
    ///
    /// Suited to strictly positive quantities spanning many decades, such as
    /// chamber pressure. Converges when the bracket's log-width drops below
    /// `log_tolerance`.
    pub fn bisect_log<F>(
        mut f: F,
        lower: f64,
        upper: f64,
        log_tolerance: f64,
        max_iterations: usize,
    ) -> Result<f64, RootError>
    where
        F: FnMut(f64) -> f64,
    {
        if !(lower > 0.0 && upper > lower && upper.is_finite()) {
            return Err(RootError::InvalidBracket { lower, upper });
        }

        let mut lo = lower.ln();
        let mut hi = upper.ln();
        let mut f_lo = f(lower);
        let f_hi = f(upper);
        if f_lo == 0.0 {
            return Ok(lower);
        }
        if f_hi == 0.0 {
            return Ok(upper);
        }
        if !(f_lo * f_hi < 0.0) {
            return Err(RootError::NotBracketed { lower, upper });
        }

        for _ in 0..max_iterations {
            let mid = 0.5 * (lo + hi);
            if hi - lo < log_tolerance {
                return Ok(mid.exp());
            }
            let f_mid = f(mid.exp());
            if f_mid == 0.0 {
                return Ok(mid.exp());
            }
            if f_lo * f_mid < 0.0 {
                hi = mid;
            } else {
                lo = mid;
                f_lo = f_mid;
            }
        }

        Err(RootError::MaxIterations {
            iterations: max_iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::area;
    use super::numeric::{RootError, bisect_log, trapezoid};

    #[test]
    fn annulus_never_negative() {
        assert_eq!(area::annulus(10.0, 12.0), 0.0);
        assert!((area::annulus(2.0, 1.0) - 3.0 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn hexagon_chord_equals_radius() {
        assert!((area::chord(25.0, 6) - 25.0).abs() < 1e-12);
    }

    #[test]
    fn trapezoid_integrates_linear_ramp_exactly() {
        let times = [0.0, 0.5, 1.5, 2.0];
        let values: Vec<f64> = times.iter().map(|t| 4.0 * t).collect();
        assert!((trapezoid(&times, &values) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn bisect_log_finds_power_law_root() {
        // x^0.5 = 3 -> x = 9
        let root = bisect_log(|x| x.sqrt() - 3.0, 1e-6, 1e6, 1e-12, 200).unwrap();
        assert!((root - 9.0).abs() / 9.0 < 1e-9);
    }

    #[test]
    fn bisect_log_reports_unbracketed_roots() {
        let err = bisect_log(|x| x + 1.0, 1.0, 10.0, 1e-9, 100).unwrap_err();
        assert!(matches!(err, RootError::NotBracketed { .. }));
    }
}
