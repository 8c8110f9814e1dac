/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Discrete power-law fitting.
//!
//! Maximum-likelihood fit of `p(x) ∝ x^-alpha` on `{xmin, xmin+1, …}`,
//! following Clauset–Shalizi–Newman: for every candidate `xmin` the exponent
//! is estimated by maximizing the log-likelihood (normalized by the Hurwitz
//! zeta function), the Kolmogorov–Smirnov statistic of the tail is computed,
//! and the candidate with the smallest statistic wins. No finite-size
//! correction, no p-value estimation.
//!
//! The exponent is a single parameter, so the score equation
//! `n ζ'(α, xmin)/ζ(α, xmin) + Σ ln x = 0` is solved directly by bisection
//! (the left-hand side is monotone in `α`).

/// Result of a discrete power-law fit.
#[derive(Debug, Clone, Copy)]
pub struct Fit {
    pub alpha: f64,
    pub xmin: u64,
    /// Kolmogorov–Smirnov statistic of the best candidate; 1.0 when the
    /// sample is too degenerate to fit.
    pub d: f64,
}

const ALPHA_MIN: f64 = 1.01;
const ALPHA_MAX: f64 = 24.0;
/// Terms summed explicitly before the Euler–Maclaurin tail.
const ZETA_TERMS: u64 = 256;

/// Hurwitz zeta `ζ(α, q) = Σ_{k≥0} (q + k)^-α` for `α > 1`, `q ≥ 1`.
pub fn hurwitz_zeta(alpha: f64, q: f64) -> f64 {
    let mut sum = 0.0;
    for k in 0..ZETA_TERMS {
        sum += (q + k as f64).powf(-alpha);
    }
    let m = q + ZETA_TERMS as f64;
    // Euler–Maclaurin tail: integral, half-term, first derivative term.
    sum + m.powf(1.0 - alpha) / (alpha - 1.0) + 0.5 * m.powf(-alpha)
        + alpha * m.powf(-alpha - 1.0) / 12.0
}

/// `d/dα ζ(α, q)`.
fn hurwitz_zeta_deriv(alpha: f64, q: f64) -> f64 {
    let mut sum = 0.0;
    for k in 0..ZETA_TERMS {
        let x = q + k as f64;
        sum -= x.ln() * x.powf(-alpha);
    }
    let m = q + ZETA_TERMS as f64;
    let lm = m.ln();
    sum += -lm * m.powf(1.0 - alpha) / (alpha - 1.0) - m.powf(1.0 - alpha) / ((alpha - 1.0) * (alpha - 1.0));
    sum += -0.5 * lm * m.powf(-alpha);
    sum += m.powf(-alpha - 1.0) * (1.0 - alpha * lm) / 12.0;
    sum
}

/// ML exponent for the tail `xs ≥ xmin` (sorted, non-empty): the root of
/// the score function, found by bisection.
fn ml_alpha(tail: &[u64], xmin: u64) -> f64 {
    let n = tail.len() as f64;
    let log_sum: f64 = tail.iter().map(|&x| (x as f64).ln()).sum();
    let q = xmin as f64;

    // Score(α) = n · (−ζ'/ζ)(α, q) − Σ ln x, strictly decreasing in α.
    let score = |alpha: f64| -> f64 {
        n * (-hurwitz_zeta_deriv(alpha, q) / hurwitz_zeta(alpha, q)) - log_sum
    };

    let (mut lo, mut hi) = (ALPHA_MIN, ALPHA_MAX);
    if score(lo) <= 0.0 {
        return lo;
    }
    if score(hi) >= 0.0 {
        return hi;
    }
    for _ in 0..64 {
        let mid = 0.5 * (lo + hi);
        if score(mid) > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// KS statistic between the tail's empirical CDF and the fitted CDF.
fn ks_statistic(tail: &[u64], xmin: u64, alpha: f64) -> f64 {
    let n = tail.len() as f64;
    let norm = hurwitz_zeta(alpha, xmin as f64);
    let mut d: f64 = 0.0;
    let mut seen = 0usize;
    let mut i = 0;
    while i < tail.len() {
        let x = tail[i];
        let mut j = i;
        while j < tail.len() && tail[j] == x {
            j += 1;
        }
        seen += j - i;
        let emp = seen as f64 / n;
        let model = 1.0 - hurwitz_zeta(alpha, x as f64 + 1.0) / norm;
        d = d.max((emp - model).abs());
        i = j;
    }
    d
}

/// Fits a discrete power law to the samples, scanning `xmin` candidates and
/// minimizing the KS statistic.
pub fn fit_discrete(samples: &[f64]) -> Fit {
    let mut xs: Vec<u64> = samples
        .iter()
        .filter(|&&v| v >= 1.0 && v.is_finite())
        .map(|&v| v.round() as u64)
        .collect();
    xs.sort_unstable();

    let degenerate = Fit {
        alpha: f64::NAN,
        xmin: 0,
        d: 1.0,
    };
    if xs.len() < 4 {
        return degenerate;
    }

    let mut best = degenerate;
    let mut start = 0;
    while start < xs.len() {
        let xmin = xs[start];
        let tail = &xs[start..];
        // The tail must keep enough mass and spread to be fittable.
        let distinct = {
            let mut d = 1;
            for w in tail.windows(2) {
                if w[0] != w[1] {
                    d += 1;
                }
            }
            d
        };
        if tail.len() < 3 || distinct < 2 {
            break;
        }
        let alpha = ml_alpha(tail, xmin);
        let d = ks_statistic(tail, xmin, alpha);
        if d < best.d {
            best = Fit { alpha, xmin, d };
        }
        // Advance to the next candidate value.
        while start < xs.len() && xs[start] == xmin {
            start += 1;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hurwitz_zeta_known_values() {
        // ζ(2, 1) = π²/6, ζ(3, 1) ≈ 1.2020569, ζ(2, 2) = π²/6 − 1.
        assert!((hurwitz_zeta(2.0, 1.0) - std::f64::consts::PI.powi(2) / 6.0).abs() < 1e-9);
        assert!((hurwitz_zeta(3.0, 1.0) - 1.2020569031595943).abs() < 1e-9);
        assert!((hurwitz_zeta(2.0, 2.0) - (std::f64::consts::PI.powi(2) / 6.0 - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_fit_recovers_exponent() {
        // Deterministic sample following p(x) ∝ x^-2.5 for x in 1..=60.
        let mut samples = Vec::new();
        for x in 1u64..=60 {
            let count = (20_000.0 * (x as f64).powf(-2.5)).round() as usize;
            samples.extend(std::iter::repeat(x as f64).take(count));
        }
        let fit = fit_discrete(&samples);
        assert!(fit.d < 0.05, "D = {} too large", fit.d);
        assert!(
            (2.2..=2.8).contains(&fit.alpha),
            "alpha = {} out of range",
            fit.alpha
        );
    }

    #[test]
    fn test_degenerate_samples_do_not_fit() {
        assert_eq!(fit_discrete(&[]).d, 1.0);
        assert_eq!(fit_discrete(&[3.0, 999.0]).d, 1.0);
        // A constant sample has no spread to fit.
        assert_eq!(fit_discrete(&[5.0; 100]).d, 1.0);
    }
}
