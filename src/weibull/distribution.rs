//! Weibull distribution primitives
//!
//! Density, survival and quantile functions for the two-parameter Weibull,
//! plus the negative log-likelihood objective the optimizers minimize.
//! Hit-factor populations empirically sit near shape 3.6, which doubles as
//! the initial guess and the reference shape for comparison diagnostics.

/// Empirical shape prior for hit-factor score populations
pub const REFERENCE_SHAPE: f64 = 3.6;

/// Density floor that keeps the log-likelihood defined everywhere
const DENSITY_FLOOR: f64 = 1e-10;

/// Weibull probability density at `x`
pub fn pdf(x: f64, k: f64, lambda: f64) -> f64 {
    (k / lambda) * (x / lambda).powf(k - 1.0) * (-(x / lambda).powf(k)).exp()
}

/// Percentage of the population scoring at or above `x`
pub fn survival_percent(x: f64, k: f64, lambda: f64) -> f64 {
    100.0 * (-(x / lambda).powf(k)).exp()
}

/// Score at which `y` percent of the population scores at or above
pub fn quantile(y: f64, k: f64, lambda: f64) -> f64 {
    lambda * (100.0 / y).ln().powf(1.0 / k)
}

/// Negative log-likelihood of the data under (k, lambda).
/// Out-of-domain parameters floor the density and produce a large
/// finite loss instead of NaN, so optimizers reject them naturally.
pub fn neg_log_likelihood(data: &[f64], k: f64, lambda: f64) -> f64 {
    data.iter()
        .map(|&x| {
            let density = pdf(x, k, lambda);
            let density = if density > 0.0 { density } else { DENSITY_FLOOR };
            -density.ln()
        })
        .sum()
}

/// Median of the sample, averaging the middle pair for even sizes
pub fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Starting point for both optimizers: the shape prior, with scale chosen
/// so the distribution's median matches the sample median
pub fn initial_guess(data: &[f64]) -> (f64, f64) {
    let k = REFERENCE_SHAPE;
    let lambda = median(data) / 2.0_f64.ln().powf(1.0 / k);
    (k, lambda)
}
