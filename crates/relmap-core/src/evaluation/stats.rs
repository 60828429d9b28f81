//! Statistics over per-query Average Precision scores.
//!
//! A MAP difference between two model configurations means little on its own
//! when the query set is small. These helpers quantify it: a bootstrap
//! confidence interval around one configuration's mean AP, and a paired
//! t-test plus Cohen's d for two configurations evaluated on the same
//! queries.
//!
//! Randomness is a seeded LCG so results are reproducible without pulling in
//! a random-number dependency.

/// Mean AP with its bootstrap 95% confidence interval.
#[derive(Debug, Clone, Copy)]
pub struct BootstrapResult {
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
}

impl BootstrapResult {
    /// Formats as `mean [lower, upper]`.
    pub fn format(&self, precision: usize) -> String {
        format!(
            "{:.prec$} [{:.prec$}, {:.prec$}]",
            self.mean,
            self.lower,
            self.upper,
            prec = precision
        )
    }
}

/// Bootstrap 95% confidence interval for the mean of `values`.
///
/// Resamples with replacement `n_bootstrap` times and takes the 2.5th and
/// 97.5th percentiles of the resampled means. Returns NaN bounds on an empty
/// slice.
pub fn bootstrap_ci(values: &[f64], n_bootstrap: usize, seed: u64) -> BootstrapResult {
    if values.is_empty() {
        return BootstrapResult {
            mean: f64::NAN,
            lower: f64::NAN,
            upper: f64::NAN,
        };
    }

    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let mut rng = LcgRng::new(seed);

    let mut means = Vec::with_capacity(n_bootstrap);
    for _ in 0..n_bootstrap {
        let mut sum = 0.0;
        for _ in 0..n {
            sum += values[rng.next_usize(n)];
        }
        means.push(sum / n as f64);
    }
    means.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let lower_idx = ((n_bootstrap as f64) * 0.025) as usize;
    let upper_idx = ((n_bootstrap as f64) * 0.975) as usize;
    BootstrapResult {
        mean,
        lower: means[lower_idx.min(means.len() - 1)],
        upper: means[upper_idx.min(means.len() - 1)],
    }
}

/// Paired t-test outcome.
#[derive(Debug, Clone, Copy)]
pub struct TTestResult {
    /// Positive when configuration A scores higher on average.
    pub t_statistic: f64,
    /// Two-tailed p-value.
    pub p_value: f64,
    /// Degrees of freedom.
    pub df: usize,
}

impl TTestResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Paired t-test over per-query AP scores of two configurations.
///
/// Both slices must hold scores for the same queries in the same order.
///
/// # Panics
///
/// Panics if the slices differ in length or are empty.
pub fn paired_ttest(config_a: &[f64], config_b: &[f64]) -> TTestResult {
    assert_eq!(
        config_a.len(),
        config_b.len(),
        "paired t-test requires equal-length score slices"
    );
    assert!(!config_a.is_empty(), "paired t-test over zero queries");

    let n = config_a.len();
    let df = n - 1;

    let diffs: Vec<f64> = config_a
        .iter()
        .zip(config_b)
        .map(|(a, b)| a - b)
        .collect();
    let mean_diff = diffs.iter().sum::<f64>() / n as f64;
    let var_diff = diffs.iter().map(|d| (d - mean_diff).powi(2)).sum::<f64>() / df as f64;
    let se = (var_diff / n as f64).sqrt();

    let t = if se > 0.0 { mean_diff / se } else { 0.0 };
    TTestResult {
        t_statistic: t,
        p_value: t_distribution_p_value(t.abs(), df),
        df,
    }
}

/// Cohen's d effect size between two score sets.
///
/// Positive when group A scores higher. Returns 0 for empty input or zero
/// pooled variance.
pub fn cohens_d(group_a: &[f64], group_b: &[f64]) -> f64 {
    if group_a.len() < 2 || group_b.len() < 2 {
        return 0.0;
    }

    let n_a = group_a.len();
    let n_b = group_b.len();
    let mean_a = group_a.iter().sum::<f64>() / n_a as f64;
    let mean_b = group_b.iter().sum::<f64>() / n_b as f64;
    let var_a: f64 = group_a.iter().map(|x| (x - mean_a).powi(2)).sum::<f64>() / (n_a - 1) as f64;
    let var_b: f64 = group_b.iter().map(|x| (x - mean_b).powi(2)).sum::<f64>() / (n_b - 1) as f64;

    let pooled =
        (((n_a - 1) as f64 * var_a + (n_b - 1) as f64 * var_b) / (n_a + n_b - 2) as f64).sqrt();
    if pooled == 0.0 {
        return 0.0;
    }
    (mean_a - mean_b) / pooled
}

// ============================================================================
// Internal: seeded LCG
// ============================================================================

/// Linear congruential generator, parameters from Numerical Recipes.
struct LcgRng {
    state: u64,
}

impl LcgRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn next_usize(&mut self, max: usize) -> usize {
        (self.next() as usize) % max
    }
}

// ============================================================================
// Internal: t-distribution p-value
// ============================================================================

/// Two-tailed p-value for |t| with `df` degrees of freedom.
///
/// Uses p = I_{df/(df+t²)}(df/2, 1/2); falls back to the normal
/// approximation for large df.
fn t_distribution_p_value(t_abs: f64, df: usize) -> f64 {
    if df > 100 {
        return 2.0 * (1.0 - normal_cdf(t_abs));
    }
    let x = df as f64 / (df as f64 + t_abs * t_abs);
    incomplete_beta(df as f64 / 2.0, 0.5, x)
}

/// Standard normal CDF via the Abramowitz-Stegun erf approximation.
fn normal_cdf(x: f64) -> f64 {
    let z = x / std::f64::consts::SQRT_2;
    let sign = if z < 0.0 { -1.0 } else { 1.0 };
    let z = z.abs();

    let t = 1.0 / (1.0 + 0.3275911 * z);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    let erf = sign * (1.0 - poly * (-z * z).exp());
    0.5 * (1.0 + erf)
}

/// Regularized incomplete beta function I_x(a, b) by continued fraction.
fn incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let bt = (ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln()).exp();
    if x < (a + 1.0) / (a + b + 2.0) {
        bt * beta_cf(a, b, x) / a
    } else {
        1.0 - bt * beta_cf(b, a, 1.0 - x) / b
    }
}

fn beta_cf(a: f64, b: f64, x: f64) -> f64 {
    const MAX_ITER: usize = 100;
    const EPS: f64 = 1e-10;
    const TINY: f64 = 1e-30;

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 + aa * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Lanczos-style log gamma.
fn ln_gamma(x: f64) -> f64 {
    let coeffs = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];

    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut ser = 1.000000000190015;
    for (i, &coeff) in coeffs.iter().enumerate() {
        ser += coeff / (x + 1.0 + i as f64);
    }
    -tmp + (2.5066282746310005 * ser / x).ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_ci_contains_mean() {
        let ap = vec![0.85, 0.90, 0.88, 0.92, 0.87, 0.89, 0.91, 0.86, 0.88, 0.90];
        let result = bootstrap_ci(&ap, 1000, 42);

        assert!((result.mean - 0.886).abs() < 0.01);
        assert!(result.lower <= result.mean);
        assert!(result.upper >= result.mean);
    }

    #[test]
    fn test_bootstrap_ci_empty_is_nan() {
        let result = bootstrap_ci(&[], 100, 42);
        assert!(result.mean.is_nan());
    }

    #[test]
    fn test_bootstrap_ci_reproducible() {
        let ap = vec![0.2, 0.5, 0.9, 0.4, 0.7];
        let a = bootstrap_ci(&ap, 500, 7);
        let b = bootstrap_ci(&ap, 500, 7);
        assert_eq!(a.lower, b.lower);
        assert_eq!(a.upper, b.upper);
    }

    #[test]
    fn test_paired_ttest_detects_clear_difference() {
        let a = vec![0.9, 0.92, 0.88, 0.91, 0.89, 0.93, 0.87, 0.90];
        let b = vec![0.7, 0.72, 0.68, 0.71, 0.69, 0.73, 0.67, 0.70];
        let result = paired_ttest(&a, &b);

        assert!(result.is_significant(0.001));
        assert!(result.t_statistic > 0.0);
    }

    #[test]
    fn test_paired_ttest_similar_configs_not_significant() {
        let a = vec![0.85, 0.87, 0.86, 0.84, 0.85];
        let b = vec![0.84, 0.86, 0.87, 0.85, 0.86];
        let result = paired_ttest(&a, &b);
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn test_cohens_d_sign_and_magnitude() {
        let high = vec![0.9, 0.92, 0.88, 0.91, 0.89];
        let low = vec![0.5, 0.52, 0.48, 0.51, 0.49];
        assert!(cohens_d(&high, &low) > 2.0);
        assert!(cohens_d(&low, &high) < -2.0);
    }

    #[test]
    fn test_normal_cdf_reference_points() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 0.001);
        assert!((normal_cdf(1.96) - 0.975).abs() < 0.01);
        assert!((normal_cdf(-1.96) - 0.025).abs() < 0.01);
    }
}
