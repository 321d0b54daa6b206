//! Ordinary least-squares line fitting with confidence bands
//!
//! Fits `y = a·x + b` to paired samples and evaluates the confidence band
//! around the fitted line from the Student-t distribution.

use crate::errors::{GalleryError, Result};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Number of fitted parameters (slope and intercept)
pub const LINEAR_PARAMETERS: usize = 2;

/// Paired samples of independent and dependent variables
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePair {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl SamplePair {
    /// Pairs two sequences, rejecting unequal lengths.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(GalleryError::ShapeMismatch {
                expected: format!("{} y values", x.len()),
                found: format!("{} y values", y.len()),
            });
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Smallest and largest x value.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        if self.x.is_empty() {
            return None;
        }
        let min = self.x.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = self.x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// How the leverage term of the confidence band is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BandMethod {
    /// `sqrt(1/n + (x0 - mean(x))^2 / sum((xi - mean(x))^2))` at every grid point
    #[default]
    Pointwise,
    /// Constant width matching the regress_1 reference figure:
    /// `sqrt(1/n + mean(grid)^2 / (sum(xi - mean(grid)))^2)`
    Reference,
}

/// Result of a first-degree least-squares fit
#[derive(Debug, Clone, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub n: usize,
    /// Sum of squared residuals
    pub rss: f64,
    /// Parameter covariance `[[var(a), cov(a,b)], [cov(a,b), var(b)]]`,
    /// scaled by the residual variance. `None` when there are no residual
    /// degrees of freedom.
    pub covariance: Option<[[f64; 2]; 2]>,
    x_mean: f64,
    sxx: f64,
}

/// Confidence band evaluated on a grid
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceBand {
    pub x: Vec<f64>,
    pub fitted: Vec<f64>,
    pub half_width: Vec<f64>,
    pub t_value: f64,
    pub alpha: f64,
}

impl ConfidenceBand {
    pub fn lower(&self) -> Vec<f64> {
        self.fitted
            .iter()
            .zip(&self.half_width)
            .map(|(y, w)| y - w)
            .collect()
    }

    pub fn upper(&self) -> Vec<f64> {
        self.fitted
            .iter()
            .zip(&self.half_width)
            .map(|(y, w)| y + w)
            .collect()
    }
}

/// Fits `y = slope·x + intercept` minimizing squared residuals.
pub fn fit_linear(samples: &SamplePair) -> Result<LinearFit> {
    let n = samples.len();
    if n < LINEAR_PARAMETERS {
        return Err(GalleryError::InsufficientSamples {
            required: LINEAR_PARAMETERS,
            found: n,
        });
    }

    if samples.x.iter().chain(&samples.y).any(|v| !v.is_finite()) {
        return Err(GalleryError::DegenerateFit(
            "non-finite sample values".to_string(),
        ));
    }

    let x_mean = mean(&samples.x);
    let y_mean = mean(&samples.y);

    // Centered sums keep the normal equations well conditioned for x ~ 1e3
    let (sxx, sxy) = samples
        .x
        .iter()
        .zip(&samples.y)
        .fold((0.0, 0.0), |(sxx, sxy), (&x, &y)| {
            let dx = x - x_mean;
            (sxx + dx * dx, sxy + dx * (y - y_mean))
        });

    if sxx == 0.0 {
        return Err(GalleryError::DegenerateFit(
            "all x values are identical".to_string(),
        ));
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let rss: f64 = samples
        .x
        .iter()
        .zip(&samples.y)
        .map(|(&x, &y)| {
            let r = y - (slope * x + intercept);
            r * r
        })
        .sum();

    let dof = n - LINEAR_PARAMETERS;
    let covariance = (dof > 0).then(|| {
        let s2 = rss / dof as f64;
        let var_a = s2 / sxx;
        let var_b = s2 * (1.0 / n as f64 + x_mean * x_mean / sxx);
        let cov_ab = -x_mean * s2 / sxx;
        [[var_a, cov_ab], [cov_ab, var_b]]
    });

    log::debug!(
        "linear fit over {} samples: slope={:.6}, intercept={:.6}, rss={:.6}",
        n,
        slope,
        intercept,
        rss
    );

    Ok(LinearFit {
        slope,
        intercept,
        n,
        rss,
        covariance,
        x_mean,
        sxx,
    })
}

impl LinearFit {
    /// Evaluates the fitted line at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn predict_all(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.predict(x)).collect()
    }

    /// Residual degrees of freedom (`n - 2`).
    pub fn degrees_of_freedom(&self) -> Result<usize> {
        match self.n.checked_sub(LINEAR_PARAMETERS) {
            Some(dof) if dof > 0 => Ok(dof),
            _ => Err(GalleryError::InsufficientDegreesOfFreedom {
                samples: self.n,
                parameters: LINEAR_PARAMETERS,
            }),
        }
    }

    /// Standard deviation of the model error, `sqrt(rss / dof)`.
    pub fn residual_std(&self) -> Result<f64> {
        let dof = self.degrees_of_freedom()?;
        Ok((self.rss / dof as f64).sqrt())
    }

    /// Reduced chi-square of the relative residuals, as printed by the
    /// reference script.
    pub fn relative_chi_square(&self, samples: &SamplePair) -> Result<f64> {
        let dof = self.degrees_of_freedom()?;
        let sum: f64 = samples
            .x
            .iter()
            .zip(&samples.y)
            .map(|(&x, &y)| {
                let predicted = self.predict(x);
                ((y - predicted) / predicted).powi(2)
            })
            .sum();
        Ok(sum / dof as f64)
    }

    /// Confidence band at significance `alpha` over `grid`.
    ///
    /// The t value is the one-sided `1 - alpha` quantile, matching the
    /// reference figure.
    pub fn confidence_band(
        &self,
        samples: &SamplePair,
        grid: &[f64],
        alpha: f64,
        method: BandMethod,
    ) -> Result<ConfidenceBand> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(GalleryError::Generic(format!(
                "Significance level must lie in (0, 1), got {}",
                alpha
            )));
        }
        let dof = self.degrees_of_freedom()?;
        let err_std = self.residual_std()?;
        let t_value = student_t_quantile(1.0 - alpha, dof as f64)?;
        let n = self.n as f64;

        let half_width: Vec<f64> = match method {
            BandMethod::Pointwise => grid
                .iter()
                .map(|&x0| {
                    let leverage = (1.0 / n + (x0 - self.x_mean).powi(2) / self.sxx).sqrt();
                    t_value * err_std * leverage
                })
                .collect(),
            BandMethod::Reference => {
                if grid.is_empty() {
                    return Err(GalleryError::DegenerateFit(
                        "empty evaluation grid".to_string(),
                    ));
                }
                let grid_mean = mean(grid);
                let deviation_sum: f64 = samples.x.iter().map(|&x| x - grid_mean).sum();
                let denominator = deviation_sum * deviation_sum;
                if denominator == 0.0 {
                    return Err(GalleryError::DegenerateFit(
                        "samples are centered on the evaluation grid".to_string(),
                    ));
                }
                let leverage = (1.0 / n + grid_mean * grid_mean / denominator).sqrt();
                vec![t_value * err_std * leverage; grid.len()]
            }
        };

        Ok(ConfidenceBand {
            x: grid.to_vec(),
            fitted: self.predict_all(grid),
            half_width,
            t_value,
            alpha,
        })
    }
}

/// Quantile of the standard Student-t distribution.
pub fn student_t_quantile(p: f64, dof: f64) -> Result<f64> {
    let dist = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| GalleryError::Generic(format!("Student-t distribution: {}", e)))?;
    Ok(dist.inverse_cdf(p))
}

/// `num` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { stop } else { start + step * i as f64 })
                .collect()
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
