//! Distance metrics over equal-length numeric vectors.

use oanlp_common::{OaNlpError, Result};

fn check_lengths(p: &[f64], q: &[f64]) -> Result<()> {
    if p.len() != q.len() {
        return Err(OaNlpError::InvalidInput(format!(
            "vectors differ in length: {} vs {}",
            p.len(),
            q.len()
        )));
    }
    Ok(())
}

/// sqrt(Σ(pᵢ−qᵢ)²)
pub fn euclidean(p: &[f64], q: &[f64]) -> Result<f64> {
    check_lengths(p, q)?;
    Ok(p.iter().zip(q).map(|(a, b)| (a - b).powi(2)).sum::<f64>().sqrt())
}

/// Σ|pᵢ−qᵢ|
pub fn manhattan(p: &[f64], q: &[f64]) -> Result<f64> {
    check_lengths(p, q)?;
    Ok(p.iter().zip(q).map(|(a, b)| (a - b).abs()).sum())
}

/// max|pᵢ−qᵢ|, 0 for empty vectors.
pub fn chebyshev(p: &[f64], q: &[f64]) -> Result<f64> {
    check_lengths(p, q)?;
    Ok(p.iter().zip(q).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max))
}

/// (Σ|pᵢ−qᵢ|^e)^(1/e), `e` must be positive.
pub fn minkowski(p: &[f64], q: &[f64], e: f64) -> Result<f64> {
    if !(e > 0.0) || !e.is_finite() {
        return Err(OaNlpError::InvalidInput(format!("minkowski exponent must be positive, got {}", e)));
    }
    check_lengths(p, q)?;
    let sum: f64 = p.iter().zip(q).map(|(a, b)| (a - b).abs().powf(e)).sum();
    Ok(sum.powf(1.0 / e))
}

/// Distance between two scalars, treated as 1-vectors.
pub fn scalar_distance(p: f64, q: f64) -> f64 {
    (p - q).abs()
}

/// A metric that can be passed where a distance function is expected.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Distance {
    #[default]
    Euclidean,
    Manhattan,
    Chebyshev,
    Minkowski(f64),
}

impl Distance {
    pub fn compute(&self, p: &[f64], q: &[f64]) -> Result<f64> {
        match *self {
            Distance::Euclidean    => euclidean(p, q),
            Distance::Manhattan    => manhattan(p, q),
            Distance::Chebyshev    => chebyshev(p, q),
            Distance::Minkowski(e) => minkowski(p, q, e),
        }
    }

    /// Closure form, usable with `Knn::calculate_with`.
    pub fn as_fn(self) -> impl Fn(&[f64], &[f64]) -> Result<f64> {
        move |p: &[f64], q: &[f64]| self.compute(p, q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_known_values() {
        let p = [0.0, 0.0];
        let q = [3.0, 4.0];
        assert!((euclidean(&p, &q).unwrap() - 5.0).abs() < EPS);
        assert!((manhattan(&p, &q).unwrap() - 7.0).abs() < EPS);
        assert!((chebyshev(&p, &q).unwrap() - 4.0).abs() < EPS);
        assert!((minkowski(&p, &q, 1.0).unwrap() - 7.0).abs() < EPS);
        assert!((minkowski(&p, &q, 2.0).unwrap() - 5.0).abs() < 1e-9);
        assert_eq!(scalar_distance(1.5, -0.5), 2.0);
    }

    #[test]
    fn test_metrics_are_symmetric() {
        let vectors: [[f64; 3]; 4] = [
            [0.0, 1.0, 2.0],
            [-3.5, 0.25, 8.0],
            [1e3, -1e-3, 0.0],
            [2.0, 2.0, 2.0],
        ];
        for p in &vectors {
            for q in &vectors {
                for metric in [Distance::Euclidean, Distance::Manhattan, Distance::Chebyshev, Distance::Minkowski(3.0)] {
                    assert_eq!(metric.compute(p, q).unwrap(), metric.compute(q, p).unwrap(), "{metric:?}");
                }
            }
        }
    }

    #[test]
    fn test_length_mismatch_is_invalid_input() {
        let err = euclidean(&[1.0], &[1.0, 2.0]).unwrap_err();
        assert!(err.is_invalid_input());
        assert!(chebyshev(&[], &[1.0]).is_err());
    }

    #[test]
    fn test_minkowski_rejects_non_positive_exponent() {
        assert!(minkowski(&[1.0], &[2.0], 0.0).is_err());
        assert!(minkowski(&[1.0], &[2.0], -1.0).is_err());
        assert!(minkowski(&[1.0], &[2.0], f64::NAN).is_err());
    }

    #[test]
    fn test_identity_is_zero() {
        let p = [1.0, -2.0, 3.5];
        assert_eq!(euclidean(&p, &p).unwrap(), 0.0);
        assert_eq!(chebyshev(&[], &[]).unwrap(), 0.0);
    }
}
