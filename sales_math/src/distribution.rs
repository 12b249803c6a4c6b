//! Equal-width histograms

use crate::{MathError, Result};

/// One histogram bucket covering `[lower, upper)`; the last bucket is closed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Split `values` into `bins` equal-width buckets between their min and max.
///
/// An empty input yields no buckets. When every value is the same the range
/// has zero width and one bucket holds everything.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<Bucket>> {
    if bins == 0 {
        return Err(MathError::InvalidInput(
            "Histogram needs at least one bin".to_string(),
        ));
    }

    if values.is_empty() {
        return Ok(Vec::new());
    }

    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(format!(
            "Non-finite value in histogram input: {}",
            bad
        )));
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if (max - min).abs() < f64::EPSILON {
        return Ok(vec![Bucket {
            lower: min,
            upper: max,
            count: values.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut buckets: Vec<Bucket> = (0..bins)
        .map(|i| Bucket {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for &value in values {
        let idx = (((value - min) / width) as usize).min(bins - 1);
        buckets[idx].count += 1;
    }

    Ok(buckets)
}
