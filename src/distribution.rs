use crate::variant::Distribution;

/// Summarizes per-sample values with nearest-rank quartiles.
///
/// Returns `None` when there are no values, so "no samples" is never confused
/// with a distribution of zeros.
pub fn calculate_distribution(values: &[i32]) -> Option<Distribution> {
    let length = values.len();

    match length {
        0 => None,
        1 => {
            let x = values[0] as f64;
            Some(Distribution {
                min: x,
                q25: x,
                median: x,
                q75: x,
                max: x,
                mean: x,
            })
        }
        _ => {
            let mut sorted = values.to_vec();
            sorted.sort_unstable();

            let half = length / 2;
            let median = if length % 2 == 0 {
                (sorted[half - 1] as f64 + sorted[half] as f64) / 2.0
            } else {
                sorted[half] as f64
            };

            let sum: i64 = sorted.iter().map(|&x| x as i64).sum();

            Some(Distribution {
                min: sorted[0] as f64,
                q25: sorted[nearest_rank(0.25, length)] as f64,
                median,
                q75: sorted[nearest_rank(0.75, length)] as f64,
                max: sorted[length - 1] as f64,
                mean: sum as f64 / length as f64,
            })
        }
    }
}

// floor(p * (n + 1)) - 1, clamped into [0, n - 1]
fn nearest_rank(percentile: f64, length: usize) -> usize {
    let rank = (percentile * (length as f64 + 1.0)).floor() as isize - 1;
    rank.clamp(0, length as isize - 1) as usize
}
