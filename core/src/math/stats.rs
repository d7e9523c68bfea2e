pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Weighted mean of `values`; `None` when the weights sum to zero.
    pub fn weighted_mean(values: &[f64], weights: &[f64]) -> Option<f64> {
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return None;
        }
        let sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
        Some(sum / total)
    }

    /// Centered moving average with edge clamping (the window repeats the
    /// boundary sample). Sequences shorter than the window are copied.
    pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
        if window < 2 || values.len() < window {
            return values.to_vec();
        }
        let half = (window / 2) as isize;
        let last = values.len() as isize - 1;
        (0..values.len() as isize)
            .map(|center| {
                let sum: f64 = (center - half..center - half + window as isize)
                    .map(|index| values[index.clamp(0, last) as usize])
                    .sum();
                sum / window as f64
            })
            .collect()
    }
}
