// vigil-core/src/domain/analysis/stats.rs

/// Single-pass accumulator for mean / population variance / range, using
/// Welford's online algorithm.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        if self.count == 1 {
            self.mean = value;
            self.m2 = 0.0;
            self.min = value;
            self.max = value;
            return;
        }

        let old_mean = self.mean;
        self.mean += (value - old_mean) / self.count as f64;
        // M2_new = M2_old + (x - old_mean) * (x - new_mean)
        self.m2 += (value - old_mean) * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation (ddof = 0); 0 with fewer than two values.
    pub fn population_std(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        (self.m2 / self.count as f64).sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

impl FromIterator<f64> for RunningStats {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stats = RunningStats::default();
        for value in iter {
            stats.push(value);
        }
        stats
    }
}

/// Pearson correlation over pairwise-complete observations.
///
/// Returns `None` when fewer than two pairs exist or either side has no
/// variance beyond float rounding (the coefficient is undefined). The cut-off
/// scales with the values, so a real spread at any magnitude is kept.
pub fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if is_flat(var_x, pairs.iter().map(|(x, _)| *x), n)
        || is_flat(var_y, pairs.iter().map(|(_, y)| *y), n)
    {
        return None;
    }

    // Clamp float drift so |r| never exceeds 1
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

/// Summed squared deviations within the rounding noise of the values.
fn is_flat(sum_sq_dev: f64, values: impl Iterator<Item = f64>, n: f64) -> bool {
    let magnitude = values.fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let noise = 4.0 * f64::EPSILON * magnitude;
    sum_sq_dev <= n * noise * noise
}
