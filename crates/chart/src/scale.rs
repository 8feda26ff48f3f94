/// Maps a data interval onto a pixel interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f32, f32),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self { domain, range }
    }

    pub fn map(&self, value: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (d1 - d0).abs() < f64::EPSILON {
            return (r0 + r1) / 2.0;
        }
        let t = (value - d0) / (d1 - d0);
        r0 + (t as f32) * (r1 - r0)
    }
}

/// Rounds a raw step to 1, 2, 2.5 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = [1.0, 2.0, 2.5, 5.0, 10.0]
        .into_iter()
        .find(|&n| n >= normalized - 1e-9)
        .unwrap_or(10.0);
    nice * magnitude
}

/// Evenly spaced tick values covering `[min, max]` with roughly `target_count` intervals.
///
/// The first tick is at or below `min` and the last at or above `max`.
pub fn nice_ticks(min: f64, max: f64, target_count: usize) -> Vec<f64> {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let span = if max - min > f64::EPSILON {
        max - min
    } else if min.abs() > f64::EPSILON {
        min.abs()
    } else {
        1.0
    };
    let step = nice_step(span / target_count.max(1) as f64);
    let start = (min / step).floor() * step;
    let end = (max / step).ceil() * step;
    let count = ((end - start) / step).round() as usize;
    let count = if max - min > f64::EPSILON { count } else { count.max(1) };

    (0..=count)
        .map(|i| {
            let tick = start + i as f64 * step;
            // Strip floating point noise such as 0.30000000000000004.
            (tick * 1e9).round() / 1e9
        })
        .collect()
}

/// Smallest number of decimals that represents `step` exactly.
pub(crate) fn decimals_for_step(step: f64) -> usize {
    (0..=4)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(4)
}
