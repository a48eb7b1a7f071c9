//! Scales
//! Band, linear and ordinal mappings from data space to pixel space.

use std::collections::HashMap;

/// Maps discrete categories to evenly spaced bands across a pixel range.
///
/// Inner and outer padding are both `padding` (a fraction of the step) and
/// the bands are centred in the range.
#[derive(Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    index: HashMap<String, usize>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn new<I, S>(domain: I, range: (f64, f64), padding: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = HashMap::new();
        let mut unique = Vec::new();
        for name in domain {
            let name = name.into();
            if !index.contains_key(&name) {
                index.insert(name.clone(), unique.len());
                unique.push(name);
            }
        }

        let padding = padding.clamp(0.0, 1.0);
        let n = unique.len() as f64;
        let (r0, r1) = range;
        let step = (r1 - r0) / (n - padding + 2.0 * padding).max(1.0);
        let start = r0 + (r1 - r0 - step * (n - padding)) * 0.5;

        Self {
            domain: unique,
            index,
            start,
            step,
            bandwidth: step * (1.0 - padding),
        }
    }

    /// Left edge of the band for `key`
    pub fn position(&self, key: &str) -> Option<f64> {
        self.index
            .get(key)
            .map(|&i| self.start + self.step * i as f64)
    }

    /// Centre of the band for `key`
    pub fn center(&self, key: &str) -> Option<f64> {
        self.position(key).map(|x| x + self.bandwidth / 2.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}

/// Continuous affine map from a value domain to a pixel range.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    d0: f64,
    d1: f64,
    r0: f64,
    r1: f64,
}

impl LinearScale {
    /// A degenerate or non-finite domain is widened to one unit.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut d0, mut d1) = domain;
        if !d0.is_finite() {
            d0 = 0.0;
        }
        if !d1.is_finite() || (d1 - d0).abs() < 1e-12 {
            d1 = d0 + 1.0;
        }
        Self {
            d0,
            d1,
            r0: range.0,
            r1: range.1,
        }
    }

    #[inline]
    pub fn map(&self, v: f64) -> f64 {
        self.r0 + (v - self.d0) / (self.d1 - self.d0) * (self.r1 - self.r0)
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.d0, self.d1)
    }

    /// Roughly `count` ticks at 1, 2 or 5 times a power of ten, inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.d0 <= self.d1 {
            (self.d0, self.d1)
        } else {
            (self.d1, self.d0)
        };
        match tick_spec(lo, hi, count as f64) {
            Some((i1, i2, inc)) if i2 >= i1 => (i1..=i2)
                .map(|i| {
                    if inc < 0.0 {
                        i as f64 / -inc
                    } else {
                        i as f64 * inc
                    }
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Formatter for the ticks produced by `ticks(count)`.
    pub fn tick_format(&self, count: usize) -> impl Fn(f64) -> String {
        let step = tick_step(self.d0.min(self.d1), self.d0.max(self.d1), count as f64);
        let decimals = if step > 0.0 && step.is_finite() {
            (-step.log10().floor()).max(0.0) as usize
        } else {
            0
        };
        move |v| group_thousands(&format!("{:.*}", decimals, v))
    }
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Integer tick bounds and increment. A negative increment means "divide by".
fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
    if count.is_nan() || count <= 0.0 || !start.is_finite() || !stop.is_finite() {
        return None;
    }
    // a collapsed domain has no ticks
    if stop <= start {
        return None;
    }
    let step = (stop - start) / count;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, inc) = if power < 0.0 {
        let scale = 10f64.powf(-power) / factor;
        let mut i1 = (start * scale).round() as i64;
        let mut i2 = (stop * scale).round() as i64;
        if (i1 as f64) / scale < start {
            i1 += 1;
        }
        if (i2 as f64) / scale > stop {
            i2 -= 1;
        }
        (i1, i2, -scale)
    } else {
        let size = 10f64.powf(power) * factor;
        let mut i1 = (start / size).round() as i64;
        let mut i2 = (stop / size).round() as i64;
        if (i1 as f64) * size < start {
            i1 += 1;
        }
        if (i2 as f64) * size > stop {
            i2 -= 1;
        }
        (i1, i2, size)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_spec(start, stop, count * 2.0);
    }
    Some((i1, i2, inc))
}

fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    match tick_spec(start, stop, count) {
        Some((_, _, inc)) if inc < 0.0 => 1.0 / -inc,
        Some((_, _, inc)) => inc,
        None => 0.0,
    }
}

/// Insert `,` between groups of three integer digits.
fn group_thousands(formatted: &str) -> String {
    let (sign, rest) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match rest.find('.') {
        Some(dot) => rest.split_at(dot),
        None => (rest, ""),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0" reads oddly on an axis
    let is_zero = grouped.chars().all(|c| c == '0' || c == ',')
        && frac_part.chars().all(|c| c == '0' || c == '.');
    let sign = if is_zero { "" } else { sign };
    format!("{sign}{grouped}{frac_part}")
}

/// Maps categories to a repeating list of outputs. Unseen keys are appended
/// to the domain on first lookup.
#[derive(Debug, Clone)]
pub struct OrdinalScale<T: Clone> {
    index: HashMap<String, usize>,
    range: Vec<T>,
}

impl<T: Clone> OrdinalScale<T> {
    pub fn new<I, S>(domain: I, range: Vec<T>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut scale = Self {
            index: HashMap::new(),
            range,
        };
        for key in domain {
            scale.slot(key.into());
        }
        scale
    }

    fn slot(&mut self, key: String) -> usize {
        let next = self.index.len();
        *self.index.entry(key).or_insert(next)
    }

    /// `None` only when the range is empty.
    pub fn get(&mut self, key: &str) -> Option<T> {
        if self.range.is_empty() {
            return None;
        }
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => self.slot(key.to_string()),
        };
        Some(self.range[i % self.range.len()].clone())
    }
}
