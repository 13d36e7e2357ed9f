/// A numeric control value that always stays inside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeInput {
    value: f64,
    min: f64,
    max: f64,
    default: f64,
}

impl RangeInput {
    /// Create an input sitting at its default. The default is clamped into
    /// range, so callers are expected to validate `min <= max` beforehand.
    pub fn new(min: f64, max: f64, default: f64) -> Self {
        let default = default.clamp(min, max);
        Self {
            value: default,
            min,
            max,
            default,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn default_value(&self) -> f64 {
        self.default
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Store `value` (clamped). Returns whether the stored value changed.
    /// NaN is ignored; infinities clamp to the nearest bound.
    pub fn set(&mut self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let clamped = self.clamp(value);
        if clamped == self.value {
            return false;
        }
        self.value = clamped;
        true
    }
}
