use crate::error::ConfigError;

/// Slot count of a table built with default options.
pub const DEFAULT_CAPACITY: usize = 64;

/// Fraction of capacity at which a growable table doubles.
pub const DEFAULT_GROW_THRESHOLD: f64 = 0.75;

/// Construction parameters for a [`RobinHoodMap`](crate::RobinHoodMap).
///
/// # Examples
///
/// ```rust
/// use robin_hash::Options;
///
/// let options = Options::default()
///     .with_init_capacity(16)
///     .with_grow_threshold(0.5)
///     .with_shrinkable(false);
/// assert!(options.validate().is_ok());
/// assert!(Options::default().with_init_capacity(12).validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Options {
    /// Initial slot count. Must be a non-zero power of two. Shrinking never
    /// goes below it.
    pub init_capacity: usize,
    /// Whether the table may double when it reaches its grow threshold.
    /// Ignored by fixed storage, which never grows.
    pub growable: bool,
    /// Fraction of capacity, in `[0.0, 1.0]`, that triggers growth. `None`
    /// uses [`DEFAULT_GROW_THRESHOLD`].
    pub grow_threshold: Option<f64>,
    /// Whether the table may halve once occupancy drops under a quarter of
    /// capacity.
    pub shrinkable: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            init_capacity: DEFAULT_CAPACITY,
            growable: true,
            grow_threshold: Some(DEFAULT_GROW_THRESHOLD),
            shrinkable: true,
        }
    }
}

impl Options {
    /// Sets [`init_capacity`](Options::init_capacity).
    pub fn with_init_capacity(mut self, init_capacity: usize) -> Self {
        self.init_capacity = init_capacity;
        self
    }

    /// Sets [`growable`](Options::growable).
    pub fn with_growable(mut self, growable: bool) -> Self {
        self.growable = growable;
        self
    }

    /// Sets [`grow_threshold`](Options::grow_threshold).
    pub fn with_grow_threshold(mut self, fraction: f64) -> Self {
        self.grow_threshold = Some(fraction);
        self
    }

    /// Sets [`shrinkable`](Options::shrinkable).
    pub fn with_shrinkable(mut self, shrinkable: bool) -> Self {
        self.shrinkable = shrinkable;
        self
    }

    /// The grow threshold fraction with the default applied.
    pub fn grow_threshold_fraction(&self) -> f64 {
        self.grow_threshold.unwrap_or(DEFAULT_GROW_THRESHOLD)
    }

    /// Checks the capacity and threshold fraction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_capacity(self.init_capacity)?;
        let fraction = self.grow_threshold_fraction();
        // Written so NaN fails the range check.
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ConfigError::ThresholdOutOfRange);
        }
        Ok(())
    }
}

pub(crate) fn validate_capacity(capacity: usize) -> Result<(), ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::ZeroCapacity);
    }
    if !capacity.is_power_of_two() {
        return Err(ConfigError::CapacityNotPowerOfTwo);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = Options::default();
        assert_eq!(options.init_capacity, 64);
        assert!(options.growable);
        assert!(options.shrinkable);
        assert_eq!(options.grow_threshold_fraction(), 0.75);
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn missing_fraction_uses_default() {
        let options = Options {
            grow_threshold: None,
            ..Options::default()
        };
        assert_eq!(options.grow_threshold_fraction(), DEFAULT_GROW_THRESHOLD);
    }

    #[test]
    fn rejects_bad_capacity() {
        assert_eq!(
            Options::default().with_init_capacity(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
        assert_eq!(
            Options::default().with_init_capacity(48).validate(),
            Err(ConfigError::CapacityNotPowerOfTwo)
        );
        assert_eq!(Options::default().with_init_capacity(1).validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_fraction() {
        for fraction in [-0.1, 1.01, f64::NAN, f64::INFINITY] {
            assert_eq!(
                Options::default().with_grow_threshold(fraction).validate(),
                Err(ConfigError::ThresholdOutOfRange),
                "{fraction}"
            );
        }
        for fraction in [0.0, 0.5, 1.0] {
            assert_eq!(
                Options::default().with_grow_threshold(fraction).validate(),
                Ok(())
            );
        }
    }
}
