use core::fmt;

/// A specialized `Result` type for map operations.
pub type Result<T> = core::result::Result<T, Error>;

/// The failure conditions shared by construction, insertion, and resizing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Error {
    /// The insert would exceed the table's capacity and the table cannot grow,
    /// either because `growable` is off or because the storage is fixed.
    CapacityExhausted,
    /// A probe sequence would need a distance larger than the 7-bit metadata
    /// field can hold. Points at pathological clustering or a broken hash.
    ProbeDistanceOverflow,
    /// Capacity or threshold arithmetic exceeded `usize::MAX`.
    ArithmeticOverflow,
    /// Capacity or threshold arithmetic went below zero.
    ArithmeticUnderflow,
    /// The table was constructed with options it cannot honor.
    InvalidConfiguration(ConfigError),
}

/// The reason a set of [`Options`](crate::Options) was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConfigError {
    /// The requested capacity is zero.
    ZeroCapacity,
    /// The requested capacity is not a power of two.
    CapacityNotPowerOfTwo,
    /// The grow threshold fraction is outside `[0.0, 1.0]` or is NaN.
    ThresholdOutOfRange,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CapacityExhausted => f.write_str("table capacity exhausted"),
            Error::ProbeDistanceOverflow => {
                f.write_str("probe distance exceeds the 7-bit metadata field")
            }
            Error::ArithmeticOverflow => f.write_str("capacity arithmetic overflowed"),
            Error::ArithmeticUnderflow => f.write_str("capacity arithmetic underflowed"),
            Error::InvalidConfiguration(reason) => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroCapacity => f.write_str("capacity must be non-zero"),
            ConfigError::CapacityNotPowerOfTwo => f.write_str("capacity must be a power of two"),
            ConfigError::ThresholdOutOfRange => {
                f.write_str("grow threshold must be within [0.0, 1.0]")
            }
        }
    }
}

impl From<ConfigError> for Error {
    fn from(reason: ConfigError) -> Self {
        Error::InvalidConfiguration(reason)
    }
}

impl core::error::Error for Error {}

impl core::error::Error for ConfigError {}
