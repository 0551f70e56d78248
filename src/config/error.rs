/// Errors surfaced by flash device operations.
///
/// The persistence layer performs no retry or recovery for these; they
/// propagate to the caller so a deployment can at least observe a failing
/// erase or program cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Sector erase failed.
    Erase,
    /// Read failed.
    Read,
    /// Program (write) failed.
    Program,
    /// Address range exceeds the device or a sector boundary.
    Bounds,
}

impl core::fmt::Display for FlashError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FlashError::Erase => write!(f, "sector erase failed"),
            FlashError::Read => write!(f, "flash read failed"),
            FlashError::Program => write!(f, "flash program failed"),
            FlashError::Bounds => write!(f, "address range exceeds device bounds"),
        }
    }
}

/// Errors that can occur while loading or saving the primary record.
///
/// `NotFound` and `VersionMismatch` are recovered locally: the store has
/// already synthesized and persisted a default record by the time either
/// is returned, so they signal "running on defaults" rather than failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No valid magic number on flash; defaults were written.
    NotFound,
    /// Stored record size does not match the current build; defaults were written.
    VersionMismatch,
    /// A flash operation failed.
    Flash(FlashError),
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::NotFound => write!(f, "no stored configuration, defaults written"),
            ConfigError::VersionMismatch => {
                write!(f, "stored configuration size mismatch, defaults written")
            }
            ConfigError::Flash(e) => write!(f, "flash error: {e}"),
        }
    }
}
