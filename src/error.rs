use core::fmt;

/// Errors reported by the block-transmit and notification paths.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// No host terminal is attached to the CDC interface. Nothing was written.
    NotConnected,
}

impl Error {
    /// Status code in the 0 = success convention used by callers that only check a flag.
    pub fn code(&self) -> u8 {
        match self {
            Error::NotConnected => 1,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotConnected => f.write_str("no host attached to CDC interface"),
        }
    }
}

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            Error::NotConnected => embedded_io::ErrorKind::NotConnected,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
