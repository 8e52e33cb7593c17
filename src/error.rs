#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GenericError {
    Timeout,
    Unsupported,
}

#[derive(Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    // Socket errors
    /// Socket id outside the slot table of the modem family
    InvalidSocket,
    SocketNotConnected,
    /// Every socket slot is currently connected
    SocketSetFull,

    // Packet switched data errors
    ContextActivation,

    // Response errors
    /// Response text did not match the expected layout
    Parse,
    /// Modem acknowledged a different amount of data than was requested
    BadLength,
    /// A command line or payload does not fit its bounded buffer
    Overflow,
    /// Network reported a failed or aborted operation, with its status code
    Aborted(u16),

    // Generic shared errors, e.g. from `core::`
    Generic(GenericError),

    Atat(atat::Error),
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::InvalidSocket => defmt::write!(f, "InvalidSocket"),
            Self::SocketNotConnected => defmt::write!(f, "SocketNotConnected"),
            Self::SocketSetFull => defmt::write!(f, "SocketSetFull"),
            Self::ContextActivation => defmt::write!(f, "ContextActivation"),
            Self::Parse => defmt::write!(f, "Parse"),
            Self::BadLength => defmt::write!(f, "BadLength"),
            Self::Overflow => defmt::write!(f, "Overflow"),
            Self::Aborted(s) => defmt::write!(f, "Aborted({})", s),
            Self::Generic(e) => defmt::write!(f, "Generic({:?})", e),
            Self::Atat(e) => defmt::write!(f, "Atat({:?})", e),
        }
    }
}

impl Error {
    pub(crate) const fn unsupported() -> Self {
        Self::Generic(GenericError::Unsupported)
    }

    pub(crate) const fn timeout() -> Self {
        Self::Generic(GenericError::Timeout)
    }
}

impl From<atat::Error> for Error {
    fn from(e: atat::Error) -> Self {
        match e {
            atat::Error::Timeout => Self::Generic(GenericError::Timeout),
            atat::Error::Parse => Self::Parse,
            e => Self::Atat(e),
        }
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::Overflow
    }
}
