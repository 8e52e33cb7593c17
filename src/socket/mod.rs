mod set;

use core::fmt;

use atat::atat_derive::{AtatEnum, AtatLen};
use serde::{Deserialize, Serialize};

pub use self::set::{Slot, SocketTable};

/// Socket number as assigned by the modem.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AtatLen,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketId(pub u8);

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketStatus {
    /// Never connected, closed, or closed by the peer
    #[default]
    Unknown,
    Connected,
    /// The last connect attempt failed
    Error,
}

/// Transport protocol, as its IANA number for `+USOCR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketType {
    Tcp = 6,
    Udp = 17,
}
