//! Modem family drivers.
//!
//! Every family wraps a [`Device`](crate::device::Device) sized for its socket
//! count and implements [`CellularOps`](crate::traits::CellularOps) for the
//! operations its firmware offers.
pub mod sara;
mod socket;
pub mod ublox;

use embassy_time::Duration;

use crate::client::LineScanner;
use crate::urc_handler::Event;

/// What differs between modem families below the driver operations.
pub struct Family {
    pub name: &'static str,
    /// Device wide classifier, flags the URC lines of the family
    pub scan_line: LineScanner,
    /// Translates a queued URC line
    pub parse_urc: fn(&[u8]) -> Option<Event>,
    /// Time the module may take to close a socket
    pub close_timeout: Duration,
}
