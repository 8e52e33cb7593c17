#![cfg_attr(not(test), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod client;
pub mod command;
pub mod config;
mod device;
pub mod error;
pub mod module_timing;
pub mod modules;
mod notifier;
mod pdp;
mod scan;
pub mod socket;
pub mod traits;
mod urc_handler;

#[cfg(test)]
mod test_helpers;

pub use client::{AtClient, ByteFilter, LineKind, LineScanner};
pub use config::{Apn, Config};
pub use error::Error;
pub use modules::{sara::Sara, ublox::Ublox};
pub use notifier::Callbacks;
pub use socket::{SocketId, SocketStatus, SocketType};
pub use traits::CellularOps;
pub use urc_handler::Event;
