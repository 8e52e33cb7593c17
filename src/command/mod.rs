//! AT Commands for u-blox cellular modules and u-blox compatible firmware.
//!
//! Commands with a regular `+CMD: <args>` answer derive [`atat::AtatCmd`].
//! Those whose answer carries raw data, or uses the `#` prefix of the
//! extended command set, implement it by hand on top of [`write_command`] and
//! [`parse_with`].
pub mod control;
pub mod ftp;
pub mod general;
pub mod ip_transport_layer;
pub mod location;
pub mod network_service;
pub mod psn;
pub mod sms;

use core::fmt::{self, Write};

use atat::atat_derive::{AtatCmd, AtatResp, AtatUrc};

use crate::error::Error;

/// Size of the buffer every command line is rendered into, terminator
/// included.
pub const MAX_COMMAND_LEN: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct NoResponse;

/// AT
///
/// Plain attention command, used to check the link and for autobauding.
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse)]
pub struct At;

struct SliceWriter<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        self.buf
            .get_mut(self.len..end)
            .ok_or(fmt::Error)?
            .copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

/// Render `args` and the line terminator into `buf`. Returns the length
/// written, 0 if the line does not fit.
pub(crate) fn write_command(buf: &mut [u8], args: fmt::Arguments) -> usize {
    let mut w = SliceWriter { buf, len: 0 };
    match w.write_fmt(args).and_then(|_| w.write_str("\r\n")) {
        Ok(()) => w.len,
        Err(_) => 0,
    }
}

/// Run a hand written response parser under the [`atat::AtatCmd::parse`]
/// contract.
pub(crate) fn parse_with<T>(
    resp: Result<&[u8], atat::InternalError>,
    parse: impl FnOnce(&[u8]) -> Result<T, Error>,
) -> Result<T, atat::Error> {
    parse(resp?).map_err(|e| match e {
        Error::Atat(e) => e,
        _ => atat::Error::Parse,
    })
}

/// Reject text arguments longer than the command line reserves for them.
pub(crate) fn bounded(text: &str, max: usize) -> Result<&str, Error> {
    if text.len() > max {
        return Err(Error::Overflow);
    }
    Ok(text)
}

/// Unsolicited result codes of u-blox SARA modules.
#[derive(Debug, Clone, AtatUrc)]
pub enum Urc {
    #[at_urc("+UUSOCL")]
    SocketClosed(ip_transport_layer::urc::SocketClosed),
    #[at_urc("+UUSORD")]
    SocketDataAvailable(ip_transport_layer::urc::SocketDataAvailable),
    #[at_urc("+UUPSDA")]
    DataConnectionActivated(psn::urc::DataConnectionActivated),
    #[at_urc("+UUPSDD")]
    DataConnectionDeactivated(psn::urc::DataConnectionDeactivated),
}
