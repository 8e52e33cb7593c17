//! ### FTP client (extended command set)
//!
//! Files are fetched in packet mode: `#FTPGETPKT` starts the transfer into the
//! module buffer and `#FTPRECV` drains it in pieces.
use atat::atat_derive::AtatCmd;
use heapless::Vec;

use super::{parse_with, write_command, NoResponse};
use crate::client::LineKind;
use crate::error::Error;
use crate::scan::Scanner;

/// Largest piece requested with one `#FTPRECV`.
pub const FTP_CHUNK_SIZE: usize = 512;

/// Longest `<host>:<port>` server argument.
pub const MAX_SERVER_LEN: usize = 64;

/// Longest user name, password or file name.
pub const MAX_FIELD_LEN: usize = 48;

/// FTP open #FTPOPEN
///
/// `server` is `<host>:<port>`, `mode` 1 selects passive mode.
#[derive(Clone, AtatCmd)]
#[at_cmd("#FTPOPEN", NoResponse, timeout_ms = 90000)]
pub struct FtpOpen<'a> {
    #[at_arg(position = 0, len = 64)]
    pub server: &'a str,
    #[at_arg(position = 1, len = 48)]
    pub username: &'a str,
    #[at_arg(position = 2, len = 48)]
    pub password: &'a str,
    #[at_arg(position = 3)]
    pub mode: u8,
}

/// Get file in packet mode #FTPGETPKT (set)
#[derive(Clone, AtatCmd)]
#[at_cmd("#FTPGETPKT", NoResponse, timeout_ms = 90000)]
pub struct FtpGetPacket<'a> {
    #[at_arg(position = 0, len = 48)]
    pub filename: &'a str,
    #[at_arg(position = 1)]
    pub view_mode: u8,
}

/// Get file in packet mode #FTPGETPKT (read)
///
/// `#FTPGETPKT: <remotefile>,<viewMode>,<eof>`, the file name unquoted.
#[derive(Debug, Clone)]
pub struct GetFtpPacketStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FtpPacketStatus {
    /// The whole file has been received
    pub eof: bool,
}

impl atat::AtatResp for FtpPacketStatus {}

impl atat::AtatCmd for GetFtpPacketStatus {
    type Response = FtpPacketStatus;

    const MAX_LEN: usize = 16;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_command(buf, format_args!("AT#FTPGETPKT?"))
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_with(resp, |resp| {
            let mut s = Scanner::new(resp);
            s.literal("#FTPGETPKT: ")?;
            s.until(b',')?;
            s.literal(",")?;
            s.skip_int()?;
            s.literal(",")?;
            Ok(FtpPacketStatus {
                eof: s.int::<u8>()? == 1,
            })
        })
    }
}

/// Receive data #FTPRECV
///
/// Answered with `#FTPRECV: <n>` followed by `n` raw bytes; the command has to
/// be issued with [`ftp_receive_scanner`] installed on the engine. Without a
/// `#FTPRECV` line the response is [`FtpData::NoHeader`].
#[derive(Debug, Clone)]
pub struct FtpReceive {
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FtpData {
    Data(Vec<u8, FTP_CHUNK_SIZE>),
    NoHeader,
}

impl atat::AtatResp for FtpData {}

impl atat::AtatCmd for FtpReceive {
    type Response = FtpData;

    const MAX_LEN: usize = 20;
    const MAX_TIMEOUT_MS: u32 = 150_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_command(buf, format_args!("AT#FTPRECV={}", self.length))
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_with(resp, |resp| {
            let mut s = Scanner::new(resp);
            if s.literal("#FTPRECV: ").is_err() {
                return Ok(FtpData::NoHeader);
            }
            let length: usize = s.int()?;
            if length > self.length {
                return Err(Error::BadLength);
            }
            let mut data = Vec::new();
            if length > 0 {
                s.next_line()?;
                data.extend_from_slice(s.bytes(length)?)
                    .map_err(|_| Error::Overflow)?;
            }
            Ok(FtpData::Data(data))
        })
    }
}

/// Response scanner for `#FTPRECV`.
pub fn ftp_receive_scanner(line: &[u8]) -> LineKind {
    let mut s = Scanner::new(line);
    match s.literal("#FTPRECV: ").and_then(|_| s.int::<usize>()) {
        Ok(n) => LineKind::RawDataFollows(n),
        Err(_) => LineKind::Unknown,
    }
}

/// FTP close #FTPCLOSE
#[derive(Clone, AtatCmd)]
#[at_cmd("#FTPCLOSE", NoResponse, timeout_ms = 90000)]
pub struct FtpClose;
