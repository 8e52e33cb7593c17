//! ### 25 - Internet protocol transport layer Commands
pub mod responses;
pub mod types;
pub mod urc;

use atat::atat_derive::AtatCmd;

use super::{parse_with, write_command, NoResponse};
use crate::client::LineKind;
use crate::error::Error;
use crate::scan::Scanner;
use crate::socket::{SocketId, SocketType};
use responses::*;
use types::SocketControlParam;

/// Prompt sent by the module when it is ready for binary socket data.
pub const WRITE_PROMPT: &[u8] = b"@";

/// Largest payload written with one `+USOWR`.
pub const EGRESS_CHUNK_SIZE: usize = 1024;

/// Largest payload requested with one `+USORD`.
pub const INGRESS_CHUNK_SIZE: usize = 480;

/// Longest remote host name `+USOCO` takes.
pub const MAX_HOST_LEN: usize = 128;

/// 25.3 Create Socket +USOCR
///
/// Creates a socket and associates it with the specified protocol (TCP or
/// UDP), returns a number identifying the socket.
#[derive(Clone, AtatCmd)]
#[at_cmd("+USOCR", CreateSocketResponse)]
pub struct CreateSocket {
    #[at_arg(position = 0)]
    pub protocol: SocketType,
}

/// 25.7 Close Socket +USOCL
///
/// Closes the specified socket, like the BSD close routine. In case of remote
/// socket closure the user is notified via the URC.
#[derive(Clone, AtatCmd)]
#[at_cmd("+USOCL", NoResponse)]
pub struct CloseSocket {
    #[at_arg(position = 0)]
    pub socket: SocketId,
}

/// 25.9 Connect Socket +USOCO
///
/// Establishes a peer-to-peer connection of the socket to the specified remote
/// host on the given remote port. For TCP sockets this performs the three way
/// handshake, for UDP sockets it only records the peer.
#[derive(Clone, AtatCmd)]
#[at_cmd("+USOCO", NoResponse, timeout_ms = 40000)]
pub struct ConnectSocket<'a> {
    #[at_arg(position = 0)]
    pub socket: SocketId,
    #[at_arg(position = 1, len = 128)]
    pub remote_host: &'a str,
    #[at_arg(position = 2)]
    pub remote_port: u16,
}

/// 25.10 Write socket data +USOWR
///
/// Binary extended syntax: after the command the module answers with the `@`
/// prompt, then exactly `length` raw bytes are expected. The final answer is a
/// [`WriteSocketDataResponse`].
#[derive(Clone, AtatCmd)]
#[at_cmd("+USOWR", NoResponse)]
pub struct PrepareWriteSocketData {
    #[at_arg(position = 0)]
    pub socket: SocketId,
    #[at_arg(position = 1)]
    pub length: usize,
}

/// 25.12 Read Socket Data +USORD
///
/// Reads up to `length` bytes. The module answers
/// `+USORD: <socket>,<length>,"<data>"` with binary data inside the quotes, so
/// the command has to be issued with [`read_data_filter`] and
/// [`read_data_scanner`] installed on the engine.
#[derive(Debug, Clone)]
pub struct ReadSocketData {
    pub socket: SocketId,
    pub length: usize,
}

impl atat::AtatCmd for ReadSocketData {
    type Response = SocketData;

    const MAX_LEN: usize = 24;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_command(
            buf,
            format_args!("AT+USORD={},{}", self.socket, self.length),
        )
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_with(resp, |resp| {
            let mut s = Scanner::new(resp);
            let (socket, length) = read_data_header(&mut s)?;
            if length > self.length {
                return Err(Error::BadLength);
            }
            let mut data = SocketData {
                socket,
                data: heapless::Vec::new(),
            };
            if length > 0 {
                s.next_line()?;
                s.literal("\"")?;
                data.data
                    .extend_from_slice(s.bytes(length)?)
                    .map_err(|_| Error::Overflow)?;
            }
            Ok(data)
        })
    }
}

/// 25.25 Socket control +USOCTL
#[derive(Clone, AtatCmd)]
#[at_cmd("+USOCTL", SocketControlResponse)]
pub struct GetSocketControl {
    #[at_arg(position = 0)]
    pub socket: SocketId,
    #[at_arg(position = 1)]
    pub param: SocketControlParam,
}

fn read_data_header(s: &mut Scanner) -> Result<(SocketId, usize), Error> {
    s.literal("+USORD: ")?;
    let socket = SocketId(s.int()?);
    s.literal(",")?;
    Ok((socket, s.int()?))
}

/// Response scanner for `+USORD`: the header announces the payload plus its
/// two quotes as raw data.
pub fn read_data_scanner(line: &[u8]) -> LineKind {
    match read_data_header(&mut Scanner::new(line)) {
        Ok((_, length)) if length > 0 => LineKind::RawDataFollows(length + 2),
        _ => LineKind::Unknown,
    }
}

/// Byte filter for `+USORD`: the comma that closes `+USORD: <socket>,<length>`
/// becomes a line break so the header is scanned before the payload arrives.
pub fn read_data_filter(byte: u8, line: &[u8]) -> Option<u8> {
    if byte != b',' {
        return None;
    }
    let mut s = Scanner::new(line);
    match read_data_header(&mut s) {
        Ok(_) if s.remaining().is_empty() => Some(b'\n'),
        _ => None,
    }
}
