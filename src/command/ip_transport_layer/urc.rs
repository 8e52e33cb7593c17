//! Unsolicited responses for Internet protocol transport layer Commands
use atat::atat_derive::AtatResp;

use crate::socket::SocketId;

/// +UUSORD
#[derive(Debug, Clone, AtatResp)]
pub struct SocketDataAvailable {
    #[at_arg(position = 0)]
    pub socket: SocketId,
    #[at_arg(position = 1)]
    pub length: usize,
}

/// +UUSOCL
#[derive(Debug, Clone, AtatResp)]
pub struct SocketClosed {
    #[at_arg(position = 0)]
    pub socket: SocketId,
}
