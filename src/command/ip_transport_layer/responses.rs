//! Responses for Internet protocol transport layer Commands
use atat::atat_derive::AtatResp;
use heapless::Vec;

use super::INGRESS_CHUNK_SIZE;
use crate::socket::SocketId;

/// 25.3 Create Socket +USOCR
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct CreateSocketResponse {
    #[at_arg(position = 0)]
    pub socket: SocketId,
}

/// 25.10 Write socket data +USOWR
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct WriteSocketDataResponse {
    #[at_arg(position = 0)]
    pub socket: SocketId,
    #[at_arg(position = 1)]
    pub length: usize,
}

/// 25.12 Read Socket Data +USORD
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketData {
    pub socket: SocketId,
    pub data: Vec<u8, INGRESS_CHUNK_SIZE>,
}

impl atat::AtatResp for SocketData {}

/// 25.25 Socket control +USOCTL
#[derive(Debug, Clone, PartialEq, Eq, AtatResp)]
pub struct SocketControlResponse {
    #[at_arg(position = 0)]
    pub socket: SocketId,
    #[at_arg(position = 1)]
    pub param_id: u8,
    #[at_arg(position = 2)]
    pub param_val: u32,
}
