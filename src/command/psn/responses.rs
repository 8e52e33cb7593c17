//! Responses for Packet Switched Data Services Commands
use atat::atat_derive::AtatResp;

use super::types::IpAddress;

/// 18.9 Packet switched network-assigned data +UPSND, activation status
#[derive(Debug, Clone, AtatResp)]
pub struct PacketSwitchedStatus {
    #[at_arg(position = 0)]
    pub profile_id: u8,
    #[at_arg(position = 1)]
    pub param: u8,
    /// 1 while the profile is active
    #[at_arg(position = 2)]
    pub active: u8,
}

/// 18.9 Packet switched network-assigned data +UPSND, IP address
#[derive(Debug, Clone, AtatResp)]
pub struct LocalAddress {
    #[at_arg(position = 0)]
    pub profile_id: u8,
    #[at_arg(position = 1)]
    pub param: u8,
    #[at_arg(position = 2)]
    pub ip: IpAddress,
}

/// Address handed out on `#SGACT` activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAddress {
    pub ip: IpAddress,
}

impl atat::AtatResp for ContextAddress {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextStatus {
    pub active: bool,
}

impl atat::AtatResp for ContextStatus {}
