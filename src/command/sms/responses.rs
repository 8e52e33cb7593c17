//! Responses for Short Messages Service Commands
use atat::atat_derive::AtatResp;
use heapless::String;

/// 11.7 Service center address +CSCA
#[derive(Clone, Debug, AtatResp)]
pub struct ServiceCenterAddress {
    #[at_arg(position = 0)]
    pub address: String<24>,
    #[at_arg(position = 1)]
    pub tosca: Option<u8>,
}

/// 11.15 Send message +CMGS, final answer after the text
#[derive(Clone, Debug, AtatResp)]
pub struct MessageReference {
    #[at_arg(position = 0)]
    pub mr: u8,
}
