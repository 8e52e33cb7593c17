//! Responses for Network service Commands
use atat::atat_derive::AtatResp;
use heapless::String;

use super::types::Operator;
use crate::error::Error;

/// 7.2 Signal quality +CSQ
#[derive(Clone, Debug, AtatResp)]
pub struct SignalQuality {
    #[at_arg(position = 0)]
    pub rssi: u8,
    #[at_arg(position = 1)]
    pub ber: u8,
}

/// 7.5 Operator selection +COPS
#[derive(Clone, Debug, AtatResp)]
pub struct OperatorSelection {
    #[at_arg(position = 0)]
    pub mode: u8,
    #[at_arg(position = 1)]
    pub format: Option<u8>,
    #[at_arg(position = 2)]
    pub oper: Option<String<24>>,
    #[at_arg(position = 3)]
    pub act: Option<u8>,
}

impl TryFrom<OperatorSelection> for Operator {
    type Error = Error;

    /// Only the numeric format carries the MCC/MNC code.
    fn try_from(cops: OperatorSelection) -> Result<Self, Self::Error> {
        match (cops.format, cops.oper) {
            (Some(2), Some(oper)) => Ok(Operator {
                code: oper.parse().map_err(|_| Error::Parse)?,
                rat: cops.act,
            }),
            _ => Err(Error::Parse),
        }
    }
}

/// 7.10 Network registration status +CREG
#[derive(Clone, Debug, AtatResp)]
pub struct NetworkRegistrationStatus {
    #[at_arg(position = 0)]
    pub n: u8,
    #[at_arg(position = 1)]
    pub stat: u8,
    #[at_arg(position = 2)]
    pub lac: Option<String<4>>,
    #[at_arg(position = 3)]
    pub ci: Option<String<8>>,
    #[at_arg(position = 4)]
    pub act: Option<u8>,
}
