//! Responses for General Commands
use core::fmt::Write;

use atat::atat_derive::AtatResp;
use heapless::String;

use crate::error::Error;

/// IMEI, IMSI or ICCID digits.
pub type Identity = String<24>;

/// Digits of a numeric identity as text.
pub fn identity(value: impl core::fmt::Display) -> Result<Identity, Error> {
    let mut id = Identity::new();
    write!(id, "{}", value)?;
    Ok(id)
}

#[derive(Clone, Debug, AtatResp)]
pub struct IMEI {
    #[at_arg(position = 0)]
    pub imei: u64,
}

#[derive(Clone, Debug, AtatResp)]
pub struct CIMI {
    /// International Mobile Subscriber Identity
    #[at_arg(position = 0)]
    pub imsi: u64,
}

#[derive(Clone, Debug, PartialEq, AtatResp)]
pub struct CCID {
    #[at_arg(position = 0)]
    pub ccid: u128,
}
