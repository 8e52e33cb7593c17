//! ### 4 - General Commands
pub mod responses;

use atat::atat_derive::AtatCmd;

use super::{parse_with, write_command};
use crate::error::Error;
use crate::scan::Scanner;
pub use responses::{identity, Identity};
use responses::*;

/// 4.7 IMEI identification +CGSN
///
/// Returns the International Mobile Equipment Identity (IMEI) of the MT.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGSN", IMEI)]
pub struct GetIMEI;

/// 4.11 International mobile subscriber identification +CIMI
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIMI", CIMI, timeout_ms = 5000)]
pub struct GetIMSI;

/// 4.12 Card identification +CCID
///
/// Returns the ICCID (Integrated Circuit Card ID) of the SIM-card.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CCID", CCID, timeout_ms = 5000)]
pub struct GetCCID;

/// Card identification #CCID
///
/// Extended command set flavour of [`GetCCID`], answered as `#CCID: <iccid>`.
#[derive(Debug, Clone)]
pub struct GetExtendedCCID;

impl atat::AtatCmd for GetExtendedCCID {
    type Response = CCID;

    const MAX_LEN: usize = 10;
    const MAX_TIMEOUT_MS: u32 = 5000;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_command(buf, format_args!("AT#CCID"))
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_with(resp, |resp| {
            let mut s = Scanner::new(resp);
            s.literal("#CCID: ")?;
            let ccid = s.digits()?.parse().map_err(|_| Error::Parse)?;
            Ok(CCID { ccid })
        })
    }
}
