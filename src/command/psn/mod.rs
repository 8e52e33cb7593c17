//! ### 18 - Packet Switched Data Services Commands
//!
//! SARA modules activate their internal PDP context through a packet switched
//! data profile (`+UPSD`, `+UPSDA`, `+UPSND`). u-blox compatible firmware with
//! the extended command set defines the context with `+CGDCONT` and activates
//! it with `#SGACT`.
pub mod responses;
pub mod types;
pub mod urc;

use atat::atat_derive::AtatCmd;

use super::{parse_with, write_command, NoResponse};
use crate::error::Error;
use crate::scan::Scanner;
use responses::*;
pub use types::IpAddress;
use types::*;

/// Packet switched profile used by the driver
pub const PROFILE_ID: u8 = 0;

/// PDP context used by the driver
pub const CONTEXT_ID: u8 = 1;

/// Longest APN the module accepts.
pub const MAX_APN_LEN: usize = 99;

/// Longest user name or password for the context authentication.
pub const MAX_CREDENTIAL_LEN: usize = 64;

/// 18.7 Packet switched data configuration +UPSD
#[derive(Clone, AtatCmd)]
#[at_cmd("+UPSD", NoResponse)]
pub struct SetPacketSwitchedConfig<'a> {
    #[at_arg(position = 0)]
    pub profile_id: u8,
    #[at_arg(position = 1)]
    pub param: PacketSwitchedParam,
    #[at_arg(position = 2, len = 99)]
    pub value: &'a str,
}

/// 18.8 Packet switched data action +UPSDA
#[derive(Clone, AtatCmd)]
#[at_cmd("+UPSDA", NoResponse, timeout_ms = 150000)]
pub struct SetPacketSwitchedAction {
    #[at_arg(position = 0)]
    pub profile_id: u8,
    #[at_arg(position = 1)]
    pub action: PacketSwitchedAction,
}

/// 18.9 Packet switched network-assigned data +UPSND, parameter 8
///
/// Activation status of profile [`PROFILE_ID`].
#[derive(Clone, AtatCmd)]
#[at_cmd("+UPSND=0,8", PacketSwitchedStatus, value_sep = false)]
pub struct GetPacketSwitchedStatus;

/// 18.9 Packet switched network-assigned data +UPSND, parameter 0
///
/// Address assigned to profile [`PROFILE_ID`].
#[derive(Clone, AtatCmd)]
#[at_cmd("+UPSND=0,0", LocalAddress, value_sep = false)]
pub struct GetLocalAddress;

/// 18.4 PDP context definition +CGDCONT
#[derive(Clone, AtatCmd)]
#[at_cmd("+CGDCONT", NoResponse, timeout_ms = 5000)]
pub struct SetPDPContextDefinition<'a> {
    #[at_arg(position = 0)]
    pub cid: u8,
    #[at_arg(position = 1, len = 6)]
    pub pdp_type: &'a str,
    #[at_arg(position = 2, len = 99)]
    pub apn: &'a str,
}

/// Context activation #SGACT (activate)
///
/// The module answers with the address it was given: `#SGACT: <ip>`.
#[derive(Debug, Clone)]
pub struct ActivateContext<'a> {
    pub cid: u8,
    pub credentials: Option<(&'a str, &'a str)>,
}

impl atat::AtatCmd for ActivateContext<'_> {
    type Response = ContextAddress;

    const MAX_LEN: usize = 24 + 2 * MAX_CREDENTIAL_LEN;
    const MAX_TIMEOUT_MS: u32 = 150_000;

    fn write(&self, buf: &mut [u8]) -> usize {
        match self.credentials {
            Some((user, password)) => write_command(
                buf,
                format_args!("AT#SGACT={},1,\"{}\",\"{}\"", self.cid, user, password),
            ),
            None => write_command(buf, format_args!("AT#SGACT={},1", self.cid)),
        }
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_with(resp, |resp| {
            let mut s = Scanner::new(resp);
            s.literal("#SGACT: ")?;
            let ip = core::str::from_utf8(s.until(b'\n')?).map_err(|_| Error::Parse)?;
            let ip = IpAddress::try_from(ip).map_err(|_| Error::Overflow)?;
            Ok(ContextAddress { ip })
        })
    }
}

/// Context activation #SGACT (deactivate)
///
/// Deactivates context [`CONTEXT_ID`].
#[derive(Clone, AtatCmd)]
#[at_cmd("#SGACT=1,0", NoResponse, value_sep = false, timeout_ms = 150000)]
pub struct DeactivateContext;

/// Context activation #SGACT (read)
///
/// Reports whether context `cid` is active, from the `#SGACT: <cid>,<stat>`
/// lines.
#[derive(Debug, Clone)]
pub struct GetContextActivation {
    pub cid: u8,
}

impl atat::AtatCmd for GetContextActivation {
    type Response = ContextStatus;

    const MAX_LEN: usize = 12;

    fn write(&self, buf: &mut [u8]) -> usize {
        write_command(buf, format_args!("AT#SGACT?"))
    }

    fn parse(
        &self,
        resp: Result<&[u8], atat::InternalError>,
    ) -> Result<Self::Response, atat::Error> {
        parse_with(resp, |resp| {
            for line in resp.split(|&c| c == b'\n') {
                let mut s = Scanner::new(line);
                if s.literal("#SGACT: ").is_err() {
                    continue;
                }
                let cid: u8 = s.int()?;
                s.literal(",")?;
                let stat: u8 = s.int()?;
                if cid == self.cid {
                    return Ok(ContextStatus { active: stat == 1 });
                }
            }
            Ok(ContextStatus { active: false })
        })
    }
}
