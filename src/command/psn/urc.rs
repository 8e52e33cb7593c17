//! Unsolicited responses for Packet Switched Data Services Commands
use atat::atat_derive::AtatResp;

use crate::scan::Scanner;

/// +UUPSDA
///
/// Result of a packet switched data action, sent when a pending activation or
/// deactivation completes in the background.
#[derive(Debug, Clone, AtatResp)]
pub struct DataConnectionActivated {
    #[at_arg(position = 0)]
    pub result: u8,
}

/// +UUPSDD
///
/// The packet switched profile was deactivated by the network.
#[derive(Debug, Clone, AtatResp)]
pub struct DataConnectionDeactivated {
    #[at_arg(position = 0)]
    pub profile_id: u8,
}

/// 18.25 Packet switched event reporting +CGEV
///
/// Only the deactivation events are of interest to the driver:
/// `+CGEV: NW DEACT ...`, `+CGEV: ME DEACT ...`, `+CGEV: NW PDN DEACT <cid>` and
/// `+CGEV: ME PDN DEACT <cid>`. Returns the affected context, defaulting to
/// `default_cid` when the event does not carry one.
pub fn parse_context_deactivation(line: &[u8], default_cid: u8) -> Option<u8> {
    let mut s = Scanner::new(line);
    s.literal("+CGEV: ").ok()?;
    if !s.optional("NW ") && !s.optional("ME ") {
        return None;
    }
    let pdn = s.optional("PDN ");
    s.literal("DEACT").ok()?;
    if pdn && s.optional(" ") {
        return s.int().ok();
    }
    Some(default_cid)
}
