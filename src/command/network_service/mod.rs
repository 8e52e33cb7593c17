//! ### 7 - Network service
pub mod responses;
pub mod types;

use atat::atat_derive::AtatCmd;

use super::NoResponse;
use responses::*;

/// 7.2 Signal quality +CSQ
///
/// Returns the RSSI index (0-31, 99 when not known or not detectable).
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSQ", SignalQuality)]
pub struct GetSignalQuality;

/// 7.5 Operator selection +COPS
///
/// Switches the operator reported by the read command to numeric format.
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS=3,2", NoResponse, value_sep = false)]
pub struct SetNumericOperatorFormat;

/// 7.5 Operator selection +COPS (read)
#[derive(Clone, AtatCmd)]
#[at_cmd("+COPS?", OperatorSelection, timeout_ms = 30000)]
pub struct GetOperatorSelection;

/// 7.10 Network registration status +CREG (read)
#[derive(Clone, AtatCmd)]
#[at_cmd("+CREG?", NetworkRegistrationStatus)]
pub struct GetNetworkRegistrationStatus;
