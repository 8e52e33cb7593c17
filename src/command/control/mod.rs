//! ### 15 - V24 control and V25ter Commands
use atat::atat_derive::AtatCmd;

use super::NoResponse;

/// 15.2 Echo On/Off E
#[derive(Clone, AtatCmd)]
#[at_cmd("E", NoResponse, value_sep = false)]
pub struct SetEcho {
    #[at_arg(position = 0)]
    pub enabled: u8,
}

/// 15.8 Flow control &K
#[derive(Clone, AtatCmd)]
#[at_cmd("&K", NoResponse, value_sep = false)]
pub struct SetFlowControl {
    #[at_arg(position = 0)]
    pub mode: u8,
}

/// 15.10 UART data rate configuration +IPR
#[derive(Clone, AtatCmd)]
#[at_cmd("+IPR", NoResponse)]
pub struct SetDataRate {
    #[at_arg(position = 0)]
    pub rate: u32,
}

/// 5.13 Report mobile termination error +CMEE
///
/// `n` = 2 reports errors verbosely, as text.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMEE", NoResponse)]
pub struct SetReportMobileTerminationError {
    #[at_arg(position = 0)]
    pub n: u8,
}

/// 15.23 Automatic answer S0
///
/// Number of rings before an incoming call is answered, 0 disables.
#[derive(Clone, AtatCmd)]
#[at_cmd("S0", NoResponse)]
pub struct SetAutoAnswer {
    #[at_arg(position = 0)]
    pub rings: u8,
}

/// Select interface style #SELINT
///
/// Style 2 enables the extended (`#`) command set.
#[derive(Clone, AtatCmd)]
#[at_cmd("#SELINT", NoResponse)]
pub struct SetInterfaceStyle {
    #[at_arg(position = 0)]
    pub style: u8,
}
