//! ### 11 - Short Messages Service
pub mod responses;

use atat::atat_derive::AtatCmd;

use super::NoResponse;
use responses::*;

/// Prompt the module sends when it is ready for the message text.
pub const MESSAGE_PROMPT: &[u8] = b"> ";

/// Terminates the message text (Ctrl-Z).
pub const MESSAGE_TERMINATOR: u8 = 0x1A;

/// Longest text message sent in one part.
pub const MAX_MESSAGE_LEN: usize = 140;

/// Longest destination or service center number.
pub const MAX_NUMBER_LEN: usize = 24;

/// 11.4 Message format +CMGF
///
/// `mode` 1 selects text mode.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGF", NoResponse)]
pub struct SetMessageFormat {
    #[at_arg(position = 0)]
    pub mode: u8,
}

/// 11.7 Service center address +CSCA
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSCA", NoResponse)]
pub struct SetServiceCenterAddress<'a> {
    #[at_arg(position = 0, len = 24)]
    pub address: &'a str,
}

/// 11.7 Service center address +CSCA (read)
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSCA?", ServiceCenterAddress)]
pub struct GetServiceCenterAddress;

/// 11.15 Send message +CMGS (text mode)
///
/// The module answers with [`MESSAGE_PROMPT`]; the text follows as raw data,
/// terminated by [`MESSAGE_TERMINATOR`], and the final answer is a
/// [`MessageReference`].
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGS", NoResponse)]
pub struct SendMessage<'a> {
    #[at_arg(position = 0, len = 24)]
    pub destination: &'a str,
}
