//! Argument and parameter types used by Internet protocol transport layer Commands and Responses
use atat::atat_derive::AtatEnum;

/// Control request identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
pub enum SocketControlParam {
    /// 11: query for the TCP outgoing unacknowledged data
    OutgoingUnackData = 11,
}
