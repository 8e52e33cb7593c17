//! Argument and parameter types used by Packet Switched Data Services Commands and Responses
use atat::atat_derive::AtatEnum;
use heapless::String;

pub type IpAddress = String<40>;

/// Parameters of `+UPSD` the driver sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
pub enum PacketSwitchedParam {
    /// 1: APN, up to 99 characters
    Apn = 1,
    /// 2: user name for the authentication phase
    Username = 2,
    /// 3: password for the authentication phase
    Password = 3,
    /// 7: static IP address, "0.0.0.0" for a dynamic one
    IpAddress = 7,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AtatEnum)]
pub enum PacketSwitchedAction {
    /// 3: activate the PDP context of the profile
    Activate = 3,
    /// 4: deactivate it
    Deactivate = 4,
}
