use embassy_time::Duration;

/// Timeout for commands answered locally by the module
pub const AT_TIMEOUT_SHORT: Duration = Duration::from_secs(1);

/// Timeout for commands that may involve the network
pub const AT_TIMEOUT_LONG: Duration = Duration::from_secs(30);

/// Module side of a socket or file transfer operation on the u-blox compatible
/// firmware
pub const TRANSFER_TIMEOUT: Duration = Duration::from_secs(150);

/// Final answer to a message text, `+CMGS`
pub const SMS_TIMEOUT: Duration = Duration::from_secs(60);

/// Pause between the data prompt and the raw payload
pub fn data_prompt_delay() -> Duration {
    Duration::from_millis(50)
}

/// Interval of every polling loop (acknowledgement, FTP data, location, config
/// read-back)
pub fn poll_interval() -> Duration {
    Duration::from_secs(1)
}
