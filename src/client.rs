//! Contract of the line oriented AT command engine the drivers run on.
//!
//! The engine owns the serial transport. It writes a command line, collects
//! the response lines up to the final result code and hands the body back to
//! the driver. While a command is in flight it also watches every incoming
//! line for unsolicited result codes (URCs). Lines classified as URCs are kept
//! aside in a queue that the driver drains once the command has returned.

use embassy_time::Duration;
use heapless::Vec;

/// Longest URC line the engine keeps, terminator included.
pub const MAX_URC_LEN: usize = 128;

pub type UrcLine = Vec<u8, MAX_URC_LEN>;

/// Classification of a complete line received from the modem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineKind {
    /// Ordinary response line, handled by the normal response path
    Unknown,
    /// Unsolicited result code, queued for [`AtClient::next_urc`]
    Urc,
    /// The line is a header announcing that the given number of raw bytes
    /// follow. Those bytes are appended to the response verbatim.
    RawDataFollows(usize),
}

/// Classifies a line (without terminator).
pub type LineScanner = fn(&[u8]) -> LineKind;

/// Inspects each received byte together with the partial line collected so
/// far. Returning `Some(byte)` substitutes the received byte and uninstalls
/// the filter, `None` keeps the byte unchanged.
pub type ByteFilter = fn(u8, &[u8]) -> Option<u8>;

pub trait AtClient {
    /// Install the device wide URC classifier.
    fn set_urc_scanner(&mut self, scanner: Option<LineScanner>);

    /// Install a classifier for the response of the next command only.
    fn set_command_scanner(&mut self, scanner: LineScanner);

    fn set_byte_filter(&mut self, filter: Option<ByteFilter>);

    /// Make the next [`AtClient::send`] complete as soon as `prompt` has been
    /// received instead of waiting for a final result code. The body returned
    /// then holds the lines before the prompt, without the prompt itself.
    fn expect_data_prompt(&mut self, prompt: &'static [u8]);

    /// Write `command`, already carrying its `\r\n` terminator, and wait up to
    /// `timeout` for the final result code.
    ///
    /// On `OK` the body is returned: intermediate lines joined with `\n`, raw
    /// data appended after its header line. `ERROR` and `+CME ERROR` map to
    /// [`atat::Error::Error`], an expired timeout to [`atat::Error::Timeout`].
    fn send(&mut self, command: &[u8], timeout: Duration) -> Result<&[u8], atat::Error>;

    /// Write raw payload bytes (after a data prompt) and wait for the final
    /// result code like [`AtClient::send`].
    fn send_raw(&mut self, data: &[u8], timeout: Duration) -> Result<&[u8], atat::Error>;

    /// Oldest URC line received since it was last called.
    fn next_urc(&mut self) -> Option<UrcLine>;
}

impl<T: AtClient + ?Sized> AtClient for &mut T {
    fn set_urc_scanner(&mut self, scanner: Option<LineScanner>) {
        T::set_urc_scanner(self, scanner)
    }

    fn set_command_scanner(&mut self, scanner: LineScanner) {
        T::set_command_scanner(self, scanner)
    }

    fn set_byte_filter(&mut self, filter: Option<ByteFilter>) {
        T::set_byte_filter(self, filter)
    }

    fn expect_data_prompt(&mut self, prompt: &'static [u8]) {
        T::expect_data_prompt(self, prompt)
    }

    fn send(&mut self, command: &[u8], timeout: Duration) -> Result<&[u8], atat::Error> {
        T::send(self, command, timeout)
    }

    fn send_raw(&mut self, data: &[u8], timeout: Duration) -> Result<&[u8], atat::Error> {
        T::send_raw(self, data, timeout)
    }

    fn next_urc(&mut self) -> Option<UrcLine> {
        T::next_urc(self)
    }
}

/// Whether `line` starts with one of `prefixes`.
pub fn prefix_in_table(line: &[u8], prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| line.starts_with(p.as_bytes()))
}
