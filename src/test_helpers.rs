//! Scripted stand-ins for the command engine, the delay provider and the
//! application callbacks.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use atat::AtatCmd;
use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::client::{AtClient, ByteFilter, LineKind, LineScanner, UrcLine};
use crate::command::MAX_COMMAND_LEN;
use crate::notifier::Callbacks;
use crate::socket::{SocketId, SocketStatus};

#[derive(Debug)]
enum Outgoing {
    Command(String),
    Raw(Vec<u8>),
}

#[derive(Debug)]
struct Exchange {
    outgoing: Outgoing,
    reply: Result<Vec<u8>, atat::Error>,
    urcs: Vec<String>,
}

/// How the driver had the engine set up for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub command: String,
    pub timeout: Duration,
    pub prompt: Option<&'static [u8]>,
    pub scanner: bool,
    pub filter: bool,
}

/// Plays a fixed script of command/reply exchanges and panics on anything
/// else. URC lines attached to an exchange go through the installed URC
/// scanner while that command runs, like the real engine would see them.
#[derive(Default)]
pub struct MockAtClient {
    script: VecDeque<Exchange>,
    pub sent: Vec<Sent>,
    urc_scanner: Option<LineScanner>,
    command_scanner: Option<LineScanner>,
    filter: Option<ByteFilter>,
    prompt: Option<&'static [u8]>,
    urcs: VecDeque<UrcLine>,
    reply: Vec<u8>,
}

impl MockAtClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, outgoing: Outgoing, reply: Result<Vec<u8>, atat::Error>) -> Self {
        self.script.push_back(Exchange {
            outgoing,
            reply,
            urcs: Vec::new(),
        });
        self
    }

    /// `command` is answered `OK` with `body`.
    pub fn expect(self, command: &str, body: &str) -> Self {
        self.expect_bytes(command, body.as_bytes())
    }

    pub fn expect_bytes(self, command: &str, body: &[u8]) -> Self {
        self.push(Outgoing::Command(command.into()), Ok(body.to_vec()))
    }

    pub fn expect_err(self, command: &str, error: atat::Error) -> Self {
        self.push(Outgoing::Command(command.into()), Err(error))
    }

    /// Raw payload written after a data prompt, answered `OK` with `body`.
    pub fn expect_raw(self, data: &[u8], body: &str) -> Self {
        self.push(Outgoing::Raw(data.to_vec()), Ok(body.as_bytes().to_vec()))
    }

    /// A URC line arriving while the previous exchange is in flight.
    pub fn with_urc(mut self, line: &str) -> Self {
        self.script
            .back_mut()
            .expect("with_urc needs an exchange")
            .urcs
            .push(line.into());
        self
    }

    /// A URC line arriving while the driver is idle.
    pub fn push_urc(&mut self, line: &str) {
        self.receive_line(line);
    }

    pub fn is_done(&self) -> bool {
        self.script.is_empty()
    }

    pub fn has_byte_filter(&self) -> bool {
        self.filter.is_some()
    }

    fn receive_line(&mut self, line: &str) {
        let kind = self
            .urc_scanner
            .map_or(LineKind::Unknown, |scan| scan(line.as_bytes()));
        if kind == LineKind::Urc {
            self.urcs
                .push_back(UrcLine::from_slice(line.as_bytes()).expect("URC line too long"));
        }
    }

    fn play(&mut self, outgoing: Outgoing) -> Result<&[u8], atat::Error> {
        let exchange = self
            .script
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {:?}", outgoing));
        match (&exchange.outgoing, &outgoing) {
            (Outgoing::Command(want), Outgoing::Command(got)) => {
                assert_eq!(want, got, "unexpected command")
            }
            (Outgoing::Raw(want), Outgoing::Raw(got)) => assert_eq!(want, got, "unexpected data"),
            (want, got) => panic!("expected {:?}, got {:?}", want, got),
        }

        for line in &exchange.urcs {
            self.receive_line(line);
        }
        self.command_scanner = None;
        self.prompt = None;

        let reply = exchange.reply?;
        self.reply = reply;
        Ok(&self.reply)
    }
}

impl AtClient for MockAtClient {
    fn set_urc_scanner(&mut self, scanner: Option<LineScanner>) {
        self.urc_scanner = scanner;
    }

    fn set_command_scanner(&mut self, scanner: LineScanner) {
        self.command_scanner = Some(scanner);
    }

    fn set_byte_filter(&mut self, filter: Option<ByteFilter>) {
        self.filter = filter;
    }

    fn expect_data_prompt(&mut self, prompt: &'static [u8]) {
        self.prompt = Some(prompt);
    }

    fn send(&mut self, command: &[u8], timeout: Duration) -> Result<&[u8], atat::Error> {
        let command = command
            .strip_suffix(b"\r\n")
            .unwrap_or_else(|| panic!("unterminated command {:?}", command));
        let command = String::from_utf8_lossy(command).into_owned();
        self.sent.push(Sent {
            command: command.clone(),
            timeout,
            prompt: self.prompt,
            scanner: self.command_scanner.is_some(),
            filter: self.filter.is_some(),
        });
        self.play(Outgoing::Command(command))
    }

    fn send_raw(&mut self, data: &[u8], _timeout: Duration) -> Result<&[u8], atat::Error> {
        self.play(Outgoing::Raw(data.to_vec()))
    }

    fn next_urc(&mut self) -> Option<UrcLine> {
        self.urcs.pop_front()
    }
}

/// The line `cmd` writes, terminator included.
pub fn render<C: AtatCmd>(cmd: &C) -> String {
    let mut buf = [0; MAX_COMMAND_LEN];
    let len = cmd.write(&mut buf);
    String::from_utf8_lossy(&buf[..len]).into_owned()
}

/// Records the requested delays instead of waiting.
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ns: u64,
}

impl MockDelay {
    pub fn millis(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Callback set remembering every notification.
#[derive(Default)]
pub struct Recorder {
    statuses: RefCell<Vec<(SocketId, SocketStatus)>>,
    deactivations: RefCell<Vec<u8>>,
}

impl Recorder {
    pub fn statuses(&self) -> Vec<(SocketId, SocketStatus)> {
        self.statuses.borrow().clone()
    }

    pub fn deactivations(&self) -> Vec<u8> {
        self.deactivations.borrow().clone()
    }
}

impl Callbacks for Recorder {
    fn socket_status(&self, socket: SocketId, status: SocketStatus) {
        self.statuses.borrow_mut().push((socket, status));
    }

    fn pdp_deactivated(&self, context: u8) {
        self.deactivations.borrow_mut().push(context);
    }
}
