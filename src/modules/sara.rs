//! u-blox SARA modules.
//!
//! The internal PDP context is driven through packet switched profile 0, and
//! connecting a socket brings the context up on demand.

use atat::AtatUrc;
use embedded_hal::delay::DelayNs;

use super::Family;
use crate::client::{prefix_in_table, AtClient, LineKind};
use crate::command::bounded;
use crate::command::control::{SetAutoAnswer, SetDataRate};
use crate::command::general::Identity;
use crate::command::ip_transport_layer::{types::SocketControlParam, GetSocketControl};
use crate::command::network_service::types::{NetworkRegistrationStat, Operator};
use crate::command::psn::{
    types::{PacketSwitchedAction, PacketSwitchedParam},
    GetLocalAddress, GetPacketSwitchedStatus, SetPacketSwitchedAction, SetPacketSwitchedConfig,
    MAX_APN_LEN, MAX_CREDENTIAL_LEN, PROFILE_ID,
};
use crate::command::sms::{
    responses::MessageReference, GetServiceCenterAddress, SendMessage, SetMessageFormat,
    SetServiceCenterAddress, MAX_MESSAGE_LEN, MAX_NUMBER_LEN, MESSAGE_PROMPT, MESSAGE_TERMINATOR,
};
use crate::command::Urc;
use crate::config::Config;
use crate::device::{Device, Framing};
use crate::error::Error;
use crate::module_timing::{
    data_prompt_delay, poll_interval, AT_TIMEOUT_LONG, AT_TIMEOUT_SHORT, SMS_TIMEOUT,
};
use crate::notifier::Callbacks;
use crate::socket::{SocketId, SocketStatus, SocketType};
use crate::traits::CellularOps;
use crate::urc_handler::Event;

/// Number of sockets the module multiplexes.
pub const SOCKETS: usize = 6;

const URC_PREFIXES: &[&str] = &["+UUSOCL: ", "+UUSORD: ", "+UUPSDA: ", "+UUPSDD: ", "+CRING: "];

/// Chunked reads per receive call.
const RECV_ATTEMPTS: usize = 4;

/// Unacknowledged data polls before giving up, one per second.
const WAITACK_ATTEMPTS: usize = 40;

/// Attempts of the service center read-back before sending a message.
const SERVICE_CENTER_ATTEMPTS: usize = 30;

fn scan_line(line: &[u8]) -> LineKind {
    if prefix_in_table(line, URC_PREFIXES) {
        LineKind::Urc
    } else {
        LineKind::Unknown
    }
}

fn parse_urc(line: &[u8]) -> Option<Event> {
    Some(match Urc::parse(line)? {
        Urc::SocketClosed(c) => Event::SocketClosed(c.socket),
        Urc::SocketDataAvailable(d) => Event::DataAvailable(d.socket, d.length),
        Urc::DataConnectionActivated(a) => Event::ContextActionResult(a.result),
        Urc::DataConnectionDeactivated(d) => Event::ContextDeactivated(d.profile_id),
    })
}

pub static FAMILY: Family = Family {
    name: "SARA",
    scan_line,
    parse_urc,
    close_timeout: AT_TIMEOUT_LONG,
};

type SaraDevice<'a, AT, D> = Device<'a, AT, D, SOCKETS>;

pub struct Sara<'a, AT, D> {
    pub(crate) dev: SaraDevice<'a, AT, D>,
}

impl<'a, AT, D> Sara<'a, AT, D>
where
    AT: AtClient,
    D: DelayNs,
{
    pub fn new(at: AT, delay: D, config: Config<'a>) -> Self {
        Self {
            dev: Device::new(at, delay, config, &FAMILY),
        }
    }

    pub fn set_callbacks(&mut self, callbacks: Option<&'a dyn Callbacks>) {
        self.dev.set_callbacks(callbacks);
    }

    /// Address assigned with the last context activation.
    pub fn local_ip(&self) -> Option<&str> {
        self.dev.local_ip.as_deref()
    }

    /// Consecutive failures of network operations since the last success.
    pub fn pdp_failures(&self) -> u32 {
        self.dev.pdp.failures()
    }

    pub fn pdp_threshold(&self) -> u32 {
        self.dev.pdp.threshold()
    }

    pub fn pdp_success(&mut self) {
        self.dev.pdp.success();
    }

    pub fn pdp_failure(&mut self) {
        self.dev.pdp.failure();
    }

    fn open_context(dev: &mut SaraDevice<'a, AT, D>, apn: &str) -> Result<(), Error> {
        let status = dev.send(&GetPacketSwitchedStatus)?;
        if status.active == 1 {
            debug!("PDP: profile {} already active", PROFILE_ID);
            return Ok(());
        }

        let configure = |dev: &mut SaraDevice<'a, AT, D>, param, value| {
            dev.send(&SetPacketSwitchedConfig {
                profile_id: PROFILE_ID,
                param,
                value,
            })
        };
        configure(dev, PacketSwitchedParam::Apn, bounded(apn, MAX_APN_LEN)?)?;
        if let Some((username, password)) = dev.config.apn.credentials() {
            let username = bounded(username, MAX_CREDENTIAL_LEN)?;
            let password = bounded(password, MAX_CREDENTIAL_LEN)?;
            configure(dev, PacketSwitchedParam::Username, username)?;
            configure(dev, PacketSwitchedParam::Password, password)?;
        }
        configure(dev, PacketSwitchedParam::IpAddress, "0.0.0.0")?;

        dev.send(&SetPacketSwitchedAction {
            profile_id: PROFILE_ID,
            action: PacketSwitchedAction::Activate,
        })?;

        let local = dev.send(&GetLocalAddress)?;
        info!("PDP: active, local address {}", local.ip.as_str());
        dev.local_ip = Some(local.ip);
        Ok(())
    }

    fn close_context(dev: &mut SaraDevice<'a, AT, D>) -> Result<(), Error> {
        dev.local_ip = None;
        dev.send(&SetPacketSwitchedAction {
            profile_id: PROFILE_ID,
            action: PacketSwitchedAction::Deactivate,
        })?;
        Ok(())
    }

    fn connect(&mut self, id: SocketId, host: &str, port: u16) -> Result<(), Error> {
        self.dev.sockets.get(id)?;
        self.dev.request_pdp(Self::open_context, Self::close_context)?;

        let result = self.dev.connect_socket(id, host, port);
        match result {
            Ok(()) => self.dev.pdp.success(),
            Err(_) => self.dev.pdp.failure(),
        }
        result
    }

    fn waitack(&mut self, id: SocketId) -> Result<(), Error> {
        for _ in 0..WAITACK_ATTEMPTS {
            self.dev.handle_urcs();
            self.dev.sockets.ensure_connected(id)?;

            let unacked = self
                .dev
                .send(&GetSocketControl {
                    socket: id,
                    param: SocketControlParam::OutgoingUnackData,
                })?
                .param_val;
            if unacked == 0 {
                return Ok(());
            }
            trace!("[{}] {} bytes not acknowledged", id.0, unacked);
            self.dev.delay(poll_interval());
        }
        warn!("[{}] Data still unacknowledged", id.0);
        Err(Error::timeout())
    }

    fn send_sms(&mut self, number: &str, text: &str) -> Result<(), Error> {
        if text.len() > MAX_MESSAGE_LEN {
            return Err(Error::Overflow);
        }
        let mut message = heapless::Vec::<u8, { MAX_MESSAGE_LEN + 1 }>::new();
        message
            .extend_from_slice(text.as_bytes())
            .map_err(|_| Error::Overflow)?;
        message
            .push(MESSAGE_TERMINATOR)
            .map_err(|_| Error::Overflow)?;

        let number = bounded(number, MAX_NUMBER_LEN)?;

        self.dev.send(&SetMessageFormat { mode: 1 })?;
        if let Some(center) = self.dev.config.sms_service_center {
            let center = bounded(center, MAX_NUMBER_LEN)?;
            self.dev.configure(
                &SetServiceCenterAddress { address: center },
                &GetServiceCenterAddress,
                |held| held.address == center,
                SERVICE_CENTER_ATTEMPTS,
            )?;
        }

        self.dev.send_framed(
            &SendMessage {
                destination: number,
            },
            AT_TIMEOUT_SHORT,
            Framing {
                prompt: Some(MESSAGE_PROMPT),
                ..Framing::default()
            },
        )?;
        let reference: MessageReference = self.dev.send_raw(&message, SMS_TIMEOUT)?;
        info!("SMS sent, reference {}", reference.mr);
        Ok(())
    }
}

impl<'a, AT, D> CellularOps for Sara<'a, AT, D>
where
    AT: AtClient,
    D: DelayNs,
{
    fn attach(&mut self) -> Result<(), Error> {
        self.dev.bind();
        self.dev.with_urcs(|dev| {
            dev.autobaud()?;
            dev.disable_echo()?;
            dev.verbose_errors()?;
            let rate = dev.config.baud_rate;
            dev.send(&SetDataRate { rate })?;
            Ok(())
        })
    }

    fn detach(&mut self) -> Result<(), Error> {
        self.dev.unbind();
        Ok(())
    }

    fn pdp_open(&mut self, apn: &str) -> Result<(), Error> {
        self.dev.with_urcs(|dev| Self::open_context(dev, apn))
    }

    fn pdp_close(&mut self) -> Result<(), Error> {
        self.dev.with_urcs(Self::close_context)
    }

    fn pdp_request(&mut self) -> Result<(), Error> {
        self.dev
            .with_urcs(|dev| dev.request_pdp(Self::open_context, Self::close_context))
    }

    fn imei(&mut self) -> Result<Identity, Error> {
        self.dev.with_urcs(|dev| dev.imei())
    }

    fn iccid(&mut self) -> Result<Identity, Error> {
        self.dev.with_urcs(|dev| dev.iccid())
    }

    fn imsi(&mut self) -> Result<Identity, Error> {
        self.dev.with_urcs(|dev| dev.imsi())
    }

    fn creg(&mut self) -> Result<NetworkRegistrationStat, Error> {
        self.dev.with_urcs(|dev| dev.creg())
    }

    fn rssi(&mut self) -> Result<u8, Error> {
        self.dev.with_urcs(|dev| dev.rssi())
    }

    fn cops(&mut self) -> Result<Operator, Error> {
        self.dev.with_urcs(|dev| dev.cops())
    }

    fn test(&mut self) -> Result<(), Error> {
        self.dev.with_urcs(|dev| dev.test())
    }

    fn ats0(&mut self) -> Result<(), Error> {
        self.dev.with_urcs(|dev| {
            dev.send(&SetAutoAnswer { rings: 2 })?;
            Ok(())
        })
    }

    fn sms(&mut self, number: &str, text: &str) -> Result<(), Error> {
        self.dev.handle_urcs();
        let result = self.send_sms(number, text);
        self.dev.handle_urcs();
        result
    }

    fn socket_create(&mut self, ty: SocketType) -> Result<SocketId, Error> {
        self.dev.with_urcs(|dev| dev.create_socket(ty))
    }

    fn socket_connect(&mut self, id: SocketId, host: &str, port: u16) -> Result<(), Error> {
        self.dev.handle_urcs();
        let result = self.connect(id, host, port);
        self.dev.handle_urcs();
        result
    }

    fn socket_send(&mut self, id: SocketId, buf: &[u8]) -> Result<usize, Error> {
        self.dev.with_urcs(|dev| {
            dev.write_socket(id, buf, Some(data_prompt_delay()), AT_TIMEOUT_SHORT)
        })
    }

    fn socket_recv(&mut self, id: SocketId, buf: &mut [u8]) -> Result<usize, Error> {
        self.dev
            .with_urcs(|dev| dev.read_socket(id, buf, RECV_ATTEMPTS, AT_TIMEOUT_SHORT))
    }

    fn socket_waitack(&mut self, id: SocketId) -> Result<(), Error> {
        let result = self.waitack(id);
        self.dev.handle_urcs();
        result
    }

    fn socket_close(&mut self, id: SocketId) -> Result<(), Error> {
        self.dev.with_urcs(|dev| dev.close_socket(id))
    }

    fn socket_available(&mut self, id: SocketId) -> Result<usize, Error> {
        self.dev.with_urcs(|dev| dev.sockets.available(id))
    }

    fn socket_status(&mut self, id: SocketId) -> Result<SocketStatus, Error> {
        self.dev.with_urcs(|dev| dev.sockets.status(id))
    }

    fn spin(&mut self) -> Result<(), Error> {
        self.dev.handle_urcs();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ip_transport_layer::WRITE_PROMPT;
    use crate::error::GenericError;
    use crate::test_helpers::{MockAtClient, MockDelay, Recorder};

    type TestSara<'a> = Sara<'a, MockAtClient, MockDelay>;

    fn sara<'a>(at: MockAtClient) -> TestSara<'a> {
        let mut sara = Sara::new(at, MockDelay::default(), Config::new("internet"));
        sara.dev.bind();
        sara
    }

    /// Script for connecting `id` while the context is already up.
    fn connect_script(at: MockAtClient, id: u8) -> MockAtClient {
        at.expect("AT+UPSND=0,8", "+UPSND: 0,8,1").expect(
            &std::format!("AT+USOCO={},\"example.com\",443", id),
            "",
        )
    }

    #[test]
    fn attach_sequence() {
        let at = MockAtClient::new()
            .expect_err("AT", atat::Error::Timeout)
            .expect("AT", "")
            .expect("ATE0", "ATE0")
            .expect("ATE0", "")
            .expect("AT+CMEE=2", "")
            .expect("AT+IPR=115200", "");
        let mut modem = Sara::new(at, MockDelay::default(), Config::new("internet"));
        modem.attach().unwrap();
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn out_of_range_ids_issue_no_commands() {
        let mut modem = sara(MockAtClient::new());
        let id = SocketId(SOCKETS as u8);
        let mut buf = [0; 8];

        assert_eq!(modem.socket_connect(id, "example.com", 443), Err(Error::InvalidSocket));
        assert_eq!(modem.socket_send(id, b"data"), Err(Error::InvalidSocket));
        assert_eq!(modem.socket_recv(id, &mut buf), Err(Error::InvalidSocket));
        assert_eq!(modem.socket_waitack(id), Err(Error::InvalidSocket));
        assert_eq!(modem.socket_close(id), Err(Error::InvalidSocket));
        assert_eq!(modem.socket_available(id), Err(Error::InvalidSocket));
        assert_eq!(modem.socket_status(SocketId(200)), Err(Error::InvalidSocket));
        assert!(modem.dev.at.sent.is_empty());
    }

    #[test]
    fn disconnected_socket_is_rejected_locally() {
        let mut modem = sara(MockAtClient::new());
        let mut buf = [0; 8];
        assert_eq!(modem.socket_send(SocketId(1), b"data"), Err(Error::SocketNotConnected));
        assert_eq!(modem.socket_recv(SocketId(1), &mut buf), Err(Error::SocketNotConnected));
        assert_eq!(modem.socket_waitack(SocketId(1)), Err(Error::SocketNotConnected));
        assert_eq!(modem.socket_close(SocketId(1)), Ok(()));
        assert!(modem.dev.at.sent.is_empty());
    }

    #[test]
    fn remote_close_releases_socket() {
        let recorder = Recorder::default();
        let mut modem = sara(connect_script(MockAtClient::new(), 2));
        modem.set_callbacks(Some(&recorder));

        modem.socket_connect(SocketId(2), "example.com", 443).unwrap();
        assert_eq!(modem.socket_status(SocketId(2)), Ok(SocketStatus::Connected));

        modem.dev.at.push_urc("+UUSOCL: 2");
        assert_eq!(modem.socket_status(SocketId(2)), Ok(SocketStatus::Unknown));
        assert_eq!(
            recorder.statuses(),
            [
                (SocketId(2), SocketStatus::Connected),
                (SocketId(2), SocketStatus::Unknown)
            ]
        );
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn context_loss_closes_every_connected_socket() {
        let recorder = Recorder::default();
        let at = connect_script(connect_script(MockAtClient::new(), 0), 3)
            .expect("AT+USOCL=0", "")
            .expect("AT+USOCL=3", "");
        let mut modem = sara(at);
        modem.set_callbacks(Some(&recorder));

        modem.socket_connect(SocketId(0), "example.com", 443).unwrap();
        modem.socket_connect(SocketId(3), "example.com", 443).unwrap();

        modem.dev.at.push_urc("+UUPSDD: 0");
        modem.spin().unwrap();

        assert_eq!(modem.socket_status(SocketId(0)), Ok(SocketStatus::Unknown));
        assert_eq!(modem.socket_status(SocketId(3)), Ok(SocketStatus::Unknown));
        assert_eq!(recorder.deactivations(), [0]);
        let released: std::vec::Vec<_> = recorder
            .statuses()
            .into_iter()
            .filter(|(_, s)| *s == SocketStatus::Unknown)
            .collect();
        assert_eq!(
            released,
            [
                (SocketId(0), SocketStatus::Unknown),
                (SocketId(3), SocketStatus::Unknown)
            ]
        );
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn context_loss_during_command() {
        let at = connect_script(MockAtClient::new(), 1)
            .expect("AT+CSQ", "+CSQ: 17,99")
            .with_urc("+UUPSDD: 0")
            .expect("AT+USOCL=1", "");
        let mut modem = sara(at);
        modem.socket_connect(SocketId(1), "example.com", 443).unwrap();

        assert_eq!(modem.rssi(), Ok(17));
        assert_eq!(modem.dev.sockets.status(SocketId(1)), Ok(SocketStatus::Unknown));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn failed_connect_marks_error() {
        let recorder = Recorder::default();
        let at = MockAtClient::new()
            .expect("AT+UPSND=0,8", "+UPSND: 0,8,1")
            .expect_err("AT+USOCO=4,\"example.com\",443", atat::Error::Error);
        let mut modem = sara(at);
        modem.set_callbacks(Some(&recorder));

        assert_eq!(
            modem.socket_connect(SocketId(4), "example.com", 443),
            Err(Error::Atat(atat::Error::Error))
        );
        assert_eq!(modem.socket_status(SocketId(4)), Ok(SocketStatus::Error));
        assert_eq!(recorder.statuses(), [(SocketId(4), SocketStatus::Error)]);
        assert_eq!(modem.pdp_failures(), 1);

        // Closing an errored socket only resets it locally.
        assert_eq!(modem.socket_close(SocketId(4)), Ok(()));
        assert_eq!(modem.socket_status(SocketId(4)), Ok(SocketStatus::Unknown));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn connect_opens_context() {
        let at = MockAtClient::new()
            .expect("AT+UPSND=0,8", "+UPSND: 0,8,0")
            .expect("AT+UPSD=0,1,\"internet\"", "")
            .expect("AT+UPSD=0,7,\"0.0.0.0\"", "")
            .expect("AT+UPSDA=0,3", "")
            .expect("AT+UPSND=0,0", "+UPSND: 0,0,\"10.20.30.40\"")
            .expect("AT+USOCO=0,\"example.com\",80", "");
        let mut modem = sara(at);

        modem.socket_connect(SocketId(0), "example.com", 80).unwrap();
        assert_eq!(modem.local_ip(), Some("10.20.30.40"));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn context_credentials() {
        let at = MockAtClient::new()
            .expect("AT+UPSND=0,8", "+UPSND: 0,8,0")
            .expect("AT+UPSD=0,1,\"apn.corp\"", "")
            .expect("AT+UPSD=0,2,\"user\"", "")
            .expect("AT+UPSD=0,3,\"secret\"", "")
            .expect("AT+UPSD=0,7,\"0.0.0.0\"", "")
            .expect("AT+UPSDA=0,3", "")
            .expect("AT+UPSND=0,0", "+UPSND: 0,0,\"10.0.0.2\"");
        let config = Config::new("apn.corp").with_credentials("user", "secret");
        let mut modem = Sara::new(at, MockDelay::default(), config);

        modem.pdp_request().unwrap();
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn stuck_context_is_forced_down() {
        let mut at = MockAtClient::new();
        for _ in 0..3 {
            at = at.expect_err("AT+UPSND=0,8", atat::Error::Error);
        }
        let at = at
            .expect("AT+UPSDA=0,4", "")
            .expect("AT+UPSND=0,8", "+UPSND: 0,8,1");
        let mut modem = sara(at);

        for _ in 0..3 {
            assert_eq!(modem.pdp_request(), Err(Error::ContextActivation));
        }
        assert_eq!(modem.pdp_failures(), 3);
        assert_eq!(modem.pdp_threshold(), 3);

        modem.pdp_request().unwrap();
        assert_eq!(modem.pdp_threshold(), 9);

        modem.pdp_success();
        assert_eq!(modem.pdp_failures(), 0);
        assert_eq!(modem.pdp_threshold(), 3);
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn send_checks_echoed_length() {
        let at = connect_script(MockAtClient::new(), 0)
            .expect("AT+USOWR=0,5", "")
            .expect_raw(b"hello", "+USOWR: 0,5")
            .expect("AT+USOWR=0,5", "")
            .expect_raw(b"hello", "+USOWR: 0,3");
        let mut modem = sara(at);
        modem.socket_connect(SocketId(0), "example.com", 443).unwrap();

        assert_eq!(modem.socket_send(SocketId(0), b"hello"), Ok(5));
        assert_eq!(modem.socket_send(SocketId(0), b"hello"), Err(Error::BadLength));

        let write = &modem.dev.at.sent[2];
        assert_eq!(write.prompt, Some(WRITE_PROMPT));
        assert_eq!(modem.dev.delay.millis(), 100);
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn send_is_clamped_to_one_chunk() {
        let payload = [0x55; 1500];
        let at = connect_script(MockAtClient::new(), 0)
            .expect("AT+USOWR=0,1024", "")
            .expect_raw(&payload[..1024], "+USOWR: 0,1024");
        let mut modem = sara(at);
        modem.socket_connect(SocketId(0), "example.com", 443).unwrap();

        assert_eq!(modem.socket_send(SocketId(0), &payload), Ok(1024));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn recv_zero_length_issues_nothing() {
        let mut modem = sara(connect_script(MockAtClient::new(), 0));
        modem.socket_connect(SocketId(0), "example.com", 443).unwrap();
        let sent = modem.dev.at.sent.len();

        assert_eq!(modem.socket_recv(SocketId(0), &mut []), Ok(0));
        assert_eq!(modem.dev.at.sent.len(), sent);
    }

    fn read_reply(id: u8, data: &[u8]) -> std::vec::Vec<u8> {
        let mut reply = std::format!("+USORD: {},{}\n\"", id, data.len()).into_bytes();
        reply.extend_from_slice(data);
        reply.push(b'"');
        reply
    }

    #[test]
    fn recv_assembles_chunks() {
        let first = [0xA5; 480];
        let second = [0x0D; 120];
        let at = connect_script(MockAtClient::new(), 1)
            .expect("AT+USOCTL=1,11", "+USOCTL: 1,11,0")
            .with_urc("+UUSORD: 1,600")
            .expect_bytes("AT+USORD=1,480", &read_reply(1, &first))
            .expect_bytes("AT+USORD=1,120", &read_reply(1, &second));
        let mut modem = sara(at);
        modem.socket_connect(SocketId(1), "example.com", 443).unwrap();
        modem.socket_waitack(SocketId(1)).unwrap();
        assert_eq!(modem.socket_available(SocketId(1)), Ok(600));

        let mut buf = [0; 600];
        assert_eq!(modem.socket_recv(SocketId(1), &mut buf), Ok(600));
        assert_eq!(&buf[..480], &first[..]);
        assert_eq!(&buf[480..], &second[..]);
        assert_eq!(modem.socket_available(SocketId(1)), Ok(0));

        let read = &modem.dev.at.sent[3];
        assert!(read.scanner && read.filter);
        assert!(!modem.dev.at.has_byte_filter());
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn recv_stops_on_close_between_chunks() {
        let first = [0x42; 480];
        let at = connect_script(MockAtClient::new(), 1)
            .expect_bytes("AT+USORD=1,480", &read_reply(1, &first))
            .with_urc("+UUSOCL: 1");
        let mut modem = sara(at);
        modem.socket_connect(SocketId(1), "example.com", 443).unwrap();

        let mut buf = [0; 600];
        assert_eq!(modem.socket_recv(SocketId(1), &mut buf), Ok(480));
        assert_eq!(&buf[..480], &first[..]);
        assert_eq!(modem.socket_status(SocketId(1)), Ok(SocketStatus::Unknown));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn data_available_ignored_unless_connected() {
        let mut modem = sara(connect_script(MockAtClient::new(), 2));

        modem.dev.at.push_urc("+UUSORD: 3,10");
        assert_eq!(modem.socket_available(SocketId(3)), Ok(0));
        modem.dev.at.push_urc("+UUSORD: 9,10");
        modem.spin().unwrap();

        modem.socket_connect(SocketId(2), "example.com", 443).unwrap();
        modem.dev.at.push_urc("+UUSORD: 2,10");
        assert_eq!(modem.socket_available(SocketId(2)), Ok(10));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn context_loss_leaves_other_sockets_alone() {
        let at = MockAtClient::new()
            .expect("AT+UPSND=0,8", "+UPSND: 0,8,1")
            .expect_err("AT+USOCO=4,\"example.com\",443", atat::Error::Error);
        let at = connect_script(at, 1).expect("AT+USOCL=1", "");
        let mut modem = sara(at);

        modem.socket_connect(SocketId(4), "example.com", 443).ok();
        modem.socket_connect(SocketId(1), "example.com", 443).unwrap();

        modem.dev.at.push_urc("+UUPSDD: 0");
        modem.spin().unwrap();

        assert_eq!(modem.socket_status(SocketId(1)), Ok(SocketStatus::Unknown));
        assert_eq!(modem.socket_status(SocketId(4)), Ok(SocketStatus::Error));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn recv_stops_when_module_runs_dry() {
        let first = [b'x'; 480];
        let at = connect_script(MockAtClient::new(), 1)
            .expect_bytes("AT+USORD=1,480", &read_reply(1, &first))
            .expect("AT+USORD=1,120", "+USORD: 1,0\n\"\"");
        let mut modem = sara(at);
        modem.socket_connect(SocketId(1), "example.com", 443).unwrap();

        let mut buf = [0; 600];
        assert_eq!(modem.socket_recv(SocketId(1), &mut buf), Ok(480));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn recv_error_after_data_returns_partial_count() {
        let first = [b'x'; 480];
        let at = connect_script(MockAtClient::new(), 1)
            .expect_bytes("AT+USORD=1,480", &read_reply(1, &first))
            .expect_err("AT+USORD=1,20", atat::Error::Timeout);
        let mut modem = sara(at);
        modem.socket_connect(SocketId(1), "example.com", 443).unwrap();

        let mut buf = [0; 500];
        assert_eq!(modem.socket_recv(SocketId(1), &mut buf), Ok(480));

        let at = connect_script(MockAtClient::new(), 1)
            .expect_err("AT+USORD=1,10", atat::Error::Timeout);
        let mut modem = sara(at);
        modem.socket_connect(SocketId(1), "example.com", 443).unwrap();
        assert_eq!(
            modem.socket_recv(SocketId(1), &mut buf[..10]),
            Err(Error::Generic(GenericError::Timeout))
        );
    }

    #[test]
    fn waitack_polls_until_acknowledged() {
        let at = connect_script(MockAtClient::new(), 0)
            .expect("AT+USOCTL=0,11", "+USOCTL: 0,11,512")
            .expect("AT+USOCTL=0,11", "+USOCTL: 0,11,12")
            .expect("AT+USOCTL=0,11", "+USOCTL: 0,11,0");
        let mut modem = sara(at);
        modem.socket_connect(SocketId(0), "example.com", 443).unwrap();

        modem.socket_waitack(SocketId(0)).unwrap();
        assert_eq!(modem.dev.delay.millis(), 2000);
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn waitack_stops_on_remote_close() {
        let at = connect_script(MockAtClient::new(), 0)
            .expect("AT+USOCTL=0,11", "+USOCTL: 0,11,512")
            .with_urc("+UUSOCL: 0");
        let mut modem = sara(at);
        modem.socket_connect(SocketId(0), "example.com", 443).unwrap();

        assert_eq!(modem.socket_waitack(SocketId(0)), Err(Error::SocketNotConnected));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn create_reuses_missed_close() {
        let recorder = Recorder::default();
        let at = connect_script(MockAtClient::new(), 0)
            .expect("AT+USOCR=6", "+USOCR: 0")
            .expect("AT+USOCR=17", "+USOCR: 6")
            .expect("AT+USOCL=6", "");
        let mut modem = sara(at);
        modem.set_callbacks(Some(&recorder));
        modem.socket_connect(SocketId(0), "example.com", 443).unwrap();

        assert_eq!(modem.socket_create(SocketType::Tcp), Ok(SocketId(0)));
        assert_eq!(modem.socket_status(SocketId(0)), Ok(SocketStatus::Unknown));
        assert_eq!(modem.socket_create(SocketType::Udp), Err(Error::InvalidSocket));
        assert_eq!(
            recorder.statuses(),
            [
                (SocketId(0), SocketStatus::Connected),
                (SocketId(0), SocketStatus::Unknown)
            ]
        );
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn create_fails_when_every_slot_is_taken() {
        let mut at = MockAtClient::new();
        for id in 0..SOCKETS as u8 {
            at = connect_script(at, id);
        }
        let mut modem = sara(at);
        for id in 0..SOCKETS as u8 {
            modem.socket_connect(SocketId(id), "example.com", 443).unwrap();
        }
        assert_eq!(modem.socket_create(SocketType::Tcp), Err(Error::SocketSetFull));
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn operator_with_access_technology() {
        let at = MockAtClient::new()
            .expect("AT+COPS=3,2", "")
            .expect("AT+COPS?", "+COPS: 0,2,\"23806\",7");
        let mut modem = sara(at);
        let operator = modem.cops().unwrap();
        assert_eq!(operator.code, 23806);
        assert_eq!(operator.rat, Some(7));
    }

    #[test]
    fn sms_with_service_center() {
        let at = MockAtClient::new()
            .expect("AT+CMGF=1", "")
            .expect("AT+CSCA=\"+4540590000\"", "")
            .expect("AT+CSCA?", "+CSCA: \"\",129")
            .expect("AT+CSCA=\"+4540590000\"", "")
            .expect("AT+CSCA?", "+CSCA: \"+4540590000\",145")
            .expect("AT+CMGS=\"+4512345678\"", "")
            .expect_raw(b"hello\x1A", "+CMGS: 7");
        let config = Config::new("internet").with_sms_service_center("+4540590000");
        let mut modem = Sara::new(at, MockDelay::default(), config);

        modem.sms("+4512345678", "hello").unwrap();
        assert_eq!(modem.dev.delay.millis(), 1000);
        assert!(modem.dev.at.is_done());
    }

    #[test]
    fn sms_too_long() {
        let mut modem = sara(MockAtClient::new());
        let text = "x".repeat(MAX_MESSAGE_LEN + 1);
        assert_eq!(modem.sms("+4512345678", &text), Err(Error::Overflow));
        assert!(modem.dev.at.sent.is_empty());
    }

    #[test]
    fn unsupported_operations() {
        let mut modem = sara(MockAtClient::new());
        let ops: &mut dyn CellularOps = &mut modem;
        assert_eq!(ops.locate(), Err(Error::unsupported()));
        assert_eq!(ops.ftp_close(), Err(Error::unsupported()));
    }
}
