//! u-blox compatible modules with the extended (`#`) command set.
//!
//! The PDP context is defined with `+CGDCONT` and activated with `#SGACT`. It
//! has to be opened before sockets are connected. Besides sockets these
//! modules fetch files over FTP and can ask the network for a position fix.

use core::fmt::Write;

use atat::AtatUrc;
use embedded_hal::delay::DelayNs;

use super::Family;
use crate::client::{prefix_in_table, AtClient, LineKind};
use crate::command::control::{
    SetEcho, SetFlowControl, SetInterfaceStyle, SetReportMobileTerminationError,
};
use crate::command::ftp::{
    ftp_receive_scanner, FtpClose, FtpData, FtpGetPacket, FtpOpen, FtpReceive,
    GetFtpPacketStatus, FTP_CHUNK_SIZE, MAX_FIELD_LEN, MAX_SERVER_LEN,
};
use crate::command::general::{identity, GetExtendedCCID, Identity};
use crate::command::location::{
    parse_location_report, Location, LocationReport, RequestLocation, LOCATION_OK,
};
use crate::command::network_service::types::NetworkRegistrationStat;
use crate::command::psn::{
    urc::parse_context_deactivation, ActivateContext, DeactivateContext, GetContextActivation,
    SetPDPContextDefinition, CONTEXT_ID, MAX_APN_LEN, MAX_CREDENTIAL_LEN,
};
use crate::command::{bounded, At};
use crate::config::Config;
use crate::device::{Device, Framing};
use crate::error::Error;
use crate::module_timing::{poll_interval, TRANSFER_TIMEOUT};
use crate::notifier::Callbacks;
use crate::scan::Scanner;
use crate::socket::{SocketId, SocketStatus, SocketType};
use crate::traits::CellularOps;
use crate::urc_handler::Event;

/// Number of sockets the module multiplexes.
pub const SOCKETS: usize = 7;

const URC_PREFIXES: &[&str] = &["+UUSOCL: ", "+UUSORD: ", "SRING: ", "#AGPSRING: ", "+CGEV: "];

/// Polls of an FTP transfer that has no data yet, one per second.
const FTP_POLL_ATTEMPTS: usize = 60;

/// Seconds to wait for a position fix.
const LOCATE_ATTEMPTS: usize = 150;

/// Unsolicited result codes of u-blox compatible firmware.
#[derive(Debug, Clone, PartialEq)]
pub enum Urc {
    /// `+UUSOCL: <socket>`
    SocketClosed(SocketId),
    /// `+UUSORD: <socket>,<length>` or `SRING: <socket>,<length>`
    SocketDataAvailable(SocketId, usize),
    /// `#AGPSRING: <status>[,<lat>,<lon>,<alt>...]`
    LocationReport(LocationReport),
    /// `+CGEV: NW DEACT ...` and friends, with the affected context
    ContextDeactivated(u8),
}

impl AtatUrc for Urc {
    type Response = Self;

    fn parse(resp: &[u8]) -> Option<Self::Response> {
        let mut s = Scanner::new(resp);
        if s.optional("+UUSOCL: ") {
            return s.int().ok().map(|id| Urc::SocketClosed(SocketId(id)));
        }
        if s.optional("+UUSORD: ") || s.optional("SRING: ") {
            let socket = SocketId(s.int().ok()?);
            s.literal(",").ok()?;
            return Some(Urc::SocketDataAvailable(socket, s.int().ok()?));
        }
        if resp.starts_with(b"#AGPSRING: ") {
            return parse_location_report(resp).ok().map(Urc::LocationReport);
        }
        parse_context_deactivation(resp, CONTEXT_ID).map(Urc::ContextDeactivated)
    }
}

fn scan_line(line: &[u8]) -> LineKind {
    if prefix_in_table(line, URC_PREFIXES) {
        LineKind::Urc
    } else {
        LineKind::Unknown
    }
}

fn parse_urc(line: &[u8]) -> Option<Event> {
    Some(match Urc::parse(line)? {
        Urc::SocketClosed(id) => Event::SocketClosed(id),
        Urc::SocketDataAvailable(id, length) => Event::DataAvailable(id, length),
        Urc::LocationReport(report) => Event::LocationReport(report),
        Urc::ContextDeactivated(cid) => Event::ContextDeactivated(cid),
    })
}

pub static FAMILY: Family = Family {
    name: "u-blox",
    scan_line,
    parse_urc,
    close_timeout: TRANSFER_TIMEOUT,
};

type UbloxDevice<'a, AT, D> = Device<'a, AT, D, SOCKETS>;

pub struct Ublox<'a, AT, D> {
    pub(crate) dev: UbloxDevice<'a, AT, D>,
}

impl<'a, AT, D> Ublox<'a, AT, D>
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

    pub fn local_ip(&self) -> Option<&str> {
        self.dev.local_ip.as_deref()
    }

    pub fn pdp_failures(&self) -> u32 {
        self.dev.pdp.failures()
    }

    pub fn pdp_success(&mut self) {
        self.dev.pdp.success();
    }

    pub fn pdp_failure(&mut self) {
        self.dev.pdp.failure();
    }

    fn open_context(dev: &mut UbloxDevice<'a, AT, D>, apn: &str) -> Result<(), Error> {
        if dev.send(&GetContextActivation { cid: CONTEXT_ID })?.active {
            debug!("PDP: context {} already active", CONTEXT_ID);
            return Ok(());
        }

        dev.send(&SetPDPContextDefinition {
            cid: CONTEXT_ID,
            pdp_type: "IP",
            apn: bounded(apn, MAX_APN_LEN)?,
        })?;
        let credentials = match dev.config.apn.credentials() {
            Some((username, password)) => Some((
                bounded(username, MAX_CREDENTIAL_LEN)?,
                bounded(password, MAX_CREDENTIAL_LEN)?,
            )),
            None => None,
        };
        let activated = dev.send(&ActivateContext {
            cid: CONTEXT_ID,
            credentials,
        })?;
        info!("PDP: active, local address {}", activated.ip.as_str());
        dev.local_ip = Some(activated.ip);
        Ok(())
    }

    fn close_context(dev: &mut UbloxDevice<'a, AT, D>) -> Result<(), Error> {
        dev.local_ip = None;
        dev.send(&DeactivateContext)?;
        Ok(())
    }

    fn receive_file_data(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let length = buf.len().min(FTP_CHUNK_SIZE);
        if length == 0 {
            return Ok(0);
        }

        for _ in 0..FTP_POLL_ATTEMPTS {
            let result = self.dev.send_framed(
                &FtpReceive { length },
                TRANSFER_TIMEOUT,
                Framing {
                    scanner: Some(ftp_receive_scanner),
                    ..Framing::default()
                },
            );
            let data = match result {
                Ok(FtpData::Data(data)) => data,
                Ok(FtpData::NoHeader) | Err(Error::Parse | Error::Atat(_)) => {
                    // Either the whole file is in or the transfer broke.
                    return if self.dev.send(&GetFtpPacketStatus)?.eof {
                        debug!("FTP: end of file");
                        Ok(0)
                    } else {
                        Err(Error::Parse)
                    };
                }
                Err(e) => return Err(e),
            };

            if data.is_empty() {
                self.dev.delay(poll_interval());
                continue;
            }
            buf[..data.len()].copy_from_slice(&data);
            return Ok(data.len());
        }
        warn!("FTP: no data arrived");
        Err(Error::timeout())
    }

    fn wait_for_location(&mut self) -> Result<Location, Error> {
        self.dev.location = None;
        self.dev.send_pdp(&RequestLocation)?;

        for _ in 0..LOCATE_ATTEMPTS {
            self.dev.delay(poll_interval());
            self.dev.handle_urcs();
            if let Some(report) = self.dev.location.take() {
                return match report.location {
                    Some(location) if report.status == LOCATION_OK => Ok(location),
                    _ => {
                        warn!("Location request failed with {}", report.status);
                        Err(Error::Aborted(report.status))
                    }
                };
            }
        }
        Err(Error::timeout())
    }
}

impl<'a, AT, D> CellularOps for Ublox<'a, AT, D>
where
    AT: AtClient,
    D: DelayNs,
{
    fn attach(&mut self) -> Result<(), Error> {
        self.dev.bind();
        self.dev.with_urcs(|dev| {
            // `AT` and echo are answered unreliably while the module autobauds.
            dev.send(&At).ok();
            dev.send(&SetEcho { enabled: 0 }).ok();

            dev.send(&SetFlowControl { mode: 0 })?;
            dev.send(&SetInterfaceStyle { style: 2 })?;
            dev.send(&SetReportMobileTerminationError { n: 2 })?;
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
        self.dev
            .with_urcs(|dev| identity(dev.send(&GetExtendedCCID)?.ccid))
    }

    fn creg(&mut self) -> Result<NetworkRegistrationStat, Error> {
        self.dev.with_urcs(|dev| dev.creg())
    }

    fn rssi(&mut self) -> Result<u8, Error> {
        self.dev.with_urcs(|dev| dev.rssi())
    }

    fn socket_create(&mut self, ty: SocketType) -> Result<SocketId, Error> {
        self.dev.with_urcs(|dev| dev.create_socket(ty))
    }

    fn socket_connect(&mut self, id: SocketId, host: &str, port: u16) -> Result<(), Error> {
        self.dev.with_urcs(|dev| dev.connect_socket(id, host, port))
    }

    fn socket_send(&mut self, id: SocketId, buf: &[u8]) -> Result<usize, Error> {
        self.dev
            .with_urcs(|dev| dev.write_socket(id, buf, None, TRANSFER_TIMEOUT))
    }

    fn socket_recv(&mut self, id: SocketId, buf: &mut [u8]) -> Result<usize, Error> {
        self.dev
            .with_urcs(|dev| dev.read_socket(id, buf, 1, TRANSFER_TIMEOUT))
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

    fn ftp_open(
        &mut self,
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        passive: bool,
    ) -> Result<(), Error> {
        let mut server = heapless::String::<MAX_SERVER_LEN>::new();
        write!(server, "{}:{}", host, port).map_err(|_| Error::Overflow)?;
        let username = bounded(username, MAX_FIELD_LEN)?;
        let password = bounded(password, MAX_FIELD_LEN)?;

        self.dev.with_urcs(|dev| {
            dev.send_pdp(&FtpOpen {
                server: &server,
                username,
                password,
                mode: u8::from(passive),
            })?;
            Ok(())
        })
    }

    fn ftp_get(&mut self, filename: &str) -> Result<(), Error> {
        self.dev.with_urcs(|dev| {
            dev.send(&FtpGetPacket {
                filename: bounded(filename, MAX_FIELD_LEN)?,
                view_mode: 0,
            })?;
            Ok(())
        })
    }

    fn ftp_getdata(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.dev.handle_urcs();
        let result = self.receive_file_data(buf);
        self.dev.handle_urcs();
        result
    }

    fn ftp_close(&mut self) -> Result<(), Error> {
        self.dev.with_urcs(|dev| {
            dev.send(&FtpClose)?;
            Ok(())
        })
    }

    fn locate(&mut self) -> Result<Location, Error> {
        self.dev.handle_urcs();
        let result = self.wait_for_location();
        self.dev.handle_urcs();
        result
    }

    fn spin(&mut self) -> Result<(), Error> {
        self.dev.handle_urcs();
        Ok(())
    }
}
