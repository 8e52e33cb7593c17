//! State and command plumbing shared by every modem family.

use atat::AtatCmd;
use embassy_time::Duration;
use embedded_hal::delay::DelayNs;
use serde::de::DeserializeOwned;

use crate::client::{AtClient, ByteFilter, LineScanner};
use crate::command::control::{SetEcho, SetReportMobileTerminationError};
use crate::command::general::{identity, GetCCID, GetIMEI, GetIMSI, Identity};
use crate::command::ip_transport_layer::CloseSocket;
use crate::command::location::LocationReport;
use crate::command::network_service::{
    types::{NetworkRegistrationStat, Operator},
    GetNetworkRegistrationStatus, GetOperatorSelection, GetSignalQuality,
    SetNumericOperatorFormat,
};
use crate::command::psn::IpAddress;
use crate::command::{At, MAX_COMMAND_LEN};
use crate::config::Config;
use crate::error::Error;
use crate::fmt::lossy;
use crate::modules::Family;
use crate::module_timing::poll_interval;
use crate::notifier::{Callbacks, Notifier};
use crate::pdp::PdpManager;
use crate::socket::{SocketId, SocketStatus, SocketTable};

/// Engine setup that has to be in place for one specific command.
#[derive(Clone, Copy, Default)]
pub(crate) struct Framing {
    pub scanner: Option<LineScanner>,
    pub filter: Option<ByteFilter>,
    pub prompt: Option<&'static [u8]>,
}

/// One physical modem: the engine it is reached through, the socket table and
/// PDP accounting, and the callbacks to report to. Every modem family driver
/// wraps one of these.
pub struct Device<'a, AT, D, const N: usize> {
    pub(crate) at: AT,
    pub(crate) delay: D,
    pub(crate) config: Config<'a>,
    pub(crate) pdp: PdpManager,
    pub(crate) sockets: SocketTable<N>,
    pub(crate) notifier: Notifier<'a>,
    pub(crate) location: Option<LocationReport>,
    pub(crate) local_ip: Option<IpAddress>,
    pub(crate) family: &'static Family,
    pub(crate) handling_urc: bool,
}

impl<'a, AT, D, const N: usize> Device<'a, AT, D, N>
where
    AT: AtClient,
    D: DelayNs,
{
    pub(crate) fn new(at: AT, delay: D, config: Config<'a>, family: &'static Family) -> Self {
        Self {
            at,
            delay,
            config,
            pdp: PdpManager::new(),
            sockets: SocketTable::new(),
            notifier: Notifier::new(),
            location: None,
            local_ip: None,
            family,
            handling_urc: false,
        }
    }

    pub(crate) fn set_callbacks(&mut self, callbacks: Option<&'a dyn Callbacks>) {
        self.notifier.register(callbacks);
    }

    pub(crate) fn send<C: AtatCmd>(&mut self, cmd: &C) -> Result<C::Response, Error> {
        let timeout = Duration::from_millis(u64::from(C::MAX_TIMEOUT_MS));
        self.send_framed(cmd, timeout, Framing::default())
    }

    pub(crate) fn send_with_timeout<C: AtatCmd>(
        &mut self,
        cmd: &C,
        timeout: Duration,
    ) -> Result<C::Response, Error> {
        self.send_framed(cmd, timeout, Framing::default())
    }

    /// Issue `cmd` and parse its response. URCs that arrived since the last
    /// command are applied first, so that the command runs against the latest
    /// socket state.
    pub(crate) fn send_framed<C: AtatCmd>(
        &mut self,
        cmd: &C,
        timeout: Duration,
        framing: Framing,
    ) -> Result<C::Response, Error> {
        self.handle_urcs();

        if C::MAX_LEN > MAX_COMMAND_LEN {
            return Err(Error::Overflow);
        }
        let mut buf = [0; MAX_COMMAND_LEN];
        let len = cmd.write(&mut buf);
        if len == 0 {
            return Err(Error::Overflow);
        }
        let line = &buf[..len];
        trace!("Sending command: {}", lossy(line).trim_end());

        if let Some(scanner) = framing.scanner {
            self.at.set_command_scanner(scanner);
        }
        if framing.filter.is_some() {
            self.at.set_byte_filter(framing.filter);
        }
        if let Some(prompt) = framing.prompt {
            self.at.expect_data_prompt(prompt);
        }

        let result = match self.at.send(line, timeout) {
            Ok(resp) => {
                trace!("Response: {}", lossy(resp));
                cmd.parse(Ok(resp)).map_err(Error::from)
            }
            Err(e) => Err(Error::from(e)),
        };

        if framing.filter.is_some() {
            self.at.set_byte_filter(None);
        }
        if let Err(ref e) = result {
            debug!("'{}' failed: {:?}", lossy(line).trim_end(), e);
        }
        result
    }

    /// Write raw payload after a data prompt and parse the final answer.
    pub(crate) fn send_raw<R: DeserializeOwned>(
        &mut self,
        data: &[u8],
        timeout: Duration,
    ) -> Result<R, Error> {
        trace!("Sending {} bytes of raw data", data.len());
        match self.at.send_raw(data, timeout) {
            Ok(resp) => atat::serde_at::from_slice(resp).map_err(|_| Error::Parse),
            Err(e) => Err(Error::from(e)),
        }
    }

    /// Send a command whose success tells whether the data connection works,
    /// and feed the outcome to the PDP accounting.
    pub(crate) fn send_pdp<C: AtatCmd>(&mut self, cmd: &C) -> Result<C::Response, Error> {
        let result = self.send(cmd);
        match result {
            Ok(_) => self.pdp.success(),
            Err(_) => self.pdp.failure(),
        }
        result
    }

    pub(crate) fn delay(&mut self, duration: Duration) {
        self.delay.delay_ms(duration.as_millis() as u32);
    }

    /// Install the URC classifier of the family and forget every socket.
    pub(crate) fn bind(&mut self) {
        self.at.set_urc_scanner(Some(self.family.scan_line));
        self.sockets.reset();
        self.location = None;
    }

    pub(crate) fn unbind(&mut self) {
        self.at.set_urc_scanner(None);
    }

    /// Send `AT` until the module answers at all.
    pub(crate) fn autobaud(&mut self) -> Result<(), Error> {
        for _ in 0..self.config.autobaud_attempts {
            match self.send(&At) {
                Err(Error::Generic(_)) => continue,
                _ => return Ok(()),
            }
        }
        warn!("{}: no answer to autobauding", self.family.name);
        Err(Error::timeout())
    }

    /// Turn off command echo. The first attempt may be echoed back and is not
    /// checked, the second has to succeed.
    pub(crate) fn disable_echo(&mut self) -> Result<(), Error> {
        self.send(&SetEcho { enabled: 0 }).ok();
        self.send(&SetEcho { enabled: 0 })?;
        Ok(())
    }

    pub(crate) fn verbose_errors(&mut self) -> Result<(), Error> {
        self.send(&SetReportMobileTerminationError { n: 2 })?;
        Ok(())
    }

    /// Issue `set` and read the setting back with `get` until `applied`
    /// accepts it, waiting between attempts. Some settings silently fail to
    /// apply while the module is busy.
    pub(crate) fn configure<S: AtatCmd, G: AtatCmd>(
        &mut self,
        set: &S,
        get: &G,
        applied: impl Fn(&G::Response) -> bool,
        attempts: usize,
    ) -> Result<(), Error> {
        for _ in 0..attempts {
            self.send(set).ok();

            match self.send(get) {
                Ok(held) if applied(&held) => return Ok(()),
                Err(e @ Error::Generic(_)) => return Err(e),
                _ => {}
            }
            self.delay(poll_interval());
        }
        warn!("Setting did not apply after {} attempts", attempts);
        Err(Error::Parse)
    }

    /// Bring the PDP context up through the family specific `open`, forcing it
    /// down first with `close` when the failure count says it may be stuck.
    pub(crate) fn request_pdp(
        &mut self,
        open: fn(&mut Self, &str) -> Result<(), Error>,
        close: fn(&mut Self) -> Result<(), Error>,
    ) -> Result<(), Error> {
        if self.pdp.should_reset() {
            warn!(
                "PDP: {} failures, forcing context down (next threshold {})",
                self.pdp.failures(),
                self.pdp.threshold()
            );
            if let Err(e) = close(self) {
                debug!("PDP: forced close failed: {:?}", e);
            }
        }

        let apn = self.config.apn.name();
        if let Err(e) = open(self, apn) {
            error!("PDP: open failed: {:?}", e);
            self.pdp.failure();
            return Err(Error::ContextActivation);
        }
        Ok(())
    }

    /// Mark a connected socket as gone and tell the application.
    pub(crate) fn release_socket(&mut self, id: SocketId) {
        if let Ok(true) = self.sockets.set_status(id, SocketStatus::Unknown) {
            self.notifier.socket_status(id, SocketStatus::Unknown);
        }
    }

    pub(crate) fn set_socket_status(
        &mut self,
        id: SocketId,
        status: SocketStatus,
    ) -> Result<(), Error> {
        if self.sockets.set_status(id, status)? {
            self.notifier.socket_status(id, status);
        }
        Ok(())
    }

    /// Close a socket. The slot is released before the module is told, so
    /// nothing observes it as connected once a close was requested. A later
    /// `+UUSOCL` for it is then a no-op.
    pub(crate) fn close_socket(&mut self, id: SocketId) -> Result<(), Error> {
        match self.sockets.status(id)? {
            SocketStatus::Connected => {
                let timeout = self.family.close_timeout;
                self.release_socket(id);
                self.send_with_timeout(&CloseSocket { socket: id }, timeout)?;
                Ok(())
            }
            SocketStatus::Error => {
                self.sockets.set_status(id, SocketStatus::Unknown)?;
                Ok(())
            }
            SocketStatus::Unknown => Ok(()),
        }
    }

    pub(crate) fn imei(&mut self) -> Result<Identity, Error> {
        identity(self.send(&GetIMEI)?.imei)
    }

    pub(crate) fn iccid(&mut self) -> Result<Identity, Error> {
        identity(self.send(&GetCCID)?.ccid)
    }

    pub(crate) fn imsi(&mut self) -> Result<Identity, Error> {
        identity(self.send(&GetIMSI)?.imsi)
    }

    pub(crate) fn creg(&mut self) -> Result<NetworkRegistrationStat, Error> {
        let creg = self.send(&GetNetworkRegistrationStatus)?;
        Ok(NetworkRegistrationStat::from(creg.stat))
    }

    pub(crate) fn rssi(&mut self) -> Result<u8, Error> {
        Ok(self.send(&GetSignalQuality)?.rssi)
    }

    pub(crate) fn cops(&mut self) -> Result<Operator, Error> {
        self.send(&SetNumericOperatorFormat)?;
        Operator::try_from(self.send(&GetOperatorSelection)?)
    }

    pub(crate) fn test(&mut self) -> Result<(), Error> {
        self.send(&At).map(drop)
    }
}
