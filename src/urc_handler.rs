//! Applying unsolicited result codes to the device state.

use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::client::AtClient;
use crate::command::location::LocationReport;
use crate::device::Device;
use crate::fmt::lossy;
use crate::socket::{SocketId, SocketStatus};

/// Family independent meaning of a URC.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The peer or the module closed the socket
    SocketClosed(SocketId),
    /// The module holds this many bytes for the socket
    DataAvailable(SocketId, usize),
    /// The network dropped the PDP context or profile
    ContextDeactivated(u8),
    /// A background context (de)activation ended with this result
    ContextActionResult(u8),
    LocationReport(LocationReport),
}

impl<'a, AT, D, const N: usize> Device<'a, AT, D, N>
where
    AT: AtClient,
    D: DelayNs,
{
    /// Drain the URC lines the engine collected and apply them in order.
    ///
    /// Handling a context deactivation closes sockets, which issues commands.
    /// Those commands do not drain URCs themselves; whatever they produce is
    /// picked up by this loop.
    pub(crate) fn handle_urcs(&mut self) {
        if self.handling_urc {
            return;
        }
        self.handling_urc = true;
        while let Some(line) = self.at.next_urc() {
            match (self.family.parse_urc)(&line) {
                Some(event) => self.handle_event(event),
                None => debug!("Unhandled URC: {}", lossy(&line)),
            }
        }
        self.handling_urc = false;
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::SocketClosed(id) => {
                if self.sockets.get(id).is_err() {
                    warn!("[{}] Closed socket out of range", id.0);
                    return;
                }
                info!("[{}] Socket closed by remote", id.0);
                self.release_socket(id);
            }
            Event::DataAvailable(id, len) => match self.sockets.status(id) {
                Ok(SocketStatus::Connected) => {
                    trace!("[{}] {} bytes available", id.0, len);
                    self.sockets.set_available(id, len).ok();
                }
                Ok(status) => debug!("[{}] Data available while {:?}", id.0, status),
                Err(_) => warn!("[{}] Data available on socket out of range", id.0),
            },
            Event::ContextDeactivated(context) => {
                warn!("PDP context {} deactivated", context);
                self.notifier.pdp_deactivated(context);

                let connected: Vec<SocketId, N> = self.sockets.connected().collect();
                for id in connected {
                    if let Err(e) = self.close_socket(id) {
                        debug!("[{}] Close after context loss failed: {:?}", id.0, e);
                    }
                }
            }
            Event::ContextActionResult(result) => {
                debug!("Packet switched action result: {}", result);
            }
            Event::LocationReport(report) => {
                info!("Location report, status {}", report.status);
                self.location = Some(report);
            }
        }
    }
}
