use crate::socket::{SocketId, SocketStatus};

/// Application hooks for asynchronous state changes. Both methods default to
/// doing nothing, so implementors only override what they care about.
pub trait Callbacks {
    /// A socket changed status, either as the result of a driver call or
    /// because the modem reported it.
    fn socket_status(&self, _socket: SocketId, _status: SocketStatus) {}

    /// The network or the modem deactivated the PDP context `_context`.
    fn pdp_deactivated(&self, _context: u8) {}
}

/// Relays events to the registered [`Callbacks`], if any.
#[derive(Clone, Copy, Default)]
pub struct Notifier<'a> {
    callbacks: Option<&'a dyn Callbacks>,
}

impl<'a> Notifier<'a> {
    pub const fn new() -> Self {
        Self { callbacks: None }
    }

    pub fn register(&mut self, callbacks: Option<&'a dyn Callbacks>) {
        self.callbacks = callbacks;
    }

    pub fn socket_status(&self, socket: SocketId, status: SocketStatus) {
        debug!("[{}] Socket status: {:?}", socket.0, status);
        if let Some(cb) = self.callbacks {
            cb.socket_status(socket, status);
        }
    }

    pub fn pdp_deactivated(&self, context: u8) {
        if let Some(cb) = self.callbacks {
            cb.pdp_deactivated(context);
        }
    }
}
