use super::{SocketId, SocketStatus};
use crate::error::Error;

/// Bookkeeping for one modem socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Slot {
    pub status: SocketStatus,
    /// Bytes the modem last reported as waiting to be read. Only meaningful
    /// while connected.
    pub available: usize,
}

/// Fixed table of the `N` sockets a modem family supports, indexed by
/// [`SocketId`].
#[derive(Debug)]
pub struct SocketTable<const N: usize> {
    slots: [Slot; N],
}

impl<const N: usize> Default for SocketTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SocketTable<N> {
    pub const fn new() -> Self {
        Self {
            slots: [Slot {
                status: SocketStatus::Unknown,
                available: 0,
            }; N],
        }
    }

    /// Return every slot to `Unknown` with nothing available.
    pub fn reset(&mut self) {
        self.slots = [Slot::default(); N];
    }

    pub fn get(&self, id: SocketId) -> Result<&Slot, Error> {
        self.slots.get(id.0 as usize).ok_or(Error::InvalidSocket)
    }

    fn get_mut(&mut self, id: SocketId) -> Result<&mut Slot, Error> {
        self.slots.get_mut(id.0 as usize).ok_or(Error::InvalidSocket)
    }

    pub fn status(&self, id: SocketId) -> Result<SocketStatus, Error> {
        self.get(id).map(|s| s.status)
    }

    pub fn available(&self, id: SocketId) -> Result<usize, Error> {
        self.get(id).map(|s| s.available)
    }

    /// Fails with [`Error::InvalidSocket`] or [`Error::SocketNotConnected`].
    pub fn ensure_connected(&self, id: SocketId) -> Result<(), Error> {
        match self.status(id)? {
            SocketStatus::Connected => Ok(()),
            _ => Err(Error::SocketNotConnected),
        }
    }

    pub fn is_full(&self) -> bool {
        self.slots
            .iter()
            .all(|s| s.status == SocketStatus::Connected)
    }

    /// Move a slot to `status`, returning whether the status changed.
    /// Leaving `Connected` clears the available counter, entering it starts
    /// from zero.
    pub fn set_status(&mut self, id: SocketId, status: SocketStatus) -> Result<bool, Error> {
        let slot = self.get_mut(id)?;
        if slot.status == status {
            return Ok(false);
        }
        slot.status = status;
        slot.available = 0;
        Ok(true)
    }

    /// Record the amount of data the modem reported waiting on a socket.
    pub fn set_available(&mut self, id: SocketId, available: usize) -> Result<(), Error> {
        self.get_mut(id)?.available = available;
        Ok(())
    }

    /// Account for `read` bytes taken out of the modem buffer.
    pub fn consume(&mut self, id: SocketId, read: usize) -> Result<(), Error> {
        let slot = self.get_mut(id)?;
        slot.available = slot.available.saturating_sub(read);
        Ok(())
    }

    /// Ids of all connected slots.
    pub fn connected(&self) -> impl Iterator<Item = SocketId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.status == SocketStatus::Connected)
            .map(|(i, _)| SocketId(i as u8))
    }
}
