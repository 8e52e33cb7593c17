use crate::command::general::Identity;
use crate::command::location::Location;
use crate::command::network_service::types::{NetworkRegistrationStat, Operator};
use crate::error::Error;
use crate::socket::{SocketId, SocketStatus, SocketType};

/// Operations a modem family driver can provide.
///
/// Every operation has a default body failing with
/// [`GenericError::Unsupported`](crate::error::GenericError::Unsupported)
/// without talking to the modem, so a driver only implements what its
/// firmware offers. The trait is object safe; the family is picked when the
/// driver is constructed.
pub trait CellularOps {
    /// Set up the command interface: link probing, echo, error reporting and
    /// the URC classifier. Resets every socket slot.
    fn attach(&mut self) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Stop classifying URCs for this driver.
    fn detach(&mut self) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Activate the PDP context with the given access point name. Does nothing
    /// when the context is already active.
    fn pdp_open(&mut self, _apn: &str) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    fn pdp_close(&mut self) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Open the context with the configured APN, forcing it down first when
    /// too many network operations failed in a row.
    fn pdp_request(&mut self) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    fn imei(&mut self) -> Result<Identity, Error> {
        Err(Error::unsupported())
    }

    fn iccid(&mut self) -> Result<Identity, Error> {
        Err(Error::unsupported())
    }

    fn imsi(&mut self) -> Result<Identity, Error> {
        Err(Error::unsupported())
    }

    /// Circuit switched network registration.
    fn creg(&mut self) -> Result<NetworkRegistrationStat, Error> {
        Err(Error::unsupported())
    }

    /// RSSI index as reported by `+CSQ`.
    fn rssi(&mut self) -> Result<u8, Error> {
        Err(Error::unsupported())
    }

    fn cops(&mut self) -> Result<Operator, Error> {
        Err(Error::unsupported())
    }

    /// Check that the module answers.
    fn test(&mut self) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Answer incoming calls automatically.
    fn ats0(&mut self) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Send a text message.
    fn sms(&mut self, _number: &str, _text: &str) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Create a socket; the module picks its id.
    fn socket_create(&mut self, _ty: SocketType) -> Result<SocketId, Error> {
        Err(Error::unsupported())
    }

    fn socket_connect(&mut self, _id: SocketId, _host: &str, _port: u16) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Write up to one chunk of `buf`, returning how much was written.
    fn socket_send(&mut self, _id: SocketId, _buf: &[u8]) -> Result<usize, Error> {
        Err(Error::unsupported())
    }

    /// Read into `buf`, returning how much was read. Zero means nothing is
    /// waiting right now.
    fn socket_recv(&mut self, _id: SocketId, _buf: &mut [u8]) -> Result<usize, Error> {
        Err(Error::unsupported())
    }

    /// Block until the peer acknowledged everything sent on the socket.
    fn socket_waitack(&mut self, _id: SocketId) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    fn socket_close(&mut self, _id: SocketId) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Bytes the module last reported waiting on the socket.
    fn socket_available(&mut self, _id: SocketId) -> Result<usize, Error> {
        Err(Error::unsupported())
    }

    fn socket_status(&mut self, _id: SocketId) -> Result<SocketStatus, Error> {
        Err(Error::unsupported())
    }

    fn ftp_open(
        &mut self,
        _host: &str,
        _port: u16,
        _username: &str,
        _password: &str,
        _passive: bool,
    ) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Start fetching `_filename`; the content is read with
    /// [`CellularOps::ftp_getdata`].
    fn ftp_get(&mut self, _filename: &str) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Read the next piece of the file being fetched. `Ok(0)` marks the end of
    /// the file.
    fn ftp_getdata(&mut self, _buf: &mut [u8]) -> Result<usize, Error> {
        Err(Error::unsupported())
    }

    fn ftp_close(&mut self) -> Result<(), Error> {
        Err(Error::unsupported())
    }

    /// Ask the network for a position fix and wait for it.
    fn locate(&mut self) -> Result<Location, Error> {
        Err(Error::unsupported())
    }

    /// Apply URCs received while no command was running.
    fn spin(&mut self) -> Result<(), Error> {
        Err(Error::unsupported())
    }
}
