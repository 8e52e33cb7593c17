//! Socket operations shared by every family speaking the `+USO*` command set.

use embassy_time::Duration;
use embedded_hal::delay::DelayNs;

use crate::client::AtClient;
use crate::command::bounded;
use crate::command::ip_transport_layer::{
    read_data_filter, read_data_scanner, responses::WriteSocketDataResponse, CloseSocket,
    ConnectSocket, CreateSocket, PrepareWriteSocketData, ReadSocketData, EGRESS_CHUNK_SIZE,
    INGRESS_CHUNK_SIZE, MAX_HOST_LEN, WRITE_PROMPT,
};
use crate::device::{Device, Framing};
use crate::error::Error;
use crate::socket::{SocketId, SocketStatus, SocketType};

impl<'a, AT, D, const N: usize> Device<'a, AT, D, N>
where
    AT: AtClient,
    D: DelayNs,
{
    /// Run one driver operation between two URC drains, so local checks see
    /// the latest state and notices that came in with the last response are
    /// applied before the caller gets control back.
    pub(crate) fn with_urcs<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.handle_urcs();
        let result = op(self);
        self.handle_urcs();
        result
    }

    pub(crate) fn create_socket(&mut self, ty: SocketType) -> Result<SocketId, Error> {
        if self.sockets.is_full() {
            return Err(Error::SocketSetFull);
        }

        let socket = self.send(&CreateSocket { protocol: ty })?.socket;
        match self.sockets.status(socket) {
            Err(e) => {
                warn!("[{}] Module handed out socket beyond {}", socket.0, N);
                if let Err(e) = self.send(&CloseSocket { socket }) {
                    debug!("[{}] Closing stray socket failed: {:?}", socket.0, e);
                }
                Err(e)
            }
            Ok(SocketStatus::Connected) => {
                warn!("[{}] Socket reused before its close was seen", socket.0);
                self.release_socket(socket);
                Ok(socket)
            }
            Ok(_) => {
                debug!("[{}] Created {:?} socket", socket.0, ty);
                Ok(socket)
            }
        }
    }

    pub(crate) fn connect_socket(
        &mut self,
        id: SocketId,
        host: &str,
        port: u16,
    ) -> Result<(), Error> {
        self.sockets.get(id)?;
        let host = bounded(host, MAX_HOST_LEN)?;

        let result = self.send(&ConnectSocket {
            socket: id,
            remote_host: host,
            remote_port: port,
        });
        match result {
            Ok(_) => {
                info!("[{}] Connected to {}:{}", id.0, host, port);
                self.set_socket_status(id, SocketStatus::Connected)?;
                self.sockets.set_available(id, 0)?;
                Ok(())
            }
            Err(e) => {
                self.set_socket_status(id, SocketStatus::Error)?;
                Err(e)
            }
        }
    }

    /// Write one chunk of `data`. `settle` is waited between the data prompt
    /// and the payload for modules that drop bytes sent right after `@`.
    pub(crate) fn write_socket(
        &mut self,
        id: SocketId,
        data: &[u8],
        settle: Option<Duration>,
        timeout: Duration,
    ) -> Result<usize, Error> {
        self.sockets.ensure_connected(id)?;

        let amount = data.len().min(EGRESS_CHUNK_SIZE);
        if amount == 0 {
            return Ok(0);
        }

        self.send_framed(
            &PrepareWriteSocketData {
                socket: id,
                length: amount,
            },
            timeout,
            Framing {
                prompt: Some(WRITE_PROMPT),
                ..Framing::default()
            },
        )?;

        if let Some(settle) = settle {
            self.delay(settle);
        }

        let written = self
            .send_raw::<WriteSocketDataResponse>(&data[..amount], timeout)?
            .length;
        if written != amount {
            warn!("[{}] Module took {} of {} bytes", id.0, written, amount);
            return Err(Error::BadLength);
        }
        trace!("[{}] Wrote {} bytes", id.0, amount);
        Ok(amount)
    }

    /// Read into `buf` with up to `attempts` chunked reads. Stops early when
    /// the module reports nothing waiting. Once some data has been copied, a
    /// failing read or a close reported between chunks ends the loop and the
    /// partial count is returned.
    pub(crate) fn read_socket(
        &mut self,
        id: SocketId,
        buf: &mut [u8],
        attempts: usize,
        timeout: Duration,
    ) -> Result<usize, Error> {
        let mut count = 0;
        for _ in 0..attempts {
            self.handle_urcs();
            if let Err(e) = self.sockets.ensure_connected(id) {
                if count == 0 {
                    return Err(e);
                }
                debug!("[{}] Closed after {} bytes were read", id.0, count);
                break;
            }
            if count == buf.len() {
                break;
            }
            let chunk = (buf.len() - count).min(INGRESS_CHUNK_SIZE);

            let result = self
                .send_framed(
                    &ReadSocketData {
                        socket: id,
                        length: chunk,
                    },
                    timeout,
                    Framing {
                        scanner: Some(read_data_scanner),
                        filter: Some(read_data_filter),
                        prompt: None,
                    },
                )
                .and_then(|resp| {
                    if resp.socket == id {
                        Ok(resp.data)
                    } else {
                        Err(Error::Parse)
                    }
                });

            let data = match result {
                Ok(data) => data,
                Err(e) if count > 0 => {
                    debug!("[{}] Read ended after {} bytes: {:?}", id.0, count, e);
                    break;
                }
                Err(e) => return Err(e),
            };
            if data.is_empty() {
                break;
            }

            buf[count..count + data.len()].copy_from_slice(&data);
            count += data.len();
            self.sockets.consume(id, data.len())?;
        }

        trace!("[{}] Read {} bytes", id.0, count);
        Ok(count)
    }
}
