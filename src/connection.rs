use bytes::BytesMut;
use tokio::{
    io::{self, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    sync::{mpsc, oneshot},
};
use tracing::debug;

use crate::{
    engine::{ClientId, EngineEvent},
    resp::RespValue,
};

/// Read buffer sizing for one connection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BufferLimits {
    /// Capacity the read buffer starts with.
    pub initial_capacity: usize,
    /// Once this many bytes are queued behind a pending request, the socket is
    /// left unread until that request has been answered.
    pub max_pending: usize,
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_pending: 64 * 1024,
        }
    }
}

/// Serves one client until it disconnects.
///
/// Requests are forwarded to the engine one at a time, in the order they were
/// decoded. While a reply is pending the socket is still read, up to
/// `limits.max_pending` bytes, so a hang-up during a blocking command is
/// noticed right away.
///
/// A client that closes its writing side still gets answers for every complete
/// request it sent. From then on each request is followed by a disconnect
/// notice, so anything that would block is dropped instead of parked.
pub async fn handle_connection<S>(
    stream: S,
    client: ClientId,
    engine: mpsc::Sender<EngineEvent>,
    limits: BufferLimits,
) where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (mut reader, mut writer) = io::split(stream);
    let mut buffer = BytesMut::with_capacity(limits.initial_capacity);
    let mut peer_closed = false;

    'connection: loop {
        loop {
            let input = match RespValue::decode(&mut buffer) {
                Ok(Some(input)) => input,
                Ok(None) => break,
                Err(error) => {
                    debug!(client, %error, "protocol error, discarding buffered input");
                    buffer.clear();

                    if write_reply(&mut writer, &error.as_resp()).await.is_err() {
                        break 'connection;
                    }

                    break;
                }
            };

            let (reply_tx, mut reply_rx) = oneshot::channel();

            let request = EngineEvent::Request {
                client,
                input,
                reply: reply_tx,
            };

            if engine.send(request).await.is_err() {
                debug!(client, "engine is gone, closing connection");
                break 'connection;
            }

            if peer_closed && !notify_disconnect(&engine, client).await {
                break 'connection;
            }

            let reply = loop {
                if peer_closed {
                    break (&mut reply_rx).await;
                }

                tokio::select! {
                    reply = &mut reply_rx => break reply,
                    read = reader.read_buf(&mut buffer), if buffer.len() < limits.max_pending => {
                        match read {
                            Ok(0) => debug!(client, "client stopped sending"),
                            Ok(_) => continue,
                            Err(error) => {
                                debug!(client, %error, "read failed while waiting for a reply");
                            }
                        }

                        peer_closed = true;

                        if !notify_disconnect(&engine, client).await {
                            break 'connection;
                        }
                    }
                }
            };

            // The engine drops the reply handle of a request it parked for a
            // client that is gone.
            let Ok(reply) = reply else {
                break 'connection;
            };

            if let Err(error) = write_reply(&mut writer, &reply).await {
                debug!(client, %error, "write failed");
                break 'connection;
            }
        }

        if peer_closed {
            break;
        }

        match reader.read_buf(&mut buffer).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                debug!(client, %error, "read failed");
                break;
            }
        }
    }

    notify_disconnect(&engine, client).await;
    debug!(client, "connection closed");
}

/// Returns false if the engine is gone.
async fn notify_disconnect(engine: &mpsc::Sender<EngineEvent>, client: ClientId) -> bool {
    engine
        .send(EngineEvent::Disconnected { client })
        .await
        .is_ok()
}

async fn write_reply<W>(writer: &mut W, reply: &RespValue) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(reply.encode().as_bytes()).await
}
