use crate::channel::{ChannelConfig, ChannelEvent, SignalSink};
use crate::error::ChannelError;
use futures::{SinkExt, StreamExt};
use meshcall_core::{ClientMessage, ServerMessage};
use std::sync::{Arc, RwLock};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, error, info, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

enum SessionEnd {
    Dropped,
    Shutdown,
}

struct RelayClientInner {
    /// Outbox of the currently open socket, if any.
    outbox: RwLock<Option<mpsc::UnboundedSender<String>>>,
    shutdown: watch::Sender<bool>,
}

/// Reconnecting WebSocket connection to the relay.
///
/// Events are reported on the receiver returned by [`RelayClient::spawn`].
/// Anything sent while the socket is down fails with
/// [`ChannelError::Disconnected`]; nothing is replayed after a reconnect.
#[derive(Clone)]
pub struct RelayClient {
    inner: Arc<RelayClientInner>,
}

impl RelayClient {
    pub fn spawn(config: ChannelConfig) -> (Self, mpsc::UnboundedReceiver<ChannelEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = watch::channel(false);

        let client = Self {
            inner: Arc::new(RelayClientInner {
                outbox: RwLock::new(None),
                shutdown,
            }),
        };

        tokio::spawn(connection_loop(
            config,
            client.inner.clone(),
            events_tx,
            shutdown_rx,
        ));

        (client, events_rx)
    }

    pub fn is_connected(&self) -> bool {
        self.read_outbox().is_some()
    }

    /// Closes the socket and stops reconnecting.
    pub fn close(&self) {
        let _ = self.inner.shutdown.send(true);
    }

    fn read_outbox(&self) -> Option<mpsc::UnboundedSender<String>> {
        self.inner
            .outbox
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SignalSink for RelayClient {
    fn send(&self, message: ClientMessage) -> Result<(), ChannelError> {
        if *self.inner.shutdown.borrow() {
            return Err(ChannelError::Closed);
        }

        let outbox = self.read_outbox().ok_or(ChannelError::Disconnected)?;
        let json = serde_json::to_string(&message)?;
        outbox.send(json).map_err(|_| ChannelError::Disconnected)
    }
}

impl RelayClientInner {
    fn set_outbox(&self, outbox: Option<mpsc::UnboundedSender<String>>) {
        *self
            .outbox
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = outbox;
    }
}

async fn connection_loop(
    config: ChannelConfig,
    inner: Arc<RelayClientInner>,
    events: mpsc::UnboundedSender<ChannelEvent>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut failures = 0u32;

    loop {
        if *shutdown.borrow() {
            return;
        }

        match connect_async(config.url.as_str()).await {
            Ok((socket, _)) => {
                info!("Connected to relay at {}", config.url);
                failures = 0;

                let (tx, rx) = mpsc::unbounded_channel();
                inner.set_outbox(Some(tx));
                if events.send(ChannelEvent::Connected).is_err() {
                    return;
                }

                let end = run_session(socket, rx, &events, &mut shutdown).await;
                inner.set_outbox(None);

                if let SessionEnd::Shutdown = end {
                    info!("Relay connection closed by client");
                    return;
                }

                warn!("Lost connection to relay");
                if events.send(ChannelEvent::Disconnected).is_err() {
                    return;
                }
            }
            Err(e) => warn!("Failed to connect to {}: {}", config.url, e),
        }

        failures += 1;
        if failures > config.reconnect_attempts {
            error!("Giving up on relay after {} attempts", config.reconnect_attempts);
            let _ = events.send(ChannelEvent::GaveUp);
            return;
        }

        let delay = config.backoff(failures);
        debug!("Reconnect attempt {} in {:?}", failures, delay);
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => return,
        }
    }
}

async fn run_session(
    socket: Socket,
    mut outbox: mpsc::UnboundedReceiver<String>,
    events: &mpsc::UnboundedSender<ChannelEvent>,
    shutdown: &mut watch::Receiver<bool>,
) -> SessionEnd {
    let (mut write, mut read) = socket.split();

    loop {
        tokio::select! {
            outgoing = outbox.recv() => {
                let Some(text) = outgoing else {
                    return SessionEnd::Dropped;
                };
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    warn!("Failed to send to relay: {}", e);
                    return SessionEnd::Dropped;
                }
            }

            incoming = read.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(message) => {
                            if events.send(ChannelEvent::Message(message)).is_err() {
                                return SessionEnd::Shutdown;
                            }
                        }
                        Err(e) => warn!("Invalid ServerMessage from relay: {}", e),
                    }
                }
                Some(Ok(Message::Close(_))) | None => return SessionEnd::Dropped,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Relay socket error: {}", e);
                    return SessionEnd::Dropped;
                }
            },

            _ = shutdown.changed() => {
                let _ = write.send(Message::Close(None)).await;
                return SessionEnd::Shutdown;
            }
        }
    }
}
