//! WebSocket transport (remote side).
//!
//! Connects to a host's `/peer/{peer_id}` endpoint. Records travel as JSON
//! text frames.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::domain::{LinkEvent, PeerLink, Record, Transport, TransportError};

/// Transport dialing hosts over WebSocket
#[derive(Debug, Clone)]
pub struct WebSocketTransport {
    base_url: String,
}

impl WebSocketTransport {
    /// `base_url` is the host's WebSocket origin, e.g. `ws://10.0.0.5:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn endpoint_url(&self, peer_id: &str) -> String {
        format!("{}/peer/{}", self.base_url.trim_end_matches('/'), peer_id)
    }
}

#[async_trait]
impl Transport for WebSocketTransport {
    async fn connect(&self, peer_id: &str) -> Result<PeerLink, TransportError> {
        if !(self.base_url.starts_with("ws://") || self.base_url.starts_with("wss://")) {
            return Err(TransportError::InvalidAddress(self.base_url.clone()));
        }

        let url = self.endpoint_url(peer_id);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        tracing::debug!(url = %url, "Dialing host");
        tokio::spawn(run_link(url, event_tx, outbound_rx));

        Ok(PeerLink::new(outbound_tx, event_rx))
    }
}

/// Drive one WebSocket connection until either side closes.
async fn run_link(
    url: String,
    events: mpsc::UnboundedSender<LinkEvent>,
    mut outbound: mpsc::UnboundedReceiver<Record>,
) {
    let socket = tokio::select! {
        result = connect_async(url.as_str()) => match result {
            Ok((socket, _)) => socket,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "WebSocket connect failed");
                let _ = events.send(LinkEvent::Error(e.to_string()));
                return;
            }
        },
        _ = events.closed() => return,
    };

    if events.send(LinkEvent::Open).is_err() {
        return;
    }

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<Record>(text.as_str()) {
                        Ok(record) => {
                            if events.send(LinkEvent::Data(record)).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::debug!(error = %e, "Dropping non-JSON frame");
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    let _ = events.send(LinkEvent::Close);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    let _ = events.send(LinkEvent::Error(e.to_string()));
                    break;
                }
            },

            record = outbound.recv() => match record {
                Some(record) => {
                    if let Err(e) = sink.send(Message::Text(record.to_string().into())).await {
                        let _ = events.send(LinkEvent::Error(e.to_string()));
                        break;
                    }
                }
                None => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            },

            _ = events.closed() => {
                let _ = sink.close().await;
                break;
            }
        }
    }

    tracing::debug!(url = %url, "WebSocket link finished");
}
