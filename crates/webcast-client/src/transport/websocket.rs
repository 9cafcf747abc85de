//! WebSocket transport
//!
//! Runs one `tokio-tungstenite` connection per `open` call on its own task.

use super::{
    CloseInfo, InboundMessage, OutboundMessage, Transport, TransportError, TransportEvent,
    TransportLink,
};
use crate::connection::ConnectRequest;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::ORIGIN;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue, Request};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode as WsCloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{self, Message};

/// Channel buffer size for inbound events
const EVENT_BUFFER_SIZE: usize = 100;

/// `tokio-tungstenite` backed transport
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketTransport;

impl WebSocketTransport {
    /// Create a new transport
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the handshake request: URL, every request header, and the origin
    pub fn client_request(request: &ConnectRequest) -> Result<Request<()>, TransportError> {
        let mut ws_request = request.url.as_str().into_client_request()?;
        let headers = ws_request.headers_mut();

        for (name, value) in &request.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidHeader(name.clone(), e.to_string()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::InvalidHeader(name.clone(), e.to_string()))?;
            headers.insert(header_name, header_value);
        }

        let origin = HeaderValue::from_str(&request.origin)
            .map_err(|e| TransportError::InvalidHeader(ORIGIN.to_string(), e.to_string()))?;
        headers.insert(ORIGIN, origin);

        Ok(ws_request)
    }
}

impl Transport for WebSocketTransport {
    fn open(&self, request: ConnectRequest) -> TransportLink {
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER_SIZE);

        tokio::spawn(run_socket(request, outbound_rx, events_tx));

        TransportLink {
            outbound: outbound_tx,
            events: events_rx,
        }
    }
}

/// Drive one connection and always finish with a `Closed` event
async fn run_socket(
    request: ConnectRequest,
    mut outbound: mpsc::UnboundedReceiver<OutboundMessage>,
    events: mpsc::Sender<TransportEvent>,
) {
    let close = match pump(request, &mut outbound, &events).await {
        Ok(close) => close,
        Err(e) => {
            tracing::warn!(error = %e, "WebSocket transport failed");
            CloseInfo::abnormal(e.to_string())
        }
    };

    tracing::debug!(close = %close, "WebSocket transport finished");
    let _ = events.send(TransportEvent::Closed(close)).await;
}

async fn pump(
    request: ConnectRequest,
    outbound: &mut mpsc::UnboundedReceiver<OutboundMessage>,
    events: &mpsc::Sender<TransportEvent>,
) -> Result<CloseInfo, TransportError> {
    let ws_request = WebSocketTransport::client_request(&request)?;
    let (stream, response) = connect_async(ws_request).await?;

    tracing::debug!(status = %response.status(), "WebSocket handshake has been successfully completed");

    if events.send(TransportEvent::Connected).await.is_err() {
        return Ok(CloseInfo::normal());
    }

    let (mut sink, mut stream) = stream.split();
    let mut peer_close: Option<CloseInfo> = None;
    let mut outbound_open = true;

    let outcome: Result<(), tungstenite::Error> = loop {
        tokio::select! {
            message = outbound.recv(), if outbound_open => {
                let sent = match message {
                    Some(OutboundMessage::Binary(data)) => {
                        tracing::trace!(bytes = data.len(), "Sending binary frame");
                        sink.send(Message::Binary(data)).await
                    }
                    Some(OutboundMessage::Close(code)) => {
                        tracing::debug!(close_code = code.as_u16(), "Sending close frame");
                        sink.send(Message::Close(Some(CloseFrame {
                            code: WsCloseCode::from(code.as_u16()),
                            reason: "".into(),
                        })))
                        .await
                    }
                    None => {
                        // Owner dropped the link; finish the close handshake
                        outbound_open = false;
                        sink.send(Message::Close(None)).await
                    }
                };
                if let Err(e) = sent {
                    break Err(e);
                }
            }
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Binary(data))) => {
                    if events.send(TransportEvent::Message(InboundMessage::Binary(data))).await.is_err() {
                        break Ok(());
                    }
                }
                Some(Ok(Message::Text(text))) => {
                    if events.send(TransportEvent::Message(InboundMessage::Text(text))).await.is_err() {
                        break Ok(());
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::debug!(frame = ?frame, "Peer sent close frame");
                    peer_close = Some(frame.map_or_else(
                        || CloseInfo::new(Some(WsCloseCode::Status.into()), ""),
                        |f| CloseInfo::new(Some(f.code.into()), f.reason.into_owned()),
                    ));
                }
                Some(Ok(_)) => {
                    // Ping/pong are answered by tungstenite
                    tracing::trace!("Control frame received");
                }
                Some(Err(e)) => break Err(e),
                None => break Ok(()),
            }
        }
    };

    match (peer_close, outcome) {
        (Some(close), _) => Ok(close),
        (None, Ok(())) => Ok(CloseInfo::abnormal("connection dropped")),
        (None, Err(e)) => Err(e.into()),
    }
}
