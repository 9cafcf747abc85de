//! Push client
//!
//! Public handle over the single connection. The session task and the handle
//! share one [`Shared`] block; every send goes through its link.

use super::session::Session;
use super::{ConnectOptions, ConnectRequest, ConnectionState};
use crate::credentials::{CookieJar, CredentialStore};
use crate::error::{ClientError, ClientResult};
use crate::events::{EventBus, EventKind, Subscription};
use crate::frames::FrameBuilder;
use crate::transport::{OutboundMessage, OutboundSender, Transport};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::Instrument;
use uuid::Uuid;
use webcast_common::AppConfig;
use webcast_core::{CloseCode, Codec, DecodedContainer, ProtobufCodec, RoomParameters};

/// Default origin header
pub const DEFAULT_ORIGIN: &str = "https://www.tiktok.com";

/// Default fixed query string appended after the room parameters
pub const DEFAULT_FIXED_QUERY: &str =
    "&version_code=180800&webcast_sdk_version=1.3.0&update_version_code=1.3.0";

/// Static client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// Origin header sent with the handshake
    pub origin: String,
    /// Appended verbatim after the room query string
    pub fixed_query: String,
    /// Event bus capacity per subscriber
    pub event_buffer: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            fixed_query: DEFAULT_FIXED_QUERY.to_string(),
            event_buffer: crate::events::DEFAULT_EVENT_BUFFER,
        }
    }
}

impl From<&AppConfig> for ClientSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            origin: config.endpoint.origin.clone(),
            fixed_query: config.endpoint.fixed_query.clone(),
            event_buffer: config.session.event_buffer,
        }
    }
}

/// Connection handle and close bookkeeping
#[derive(Debug, Default)]
pub(crate) struct Link {
    pub(crate) state: ConnectionState,
    /// Set only while connected
    pub(crate) outbound: Option<OutboundSender>,
    /// Room id carried by heartbeats
    pub(crate) room_id: Option<String>,
    /// Pending `close()` calls, resolved once by the close event
    pub(crate) close_waiters: Vec<oneshot::Sender<()>>,
    /// The client handle was dropped before the handshake finished
    pub(crate) abandoned: bool,
}

/// State shared by the client handle and the session task
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) link: Mutex<Link>,
    pub(crate) bus: EventBus,
    pub(crate) frames: FrameBuilder,
}

impl Shared {
    fn new(codec: Arc<dyn Codec>, bus: EventBus) -> Self {
        Self {
            link: Mutex::new(Link::default()),
            bus,
            frames: FrameBuilder::new(codec),
        }
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.link.lock().state
    }

    /// Send an encoded frame; false when not connected
    pub(crate) fn send_bytes(&self, data: Vec<u8>) -> bool {
        let link = self.link.lock();
        if !link.state.can_send() {
            tracing::trace!(state = %link.state, bytes = data.len(), "Send skipped, not connected");
            return false;
        }

        link.outbound
            .as_ref()
            .is_some_and(|outbound| outbound.send(OutboundMessage::Binary(data)).is_ok())
    }

    pub(crate) fn send_heartbeat(&self) -> ClientResult<bool> {
        let Some(room_id) = self.link.lock().room_id.clone() else {
            return Ok(false);
        };

        let sent = self.send_bytes(self.frames.heartbeat(&room_id)?);
        tracing::trace!(room_id = %room_id, sent, "Heartbeat sent");
        Ok(sent)
    }

    pub(crate) fn send_ack(&self, container: &DecodedContainer) -> ClientResult<bool> {
        let Some(frame) = self.frames.ack(container)? else {
            return Ok(false);
        };

        let sent = self.send_bytes(frame);
        tracing::debug!(log_id = ?container.log_id(), sent, "Ack sent");
        Ok(sent)
    }

    pub(crate) fn switch_rooms(&self, room_id: &str) -> ClientResult<bool> {
        let sent = self.send_bytes(self.frames.enter_room(room_id)?);
        tracing::info!(room_id = %room_id, sent, "Room switch requested");
        Ok(sent)
    }
}

/// Persistent push-frame client
///
/// Holds at most one connection. Completion of `connect` and all inbound
/// traffic are reported on the event bus.
pub struct PushClient {
    shared: Arc<Shared>,
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialStore>,
    settings: ClientSettings,
}

impl PushClient {
    /// Start building a client
    #[must_use]
    pub fn builder() -> PushClientBuilder {
        PushClientBuilder::new()
    }

    /// Open a connection to `url` for the given room
    ///
    /// Returns once the transport has been asked to connect. The outcome arrives
    /// as a `Connected` or `Closed` event. Must be called inside a Tokio runtime.
    pub fn connect(
        &self,
        url: &str,
        params: &RoomParameters,
        headers: &BTreeMap<String, String>,
        options: ConnectOptions,
    ) -> ClientResult<()> {
        if options.heartbeat_interval.is_zero() {
            return Err(ClientError::InvalidRequest(
                "heartbeat interval must be positive".to_string(),
            ));
        }

        let request = ConnectRequest::build(
            url,
            params,
            &self.settings.fixed_query,
            self.credentials.cookie_header(),
            headers,
            &self.settings.origin,
        )?;

        {
            let mut link = self.shared.link.lock();
            if link.state.is_active() {
                return Err(ClientError::AlreadyActive(link.state));
            }
            link.state = ConnectionState::Connecting;
            link.room_id = Some(params.room_id.clone());
        }

        let session_id = Uuid::new_v4();
        tracing::info!(
            session_id = %session_id,
            room_id = %params.room_id,
            url = %url,
            heartbeat_ms = options.heartbeat_interval.as_millis() as u64,
            "Connecting"
        );

        let transport_link = self.transport.open(request);
        let session = Session::new(
            Arc::clone(&self.shared),
            transport_link,
            options.heartbeat_interval,
        );
        let span = tracing::info_span!(
            "push_session",
            session_id = %session_id,
            room_id = %params.room_id
        );
        tokio::spawn(session.run().instrument(span));

        Ok(())
    }

    /// Close the connection gracefully
    ///
    /// When connected, sends a normal-closure request and resolves after the
    /// close event has been published. Concurrent callers all wait for the
    /// same close. Resolves immediately when there is nothing to close.
    pub async fn close(&self) {
        let waiter = {
            let mut link = self.shared.link.lock();
            match link.state {
                ConnectionState::Connected => {
                    link.state = ConnectionState::Closing;
                    if let Some(outbound) = &link.outbound {
                        let _ = outbound.send(OutboundMessage::Close(CloseCode::Normal));
                    }
                    tracing::info!("Close requested");
                }
                ConnectionState::Closing => {}
                ConnectionState::Disconnected | ConnectionState::Connecting => return,
            }

            let (tx, rx) = oneshot::channel();
            link.close_waiters.push(tx);
            rx
        };

        // A dropped sender means the session task is gone; nothing left to wait for
        let _ = waiter.await;
    }

    /// Send raw frame bytes; false when not connected
    pub fn send_bytes(&self, data: Vec<u8>) -> bool {
        self.shared.send_bytes(data)
    }

    /// Send a heartbeat for the room given at connect time
    pub fn send_heartbeat(&self) -> ClientResult<bool> {
        self.shared.send_heartbeat()
    }

    /// Ack a decoded container; `Ok(false)` when it has no log id or nothing is connected
    pub fn send_ack(&self, container: &DecodedContainer) -> ClientResult<bool> {
        self.shared.send_ack(container)
    }

    /// Ask the service to move this connection to another room
    ///
    /// The heartbeat room id is not changed; the service answers with a
    /// `RoomEntered` event.
    pub fn switch_rooms(&self, room_id: &str) -> ClientResult<bool> {
        self.shared.switch_rooms(room_id)
    }

    /// Subscribe to the listed event kinds
    pub fn subscribe(&self, kinds: &[EventKind]) -> Subscription {
        self.shared.bus.subscribe(kinds)
    }

    /// Subscribe to every event
    pub fn subscribe_all(&self) -> Subscription {
        self.shared.bus.subscribe_all()
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }
}

/// Nothing may outlive the handle: an open connection is closed with
/// `GoingAway`, and a pending handshake is closed by the session once it lands.
impl Drop for PushClient {
    fn drop(&mut self) {
        let mut link = self.shared.link.lock();
        match link.state {
            ConnectionState::Connected => {
                tracing::debug!("Client dropped while connected, closing");
                link.state = ConnectionState::Closing;
                if let Some(outbound) = &link.outbound {
                    let _ = outbound.send(OutboundMessage::Close(CloseCode::GoingAway));
                }
            }
            ConnectionState::Connecting => {
                tracing::debug!("Client dropped while connecting, session will close on connect");
                link.abandoned = true;
            }
            ConnectionState::Closing | ConnectionState::Disconnected => {}
        }
    }
}

impl std::fmt::Debug for PushClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushClient")
            .field("state", &self.state())
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for [`PushClient`]
#[derive(Debug, Default)]
pub struct PushClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    codec: Option<Arc<dyn Codec>>,
    credentials: Option<Arc<dyn CredentialStore>>,
    settings: ClientSettings,
}

impl PushClientBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transport (required)
    #[must_use]
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set the codec (defaults to [`ProtobufCodec`])
    #[must_use]
    pub fn codec<C: Codec + 'static>(mut self, codec: C) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Set the credential store (defaults to an empty [`CookieJar`])
    #[must_use]
    pub fn credentials<S: CredentialStore + 'static>(mut self, credentials: S) -> Self {
        self.credentials = Some(Arc::new(credentials));
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the client
    pub fn build(self) -> ClientResult<PushClient> {
        let transport = self
            .transport
            .ok_or(ClientError::MissingComponent("transport"))?;
        let codec = self
            .codec
            .unwrap_or_else(|| Arc::new(ProtobufCodec::new()));
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(CookieJar::new()));
        let bus = EventBus::new(self.settings.event_buffer);

        Ok(PushClient {
            shared: Arc::new(Shared::new(codec, bus)),
            transport,
            credentials,
            settings: self.settings,
        })
    }
}
