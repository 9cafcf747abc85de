//! Session task
//!
//! One task per connection. It owns the heartbeat schedule and consumes
//! transport events in arrival order, so handlers never run concurrently.

use super::client::Shared;
use super::ConnectionState;
use crate::events::ClientEvent;
use crate::handlers::FrameDispatcher;
use crate::heartbeat::HeartbeatScheduler;
use crate::transport::{
    CloseInfo, InboundMessage, OutboundMessage, OutboundSender, TransportEvent, TransportLink,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use webcast_core::CloseCode;

pub(super) struct Session {
    shared: Arc<Shared>,
    /// Outbound handle, handed to the link on connect
    pending_outbound: Option<OutboundSender>,
    events: mpsc::Receiver<TransportEvent>,
    heartbeat: HeartbeatScheduler,
    interval: Duration,
    dispatcher: FrameDispatcher,
}

impl Session {
    pub(super) fn new(shared: Arc<Shared>, link: TransportLink, interval: Duration) -> Self {
        let dispatcher = FrameDispatcher::new(Arc::clone(shared.frames.codec()), shared.bus.clone());

        Self {
            shared,
            pending_outbound: Some(link.outbound),
            events: link.events,
            heartbeat: HeartbeatScheduler::new(),
            interval,
            dispatcher,
        }
    }

    pub(super) async fn run(mut self) {
        loop {
            // Heartbeat first, an inbound backlog must not delay it
            tokio::select! {
                biased;

                () = self.heartbeat.tick() => self.beat(),
                event = self.events.recv() => match event {
                    Some(TransportEvent::Connected) => self.on_connect(),
                    Some(TransportEvent::Message(message)) => self.on_message(message),
                    Some(TransportEvent::Closed(close)) => {
                        self.on_close(close);
                        break;
                    }
                    None => {
                        self.on_close(CloseInfo::abnormal("transport dropped"));
                        break;
                    }
                },
            }
        }

        tracing::debug!("Session task finished");
    }

    fn on_connect(&mut self) {
        let Some(outbound) = self.pending_outbound.take() else {
            tracing::warn!("Duplicate connect event ignored");
            return;
        };

        {
            let mut link = self.shared.link.lock();
            if link.abandoned {
                // No owner left; close instead of starting heartbeats
                tracing::info!("Connected after the client was dropped, closing");
                let _ = outbound.send(OutboundMessage::Close(CloseCode::GoingAway));
                link.outbound = Some(outbound);
                link.state = ConnectionState::Closing;
                return;
            }
            link.outbound = Some(outbound);
            link.state = ConnectionState::Connected;
        }
        tracing::info!("Connected");

        // First heartbeat goes out right away, the schedule covers the rest
        self.beat();
        self.heartbeat.start(self.interval);

        self.shared.bus.emit(ClientEvent::Connected);
    }

    fn on_message(&self, message: InboundMessage) {
        let shared = &self.shared;
        self.dispatcher
            .dispatch(message, |container| shared.send_ack(container));
    }

    fn on_close(&mut self, close: CloseInfo) {
        self.heartbeat.cancel();

        let waiters = {
            let mut link = self.shared.link.lock();
            link.state = ConnectionState::Disconnected;
            link.outbound = None;
            link.room_id = None;
            link.abandoned = false;
            std::mem::take(&mut link.close_waiters)
        };

        tracing::info!(close_code = ?close.code, reason = %close.reason, "Connection closed");
        self.shared.bus.emit(ClientEvent::Closed(close));

        for waiter in waiters {
            let _ = waiter.send(());
        }
    }

    fn beat(&self) {
        if let Err(e) = self.shared.send_heartbeat() {
            tracing::warn!(error = %e, "Failed to build heartbeat");
        }
    }
}
