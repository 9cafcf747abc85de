//! Webcast push client entry point
//!
//! Run with:
//! ```bash
//! WEBCAST_ROOM_ID=123 cargo run -p webcast-client
//! ```
//!
//! Configuration is loaded from environment variables.

use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};
use webcast_client::{
    ClientEvent, ClientSettings, ConnectOptions, CookieJar, PushClient, WebSocketTransport,
};
use webcast_common::{try_init_tracing_with_config, AppConfig, AppError, AppResult, TracingConfig};
use webcast_core::{CloseCode, RoomParameters};

#[tokio::main]
async fn main() {
    // Configuration picks the tracing preset, so it loads first
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(AppError::from(e).exit_code());
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, code = e.error_code(), "Push client stopped with an error");
        std::process::exit(e.exit_code());
    }
}

async fn run(config: AppConfig) -> AppResult<()> {
    info!(
        name = %config.app.name,
        env = ?config.app.env,
        room_id = %config.room.room_id,
        "Starting push client"
    );

    let credentials = config
        .session
        .cookie
        .as_deref()
        .map(CookieJar::parse)
        .unwrap_or_default();

    let client = PushClient::builder()
        .transport(WebSocketTransport::new())
        .credentials(credentials)
        .settings(ClientSettings::from(&config))
        .build()
        .map_err(AppError::internal)?;

    let params = RoomParameters::new(config.room.room_id.clone())
        .with_params(config.room.client_params.clone());

    let mut events = client.subscribe_all();
    client
        .connect(
            &config.endpoint.ws_url,
            &params,
            &BTreeMap::new(),
            ConnectOptions::from(&config),
        )
        .map_err(|e| AppError::InvalidInput(e.to_string()))?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut connected = false;

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for shutdown signal");
                }
                info!("Shutdown requested, closing connection");
                client.close().await;
                break;
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    ClientEvent::Connected => connected = true,
                    ClientEvent::Closed(close) => {
                        if !connected {
                            return Err(AppError::connection(close));
                        }
                        let reconnect_advised =
                            close.close_code().is_some_and(CloseCode::should_reconnect);
                        info!(close = %close, reconnect_advised, "Connection closed by peer");
                        break;
                    }
                    other => log_event(&other),
                }
            }
        }
    }

    info!("Push client stopped");
    Ok(())
}

fn log_event(event: &ClientEvent) {
    match event {
        ClientEvent::FetchResult(result) => {
            info!(
                messages = result.messages.len(),
                cursor = %result.cursor,
                needs_ack = result.needs_ack,
                "Fetch result received"
            );
            for message in &result.messages {
                debug!(method = %message.method, msg_id = message.msg_id, bytes = message.payload.len(), "Message");
            }
        }
        ClientEvent::RoomEntered(container) => {
            info!(log_id = ?container.log_id(), "Entered room");
        }
        ClientEvent::DecodingFailed(e) => warn!(error = %e, "Frame could not be decoded"),
        ClientEvent::UnknownResponse(message) => {
            debug!(bytes = message.len(), "Non-binary message received");
        }
        ClientEvent::RawData(_) | ClientEvent::Connected | ClientEvent::Closed(_) => {}
    }
}
