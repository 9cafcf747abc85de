//! Push client integration tests
//!
//! Most tests drive the client through the in-memory transport. The loopback
//! tests at the end run a real WebSocket handshake against `TestServer`.
//!
//! Run with: cargo test -p integration-tests --test client_tests

use integration_tests::{fixtures::*, helpers::*};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tokio_tungstenite::tungstenite::Message;
use webcast_client::{
    ClientError, ClientEvent, CloseInfo, ConnectOptions, ConnectionState, CookieJar, EventKind,
    OutboundMessage, PushClient, WebSocketTransport, DEFAULT_ORIGIN,
};
use webcast_core::{
    Codec, CodecResult, CloseCode, DecodedContainer, OutboundPayload, PayloadType,
    ProtobufCodec, PushFrame, RoomParameters,
};

// ============================================================================
// Connect
// ============================================================================

#[tokio::test]
async fn test_connect_sends_heartbeat_first() {
    let (client, transport, mut peers) = mock_client();
    let mut peer = connect_room(&client, &mut peers, "123", ConnectOptions::default())
        .await
        .expect("connect");

    assert!(client.is_connected());

    // A reaction to the connect event still lands after the heartbeat
    assert!(client.switch_rooms("456").unwrap());

    let first = peer.next_frame().await.unwrap();
    assert_eq!(decode_heartbeat(&first).unwrap().room_id, "123");
    assert!(first.log_id.is_none());
    assert_eq!(first.payload_encoding, PushFrame::PROTOBUF_ENCODING);

    let second = peer.next_frame().await.unwrap();
    assert_eq!(second.kind(), PayloadType::EnterRoom);

    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_connect_request_url_and_headers() {
    let (client, transport, mut peers) = mock_client();
    let params = RoomParameters::new("7").with_param("aid", "1988");
    let mut headers = BTreeMap::new();
    headers.insert("User-Agent".to_string(), "integration".to_string());

    client
        .connect(MOCK_URL, &params, &headers, ConnectOptions::default())
        .unwrap();
    let peer = peers.next().await.unwrap();

    assert_eq!(client.state(), ConnectionState::Connecting);
    assert_eq!(
        peer.request.url,
        format!(
            "{MOCK_URL}?room_id=7&aid=1988&version_code=180800&webcast_sdk_version=1.3.0&update_version_code=1.3.0"
        )
    );
    assert_eq!(peer.request.header("cookie"), Some("sessionid=test-session"));
    assert_eq!(peer.request.header("user-agent"), Some("integration"));
    assert_eq!(peer.request.origin, DEFAULT_ORIGIN);
    assert_eq!(transport.requests()[0], peer.request);
}

#[tokio::test]
async fn test_connect_while_active_is_rejected() {
    let (client, _transport, mut peers) = mock_client();
    let _peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();

    let err = client
        .connect(
            MOCK_URL,
            &RoomParameters::new("2"),
            &BTreeMap::new(),
            ConnectOptions::default(),
        )
        .unwrap_err();

    assert!(matches!(err, ClientError::AlreadyActive(ConnectionState::Connected)));
}

#[tokio::test]
async fn test_failed_handshake_returns_to_disconnected() {
    let (client, _transport, mut peers) = mock_client();
    let mut events = client.subscribe(&[EventKind::Closed, EventKind::Connected]);

    client
        .connect(
            MOCK_URL,
            &RoomParameters::new("1"),
            &BTreeMap::new(),
            ConnectOptions::default(),
        )
        .unwrap();
    let mut peer = peers.next().await.unwrap();
    peer.close(CloseInfo::abnormal("handshake refused")).await.unwrap();

    match next_event(&mut events).await.unwrap() {
        ClientEvent::Closed(close) => {
            assert!(close.code.is_none());
            assert_eq!(close.reason, "handshake refused");
        }
        other => panic!("expected close event, got {other:?}"),
    }
    assert_eq!(client.state(), ConnectionState::Disconnected);
    // Nothing was ever sent
    assert!(peer.next_outbound().await.is_err());
}

#[tokio::test]
async fn test_reconnect_after_close() {
    let (client, _transport, mut peers) = mock_client();
    let peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();

    let mut closed = client.subscribe(&[EventKind::Closed]);
    peer.close(CloseInfo::new(Some(1001), "going away")).await.unwrap();
    next_event(&mut closed).await.unwrap();

    let mut peer = connect_room(&client, &mut peers, "2", ConnectOptions::default())
        .await
        .unwrap();
    let heartbeat = decode_heartbeat(&peer.next_frame().await.unwrap()).unwrap();
    assert_eq!(heartbeat.room_id, "2");
}

// ============================================================================
// Heartbeats
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_heartbeat_cadence_until_close() {
    let (client, _transport, mut peers) = mock_client();
    let client = Arc::new(client);
    let period = Duration::from_secs(1);

    let mut peer = connect_room(
        &client,
        &mut peers,
        "123",
        ConnectOptions::default().with_heartbeat_interval(period),
    )
    .await
    .unwrap();
    let start = Instant::now();

    decode_heartbeat(&peer.next_frame().await.unwrap()).unwrap();
    assert!(start.elapsed() < period);

    for n in 1..=3 {
        let frame = peer.next_frame().await.unwrap();
        assert_eq!(decode_heartbeat(&frame).unwrap().room_id, "123");

        let elapsed = start.elapsed();
        let expected = period * n;
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(50),
            "heartbeat {n} at {elapsed:?}"
        );
    }

    let closer = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.close().await })
    };
    assert_eq!(peer.expect_close_request().await.unwrap(), CloseCode::Normal);
    peer.close(CloseInfo::normal()).await.unwrap();
    closer.await.unwrap();

    tokio::time::sleep(period * 10).await;
    assert!(peer.try_outbound().is_none());
}

#[tokio::test]
async fn test_heartbeat_keeps_connect_room_after_switch() {
    let (client, _transport, mut peers) = mock_client();
    let mut peer = connect_room(&client, &mut peers, "123", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    client.switch_rooms("456").unwrap();
    assert!(client.send_heartbeat().unwrap());

    decode_enter_room(&peer.next_frame().await.unwrap()).unwrap();
    let heartbeat = decode_heartbeat(&peer.next_frame().await.unwrap()).unwrap();
    assert_eq!(heartbeat.room_id, "123");
}

// ============================================================================
// Inbound frames
// ============================================================================

#[tokio::test]
async fn test_fetch_result_is_acked() {
    let (client, _transport, mut peers) = mock_client();
    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    let mut events = client.subscribe(&[EventKind::FetchResult]);
    peer.deliver_binary(fetch_result_frame(Some(1), true, "abc"))
        .await
        .unwrap();

    match next_event(&mut events).await.unwrap() {
        ClientEvent::FetchResult(result) => {
            assert_eq!(result.internal_ext, "abc");
            assert_eq!(result.messages.len(), 1);
            assert_eq!(result.messages[0].method, "WebcastChatMessage");
        }
        other => panic!("expected fetch result, got {other:?}"),
    }

    // The ack went out before the event was published
    let ack = decode_outbound(&peer.try_outbound().expect("ack already sent")).unwrap();
    assert_eq!(ack.kind(), PayloadType::Ack);
    assert_eq!(ack.log_id, Some(1));
    assert_eq!(ack.payload, b"abc");
    assert_eq!(ack.payload_encoding, PushFrame::PROTOBUF_ENCODING);
    assert!(peer.try_outbound().is_none());
}

#[tokio::test]
async fn test_gzip_fetch_result_is_acked() {
    let (client, _transport, mut peers) = mock_client();
    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    peer.deliver_binary(gzip_fetch_result_frame(31, "zipped").unwrap())
        .await
        .unwrap();

    let ack = peer.next_frame().await.unwrap();
    assert_eq!(ack.log_id, Some(31));
    assert_eq!(ack.payload, b"zipped");
}

#[tokio::test]
async fn test_no_ack_without_log_id() {
    let (client, _transport, mut peers) = mock_client();
    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    let mut events = client.subscribe(&[EventKind::FetchResult]);
    peer.deliver_binary(fetch_result_frame(None, true, "abc"))
        .await
        .unwrap();
    peer.deliver_binary(fetch_result_frame(Some(0), true, "abc"))
        .await
        .unwrap();

    next_event(&mut events).await.unwrap();
    next_event(&mut events).await.unwrap();
    assert!(peer.try_outbound().is_none());
}

#[tokio::test]
async fn test_no_ack_when_not_requested() {
    let (client, _transport, mut peers) = mock_client();
    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    let mut events = client.subscribe(&[EventKind::FetchResult]);
    peer.deliver_binary(fetch_result_frame(Some(5), false, "abc"))
        .await
        .unwrap();

    assert!(matches!(
        next_event(&mut events).await.unwrap(),
        ClientEvent::FetchResult(result) if !result.needs_ack
    ));
    assert!(peer.try_outbound().is_none());
}

#[tokio::test]
async fn test_text_frame_is_unknown_response() {
    let (client, _transport, mut peers) = mock_client();
    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    let mut events = client.subscribe(&[
        EventKind::RawData,
        EventKind::UnknownResponse,
        EventKind::DecodingFailed,
        EventKind::RoomEntered,
    ]);
    peer.deliver_text("{\"status\":\"ok\"}").await.unwrap();
    peer.deliver_binary(enter_room_response_frame(2)).await.unwrap();

    let kinds: Vec<EventKind> = [
        next_event(&mut events).await.unwrap(),
        next_event(&mut events).await.unwrap(),
        next_event(&mut events).await.unwrap(),
        next_event(&mut events).await.unwrap(),
    ]
    .iter()
    .map(ClientEvent::kind)
    .collect();

    assert_eq!(
        kinds,
        vec![
            EventKind::RawData,
            EventKind::UnknownResponse,
            EventKind::RawData,
            EventKind::RoomEntered,
        ]
    );
    assert!(peer.try_outbound().is_none());
}

#[tokio::test]
async fn test_decode_failure_does_not_stop_session() {
    let (client, _transport, mut peers) = mock_client();
    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    let mut events = client.subscribe(&[EventKind::DecodingFailed, EventKind::FetchResult]);
    peer.deliver_binary(malformed_frame()).await.unwrap();
    peer.deliver_binary(fetch_result_frame(Some(2), true, "next"))
        .await
        .unwrap();

    match next_event(&mut events).await.unwrap() {
        ClientEvent::DecodingFailed(e) => assert!(!e.to_string().is_empty()),
        other => panic!("expected decoding failure, got {other:?}"),
    }
    assert!(matches!(
        next_event(&mut events).await.unwrap(),
        ClientEvent::FetchResult(result) if result.internal_ext == "next"
    ));

    assert!(client.is_connected());
    let ack = peer.next_frame().await.unwrap();
    assert_eq!(ack.log_id, Some(2));
}

#[tokio::test]
async fn test_room_entered_event() {
    let (client, _transport, mut peers) = mock_client();
    let peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();

    let mut events = client.subscribe(&[EventKind::RoomEntered]);
    peer.deliver_binary(enter_room_response_frame(12)).await.unwrap();

    match next_event(&mut events).await.unwrap() {
        ClientEvent::RoomEntered(container) => {
            assert_eq!(container.log_id(), Some(12));
            assert!(container.is_enter_room_response());
        }
        other => panic!("expected room entered, got {other:?}"),
    }
}

/// Attaches a fetch result to room-enter responses
struct EnterRoomWithResultCodec(ProtobufCodec);

impl Codec for EnterRoomWithResultCodec {
    fn encode_frame(&self, frame: &PushFrame) -> CodecResult<Vec<u8>> {
        self.0.encode_frame(frame)
    }

    fn encode_payload(&self, payload: &OutboundPayload) -> CodecResult<Vec<u8>> {
        self.0.encode_payload(payload)
    }

    fn decode(&self, data: &[u8]) -> CodecResult<DecodedContainer> {
        let container = self.0.decode(data)?;
        if container.is_enter_room_response() {
            return Ok(container.with_fetch_result(fetch_result(true, "both")));
        }
        Ok(container)
    }
}

#[tokio::test]
async fn test_fetch_result_and_room_entered_together() {
    let (transport, mut peers) = MockTransport::new();
    let client = PushClient::builder()
        .transport(transport)
        .codec(EnterRoomWithResultCodec(ProtobufCodec::new()))
        .build()
        .unwrap();
    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    let mut events = client.subscribe(&[EventKind::FetchResult, EventKind::RoomEntered]);
    peer.deliver_binary(enter_room_response_frame(8)).await.unwrap();

    assert_eq!(next_event(&mut events).await.unwrap().kind(), EventKind::FetchResult);
    assert_eq!(next_event(&mut events).await.unwrap().kind(), EventKind::RoomEntered);

    let ack = peer.next_frame().await.unwrap();
    assert_eq!(ack.log_id, Some(8));
    assert_eq!(ack.payload, b"both");
}

// ============================================================================
// Outbound
// ============================================================================

#[tokio::test]
async fn test_switch_rooms_frame() {
    let (client, _transport, mut peers) = mock_client();
    let mut peer = connect_room(&client, &mut peers, "123", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    assert!(client.switch_rooms("456").unwrap());

    let frame = peer.next_frame().await.unwrap();
    assert!(frame.headers.is_empty());
    assert!(frame.service.is_none() && frame.method.is_none());

    let enter = decode_enter_room(&frame).unwrap();
    assert_eq!(enter.room_id, "456");
    assert_eq!(enter.live_id, "12");
    assert_eq!(enter.identity, "audience");
    assert_eq!(enter.account_type, "0");
    assert_eq!(enter.filter_welcome_msg, "0");
    assert!(!enter.is_anchor_continue_keep_msg);
    assert!(enter.room_tag.is_empty() && enter.live_region.is_empty());
    assert!(enter.cursor.is_empty() && enter.enter_unique_id.is_empty());

    assert!(peer.try_outbound().is_none());
}

#[tokio::test]
async fn test_send_bytes_requires_connection() {
    let (client, _transport, mut peers) = mock_client();
    assert!(!client.send_bytes(vec![1, 2, 3]));
    assert!(!client.switch_rooms("1").unwrap());

    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    assert!(client.send_bytes(vec![1, 2, 3]));
    assert_eq!(
        peer.next_outbound().await.unwrap(),
        OutboundMessage::Binary(vec![1, 2, 3])
    );
}

// ============================================================================
// Close
// ============================================================================

#[tokio::test]
async fn test_close_waits_for_close_event() {
    let (client, _transport, mut peers) = mock_client();
    let client = Arc::new(client);
    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    let mut closed = client.subscribe(&[EventKind::Closed]);
    let closer = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.close().await })
    };

    assert_eq!(peer.expect_close_request().await.unwrap(), CloseCode::Normal);
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(!closer.is_finished());
    assert_eq!(client.state(), ConnectionState::Closing);
    assert!(!client.send_bytes(vec![1]));

    peer.close(CloseInfo::normal()).await.unwrap();
    timeout(WAIT_TIMEOUT, closer).await.unwrap().unwrap();

    // Published before close() resolved
    match closed.try_recv() {
        Some(ClientEvent::Closed(close)) => assert!(close.is_normal()),
        other => panic!("expected close event, got {other:?}"),
    }
    assert_eq!(client.state(), ConnectionState::Disconnected);
    // Link released, no further heartbeats
    assert!(peer.next_outbound().await.is_err());
}

#[tokio::test]
async fn test_concurrent_close_sends_one_request() {
    let (client, _transport, mut peers) = mock_client();
    let client = Arc::new(client);
    let mut peer = connect_room(&client, &mut peers, "1", ConnectOptions::default())
        .await
        .unwrap();
    peer.next_frame().await.unwrap();

    let closers: Vec<_> = (0..3)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.close().await })
        })
        .collect();

    assert_eq!(peer.expect_close_request().await.unwrap(), CloseCode::Normal);
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert!(peer.try_outbound().is_none());

    peer.close(CloseInfo::normal()).await.unwrap();
    for closer in closers {
        timeout(WAIT_TIMEOUT, closer).await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_close_when_disconnected_resolves_immediately() {
    let (client, transport, _peers) = mock_client();

    timeout(Duration::from_millis(100), client.close())
        .await
        .expect("close resolves without a connection");
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_close_while_connecting_resolves_immediately() {
    let (client, _transport, mut peers) = mock_client();
    client
        .connect(
            MOCK_URL,
            &RoomParameters::new("1"),
            &BTreeMap::new(),
            ConnectOptions::default(),
        )
        .unwrap();
    let mut peer = peers.next().await.unwrap();

    timeout(Duration::from_millis(100), client.close())
        .await
        .expect("close resolves while connecting");
    assert_eq!(client.state(), ConnectionState::Connecting);
    assert!(peer.try_outbound().is_none());
}

#[tokio::test]
async fn test_abnormal_close_stops_heartbeats() {
    let (client, _transport, mut peers) = mock_client();
    let mut peer = connect_room(
        &client,
        &mut peers,
        "1",
        ConnectOptions::default().with_heartbeat_interval(Duration::from_millis(20)),
    )
    .await
    .unwrap();
    peer.next_frame().await.unwrap();
    peer.next_frame().await.unwrap();

    let mut closed = client.subscribe(&[EventKind::Closed]);
    peer.close(CloseInfo::abnormal("reset by peer")).await.unwrap();

    match next_event(&mut closed).await.unwrap() {
        ClientEvent::Closed(close) => assert!(!close.is_normal()),
        other => panic!("expected close event, got {other:?}"),
    }
    assert_eq!(client.state(), ConnectionState::Disconnected);

    tokio::time::sleep(Duration::from_millis(100)).await;
    // Whatever was queued before the close, the channel ends without more heartbeats
    while let Some(message) = peer.try_outbound() {
        decode_heartbeat(&decode_outbound(&message).unwrap()).unwrap();
    }
    assert!(peer.next_outbound().await.is_err());
}

// ============================================================================
// Drop
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_drop_while_connected_sends_going_away() {
    let (client, _transport, mut peers) = mock_client();
    let period = Duration::from_secs(1);
    let mut peer = connect_room(
        &client,
        &mut peers,
        "1",
        ConnectOptions::default().with_heartbeat_interval(period),
    )
    .await
    .unwrap();
    decode_heartbeat(&peer.next_frame().await.unwrap()).unwrap();

    drop(client);
    assert_eq!(peer.expect_close_request().await.unwrap(), CloseCode::GoingAway);

    tokio::time::sleep(period * 5).await;
    assert!(peer.try_outbound().is_none(), "heartbeats sent after drop");

    peer.close(CloseInfo::new(Some(CloseCode::GoingAway.as_u16()), ""))
        .await
        .unwrap();
    assert!(peer.next_outbound().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_drop_while_connecting_closes_after_handshake() {
    let (client, _transport, mut peers) = mock_client();
    let period = Duration::from_secs(1);
    client
        .connect(
            MOCK_URL,
            &RoomParameters::new("1"),
            &BTreeMap::new(),
            ConnectOptions::default().with_heartbeat_interval(period),
        )
        .unwrap();
    let mut peer = peers.next().await.unwrap();

    drop(client);
    peer.accept().await.unwrap();

    // No heartbeat, not even the initial one
    assert_eq!(peer.expect_close_request().await.unwrap(), CloseCode::GoingAway);
    tokio::time::sleep(period * 5).await;
    assert!(peer.try_outbound().is_none(), "heartbeats sent after drop");

    peer.close(CloseInfo::new(Some(CloseCode::GoingAway.as_u16()), ""))
        .await
        .unwrap();
    assert!(peer.next_outbound().await.is_err());
}

// ============================================================================
// Loopback WebSocket
// ============================================================================

#[tokio::test]
async fn test_websocket_round_trip() {
    let mut server = TestServer::start().await.expect("Failed to start server");
    let client = PushClient::builder()
        .transport(WebSocketTransport::new())
        .credentials(CookieJar::parse("sessionid=abc; tt-target-idc=useast"))
        .build()
        .unwrap();
    let mut events = client.subscribe_all();

    client
        .connect(
            &server.ws_url(),
            &RoomParameters::new("123"),
            &BTreeMap::new(),
            ConnectOptions::default(),
        )
        .unwrap();

    let handshake = server.handshake().await.unwrap();
    assert!(handshake.uri.starts_with("/webcast/im/ws/?room_id=123&version_code=180800"));
    assert_eq!(
        handshake.header("cookie"),
        Some("sessionid=abc; tt-target-idc=useast")
    );
    assert_eq!(handshake.header("origin"), Some(DEFAULT_ORIGIN));

    assert!(matches!(
        next_event(&mut events).await.unwrap(),
        ClientEvent::Connected
    ));
    let heartbeat = decode_heartbeat(&server.next_frame().await.unwrap()).unwrap();
    assert_eq!(heartbeat.room_id, "123");

    server
        .send(Message::Binary(fetch_result_frame(Some(77), true, "ext")))
        .unwrap();
    let ack = server.next_frame().await.unwrap();
    assert_eq!(ack.kind(), PayloadType::Ack);
    assert_eq!(ack.log_id, Some(77));
    assert_eq!(ack.payload, b"ext");

    server.send(Message::Text("hello".to_string())).unwrap();
    loop {
        if let ClientEvent::UnknownResponse(message) = next_event(&mut events).await.unwrap() {
            assert!(!message.is_binary());
            break;
        }
    }

    timeout(WAIT_TIMEOUT, client.close())
        .await
        .expect("close completes");
    match server.next_message().await.unwrap() {
        Message::Close(Some(frame)) => assert_eq!(u16::from(frame.code), 1000),
        other => panic!("expected close frame, got {other:?}"),
    }

    let close = loop {
        if let ClientEvent::Closed(close) = next_event(&mut events).await.unwrap() {
            break close;
        }
    };
    assert!(close.is_normal());
    assert_eq!(client.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn test_websocket_connect_refused() {
    // Grab a free port, then release it so nothing listens there
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let client = PushClient::builder()
        .transport(WebSocketTransport::new())
        .build()
        .unwrap();
    let mut events = client.subscribe_all();

    client
        .connect(
            &format!("ws://{addr}/"),
            &RoomParameters::new("1"),
            &BTreeMap::new(),
            ConnectOptions::default(),
        )
        .unwrap();

    match next_event(&mut events).await.unwrap() {
        ClientEvent::Closed(close) => assert!(close.code.is_none()),
        other => panic!("expected close event, got {other:?}"),
    }
    assert_eq!(client.state(), ConnectionState::Disconnected);
}
