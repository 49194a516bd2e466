// Integration tests for the signaling server
// Each test starts the warp server on an ephemeral port and talks to it over real sockets

use std::net::SocketAddr;

use classroom_signaling::api::signaling_routes;
use classroom_signaling::SignalingServer;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

fn start_server() -> SocketAddr {
    let routes = signaling_routes::routes(SignalingServer::new());
    let (addr, serving) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(serving);
    addr
}

struct Client {
    ws: WsStream,
    id: String,
}

impl Client {
    async fn connect(addr: SocketAddr) -> Self {
        let (ws, _) = connect_async(format!("ws://{}/ws", addr))
            .await
            .expect("Failed to connect");
        let mut client = Self {
            ws,
            id: String::new(),
        };

        let greeting = client.next_event().await;
        assert_eq!(greeting["event"], "connected");
        client.id = greeting["data"]["id"].as_str().unwrap().to_string();
        client
    }

    async fn send(&mut self, frame: Value) {
        self.ws
            .send(Message::Text(frame.to_string()))
            .await
            .expect("Failed to send frame");
    }

    async fn send_raw(&mut self, raw: &str) {
        self.ws
            .send(Message::Text(raw.to_string()))
            .await
            .expect("Failed to send frame");
    }

    async fn join(&mut self, room: &str, username: &str, role: &str) {
        self.send(json!({
            "event": "join-room",
            "data": { "roomId": room, "username": username, "role": role }
        }))
        .await;
    }

    async fn next_event(&mut self) -> Value {
        loop {
            let message = timeout(Duration::from_secs(2), self.ws.next())
                .await
                .expect("Timeout waiting for event")
                .expect("Connection closed")
                .expect("WebSocket error");

            if let Message::Text(text) = message {
                return serde_json::from_str(&text).expect("Server sent invalid JSON");
            }
        }
    }

    async fn expect_silence(&mut self) {
        if let Ok(Some(Ok(Message::Text(text)))) = timeout(Duration::from_millis(200), self.ws.next()).await {
            panic!("Unexpected event: {}", text);
        }
    }

    async fn close(mut self) {
        self.ws.close(None).await.expect("Failed to close");
    }
}

/// Teacher and student meet in room 101, negotiate, get muted and part ways
#[tokio::test]
async fn test_classroom_session() {
    let addr = start_server();
    let mut teacher = Client::connect(addr).await;
    let mut student = Client::connect(addr).await;

    teacher.join("101", "Ms. Frizzle", "teacher").await;
    let roster = teacher.next_event().await;
    assert_eq!(roster, json!({ "event": "all-users", "data": [] }));

    student.join("101", "Arnold", "student").await;
    let roster = student.next_event().await;
    assert_eq!(
        roster,
        json!({
            "event": "all-users",
            "data": [{ "userId": teacher.id, "username": "Ms. Frizzle", "role": "teacher" }]
        })
    );

    let joined = teacher.next_event().await;
    assert_eq!(
        joined,
        json!({
            "event": "user-joined",
            "data": { "userId": student.id, "username": "Arnold", "role": "student" }
        })
    );

    let sdp = json!({ "type": "offer", "sdp": "v=0\r\ns=-\r\n" });
    student
        .send(json!({ "event": "offer", "data": { "target": teacher.id, "sdp": sdp } }))
        .await;
    let offer = teacher.next_event().await;
    assert_eq!(
        offer,
        json!({ "event": "offer", "data": { "sdp": sdp, "sender": student.id } })
    );

    teacher
        .send(json!({ "event": "answer", "data": { "target": student.id, "sdp": "answer-sdp" } }))
        .await;
    let answer = student.next_event().await;
    assert_eq!(answer["event"], "answer");
    assert_eq!(answer["data"]["sdp"], "answer-sdp");
    assert_eq!(answer["data"]["sender"], teacher.id.as_str());

    teacher
        .send(json!({ "event": "ice-candidate", "data": { "target": student.id, "candidate": { "candidate": "candidate:1" } } }))
        .await;
    let candidate = student.next_event().await;
    assert_eq!(candidate["event"], "ice-candidate");
    assert_eq!(candidate["data"]["candidate"]["candidate"], "candidate:1");

    teacher
        .send(json!({ "event": "mute-student", "data": { "target": student.id } }))
        .await;
    assert_eq!(student.next_event().await, json!({ "event": "mute" }));

    teacher
        .send(json!({ "event": "unmute-student", "data": { "target": student.id } }))
        .await;
    assert_eq!(student.next_event().await, json!({ "event": "unmute" }));

    let student_id = student.id.clone();
    student.close().await;
    assert_eq!(
        teacher.next_event().await,
        json!({ "event": "user-left", "data": student_id })
    );
}

/// Students cannot mute anyone, and nobody hears about the attempt
#[tokio::test]
async fn test_student_cannot_mute() {
    let addr = start_server();
    let mut alice = Client::connect(addr).await;
    let mut bob = Client::connect(addr).await;

    alice.join("lab", "Alice", "student").await;
    alice.next_event().await;
    bob.join("lab", "Bob", "student").await;
    bob.next_event().await;
    alice.next_event().await;

    alice
        .send(json!({ "event": "mute-student", "data": { "target": bob.id } }))
        .await;

    bob.expect_silence().await;
    alice.expect_silence().await;
}

/// Garbage frames are skipped and the connection keeps working
#[tokio::test]
async fn test_malformed_frames_are_ignored() {
    let addr = start_server();
    let mut client = Client::connect(addr).await;

    client.send_raw("not json at all").await;
    client
        .send(json!({ "event": "launch-rockets", "data": {} }))
        .await;
    client
        .send(json!({ "event": "join-room", "data": { "username": "NoRoom" } }))
        .await;
    client.expect_silence().await;

    client.join("101", "Alice", "student").await;
    assert_eq!(client.next_event().await["event"], "all-users");
}

/// Relays to unknown peers are dropped silently
#[tokio::test]
async fn test_offer_to_unknown_peer_is_dropped() {
    let addr = start_server();
    let mut client = Client::connect(addr).await;

    client
        .send(json!({ "event": "offer", "data": { "target": "does-not-exist", "sdp": "v=0" } }))
        .await;

    client.expect_silence().await;
}

/// Leaving one room notifies that room only
#[tokio::test]
async fn test_leave_room() {
    let addr = start_server();
    let mut alice = Client::connect(addr).await;
    let mut bob = Client::connect(addr).await;

    alice.join("r1", "Alice", "student").await;
    alice.next_event().await;
    bob.join("r1", "Bob", "student").await;
    bob.next_event().await;
    alice.next_event().await;

    bob.send(json!({ "event": "leave-room", "data": { "roomId": "r1" } }))
        .await;
    assert_eq!(
        alice.next_event().await,
        json!({ "event": "user-left", "data": bob.id })
    );
    bob.expect_silence().await;
}

/// Health endpoint reflects live connections and rooms
#[tokio::test]
async fn test_health_endpoint() {
    let addr = start_server();
    let mut client = Client::connect(addr).await;
    client.join("101", "Alice", "teacher").await;
    client.next_event().await;

    let body: Value = reqwest::get(format!("http://{}/health", addr))
        .await
        .expect("Health request failed")
        .json()
        .await
        .expect("Health body was not JSON");

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["connections"], 1);
    assert_eq!(body["rooms"], 1);
}
