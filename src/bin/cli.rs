// Signaling Server CLI Validation Tool
// Exercises a running signaling server through scripted scenarios and interactive commands

use clap::{Parser, Subcommand};
use colored::*;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::io::{self, Write};
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

#[derive(Parser)]
#[command(name = "signaling-cli")]
#[command(about = "Classroom Signaling Server CLI Validation Tool", long_about = None)]
struct Cli {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:3001")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server health endpoint
    Health,

    /// Test WebSocket connection
    Connect,

    /// Join a room and print incoming events
    Join {
        /// Room ID to join
        #[arg(short, long)]
        room_id: String,

        /// Display name
        #[arg(short, long)]
        username: String,

        /// Asserted role (teacher or student)
        #[arg(long, default_value = "student")]
        role: String,

        /// Keep connection alive (press Ctrl+C to exit)
        #[arg(short, long)]
        keep_alive: bool,
    },

    /// Run automated validation scenarios
    Validate {
        /// Run all validation tests
        #[arg(short, long)]
        all: bool,

        /// Test specific scenario
        #[arg(short, long)]
        scenario: Option<String>,
    },

    /// Interactive mode - send custom messages
    Interactive,
}

const SCENARIOS: &[(&str, &str)] = &[
    ("connection", "Basic WebSocket connection test"),
    ("presence", "Roster and join announcements"),
    ("relay", "Offer relay between two peers"),
    ("mute", "Teacher mutes a student"),
    ("unauthorized-mute", "Student mute attempt is ignored"),
    ("disconnect", "Departure is announced to the room"),
];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Health => {
            check_health(&cli.server).await;
        }
        Commands::Connect => {
            test_connection(&cli.server).await;
        }
        Commands::Join {
            room_id,
            username,
            role,
            keep_alive,
        } => {
            join_room(&cli.server, room_id, username, role, *keep_alive).await;
        }
        Commands::Validate { all, scenario } => {
            if *all {
                run_all_validations(&cli.server).await;
            } else if let Some(s) = scenario {
                run_scenario(&cli.server, s).await;
            } else {
                println!("{}", "Use --all or --scenario <name>".yellow());
                list_scenarios();
            }
        }
        Commands::Interactive => {
            interactive_mode(&cli.server).await;
        }
    }
}

/// Opens a WebSocket and waits for the server's `connected` greeting.
async fn open_client(server: &str) -> Result<(WsStream, String), String> {
    let url = format!("ws://{}/ws", server);
    let (mut ws, _) = connect_async(&url).await.map_err(|e| e.to_string())?;

    match recv_event(&mut ws, 3).await {
        Some(event) if event["event"] == "connected" => {
            let id = event["data"]["id"].as_str().unwrap_or_default().to_string();
            Ok((ws, id))
        }
        Some(event) => Err(format!("unexpected greeting: {}", event)),
        None => Err("no greeting from server".to_string()),
    }
}

async fn recv_event(ws: &mut WsStream, secs: u64) -> Option<Value> {
    loop {
        match timeout(Duration::from_secs(secs), ws.next()).await {
            Ok(Some(Ok(Message::Text(text)))) => return serde_json::from_str(&text).ok(),
            Ok(Some(Ok(_))) => continue,
            _ => return None,
        }
    }
}

async fn send_event(ws: &mut WsStream, event: Value) -> bool {
    ws.send(Message::Text(event.to_string())).await.is_ok()
}

fn join_frame(room_id: &str, username: &str, role: &str) -> Value {
    json!({
        "event": "join-room",
        "data": { "roomId": room_id, "username": username, "role": role }
    })
}

async fn check_health(server: &str) {
    println!("{}", "Checking server health...".cyan());

    let url = format!("http://{}/health", server);
    let client = reqwest::Client::new();

    match client.get(&url).send().await {
        Ok(resp) => {
            let status = resp.status();
            if status.is_success() {
                println!("{} Health check passed", "✓".green());

                if let Ok(body) = resp.json::<Value>().await {
                    println!("  Status: {}", body["status"].as_str().unwrap_or("unknown"));
                    println!("  Service: {}", body["service"].as_str().unwrap_or("unknown"));
                    println!("  Version: {}", body["version"].as_str().unwrap_or("unknown"));
                    println!("  Connections: {}", body["connections"]);
                    println!("  Rooms: {}", body["rooms"]);
                }
            } else {
                println!("{} Health check failed: {}", "✗".red(), status);
            }
        }
        Err(e) => {
            println!("{} Cannot connect to server: {}", "✗".red(), e);
            println!("  Make sure the server is running on {}", server);
        }
    }
}

async fn test_connection(server: &str) {
    println!("{}", "Testing WebSocket connection...".cyan());

    match open_client(server).await {
        Ok((mut ws, id)) => {
            println!("{} WebSocket connection established", "✓".green());
            println!("  Connection ID: {}", id);
            let _ = ws.close(None).await;
            println!("{} Connection closed cleanly", "✓".green());
        }
        Err(e) => {
            println!("{} WebSocket connection failed: {}", "✗".red(), e);
        }
    }
}

async fn join_room(server: &str, room_id: &str, username: &str, role: &str, keep_alive: bool) {
    println!("{}", "Joining room...".cyan());
    println!("  Room ID: {}", room_id);
    println!("  Username: {}", username);
    println!("  Role: {}", role);

    let (mut ws, id) = match open_client(server).await {
        Ok(client) => client,
        Err(e) => {
            println!("{} Cannot connect: {}", "✗".red(), e);
            return;
        }
    };
    println!("{} Connected as {}", "✓".green(), id.bright_white());

    if !send_event(&mut ws, join_frame(room_id, username, role)).await {
        println!("{} Failed to send join-room message", "✗".red());
        return;
    }

    match recv_event(&mut ws, 5).await {
        Some(event) if event["event"] == "all-users" => {
            let users = event["data"].as_array().cloned().unwrap_or_default();
            println!("{} Joined room with {} other participant(s)", "✓".green(), users.len());
            for user in users {
                println!(
                    "  {} {} ({})",
                    user["userId"].as_str().unwrap_or("?"),
                    user["username"].as_str().unwrap_or("?"),
                    user["role"].as_str().unwrap_or("?")
                );
            }
        }
        Some(event) => println!("Received: {}", event),
        None => {
            println!("{} Timeout", "✗".red());
            return;
        }
    }

    if keep_alive {
        println!("\nListening for events (Ctrl+C to exit)...");
        while let Some(Ok(message)) = ws.next().await {
            if let Message::Text(text) = message {
                println!("{} {}", "◀".green(), text.bright_white());
            }
        }
    }
}

fn list_scenarios() {
    println!("\n{}", "Available Validation Scenarios:".bold());
    for (name, description) in SCENARIOS {
        println!("  {} - {}", name.cyan(), description);
    }
    println!("\nExample: signaling-cli validate --scenario relay");
}

async fn run_scenario(server: &str, scenario: &str) {
    println!("\n{} {}", "Running scenario:".bold(), scenario.cyan());
    println!("{}", "─".repeat(60));

    let result = match scenario {
        "connection" => validate_connection(server).await,
        "presence" => validate_presence(server).await,
        "relay" => validate_relay(server).await,
        "mute" => validate_mute(server).await,
        "unauthorized-mute" => validate_unauthorized_mute(server).await,
        "disconnect" => validate_disconnect(server).await,
        _ => {
            println!("{} Unknown scenario: {}", "✗".red(), scenario);
            list_scenarios();
            return;
        }
    };

    if result {
        println!("\n{} Scenario passed", "✓".green().bold());
    } else {
        println!("\n{} Scenario failed", "✗".red().bold());
    }
}

async fn run_all_validations(server: &str) {
    println!("\n{}", "Running All Validation Tests".bold().green());
    println!("{}\n", "═".repeat(60).green());

    let mut passed = 0;
    for (name, _) in SCENARIOS {
        println!("{} {}", "▶".cyan(), name.bold());
        let ok = match *name {
            "connection" => validate_connection(server).await,
            "presence" => validate_presence(server).await,
            "relay" => validate_relay(server).await,
            "mute" => validate_mute(server).await,
            "unauthorized-mute" => validate_unauthorized_mute(server).await,
            "disconnect" => validate_disconnect(server).await,
            _ => false,
        };
        if ok {
            passed += 1;
        }
        println!();
    }

    println!("{}", "═".repeat(60).green());
    let summary = format!("{}/{} scenarios passed", passed, SCENARIOS.len());
    if passed == SCENARIOS.len() {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.red().bold());
    }
}

/// Connects two clients and has both join `room_id`, draining the presence
/// events so each scenario starts from a quiet room.
async fn teacher_and_student(server: &str, room_id: &str) -> Option<((WsStream, String), (WsStream, String))> {
    let (mut teacher, teacher_id) = match open_client(server).await {
        Ok(client) => client,
        Err(e) => {
            println!("{} Teacher connection failed: {}", "✗".red(), e);
            return None;
        }
    };
    let (mut student, student_id) = match open_client(server).await {
        Ok(client) => client,
        Err(e) => {
            println!("{} Student connection failed: {}", "✗".red(), e);
            return None;
        }
    };

    send_event(&mut teacher, join_frame(room_id, "Validator Teacher", "teacher")).await;
    recv_event(&mut teacher, 3).await?;
    send_event(&mut student, join_frame(room_id, "Validator Student", "student")).await;
    recv_event(&mut student, 3).await?;
    recv_event(&mut teacher, 3).await?;

    Some(((teacher, teacher_id), (student, student_id)))
}

fn validation_room(name: &str) -> String {
    format!("validate-{}-{}", name, std::process::id())
}

async fn validate_connection(server: &str) -> bool {
    match open_client(server).await {
        Ok((_, id)) => {
            println!("{} WebSocket connection successful ({})", "✓".green(), id);
            true
        }
        Err(e) => {
            println!("{} Connection failed: {}", "✗".red(), e);
            false
        }
    }
}

async fn validate_presence(server: &str) -> bool {
    let room_id = validation_room("presence");

    println!("  Step 1: First participant joins...");
    let (mut first, first_id) = match open_client(server).await {
        Ok(client) => client,
        Err(e) => {
            println!("{} Connection failed: {}", "✗".red(), e);
            return false;
        }
    };
    send_event(&mut first, join_frame(&room_id, "First", "teacher")).await;
    match recv_event(&mut first, 3).await {
        Some(event) if event == json!({ "event": "all-users", "data": [] }) => {
            println!("{} Empty roster received", "✓".green());
        }
        other => {
            println!("{} Unexpected roster: {:?}", "✗".red(), other);
            return false;
        }
    }

    println!("  Step 2: Second participant joins...");
    let (mut second, second_id) = match open_client(server).await {
        Ok(client) => client,
        Err(e) => {
            println!("{} Connection failed: {}", "✗".red(), e);
            return false;
        }
    };
    send_event(&mut second, join_frame(&room_id, "Second", "student")).await;

    let roster_ok = match recv_event(&mut second, 3).await {
        Some(event) => event["event"] == "all-users" && event["data"][0]["userId"] == first_id.as_str(),
        None => false,
    };
    let announce_ok = match recv_event(&mut first, 3).await {
        Some(event) => event["event"] == "user-joined" && event["data"]["userId"] == second_id.as_str(),
        None => false,
    };

    if roster_ok && announce_ok {
        println!("{} Roster and announcement correct", "✓".green());
        true
    } else {
        println!("{} roster ok: {}, announcement ok: {}", "✗".red(), roster_ok, announce_ok);
        false
    }
}

async fn validate_relay(server: &str) -> bool {
    let Some(((mut teacher, teacher_id), (mut student, student_id))) =
        teacher_and_student(server, &validation_room("relay")).await
    else {
        return false;
    };

    send_event(
        &mut student,
        json!({ "event": "offer", "data": { "target": teacher_id, "sdp": { "type": "offer", "sdp": "v=0" } } }),
    )
    .await;

    match recv_event(&mut teacher, 3).await {
        Some(event) if event["event"] == "offer" && event["data"]["sender"] == student_id.as_str() => {
            println!("{} Offer relayed with sender tag", "✓".green());
            true
        }
        other => {
            println!("{} Unexpected relay result: {:?}", "✗".red(), other);
            false
        }
    }
}

async fn validate_mute(server: &str) -> bool {
    let Some(((mut teacher, _), (mut student, student_id))) =
        teacher_and_student(server, &validation_room("mute")).await
    else {
        return false;
    };

    send_event(&mut teacher, json!({ "event": "mute-student", "data": { "target": student_id } })).await;

    match recv_event(&mut student, 3).await {
        Some(event) if event["event"] == "mute" => {
            println!("{} Student received mute", "✓".green());
            true
        }
        other => {
            println!("{} Unexpected result: {:?}", "✗".red(), other);
            false
        }
    }
}

async fn validate_unauthorized_mute(server: &str) -> bool {
    let Some(((mut teacher, teacher_id), (mut student, _))) =
        teacher_and_student(server, &validation_room("unauthorized")).await
    else {
        return false;
    };

    send_event(&mut student, json!({ "event": "mute-student", "data": { "target": teacher_id } })).await;

    match recv_event(&mut teacher, 1).await {
        None => {
            println!("{} Student mute was ignored", "✓".green());
            true
        }
        Some(event) => {
            println!("{} Teacher received: {}", "✗".red(), event);
            false
        }
    }
}

async fn validate_disconnect(server: &str) -> bool {
    let Some(((mut teacher, _), (mut student, student_id))) =
        teacher_and_student(server, &validation_room("disconnect")).await
    else {
        return false;
    };

    let _ = student.close(None).await;

    match recv_event(&mut teacher, 3).await {
        Some(event) if event == json!({ "event": "user-left", "data": student_id }) => {
            println!("{} Departure announced", "✓".green());
            true
        }
        other => {
            println!("{} Unexpected result: {:?}", "✗".red(), other);
            false
        }
    }
}

async fn interactive_mode(server: &str) {
    println!("\n{}", "Interactive Mode".bold().green());
    println!("{}", "═".repeat(60).green());
    println!("Type {} for help, {} to quit\n", "help".cyan(), "quit".cyan());

    let url = format!("ws://{}/ws", server);

    match connect_async(&url).await {
        Ok((ws_stream, _)) => {
            println!("{} Connected to server", "✓".green());

            let (mut write, mut read) = ws_stream.split();

            let receive_task = tokio::spawn(async move {
                while let Some(Ok(msg)) = read.next().await {
                    if let Message::Text(text) = msg {
                        println!("\n{} {}", "◀".green(), text.bright_white());
                    }
                }
            });

            loop {
                print!("{} ", "►".cyan());
                if io::stdout().flush().is_err() {
                    break;
                }

                let mut input = String::new();
                if io::stdin().read_line(&mut input).is_err() {
                    break;
                }

                let input = input.trim();

                if input.is_empty() {
                    continue;
                }

                if input == "quit" || input == "exit" {
                    println!("Goodbye!");
                    break;
                }

                if input == "help" {
                    print_interactive_help();
                    continue;
                }

                if let Ok(parsed) = serde_json::from_str::<Value>(input) {
                    if write.send(Message::Text(parsed.to_string())).await.is_ok() {
                        println!("{} Message sent", "✓".green());
                    } else {
                        println!("{} Failed to send message", "✗".red());
                        break;
                    }
                } else {
                    println!("{} Invalid JSON. Type 'help' for examples.", "✗".yellow());
                }
            }

            receive_task.abort();
        }
        Err(e) => {
            println!("{} Cannot connect to server: {}", "✗".red(), e);
        }
    }
}

fn print_interactive_help() {
    println!("\n{}", "Interactive Mode Commands".bold());
    println!("{}", "─".repeat(60));
    println!("Send JSON messages directly to the server.\n");

    println!("{}", "Example Messages:".bold());
    println!("\n{}:", "Join Room".cyan());
    println!(r#"  {{"event":"join-room","data":{{"roomId":"101","username":"Ms. Frizzle","role":"teacher"}}}}"#);

    println!("\n{}:", "Leave Room".cyan());
    println!(r#"  {{"event":"leave-room","data":{{"roomId":"101"}}}}"#);

    println!("\n{}:", "Offer".cyan());
    println!(r#"  {{"event":"offer","data":{{"target":"<connection-id>","sdp":{{"type":"offer","sdp":"v=0..."}}}}}}"#);

    println!("\n{}:", "ICE Candidate".cyan());
    println!(r#"  {{"event":"ice-candidate","data":{{"target":"<connection-id>","candidate":{{"candidate":"candidate:..."}}}}}}"#);

    println!("\n{}:", "Mute Student".cyan());
    println!(r#"  {{"event":"mute-student","data":{{"target":"<connection-id>"}}}}"#);

    println!("\n{}: quit, exit", "Commands".bold());
    println!();
}
