use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};

use shape_match::adapter::protocol::{create_command, create_hello, CommandAction, WireCoord};
use shape_match::adapter::runtime::{apply_command, InboundPayload};
use shape_match::adapter::server::{build_observation, run_server, ServerConfig};
use shape_match::adapter::{InboundCommand, OutboundMessage};
use shape_match::core::{Grid, ScriptedSource, Session};
use shape_match::types::{geometric_shapes, DifficultyConfig};

/// A real session behind the server: swap, ack, observe the settled grid.
#[tokio::test]
async fn swap_over_the_wire_scores_and_ends_session() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        max_pending_commands: 8,
    };

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<InboundCommand>(8);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await;
    });

    let difficulty = DifficultyConfig {
        moves_allowed: 1,
        target_score: 30,
        pool: geometric_shapes()[..3].to_vec(),
        grid_size: 3,
    };
    let grid = Grid::from_rows(&[[0u8, 1, 0], [2, 0, 2], [1, 2, 1]]).unwrap();
    let mut session =
        Session::with_grid(difficulty, grid, ScriptedSource::new(vec![2, 1, 2], 3)).unwrap();

    // Minimal game loop.
    let engine_handle = tokio::spawn(async move {
        while let Some(inbound) = cmd_rx.recv().await {
            match inbound.payload {
                InboundPayload::SnapshotRequest => {
                    let obs = build_observation(&session, inbound.seq, Vec::new());
                    let _ = out_tx.send(OutboundMessage::ToClientObservation {
                        client_id: inbound.client_id,
                        obs,
                    });
                }
                InboundPayload::Command(command) => {
                    match apply_command(&mut session, inbound.seq, command) {
                        Ok(ack) => {
                            let _ = out_tx.send(OutboundMessage::ToClientAck {
                                client_id: inbound.client_id,
                                ack,
                            });
                        }
                        Err(err) => {
                            let _ = out_tx.send(OutboundMessage::ToClientError {
                                client_id: inbound.client_id,
                                err,
                            });
                            continue;
                        }
                    }
                    let events = session.drain_events();
                    let obs = build_observation(&session, inbound.seq, events);
                    let _ = out_tx.send(OutboundMessage::BroadcastObservation { obs });
                }
            }
        }
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .unwrap()
        .unwrap();
    let stream = TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    let hello = create_hello(1, "closed-loop", true);
    write_half
        .write_all(format!("{}\n", serde_json::to_string(&hello).unwrap()).as_bytes())
        .await
        .unwrap();

    let mut seen = Vec::new();
    for _ in 0..2 {
        let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        seen.push(serde_json::from_str::<serde_json::Value>(&line).unwrap());
    }
    assert_eq!(seen[0]["type"], "welcome");
    assert_eq!(seen[1]["type"], "observation");
    assert_eq!(seen[1]["grid"]["cells"][0], serde_json::json!([0, 1, 0]));
    assert_eq!(seen[1]["pool"], serde_json::json!(["square", "rectangle", "triangle"]));

    let swap = create_command(
        2,
        CommandAction::Swap {
            a: WireCoord([0, 1]),
            b: WireCoord([1, 1]),
        },
    );
    write_half
        .write_all(format!("{}\n", serde_json::to_string(&swap).unwrap()).as_bytes())
        .await
        .unwrap();

    let mut replies = Vec::new();
    for _ in 0..2 {
        let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        replies.push(serde_json::from_str::<serde_json::Value>(&line).unwrap());
    }
    let ack = &replies[0];
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["outcome"], "matched");

    let obs = &replies[1];
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["score"], 30);
    assert_eq!(obs["moves_remaining"], 0);
    assert_eq!(obs["status"], "won");
    assert_eq!(obs["game_over"], true);
    assert_eq!(obs["processing"], false);
    assert_eq!(obs["grid"]["cells"][0], serde_json::json!([2, 1, 2]));
    let kinds: Vec<&str> = obs["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["moves_changed", "score_changed", "session_ended"]);

    server_handle.abort();
    engine_handle.abort();
}
