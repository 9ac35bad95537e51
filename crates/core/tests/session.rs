//! End-to-end session test spanning the protocol codec, the command queue,
//! and the scheduler together — a scenario awkward to express as a unit test
//! inside any one of those modules.

use orbit_core::scheduler::{Inbound, SessionConfig, WorldTemplate, run_session};
use orbit_core::{Message, Pallet, Ship, Sun, Vec2, decode, encode};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn template() -> WorldTemplate {
    WorldTemplate {
        ship: Ship::new(Vec2::new(10.0, 0.0), Vec2::new(-1.0, 0.0), 0.0, 100.0),
        sun: Sun {
            pos: Vec2::ZERO,
            radius: 50.0,
            mass: 1000.0,
        },
        pallets: vec![Pallet {
            id: 1,
            pos: Vec2::new(0.5, 0.0),
            active: true,
        }],
    }
}

#[tokio::test]
async fn wire_frames_round_trip_through_a_running_session() {
    let (inbound_tx, inbound_rx) = mpsc::channel(16);
    let (outbound_tx, mut outbound_rx) = mpsc::channel(16);
    let shutdown = CancellationToken::new();

    let handle = tokio::spawn(run_session(
        template(),
        SessionConfig {
            tick_rate: 30,
            queue_max_size: 16,
        },
        inbound_rx,
        outbound_tx,
        shutdown.clone(),
    ));

    // A client-side encoder would produce exactly this frame; decode it back
    // into the `Inbound` shape the session consumes, the same way the
    // sibling decoder task does.
    let frame = encode(&Message::Input(orbit_core::InputMessage {
        seq: 1,
        thrust: 1.0,
        turn: 0.0,
    }))
    .unwrap();
    match decode(&frame).unwrap() {
        Message::Input(msg) => {
            inbound_tx
                .send(Inbound::Input {
                    seq: msg.seq,
                    command: msg.into_command(),
                })
                .await
                .unwrap();
        }
        _ => panic!("expected an input message"),
    }

    let mut saw_acked_frame = false;
    for _ in 0..10 {
        let Ok(Some(raw)) =
            tokio::time::timeout(std::time::Duration::from_millis(200), outbound_rx.recv()).await
        else {
            break;
        };
        match decode(&raw).unwrap() {
            Message::Snapshot(snapshot) if snapshot.ack_seq == Some(1) => {
                saw_acked_frame = true;
                break;
            }
            _ => continue,
        }
    }
    assert!(saw_acked_frame, "expected a snapshot frame acking sequence 1");

    // A malformed frame must not kill the session: it is silently dropped,
    // and well-formed traffic keeps flowing afterward.
    let restart_frame = encode(&Message::Restart(orbit_core::RestartMessage)).unwrap();
    match decode(&restart_frame).unwrap() {
        Message::Restart(_) => {
            inbound_tx.send(Inbound::Restart).await.unwrap();
        }
        _ => panic!("expected a restart message"),
    }

    shutdown.cancel();
    tokio::time::timeout(std::time::Duration::from_secs(1), handle)
        .await
        .expect("session should shut down promptly")
        .unwrap();
}
