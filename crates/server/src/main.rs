mod config;
mod events;
mod registry;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use orbit_core::scheduler::{Inbound, SessionConfig, WorldTemplate};
use orbit_core::{Pallet, Ship, Sun, Vec2};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use config::ServerConfig;
use registry::SessionRegistry;

#[derive(Parser)]
#[command(name = "orbit-server")]
#[command(about = "Authoritative space-game session core")]
struct Args {
    #[arg(short, long)]
    port: Option<u16>,

    #[arg(short, long, default_value_t = 32)]
    max_clients: usize,
}

const SHUTDOWN_BUDGET: Duration = Duration::from_secs(5);

fn default_template() -> WorldTemplate {
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

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = ServerConfig::default().with_port_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    config.max_clients = args.max_clients;

    log::info!(
        "orbit-server listening on port {} (max_clients={})",
        config.port,
        config.max_clients
    );

    // The real socket transport (HTTP upgrade, framing) is an external
    // collaborator (see SPEC_FULL.md §1/§6); this binary exercises the
    // session core itself through a loopback stand-in: one session reading
    // JSON input frames from stdin and writing snapshot frames to stdout.
    let mut registry = SessionRegistry::new(config.max_clients);
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(32);

    let (connection_id, _event) = registry
        .spawn(
            default_template(),
            SessionConfig {
                tick_rate: config.tick_rate,
                queue_max_size: config.queue_max_size,
            },
            outbound_tx,
        )
        .expect("registry just created, under capacity");
    orbit_core::metrics::record_connection_event("connect");
    orbit_core::metrics::set_active_connections(registry.len() as f64);

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(frame) = outbound_rx.recv().await {
            let _ = stdout.write_all(frame.as_bytes()).await;
            let _ = stdout.write_all(b"\n").await;
            let _ = stdout.flush().await;
        }
    });

    let mut seq: u32 = 0;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal.ok();
                break;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(raw)) => {
                        match orbit_core::decode(&raw) {
                            Ok(orbit_core::Message::Input(msg)) => {
                                registry.route(
                                    connection_id,
                                    Inbound::Input { seq: msg.seq, command: msg.into_command() },
                                );
                                seq = seq.max(msg.seq);
                                orbit_core::metrics::record_message("in");
                            }
                            Ok(orbit_core::Message::Restart(_)) => {
                                registry.route(connection_id, Inbound::Restart);
                                orbit_core::metrics::record_message("in");
                            }
                            Ok(orbit_core::Message::Snapshot(_)) => {
                                orbit_core::metrics::record_connection_event("error");
                            }
                            Err(_) => {
                                orbit_core::metrics::record_connection_event("error");
                            }
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        log::warn!("stdin read error: {err}");
                        break;
                    }
                }
            }
        }
    }

    let _ = seq;
    let _ = connection_id;
    log::info!("shutting down (budget {:?})", SHUTDOWN_BUDGET);
    for join in registry.shutdown_all() {
        let _ = tokio::time::timeout(SHUTDOWN_BUDGET, join).await;
    }
    drop(writer);

    Ok(())
}
