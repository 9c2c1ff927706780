//! Shape Match runner (default binary).
//!
//! Hosts one session and serves it over the TCP adapter. With
//! `SHAPE_MATCH_AI_DISABLED=1` it plays itself headless using hints instead.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shape_match::adapter::{
    apply_command, build_observation, create_ack, settle_startup, Adapter, ClientCommand,
    InboundPayload, OutboundMessage,
};
use shape_match::config::AppConfig;
use shape_match::core::{RandSource, Session, ShapeSource, SimpleRng};

type DynSession = Session<Box<dyn ShapeSource>>;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let rng: Box<dyn ShapeSource> = match config.seed {
        Some(seed) => Box::new(SimpleRng::new(seed)),
        None => Box::new(RandSource::from_entropy()),
    };
    let mut session: DynSession = Session::for_level(config.tiers, config.catalog, config.level, rng)
        .context("failed to start session")?;
    settle_startup(&mut session);

    match Adapter::start_from_env()? {
        Some(adapter) => serve(adapter, &mut session),
        None => {
            autoplay(&mut session);
            Ok(())
        }
    }
}

/// Apply remote commands until the server goes away.
fn serve(mut adapter: Adapter, session: &mut DynSession) -> Result<()> {
    while let Some(cmd) = adapter.recv_blocking() {
        match cmd.payload {
            InboundPayload::SnapshotRequest => {
                let obs = build_observation(session, cmd.seq, Vec::new());
                adapter.send(OutboundMessage::ToClientObservation {
                    client_id: cmd.client_id,
                    obs,
                });
            }
            InboundPayload::Command(ClientCommand::Snapshot) => {
                adapter.send(OutboundMessage::ToClientAck {
                    client_id: cmd.client_id,
                    ack: create_ack(cmd.seq, None),
                });
                let obs = build_observation(session, cmd.seq, Vec::new());
                adapter.send(OutboundMessage::ToClientObservation {
                    client_id: cmd.client_id,
                    obs,
                });
            }
            InboundPayload::Command(command) => {
                match apply_command(session, cmd.seq, command) {
                    Ok(ack) => adapter.send(OutboundMessage::ToClientAck {
                        client_id: cmd.client_id,
                        ack,
                    }),
                    Err(err) => {
                        warn!(client_id = cmd.client_id, seq = cmd.seq, code = ?err.code, "command rejected");
                        adapter.send(OutboundMessage::ToClientError {
                            client_id: cmd.client_id,
                            err,
                        });
                        continue;
                    }
                }
                let events = session.drain_events();
                let obs = build_observation(session, cmd.seq, events);
                adapter.send(OutboundMessage::BroadcastObservation { obs });
            }
        }
    }
    info!("adapter closed");
    Ok(())
}

/// Play the hinted swap until the session ends. Deadlocked boards are re-dealt.
fn autoplay(session: &mut DynSession) {
    while !session.game_over() {
        let Some((a, b)) = session.hint() else {
            warn!(level = session.level(), "no valid swap left, retrying");
            session.retry();
            session.settle();
            continue;
        };
        if let Err(e) = session.request_swap(a, b) {
            warn!(error = %e, "hinted swap failed");
            break;
        }
    }
    info!(
        level = session.level(),
        score = session.score(),
        target = session.target_score(),
        status = session.status().as_str(),
        "autoplay finished"
    );
}
