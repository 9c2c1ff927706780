//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server, and applies inbound
//! commands to a [`Session`].

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::core::{EngineError, Session, ShapeSource};
use crate::protocol::{
    create_ack, create_error, AckMessage, AckOutcome, ErrorCode, ErrorMessage, ObservationMessage,
    WireCoord,
};
use crate::server::{run_server, ServerConfig, ServerState};
use crate::types::{Coord, SelectOutcome, SwapOutcome};

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    /// A client finished its handshake and wants a first observation.
    SnapshotRequest,
    Command(ClientCommand),
}

/// Command payload, with coordinates already range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    Swap { a: Coord, b: Coord },
    Select { at: Coord },
    Retry,
    Advance,
    Hint,
    Snapshot,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientAck { client_id: usize, ack: AckMessage },
    ToClientError { client_id: usize, err: ErrorMessage },
    ToClientObservation { client_id: usize, obs: ObservationMessage },
    BroadcastObservation { obs: ObservationMessage },
}

/// Settle runs kept by the initial fill before any client is served.
///
/// Their events are dropped so they are not reported with the first command.
pub fn settle_startup<R: ShapeSource>(session: &mut Session<R>) {
    let resolved = session.settle();
    let dropped = session.drain_events();
    if resolved.steps > 0 {
        debug!(
            steps = resolved.steps,
            points = resolved.points,
            events = dropped.len(),
            "settled runs left by the initial fill"
        );
    }
}

/// Apply one command to the session.
///
/// Matching swaps are settled before returning, so the next observation
/// shows a stable grid.
pub fn apply_command<R: ShapeSource>(
    session: &mut Session<R>,
    seq: u64,
    command: ClientCommand,
) -> Result<AckMessage, ErrorMessage> {
    let engine_err = |e: EngineError| {
        let code = match e {
            EngineError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            EngineError::NoTierTable => ErrorCode::NoTierTable,
            _ => ErrorCode::InvalidCommand,
        };
        create_error(seq, code, &e.to_string())
    };

    let ack = match command {
        ClientCommand::Swap { a, b } => {
            let outcome = session.request_swap(a, b).map_err(engine_err)?;
            create_ack(seq, Some(swap_outcome(outcome)))
        }
        ClientCommand::Select { at } => {
            let outcome = match session.select(at).map_err(engine_err)? {
                SelectOutcome::Ignored => AckOutcome::Ignored,
                SelectOutcome::Selected(_) => AckOutcome::Selected,
                SelectOutcome::Deselected => AckOutcome::Deselected,
                SelectOutcome::Swapped(outcome) => swap_outcome(outcome),
            };
            create_ack(seq, Some(outcome))
        }
        ClientCommand::Retry => {
            session.retry();
            session.settle();
            create_ack(seq, None)
        }
        ClientCommand::Advance => {
            session.advance().map_err(engine_err)?;
            session.settle();
            create_ack(seq, None)
        }
        ClientCommand::Hint => match session.hint() {
            Some((a, b)) => {
                let mut ack = create_ack(seq, Some(AckOutcome::Hint));
                ack.hint = Some([WireCoord::from(a), WireCoord::from(b)]);
                ack
            }
            None => create_ack(seq, Some(AckOutcome::NoHint)),
        },
        ClientCommand::Snapshot => create_ack(seq, None),
    };
    Ok(ack)
}

fn swap_outcome(outcome: SwapOutcome) -> AckOutcome {
    match outcome {
        SwapOutcome::Ignored => AckOutcome::Ignored,
        SwapOutcome::NotAdjacent => AckOutcome::NotAdjacent,
        SwapOutcome::Invalid => AckOutcome::Invalid,
        SwapOutcome::Matched => AckOutcome::Matched,
    }
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `SHAPE_MATCH_AI_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerState::is_disabled() {
            info!("remote control disabled via SHAPE_MATCH_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    /// Start the adapter with an explicit configuration.
    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new().context("failed to create tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None).await {
                error!(error = %e, "adapter server stopped");
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    /// Block until the next command arrives. `None` once the server is gone.
    pub fn recv_blocking(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.blocking_recv()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}
