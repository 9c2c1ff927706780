//! Adapter module - remote play via TCP socket with JSON protocol
//!
//! This module lets external agents (bots, test harnesses, a separate UI
//! process) drive a match session through a TCP socket connection.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends a session snapshot after every command
//! 5. **Commanding**: Controller sends commands to swap, select, retry or advance
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: `swap`, `select`, `retry`, `advance`, `hint` or `snapshot`
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with the assigned role
//! - **observation**: Full session snapshot (grid, score, moves, status, events)
//! - **ack**: Command acknowledgment, with the swap or select outcome
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `SHAPE_MATCH_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `SHAPE_MATCH_AI_PORT`: Port number (default: 7878)
//! - `SHAPE_MATCH_AI_MAX_PENDING`: Command queue depth before `backpressure` (default: 10)
//! - `SHAPE_MATCH_AI_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"bot","version":"0.1.0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","client_id":1,"role":"controller","controller_id":1,"game_id":"shape-match"}
//! Server -> Client: {"type":"observation","seq":1,"ts":1234567891,"status":"active","grid":{"size":8,"cells":[[...]]},...}
//! Client -> Server: {"type":"command","seq":2,"ts":1234567892,"action":{"kind":"swap","a":[0,1],"b":[1,1]}}
//! Server -> Client: {"type":"ack","seq":2,"ts":1234567892,"status":"ok","outcome":"matched"}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":0,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0","requested":{"stream_observations":true}}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use shape_match_core as core;
pub use shape_match_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{
    apply_command, settle_startup, Adapter, ClientCommand, InboundCommand, InboundPayload,
    OutboundMessage,
};
pub use server::{build_observation, run_server, ServerConfig, ServerState};
