// src/lib.rs
// ────────────────────────────────────────────────────────────────────────────
// Public library entry point.  Re-export everything for the packet-filtering
// pipeline and integration tests.

pub mod macros;

pub mod config;
pub mod constants;
pub mod intel;
pub mod logging;
pub mod network;
pub mod process;

pub use network::{
    Communication, CommunicationStore, Direction, MemoryStore, Packet, PacketInfo, Scope,
    UnknownAttributor, Verdict,
};
pub use process::{Process, unknown_process};
