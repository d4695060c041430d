//! Inbound adapters that translate external requests into domain port calls
//! while keeping framework details at the edge.
//!
//! REST handlers live under [`http`]; the live dashboard socket under [`ws`].

pub mod http;
pub mod sign_outs;
pub mod ws;
