//! JSON-RPC API Layer
//!
//! Exposes the offer lifecycle and evaluation services as versioned
//! JSON-RPC 2.0 methods (`<area>.<verb>.v1`).

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use handler::RpcHandler;
pub use server::{RpcServer, RpcServerConfig};
