//! Remote control for vitrine - TCP server that drives an inspector from outside the process
//!
//! Start the server in your host:
//! ```ignore
//! let mut server = RemoteServer::start(runtime.handle(), ServerConfig::default())?;
//! // once per frame
//! for cmd in server.drain() { /* apply */ }
//! server.publish(snapshot);
//! ```
//!
//! Each line received is one JSON [`RemoteCommand`]; each reply is one JSON
//! [`RemoteResponse`] line.

pub mod protocol;
pub mod server;

pub use protocol::*;
pub use server::{RemoteServer, ServerConfig};

/// Default remote control port
pub const DEFAULT_PORT: u16 = 9743;
