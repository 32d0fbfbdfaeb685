//! Device bridge server.
//!
//! Exposes attached Android devices to browser clients: a WebSocket per
//! device that streams screen captures and accepts input commands
//! ([`session`]), plus a REST API for device discovery, file transfer, app
//! management, and logcat access ([`handlers`]).

pub mod cli;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod routes;
pub mod session;
pub mod state;
pub mod styles;
