//! Assertion evaluation for HTTP uptime probes.
//!
//! A probe response (status, headers, body) is checked against the ordered
//! assertion list stored with a monitor. Each assertion yields one result;
//! the verdict passes only when every result passes.

pub mod cmd;
pub mod config;
pub mod domain;
pub mod engine;
pub mod io;
pub mod logging;
pub mod util;
