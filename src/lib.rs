//! Student registry: a small HTTP service keeping student records in memory.
//!
//! Request flow: listener -> connection -> router -> handler -> store -> response.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;
pub mod store;
