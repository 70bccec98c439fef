//! picohttpd - Minimal Static File Server
//!
//! Core library for HTTP handling, path confinement and file serving.

pub mod config;
pub mod files;
pub mod handler;
pub mod http;
pub mod server;
