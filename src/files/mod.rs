//! Filesystem side of the server: confining request paths to the document
//! root, reading files, and listing directories.

pub mod listing;
pub mod reader;
pub mod resolver;

pub use resolver::{ResolveError, ResolvedPath};
