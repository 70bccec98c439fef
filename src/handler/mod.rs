//! Request routing.
//!
//! - `POST` to any path is acknowledged by the echo handler.
//! - `GET` goes through the path resolver to a file or directory. A path
//!   under the diagnostic prefix that matches nothing is echoed instead;
//!   one the resolver refuses never is.
//! - Every other method gets 405.

pub mod echo;

use crate::files::reader;
use crate::files::resolver::{ResolveError, ResolvedPath, normalize, resolve_segments};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::server::ServerContext;

#[derive(Debug)]
pub enum HandlerError {
    /// Missing file, or a path refused by the resolver. Both look the same
    /// to the client.
    NotFound,
    /// Filesystem failure after the path was resolved.
    Io(anyhow::Error),
}

impl HandlerError {
    pub fn into_response(self) -> Response {
        match self {
            HandlerError::NotFound => Response::not_found(),
            HandlerError::Io(_) => Response::internal_error(),
        }
    }
}

pub async fn handle(ctx: &ServerContext, req: &Request) -> Result<Response, HandlerError> {
    match req.method {
        Method::POST => Ok(echo::post(req)),
        Method::GET => get(ctx, req).await,
        _ => Ok(Response::method_not_allowed()),
    }
}

async fn get(ctx: &ServerContext, req: &Request) -> Result<Response, HandlerError> {
    let segments = normalize(&req.path).map_err(|e| refused(req, e))?;
    let resolved = resolve_segments(ctx.root(), &segments)
        .await
        .map_err(|e| refused(req, e))?;

    match resolved {
        ResolvedPath::File(path) => reader::serve_file(&path).await,
        ResolvedPath::Directory(dir) => reader::serve_directory(ctx, &dir, &segments).await,
        ResolvedPath::Missing if ctx.is_diagnostic(&segments) => Ok(echo::headers(req)),
        ResolvedPath::Missing => Err(HandlerError::NotFound),
    }
}

/// Refusals are answered exactly like a missing file.
fn refused(req: &Request, reason: ResolveError) -> HandlerError {
    tracing::warn!(request_target = %req.target, reason = %reason, "Refused request path");
    HandlerError::NotFound
}
