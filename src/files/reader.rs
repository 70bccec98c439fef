use std::io;
use std::path::Path;

use crate::files::listing;
use crate::files::resolver::{ResolvedPath, confine};
use crate::handler::HandlerError;
use crate::http::mime;
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::server::ServerContext;

/// Served in place of a listing when present.
pub const INDEX_FILE: &str = "index.html";

/// Reads a resolved file into a 200 response typed by its extension.
pub async fn serve_file(path: &Path) -> Result<Response, HandlerError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| io_error(e, "read", path))?;

    Ok(ResponseBuilder::new(StatusCode::Ok)
        .content_type(mime::from_path(path))
        .body(bytes)
        .build())
}

/// Serves a resolved directory: its `index.html` if it has one, otherwise
/// a generated listing.
///
/// `segments` is the normalized URL path that led to `dir`.
pub async fn serve_directory(
    ctx: &ServerContext,
    dir: &Path,
    segments: &[&str],
) -> Result<Response, HandlerError> {
    // The index may itself be a symlink, so it gets the same confinement.
    if let Ok(ResolvedPath::File(index)) = confine(ctx.root(), &dir.join(INDEX_FILE)).await {
        return serve_file(&index).await;
    }

    let entries = listing::read_entries(ctx.root(), dir)
        .await
        .map_err(|e| io_error(e, "list", dir))?;

    Ok(Response::html(listing::render(
        segments,
        &entries,
        !segments.is_empty(),
    )))
}

/// A path that vanished between resolution and reading is reported as
/// missing; anything else is a server fault.
fn io_error(e: io::Error, action: &str, path: &Path) -> HandlerError {
    if e.kind() == io::ErrorKind::NotFound {
        HandlerError::NotFound
    } else {
        HandlerError::Io(
            anyhow::Error::new(e).context(format!("failed to {} {}", action, path.display())),
        )
    }
}
