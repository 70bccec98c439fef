//! Maps decoded request paths onto the document root.
//!
//! Resolution happens in two stages. [`normalize`] is pure: it folds `.`
//! and `..` segments and refuses any path that would climb above the root.
//! [`confine`] then canonicalizes the joined path, following symlinks, and
//! only hands back paths that still lie under the canonical root.
//!
//! Both kinds of refusal surface as [`ResolveError::EscapesRoot`] so callers
//! can tell them apart from a path that simply does not exist. On the wire
//! the two look the same.

use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome of resolving a request path.
///
/// `File` and `Directory` always hold a canonical path under the document
/// root. `Missing` covers nonexistent paths and entries that are neither
/// files nor directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPath {
    File(PathBuf),
    Directory(PathBuf),
    Missing,
}

/// A request path refused by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    NulByte,
    /// Climbs above the root with `..`, or canonicalizes outside it.
    EscapesRoot,
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NulByte => f.write_str("path contains a NUL byte"),
            ResolveError::EscapesRoot => f.write_str("path leaves the document root"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Splits a decoded path into the segments that remain after folding `.`
/// and `..`.
///
/// Empty segments (from `//` or a trailing `/`) and `.` are dropped. `..`
/// removes the previous retained segment; with nothing left to remove the
/// whole path is refused rather than clamped to the root.
pub fn normalize(decoded: &str) -> Result<Vec<&str>, ResolveError> {
    if decoded.contains('\0') {
        return Err(ResolveError::NulByte);
    }

    let mut stack = Vec::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.pop().is_none() {
                    return Err(ResolveError::EscapesRoot);
                }
            }
            name => stack.push(name),
        }
    }

    Ok(stack)
}

/// Resolves `decoded` against the canonical document root `root`.
pub async fn resolve(root: &Path, decoded: &str) -> Result<ResolvedPath, ResolveError> {
    let segments = normalize(decoded)?;
    resolve_segments(root, &segments).await
}

/// Resolves segments already produced by [`normalize`].
pub async fn resolve_segments(
    root: &Path,
    segments: &[&str],
) -> Result<ResolvedPath, ResolveError> {
    let mut candidate = root.to_path_buf();
    candidate.extend(segments);

    confine(root, &candidate).await
}

/// Canonicalizes `candidate` and classifies it, provided it stays under
/// `root`.
///
/// A candidate that does not exist is `Missing`. One that exists but
/// canonicalizes to somewhere outside `root`, usually through a symlink,
/// is `EscapesRoot`.
pub async fn confine(root: &Path, candidate: &Path) -> Result<ResolvedPath, ResolveError> {
    let canonical = match tokio::fs::canonicalize(candidate).await {
        Ok(path) => path,
        Err(_) => return Ok(ResolvedPath::Missing),
    };

    // Component-wise: "/srv/www2" does not start with "/srv/www".
    if !canonical.starts_with(root) {
        tracing::debug!(
            candidate = %candidate.display(),
            canonical = %canonical.display(),
            "Resolved path leaves the document root"
        );
        return Err(ResolveError::EscapesRoot);
    }

    let resolved = match tokio::fs::metadata(&canonical).await {
        Ok(meta) if meta.is_file() => ResolvedPath::File(canonical),
        Ok(meta) if meta.is_dir() => ResolvedPath::Directory(canonical),
        _ => ResolvedPath::Missing,
    };
    Ok(resolved)
}
