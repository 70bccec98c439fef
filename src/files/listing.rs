//! HTML directory listings.
//!
//! Entries are read fresh on every request and sorted by name, so an
//! unchanged directory always renders to the same bytes.

use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};

use crate::files::resolver::{ResolvedPath, confine};
use crate::http::target::encode_segment;

const HTML_HEAD: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<title>Index of {path}</title>\n\
<style>\n\
body { font-family: monospace; margin: 40px; background: #f5f5f5; }\n\
h1 { border-bottom: 1px solid #ccc; padding-bottom: 10px; }\n\
table { border-collapse: collapse; width: 100%; background: white; }\n\
th { background: #e0e0e0; text-align: left; padding: 8px; border-bottom: 2px solid #ccc; }\n\
td { padding: 6px 8px; border-bottom: 1px solid #eee; }\n\
a { color: #0066cc; text-decoration: none; }\n\
.dir { font-weight: bold; }\n\
.size { text-align: right; }\n\
.date { color: #666; }\n\
</style>\n\
</head>\n\
<body>\n\
<h1>Index of {path}</h1>\n\
<table>\n\
<tr><th>Name</th><th>Last Modified</th><th class=\"size\">Size</th></tr>\n";

const HTML_FOOTER: &str = "</table>\n\
<hr>\n\
<i>picohttpd</i>\n\
</body>\n\
</html>\n";

const SIZE_UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub modified: SystemTime,
}

/// Reads the entries of `dir`, sorted by name.
///
/// Each entry goes through [`confine`] against `root`, so symlinks are
/// followed only while they stay inside the document root. Links that
/// leave it, dangling links, and entries that are neither files nor
/// directories are left out.
pub async fn read_entries(root: &Path, dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
    let mut reader = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let path = entry.path();

        let (kind, target) = match confine(root, &path).await {
            Ok(ResolvedPath::File(target)) => (EntryKind::File, target),
            Ok(ResolvedPath::Directory(target)) => (EntryKind::Directory, target),
            Ok(ResolvedPath::Missing) => continue,
            Err(e) => {
                tracing::debug!(entry = ?path, reason = %e, "Hiding entry");
                continue;
            }
        };

        let meta = match tokio::fs::metadata(&target).await {
            Ok(meta) => meta,
            Err(e) => {
                tracing::debug!(entry = ?path, error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        entries.push(DirectoryEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
            size: if kind == EntryKind::File { meta.len() } else { 0 },
            modified: meta.modified().unwrap_or(UNIX_EPOCH),
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Renders the listing page.
///
/// `segments` is the normalized URL path of the directory; links are built
/// from it as absolute URLs so they work with or without a trailing slash.
/// The parent row is only emitted when `has_parent` is set.
pub fn render(segments: &[&str], entries: &[DirectoryEntry], has_parent: bool) -> String {
    let display_path = if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    };

    let base: String = segments
        .iter()
        .map(|s| format!("/{}", encode_segment(s)))
        .collect();

    let mut out = HTML_HEAD.replace("{path}", &html_escape(&display_path));

    if has_parent {
        let parent: String = segments
            .iter()
            .take(segments.len().saturating_sub(1))
            .map(|s| format!("/{}", encode_segment(s)))
            .collect();
        out.push_str(&format!(
            "<tr><td colspan=\"3\"><a href=\"{}/\" class=\"dir\">[Parent Directory]</a></td></tr>\n",
            html_escape(&parent)
        ));
    }

    for entry in entries {
        let href = html_escape(&format!("{}/{}", base, encode_segment(&entry.name)));
        let name = html_escape(&entry.name);
        let date = format_modified(entry.modified);

        let row = match entry.kind {
            EntryKind::Directory => format!(
                "<tr><td><a href=\"{}/\" class=\"dir\">{}/</a></td><td class=\"date\">{}</td><td class=\"size\">-</td></tr>\n",
                href, name, date
            ),
            EntryKind::File => format!(
                "<tr><td><a href=\"{}\">{}</a></td><td class=\"date\">{}</td><td class=\"size\">{}</td></tr>\n",
                href,
                name,
                date,
                format_size(entry.size)
            ),
        };
        out.push_str(&row);
    }

    out.push_str(HTML_FOOTER);
    out
}

/// Formats a byte count: plain bytes below 1024, otherwise the largest
/// fitting unit with one truncated decimal.
pub fn format_size(size: u64) -> String {
    if size < 1024 {
        return format!("{} B", size);
    }

    let mut unit = 0;
    let mut divisor: u64 = 1024;
    while unit + 1 < SIZE_UNITS.len() && size / divisor >= 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let tenths = (u128::from(size) * 10 / u128::from(divisor)) as u64;
    format!("{}.{} {}", tenths / 10, tenths % 10, SIZE_UNITS[unit])
}

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_modified(time: SystemTime) -> String {
    let datetime = DateTime::<Utc>::from(time);
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
