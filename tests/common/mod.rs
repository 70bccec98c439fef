//! Shared document root fixture.

#![allow(dead_code)]

use std::fs;
use std::sync::Arc;

use picohttpd::config::Config;
use picohttpd::server::ServerContext;

/// A document root laid out like the one the integration suite expects:
///
/// ```text
/// www/
///   index.html
///   testdir/
///     file1.txt
///     file2.txt
///     subdir/
///       index.html        "Subdir Index"
/// secret.txt              (outside the root)
/// ```
pub struct Site {
    pub dir: tempfile::TempDir,
    pub ctx: Arc<ServerContext>,
}

pub fn site() -> Site {
    site_with(|_| {})
}

pub fn site_with(tweak: impl FnOnce(&mut Config)) -> Site {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("www");

    fs::create_dir_all(root.join("testdir/subdir")).unwrap();
    fs::write(root.join("index.html"), "<h1>Welcome</h1>").unwrap();
    fs::write(root.join("testdir/file1.txt"), "first file").unwrap();
    fs::write(root.join("testdir/file2.txt"), vec![b'x'; 3000]).unwrap();
    fs::write(root.join("testdir/subdir/index.html"), "Subdir Index").unwrap();
    fs::write(dir.path().join("secret.txt"), "top secret").unwrap();

    let mut cfg = Config::default();
    cfg.static_files.root = root;
    tweak(&mut cfg);

    let ctx = Arc::new(ServerContext::new(&cfg).unwrap());
    Site { dir, ctx }
}

impl Site {
    pub fn root(&self) -> &std::path::Path {
        self.ctx.root()
    }
}
