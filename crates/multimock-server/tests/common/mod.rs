//! Helpers shared by the registry integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::TcpListener;
use std::path::Path;
use tempfile::TempDir;

/// A port nothing listens on right now.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local addr").port()
}

/// `count` distinct free ports.
pub fn free_ports(count: usize) -> Vec<u16> {
    let listeners: Vec<TcpListener> = (0..count)
        .map(|_| TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port"))
        .collect();
    listeners
        .iter()
        .map(|l| l.local_addr().expect("local addr").port())
        .collect()
}

/// Stub root with an empty stub source per API name.
pub fn stub_root(apis: &[&str]) -> TempDir {
    let root = tempfile::tempdir().expect("tempdir");
    for api in apis {
        fs::create_dir_all(root.path().join(api).join("mappings")).expect("mappings dir");
        fs::create_dir_all(root.path().join(api).join("__files")).expect("files dir");
    }
    root
}

/// Write `content` to `relative` inside `root`, creating parent folders.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir");
    }
    fs::write(path, content).expect("write file");
}

pub fn client() -> reqwest::Client {
    reqwest::Client::new()
}
