//! Stub source loading.
//!
//! A stub source is a directory laid out like this:
//!
//! ```text
//! products/
//!   mappings/           *.json, *.jsonc, *.yaml, *.yml (nested folders allowed)
//!   __files/            bodies referenced by `bodyFileName`
//! ```
//!
//! Each mapping file holds a single stub or `{ "mappings": [...] }`.

use crate::config::error::ConfigError;
use crate::config::parser::{parse_config, FileFormat};
use crate::types::stub::{StubFile, StubMapping};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Folder holding mapping files inside a stub source.
pub const MAPPINGS_DIR: &str = "mappings";
/// Folder holding response body files inside a stub source.
pub const FILES_DIR: &str = "__files";

/// Load every stub of the stub source at `dir`, sorted by file path.
///
/// A missing `mappings` folder yields no stubs; a missing `dir` is an error.
/// Bodies referenced by `bodyFileName` are read and inlined; they must stay
/// inside the `__files` folder.
pub async fn load_stub_source(dir: impl AsRef<Path>) -> Result<Vec<StubMapping>, ConfigError> {
    let dir = dir.as_ref();
    match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(ConfigError::MissingStubSource(dir.to_path_buf())),
    }

    let mut stubs = Vec::new();
    for path in mapping_files(&dir.join(MAPPINGS_DIR))? {
        for mut stub in load_mapping_file(&path).await? {
            if let Some(file_name) = stub.response.body_file_name.take() {
                match read_body_file(dir, &path, &file_name).await? {
                    Ok(text) => stub.response.body = Some(Value::String(text)),
                    Err(bytes) => stub.response.binary_body = Some(bytes),
                }
            }
            stubs.push(stub);
        }
    }

    Ok(stubs)
}

/// Parse one mapping file, filling in missing ids and validating every stub.
pub async fn load_mapping_file(path: &Path) -> Result<Vec<StubMapping>, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let file: StubFile = parse_config(&content, path).map_err(|e| e.in_file(path))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("stub")
        .to_string();

    file.into_mappings()
        .into_iter()
        .enumerate()
        .map(|(index, mut stub)| -> Result<StubMapping, ConfigError> {
            if stub.id.is_empty() {
                stub.id = format!("{stem}-{index}");
            }
            stub.validate()
                .map_err(|reason| ConfigError::InvalidStub {
                    path: path.to_path_buf(),
                    reason: format!("stub '{}': {reason}", stub.id),
                })?;
            Ok(stub)
        })
        .collect()
}

fn mapping_files(mappings_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    if !mappings_dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&mappings_dir.to_string_lossy())
    );

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| {
            let path = e.path().to_path_buf();
            ConfigError::Io {
                path,
                source: e.into_error(),
            }
        })?;
        if path.is_file() && FileFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Content of a body file: text when it is valid UTF-8, raw bytes otherwise.
async fn read_body_file(
    dir: &Path,
    mapping: &Path,
    file_name: &str,
) -> Result<Result<String, Vec<u8>>, ConfigError> {
    let files_dir = dir.join(FILES_DIR);
    let requested = files_dir.join(file_name);

    let root = tokio::fs::canonicalize(&files_dir)
        .await
        .map_err(io_error(&files_dir))?;
    let resolved = tokio::fs::canonicalize(&requested)
        .await
        .map_err(io_error(&requested))?;
    if !resolved.starts_with(&root) {
        return Err(ConfigError::InvalidStub {
            path: mapping.to_path_buf(),
            reason: format!("bodyFileName '{file_name}' points outside {FILES_DIR}"),
        });
    }

    let bytes = tokio::fs::read(&resolved)
        .await
        .map_err(io_error(&resolved))?;
    Ok(String::from_utf8(bytes).map_err(|e| e.into_bytes()))
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::Io { path, source }
}
