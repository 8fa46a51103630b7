//! File operations confined to a workspace root.
//!
//! Every path is relative to the sandbox root and passes
//! [`check_path`](crate::security::check_path) before it touches the disk.
//! The real location, after symlinks, must also stay under the real root.

use crate::command::{FileKind, ProjectFile};
use crate::security::{check_filename, check_path, sanitize_content};
use chrono::{DateTime, Utc};
use oqool_core::{OqoolError, OqoolResult};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Clone)]
pub struct FileSandbox {
    root: PathBuf,
}

impl FileSandbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn resolve(&self, path: &str) -> OqoolResult<PathBuf> {
        check_path(path).map_err(|reason| OqoolError::Execution(format!("Unsafe path: {}", reason)))?;
        let full = self.root.join(path);

        let root = fs::canonicalize(&self.root)
            .await
            .map_err(|e| OqoolError::Execution(format!("Workspace root unavailable: {}", e)))?;

        // Targets of writes and mkdirs may not exist yet; check the deepest
        // ancestor that does.
        let mut existing = full.as_path();
        let real = loop {
            match fs::canonicalize(existing).await {
                Ok(real) => break real,
                Err(_) => match existing.parent() {
                    Some(parent) => existing = parent,
                    None => return Err(escape_error()),
                },
            }
        };

        if !real.starts_with(&root) {
            tracing::warn!(path, resolved = %real.display(), "path escapes workspace root");
            return Err(escape_error());
        }
        Ok(full)
    }

    pub async fn read_file(&self, path: &str) -> OqoolResult<String> {
        let full = self.resolve(path).await?;
        fs::read_to_string(&full)
            .await
            .map_err(|e| OqoolError::Execution(format!("Failed to read file: {}", e)))
    }

    /// Write `content`, creating parent directories. Content is sanitized
    /// unless `sanitize` is false.
    pub async fn write_file(&self, path: &str, content: &str, sanitize: bool) -> OqoolResult<()> {
        let full = self.resolve(path).await?;

        let filename = full
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        check_filename(filename)
            .map_err(|reason| OqoolError::Execution(format!("Unsafe filename: {}", reason)))?;

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| OqoolError::Execution(format!("Failed to write file: {}", e)))?;
        }

        let body = if sanitize {
            sanitize_content(content)
        } else {
            content.to_string()
        };

        fs::write(&full, body)
            .await
            .map_err(|e| OqoolError::Execution(format!("Failed to write file: {}", e)))
    }

    pub async fn delete_file(&self, path: &str) -> OqoolResult<()> {
        let full = self.resolve(path).await?;
        fs::remove_file(&full)
            .await
            .map_err(|e| OqoolError::Execution(format!("Failed to delete file: {}", e)))
    }

    pub async fn create_directory(&self, path: &str) -> OqoolResult<()> {
        let full = self.resolve(path).await?;
        fs::create_dir_all(&full)
            .await
            .map_err(|e| OqoolError::Execution(format!("Failed to create directory: {}", e)))
    }

    /// Entries of a directory, sorted by name.
    pub async fn list_files(&self, path: &str) -> OqoolResult<Vec<ProjectFile>> {
        let full = self.resolve(path).await?;
        let list_err = |e: std::io::Error| OqoolError::Execution(format!("Failed to list files: {}", e));

        let mut entries = fs::read_dir(&full).await.map_err(list_err)?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(list_err)? {
            let meta = entry.metadata().await.map_err(list_err)?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let kind = if meta.is_dir() {
                FileKind::Directory
            } else {
                FileKind::File
            };

            files.push(ProjectFile {
                path: relative_child(path, &name),
                name,
                kind,
                size: (kind == FileKind::File).then(|| meta.len()),
                modified_at: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

fn escape_error() -> OqoolError {
    OqoolError::Execution("Unsafe path: Path escapes workspace root".to_string())
}

fn relative_child(dir: &str, name: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() || dir == "." {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}
