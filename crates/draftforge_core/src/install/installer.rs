//! Draft folder creation, media copy and document write.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rayon::prelude::*;

use crate::document::{rewrite_material_paths, Document};
use crate::models::new_id;

use super::descriptors::{write_descriptors, write_json};
use super::{CopyFailure, InstallError, InstallReport, InstallWarning, PartialCopyError};

/// File name the editor reads the draft from.
pub const DEFAULT_DOCUMENT_FILE: &str = "draft_content.json";

/// Writes a document and its media into a draft-store root.
#[derive(Debug, Clone)]
pub struct Installer {
    document_file_name: String,
}

impl Default for Installer {
    fn default() -> Self {
        Self {
            document_file_name: DEFAULT_DOCUMENT_FILE.to_string(),
        }
    }
}

impl Installer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the document file name (builder pattern).
    pub fn with_document_file_name(mut self, name: impl Into<String>) -> Self {
        self.document_file_name = name.into();
        self
    }

    /// Install `document` and `media_files` under `root`.
    ///
    /// With `name` the folder `<root>/<name>` is created or reused and its
    /// files overwritten. Without a name a fresh ID is allocated. Folder
    /// creation errors are fatal; everything after that is best-effort and
    /// reported in [`InstallReport::warnings`].
    pub fn install(
        &self,
        root: &Path,
        mut document: Document,
        media_files: &[PathBuf],
        name: Option<&str>,
    ) -> Result<InstallReport, InstallError> {
        let project_dir = create_project_dir(root, name)?;
        if document.name.is_empty() {
            document.name = dir_name(&project_dir);
        }
        tracing::info!("Installing draft '{}' into {}", document.name, project_dir.display());

        let mut warnings = Vec::new();

        // Media
        let (copied, failures) = copy_media(media_files, &project_dir);
        if !failures.is_empty() {
            warnings.push(InstallWarning::PartialCopy(PartialCopyError {
                attempted: media_files.len(),
                failures,
            }));
        }

        // Paths
        let summary = rewrite_material_paths(&mut document, &copied);
        if !summary.is_complete() {
            warnings.push(InstallWarning::StalePaths(summary.untouched));
        }

        // Document
        let document_path = project_dir.join(&self.document_file_name);
        if let Err(source) = write_json(&document_path, &document) {
            tracing::warn!("Failed to write {}: {}", document_path.display(), source);
            warnings.push(InstallWarning::Write {
                path: document_path.clone(),
                source,
            });
        }

        // Descriptors
        let mut copied_files: Vec<PathBuf> = copied.values().cloned().collect();
        copied_files.sort();
        for (path, source) in write_descriptors(&project_dir, &document, &copied_files, Utc::now()) {
            warnings.push(InstallWarning::Write { path, source });
        }

        if warnings.is_empty() {
            tracing::info!("Installed {} file(s) into {}", copied.len(), project_dir.display());
        } else {
            tracing::warn!(
                "Installed into {} with {} warning(s)",
                project_dir.display(),
                warnings.len()
            );
        }

        Ok(InstallReport {
            project_dir,
            document_path,
            document,
            copied,
            warnings,
        })
    }
}

/// Create `<root>/<name>`, or `<root>/<fresh id>` when no name is given.
fn create_project_dir(root: &Path, name: Option<&str>) -> Result<PathBuf, InstallError> {
    let project_dir = match name {
        Some(name) => {
            validate_name(name)?;
            let dir = root.join(name);
            if dir.exists() {
                tracing::info!("Reusing existing draft folder {}", dir.display());
            }
            dir
        }
        None => loop {
            let dir = root.join(new_id());
            if !dir.exists() {
                break dir;
            }
        },
    };

    fs::create_dir_all(&project_dir).map_err(|source| InstallError::CreateProjectDir {
        path: project_dir.clone(),
        source,
    })?;
    Ok(project_dir)
}

/// A name must be a single, non-empty path component.
fn validate_name(name: &str) -> Result<(), InstallError> {
    let trimmed = name.trim();
    let bad = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed != name
        || name.contains(['/', '\\']);
    if bad {
        return Err(InstallError::InvalidName(name.to_string()));
    }
    Ok(())
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Copy every file into `dest_dir` in parallel.
///
/// Returns the original-to-copy map of the successes and the failures. All
/// copies have finished when this returns.
fn copy_media(
    files: &[PathBuf],
    dest_dir: &Path,
) -> (HashMap<PathBuf, PathBuf>, Vec<CopyFailure>) {
    let results: Vec<Result<(PathBuf, PathBuf), CopyFailure>> =
        files.par_iter().map(|src| copy_one(src, dest_dir)).collect();

    let mut copied = HashMap::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok((src, dest)) => {
                copied.insert(src, dest);
            }
            Err(failure) => {
                tracing::warn!("{}", failure);
                failures.push(failure);
            }
        }
    }
    (copied, failures)
}

fn copy_one(src: &Path, dest_dir: &Path) -> Result<(PathBuf, PathBuf), CopyFailure> {
    let file_name = src.file_name().ok_or_else(|| CopyFailure {
        path: src.to_path_buf(),
        error: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let dest = dest_dir.join(file_name);

    // Copying a file onto itself truncates it.
    if dest.exists() && same_file(src, &dest) {
        tracing::debug!("{} is already in place", src.display());
        return Ok((src.to_path_buf(), dest));
    }

    fs::copy(src, &dest).map_err(|error| CopyFailure {
        path: src.to_path_buf(),
        error,
    })?;
    tracing::debug!("Copied {} -> {}", src.display(), dest.display());
    Ok((src.to_path_buf(), dest))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
