//! Installation into the editor's draft store.
//!
//! 1. [`DraftStoreLocator`] picks the first existing candidate root.
//! 2. [`Installer`] creates `<root>/<name or fresh id>`.
//! 3. Media files are copied in parallel; failures become warnings.
//! 4. The document is rewritten to point at the copies and saved.
//! 5. The descriptor files are written next to it.
//!
//! Steps 1 and 2 are fatal. The rest never roll back: a report with
//! warnings describes a draft that exists but may need repair.

mod descriptors;
mod installer;
mod locate;

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::document::Document;

pub use descriptors::{
    virtual_store, write_descriptors, AgencyConfig, AgencyEntry, MetaInfo, AGENCY_CONFIG_FILE,
    META_INFO_FILE, META_VERSION, TEMPLATE_MARKER_FILE, VIRTUAL_STORE_FILE,
};
pub use installer::{Installer, DEFAULT_DOCUMENT_FILE};
pub use locate::{builtin_candidates, DraftStoreLocator, DRAFT_ROOTS_ENV};

/// Fatal installation errors. Nothing is written when one is returned.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("No draft store found; tried: {}", format_paths(candidates))]
    TargetNotFound { candidates: Vec<PathBuf> },

    #[error("Invalid project name '{0}': must be a single non-empty folder name")]
    InvalidName(String),

    #[error("Failed to create project folder '{}': {source}", path.display())]
    CreateProjectDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One media file that could not be copied.
#[derive(Error, Debug)]
#[error("Failed to copy '{}': {error}", path.display())]
pub struct CopyFailure {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// Some media files were not copied. The draft was still written.
#[derive(Error, Debug)]
#[error("{} of {attempted} media file(s) failed to copy", failures.len())]
pub struct PartialCopyError {
    pub attempted: usize,
    pub failures: Vec<CopyFailure>,
}

/// Non-fatal problems found while installing.
#[derive(Error, Debug)]
pub enum InstallWarning {
    #[error(transparent)]
    PartialCopy(PartialCopyError),

    #[error("{} material path(s) still point at the source files: {}", .0.len(), format_paths(.0))]
    StalePaths(Vec<PathBuf>),

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of an installation that created the project folder.
#[derive(Debug)]
pub struct InstallReport {
    pub project_dir: PathBuf,
    pub document_path: PathBuf,
    /// The document as written, with relocated paths.
    pub document: Document,
    /// Original path to copied path, successes only.
    pub copied: HashMap<PathBuf, PathBuf>,
    pub warnings: Vec<InstallWarning>,
}

impl InstallReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// The copy failures, if any.
    pub fn partial_copy(&self) -> Option<&PartialCopyError> {
        self.warnings.iter().find_map(|w| match w {
            InstallWarning::PartialCopy(p) => Some(p),
            _ => None,
        })
    }
}

/// Locate the draft store and install into it.
pub fn install(
    locator: &DraftStoreLocator,
    installer: &Installer,
    document: Document,
    media_files: &[PathBuf],
    name: Option<&str>,
) -> Result<InstallReport, InstallError> {
    let root = locator.locate()?;
    installer.install(&root, document, media_files, name)
}

fn format_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(none)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
