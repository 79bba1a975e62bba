//! Material path rewriting after media has been copied.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::schema::Document;

/// Outcome of a path rewrite pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationSummary {
    /// Materials whose path now points at the copied file.
    pub rewritten: usize,
    /// Material paths with no entry in the map, left as they were.
    pub untouched: Vec<PathBuf>,
}

impl RelocationSummary {
    pub fn is_complete(&self) -> bool {
        self.untouched.is_empty()
    }
}

/// Point every material at its relocated file.
///
/// `moves` maps original absolute paths to new absolute paths. Materials
/// whose path is not in the map keep their old path and are reported.
pub fn rewrite_material_paths(
    document: &mut Document,
    moves: &HashMap<PathBuf, PathBuf>,
) -> RelocationSummary {
    let mut summary = RelocationSummary::default();

    let paths = document
        .materials
        .videos
        .iter_mut()
        .map(|v| &mut v.path)
        .chain(document.materials.audios.iter_mut().map(|a| &mut a.path));

    for path in paths {
        match moves.get(Path::new(path.as_str())) {
            Some(new_path) => {
                *path = new_path.to_string_lossy().to_string();
                summary.rewritten += 1;
            }
            None => {
                tracing::warn!("No relocated copy of {}; keeping original path", path);
                summary.untouched.push(PathBuf::from(path.as_str()));
            }
        }
    }

    tracing::debug!(
        "Rewrote {} material path(s), {} untouched",
        summary.rewritten,
        summary.untouched.len()
    );
    summary
}
