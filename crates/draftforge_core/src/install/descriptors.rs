//! Auxiliary files the editor needs to list a draft.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::document::Document;

pub const AGENCY_CONFIG_FILE: &str = "draft_agency_config.json";
pub const VIRTUAL_STORE_FILE: &str = "draft_virtual_store.json";
pub const META_INFO_FILE: &str = "draft_meta_info.json";
pub const TEMPLATE_MARKER_FILE: &str = "template-2.tmp";

/// Meta schema version understood by the editor.
pub const META_VERSION: &str = "1.0.0";

/// Proxy ("agency") settings: which copied files need conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyConfig {
    pub use_converter: bool,
    pub materials: Vec<AgencyEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgencyEntry {
    pub path: String,
    pub is_converted: bool,
}

impl AgencyConfig {
    pub fn for_files(files: &[PathBuf]) -> Self {
        Self {
            use_converter: false,
            materials: files
                .iter()
                .map(|f| AgencyEntry {
                    path: f.to_string_lossy().to_string(),
                    is_converted: false,
                })
                .collect(),
        }
    }
}

/// Draft listing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaInfo {
    pub draft_version: String,
    pub draft_id: String,
    pub draft_name: String,
    pub draft_fold_path: String,
    pub draft_root_path: String,
    /// Creation time, microseconds since the Unix epoch.
    pub tm_draft_create: i64,
    pub tm_duration: i64,
}

impl MetaInfo {
    pub fn new(document: &Document, project_dir: &Path, created: DateTime<Utc>) -> Self {
        Self {
            draft_version: META_VERSION.to_string(),
            draft_id: document.id.clone(),
            draft_name: document.name.clone(),
            draft_fold_path: project_dir.to_string_lossy().to_string(),
            draft_root_path: project_dir
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
            tm_draft_create: created.timestamp_micros(),
            tm_duration: document.duration,
        }
    }
}

/// Asset-browser index: every material ID under the root folder.
///
/// Bucket `0` holds the root folder, bucket `1` the parent/child links in
/// document order (videos, audios, texts), bucket `2` is unused.
pub fn virtual_store(document: &Document, created: DateTime<Utc>) -> Value {
    let links: Vec<Value> = document
        .material_ids()
        .into_iter()
        .map(|id| json!({ "child_id": id, "parent_id": "" }))
        .collect();

    json!({
        "draft_materials": [],
        "draft_virtual_store": [
            {
                "type": 0,
                "value": [{
                    "creation_time": created.timestamp(),
                    "display_name": "",
                    "filter_type": 0,
                    "id": "",
                    "import_time": created.timestamp(),
                    "import_time_us": created.timestamp_micros(),
                    "sort_sub_type": 0,
                    "sort_type": 0,
                }],
            },
            { "type": 1, "value": links },
            { "type": 2, "value": [] },
        ],
    })
}

/// Write `contents` to `path` through a temporary file and rename.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    fs::write(&temp, contents)?;
    fs::rename(&temp, path)?;
    Ok(())
}

pub(crate) fn write_json(path: &Path, value: &impl Serialize) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    write_atomic(path, json.as_bytes())
}

/// Write the four descriptor files into `project_dir`.
///
/// Every file is attempted; failures are returned with the file path.
pub fn write_descriptors(
    project_dir: &Path,
    document: &Document,
    copied_files: &[PathBuf],
    created: DateTime<Utc>,
) -> Vec<(PathBuf, io::Error)> {
    let agency = project_dir.join(AGENCY_CONFIG_FILE);
    let store = project_dir.join(VIRTUAL_STORE_FILE);
    let meta = project_dir.join(META_INFO_FILE);
    let marker = project_dir.join(TEMPLATE_MARKER_FILE);

    let results = [
        (
            write_json(&agency, &AgencyConfig::for_files(copied_files)),
            agency,
        ),
        (write_json(&store, &virtual_store(document, created)), store),
        (
            write_json(&meta, &MetaInfo::new(document, project_dir, created)),
            meta,
        ),
        (fs::write(&marker, b""), marker),
    ];

    results
        .into_iter()
        .filter_map(|(result, path)| match result {
            Ok(()) => {
                tracing::debug!("Wrote {}", path.display());
                None
            }
            Err(e) => {
                tracing::warn!("Failed to write {}: {}", path.display(), e);
                Some((path, e))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::serialize;
    use crate::models::CanvasConfig;
    use crate::subtitles::SrtEntry;
    use crate::timeline::{build, AudioAsset, ImageAsset};
    use tempfile::tempdir;

    fn document() -> Document {
        let audio = AudioAsset::with_duration("/in/voice.wav", 6_000_000);
        let images = vec![ImageAsset::new("/in/1.png"), ImageAsset::new("/in/2.png")];
        let captions = vec![SrtEntry {
            sequence_number: 1,
            start: 0,
            end: 1_000_000,
            text: "hi".to_string(),
        }];
        let mut doc = serialize(
            &build(&audio, &images, Some(captions.as_slice()), CanvasConfig::default()).unwrap(),
        )
        .unwrap();
        doc.name = "demo".to_string();
        doc
    }

    #[test]
    fn virtual_store_lists_ids_in_bucket_order() {
        let doc = document();
        let store = virtual_store(&doc, Utc::now());

        let links = store["draft_virtual_store"][1]["value"].as_array().unwrap();
        let ids: Vec<&str> = links
            .iter()
            .map(|l| l["child_id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, doc.material_ids());
        assert_eq!(ids[2], doc.materials.audios[0].id);
        assert_eq!(store["draft_virtual_store"][0]["type"], 0);
        assert_eq!(store["draft_virtual_store"][2]["value"], json!([]));
    }

    #[test]
    fn writes_all_descriptors() {
        let dir = tempdir().unwrap();
        let doc = document();
        let copied = vec![dir.path().join("1.png"), dir.path().join("voice.wav")];
        let created = Utc::now();

        let failures = write_descriptors(dir.path(), &doc, &copied, created);
        assert!(failures.is_empty());

        let agency: AgencyConfig = serde_json::from_str(
            &fs::read_to_string(dir.path().join(AGENCY_CONFIG_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(agency.materials.len(), 2);
        assert!(!agency.materials[0].is_converted);

        let meta: MetaInfo =
            serde_json::from_str(&fs::read_to_string(dir.path().join(META_INFO_FILE)).unwrap())
                .unwrap();
        assert_eq!(meta.draft_name, "demo");
        assert_eq!(meta.draft_id, doc.id);
        assert_eq!(meta.tm_duration, 6_000_000);
        assert_eq!(meta.tm_draft_create, created.timestamp_micros());

        assert!(dir.path().join(VIRTUAL_STORE_FILE).is_file());
        assert_eq!(fs::read(dir.path().join(TEMPLATE_MARKER_FILE)).unwrap().len(), 0);
    }

    #[test]
    fn missing_directory_reports_every_file() {
        let dir = tempdir().unwrap();
        let failures = write_descriptors(&dir.path().join("absent"), &document(), &[], Utc::now());
        assert_eq!(failures.len(), 4);
    }

    #[test]
    fn atomic_write_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.json");
        write_atomic(&path, b"{}").unwrap();
        write_atomic(&path, b"[]").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(!dir.path().join("x.json.tmp").exists());
    }
}
