//! End-to-end generation against a temporary input folder.

use std::fs;
use std::path::Path;

use draftforge_core::config::Settings;
use draftforge_core::document::Document;
use draftforge_core::install::{
    AgencyConfig, MetaInfo, AGENCY_CONFIG_FILE, META_INFO_FILE, TEMPLATE_MARKER_FILE,
    VIRTUAL_STORE_FILE,
};
use draftforge_core::orchestrator::{generate_into, PipelineError, StepError};
use draftforge_core::timeline::{DurationSource, TimelineError};
use tempfile::tempdir;

/// 8 kHz mono 8-bit PCM, `millis` long.
fn write_wav(path: &Path, millis: u32) {
    let data_size = 8 * millis;
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_size).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&8_000u32.to_le_bytes());
    out.extend_from_slice(&8_000u32.to_le_bytes()); // byte rate
    out.extend_from_slice(&1u16.to_le_bytes()); // block align
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());
    out.resize(out.len() + data_size as usize, 0x80);
    fs::write(path, out).unwrap();
}

fn settings_in(root: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.paths.logs_folder = root.join("logs").to_string_lossy().to_string();
    settings.probe.ffprobe_path = root.join("no-ffprobe").to_string_lossy().to_string();
    settings
}

const CAPTIONS: &str = "\
1
00:00:00,000 --> 00:00:01,200
First line
second line

2
00:00:02,000 --> 00:00:04,000
Runs past the end
";

#[test]
fn builds_installable_draft() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    write_wav(&input.join("voice.wav"), 3_000);
    for name in ["img10.png", "img2.png", "img1.png"] {
        fs::write(input.join(name), b"png").unwrap();
    }
    fs::write(input.join("subs.srt"), CAPTIONS).unwrap();
    let output = dir.path().join("drafts");

    let outcome =
        generate_into(&input, &output, Some("Lesson 1"), &settings_in(dir.path())).unwrap();

    assert!(outcome.is_clean(), "{:?}", outcome.warnings);
    assert_eq!(outcome.duration_source, DurationSource::Probed);
    let project = output.join("Lesson 1");
    assert_eq!(outcome.project_dir, project);

    // The document on disk is the one reported.
    let json = fs::read_to_string(&outcome.document_path).unwrap();
    let document = Document::from_json(&json).unwrap();
    assert_eq!(document.id, outcome.document.id);
    assert_eq!(document.name, "Lesson 1");
    assert_eq!(document.duration, 3_000_000);

    // Scenes split the narration evenly in natural filename order.
    let scenes = &document.tracks.video[0].segments;
    let starts: Vec<i64> = scenes.iter().map(|s| s.target_timerange.start).collect();
    assert_eq!(starts, vec![0, 1_000_000, 2_000_000]);
    let names: Vec<&str> = document
        .materials
        .videos
        .iter()
        .map(|v| v.material_name.as_str())
        .collect();
    assert_eq!(names, vec!["img1.png", "img2.png", "img10.png"]);

    // The second caption is clamped to the narration.
    let captions = &document.tracks.text[0].segments;
    assert_eq!(captions.len(), 2);
    assert_eq!(captions[1].target_timerange.start, 2_000_000);
    assert_eq!(captions[1].target_timerange.duration, 1_000_000);

    // Media was copied and the document points at the copies.
    for path in document.material_paths() {
        assert!(path.starts_with(&project), "{}", path.display());
        assert!(path.is_file());
    }
    assert!(project.join("subs.srt").is_file());

    // Descriptor files.
    let agency: AgencyConfig =
        serde_json::from_str(&fs::read_to_string(project.join(AGENCY_CONFIG_FILE)).unwrap())
            .unwrap();
    assert_eq!(agency.materials.len(), 5);
    let meta: MetaInfo =
        serde_json::from_str(&fs::read_to_string(project.join(META_INFO_FILE)).unwrap()).unwrap();
    assert_eq!(meta.draft_id, document.id);
    assert_eq!(meta.draft_name, "Lesson 1");
    assert_eq!(meta.tm_duration, 3_000_000);
    assert!(project.join(VIRTUAL_STORE_FILE).is_file());
    assert!(project.join(TEMPLATE_MARKER_FILE).is_file());
}

#[test]
fn regenerating_with_same_name_reuses_folder() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    write_wav(&input.join("voice.wav"), 2_000);
    fs::write(input.join("a.jpg"), b"jpg").unwrap();
    let output = dir.path().join("drafts");
    let settings = settings_in(dir.path());

    let first = generate_into(&input, &output, Some("same"), &settings).unwrap();
    let second = generate_into(&input, &output, Some("same"), &settings).unwrap();

    assert_eq!(first.project_dir, second.project_dir);
    assert_eq!(fs::read_dir(&output).unwrap().count(), 1);
}

#[test]
fn silent_narration_fails_without_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input");
    fs::create_dir_all(&input).unwrap();
    // An empty data chunk measures as zero, which is not a usable length.
    write_wav(&input.join("voice.wav"), 0);
    fs::write(input.join("a.png"), b"png").unwrap();
    let output = dir.path().join("drafts");

    let err = generate_into(&input, &output, None, &settings_in(dir.path())).unwrap_err();

    assert!(matches!(
        err.step_error(),
        Some(StepError::Timeline(TimelineError::DurationUnavailable { .. }))
    ));
    assert!(matches!(err, PipelineError::StepFailed { .. }));
    assert!(!output.exists());
}
