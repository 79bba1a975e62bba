//! Input directory scanning.
//!
//! Classifies the files of an input directory (non-recursively) into the
//! narration audio, the scene images and an optional caption file.
//!
//! Directory listing order is filesystem-dependent, so every list is sorted
//! with [`natural_cmp`] before use: `scene2.png` comes before `scene10.png`.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Recognised narration extensions.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3"];

/// Recognised scene image extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Recognised caption extensions.
pub const CAPTION_EXTENSIONS: &[&str] = &["srt"];

/// Errors from scanning an input directory.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No audio file ({}) found in {}", AUDIO_EXTENSIONS.join("/"), .0.display())]
    MissingAudio(PathBuf),

    #[error("No image files ({}) found in {}", IMAGE_EXTENSIONS.join("/"), .0.display())]
    MissingImages(PathBuf),

    #[error("Failed to read directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a file in the input directory is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Audio,
    Image,
    Caption,
}

impl AssetKind {
    /// Classify by extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        let ext = ext.as_str();
        if AUDIO_EXTENSIONS.contains(&ext) {
            Some(Self::Audio)
        } else if IMAGE_EXTENSIONS.contains(&ext) {
            Some(Self::Image)
        } else if CAPTION_EXTENSIONS.contains(&ext) {
            Some(Self::Caption)
        } else {
            None
        }
    }
}

/// Every recognised file in a directory, sorted, without validation.
#[derive(Debug, Clone, Default)]
pub struct AssetListing {
    pub audio_files: Vec<PathBuf>,
    pub image_files: Vec<PathBuf>,
    pub caption_files: Vec<PathBuf>,
}

/// Validated scan result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedAssets {
    /// Absolute path of the input directory.
    pub root: PathBuf,
    pub audio_file: PathBuf,
    /// Scene images in natural filename order.
    pub image_files: Vec<PathBuf>,
    pub caption_file: Option<PathBuf>,
    /// Extra audio or caption files that were not selected.
    pub ignored: Vec<PathBuf>,
}

impl ScannedAssets {
    /// Every file the project will reference: audio, images, then caption.
    pub fn media_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::with_capacity(self.image_files.len() + 2);
        files.push(self.audio_file.clone());
        files.extend(self.image_files.iter().cloned());
        files.extend(self.caption_file.iter().cloned());
        files
    }
}

/// List and classify the recognised files in `dir`.
///
/// Hidden files and subdirectories are ignored.
pub fn list_assets(dir: &Path) -> Result<AssetListing, ScanError> {
    let root = std::path::absolute(dir).map_err(|e| read_dir_error(dir, e))?;
    let entries = fs::read_dir(&root).map_err(|e| read_dir_error(&root, e))?;

    let mut listing = AssetListing::default();
    for entry in entries {
        let entry = entry.map_err(|e| read_dir_error(&root, e))?;
        let path = entry.path();

        let hidden = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if hidden || !path.is_file() {
            continue;
        }

        match AssetKind::from_path(&path) {
            Some(AssetKind::Audio) => listing.audio_files.push(path),
            Some(AssetKind::Image) => listing.image_files.push(path),
            Some(AssetKind::Caption) => listing.caption_files.push(path),
            None => tracing::trace!("Ignoring unrecognised file {}", path.display()),
        }
    }

    sort_naturally(&mut listing.audio_files);
    sort_naturally(&mut listing.image_files);
    sort_naturally(&mut listing.caption_files);

    Ok(listing)
}

/// Scan `dir` and pick the narration, scenes and caption.
///
/// The first audio file and first caption file (in natural order) are used;
/// any others are returned in `ignored`.
pub fn scan_directory(dir: &Path) -> Result<ScannedAssets, ScanError> {
    let root = std::path::absolute(dir).map_err(|e| read_dir_error(dir, e))?;
    let listing = list_assets(&root)?;

    let mut audio = listing.audio_files.into_iter();
    let audio_file = audio
        .next()
        .ok_or_else(|| ScanError::MissingAudio(root.clone()))?;

    if listing.image_files.is_empty() {
        return Err(ScanError::MissingImages(root));
    }

    let mut captions = listing.caption_files.into_iter();
    let caption_file = captions.next();

    let ignored: Vec<PathBuf> = audio.chain(captions).collect();
    for path in &ignored {
        tracing::warn!("Ignoring extra input file {}", path.display());
    }

    tracing::info!(
        "Scanned {}: audio={}, {} image(s), caption={}",
        root.display(),
        audio_file.display(),
        listing.image_files.len(),
        caption_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "none".to_string())
    );

    Ok(ScannedAssets {
        root,
        audio_file,
        image_files: listing.image_files,
        caption_file,
        ignored,
    })
}

fn read_dir_error(path: &Path, source: std::io::Error) -> ScanError {
    ScanError::ReadDir {
        path: path.to_path_buf(),
        source,
    }
}

fn sort_naturally(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| {
        let a = a.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let b = b.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        natural_cmp(&a, &b)
    });
}

/// Numeric-aware string ordering.
///
/// Digit runs compare by value, other runs compare case-insensitively.
/// Strings that are equal under those rules fall back to plain ordering so
/// the result is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks::new(a);
    let mut right = Chunks::new(b);

    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (is_digits(x), is_digits(y)) {
                    (true, true) => cmp_digit_runs(x, y),
                    _ => x.to_lowercase().cmp(&y.to_lowercase()),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

fn cmp_digit_runs(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

/// Splits a string into alternating digit / non-digit runs.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Chunks<'a> {
    fn new(s: &'a str) -> Self {
        Self { rest: s }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() != digit)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}
