//! Materials: the reusable assets segments point at.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ids::new_id;

/// Kind of material, doubling as the bucket it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialKind {
    Photo,
    Audio,
    Text,
}

impl MaterialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::Photo => "photo",
            MaterialKind::Audio => "audio",
            MaterialKind::Text => "text",
        }
    }
}

impl std::fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything stored in a [`MaterialBucket`].
pub trait Identified {
    fn id(&self) -> &str;
}

/// A still image placed as a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotoMaterial {
    pub id: String,
    pub absolute_path: PathBuf,
    pub display_name: String,
}

impl PhotoMaterial {
    pub fn new(path: &Path) -> Self {
        Self {
            id: new_id(),
            absolute_path: path.to_path_buf(),
            display_name: display_name_of(path),
        }
    }
}

/// The narration track. Its duration defines the project length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMaterial {
    pub id: String,
    pub absolute_path: PathBuf,
    pub display_name: String,
    /// Duration in microseconds.
    pub duration: i64,
}

impl AudioMaterial {
    pub fn new(path: &Path, duration: i64) -> Self {
        Self {
            id: new_id(),
            absolute_path: path.to_path_buf(),
            display_name: display_name_of(path),
            duration,
        }
    }
}

/// Default font and colour applied to a caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size: f64,
    /// `#RRGGBB`.
    pub text_color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 8.0,
            text_color: "#FFFFFF".to_string(),
        }
    }
}

impl TextStyle {
    /// Colour as normalised RGB floats. Unparsable colours fall back to white.
    pub fn rgb(&self) -> [f64; 3] {
        let hex = self.text_color.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return [1.0, 1.0, 1.0];
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(|v| f64::from(v) / 255.0)
                .unwrap_or(1.0)
        };
        [channel(0), channel(2), channel(4)]
    }
}

/// A caption. `rich_content` is the editor's JSON content string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMaterial {
    pub id: String,
    pub rich_content: String,
    pub style_defaults: TextStyle,
}

impl TextMaterial {
    /// Build a caption material from parsed caption text.
    ///
    /// Line breaks in `text` are replaced by `paragraph_separator` so the
    /// caption is stored as a single logical line.
    pub fn new(text: &str, style: &TextStyle, paragraph_separator: &str) -> Self {
        let flattened = text.lines().collect::<Vec<_>>().join(paragraph_separator);
        // Style ranges are counted in UTF-16 code units.
        let len = flattened.encode_utf16().count();

        let content = serde_json::json!({
            "text": flattened,
            "styles": [{
                "range": [0, len],
                "size": style.font_size,
                "fill": { "content": { "solid": { "color": style.rgb() } } },
                "font": { "id": "", "path": "" },
            }],
        });

        Self {
            id: new_id(),
            rich_content: content.to_string(),
            style_defaults: style.clone(),
        }
    }

    /// The caption text stored inside `rich_content`.
    pub fn plain_text(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.rich_content).ok()?;
        value.get("text")?.as_str().map(|s| s.to_string())
    }
}

impl Identified for PhotoMaterial {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for AudioMaterial {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for TextMaterial {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Any material.
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Photo(PhotoMaterial),
    Audio(AudioMaterial),
    Text(TextMaterial),
}

impl Material {
    pub fn kind(&self) -> MaterialKind {
        match self {
            Material::Photo(_) => MaterialKind::Photo,
            Material::Audio(_) => MaterialKind::Audio,
            Material::Text(_) => MaterialKind::Text,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Material::Photo(m) => &m.id,
            Material::Audio(m) => &m.id,
            Material::Text(m) => &m.id,
        }
    }
}

/// Insertion-ordered arena of materials keyed by ID.
#[derive(Debug, Clone)]
pub struct MaterialBucket<T> {
    items: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for MaterialBucket<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Identified> MaterialBucket<T> {
    /// Insert a material, replacing any previous entry with the same ID.
    pub fn insert(&mut self, item: T) {
        match self.index.get(item.id()) {
            Some(&pos) => self.items[pos] = item,
            None => {
                self.index.insert(item.id().to_string(), self.items.len());
                self.items.push(item);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// All materials of a project, bucketed by kind.
#[derive(Debug, Clone, Default)]
pub struct Materials {
    pub photos: MaterialBucket<PhotoMaterial>,
    pub audios: MaterialBucket<AudioMaterial>,
    pub texts: MaterialBucket<TextMaterial>,
}

impl Materials {
    /// Store a material in its bucket and return its ID.
    pub fn insert(&mut self, material: Material) -> String {
        let id = material.id().to_string();
        match material {
            Material::Photo(m) => self.photos.insert(m),
            Material::Audio(m) => self.audios.insert(m),
            Material::Text(m) => self.texts.insert(m),
        }
        id
    }

    /// True when `id` exists in the bucket for `kind`.
    pub fn contains(&self, kind: MaterialKind, id: &str) -> bool {
        match kind {
            MaterialKind::Photo => self.photos.contains(id),
            MaterialKind::Audio => self.audios.contains(id),
            MaterialKind::Text => self.texts.contains(id),
        }
    }

    pub fn len(&self) -> usize {
        self.photos.len() + self.audios.len() + self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn display_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_keeps_insertion_order() {
        let mut bucket = MaterialBucket::default();
        let a = PhotoMaterial::new(Path::new("/in/b.png"));
        let b = PhotoMaterial::new(Path::new("/in/a.png"));
        let (id_a, id_b) = (a.id.clone(), b.id.clone());
        bucket.insert(a);
        bucket.insert(b);

        let ids: Vec<&str> = bucket.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec![id_a.as_str(), id_b.as_str()]);
        assert_eq!(bucket.get(&id_b).unwrap().display_name, "a.png");
    }

    #[test]
    fn materials_route_to_bucket() {
        let mut materials = Materials::default();
        let id = materials.insert(Material::Audio(AudioMaterial::new(
            Path::new("/in/voice.mp3"),
            5_000_000,
        )));

        assert!(materials.contains(MaterialKind::Audio, &id));
        assert!(!materials.contains(MaterialKind::Photo, &id));
        assert_eq!(materials.len(), 1);
    }

    #[test]
    fn text_material_flattens_lines() {
        let m = TextMaterial::new("line one\nline two", &TextStyle::default(), "\u{2029}");
        assert_eq!(m.plain_text().unwrap(), "line one\u{2029}line two");

        let content: serde_json::Value = serde_json::from_str(&m.rich_content).unwrap();
        assert_eq!(content["styles"][0]["range"][1], 17);
    }

    #[test]
    fn style_color_parsing() {
        let style = TextStyle {
            font_size: 10.0,
            text_color: "#FF0000".to_string(),
        };
        assert_eq!(style.rgb(), [1.0, 0.0, 0.0]);

        let bad = TextStyle {
            font_size: 10.0,
            text_color: "red".to_string(),
        };
        assert_eq!(bad.rgb(), [1.0, 1.0, 1.0]);
    }
}
