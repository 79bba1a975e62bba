//! The editor document.
//!
//! [`serialize`] checks a [`Project`](crate::models::Project) for dangling
//! references and renders it to [`Document`], the shape written as
//! `draft_content.json`. Once media has been copied into the draft folder,
//! [`rewrite_material_paths`] points the materials at the copies.

mod relocate;
mod schema;
mod serialize;

pub use relocate::{rewrite_material_paths, RelocationSummary};
pub use schema::{
    AudioMaterialEntry, CanvasSpec, ClipEntry, Document, DocumentMaterials, DocumentTracks,
    SegmentEntry, TextMaterialEntry, TrackEntry, VideoMaterialEntry, DOCUMENT_VERSION,
    PHOTO_MATERIAL_DURATION,
};
pub use serialize::{serialize, validate_references, IntegrityError};
