//! Render-strategy selection for extracted files
//!
//! The backend stores a type-sniff string ("magic") with every extracted
//! file. The sniff prefix picks a download extension and a rendering
//! strategy; anything unrecognized falls back to the binary dual view.

/// Known magic prefixes and their download extensions.
///
/// These match the sniff strings emitted by the backend's extraction rules.
const MAGIC_EXT: &[(&str, &str)] = &[
    ("ASCII text", "txt"),
    ("GIF image", "gif"),
    ("HTML document", "html"),
    ("JPEG image", "jpg"),
    ("JSON text data", "json"),
    ("PDF document", "pdf"),
    ("PNG image", "png"),
    ("SVG Scalable Vector Graphics image", "svg"),
];

/// Map a type-sniff string to a download extension. Unknown types get `bin`.
pub fn ext_from_magic(magic: &str) -> &'static str {
    for (prefix, ext) in MAGIC_EXT {
        if magic.starts_with(prefix) {
            return ext;
        }
    }
    "bin"
}

/// How an extracted file is presented in the detail pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRenderKind {
    /// Raster or vector image: metadata block plus hex preview (a terminal
    /// cell grid cannot rasterize it).
    Image,
    /// PDF document: metadata block plus hex preview.
    Document,
    /// Text-like content (plain text, HTML, JSON) rendered as decoded text.
    /// Markup is shown inert, never interpreted.
    Text,
    /// Unknown format: dual decoded-text / hex view with an explicit toggle.
    Binary,
}

/// Select the rendering strategy for a sniffed extension.
pub fn render_kind(ext: &str) -> FileRenderKind {
    match ext {
        "gif" | "jpg" | "png" | "svg" => FileRenderKind::Image,
        "pdf" => FileRenderKind::Document,
        "html" | "json" | "txt" => FileRenderKind::Text,
        _ => FileRenderKind::Binary,
    }
}
