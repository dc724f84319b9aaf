//! Report Renderer
//!
//! Converts Markdown-flavored report text into a PDF. Classification is a
//! pure function of the text; only the final write touches the filesystem.
//!
//! # Module Structure
//!
//! - [`emoji`] - Emoji code point removal
//! - [`inline`] - Bold/italic/image markup translation
//! - [`blocks`] - Line classification
//! - [`document`] - Fixed document frame around the blocks
//! - [`pdf`] - Layout and serialization

pub mod blocks;
pub mod document;
pub mod emoji;
pub mod inline;
pub mod pdf;

pub use blocks::{Block, HeadingLevel, classify_line, parse_blocks};
pub use document::{DocumentTheme, RenderedDocument};

use std::io::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::types::{AppError, Result};

/// Renders report text to PDF bytes or files.
#[derive(Debug, Clone, Default)]
pub struct ReportRenderer {
    theme: DocumentTheme,
}

impl ReportRenderer {
    pub fn new(theme: DocumentTheme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &DocumentTheme {
        &self.theme
    }

    /// Classified blocks for `text`. Deterministic.
    pub fn blocks(&self, text: &str) -> Vec<Block> {
        parse_blocks(text)
    }

    /// Assembles the document without serializing it.
    pub fn document(&self, text: &str, image: Option<&Path>) -> RenderedDocument {
        let image = image.and_then(|path| {
            if path.is_file() {
                Some(path.to_path_buf())
            } else {
                warn!(path = %path.display(), "Report image not found, rendering without it");
                None
            }
        });
        RenderedDocument::new(self.blocks(text), image, self.theme.clone())
    }

    /// Renders `text` to PDF bytes.
    pub fn render(&self, text: &str, image: Option<&Path>) -> Result<Vec<u8>> {
        let doc = self.document(text, image);
        pdf::build(&doc)
    }

    /// Renders `text` and writes it to `dest`.
    ///
    /// The bytes go to a temporary file next to `dest` which is then renamed
    /// into place, so a failed write leaves nothing behind.
    pub fn write_to(&self, text: &str, image: Option<&Path>, dest: &Path) -> Result<PathBuf> {
        let bytes = self.render(text, image)?;

        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let io_err = |e: std::io::Error| AppError::RenderIo(format!("{}: {}", dest.display(), e));

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.flush().map_err(io_err)?;
        tmp.persist(dest).map_err(|e| io_err(e.error))?;

        info!(path = %dest.display(), bytes = bytes.len(), "Report written");
        Ok(dest.to_path_buf())
    }
}

/// `investigation_<query prefix>_<8 hex>.pdf`, safe for any filesystem.
pub fn export_file_name(query: &str) -> String {
    let prefix: String = query
        .trim()
        .chars()
        .take(20)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("investigation_{}_{}.pdf", prefix, &id[..8])
}
