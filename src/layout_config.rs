//! Layout config – the frozen page plan produced by composition and consumed
//! by the renderer. Encodes exactly which image goes where on every page.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Face;

/// A complete document plan ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "DocumentLayout::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Ordered list of pages; a back page always follows its front page.
    pub pages: Vec<PageLayout>,
}

/// One printed side of a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub face: Face,
    pub placements: Vec<Placement>,
}

/// One image drawn at a tile anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index of the card pair this image came from.
    pub pair_index: usize,
    pub face: Face,
    pub src: PathBuf,
    /// Top-left corner relative to the page's top-left, in points.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl DocumentLayout {
    pub fn new(title: impl Into<String>, page_width_pt: f32, page_height_pt: f32) -> Self {
        Self {
            title: title.into(),
            page_width_pt,
            page_height_pt,
            pages: Vec::new(),
        }
    }

    fn default_title() -> String {
        "card sheets".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    pub fn front_pages(&self) -> impl Iterator<Item = &PageLayout> {
        self.pages.iter().filter(|p| p.face == Face::Front)
    }

    pub fn back_pages(&self) -> impl Iterator<Item = &PageLayout> {
        self.pages.iter().filter(|p| p.face == Face::Back)
    }
}
