//! Job manifest – a JSON file describing one print run: page and tile sizes,
//! shared back images, and the ordered card list.
//!
//! ```json
//! {
//!   "title": "Resource deck",
//!   "tile_width_in": 2.5,
//!   "tile_height_in": 3.7,
//!   "backs": { "resource": "backs/resource.png" },
//!   "cards": [
//!     { "kind": "resource", "front": "fronts/fire_1.png", "produces": "fire" },
//!     { "kind": "token", "front": "fronts/token.png" }
//!   ]
//! }
//! ```
//!
//! Relative paths resolve against the manifest's own directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cards::{AssetCatalog, BackKind, Card};
use crate::error::{Error, Result};
use crate::geometry::{inches, PageOrientation, Tile, PAGE_MARGIN_PT, PLAYING_CARD_IN, US_LETTER_IN};
use crate::pipeline::PipelineConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackImages {
    pub resource: Option<PathBuf>,
    pub vip: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub title: Option<String>,
    pub page_width_in: f32,
    pub page_height_in: f32,
    pub margin_pt: f32,
    pub orientation: PageOrientation,
    pub tile_width_in: f32,
    pub tile_height_in: f32,
    pub backs: BackImages,
    pub cards: Vec<Card>,
    /// Where to write the PDF; the CLI may override it.
    pub output: Option<PathBuf>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            title: None,
            page_width_in: US_LETTER_IN.0,
            page_height_in: US_LETTER_IN.1,
            margin_pt: PAGE_MARGIN_PT,
            orientation: PageOrientation::Portrait,
            tile_width_in: PLAYING_CARD_IN.0,
            tile_height_in: PLAYING_CARD_IN.1,
            backs: BackImages::default(),
            cards: Vec::new(),
            output: None,
        }
    }
}

impl Manifest {
    /// Parse a manifest without touching the filesystem.
    pub fn from_json(json: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(json).map_err(|e| e.to_string())
    }

    /// Read `path` and resolve every relative path against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut manifest = Self::from_json(&json).map_err(|message| Error::Manifest {
            path: path.to_path_buf(),
            message,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        manifest.rebase(base);
        log::debug!(
            "loaded manifest '{}' with {} card(s)",
            path.display(),
            manifest.cards.len()
        );
        Ok(manifest)
    }

    fn rebase(&mut self, base: &Path) {
        let join = |p: &mut Option<PathBuf>| {
            if let Some(path) = p {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        };
        join(&mut self.backs.resource);
        join(&mut self.backs.vip);
        join(&mut self.output);
        for card in &mut self.cards {
            card.rebase(base);
        }
    }

    pub fn tile(&self) -> Result<Tile> {
        Tile::from_inches(self.tile_width_in, self.tile_height_in)
    }

    pub fn catalog(&self) -> AssetCatalog {
        let mut builder = AssetCatalog::builder();
        if let Some(path) = &self.backs.resource {
            builder = builder.back(BackKind::Resource, path.clone());
        }
        if let Some(path) = &self.backs.vip {
            builder = builder.back(BackKind::Vip, path.clone());
        }
        builder.build()
    }

    /// Pipeline settings, falling back to `default_title` when the manifest
    /// has none.
    pub fn pipeline_config(&self, default_title: &str) -> PipelineConfig {
        PipelineConfig {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| default_title.to_string()),
            page_width: inches(self.page_width_in),
            page_height: inches(self.page_height_in),
            page_margin: self.margin_pt,
            orientation: self.orientation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::ResourceType;

    #[test]
    fn empty_manifest_uses_letter_and_playing_cards() {
        let manifest = Manifest::from_json("{}").unwrap();
        assert_eq!(manifest, Manifest::default());
        let config = manifest.pipeline_config("deck");
        assert_eq!(config.title, "deck");
        assert_eq!(config.page_width, 612.0);
        assert_eq!(config.page_height, 792.0);
        assert_eq!(config.page_margin, 24.0);
        let tile = manifest.tile().unwrap();
        assert_eq!(tile.width(), 180.0);
    }

    #[test]
    fn unknown_card_kind_is_rejected() {
        let err = Manifest::from_json(r#"{"cards":[{"kind":"dragon","front":"d.png"}]}"#);
        assert!(err.is_err());
    }

    #[test]
    fn load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.json");
        std::fs::write(
            &path,
            r#"{
                "title": "Resources",
                "orientation": "landscape",
                "backs": {"resource": "backs/r.png"},
                "cards": [{"kind": "resource", "front": "f/fire.png", "produces": "fire"}],
                "output": "out/deck.pdf"
            }"#,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.orientation, PageOrientation::Landscape);
        assert_eq!(manifest.output, Some(dir.path().join("out/deck.pdf")));
        assert_eq!(
            manifest.cards[0],
            Card::Resource {
                front: Some(dir.path().join("f/fire.png")),
                produces: ResourceType::Fire,
            }
        );
        assert_eq!(
            manifest.catalog().back(BackKind::Resource),
            Some(dir.path().join("backs/r.png").as_path())
        );
        assert_eq!(manifest.catalog().back(BackKind::Vip), None);
    }

    #[test]
    fn malformed_manifest_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Manifest::load(&path), Err(Error::Manifest { .. })));
    }
}
