//! Pipeline – ties together geometry validation, tiling, composition and
//! rendering into a single function call.

use crate::cards::{collect_pairs, AssetCatalog, CardFaces};
use crate::compose::{CardImagePair, Document, DocumentComposer};
use crate::error::Result;
use crate::geometry::{inches, PageGeometry, PageOrientation, Tile, PAGE_MARGIN_PT, US_LETTER_IN};

/// Configuration for the PDF generation pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Document title embedded in the PDF metadata (default: "card sheets").
    pub title: String,
    /// Page width in points (default: US Letter = 612).
    pub page_width: f32,
    /// Page height in points (default: US Letter = 792).
    pub page_height: f32,
    /// Page margin in points (default: 24).
    pub page_margin: f32,
    /// Page orientation; swaps effective width/height when `Landscape`.
    pub orientation: PageOrientation,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title: "card sheets".to_string(),
            page_width: inches(US_LETTER_IN.0),
            page_height: inches(US_LETTER_IN.1),
            page_margin: PAGE_MARGIN_PT,
            orientation: PageOrientation::Portrait,
        }
    }
}

impl PipelineConfig {
    /// Validated page geometry after applying orientation.
    pub fn geometry(&self) -> Result<PageGeometry> {
        Ok(PageGeometry::new(self.page_width, self.page_height, self.page_margin)?
            .oriented(self.orientation))
    }

    /// Create a US Letter landscape config.
    pub fn letter_landscape() -> Self {
        Self {
            orientation: PageOrientation::Landscape,
            ..Self::default()
        }
    }
}

/// Lay out `pairs` without rendering – useful for testing and for dumping
/// the page plan.
pub fn compute_document(
    pairs: &[CardImagePair],
    tile: &Tile,
    config: &PipelineConfig,
) -> Result<Document> {
    let geometry = config.geometry()?;
    DocumentComposer::new(geometry, *tile)?.compose(&config.title, pairs)
}

/// Full pipeline: card image pairs → PDF bytes.
///
/// Returns `(pdf_bytes, document)`.
pub fn generate_pdf(
    pairs: &[CardImagePair],
    tile: &Tile,
    config: &PipelineConfig,
) -> Result<(Vec<u8>, Document)> {
    let document = compute_document(pairs, tile, config)?;
    let bytes = document.to_pdf_bytes()?;
    Ok((bytes, document))
}

/// Card-level entry point: resolve each card's faces through `catalog`,
/// then run the full pipeline.
pub fn generate_pdf_from_cards<C: CardFaces>(
    cards: &[C],
    catalog: &AssetCatalog,
    tile: &Tile,
    config: &PipelineConfig,
) -> Result<(Vec<u8>, Document)> {
    let pairs = collect_pairs(cards, catalog)?;
    generate_pdf(&pairs, tile, config)
}
