//! # card-sheets – duplex-ready card sheets
//!
//! Lays front/back card images out on printable pages so that, after the
//! sheet is flipped for double-sided printing, every back lands behind its
//! front. The pipeline stages are:
//!
//! 1. **Resolve** – card kinds → front/back image paths ([`cards`])
//! 2. **Tile** – how many cards fit a page and where ([`tiling`])
//! 3. **Compose** – paginate cards into front/back spreads ([`compose`])
//! 4. **Render** – emit PDF bytes via printpdf ([`render`])
//!
//! Print jobs can be described by a JSON [`manifest`].

pub mod cards;
pub mod compose;
pub mod error;
pub mod geometry;
pub mod layout_config;
pub mod manifest;
pub mod pipeline;
pub mod render;
pub mod tiling;

// Re-exports for convenience
pub use compose::{compose, CardImagePair, Document, DocumentComposer};
pub use error::{Error, Face, Result};
pub use geometry::{PageGeometry, PageOrientation, Tile};
pub use pipeline::{generate_pdf, PipelineConfig};
pub use tiling::{compute_grid, TileGrid};
