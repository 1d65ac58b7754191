//! Composition – paginates card pairs into front/back page spreads.
//!
//! Each spread fills one front page with up to `capacity` fronts. Its back
//! page follows immediately, holding each back image at the mirrored slot of
//! its front, and is left out when no card in the spread has a back.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Face, Result};
use crate::geometry::{PageGeometry, Tile};
use crate::layout_config::{DocumentLayout, PageLayout, Placement};
use crate::render::render_pdf;
use crate::tiling::{compute_grid, Anchor, TileGrid};

/// A card's rendered front image and optional back image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardImagePair {
    pub front: PathBuf,
    pub back: Option<PathBuf>,
}

impl CardImagePair {
    pub fn new(front: impl Into<PathBuf>, back: Option<PathBuf>) -> Self {
        Self {
            front: front.into(),
            back,
        }
    }

    pub fn single_sided(front: impl Into<PathBuf>) -> Self {
        Self::new(front, None)
    }

    pub fn double_sided(front: impl Into<PathBuf>, back: impl Into<PathBuf>) -> Self {
        Self::new(front, Some(back.into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// No page emitted yet.
    Empty,
    /// At least one page emitted, none open.
    Accumulating,
    /// A page of the given face is being drawn.
    PageOpen(Face),
    /// Finished; accepts no further pages.
    Sealed,
}

/// An append-only sequence of pages. Pages are only reachable for drawing
/// while open; once closed they are never touched again.
#[derive(Debug, Clone)]
pub struct Document {
    layout: DocumentLayout,
    open: Option<PageLayout>,
    state: DocumentState,
}

impl Document {
    pub fn new(title: impl Into<String>, geometry: &PageGeometry) -> Self {
        Self {
            layout: DocumentLayout::new(title, geometry.width(), geometry.height()),
            open: None,
            state: DocumentState::Empty,
        }
    }

    pub fn state(&self) -> DocumentState {
        self.state
    }

    pub fn is_sealed(&self) -> bool {
        self.state == DocumentState::Sealed
    }

    /// Pages emitted so far.
    pub fn pages(&self) -> &[PageLayout] {
        &self.layout.pages
    }

    pub fn layout(&self) -> &DocumentLayout {
        &self.layout
    }

    pub fn title(&self) -> &str {
        &self.layout.title
    }

    pub fn open_page(&mut self, face: Face) -> Result<()> {
        match self.state {
            DocumentState::Empty | DocumentState::Accumulating => {
                self.open = Some(PageLayout {
                    page_index: self.layout.pages.len(),
                    face,
                    placements: Vec::new(),
                });
                self.state = DocumentState::PageOpen(face);
                Ok(())
            }
            DocumentState::PageOpen(open) => Err(Error::InvalidState(format!(
                "cannot open a {face} page while a {open} page is open"
            ))),
            DocumentState::Sealed => Err(sealed("open a page")),
        }
    }

    pub fn draw(&mut self, placement: Placement) -> Result<()> {
        match (&mut self.open, self.state) {
            (Some(page), DocumentState::PageOpen(_)) => {
                page.placements.push(placement);
                Ok(())
            }
            (_, DocumentState::Sealed) => Err(sealed("draw")),
            _ => Err(Error::InvalidState("no page is open to draw on".to_string())),
        }
    }

    /// Emit the open page.
    pub fn close_page(&mut self) -> Result<()> {
        match self.open.take() {
            Some(page) => {
                log::debug!(
                    "page {} ({}) closed with {} image(s)",
                    page.page_index,
                    page.face,
                    page.placements.len()
                );
                self.layout.pages.push(page);
                self.state = DocumentState::Accumulating;
                Ok(())
            }
            None if self.is_sealed() => Err(sealed("close a page")),
            None => Err(Error::InvalidState("no page is open".to_string())),
        }
    }

    pub fn seal(&mut self) -> Result<()> {
        match self.state {
            DocumentState::PageOpen(face) => Err(Error::InvalidState(format!(
                "cannot seal while a {face} page is open"
            ))),
            DocumentState::Sealed => Err(sealed("seal")),
            DocumentState::Empty | DocumentState::Accumulating => {
                self.state = DocumentState::Sealed;
                Ok(())
            }
        }
    }

    /// Render the sealed document to PDF bytes.
    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>> {
        if !self.is_sealed() {
            return Err(Error::InvalidState(
                "document must be sealed before it is rendered".to_string(),
            ));
        }
        render_pdf(&self.layout)
    }

    /// Render the sealed document and write it to `path`, creating parent
    /// directories as needed. Returns the number of bytes written.
    pub fn write_pdf(&self, path: &Path) -> Result<usize> {
        let bytes = self.to_pdf_bytes()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &bytes)?;
        log::info!(
            "wrote '{}' ({} bytes, {} page(s))",
            path.display(),
            bytes.len(),
            self.layout.pages.len()
        );
        Ok(bytes.len())
    }

    pub fn into_layout(self) -> DocumentLayout {
        self.layout
    }
}

fn sealed(action: &str) -> Error {
    Error::InvalidState(format!("cannot {action}: document is sealed"))
}

/// Lays card pairs out on pages using one precomputed grid.
#[derive(Debug, Clone)]
pub struct DocumentComposer {
    grid: Arc<TileGrid>,
}

impl DocumentComposer {
    pub fn new(geometry: PageGeometry, tile: Tile) -> Result<Self> {
        let grid = Arc::new(compute_grid(&geometry, &tile)?);
        Ok(Self::with_grid(grid))
    }

    /// Use a grid computed elsewhere, e.g. from a [`crate::tiling::GridCache`].
    /// Page and tile sizes come from the grid itself.
    pub fn with_grid(grid: Arc<TileGrid>) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn geometry(&self) -> &PageGeometry {
        self.grid.geometry()
    }

    pub fn tile(&self) -> &Tile {
        self.grid.tile()
    }

    /// Compose `pairs` into a new document and seal it.
    pub fn compose(&self, title: &str, pairs: &[CardImagePair]) -> Result<Document> {
        let mut doc = Document::new(title, self.geometry());
        self.compose_into(&mut doc, pairs)?;
        doc.seal()?;
        log::info!(
            "composed {} card(s) into {} page(s)",
            pairs.len(),
            doc.pages().len()
        );
        Ok(doc)
    }

    /// Append spreads for `pairs` to an unsealed document.
    ///
    /// Nothing is appended unless every card can be placed: the layout must
    /// have room for at least one tile and every referenced image must exist.
    pub fn compose_into(&self, doc: &mut Document, pairs: &[CardImagePair]) -> Result<()> {
        match doc.state() {
            DocumentState::Sealed => return Err(sealed("compose")),
            DocumentState::PageOpen(face) => {
                return Err(Error::InvalidState(format!(
                    "cannot compose while a {face} page is open"
                )))
            }
            DocumentState::Empty | DocumentState::Accumulating => {}
        }
        let geometry = self.geometry();
        let layout = doc.layout();
        if layout.page_width_pt != geometry.width() || layout.page_height_pt != geometry.height() {
            return Err(Error::InvalidState(format!(
                "document pages are {}x{} pt but the layout is for {}x{} pt pages",
                layout.page_width_pt,
                layout.page_height_pt,
                geometry.width(),
                geometry.height()
            )));
        }
        if pairs.is_empty() {
            return Ok(());
        }

        let capacity = self.grid.capacity();
        if capacity == 0 {
            return Err(Error::DegenerateLayout {
                tile_width: self.tile().width(),
                tile_height: self.tile().height(),
                printable_width: geometry.printable_width(),
                printable_height: geometry.printable_height(),
                remaining: pairs.len(),
            });
        }
        verify_assets(pairs)?;

        for (spread, chunk) in pairs.chunks(capacity).enumerate() {
            let first = spread * capacity;
            log::debug!("spread {spread}: cards {first}..{}", first + chunk.len());

            doc.open_page(Face::Front)?;
            let mut backs = Vec::new();
            for (slot, pair) in chunk.iter().enumerate() {
                let anchor = self.grid.front_anchors()[slot];
                doc.draw(self.placement(first + slot, Face::Front, &pair.front, anchor))?;
                if let Some(back) = &pair.back {
                    backs.push((slot, back));
                }
            }
            doc.close_page()?;

            if backs.is_empty() {
                continue;
            }
            doc.open_page(Face::Back)?;
            for (slot, back) in backs {
                let anchor = self.grid.back_anchors()[slot];
                doc.draw(self.placement(first + slot, Face::Back, back, anchor))?;
            }
            doc.close_page()?;
        }
        Ok(())
    }

    fn placement(&self, pair_index: usize, face: Face, src: &Path, anchor: Anchor) -> Placement {
        Placement {
            pair_index,
            face,
            src: src.to_path_buf(),
            x: anchor.x,
            y: anchor.y,
            width: self.tile().width(),
            height: self.tile().height(),
        }
    }
}

/// Convenience: lay out `pairs` on `geometry` with `tile` and seal the result.
pub fn compose(pairs: &[CardImagePair], geometry: &PageGeometry, tile: &Tile) -> Result<Document> {
    DocumentComposer::new(*geometry, *tile)?.compose("card sheets", pairs)
}

fn verify_assets(pairs: &[CardImagePair]) -> Result<()> {
    for (index, pair) in pairs.iter().enumerate() {
        check_file(index, Face::Front, &pair.front)?;
        if let Some(back) = &pair.back {
            check_file(index, Face::Back, back)?;
        }
    }
    Ok(())
}

fn check_file(index: usize, face: Face, path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::missing(
            index,
            face,
            format!("'{}' does not exist or is not a file", path.display()),
        ))
    }
}
