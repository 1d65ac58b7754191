//! Tiling – how many tiles fit a page, where each one goes, and where its
//! back lands once the sheet is flipped for duplex printing.
//!
//! Coordinates use a top-left origin with y growing downward. Leftover space
//! on each axis is split evenly into one gap per tile: half a gap before the
//! first tile, a full gap between neighbours and half a gap after the last.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::{PageGeometry, Tile};

/// Upper bound on tiles per page; anything larger is not a printable layout.
pub const MAX_TILES_PER_PAGE: usize = 10_000;

/// Top-left placement coordinate of one tile, in whole points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    fn truncated(x: f32, y: f32) -> Self {
        Self {
            x: x.trunc(),
            y: y.trunc(),
        }
    }
}

/// Result of one layout computation. Front and back anchors are index-aligned
/// and ordered row-major (left to right, then top to bottom).
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    geometry: PageGeometry,
    tile: Tile,
    columns: usize,
    rows: usize,
    column_gap: f32,
    row_gap: f32,
    front: Vec<Anchor>,
    back: Vec<Anchor>,
}

impl TileGrid {
    fn empty(geometry: PageGeometry, tile: Tile) -> Self {
        Self {
            geometry,
            tile,
            columns: 0,
            rows: 0,
            column_gap: 0.0,
            row_gap: 0.0,
            front: Vec::new(),
            back: Vec::new(),
        }
    }

    /// Page the grid was computed for.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn tile(&self) -> &Tile {
        &self.tile
    }

    /// Number of tiles per page.
    pub fn capacity(&self) -> usize {
        self.front.len()
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn column_gap(&self) -> f32 {
        self.column_gap
    }

    pub fn row_gap(&self) -> f32 {
        self.row_gap
    }

    pub fn front_anchors(&self) -> &[Anchor] {
        &self.front
    }

    pub fn back_anchors(&self) -> &[Anchor] {
        &self.back
    }
}

/// Lay `tile` out on `geometry`.
///
/// A tile that does not fit the printable area even once yields an empty
/// grid; deciding whether that is an error is left to the caller. A grid of
/// more than [`MAX_TILES_PER_PAGE`] tiles is rejected as `InvalidGeometry`.
pub fn compute_grid(geometry: &PageGeometry, tile: &Tile) -> Result<TileGrid> {
    let printable_w = geometry.printable_width();
    let printable_h = geometry.printable_height();

    let columns = (printable_w / tile.width()).floor() as usize;
    let rows = (printable_h / tile.height()).floor() as usize;
    if columns == 0 || rows == 0 {
        log::debug!(
            "{}x{} pt tile does not fit {}x{} pt printable area",
            tile.width(),
            tile.height(),
            printable_w,
            printable_h
        );
        return Ok(TileGrid::empty(*geometry, *tile));
    }
    let capacity = columns
        .checked_mul(rows)
        .filter(|&n| n <= MAX_TILES_PER_PAGE)
        .ok_or_else(|| {
            Error::InvalidGeometry(format!(
                "{}x{} pt tile gives a {columns}x{rows} grid \
                 (limit {MAX_TILES_PER_PAGE} tiles per page)",
                tile.width(),
                tile.height()
            ))
        })?;

    let column_gap = (printable_w - columns as f32 * tile.width()) / columns as f32;
    let row_gap = (printable_h - rows as f32 * tile.height()) / rows as f32;
    let cell_w = tile.width() + column_gap;
    let cell_h = tile.height() + row_gap;
    let origin_x = geometry.margin() + column_gap / 2.0;
    let origin_y = geometry.margin() + row_gap / 2.0;

    let mut front = Vec::with_capacity(capacity);
    let mut back = Vec::with_capacity(capacity);
    for r in 0..rows {
        for c in 0..columns {
            let x = origin_x + c as f32 * cell_w;
            let y = origin_y + r as f32 * cell_h;
            let anchor = Anchor::truncated(x, y);
            // The sheet turns over its horizontal edge, so the back of a
            // tile sits at the same x, mirrored top-to-bottom.
            let mirrored_y = geometry.height() - anchor.y - tile.height();
            let mirrored = Anchor::truncated(anchor.x, mirrored_y);
            front.push(anchor);
            back.push(mirrored);
        }
    }

    log::debug!(
        "grid {columns}x{rows} (column gap {column_gap:.2} pt, row gap {row_gap:.2} pt)"
    );

    Ok(TileGrid {
        geometry: *geometry,
        tile: *tile,
        columns,
        rows,
        column_gap,
        row_gap,
        front,
        back,
    })
}

/// Exact-value key for memoising grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GridKey([u32; 5]);

impl GridKey {
    fn new(geometry: &PageGeometry, tile: &Tile) -> Self {
        Self([
            geometry.width().to_bits(),
            geometry.height().to_bits(),
            geometry.margin().to_bits(),
            tile.width().to_bits(),
            tile.height().to_bits(),
        ])
    }
}

/// Memoises [`compute_grid`] by (geometry, tile).
#[derive(Debug, Default)]
pub struct GridCache {
    grids: HashMap<GridKey, Arc<TileGrid>>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(&mut self, geometry: &PageGeometry, tile: &Tile) -> Result<Arc<TileGrid>> {
        let key = GridKey::new(geometry, tile);
        if let Some(grid) = self.grids.get(&key) {
            return Ok(Arc::clone(grid));
        }
        let grid = Arc::new(compute_grid(geometry, tile)?);
        self.grids.insert(key, Arc::clone(&grid));
        Ok(grid)
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }
}
