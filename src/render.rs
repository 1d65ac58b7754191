//! PDF renderer – takes a [`DocumentLayout`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).

use std::collections::HashMap;
use std::path::Path;

use printpdf::*;

use crate::error::{Error, Face, Result};
use crate::layout_config::{DocumentLayout, Placement};

/// A printpdf XObject together with the pixel dimensions of the source image.
struct ImageResource {
    xobj_id: XObjectId,
    px_width: u32,
    px_height: u32,
}

/// Render a DocumentLayout into PDF bytes.
///
/// Every referenced image is read from disk once and embedded as a reusable
/// XObject. An image that cannot be read or decoded aborts rendering with a
/// [`Error::MissingAsset`] naming the first card that uses it.
pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>> {
    let page_w = Mm(layout.page_width_pt * 0.352778); // pt → mm
    let page_h = Mm(layout.page_height_pt * 0.352778);

    let mut doc = PdfDocument::new(&layout.title);

    // ── Pre-register all images ────────────────────────────────────────────
    let mut first_use: Vec<(&Path, usize, Face)> = Vec::new();
    for page in &layout.pages {
        for placement in &page.placements {
            let src = placement.src.as_path();
            if !first_use.iter().any(|(p, _, _)| *p == src) {
                first_use.push((src, placement.pair_index, placement.face));
            }
        }
    }

    let mut image_resources: HashMap<&Path, ImageResource> = HashMap::new();
    let mut img_warnings: Vec<PdfWarnMsg> = Vec::new();

    for (src, index, face) in first_use {
        let resource = load_image(&mut doc, src, &mut img_warnings)
            .map_err(|detail| Error::missing(index, face, detail))?;
        image_resources.insert(src, resource);
    }
    if !img_warnings.is_empty() {
        log::warn!("{} warning(s) while embedding images", img_warnings.len());
    }

    // ── Render pages ──────────────────────────────────────────────────────
    let mut pages = Vec::new();

    for page_layout in &layout.pages {
        let mut ops = Vec::new();

        for placement in &page_layout.placements {
            if let Some(res) = image_resources.get(placement.src.as_path()) {
                render_placement(&mut ops, placement, layout.page_height_pt, res);
            }
        }

        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // A PDF needs at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let bytes = doc.save(&PdfSaveOptions::default(), &mut Vec::new());

    Ok(bytes)
}

/// Read, measure and register one image file.
fn load_image(
    doc: &mut PdfDocument,
    src: &Path,
    warnings: &mut Vec<PdfWarnMsg>,
) -> std::result::Result<ImageResource, String> {
    let bytes = std::fs::read(src).map_err(|e| format!("cannot read '{}': {e}", src.display()))?;

    // Decode with the `image` crate to obtain pixel dimensions.
    let dyn_img = ::image::load_from_memory(&bytes)
        .map_err(|e| format!("cannot decode '{}': {e}", src.display()))?;
    let (px_width, px_height) = (dyn_img.width(), dyn_img.height());

    // Register with printpdf as a reusable XObject.
    let raw = RawImage::decode_from_bytes(&bytes, warnings)
        .map_err(|e| format!("cannot embed '{}': {e}", src.display()))?;
    let xobj_id = doc.add_image(&raw);

    Ok(ImageResource {
        xobj_id,
        px_width,
        px_height,
    })
}

/// Emit the ops that draw one image stretched over its tile.
fn render_placement(
    ops: &mut Vec<Op>,
    placement: &Placement,
    page_height: f32,
    res: &ImageResource,
) {
    // PDF origin is bottom-left; our layout origin is top-left.
    // translate_y = bottom edge of image in PDF coordinates.
    let img_bottom_y = page_height - placement.y - placement.height;

    // At dpi=72 printpdf renders 1 px = 1 pt, so
    // scale = desired_pt / px_dim.
    let scale_x = if res.px_width > 0 {
        placement.width / res.px_width as f32
    } else {
        1.0
    };
    let scale_y = if res.px_height > 0 {
        placement.height / res.px_height as f32
    } else {
        1.0
    };

    ops.push(Op::UseXobject {
        id: res.xobj_id.clone(),
        transform: XObjectTransform {
            translate_x: Some(Pt(placement.x)),
            translate_y: Some(Pt(img_bottom_y)),
            dpi: Some(72.0),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            rotate: None,
        },
    });
}
