use anyhow::{anyhow, bail, Context, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{point, Font, Rect, Scale};
use std::path::{Path, PathBuf};

/// A font file on disk and the size to render it at, in pixels per em
#[derive(Debug, Clone, PartialEq)]
pub struct FontSource {
    pub path: PathBuf,
    pub size: f32,
}

impl FontSource {
    pub fn new(path: impl Into<PathBuf>, size: f32) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }
}

/// Load a TrueType font or the first face of a font collection
pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file: {}", path.display()))?;

    Font::try_from_vec_and_index(data, 0)
        .ok_or_else(|| anyhow!("Unsupported font data: {}", path.display()))
}

/// Convert an em size into a rusttype scale, which is the line height
/// (ascent - descent)
pub fn em_scale(font: &Font, size: f32) -> Result<Scale> {
    let units_per_em = font.units_per_em();
    if units_per_em == 0 {
        bail!("Font reports zero units per em");
    }

    let v_metrics = font.v_metrics_unscaled();
    Ok(Scale::uniform(
        size * (v_metrics.ascent - v_metrics.descent) / units_per_em as f32,
    ))
}

/// Render `text` centered on the raster using the given font.
///
/// The text is measured before anything is drawn, so on error the raster is
/// left unchanged. Missing characters, bitmap-only glyphs (no outlines) and
/// unreadable fonts are all reported the same way.
pub fn render_glyph(
    img: &mut RgbImage,
    text: &str,
    source: &FontSource,
    ink: Rgb<u8>,
) -> Result<()> {
    let font = load_font(&source.path)?;

    if let Some(missing) = text.chars().find(|&c| font.glyph(c).id().0 == 0) {
        bail!(
            "Font {} has no glyph for {:?}",
            source.path.display(),
            missing
        );
    }

    let scale = em_scale(&font, source.size)?;
    let bbox = ink_bounds(&font, scale, text)
        .ok_or_else(|| anyhow!("Nothing to draw for {:?} with {}", text, source.path.display()))?;
    let (right, bottom) = text_size(scale, &font, text);

    let x = centered_origin(img.width(), bbox.min.x, right);
    let y = centered_origin(img.height(), bbox.min.y, bottom);
    draw_text_mut(img, ink, x, y, scale, &font, text);

    Ok(())
}

/// Union of the pixel boxes of every glyph that has an outline
fn ink_bounds(font: &Font, scale: Scale, text: &str) -> Option<Rect<i32>> {
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v_metrics.ascent))
        .filter_map(|glyph| glyph.pixel_bounding_box())
        .reduce(union)
}

fn union(a: Rect<i32>, b: Rect<i32>) -> Rect<i32> {
    Rect {
        min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
        max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
    }
}

/// Draw origin that centers the span `min..max` on a canvas of `extent` pixels
fn centered_origin(extent: u32, min: i32, max: i32) -> i32 {
    ((extent as f32 - (max - min) as f32) / 2.0 - min as f32).round() as i32
}
