use crate::glyph::{render_glyph, FontSource};
use crate::shapes::{draw_arc, draw_ellipse, draw_line, BoundingBox};
use anyhow::{anyhow, Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType, PngEncoder},
    ColorType, ImageEncoder, Rgb, RgbImage,
};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    str::FromStr,
};

pub const DEFAULT_OUTPUT: &str = "/home/user/almoji/Almoji.alfredworkflow/icon.png";
pub const ICON_SIZE: u32 = 256;
pub const EMOJI: &str = "😊";

const APPLE_COLOR_EMOJI: &str = "/System/Library/Fonts/Apple Color Emoji.ttc";
const DEJAVU_SANS: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

const BACKGROUND: &str = "#ffffff";
const GRADIENT_CENTER: &str = "#8a2be2";
const GRADIENT_EDGE: &str = "#6495ed";
const OUTLINE: &str = "#ffffff";
const FACE: &str = "#ffd700";
const FEATURES: &str = "#000000";

/// Colors used by the icon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgb<u8>,
    pub gradient_center: Rgb<u8>,
    pub gradient_edge: Rgb<u8>,
    /// Border, magnifying glass, glyph ink and face outline
    pub outline: Rgb<u8>,
    pub face: Rgb<u8>,
    /// Eyes and smile
    pub features: Rgb<u8>,
}

impl Palette {
    pub fn from_css() -> Result<Self> {
        Ok(Self {
            background: parse_color(BACKGROUND)?,
            gradient_center: parse_color(GRADIENT_CENTER)?,
            gradient_edge: parse_color(GRADIENT_EDGE)?,
            outline: parse_color(OUTLINE)?,
            face: parse_color(FACE)?,
            features: parse_color(FEATURES)?,
        })
    }
}

/// Parse a CSS color string into an opaque RGB pixel
pub fn parse_color(color: &str) -> Result<Rgb<u8>> {
    let srgb = css_color::Srgb::from_str(color)
        .map_err(|_| anyhow!("Invalid CSS color: {}", color))?;

    Ok(Rgb([
        to_channel(srgb.red),
        to_channel(srgb.green),
        to_channel(srgb.blue),
    ]))
}

fn to_channel(value: f32) -> u8 {
    (value * 255.).round().clamp(0., 255.) as u8
}

/// One way of drawing the mark in the middle of the icon.
///
/// Strategies are tried in order and the first one that succeeds is kept.
#[derive(Debug, Clone, PartialEq)]
pub enum Emblem {
    Glyph(FontSource),
    Face,
}

/// Everything a run needs, fixed at construction
#[derive(Debug, Clone)]
pub struct IconConfig {
    pub palette: Palette,
    pub text: String,
    pub emblems: Vec<Emblem>,
    pub output: PathBuf,
}

impl IconConfig {
    pub fn new(output: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            palette: Palette::from_css().context("Invalid built-in palette")?,
            text: EMOJI.to_string(),
            emblems: default_emblems(),
            output: output.into(),
        })
    }

    pub fn with_emblems(mut self, emblems: Vec<Emblem>) -> Self {
        self.emblems = emblems;
        self
    }
}

/// Color emoji font first, then a common system font, then the hand-drawn face
pub fn default_emblems() -> Vec<Emblem> {
    vec![
        Emblem::Glyph(FontSource::new(APPLE_COLOR_EMOJI, 120.0)),
        Emblem::Glyph(FontSource::new(DEJAVU_SANS, 100.0)),
        Emblem::Face,
    ]
}

pub fn generate_icon(config: &IconConfig) -> Result<()> {
    let raster = render_icon(config);
    save(&raster, &config.output)?;

    log::info!("Wrote icon to {}", config.output.display());
    Ok(())
}

/// Draw the complete icon in memory
pub fn render_icon(config: &IconConfig) -> RgbImage {
    let palette = &config.palette;
    let size = ICON_SIZE as f32;

    let mut raster = RgbImage::from_pixel(ICON_SIZE, ICON_SIZE, palette.background);

    paint_gradient(&mut raster, palette.gradient_center, palette.gradient_edge);
    draw_border(
        &mut raster,
        [20., 20., size - 20., size - 20.],
        palette.outline,
        8,
    );

    let emblem = draw_emblem(&mut raster, &config.text, &config.emblems, palette);
    log::info!("Center emblem: {:?}", emblem);

    draw_magnifying_glass(&mut raster, (185., 185.), 40., palette.outline, 6);

    raster
}

/// Fill the inscribed disc with a radial gradient from `center` to `edge`.
///
/// Pixels at or beyond the radius keep their current color.
pub fn paint_gradient(raster: &mut RgbImage, center: Rgb<u8>, edge: Rgb<u8>) {
    let half_w = raster.width() as f64 / 2.0;
    let half_h = raster.height() as f64 / 2.0;
    let radius = half_w.min(half_h);

    for (i, j, pixel) in raster.enumerate_pixels_mut() {
        let dx = i as f64 - half_w;
        let dy = j as f64 - half_h;
        let distance = (dx * dx + dy * dy).sqrt();

        if distance < radius {
            *pixel = interpolate(center, edge, distance / radius);
        }
    }
}

/// Linear interpolation per channel, truncated toward zero
pub fn interpolate(from: Rgb<u8>, to: Rgb<u8>, ratio: f64) -> Rgb<u8> {
    Rgb(std::array::from_fn(|c| {
        let start = from[c] as f64;
        let end = to[c] as f64;
        (start + (end - start) * ratio) as u8
    }))
}

pub fn draw_border(
    raster: &mut RgbImage,
    bbox: BoundingBox,
    color: Rgb<u8>,
    stroke_width: u32,
) {
    draw_ellipse(raster, bbox, None, Some((color, stroke_width)));
}

/// Run the emblem strategies in order and return the one that was drawn.
///
/// Failures are only logged. The face is drawn when every strategy fails.
pub fn draw_emblem(
    raster: &mut RgbImage,
    text: &str,
    emblems: &[Emblem],
    palette: &Palette,
) -> Emblem {
    for emblem in emblems {
        let attempt = match emblem {
            Emblem::Glyph(source) => render_glyph(raster, text, source, palette.outline),
            Emblem::Face => {
                draw_fallback_face(raster, palette);
                Ok(())
            }
        };

        match attempt {
            Ok(()) => return emblem.clone(),
            Err(err) => log::debug!("Skipping {:?}: {:#}", emblem, err),
        }
    }

    draw_fallback_face(raster, palette);
    Emblem::Face
}

/// Smiley face used when no font can draw the emoji
pub fn draw_fallback_face(raster: &mut RgbImage, palette: &Palette) {
    let size = raster.width() as f32;

    draw_ellipse(
        raster,
        [40., 40., size - 40., size - 40.],
        Some(palette.face),
        Some((palette.outline, 4)),
    );

    let eye_size = 20.;
    for (x, y) in [(80., 90.), (156., 90.)] {
        draw_ellipse(
            raster,
            [x, y, x + eye_size, y + eye_size],
            Some(palette.features),
            None,
        );
    }

    draw_arc(
        raster,
        [70., 70., size - 70., size - 70.],
        0.,
        180.,
        palette.features,
        8,
    );
}

/// Lens outline with a handle leaving its lower-right edge
pub fn draw_magnifying_glass(
    raster: &mut RgbImage,
    position: (f32, f32),
    size: f32,
    color: Rgb<u8>,
    stroke_width: u32,
) {
    let (x, y) = position;
    draw_ellipse(
        raster,
        [x, y, x + size, y + size],
        None,
        Some((color, stroke_width)),
    );
    draw_line(
        raster,
        (x + size - 8., y + size - 8.),
        (x + size + 10., y + size + 10.),
        color,
        stroke_width,
    );
}

// Encode the raster as an RGB PNG with the best compression
pub fn encode_png(raster: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(
            raster.as_raw(),
            raster.width(),
            raster.height(),
            ColorType::Rgb8,
        )
        .context("Failed to encode PNG")?;
    Ok(buf)
}

pub fn save(raster: &RgbImage, path: &Path) -> Result<()> {
    let png = encode_png(raster)?;

    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file: {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    out_file
        .write_all(&png)
        .with_context(|| format!("Failed to write PNG file: {}", path.display()))?;
    out_file.flush()?;

    Ok(())
}
