//! Pixel drawing primitives for the icon raster.
//!
//! Circles and arcs are inscribed in a bounding box `[x0, y0, x1, y1]`.
//! Fills and wide lines go through `imageproc`; thick outline rings and arcs
//! have no counterpart there and are rasterized here. Everything clips
//! silently at the raster edge.

use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{
        draw_filled_circle_mut, draw_filled_ellipse_mut, draw_line_segment_mut, draw_polygon_mut,
    },
    point::Point,
};

pub type BoundingBox = [f32; 4];

#[derive(Debug, Clone, Copy)]
struct Ellipse {
    cx: f32,
    cy: f32,
    rx: f32,
    ry: f32,
}

impl Ellipse {
    fn inscribed(bbox: BoundingBox) -> Self {
        let [x0, y0, x1, y1] = bbox;
        Self {
            cx: (x0 + x1) / 2.0,
            cy: (y0 + y1) / 2.0,
            rx: (x1 - x0) / 2.0,
            ry: (y1 - y0) / 2.0,
        }
    }

    /// Whether `(x, y)` lies inside the ellipse after shrinking both radii by `inset`.
    fn contains(&self, x: f32, y: f32, inset: f32) -> bool {
        let rx = self.rx - inset;
        let ry = self.ry - inset;
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let nx = (x - self.cx) / rx;
        let ny = (y - self.cy) / ry;
        nx * nx + ny * ny <= 1.0
    }

    fn in_ring(&self, x: f32, y: f32, width: f32) -> bool {
        self.contains(x, y, 0.0) && !self.contains(x, y, width)
    }
}

/// Inclusive pixel range covering `[lo, hi]`, clipped to `0..limit`.
fn clip(lo: f32, hi: f32, limit: u32) -> std::ops::RangeInclusive<u32> {
    let lo = lo.floor().max(0.0) as u32;
    let hi = hi.ceil().min(limit as f32 - 1.0);
    if hi < 0.0 {
        // Empty range
        return 1..=0;
    }
    lo..=hi as u32
}

/// Draw an ellipse inscribed in `bbox`.
///
/// The fill covers the interior, then the outline ring of the given width is
/// painted on top of it.
pub fn draw_ellipse(
    img: &mut RgbImage,
    bbox: BoundingBox,
    fill: Option<Rgb<u8>>,
    outline: Option<(Rgb<u8>, u32)>,
) {
    let ellipse = Ellipse::inscribed(bbox);

    if let Some(color) = fill {
        // The ring covers everything past the inset radii
        let inset = outline.map_or(0.0, |(_, width)| width as f32);
        let (rx, ry) = (ellipse.rx - inset, ellipse.ry - inset);
        if rx > 0.0 && ry > 0.0 {
            draw_filled_ellipse_mut(
                img,
                (ellipse.cx.round() as i32, ellipse.cy.round() as i32),
                rx.round() as i32,
                ry.round() as i32,
                color,
            );
        }
    }

    if let Some((color, width)) = outline {
        let [x0, y0, x1, y1] = bbox;
        for y in clip(y0, y1, img.height()) {
            for x in clip(x0, x1, img.width()) {
                if ellipse.in_ring(x as f32, y as f32, width as f32) {
                    img.put_pixel(x, y, color);
                }
            }
        }
    }
}

/// Draw the part of an ellipse outline between two angles.
///
/// Angles are in degrees, measured clockwise from three o'clock (the y axis
/// points down), so `0..=180` is the lower half.
pub fn draw_arc(
    img: &mut RgbImage,
    bbox: BoundingBox,
    start_deg: f32,
    end_deg: f32,
    color: Rgb<u8>,
    width: u32,
) {
    let ellipse = Ellipse::inscribed(bbox);
    let [x0, y0, x1, y1] = bbox;

    for y in clip(y0, y1, img.height()) {
        for x in clip(x0, x1, img.width()) {
            let (px, py) = (x as f32, y as f32);
            if !ellipse.in_ring(px, py, width as f32) {
                continue;
            }

            let angle = (py - ellipse.cy)
                .atan2(px - ellipse.cx)
                .to_degrees()
                .rem_euclid(360.0);
            if angle >= start_deg && angle <= end_deg {
                img.put_pixel(x, y, color);
            }
        }
    }
}

/// Draw a straight segment of the given width with flat ends.
pub fn draw_line(
    img: &mut RgbImage,
    from: (f32, f32),
    to: (f32, f32),
    color: Rgb<u8>,
    width: u32,
) {
    if width <= 1 {
        draw_line_segment_mut(img, from, to, color);
        return;
    }

    let half = width as f32 / 2.0;
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        let center = (from.0.round() as i32, from.1.round() as i32);
        draw_filled_circle_mut(img, center, half.round() as i32, color);
        return;
    }

    // Offset both ends along the normal to get the stroke rectangle
    let (nx, ny) = (-dy / length * half, dx / length * half);
    let corner = |(x, y): (f32, f32), sign: f32| {
        Point::new((x + sign * nx).round() as i32, (y + sign * ny).round() as i32)
    };
    let stroke = [
        corner(from, 1.0),
        corner(to, 1.0),
        corner(to, -1.0),
        corner(from, -1.0),
    ];
    draw_polygon_mut(img, &stroke, color);
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const GOLD: Rgb<u8> = Rgb([255, 215, 0]);

    fn canvas(size: u32) -> RgbImage {
        RgbImage::from_pixel(size, size, BLACK)
    }

    #[test]
    fn outline_only_leaves_interior_untouched() {
        let mut img = canvas(21);
        draw_ellipse(&mut img, [0.0, 0.0, 20.0, 20.0], None, Some((WHITE, 2)));

        assert_eq!(*img.get_pixel(10, 0), WHITE);
        assert_eq!(*img.get_pixel(10, 1), WHITE);
        assert_eq!(*img.get_pixel(10, 2), BLACK);
        assert_eq!(*img.get_pixel(10, 10), BLACK);
        // Corners lie outside the circle
        assert_eq!(*img.get_pixel(0, 0), BLACK);
    }

    #[test]
    fn fill_sits_under_outline() {
        let mut img = canvas(21);
        draw_ellipse(
            &mut img,
            [0.0, 0.0, 20.0, 20.0],
            Some(GOLD),
            Some((WHITE, 2)),
        );

        assert_eq!(*img.get_pixel(10, 10), GOLD);
        assert_eq!(*img.get_pixel(10, 5), GOLD);
        assert_eq!(*img.get_pixel(20, 10), WHITE);
    }

    #[test]
    fn lower_half_arc() {
        let mut img = canvas(21);
        draw_arc(&mut img, [0.0, 0.0, 20.0, 20.0], 0.0, 180.0, WHITE, 2);

        assert_eq!(*img.get_pixel(10, 19), WHITE);
        assert_eq!(*img.get_pixel(10, 1), BLACK);
        assert_eq!(*img.get_pixel(10, 10), BLACK);
    }

    #[test]
    fn wide_line_has_flat_ends() {
        let mut img = canvas(20);
        draw_line(&mut img, (2.0, 2.0), (17.0, 17.0), WHITE, 2);

        assert_eq!(*img.get_pixel(10, 10), WHITE);
        assert_eq!(*img.get_pixel(2, 2), WHITE);
        assert_eq!(*img.get_pixel(1, 1), BLACK);
        assert_eq!(*img.get_pixel(10, 2), BLACK);
    }

    #[test]
    fn thick_horizontal_line_spans_its_width() {
        let mut img = canvas(20);
        draw_line(&mut img, (2.0, 10.0), (17.0, 10.0), WHITE, 4);

        for y in 8..=12 {
            assert_eq!(*img.get_pixel(10, y), WHITE, "row {y}");
        }
        assert_eq!(*img.get_pixel(10, 6), BLACK);
        assert_eq!(*img.get_pixel(0, 10), BLACK);
    }

    #[test]
    fn hairline_is_one_pixel_wide() {
        let mut img = canvas(10);
        draw_line(&mut img, (0.0, 4.0), (9.0, 4.0), WHITE, 1);

        assert!((1..9).all(|x| *img.get_pixel(x, 4) == WHITE));
        assert!((0..10).all(|x| *img.get_pixel(x, 3) == BLACK));
    }

    #[test]
    fn shapes_clip_at_the_edge() {
        let mut img = canvas(10);
        draw_ellipse(&mut img, [-20.0, -20.0, 40.0, 40.0], Some(GOLD), None);
        draw_line(&mut img, (-5.0, 5.0), (30.0, 5.0), WHITE, 3);
        draw_arc(&mut img, [50.0, 50.0, 80.0, 80.0], 0.0, 360.0, WHITE, 4);

        assert_eq!(*img.get_pixel(0, 0), GOLD);
        assert_eq!(*img.get_pixel(9, 5), WHITE);
    }
}
