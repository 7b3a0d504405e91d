//! Off-screen bitmap the overlay is composited into.

use crate::config::Color;
use image::{Pixel, Rgba, RgbaImage};

/// An owned RGBA bitmap with straight alpha.
///
/// Every drawing call clips to the canvas, so callers may pass rectangles
/// that extend past its edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A `width × height` canvas filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, fill),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        *self.image.get_pixel(x, y)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw RGBA bytes, row-major, `4 * width` bytes per row.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Clip `[x0, x1) × [y0, y1)` to the canvas.
    fn clip(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(u32, u32, u32, u32)> {
        let x0 = x0.max(0) as u32;
        let y0 = y0.max(0) as u32;
        let x1 = (x1.max(0) as u32).min(self.width());
        let y1 = (y1.max(0) as u32).min(self.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Overwrite `[x0, x1) × [y0, y1)` with `color`.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(x0, y0, x1, y1) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                self.image.put_pixel(x, y, color);
            }
        }
    }

    /// Copy `src` so its top-left lands at `(x0, y0)`, keeping only the part
    /// inside `[x0, x1) × [y0, y1)`.  Pixels are replaced, not blended.
    pub fn blit(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, src: &RgbaImage) {
        let x1 = x1.min(x0.saturating_add(src.width() as i32));
        let y1 = y1.min(y0.saturating_add(src.height() as i32));
        let Some((cx0, cy0, cx1, cy1)) = self.clip(x0, y0, x1, y1) else {
            return;
        };
        for y in cy0..cy1 {
            for x in cx0..cx1 {
                let sx = (x as i32 - x0) as u32;
                let sy = (y as i32 - y0) as u32;
                self.image.put_pixel(x, y, *src.get_pixel(sx, sy));
            }
        }
    }

    /// Blend `color` over the pixel at `(x, y)` with extra `coverage` in
    /// `[0, 1]`.  Out-of-bounds positions are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let alpha = (color[3] as f32 * coverage.clamp(0.0, 1.0)).round() as u8;
        let src = Rgba([color[0], color[1], color[2], alpha]);
        self.image.get_pixel_mut(x as u32, y as u32).blend(&src);
    }
}

/// Porter-Duff `src over dst` for straight-alpha pixels.
pub fn over(src: Color, dst: Color) -> Color {
    let mut out = dst;
    out.blend(&src);
    out
}

/// Flatten `icon` onto a solid `background`, so translucent icon edges take
/// on the background instead of showing through to whatever lies below.
pub fn recomposite(icon: &RgbaImage, background: Color) -> RgbaImage {
    let mut out = icon.clone();
    for pixel in out.pixels_mut() {
        *pixel = over(*pixel, background);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BG: Color = Rgba([10, 20, 30, 255]);
    const RED: Color = Rgba([255, 0, 0, 255]);

    #[test]
    fn new_fills_every_pixel() {
        let cv = Canvas::new(3, 2, BG);
        assert_eq!((cv.width(), cv.height()), (3, 2));
        assert!(cv.image().pixels().all(|p| *p == BG));
        assert_eq!(cv.as_raw().len(), 3 * 2 * 4);
    }

    #[test]
    fn fill_rect_is_end_exclusive() {
        let mut cv = Canvas::new(10, 10, BG);
        cv.fill_rect(2, 3, 5, 6, RED);
        assert_eq!(cv.pixel(2, 3), RED);
        assert_eq!(cv.pixel(4, 5), RED);
        assert_eq!(cv.pixel(5, 5), BG);
        assert_eq!(cv.pixel(4, 6), BG);
        assert_eq!(cv.pixel(1, 3), BG);
    }

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut cv = Canvas::new(4, 4, BG);
        cv.fill_rect(-5, 2, 100, 100, RED);
        assert_eq!(cv.pixel(0, 2), RED);
        assert_eq!(cv.pixel(3, 3), RED);
        assert_eq!(cv.pixel(0, 1), BG);
        // Degenerate rectangles draw nothing.
        cv.fill_rect(3, 0, 3, 4, Rgba([0, 0, 0, 0]));
        cv.fill_rect(2, 2, 1, 1, Rgba([0, 0, 0, 0]));
        assert_eq!(cv.pixel(3, 0), BG);
    }

    #[test]
    fn blit_clips_to_destination_rect() {
        let mut cv = Canvas::new(10, 10, BG);
        let icon = RgbaImage::from_pixel(4, 4, RED);
        cv.blit(2, 2, 4, 10, &icon);
        assert_eq!(cv.pixel(2, 2), RED);
        assert_eq!(cv.pixel(3, 5), RED);
        assert_eq!(cv.pixel(4, 2), BG, "clipped by x1");
        assert_eq!(cv.pixel(2, 6), BG, "limited by source height");
    }

    #[test]
    fn blit_maps_source_offsets() {
        let mut cv = Canvas::new(5, 5, BG);
        let mut icon = RgbaImage::from_pixel(2, 2, BG);
        icon.put_pixel(1, 1, RED);
        cv.blit(-1, -1, 5, 5, &icon);
        assert_eq!(cv.pixel(0, 0), RED);
        assert_eq!(cv.pixel(1, 1), BG);
    }

    #[test]
    fn over_respects_alpha() {
        assert_eq!(over(RED, BG), RED);
        assert_eq!(over(Rgba([255, 0, 0, 0]), BG), BG);
        let half = over(Rgba([255, 255, 255, 128]), Rgba([0, 0, 0, 255]));
        assert!(half[3] >= 254);
        assert!((126..=129).contains(&half[0]));
    }

    #[test]
    fn recomposite_produces_opaque_icon() {
        let mut icon = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 0]));
        icon.put_pixel(1, 0, RED);
        let out = recomposite(&icon, BG);
        assert_eq!(*out.get_pixel(0, 0), BG);
        assert_eq!(*out.get_pixel(1, 0), RED);
    }

    #[test]
    fn blend_pixel_ignores_out_of_bounds() {
        let mut cv = Canvas::new(2, 2, BG);
        cv.blend_pixel(-1, 0, RED, 1.0);
        cv.blend_pixel(2, 0, RED, 1.0);
        cv.blend_pixel(1, 1, RED, 1.0);
        assert_eq!(cv.pixel(1, 1), RED);
        assert_eq!(cv.pixel(0, 0), BG);
    }
}
