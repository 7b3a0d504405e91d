//! Draws the miniature layout onto a [`Canvas`].
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ ┌─────────────┐ ┌──────────┐ │  client rectangles, scaled by
//! │ │   master    │ │  slave   │ │  geometry::SCALE and inset by
//! │ │    [ico]    │ │  [ico]   │ │  rect_margin
//! │ └─────────────┘ └──────────┘ │
//! ├──────────────────────────────┤
//! │         vertical-left        │  text strip: font_size + 2 * font_margin
//! └──────────────────────────────┘
//! ```
//!
//! Drawing order is fixed: background, rectangles, icons, label.

use crate::canvas::{recomposite, Canvas};
use crate::config::{Color, OverlayConfig, Palette};
use crate::geometry::{scale, Point, Rect};
use crate::selector::{select_clients, Role};
use crate::traits::{Client, IconSource, Manager};
use ab_glyph::{point, Font, FontArc, FontRef, FontVec, GlyphId, PxScale, ScaleFont};
use log::{error, warn};
use std::path::{Path, PathBuf};

/// Label font compiled into the binary (DejaVu Sans, see `assets/`).
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Upper bound for the font size and the margins, in canvas pixels.
pub const MAX_METRIC: u32 = 1024;

/// Errors from loading the label font.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid font data in {}", .0.display())]
    Invalid(PathBuf),
    #[error("bundled font is invalid")]
    Bundled,
}

/// Load the font at `path`, or the bundled font when no path is given.
pub fn load_font(path: Option<&Path>) -> Result<FontArc, FontError> {
    match path {
        Some(path) => read_font(path),
        None => bundled_font(),
    }
}

fn bundled_font() -> Result<FontArc, FontError> {
    FontRef::try_from_slice(BUNDLED_FONT)
        .map(FontArc::from)
        .map_err(|_| FontError::Bundled)
}

fn read_font(path: &Path) -> Result<FontArc, FontError> {
    let bytes = std::fs::read(path).map_err(|source| FontError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FontVec::try_from_vec(bytes)
        .map(FontArc::from)
        .map_err(|_| FontError::Invalid(path.to_path_buf()))
}

/// The configured font, or the bundled one if it cannot be used.
fn label_font(path: Option<&Path>) -> Option<FontArc> {
    if let Some(path) = path {
        match read_font(path) {
            Ok(font) => return Some(font),
            Err(e) => warn!("{}, using the bundled font", e),
        }
    }
    match bundled_font() {
        Ok(font) => Some(font),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

fn clamp_metric(name: &str, value: u32) -> u32 {
    if value > MAX_METRIC {
        warn!("{} {} is too large, using {}", name, value, MAX_METRIC);
        MAX_METRIC
    } else {
        value
    }
}

/// Horizontal advance of `text` at `size` pixels, including kerning.
pub fn text_width<F: Font>(font: &F, size: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0;
    let mut previous: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(previous) = previous {
            width += scaled.kern(previous, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Composites layout overlays with fixed margins and colors.
#[derive(Debug, Clone)]
pub struct Compositor {
    font_size: u32,
    font_margin: u32,
    rect_margin: u32,
    font: Option<FontArc>,
    palette: Palette,
}

impl Compositor {
    pub fn new(config: &OverlayConfig, palette: Palette) -> Self {
        Self {
            font_size: clamp_metric("font_size", config.font_size),
            font_margin: clamp_metric("font_margin", config.font_margin),
            rect_margin: clamp_metric("rect_margin", config.rect_margin),
            font: label_font(config.font_path.as_deref()),
            palette,
        }
    }

    fn text_strip_height(&self) -> u32 {
        self.font_size + 2 * self.font_margin
    }

    /// Canvas size for `desktop`: the scaled desktop plus the rectangle
    /// margin, plus the text strip below it.
    pub fn canvas_size(&self, desktop: Rect) -> (u32, u32) {
        let (_, _, width, height) = scale(desktop.x, desktop.y, desktop.width, desktop.height);
        (
            (width.max(0) as u32).saturating_add(self.rect_margin),
            (height.max(0) as u32)
                .saturating_add(self.text_strip_height())
                .saturating_add(self.rect_margin),
        )
    }

    /// An empty canvas for `desktop`, filled with the background color.
    pub fn new_canvas(&self, desktop: Rect) -> Canvas {
        let (width, height) = self.canvas_size(desktop);
        Canvas::new(width, height, self.palette.background)
    }

    fn role_color(&self, role: Role) -> Color {
        match role {
            Role::Master => self.palette.client_master,
            Role::Slave => self.palette.client_slave,
        }
    }

    /// Draw one rectangle per selected client, with its icon if one exists.
    ///
    /// Without any client, a single slave-colored rectangle covers the whole
    /// scaled desktop.
    pub fn draw_clients<M, I>(
        &self,
        canvas: &mut Canvas,
        manager: &M,
        layout: &str,
        desktop: Rect,
        icons: &I,
    ) where
        M: Manager,
        I: IconSource + ?Sized,
    {
        let margin = self.rect_margin as i32;
        let selected = select_clients(manager, layout);

        if selected.is_empty() {
            let (x, y, width, height) = scale(0, 0, desktop.width, desktop.height);
            let color = self.role_color(Role::Slave);
            canvas.fill_rect(x + margin, y + margin, x + width, y + height, color);
            return;
        }

        for (client, role) in selected {
            let r = client.outer_geometry().relative_to(desktop.origin()).scaled();
            let color = self.role_color(role);
            canvas.fill_rect(r.x + margin, r.y + margin, r.x + r.width, r.y + r.height, color);

            let icon_size = r.width.min(r.height) / 2;
            if icon_size <= 0 {
                continue;
            }
            let size = icon_size as u32;
            if let Some(icon) = icons.find_icon(client.window_id(), size, size) {
                let icon = recomposite(&icon, color);
                let x0 = r.x + margin / 2 + r.width / 2 - icon_size / 2;
                let y0 = r.y + margin / 2 + r.height / 2 - icon_size / 2;
                canvas.blit(x0, y0, r.x + r.width, r.y + r.height, &icon);
            }
        }
    }

    /// Top-left corner of a label `text_width` pixels wide: centered
    /// horizontally, one font margin below the top of the text strip.
    pub fn label_origin(&self, canvas: &Canvas, text_width: i32) -> Point {
        let strip_top = canvas.height() as i32 - self.text_strip_height() as i32;
        Point {
            x: canvas.width() as i32 / 2 - text_width / 2,
            y: strip_top + self.font_margin as i32,
        }
    }

    /// Draw `text` centered in the text strip.
    pub fn draw_label(&self, canvas: &mut Canvas, text: &str) {
        if let Some(font) = &self.font {
            self.draw_text(canvas, font, text);
        }
    }

    fn draw_text<F: Font>(&self, canvas: &mut Canvas, font: &F, text: &str) {
        let size = self.font_size as f32;
        let scale = PxScale::from(size);
        let scaled = font.as_scaled(scale);
        let width = text_width(font, size, text).round() as i32;
        let origin = self.label_origin(canvas, width);
        let color = self.palette.text;

        let mut caret = point(origin.x as f32, origin.y as f32 + scaled.ascent());
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(previous) = previous {
                caret.x += scaled.kern(previous, id);
            }
            let glyph = id.with_scale_and_position(scale, caret);
            caret.x += scaled.h_advance(id);
            previous = Some(id);

            if let Some(outlined) = scaled.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|x, y, coverage| {
                    canvas.blend_pixel(
                        bounds.min.x as i32 + x as i32,
                        bounds.min.y as i32 + y as i32,
                        color,
                        coverage,
                    );
                });
            }
        }
    }

    /// Full pipeline on a fresh canvas: background, clients, label.
    pub fn render<M, I>(&self, manager: &M, layout: &str, desktop: Rect, icons: &I) -> Canvas
    where
        M: Manager,
        I: IconSource + ?Sized,
    {
        let mut canvas = self.new_canvas(desktop);
        self.draw_clients(&mut canvas, manager, layout, desktop, icons);
        self.draw_label(&mut canvas, layout);
        canvas
    }
}
