//! Desktop and overlay coordinates.
//!
//! Real desktop pixels are mapped onto the overlay canvas by integer
//! division through [`SCALE`].  Callers subtract the desktop origin before
//! scaling so on-desktop geometry never scales to a negative position.

/// Divisor between real desktop pixels and overlay canvas pixels.
pub const SCALE: i32 = 10;

/// A point in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// An axis-aligned rectangle: origin plus size, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// This rectangle expressed relative to `origin`.
    pub fn relative_to(&self, origin: Point) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }

    /// Whether `point` lies inside, with the right and bottom edges excluded.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x.saturating_add(self.width)
            && point.y < self.y.saturating_add(self.height)
    }

    /// This rectangle in overlay canvas coordinates.
    pub fn scaled(&self) -> Self {
        let (x, y, width, height) = scale(self.x, self.y, self.width, self.height);
        Self::new(x, y, width, height)
    }
}

/// Scale real desktop geometry down to canvas geometry.
///
/// Plain integer division (truncating) of all four inputs by [`SCALE`].
pub fn scale(x: i32, y: i32, w: i32, h: i32) -> (i32, i32, i32, i32) {
    (x / SCALE, y / SCALE, w / SCALE, h / SCALE)
}

/// Find the output containing the screen position `origin`.
///
/// Returns the output's index in `outputs` and `origin` relative to that
/// output's top-left corner, or `None` when no output contains it.
pub fn place_on(outputs: &[Rect], origin: Point) -> Option<(usize, Point)> {
    outputs
        .iter()
        .position(|output| output.contains(origin))
        .map(|i| {
            let output = outputs[i];
            (
                i,
                Point {
                    x: origin.x - output.x,
                    y: origin.y - output.y,
                },
            )
        })
}
