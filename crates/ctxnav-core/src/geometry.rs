#![forbid(unsafe_code)]

//! Geometric primitives shared by surfaces and layout queries.

/// A rectangle describing the bounds of a renderable surface.
///
/// Uses terminal coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// First row below the rectangle; saturates at `u16::MAX`.
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Translate an absolute row into a row relative to this rectangle.
    ///
    /// Returns `None` when the row lies outside the rectangle.
    #[inline]
    pub const fn relative_row(&self, y: u16) -> Option<u16> {
        if y >= self.y && y < self.bottom() {
            Some(y - self.y)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_saturates() {
        let r = Rect::new(0, u16::MAX - 1, 10, 10);
        assert_eq!(r.bottom(), u16::MAX);
        assert_eq!(r.relative_row(u16::MAX - 1), Some(0));
    }

    #[test]
    fn relative_row_is_half_open() {
        let r = Rect::new(0, 5, 10, 4);
        assert_eq!(r.relative_row(5), Some(0));
        assert_eq!(r.relative_row(8), Some(3));
        assert_eq!(r.relative_row(9), None);
        assert_eq!(r.relative_row(4), None);
    }
}
