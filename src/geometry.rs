//! Pixel addressing for the two framebuffer planes
//!
//! The planes are `columns * rows` bytes, one bit per pixel, regardless of
//! orientation. What changes with orientation is which axis is packed into
//! bytes:
//!
//! - **0° / 180°**: X is packed. `index = (x >> 3) + y * columns`, bit `7 - x % 8`.
//! - **90° / 270°**: Y is packed. `index = (y >> 3) * rows + x`, bit `7 - y % 8`.
//!
//! Bit 7 is the leftmost (or topmost) pixel of a byte.
//!
//! Logical coordinates are first converted to *map coordinates* by
//! [`Geometry::to_map`]. 180° and 270° complement both axes against the
//! resolution, so they share the byte layout of 0° and 90° respectively; the
//! controller scan direction programmed by the
//! [`Display`](crate::display::Display) turns the pair into two distinct
//! rotations.
//!
//! ## Example
//!
//! ```
//! use ssd1680::{geometry::map, Orientation};
//!
//! // 122x250 panel: 16 bytes per row, 250 rows
//! assert_eq!(map(0, 0, Orientation::Deg0, 16, 250), (0, 7));
//! assert_eq!(map(121, 249, Orientation::Deg0, 16, 250), (3999, 6));
//! ```

use crate::config::{Dimensions, Orientation};

/// Map a pixel in map coordinates to `(byte_index, bit_offset)`
///
/// `x` and `y` must already be complemented for 180°/270° and lie inside the
/// plane; no bounds checking is done here.
///
/// * `columns` - bytes per physical row, `ceil(width / 8)`
/// * `rows` - physical row count
#[inline]
pub fn map(x: u16, y: u16, orientation: Orientation, columns: u16, rows: u16) -> (usize, u8) {
    if orientation.is_transposed() {
        let index = (y as usize >> 3) * rows as usize + x as usize;
        (index, 7 - (y % 8) as u8)
    } else {
        let index = (x as usize >> 3) + y as usize * columns as usize;
        (index, 7 - (x % 8) as u8)
    }
}

/// Addressing model for one panel in one orientation
///
/// Built once per orientation change and used by every drawing call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    dims: Dimensions,
    orientation: Orientation,
}

impl Geometry {
    /// Create the addressing model for a panel and orientation
    pub fn new(dims: Dimensions, orientation: Orientation) -> Self {
        Self { dims, orientation }
    }

    /// Orientation this model addresses
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Physical panel dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Logical `(width, height)`
    pub fn logical_size(&self) -> (u16, u16) {
        self.orientation.logical_size(self.dims)
    }

    /// Whether a logical pixel lies inside the logical resolution
    pub fn contains(&self, x: u16, y: u16) -> bool {
        let (width, height) = self.logical_size();
        x < width && y < height
    }

    /// Convert logical coordinates to map coordinates
    ///
    /// The caller must ensure [`contains`](Self::contains) holds.
    pub fn to_map(&self, x: u16, y: u16) -> (u16, u16) {
        let (width, height) = self.logical_size();
        match self.orientation {
            Orientation::Deg0 | Orientation::Deg90 => (x, y),
            Orientation::Deg180 | Orientation::Deg270 => (width - 1 - x, height - 1 - y),
        }
    }

    /// Byte index and bit offset of a logical pixel
    ///
    /// The caller must ensure [`contains`](Self::contains) holds.
    pub fn locate(&self, x: u16, y: u16) -> (usize, u8) {
        let (mx, my) = self.to_map(x, y);
        map(
            mx,
            my,
            self.orientation,
            self.dims.columns(),
            self.dims.rows,
        )
    }

    /// Physical pixel `(source, gate)` of a logical pixel
    ///
    /// `source` is the pixel column along the source outputs (possibly inside
    /// the padding of the last byte), `gate` is the gate row.
    pub fn to_physical(&self, x: u16, y: u16) -> (u16, u16) {
        let (mx, my) = self.to_map(x, y);
        if self.orientation.is_transposed() {
            (my, self.dims.rows - 1 - mx)
        } else {
            (mx, my)
        }
    }
}
