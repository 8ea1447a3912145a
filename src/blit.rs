//! Unaligned bit-blit into a framebuffer plane
//!
//! [`blit`] paints an inclusive rectangle of a plane from a packed 1-bit
//! source. The source is row-major, MSB-first, with each row padded to
//! `ceil(width / 8)` bytes of the *rectangle's* width, not the plane's.
//!
//! Processing order per source byte is fixed: value inversion, then bit-order
//! reversal, then the shift into destination position. For 90° and 270° the
//! source is transposed (and for 180°/270° mirrored) into map space before
//! any shifting, so the merge below always runs along the plane's packed axis.
//!
//! Each destination byte is one of four spans:
//!
//! | Span       | Source bytes | Merge                              |
//! |------------|--------------|------------------------------------|
//! | `First`    | 1            | keep the leading out-of-rect bits  |
//! | `Last`     | 1 or 2       | keep the trailing out-of-rect bits |
//! | `Only`     | 1 or 2       | keep bits on both sides            |
//! | `Interior` | 1 or 2       | overwrite                          |

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;

use crate::config::Orientation;
use crate::geometry::Geometry;

/// `LOW_BITS[n]` has the low `n` bits set
const LOW_BITS: [u8; 9] = [0x00, 0x01, 0x03, 0x07, 0x0F, 0x1F, 0x3F, 0x7F, 0xFF];

/// Inclusive rectangle in logical coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    /// Left edge
    pub x1: u16,
    /// Top edge
    pub y1: u16,
    /// Right edge (inclusive)
    pub x2: u16,
    /// Bottom edge (inclusive)
    pub y2: u16,
}

impl Rect {
    /// Create a rectangle from inclusive corners
    pub const fn new(x1: u16, y1: u16, x2: u16, y2: u16) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a rectangle from an origin and a size
    ///
    /// Returns `None` for an empty size or a far edge past `u16::MAX`.
    pub fn with_size(x: u16, y: u16, width: u16, height: u16) -> Option<Self> {
        let x2 = x.checked_add(width.checked_sub(1)?)?;
        let y2 = y.checked_add(height.checked_sub(1)?)?;
        Some(Self::new(x, y, x2, y2))
    }

    /// Width in pixels (0 if the corners are reversed)
    pub fn width(&self) -> u16 {
        if self.x2 < self.x1 {
            0
        } else {
            self.x2 - self.x1 + 1
        }
    }

    /// Height in pixels (0 if the corners are reversed)
    pub fn height(&self) -> u16 {
        if self.y2 < self.y1 {
            0
        } else {
            self.y2 - self.y1 + 1
        }
    }

    /// Bytes per source row, `ceil(width / 8)`
    pub fn source_stride(&self) -> usize {
        (self.width() as usize).div_ceil(8)
    }

    /// Bytes of packed source needed to cover the rectangle
    pub fn source_len(&self) -> usize {
        self.source_stride() * self.height() as usize
    }
}

/// Source transforms applied before the bits are shifted into place
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlitOptions {
    /// Complement every source bit
    pub invert_values: bool,
    /// Reverse the bit order inside every source byte
    pub invert_bit_order: bool,
}

impl BlitOptions {
    /// Copy source bits unchanged
    pub const VERBATIM: Self = Self {
        invert_values: false,
        invert_bit_order: false,
    };

    /// Glyph layout: background stored as 1, rows stored LSB-first
    pub const GLYPH: Self = Self {
        invert_values: true,
        invert_bit_order: true,
    };

    #[inline]
    fn apply(self, byte: u8) -> u8 {
        let byte = if self.invert_values { !byte } else { byte };
        if self.invert_bit_order {
            byte.reverse_bits()
        } else {
            byte
        }
    }
}

/// Reasons a blit is rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlitError {
    /// Empty extent or outside the logical resolution
    InvalidRegion(Rect),
    /// Source shorter than `rect.source_len()`
    SourceTooShort {
        /// Required bytes
        required: usize,
        /// Provided bytes
        provided: usize,
    },
}

/// Paint `rect` of `plane` from `source`
///
/// `plane` must be a plane of the panel `geometry` describes. Bits outside
/// the rectangle, including the padding bits of partial bytes, are preserved.
///
/// # Errors
///
/// - [`BlitError::InvalidRegion`] if the rectangle is empty or extends past
///   the logical resolution
/// - [`BlitError::SourceTooShort`] if `source` does not cover the rectangle
pub fn blit(
    plane: &mut [u8],
    geometry: &Geometry,
    rect: Rect,
    source: &[u8],
    options: BlitOptions,
) -> Result<(), BlitError> {
    if rect.width() == 0 || rect.height() == 0 || !geometry.contains(rect.x2, rect.y2) {
        return Err(BlitError::InvalidRegion(rect));
    }
    let required = rect.source_len();
    if source.len() < required {
        return Err(BlitError::SourceTooShort {
            required,
            provided: source.len(),
        });
    }

    let source = normalize(&source[..required], options);
    let lines = orient(&source, rect, geometry.orientation());

    let dims = geometry.dimensions();
    let columns = dims.columns() as usize;
    let rows = dims.rows as usize;

    // Map-space rectangle: the corners swap under 180°/270° complementing.
    let (ax, ay) = geometry.to_map(rect.x1, rect.y1);
    let (bx, by) = geometry.to_map(rect.x2, rect.y2);
    let (mx1, mx2) = (ax.min(bx), ax.max(bx));
    let (my1, my2) = (ay.min(by), ay.max(by));

    if geometry.orientation().is_transposed() {
        // One line per map column; Y is packed.
        for (i, line) in lines.chunks(lines.stride).enumerate() {
            let mx = mx1 as usize + i;
            merge_line(plane, line, my1, my2, |c| c * rows + mx);
        }
    } else {
        for (i, line) in lines.chunks(lines.stride).enumerate() {
            let row = (my1 as usize + i) * columns;
            merge_line(plane, line, mx1, mx2, |c| row + c);
        }
    }
    Ok(())
}

/// Apply value inversion and bit reversal to every source byte
fn normalize(source: &[u8], options: BlitOptions) -> Cow<'_, [u8]> {
    if options == BlitOptions::VERBATIM {
        Cow::Borrowed(source)
    } else {
        Cow::Owned(source.iter().map(|b| options.apply(*b)).collect())
    }
}

/// Packed lines along the destination's packed axis, in map order
struct Lines<'a> {
    bytes: Cow<'a, [u8]>,
    stride: usize,
}

impl Lines<'_> {
    fn chunks(&self, stride: usize) -> core::slice::Chunks<'_, u8> {
        self.bytes.chunks(stride)
    }
}

#[inline]
fn source_bit(source: &[u8], stride: usize, col: usize, row: usize) -> bool {
    (source[row * stride + col / 8] >> (7 - col % 8)) & 1 != 0
}

/// Re-pack the normalized source so each line runs along the packed axis
///
/// Line `i`, bit `j` is taken from source `(col, row)`:
/// - 0°: `(j, i)` (no copy)
/// - 180°: `(w-1-j, h-1-i)`
/// - 90°: `(i, j)` (transpose)
/// - 270°: `(w-1-i, h-1-j)`
fn orient(source: &[u8], rect: Rect, orientation: Orientation) -> Lines<'_> {
    let width = rect.width() as usize;
    let height = rect.height() as usize;
    let stride = rect.source_stride();

    if orientation == Orientation::Deg0 {
        return Lines {
            bytes: Cow::Borrowed(source),
            stride,
        };
    }

    let (line_count, line_len) = if orientation.is_transposed() {
        (width, height)
    } else {
        (height, width)
    };
    let line_stride = line_len.div_ceil(8);
    let mut bytes = vec![0u8; line_count * line_stride];

    for i in 0..line_count {
        for j in 0..line_len {
            let (col, row) = match orientation {
                Orientation::Deg0 => (j, i),
                Orientation::Deg180 => (width - 1 - j, height - 1 - i),
                Orientation::Deg90 => (i, j),
                Orientation::Deg270 => (width - 1 - i, height - 1 - j),
            };
            if source_bit(source, stride, col, row) {
                bytes[i * line_stride + j / 8] |= 0x80 >> (j % 8);
            }
        }
    }

    Lines {
        bytes: Cow::Owned(bytes),
        stride: line_stride,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Span {
    Only,
    First,
    Last,
    Interior,
}

/// Source byte `k` of a line shifted right by `shift` bits
///
/// Pulls the low `shift` bits of byte `k - 1` in on the left. Bytes past
/// either end of the line read as zero; the span mask discards them.
#[inline]
fn assemble(line: &[u8], k: usize, shift: u32) -> u8 {
    let cur = line.get(k).copied().unwrap_or(0);
    if shift == 0 {
        return cur;
    }
    let prev = k
        .checked_sub(1)
        .and_then(|p| line.get(p))
        .copied()
        .unwrap_or(0);
    (prev << (8 - shift)) | (cur >> shift)
}

/// Merge one packed line into the plane over bit positions `a..=b`
///
/// `index(c)` gives the plane byte for byte column `c` of this line.
fn merge_line(plane: &mut [u8], line: &[u8], a: u16, b: u16, index: impl Fn(usize) -> usize) {
    let first = (a >> 3) as usize;
    let last = (b >> 3) as usize;
    let shift = u32::from(a % 8);
    // Rect bits in the first byte (low end) and the last byte (high end).
    let lead = 8 - shift as usize;
    let trail = (b % 8) as usize + 1;

    for c in first..=last {
        let span = match (c == first, c == last) {
            (true, true) => Span::Only,
            (true, false) => Span::First,
            (false, true) => Span::Last,
            (false, false) => Span::Interior,
        };
        let src = assemble(line, c - first, shift);
        let dst = &mut plane[index(c)];

        *dst = match span {
            Span::First => (*dst & !LOW_BITS[lead]) | (src & LOW_BITS[lead]),
            Span::Last => {
                let mask = !LOW_BITS[8 - trail];
                (*dst & !mask) | (src & mask)
            }
            Span::Only => {
                let mask = LOW_BITS[lead] & !LOW_BITS[8 - trail];
                (*dst & !mask) | (src & mask)
            }
            Span::Interior => src,
        };
    }
}
