//! Read-only pixel resources: fonts and bitmaps
//!
//! Both borrow their payload, so they can live in flash as `static` data
//! produced by an external converter.

/// Fixed-width bitmap font
///
/// Glyphs are stored back to back, `bytes_per_glyph` bytes each, starting at
/// `first_char`. Each glyph row is `bytes_per_row` bytes, LSB-first (bit 0 is
/// the leftmost pixel), with set bits marking ink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font<'a> {
    /// Glyph width in pixels
    pub width: u16,
    /// Glyph height in pixels
    pub height: u16,
    /// Bytes per glyph row
    pub bytes_per_row: u16,
    /// Bytes per glyph
    pub bytes_per_glyph: u16,
    /// Character code of the first glyph
    pub first_char: u8,
    /// Packed glyph data
    pub data: &'a [u8],
}

impl<'a> Font<'a> {
    /// Describe a font whose first glyph is the space character
    pub const fn new(width: u16, height: u16, bytes_per_row: u16, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            bytes_per_row,
            bytes_per_glyph: bytes_per_row * height,
            first_char: b' ',
            data,
        }
    }

    /// Number of glyphs in the payload
    pub fn glyph_count(&self) -> usize {
        if self.bytes_per_glyph == 0 {
            0
        } else {
            self.data.len() / self.bytes_per_glyph as usize
        }
    }

    /// Glyph bytes for a character, `None` outside the font
    pub fn glyph(&self, ch: char) -> Option<&'a [u8]> {
        let index = (ch as u32).checked_sub(u32::from(self.first_char))? as usize;
        if index >= self.glyph_count() {
            return None;
        }
        let start = index * self.bytes_per_glyph as usize;
        self.data.get(start..start + self.bytes_per_glyph as usize)
    }
}

/// Packed 1-bit image
///
/// Rows are `ceil(width / 8)` bytes, MSB-first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bitmap<'a> {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Packed pixel data
    pub data: &'a [u8],
}

impl<'a> Bitmap<'a> {
    /// Describe a bitmap
    pub const fn new(width: u16, height: u16, data: &'a [u8]) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Three 4x2 glyphs: ' ', '!', '"'
    const DATA: [u8; 6] = [0x00, 0x00, 0x02, 0x02, 0x05, 0x00];

    #[test]
    fn test_glyph_lookup_from_first_char() {
        let font = Font::new(4, 2, 1, &DATA);
        assert_eq!(font.glyph_count(), 3);
        assert_eq!(font.glyph(' '), Some(&DATA[0..2]));
        assert_eq!(font.glyph('!'), Some(&DATA[2..4]));
        assert_eq!(font.glyph('"'), Some(&DATA[4..6]));
    }

    #[test]
    fn test_glyph_outside_font_is_none() {
        let font = Font::new(4, 2, 1, &DATA);
        assert_eq!(font.glyph('#'), None);
        assert_eq!(font.glyph('\n'), None);
        assert_eq!(font.glyph('é'), None);
    }

    #[test]
    fn test_zero_sized_glyphs_have_no_entries() {
        let font = Font::new(4, 0, 1, &DATA);
        assert_eq!(font.glyph_count(), 0);
        assert_eq!(font.glyph(' '), None);
    }

    #[test]
    fn test_bitmap_stride_rounds_up() {
        assert_eq!(Bitmap::new(13, 2, &[0; 4]).stride(), 2);
        assert_eq!(Bitmap::new(16, 1, &[0; 2]).stride(), 2);
    }
}
