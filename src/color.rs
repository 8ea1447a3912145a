//! Color types for tri-color e-paper displays
//!
//! This module defines the [`Color`] enum for the black, white, and red pixels
//! supported by SSD1680 panels.
//!
//! ## Color Representation
//!
//! Each pixel is stored as one bit in each of the two RAM planes. A color is a
//! 2-bit value: bit 0 is the black/white plane bit, bit 1 is the red plane bit.
//!
//! | Color | Bits   | BW Plane | RED Plane |
//! |-------|--------|----------|-----------|
//! | Black | `0b00` | 0        | 0         |
//! | White | `0b01` | 1        | 0         |
//! | Red   | `0b10` | 0        | 1         |
//!
//! The fourth combination (`0b11`) has no defined meaning on the panel and
//! cannot be represented; [`Color::from_bits`] rejects it.
//!
//! ## Example
//!
//! ```
//! use ssd1680::Color;
//!
//! assert_eq!(Color::White.bw_byte(), 0xFF);
//! assert_eq!(Color::White.red_byte(), 0x00);
//! assert_eq!(Color::Red.red_byte(), 0xFF);
//! assert_eq!(Color::from_bits(0b11), None);
//! ```

/// Colors supported by SSD1680 tri-color panels
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Black pixels (both planes clear)
    Black,
    /// White pixels, the panel background
    #[default]
    White,
    /// Red pixels
    Red,
}

#[cfg(feature = "graphics")]
impl embedded_graphics_core::prelude::PixelColor for Color {
    type Raw = embedded_graphics_core::pixelcolor::raw::RawU8;
}

impl Color {
    /// The 2-bit encoding of this color (bit 0: BW plane, bit 1: RED plane)
    pub const fn bits(self) -> u8 {
        match self {
            Self::Black => 0b00,
            Self::White => 0b01,
            Self::Red => 0b10,
        }
    }

    /// Decode a 2-bit color value
    ///
    /// Returns `None` for the reserved combination `0b11` and for any value
    /// with bits above bit 1 set.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0b00 => Some(Self::Black),
            0b01 => Some(Self::White),
            0b10 => Some(Self::Red),
            _ => None,
        }
    }

    /// Bit value written to the black/white plane
    pub const fn bw_bit(self) -> bool {
        self.bits() & 0b01 != 0
    }

    /// Bit value written to the red plane
    pub const fn red_bit(self) -> bool {
        self.bits() & 0b10 != 0
    }

    /// Fill byte for the black/white plane
    ///
    /// ```
    /// use ssd1680::Color;
    ///
    /// assert_eq!(Color::Black.bw_byte(), 0x00);
    /// assert_eq!(Color::White.bw_byte(), 0xFF);
    /// assert_eq!(Color::Red.bw_byte(), 0x00);
    /// ```
    pub const fn bw_byte(self) -> u8 {
        if self.bw_bit() { 0xFF } else { 0x00 }
    }

    /// Fill byte for the red plane
    ///
    /// ```
    /// use ssd1680::Color;
    ///
    /// assert_eq!(Color::Black.red_byte(), 0x00);
    /// assert_eq!(Color::White.red_byte(), 0x00);
    /// assert_eq!(Color::Red.red_byte(), 0xFF);
    /// ```
    pub const fn red_byte(self) -> u8 {
        if self.red_bit() { 0xFF } else { 0x00 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bits_round_trip_for_defined_colors() {
        for color in [Color::Black, Color::White, Color::Red] {
            assert_eq!(Color::from_bits(color.bits()), Some(color));
        }
    }

    #[test]
    fn test_reserved_combination_is_rejected() {
        assert_eq!(Color::from_bits(0b11), None);
        assert_eq!(Color::from_bits(0x04), None);
    }

    #[test]
    fn test_default_is_background() {
        assert_eq!(Color::default(), Color::White);
    }
}
