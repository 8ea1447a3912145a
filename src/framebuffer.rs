//! Dual-plane framebuffer
//!
//! Two byte arrays of `columns * rows` bytes each: the black/white plane
//! (written by [`crate::blit`] and streamed to RAM 0x24) and the red plane
//! (streamed to RAM 0x26). A pixel's [`Color`] is the combination of its bit
//! in each plane.

use alloc::vec::Vec;

use crate::color::Color;
use crate::config::Dimensions;
use crate::geometry::Geometry;

/// Selects one of the two framebuffer planes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Plane {
    /// Black/white plane (bit 1 = white)
    Bw = 0x00,
    /// Red plane (bit 1 = red)
    Red = 0x01,
}

/// Owned pair of 1-bit planes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    bw: Vec<u8>,
    red: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate both planes for the given dimensions, cleared to black
    ///
    /// Returns the requested plane size on allocation failure.
    pub fn try_new(dims: Dimensions) -> Result<Self, usize> {
        let size = dims.plane_size();
        Ok(Self {
            bw: Self::alloc_plane(size)?,
            red: Self::alloc_plane(size)?,
        })
    }

    fn alloc_plane(size: usize) -> Result<Vec<u8>, usize> {
        let mut plane = Vec::new();
        plane.try_reserve_exact(size).map_err(|_| size)?;
        plane.resize(size, 0x00);
        Ok(plane)
    }

    /// Size of each plane in bytes
    pub fn plane_size(&self) -> usize {
        self.bw.len()
    }

    /// Set one pixel in both planes
    ///
    /// The caller must ensure `geometry.contains(x, y)`.
    pub fn set_pixel(&mut self, geometry: &Geometry, x: u16, y: u16, color: Color) {
        let (index, bit) = geometry.locate(x, y);
        let mask = 1u8 << bit;
        write_bit(&mut self.bw[index], mask, color.bw_bit());
        write_bit(&mut self.red[index], mask, color.red_bit());
    }

    /// Read back the color of one pixel
    ///
    /// Returns `None` if both plane bits are set, which no drawing operation
    /// produces but a read-back from the controller might.
    pub fn pixel(&self, geometry: &Geometry, x: u16, y: u16) -> Option<Color> {
        let (index, bit) = geometry.locate(x, y);
        let bw = (self.bw[index] >> bit) & 1;
        let red = (self.red[index] >> bit) & 1;
        Color::from_bits(bw | (red << 1))
    }

    /// Fill both planes with a color
    pub fn fill(&mut self, color: Color) {
        self.bw.fill(color.bw_byte());
        self.red.fill(color.red_byte());
    }

    /// Read access to one plane
    pub fn plane(&self, which: Plane) -> &[u8] {
        match which {
            Plane::Bw => &self.bw,
            Plane::Red => &self.red,
        }
    }

    /// Write access to one plane
    pub fn plane_mut(&mut self, which: Plane) -> &mut [u8] {
        match which {
            Plane::Bw => &mut self.bw,
            Plane::Red => &mut self.red,
        }
    }

    /// Write access to both planes at once, `(bw, red)`
    pub fn planes_mut(&mut self) -> (&mut [u8], &mut [u8]) {
        (self.bw.as_mut_slice(), self.red.as_mut_slice())
    }
}

#[inline]
fn write_bit(byte: &mut u8, mask: u8, set: bool) {
    if set {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}
