//! SSD1680 E-Paper Display Driver
//!
//! A driver for the SSD1680 black/white/red e-paper controller (up to
//! 176x296 pixels), built on `embedded-hal` 1.0.
//!
//! ## Features
//!
//! - `no_std` compatible (needs `alloc` for the framebuffer)
//! - Dual-plane framebuffer with four orientations
//! - Unaligned bit-blit of packed 1-bit images, glyphs and bitmaps
//! - Full, fast and partial refresh modes, refresh windows
//! - Deep sleep and wake with framebuffer retransfer
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Controller RAM read-back (with `experimental-readback` feature)
//!
//! ## Layers
//!
//! - [`Session`] owns everything for one panel and is what applications use.
//! - [`Display`] is the protocol sequencer: command sequences, busy-waits and
//!   [`ControllerState`] tracking.
//! - [`FrameBuffer`], [`Geometry`] and [`blit`] are the pixel layer and do no
//!   I/O.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::{InputPin, OutputPin};
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use ssd1680::{Builder, Color, Dimensions, Interface, Orientation, RefreshMode, Session};
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let dc = MockPin;
//! # let rst = MockPin;
//! # let busy = MockPin;
//! # let mut delay = MockDelay;
//! let interface = Interface::new(spi, dc, rst, busy);
//! let dims = match Dimensions::new(250, 122) {
//!     Ok(dims) => dims,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().dimensions(dims).orientation(Orientation::Deg0).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut session = match Session::create(interface, config, &mut delay) {
//!     Ok(session) => session,
//!     Err(_) => return,
//! };
//! let _ = session.draw_line(0, 0, 121, 249, Color::Black);
//! let _ = session.send_to_controller(&mut delay);
//! let _ = session.refresh(RefreshMode::Full, &mut delay);
//! let _ = session.release();
//! ```

#![no_std]

extern crate alloc;

/// Unaligned bit-blit into a framebuffer plane
pub mod blit;
/// Color types for tri-color e-paper displays
pub mod color;
/// SSD1680 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Controller protocol sequencer
pub mod display;
/// Error types for the driver
pub mod error;
/// Dual-plane framebuffer
pub mod framebuffer;
/// Pixel addressing per orientation
pub mod geometry;
/// Hardware interface abstraction
pub mod interface;
/// Fonts and bitmaps
pub mod resource;
/// Display session
pub mod session;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

pub use blit::{BlitOptions, Rect};
pub use color::Color;
pub use config::{
    Builder, Config, DEFAULT_BUSY_TIMEOUT_MS, Dimensions, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS,
    Orientation,
};
pub use display::{ControllerState, Display, RamWindow, RefreshMode};
pub use error::{BuilderError, Error};
pub use framebuffer::{FrameBuffer, Plane};
pub use geometry::Geometry;
pub use interface::InterfaceError;
pub use interface::{DisplayInterface, Interface};
#[cfg(feature = "experimental-readback")]
pub use interface::ReadbackInterface;
pub use resource::{Bitmap, Font};
pub use session::Session;
