//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level hardware communication errors
//!
//! Every runtime error is recoverable at the [`Session`](crate::Session)
//! boundary. A bus or timeout error in the middle of a transfer or refresh
//! leaves the controller in an indeterminate state; recover with
//! [`Session::wake`](crate::Session::wake), which runs a full reset and
//! configuration cycle.
//!
//! ## Example
//!
//! ```
//! use ssd1680::{Builder, Dimensions, BuilderError};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(400, 122); // Too many rows
//! assert!(result.is_err());
//! ```

use crate::blit::BlitError;
use crate::config::Orientation;
use crate::display::ControllerState;
use crate::interface::DisplayInterface;

/// Maximum gate outputs (rows) supported by the SSD1680 controller
pub const MAX_GATE_OUTPUTS: u16 = 296;

/// Maximum source outputs (columns) supported by the SSD1680 controller
pub const MAX_SOURCE_OUTPUTS: u16 = 176;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Framebuffer allocation failed at session creation
    AllocationFailure {
        /// Bytes requested for one plane
        requested: usize,
    },
    /// Bus error (SPI/GPIO)
    ///
    /// Wraps the underlying hardware error from the [`DisplayInterface`] implementation.
    Bus(I::Error),
    /// The BUSY line did not drop within the configured timeout
    ControllerUnresponsive {
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u32,
    },
    /// Rectangle or pixel outside the logical resolution, or with an empty extent
    ///
    /// Coordinates are inclusive and in the current orientation.
    InvalidRegion {
        /// Left edge
        x1: u16,
        /// Top edge
        y1: u16,
        /// Right edge
        x2: u16,
        /// Bottom edge
        y2: u16,
    },
    /// Orientation change rejected by the controller configuration
    ///
    /// No transition is currently illegal; reserved for panels with
    /// restricted scan directions.
    InvalidOrientationTransition {
        /// Orientation before the change
        from: Orientation,
        /// Requested orientation
        to: Orientation,
    },
    /// A source buffer is shorter than its declared geometry requires
    BufferTooSmall {
        /// Required buffer size in bytes
        required: usize,
        /// Provided buffer size in bytes
        provided: usize,
    },
    /// The controller is not in a state that accepts the operation
    ///
    /// Raised for commands issued after deep sleep, before bring-up, or after
    /// an interrupted transfer/refresh.
    InvalidState {
        /// State the controller was in
        state: ControllerState,
    },
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AllocationFailure { requested } => {
                write!(f, "Failed to allocate {requested} byte framebuffer plane")
            }
            Self::Bus(e) => write!(f, "Bus error: {e:?}"),
            Self::ControllerUnresponsive { timeout_ms } => {
                write!(f, "Controller still busy after {timeout_ms} ms")
            }
            Self::InvalidRegion { x1, y1, x2, y2 } => {
                write!(f, "Invalid region: ({x1}, {y1})..=({x2}, {y2})")
            }
            Self::InvalidOrientationTransition { from, to } => {
                write!(f, "Invalid orientation transition: {from:?} -> {to:?}")
            }
            Self::BufferTooSmall { required, provided } => {
                write!(
                    f,
                    "Buffer too small: required {required} bytes, provided {provided}"
                )
            }
            Self::InvalidState { state } => {
                write!(f, "Operation not allowed while controller is {state:?}")
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

impl<I: DisplayInterface> From<BlitError> for Error<I> {
    fn from(error: BlitError) -> Self {
        match error {
            BlitError::InvalidRegion(rect) => Self::InvalidRegion {
                x1: rect.x1,
                y1: rect.y1,
                x2: rect.x2,
                y2: rect.y2,
            },
            BlitError::SourceTooShort { required, provided } => {
                Self::BufferTooSmall { required, provided }
            }
        }
    }
}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Number of rows (height) requested
        rows: u16,
        /// Number of columns (width) requested
        cols: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { rows, cols } => write!(
                f,
                "Invalid dimensions {rows}x{cols} (max {MAX_GATE_OUTPUTS}x{MAX_SOURCE_OUTPUTS})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
