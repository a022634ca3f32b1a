//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and blitter operations ([`Error`]).
//!
//! ## Example
//!
//! ```
//! use dma2d::{Builder, BuilderError, Dimensions};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(0, 320);
//! assert!(result.is_err());
//! ```

use crate::interface::BlitterInterface;
use crate::register::{NLR_NL_MAX, NLR_PL_MAX};

/// Widest line the blitter can transfer, in pixels
pub const MAX_PIXELS_PER_LINE: u16 = NLR_PL_MAX as u16;

/// Most lines the blitter can transfer at once
pub const MAX_LINES: u16 = NLR_NL_MAX as u16;

/// Errors that can occur when driving the blitter
///
/// Generic over the interface type to preserve the specific error type.
pub enum Error<I: BlitterInterface> {
    /// Interface error
    ///
    /// Wraps the underlying error from the [`BlitterInterface`] implementation.
    Interface(I::Error),
    /// The line is neither horizontal nor vertical
    ///
    /// Nothing is written to the hardware in this case; callers are expected
    /// to draw the line some other way.
    UnsupportedGeometry {
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
    },
    /// A coordinate lies outside the screen
    OutOfBounds {
        /// Offending x coordinate
        x: i16,
        /// Offending y coordinate
        y: i16,
    },
    /// The transfer-complete flag was not raised in time
    Timeout {
        /// How long the driver waited, in microseconds
        waited_us: u32,
    },
}

impl<I: BlitterInterface> Error<I> {
    /// Whether the request was refused before any hardware access
    pub fn is_rejected(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedGeometry { .. } | Error::OutOfBounds { .. }
        )
    }
}

impl<I: BlitterInterface> core::fmt::Debug for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Interface(e) => f.debug_tuple("Interface").field(e).finish(),
            Error::UnsupportedGeometry { x1, y1, x2, y2 } => f
                .debug_struct("UnsupportedGeometry")
                .field("x1", x1)
                .field("y1", y1)
                .field("x2", x2)
                .field("y2", y2)
                .finish(),
            Error::OutOfBounds { x, y } => f
                .debug_struct("OutOfBounds")
                .field("x", x)
                .field("y", y)
                .finish(),
            Error::Timeout { waited_us } => f
                .debug_struct("Timeout")
                .field("waited_us", waited_us)
                .finish(),
        }
    }
}

impl<I: BlitterInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "Interface error: {e:?}"),
            Error::UnsupportedGeometry { x1, y1, x2, y2 } => {
                write!(f, "Unsupported line ({x1},{y1})-({x2},{y2})")
            }
            Error::OutOfBounds { x, y } => write!(f, "Coordinate ({x},{y}) out of bounds"),
            Error::Timeout { waited_us } => {
                write!(f, "Transfer did not complete within {waited_us}us")
            }
        }
    }
}

impl<I: BlitterInterface> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Width in pixels
        width: u16,
        /// Height in pixels
        height: u16,
    },
    /// A layer offset is not aligned to a 16-bit pixel
    MisalignedLayer {
        /// Byte offset from the framebuffer base
        offset: u32,
    },
    /// The two layers share memory
    OverlappingLayers {
        /// Bytes needed per layer
        layer_size: u32,
        /// Distance between the layer offsets
        distance: u32,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuilderError::MissingDimensions => write!(f, "Dimensions must be specified"),
            BuilderError::InvalidDimensions { width, height } => write!(
                f,
                "Invalid dimensions {width}x{height} (max {MAX_PIXELS_PER_LINE}x{MAX_LINES})"
            ),
            BuilderError::MisalignedLayer { offset } => {
                write!(f, "Layer offset {offset:#x} is not 2-byte aligned")
            }
            BuilderError::OverlappingLayers {
                layer_size,
                distance,
            } => write!(
                f,
                "Layers overlap: {layer_size} bytes per layer, {distance} bytes apart"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
