//! Driver for the Chrom-ART (DMA2D) blitter found on STM32F4x9 parts.
//!
//! The blitter fills rectangles of a 16-bit RGB565 framebuffer kept in
//! external SDRAM. The framebuffer holds two layers at fixed offsets from a
//! shared base address; every operation writes into the current work layer.
//!
//! ## Layout
//!
//! - [`color`] - packed ARGB8888 to hardware channel fields
//! - [`layer`] - layer selection and pixel address resolution
//! - [`interface`] - the [`BlitterInterface`] trait and the register-level [`Dma2d`]
//! - [`blitter`] - accelerated line and rectangle fill ([`Blitter`])
//! - [`graphics`] - software [`LayerBuffer`] (requires `graphics` feature)
//! - [`sim`] - in-memory blitter model for host tests (requires `sim` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use dma2d::{Blitter, Builder, Dimensions, Dma2d, Layer};
//!
//! let config = Builder::new()
//!     .dimensions(Dimensions::new(240, 320).unwrap())
//!     .build()
//!     .expect("valid configuration");
//!
//! let mut blitter = Blitter::new(unsafe { Dma2d::take() }, delay, config);
//! blitter.set_work_layer(Layer::L1);
//! blitter.fill_frame(0, 0, 239, 319, dma2d::color::C_BLUE)?;
//! blitter.draw_line(10, 20, 200, 20, dma2d::color::C_WHITE)?;
//! ```

#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unwrap_used
    )
)]

pub mod blitter;
pub mod color;
pub mod config;
pub mod error;
pub mod interface;
pub mod layer;
mod register;

#[cfg(feature = "graphics")]
#[cfg_attr(docsrs, doc(cfg(feature = "graphics")))]
pub mod graphics;

#[cfg(any(test, feature = "sim"))]
#[cfg_attr(docsrs, doc(cfg(feature = "sim")))]
pub mod sim;

pub use blitter::Blitter;
pub use color::HwColor;
pub use config::{Builder, Config, Dimensions};
pub use error::{BuilderError, Error};
pub use interface::{BlitterInterface, Dma2d, Transfer};
pub use layer::{FrameMemory, Layer};

#[cfg(feature = "graphics")]
pub use graphics::LayerBuffer;
