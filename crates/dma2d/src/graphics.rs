//! Software rendering into the layered framebuffer
//!
//! [`LayerBuffer`] implements the
//! [`DrawTarget`](embedded_graphics_core::draw_target::DrawTarget) trait over
//! the same two-layer RGB565 memory the [`Blitter`](crate::Blitter) fills.
//! It is the pixel-by-pixel path used when acceleration is unavailable or a
//! request is one the blitter refuses (a diagonal line, for instance).
//!
//! ## Example
//!
//! ```rust,ignore
//! use dma2d::{LayerBuffer, Layer};
//! use embedded_graphics::{pixelcolor::Rgb565, prelude::*, primitives::{Line, PrimitiveStyle}};
//!
//! // The whole SDRAM window, both layers
//! let memory: &'static mut [u16] = unsafe { sdram_words() };
//! let mut buffer = LayerBuffer::new(config, memory);
//! buffer.set_work_layer(Layer::L1);
//!
//! Line::new(Point::new(0, 0), Point::new(239, 319))
//!     .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 1))
//!     .draw(&mut buffer)?;
//! ```

use core::convert::Infallible;

use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{IntoStorage, Rgb565},
    prelude::Pixel,
};

use crate::config::Config;
use crate::layer::{FrameMemory, Layer, pixel_index};

/// Framebuffer memory with software pixel access
///
/// ## Type Parameters
///
/// * `B` - Backing words, starting at the configured base address and
///   covering both layers (at least `config.memory_size() / 2` words). On
///   the target this is the SDRAM window the blitter writes to.
pub struct LayerBuffer<B>
where
    B: FrameMemory,
{
    /// Framebuffer configuration
    config: Config,
    /// Backing memory
    buffer: B,
    /// Layer drawing goes to
    work_layer: Layer,
}

impl<B> LayerBuffer<B>
where
    B: FrameMemory,
{
    /// Create a new LayerBuffer drawing to layer 1
    pub fn new(config: Config, buffer: B) -> Self {
        Self {
            config,
            buffer,
            work_layer: Layer::L1,
        }
    }

    /// Select the layer subsequent drawing goes to
    pub fn set_work_layer(&mut self, layer: Layer) {
        self.work_layer = layer;
    }

    /// Layer drawing currently goes to
    pub fn work_layer(&self) -> Layer {
        self.work_layer
    }

    /// Read back a pixel as a raw RGB565 word
    ///
    /// Returns `None` off screen or past the end of the backing memory.
    pub fn pixel(&self, layer: Layer, x: u16, y: u16) -> Option<u16> {
        let dims = self.config.dimensions;
        if x >= dims.width || y >= dims.height {
            return None;
        }
        self.buffer.load(pixel_index(&self.config, layer, x, y))
    }

    /// Access the framebuffer configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the backing memory
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    fn set_pixel(&mut self, x: u16, y: u16, color: Rgb565) {
        let index = pixel_index(&self.config, self.work_layer, x, y);
        self.buffer.store(index, color.into_storage());
    }
}

impl<B> DrawTarget for LayerBuffer<B>
where
    B: FrameMemory,
{
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let sz = self.size();

        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < sz.width
                && (point.y as u32) < sz.height
            {
                self.set_pixel(point.x as u16, point.y as u16, color);
            }
        }

        Ok(())
    }
}

impl<B> OriginDimensions for LayerBuffer<B>
where
    B: FrameMemory,
{
    fn size(&self) -> Size {
        let dims = self.config.dimensions;
        Size::new(dims.width as u32, dims.height as u32)
    }
}
