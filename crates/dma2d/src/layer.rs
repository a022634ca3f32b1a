//! Layer selection and pixel address resolution
//!
//! The framebuffer holds two non-overlapping layers. A pixel's address is
//!
//! ```text
//! base_address + layer_offset + 2 * (width * y + x)
//! ```
//!
//! Neither function here checks that `(x, y)` lies on the screen; use
//! [`Config::contains`] first when the coordinates come from outside.

use crate::config::{BYTES_PER_PIXEL, Config};

/// Framebuffer layer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layer {
    /// Layer 1
    #[default]
    L1,
    /// Layer 2
    L2,
}

impl Layer {
    /// The other layer
    pub fn other(self) -> Self {
        match self {
            Layer::L1 => Layer::L2,
            Layer::L2 => Layer::L1,
        }
    }

    fn index(self) -> usize {
        match self {
            Layer::L1 => 0,
            Layer::L2 => 1,
        }
    }
}

impl Config {
    /// Byte offset of `layer` from the framebuffer base
    pub fn layer_offset(&self, layer: Layer) -> u32 {
        self.layer_offsets[layer.index()]
    }
}

/// Memory address of pixel `(x, y)` in `layer`
pub fn pixel_address(config: &Config, layer: Layer, x: u16, y: u16) -> u32 {
    config.base_address + config.layer_offset(layer) + BYTES_PER_PIXEL * pixel_offset(config, x, y)
}

/// Pixel `(x, y)` in `layer` as a 16-bit word index from the framebuffer base
pub fn pixel_index(config: &Config, layer: Layer, x: u16, y: u16) -> usize {
    (config.layer_offset(layer) / BYTES_PER_PIXEL + pixel_offset(config, x, y)) as usize
}

fn pixel_offset(config: &Config, x: u16, y: u16) -> u32 {
    config.dimensions.width as u32 * y as u32 + x as u32
}

/// Framebuffer storage covering both layers, one word per pixel
///
/// Word 0 sits at the configured base address.
pub trait FrameMemory {
    /// Word at `index`, or `None` past the end
    fn load(&self, index: usize) -> Option<u16>;

    /// Write the word at `index`. Returns `false` past the end.
    fn store(&mut self, index: usize, value: u16) -> bool;
}

impl FrameMemory for [u16] {
    fn load(&self, index: usize) -> Option<u16> {
        self.get(index).copied()
    }

    fn store(&mut self, index: usize, value: u16) -> bool {
        match self.get_mut(index) {
            Some(word) => {
                *word = value;
                true
            }
            None => false,
        }
    }
}

impl<const N: usize> FrameMemory for [u16; N] {
    fn load(&self, index: usize) -> Option<u16> {
        self.as_slice().load(index)
    }

    fn store(&mut self, index: usize, value: u16) -> bool {
        self.as_mut_slice().store(index, value)
    }
}

impl<M: FrameMemory + ?Sized> FrameMemory for &mut M {
    fn load(&self, index: usize) -> Option<u16> {
        (**self).load(index)
    }

    fn store(&mut self, index: usize, value: u16) -> bool {
        (**self).store(index, value)
    }
}
