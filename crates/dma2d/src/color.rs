//! Packed color translation
//!
//! The GUI and the compositor both hand colors around as packed ARGB8888
//! words (alpha in bits 24..=31, red 16..=23, green 8..=15, blue 0..=7). The
//! blitter's register-to-memory mode takes the output color as separate
//! channel fields sized for the output format, which is RGB565 here.
//!
//! ## Example
//!
//! ```
//! use dma2d::HwColor;
//!
//! let color = HwColor::from_argb(0xFF00_00FF);
//! assert_eq!(color.blue, 0x1F);
//! assert_eq!(color.red, 0);
//! assert_eq!(color.alpha, HwColor::OPAQUE);
//! ```

use crate::register::{OCOLR_565_GREEN_SHIFT, OCOLR_565_RED_SHIFT};

pub const C_BLACK: u32 = 0x0000_0000;
pub const C_WHITE: u32 = 0x00FF_FFFF;
pub const C_RED: u32 = 0x00FF_0000;
pub const C_GREEN: u32 = 0x0000_FF00;
pub const C_BLUE: u32 = 0x0000_00FF;

/// Output color fields for the blitter
///
/// Channel widths follow RGB565: 5 bits red, 6 bits green, 5 bits blue.
/// `alpha` is carried for completeness of the register set but is always
/// [`HwColor::OPAQUE`]; the RGB565 output color register has no alpha bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HwColor {
    /// Red channel, 5 bits
    pub red: u8,
    /// Green channel, 6 bits
    pub green: u8,
    /// Blue channel, 5 bits
    pub blue: u8,
    /// Alpha channel, 4 bits
    pub alpha: u8,
}

impl HwColor {
    /// Alpha value written for every fill
    pub const OPAQUE: u8 = 0x0F;

    /// Split a packed ARGB8888 value into RGB565 channel fields
    ///
    /// Only the most significant bits of each channel survive. The source
    /// alpha byte is ignored.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            red: ((argb >> 19) & 0x1F) as u8,
            green: ((argb >> 10) & 0x3F) as u8,
            blue: ((argb >> 3) & 0x1F) as u8,
            alpha: Self::OPAQUE,
        }
    }

    /// Pack the channels into a single RGB565 word
    pub const fn to_rgb565(self) -> u16 {
        ((self.red as u16) << OCOLR_565_RED_SHIFT)
            | ((self.green as u16) << OCOLR_565_GREEN_SHIFT)
            | self.blue as u16
    }
}

impl From<u32> for HwColor {
    fn from(argb: u32) -> Self {
        Self::from_argb(argb)
    }
}

#[cfg(feature = "graphics")]
impl From<HwColor> for embedded_graphics_core::pixelcolor::Rgb565 {
    fn from(color: HwColor) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

/// Convert a packed ARGB8888 value straight to an embedded-graphics color
#[cfg(feature = "graphics")]
pub fn argb_to_rgb565(argb: u32) -> embedded_graphics_core::pixelcolor::Rgb565 {
    HwColor::from_argb(argb).into()
}
