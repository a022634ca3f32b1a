//! Span output from the compositor.
//!
//! The compositor hands damaged screen content over one horizontal span at a
//! time. Spans reaching the GUI are drawn as a single horizontal line in the
//! color of their first pixel, which lets the blitter take each one in a
//! single transfer. Spans are expected to be uniform; see
//! [`DamageScreen`](crate::screen::DamageScreen), which splits rows at every
//! color change.

use embedded_graphics::{pixelcolor::Rgb565, prelude::*};

use crate::gui::{Accelerator, Gui};

/// Receiver of compositor spans.
pub trait SpanSink {
    /// Output pixels `left..=right` of row `top`. `pixels` holds the span's
    /// colors as packed ARGB8888, starting at `left`.
    fn put_span(&mut self, left: i16, top: i16, right: i16, pixels: &[u32]);
}

impl<D, A> SpanSink for Gui<D, A>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
    D::Error: core::fmt::Debug,
    A: Accelerator,
{
    fn put_span(&mut self, left: i16, top: i16, right: i16, pixels: &[u32]) {
        let Some(&color) = pixels.first() else {
            return;
        };
        if let Err(e) = self.draw_line(left, top, right, top, color) {
            log::warn!("[FBDEV] span at row {} dropped: {:?}", top, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::tests::accelerated_gui;

    #[test]
    fn span_becomes_one_horizontal_line() {
        let mut gui = accelerated_gui();
        gui.put_span(10, 5, 50, &[0xFF00_00FF]);
        assert_eq!(gui.accelerator().lines, [(10, 5, 50, 5, 0xFF00_00FF)]);
    }

    #[test]
    fn only_first_pixel_color_is_used() {
        let mut gui = accelerated_gui();
        gui.put_span(0, 1, 2, &[0x0011_2233, 0x00FF_FFFF, 0x0000_0000]);
        assert_eq!(gui.accelerator().lines, [(0, 1, 2, 1, 0x0011_2233)]);
    }

    #[test]
    fn empty_span_draws_nothing() {
        let mut gui = accelerated_gui();
        gui.put_span(0, 0, 4, &[]);
        assert!(gui.accelerator().lines.is_empty());
        assert!(gui.target().buffer().iter().all(|&w| w == 0));
    }
}
