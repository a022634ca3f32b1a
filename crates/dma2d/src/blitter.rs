//! Accelerated line and rectangle fill
//!
//! [`Blitter`] turns GUI draw requests into DMA2D register-to-memory
//! transfers aimed at the current work layer. Every call is synchronous: it
//! resets the peripheral, programs the transfer, starts it, and polls the
//! transfer-complete flag until it is set or `timeout_us` runs out.

use embedded_hal::delay::DelayNs;

use crate::color::HwColor;
use crate::config::Config;
use crate::error::Error;
use crate::interface::{BlitterInterface, Transfer};
use crate::layer::{Layer, pixel_address};

/// Blitter driver
///
/// Owns the hardware interface, a delay used between completion polls, the
/// framebuffer configuration and the current work layer.
pub struct Blitter<I, D>
where
    I: BlitterInterface,
    D: DelayNs,
{
    /// Hardware interface
    interface: I,
    /// Delay between completion polls
    delay: D,
    /// Framebuffer configuration
    config: Config,
    /// Layer all transfers write to
    work_layer: Layer,
    /// Completed transfers
    transfers: u32,
}

impl<I, D> Blitter<I, D>
where
    I: BlitterInterface,
    D: DelayNs,
{
    /// Create a new Blitter writing to layer 1
    pub fn new(interface: I, delay: D, config: Config) -> Self {
        Self {
            interface,
            delay,
            config,
            work_layer: Layer::L1,
            transfers: 0,
        }
    }

    /// Select the layer subsequent transfers write to
    pub fn set_work_layer(&mut self, layer: Layer) {
        self.work_layer = layer;
    }

    /// Layer transfers currently write to
    pub fn work_layer(&self) -> Layer {
        self.work_layer
    }

    /// Draw a horizontal or vertical line from `(x1, y1)` to `(x2, y2)`
    ///
    /// Both endpoints are included. A horizontal line is a single row of
    /// pixels; a vertical one is a column of one-pixel lines whose output
    /// offset of `width - 1` moves each write one row down.
    ///
    /// # Errors
    ///
    /// - [`Error::UnsupportedGeometry`] if the line is diagonal; the hardware
    ///   is not touched
    /// - [`Error::OutOfBounds`] if an endpoint is off screen
    /// - [`Error::Timeout`] if the transfer does not complete in time
    pub fn draw_line(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: u32,
    ) -> Result<(), Error<I>> {
        let width = self.config.dimensions.width;

        let (x, y, output_offset, lines, pixels_per_line) = if y1 == y2 {
            let (left, right) = (x1.min(x2), x1.max(x2));
            self.check_bounds(left, y1)?;
            self.check_bounds(right, y2)?;
            (left, y1, 0, 1, (right - left) as u16 + 1)
        } else if x1 == x2 {
            let (top, bottom) = (y1.min(y2), y1.max(y2));
            self.check_bounds(x1, top)?;
            self.check_bounds(x2, bottom)?;
            (x1, top, width - 1, (bottom - top) as u16 + 1, 1)
        } else {
            return Err(Error::UnsupportedGeometry { x1, y1, x2, y2 });
        };

        self.run(Transfer {
            color: HwColor::from_argb(color),
            output_address: pixel_address(&self.config, self.work_layer, x as u16, y as u16),
            output_offset,
            lines,
            pixels_per_line,
        })
    }

    /// Fill the rectangle with corners `(x1, y1)` and `(x2, y2)`, inclusive
    ///
    /// The corners may be given in any order.
    ///
    /// # Errors
    ///
    /// - [`Error::OutOfBounds`] if a corner is off screen
    /// - [`Error::Timeout`] if the transfer does not complete in time
    pub fn fill_frame(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: u32,
    ) -> Result<(), Error<I>> {
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        self.check_bounds(left, top)?;
        self.check_bounds(right, bottom)?;

        let columns = (right - left) as u16 + 1;

        self.run(Transfer {
            color: HwColor::from_argb(color),
            output_address: pixel_address(&self.config, self.work_layer, left as u16, top as u16),
            output_offset: self.config.dimensions.width - columns,
            lines: (bottom - top) as u16 + 1,
            pixels_per_line: columns,
        })
    }

    /// Number of transfers that ran to completion
    pub fn transfers(&self) -> u32 {
        self.transfers
    }

    /// Access the framebuffer configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the underlying interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Access the underlying interface mutably
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Release the interface and delay
    pub fn release(self) -> (I, D) {
        (self.interface, self.delay)
    }

    fn check_bounds(&self, x: i16, y: i16) -> Result<(), Error<I>> {
        if self.config.contains(x, y) {
            Ok(())
        } else {
            Err(Error::OutOfBounds { x, y })
        }
    }

    /// Reset, program, start, and wait for one transfer
    fn run(&mut self, transfer: Transfer) -> Result<(), Error<I>> {
        log::trace!(
            "[DMA2D] fill {}x{} at {:#010x} offset {}",
            transfer.pixels_per_line,
            transfer.lines,
            transfer.output_address,
            transfer.output_offset
        );

        self.interface.reset().map_err(Error::Interface)?;
        self.interface
            .configure(&transfer)
            .map_err(Error::Interface)?;
        self.interface.start().map_err(Error::Interface)?;
        self.wait_transfer_complete()?;

        self.transfers = self.transfers.wrapping_add(1);
        Ok(())
    }

    /// Poll the transfer-complete flag, 1us apart, for at most `timeout_us`
    fn wait_transfer_complete(&mut self) -> Result<(), Error<I>> {
        let timeout_us = self.config.timeout_us;
        let mut waited_us = 0u32;

        loop {
            if self
                .interface
                .transfer_complete()
                .map_err(Error::Interface)?
            {
                return Ok(());
            }
            if waited_us >= timeout_us {
                log::warn!("[DMA2D] transfer stalled after {}us", waited_us);
                return Err(Error::Timeout { waited_us });
            }
            self.delay.delay_us(1);
            waited_us += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, Dimensions};
    use crate::layer::pixel_index;
    use crate::sim::{NoopDelay, SimInterface};

    const WIDTH: u16 = 240;
    const HEIGHT: u16 = 320;
    const RED: u32 = 0xFFFF_0000;
    const RED_565: u16 = 0xF800;

    fn config() -> Config {
        Builder::new()
            .dimensions(Dimensions::new(WIDTH, HEIGHT).unwrap())
            .timeout_us(16)
            .build()
            .unwrap()
    }

    fn blitter() -> Blitter<SimInterface, NoopDelay> {
        let config = config();
        Blitter::new(SimInterface::new(&config), NoopDelay, config)
    }

    fn pixel(blitter: &Blitter<SimInterface, NoopDelay>, layer: Layer, x: u16, y: u16) -> u16 {
        blitter
            .interface()
            .word(pixel_index(blitter.config(), layer, x, y))
            .unwrap()
    }

    #[test]
    fn horizontal_line_writes_contiguous_row() {
        let mut blitter = blitter();
        blitter.draw_line(10, 5, 50, 5, RED).unwrap();

        let transfer = blitter.interface().last_transfer().unwrap();
        assert_eq!(transfer.lines, 1);
        assert_eq!(transfer.pixels_per_line, 41);
        assert_eq!(transfer.output_offset, 0);
        assert_eq!(transfer.output_address, 0xD000_0000 + 2 * (240 * 5 + 10));

        for x in 10..=50 {
            assert_eq!(pixel(&blitter, Layer::L1, x, 5), RED_565);
        }
        assert_eq!(pixel(&blitter, Layer::L1, 9, 5), 0);
        assert_eq!(pixel(&blitter, Layer::L1, 51, 5), 0);
        assert_eq!(blitter.interface().pixels_written(), 41);
    }

    #[test]
    fn vertical_line_advances_one_row_per_pixel() {
        let mut blitter = blitter();
        blitter.draw_line(7, 100, 7, 110, RED).unwrap();

        let transfer = blitter.interface().last_transfer().unwrap();
        assert_eq!(transfer.lines, 11);
        assert_eq!(transfer.pixels_per_line, 1);
        assert_eq!(transfer.output_offset, WIDTH - 1);

        for y in 100..=110 {
            assert_eq!(pixel(&blitter, Layer::L1, 7, y), RED_565);
        }
        assert_eq!(pixel(&blitter, Layer::L1, 8, 100), 0);
        assert_eq!(pixel(&blitter, Layer::L1, 7, 111), 0);
        assert_eq!(blitter.interface().pixels_written(), 11);
    }

    #[test]
    fn single_point_is_one_pixel_row() {
        let mut blitter = blitter();
        blitter.draw_line(3, 4, 3, 4, RED).unwrap();

        let transfer = blitter.interface().last_transfer().unwrap();
        assert_eq!((transfer.lines, transfer.pixels_per_line), (1, 1));
        assert_eq!(pixel(&blitter, Layer::L1, 3, 4), RED_565);
    }

    #[test]
    fn diagonal_line_is_rejected_without_hardware_access() {
        let mut blitter = blitter();
        let result = blitter.draw_line(0, 0, 10, 10, RED);

        assert!(matches!(
            result,
            Err(Error::UnsupportedGeometry {
                x1: 0,
                y1: 0,
                x2: 10,
                y2: 10
            })
        ));
        assert_eq!(blitter.interface().resets(), 0);
        assert!(blitter.interface().last_transfer().is_none());
        assert_eq!(blitter.interface().pixels_written(), 0);
        assert_eq!(blitter.transfers(), 0);
    }

    #[test]
    fn reversed_endpoints_start_at_top_left() {
        let mut blitter = blitter();
        blitter.draw_line(50, 5, 10, 5, RED).unwrap();
        let horizontal = blitter.interface().last_transfer().unwrap();
        assert_eq!(horizontal.output_address, 0xD000_0000 + 2 * (240 * 5 + 10));
        assert_eq!(horizontal.pixels_per_line, 41);

        blitter.draw_line(7, 110, 7, 100, RED).unwrap();
        let vertical = blitter.interface().last_transfer().unwrap();
        assert_eq!(vertical.output_address, 0xD000_0000 + 2 * (240 * 100 + 7));
        assert_eq!(vertical.lines, 11);
    }

    #[test]
    fn fill_frame_covers_rectangle_only() {
        let mut blitter = blitter();
        blitter.fill_frame(20, 30, 29, 34, RED).unwrap();

        let transfer = blitter.interface().last_transfer().unwrap();
        assert_eq!(transfer.pixels_per_line, 10);
        assert_eq!(transfer.lines, 5);
        assert_eq!(transfer.output_offset, WIDTH - 10);

        for y in 28..37 {
            for x in 18..32 {
                let inside = (20..=29).contains(&x) && (30..=34).contains(&y);
                let expected = if inside { RED_565 } else { 0 };
                assert_eq!(pixel(&blitter, Layer::L1, x, y), expected, "({x},{y})");
            }
        }
        assert_eq!(blitter.interface().pixels_written(), 50);
    }

    #[test]
    fn fill_frame_full_screen() {
        let mut blitter = blitter();
        blitter
            .fill_frame(0, 0, WIDTH as i16 - 1, HEIGHT as i16 - 1, RED)
            .unwrap();

        let transfer = blitter.interface().last_transfer().unwrap();
        assert_eq!(transfer.output_offset, 0);
        assert_eq!(
            blitter.interface().pixels_written(),
            WIDTH as u32 * HEIGHT as u32
        );
        assert_eq!(pixel(&blitter, Layer::L1, 239, 319), RED_565);
        assert_eq!(pixel(&blitter, Layer::L2, 0, 0), 0);
    }

    #[test]
    fn work_layer_selects_destination() {
        let mut blitter = blitter();
        blitter.set_work_layer(Layer::L2);
        blitter.fill_frame(0, 0, 3, 3, RED).unwrap();

        assert_eq!(pixel(&blitter, Layer::L2, 3, 3), RED_565);
        assert_eq!(pixel(&blitter, Layer::L1, 3, 3), 0);
        assert_eq!(
            blitter.interface().last_transfer().unwrap().output_address,
            0xD005_0000
        );
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut blitter = blitter();
        assert!(matches!(
            blitter.draw_line(0, 320, 10, 320, RED),
            Err(Error::OutOfBounds { x: 0, y: 320 })
        ));
        assert!(matches!(
            blitter.fill_frame(-1, 0, 10, 10, RED),
            Err(Error::OutOfBounds { x: -1, y: 0 })
        ));
        assert_eq!(blitter.interface().resets(), 0);
    }

    #[test]
    fn stalled_transfer_times_out() {
        let mut blitter = blitter();
        blitter.interface_mut().stall(true);

        let result = blitter.fill_frame(0, 0, 1, 1, RED);
        assert!(matches!(result, Err(Error::Timeout { waited_us: 16 })));
        assert_eq!(blitter.transfers(), 0);

        blitter.interface_mut().stall(false);
        blitter.fill_frame(0, 0, 1, 1, RED).unwrap();
        assert_eq!(blitter.transfers(), 1);
    }

    #[test]
    fn each_transfer_resets_first() {
        let mut blitter = blitter();
        blitter.draw_line(0, 0, 5, 0, RED).unwrap();
        blitter.fill_frame(0, 1, 5, 2, RED).unwrap();
        assert_eq!(blitter.interface().resets(), 2);
        assert_eq!(blitter.transfers(), 2);
    }

    #[test]
    fn alpha_of_request_is_not_propagated() {
        let mut blitter = blitter();
        blitter.fill_frame(0, 0, 0, 0, 0x0000_00FF).unwrap();
        let translucent = blitter.interface().last_transfer().unwrap().color;
        blitter.fill_frame(0, 0, 0, 0, 0xFF00_00FF).unwrap();
        let opaque = blitter.interface().last_transfer().unwrap().color;
        assert_eq!(translucent, opaque);
        assert_eq!(opaque.alpha, HwColor::OPAQUE);
    }
}
