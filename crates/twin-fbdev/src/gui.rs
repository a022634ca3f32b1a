//! GUI drawing with optional hardware acceleration.
//!
//! [`Gui`] owns a software draw target, an [`Accelerator`], and the
//! [`DriverTable`] deciding which primitives go to the accelerator. A driver
//! that returns an error (a diagonal line handed to the blitter, for
//! instance) is treated as absent: the same request is redrawn in software.

use dma2d::color::argb_to_rgb565;
use dma2d::{Blitter, BlitterInterface};
use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};
use embedded_hal::delay::DelayNs;

use crate::registry::{self, Driver, DriverTable};

/// Hardware that can take over line and rectangle drawing.
///
/// Coordinates are inclusive screen pixels; colors are packed ARGB8888.
pub trait Accelerator {
    type Error: core::fmt::Debug;

    fn draw_line(&mut self, x1: i16, y1: i16, x2: i16, y2: i16, color: u32)
        -> Result<(), Self::Error>;

    fn fill_frame(&mut self, x1: i16, y1: i16, x2: i16, y2: i16, color: u32)
        -> Result<(), Self::Error>;
}

impl<I, D> Accelerator for Blitter<I, D>
where
    I: BlitterInterface,
    D: DelayNs,
{
    type Error = dma2d::Error<I>;

    fn draw_line(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: u32,
    ) -> Result<(), Self::Error> {
        Blitter::draw_line(self, x1, y1, x2, y2, color)
    }

    fn fill_frame(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: u32,
    ) -> Result<(), Self::Error> {
        Blitter::fill_frame(self, x1, y1, x2, y2, color)
    }
}

pub struct Gui<D, A>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
    A: Accelerator,
{
    target: D,
    accel: A,
    drivers: DriverTable<A>,
}

impl<D, A> Gui<D, A>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
    A: Accelerator,
{
    /// Create a GUI with every primitive on the software path.
    pub fn new(target: D, accel: A) -> Self {
        Self {
            target,
            accel,
            drivers: DriverTable::new(),
        }
    }

    pub fn register(&mut self, driver: Driver<A>) {
        self.drivers.register(driver);
    }

    pub fn enable(&mut self, primitive: registry::Primitive) {
        self.drivers.enable(primitive);
    }

    pub fn disable(&mut self, primitive: registry::Primitive) {
        self.drivers.disable(primitive);
    }

    pub fn drivers(&self) -> &DriverTable<A> {
        &self.drivers
    }

    /// Screen width in pixels.
    pub fn width(&self) -> u32 {
        self.target.size().width
    }

    /// Screen height in pixels.
    pub fn height(&self) -> u32 {
        self.target.size().height
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn accelerator(&self) -> &A {
        &self.accel
    }

    pub fn accelerator_mut(&mut self) -> &mut A {
        &mut self.accel
    }

    /// Draw a line, both endpoints included.
    pub fn draw_line(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: u32,
    ) -> Result<(), D::Error> {
        if let Some(driver) = self.drivers.line_driver() {
            match driver(&mut self.accel, x1, y1, x2, y2, color) {
                Ok(()) => return Ok(()),
                Err(e) => log::debug!("[GUI] line driver declined, drawing in software: {:?}", e),
            }
        }

        Line::new(point(x1, y1), point(x2, y2))
            .into_styled(PrimitiveStyle::with_stroke(argb_to_rgb565(color), 1))
            .draw(&mut self.target)
    }

    /// Fill a rectangle given two opposite corners, both included.
    pub fn fill_frame(
        &mut self,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: u32,
    ) -> Result<(), D::Error> {
        let (x1, x2) = (x1.min(x2), x1.max(x2));
        let (y1, y2) = (y1.min(y2), y1.max(y2));

        if let Some(driver) = self.drivers.fill_driver() {
            match driver(&mut self.accel, x1, y1, x2, y2, color) {
                Ok(()) => return Ok(()),
                Err(e) => log::debug!("[GUI] fill driver declined, drawing in software: {:?}", e),
            }
        }

        Rectangle::with_corners(point(x1, y1), point(x2, y2))
            .into_styled(PrimitiveStyle::with_fill(argb_to_rgb565(color)))
            .draw(&mut self.target)
    }

    /// Fill the whole screen.
    pub fn fill_screen(&mut self, color: u32) -> Result<(), D::Error> {
        let size = self.target.size();
        let right = size.width.saturating_sub(1).min(i16::MAX as u32) as i16;
        let bottom = size.height.saturating_sub(1).min(i16::MAX as u32) as i16;
        self.fill_frame(0, 0, right, bottom, color)
    }

    /// Set a single pixel through the software path.
    pub fn draw_pixel(&mut self, x: i16, y: i16, color: u32) -> Result<(), D::Error> {
        Pixel(point(x, y), argb_to_rgb565(color)).draw(&mut self.target)
    }
}

fn point(x: i16, y: i16) -> Point {
    Point::new(x.into(), y.into())
}
