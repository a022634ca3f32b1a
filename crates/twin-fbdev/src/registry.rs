//! Hardware driver slots for GUI primitives.
//!
//! Each acceleratable primitive has one slot holding an optional driver and
//! an enable flag. The GUI asks the table for a driver before every draw and
//! uses its software path whenever the slot is empty or disabled.

use crate::gui::Accelerator;

/// Primitive kinds that can be accelerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    DrawLine,
    FillFrame,
}

/// Signature shared by the line and fill drivers: `(x1, y1, x2, y2, argb)`.
pub type DriverFn<A> =
    fn(&mut A, i16, i16, i16, i16, u32) -> Result<(), <A as Accelerator>::Error>;

/// A driver for one primitive.
pub enum Driver<A: Accelerator> {
    DrawLine(DriverFn<A>),
    FillFrame(DriverFn<A>),
}

impl<A: Accelerator> Driver<A> {
    pub fn primitive(&self) -> Primitive {
        match self {
            Driver::DrawLine(_) => Primitive::DrawLine,
            Driver::FillFrame(_) => Primitive::FillFrame,
        }
    }
}

struct Slot<A: Accelerator> {
    driver: Option<DriverFn<A>>,
    enabled: bool,
}

impl<A: Accelerator> Slot<A> {
    const fn empty() -> Self {
        Self {
            driver: None,
            enabled: false,
        }
    }

    fn active(&self) -> Option<DriverFn<A>> {
        if self.enabled {
            self.driver
        } else {
            None
        }
    }
}

/// Driver slots for every [`Primitive`].
pub struct DriverTable<A: Accelerator> {
    draw_line: Slot<A>,
    fill_frame: Slot<A>,
}

impl<A: Accelerator> DriverTable<A> {
    pub const fn new() -> Self {
        Self {
            draw_line: Slot::empty(),
            fill_frame: Slot::empty(),
        }
    }

    /// Install a driver. The slot keeps its current enable state.
    pub fn register(&mut self, driver: Driver<A>) {
        let (slot, f) = match driver {
            Driver::DrawLine(f) => (&mut self.draw_line, f),
            Driver::FillFrame(f) => (&mut self.fill_frame, f),
        };
        slot.driver = Some(f);
    }

    /// Enable a primitive's driver. Does nothing if no driver is registered.
    pub fn enable(&mut self, primitive: Primitive) {
        let slot = self.slot_mut(primitive);
        if slot.driver.is_some() {
            slot.enabled = true;
        } else {
            log::warn!("[GUI] enable {:?} without a registered driver", primitive);
        }
    }

    pub fn disable(&mut self, primitive: Primitive) {
        self.slot_mut(primitive).enabled = false;
    }

    pub fn is_registered(&self, primitive: Primitive) -> bool {
        self.slot(primitive).driver.is_some()
    }

    pub fn is_enabled(&self, primitive: Primitive) -> bool {
        self.slot(primitive).enabled
    }

    /// The line driver, if registered and enabled.
    pub fn line_driver(&self) -> Option<DriverFn<A>> {
        self.draw_line.active()
    }

    /// The fill driver, if registered and enabled.
    pub fn fill_driver(&self) -> Option<DriverFn<A>> {
        self.fill_frame.active()
    }

    fn slot(&self, primitive: Primitive) -> &Slot<A> {
        match primitive {
            Primitive::DrawLine => &self.draw_line,
            Primitive::FillFrame => &self.fill_frame,
        }
    }

    fn slot_mut(&mut self, primitive: Primitive) -> &mut Slot<A> {
        match primitive {
            Primitive::DrawLine => &mut self.draw_line,
            Primitive::FillFrame => &mut self.fill_frame,
        }
    }
}

impl<A: Accelerator> Default for DriverTable<A> {
    fn default() -> Self {
        Self::new()
    }
}
