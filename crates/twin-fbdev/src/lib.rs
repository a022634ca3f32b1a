//! Framebuffer backend for the twin compositor on STM32F4x9 boards.
//! Routes compositor spans and GUI primitives onto the DMA2D blitter.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

extern crate alloc;

pub mod bringup;
pub mod error;
pub mod fbdev;
pub mod gui;
pub mod heartbeat;
pub mod registry;
pub mod screen;
pub mod span;
pub mod work;

pub use bringup::{Peripherals, Stage};
pub use error::FbDevError;
pub use fbdev::{FbDev, LayerTarget};
pub use gui::{Accelerator, Gui};
pub use heartbeat::{Heartbeat, HeartbeatError, Pacer, SystickConfig, HEARTBEAT_HZ};
pub use registry::{Driver, DriverTable, Primitive};
pub use screen::{DamageScreen, Screen};
pub use span::SpanSink;
pub use work::{WorkPriority, WorkQueue};

pub use dma2d::Layer;

/// Display dimensions of the ILI9341 panel on the STM32F429I-DISCO.
pub const DISPLAY_WIDTH: u16 = 240;
pub const DISPLAY_HEIGHT: u16 = 320;
