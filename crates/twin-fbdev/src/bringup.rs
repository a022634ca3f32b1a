//! Board bring-up.
//!
//! The clock tree, SDRAM controller, LCD-TFT controller, panel and touch
//! controller are set up by board support code; the backend only sequences
//! the steps and stops at the first failure.

use dma2d::Layer;

/// Bring-up steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    System,
    Sdram,
    Ltdc,
    Panel,
    Touch,
    Heartbeat,
}

/// Board support needed by the backend.
pub trait Peripherals {
    type Error: core::fmt::Debug;

    /// Clock tree, flash wait states, delay timer.
    fn init_system(&mut self) -> Result<(), Self::Error>;

    /// External SDRAM holding the framebuffer layers.
    fn init_sdram(&mut self) -> Result<(), Self::Error>;

    /// LCD-TFT controller and both layers.
    fn init_ltdc(&mut self) -> Result<(), Self::Error>;

    /// Panel controller (ILI9341 on the discovery board).
    fn init_panel(&mut self) -> Result<(), Self::Error>;

    /// Touch controller I/O expander.
    fn init_touch(&mut self) -> Result<(), Self::Error>;

    /// Current core clock, read after [`init_system`](Self::init_system).
    fn core_clock_hz(&self) -> u32;

    /// Program SysTick with `reload` and enable its interrupt.
    fn start_heartbeat(&mut self, reload: u32) -> Result<(), Self::Error>;

    /// Make `layer` the one the LCD-TFT controller scans out.
    fn show_layer(&mut self, layer: Layer);
}
