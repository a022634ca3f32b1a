//! In-memory blitter model for host tests
//!
//! [`SimInterface`] implements [`BlitterInterface`] over a [`SharedMemory`]
//! that stands in for the framebuffer. Register-to-memory transfers are
//! executed exactly as the hardware lays them out (lines, pixels per line,
//! output offset), so tests can inspect the resulting pixels. Handing the
//! same [`SharedMemory`] to a [`LayerBuffer`](crate::LayerBuffer) puts the
//! software and accelerated paths on one framebuffer, as on the target.

extern crate alloc;

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;

use embedded_hal::delay::DelayNs;

use crate::config::Config;
use crate::interface::{BlitterInterface, Transfer};
use crate::layer::FrameMemory;

impl FrameMemory for Vec<u16> {
    fn load(&self, index: usize) -> Option<u16> {
        self.as_slice().load(index)
    }

    fn store(&mut self, index: usize, value: u16) -> bool {
        self.as_mut_slice().store(index, value)
    }
}

/// Framebuffer words shared between several owners
///
/// Clones refer to the same memory.
#[derive(Clone, Debug, Default)]
pub struct SharedMemory {
    words: Rc<RefCell<Vec<u16>>>,
}

impl SharedMemory {
    /// Zeroed memory of `len` words
    pub fn new(len: usize) -> Self {
        Self {
            words: Rc::new(RefCell::new(vec![0; len])),
        }
    }

    /// Zeroed memory covering both layers of `config`
    pub fn for_config(config: &Config) -> Self {
        Self::new((config.memory_size() / 2) as usize)
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.words.borrow().len()
    }

    /// Whether the memory holds no words
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Word at `index` from the framebuffer base
    pub fn word(&self, index: usize) -> Option<u16> {
        self.words.borrow().get(index).copied()
    }

    /// Copy of the whole memory
    pub fn to_vec(&self) -> Vec<u16> {
        self.words.borrow().clone()
    }
}

impl FrameMemory for SharedMemory {
    fn load(&self, index: usize) -> Option<u16> {
        self.word(index)
    }

    fn store(&mut self, index: usize, value: u16) -> bool {
        self.words.borrow_mut().as_mut_slice().store(index, value)
    }
}

/// Errors raised by the simulated blitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// `start` was called without a configured transfer
    NotConfigured,
    /// A pixel fell outside the simulated memory
    AddressOutOfRange {
        /// Offending byte address
        address: u32,
    },
}

/// Simulated DMA2D writing into host memory
#[derive(Debug)]
pub struct SimInterface {
    /// Address of word 0 of `memory`
    base_address: u32,
    /// Framebuffer contents, one word per pixel
    memory: SharedMemory,
    /// Transfer waiting for `start`
    pending: Option<Transfer>,
    /// Every transfer that was started
    history: Vec<Transfer>,
    /// Transfer-complete flag
    complete: bool,
    /// When set, started transfers never complete
    stalled: bool,
    /// Peripheral resets seen
    resets: u32,
    /// Pixels written since creation
    pixels_written: u32,
}

impl SimInterface {
    /// Create a model with its own zeroed memory covering both layers of
    /// `config`
    pub fn new(config: &Config) -> Self {
        Self::with_memory(config, SharedMemory::for_config(config))
    }

    /// Create a model writing into `memory`, which starts at
    /// `config.base_address`
    pub fn with_memory(config: &Config, memory: SharedMemory) -> Self {
        Self {
            base_address: config.base_address,
            memory,
            pending: None,
            history: Vec::new(),
            complete: false,
            stalled: false,
            resets: 0,
            pixels_written: 0,
        }
    }

    /// Make started transfers hang (or stop hanging)
    pub fn stall(&mut self, stalled: bool) {
        self.stalled = stalled;
    }

    /// Pixel word at `index` from the framebuffer base
    pub fn word(&self, index: usize) -> Option<u16> {
        self.memory.word(index)
    }

    /// The simulated memory
    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    /// Most recently started transfer
    pub fn last_transfer(&self) -> Option<&Transfer> {
        self.history.last()
    }

    /// All started transfers, oldest first
    pub fn history(&self) -> &[Transfer] {
        &self.history
    }

    /// Number of peripheral resets
    pub fn resets(&self) -> u32 {
        self.resets
    }

    /// Number of pixels written by completed transfers
    pub fn pixels_written(&self) -> u32 {
        self.pixels_written
    }

    fn execute(&mut self, transfer: &Transfer) -> Result<(), SimError> {
        let value = transfer.output_color() as u16;
        let pitch = transfer.pitch();

        for line in 0..transfer.lines as u32 {
            for pixel in 0..transfer.pixels_per_line as u32 {
                let address = transfer.output_address + 2 * (line * pitch + pixel);
                let stored = address
                    .checked_sub(self.base_address)
                    .is_some_and(|offset| self.memory.store((offset / 2) as usize, value));
                if !stored {
                    return Err(SimError::AddressOutOfRange { address });
                }
                self.pixels_written += 1;
            }
        }
        Ok(())
    }
}

impl BlitterInterface for SimInterface {
    type Error = SimError;

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.pending = None;
        self.complete = false;
        self.resets += 1;
        Ok(())
    }

    fn configure(&mut self, transfer: &Transfer) -> Result<(), Self::Error> {
        self.pending = Some(*transfer);
        self.complete = false;
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        let transfer = self.pending.ok_or(SimError::NotConfigured)?;
        self.history.push(transfer);
        if self.stalled {
            return Ok(());
        }
        self.execute(&transfer)?;
        self.complete = true;
        Ok(())
    }

    fn transfer_complete(&mut self) -> Result<bool, Self::Error> {
        Ok(self.complete)
    }
}

/// Delay that returns immediately
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDelay;

impl DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
