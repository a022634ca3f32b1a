//! Hardware interface abstraction
//!
//! This module provides the [`BlitterInterface`] trait, the [`Transfer`]
//! description it consumes, and [`Dma2d`], the register-level implementation
//! for the STM32F4x9 Chrom-ART accelerator.
//!
//! ## Hardware Requirements
//!
//! The DMA2D peripheral needs its AHB1 clock enabled and the output memory
//! (usually SDRAM behind the FMC) initialized before the first transfer.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dma2d::{BlitterInterface, Dma2d};
//!
//! let mut dma2d = unsafe { Dma2d::take() };
//!
//! dma2d.reset()?;
//! dma2d.configure(&transfer)?;
//! dma2d.start()?;
//! while !dma2d.transfer_complete()? {}
//! ```

use core::convert::Infallible;
use core::fmt::Debug;

use volatile_register::{RO, RW, WO};

use crate::color::HwColor;
use crate::register::*;

/// One constant-color fill, as programmed into the output registers
///
/// Every transfer runs in register-to-memory mode with RGB565 output. The
/// blitter writes `lines` rows of `pixels_per_line` pixels starting at
/// `output_address`. After each row it skips `output_offset` pixels, so a
/// row pitch of `pixels_per_line + output_offset` pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transfer {
    /// Constant output color
    pub color: HwColor,
    /// Address of the first output pixel
    pub output_address: u32,
    /// Pixels skipped at the end of each line
    pub output_offset: u16,
    /// Number of lines
    pub lines: u16,
    /// Pixels per line
    pub pixels_per_line: u16,
}

impl Transfer {
    /// Number of pixels the transfer writes
    pub fn pixel_count(&self) -> u32 {
        self.lines as u32 * self.pixels_per_line as u32
    }

    /// Distance between the first pixels of two consecutive lines, in pixels
    pub fn pitch(&self) -> u32 {
        self.pixels_per_line as u32 + self.output_offset as u32
    }

    /// OCOLR value, the color packed as RGB565
    pub fn output_color(&self) -> u32 {
        self.color.to_rgb565() as u32
    }
}

/// Trait for hardware interface to the blitter
///
/// This trait abstracts over the register block so the
/// [`Blitter`](crate::blitter::Blitter) can run against real hardware or the
/// in-memory model in [`sim`](crate::sim).
pub trait BlitterInterface {
    /// Error type for interface operations
    type Error: Debug;

    /// Reset the peripheral, clearing any previous configuration and flags
    fn reset(&mut self) -> Result<(), Self::Error>;

    /// Program a transfer without starting it
    fn configure(&mut self, transfer: &Transfer) -> Result<(), Self::Error>;

    /// Start the programmed transfer
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Whether the transfer-complete flag is set
    fn transfer_complete(&mut self) -> Result<bool, Self::Error>;
}

/// DMA2D register block
#[repr(C)]
pub struct RegisterBlock {
    pub cr: RW<u32>,
    pub isr: RO<u32>,
    pub ifcr: WO<u32>,
    pub fgmar: RW<u32>,
    pub fgor: RW<u32>,
    pub bgmar: RW<u32>,
    pub bgor: RW<u32>,
    pub fgpfccr: RW<u32>,
    pub fgcolr: RW<u32>,
    pub bgpfccr: RW<u32>,
    pub bgcolr: RW<u32>,
    pub fgcmar: RW<u32>,
    pub bgcmar: RW<u32>,
    pub opfccr: RW<u32>,
    pub ocolr: RW<u32>,
    pub omar: RW<u32>,
    pub oor: RW<u32>,
    pub nlr: RW<u32>,
    pub lwr: RW<u32>,
    pub amtcr: RW<u32>,
}

/// Register-level interface to the STM32F4x9 DMA2D
pub struct Dma2d {
    regs: &'static mut RegisterBlock,
    rcc_ahb1rstr: &'static RW<u32>,
}

impl Dma2d {
    /// Claim the DMA2D and RCC reset registers at their fixed addresses
    ///
    /// # Safety
    ///
    /// Only one `Dma2d` may exist at a time, the DMA2D clock must be enabled,
    /// and nothing else may touch the DMA2D registers while it is alive.
    pub unsafe fn take() -> Self {
        unsafe {
            Self {
                regs: &mut *(DMA2D_BASE as *mut RegisterBlock),
                rcc_ahb1rstr: &*(RCC_AHB1RSTR as *const RW<u32>),
            }
        }
    }
}

impl BlitterInterface for Dma2d {
    type Error = Infallible;

    fn reset(&mut self) -> Result<(), Self::Error> {
        // Pulse the peripheral reset line
        unsafe {
            self.rcc_ahb1rstr.modify(|r| r | AHB1RSTR_DMA2DRST);
            self.rcc_ahb1rstr.modify(|r| r & !AHB1RSTR_DMA2DRST);
        }
        Ok(())
    }

    fn configure(&mut self, transfer: &Transfer) -> Result<(), Self::Error> {
        let nlr = ((transfer.pixels_per_line as u32 & NLR_PL_MAX) << NLR_PL_SHIFT)
            | (transfer.lines as u32 & NLR_NL_MAX);

        unsafe {
            self.regs
                .cr
                .modify(|r| (r & !CR_MODE_MASK) | (MODE_R2M << CR_MODE_SHIFT));
            self.regs
                .opfccr
                .modify(|r| (r & !OPFCCR_CM_MASK) | CM_RGB565);
            self.regs.ocolr.write(transfer.output_color());
            self.regs.omar.write(transfer.output_address);
            self.regs
                .oor
                .write(transfer.output_offset as u32 & OOR_LO_MAX);
            self.regs.nlr.write(nlr);
            self.regs.ifcr.write(IFCR_CTCIF);
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), Self::Error> {
        unsafe { self.regs.cr.modify(|r| r | CR_START) };
        Ok(())
    }

    fn transfer_complete(&mut self) -> Result<bool, Self::Error> {
        Ok(self.regs.isr.read() & ISR_TCIF != 0)
    }
}
