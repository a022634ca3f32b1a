// DMA2D and RCC register definitions (STM32F42x/43x reference manual, RM0090)

// Peripheral base addresses
pub const DMA2D_BASE: usize = 0x4002_B000; // DMA2D register block
pub const RCC_AHB1RSTR: usize = 0x4002_3810; // RCC AHB1 peripheral reset register

// RCC_AHB1RSTR
pub const AHB1RSTR_DMA2DRST: u32 = 1 << 23; // DMA2D reset

// DMA2D_CR
pub const CR_START: u32 = 1 << 0; // Start transfer
pub const CR_MODE_SHIFT: u32 = 16; // Transfer mode field
pub const CR_MODE_MASK: u32 = 0b11 << CR_MODE_SHIFT;
pub const MODE_R2M: u32 = 0b11; // Register-to-memory (constant color fill)

// DMA2D_ISR / DMA2D_IFCR
pub const ISR_TCIF: u32 = 1 << 1; // Transfer complete
pub const IFCR_CTCIF: u32 = 1 << 1; // Clear transfer complete

// DMA2D_OPFCCR
pub const OPFCCR_CM_MASK: u32 = 0b111; // Output color mode
pub const CM_RGB565: u32 = 0b010;

// DMA2D_NLR
pub const NLR_PL_SHIFT: u32 = 16; // Pixels per line
pub const NLR_PL_MAX: u32 = 0x3FFF;
pub const NLR_NL_MAX: u32 = 0xFFFF; // Number of lines

// DMA2D_OOR
pub const OOR_LO_MAX: u32 = 0x3FFF; // Output line offset

// DMA2D_OCOLR, RGB565 layout
pub const OCOLR_565_RED_SHIFT: u32 = 11;
pub const OCOLR_565_GREEN_SHIFT: u32 = 5;
