//! Framebuffer configuration types and builder

pub use crate::error::{BuilderError, MAX_LINES, MAX_PIXELS_PER_LINE};

/// Start of SDRAM bank 2 on the STM32F429 (FMC)
pub const SDRAM_BANK_ADDR: u32 = 0xD000_0000;

/// Default byte offset of layer 1 from [`SDRAM_BANK_ADDR`]
pub const LAYER_1_OFFSET: u32 = 0x0000_0000;

/// Default byte offset of layer 2 from [`SDRAM_BANK_ADDR`]
pub const LAYER_2_OFFSET: u32 = 0x0005_0000;

/// Bytes per pixel in the RGB565 framebuffer
pub const BYTES_PER_PIXEL: u32 = 2;

/// Screen dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Horizontal resolution (row width) in pixels
    pub width: u16,
    /// Vertical resolution in pixels
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - either side is zero
    /// - width > MAX_PIXELS_PER_LINE
    /// - height > MAX_LINES
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_PIXELS_PER_LINE || height == 0 || height > MAX_LINES {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Bytes needed for one layer
    pub fn layer_size(&self) -> u32 {
        self.width as u32 * self.height as u32 * BYTES_PER_PIXEL
    }
}

/// Blitter and framebuffer configuration
///
/// Use [`Builder`] to create a Config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Screen dimensions
    pub dimensions: Dimensions,
    /// Address of the framebuffer memory
    pub base_address: u32,
    /// Byte offsets of layer 1 and layer 2 from `base_address`
    pub layer_offsets: [u32; 2],
    /// How long to wait for a transfer to complete, in microseconds
    pub timeout_us: u32,
}

impl Config {
    /// Whether `(x, y)` lies on the screen
    pub fn contains(&self, x: i16, y: i16) -> bool {
        0 <= x
            && (x as i32) < self.dimensions.width as i32
            && 0 <= y
            && (y as i32) < self.dimensions.height as i32
    }

    /// Bytes of framebuffer memory both layers span, starting at `base_address`
    pub fn memory_size(&self) -> u32 {
        let [first, second] = self.layer_offsets;
        first.max(second) + self.dimensions.layer_size()
    }
}

/// Builder for constructing blitter configuration
///
/// # Example
///
/// ```
/// use dma2d::{Builder, Dimensions};
///
/// let config = Builder::new()
///     .dimensions(Dimensions::new(240, 320).unwrap())
///     .timeout_us(50_000)
///     .build()
///     .expect("valid configuration");
/// assert_eq!(config.base_address, 0xD000_0000);
/// ```
pub struct Builder {
    /// Screen dimensions (required)
    dimensions: Option<Dimensions>,
    /// Address of the framebuffer memory
    base_address: u32,
    /// Layer byte offsets
    layer_offsets: [u32; 2],
    /// Completion timeout in microseconds
    timeout_us: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            dimensions: None,
            base_address: SDRAM_BANK_ADDR,
            layer_offsets: [LAYER_1_OFFSET, LAYER_2_OFFSET],
            // A full-screen 240x320 fill takes well under a millisecond
            timeout_us: 100_000,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set screen dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the framebuffer base address
    pub fn base_address(mut self, address: u32) -> Self {
        self.base_address = address;
        self
    }

    /// Set the byte offsets of layer 1 and layer 2
    pub fn layer_offsets(mut self, layer1: u32, layer2: u32) -> Self {
        self.layer_offsets = [layer1, layer2];
        self
    }

    /// Set the transfer completion timeout
    pub fn timeout_us(mut self, timeout_us: u32) -> Self {
        self.timeout_us = timeout_us;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - `BuilderError::MissingDimensions` if dimensions were not set
    /// - `BuilderError::MisalignedLayer` if a layer offset is odd
    /// - `BuilderError::OverlappingLayers` if the layers share memory
    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;

        for offset in self.layer_offsets {
            if offset % BYTES_PER_PIXEL != 0 {
                return Err(BuilderError::MisalignedLayer { offset });
            }
        }

        let [first, second] = self.layer_offsets;
        let distance = first.abs_diff(second);
        let layer_size = dimensions.layer_size();
        if distance < layer_size {
            return Err(BuilderError::OverlappingLayers {
                layer_size,
                distance,
            });
        }

        Ok(Config {
            dimensions,
            base_address: self.base_address,
            layer_offsets: self.layer_offsets,
            timeout_us: self.timeout_us,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qvga() -> Dimensions {
        Dimensions::new(240, 320).unwrap()
    }

    #[test]
    fn defaults_match_discovery_board() {
        let config = Builder::new().dimensions(qvga()).build().unwrap();
        assert_eq!(config.base_address, SDRAM_BANK_ADDR);
        assert_eq!(config.layer_offsets, [0, 0x5_0000]);
        assert_eq!(config.timeout_us, 100_000);
    }

    #[test]
    fn rejects_zero_and_oversized_dimensions() {
        assert!(Dimensions::new(0, 10).is_err());
        assert!(Dimensions::new(10, 0).is_err());
        assert!(Dimensions::new(MAX_PIXELS_PER_LINE + 1, 10).is_err());
        assert!(Dimensions::new(MAX_PIXELS_PER_LINE, MAX_LINES).is_ok());
    }

    #[test]
    fn rejects_odd_layer_offset() {
        let result = Builder::new()
            .dimensions(qvga())
            .layer_offsets(0, 0x5_0001)
            .build();
        assert_eq!(
            result,
            Err(BuilderError::MisalignedLayer { offset: 0x5_0001 })
        );
    }

    #[test]
    fn rejects_overlapping_layers() {
        // 240x320x2 = 153600 bytes per layer
        let result = Builder::new()
            .dimensions(qvga())
            .layer_offsets(0, 153_598)
            .build();
        assert_eq!(
            result,
            Err(BuilderError::OverlappingLayers {
                layer_size: 153_600,
                distance: 153_598,
            })
        );

        let adjacent = Builder::new()
            .dimensions(qvga())
            .layer_offsets(153_600, 0)
            .build();
        assert!(adjacent.is_ok());
    }

    #[test]
    fn contains_checks_both_axes() {
        let config = Builder::new().dimensions(qvga()).build().unwrap();
        assert!(config.contains(0, 0));
        assert!(config.contains(239, 319));
        assert!(!config.contains(240, 0));
        assert!(!config.contains(0, 320));
        assert!(!config.contains(-1, 5));
        assert!(!config.contains(5, -1));
    }

    #[test]
    fn memory_size_covers_highest_layer() {
        let config = Builder::new().dimensions(qvga()).build().unwrap();
        assert_eq!(config.memory_size(), 0x5_0000 + 153_600);
    }
}
