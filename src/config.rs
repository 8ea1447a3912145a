//! Display configuration types and builder

use crate::command::{BOOSTER_DURATION, BOOSTER_PHASE, TEMP_SENSOR_INTERNAL};
pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};

/// Default timeout for busy-wait in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 30_000;

/// Display dimensions
///
/// Always the physical (0°) resolution: `cols` runs along the source outputs,
/// `rows` along the gate outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of rows (height in pixels, corresponds to gate outputs)
    pub rows: u16,
    /// Number of columns (width in pixels, corresponds to source outputs)
    pub cols: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// The width does not need to be a multiple of 8; each row is padded to
    /// whole bytes.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - rows == 0 or rows > MAX_GATE_OUTPUTS
    /// - cols == 0 or cols > MAX_SOURCE_OUTPUTS
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        if cols == 0 || cols > MAX_SOURCE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Bytes per physical row, `ceil(cols / 8)`
    pub fn columns(&self) -> u16 {
        self.cols.div_ceil(8)
    }

    /// Size of one framebuffer plane in bytes
    pub fn plane_size(&self) -> usize {
        self.columns() as usize * self.rows as usize
    }
}

/// Display orientation relative to the panel wiring
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Orientation {
    /// Native orientation
    #[default]
    Deg0,
    /// Rotated 90 degrees
    Deg90,
    /// Rotated 180 degrees
    Deg180,
    /// Rotated 270 degrees
    Deg270,
}

impl Orientation {
    /// Whether the logical axes are swapped relative to the panel
    pub fn is_transposed(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }

    /// Logical `(width, height)` for a panel of the given dimensions
    pub fn logical_size(self, dims: Dimensions) -> (u16, u16) {
        if self.is_transposed() {
            (dims.rows, dims.cols)
        } else {
            (dims.cols, dims.rows)
        }
    }
}

/// Display configuration
///
/// Holds the controller parameters programmed during configuration.
/// Use `Builder` to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Initial orientation
    pub orientation: Orientation,
    /// Booster soft-start settings (4 bytes for command 0x0C)
    pub booster_soft_start: [u8; 4],
    /// Gate scanning flags (GD/SM/TB byte of command 0x01)
    pub gate_scanning: u8,
    /// Border waveform setting
    pub border_waveform: u8,
    /// Display Update Control 1 parameters
    pub display_update_ctrl1: [u8; 2],
    /// Temperature sensor control
    pub temp_sensor_control: u8,
    /// Busy-wait timeout in milliseconds (0 disables the timeout)
    pub busy_timeout_ms: u32,
}

impl Config {
    /// Logical `(width, height)` in the configured orientation
    pub fn logical_size(&self) -> (u16, u16) {
        self.orientation.logical_size(self.dimensions)
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use ssd1680::{Builder, Dimensions, Orientation};
///
/// let dims = match Dimensions::new(250, 122) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).orientation(Orientation::Deg90).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// Initial orientation
    orientation: Orientation,
    /// Booster soft-start settings (4 bytes for command 0x0C)
    booster_soft_start: [u8; 4],
    /// Gate scanning flags
    gate_scanning: u8,
    /// Border waveform setting
    border_waveform: u8,
    /// Display Update Control 1 parameters
    display_update_ctrl1: [u8; 2],
    /// Temperature sensor control
    temp_sensor_control: u8,
    /// Busy-wait timeout in milliseconds
    busy_timeout_ms: u32,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            orientation: Orientation::Deg0,
            booster_soft_start: [BOOSTER_PHASE, BOOSTER_PHASE, BOOSTER_PHASE, BOOSTER_DURATION],
            // GD=0, SM=0, TB=0
            gate_scanning: 0x00,
            // Follow LUT, GS transition LUT1
            border_waveform: 0x05,
            // Normal RAM content, source S8..S167
            display_update_ctrl1: [0x00, 0x80],
            temp_sensor_control: TEMP_SENSOR_INTERNAL,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the initial orientation
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set booster soft-start parameters
    pub fn booster_soft_start(mut self, values: [u8; 4]) -> Self {
        self.booster_soft_start = values;
        self
    }

    /// Set gate scanning flags
    pub fn gate_scanning(mut self, value: u8) -> Self {
        self.gate_scanning = value;
        self
    }

    /// Set border waveform
    pub fn border_waveform(mut self, value: u8) -> Self {
        self.border_waveform = value;
        self
    }

    /// Set Display Update Control 1 parameters
    pub fn display_update_ctrl1(mut self, values: [u8; 2]) -> Self {
        self.display_update_ctrl1 = values;
        self
    }

    /// Set temperature sensor control
    pub fn temp_sensor_control(mut self, value: u8) -> Self {
        self.temp_sensor_control = value;
        self
    }

    /// Set the busy-wait timeout in milliseconds
    ///
    /// Default is 30,000ms (30 seconds). Set to 0 to wait indefinitely.
    pub fn busy_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.busy_timeout_ms = timeout_ms;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            orientation: self.orientation,
            booster_soft_start: self.booster_soft_start,
            gate_scanning: self.gate_scanning,
            border_waveform: self.border_waveform,
            display_update_ctrl1: self.display_update_ctrl1,
            temp_sensor_control: self.temp_sensor_control,
            busy_timeout_ms: self.busy_timeout_ms,
        })
    }
}
