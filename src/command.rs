//! SSD1680 command definitions
//!
//! Command bytes for the SSD1680 e-paper display controller. Commands are sent
//! over SPI with the DC pin low; parameters follow with DC high.
//!
//! ## Command Structure
//!
//! 1. Assert CS (handled by the [`SpiDevice`](embedded_hal::spi::SpiDevice))
//! 2. Set DC low and send the command byte
//! 3. Set DC high and send the parameter bytes (if any)
//! 4. Wait for BUSY to drop before the next command
//!
//! ## Example
//!
//! ```rust,no_run
//! use ssd1680::{command, DisplayInterface, Interface};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::{InputPin, OutputPin};
//! # use embedded_hal::spi::{Operation, SpiDevice};
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl InputPin for MockPin {
//! #     fn is_high(&mut self) -> Result<bool, Self::Error> { Ok(false) }
//! #     fn is_low(&mut self) -> Result<bool, Self::Error> { Ok(true) }
//! # }
//! # let mut interface = Interface::new(MockSpi, MockPin, MockPin, MockPin);
//! # let pixel_data = [0xFFu8; 4];
//! let _ = interface.send_command(command::SW_RESET);
//!
//! let _ = interface.send_command(command::WRITE_RAM_BW);
//! let _ = interface.send_data(&pixel_data);
//! ```

// System control commands

/// Driver output control command (0x01)
///
/// Sets the gate mux ratio and scanning order.
/// Requires 3 bytes: [mux LSB, mux bit 8, GD/SM/TB flags]
pub const DRIVER_OUTPUT_CONTROL: u8 = 0x01;

/// Booster soft-start control command (0x0C)
///
/// Requires 4 bytes: three phase settings and the duration byte.
pub const BOOSTER_SOFT_START: u8 = 0x0C;

/// Deep sleep command (0x10)
///
/// Requires 1 byte: 0x01 = deep sleep mode 1 (RAM retained).
/// Only a hardware reset wakes the controller.
pub const DEEP_SLEEP: u8 = 0x10;

/// Data entry mode command (0x11)
///
/// Requires 1 byte:
/// - Bit 0 (ID0): X direction (0=decrement, 1=increment)
/// - Bit 1 (ID1): Y direction (0=decrement, 1=increment)
/// - Bit 2 (AM): counter update direction (0=X first, 1=Y first)
pub const DATA_ENTRY_MODE: u8 = 0x11;

/// Software reset command (0x12)
///
/// Resets registers to their defaults. BUSY is high while it runs.
pub const SW_RESET: u8 = 0x12;

/// Temperature sensor selection command (0x18)
///
/// Requires 1 byte: 0x48 = external, 0x80 = internal.
pub const TEMP_SENSOR_CONTROL: u8 = 0x18;

// Display update commands

/// Master activation command (0x20)
///
/// Runs the sequence selected by [`DISPLAY_UPDATE_CTRL2`]. BUSY is high for
/// the duration of the waveform.
pub const MASTER_ACTIVATION: u8 = 0x20;

/// Display update control 1 command (0x21)
///
/// Requires 2 bytes: RAM content options and source output mode.
pub const DISPLAY_UPDATE_CTRL1: u8 = 0x21;

/// Display update control 2 command (0x22)
///
/// Requires 1 byte selecting the update sequence (see [`crate::RefreshMode`]).
pub const DISPLAY_UPDATE_CTRL2: u8 = 0x22;

// RAM commands

/// Write black/white RAM command (0x24)
///
/// Bit=0: black, Bit=1: white.
pub const WRITE_RAM_BW: u8 = 0x24;

/// Write red RAM command (0x26)
///
/// Bit=1: red.
pub const WRITE_RAM_RED: u8 = 0x26;

/// Read RAM command (0x27)
///
/// The first byte clocked out after this command is a dummy byte.
pub const READ_RAM: u8 = 0x27;

/// Border waveform control command (0x3C)
///
/// Requires 1 byte.
pub const BORDER_WAVEFORM: u8 = 0x3C;

/// Read RAM option command (0x41)
///
/// Requires 1 byte: 0x00 = BW RAM, 0x01 = RED RAM.
pub const READ_RAM_OPTION: u8 = 0x41;

/// Set RAM X address window command (0x44)
///
/// Requires 2 bytes: [start column byte, end column byte]
pub const SET_RAM_X_RANGE: u8 = 0x44;

/// Set RAM Y address window command (0x45)
///
/// Requires 4 bytes: [start LSB, start bit 8, end LSB, end bit 8]
pub const SET_RAM_Y_RANGE: u8 = 0x45;

/// Set RAM X address counter command (0x4E)
///
/// Requires 1 byte.
pub const SET_RAM_X_COUNTER: u8 = 0x4E;

/// Set RAM Y address counter command (0x4F)
///
/// Requires 2 bytes: [address LSB, address bit 8]
pub const SET_RAM_Y_COUNTER: u8 = 0x4F;

// Parameter values

/// Booster soft-start phase byte: enable, driver strength 2, min off time 4
pub const BOOSTER_PHASE: u8 = (1 << 7) | (0b010 << 4) | 0b0100;

/// Booster soft-start duration byte
pub const BOOSTER_DURATION: u8 = 0x05;

/// Internal temperature sensor selector for [`TEMP_SENSOR_CONTROL`]
pub const TEMP_SENSOR_INTERNAL: u8 = 0x80;

/// Deep sleep mode 1 parameter for [`DEEP_SLEEP`]
pub const DEEP_SLEEP_MODE_1: u8 = 0x01;

/// Data entry mode: X increment, Y increment, X counter first
pub const ENTRY_X_INC_Y_INC: u8 = 0b011;

/// Data entry mode: X increment, Y decrement, Y counter first
pub const ENTRY_X_INC_Y_DEC_Y_FIRST: u8 = 0b101;
