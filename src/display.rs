//! Controller protocol sequencer
//!
//! [`Display`] owns the [`DisplayInterface`] and issues the SSD1680 command
//! sequences: reset, register configuration, RAM windowing, plane transfer,
//! refresh and deep sleep. Every register write is followed by a busy-wait;
//! commands are never pipelined.
//!
//! The sequencer tracks a [`ControllerState`]. Anything but [`Display::reset`]
//! requires [`ControllerState::Idle`]. A bus error or timeout in the middle of
//! an operation leaves the state where it failed, so later calls are rejected
//! with [`Error::InvalidState`] until a reset.

use embedded_hal::delay::DelayNs;

use crate::command::{
    BOOSTER_SOFT_START, BORDER_WAVEFORM, DATA_ENTRY_MODE, DEEP_SLEEP, DEEP_SLEEP_MODE_1,
    DISPLAY_UPDATE_CTRL1, DISPLAY_UPDATE_CTRL2, DRIVER_OUTPUT_CONTROL, ENTRY_X_INC_Y_DEC_Y_FIRST,
    ENTRY_X_INC_Y_INC, MASTER_ACTIVATION, SET_RAM_X_COUNTER, SET_RAM_X_RANGE, SET_RAM_Y_COUNTER,
    SET_RAM_Y_RANGE, SW_RESET, TEMP_SENSOR_CONTROL, WRITE_RAM_BW, WRITE_RAM_RED,
};
#[cfg(feature = "experimental-readback")]
use crate::command::{READ_RAM, READ_RAM_OPTION};
use crate::config::{Config, Dimensions, Orientation};
use crate::error::Error;
#[cfg(feature = "experimental-readback")]
use crate::framebuffer::Plane;
use crate::interface::DisplayInterface;
#[cfg(feature = "experimental-readback")]
use crate::interface::ReadbackInterface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Settle time after the post-reset busy-wait
const RESET_SETTLE_MS: u32 = 10;

/// Controller lifecycle as seen by the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ControllerState {
    /// Never reset, or released
    #[default]
    Unpowered,
    /// Hardware/software reset in progress
    Resetting,
    /// Register programming in progress
    Configuring,
    /// Ready for commands
    Idle,
    /// Streaming a plane to or from controller RAM
    Transferring,
    /// Panel waveform running
    Refreshing,
    /// Deep sleep; only a reset leaves this state
    Sleeping,
}

/// Refresh waveform selector
///
/// The discriminant is the Display Update Control 2 (0x22) byte. The driver
/// does nothing else differently between modes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum RefreshMode {
    /// Full waveform from OTP (slowest, no ghosting)
    #[default]
    Full = 0xF7,
    /// Full refresh using the fast OTP waveform
    FastFull = 0xC7,
    /// Partial waveform
    Partial = 0xFF,
    /// Partial refresh using the fast OTP waveform
    FastPartial = 0xCF,
}

/// Region of controller RAM in physical units
///
/// `x` is in source byte columns, `y` in gate rows. Both ranges are inclusive
/// with `start <= end`; the scan direction is applied when programming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RamWindow {
    /// First byte column
    pub x_start: u16,
    /// Last byte column
    pub x_end: u16,
    /// First gate row
    pub y_start: u16,
    /// Last gate row
    pub y_end: u16,
}

impl RamWindow {
    /// Whole panel
    pub fn full(dims: Dimensions) -> Self {
        Self {
            x_start: 0,
            x_end: dims.columns() - 1,
            y_start: 0,
            y_end: dims.rows - 1,
        }
    }
}

/// Protocol sequencer for the SSD1680
///
/// Holds no pixel data; planes are passed in by the caller (normally a
/// [`Session`](crate::Session)).
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Scan direction currently programmed
    orientation: Orientation,
    state: ControllerState,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a sequencer; the controller stays untouched until [`reset`](Self::reset)
    pub fn new(interface: I, config: Config) -> Self {
        let orientation = config.orientation;
        Self {
            interface,
            config,
            orientation,
            state: ControllerState::Unpowered,
        }
    }

    /// Hardware reset, software reset, then full register configuration
    ///
    /// Accepted in any state; this is the recovery path after sleep or an
    /// interrupted operation.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        log::debug!("ssd1680: reset");
        self.state = ControllerState::Resetting;

        self.interface.reset(delay).map_err(Error::Bus)?;
        self.wait_until_idle(delay)?;
        delay.delay_ms(RESET_SETTLE_MS);

        self.send_command(SW_RESET)?;
        self.wait_until_idle(delay)?;

        self.program_registers(self.orientation, delay)
    }

    /// Re-program the controller for another orientation
    ///
    /// Only registers change; RAM contents are not touched.
    pub fn configure<D: DelayNs>(
        &mut self,
        orientation: Orientation,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.require_idle()?;
        self.program_registers(orientation, delay)
    }

    fn program_registers<D: DelayNs>(
        &mut self,
        orientation: Orientation,
        delay: &mut D,
    ) -> DisplayResult<I> {
        log::debug!("ssd1680: configure for {orientation:?}");
        self.state = ControllerState::Configuring;

        let last_row = self.config.dimensions.rows - 1;
        self.write_register(
            DRIVER_OUTPUT_CONTROL,
            &[
                (last_row & 0xFF) as u8,
                ((last_row >> 8) & 0x01) as u8,
                self.config.gate_scanning,
            ],
            delay,
        )?;

        let booster = self.config.booster_soft_start;
        self.write_register(BOOSTER_SOFT_START, &booster, delay)?;

        let entry = if orientation.is_transposed() {
            ENTRY_X_INC_Y_DEC_Y_FIRST
        } else {
            ENTRY_X_INC_Y_INC
        };
        self.write_register(DATA_ENTRY_MODE, &[entry], delay)?;
        self.program_window(RamWindow::full(self.config.dimensions), orientation, delay)?;

        self.write_register(BORDER_WAVEFORM, &[self.config.border_waveform], delay)?;
        let ctrl1 = self.config.display_update_ctrl1;
        self.write_register(DISPLAY_UPDATE_CTRL1, &ctrl1, delay)?;
        self.write_register(DISPLAY_UPDATE_CTRL2, &[RefreshMode::Full as u8], delay)?;
        self.write_register(
            TEMP_SENSOR_CONTROL,
            &[self.config.temp_sensor_control],
            delay,
        )?;

        // Only a fully programmed scan direction becomes current.
        self.orientation = orientation;
        self.state = ControllerState::Idle;
        Ok(())
    }

    /// Restrict RAM addressing to a window, for partial refresh
    ///
    /// The window stays in effect until the next [`write_planes`](Self::write_planes).
    pub fn set_ram_window<D: DelayNs>(
        &mut self,
        window: RamWindow,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.require_idle()?;
        log::debug!("ssd1680: RAM window {window:?}");
        self.program_window(window, self.orientation, delay)
    }

    /// Program X/Y range and address counter in the current scan direction
    ///
    /// 90°/270° scan Y downwards, so the Y range starts at `y_end`.
    fn program_window<D: DelayNs>(
        &mut self,
        window: RamWindow,
        orientation: Orientation,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let (y_first, y_last) = if orientation.is_transposed() {
            (window.y_end, window.y_start)
        } else {
            (window.y_start, window.y_end)
        };

        self.write_register(
            SET_RAM_X_RANGE,
            &[window.x_start as u8, window.x_end as u8],
            delay,
        )?;
        self.write_register(
            SET_RAM_Y_RANGE,
            &[lo(y_first), hi(y_first), lo(y_last), hi(y_last)],
            delay,
        )?;
        self.set_address_counter(window.x_start, y_first, delay)
    }

    fn set_address_counter<D: DelayNs>(&mut self, x: u16, y: u16, delay: &mut D) -> DisplayResult<I> {
        self.write_register(SET_RAM_X_COUNTER, &[x as u8], delay)?;
        self.write_register(SET_RAM_Y_COUNTER, &[lo(y), hi(y)], delay)
    }

    /// Stream both planes into controller RAM
    ///
    /// Restores the full-panel window first. Each plane must hold at least
    /// `plane_size` bytes; only that many are sent.
    pub fn write_planes<D: DelayNs>(
        &mut self,
        bw: &[u8],
        red: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.require_idle()?;
        let required = self.config.dimensions.plane_size();
        for plane in [bw, red] {
            if plane.len() < required {
                return Err(Error::BufferTooSmall {
                    required,
                    provided: plane.len(),
                });
            }
        }

        log::debug!("ssd1680: transfer {required} bytes per plane");
        self.state = ControllerState::Transferring;

        let window = RamWindow::full(self.config.dimensions);
        self.program_window(window, self.orientation, delay)?;
        self.send_command(WRITE_RAM_BW)?;
        self.send_data(&bw[..required])?;
        self.wait_until_idle(delay)?;

        let y_first = if self.orientation.is_transposed() {
            window.y_end
        } else {
            window.y_start
        };
        self.set_address_counter(window.x_start, y_first, delay)?;
        self.send_command(WRITE_RAM_RED)?;
        self.send_data(&red[..required])?;
        self.wait_until_idle(delay)?;

        self.state = ControllerState::Idle;
        Ok(())
    }

    /// Run a refresh waveform from the current RAM contents
    pub fn refresh<D: DelayNs>(&mut self, mode: RefreshMode, delay: &mut D) -> DisplayResult<I> {
        self.require_idle()?;
        log::debug!("ssd1680: refresh {mode:?}");
        self.state = ControllerState::Refreshing;

        self.write_register(DISPLAY_UPDATE_CTRL2, &[mode as u8], delay)?;
        self.send_command(MASTER_ACTIVATION)?;
        self.wait_until_idle(delay)?;

        self.state = ControllerState::Idle;
        Ok(())
    }

    /// Enter deep sleep mode 1 (RAM retained)
    ///
    /// BUSY stays high in deep sleep, so this does not wait.
    pub fn sleep(&mut self) -> DisplayResult<I> {
        self.require_idle()?;
        log::debug!("ssd1680: deep sleep");
        self.send_command(DEEP_SLEEP)?;
        self.send_data(&[DEEP_SLEEP_MODE_1])?;
        self.state = ControllerState::Sleeping;
        Ok(())
    }

    /// Poll BUSY until it drops, 1ms per poll
    ///
    /// A `busy_timeout_ms` of 0 waits forever.
    fn wait_until_idle<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let timeout_ms = self.config.busy_timeout_ms;
        let mut elapsed_ms = 0u32;

        while self.interface.is_busy().map_err(Error::Bus)? {
            if timeout_ms > 0 && elapsed_ms >= timeout_ms {
                log::warn!("ssd1680: BUSY stuck for {timeout_ms} ms in {:?}", self.state);
                return Err(Error::ControllerUnresponsive { timeout_ms });
            }
            delay.delay_ms(1);
            elapsed_ms = elapsed_ms.saturating_add(1);
        }
        Ok(())
    }

    fn require_idle(&self) -> DisplayResult<I> {
        match self.state {
            ControllerState::Idle => Ok(()),
            state => Err(Error::InvalidState { state }),
        }
    }

    /// Command, parameters, busy-wait
    fn write_register<D: DelayNs>(
        &mut self,
        command: u8,
        data: &[u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.send_command(command)?;
        self.send_data(data)?;
        self.wait_until_idle(delay)
    }

    fn send_command(&mut self, command: u8) -> DisplayResult<I> {
        log::trace!("ssd1680: cmd 0x{command:02X}");
        self.interface.send_command(command).map_err(Error::Bus)
    }

    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        log::trace!("ssd1680: {} data bytes", data.len());
        self.interface.send_data(data).map_err(Error::Bus)
    }

    /// Current controller state
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Orientation the controller is programmed for
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> Dimensions {
        self.config.dimensions
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the hardware interface
    pub fn interface(&self) -> &I {
        &self.interface
    }

    /// Mutable access to the hardware interface
    pub fn interface_mut(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Give back the hardware interface
    pub fn release(self) -> I {
        self.interface
    }
}

#[cfg(feature = "experimental-readback")]
impl<I> Display<I>
where
    I: ReadbackInterface,
{
    /// Read one plane back from controller RAM
    ///
    /// Not validated on hardware: some panels hang on the combined
    /// command/read transaction.
    pub fn read_plane<D: DelayNs>(
        &mut self,
        plane: Plane,
        buffer: &mut [u8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.require_idle()?;
        let required = self.config.dimensions.plane_size();
        if buffer.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buffer.len(),
            });
        }

        log::debug!("ssd1680: read back {plane:?} plane");
        self.state = ControllerState::Transferring;

        self.program_window(RamWindow::full(self.config.dimensions), self.orientation, delay)?;
        self.write_register(READ_RAM_OPTION, &[plane as u8], delay)?;
        self.send_command(READ_RAM)?;
        // First byte after 0x27 is a dummy read.
        let mut dummy = [0u8; 1];
        self.interface.read_data(&mut dummy).map_err(Error::Bus)?;
        self.interface
            .read_data(&mut buffer[..required])
            .map_err(Error::Bus)?;

        self.state = ControllerState::Idle;
        Ok(())
    }
}

#[inline]
fn lo(value: u16) -> u8 {
    (value & 0xFF) as u8
}

/// Bit 8 of a 9-bit gate address
#[inline]
fn hi(value: u16) -> u8 {
    ((value >> 8) & 0x01) as u8
}
