//! Display session: framebuffer, addressing and controller in one owner
//!
//! A [`Session`] is the single owner of one physical panel. Drawing calls
//! only touch the in-memory planes; nothing reaches the panel until
//! [`send_to_controller`](Session::send_to_controller) followed by
//! [`refresh`](Session::refresh).
//!
//! ## Orientation changes
//!
//! [`set_orientation`](Session::set_orientation) re-programs the controller
//! scan registers and switches pixel addressing, but leaves the plane bytes
//! as they are. Content drawn before the change is therefore shown rotated
//! by the difference between the two orientations. Clear and redraw after
//! switching if that is not wanted.

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::blit::{self, BlitError, BlitOptions, Rect};
use crate::color::Color;
use crate::config::{Config, Orientation};
use crate::display::{ControllerState, Display, RamWindow, RefreshMode};
use crate::error::Error;
use crate::framebuffer::{FrameBuffer, Plane};
use crate::geometry::Geometry;
use crate::interface::DisplayInterface;
#[cfg(feature = "experimental-readback")]
use crate::interface::ReadbackInterface;
use crate::resource::{Bitmap, Font};

type SessionResult<I, T = ()> = core::result::Result<T, Error<I>>;

/// Framebuffer plus controller for one panel
pub struct Session<I>
where
    I: DisplayInterface,
{
    display: Display<I>,
    framebuffer: FrameBuffer,
    geometry: Geometry,
    /// Text insertion point
    cursor: (u16, u16),
}

impl<I> Session<I>
where
    I: DisplayInterface,
{
    /// Bring up the panel and clear it to white
    ///
    /// Allocates both planes, resets and configures the controller, then
    /// transfers and fully refreshes a white frame.
    pub fn create<D: DelayNs>(interface: I, config: Config, delay: &mut D) -> SessionResult<I, Self> {
        let framebuffer = FrameBuffer::try_new(config.dimensions)
            .map_err(|requested| Error::AllocationFailure { requested })?;
        let geometry = Geometry::new(config.dimensions, config.orientation);
        log::debug!(
            "ssd1680: session {}x{} at {:?}",
            config.dimensions.cols,
            config.dimensions.rows,
            config.orientation
        );

        let mut session = Self {
            display: Display::new(interface, config),
            framebuffer,
            geometry,
            cursor: (0, 0),
        };
        session.display.reset(delay)?;
        session.framebuffer.fill(Color::White);
        session.send_to_controller(delay)?;
        session.refresh(RefreshMode::Full, delay)?;
        Ok(session)
    }

    /// Current orientation
    pub fn orientation(&self) -> Orientation {
        self.geometry.orientation()
    }

    /// Switch orientation
    ///
    /// Re-runs controller configuration only; the planes are not modified.
    /// If configuration fails the previous orientation stays in effect for
    /// both addressing and controller; recover with [`wake`](Self::wake).
    pub fn set_orientation<D: DelayNs>(
        &mut self,
        orientation: Orientation,
        delay: &mut D,
    ) -> SessionResult<I> {
        let result = self.display.configure(orientation, delay);
        // Addressing follows whatever scan direction the controller holds.
        self.geometry = Geometry::new(self.geometry.dimensions(), self.display.orientation());
        result
    }

    /// Logical `(width, height)` in the current orientation
    pub fn logical_size(&self) -> (u16, u16) {
        self.geometry.logical_size()
    }

    /// Addressing model for the current orientation
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Controller state
    pub fn state(&self) -> ControllerState {
        self.display.state()
    }

    /// The protocol sequencer
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// The protocol sequencer, mutably
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// Read access to one framebuffer plane
    pub fn plane(&self, which: Plane) -> &[u8] {
        self.framebuffer.plane(which)
    }

    /// The framebuffer
    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.framebuffer
    }

    /// Set one pixel
    ///
    /// # Errors
    ///
    /// `Error::InvalidRegion` if `(x, y)` is outside the logical resolution.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Color) -> SessionResult<I> {
        if !self.geometry.contains(x, y) {
            return Err(invalid_point(x, y));
        }
        self.framebuffer.set_pixel(&self.geometry, x, y, color);
        Ok(())
    }

    /// Color of one pixel
    ///
    /// `None` outside the logical resolution or for the reserved bit
    /// combination.
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        if !self.geometry.contains(x, y) {
            return None;
        }
        self.framebuffer.pixel(&self.geometry, x, y)
    }

    /// Set every pixel to one color
    pub fn fill(&mut self, color: Color) {
        self.framebuffer.fill(color);
    }

    /// Draw a line between two inclusive endpoints (Bresenham)
    ///
    /// # Errors
    ///
    /// `Error::InvalidRegion` if either endpoint is outside the logical
    /// resolution. Nothing is drawn in that case.
    pub fn draw_line(&mut self, x1: u16, y1: u16, x2: u16, y2: u16, color: Color) -> SessionResult<I> {
        if !self.geometry.contains(x1, y1) || !self.geometry.contains(x2, y2) {
            return Err(Error::InvalidRegion { x1, y1, x2, y2 });
        }

        let (mut x, mut y) = (i32::from(x1), i32::from(y1));
        let (x_end, y_end) = (i32::from(x2), i32::from(y2));
        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        let sx = if x < x_end { 1 } else { -1 };
        let sy = if y < y_end { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            // Both coordinates stay between the validated endpoints.
            self.framebuffer
                .set_pixel(&self.geometry, x as u16, y as u16, color);
            if x == x_end && y == y_end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        Ok(())
    }

    /// Paint a rectangle from packed source bits
    ///
    /// Bits are taken as they are after the `options` transforms. See
    /// [`blit::blit`] for the source layout. Every pixel of the rectangle
    /// ends up black, white or red:
    ///
    /// - `Color::Black` / `Color::White`: set bits are white, clear bits
    ///   black; the red plane is cleared under the rectangle.
    /// - `Color::Red`: set bits are red, clear bits white.
    pub fn blit_region(
        &mut self,
        rect: Rect,
        source: &[u8],
        color: Color,
        options: BlitOptions,
    ) -> SessionResult<I> {
        let (bw, red) = self.framebuffer.planes_mut();
        match plane_for(color) {
            Plane::Bw => {
                blit::blit(bw, &self.geometry, rect, source, options)?;
                let clear = vec![0u8; rect.source_len()];
                blit::blit(red, &self.geometry, rect, &clear, BlitOptions::VERBATIM)?;
            }
            Plane::Red => {
                blit::blit(red, &self.geometry, rect, source, options)?;
                let flipped = BlitOptions {
                    invert_values: !options.invert_values,
                    ..options
                };
                blit::blit(bw, &self.geometry, rect, source, flipped)?;
            }
        }
        Ok(())
    }

    /// Paint a bitmap with its top-left corner at `(x, y)`
    pub fn draw_bitmap(&mut self, x: u16, y: u16, bitmap: &Bitmap<'_>, color: Color) -> SessionResult<I> {
        let Some(rect) = Rect::with_size(x, y, bitmap.width, bitmap.height) else {
            return Err(Error::InvalidRegion {
                x1: x,
                y1: y,
                x2: x.saturating_add(bitmap.width.saturating_sub(1)),
                y2: y.saturating_add(bitmap.height.saturating_sub(1)),
            });
        };
        self.blit_region(rect, bitmap.data, color, BlitOptions::VERBATIM)
    }

    /// Text insertion point
    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    /// Move the text insertion point
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = (x, y);
    }

    /// Draw one character at the cursor and advance it
    ///
    /// Wraps to the start of the next line first if the glyph would cross
    /// the right edge. `'\n'` starts a new line. Characters the font does not
    /// cover are skipped without moving the cursor.
    ///
    /// `Color::Black` draws black ink on a white cell, `Color::White` white
    /// ink on a black cell and `Color::Red` red ink on a white cell.
    pub fn draw_char(&mut self, font: &Font<'_>, ch: char, color: Color) -> SessionResult<I> {
        let (width, _) = self.logical_size();
        let (x, y) = self.cursor;

        if ch == '\n' {
            self.cursor = (0, y.saturating_add(font.height));
            return Ok(());
        }
        let Some(glyph) = font.glyph(ch) else {
            return Ok(());
        };

        let (x, y) = if u32::from(x) + u32::from(font.width) > u32::from(width) {
            (0, y.saturating_add(font.height))
        } else {
            (x, y)
        };

        let Some(rect) = Rect::with_size(x, y, font.width, font.height) else {
            return Err(invalid_point(x, y));
        };
        let source = repack_rows(glyph, font.bytes_per_row as usize, rect)?;

        // Glyph ink is 1; black ink is 0 in the black/white plane.
        let options = BlitOptions {
            invert_values: color == Color::Black,
            invert_bit_order: true,
        };
        self.blit_region(rect, &source, color, options)?;
        self.cursor = (x.saturating_add(font.width), y);
        Ok(())
    }

    /// Draw a string at the cursor, see [`draw_char`](Self::draw_char)
    pub fn draw_str(&mut self, font: &Font<'_>, text: &str, color: Color) -> SessionResult<I> {
        for ch in text.chars() {
            self.draw_char(font, ch, color)?;
        }
        Ok(())
    }

    /// Transfer both planes to controller RAM
    ///
    /// Also restores the full-panel RAM window.
    pub fn send_to_controller<D: DelayNs>(&mut self, delay: &mut D) -> SessionResult<I> {
        self.display.write_planes(
            self.framebuffer.plane(Plane::Bw),
            self.framebuffer.plane(Plane::Red),
            delay,
        )
    }

    /// Update the panel from controller RAM
    pub fn refresh<D: DelayNs>(&mut self, mode: RefreshMode, delay: &mut D) -> SessionResult<I> {
        self.display.refresh(mode, delay)
    }

    /// Limit controller RAM addressing to a logical rectangle
    ///
    /// Use with the partial refresh modes. The window is widened to whole
    /// bytes along the source axis. The next
    /// [`send_to_controller`](Self::send_to_controller) restores the full
    /// window.
    pub fn set_refresh_window<D: DelayNs>(&mut self, rect: Rect, delay: &mut D) -> SessionResult<I> {
        if rect.width() == 0 || rect.height() == 0 || !self.geometry.contains(rect.x2, rect.y2) {
            return Err(BlitError::InvalidRegion(rect).into());
        }
        let (sa, ga) = self.geometry.to_physical(rect.x1, rect.y1);
        let (sb, gb) = self.geometry.to_physical(rect.x2, rect.y2);
        let window = RamWindow {
            x_start: sa.min(sb) / 8,
            x_end: sa.max(sb) / 8,
            y_start: ga.min(gb),
            y_end: ga.max(gb),
        };
        self.display.set_ram_window(window, delay)
    }

    /// Put the controller into deep sleep
    ///
    /// The framebuffer is kept; [`wake`](Self::wake) restores the panel.
    pub fn sleep(&mut self) -> SessionResult<I> {
        self.display.sleep()
    }

    /// Reset, reconfigure and re-send the framebuffer
    ///
    /// Also the recovery path after a bus error or timeout.
    pub fn wake<D: DelayNs>(&mut self, delay: &mut D) -> SessionResult<I> {
        log::debug!("ssd1680: wake");
        self.display.reset(delay)?;
        self.send_to_controller(delay)
    }

    /// Put the controller to sleep and give back the interface
    ///
    /// A controller that is not idle is released as it is.
    pub fn release(mut self) -> SessionResult<I, I> {
        if self.display.state() == ControllerState::Idle {
            self.display.sleep()?;
        }
        Ok(self.display.release())
    }

    /// Set a pixel if it is on the panel (used by the `DrawTarget` impl)
    #[cfg(feature = "graphics")]
    pub(crate) fn set_pixel_clipped(&mut self, x: i32, y: i32, color: Color) {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        if self.geometry.contains(x, y) {
            self.framebuffer.set_pixel(&self.geometry, x, y, color);
        }
    }
}

#[cfg(feature = "experimental-readback")]
impl<I> Session<I>
where
    I: ReadbackInterface,
{
    /// Overwrite one framebuffer plane with controller RAM contents
    ///
    /// Not validated on hardware.
    pub fn read_plane_from_controller<D: DelayNs>(
        &mut self,
        plane: Plane,
        delay: &mut D,
    ) -> SessionResult<I> {
        self.display
            .read_plane(plane, self.framebuffer.plane_mut(plane), delay)
    }
}

fn plane_for(color: Color) -> Plane {
    match color {
        Color::Red => Plane::Red,
        Color::Black | Color::White => Plane::Bw,
    }
}

fn invalid_point<I: DisplayInterface>(x: u16, y: u16) -> Error<I> {
    Error::InvalidRegion {
        x1: x,
        y1: y,
        x2: x,
        y2: y,
    }
}

/// Drop per-row padding beyond what the blit stride expects
fn repack_rows(data: &[u8], bytes_per_row: usize, rect: Rect) -> Result<Cow<'_, [u8]>, BlitError> {
    let stride = rect.source_stride();
    let height = rect.height() as usize;
    if bytes_per_row == stride {
        return Ok(Cow::Borrowed(data));
    }
    let required = bytes_per_row.max(stride) * height;
    if bytes_per_row < stride || data.len() < required {
        return Err(BlitError::SourceTooShort {
            required,
            provided: data.len(),
        });
    }
    let rows: Vec<u8> = data
        .chunks(bytes_per_row)
        .take(height)
        .flat_map(|row| &row[..stride])
        .copied()
        .collect();
    Ok(Cow::Owned(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{
        DATA_ENTRY_MODE, DEEP_SLEEP, DISPLAY_UPDATE_CTRL2, MASTER_ACTIVATION, SET_RAM_X_RANGE,
        SET_RAM_Y_COUNTER, SET_RAM_Y_RANGE, SW_RESET, WRITE_RAM_BW, WRITE_RAM_RED,
    };
    use crate::display::tests::{MockDelay, MockInterface, test_config};

    fn new_session(orientation: Orientation) -> (Session<MockInterface>, MockDelay) {
        let mut delay = MockDelay::default();
        let session =
            Session::create(MockInterface::default(), test_config(orientation), &mut delay)
                .unwrap();
        (session, delay)
    }

    fn mock_of(session: &mut Session<MockInterface>) -> &mut MockInterface {
        session.display_mut().interface_mut()
    }

    // 8x2 glyphs for ' ' and '!'; '!' has one ink pixel at the top left.
    const FONT_DATA: [u8; 4] = [0x00, 0x00, 0x01, 0x00];
    const FONT: Font<'static> = Font::new(8, 2, 1, &FONT_DATA);

    #[test]
    fn test_create_clears_panel_to_white() {
        let (mut session, _) = new_session(Orientation::Deg0);
        assert_eq!(session.state(), ControllerState::Idle);
        assert!(session.plane(Plane::Bw).iter().all(|b| *b == 0xFF));
        assert!(session.plane(Plane::Red).iter().all(|b| *b == 0x00));

        let mock = mock_of(&mut session);
        let commands = mock.commands();
        assert_eq!(commands[0], SW_RESET);
        assert_eq!(
            &commands[commands.len() - 2..],
            &[DISPLAY_UPDATE_CTRL2, MASTER_ACTIVATION]
        );
        assert_eq!(mock.last_data(WRITE_RAM_BW).map(<[u8]>::len), Some(4000));
        assert!(mock.last_data(WRITE_RAM_BW).unwrap().iter().all(|b| *b == 0xFF));
        assert!(mock.last_data(WRITE_RAM_RED).unwrap().iter().all(|b| *b == 0x00));
    }

    #[test]
    fn test_create_reports_unresponsive_controller() {
        let interface = MockInterface {
            stuck_busy: true,
            ..MockInterface::default()
        };
        let result = Session::create(
            interface,
            test_config(Orientation::Deg0),
            &mut MockDelay::default(),
        );
        assert!(matches!(
            result,
            Err(Error::ControllerUnresponsive { timeout_ms: 100 })
        ));
    }

    #[test]
    fn test_reference_panel_pixel_addressing() {
        let (mut session, _) = new_session(Orientation::Deg0);
        assert_eq!(session.logical_size(), (122, 250));
        session.fill(Color::Black);

        session.set_pixel(0, 0, Color::White).unwrap();
        assert_eq!(session.plane(Plane::Bw)[0], 0x80);
        assert!(session.plane(Plane::Bw)[1..].iter().all(|b| *b == 0));
        assert!(session.plane(Plane::Red).iter().all(|b| *b == 0));

        session.set_pixel(121, 249, Color::White).unwrap();
        assert_eq!(session.plane(Plane::Bw)[3999], 1 << 6);
        assert_eq!(session.pixel(121, 249), Some(Color::White));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_rejected() {
        let (mut session, _) = new_session(Orientation::Deg0);
        assert!(matches!(
            session.set_pixel(122, 0, Color::Black),
            Err(Error::InvalidRegion { x1: 122, y1: 0, .. })
        ));
        assert!(session.set_pixel(0, 250, Color::Black).is_err());
        assert_eq!(session.pixel(122, 0), None);
    }

    #[test]
    fn test_orientation_change_keeps_planes_and_rewindows() {
        let (mut session, mut delay) = new_session(Orientation::Deg0);
        session.draw_line(0, 0, 121, 249, Color::Black).unwrap();
        session.set_pixel(7, 3, Color::Red).unwrap();
        let bw = session.plane(Plane::Bw).to_vec();
        let red = session.plane(Plane::Red).to_vec();

        session.set_orientation(Orientation::Deg90, &mut delay).unwrap();
        assert_eq!(session.plane(Plane::Bw), bw.as_slice());
        assert_eq!(session.plane(Plane::Red), red.as_slice());
        assert_eq!(session.logical_size(), (250, 122));
        assert_eq!(mock_of(&mut session).last_data(DATA_ENTRY_MODE), Some(&[0b101][..]));

        mock_of(&mut session).clear();
        session.send_to_controller(&mut delay).unwrap();
        let mock = mock_of(&mut session);
        assert_eq!(mock.last_data(SET_RAM_Y_RANGE), Some(&[249, 0, 0, 0][..]));
        assert_eq!(mock.last_data(SET_RAM_Y_COUNTER), Some(&[249, 0][..]));
        assert_eq!(mock.last_data(WRITE_RAM_BW), Some(bw.as_slice()));
        assert_eq!(mock.last_data(WRITE_RAM_RED), Some(red.as_slice()));
    }

    #[test]
    fn test_failed_orientation_change_keeps_addressing_in_step() {
        let (mut session, mut delay) = new_session(Orientation::Deg0);
        mock_of(&mut session).fail_command = Some(DATA_ENTRY_MODE);
        assert!(matches!(
            session.set_orientation(Orientation::Deg90, &mut delay),
            Err(Error::Bus(_))
        ));
        assert_eq!(session.orientation(), Orientation::Deg0);
        assert_eq!(session.display().orientation(), Orientation::Deg0);
        assert_eq!(session.logical_size(), (122, 250));

        session.wake(&mut delay).unwrap();
        assert_eq!(session.orientation(), Orientation::Deg0);
        assert_eq!(session.display().orientation(), Orientation::Deg0);
        assert_eq!(mock_of(&mut session).last_data(DATA_ENTRY_MODE), Some(&[0b011][..]));
    }

    #[test]
    fn test_draw_line_covers_both_endpoints() {
        let (mut session, _) = new_session(Orientation::Deg0);

        session.draw_line(2, 5, 12, 5, Color::Black).unwrap();
        assert!((2..=12).all(|x| session.pixel(x, 5) == Some(Color::Black)));
        assert_eq!(session.pixel(1, 5), Some(Color::White));
        assert_eq!(session.pixel(13, 5), Some(Color::White));

        session.draw_line(30, 20, 20, 10, Color::Red).unwrap();
        assert!((0..=10).all(|i| session.pixel(20 + i, 10 + i) == Some(Color::Red)));

        session.draw_line(40, 40, 40, 40, Color::Black).unwrap();
        assert_eq!(session.pixel(40, 40), Some(Color::Black));
    }

    #[test]
    fn test_draw_line_rejects_out_of_bounds_endpoint() {
        let (mut session, _) = new_session(Orientation::Deg0);
        let before = session.plane(Plane::Bw).to_vec();
        assert!(matches!(
            session.draw_line(0, 0, 200, 10, Color::Black),
            Err(Error::InvalidRegion { x2: 200, .. })
        ));
        assert_eq!(session.plane(Plane::Bw), before.as_slice());
    }

    #[test]
    fn test_bitmap_at_unaligned_x() {
        let (mut session, _) = new_session(Orientation::Deg0);
        session.fill(Color::Black);
        session
            .draw_bitmap(3, 0, &Bitmap::new(8, 1, &[0xFF]), Color::White)
            .unwrap();
        assert_eq!(session.plane(Plane::Bw)[0], 0x1F);
        assert_eq!(session.plane(Plane::Bw)[1], 0xE0);
        assert!(session.plane(Plane::Bw)[2..].iter().all(|b| *b == 0));
    }

    fn assert_no_reserved_pixels(session: &Session<MockInterface>) {
        let (width, height) = session.logical_size();
        for y in 0..height {
            for x in 0..width {
                assert!(session.pixel(x, y).is_some(), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_blit_region_red_paints_red_over_white() {
        let (mut session, _) = new_session(Orientation::Deg0);
        session
            .blit_region(Rect::new(8, 1, 15, 1), &[0xF0], Color::Red, BlitOptions::VERBATIM)
            .unwrap();
        assert_eq!(session.plane(Plane::Red)[16 + 1], 0xF0);
        assert_eq!(session.plane(Plane::Bw)[16 + 1], 0x0F);
        assert_eq!(session.pixel(8, 1), Some(Color::Red));
        assert_eq!(session.pixel(12, 1), Some(Color::White));

        session
            .blit_region(Rect::new(0, 0, 7, 0), &[0xFF], Color::Red, BlitOptions::VERBATIM)
            .unwrap();
        assert_eq!(session.plane(Plane::Bw)[0], 0x00);
        assert_eq!(session.plane(Plane::Red)[0], 0xFF);
        assert_eq!(session.pixel(0, 0), Some(Color::Red));
        assert_no_reserved_pixels(&session);
    }

    #[test]
    fn test_blit_region_black_clears_red_underneath() {
        for orientation in [Orientation::Deg0, Orientation::Deg90] {
            let (mut session, _) = new_session(orientation);
            session.fill(Color::Red);
            session
                .blit_region(Rect::new(3, 2, 10, 2), &[0xF0], Color::Black, BlitOptions::VERBATIM)
                .unwrap();
            assert!((3..7).all(|x| session.pixel(x, 2) == Some(Color::White)));
            assert!((7..11).all(|x| session.pixel(x, 2) == Some(Color::Black)));
            assert_eq!(session.pixel(2, 2), Some(Color::Red));
            assert_eq!(session.pixel(11, 2), Some(Color::Red));
            assert_eq!(session.pixel(3, 1), Some(Color::Red));
            assert_no_reserved_pixels(&session);
        }
    }

    #[test]
    fn test_blit_region_errors_map_to_session_errors() {
        let (mut session, _) = new_session(Orientation::Deg0);
        assert!(matches!(
            session.blit_region(Rect::new(0, 0, 15, 1), &[0; 3], Color::Black, BlitOptions::VERBATIM),
            Err(Error::BufferTooSmall {
                required: 4,
                provided: 3
            })
        ));
        assert!(matches!(
            session.blit_region(Rect::new(0, 249, 7, 250), &[0; 2], Color::Black, BlitOptions::VERBATIM),
            Err(Error::InvalidRegion { y2: 250, .. })
        ));
    }

    #[test]
    fn test_draw_str_black_ink_on_white_cell() {
        let (mut session, _) = new_session(Orientation::Deg0);
        session.draw_str(&FONT, "!", Color::Black).unwrap();
        assert_eq!(session.plane(Plane::Bw)[0], 0x7F);
        assert_eq!(session.plane(Plane::Bw)[16], 0xFF);
        assert_eq!(session.cursor(), (8, 0));
    }

    #[test]
    fn test_draw_str_red_ink_on_white_cell() {
        let (mut session, _) = new_session(Orientation::Deg0);
        session.fill(Color::Black);
        session.draw_str(&FONT, "!", Color::Red).unwrap();
        assert_eq!(session.plane(Plane::Red)[0], 0x80);
        assert_eq!(session.plane(Plane::Bw)[0], 0x7F);
        assert_eq!(session.pixel(0, 0), Some(Color::Red));
        assert_eq!(session.pixel(1, 0), Some(Color::White));
        assert_eq!(session.pixel(8, 0), Some(Color::Black));
        assert_no_reserved_pixels(&session);
    }

    #[test]
    fn test_draw_str_wraps_at_right_edge() {
        let (mut session, _) = new_session(Orientation::Deg0);
        session.set_cursor(120, 0);
        session.draw_str(&FONT, "!", Color::Black).unwrap();
        // Row 2, byte column 0.
        assert_eq!(session.plane(Plane::Bw)[32], 0x7F);
        assert_eq!(session.cursor(), (8, 2));
    }

    #[test]
    fn test_draw_str_skips_unknown_and_handles_newline() {
        let (mut session, _) = new_session(Orientation::Deg0);
        session.draw_str(&FONT, "#!", Color::Black).unwrap();
        assert_eq!(session.cursor(), (8, 0));
        session.draw_str(&FONT, "\n!", Color::Black).unwrap();
        assert_eq!(session.cursor(), (8, 2));
        assert_eq!(session.plane(Plane::Bw)[32], 0x7F);
    }

    #[test]
    fn test_draw_char_repacks_padded_rows() {
        // 4-pixel glyph stored with 2 bytes per row.
        const WIDE: [u8; 4] = [0x01, 0xAA, 0x00, 0xAA];
        let font = Font {
            width: 4,
            height: 2,
            bytes_per_row: 2,
            bytes_per_glyph: 4,
            first_char: b'A',
            data: &WIDE,
        };
        let (mut session, _) = new_session(Orientation::Deg0);
        session.draw_char(&font, 'A', Color::Black).unwrap();
        assert_eq!(session.plane(Plane::Bw)[0], 0x7F);
        assert_eq!(session.plane(Plane::Bw)[16], 0xFF);
    }

    #[test]
    fn test_refresh_window_in_physical_units() {
        let (mut session, mut delay) = new_session(Orientation::Deg0);
        session
            .set_refresh_window(Rect::new(8, 10, 23, 40), &mut delay)
            .unwrap();
        assert_eq!(mock_of(&mut session).last_data(SET_RAM_X_RANGE), Some(&[1, 2][..]));
        assert_eq!(mock_of(&mut session).last_data(SET_RAM_Y_RANGE), Some(&[10, 0, 40, 0][..]));

        let (mut session, mut delay) = new_session(Orientation::Deg90);
        session
            .set_refresh_window(Rect::new(0, 0, 9, 15), &mut delay)
            .unwrap();
        assert_eq!(mock_of(&mut session).last_data(SET_RAM_X_RANGE), Some(&[0, 1][..]));
        assert_eq!(mock_of(&mut session).last_data(SET_RAM_Y_RANGE), Some(&[249, 0, 240, 0][..]));

        assert!(matches!(
            session.set_refresh_window(Rect::new(0, 0, 250, 0), &mut delay),
            Err(Error::InvalidRegion { .. })
        ));
    }

    #[test]
    fn test_sleep_then_wake_retransfers() {
        let (mut session, mut delay) = new_session(Orientation::Deg0);
        session.set_pixel(1, 1, Color::Red).unwrap();
        session.sleep().unwrap();
        assert_eq!(session.state(), ControllerState::Sleeping);
        assert!(matches!(
            session.send_to_controller(&mut delay),
            Err(Error::InvalidState {
                state: ControllerState::Sleeping
            })
        ));

        mock_of(&mut session).clear();
        session.wake(&mut delay).unwrap();
        assert_eq!(session.state(), ControllerState::Idle);
        let red = session.plane(Plane::Red).to_vec();
        let mock = mock_of(&mut session);
        assert_eq!(mock.resets, 2);
        assert_eq!(mock.last_data(WRITE_RAM_RED), Some(red.as_slice()));
    }

    #[test]
    fn test_release_sleeps_and_returns_interface() {
        let (session, _) = new_session(Orientation::Deg0);
        let interface = session.release().unwrap();
        assert_eq!(interface.commands().last(), Some(&DEEP_SLEEP));
    }

    #[cfg(feature = "experimental-readback")]
    #[test]
    fn test_read_plane_from_controller_fills_plane() {
        let (mut session, mut delay) = new_session(Orientation::Deg0);
        mock_of(&mut session).ram.push(0x00);
        mock_of(&mut session).ram.extend(core::iter::repeat_n(0xC3, 4000));
        session
            .read_plane_from_controller(Plane::Bw, &mut delay)
            .unwrap();
        assert!(session.plane(Plane::Bw).iter().all(|b| *b == 0xC3));
    }
}
