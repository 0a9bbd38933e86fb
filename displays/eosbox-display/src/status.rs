//! Status view
//!
//! Two layouts on the 16x2 glass:
//!
//! ```text
//! Disconnected        Connected
//! ┌────────────────┐  ┌────────────────┐
//! │box1 v2.0.0.1   │  │Pan:  12.500    │
//! │Waiting...      │  │Tilt: -3.000    │
//! └────────────────┘  └────────────────┘
//! ```

use core::fmt::Write;

use eosbox_core::config::{PanelConfig, MAX_LABEL_LEN, SIG_DIGITS};
use eosbox_core::session::SessionState;
use eosbox_core::traits::DisplaySink;
use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};
use crate::screen::Screen;

/// Scratch line, wide enough for a label plus any f32 at SIG_DIGITS
type LineBuf = String<64>;

/// Display sink that lays out the panel status on a character display
pub struct StatusDisplay<B> {
    backend: B,
    screen: Screen,
    box_name: String<MAX_LABEL_LEN>,
    version: String<MAX_LABEL_LEN>,
    last_error: Option<DisplayError>,
}

impl<B: DisplayBackend> StatusDisplay<B> {
    pub fn new(backend: B, config: &PanelConfig) -> Self {
        Self {
            backend,
            screen: Screen::new(),
            box_name: config.box_name.clone(),
            version: config.version.clone(),
            last_error: None,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Error from the most recent redraw, if it failed
    pub fn last_error(&self) -> Option<DisplayError> {
        self.last_error
    }

    /// Lay out the screen for `state` without drawing it
    pub fn layout(&mut self, state: SessionState, pan: f32, tilt: f32) {
        let mut top = LineBuf::new();
        let mut bottom = LineBuf::new();

        // Overlong values are cut at the glass edge
        match state {
            SessionState::Disconnected => {
                let _ = write!(top, "{} v{}", self.box_name, self.version);
                let _ = bottom.push_str("Waiting...");
            }
            SessionState::Connected => {
                let _ = write!(top, "Pan:  {:.*}", SIG_DIGITS, pan);
                let _ = write!(bottom, "Tilt: {:.*}", SIG_DIGITS, tilt);
            }
        }

        self.screen.set_line(0, &top);
        self.screen.set_line(1, &bottom);
    }
}

impl<B: DisplayBackend> DisplaySink for StatusDisplay<B> {
    fn render(&mut self, state: SessionState, pan: f32, tilt: f32) {
        self.layout(state, pan, tilt);
        if !self.screen.is_dirty() {
            return;
        }

        self.last_error = self.screen.render_to(&mut self.backend).err();
        if let Some(_e) = self.last_error {
            #[cfg(feature = "defmt")]
            defmt::warn!("display redraw failed: {}", _e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String as StdString;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingBackend {
        glass: [StdString; 2],
        clears: usize,
        fail: bool,
    }

    impl DisplayBackend for RecordingBackend {
        fn clear(&mut self) -> Result<(), DisplayError> {
            if self.fail {
                return Err(DisplayError::Communication);
            }
            self.clears += 1;
            self.glass = Default::default();
            Ok(())
        }

        fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
            let line = self
                .glass
                .get_mut(row as usize)
                .ok_or(DisplayError::InvalidCoordinates)?;
            assert_eq!(col, 0);
            *line = text.to_string();
            Ok(())
        }

        fn flush(&mut self) -> Result<(), DisplayError> {
            Ok(())
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    fn display() -> StatusDisplay<RecordingBackend> {
        StatusDisplay::new(RecordingBackend::default(), &PanelConfig::default())
    }

    fn glass(d: &StatusDisplay<RecordingBackend>) -> Vec<&str> {
        d.backend().glass.iter().map(|s| s.as_str()).collect()
    }

    #[test]
    fn test_splash_screen() {
        let mut d = display();
        d.render(SessionState::Disconnected, 0.0, 0.0);
        assert_eq!(glass(&d), ["box1 v2.0.0.1", "Waiting..."]);
    }

    #[test]
    fn test_parameter_screen() {
        let mut d = display();
        d.render(SessionState::Connected, 12.5, -3.0);
        assert_eq!(glass(&d), ["Pan:  12.500", "Tilt: -3.000"]);
    }

    #[test]
    fn test_long_values_cut_at_edge() {
        let mut d = display();
        d.render(SessionState::Connected, 123456789.0, 0.0);
        assert_eq!(d.screen().get_line(0).map(str::len), Some(16));
        assert!(glass(&d)[0].starts_with("Pan:  1234567"));
    }

    #[test]
    fn test_huge_values_still_shown() {
        let mut d = display();
        d.render(SessionState::Connected, 1e30, f32::MIN);
        let lines = glass(&d);
        assert_eq!(lines[0], "Pan:  1000000015");
        assert_eq!(lines[1], "Tilt: -340282346");
    }

    #[test]
    fn test_unchanged_render_skips_redraw() {
        let mut d = display();
        d.render(SessionState::Connected, 1.0, 2.0);
        d.render(SessionState::Connected, 1.0, 2.0);
        assert_eq!(d.backend().clears, 1);
        d.render(SessionState::Connected, 1.5, 2.0);
        assert_eq!(d.backend().clears, 2);
    }

    #[test]
    fn test_backend_failure_retries() {
        let mut d = display();
        d.backend.fail = true;
        d.render(SessionState::Disconnected, 0.0, 0.0);
        assert_eq!(d.last_error(), Some(DisplayError::Communication));
        assert!(d.screen().is_dirty());

        d.backend.fail = false;
        d.render(SessionState::Disconnected, 0.0, 0.0);
        assert_eq!(d.last_error(), None);
        assert_eq!(glass(&d), ["box1 v2.0.0.1", "Waiting..."]);
    }
}
