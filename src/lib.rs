//! Shared building blocks for the LED matrix clock.
//!
//! The binary is split into a small library plus a thin `main.rs` so the
//! whole render path can be exercised off-device:
//! - Panel and color primitives plus matrix initialization (this module)
//! - Argument parsing and validation (`config`)
//! - Font loading and metrics (`font`)
//! - The drawing capability over the hardware (`surface`)
//! - The once-per-second render loop (`clock`)
//!
//! Everything that links the `rpi-led-matrix` driver sits behind the
//! `hardware` feature; `cargo test --no-default-features` runs on any host.

pub mod clock;
pub mod config;
pub mod font;
pub mod surface;

#[cfg(feature = "hardware")]
use rpi_led_matrix::{LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

// ── Panel configuration ────────────────────────────────────────────

/// Dimensions of the LED panel.
///
/// # Rust concept: derive macros
/// `Clone, Copy` make this cheaply copyable (it's just two u32s).
/// This is the idiomatic way to pass configuration through a system —
/// explicit, testable, and no hidden global state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub rows: u32,
    pub cols: u32,
}

impl PanelConfig {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { rows: 32, cols: 64 }
    }
}

// ── Color ──────────────────────────────────────────────────────────

/// Our own color type, decoupled from the hardware crate.
///
/// This lets us test color logic on any host without `rpi-led-matrix`.
/// At the hardware boundary, we convert via `Into<LedColor>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// True when every channel is exactly 0 or 255.
    ///
    /// Such colors survive a reduction to one PWM bit per channel, which is
    /// what lets the driver run at minimal color depth.
    pub fn is_full_saturation(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|&ch| ch == 0 || ch == 255)
    }
}

/// Error for `"r,g,b"` strings that don't name a color.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid color spec '{0}' (expected r,g,b with each channel 0-255)")]
pub struct ParseColorError(pub String);

/// Parse `"r,g,b"` with exactly three comma-separated channels in 0-255.
///
/// # Rust concept: FromStr
/// Implementing `FromStr` is all clap needs to accept `Color` directly as
/// an argument type; parse failures become usage errors.
impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut channels = s.split(',').map(|part| part.trim().parse::<u8>());

        match (channels.next(), channels.next(), channels.next(), channels.next()) {
            (Some(Ok(r)), Some(Ok(g)), Some(Ok(b)), None) => Ok(Color::new(r, g, b)),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// Convert our Color to the hardware crate's LedColor at the boundary.
#[cfg(feature = "hardware")]
impl From<Color> for rpi_led_matrix::LedColor {
    fn from(c: Color) -> Self {
        rpi_led_matrix::LedColor {
            red: c.r,
            green: c.g,
            blue: c.b,
        }
    }
}

// ── Matrix initialization ──────────────────────────────────────────

/// Create a matrix configured for our hardware:
/// Adafruit Bonnet (PWM mod) + configurable panel size.
///
/// `minimal_depth` drops the panel to one PWM bit per channel; only valid
/// when brightness is 100 and every drawn color is pure 0/255.
///
/// # Rust concept: Result and the ? operator
/// Matrix initialization can fail (e.g., if not running as root, or if
/// GPIO is unavailable), so this returns `Result` and the caller uses `?`
/// to propagate errors upward.
#[cfg(feature = "hardware")]
pub fn create_matrix(
    panel: PanelConfig,
    brightness: u8,
    minimal_depth: bool,
) -> Result<LedMatrix, Box<dyn std::error::Error>> {
    let mut options = LedMatrixOptions::new();
    options.set_rows(panel.rows);
    options.set_cols(panel.cols);
    options.set_hardware_mapping("adafruit-hat-pwm");
    options.set_led_rgb_sequence("RGB");
    options.set_brightness(brightness)?;
    options.set_pwm_bits(if minimal_depth { 1 } else { 8 })?;
    options.set_pwm_lsb_nanoseconds(130); // Stable timing (~143Hz refresh)

    let mut rt_options = LedRuntimeOptions::new();
    rt_options.set_gpio_slowdown(2);

    let matrix = LedMatrix::new(Some(options), Some(rt_options))?;

    Ok(matrix)
}

// ── Signal handling ────────────────────────────────────────────────

/// Set up a SIGINT/SIGTERM handler that sets `running` to false.
///
/// # Rust concept: Arc and AtomicBool
/// We need to share the `running` flag between the render loop and the
/// signal handler. `Arc` (Atomic Reference Counting) lets multiple owners
/// share data. `AtomicBool` is a thread-safe boolean — no mutex needed
/// for a single bool.
pub fn setup_signal_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone(); // Clone the Arc, not the bool — both point to same data

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .expect("Error setting signal handler");

    running
}

/// Check if the render loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    // ── PanelConfig tests ──────────────────────────────────────────

    #[test]
    fn panel_config_default_is_32x64() {
        let panel = PanelConfig::default();
        assert_eq!(panel.rows, 32);
        assert_eq!(panel.cols, 64);
    }

    // ── Color parsing tests ────────────────────────────────────────

    #[rstest]
    #[case("255,223,0", Color::new(255, 223, 0))]
    #[case("0,0,0", Color::new(0, 0, 0))]
    #[case("255,255,255", Color::new(255, 255, 255))]
    #[case("10, 20, 30", Color::new(10, 20, 30))]
    fn parse_color_accepts_valid_triples(#[case] input: &str, #[case] expected: Color) {
        assert_eq!(input.parse::<Color>(), Ok(expected));
    }

    #[rstest]
    #[case("1,2")] // too few channels
    #[case("1,2,3,4")] // too many channels
    #[case("256,0,0")] // channel out of range
    #[case("-1,0,0")]
    #[case("a,b,c")]
    #[case("")]
    #[case("10;20;30")]
    fn parse_color_rejects_malformed_specs(#[case] input: &str) {
        assert!(input.parse::<Color>().is_err());
    }

    #[test]
    fn parse_color_error_names_the_input() {
        let err = "1,2".parse::<Color>().unwrap_err();
        assert!(err.to_string().contains("1,2"));
    }

    // ── Full saturation tests ──────────────────────────────────────

    #[rstest]
    #[case(Color::new(255, 0, 255), true)]
    #[case(Color::new(0, 0, 0), true)]
    #[case(Color::new(255, 255, 255), true)]
    #[case(Color::new(254, 0, 255), false)]
    #[case(Color::new(255, 223, 0), false)]
    fn full_saturation_requires_pure_channels(#[case] color: Color, #[case] expected: bool) {
        assert_eq!(color.is_full_saturation(), expected);
    }

    #[test]
    fn black_constant_is_black() {
        assert_eq!(Color::BLACK, Color::new(0, 0, 0));
    }
}
