//! Command-line configuration, parsed once at startup and never mutated.
//!
//! ## Rust concepts
//! - clap's derive API: a struct describes the whole CLI
//! - Custom argument types via `FromStr` (see `Color`)
//! - Range validation handled by the parser, not the program logic

use crate::{Color, PanelConfig};
use chrono::format::{Item, StrftimeItems};
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// LED matrix clock/date display
#[derive(Parser, Debug, Clone)]
#[command(name = "led-clock-rs")]
#[command(about = "Show the current time and date on an RGB LED matrix")]
#[command(version)]
pub struct ClockArgs {
    /// Time format (strftime syntax)
    #[arg(short = 't', long = "time-format", default_value = "%H:%M")]
    pub time_format: String,

    /// Date format (strftime syntax)
    #[arg(short = 'd', long = "date-format", default_value = "%a,%b%d")]
    pub date_format: String,

    /// Time text color as r,g,b
    #[arg(short = 'C', long = "time-color", default_value = "255,223,0")]
    pub time_color: Color,

    /// Date text color as r,g,b
    #[arg(short = 'c', long = "date-color", default_value = "255,69,0")]
    pub date_color: Color,

    /// Background color as r,g,b
    #[arg(short = 'B', long = "bg-color", default_value = "0,0,0")]
    pub bg_color: Color,

    /// Outline color as r,g,b; drawing a one-pixel outline around the time
    /// increases contrast on busy backgrounds
    #[arg(short = 'O', long = "outline-color")]
    pub outline_color: Option<Color>,

    /// BDF font file for both lines
    #[arg(short = 'f', long = "font", default_value = "./7x13.bdf")]
    pub font: PathBuf,

    /// X origin of the time line
    #[arg(short = 'x', long = "x-origin", default_value_t = 4, allow_negative_numbers = true)]
    pub x_origin: i32,

    /// Y origin of the time line
    #[arg(short = 'y', long = "y-origin", default_value_t = 0, allow_negative_numbers = true)]
    pub y_origin: i32,

    /// Brightness percent
    #[arg(
        short = 'b',
        long,
        default_value_t = 15,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub brightness: u8,

    /// Spacing in pixels between letters (may be negative)
    #[arg(
        short = 'S',
        long = "letter-spacing",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    pub letter_spacing: i32,

    /// Number of rows on the LED panel
    #[arg(long, default_value_t = 32)]
    pub rows: u32,

    /// Number of columns on the LED panel
    #[arg(long, default_value_t = 64)]
    pub cols: u32,
}

impl ClockArgs {
    /// Reject invalid strftime patterns before the loop starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_pattern(&self.time_format)?;
        validate_pattern(&self.date_format)?;
        Ok(())
    }

    pub fn panel(&self) -> PanelConfig {
        PanelConfig::new(self.rows, self.cols)
    }

    /// True when the panel can run at one PWM bit per channel: full
    /// brightness and every configured color pure 0/255.
    pub fn minimal_color_depth(&self) -> bool {
        self.brightness == 100
            && self.time_color.is_full_saturation()
            && self.date_color.is_full_saturation()
            && self.bg_color.is_full_saturation()
            && self.outline_color.is_none_or(|c| c.is_full_saturation())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid strftime pattern '{0}'")]
    BadPattern(String),
}

/// Check a strftime pattern without formatting anything.
///
/// chrono reports bad specifiers lazily as `Item::Error` tokens when the
/// pattern is actually used; surfacing them here keeps the render loop free
/// of formatting failures.
pub fn validate_pattern(pattern: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(ConfigError::BadPattern(pattern.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<ClockArgs, clap::Error> {
        ClockArgs::try_parse_from(std::iter::once("led-clock-rs").chain(args.iter().copied()))
    }

    // ── Defaults ───────────────────────────────────────────────────

    #[test]
    fn defaults_match_documented_values() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.time_format, "%H:%M");
        assert_eq!(args.date_format, "%a,%b%d");
        assert_eq!(args.time_color, Color::new(255, 223, 0));
        assert_eq!(args.date_color, Color::new(255, 69, 0));
        assert_eq!(args.bg_color, Color::BLACK);
        assert_eq!(args.outline_color, None);
        assert_eq!(args.font, PathBuf::from("./7x13.bdf"));
        assert_eq!((args.x_origin, args.y_origin), (4, 0));
        assert_eq!(args.brightness, 15);
        assert_eq!(args.letter_spacing, 0);
        assert_eq!(args.panel(), PanelConfig::new(32, 64));
    }

    // ── Flag parsing ───────────────────────────────────────────────

    #[test]
    fn time_flags_override_defaults() {
        let args = parse(&["-t", "%H:%M", "-C", "255,0,0", "-b", "50"]).unwrap();
        assert_eq!(args.time_format, "%H:%M");
        assert_eq!(args.time_color, Color::new(255, 0, 0));
        assert_eq!(args.brightness, 50);
        assert_eq!(args.outline_color, None);
    }

    #[test]
    fn outline_flag_enables_outline() {
        let args = parse(&["-O", "10,10,10"]).unwrap();
        assert_eq!(args.outline_color, Some(Color::new(10, 10, 10)));
    }

    #[test]
    fn negative_letter_spacing_is_accepted() {
        let args = parse(&["-S", "-2"]).unwrap();
        assert_eq!(args.letter_spacing, -2);
    }

    #[test]
    fn two_channel_color_is_a_usage_error() {
        assert!(parse(&["-B", "1,2"]).is_err());
    }

    #[test]
    fn unknown_flag_is_a_usage_error() {
        assert!(parse(&["--no-such-flag"]).is_err());
    }

    // ── Brightness range ───────────────────────────────────────────

    #[rstest]
    #[case("1", true)]
    #[case("15", true)]
    #[case("100", true)]
    #[case("0", false)]
    #[case("101", false)]
    fn brightness_accepted_iff_in_range(#[case] value: &str, #[case] ok: bool) {
        assert_eq!(parse(&["-b", value]).is_ok(), ok);
    }

    // ── Pattern validation ─────────────────────────────────────────

    #[rstest]
    #[case("%H:%M")]
    #[case("%a,%b%d")]
    #[case("%I:%M:%S")]
    #[case("plain text")]
    fn valid_patterns_pass(#[case] pattern: &str) {
        assert_eq!(validate_pattern(pattern), Ok(()));
    }

    #[rstest]
    #[case("%Q")] // unknown specifier
    #[case("%H:%")] // trailing percent
    fn invalid_patterns_fail(#[case] pattern: &str) {
        assert!(validate_pattern(pattern).is_err());
    }

    #[test]
    fn validate_covers_both_patterns() {
        let mut args = parse(&[]).unwrap();
        assert_eq!(args.validate(), Ok(()));
        args.date_format = "%Q".to_string();
        assert!(args.validate().is_err());
    }

    // ── Minimal color depth ────────────────────────────────────────

    #[test]
    fn minimal_depth_needs_full_brightness_and_pure_colors() {
        let args = parse(&["-b", "100", "-C", "255,255,0", "-c", "0,255,0"]).unwrap();
        assert!(args.minimal_color_depth());
    }

    #[test]
    fn minimal_depth_counts_the_outline_color() {
        let pure = parse(&["-b", "100", "-C", "255,255,0", "-c", "0,255,0", "-O", "0,0,255"]);
        assert!(pure.unwrap().minimal_color_depth());

        let tinted = parse(&["-b", "100", "-C", "255,255,0", "-c", "0,255,0", "-O", "10,10,10"]);
        assert!(!tinted.unwrap().minimal_color_depth());
    }

    #[rstest]
    #[case(&["-b", "100"][..], false)] // default time color is 255,223,0
    #[case(&["-C", "255,255,0", "-c", "0,255,0"][..], false)] // default brightness 15
    fn minimal_depth_rejects_partial_setups(#[case] args: &[&str], #[case] expected: bool) {
        assert_eq!(parse(args).unwrap().minimal_color_depth(), expected);
    }
}
