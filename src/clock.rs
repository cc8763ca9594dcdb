//! The once-per-second render loop.
//!
//! Each frame is timed against an absolute deadline (whole seconds since
//! the Unix epoch) rather than a fixed sleep interval, so draw latency never
//! accumulates into drift: frame N is always shown at `start + N` seconds.
//! The displayed time is computed from the deadline itself, which means the
//! frame swapped in at second N shows second N.
//!
//! ## Rust concepts
//! - Generic functions over trait bounds instead of concrete hardware types
//! - Cooperative cancellation through a shared `AtomicBool`
//! - Mockable time via a two-method `Ticker` trait

use crate::config::ClockArgs;
use crate::font::ClockFonts;
use crate::is_running;
use crate::surface::DisplaySurface;
use chrono::{DateTime, Local, Utc};
use std::sync::atomic::AtomicBool;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// The date line sits below the time line at a fixed origin.
const DATE_ORIGIN_X: i32 = 0;
const DATE_ORIGIN_Y: i32 = 14;

// ── Time source ────────────────────────────────────────────────────

/// Clock and sleep primitives used by the loop.
pub trait Ticker {
    /// Current time in whole seconds since the Unix epoch.
    fn now(&self) -> i64;

    /// Block until `deadline`; return immediately if it already passed.
    fn sleep_until(&mut self, deadline: i64);
}

/// System clock and `thread::sleep`.
pub struct SystemTicker;

impl Ticker for SystemTicker {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn sleep_until(&mut self, deadline: i64) {
        let target = UNIX_EPOCH + Duration::from_secs(deadline.max(0) as u64);
        // A deadline in the past leaves nothing to sleep.
        if let Ok(remaining) = target.duration_since(SystemTime::now()) {
            std::thread::sleep(remaining);
        }
    }
}

/// Local-time view of an absolute deadline.
pub fn local_stamp(deadline: i64) -> DateTime<Local> {
    DateTime::from_timestamp(deadline, 0)
        .unwrap_or_default()
        .with_timezone(&Local)
}

// ── Render loop ────────────────────────────────────────────────────

/// Drive the display until `running` is cleared.
///
/// While `running` holds, each iteration formats the deadline's local time,
/// redraws the off-screen buffer, sleeps to the deadline, and swaps. The
/// flag is checked once at the top of each iteration, so an iteration in
/// flight when a signal lands still completes its draw/sleep/swap; the loop
/// then blanks the panel and returns.
///
/// Formats were validated at startup, so no iteration can fail.
pub fn run_clock<S: DisplaySurface>(
    surface: &mut S,
    fonts: &ClockFonts<S::Font>,
    args: &ClockArgs,
    running: &AtomicBool,
    ticker: &mut impl Ticker,
) {
    let mut deadline = ticker.now();

    while is_running(running) {
        let stamp = local_stamp(deadline);
        let time_text = stamp.format(&args.time_format).to_string();
        let date_text = stamp.format(&args.date_format).to_string();

        let time_y = args.y_origin + fonts.baseline;

        surface.clear(args.bg_color);
        if let (Some(outline), Some(color)) = (fonts.outline.as_ref(), args.outline_color) {
            surface.draw_text(
                outline,
                &time_text,
                args.x_origin,
                time_y,
                color,
                args.letter_spacing,
            );
        }
        surface.draw_text(
            &fonts.base,
            &time_text,
            args.x_origin,
            time_y,
            args.time_color,
            args.letter_spacing,
        );
        surface.draw_text(
            &fonts.base,
            &date_text,
            DATE_ORIGIN_X,
            DATE_ORIGIN_Y + fonts.baseline,
            args.date_color,
            args.letter_spacing,
        );

        ticker.sleep_until(deadline);
        surface.swap();
        deadline += 1;
    }

    surface.blank();
}

// ── Tests ──────────────────────────────────────────────────────────
