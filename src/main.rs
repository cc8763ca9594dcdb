//! LED Matrix Clock
//!
//! Shows the current time and date on an RGB LED matrix panel, redrawing
//! once per second against an absolute deadline so the display never
//! drifts. All setup errors are fatal before the first frame; after that
//! the loop runs until SIGINT/SIGTERM, blanks the panel, and exits 0.
//!
//! ## Usage
//! ```sh
//! sudo ./target/release/led-clock-rs -f fonts/7x13.bdf -t %H:%M -b 30
//! ```

#[cfg(not(feature = "hardware"))]
fn main() {
    eprintln!("This binary requires the 'hardware' feature (rpi-led-matrix).");
    eprintln!("Build with: cargo build --release");
    eprintln!("Tests can run without it: cargo test --no-default-features");
    std::process::exit(1);
}

#[cfg(feature = "hardware")]
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[cfg(feature = "hardware")]
fn run() -> Result<(), Box<dyn std::error::Error>> {
    use clap::Parser;
    use led_clock_rs::clock::{SystemTicker, run_clock};
    use led_clock_rs::config::ClockArgs;
    use led_clock_rs::font::{BdfFontProvider, load_clock_fonts};
    use led_clock_rs::surface::MatrixSurface;
    use led_clock_rs::{create_matrix, setup_signal_handler};

    // Initialize tracing subscriber for startup logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_ansi(false) // Disable ANSI color codes for systemd/journald
        .compact()
        .init();

    // Every startup failure exits 1, so clap's error is printed here
    // instead of going through Error::exit (which would exit 2).
    let args = match ClockArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };
    args.validate()?;

    let panel = args.panel();
    tracing::info!("LED matrix clock v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Panel: {}x{}", panel.cols, panel.rows);
    tracing::info!("Font: {}", args.font.display());
    tracing::info!("Brightness: {}%", args.brightness);

    let fonts = load_clock_fonts(&BdfFontProvider, &args.font, args.outline_color.is_some())?;
    let matrix = create_matrix(panel, args.brightness, args.minimal_color_depth())?;
    let mut surface = MatrixSurface::new(matrix);
    let running = setup_signal_handler();

    run_clock(&mut surface, &fonts, &args, &running, &mut SystemTicker);

    // Fresh line after ^C on the controlling terminal.
    println!();

    Ok(())
}
