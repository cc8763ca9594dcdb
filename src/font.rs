//! Font loading behind a narrow capability trait.
//!
//! The render loop needs three things from a font: a loaded face, an
//! optional derived outline face, and the baseline offset. The trait keeps
//! the loop independent of the driver's BDF renderer, so tests substitute a
//! fake provider and the hardware adapter stays behind the feature gate.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Loads fonts and answers metric queries.
pub trait FontProvider {
    type Font;

    /// Load a BDF font file.
    fn load(&self, path: &Path) -> Result<Self::Font, FontError>;

    /// Derive the outline face used to halo the time line.
    fn derive_outline(&self, base: &Self::Font) -> Result<Self::Font, FontError>;

    /// Pixels from the text origin down to the baseline.
    fn baseline(&self, font: &Self::Font) -> i32;
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("couldn't read font file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't load font file '{path}': {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("font file '{path}' declares no ascent")]
    NoAscent { path: PathBuf },
}

/// The faces and metrics the render loop draws with.
pub struct ClockFonts<F> {
    pub base: F,
    /// Present iff an outline color was configured.
    pub outline: Option<F>,
    pub baseline: i32,
}

/// Load the base face and, when requested, derive its outline face.
pub fn load_clock_fonts<P: FontProvider>(
    provider: &P,
    path: &Path,
    with_outline: bool,
) -> Result<ClockFonts<P::Font>, FontError> {
    let base = provider.load(path)?;
    let baseline = provider.baseline(&base);
    let outline = if with_outline {
        Some(provider.derive_outline(&base)?)
    } else {
        None
    };

    Ok(ClockFonts {
        base,
        outline,
        baseline,
    })
}

/// Read the ascent of a BDF font from its header.
///
/// Text is drawn with its origin on the baseline, so the configured y origin
/// is shifted down by the ascent. `FONT_ASCENT` is authoritative; fonts
/// without it fall back to the bounding-box height plus its y offset.
pub fn bdf_baseline(path: &Path) -> Result<i32, FontError> {
    let io_err = |source| FontError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    let reader = BufReader::new(file);

    let mut bounding_box = None;
    for line in reader.lines() {
        let line = line.map_err(io_err)?;
        let mut words = line.split_whitespace();
        match words.next() {
            Some("FONT_ASCENT") => {
                if let Some(ascent) = words.next().and_then(|w| w.parse::<i32>().ok()) {
                    return Ok(ascent);
                }
            }
            Some("FONTBOUNDINGBOX") => {
                // FONTBOUNDINGBOX is width, height, x offset, y offset;
                // the y offset is the (negative) descent.
                let mut nums = words.filter_map(|w| w.parse::<i32>().ok());
                if let (Some(_w), Some(h), Some(_x), Some(y)) =
                    (nums.next(), nums.next(), nums.next(), nums.next())
                {
                    bounding_box = Some(h + y);
                }
            }
            // Glyph data starts here; the header is over.
            Some("CHARS") => break,
            _ => {}
        }
    }

    bounding_box.ok_or_else(|| FontError::NoAscent {
        path: path.to_path_buf(),
    })
}

// ── Hardware adapter ───────────────────────────────────────────────

#[cfg(feature = "hardware")]
mod matrix_font {
    use super::{FontError, FontProvider, bdf_baseline};
    use rpi_led_matrix::LedFont;
    use std::path::{Path, PathBuf};

    /// A loaded BDF face plus the metrics the loop needs.
    pub struct MatrixFont {
        face: LedFont,
        path: PathBuf,
        baseline: i32,
        outline: bool,
    }

    impl MatrixFont {
        pub fn face(&self) -> &LedFont {
            &self.face
        }

        /// Outline faces render as a one-pixel ring around each glyph.
        pub fn is_outline(&self) -> bool {
            self.outline
        }
    }

    /// Loads fonts with the matrix driver's BDF renderer.
    pub struct BdfFontProvider;

    impl BdfFontProvider {
        fn load_face(&self, path: &Path, outline: bool) -> Result<MatrixFont, FontError> {
            let baseline = bdf_baseline(path)?;
            let face = LedFont::new(path).map_err(|reason| FontError::Load {
                path: path.to_path_buf(),
                reason: reason.to_string(),
            })?;

            Ok(MatrixFont {
                face,
                path: path.to_path_buf(),
                baseline,
                outline,
            })
        }
    }

    impl FontProvider for BdfFontProvider {
        type Font = MatrixFont;

        fn load(&self, path: &Path) -> Result<MatrixFont, FontError> {
            self.load_face(path, false)
        }

        /// The driver has no outline-font builder, so the outline face is a
        /// second handle to the same BDF, flagged for ring rendering by the
        /// surface.
        fn derive_outline(&self, base: &MatrixFont) -> Result<MatrixFont, FontError> {
            self.load_face(&base.path, true)
        }

        fn baseline(&self, font: &MatrixFont) -> i32 {
            font.baseline
        }
    }
}

#[cfg(feature = "hardware")]
pub use matrix_font::{BdfFontProvider, MatrixFont};

// ── Tests ──────────────────────────────────────────────────────────
