//! The drawing capability the render loop depends on.
//!
//! ## Rust concepts
//! - Traits with an associated type tie a surface to its font handle
//! - Ownership through `Option::take` for APIs that consume-and-return

use crate::Color;

/// Narrow interface over the double-buffered panel.
///
/// The loop only ever clears the off-screen buffer, draws text into it, and
/// swaps it onto the panel; `blank` is the shutdown path. Brightness and
/// color depth are fixed when the matrix is created.
pub trait DisplaySurface {
    type Font;

    /// Fill the off-screen buffer with one color.
    fn clear(&mut self, color: Color);

    /// Draw `text` with its origin at `(x, y)` on the baseline.
    fn draw_text(
        &mut self,
        font: &Self::Font,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
        kerning: i32,
    );

    /// Swap the off-screen buffer onto the panel.
    fn swap(&mut self);

    /// Turn the panel off.
    fn blank(&mut self);
}

// ── Hardware adapter ───────────────────────────────────────────────

#[cfg(feature = "hardware")]
mod matrix_surface {
    use super::DisplaySurface;
    use crate::Color;
    use crate::font::MatrixFont;
    use rpi_led_matrix::{LedCanvas, LedColor, LedMatrix};

    /// Ring offsets for outline faces: one pixel in every direction.
    #[rustfmt::skip]
    const RING_OFFSETS: [(i32, i32); 8] = [
        (-1, -1), (0, -1), (1, -1),
        (-1,  0),          (1,  0),
        (-1,  1), (0,  1), (1,  1),
    ];

    /// Owns the matrix handle and its off-screen canvas.
    ///
    /// `LedMatrix::swap` consumes one canvas and returns the other, so the
    /// off-screen canvas lives in an `Option` that is taken and refilled on
    /// every swap.
    pub struct MatrixSurface {
        matrix: LedMatrix,
        canvas: Option<LedCanvas>,
    }

    impl MatrixSurface {
        pub fn new(matrix: LedMatrix) -> Self {
            let canvas = matrix.offscreen_canvas();
            Self {
                matrix,
                canvas: Some(canvas),
            }
        }
    }

    impl DisplaySurface for MatrixSurface {
        type Font = MatrixFont;

        fn clear(&mut self, color: Color) {
            if let Some(canvas) = self.canvas.as_mut() {
                canvas.fill(&color.into());
            }
        }

        fn draw_text(
            &mut self,
            font: &MatrixFont,
            text: &str,
            x: i32,
            y: i32,
            color: Color,
            kerning: i32,
        ) {
            let Some(canvas) = self.canvas.as_mut() else {
                return;
            };
            let led: LedColor = color.into();

            if font.is_outline() {
                // An outline face is the same glyphs stamped at every ring
                // offset; the glyph body gets covered by the main text drawn
                // on top of it.
                for (dx, dy) in RING_OFFSETS {
                    canvas.draw_text(font.face(), text, x + dx, y + dy, &led, kerning, false);
                }
            } else {
                canvas.draw_text(font.face(), text, x, y, &led, kerning, false);
            }
        }

        fn swap(&mut self) {
            if let Some(canvas) = self.canvas.take() {
                self.canvas = Some(self.matrix.swap(canvas));
            }
        }

        fn blank(&mut self) {
            if let Some(canvas) = self.canvas.as_mut() {
                canvas.clear();
            }
            self.swap();
        }
    }
}

#[cfg(feature = "hardware")]
pub use matrix_surface::MatrixSurface;
