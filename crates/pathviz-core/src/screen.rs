//! The [`Screen`] type: the glyph buffer a [`Model`](crate::Model) draws
//! into, and the [`Frame`] diff handed to a [`Driver`](crate::Driver).

use crate::geom::{Point, Range};
use crate::glyph::Glyph;
use crate::style::Style;

// ---------------------------------------------------------------------------
// Screen
// ---------------------------------------------------------------------------

/// A row-major buffer of [`Glyph`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    glyphs: Vec<Glyph>,
    bounds: Range,
}

impl Screen {
    /// Create a blank screen. Negative dimensions are clamped to zero.
    pub fn new(width: i32, height: i32) -> Self {
        let (w, h) = (width.max(0), height.max(0));
        Self {
            glyphs: vec![Glyph::default(); (w as usize) * (h as usize)],
            bounds: Range::new(0, 0, w, h),
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        self.contains(p)
            .then(|| (p.y as usize) * (self.width() as usize) + (p.x as usize))
    }

    /// Read the glyph at `p`. Returns `Glyph::default()` outside bounds.
    pub fn at(&self, p: Point) -> Glyph {
        self.index(p).map(|i| self.glyphs[i]).unwrap_or_default()
    }

    /// Set the glyph at `p`. No-op outside bounds.
    pub fn set(&mut self, p: Point, glyph: Glyph) {
        if let Some(i) = self.index(p) {
            self.glyphs[i] = glyph;
        }
    }

    /// Fill every cell with `glyph`.
    pub fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    /// Write `text` starting at `p`, clipped to the right edge.
    ///
    /// Returns the position just after the last character written.
    pub fn draw_text(&mut self, p: Point, text: &str, style: Style) -> Point {
        let mut cur = p;
        for ch in text.chars() {
            if cur.x >= self.width() {
                break;
            }
            self.set(cur, Glyph { ch, style });
            cur = cur.shift(1, 0);
        }
        cur
    }

    /// Copy `src` into `self`, reallocating if the sizes differ.
    pub fn copy_from(&mut self, src: &Screen) {
        if self.bounds != src.bounds {
            *self = src.clone();
        } else {
            self.glyphs.copy_from_slice(&src.glyphs);
        }
    }

    /// Row-major iterator over `(Point, Glyph)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Glyph)> + '_ {
        self.bounds.iter().zip(self.glyphs.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single glyph that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub glyph: Glyph,
    pub pos: Point,
}

/// A set of glyph changes (a diff frame).
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// Compute the difference between two screens.
///
/// If the sizes differ every glyph of `curr` is part of the frame.
pub fn compute_frame(prev: &Screen, curr: &Screen) -> Frame {
    let full = prev.bounds() != curr.bounds();
    let cells = curr
        .iter()
        .filter(|&(p, g)| full || prev.at(p) != g)
        .map(|(pos, glyph)| FrameCell { glyph, pos })
        .collect();
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}
