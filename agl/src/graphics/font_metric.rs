/// Font metric collaborator (glyph-rect lookup, read-only)

use super::Rect;

/// Glyph metrics for one font atlas.
pub trait FontMetric: Send + Sync {
    /// Glyph source rectangle inside the atlas, in atlas pixels
    fn char_texture_rect(&self, ch: char) -> Rect;

    /// Glyph destination rectangle relative to the pen position, in screen pixels
    fn char_quad_rect(&self, ch: char) -> Rect;

    /// Horizontal advance of `ch`
    fn char_width(&self, ch: char) -> i32;

    /// Advance of a whole line
    fn string_length(&self, line: &str) -> i32 {
        line.chars().map(|c| self.char_width(c)).sum()
    }

    /// Line height
    fn height(&self) -> i32;
}
