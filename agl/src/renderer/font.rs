/// Fonts (glyph atlas + metric table) and text labels

use std::any::Any;
use std::cell::OnceCell;
use std::sync::Arc;
use crate::error::Result;
use crate::graphics::{Color, FontMetric, PixelBuffer, PixelFormat, Rect};
use super::validate_bitmap_source;

/// Glyph atlas converted to RGBA8888 plus its metric table
pub struct FontData {
    metric: Arc<dyn FontMetric>,
    atlas: PixelBuffer,
    width: u32,
    height: u32,
}

impl FontData {
    pub fn new(metric: Arc<dyn FontMetric>, atlas: &PixelBuffer, width: u32, height: u32) -> Result<Self> {
        validate_bitmap_source(atlas, width, height)?;
        Ok(Self {
            metric,
            atlas: atlas.converted(PixelFormat::RGBA8888)?,
            width,
            height,
        })
    }

    pub fn metric(&self) -> &dyn FontMetric {
        self.metric.as_ref()
    }

    pub fn atlas(&self) -> &PixelBuffer {
        &self.atlas
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA of atlas pixel `(x, y)`, transparent outside the atlas
    pub fn atlas_pixel(&self, x: i32, y: i32) -> [u8; 4] {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return [0; 4];
        }
        self.atlas.get_rgba_at(y as usize * self.width as usize + x as usize)
    }
}

/// Font resource, shared between labels.
///
/// Backends downcast a `Arc<dyn Font>` to their own type with `into_any`.
pub trait Font: Send + Sync {
    fn data(&self) -> &FontData;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Horizontal placement of each line relative to the label origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    /// Lines centered on the origin
    Center,
}

/// One laid-out line of a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLine {
    pub text: String,
    /// Relative to the label origin
    pub rect: Rect,
}

/// Label text and its lazily computed line layout.
///
/// The layout is cached until the text, wrap width or alignment change.
#[derive(Debug, Clone, Default)]
pub struct LabelLayout {
    lines: Vec<String>,
    wrap_width: Option<i32>,
    align: TextAlign,
    cache: OnceCell<Vec<LabelLine>>,
}

impl LabelLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text; `\n` starts a new line.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.invalidate();
    }

    pub fn add_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
        self.invalidate();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.invalidate();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Wrap lines wider than `width` pixels at spaces.
    pub fn set_wrap_width(&mut self, width: Option<i32>) {
        self.wrap_width = width;
        self.invalidate();
    }

    pub fn set_align(&mut self, align: TextAlign) {
        self.align = align;
        self.invalidate();
    }

    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    fn invalidate(&mut self) {
        self.cache.take();
    }

    /// The laid-out lines, computed on first use.
    pub fn layout(&self, metric: &dyn FontMetric) -> &[LabelLine] {
        self.cache.get_or_init(|| {
            let height = metric.height();
            self.lines
                .iter()
                .flat_map(|line| wrap_line(line, self.wrap_width, metric))
                .enumerate()
                .map(|(i, text)| {
                    let width = metric.string_length(&text);
                    let x = match self.align {
                        TextAlign::Left => 0,
                        TextAlign::Center => -width / 2,
                    };
                    LabelLine {
                        rect: Rect::new(x, i as i32 * height, width, height),
                        text,
                    }
                })
                .collect()
        })
    }
}

/// Greedy word wrap. A single word wider than `width` keeps its own line.
fn wrap_line(line: &str, width: Option<i32>, metric: &dyn FontMetric) -> Vec<String> {
    let Some(width) = width else {
        return vec![line.to_string()];
    };
    if metric.string_length(line) <= width {
        return vec![line.to_string()];
    }

    let mut out = Vec::new();
    let mut current = String::new();
    for word in line.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if !current.is_empty() && metric.string_length(&candidate) > width {
            out.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    out.push(current);
    out
}

/// Text label drawn with one font.
pub trait Label: Send {
    fn font(&self) -> &Arc<dyn Font>;

    fn layout(&self) -> &LabelLayout;

    fn layout_mut(&mut self) -> &mut LabelLayout;

    fn color(&self) -> Color;

    fn set_color(&mut self, color: Color);

    /// Draw with the label origin at pixel `(x, y)`.
    fn draw(&self, x: i32, y: i32) -> Result<()>;
}

#[cfg(test)]
#[path = "font_tests.rs"]
mod tests;
