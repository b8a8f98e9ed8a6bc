//! The 2D drawing surface the box tree paints into.
//!
//! Hosts provide the real implementation (Cairo, Qt, GDI+, ...); the engine
//! only walks the finished box tree and issues these primitives. The
//! [`RecordingGraphics`] backend captures the primitive stream for tests.

use crate::font::{FontStyle, GlyphId};

/// Packed ARGB color.
pub type Color = u32;

pub const TRANSPARENT: Color = 0x0000_0000;
pub const BLACK: Color = 0xff00_0000;
pub const WHITE: Color = 0xffff_ffff;
pub const RED: Color = 0xffff_0000;

#[inline]
pub fn is_transparent(c: Color) -> bool {
    c >> 24 == 0
}

pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    0xff00_0000 | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// The vector-drawing contract. Coordinates are in the same em units as
/// box metrics; y grows downward and `y` is the baseline for glyphs.
pub trait Graphics2D {
    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);

    fn draw_glyph(&mut self, glyph: GlyphId, code: char, style: FontStyle, scale: f32, x: f32, y: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn stroke_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, rx: f32, ry: f32);
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    fn set_stroke_width(&mut self, w: f32);

    fn translate(&mut self, dx: f32, dy: f32);
    fn scale(&mut self, sx: f32, sy: f32);
    /// Rotation around the current origin, in radians.
    fn rotate(&mut self, angle: f32);
    fn reflect(&mut self);
}

/// A single captured drawing primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    SetColor(Color),
    Glyph {
        code: char,
        scale: f32,
        x: f32,
        y: f32,
    },
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Translate(f32, f32),
    Scale(f32, f32),
    Rotate(f32),
    Reflect,
}

/// Records every primitive; the test suites assert on the stream.
#[derive(Debug, Default)]
pub struct RecordingGraphics {
    pub ops: Vec<DrawOp>,
    color: Color,
    stroke: f32,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        RecordingGraphics {
            ops: Vec::new(),
            color: BLACK,
            stroke: 0.0,
        }
    }

    /// All glyphs drawn, in paint order.
    pub fn glyphs(&self) -> Vec<char> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Glyph { code, .. } => Some(*code),
                _ => None,
            })
            .collect()
    }

    pub fn rule_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::FillRect { .. }))
            .count()
    }
}

impl Graphics2D for RecordingGraphics {
    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
        self.ops.push(DrawOp::SetColor(color));
    }

    fn draw_glyph(
        &mut self,
        _glyph: GlyphId,
        code: char,
        _style: FontStyle,
        scale: f32,
        x: f32,
        y: f32,
    ) {
        self.ops.push(DrawOp::Glyph { code, scale, x, y });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(DrawOp::FillRect { x, y, w, h });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(DrawOp::StrokeRect { x, y, w, h });
    }

    fn stroke_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, _rx: f32, _ry: f32) {
        self.ops.push(DrawOp::StrokeRect { x, y, w, h });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }

    fn set_stroke_width(&mut self, w: f32) {
        self.stroke = w;
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.ops.push(DrawOp::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.ops.push(DrawOp::Scale(sx, sy));
    }

    fn rotate(&mut self, angle: f32) {
        self.ops.push(DrawOp::Rotate(angle));
    }

    fn reflect(&mut self) {
        self.ops.push(DrawOp::Reflect);
    }
}
