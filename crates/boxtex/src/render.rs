//! The drawable result of a parse: a laid-out box tree with pixel
//! metrics, plus the builder that produces it.

use tex_layout::boxes::HBox;
use tex_layout::graphics::BLACK;
use tex_layout::{
    Alignment, Atom, BoxNode, Color, Env, FontContext, Graphics2D, TexStyle, UnitType, splitter,
};

use crate::error::TexError;
use crate::formula::Formula;

/// Padding around the drawn formula, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Insets {
    pub fn uniform(v: f32) -> Insets {
        Insets {
            left: v,
            top: v,
            right: v,
            bottom: v,
        }
    }
}

/// A formula after layout. Box metrics are in em; every getter here is
/// in pixels, rounded up so the formula never clips.
#[derive(Debug)]
pub struct Render {
    root: BoxNode,
    text_size: f32,
    fg: Color,
    insets: Insets,
}

impl Render {
    pub fn width(&self) -> i32 {
        (self.root.width * self.text_size + self.insets.left + self.insets.right).ceil() as i32
    }

    pub fn height(&self) -> i32 {
        (self.root.vlen() * self.text_size + self.insets.top + self.insets.bottom).ceil() as i32
    }

    /// Distance from the top edge to the baseline, in pixels.
    pub fn baseline(&self) -> f32 {
        self.insets.top + self.root.height * self.text_size
    }

    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    pub fn insets(&self) -> Insets {
        self.insets
    }

    pub fn set_insets(&mut self, insets: Insets) {
        self.insets = insets;
    }

    pub fn set_foreground(&mut self, fg: Color) {
        self.fg = fg;
    }

    /// Re-wraps the laid-out box to a new pixel width.
    pub fn set_width(&mut self, width: f32, alignment: Alignment) {
        let inner = width - self.insets.left - self.insets.right;
        let root = std::mem::replace(&mut self.root, BoxNode::empty());
        self.root = HBox::with_width(root, inner / self.text_size, alignment).into_node();
    }

    /// Grows the insets so the total height reaches `height` pixels.
    pub fn set_height(&mut self, height: f32, alignment: Alignment) {
        let extra = height - self.height() as f32;
        if extra <= 0.0 {
            return;
        }
        match alignment {
            Alignment::Top => self.insets.bottom += extra,
            Alignment::Bottom => self.insets.top += extra,
            _ => {
                self.insets.top += extra / 2.0;
                self.insets.bottom += extra / 2.0;
            }
        }
    }

    pub fn draw(&self, g: &mut dyn Graphics2D, x: f32, y: f32) {
        let old = g.color();
        g.set_color(self.fg);
        let dx = x + self.insets.left;
        let dy = y + self.baseline();
        g.translate(dx, dy);
        g.scale(self.text_size, self.text_size);
        self.root.draw(g, 0.0, 0.0);
        g.scale(1.0 / self.text_size, 1.0 / self.text_size);
        g.translate(-dx, -dy);
        g.set_color(old);
    }
}

/// Configures layout: style, text size (required), optional wrapping
/// width and fonts.
pub struct RenderBuilder {
    style: TexStyle,
    text_size: Option<f32>,
    width: Option<f32>,
    alignment: Alignment,
    line_space: Option<f32>,
    fg: Color,
    fc: Option<FontContext>,
}

impl Default for RenderBuilder {
    fn default() -> Self {
        RenderBuilder {
            style: TexStyle::Display,
            text_size: None,
            width: None,
            alignment: Alignment::None,
            line_space: None,
            fg: BLACK,
            fc: None,
        }
    }
}

impl RenderBuilder {
    pub fn new() -> Self {
        RenderBuilder::default()
    }

    pub fn style(mut self, style: TexStyle) -> Self {
        self.style = style;
        self
    }

    /// The em size in pixels. Layout cannot run without it.
    pub fn text_size(mut self, size: f32) -> Self {
        self.text_size = Some(size);
        self
    }

    /// Wrapping width in pixels and the alignment of each line in it.
    pub fn width(mut self, width: f32, alignment: Alignment) -> Self {
        self.width = Some(width);
        self.alignment = alignment;
        self
    }

    /// Space between wrapped lines, in pixels.
    pub fn line_space(mut self, space: f32) -> Self {
        self.line_space = Some(space);
        self
    }

    pub fn foreground(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    pub fn font(mut self, fc: FontContext) -> Self {
        self.fc = Some(fc);
        self
    }

    pub fn build(self, formula: &Formula) -> Result<Render, TexError> {
        let Some(text_size) = self.text_size else {
            return Err(TexError::InvalidState("text size is required"));
        };
        let fc = self.fc.unwrap_or_else(FontContext::rule_font);
        let mut env = Env::new(self.style, fc, text_size);
        if let Some(w) = self.width {
            env.set_text_width(UnitType::Pixel, w);
        }
        if let Some(s) = self.line_space {
            env.set_line_space(UnitType::Pixel, s);
        }

        let mut row = formula.root.clone();
        row.look_at_last = true;
        let mut root = Atom::Row(row).create_box(&env);
        if self.width.is_some() {
            root = splitter::split(root, env.text_width(), env.line_space());
            root = HBox::with_width(root, env.text_width(), self.alignment).into_node();
        }

        Ok(Render {
            root,
            text_size,
            fg: self.fg,
            insets: Insets::uniform(0.18 * text_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use tex_layout::graphics::RecordingGraphics;

    fn render(src: &str, size: f32) -> Render {
        RenderBuilder::new()
            .text_size(size)
            .build(&parse(src).unwrap())
            .unwrap()
    }

    #[test]
    fn text_size_is_required() {
        let f = parse("x").unwrap();
        let err = RenderBuilder::new().build(&f).unwrap_err();
        assert!(matches!(err, TexError::InvalidState(_)));
    }

    #[test]
    fn metrics_are_positive_pixels() {
        let r = render("\\frac{a}{b}", 20.0);
        assert!(r.width() > 0);
        assert!(r.height() > 0);
        assert!(r.baseline() > 0.0);
        assert!(r.baseline() < r.height() as f32);
    }

    #[test]
    fn bigger_text_size_means_bigger_output() {
        let small = render("x+y", 10.0);
        let large = render("x+y", 30.0);
        assert!(large.width() > small.width());
        assert!(large.height() > small.height());
    }

    #[test]
    fn draw_emits_glyphs_and_restores_state() {
        let r = render("a+b", 20.0);
        let mut g = RecordingGraphics::new();
        r.draw(&mut g, 0.0, 0.0);
        assert!(!g.glyphs().is_empty());
    }

    #[test]
    fn fixed_width_pads_the_row() {
        let f = parse("x").unwrap();
        let mut r = RenderBuilder::new().text_size(20.0).build(&f).unwrap();
        let natural = r.width();
        r.set_width(natural as f32 + 100.0, Alignment::Center);
        assert!(r.width() >= natural + 99);
    }

    #[test]
    fn wrapping_width_splits_long_formulas() {
        let f = parse("a+b+c+d+e+f+g+h+i+j+k+l+m+n").unwrap();
        let narrow = RenderBuilder::new()
            .text_size(20.0)
            .width(120.0, Alignment::Left)
            .build(&f)
            .unwrap();
        let wide = RenderBuilder::new().text_size(20.0).build(&f).unwrap();
        assert!(narrow.height() > wide.height());
        // 120px of line plus the default insets on both sides
        let bound = (120.0 + 2.0 * narrow.insets().left).ceil() as i32;
        assert!(narrow.width() <= bound);
    }
}
