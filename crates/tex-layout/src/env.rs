//! The per-recursion layout context threaded through every `create_box`
//! call.
//!
//! An [`Env`] is a cheap value: deriving a sub-environment (cramped style,
//! script style, numerator style, ...) clones it with the style swapped, so
//! sibling subtrees can never observe each other's changes.

use crate::font::{Char, FontContext, FontStyle, MathConsts};
use crate::style::TexStyle;
use crate::types::UnitType;

/// Points per TeX point at the target output. The engine keeps all box
/// metrics in text-size em units; this only matters for `px` lengths.
const PIXELS_PER_POINT: f32 = 1.0;

/// TeX length-unit ratios to a point.
const PT_PER_IN: f32 = 72.27;
const PT_PER_CM: f32 = 28.45;
const PT_PER_MM: f32 = 2.845;

#[derive(Debug, Clone)]
pub struct Env {
    style: TexStyle,
    fc: FontContext,
    /// The text size in points; 1 em at scale 1 equals this many points.
    text_size: f32,
    text_width: f32,
    line_space: f32,
    scale_factor: f32,
    font_style: FontStyle,
    small_caps: bool,
    /// Last font style used by a char box, consulted when a space or rule
    /// must pick a font. Updated only through a local clone in row layout.
    last_font: Option<FontStyle>,
}

impl Env {
    pub fn new(style: TexStyle, fc: FontContext, text_size: f32) -> Self {
        Env {
            style,
            fc,
            text_size,
            text_width: f32::INFINITY,
            line_space: 1.0,
            scale_factor: 1.0,
            font_style: FontStyle::empty(),
            small_caps: false,
            last_font: None,
        }
    }

    // region getters and setters

    #[inline]
    pub fn style(&self) -> TexStyle {
        self.style
    }

    #[inline]
    pub fn text_size(&self) -> f32 {
        self.text_size
    }

    #[inline]
    pub fn text_width(&self) -> f32 {
        self.text_width
    }

    #[inline]
    pub fn line_space(&self) -> f32 {
        self.line_space
    }

    #[inline]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    #[inline]
    pub fn font_style(&self) -> FontStyle {
        self.font_style
    }

    #[inline]
    pub fn is_small_caps(&self) -> bool {
        self.small_caps
    }

    #[inline]
    pub fn last_font(&self) -> Option<FontStyle> {
        self.last_font
    }

    #[inline]
    pub fn fc(&self) -> &FontContext {
        &self.fc
    }

    pub fn set_text_width(&mut self, unit: UnitType, width: f32) -> &mut Self {
        self.text_width = self.length_to_em(unit, width);
        self
    }

    pub fn set_line_space(&mut self, unit: UnitType, space: f32) -> &mut Self {
        self.line_space = self.length_to_em(unit, space);
        self
    }

    pub fn set_scale_factor(&mut self, factor: f32) -> &mut Self {
        self.scale_factor = factor;
        self
    }

    pub fn set_small_caps(&mut self, small_caps: bool) -> &mut Self {
        self.small_caps = small_caps;
        self
    }

    pub fn set_last_font(&mut self, font: Option<FontStyle>) -> &mut Self {
        self.last_font = font;
        self
    }

    // endregion

    /// The scale the current style applies to design-size metrics,
    /// including any explicit `\scalebox`-style factor.
    pub fn scale(&self) -> f32 {
        let c = self.consts();
        self.style
            .scale(c.script_percent_scale_down, c.script_script_percent_scale_down)
            * self.scale_factor
    }

    #[inline]
    pub fn consts(&self) -> &MathConsts {
        self.fc.math().consts()
    }

    /// Em width of a quad at the current scale.
    pub fn quad(&self) -> f32 {
        self.fc.math().quad() * self.scale()
    }

    pub fn x_height(&self) -> f32 {
        self.consts().x_height * self.scale()
    }

    pub fn axis_height(&self) -> f32 {
        self.consts().axis_height * self.scale()
    }

    /// Rule thickness, equal to the fraction rule thickness.
    pub fn rule_thickness(&self) -> f32 {
        self.consts().default_rule_thickness * self.scale()
    }

    // region style derivations

    fn with_style(&self, style: TexStyle) -> Env {
        let mut e = self.clone();
        e.style = style;
        e
    }

    pub fn cramp_style(&self) -> Env {
        self.with_style(self.style.cramp())
    }

    pub fn sup_style(&self) -> Env {
        self.with_style(self.style.sup())
    }

    pub fn sub_style(&self) -> Env {
        self.with_style(self.style.sub())
    }

    pub fn num_style(&self) -> Env {
        self.with_style(self.style.num())
    }

    pub fn dnom_style(&self) -> Env {
        self.with_style(self.style.dnom())
    }

    pub fn root_style(&self) -> Env {
        self.with_style(self.style.root())
    }

    /// An environment in an explicitly requested style (`\displaystyle`
    /// and friends).
    pub fn forced_style(&self, style: TexStyle) -> Env {
        self.with_style(style)
    }

    /// Add font-style flags for the subtree of a font-switch atom.
    pub fn with_added_font_style(&self, add: FontStyle) -> Env {
        let mut e = self.clone();
        e.font_style |= add;
        e
    }

    /// Replace the font style wholesale (`\mathrm{...}` resets italics).
    pub fn with_font_style(&self, style: FontStyle) -> Env {
        let mut e = self.clone();
        e.font_style = style;
        e
    }

    // endregion

    /// Resolve a character at the current style and scale. Math mode
    /// defaults alphabetic characters to math italic.
    pub fn get_char(&self, code: char, math_mode: bool) -> Option<Char> {
        let mut style = self.font_style;
        if style.is_empty() {
            style = if math_mode && code.is_alphabetic() {
                FontStyle::IT
            } else {
                FontStyle::RM
            };
        }
        let code = if self.small_caps && code.is_ascii_lowercase() {
            code.to_ascii_uppercase()
        } else {
            code
        };
        let (glyph, m) = self.fc.math().glyph(code, style)?;
        Some(Char::new(code, glyph, style, self.scale(), m))
    }

    /// Convert a length in the given unit to text-size em units at the
    /// current style.
    pub fn length_to_em(&self, unit: UnitType, value: f32) -> f32 {
        match unit {
            UnitType::Em => value * self.scale(),
            UnitType::Ex => value * self.x_height(),
            UnitType::Mu => value / 18.0 * self.quad(),
            UnitType::Point => value / self.text_size,
            UnitType::Pixel => value / (self.text_size * PIXELS_PER_POINT),
            UnitType::Cm => value * PT_PER_CM / self.text_size,
            UnitType::Mm => value * PT_PER_MM / self.text_size,
            UnitType::In => value * PT_PER_IN / self.text_size,
            UnitType::None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Env {
        Env::new(TexStyle::Display, FontContext::rule_font(), 10.0)
    }

    #[test]
    fn derived_envs_do_not_touch_parent() {
        let e = env();
        let sub = e.sub_style();
        assert_eq!(e.style(), TexStyle::Display);
        assert_eq!(sub.style(), TexStyle::ScriptCramped);
    }

    #[test]
    fn script_style_scales_chars_down() {
        let e = env();
        let full = e.get_char('x', true).unwrap().width();
        let small = e.sup_style().get_char('x', true).unwrap().width();
        assert!(small < full);
        let ratio = small / full;
        assert!((ratio - e.consts().script_percent_scale_down).abs() < 1e-6);
    }

    #[test]
    fn mu_is_an_eighteenth_of_quad() {
        let e = env();
        assert!((e.length_to_em(UnitType::Mu, 18.0) - e.quad()).abs() < 1e-6);
    }

    #[test]
    fn points_relative_to_text_size() {
        let e = env();
        assert!((e.length_to_em(UnitType::Point, 10.0) - 1.0).abs() < 1e-6);
    }
}
