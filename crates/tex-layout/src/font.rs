//! The narrow font-metrics interface the layout engine consumes.
//!
//! Real glyph data (CLM/OTF files, platform font discovery) lives in host
//! backends; the engine only ever asks "what are the metrics of this
//! codepoint in this style" and "how do I stretch this delimiter". All
//! lengths are in em units of the design size; the [`Env`](crate::env::Env)
//! scales them to the current style and text size.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

bitflags! {
    /// Requested font flavor for a character. Combinations such as
    /// `BOLD | ITALIC` are allowed; the font decides what it can honor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FontStyle: u16 {
        const RM = 1;
        const BF = 1 << 1;
        const IT = 1 << 2;
        const SF = 1 << 3;
        const TT = 1 << 4;
        const CAL = 1 << 5;
        const FRAK = 1 << 6;
        const BB = 1 << 7;
        const SC = 1 << 8;
    }
}

impl FontStyle {
    /// Resolve a LaTeX style-command name to a font style, if known.
    pub fn from_command(name: &str) -> Option<FontStyle> {
        Some(match name {
            "mathrm" | "rm" | "text" | "textrm" => FontStyle::RM,
            "mathbf" | "bf" | "bold" | "textbf" => FontStyle::BF,
            "mathit" | "it" | "textit" => FontStyle::IT,
            "mathsf" | "sf" | "textsf" => FontStyle::SF,
            "mathtt" | "tt" | "texttt" => FontStyle::TT,
            "mathcal" | "cal" => FontStyle::CAL,
            "mathfrak" | "frak" => FontStyle::FRAK,
            "mathbb" | "Bbb" => FontStyle::BB,
            "mathbfit" | "boldsymbol" | "bm" => FontStyle::BF.union(FontStyle::IT),
            _ => return None,
        })
    }
}

/// Identifies a glyph within a font.
pub type GlyphId = u32;

/// Raw glyph metrics in design em units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Italic correction: how far a following superscript must move right
    /// past the slanted right edge.
    pub italic: f32,
}

/// A codepoint resolved against a font, before scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharFont {
    pub code: char,
    pub glyph: GlyphId,
    pub style: FontStyle,
}

/// A fully resolved character: glyph id plus metrics at a concrete scale.
/// Produced by [`Env::get_char`](crate::env::Env::get_char); the scale
/// already folds in the style's script percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Char {
    pub code: char,
    pub glyph: GlyphId,
    pub style: FontStyle,
    pub scale: f32,
    metrics: GlyphMetrics,
}

impl Char {
    pub fn new(code: char, glyph: GlyphId, style: FontStyle, scale: f32, m: GlyphMetrics) -> Self {
        Char {
            code,
            glyph,
            style,
            scale,
            metrics: m,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.metrics.width * self.scale
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.metrics.height * self.scale
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.metrics.depth * self.scale
    }

    #[inline]
    pub fn italic(&self) -> f32 {
        self.metrics.italic * self.scale
    }

    #[inline]
    pub fn char_font(&self) -> CharFont {
        CharFont {
            code: self.code,
            glyph: self.glyph,
            style: self.style,
        }
    }
}

/// OpenType MATH table constants, in design em units (percentages are
/// fractions of 1). Only the constants the layout algorithms consume.
#[derive(Debug, Clone, PartialEq)]
pub struct MathConsts {
    pub script_percent_scale_down: f32,
    pub script_script_percent_scale_down: f32,
    pub axis_height: f32,
    pub x_height: f32,
    pub quad: f32,

    pub fraction_rule_thickness: f32,
    pub fraction_numerator_shift_up: f32,
    pub fraction_numerator_display_style_shift_up: f32,
    pub fraction_denominator_shift_down: f32,
    pub fraction_denominator_display_style_shift_down: f32,
    pub fraction_numerator_gap_min: f32,
    pub fraction_numerator_display_style_gap_min: f32,
    pub fraction_denominator_gap_min: f32,
    pub fraction_denominator_display_style_gap_min: f32,

    pub stack_top_shift_up: f32,
    pub stack_top_display_style_shift_up: f32,
    pub stack_bottom_shift_down: f32,
    pub stack_bottom_display_style_shift_down: f32,
    pub stack_gap_min: f32,
    pub stack_display_style_gap_min: f32,

    pub superscript_shift_up: f32,
    pub superscript_shift_up_cramped: f32,
    pub superscript_baseline_drop_max: f32,
    pub superscript_bottom_min: f32,
    pub superscript_bottom_max_with_subscript: f32,
    pub subscript_shift_down: f32,
    pub subscript_baseline_drop_min: f32,
    pub subscript_top_max: f32,
    pub sub_superscript_gap_min: f32,
    pub space_after_script: f32,

    pub upper_limit_gap_min: f32,
    pub upper_limit_baseline_rise_min: f32,
    pub lower_limit_gap_min: f32,
    pub lower_limit_baseline_drop_min: f32,

    pub radical_rule_thickness: f32,
    pub radical_vertical_gap: f32,
    pub radical_display_style_vertical_gap: f32,
    pub radical_extra_ascender: f32,
    pub radical_kern_before_degree: f32,
    pub radical_kern_after_degree: f32,
    pub radical_degree_bottom_raise_percent: f32,

    pub overbar_rule_thickness: f32,
    pub overbar_vertical_gap: f32,
    pub overbar_extra_ascender: f32,
    pub underbar_rule_thickness: f32,
    pub underbar_vertical_gap: f32,
    pub underbar_extra_descender: f32,

    pub accent_base_height: f32,
    pub delimited_sub_formula_min_height: f32,
    pub min_connector_overlap: f32,
    pub default_rule_thickness: f32,
}

impl Default for MathConsts {
    /// Values close to Latin Modern Math, good enough for any consumer that
    /// does not supply a real MATH table.
    fn default() -> Self {
        MathConsts {
            script_percent_scale_down: 0.7,
            script_script_percent_scale_down: 0.5,
            axis_height: 0.25,
            x_height: 0.431,
            quad: 1.0,

            fraction_rule_thickness: 0.04,
            fraction_numerator_shift_up: 0.394,
            fraction_numerator_display_style_shift_up: 0.677,
            fraction_denominator_shift_down: 0.345,
            fraction_denominator_display_style_shift_down: 0.686,
            fraction_numerator_gap_min: 0.04,
            fraction_numerator_display_style_gap_min: 0.12,
            fraction_denominator_gap_min: 0.04,
            fraction_denominator_display_style_gap_min: 0.12,

            stack_top_shift_up: 0.444,
            stack_top_display_style_shift_up: 0.677,
            stack_bottom_shift_down: 0.345,
            stack_bottom_display_style_shift_down: 0.686,
            stack_gap_min: 0.12,
            stack_display_style_gap_min: 0.28,

            superscript_shift_up: 0.363,
            superscript_shift_up_cramped: 0.289,
            superscript_baseline_drop_max: 0.25,
            superscript_bottom_min: 0.108,
            superscript_bottom_max_with_subscript: 0.344,
            subscript_shift_down: 0.247,
            subscript_baseline_drop_min: 0.2,
            subscript_top_max: 0.344,
            sub_superscript_gap_min: 0.16,
            space_after_script: 0.056,

            upper_limit_gap_min: 0.111,
            upper_limit_baseline_rise_min: 0.2,
            lower_limit_gap_min: 0.167,
            lower_limit_baseline_drop_min: 0.6,

            radical_rule_thickness: 0.04,
            radical_vertical_gap: 0.05,
            radical_display_style_vertical_gap: 0.148,
            radical_extra_ascender: 0.04,
            radical_kern_before_degree: 0.278,
            radical_kern_after_degree: -0.556,
            radical_degree_bottom_raise_percent: 0.6,

            overbar_rule_thickness: 0.04,
            overbar_vertical_gap: 0.12,
            overbar_extra_ascender: 0.04,
            underbar_rule_thickness: 0.04,
            underbar_vertical_gap: 0.12,
            underbar_extra_descender: 0.04,

            accent_base_height: 0.45,
            delimited_sub_formula_min_height: 1.3,
            min_connector_overlap: 0.05,
            default_rule_thickness: 0.04,
        }
    }
}

/// One fixed-size variant of a stretchable glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphVariant {
    pub glyph: GlyphId,
    pub metrics: GlyphMetrics,
}

/// One part of a glyph assembly for arbitrarily large delimiters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyPart {
    pub glyph: GlyphId,
    pub metrics: GlyphMetrics,
    /// Maximum overlap with the neighboring part, in em.
    pub max_overlap: f32,
    /// Repeatable filler parts may appear any number of times.
    pub repeatable: bool,
}

/// Vertical glyph assembly: parts stacked bottom to top.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlyphAssembly {
    pub parts: Vec<AssemblyPart>,
}

/// The font-metrics collaborator. Implementations wrap a real math font
/// (CLM, OTF with a MATH table); [`RuleFont`] is a synthetic stand-in with
/// deterministic metrics.
pub trait MathFont: Send + Sync {
    fn consts(&self) -> &MathConsts;

    /// Metrics of a codepoint in the requested style, or `None` if the font
    /// has no glyph for it.
    fn glyph(&self, code: char, style: FontStyle) -> Option<(GlyphId, GlyphMetrics)>;

    /// Pair kerning between two resolved characters.
    fn kern(&self, _left: &CharFont, _right: &CharFont) -> f32 {
        0.0
    }

    /// Ligature replacing a pair of characters, if the font has one.
    fn ligature(&self, _left: &CharFont, _right: &CharFont) -> Option<char> {
        None
    }

    /// Pre-built larger variants of a stretchable glyph, smallest first.
    /// The base glyph is not included.
    fn vertical_variants(&self, _code: char) -> Vec<GlyphVariant> {
        Vec::new()
    }

    /// Glyph assembly for arbitrarily large delimiters, if the font
    /// provides one.
    fn vertical_assembly(&self, _code: char) -> Option<GlyphAssembly> {
        None
    }

    /// Em width of a quad at design size.
    fn quad(&self) -> f32 {
        self.consts().quad
    }
}

/// Shared handle to the fonts a layout pass reads. The resolved font is
/// read-only; independently constructed environments may share it across
/// threads.
#[derive(Clone)]
pub struct FontContext {
    math: Arc<dyn MathFont>,
}

impl FontContext {
    pub fn new(math: Arc<dyn MathFont>) -> Self {
        FontContext { math }
    }

    /// A context backed by the built-in synthetic metrics.
    pub fn rule_font() -> Self {
        FontContext {
            math: Arc::new(RuleFont::default()),
        }
    }

    #[inline]
    pub fn math(&self) -> &dyn MathFont {
        &*self.math
    }
}

impl fmt::Debug for FontContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontContext").finish()
    }
}

/// A synthetic math font with deterministic, class-based metrics.
///
/// Widths and heights follow rough Computer Modern proportions so layouts
/// look plausible, but no real outlines exist: the glyph id is the
/// codepoint. Used by the test suites and by callers that only need
/// metrics (measuring, line breaking) without drawing.
#[derive(Debug, Clone)]
pub struct RuleFont {
    consts: MathConsts,
}

impl Default for RuleFont {
    fn default() -> Self {
        RuleFont {
            consts: MathConsts::default(),
        }
    }
}

const ASCENDERS: &str = "bdfhklt";
const DESCENDERS: &str = "gjpqy";

impl RuleFont {
    fn base_metrics(code: char) -> GlyphMetrics {
        let (width, height, depth) = match code {
            '0'..='9' => (0.5, 0.644, 0.0),
            'i' | 'l' | 'j' => (0.28, 0.66, if code == 'j' { 0.19 } else { 0.0 }),
            'm' | 'w' => (0.78, 0.431, 0.0),
            'a'..='z' => {
                let h = if ASCENDERS.contains(code) { 0.694 } else { 0.431 };
                let d = if DESCENDERS.contains(code) { 0.194 } else { 0.0 };
                (0.48, h, d)
            }
            'A'..='Z' => (0.72, 0.683, 0.0),
            'α'..='ω' => (0.52, 0.441, if "βγζημξρφχψ".contains(code) { 0.19 } else { 0.0 }),
            'Α'..='Ω' => (0.72, 0.683, 0.0),
            '+' | '−' | '-' | '=' | '±' | '∓' | '×' | '÷' | '∗' => (0.778, 0.583, 0.083),
            '<' | '>' | '≤' | '≥' | '≠' | '≡' | '∼' | '≈' | '∈' | '⊂' | '⊆' | '→' | '←' | '↔' => {
                (0.778, 0.583, 0.083)
            }
            '(' | ')' | '[' | ']' => (0.39, 0.75, 0.25),
            '{' | '}' => (0.5, 0.75, 0.25),
            '|' | '‖' | '∣' => (0.28, 0.75, 0.25),
            '/' | '\\' => (0.5, 0.75, 0.25),
            ',' | '.' | ';' | ':' => (0.28, 0.43, if code == ',' || code == ';' { 0.12 } else { 0.0 }),
            '!' | '?' => (0.33, 0.694, 0.0),
            '∑' | '∏' | '∐' | '⋂' | '⋃' | '⨁' | '⨂' | '⨀' | '⋀' | '⋁' | '⨄' => (1.05, 0.75, 0.25),
            '∫' | '∮' | '∬' | '∭' => (0.56, 0.805, 0.306),
            '√' => (0.833, 0.85, 0.15),
            '′' | '‵' => (0.28, 0.56, 0.0),
            '∞' | '∂' | '∇' => (0.72, 0.583, 0.0),
            '°' | '∘' | '•' | '·' => (0.28, 0.583, 0.0),
            ' ' => (0.5, 0.0, 0.0),
            _ => (0.6, 0.65, 0.05),
        };
        GlyphMetrics {
            width,
            height,
            depth,
            italic: 0.0,
        }
    }

    fn stretch_factors(code: char) -> &'static [f32] {
        match code {
            '(' | ')' | '[' | ']' | '{' | '}' | '|' | '‖' | '⟨' | '⟩' | '/' | '\\' | '⌈' | '⌉'
            | '⌊' | '⌋' | '√' => &[1.2, 1.8, 2.4, 3.0],
            '⏞' | '⏟' | '⏜' | '⏝' => &[1.5, 2.0, 2.5],
            _ => &[],
        }
    }
}

impl MathFont for RuleFont {
    fn consts(&self) -> &MathConsts {
        &self.consts
    }

    fn glyph(&self, code: char, style: FontStyle) -> Option<(GlyphId, GlyphMetrics)> {
        let mut m = Self::base_metrics(code);
        if style.contains(FontStyle::BF) {
            m.width *= 1.06;
        }
        if style.contains(FontStyle::IT) && code.is_ascii_alphabetic() {
            m.italic = 0.03;
        }
        if style.contains(FontStyle::TT) {
            m.width = 0.525;
        }
        Some((code as GlyphId, m))
    }

    fn kern(&self, left: &CharFont, right: &CharFont) -> f32 {
        // A small negative kern for the classic awkward pairs.
        match (left.code, right.code) {
            ('A', 'V') | ('V', 'A') | ('A', 'W') | ('W', 'A') | ('T', 'o') | ('F', 'o') => -0.06,
            _ => 0.0,
        }
    }

    fn vertical_variants(&self, code: char) -> Vec<GlyphVariant> {
        let base = Self::base_metrics(code);
        Self::stretch_factors(code)
            .iter()
            .map(|f| GlyphVariant {
                glyph: code as GlyphId,
                metrics: GlyphMetrics {
                    width: base.width,
                    height: base.height * f,
                    depth: base.depth * f,
                    italic: 0.0,
                },
            })
            .collect()
    }

    fn vertical_assembly(&self, code: char) -> Option<GlyphAssembly> {
        if Self::stretch_factors(code).is_empty() {
            return None;
        }
        let base = Self::base_metrics(code);
        let seg = GlyphMetrics {
            width: base.width,
            height: 0.5,
            depth: 0.0,
            italic: 0.0,
        };
        let part = |repeatable| AssemblyPart {
            glyph: code as GlyphId,
            metrics: seg,
            max_overlap: 0.1,
            repeatable,
        };
        Some(GlyphAssembly {
            parts: vec![part(false), part(true), part(false)],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_font_resolves_ascii() {
        let f = RuleFont::default();
        let (_, m) = f.glyph('x', FontStyle::IT).unwrap();
        assert!(m.width > 0.0 && m.height > 0.0);
        assert!(m.italic > 0.0);
    }

    #[test]
    fn digits_have_no_depth() {
        let f = RuleFont::default();
        let (_, m) = f.glyph('7', FontStyle::RM).unwrap();
        assert_eq!(m.depth, 0.0);
    }

    #[test]
    fn delimiters_stretch() {
        let f = RuleFont::default();
        let variants = f.vertical_variants('(');
        assert!(!variants.is_empty());
        assert!(variants.windows(2).all(|w| {
            w[0].metrics.height + w[0].metrics.depth <= w[1].metrics.height + w[1].metrics.depth
        }));
        assert!(f.vertical_assembly('(').is_some());
        assert!(f.vertical_assembly('x').is_none());
    }
}
