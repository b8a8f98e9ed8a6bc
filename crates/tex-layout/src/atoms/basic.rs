//! Leaf atoms: characters, symbols, spaces, rules.

use crate::boxes::BoxNode;
use crate::env::Env;
use crate::font::{Char, FontStyle};
use crate::atom::Atom;
use crate::types::{AtomType, LimitsType, SpaceType, UnitType};

/// A character taken literally from the input string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharAtom {
    pub code: char,
    pub typ: AtomType,
    /// Math-mode characters pick the math italic default; text-mode ones
    /// stay upright and get italic correction in rows.
    pub math_mode: bool,
}

impl CharAtom {
    pub fn new(code: char, math_mode: bool) -> Self {
        CharAtom {
            code,
            typ: AtomType::Ordinary,
            math_mode,
        }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        match env.get_char(self.code, self.math_mode) {
            Some(ch) => BoxNode::char_box(ch),
            None => BoxNode::empty(),
        }
    }
}

/// A named symbol (`\alpha`, `\sum`, `\rightarrow`) with its TeX class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolAtom {
    pub code: char,
    pub typ: AtomType,
    pub limits: LimitsType,
}

impl SymbolAtom {
    pub fn new(code: char, typ: AtomType) -> Self {
        let limits = match typ {
            // integrals place their scripts at the corners
            AtomType::BigOperator if matches!(code, '∫' | '∮' | '∬' | '∭' | '∯' | '∰') => {
                LimitsType::NoLimits
            }
            AtomType::BigOperator => LimitsType::Normal,
            _ => LimitsType::NoLimits,
        };
        SymbolAtom { code, typ, limits }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        match env.get_char(self.code, true) {
            Some(ch) => BoxNode::char_box(ch),
            None => BoxNode::empty(),
        }
    }
}

/// The result of a ligature: a glyph whose style is already decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCharAtom {
    pub code: char,
    pub style: FontStyle,
}

impl FixedCharAtom {
    pub fn resolve(&self, env: &Env) -> Option<Char> {
        let (glyph, m) = env.fc().math().glyph(self.code, self.style)?;
        Some(Char::new(self.code, glyph, self.style, env.scale(), m))
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        match self.resolve(env) {
            Some(ch) => BoxNode::char_box(ch),
            None => BoxNode::empty(),
        }
    }
}

/// Explicit white space, either a named skip or a custom extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpaceAtom {
    Skip(SpaceType),
    Custom {
        unit: UnitType,
        width: f32,
        height: f32,
        depth: f32,
    },
}

impl SpaceAtom {
    pub fn em(width: f32) -> Self {
        SpaceAtom::Custom {
            unit: UnitType::Em,
            width,
            height: 0.0,
            depth: 0.0,
        }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        match *self {
            SpaceAtom::Skip(t) => crate::glue::skip(t, env),
            SpaceAtom::Custom {
                unit,
                width,
                height,
                depth,
            } => BoxNode::strut(
                env.length_to_em(unit, width),
                env.length_to_em(unit, height),
                env.length_to_em(unit, depth),
            ),
        }
    }
}

/// Forces the spacing classes of its content (`\mathbin`, `\mathrel`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TypedAtom {
    pub left: AtomType,
    pub right: AtomType,
    pub base: Box<Atom>,
}

impl TypedAtom {
    pub fn new(typ: AtomType, base: Atom) -> Self {
        TypedAtom {
            left: typ,
            right: typ,
            base: Box::new(base),
        }
    }
}

/// A run of text-mode characters rendered in one font, used by `\text`
/// and by external-alphabet runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAtom {
    pub content: String,
    pub style: FontStyle,
}

impl TextAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        let env = if self.style.is_empty() {
            env.clone()
        } else {
            env.with_font_style(self.style)
        };
        let mut h = crate::boxes::HBox::new();
        for c in self.content.chars() {
            match env.get_char(c, false) {
                Some(ch) => h.add(BoxNode::char_box(ch)),
                None => h.add(BoxNode::strut(env.quad() / 3.0, 0.0, 0.0)),
            }
        }
        h.into_node()
    }
}

/// A solid rectangle with explicit extents, optionally raised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleAtom {
    pub unit: UnitType,
    pub width: f32,
    pub height: f32,
    pub raise: f32,
}

impl RuleAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        let w = env.length_to_em(self.unit, self.width);
        let h = env.length_to_em(self.unit, self.height);
        let r = env.length_to_em(self.unit, self.raise);
        BoxNode::rule(h, w, -r)
    }
}

/// Shown for a command the parser did not recognize in partial mode:
/// the raw command text in typewriter style.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderAtom {
    pub text: String,
}

impl PlaceholderAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        TextAtom {
            content: self.text.clone(),
            style: FontStyle::TT,
        }
        .create_box(env)
    }
}
