//! The atom hierarchy: the parsed, layout-ready representation of a
//! formula.
//!
//! Every construct the parser can produce is a variant of the closed
//! [`Atom`] enum; `create_box` turns an atom tree into a box tree under an
//! [`Env`]. The variant structs live in [`atoms`](crate::atoms).

use crate::atoms::accent::{AccentAtom, OverUnderlineAtom};
use crate::atoms::basic::{
    CharAtom, FixedCharAtom, PlaceholderAtom, RuleAtom, SpaceAtom, SymbolAtom, TextAtom, TypedAtom,
};
use crate::atoms::delim::{DelimitedAtom, MiddleAtom, OverUnderDelimiterAtom};
use crate::atoms::frac::{FractionAtom, StackAtom};
use crate::atoms::matrix::{HlineAtom, InterTextAtom, MatrixAtom, MultiColumnAtom};
use crate::atoms::radical::RadicalAtom;
use crate::atoms::row::RowAtom;
use crate::atoms::scripts::{BigOpAtom, CumulativeScriptsAtom, ScriptsAtom};
use crate::atoms::wrappers::{
    ColorAtom, FontAtom, FrameAtom, PhantomAtom, RaiseAtom, ReflectAtom, ResizeAtom, RotateAtom,
    ScaleAtom, SmashAtom, StyleAtom,
};
use crate::boxes::BoxNode;
use crate::env::Env;
use crate::font::Char;
use crate::types::{AtomType, LimitsType};

#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// A character taken literally from the input.
    Char(CharAtom),
    /// A named symbol with a fixed class.
    Symbol(SymbolAtom),
    /// A glyph pinned to one style, the result of a ligature.
    FixedChar(FixedCharAtom),
    Space(SpaceAtom),
    /// Marks a legal line-break point.
    Break,
    Row(RowAtom),
    /// Overrides the spacing class of its content.
    Typed(TypedAtom),
    Fraction(FractionAtom),
    Scripts(ScriptsAtom),
    CumulativeScripts(CumulativeScriptsAtom),
    BigOperator(BigOpAtom),
    /// Content stacked over/under a base (`\overset`, limits).
    Stack(StackAtom),
    /// A brace stretched over or under its content.
    OverUnderDelimiter(OverUnderDelimiterAtom),
    Radical(RadicalAtom),
    /// `\left ... \right` with optional `\middle` dividers.
    Delimited(DelimitedAtom),
    Middle(MiddleAtom),
    Accent(AccentAtom),
    Matrix(MatrixAtom),
    MultiColumn(MultiColumnAtom),
    Hline(HlineAtom),
    InterText(InterTextAtom),
    Color(ColorAtom),
    Phantom(PhantomAtom),
    Smash(SmashAtom),
    OverUnderline(OverUnderlineAtom),
    /// Forces a TeX style on its content (`\displaystyle`, ...).
    Style(StyleAtom),
    Font(FontAtom),
    /// A run of text-mode characters in one font.
    Text(TextAtom),
    Rule(RuleAtom),
    Scale(ScaleAtom),
    Rotate(RotateAtom),
    Resize(ResizeAtom),
    Reflect(ReflectAtom),
    Frame(FrameAtom),
    Raise(RaiseAtom),
    Empty,
    /// Stands in for an unknown command in partial mode.
    Placeholder(PlaceholderAtom),
}

impl Atom {
    /// The spacing class seen from the left.
    pub fn left_type(&self) -> AtomType {
        match self {
            Atom::Char(a) => a.typ,
            Atom::Symbol(a) => a.typ,
            Atom::Row(r) => r.left_type(),
            Atom::Typed(t) => t.left,
            Atom::Fraction(_) => AtomType::Inner,
            Atom::Scripts(s) => s.base_left_type(),
            Atom::CumulativeScripts(s) => s.base.left_type(),
            Atom::BigOperator(_) => AtomType::BigOperator,
            Atom::Stack(s) => s.base_type(),
            Atom::OverUnderDelimiter(_) => AtomType::Inner,
            Atom::Delimited(_) => AtomType::Inner,
            Atom::Middle(_) => AtomType::Inner,
            Atom::Matrix(_) => AtomType::Inner,
            Atom::MultiColumn(_) => AtomType::MultiColumn,
            Atom::Hline(_) => AtomType::Hline,
            Atom::InterText(_) => AtomType::InterText,
            Atom::Color(a) => a.base.left_type(),
            Atom::Style(a) => a.base.left_type(),
            Atom::Font(a) => a.base.left_type(),
            Atom::Raise(a) => a.base.left_type(),
            Atom::Space(_) | Atom::Break => AtomType::None,
            _ => AtomType::Ordinary,
        }
    }

    /// The spacing class seen from the right.
    pub fn right_type(&self) -> AtomType {
        match self {
            Atom::Row(r) => r.right_type(),
            Atom::Typed(t) => t.right,
            Atom::Scripts(s) => s.base_right_type(),
            Atom::CumulativeScripts(s) => s.base.right_type(),
            Atom::Color(a) => a.base.right_type(),
            Atom::Style(a) => a.base.right_type(),
            Atom::Font(a) => a.base.right_type(),
            Atom::Raise(a) => a.base.right_type(),
            _ => self.left_type(),
        }
    }

    pub fn limits_type(&self) -> LimitsType {
        match self {
            Atom::Symbol(a) => a.limits,
            Atom::BigOperator(a) => a.limits,
            Atom::Typed(t) => t.base.limits_type(),
            Atom::OverUnderDelimiter(_) => LimitsType::Limits,
            _ => LimitsType::NoLimits,
        }
    }

    /// The resolved character when this atom is a bare char symbol.
    pub fn char_symbol(&self, env: &Env) -> Option<Char> {
        match self {
            Atom::Char(a) => env.get_char(a.code, a.math_mode),
            Atom::Symbol(a) => env.get_char(a.code, true),
            Atom::FixedChar(a) => a.resolve(env),
            _ => None,
        }
    }

    pub fn is_char_symbol(&self) -> bool {
        matches!(self, Atom::Char(_) | Atom::Symbol(_) | Atom::FixedChar(_))
    }

    /// True for atoms that only occupy space.
    pub fn is_kern(&self) -> bool {
        matches!(self, Atom::Space(_) | Atom::Break)
    }

    pub fn as_row_mut(&mut self) -> Option<&mut RowAtom> {
        match self {
            Atom::Row(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_cumulative_scripts_mut(&mut self) -> Option<&mut CumulativeScriptsAtom> {
        match self {
            Atom::CumulativeScripts(s) => Some(s),
            _ => None,
        }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let b = match self {
            Atom::Char(a) => a.create_box(env),
            Atom::Symbol(a) => a.create_box(env),
            Atom::FixedChar(a) => a.create_box(env),
            Atom::Space(a) => a.create_box(env),
            Atom::Break => BoxNode::empty(),
            Atom::Row(a) => a.create_box(env),
            Atom::Typed(a) => a.base.create_box(env),
            Atom::Fraction(a) => a.create_box(env),
            Atom::Scripts(a) => a.create_box(env),
            Atom::CumulativeScripts(a) => a.create_box(env),
            Atom::BigOperator(a) => a.create_box(env),
            Atom::Stack(a) => a.create_box(env),
            Atom::OverUnderDelimiter(a) => a.create_box(env),
            Atom::Radical(a) => a.create_box(env),
            Atom::Delimited(a) => a.create_box(env),
            Atom::Middle(a) => a.create_box(env),
            Atom::Accent(a) => a.create_box(env),
            Atom::Matrix(a) => a.create_box(env),
            Atom::MultiColumn(a) => a.content.create_box(env),
            Atom::Hline(a) => a.create_box(env),
            Atom::InterText(a) => a.content.create_box(env),
            Atom::Color(a) => a.create_box(env),
            Atom::Phantom(a) => a.create_box(env),
            Atom::Smash(a) => a.create_box(env),
            Atom::OverUnderline(a) => a.create_box(env),
            Atom::Style(a) => a.create_box(env),
            Atom::Font(a) => a.create_box(env),
            Atom::Text(a) => a.create_box(env),
            Atom::Rule(a) => a.create_box(env),
            Atom::Scale(a) => a.create_box(env),
            Atom::Rotate(a) => a.create_box(env),
            Atom::Resize(a) => a.create_box(env),
            Atom::Reflect(a) => a.create_box(env),
            Atom::Frame(a) => a.create_box(env),
            Atom::Raise(a) => a.create_box(env),
            Atom::Empty => BoxNode::empty(),
            Atom::Placeholder(a) => a.create_box(env),
        };
        b.with_class(self.left_type())
    }
}
