//! Inter-atom spacing, the TeXBook page 181 glue rules.
//!
//! A glue amount is the triple `(space, stretch, shrink)` in mu, where one
//! mu is a quad over 18. The rule table is keyed by the atom classes on
//! both sides of the boundary and by the size bucket of the current style;
//! digits marked as parenthesized in the TeXBook vanish in script and
//! scriptscript sizes.

use crate::boxes::BoxNode;
use crate::env::Env;
use crate::types::{AtomType, SpaceType};

const TYPE_COUNT: usize = 8;
const STYLE_COUNT: usize = 4;

/// The four glue amounts: none, thin, medium, thick.
const GLUE_TYPES: [(f32, f32, f32); 4] = [
    (0.0, 0.0, 0.0),
    (3.0, 0.0, 0.0),
    (4.0, 4.0, 2.0),
    (5.0, 0.0, 5.0),
];

/// Rows are the left class, columns the right class, in the order
/// ord, op, bin, rel, open, close, punct, inner. Each entry holds the
/// glue-type digit for the four size buckets display, text, script,
/// scriptscript.
#[rustfmt::skip]
const TABLE: [[[u8; STYLE_COUNT]; TYPE_COUNT]; TYPE_COUNT] = [
    [*b"0000", *b"1111", *b"2200", *b"3300", *b"0000", *b"0000", *b"0000", *b"1100"],
    [*b"1111", *b"1111", *b"0000", *b"3300", *b"0000", *b"0000", *b"0000", *b"1100"],
    [*b"2200", *b"2200", *b"0000", *b"0000", *b"2200", *b"0000", *b"0000", *b"2200"],
    [*b"3300", *b"3300", *b"0000", *b"0000", *b"3300", *b"0000", *b"0000", *b"3300"],
    [*b"0000", *b"0000", *b"0000", *b"0000", *b"0000", *b"0000", *b"0000", *b"0000"],
    [*b"0000", *b"1111", *b"2200", *b"3300", *b"0000", *b"0000", *b"0000", *b"1100"],
    [*b"1100", *b"1100", *b"0000", *b"1100", *b"1100", *b"1100", *b"1100", *b"1100"],
    [*b"1100", *b"1111", *b"2200", *b"3300", *b"1100", *b"0000", *b"1100", *b"1100"],
];

/// Em width of one mu at the current style.
fn mu_factor(env: &Env) -> f32 {
    env.quad() / 18.0
}

fn index_of(ltype: AtomType, rtype: AtomType, env: &Env) -> usize {
    let l = ltype.folded() as usize;
    let r = rtype.folded() as usize;
    let bucket = env.style().size_level();
    (TABLE[l][r][bucket] - b'0') as usize
}

fn glue_node(mu: (f32, f32, f32), env: &Env) -> BoxNode {
    let f = mu_factor(env);
    BoxNode::glue(mu.0 * f, mu.1 * f, mu.2 * f)
}

/// The glue box to insert between two atoms of the given classes.
pub fn between(ltype: AtomType, rtype: AtomType, env: &Env) -> BoxNode {
    glue_node(GLUE_TYPES[index_of(ltype, rtype, env)], env)
}

/// The natural space between two atoms of the given classes, in em.
pub fn space_between(ltype: AtomType, rtype: AtomType, env: &Env) -> f32 {
    GLUE_TYPES[index_of(ltype, rtype, env)].0 * mu_factor(env)
}

/// The glue box for an explicit skip command.
pub fn skip(space: SpaceType, env: &Env) -> BoxNode {
    let (sp, st, sh) = space.glue_mu();
    let f = mu_factor(env);
    BoxNode::glue(sp * f, st * f, sh * f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::FontContext;
    use crate::style::TexStyle;

    fn env(style: TexStyle) -> Env {
        Env::new(style, FontContext::rule_font(), 10.0)
    }

    #[test]
    fn ord_ord_is_tight() {
        let e = env(TexStyle::Text);
        assert_eq!(between(AtomType::Ordinary, AtomType::Ordinary, &e).width, 0.0);
    }

    #[test]
    fn rel_gets_thick_space_in_text() {
        let e = env(TexStyle::Text);
        let g = between(AtomType::Ordinary, AtomType::Relation, &e);
        assert!((g.width - 5.0 / 18.0 * e.quad()).abs() < 1e-6);
    }

    #[test]
    fn bin_space_vanishes_in_scripts() {
        let text = env(TexStyle::Text);
        let script = env(TexStyle::Script);
        assert!(between(AtomType::Ordinary, AtomType::BinaryOperator, &text).width > 0.0);
        assert_eq!(
            between(AtomType::Ordinary, AtomType::BinaryOperator, &script).width,
            0.0
        );
    }

    #[test]
    fn op_thin_space_survives_scripts() {
        let script = env(TexStyle::ScriptScript);
        let g = between(AtomType::Ordinary, AtomType::BigOperator, &script);
        assert!((g.width - 3.0 / 18.0 * script.quad()).abs() < 1e-6);
    }

    #[test]
    fn accent_folds_to_ord() {
        let e = env(TexStyle::Text);
        let a = space_between(AtomType::Accent, AtomType::Relation, &e);
        let o = space_between(AtomType::Ordinary, AtomType::Relation, &e);
        assert_eq!(a, o);
    }

    #[test]
    fn negative_skip_goes_left() {
        let e = env(TexStyle::Text);
        let g = skip(SpaceType::NegThin, &e);
        assert!(g.width < 0.0);
        assert_eq!(g.width, -skip(SpaceType::Thin, &e).width);
    }

    #[test]
    fn glue_is_symmetric_where_the_book_says_so() {
        // ord-op and op-ord both carry a thin space in all styles
        let e = env(TexStyle::Display);
        assert_eq!(
            space_between(AtomType::Ordinary, AtomType::BigOperator, &e),
            space_between(AtomType::BigOperator, AtomType::Ordinary, &e)
        );
    }
}
