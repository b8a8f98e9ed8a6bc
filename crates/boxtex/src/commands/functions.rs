//! Named function commands (`\sin`, `\lim`, ...): upright text with
//! operator spacing. The limit-taking ones stack their scripts in
//! display style.

use tex_layout::atoms::basic::{TextAtom, TypedAtom};
use tex_layout::atoms::scripts::BigOpAtom;
use tex_layout::{Atom, AtomType, FontStyle, LimitsType};

use crate::error::ParseError;
use crate::parser::Parser;

fn function_atom(name: &str, limits: bool) -> Atom {
    let text = Atom::Typed(TypedAtom::new(
        AtomType::BigOperator,
        Atom::Text(TextAtom {
            content: name.to_string(),
            style: FontStyle::RM,
        }),
    ));
    if limits {
        Atom::BigOperator(BigOpAtom {
            base: Box::new(text),
            under: None,
            over: None,
            limits: LimitsType::Normal,
        })
    } else {
        text
    }
}

macro_rules! function_cmds {
    ($($fn_name:ident => ($name:literal, $limits:literal)),* $(,)?) => {
        $(pub fn $fn_name(_p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
            Ok(Some(function_atom($name, $limits)))
        })*
    };
}

function_cmds! {
    sin => ("sin", false),
    cos => ("cos", false),
    tan => ("tan", false),
    cot => ("cot", false),
    sec => ("sec", false),
    csc => ("csc", false),
    sinh => ("sinh", false),
    cosh => ("cosh", false),
    tanh => ("tanh", false),
    coth => ("coth", false),
    arcsin => ("arcsin", false),
    arccos => ("arccos", false),
    arctan => ("arctan", false),
    log => ("log", false),
    ln => ("ln", false),
    lg => ("lg", false),
    exp => ("exp", false),
    arg => ("arg", false),
    deg => ("deg", false),
    dim => ("dim", false),
    ker => ("ker", false),
    hom => ("hom", false),
    lim => ("lim", true),
    limsup => ("lim sup", true),
    liminf => ("lim inf", true),
    max => ("max", true),
    min => ("min", true),
    sup => ("sup", true),
    inf => ("inf", true),
    det => ("det", true),
    gcd => ("gcd", true),
    pr => ("Pr", true),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::Formula;
    use crate::parser::parse_with;
    use crate::registry::MacroRegistry;

    fn parse(s: &str) -> Formula {
        parse_with(s, MacroRegistry::new(), false).unwrap()
    }

    #[test]
    fn sin_is_an_upright_operator() {
        let f = parse("\\sin x");
        assert_eq!(f.root.elements[0].left_type(), AtomType::BigOperator);
        let Atom::Typed(t) = &f.root.elements[0] else {
            panic!("expected typed atom");
        };
        let Atom::Text(txt) = t.base.as_ref() else {
            panic!("expected text");
        };
        assert_eq!(txt.content, "sin");
    }

    #[test]
    fn sin_scripts_stay_at_the_corner() {
        let f = parse("\\sin^2 x");
        let Atom::BigOperator(b) = &f.root.elements[0] else {
            panic!("expected big operator");
        };
        assert_eq!(b.limits, LimitsType::NoLimits);
    }

    #[test]
    fn lim_takes_limits_below() {
        let f = parse("\\lim_{n \\to \\infty}");
        let Atom::BigOperator(b) = &f.root.elements[0] else {
            panic!("expected big operator");
        };
        assert_eq!(b.limits, LimitsType::Normal);
        assert!(b.under.is_some());
    }
}
