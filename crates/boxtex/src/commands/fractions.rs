//! Fraction, binomial and over/under stacking commands.

use tex_layout::atoms::delim::DelimitedAtom;
use tex_layout::atoms::frac::{FractionAtom, StackArg, StackAtom};
use tex_layout::atoms::row::RowAtom;
use tex_layout::atoms::wrappers::StyleAtom;
use tex_layout::{Alignment, Atom, TexStyle};

use crate::error::ParseError;
use crate::parser::Parser;

pub fn frac(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let num = p.parse_required("frac")?;
    let dnom = p.parse_required("frac")?;
    Ok(Some(Atom::Fraction(FractionAtom::new(num, dnom, true))))
}

fn styled_frac(p: &mut Parser, cmd: &str, style: TexStyle) -> Result<Option<Atom>, ParseError> {
    let num = p.parse_required(cmd)?;
    let dnom = p.parse_required(cmd)?;
    Ok(Some(Atom::Style(StyleAtom {
        style,
        base: Box::new(Atom::Fraction(FractionAtom::new(num, dnom, true))),
    })))
}

pub fn dfrac(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    styled_frac(p, "dfrac", TexStyle::Display)
}

pub fn tfrac(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    styled_frac(p, "tfrac", TexStyle::Text)
}

/// `\cfrac[l|r]{num}{dnom}`: a continued fraction, display style with an
/// optional numerator alignment.
pub fn cfrac(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let align = match p.get_optional()?.as_deref() {
        Some("l") => Alignment::Left,
        Some("r") => Alignment::Right,
        _ => Alignment::Center,
    };
    let num = p.parse_required("cfrac")?;
    let dnom = p.parse_required("cfrac")?;
    let frac = FractionAtom::new(num, dnom, true).with_alignment(align, Alignment::Center);
    Ok(Some(Atom::Style(StyleAtom {
        style: TexStyle::Display,
        base: Box::new(Atom::Fraction(frac)),
    })))
}

fn binomial(p: &mut Parser, cmd: &str, style: Option<TexStyle>) -> Result<Option<Atom>, ParseError> {
    let num = p.parse_required(cmd)?;
    let dnom = p.parse_required(cmd)?;
    let mut inner = Atom::Fraction(FractionAtom::new(num, dnom, false));
    if let Some(style) = style {
        inner = Atom::Style(StyleAtom {
            style,
            base: Box::new(inner),
        });
    }
    Ok(Some(Atom::Delimited(DelimitedAtom {
        left: Some('('),
        right: Some(')'),
        base: RowAtom::from_atom(inner),
    })))
}

pub fn binom(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    binomial(p, "binom", None)
}

pub fn dbinom(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    binomial(p, "dbinom", Some(TexStyle::Display))
}

pub fn tbinom(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    binomial(p, "tbinom", Some(TexStyle::Text))
}

fn set(p: &mut Parser, cmd: &str, over: bool) -> Result<Option<Atom>, ParseError> {
    let annotation = p.parse_required(cmd)?;
    let base = p.parse_required(cmd)?;
    let arg = StackArg::auto(annotation);
    let (o, u) = if over { (Some(arg), None) } else { (None, Some(arg)) };
    Ok(Some(Atom::Stack(StackAtom {
        base: Some(Box::new(base)),
        over: o,
        under: u,
    })))
}

pub fn overset(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    set(p, "overset", true)
}

pub fn underset(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    set(p, "underset", false)
}

/// `\stackrel{top}{base}`: like `\overset` but the result is a relation.
pub fn stackrel(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    use tex_layout::atoms::basic::TypedAtom;
    use tex_layout::AtomType;
    let top = p.parse_required("stackrel")?;
    let base = p.parse_required("stackrel")?;
    let stack = Atom::Stack(StackAtom {
        base: Some(Box::new(base)),
        over: Some(StackArg::auto(top)),
        under: None,
    });
    Ok(Some(Atom::Typed(TypedAtom::new(AtomType::Relation, stack))))
}

#[cfg(test)]
mod tests {
    use crate::formula::Formula;
    use crate::parser::parse_with;
    use crate::registry::MacroRegistry;
    use tex_layout::Atom;

    fn parse(s: &str) -> Formula {
        parse_with(s, MacroRegistry::new(), false).unwrap()
    }

    #[test]
    fn frac_takes_two_arguments() {
        let f = parse("\\frac{a}{b}");
        assert_eq!(f.root.len(), 1);
        let Atom::Fraction(frac) = &f.root.elements[0] else {
            panic!("expected fraction");
        };
        assert!(frac.rule);
    }

    #[test]
    fn frac_accepts_single_token_arguments() {
        let f = parse("\\frac12");
        assert!(matches!(f.root.elements[0], Atom::Fraction(_)));
    }

    #[test]
    fn dfrac_forces_display() {
        let f = parse("\\dfrac{a}{b}");
        let Atom::Style(s) = &f.root.elements[0] else {
            panic!("expected style wrapper");
        };
        assert_eq!(s.style, tex_layout::TexStyle::Display);
    }

    #[test]
    fn binom_is_a_ruleless_fraction_in_parens() {
        let f = parse("\\binom{n}{k}");
        let Atom::Delimited(d) = &f.root.elements[0] else {
            panic!("expected delimited");
        };
        assert_eq!(d.left, Some('('));
        let Atom::Fraction(frac) = &d.base.elements[0] else {
            panic!("expected fraction inside");
        };
        assert!(!frac.rule);
    }

    #[test]
    fn overset_stacks_on_top() {
        let f = parse("\\overset{!}{=}");
        let Atom::Stack(s) = &f.root.elements[0] else {
            panic!("expected stack");
        };
        assert!(s.over.is_some() && s.under.is_none());
    }

    #[test]
    fn stackrel_is_a_relation() {
        use tex_layout::AtomType;
        let f = parse("a \\stackrel{?}{=} b");
        assert_eq!(f.root.elements[1].left_type(), AtomType::Relation);
    }
}
