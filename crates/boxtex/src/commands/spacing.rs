//! Explicit spaces, kerns, rules, phantoms and raises.

use tex_layout::atoms::basic::{RuleAtom, SpaceAtom};
use tex_layout::atoms::wrappers::{PhantomAtom, RaiseAtom, SmashAtom};
use tex_layout::{Atom, SpaceType, UnitType};

use crate::error::ParseError;
use crate::parser::Parser;

pub fn quad(_p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    Ok(Some(Atom::Space(SpaceAtom::Skip(SpaceType::Quad))))
}

pub fn qquad(_p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    Ok(Some(Atom::Space(SpaceAtom::Skip(SpaceType::QQuad))))
}

pub fn hspace(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let text = p.get_length_like("hspace")?;
    let (unit, width) = p.parse_length(pos, &text)?;
    Ok(Some(Atom::Space(SpaceAtom::Custom {
        unit,
        width,
        height: 0.0,
        depth: 0.0,
    })))
}

pub fn kern(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let text = p.get_length_like("kern")?;
    let (unit, width) = p.parse_length(pos, &text)?;
    Ok(Some(Atom::Space(SpaceAtom::Custom {
        unit,
        width,
        height: 0.0,
        depth: 0.0,
    })))
}

/// `\mkern3mu`: like `\kern` but the unit defaults to mu.
pub fn mkern(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let text = p.get_length_like("mkern")?;
    let (unit, width) = match p.parse_length(pos, &text) {
        Ok(r) => r,
        Err(_) => (UnitType::Mu, p.parse_float(pos, &text)?),
    };
    Ok(Some(Atom::Space(SpaceAtom::Custom {
        unit,
        width,
        height: 0.0,
        depth: 0.0,
    })))
}

/// `\rule[raise]{width}{height}`.
pub fn rule(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let raise = match p.get_optional()? {
        Some(text) => p.parse_length(pos, &text)?,
        None => (UnitType::Em, 0.0),
    };
    let w_text = p.get_group("rule")?;
    let (w_unit, width) = p.parse_length(pos, &w_text)?;
    let h_text = p.get_group("rule")?;
    let height = p.parse_length(pos, &h_text)?;
    // one unit rules the whole atom; the other extents convert through it
    Ok(Some(Atom::Rule(RuleAtom {
        unit: w_unit,
        width,
        height: convert_to(height, w_unit),
        raise: convert_to(raise, w_unit),
    })))
}

/// Rough unit conversion for the rare mixed-unit rule; exact for the
/// absolute units, which is what `\rule` sees in practice.
fn convert_to((unit, v): (UnitType, f32), target: UnitType) -> f32 {
    if unit == target || v == 0.0 {
        return v;
    }
    let pt = |u: UnitType| match u {
        UnitType::Point => 1.0,
        UnitType::Cm => 28.45,
        UnitType::Mm => 2.845,
        UnitType::In => 72.27,
        UnitType::Pixel => 0.75,
        _ => 10.0,
    };
    v * pt(unit) / pt(target)
}

pub fn phantom(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let base = p.parse_required("phantom")?;
    Ok(Some(Atom::Phantom(PhantomAtom::full(base))))
}

pub fn hphantom(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let base = p.parse_required("hphantom")?;
    Ok(Some(Atom::Phantom(PhantomAtom {
        base: Box::new(base),
        keep_width: true,
        keep_height: false,
        keep_depth: false,
    })))
}

pub fn vphantom(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let base = p.parse_required("vphantom")?;
    Ok(Some(Atom::Phantom(PhantomAtom {
        base: Box::new(base),
        keep_width: false,
        keep_height: true,
        keep_depth: true,
    })))
}

/// `\smash[b]{x}` / `\smash[t]{x}` / `\smash{x}`.
pub fn smash(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let opt = p.get_optional()?;
    let base = p.parse_required("smash")?;
    let (smash_height, smash_depth) = match opt.as_deref().map(str::trim) {
        Some("t") => (true, false),
        Some("b") => (false, true),
        _ => (true, true),
    };
    Ok(Some(Atom::Smash(SmashAtom {
        base: Box::new(base),
        smash_height,
        smash_depth,
    })))
}

/// `\raisebox{len}[height][depth]{content}`.
pub fn raisebox(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let raise_text = p.get_group("raisebox")?;
    let raise = p.parse_length(pos, &raise_text)?;
    let height = match p.get_optional()? {
        Some(t) => Some(p.parse_length(pos, &t)?),
        None => None,
    };
    let depth = match p.get_optional()? {
        Some(t) => Some(p.parse_length(pos, &t)?),
        None => None,
    };
    let base = p.parse_required("raisebox")?;
    Ok(Some(Atom::Raise(RaiseAtom {
        base: Box::new(base),
        raise,
        height,
        depth,
    })))
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
    fn quad_is_a_named_skip() {
        let f = parse("a\\quad b");
        assert!(matches!(
            f.root.elements[1],
            Atom::Space(SpaceAtom::Skip(SpaceType::Quad))
        ));
    }

    #[test]
    fn hspace_takes_a_length() {
        let f = parse("\\hspace{2em}");
        let Atom::Space(SpaceAtom::Custom { unit, width, .. }) = f.root.elements[0] else {
            panic!("expected custom space");
        };
        assert_eq!(unit, UnitType::Em);
        assert_eq!(width, 2.0);
    }

    #[test]
    fn kern_accepts_a_bare_length() {
        let f = parse("a\\kern-3mu b");
        let Atom::Space(SpaceAtom::Custom { unit, width, .. }) = f.root.elements[1] else {
            panic!("expected custom space");
        };
        assert_eq!(unit, UnitType::Mu);
        assert_eq!(width, -3.0);
    }

    #[test]
    fn bad_length_is_reported() {
        let e = parse_with("\\hspace{abc}", MacroRegistry::new(), false).unwrap_err();
        assert!(matches!(
            e.1,
            crate::error::ParseErrKind::ExpectedLength(_)
        ));
    }

    #[test]
    fn phantom_variants_keep_the_right_extents() {
        let f = parse("\\hphantom{x}\\vphantom{x}");
        let Atom::Phantom(h) = &f.root.elements[0] else {
            panic!("expected phantom");
        };
        assert!(h.keep_width && !h.keep_height);
        let Atom::Phantom(v) = &f.root.elements[1] else {
            panic!("expected phantom");
        };
        assert!(!v.keep_width && v.keep_height);
    }

    #[test]
    fn rule_parses_its_extents() {
        let f = parse("\\rule{2em}{1ex}");
        let Atom::Rule(r) = f.root.elements[0] else {
            panic!("expected rule");
        };
        assert_eq!(r.width, 2.0);
        assert_eq!(r.height, 1.0);
    }
}
