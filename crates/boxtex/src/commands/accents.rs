//! Radicals, accents, over/underlines and stretched braces.

use tex_layout::atoms::accent::{AccentAtom, OverUnderlineAtom};
use tex_layout::atoms::delim::OverUnderDelimiterAtom;
use tex_layout::atoms::radical::RadicalAtom;
use tex_layout::Atom;

use crate::error::ParseError;
use crate::parser::Parser;

/// `\sqrt[n]{x}`.
pub fn sqrt(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let degree = match p.get_optional()? {
        Some(text) => Some(p.parse_fragment(pos, &text)?),
        None => None,
    };
    let base = p.parse_required("sqrt")?;
    Ok(Some(Atom::Radical(RadicalAtom::new(base, degree))))
}

macro_rules! accent_cmds {
    ($($name:ident => $ch:literal),* $(,)?) => {
        $(pub fn $name(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
            let base = p.parse_required(stringify!($name))?;
            Ok(Some(Atom::Accent(AccentAtom::new(base, $ch))))
        })*
    };
}

accent_cmds! {
    hat => 'ˆ',
    check => 'ˇ',
    tilde => '˜',
    acute => '´',
    grave => '`',
    dot => '˙',
    ddot => '¨',
    breve => '˘',
    bar => 'ˉ',
    vec => '→',
    widehat => 'ˆ',
    widetilde => '˜',
}

pub fn overline(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let base = p.parse_required("overline")?;
    Ok(Some(Atom::OverUnderline(OverUnderlineAtom {
        base: Box::new(base),
        over: true,
    })))
}

pub fn underline(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let base = p.parse_required("underline")?;
    Ok(Some(Atom::OverUnderline(OverUnderlineAtom {
        base: Box::new(base),
        over: false,
    })))
}

fn over_under_delim(
    p: &mut Parser,
    cmd: &str,
    delim: char,
    over: bool,
) -> Result<Option<Atom>, ParseError> {
    let base = p.parse_required(cmd)?;
    Ok(Some(Atom::OverUnderDelimiter(OverUnderDelimiterAtom {
        base: Box::new(base),
        delim,
        over,
    })))
}

pub fn overbrace(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    over_under_delim(p, "overbrace", '⏞', true)
}

pub fn underbrace(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    over_under_delim(p, "underbrace", '⏟', false)
}

pub fn overrightarrow(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    over_under_delim(p, "overrightarrow", '→', true)
}

pub fn overleftarrow(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    over_under_delim(p, "overleftarrow", '←', true)
}
