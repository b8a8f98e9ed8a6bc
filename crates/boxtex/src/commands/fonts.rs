//! Font switches, text mode and explicit atom classes.

use tex_layout::atoms::basic::{TextAtom, TypedAtom};
use tex_layout::atoms::row::RowAtom;
use tex_layout::atoms::wrappers::{FontAtom, StyleAtom};
use tex_layout::{Atom, AtomType, FontStyle, TexStyle};

use crate::error::{ParseErrKind, ParseError};
use crate::parser::Parser;

macro_rules! math_font_cmds {
    ($($name:ident),* $(,)?) => {
        $(pub fn $name(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
            let base = p.parse_required(stringify!($name))?;
            // every name registered here is in the command table
            let style = FontStyle::from_command(stringify!($name)).unwrap_or(FontStyle::RM);
            Ok(Some(Atom::Font(FontAtom {
                style,
                add: false,
                base: Box::new(base),
            })))
        })*
    };
}

math_font_cmds! {
    mathrm, mathbf, mathit, mathsf, mathtt, mathcal, mathfrak, mathbb,
}

/// `\bm` adds boldness on top of the inherited style.
pub fn bm(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let base = p.parse_required("bm")?;
    Ok(Some(Atom::Font(FontAtom {
        style: FontStyle::BF,
        add: true,
        base: Box::new(base),
    })))
}

/// Builds a text run, parsing `$...$` spans inside it as inline math
/// and `$$...$$` spans as display math.
fn text_run(p: &mut Parser, pos: usize, content: &str, style: FontStyle) -> Result<Atom, ParseError> {
    let mut row = RowAtom::new();
    let mut plain = String::new();
    let mut rest = content;
    while let Some(open) = rest.find('$') {
        plain += &rest[..open];
        let display = rest[open..].starts_with("$$");
        let delim = if display { "$$" } else { "$" };
        let after = &rest[open + delim.len()..];
        let close = match after.find(delim) {
            Some(c) => c,
            None => {
                let err = ParseError(pos, ParseErrKind::UnmatchedDollar);
                if !p.partial {
                    return Err(err);
                }
                p.errors.push(err);
                after.len()
            }
        };
        if !plain.is_empty() {
            row.add(Atom::Text(TextAtom {
                content: std::mem::take(&mut plain),
                style,
            }));
        }
        let math = p.parse_fragment(pos, &after[..close])?;
        row.add(if display {
            Atom::Style(StyleAtom {
                style: TexStyle::Display,
                base: Box::new(math),
            })
        } else {
            math
        });
        rest = &after[(close + delim.len()).min(after.len())..];
    }
    plain += rest;
    if !plain.is_empty() || row.is_empty() {
        row.add(Atom::Text(TextAtom {
            content: plain,
            style,
        }));
    }
    Ok(crate::parser::collapse(row))
}

macro_rules! text_font_cmds {
    ($($name:ident => $style:expr),* $(,)?) => {
        $(pub fn $name(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
            let content = p.get_group(stringify!($name))?;
            text_run(p, pos, &content, $style).map(Some)
        })*
    };
}

text_font_cmds! {
    text => FontStyle::RM,
    textbf => FontStyle::RM.union(FontStyle::BF),
    textit => FontStyle::RM.union(FontStyle::IT),
    textsf => FontStyle::SF,
    texttt => FontStyle::TT,
    textsc => FontStyle::RM.union(FontStyle::SC),
}

/// `\operatorname{foo}`: an upright text run with operator spacing.
pub fn operatorname(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let name = p.get_group("operatorname")?;
    Ok(Some(Atom::Typed(TypedAtom::new(
        AtomType::BigOperator,
        Atom::Text(TextAtom {
            content: name,
            style: FontStyle::RM,
        }),
    ))))
}

macro_rules! class_cmds {
    ($($name:ident => $typ:expr),* $(,)?) => {
        $(pub fn $name(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
            let base = p.parse_required(stringify!($name))?;
            Ok(Some(Atom::Typed(TypedAtom::new($typ, base))))
        })*
    };
}

class_cmds! {
    mathbin => AtomType::BinaryOperator,
    mathrel => AtomType::Relation,
    mathop => AtomType::BigOperator,
    mathord => AtomType::Ordinary,
    mathopen => AtomType::Opening,
    mathclose => AtomType::Closing,
    mathpunct => AtomType::Punctuation,
    mathinner => AtomType::Inner,
}
