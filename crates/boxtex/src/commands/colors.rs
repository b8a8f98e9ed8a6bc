//! Color parsing and the color commands.

use tex_layout::atoms::wrappers::{ColorAtom, FrameAtom, FrameKind};
use tex_layout::graphics::{self, TRANSPARENT};
use tex_layout::{Atom, Color};

use crate::error::{ParseErrKind, ParseError};
use crate::parser::Parser;

/// A color name or a `#RGB` / `#RRGGBB` / `#AARRGGBB` hex spec.
pub fn color_from(pos: usize, spec: &str) -> Result<Color, ParseError> {
    let s = spec.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return hex_color(hex)
            .ok_or_else(|| ParseError(pos, ParseErrKind::UnknownColor(s.to_string())));
    }
    let named = match s.to_ascii_lowercase().as_str() {
        "black" => graphics::BLACK,
        "white" => graphics::WHITE,
        "red" => graphics::RED,
        "green" => graphics::rgb(0, 0x80, 0),
        "lime" => graphics::rgb(0, 0xff, 0),
        "blue" => graphics::rgb(0, 0, 0xff),
        "cyan" => graphics::rgb(0, 0xff, 0xff),
        "magenta" => graphics::rgb(0xff, 0, 0xff),
        "yellow" => graphics::rgb(0xff, 0xff, 0),
        "orange" => graphics::rgb(0xff, 0xa5, 0),
        "purple" => graphics::rgb(0x80, 0, 0x80),
        "violet" => graphics::rgb(0xee, 0x82, 0xee),
        "brown" => graphics::rgb(0xa5, 0x2a, 0x2a),
        "pink" => graphics::rgb(0xff, 0xc0, 0xcb),
        "olive" => graphics::rgb(0x80, 0x80, 0),
        "teal" => graphics::rgb(0, 0x80, 0x80),
        "gray" | "grey" => graphics::rgb(0x80, 0x80, 0x80),
        "darkgray" | "darkgrey" => graphics::rgb(0xa9, 0xa9, 0xa9),
        "lightgray" | "lightgrey" => graphics::rgb(0xd3, 0xd3, 0xd3),
        _ => return Err(ParseError(pos, ParseErrKind::UnknownColor(s.to_string()))),
    };
    Ok(named)
}

fn hex_color(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            let (r, g, b) = ((v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf);
            Some(0xff00_0000 | (r * 17) << 16 | (g * 17) << 8 | (b * 17))
        }
        6 => Some(0xff00_0000 | u32::from_str_radix(hex, 16).ok()?),
        8 => u32::from_str_radix(hex, 16).ok(),
        _ => None,
    }
}

pub fn textcolor(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let fg = color_from(pos, &p.get_group("textcolor")?)?;
    let base = p.parse_required("textcolor")?;
    Ok(Some(Atom::Color(ColorAtom {
        base: Box::new(base),
        fg,
        bg: TRANSPARENT,
    })))
}

pub fn colorbox(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let bg = color_from(pos, &p.get_group("colorbox")?)?;
    let base = p.parse_required("colorbox")?;
    Ok(Some(Atom::Frame(FrameAtom {
        base: Box::new(base),
        kind: FrameKind::Rect,
        line: TRANSPARENT,
        bg,
    })))
}

pub fn fcolorbox(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let line = color_from(pos, &p.get_group("fcolorbox")?)?;
    let bg = color_from(pos, &p.get_group("fcolorbox")?)?;
    let base = p.parse_required("fcolorbox")?;
    Ok(Some(Atom::Frame(FrameAtom {
        base: Box::new(base),
        kind: FrameKind::Rect,
        line,
        bg,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_with;
    use crate::registry::MacroRegistry;

    #[test]
    fn named_and_hex_colors_parse() {
        assert_eq!(color_from(0, "black").unwrap(), graphics::BLACK);
        assert_eq!(color_from(0, "#ff0000").unwrap(), graphics::RED);
        assert_eq!(color_from(0, "#f00").unwrap(), graphics::RED);
        assert_eq!(color_from(0, "#80ff0000").unwrap(), 0x80ff_0000);
    }

    #[test]
    fn unknown_color_is_an_error() {
        let e = color_from(4, "nope").unwrap_err();
        assert_eq!(e.0, 4);
        assert!(matches!(e.1, ParseErrKind::UnknownColor(_)));
    }

    #[test]
    fn textcolor_wraps_its_content() {
        let f = parse_with("\\textcolor{red}{x}", MacroRegistry::new(), false).unwrap();
        let Atom::Color(c) = &f.root.elements[0] else {
            panic!("expected color atom");
        };
        assert_eq!(c.fg, graphics::RED);
    }

    #[test]
    fn color_switch_runs_to_group_end() {
        let f = parse_with("{\\color{blue} a+b} c", MacroRegistry::new(), false).unwrap();
        assert_eq!(f.root.len(), 2);
        let Atom::Row(group) = &f.root.elements[0] else {
            panic!("expected group row");
        };
        assert!(matches!(group.elements[0], Atom::Color(_)));
    }
}
