//! Sized delimiters, frames and geometric transforms.

use tex_layout::atoms::basic::{SymbolAtom, TypedAtom};
use tex_layout::atoms::wrappers::{
    FrameAtom, FrameKind, ReflectAtom, ResizeAtom, RotateAtom, ScaleAtom,
};
use tex_layout::graphics::TRANSPARENT;
use tex_layout::{Atom, AtomType};

use crate::error::ParseError;
use crate::parser::Parser;

fn sized_delim(
    p: &mut Parser,
    pos: usize,
    factor: f32,
    typ: AtomType,
) -> Result<Option<Atom>, ParseError> {
    let Some(code) = p.get_delimiter(pos)? else {
        return Ok(Some(Atom::Empty));
    };
    let scaled = Atom::Scale(ScaleAtom {
        base: Box::new(Atom::Symbol(SymbolAtom::new(code, AtomType::Ordinary))),
        sx: 1.0,
        sy: factor,
    });
    Ok(Some(Atom::Typed(TypedAtom::new(typ, scaled))))
}

macro_rules! big_cmds {
    ($($name:ident => ($factor:literal, $typ:expr)),* $(,)?) => {
        $(pub fn $name(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
            sized_delim(p, pos, $factor, $typ)
        })*
    };
}

big_cmds! {
    big => (1.2, AtomType::Ordinary),
    big_cap => (1.8, AtomType::Ordinary),
    bigg => (2.4, AtomType::Ordinary),
    bigg_cap => (3.0, AtomType::Ordinary),
    bigl => (1.2, AtomType::Opening),
    bigr => (1.2, AtomType::Closing),
    bigm => (1.2, AtomType::Relation),
    big_cap_l => (1.8, AtomType::Opening),
    big_cap_r => (1.8, AtomType::Closing),
    biggl => (2.4, AtomType::Opening),
    biggr => (2.4, AtomType::Closing),
    bigg_cap_l => (3.0, AtomType::Opening),
    bigg_cap_r => (3.0, AtomType::Closing),
}

fn frame(p: &mut Parser, cmd: &str, kind: FrameKind) -> Result<Option<Atom>, ParseError> {
    let base = p.parse_required(cmd)?;
    Ok(Some(Atom::Frame(FrameAtom {
        base: Box::new(base),
        kind,
        line: TRANSPARENT,
        bg: TRANSPARENT,
    })))
}

pub fn fbox(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    frame(p, "fbox", FrameKind::Rect)
}

pub fn ovalbox(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    frame(p, "ovalbox", FrameKind::Oval)
}

pub fn shadowbox(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    frame(p, "shadowbox", FrameKind::Shadow)
}

/// Draws the bounds of its content on top of it.
pub fn debug(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    frame(p, "debug", FrameKind::Debug)
}

/// `\scalebox{sx}[sy]{content}`.
pub fn scalebox(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let sx_text = p.get_group("scalebox")?;
    let sx = p.parse_float(pos, &sx_text)?;
    let sy = match p.get_optional()? {
        Some(t) => p.parse_float(pos, &t)?,
        None => sx,
    };
    let base = p.parse_required("scalebox")?;
    Ok(Some(Atom::Scale(ScaleAtom {
        base: Box::new(base),
        sx,
        sy,
    })))
}

/// `\rotatebox{degrees}{content}`, counterclockwise.
pub fn rotatebox(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let angle_text = p.get_group("rotatebox")?;
    let angle = p.parse_float(pos, &angle_text)?;
    let base = p.parse_required("rotatebox")?;
    Ok(Some(Atom::Rotate(RotateAtom {
        base: Box::new(base),
        angle,
    })))
}

/// `\resizebox{width}{height}{content}`; `!` in either slot keeps the
/// aspect ratio.
pub fn resizebox(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let w_text = p.get_group("resizebox")?;
    let h_text = p.get_group("resizebox")?;
    let keep_ratio = w_text.trim() == "!" || h_text.trim() == "!";
    let width = if w_text.trim() == "!" {
        None
    } else {
        Some(p.parse_length(pos, &w_text)?)
    };
    let height = if h_text.trim() == "!" {
        None
    } else {
        Some(p.parse_length(pos, &h_text)?)
    };
    let base = p.parse_required("resizebox")?;
    Ok(Some(Atom::Resize(ResizeAtom {
        base: Box::new(base),
        width,
        height,
        keep_ratio,
    })))
}

pub fn reflectbox(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let base = p.parse_required("reflectbox")?;
    Ok(Some(Atom::Reflect(ReflectAtom {
        base: Box::new(base),
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
    fn big_scales_vertically_only() {
        let f = parse("\\bigl( x \\bigr)");
        let Atom::Typed(t) = &f.root.elements[0] else {
            panic!("expected typed atom");
        };
        assert_eq!(t.left, AtomType::Opening);
        let Atom::Scale(s) = t.base.as_ref() else {
            panic!("expected scale");
        };
        assert_eq!(s.sx, 1.0);
        assert_eq!(s.sy, 1.2);
    }

    #[test]
    fn boxed_frames_its_content() {
        let f = parse("\\boxed{x+1}");
        let Atom::Frame(fr) = &f.root.elements[0] else {
            panic!("expected frame");
        };
        assert_eq!(fr.kind, FrameKind::Rect);
    }

    #[test]
    fn scalebox_defaults_sy_to_sx() {
        let f = parse("\\scalebox{2}{x}");
        let Atom::Scale(s) = &f.root.elements[0] else {
            panic!("expected scale");
        };
        assert_eq!(s.sx, 2.0);
        assert_eq!(s.sy, 2.0);
    }

    #[test]
    fn resizebox_bang_keeps_ratio() {
        let f = parse("\\resizebox{2em}{!}{x}");
        let Atom::Resize(r) = &f.root.elements[0] else {
            panic!("expected resize");
        };
        assert!(r.keep_ratio);
        assert!(r.width.is_some() && r.height.is_none());
    }
}
