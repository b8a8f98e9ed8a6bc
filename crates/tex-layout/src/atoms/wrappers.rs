//! Decorating atoms: color, phantom, smash, transforms, frames, raises,
//! style and font switches.

use crate::atom::Atom;
use crate::boxes::{
    BoxNode, HBox, VBox, color_box, debug_box, frame_box, reflect_box, rotate_box, scale_box,
};
use crate::env::Env;
use crate::font::FontStyle;
use crate::graphics::{Color, TRANSPARENT};
use crate::style::TexStyle;
use crate::types::UnitType;

/// `\textcolor` / `\colorbox`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAtom {
    pub base: Box<Atom>,
    pub fg: Color,
    pub bg: Color,
}

impl ColorAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        color_box(self.base.create_box(env), self.fg, self.bg)
    }
}

/// Occupies the space of its content without painting it. Each dimension
/// can be kept or zeroed (`\phantom`, `\hphantom`, `\vphantom`).
#[derive(Debug, Clone, PartialEq)]
pub struct PhantomAtom {
    pub base: Box<Atom>,
    pub keep_width: bool,
    pub keep_height: bool,
    pub keep_depth: bool,
}

impl PhantomAtom {
    pub fn full(base: Atom) -> Self {
        PhantomAtom {
            base: Box::new(base),
            keep_width: true,
            keep_height: true,
            keep_depth: true,
        }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let b = self.base.create_box(env);
        BoxNode::strut(
            if self.keep_width { b.width } else { 0.0 },
            if self.keep_height { b.height } else { 0.0 },
            if self.keep_depth { b.depth } else { 0.0 },
        )
    }
}

/// Draws its content but zeroes the height and/or depth (`\smash`).
#[derive(Debug, Clone, PartialEq)]
pub struct SmashAtom {
    pub base: Box<Atom>,
    pub smash_height: bool,
    pub smash_depth: bool,
}

impl SmashAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        let mut b = self.base.create_box(env);
        if self.smash_height {
            b.height = 0.0;
        }
        if self.smash_depth {
            b.depth = 0.0;
        }
        b
    }
}

/// Forces a TeX style (`\displaystyle`, `\textstyle`, `\scriptstyle`,
/// `\scriptscriptstyle`).
#[derive(Debug, Clone, PartialEq)]
pub struct StyleAtom {
    pub style: TexStyle,
    pub base: Box<Atom>,
}

impl StyleAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        self.base.create_box(&env.forced_style(self.style))
    }
}

/// Applies a font style to its content, either adding to or replacing the
/// inherited flags.
#[derive(Debug, Clone, PartialEq)]
pub struct FontAtom {
    pub style: FontStyle,
    /// Added flags combine (`\bm{\mathsf{x}}`); replacing resets.
    pub add: bool,
    pub base: Box<Atom>,
}

impl FontAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        let mut e = if self.add {
            env.with_added_font_style(self.style)
        } else {
            env.with_font_style(self.style)
        };
        if self.style.contains(FontStyle::SC) {
            e.set_small_caps(true);
        }
        self.base.create_box(&e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleAtom {
    pub base: Box<Atom>,
    pub sx: f32,
    pub sy: f32,
}

impl ScaleAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        scale_box(self.base.create_box(env), self.sx, self.sy)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RotateAtom {
    pub base: Box<Atom>,
    /// Degrees counterclockwise.
    pub angle: f32,
}

impl RotateAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        rotate_box(self.base.create_box(env), self.angle)
    }
}

/// `\resizebox`: scale to a target width and/or height, optionally
/// keeping the aspect ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeAtom {
    pub base: Box<Atom>,
    pub width: Option<(UnitType, f32)>,
    pub height: Option<(UnitType, f32)>,
    pub keep_ratio: bool,
}

impl ResizeAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        let b = self.base.create_box(env);
        let sx = self
            .width
            .map(|(u, w)| env.length_to_em(u, w) / b.width.max(1e-6));
        let sy = self
            .height
            .map(|(u, h)| env.length_to_em(u, h) / b.vlen().max(1e-6));
        let (sx, sy) = match (sx, sy) {
            (Some(x), Some(y)) if !self.keep_ratio => (x, y),
            (Some(x), Some(y)) => {
                let s = x.min(y);
                (s, s)
            }
            (Some(x), None) => (x, if self.keep_ratio { x } else { 1.0 }),
            (None, Some(y)) => (if self.keep_ratio { y } else { 1.0 }, y),
            (None, None) => (1.0, 1.0),
        };
        scale_box(b, sx, sy)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReflectAtom {
    pub base: Box<Atom>,
}

impl ReflectAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        reflect_box(self.base.create_box(env))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Rect,
    Rounded,
    Oval,
    Shadow,
    /// Diagnostic bounds overlay only.
    Debug,
}

/// `\fbox`, `\ovalbox`, `\shadowbox`: a border with clearance around the
/// content.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAtom {
    pub base: Box<Atom>,
    pub kind: FrameKind,
    pub line: Color,
    pub bg: Color,
}

impl FrameAtom {
    pub fn plain(base: Atom) -> Self {
        FrameAtom {
            base: Box::new(base),
            kind: FrameKind::Rect,
            line: TRANSPARENT,
            bg: TRANSPARENT,
        }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let b = self.base.create_box(env);
        if self.kind == FrameKind::Debug {
            return debug_box(b);
        }
        let thickness = env.rule_thickness();
        let space = 0.65 * env.quad() / 2.0;
        let radius = match self.kind {
            FrameKind::Rounded => space,
            FrameKind::Oval => (b.vlen() + 2.0 * (thickness + space)) / 2.0,
            _ => 0.0,
        };
        let framed = frame_box(b, thickness, space, self.line, self.bg, radius);
        if self.kind != FrameKind::Shadow {
            return framed;
        }

        // drop shadow: a rule along the bottom and the right edge
        let shadow = 4.0 * thickness;
        let width = framed.width;
        let height = framed.height;
        let depth = framed.depth;
        let mut v = VBox::new();
        v.add(framed);
        let mut bottom = BoxNode::rule(shadow, width, 0.0);
        bottom.shift = shadow;
        v.add(bottom);
        v.set_metrics(height, depth + shadow);
        let mut h = HBox::from_box(v.into_node());
        let mut right = BoxNode::rule(height + depth - shadow, shadow, 0.0);
        right.shift = depth + shadow;
        h.add(right);
        h.into_node()
    }
}

/// `\raisebox`: shifts content vertically without changing the reported
/// extent unless explicit extents are given.
#[derive(Debug, Clone, PartialEq)]
pub struct RaiseAtom {
    pub base: Box<Atom>,
    pub raise: (UnitType, f32),
    pub height: Option<(UnitType, f32)>,
    pub depth: Option<(UnitType, f32)>,
}

impl RaiseAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        let mut b = self.base.create_box(env);
        let r = env.length_to_em(self.raise.0, self.raise.1);
        b.shift = -r;
        if let Some((u, h)) = self.height {
            b.height = env.length_to_em(u, h);
        }
        if let Some((u, d)) = self.depth {
            b.depth = env.length_to_em(u, d);
        }
        b
    }
}
