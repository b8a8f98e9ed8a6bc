//! Fractions and over/under stacks.

use crate::atom::Atom;
use crate::boxes::{BoxNode, VBox};
use crate::env::Env;
use crate::types::{Alignment, UnitType};

/// `\frac`, `\atop`, `\over` and friends. Without a rule the numerator and
/// denominator follow the stack constants instead of the fraction ones.
#[derive(Debug, Clone, PartialEq)]
pub struct FractionAtom {
    pub num: Box<Atom>,
    pub dnom: Box<Atom>,
    pub rule: bool,
    /// Explicit rule thickness; the font constant applies when absent.
    pub thickness: Option<(UnitType, f32)>,
    pub num_align: Alignment,
    pub dnom_align: Alignment,
}

fn check_align(a: Alignment) -> Alignment {
    match a {
        Alignment::Left | Alignment::Right => a,
        _ => Alignment::Center,
    }
}

impl FractionAtom {
    pub fn new(num: Atom, dnom: Atom, rule: bool) -> Self {
        FractionAtom {
            num: Box::new(num),
            dnom: Box::new(dnom),
            rule,
            thickness: None,
            num_align: Alignment::Center,
            dnom_align: Alignment::Center,
        }
    }

    pub fn with_alignment(mut self, num_align: Alignment, dnom_align: Alignment) -> Self {
        self.num_align = check_align(num_align);
        self.dnom_align = check_align(dnom_align);
        self
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let c = env.consts().clone();
        let scale = env.scale();

        let theta = if !self.rule {
            0.0
        } else {
            match self.thickness {
                None | Some((_, 0.0)) => c.fraction_rule_thickness * scale,
                Some((unit, t)) => env.length_to_em(unit, t),
            }
        };

        let mut x = self.num.create_box(&env.num_style());
        let mut z = self.dnom.create_box(&env.dnom_style());
        let w = x.width.max(z.width);

        let display = env.style().is_display();

        let (mut u, mut v) = if display {
            if self.rule {
                (
                    c.fraction_numerator_display_style_shift_up,
                    c.fraction_denominator_display_style_shift_down,
                )
            } else {
                (
                    c.stack_top_display_style_shift_up,
                    c.stack_bottom_display_style_shift_down,
                )
            }
        } else if self.rule {
            (
                c.fraction_numerator_shift_up,
                c.fraction_denominator_shift_down,
            )
        } else {
            (c.stack_top_shift_up, c.stack_bottom_shift_down)
        };
        u *= scale;
        v *= scale;

        if self.rule {
            let phi = if display {
                c.fraction_numerator_display_style_gap_min
            } else {
                c.fraction_numerator_gap_min
            } * scale;
            let a = c.axis_height * scale;
            let d = (u - x.depth) - (a + theta / 2.0);
            if d < phi {
                u += phi - d;
            }
            let f = (a - theta / 2.0) - (z.height - v);
            if f < phi {
                v += phi - f;
            }
        } else {
            let phi = if display {
                c.stack_display_style_gap_min
            } else {
                c.stack_gap_min
            } * scale;
            let psi = (u - x.depth) - (z.height - v);
            if psi < phi {
                u += (phi - psi) / 2.0;
                v += (phi - psi) / 2.0;
            }
        }

        let shift = |b: &mut BoxNode, align: Alignment| {
            b.shift = match align {
                Alignment::Center => (w - b.width) / 2.0,
                _ => w - b.width,
            };
        };
        let kern = (x.height + u + z.depth + v) - (x.vlen() + z.vlen());

        let mut vbox = VBox::new();
        shift(&mut x, self.num_align);
        let xh = x.height;
        vbox.add(x);
        if self.rule {
            vbox.add(BoxNode::strut(0.0, (kern - theta) / 2.0, 0.0));
            vbox.add(BoxNode::rule(theta, w, 0.0));
            vbox.add(BoxNode::strut(0.0, (kern - theta) / 2.0, 0.0));
        } else {
            vbox.add(BoxNode::strut(0.0, kern, 0.0));
        }
        shift(&mut z, self.dnom_align);
        let zd = z.depth;
        vbox.add(z);
        vbox.set_metrics(xh + u, zd + v);
        vbox.into_node()
    }
}

/// One slot of a [`StackAtom`].
#[derive(Debug, Clone, PartialEq)]
pub struct StackArg {
    pub atom: Box<Atom>,
    /// Lay the slot out in script style.
    pub is_script: bool,
    /// Explicit clearance; the limit-gap constants apply when absent.
    pub space: Option<(UnitType, f32)>,
}

impl StackArg {
    /// The spacing the limit constants decide, in script style.
    pub fn auto(atom: Atom) -> StackArg {
        StackArg {
            atom: Box::new(atom),
            is_script: true,
            space: None,
        }
    }

    pub fn spaced(atom: Atom, unit: UnitType, space: f32) -> StackArg {
        StackArg {
            atom: Box::new(atom),
            is_script: false,
            space: Some((unit, space)),
        }
    }
}

/// Content placed over and/or under a base, horizontally centered on the
/// widest of the three. Used for display-style limits, `\overset`,
/// `\underset` and `\stackrel`.
#[derive(Debug, Clone, PartialEq)]
pub struct StackAtom {
    pub base: Option<Box<Atom>>,
    pub over: Option<StackArg>,
    pub under: Option<StackArg>,
}

impl StackAtom {
    pub fn base_type(&self) -> crate::types::AtomType {
        self.base
            .as_deref()
            .map_or(crate::types::AtomType::Ordinary, Atom::left_type)
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let c = env.consts().clone();
        let scale = env.scale();

        let slot = |arg: &Option<StackArg>, script: Env| -> Option<BoxNode> {
            arg.as_ref().map(|a| {
                if a.is_script {
                    a.atom.create_box(&script)
                } else {
                    a.atom.create_box(env)
                }
            })
        };
        let o = slot(&self.over, env.sup_style());
        let u = slot(&self.under, env.sub_style());

        let b = match &self.base {
            Some(base) => base.create_box(env),
            None => BoxNode::empty(),
        };
        let delta = self
            .base
            .as_deref()
            .and_then(|a| a.char_symbol(env))
            .map_or(0.0, |ch| ch.italic());

        let max_width = [Some(&b), o.as_ref(), u.as_ref()]
            .into_iter()
            .flatten()
            .map(|x| x.width)
            .fold(0.0f32, f32::max);
        let wrap = |mut bx: BoxNode, bias: f32| -> BoxNode {
            bx.shift = (max_width - bx.width) / 2.0 + bias;
            bx
        };

        let mut vbox = VBox::new();

        if let Some(ob) = o
            && !ob.is_space()
        {
            let space = match &self.over.as_ref().unwrap().space {
                None => {
                    let gap_min = c.upper_limit_gap_min * scale;
                    let rise_min = c.upper_limit_baseline_rise_min * scale;
                    (rise_min - ob.depth).max(gap_min)
                }
                Some((unit, s)) => env.length_to_em(*unit, *s),
            };
            vbox.add(wrap(ob, delta / 2.0));
            let mut kern = BoxNode::strut(0.0, space, 0.0);
            kern.shift = delta / 2.0;
            vbox.add(kern);
        }

        let center = wrap(b, 0.0);
        let center_depth = center.depth;
        vbox.add(center);
        // everything above this point stays above the baseline
        let height = vbox.height() + vbox.depth() - center_depth;

        if let Some(ub) = u
            && !ub.is_space()
        {
            let space = match &self.under.as_ref().unwrap().space {
                None => {
                    let gap_min = c.lower_limit_gap_min * scale;
                    let drop_min = c.lower_limit_baseline_drop_min * scale;
                    (drop_min - ub.height).max(gap_min)
                }
                Some((unit, s)) => env.length_to_em(*unit, *s),
            };
            let mut kern = BoxNode::strut(0.0, space, 0.0);
            kern.shift = delta / 2.0;
            vbox.add(kern);
            vbox.add(wrap(ub, -delta / 2.0));
        }

        let vlen = vbox.height() + vbox.depth();
        vbox.set_metrics(height, vlen - height);
        vbox.into_node()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::basic::CharAtom;
    use crate::font::FontContext;
    use crate::style::TexStyle;

    fn env(style: TexStyle) -> Env {
        Env::new(style, FontContext::rule_font(), 10.0)
    }

    fn chr(c: char) -> Atom {
        Atom::Char(CharAtom::new(c, true))
    }

    #[test]
    fn fraction_centers_on_axis_with_clearance() {
        let e = env(TexStyle::Display);
        let f = FractionAtom::new(chr('a'), chr('b'), true);
        let b = f.create_box(&e);
        assert!(b.height > 0.0 && b.depth > 0.0);
        // numerator sits clear above the axis, denominator clear below
        let axis = e.consts().axis_height;
        assert!(b.height > axis);
        assert!(b.depth > -axis);
    }

    #[test]
    fn display_fraction_is_taller_than_text() {
        let f = FractionAtom::new(chr('a'), chr('b'), true);
        let d = f.create_box(&env(TexStyle::Display));
        let t = f.create_box(&env(TexStyle::Text));
        assert!(d.vlen() > t.vlen());
    }

    #[test]
    fn ruleless_fraction_has_no_rule() {
        use crate::boxes::BoxKind;
        let f = FractionAtom::new(chr('a'), chr('b'), false);
        let b = f.create_box(&env(TexStyle::Text));
        let BoxKind::VBox(v) = &b.kind else {
            panic!("expected a vbox")
        };
        assert!(!v.children.iter().any(|c| matches!(c.kind, BoxKind::Rule { .. })));
    }

    #[test]
    fn fraction_width_tracks_widest_part() {
        let mut num = crate::atoms::row::RowAtom::new();
        num.add(chr('a'));
        num.add(chr('b'));
        num.add(chr('c'));
        let f = FractionAtom::new(Atom::Row(num), chr('x'), true);
        let e = env(TexStyle::Text);
        let b = f.create_box(&e);
        let x = chr('x').create_box(&e.dnom_style());
        assert!(b.width > x.width);
    }

    #[test]
    fn stack_keeps_base_on_baseline() {
        let e = env(TexStyle::Display);
        let base = chr('x');
        let plain = base.create_box(&e);
        let stack = StackAtom {
            base: Some(Box::new(base)),
            over: Some(StackArg::auto(chr('n'))),
            under: Some(StackArg::auto(chr('k'))),
        };
        let b = stack.create_box(&e);
        assert!(b.depth > plain.depth);
        assert!(b.height > plain.height);
    }

    #[test]
    fn stack_width_is_widest_slot() {
        let e = env(TexStyle::Display);
        let mut wide = crate::atoms::row::RowAtom::new();
        for c in "abc".chars() {
            wide.add(chr(c));
        }
        let stack = StackAtom {
            base: Some(Box::new(chr('x'))),
            over: Some(StackArg::auto(Atom::Row(wide.clone()))),
            under: None,
        };
        let b = stack.create_box(&e);
        let over = Atom::Row(wide).create_box(&e.sup_style());
        assert!((b.width - over.width).abs() < 1e-6);
    }
}
