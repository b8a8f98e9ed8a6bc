//! Superscript and subscript placement.

use crate::atom::Atom;
use crate::atoms::basic::CharAtom;
use crate::atoms::wrappers::PhantomAtom;
use crate::atoms::frac::{StackArg, StackAtom};
use crate::atoms::row::RowAtom;
use crate::boxes::{BoxNode, HBox, PREC, VBox};
use crate::env::Env;
use crate::style::TexStyle;
use crate::types::{AtomType, LimitsType};

/// Corner scripts on a base. Falls back to stacked limits when the base
/// wants them (or display style says so for big operators).
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptsAtom {
    pub base: Option<Box<Atom>>,
    pub sub: Option<Box<Atom>>,
    pub sup: Option<Box<Atom>>,
}

impl ScriptsAtom {
    pub fn new(base: Option<Atom>, sub: Option<Atom>, sup: Option<Atom>) -> Self {
        ScriptsAtom {
            base: base.map(Box::new),
            sub: sub.map(Box::new),
            sup: sup.map(Box::new),
        }
    }

    pub fn base_left_type(&self) -> AtomType {
        self.base.as_deref().map_or(AtomType::Ordinary, Atom::left_type)
    }

    pub fn base_right_type(&self) -> AtomType {
        self.base.as_deref().map_or(AtomType::Ordinary, Atom::right_type)
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        // scripts with no base hang off an invisible 'M'
        let phantom;
        let base: &Atom = match self.base.as_deref() {
            Some(b) => b,
            None => {
                phantom = Atom::Phantom(PhantomAtom::full(Atom::Char(CharAtom::new('M', false))));
                &phantom
            }
        };

        if self.sub.is_none() && self.sup.is_none() {
            return base.create_box(env);
        }

        let limits = base.limits_type();
        if limits == LimitsType::Limits
            || (limits == LimitsType::Normal && env.style() == TexStyle::Display)
        {
            let stack = StackAtom {
                base: Some(Box::new(base.clone())),
                over: self.sup.as_deref().cloned().map(StackArg::auto),
                under: self.sub.as_deref().cloned().map(StackArg::auto),
            };
            return stack.create_box(env);
        }

        let c = env.consts().clone();
        let scale = env.scale();

        // italic correction of a slanted char base moves the superscript
        // right; text chars and boxed bases get the full baseline drops
        let mut delta = 0.0;
        let mut is_text = false;
        let mut check_sym = |atom: &Atom, e: &Env| {
            if let Some(ch) = atom.char_symbol(e) {
                if !matches!(atom, Atom::Char(ca) if !ca.math_mode) {
                    delta = ch.italic();
                }
                is_text = atom.left_type() != AtomType::BigOperator;
            }
        };

        let (kernel, base_box) = match base {
            Atom::Accent(acc) => {
                // scripts are placed relative to the accentee
                let cramp = env.cramp_style();
                check_sym(&acc.base, &cramp);
                (acc.base.create_box(&cramp), base.create_box(env))
            }
            _ => {
                check_sym(base, env);
                let b = base.create_box(env);
                (b.clone(), b)
            }
        };

        let mut u = 0.0;
        let mut v = 0.0;
        if !is_text {
            u = kernel.height - c.superscript_baseline_drop_max * scale;
            v = kernel.depth + c.subscript_baseline_drop_min * scale;
        }

        let kernel_width = kernel.width;
        let base_width = base_box.width;
        let mut hbox = HBox::from_box(base_box);
        let script_space = BoxNode::strut(c.space_after_script * scale, 0.0, 0.0);
        let mut compose = |script: BoxNode, extra: f32| -> BoxNode {
            let kern = kernel_width - base_width + extra;
            if kern.abs() > PREC {
                hbox.add(BoxNode::strut(kern, 0.0, 0.0));
            }
            hbox.add(script);
            hbox.add(script_space.clone());
            std::mem::take(&mut hbox).into_node()
        };

        let Some(sup) = self.sup.as_deref() else {
            // subscript only
            let mut x = self.sub.as_deref().unwrap().create_box(&env.sub_style());
            x.shift = v
                .max(c.subscript_shift_down * scale)
                .max(x.height - c.subscript_top_max * scale);
            return compose(x, 0.0);
        };

        let mut x = sup.create_box(&env.sup_style());
        let shift_up = if env.style().is_cramped() {
            c.superscript_shift_up_cramped
        } else {
            c.superscript_shift_up
        } * scale;
        u = u
            .max(shift_up)
            .max(x.depth + c.superscript_bottom_min * scale);

        let Some(sub) = self.sub.as_deref() else {
            // superscript only
            x.shift = -u;
            return compose(x, delta);
        };

        // both scripts: keep the minimum gap, then try to push the pair
        // apart symmetrically without the subscript outgrowing the kernel
        let y = sub.create_box(&env.sub_style());
        v = v.max(c.subscript_shift_down * scale);

        let theta = c.sub_superscript_gap_min * scale;
        let mut sigma = (u - x.depth) - (y.height - v);
        if sigma < theta {
            v = theta + y.height + x.depth - u;
            let psi = c.superscript_bottom_max_with_subscript * scale - (u - x.depth);
            if psi > 0.0 && (v - psi + y.depth) > kernel.depth {
                u += psi;
                v -= psi;
            }
            sigma = theta;
        }

        let mut vbox = VBox::new();
        x.shift = delta;
        let (xh, yd) = (x.height, y.depth);
        vbox.add(x);
        vbox.add(BoxNode::strut(0.0, sigma, 0.0));
        vbox.add(y);
        vbox.set_metrics(xh + u, yd + v);
        compose(vbox.into_node(), 0.0)
    }
}

/// Merges consecutive prime marks and Unicode script codepoints into one
/// scripts atom: `f''^2` accumulates into a single superscript row.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeScriptsAtom {
    pub base: Box<Atom>,
    pub sup: RowAtom,
    pub sub: RowAtom,
}

impl CumulativeScriptsAtom {
    pub fn new(base: Atom) -> Self {
        CumulativeScriptsAtom {
            base: Box::new(base),
            sup: RowAtom::new(),
            sub: RowAtom::new(),
        }
    }

    pub fn add_sup(&mut self, atom: Atom) {
        match atom {
            Atom::Row(r) => self.sup.elements.extend(r.elements),
            a => self.sup.add(a),
        }
    }

    pub fn add_sub(&mut self, atom: Atom) {
        match atom {
            Atom::Row(r) => self.sub.elements.extend(r.elements),
            a => self.sub.add(a),
        }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let scripts = ScriptsAtom::new(
            Some((*self.base).clone()),
            (!self.sub.is_empty()).then(|| Atom::Row(self.sub.clone())),
            (!self.sup.is_empty()).then(|| Atom::Row(self.sup.clone())),
        );
        scripts.create_box(env)
    }
}

/// A big operator with optional limits. Where the limits render depends on
/// the operator's limits type and the current style.
#[derive(Debug, Clone, PartialEq)]
pub struct BigOpAtom {
    pub base: Box<Atom>,
    pub under: Option<Box<Atom>>,
    pub over: Option<Box<Atom>>,
    pub limits: LimitsType,
}

impl BigOpAtom {
    pub fn new(base: Atom, under: Option<Atom>, over: Option<Atom>) -> Self {
        let limits = base.limits_type();
        BigOpAtom {
            base: Box::new(base),
            under: under.map(Box::new),
            over: over.map(Box::new),
            limits,
        }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        if self.limits == LimitsType::NoLimits
            || (self.limits == LimitsType::Normal && env.style() != TexStyle::Display)
        {
            return ScriptsAtom {
                base: Some(self.base.clone()),
                sub: self.under.clone(),
                sup: self.over.clone(),
            }
            .create_box(env);
        }
        StackAtom {
            base: Some(self.base.clone()),
            over: self.over.as_deref().cloned().map(StackArg::auto),
            under: self.under.as_deref().cloned().map(StackArg::auto),
        }
        .create_box(env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::basic::SymbolAtom;
    use crate::font::FontContext;

    fn env(style: TexStyle) -> Env {
        Env::new(style, FontContext::rule_font(), 10.0)
    }

    fn chr(c: char) -> Atom {
        Atom::Char(CharAtom::new(c, true))
    }

    #[test]
    fn superscript_raised_subscript_lowered() {
        let e = env(TexStyle::Text);
        let sup = ScriptsAtom::new(Some(chr('x')), None, Some(chr('2')));
        let sub = ScriptsAtom::new(Some(chr('x')), Some(chr('2')), None);
        let plain = chr('x').create_box(&e);
        assert!(sup.create_box(&e).height > plain.height);
        assert!(sub.create_box(&e).depth > plain.depth);
    }

    #[test]
    fn both_scripts_keep_minimum_gap() {
        let e = env(TexStyle::Text);
        let both = ScriptsAtom::new(Some(chr('x')), Some(chr('i')), Some(chr('2')));
        let b = both.create_box(&e);
        let sup_only = ScriptsAtom::new(Some(chr('x')), None, Some(chr('2')));
        assert!(b.depth > 0.0);
        assert!(b.height >= sup_only.create_box(&e).height - 1e-6);
    }

    #[test]
    fn missing_base_still_places_scripts() {
        let e = env(TexStyle::Text);
        let s = ScriptsAtom::new(None, Some(chr('1')), None);
        let b = s.create_box(&e);
        assert!(b.width > 0.0);
        assert!(b.depth > 0.0);
    }

    #[test]
    fn sum_stacks_limits_in_display_only() {
        let sum = Atom::Symbol(SymbolAtom::new('∑', AtomType::BigOperator));
        let op = BigOpAtom::new(sum, Some(chr('k')), Some(chr('n')));

        let display = op.create_box(&env(TexStyle::Display));
        let inline = op.create_box(&env(TexStyle::Text));
        // stacked limits do not widen past the widest slot, corner
        // scripts do
        assert!(display.vlen() > inline.vlen());
        assert!(inline.width > display.width);
    }

    #[test]
    fn integral_keeps_corner_scripts_in_display() {
        let int = Atom::Symbol(SymbolAtom::new('∫', AtomType::BigOperator));
        let e = env(TexStyle::Display);
        let base_w = int.create_box(&e).width;
        let op = BigOpAtom::new(int, Some(chr('0')), Some(chr('1')));
        let b = op.create_box(&e);
        assert!(b.width > base_w + 0.1);
    }

    #[test]
    fn cumulative_primes_merge_into_one_superscript() {
        let e = env(TexStyle::Text);
        let mut cum = CumulativeScriptsAtom::new(chr('f'));
        cum.add_sup(Atom::Symbol(SymbolAtom::new('′', AtomType::Ordinary)));
        cum.add_sup(Atom::Symbol(SymbolAtom::new('′', AtomType::Ordinary)));
        let two = cum.create_box(&e);
        let mut one = CumulativeScriptsAtom::new(chr('f'));
        one.add_sup(Atom::Symbol(SymbolAtom::new('′', AtomType::Ordinary)));
        assert!(two.width > one.create_box(&e).width);
    }
}
