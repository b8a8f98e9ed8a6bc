//! Accents and bar decorations.

use crate::atom::Atom;
use crate::boxes::{BoxNode, VBox, over_bar};
use crate::env::Env;

/// `\hat`, `\tilde`, `\vec`, ...: an accent glyph centered over its base,
/// with the clearance shrunk for tall bases.
#[derive(Debug, Clone, PartialEq)]
pub struct AccentAtom {
    pub base: Box<Atom>,
    pub accent: char,
}

impl AccentAtom {
    pub fn new(base: Atom, accent: char) -> Self {
        AccentAtom {
            base: Box::new(base),
            accent,
        }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let base = self.base.create_box(&env.cramp_style());
        let mut acc = match env.get_char(self.accent, true) {
            Some(ch) => BoxNode::char_box(ch),
            None => return base,
        };

        // skew: italic correction of a slanted base pulls the accent right
        let skew = self
            .base
            .char_symbol(&env.cramp_style())
            .map_or(0.0, |ch| ch.italic() / 2.0);
        acc.shift = (base.width - acc.width) / 2.0 + skew;

        // the accent rests on the x-height band, not on a tall ascender
        let clearance = base.height.min(env.consts().accent_base_height * env.scale());

        let base_height = base.height;
        let base_depth = base.depth;
        let acc_vlen = acc.vlen();
        let mut v = VBox::new();
        v.add(acc);
        v.add(BoxNode::strut(0.0, -clearance, 0.0));
        v.add(base);
        v.set_metrics(acc_vlen - clearance + base_height, base_depth);
        v.into_node()
    }
}

/// `\overline` and `\underline`: a rule the thickness of the fraction rule
/// with the bar-gap clearance.
#[derive(Debug, Clone, PartialEq)]
pub struct OverUnderlineAtom {
    pub base: Box<Atom>,
    pub over: bool,
}

impl OverUnderlineAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        let c = env.consts().clone();
        let scale = env.scale();
        if self.over {
            let base = self.base.create_box(&env.cramp_style());
            let depth = base.depth;
            let mut b = over_bar(
                base,
                c.overbar_vertical_gap * scale,
                c.overbar_rule_thickness * scale,
            );
            b.height += c.overbar_extra_ascender * scale;
            let vlen = b.vlen();
            b.depth = depth;
            b.height = vlen - depth;
            b
        } else {
            let base = self.base.create_box(env);
            let theta = c.underbar_rule_thickness * scale;
            let gap = c.underbar_vertical_gap * scale;
            let base_height = base.height;
            let base_width = base.width;
            let mut v = VBox::new();
            v.add(base);
            v.add(BoxNode::strut(0.0, gap, 0.0));
            v.add(BoxNode::rule(theta, base_width, 0.0));
            v.add(BoxNode::strut(0.0, c.underbar_extra_descender * scale, 0.0));
            let vlen = v.height() + v.depth();
            v.set_metrics(base_height, vlen - base_height);
            v.into_node()
        }
    }
}
