//! Square roots and nth roots.

use crate::atom::Atom;
use crate::atoms::delim::v_delim;
use crate::boxes::{BoxNode, HBox, VBox};
use crate::env::Env;

/// `\sqrt[n]{x}`. The radicand is laid out in the cramped current style,
/// the rule sits `radical_vertical_gap` above it and the sign is stretched
/// to cover both; the degree rides up the left slope of the sign.
#[derive(Debug, Clone, PartialEq)]
pub struct RadicalAtom {
    pub base: Box<Atom>,
    pub degree: Option<Box<Atom>>,
}

impl RadicalAtom {
    pub fn new(base: Atom, degree: Option<Atom>) -> Self {
        RadicalAtom {
            base: Box::new(base),
            degree: degree.map(Box::new),
        }
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let c = env.consts().clone();
        let scale = env.scale();

        let body = self.base.create_box(&env.cramp_style());
        let theta = c.radical_rule_thickness * scale;
        let gap = if env.style().is_display() {
            c.radical_display_style_vertical_gap
        } else {
            c.radical_vertical_gap
        } * scale;

        // rule, clearance, then the radicand
        let mut v = VBox::new();
        let body_width = body.width;
        let body_depth = body.depth;
        v.add(BoxNode::strut(0.0, c.radical_extra_ascender * scale, 0.0));
        v.add(BoxNode::rule(theta, body_width, 0.0));
        v.add(BoxNode::strut(0.0, gap, 0.0));
        v.add(body);
        let vlen = v.height() + v.depth();
        v.set_metrics(vlen - body_depth, body_depth);
        let radicand = v.into_node();

        let mut sign = v_delim('√', env, radicand.vlen() - c.radical_extra_ascender * scale);
        // the sign's top meets the rule
        sign.shift = radicand.height - c.radical_extra_ascender * scale - sign.height;

        let mut hbox = HBox::new();
        if let Some(degree) = &self.degree {
            let mut d = degree.create_box(&env.root_style());
            // degree bottom sits at the raise percentage of the sign,
            // measured up from the sign's bottom edge
            d.shift = sign.shift + sign.depth
                - c.radical_degree_bottom_raise_percent * sign.vlen()
                - d.depth;
            hbox.add(BoxNode::strut(c.radical_kern_before_degree * scale, 0.0, 0.0));
            hbox.add(d);
            hbox.add(BoxNode::strut(c.radical_kern_after_degree * scale, 0.0, 0.0));
        }
        hbox.add(sign);
        hbox.add(radicand);
        hbox.into_node()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::basic::CharAtom;
    use crate::atoms::frac::FractionAtom;
    use crate::font::FontContext;
    use crate::style::TexStyle;

    fn env() -> Env {
        Env::new(TexStyle::Display, FontContext::rule_font(), 10.0)
    }

    fn chr(c: char) -> Atom {
        Atom::Char(CharAtom::new(c, true))
    }

    #[test]
    fn sqrt_covers_its_radicand() {
        let e = env();
        let body_h = chr('x').create_box(&e.cramp_style()).height;
        let b = RadicalAtom::new(chr('x'), None).create_box(&e);
        assert!(b.height > body_h);
    }

    #[test]
    fn tall_radicand_stretches_the_sign() {
        let e = env();
        let frac = Atom::Fraction(FractionAtom::new(chr('a'), chr('b'), true));
        let tall = RadicalAtom::new(frac, None).create_box(&e);
        let short = RadicalAtom::new(chr('x'), None).create_box(&e);
        assert!(tall.vlen() > short.vlen());
    }

    #[test]
    fn degree_rides_the_left_slope() {
        use crate::boxes::BoxKind;
        let e = env();
        let b = RadicalAtom::new(chr('x'), Some(chr('3'))).create_box(&e);
        let BoxKind::HBox(h) = &b.kind else {
            panic!("expected an hbox")
        };
        // kern, degree, back-kern, sign, radicand
        assert_eq!(h.children.len(), 5);
        // the back-kern tucks the degree against the sign
        assert!(h.children[2].width < 0.0);
        // the degree is raised well above the baseline
        assert!(h.children[1].shift < 0.0);
    }
}
