//! Stretchable delimiters: `\left...\right`, `\middle`, braces over and
//! under content.

use crate::atom::Atom;
use crate::atoms::row::RowAtom;
use crate::boxes::{BoxNode, HBox, VBox, scale_box};
use crate::env::Env;
use crate::glue;
use crate::types::{AtomType, UnitType};

/// Fraction of the body extent a `\left`/`\right` delimiter must cover.
const DELIMITER_FACTOR: f32 = 0.901;
/// How far, in points, a delimiter may fall short of the body.
const DELIMITER_SHORTFALL: f32 = 5.0;

/// A glyph grown vertically to at least `min_vlen`: the base glyph, then
/// the font's pre-built variants, then a glyph assembly with repeated
/// filler parts.
pub fn v_delim(code: char, env: &Env, min_vlen: f32) -> BoxNode {
    let scale = env.scale();
    let base = match env.get_char(code, true) {
        Some(ch) => BoxNode::char_box(ch),
        None => return BoxNode::empty(),
    };
    if base.vlen() >= min_vlen {
        return base;
    }

    let font = env.fc().math();
    for variant in font.vertical_variants(code) {
        if (variant.metrics.height + variant.metrics.depth) * scale >= min_vlen {
            let m = variant.metrics;
            let ch = crate::font::Char::new(
                code,
                variant.glyph,
                base_style(&base),
                scale,
                m,
            );
            return BoxNode::char_box(ch);
        }
    }

    if let Some(assembly) = font.vertical_assembly(code) {
        return assemble(code, env, &assembly, min_vlen);
    }

    // fall back to the largest variant, or the base glyph
    match font.vertical_variants(code).into_iter().next_back() {
        Some(variant) => {
            let ch = crate::font::Char::new(
                code,
                variant.glyph,
                base_style(&base),
                scale,
                variant.metrics,
            );
            BoxNode::char_box(ch)
        }
        None => base,
    }
}

fn base_style(b: &BoxNode) -> crate::font::FontStyle {
    match &b.kind {
        crate::boxes::BoxKind::Char(ch) => ch.style,
        _ => crate::font::FontStyle::RM,
    }
}

/// Stack assembly parts, repeating the filler parts until the target
/// extent is reached. Parts overlap by at most their `max_overlap`,
/// never less than the font's minimum connector overlap.
fn assemble(
    code: char,
    env: &Env,
    assembly: &crate::font::GlyphAssembly,
    min_vlen: f32,
) -> BoxNode {
    let scale = env.scale();
    let overlap = env.consts().min_connector_overlap * scale;

    let mut repeats = 1usize;
    loop {
        let mut vlen = 0.0;
        let mut count = 0usize;
        for part in &assembly.parts {
            let n = if part.repeatable { repeats } else { 1 };
            for _ in 0..n {
                vlen += (part.metrics.height + part.metrics.depth) * scale;
                count += 1;
            }
        }
        vlen -= overlap * (count.saturating_sub(1)) as f32;
        if vlen >= min_vlen || repeats > 64 {
            break;
        }
        repeats += 1;
    }

    let mut v = VBox::new();
    for part in &assembly.parts {
        let n = if part.repeatable { repeats } else { 1 };
        for _ in 0..n {
            let ch = crate::font::Char::new(code, part.glyph, crate::font::FontStyle::RM, scale, part.metrics);
            if !v.is_empty() {
                v.add(BoxNode::strut(0.0, -overlap, 0.0));
            }
            v.add(BoxNode::char_box(ch));
        }
    }
    v.into_node()
}

/// A glyph grown horizontally to at least `min_width`; fonts without
/// horizontal variants get the base glyph scaled.
pub fn h_delim(code: char, env: &Env, min_width: f32) -> BoxNode {
    let base = match env.get_char(code, true) {
        Some(ch) => BoxNode::char_box(ch),
        None => return BoxNode::empty(),
    };
    if base.width >= min_width || base.width <= 0.0 {
        return base;
    }
    scale_box(base.clone(), min_width / base.width, 1.0)
}

/// Shift a box so its vertical center sits on the math axis.
pub fn center_on_axis(b: &mut BoxNode, env: &Env) {
    let total = b.vlen();
    b.shift = b.height - total / 2.0 - env.axis_height();
}

/// `\left ... \right`, with `\middle` dividers sized together with the
/// surrounding body segments.
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedAtom {
    pub left: Option<char>,
    pub right: Option<char>,
    pub base: RowAtom,
}

impl DelimitedAtom {
    /// The delimiter extent needed to cover a body around the axis.
    fn target_vlen(&self, body: &BoxNode, env: &Env) -> f32 {
        let axis = env.axis_height();
        let delta = (body.height - axis).max(body.depth + axis);
        let vlen = 2.0 * delta;
        let shortfall = env.length_to_em(UnitType::Point, DELIMITER_SHORTFALL);
        let min = env.consts().delimited_sub_formula_min_height * env.scale();
        (vlen * DELIMITER_FACTOR).max(vlen - shortfall).max(min)
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        // segments between \middle dividers size their own delimiters
        let mut segments: Vec<RowAtom> = vec![RowAtom::new()];
        let mut middles: Vec<char> = Vec::new();
        for atom in &self.base.elements {
            match atom {
                Atom::Middle(m) => {
                    middles.push(m.code);
                    segments.push(RowAtom::new());
                }
                other => segments.last_mut().unwrap().add(other.clone()),
            }
        }
        for seg in &mut segments {
            seg.breakable = false;
        }

        let boxes: Vec<BoxNode> = segments.iter().map(|s| s.create_box(env)).collect();
        let target = boxes
            .iter()
            .map(|b| self.target_vlen(b, env))
            .fold(0.0f32, f32::max);

        let mut hbox = HBox::new();
        let delim = |code: char| {
            let mut d = v_delim(code, env, target);
            center_on_axis(&mut d, env);
            d
        };

        if let Some(code) = self.left {
            hbox.add(delim(code).with_class(AtomType::Opening));
            hbox.add(glue::between(AtomType::Opening, self.base.left_type(), env));
        }
        for (i, b) in boxes.into_iter().enumerate() {
            if i > 0 {
                hbox.add(delim(middles[i - 1]).with_class(AtomType::Inner));
            }
            hbox.add(b);
        }
        if let Some(code) = self.right {
            hbox.add(glue::between(self.base.right_type(), AtomType::Closing, env));
            hbox.add(delim(code).with_class(AtomType::Closing));
        }
        hbox.into_node()
    }
}

/// A lone `\middle` outside `\left...\right` renders at base size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MiddleAtom {
    pub code: char,
}

impl MiddleAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        match env.get_char(self.code, true) {
            Some(ch) => BoxNode::char_box(ch),
            None => BoxNode::empty(),
        }
    }
}

/// A brace (or arrow) stretched over or under its content, as produced by
/// `\overbrace` and `\underbrace`. Scripts on it become the label.
#[derive(Debug, Clone, PartialEq)]
pub struct OverUnderDelimiterAtom {
    pub base: Box<Atom>,
    pub delim: char,
    pub over: bool,
}

impl OverUnderDelimiterAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        let mut base = self.base.create_box(env);
        let delim = h_delim(self.delim, env, base.width);
        base.shift = (delim.width - base.width) / 2.0;

        let kern_h = env.length_to_em(UnitType::Ex, -1.0);
        let mut v = VBox::new();
        if self.over {
            v.add(delim);
            v.add(BoxNode::strut(0.0, kern_h, 0.0));
            let base_depth = base.depth;
            v.add(base);
            let h = v.height() + v.depth();
            v.set_metrics(h - base_depth, base_depth);
        } else {
            let base_height = base.height;
            v.add(base);
            v.add(delim);
            let h = v.height() + v.depth();
            v.set_metrics(base_height, h - base_height);
        }
        v.into_node()
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
    fn delimiter_grows_to_cover_body() {
        let e = env();
        let small = v_delim('(', &e, 0.5);
        let tall = v_delim('(', &e, 2.5);
        assert!(tall.vlen() >= 2.5);
        assert!(tall.vlen() > small.vlen());
    }

    #[test]
    fn assembly_used_past_largest_variant() {
        let e = env();
        let huge = v_delim('(', &e, 8.0);
        assert!(huge.vlen() >= 8.0);
    }

    #[test]
    fn fenced_fraction_gets_tall_parens() {
        let e = env();
        let frac = Atom::Fraction(FractionAtom::new(chr('a'), chr('b'), true));
        let plain_h = frac.create_box(&e).vlen();
        let fenced = DelimitedAtom {
            left: Some('('),
            right: Some(')'),
            base: RowAtom::from_atom(frac),
        };
        let b = fenced.create_box(&e);
        assert!(b.vlen() >= plain_h * DELIMITER_FACTOR);
    }

    #[test]
    fn middle_splits_sizing_segments() {
        let e = env();
        let mut row = RowAtom::new();
        row.add(chr('a'));
        row.add(Atom::Middle(MiddleAtom { code: '|' }));
        row.add(chr('b'));
        let d = DelimitedAtom {
            left: Some('('),
            right: Some(')'),
            base: row,
        };
        let b = d.create_box(&e);
        assert!(b.width > 0.0);
    }

    #[test]
    fn overbrace_sits_above_underbrace_below() {
        let e = env();
        let base = chr('x');
        let plain = base.create_box(&e);
        let over = OverUnderDelimiterAtom {
            base: Box::new(base.clone()),
            delim: '⏞',
            over: true,
        };
        let under = OverUnderDelimiterAtom {
            base: Box::new(base),
            delim: '⏟',
            over: false,
        };
        let ob = over.create_box(&e);
        let ub = under.create_box(&e);
        assert!(ob.height > plain.height);
        assert!((ob.depth - plain.depth).abs() < 1e-6);
        assert!(ub.depth > plain.depth);
        assert!((ub.height - plain.height).abs() < 1e-6);
    }
}
