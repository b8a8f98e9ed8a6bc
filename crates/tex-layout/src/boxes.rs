//! Concrete laid-out primitives.
//!
//! A box has a width, a height above the baseline, a depth below it, and a
//! shift that repositions it inside a composing parent without changing its
//! own metrics. Boxes are built once per layout pass and never mutated
//! afterwards; a redraw re-walks the same tree.

use crate::font::Char;
use crate::graphics::{Color, Graphics2D, TRANSPARENT, is_transparent};
use crate::types::AtomType;

/// Metric comparisons ignore differences below this.
pub const PREC: f32 = 1e-7;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxNode {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Vertical offset inside an HBox, horizontal inside a VBox.
    pub shift: f32,
    /// Atom class carried over for glue decisions past layout.
    pub class: AtomType,
    pub kind: BoxKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoxKind {
    /// A single resolved glyph.
    Char(Char),
    /// A filled rectangle spanning the box extent.
    Rule { color: Color },
    /// Pure metrics, draws nothing.
    Strut,
    /// A strut that may stretch or shrink when a line is justified.
    Glue { stretch: f32, shrink: f32 },
    HBox(HBox),
    VBox(VBox),
    /// Recolors (and optionally backgrounds) its content.
    Color {
        fg: Color,
        bg: Color,
        child: Box<BoxNode>,
    },
    Scale {
        sx: f32,
        sy: f32,
        child: Box<BoxNode>,
    },
    Rotate {
        /// Radians, counterclockwise.
        angle: f32,
        dx: f32,
        dy: f32,
        child: Box<BoxNode>,
    },
    Reflect(Box<BoxNode>),
    /// Frame decoration: rectangle (or rounded rectangle) around content.
    Frame {
        thickness: f32,
        corner_radius: f32,
        line: Color,
        bg: Color,
        child: Box<BoxNode>,
    },
    /// Diagnostic overlay drawn around a wrapped box.
    Debug(Box<BoxNode>),
}

impl BoxNode {
    fn bare(kind: BoxKind) -> BoxNode {
        BoxNode {
            width: 0.0,
            height: 0.0,
            depth: 0.0,
            shift: 0.0,
            class: AtomType::None,
            kind,
        }
    }

    /// The italic correction is not part of the width; row layout adds it
    /// with [`add_italic_correction`](Self::add_italic_correction) where a
    /// following symbol needs the room.
    pub fn char_box(ch: Char) -> BoxNode {
        BoxNode {
            width: ch.width(),
            height: ch.height(),
            depth: ch.depth(),
            shift: 0.0,
            class: AtomType::None,
            kind: BoxKind::Char(ch),
        }
    }

    pub fn add_italic_correction(&mut self) {
        if let BoxKind::Char(ch) = &self.kind {
            self.width += ch.italic();
        }
    }

    pub fn strut(width: f32, height: f32, depth: f32) -> BoxNode {
        BoxNode {
            width,
            height,
            depth,
            ..Self::bare(BoxKind::Strut)
        }
    }

    pub fn glue(space: f32, stretch: f32, shrink: f32) -> BoxNode {
        BoxNode {
            width: space,
            ..Self::bare(BoxKind::Glue { stretch, shrink })
        }
    }

    pub fn rule(thickness: f32, width: f32, shift: f32) -> BoxNode {
        BoxNode {
            width,
            height: thickness,
            depth: 0.0,
            shift,
            class: AtomType::None,
            kind: BoxKind::Rule { color: TRANSPARENT },
        }
    }

    pub fn empty() -> BoxNode {
        Self::strut(0.0, 0.0, 0.0)
    }

    #[inline]
    pub fn vlen(&self) -> f32 {
        self.height + self.depth
    }

    /// True for boxes that only occupy space.
    pub fn is_space(&self) -> bool {
        matches!(self.kind, BoxKind::Strut | BoxKind::Glue { .. })
    }

    pub fn with_class(mut self, class: AtomType) -> BoxNode {
        self.class = class;
        self
    }

    pub fn negate_width(&mut self) {
        self.width = -self.width;
    }

    /// Paint this box with its reference point at `(x, y)`; `y` is the
    /// baseline.
    pub fn draw(&self, g: &mut dyn Graphics2D, x: f32, y: f32) {
        match &self.kind {
            BoxKind::Char(ch) => {
                g.draw_glyph(ch.glyph, ch.code, ch.style, ch.scale, x, y);
            }
            BoxKind::Rule { color } => {
                let old = g.color();
                if !is_transparent(*color) {
                    g.set_color(*color);
                }
                g.fill_rect(x, y - self.height, self.width, self.vlen());
                if !is_transparent(*color) {
                    g.set_color(old);
                }
            }
            BoxKind::Strut | BoxKind::Glue { .. } => {}
            BoxKind::HBox(h) => h.draw(g, x, y),
            BoxKind::VBox(v) => v.draw(g, x, y, self.height),
            BoxKind::Color { fg, bg, child } => {
                let old = g.color();
                if !is_transparent(*bg) {
                    g.set_color(*bg);
                    g.fill_rect(x, y - child.height, child.width, child.vlen());
                }
                g.set_color(if is_transparent(*fg) { old } else { *fg });
                child.draw(g, x, y);
                g.set_color(old);
            }
            BoxKind::Scale { sx, sy, child } => {
                if sx.abs() > PREC && sy.abs() > PREC {
                    g.translate(x, y);
                    g.scale(*sx, *sy);
                    child.draw(g, 0.0, 0.0);
                    g.scale(1.0 / sx, 1.0 / sy);
                    g.translate(-x, -y);
                }
            }
            BoxKind::Rotate {
                angle,
                dx,
                dy,
                child,
            } => {
                g.translate(x + dx, y - dy);
                g.rotate(-angle);
                child.draw(g, 0.0, 0.0);
                g.rotate(*angle);
                g.translate(-(x + dx), -(y - dy));
            }
            BoxKind::Reflect(child) => {
                g.translate(x, y);
                g.reflect();
                child.draw(g, -child.width, 0.0);
                g.reflect();
                g.translate(-x, -y);
            }
            BoxKind::Frame {
                thickness,
                corner_radius,
                line,
                bg,
                child,
            } => {
                let th = thickness / 2.0;
                let old = g.color();
                if !is_transparent(*bg) {
                    g.set_color(*bg);
                    g.fill_rect(x + th, y - self.height + th, self.width - *thickness, self.vlen() - *thickness);
                    g.set_color(old);
                }
                if !is_transparent(*line) {
                    g.set_color(*line);
                }
                g.set_stroke_width(*thickness);
                if *corner_radius > 0.0 {
                    g.stroke_round_rect(
                        x + th,
                        y - self.height + th,
                        self.width - *thickness,
                        self.vlen() - *thickness,
                        *corner_radius,
                        *corner_radius,
                    );
                } else {
                    g.stroke_rect(
                        x + th,
                        y - self.height + th,
                        self.width - *thickness,
                        self.vlen() - *thickness,
                    );
                }
                g.set_color(old);
                child.draw(g, x + *thickness, y);
            }
            BoxKind::Debug(child) => {
                let old = g.color();
                g.set_color(0xff00_88ff);
                g.stroke_rect(x, y - self.height, self.width, self.vlen());
                g.draw_line(x, y, x + self.width, y);
                g.set_color(old);
                child.draw(g, x, y);
            }
        }
    }
}

/// A row of boxes laid end to end on a common baseline.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HBox {
    pub children: Vec<BoxNode>,
    width: f32,
    height: f32,
    depth: f32,
    /// Child indexes where a line break is legal.
    pub break_positions: Vec<usize>,
}

impl HBox {
    pub fn new() -> HBox {
        HBox::default()
    }

    pub fn from_box(b: BoxNode) -> HBox {
        let mut h = HBox::new();
        h.add(b);
        h
    }

    /// Wrap `b` in a row padded to `width` with the requested alignment.
    /// If `b` already fills the width (or the width is unbounded), the row
    /// holds just `b`.
    pub fn with_width(b: BoxNode, width: f32, alignment: crate::types::Alignment) -> HBox {
        use crate::types::Alignment;
        let mut h = HBox::new();
        if !width.is_finite() {
            h.add(b);
            return h;
        }
        let rest = width - b.width;
        if rest <= 0.0 {
            h.add(b);
            return h;
        }
        match alignment {
            Alignment::Center | Alignment::None => {
                h.add(BoxNode::strut(rest / 2.0, 0.0, 0.0));
                h.add(b);
                h.add(BoxNode::strut(rest / 2.0, 0.0, 0.0));
            }
            Alignment::Left => {
                h.add(b);
                h.add(BoxNode::strut(rest, 0.0, 0.0));
            }
            Alignment::Right => {
                h.add(BoxNode::strut(rest, 0.0, 0.0));
                h.add(b);
            }
            Alignment::Top | Alignment::Bottom => h.add(b),
        }
        h
    }

    fn recalculate(&mut self, b: &BoxNode) {
        self.width += b.width;
        let h = if self.children.is_empty() {
            f32::NEG_INFINITY
        } else {
            self.height
        };
        self.height = h.max(b.height - b.shift);
        let d = if self.children.is_empty() {
            f32::NEG_INFINITY
        } else {
            self.depth
        };
        self.depth = d.max(b.depth + b.shift);
    }

    pub fn add(&mut self, b: BoxNode) {
        self.recalculate(&b);
        self.children.push(b);
    }

    pub fn add_at(&mut self, pos: usize, b: BoxNode) {
        self.recalculate(&b);
        self.children.insert(pos, b);
    }

    pub fn add_break_position(&mut self) {
        self.break_positions.push(self.children.len());
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Split after child `pos`; with `remove` the child at `pos + 1` is
    /// dropped (used to discard the glue at a break).
    pub fn split(self, pos: usize, remove: bool) -> (HBox, HBox) {
        let shift = if remove { 2 } else { 1 };
        let mut first = HBox::new();
        let mut second = HBox::new();
        for (i, child) in self.children.into_iter().enumerate() {
            if i <= pos {
                first.add(child);
            } else if i >= pos + shift {
                second.add(child);
            }
        }
        for bp in &self.break_positions {
            if *bp >= pos + shift {
                second.break_positions.push(bp - pos - shift);
            }
        }
        (first, second)
    }

    pub fn into_node(self) -> BoxNode {
        BoxNode {
            width: self.width,
            height: if self.children.is_empty() { 0.0 } else { self.height },
            depth: if self.children.is_empty() { 0.0 } else { self.depth },
            shift: 0.0,
            class: AtomType::None,
            kind: BoxKind::HBox(self),
        }
    }

    fn draw(&self, g: &mut dyn Graphics2D, x: f32, y: f32) {
        let mut xpos = x;
        for child in &self.children {
            child.draw(g, xpos, y + child.shift);
            xpos += child.width;
        }
    }
}

/// Boxes stacked one above the other; the first child's baseline carries
/// the stack's height.
#[derive(Debug, Clone, PartialEq)]
pub struct VBox {
    pub children: Vec<BoxNode>,
    width: f32,
    height: f32,
    depth: f32,
    left_most: f32,
    right_most: f32,
}

impl Default for VBox {
    fn default() -> Self {
        VBox {
            children: Vec::new(),
            width: 0.0,
            height: 0.0,
            depth: 0.0,
            left_most: f32::MAX,
            right_most: f32::MIN,
        }
    }
}

impl VBox {
    pub fn new() -> VBox {
        VBox::default()
    }

    fn recalculate_width(&mut self, b: &BoxNode) {
        self.left_most = self.left_most.min(b.shift);
        self.right_most = self.right_most.max(b.shift + b.width.max(0.0));
        self.width = self.right_most - self.left_most;
    }

    pub fn add(&mut self, b: BoxNode) {
        if self.children.is_empty() {
            self.height = b.height;
            self.depth = b.depth;
        } else {
            self.depth += b.height + b.depth;
        }
        self.recalculate_width(&b);
        self.children.push(b);
    }

    pub fn add_with_interline(&mut self, b: BoxNode, interline: f32) {
        if !self.children.is_empty() {
            self.add(BoxNode::strut(0.0, interline, 0.0));
        }
        self.add(b);
    }

    /// Insert above all current children.
    pub fn add_first(&mut self, b: BoxNode) {
        if self.children.is_empty() {
            self.height = b.height;
            self.depth = b.depth;
        } else {
            self.depth += b.depth + self.height;
            self.height = b.height;
        }
        self.recalculate_width(&b);
        self.children.insert(0, b);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Override the baseline placement; fraction and script layout set the
    /// stack's height and depth explicitly.
    pub fn set_metrics(&mut self, height: f32, depth: f32) {
        self.height = height;
        self.depth = depth;
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn total_vlen(&self) -> f32 {
        self.children.iter().map(BoxNode::vlen).sum()
    }

    pub fn into_node(self) -> BoxNode {
        BoxNode {
            width: self.width.max(0.0),
            height: self.height,
            depth: self.depth,
            shift: 0.0,
            class: AtomType::None,
            kind: BoxKind::VBox(self),
        }
    }

    fn draw(&self, g: &mut dyn Graphics2D, x: f32, y: f32, height: f32) {
        let mut ypos = y - height;
        for b in &self.children {
            ypos += b.height;
            b.draw(g, x + b.shift - self.left_most.min(0.0), ypos);
            ypos += b.depth;
        }
    }
}

/// A box with a horizontal rule above it, with the given clearance.
pub fn over_bar(b: BoxNode, kern: f32, thickness: f32) -> BoxNode {
    let mut v = VBox::new();
    let width = b.width;
    v.add(BoxNode::strut(0.0, thickness, 0.0));
    v.add(BoxNode::rule(thickness, width, 0.0));
    v.add(BoxNode::strut(0.0, kern, 0.0));
    v.add(b);
    v.into_node()
}

pub fn color_box(child: BoxNode, fg: Color, bg: Color) -> BoxNode {
    BoxNode {
        width: child.width,
        height: child.height,
        depth: child.depth,
        shift: child.shift,
        class: child.class,
        kind: BoxKind::Color {
            fg,
            bg,
            child: Box::new(child),
        },
    }
}

pub fn scale_box(child: BoxNode, sx: f32, sy: f32) -> BoxNode {
    BoxNode {
        width: child.width * sx.abs(),
        height: if sy > 0.0 { child.height * sy } else { -child.depth * sy },
        depth: if sy > 0.0 { child.depth * sy } else { -child.height * sy },
        shift: child.shift * sy.abs(),
        class: child.class,
        kind: BoxKind::Scale {
            sx,
            sy,
            child: Box::new(child),
        },
    }
}

pub fn reflect_box(child: BoxNode) -> BoxNode {
    BoxNode {
        width: child.width,
        height: child.height,
        depth: child.depth,
        shift: child.shift,
        class: child.class,
        kind: BoxKind::Reflect(Box::new(child)),
    }
}

pub fn rotate_box(child: BoxNode, angle_deg: f32) -> BoxNode {
    let angle = angle_deg.to_radians();
    let (s, c) = angle.sin_cos();
    let h = child.height;
    let d = child.depth;
    let w = child.width;
    // Corners of the rotated bounding rectangle around the baseline origin.
    let xs = [0.0, w * c, -h * s, w * c - h * s, d * s, w * c + d * s];
    let ys = [0.0, w * s, h * c, w * s + h * c, -d * c, w * s - d * c];
    let xmin = xs.iter().cloned().fold(f32::MAX, f32::min);
    let xmax = xs.iter().cloned().fold(f32::MIN, f32::max);
    let ymin = ys.iter().cloned().fold(f32::MAX, f32::min);
    let ymax = ys.iter().cloned().fold(f32::MIN, f32::max);
    BoxNode {
        width: xmax - xmin,
        height: ymax.max(0.0),
        depth: (-ymin).max(0.0),
        shift: child.shift,
        class: child.class,
        kind: BoxKind::Rotate {
            angle,
            dx: -xmin,
            dy: 0.0,
            child: Box::new(child),
        },
    }
}

pub fn frame_box(child: BoxNode, thickness: f32, space: f32, line: Color, bg: Color, corner_radius: f32) -> BoxNode {
    BoxNode {
        width: child.width + 2.0 * (thickness + space),
        height: child.height + thickness + space,
        depth: child.depth + thickness + space,
        shift: child.shift,
        class: child.class,
        kind: BoxKind::Frame {
            thickness,
            corner_radius,
            line,
            bg,
            child: Box::new(child),
        },
    }
}

pub fn debug_box(child: BoxNode) -> BoxNode {
    BoxNode {
        width: child.width,
        height: child.height,
        depth: child.depth,
        shift: child.shift,
        class: child.class,
        kind: BoxKind::Debug(Box::new(child)),
    }
}

/// Recolor every rule box in a subtree; matrix cell specifiers use this.
pub fn tint_rules(node: &mut BoxNode, color: Color) {
    match &mut node.kind {
        BoxKind::Rule { color: c } => *c = color,
        BoxKind::HBox(h) => {
            for child in &mut h.children {
                tint_rules(child, color);
            }
        }
        BoxKind::VBox(v) => {
            for child in &mut v.children {
                tint_rules(child, color);
            }
        }
        BoxKind::Color { child, .. }
        | BoxKind::Scale { child, .. }
        | BoxKind::Rotate { child, .. }
        | BoxKind::Reflect(child)
        | BoxKind::Frame { child, .. }
        | BoxKind::Debug(child) => tint_rules(child, color),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::RecordingGraphics;

    #[test]
    fn hbox_metrics_accumulate() {
        let mut h = HBox::new();
        h.add(BoxNode::strut(1.0, 2.0, 0.5));
        h.add(BoxNode::strut(2.0, 1.0, 1.5));
        let n = h.into_node();
        assert_eq!(n.width, 3.0);
        assert_eq!(n.height, 2.0);
        assert_eq!(n.depth, 1.5);
    }

    #[test]
    fn hbox_shift_moves_metrics_not_size() {
        let mut h = HBox::new();
        let mut b = BoxNode::strut(1.0, 1.0, 0.0);
        b.shift = -0.5; // raised half an em
        h.add(b);
        let n = h.into_node();
        assert_eq!(n.height, 1.5);
        assert_eq!(n.depth, -0.5);
    }

    #[test]
    fn vbox_first_child_sets_baseline() {
        let mut v = VBox::new();
        v.add(BoxNode::strut(1.0, 0.6, 0.1));
        v.add(BoxNode::strut(2.0, 0.4, 0.2));
        let n = v.into_node();
        assert_eq!(n.height, 0.6);
        assert!((n.depth - 0.7).abs() < PREC);
        assert_eq!(n.width, 2.0);
    }

    #[test]
    fn hbox_split_partitions_children() {
        let mut h = HBox::new();
        for i in 0..5 {
            h.add(BoxNode::strut(i as f32 + 1.0, 0.0, 0.0));
        }
        h.break_positions = vec![2, 4];
        let (a, b) = h.split(1, false);
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 3);
        assert_eq!(b.break_positions, vec![0, 2]);
    }

    #[test]
    fn vbox_draw_advances_baselines() {
        let mut v = VBox::new();
        v.add(BoxNode::rule(0.1, 1.0, 0.0));
        v.add(BoxNode::rule(0.1, 1.0, 0.0));
        let n = v.into_node();
        let mut g = RecordingGraphics::new();
        n.draw(&mut g, 0.0, 0.0);
        assert_eq!(g.rule_count(), 2);
    }
}
