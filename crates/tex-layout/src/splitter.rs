//! Line splitting: re-flows a laid-out row into a stack of lines.

use crate::boxes::{BoxKind, BoxNode, HBox, VBox};

/// Break a finished row into lines no wider than `width`, breaking only at
/// the positions row layout recorded. Lines are stacked with `line_space`
/// between baselines. A segment with no break position left keeps its
/// overflow; splitting never fails.
pub fn split(node: BoxNode, width: f32, line_space: f32) -> BoxNode {
    if !width.is_finite() || node.width <= width {
        return node;
    }
    let BoxKind::HBox(hbox) = node.kind else {
        return node;
    };
    if hbox.break_positions.is_empty() {
        return BoxNode {
            kind: BoxKind::HBox(hbox),
            ..node
        };
    }

    let mut v = VBox::new();
    let mut rest = hbox;
    loop {
        match break_index(&rest, width) {
            Some(pos) => {
                // drop the glue that carried the break
                let (line, tail) = if pos > 0 && rest.children[pos].is_space() {
                    rest.split(pos - 1, true)
                } else {
                    rest.split(pos, false)
                };
                v.add_with_interline(line.into_node(), line_space);
                rest = tail;
                if rest.is_empty() {
                    break;
                }
            }
            None => {
                v.add_with_interline(rest.into_node(), line_space);
                break;
            }
        }
    }
    v.into_node()
}

/// The child index to split after: the last break position whose prefix
/// still fits, or the first one when even that overflows. `None` when the
/// remainder fits or has no break position.
fn break_index(h: &HBox, width: f32) -> Option<usize> {
    if h.width() <= width || h.break_positions.is_empty() {
        return None;
    }
    let mut prefix = 0.0f32;
    let mut widths = Vec::with_capacity(h.children.len() + 1);
    widths.push(0.0);
    for child in &h.children {
        prefix += child.width;
        widths.push(prefix);
    }
    let fitting = h
        .break_positions
        .iter()
        .copied()
        .filter(|&bp| bp > 0 && widths[bp] <= width)
        .next_back();
    let bp = fitting.or_else(|| h.break_positions.iter().copied().find(|&bp| bp > 0))?;
    Some(bp - 1)
}
