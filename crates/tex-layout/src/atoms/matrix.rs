//! Array and matrix layout.

use rustc_hash::FxHashMap;

use crate::atom::Atom;
use crate::boxes::{BoxNode, HBox, VBox, color_box};
use crate::env::Env;
use crate::graphics::{Color, TRANSPARENT};
use crate::style::TexStyle;
use crate::types::{Alignment, UnitType};

/// Which environment produced the grid; decides styles and separations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixKind {
    #[default]
    Matrix,
    Array,
    Aligned,
    Cases,
    SmallMatrix,
}

/// A cell spanning several columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiColumnAtom {
    pub span: usize,
    pub align: Alignment,
    pub content: Box<Atom>,
}

/// A horizontal rule across the whole grid, standing in for a row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HlineAtom;

impl HlineAtom {
    pub fn create_box(&self, env: &Env) -> BoxNode {
        BoxNode::rule(env.rule_thickness(), 0.0, 0.0)
    }
}

/// A full-width interjected text row (`\intertext`); exempt from column
/// normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct InterTextAtom {
    pub content: Box<Atom>,
}

/// A rectangular grid of cells. The grid arrives normalized (every
/// non-intertext row padded to the column count); layout measures column
/// widths and row extents, pads cells per column alignment and centers
/// the whole block on the math axis.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixAtom {
    pub grid: Vec<Vec<Atom>>,
    pub col_aligns: Vec<Alignment>,
    pub kind: MatrixKind,
    /// Background per row index.
    pub row_colors: FxHashMap<usize, Color>,
    /// Background per (row, column).
    pub cell_colors: FxHashMap<(usize, usize), Color>,
}

impl MatrixAtom {
    pub fn new(grid: Vec<Vec<Atom>>, col_aligns: Vec<Alignment>, kind: MatrixKind) -> Self {
        MatrixAtom {
            grid,
            col_aligns,
            kind,
            row_colors: FxHashMap::default(),
            cell_colors: FxHashMap::default(),
        }
    }

    fn cell_env(&self, env: &Env) -> Env {
        match self.kind {
            MatrixKind::SmallMatrix => env.forced_style(TexStyle::Script),
            MatrixKind::Aligned => env.forced_style(TexStyle::Display),
            _ => env.forced_style(TexStyle::Text),
        }
    }

    fn col_sep(&self, env: &Env) -> f32 {
        match self.kind {
            MatrixKind::SmallMatrix => env.quad() / 3.0,
            MatrixKind::Aligned => 0.0,
            _ => env.quad(),
        }
    }

    fn row_sep(&self, env: &Env) -> f32 {
        let base = env.length_to_em(UnitType::Ex, 1.0);
        match self.kind {
            MatrixKind::SmallMatrix => base / 2.0,
            _ => base,
        }
    }

    fn col_align(&self, col: usize) -> Alignment {
        match self.col_aligns.get(col) {
            Some(Alignment::None) | None => match self.kind {
                MatrixKind::Cases | MatrixKind::Array => Alignment::Left,
                _ => Alignment::Center,
            },
            Some(a) => *a,
        }
    }

    pub fn columns(&self) -> usize {
        self.grid
            .iter()
            .filter(|r| !row_is_special(r))
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let cell_env = self.cell_env(env);
        let cols = self.columns();
        if cols == 0 {
            return BoxNode::empty();
        }
        let col_sep = self.col_sep(env);
        let row_sep = self.row_sep(env);

        // first pass: boxes and column widths
        enum Row {
            Hline,
            InterText(BoxNode),
            Cells(Vec<(BoxNode, usize, Alignment)>),
        }
        let mut rows: Vec<Row> = Vec::new();
        let mut col_widths = vec![0.0f32; cols];
        for (r, row) in self.grid.iter().enumerate() {
            if row.first().is_some_and(|a| matches!(a, Atom::Hline(_))) {
                rows.push(Row::Hline);
                continue;
            }
            if let Some(Atom::InterText(t)) = row.first()
                && row.len() == 1
            {
                rows.push(Row::InterText(t.content.create_box(env)));
                continue;
            }
            let mut cells = Vec::with_capacity(row.len());
            let mut col = 0usize;
            for (ci, cell) in row.iter().enumerate() {
                let (b, span, align) = match cell {
                    Atom::MultiColumn(mc) => (
                        mc.content.create_box(&cell_env),
                        mc.span.max(1),
                        mc.align,
                    ),
                    a => (a.create_box(&cell_env), 1, self.col_align(col)),
                };
                let b = match self.cell_colors.get(&(r, ci)) {
                    Some(bg) => color_box(b, TRANSPARENT, *bg),
                    None => b,
                };
                if span == 1 && col < cols {
                    col_widths[col] = col_widths[col].max(b.width);
                }
                cells.push((b, span, align));
                col += span;
            }
            rows.push(Row::Cells(cells));
        }

        // widen columns under over-full multicolumn cells
        for row in &rows {
            if let Row::Cells(cells) = row {
                let mut col = 0usize;
                for (b, span, _) in cells {
                    if *span > 1 && col + span <= cols {
                        let have: f32 = col_widths[col..col + span].iter().sum::<f32>()
                            + col_sep * (*span as f32 - 1.0);
                        if b.width > have {
                            col_widths[col + span - 1] += b.width - have;
                        }
                    }
                    col += span;
                }
            }
        }

        let total_width: f32 =
            col_widths.iter().sum::<f32>() + col_sep * (cols.saturating_sub(1)) as f32;

        // second pass: assemble
        let mut v = VBox::new();
        let mut first = true;
        for (r, row) in rows.into_iter().enumerate() {
            match row {
                Row::Hline => {
                    let sep = if first { 0.0 } else { row_sep / 2.0 };
                    if sep > 0.0 {
                        v.add(BoxNode::strut(0.0, sep, 0.0));
                    }
                    v.add(BoxNode::rule(env.rule_thickness(), total_width, 0.0));
                    if !first {
                        v.add(BoxNode::strut(0.0, row_sep / 2.0, 0.0));
                    }
                }
                Row::InterText(b) => {
                    let h = HBox::with_width(b, total_width, Alignment::Left);
                    v.add_with_interline(h.into_node(), if first { 0.0 } else { row_sep });
                    first = false;
                }
                Row::Cells(cells) => {
                    let mut h = HBox::new();
                    let mut col = 0usize;
                    for (i, (b, span, align)) in cells.into_iter().enumerate() {
                        if i > 0 {
                            h.add(BoxNode::strut(col_sep, 0.0, 0.0));
                        }
                        let width = if col + span <= cols {
                            col_widths[col..col + span].iter().sum::<f32>()
                                + col_sep * (span as f32 - 1.0)
                        } else {
                            b.width
                        };
                        h.add(HBox::with_width(b, width, align).into_node());
                        col += span;
                    }
                    let mut node = h.into_node();
                    if let Some(bg) = self.row_colors.get(&r) {
                        node = color_box(node, TRANSPARENT, *bg);
                    }
                    v.add_with_interline(node, if first { 0.0 } else { row_sep });
                    first = false;
                }
            }
        }

        // center the block on the axis
        let mut node = v.into_node();
        let vlen = node.vlen();
        node.height = vlen / 2.0 + env.axis_height();
        node.depth = vlen - node.height;
        node
    }
}

fn row_is_special(row: &[Atom]) -> bool {
    matches!(row.first(), Some(Atom::Hline(_)))
        || (row.len() == 1 && matches!(row.first(), Some(Atom::InterText(_))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::basic::CharAtom;
    use crate::atoms::row::RowAtom;
    use crate::font::FontContext;

    fn env() -> Env {
        Env::new(TexStyle::Display, FontContext::rule_font(), 10.0)
    }

    fn cell(s: &str) -> Atom {
        let mut r = RowAtom::new();
        r.breakable = false;
        for c in s.chars() {
            r.add(Atom::Char(CharAtom::new(c, true)));
        }
        Atom::Row(r)
    }

    fn grid(cells: &[&[&str]]) -> Vec<Vec<Atom>> {
        cells
            .iter()
            .map(|row| row.iter().map(|c| cell(c)).collect())
            .collect()
    }

    #[test]
    fn columns_align_to_widest_cell() {
        let e = env();
        let m = MatrixAtom::new(
            grid(&[&["a", "bbb"], &["cc", "d"]]),
            vec![],
            MatrixKind::Matrix,
        );
        let wide = m.create_box(&e);
        let n = MatrixAtom::new(grid(&[&["a", "b"], &["c", "d"]]), vec![], MatrixKind::Matrix);
        assert!(wide.width > n.create_box(&e).width);
    }

    #[test]
    fn matrix_centers_on_axis() {
        let e = env();
        let m = MatrixAtom::new(
            grid(&[&["a"], &["b"], &["c"]]),
            vec![],
            MatrixKind::Matrix,
        );
        let b = m.create_box(&e);
        let axis = e.axis_height();
        assert!((b.height - axis - (b.depth + axis)).abs() < 1e-5);
    }

    #[test]
    fn smallmatrix_is_smaller() {
        let e = env();
        let g = grid(&[&["a", "b"], &["c", "d"]]);
        let small = MatrixAtom::new(g.clone(), vec![], MatrixKind::SmallMatrix).create_box(&e);
        let normal = MatrixAtom::new(g, vec![], MatrixKind::Matrix).create_box(&e);
        assert!(small.width < normal.width);
        assert!(small.vlen() < normal.vlen());
    }

    #[test]
    fn hline_row_spans_the_grid() {
        use crate::boxes::BoxKind;
        let e = env();
        let mut g = grid(&[&["a", "b"], &["c", "d"]]);
        g.insert(1, vec![Atom::Hline(HlineAtom)]);
        let m = MatrixAtom::new(g, vec![], MatrixKind::Array);
        let b = m.create_box(&e);
        let BoxKind::VBox(v) = &b.kind else {
            panic!("expected a vbox")
        };
        let rule = v
            .children
            .iter()
            .find(|c| matches!(c.kind, BoxKind::Rule { .. }))
            .expect("rule row");
        assert!((rule.width - b.width).abs() < 1e-6);
    }

    #[test]
    fn multicolumn_spans_and_centers() {
        let e = env();
        let mut g = grid(&[&["a", "b"]]);
        g.push(vec![Atom::MultiColumn(MultiColumnAtom {
            span: 2,
            align: Alignment::Center,
            content: Box::new(cell("x")),
        })]);
        let m = MatrixAtom::new(g, vec![], MatrixKind::Matrix);
        let two_rows = m.create_box(&e);
        let one_row =
            MatrixAtom::new(grid(&[&["a", "b"]]), vec![], MatrixKind::Matrix).create_box(&e);
        assert!((two_rows.width - one_row.width).abs() < 1e-6);
    }

    #[test]
    fn jagged_rows_tolerated() {
        let e = env();
        let m = MatrixAtom::new(grid(&[&["a", "b"], &["c"]]), vec![], MatrixKind::Matrix);
        let b = m.create_box(&e);
        assert!(b.width > 0.0);
    }
}
