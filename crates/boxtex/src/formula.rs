//! Parsed formulas: a flat row for ordinary input, a growing grid for
//! array environments.

use rustc_hash::FxHashMap;
use tex_layout::atoms::matrix::{MatrixAtom, MatrixKind};
use tex_layout::atoms::row::RowAtom;
use tex_layout::{Alignment, Atom, Color};

/// The result of parsing: a row of atoms ready for layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Formula {
    pub root: RowAtom,
}

impl Formula {
    pub fn new() -> Self {
        Formula::default()
    }

    pub fn from_row(root: RowAtom) -> Self {
        Formula { root }
    }

    pub fn from_atom(atom: Atom) -> Self {
        Formula {
            root: RowAtom::from_atom(atom),
        }
    }

    /// Appends an atom; rows are spliced in flat.
    pub fn add(&mut self, atom: Atom) {
        match atom {
            Atom::Row(r) => self.root.elements.extend(r.elements),
            a => self.root.add(a),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn into_atom(self) -> Atom {
        Atom::Row(self.root)
    }
}

/// A grid under construction while an array environment parses. Cells
/// arrive left to right through [`new_cell`](Self::new_cell) and rows end
/// with [`new_row`](Self::new_row); rules and intertext rows stand alone
/// and are exempt from column padding.
#[derive(Debug, Clone, Default)]
pub struct ArrayFormula {
    rows: Vec<Vec<Atom>>,
    current: Vec<Atom>,
    pub row_colors: FxHashMap<usize, Color>,
    pub cell_colors: FxHashMap<(usize, usize), Color>,
}

fn is_special_row(row: &[Atom]) -> bool {
    matches!(row.first(), Some(Atom::Hline(_)) | Some(Atom::InterText(_))) && row.len() == 1
}

impl ArrayFormula {
    pub fn new() -> Self {
        ArrayFormula::default()
    }

    /// The row index the next cell lands in.
    pub fn row_index(&self) -> usize {
        self.rows.len()
    }

    /// The column index the next cell lands in.
    pub fn col_index(&self) -> usize {
        self.current.len()
    }

    /// Closed row count, not counting the row under construction.
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// The widest ordinary row so far.
    pub fn cols(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| !is_special_row(r))
            .map(Vec::len)
            .max()
            .unwrap_or(0)
    }

    pub fn new_cell(&mut self, cell: Atom) {
        self.current.push(cell);
    }

    /// Pushes a row that takes the place of a full line, like `\hline`.
    pub fn special_row(&mut self, atom: Atom) {
        // a rule between cells closes the pending row first
        if !self.current.is_empty() {
            self.new_row();
        }
        self.rows.push(vec![atom]);
    }

    pub fn new_row(&mut self) {
        self.rows.push(std::mem::take(&mut self.current));
    }

    /// Pads every ordinary row to the widest column count with empty cells
    /// and drops a trailing empty row left by a final `\\`.
    pub fn check_dimensions(&mut self) {
        if !self.current.is_empty() {
            self.new_row();
        }
        if self
            .rows
            .last()
            .is_some_and(|r| r.iter().all(|a| matches!(a, Atom::Empty)))
        {
            self.rows.pop();
        }
        let cols = self
            .rows
            .iter()
            .filter(|r| !is_special_row(r))
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        for row in &mut self.rows {
            if !is_special_row(row) {
                while row.len() < cols {
                    row.push(Atom::Empty);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.current.is_empty()
    }

    pub fn into_matrix(mut self, col_aligns: Vec<Alignment>, kind: MatrixKind) -> MatrixAtom {
        self.check_dimensions();
        let mut m = MatrixAtom::new(self.rows, col_aligns, kind);
        m.row_colors = self.row_colors;
        m.cell_colors = self.cell_colors;
        m
    }
}
