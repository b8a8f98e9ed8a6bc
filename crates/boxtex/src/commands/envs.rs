//! Array environments and their row-level commands.
//!
//! The rewriting pass turns `\begin{name}...\end{name}` into
//! `\name@env{...}`, so every handler here starts by consuming the brace
//! that opens the body.

use tex_layout::atoms::basic::TextAtom;
use tex_layout::atoms::delim::DelimitedAtom;
use tex_layout::atoms::matrix::{
    HlineAtom, InterTextAtom, MatrixKind, MultiColumnAtom,
};
use tex_layout::atoms::row::RowAtom;
use tex_layout::{Alignment, Atom, FontStyle};

use crate::error::{ParseErrKind, ParseError};
use crate::parser::Parser;

fn delimited(left: Option<char>, right: Option<char>, inner: Atom) -> Atom {
    Atom::Delimited(DelimitedAtom {
        left,
        right,
        base: RowAtom::from_atom(inner),
    })
}

fn plain_matrix(
    p: &mut Parser,
    cmd: &str,
    kind: MatrixKind,
    aligns: Vec<Alignment>,
) -> Result<Atom, ParseError> {
    p.expect_group_open(cmd)?;
    let m = p.parse_cells(kind, aligns)?;
    Ok(Atom::Matrix(m))
}

pub fn matrix(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    plain_matrix(p, "matrix", MatrixKind::Matrix, Vec::new()).map(Some)
}

pub fn pmatrix(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let m = plain_matrix(p, "pmatrix", MatrixKind::Matrix, Vec::new())?;
    Ok(Some(delimited(Some('('), Some(')'), m)))
}

pub fn bmatrix(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let m = plain_matrix(p, "bmatrix", MatrixKind::Matrix, Vec::new())?;
    Ok(Some(delimited(Some('['), Some(']'), m)))
}

pub fn bmatrix_cap(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let m = plain_matrix(p, "Bmatrix", MatrixKind::Matrix, Vec::new())?;
    Ok(Some(delimited(Some('{'), Some('}'), m)))
}

pub fn vmatrix(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let m = plain_matrix(p, "vmatrix", MatrixKind::Matrix, Vec::new())?;
    Ok(Some(delimited(Some('|'), Some('|'), m)))
}

pub fn vmatrix_cap(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let m = plain_matrix(p, "Vmatrix", MatrixKind::Matrix, Vec::new())?;
    Ok(Some(delimited(Some('‖'), Some('‖'), m)))
}

pub fn smallmatrix(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    plain_matrix(p, "smallmatrix", MatrixKind::SmallMatrix, Vec::new()).map(Some)
}

pub fn cases(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let m = plain_matrix(p, "cases", MatrixKind::Cases, Vec::new())?;
    Ok(Some(delimited(Some('{'), None, m)))
}

/// Alternating right/left columns, the amsmath `aligned` convention.
fn alternating() -> Vec<Alignment> {
    (0..10)
        .map(|i| {
            if i % 2 == 0 {
                Alignment::Right
            } else {
                Alignment::Left
            }
        })
        .collect()
}

pub fn aligned(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    plain_matrix(p, "aligned", MatrixKind::Aligned, alternating()).map(Some)
}

pub fn gathered(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    plain_matrix(p, "gathered", MatrixKind::Aligned, vec![Alignment::Center]).map(Some)
}

/// `\begin{array}{l|cr}...`: the column specifier is the first group of
/// the body.
pub fn array(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    p.expect_group_open("array")?;
    let spec = p.get_group("array")?;
    let mut aligns = Vec::new();
    for c in spec.chars() {
        match c {
            'l' => aligns.push(Alignment::Left),
            'c' => aligns.push(Alignment::Center),
            'r' => aligns.push(Alignment::Right),
            '|' | ' ' => {}
            _ => {
                return Err(ParseError(
                    pos,
                    ParseErrKind::UnknownCommand(spec.clone()),
                ));
            }
        }
    }
    let m = p.parse_cells(MatrixKind::Array, aligns)?;
    Ok(Some(Atom::Matrix(m)))
}

pub fn hline(_p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    Ok(Some(Atom::Hline(HlineAtom)))
}

pub fn intertext(p: &mut Parser, _pos: usize) -> Result<Option<Atom>, ParseError> {
    let content = p.get_group("intertext")?;
    Ok(Some(Atom::InterText(InterTextAtom {
        content: Box::new(Atom::Text(TextAtom {
            content,
            style: FontStyle::RM,
        })),
    })))
}

/// `\multicolumn{n}{align}{content}`.
pub fn multicolumn(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let span_text = p.get_group("multicolumn")?;
    let span = span_text
        .trim()
        .parse::<usize>()
        .map_err(|_| ParseError(pos, ParseErrKind::ExpectedNumber(span_text)))?;
    let align = match p.get_group("multicolumn")?.trim() {
        "l" => Alignment::Left,
        "r" => Alignment::Right,
        _ => Alignment::Center,
    };
    let content = p.parse_required("multicolumn")?;
    Ok(Some(Atom::MultiColumn(MultiColumnAtom {
        span,
        align,
        content: Box::new(content),
    })))
}

pub fn rowcolor(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let spec = p.get_group("rowcolor")?;
    p.pending_row_color = Some(super::colors::color_from(pos, &spec)?);
    Ok(None)
}

pub fn cellcolor(p: &mut Parser, pos: usize) -> Result<Option<Atom>, ParseError> {
    let spec = p.get_group("cellcolor")?;
    p.pending_cell_color = Some(super::colors::color_from(pos, &spec)?);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use crate::formula::Formula;
    use crate::parser::parse_with;
    use crate::registry::MacroRegistry;
    use tex_layout::atoms::matrix::MatrixKind;
    use tex_layout::{Alignment, Atom};

    fn parse(s: &str) -> Formula {
        parse_with(s, MacroRegistry::new(), false).unwrap()
    }

    #[test]
    fn pmatrix_builds_a_delimited_grid() {
        let f = parse("\\begin{pmatrix} a & b \\\\ c & d \\end{pmatrix}");
        assert_eq!(f.root.len(), 1);
        let Atom::Delimited(d) = &f.root.elements[0] else {
            panic!("expected delimited");
        };
        assert_eq!(d.left, Some('('));
        let Atom::Matrix(m) = &d.base.elements[0] else {
            panic!("expected matrix inside");
        };
        assert_eq!(m.grid.len(), 2);
        assert_eq!(m.grid[0].len(), 2);
    }

    #[test]
    fn jagged_matrix_rows_are_padded() {
        let f = parse("\\begin{matrix} a & b \\\\ c \\end{matrix}");
        let Atom::Matrix(m) = &f.root.elements[0] else {
            panic!("expected matrix");
        };
        assert_eq!(m.grid[1].len(), 2);
        assert!(matches!(m.grid[1][1], Atom::Empty));
    }

    #[test]
    fn cases_opens_with_a_brace_only() {
        let f = parse("\\begin{cases} x & x > 0 \\\\ 0 & x \\le 0 \\end{cases}");
        let Atom::Delimited(d) = &f.root.elements[0] else {
            panic!("expected delimited");
        };
        assert_eq!(d.left, Some('{'));
        assert_eq!(d.right, None);
    }

    #[test]
    fn array_reads_its_column_spec() {
        let f = parse("\\begin{array}{lr} a & b \\end{array}");
        let Atom::Matrix(m) = &f.root.elements[0] else {
            panic!("expected matrix");
        };
        assert_eq!(m.kind, MatrixKind::Array);
        assert_eq!(m.col_aligns[0], Alignment::Left);
        assert_eq!(m.col_aligns[1], Alignment::Right);
    }

    #[test]
    fn hline_becomes_its_own_row() {
        let f = parse("\\begin{matrix} a \\\\ \\hline b \\end{matrix}");
        let Atom::Matrix(m) = &f.root.elements[0] else {
            panic!("expected matrix");
        };
        assert_eq!(m.grid.len(), 3);
        assert!(matches!(m.grid[1][0], Atom::Hline(_)));
    }

    #[test]
    fn nested_environments_keep_their_nesting() {
        let f = parse(
            "\\begin{pmatrix} \\begin{matrix} a \\end{matrix} & b \\end{pmatrix}",
        );
        let Atom::Delimited(d) = &f.root.elements[0] else {
            panic!("expected delimited");
        };
        let Atom::Matrix(outer) = &d.base.elements[0] else {
            panic!("expected matrix");
        };
        assert!(matches!(outer.grid[0][0], Atom::Matrix(_)));
    }

    #[test]
    fn rowcolor_lands_in_the_color_map() {
        let f = parse("\\begin{matrix} \\rowcolor{red} a \\\\ b \\end{matrix}");
        let Atom::Matrix(m) = &f.root.elements[0] else {
            panic!("expected matrix");
        };
        assert!(m.row_colors.contains_key(&0));
    }

    #[test]
    fn multicolumn_spans() {
        let f = parse(
            "\\begin{matrix} \\multicolumn{2}{c}{x} \\\\ a & b \\end{matrix}",
        );
        let Atom::Matrix(m) = &f.root.elements[0] else {
            panic!("expected matrix");
        };
        let Atom::MultiColumn(mc) = &m.grid[0][0] else {
            panic!("expected multicolumn");
        };
        assert_eq!(mc.span, 2);
    }
}
