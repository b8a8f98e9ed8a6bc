//! Full-pipeline checks: LaTeX in, atoms and laid-out boxes out.

use boxtex::{Formula, RenderBuilder, parse};
use tex_layout::atoms::row::RowAtom;
use tex_layout::graphics::RecordingGraphics;
use tex_layout::{Atom, AtomType, Env, FontContext, TexStyle};

fn display_env() -> Env {
    Env::new(TexStyle::Display, FontContext::rule_font(), 20.0)
}

fn layout(f: &Formula) -> tex_layout::BoxNode {
    Atom::Row(f.root.clone()).create_box(&display_env())
}

#[test]
fn pythagoras_is_five_atoms_with_operator_glue() {
    let f = parse("x^2+y^2=r^2").unwrap();
    assert_eq!(f.root.len(), 5);
    assert!(matches!(f.root.elements[0], Atom::Scripts(_)));
    assert_eq!(f.root.elements[1].left_type(), AtomType::BinaryOperator);
    assert!(matches!(f.root.elements[2], Atom::Scripts(_)));
    assert_eq!(f.root.elements[3].left_type(), AtomType::Relation);
    assert!(matches!(f.root.elements[4], Atom::Scripts(_)));

    // the row is wider than its atoms alone: glue sits around + and =
    let env = display_env();
    let row = layout(&f);
    let atoms_only: f32 = f
        .root
        .elements
        .iter()
        .map(|a| a.create_box(&env).width)
        .sum();
    assert!(row.width > atoms_only + 1e-4);
}

#[test]
fn one_half_is_a_ruled_fraction_with_glyph_wide_parts() {
    let f = parse("\\frac{1}{2}").unwrap();
    assert_eq!(f.root.len(), 1);
    let Atom::Fraction(frac) = &f.root.elements[0] else {
        panic!("expected a fraction");
    };
    assert!(frac.rule);

    let env = display_env();
    let num = frac.num.create_box(&env.num_style());
    let one = env.num_style().get_char('1', true).unwrap();
    assert!((num.width - one.width()).abs() < 1e-4);
    let dnom = frac.dnom.create_box(&env.dnom_style());
    let two = env.dnom_style().get_char('2', true).unwrap();
    assert!((dnom.width - two.width()).abs() < 1e-4);
}

#[test]
fn sqrt_leaves_the_vertical_gap_above_the_radicand() {
    let f = parse("\\sqrt{x}").unwrap();
    let env = display_env();
    let root = layout(&f);
    let radicand = parse("x").unwrap().root.create_box(&env.cramp_style());
    let gap = env.consts().radical_display_style_vertical_gap * env.scale();
    assert!(root.height >= radicand.height + gap);
}

#[test]
fn two_by_two_matrix_has_four_cells() {
    let f = parse("\\begin{matrix}a&b\\\\c&d\\end{matrix}").unwrap();
    assert_eq!(f.root.len(), 1);
    let Atom::Matrix(m) = &f.root.elements[0] else {
        panic!("expected a matrix");
    };
    assert_eq!(m.grid.len(), 2);
    assert_eq!(m.grid[0].len(), 2);
    assert_eq!(m.grid[1].len(), 2);
    for row in &m.grid {
        for cell in row {
            assert!(!matches!(cell, Atom::Empty));
        }
    }
}

#[test]
fn display_math_inside_text() {
    let f = parse("\\text{area: $$x$$}").unwrap();
    let Atom::Row(r) = &f.root.elements[0] else {
        panic!("expected a row");
    };
    let Some(Atom::Style(s)) = r.elements.last() else {
        panic!("expected a style atom");
    };
    assert_eq!(s.style, TexStyle::Display);
}

#[test]
fn user_macro_matches_its_expansion() {
    let via_macro = parse("\\newcommand{\\half}{\\frac{1}{2}}\\half").unwrap();
    let direct = parse("\\frac{1}{2}").unwrap();
    assert_eq!(via_macro, direct);
    assert_eq!(layout(&via_macro), layout(&direct));
}

#[test]
fn rendered_formula_draws_every_glyph() {
    let f = parse("\\frac{a+b}{c}").unwrap();
    let r = RenderBuilder::new().text_size(24.0).build(&f).unwrap();
    let mut g = RecordingGraphics::new();
    r.draw(&mut g, 0.0, 0.0);
    let glyphs = g.glyphs();
    for c in ['a', '+', 'b', 'c'] {
        assert!(glyphs.contains(&c), "missing glyph {c:?}");
    }
}

#[test]
fn empty_input_still_renders() {
    let f = parse("").unwrap();
    assert!(f.is_empty());
    let r = RenderBuilder::new().text_size(20.0).build(&f).unwrap();
    assert!(r.width() >= 0);
}

#[test]
fn row_atom_survives_a_layout_reuse() {
    // the same formula laid out twice gives the same box tree
    let f = parse("\\sum_{i=0}^{n} i^2").unwrap();
    assert_eq!(layout(&f), layout(&f));
    let _ = RowAtom::from_atom(f.root.elements[0].clone());
}
