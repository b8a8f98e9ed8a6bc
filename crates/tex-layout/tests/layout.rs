//! Atom-to-box integration: whole trees laid out and drawn with the
//! recording backend.

use tex_layout::atoms::basic::{CharAtom, SymbolAtom};
use tex_layout::atoms::frac::FractionAtom;
use tex_layout::atoms::row::RowAtom;
use tex_layout::atoms::scripts::ScriptsAtom;
use tex_layout::atoms::wrappers::{ColorAtom, PhantomAtom};
use tex_layout::graphics::{DrawOp, RED, RecordingGraphics, TRANSPARENT};
use tex_layout::{Atom, AtomType, Env, FontContext, Graphics2D, TexStyle};

fn env() -> Env {
    Env::new(TexStyle::Display, FontContext::rule_font(), 1.0)
}

fn chr(c: char) -> Atom {
    Atom::Char(CharAtom::new(c, true))
}

fn draw(atom: &Atom) -> RecordingGraphics {
    let b = atom.create_box(&env());
    let mut g = RecordingGraphics::new();
    b.draw(&mut g, 0.0, 0.0);
    g
}

#[test]
fn fraction_stacks_and_rules() {
    let frac = Atom::Fraction(FractionAtom::new(chr('1'), chr('2'), true));
    let env = env();
    let b = frac.create_box(&env);
    let one = chr('1').create_box(&env.num_style());
    let two = chr('2').create_box(&env.dnom_style());
    assert!(b.height > one.height);
    assert!(b.depth > two.depth);

    let g = draw(&frac);
    assert_eq!(g.glyphs(), vec!['1', '2']);
    assert!(g.rule_count() >= 1, "fraction bar missing");
}

#[test]
fn ruleless_fraction_draws_no_bar() {
    let frac = Atom::Fraction(FractionAtom::new(chr('1'), chr('2'), false));
    assert_eq!(draw(&frac).rule_count(), 0);
}

#[test]
fn superscript_raises_and_shrinks() {
    let scripted = Atom::Scripts(ScriptsAtom::new(Some(chr('x')), None, Some(chr('2'))));
    let env = env();
    let b = scripted.create_box(&env);
    let base = chr('x').create_box(&env);
    assert!(b.height > base.height);
    assert!((b.depth - base.depth).abs() < 1e-4);

    let g = draw(&scripted);
    let sup_scale = g
        .ops
        .iter()
        .find_map(|op| match op {
            DrawOp::Glyph { code: '2', scale, .. } => Some(*scale),
            _ => None,
        })
        .expect("superscript glyph");
    let base_scale = g
        .ops
        .iter()
        .find_map(|op| match op {
            DrawOp::Glyph { code: 'x', scale, .. } => Some(*scale),
            _ => None,
        })
        .expect("base glyph");
    assert!(sup_scale < base_scale);
}

#[test]
fn binary_operators_get_medium_glue() {
    let mut plain = RowAtom::new();
    plain.add(chr('a'));
    plain.add(chr('b'));
    let mut with_op = RowAtom::new();
    with_op.add(chr('a'));
    with_op.add(Atom::Symbol(SymbolAtom::new('+', AtomType::BinaryOperator)));
    with_op.add(chr('b'));

    let env = env();
    let bare = plain.create_box(&env).width;
    let spaced = with_op.create_box(&env).width;
    let plus = Atom::Symbol(SymbolAtom::new('+', AtomType::BinaryOperator))
        .create_box(&env)
        .width;
    // two medium glues on top of the operator itself
    assert!(spaced > bare + plus + 1e-4);
}

#[test]
fn script_styles_drop_the_binary_glue() {
    let mut row = RowAtom::new();
    row.add(chr('a'));
    row.add(Atom::Symbol(SymbolAtom::new('+', AtomType::BinaryOperator)));
    row.add(chr('b'));
    let display = row.create_box(&env());
    let script = row.create_box(&env().forced_style(TexStyle::Script));
    // in script style the bin/rel glue table entries are zero
    assert!(display.width / display.height > script.width / script.height);
}

#[test]
fn color_wrapping_sets_and_restores() {
    let colored = Atom::Color(ColorAtom {
        base: Box::new(chr('x')),
        fg: RED,
        bg: TRANSPARENT,
    });
    let g = draw(&colored);
    assert!(g.ops.contains(&DrawOp::SetColor(RED)));
    assert_eq!(g.color(), tex_layout::graphics::BLACK);
}

#[test]
fn phantom_takes_space_but_draws_nothing() {
    let phantom = Atom::Phantom(PhantomAtom::full(chr('x')));
    let env = env();
    let visible = chr('x').create_box(&env);
    let ghost = phantom.create_box(&env);
    assert!((ghost.width - visible.width).abs() < 1e-4);
    assert!((ghost.height - visible.height).abs() < 1e-4);
    assert!(draw(&phantom).glyphs().is_empty());
}
