//! Horizontal aggregation: the row atom and its glue, ligature and
//! break-point pass.

use crate::atom::Atom;
use crate::atoms::basic::FixedCharAtom;
use crate::boxes::{BoxNode, HBox, PREC};
use crate::env::Env;
use crate::glue;
use crate::types::AtomType;

/// A sequence of atoms on one baseline. `create_box` runs the TeXBook
/// spacing pass: binary operators demote to ordinary where no operand
/// precedes or follows, glue is inserted from the class pair table,
/// adjacent character symbols are checked for ligatures and kern pairs,
/// and legal break points are recorded on the resulting HBox.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowAtom {
    pub elements: Vec<Atom>,
    /// Rows inside scripts or fractions never break.
    pub breakable: bool,
    /// Set on the formula root so trailing scripts attach to the last
    /// atom instead of the whole row.
    pub look_at_last: bool,
    /// Records a break point before every element.
    pub break_everywhere: bool,
}

/// Right classes after which a following binary operator loses its
/// operand and demotes to ordinary.
fn demotes_following_bin(t: AtomType) -> bool {
    matches!(
        t,
        AtomType::BinaryOperator
            | AtomType::BigOperator
            | AtomType::Relation
            | AtomType::Opening
            | AtomType::Punctuation
    )
}

/// Left classes that may form a ligature or kern pair with a preceding
/// ordinary character.
fn lig_kern_class(t: AtomType) -> bool {
    matches!(
        t,
        AtomType::Ordinary
            | AtomType::BigOperator
            | AtomType::BinaryOperator
            | AtomType::Relation
            | AtomType::Opening
            | AtomType::Closing
            | AtomType::Punctuation
    )
}

impl RowAtom {
    pub fn new() -> RowAtom {
        RowAtom {
            breakable: true,
            ..RowAtom::default()
        }
    }

    /// A row around one atom; an inner row is flattened instead of nested.
    pub fn from_atom(atom: Atom) -> RowAtom {
        let mut row = RowAtom::new();
        match atom {
            Atom::Row(inner) => row.elements = inner.elements,
            other => row.elements.push(other),
        }
        row
    }

    pub fn add(&mut self, atom: Atom) {
        self.elements.push(atom);
    }

    pub fn pop_last(&mut self) -> Option<Atom> {
        self.elements.pop()
    }

    pub fn last(&self) -> Option<&Atom> {
        self.elements.last()
    }

    pub fn last_mut(&mut self) -> Option<&mut Atom> {
        self.elements.last_mut()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn left_type(&self) -> AtomType {
        self.elements
            .first()
            .map_or(AtomType::Ordinary, |a| a.left_type().folded())
    }

    pub fn right_type(&self) -> AtomType {
        self.elements
            .last()
            .map_or(AtomType::Ordinary, |a| a.right_type().folded())
    }

    /// Effective class of each element after BIN demotion.
    fn effective_types(&self) -> Vec<(AtomType, AtomType)> {
        let mut types: Vec<(AtomType, AtomType)> = self
            .elements
            .iter()
            .map(|a| (a.left_type(), a.right_type()))
            .collect();
        let real: Vec<usize> = (0..types.len())
            .filter(|&i| !self.elements[i].is_kern())
            .collect();
        for (k, &i) in real.iter().enumerate() {
            let prev_right = if k == 0 { None } else { Some(types[real[k - 1]].1) };
            let next_left = real.get(k + 1).map(|&j| types[j].0);
            if types[i].0 == AtomType::BinaryOperator
                && (prev_right.is_none_or(demotes_following_bin) || next_left.is_none())
            {
                types[i] = (AtomType::Ordinary, AtomType::Ordinary);
            } else if types[i].1 == AtomType::BinaryOperator
                && matches!(
                    next_left,
                    Some(AtomType::Relation | AtomType::Closing | AtomType::Punctuation)
                )
            {
                types[i] = (AtomType::Ordinary, AtomType::Ordinary);
            }
        }
        types
    }

    pub fn create_box(&self, env: &Env) -> BoxNode {
        let mut env = env.clone();
        let types = self.effective_types();
        let mut hbox = HBox::new();
        let mut prev_right: Option<AtomType> = None;
        // a bin or rel atom legalizes a break before whatever follows it
        let mut after_bin_rel = false;

        let mut i = 0usize;
        while i < self.elements.len() {
            // swallow break marks, remember that one was seen
            let mut mark_seen = false;
            while matches!(self.elements[i], Atom::Break) {
                mark_seen = true;
                i += 1;
                if i == self.elements.len() {
                    break;
                }
            }
            if i == self.elements.len() {
                break;
            }

            let atom = &self.elements[i];
            let (left, right) = types[i];

            // ligature and kern lookahead over adjacent character symbols
            let mut lig: Option<FixedCharAtom> = None;
            let mut kern = 0.0f32;
            if right == AtomType::Ordinary && atom.is_char_symbol() {
                let mut cur = atom.char_symbol(&env);
                let mut j = i;
                while let (Some(l), Some(next)) = (cur, self.elements.get(j + 1)) {
                    if !next.is_char_symbol() || !lig_kern_class(types[j + 1].0) {
                        break;
                    }
                    let Some(r) = next.char_symbol(&env) else { break };
                    match env.fc().math().ligature(&l.char_font(), &r.char_font()) {
                        Some(code) => {
                            let merged = FixedCharAtom {
                                code,
                                style: l.style,
                            };
                            cur = merged.resolve(&env);
                            lig = Some(merged);
                            j += 1;
                        }
                        None => {
                            kern = env.fc().math().kern(&l.char_font(), &r.char_font())
                                * env.scale();
                            break;
                        }
                    }
                }
                i = j;
            }

            // glue between consecutive atoms, never next to explicit kerns
            if let Some(pr) = prev_right
                && !atom.is_kern()
            {
                hbox.add(glue::between(pr, left, &env));
            }

            let mut b = match &lig {
                Some(fixed) => fixed.create_box(&env),
                None => atom.create_box(&env),
            };

            // a text-mode char squeezed between symbols needs its
            // italic correction back
            if atom.is_char_symbol()
                && lig.is_none()
                && !matches!(atom, Atom::Char(c) if c.math_mode)
                && self
                    .elements
                    .get(i + 1)
                    .is_some_and(Atom::is_char_symbol)
            {
                b.add_italic_correction();
            }

            if self.breakable
                && (self.break_everywhere
                    || mark_seen
                    || after_bin_rel
                    || matches!(atom, Atom::Char(c) if c.code.is_ascii_digit()))
            {
                hbox.add_break_position();
            }

            if let Some(ch) = atom.char_symbol(&env) {
                env.set_last_font(Some(ch.style));
            }
            hbox.add(b.with_class(left));

            if kern.abs() > PREC {
                hbox.add(BoxNode::strut(kern, 0.0, 0.0));
            }

            if !atom.is_kern() {
                prev_right = Some(right);
            }
            after_bin_rel = !atom.is_kern()
                && matches!(right, AtomType::BinaryOperator | AtomType::Relation);
            i += 1;
        }

        hbox.into_node()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::basic::{CharAtom, SymbolAtom};
    use crate::boxes::BoxKind;
    use crate::font::FontContext;
    use crate::style::TexStyle;

    fn env() -> Env {
        Env::new(TexStyle::Text, FontContext::rule_font(), 10.0)
    }

    fn sym(code: char, typ: AtomType) -> Atom {
        Atom::Symbol(SymbolAtom::new(code, typ))
    }

    fn chr(code: char) -> Atom {
        Atom::Char(CharAtom::new(code, true))
    }

    fn children(b: &BoxNode) -> &[BoxNode] {
        match &b.kind {
            BoxKind::HBox(h) => &h.children,
            _ => panic!("expected an hbox"),
        }
    }

    #[test]
    fn glue_inserted_around_relation() {
        let mut row = RowAtom::new();
        row.add(chr('a'));
        row.add(sym('=', AtomType::Relation));
        row.add(chr('b'));
        let b = row.create_box(&env());
        // a, glue, =, glue, b
        assert_eq!(children(&b).len(), 5);
        assert!(matches!(children(&b)[1].kind, BoxKind::Glue { .. }));
        assert!(children(&b)[1].width > 0.0);
    }

    #[test]
    fn leading_bin_demotes_to_ord() {
        let mut row = RowAtom::new();
        row.add(sym('+', AtomType::BinaryOperator));
        row.add(chr('e'));
        let demoted = row.create_box(&env());
        // demoted to ord, so the glue before 'e' collapses to zero
        assert_eq!(children(&demoted).len(), 3);
        assert_eq!(children(&demoted)[1].width, 0.0);

        let mut infix = RowAtom::new();
        infix.add(chr('e'));
        infix.add(sym('+', AtomType::BinaryOperator));
        infix.add(chr('f'));
        let b = infix.create_box(&env());
        assert_eq!(children(&b).len(), 5);
    }

    #[test]
    fn trailing_bin_demotes_to_ord() {
        let mut row = RowAtom::new();
        row.add(chr('a'));
        row.add(sym('+', AtomType::BinaryOperator));
        let b = row.create_box(&env());
        assert_eq!(children(&b).len(), 3);
        assert_eq!(children(&b)[1].width, 0.0);
    }

    #[test]
    fn kern_pair_inserts_strut() {
        let mut row = RowAtom::new();
        row.add(Atom::Char(CharAtom::new('A', false)));
        row.add(Atom::Char(CharAtom::new('V', false)));
        let b = row.create_box(&env());
        let kerns: Vec<f32> = children(&b)
            .iter()
            .filter(|c| matches!(c.kind, BoxKind::Strut))
            .map(|c| c.width)
            .collect();
        assert_eq!(kerns.len(), 1);
        assert!(kerns[0] < 0.0);
    }

    #[test]
    fn break_marks_recorded_on_hbox() {
        let mut row = RowAtom::new();
        row.add(chr('a'));
        row.add(Atom::Break);
        row.add(chr('b'));
        let b = row.create_box(&env());
        match &b.kind {
            BoxKind::HBox(h) => assert_eq!(h.break_positions.len(), 1),
            _ => panic!("expected an hbox"),
        }
    }

    #[test]
    fn break_allowed_after_bin_and_rel() {
        let mut row = RowAtom::new();
        row.add(chr('a'));
        row.add(sym('+', AtomType::BinaryOperator));
        row.add(chr('b'));
        row.add(sym('=', AtomType::Relation));
        row.add(chr('c'));
        let b = row.create_box(&env());
        match &b.kind {
            // one break before 'b', one before 'c'
            BoxKind::HBox(h) => assert_eq!(h.break_positions.len(), 2),
            _ => panic!("expected an hbox"),
        }
    }

    #[test]
    fn demoted_bin_is_not_a_break_point() {
        let mut row = RowAtom::new();
        row.add(chr('a'));
        row.add(sym('+', AtomType::BinaryOperator));
        row.add(sym('+', AtomType::BinaryOperator));
        row.add(chr('b'));
        let b = row.create_box(&env());
        match &b.kind {
            // the second + demotes to ord, only the first one breaks
            BoxKind::HBox(h) => assert_eq!(h.break_positions.len(), 1),
            _ => panic!("expected an hbox"),
        }
    }

    #[test]
    fn unbreakable_row_records_nothing() {
        let mut row = RowAtom::new();
        row.breakable = false;
        row.add(chr('1'));
        row.add(chr('2'));
        let b = row.create_box(&env());
        match &b.kind {
            BoxKind::HBox(h) => assert!(h.break_positions.is_empty()),
            _ => panic!("expected an hbox"),
        }
    }
}
