//! LaTeX math parsing and layout on top of [`tex_layout`].
//!
//! The input is a math-mode LaTeX string; the output is either a
//! [`Formula`] (the atom tree) or, through [`RenderBuilder`], a laid-out
//! [`Render`] ready to draw on any [`Graphics2D`] backend.
//!
//! ```
//! use boxtex::{parse, RenderBuilder};
//! use tex_layout::graphics::RecordingGraphics;
//!
//! let formula = parse(r"\frac{a+b}{2}").unwrap();
//! let render = RenderBuilder::new().text_size(20.0).build(&formula).unwrap();
//! let mut g = RecordingGraphics::new();
//! render.draw(&mut g, 0.0, 0.0);
//! ```

pub mod commands;
pub mod error;
pub mod formula;
pub mod parser;
pub mod registry;
pub mod render;
pub mod symbols;

pub use error::{ParseErrKind, ParseError, TexError};
pub use formula::{ArrayFormula, Formula};
pub use registry::{EnvDef, MacroDef, MacroRegistry};
pub use render::{Insets, Render, RenderBuilder};

pub use tex_layout;
pub use tex_layout::{Alignment, Atom, Color, Graphics2D, TexStyle};

use tex_layout::atoms::wrappers::StyleAtom;

/// Inline or display, as declared by the delimiters around the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MathMode {
    Display,
    Inline,
}

/// Strips one pair of top-level math delimiters, if present.
fn strip_mode(input: &str) -> (&str, MathMode) {
    let s = input.trim();
    for (open, close, mode) in [
        ("$$", "$$", MathMode::Display),
        ("\\[", "\\]", MathMode::Display),
        ("$", "$", MathMode::Inline),
        ("\\(", "\\)", MathMode::Inline),
    ] {
        if s.len() >= open.len() + close.len() && s.starts_with(open) && s.ends_with(close) {
            return (&s[open.len()..s.len() - close.len()], mode);
        }
    }
    (s, MathMode::Display)
}

fn apply_mode(formula: Formula, mode: MathMode) -> Formula {
    match mode {
        MathMode::Display => formula,
        MathMode::Inline => Formula::from_atom(Atom::Style(StyleAtom {
            style: TexStyle::Text,
            base: Box::new(formula.into_atom()),
        })),
    }
}

/// Parses a LaTeX math string. The whole input may be wrapped in
/// `$…$`, `$$…$$`, `\(…\)` or `\[…\]`; bare input counts as display
/// math, the inline forms demote it to text style.
pub fn parse(input: &str) -> Result<Formula, ParseError> {
    parse_with_macros(input, MacroRegistry::new())
}

/// Like [`parse`] with caller-provided macro and environment
/// definitions.
pub fn parse_with_macros(input: &str, macros: MacroRegistry) -> Result<Formula, ParseError> {
    let (body, mode) = strip_mode(input);
    parser::parse_with(body, macros, false).map(|f| apply_mode(f, mode))
}

/// Parses as much as possible, substituting placeholders for unknown
/// commands and skipping recoverable mistakes. Every error met is
/// returned next to the formula.
pub fn parse_partial(input: &str) -> (Formula, Vec<ParseError>) {
    let (body, mode) = strip_mode(input);
    let (f, errors) = parser::parse_partial_with(body, MacroRegistry::new());
    (apply_mode(f, mode), errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_input_is_display_math() {
        let f = parse("x+1").unwrap();
        assert!(!matches!(f.root.elements[0], Atom::Style(_)));
    }

    #[test]
    fn dollar_pair_is_inline() {
        let f = parse("$x+1$").unwrap();
        let Atom::Style(s) = &f.root.elements[0] else {
            panic!("expected style atom");
        };
        assert_eq!(s.style, TexStyle::Text);
    }

    #[test]
    fn double_dollar_stays_display() {
        let f = parse("$$x+1$$").unwrap();
        assert!(!matches!(f.root.elements[0], Atom::Style(_)));
    }

    #[test]
    fn bracket_forms_are_recognized() {
        let inline = parse("\\(x\\)").unwrap();
        assert!(matches!(inline.root.elements[0], Atom::Style(_)));
        let display = parse("\\[x\\]").unwrap();
        assert!(!matches!(display.root.elements[0], Atom::Style(_)));
    }

    #[test]
    fn partial_collects_errors_and_keeps_parsing() {
        let (f, errors) = parse_partial("a \\nosuchthing b");
        assert_eq!(errors.len(), 1);
        assert_eq!(f.root.len(), 3);
    }
}
