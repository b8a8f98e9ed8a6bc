//! TeX box-and-glue layout for math formulas.
//!
//! This crate turns an [`atom::Atom`] tree (built by a parser front end)
//! into a [`boxes::BoxNode`] tree with exact widths, heights and depths,
//! ready to draw through a [`graphics::Graphics2D`] backend. Font metrics
//! come in through the [`font::MathFont`] seam; no font files are read
//! here.

pub mod atom;
pub mod atoms;
pub mod boxes;
pub mod env;
pub mod font;
pub mod glue;
pub mod graphics;
pub mod splitter;
pub mod style;
pub mod types;

pub use atom::Atom;
pub use boxes::{BoxKind, BoxNode, HBox, VBox};
pub use env::Env;
pub use font::{Char, FontContext, FontStyle, MathConsts, MathFont};
pub use graphics::{Color, Graphics2D};
pub use style::TexStyle;
pub use types::{Alignment, AtomType, LimitsType, SpaceType, UnitType};
