//! The concrete atom kinds behind the [`Atom`](crate::atom::Atom) enum.

pub mod accent;
pub mod basic;
pub mod delim;
pub mod frac;
pub mod matrix;
pub mod radical;
pub mod row;
pub mod scripts;
pub mod wrappers;
