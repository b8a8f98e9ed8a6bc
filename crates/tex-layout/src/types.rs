//! Small shared enums used across atoms, boxes and the glue engine.

use strum_macros::IntoStaticStr;

/// TeX atom classes. The glue engine keys its spacing table off the pair of
/// classes at every atom boundary; classes past `Inner` take part in no
/// spacing rule of their own and fold to `Ordinary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoStaticStr)]
#[repr(u8)]
pub enum AtomType {
    #[default]
    #[strum(serialize = "ord")]
    Ordinary = 0,
    #[strum(serialize = "op")]
    BigOperator = 1,
    #[strum(serialize = "bin")]
    BinaryOperator = 2,
    #[strum(serialize = "rel")]
    Relation = 3,
    #[strum(serialize = "open")]
    Opening = 4,
    #[strum(serialize = "close")]
    Closing = 5,
    #[strum(serialize = "punct")]
    Punctuation = 6,
    #[strum(serialize = "inner")]
    Inner = 7,
    #[strum(serialize = "accent")]
    Accent = 8,
    #[strum(serialize = "intertext")]
    InterText = 9,
    #[strum(serialize = "multicolumn")]
    MultiColumn = 10,
    #[strum(serialize = "hline")]
    Hline = 11,
    #[strum(serialize = "multirow")]
    MultiRow = 12,
    #[strum(serialize = "none")]
    None = 13,
}

impl AtomType {
    /// Classes beyond `Inner` share `Ordinary`'s spacing rules.
    #[inline]
    pub fn folded(self) -> AtomType {
        if (self as u8) > (AtomType::Inner as u8) {
            AtomType::Ordinary
        } else {
            self
        }
    }
}

/// How scripts attach to a big operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitsType {
    /// Stacked limits in display style, corner scripts otherwise.
    #[default]
    Normal,
    /// Always corner scripts.
    NoLimits,
    /// Always stacked limits.
    Limits,
}

/// Alignment of content within a wider/taller enclosing box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Right,
    Center,
    Top,
    Bottom,
}

/// Named skip amounts for explicit spacing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceType {
    NegThin,
    Thin,
    Medium,
    Thick,
    Quad,
    QQuad,
}

impl SpaceType {
    /// The glue triple `(space, stretch, shrink)` in mu (1/18 quad).
    pub fn glue_mu(self) -> (f32, f32, f32) {
        match self {
            SpaceType::NegThin => (-3.0, 0.0, 0.0),
            SpaceType::Thin => (3.0, 0.0, 0.0),
            SpaceType::Medium => (4.0, 4.0, 2.0),
            SpaceType::Thick => (5.0, 0.0, 5.0),
            SpaceType::Quad => (18.0, 0.0, 0.0),
            SpaceType::QQuad => (36.0, 0.0, 0.0),
        }
    }
}

/// Length units accepted by spacing and sizing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
pub enum UnitType {
    #[strum(serialize = "em")]
    Em,
    #[strum(serialize = "ex")]
    Ex,
    #[strum(serialize = "mu")]
    Mu,
    #[strum(serialize = "pt")]
    Point,
    #[strum(serialize = "px")]
    Pixel,
    #[strum(serialize = "cm")]
    Cm,
    #[strum(serialize = "mm")]
    Mm,
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "none")]
    None,
}

impl UnitType {
    pub fn parse(s: &str) -> Option<UnitType> {
        Some(match s {
            "em" => UnitType::Em,
            "ex" => UnitType::Ex,
            "mu" => UnitType::Mu,
            "pt" => UnitType::Point,
            "px" => UnitType::Pixel,
            "cm" => UnitType::Cm,
            "mm" => UnitType::Mm,
            "in" => UnitType::In,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_special_types_to_ord() {
        assert_eq!(AtomType::Accent.folded(), AtomType::Ordinary);
        assert_eq!(AtomType::Hline.folded(), AtomType::Ordinary);
        assert_eq!(AtomType::Inner.folded(), AtomType::Inner);
        assert_eq!(AtomType::Relation.folded(), AtomType::Relation);
    }
}
