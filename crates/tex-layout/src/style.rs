//! The eight TeX styles and the transition rules between them.
//!
//! TeX distinguishes display, text, script and scriptscript sizes, each with
//! a cramped variant used where there is no room for superscript elevation
//! (under radicals, in denominators). Sub-formulas only ever move to an
//! equal-or-smaller style, never back up.

use strum_macros::IntoStaticStr;

/// One of the eight TeX styles.
///
/// The discriminants are laid out so that `id / 2` yields the size level
/// (0 = display, 1 = text, 2 = script, 3 = scriptscript) and odd ids are the
/// cramped variants. The glue table and the math-constant selection both key
/// off the size level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, IntoStaticStr)]
#[repr(u8)]
pub enum TexStyle {
    #[strum(serialize = "display")]
    Display = 0,
    #[strum(serialize = "display'")]
    DisplayCramped = 1,
    #[strum(serialize = "text")]
    Text = 2,
    #[strum(serialize = "text'")]
    TextCramped = 3,
    #[strum(serialize = "script")]
    Script = 4,
    #[strum(serialize = "script'")]
    ScriptCramped = 5,
    #[strum(serialize = "scriptscript")]
    ScriptScript = 6,
    #[strum(serialize = "scriptscript'")]
    ScriptScriptCramped = 7,
}

use TexStyle::*;

const STYLES: [TexStyle; 8] = [
    Display,
    DisplayCramped,
    Text,
    TextCramped,
    Script,
    ScriptCramped,
    ScriptScript,
    ScriptScriptCramped,
];

// Transition tables, indexed by style id. See the TeXBook, appendix G.
const SUP: [u8; 8] = [4, 5, 4, 5, 6, 7, 6, 7];
const SUB: [u8; 8] = [5, 5, 5, 5, 7, 7, 7, 7];
const NUM: [u8; 8] = [2, 3, 4, 5, 6, 7, 6, 7];
const DNOM: [u8; 8] = [3, 3, 5, 5, 7, 7, 7, 7];
const CRAMP: [u8; 8] = [1, 1, 3, 3, 5, 5, 7, 7];

impl TexStyle {
    #[inline]
    pub const fn id(self) -> usize {
        self as usize
    }

    /// Size level: 0 = display, 1 = text, 2 = script, 3 = scriptscript.
    #[inline]
    pub const fn size_level(self) -> usize {
        self as usize / 2
    }

    #[inline]
    pub const fn is_cramped(self) -> bool {
        self as usize % 2 == 1
    }

    /// True for display and display-cramped.
    #[inline]
    pub const fn is_display(self) -> bool {
        self.size_level() == 0
    }

    /// Style for a superscript on an atom in this style.
    #[inline]
    pub const fn sup(self) -> TexStyle {
        STYLES[SUP[self as usize] as usize]
    }

    /// Style for a subscript on an atom in this style.
    #[inline]
    pub const fn sub(self) -> TexStyle {
        STYLES[SUB[self as usize] as usize]
    }

    /// Style for a fraction numerator.
    #[inline]
    pub const fn num(self) -> TexStyle {
        STYLES[NUM[self as usize] as usize]
    }

    /// Style for a fraction denominator.
    #[inline]
    pub const fn dnom(self) -> TexStyle {
        STYLES[DNOM[self as usize] as usize]
    }

    /// Cramped variant of this style (idempotent).
    #[inline]
    pub const fn cramp(self) -> TexStyle {
        STYLES[CRAMP[self as usize] as usize]
    }

    /// Style for the radicand of a radical: the cramped variant.
    #[inline]
    pub const fn root(self) -> TexStyle {
        self.cramp()
    }

    /// The scale applied to glyphs in this style relative to text size,
    /// derived from the font's script percentage constants.
    pub fn scale(self, script_pct: f32, script_script_pct: f32) -> f32 {
        match self.size_level() {
            0 | 1 => 1.0,
            2 => script_pct,
            _ => script_script_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_never_grow() {
        for s in STYLES {
            assert!(s.sup().size_level() >= s.size_level());
            assert!(s.sub().size_level() >= s.size_level());
            assert!(s.num().size_level() >= s.size_level());
            assert!(s.dnom().size_level() >= s.size_level());
        }
    }

    #[test]
    fn sub_and_dnom_are_cramped() {
        for s in STYLES {
            assert!(s.sub().is_cramped());
            assert!(s.dnom().is_cramped());
            assert!(s.cramp().is_cramped());
            assert_eq!(s.cramp().size_level(), s.size_level());
        }
    }

    #[test]
    fn script_transitions() {
        assert_eq!(Display.sup(), Script);
        assert_eq!(Display.sub(), ScriptCramped);
        assert_eq!(Script.sup(), ScriptScript);
        assert_eq!(ScriptScript.sup(), ScriptScript);
        assert_eq!(Display.num(), Text);
        assert_eq!(Text.num(), Script);
        assert_eq!(TextCramped.dnom(), ScriptCramped);
    }
}
