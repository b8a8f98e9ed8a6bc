//! Static symbol tables: command names to codepoints and TeX classes.

use phf::phf_map;
use tex_layout::AtomType;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Symbol {
    pub code: char,
    pub typ: AtomType,
}

const fn ord(code: char) -> Symbol {
    Symbol {
        code,
        typ: AtomType::Ordinary,
    }
}

const fn bin(code: char) -> Symbol {
    Symbol {
        code,
        typ: AtomType::BinaryOperator,
    }
}

const fn rel(code: char) -> Symbol {
    Symbol {
        code,
        typ: AtomType::Relation,
    }
}

const fn op(code: char) -> Symbol {
    Symbol {
        code,
        typ: AtomType::BigOperator,
    }
}

const fn open(code: char) -> Symbol {
    Symbol {
        code,
        typ: AtomType::Opening,
    }
}

const fn close(code: char) -> Symbol {
    Symbol {
        code,
        typ: AtomType::Closing,
    }
}

const fn punct(code: char) -> Symbol {
    Symbol {
        code,
        typ: AtomType::Punctuation,
    }
}

/// Named symbols reachable with a backslash command.
pub static SYMBOLS: phf::Map<&'static str, Symbol> = phf_map! {
    // lowercase Greek
    "alpha" => ord('α'), "beta" => ord('β'), "gamma" => ord('γ'),
    "delta" => ord('δ'), "epsilon" => ord('ϵ'), "varepsilon" => ord('ε'),
    "zeta" => ord('ζ'), "eta" => ord('η'), "theta" => ord('θ'),
    "vartheta" => ord('ϑ'), "iota" => ord('ι'), "kappa" => ord('κ'),
    "lambda" => ord('λ'), "mu" => ord('μ'), "nu" => ord('ν'),
    "xi" => ord('ξ'), "omicron" => ord('ο'), "pi" => ord('π'),
    "varpi" => ord('ϖ'), "rho" => ord('ρ'), "varrho" => ord('ϱ'),
    "sigma" => ord('σ'), "varsigma" => ord('ς'), "tau" => ord('τ'),
    "upsilon" => ord('υ'), "phi" => ord('ϕ'), "varphi" => ord('φ'),
    "chi" => ord('χ'), "psi" => ord('ψ'), "omega" => ord('ω'),
    // capital Greek, upright like the predefined formulas
    "Gamma" => ord('Γ'), "Delta" => ord('Δ'), "Theta" => ord('Θ'),
    "Lambda" => ord('Λ'), "Xi" => ord('Ξ'), "Pi" => ord('Π'),
    "Sigma" => ord('Σ'), "Upsilon" => ord('Υ'), "Phi" => ord('Φ'),
    "Psi" => ord('Ψ'), "Omega" => ord('Ω'),
    // big operators
    "sum" => op('∑'), "prod" => op('∏'), "coprod" => op('∐'),
    "int" => op('∫'), "oint" => op('∮'), "iint" => op('∬'),
    "iiint" => op('∭'),
    "bigcap" => op('⋂'), "bigcup" => op('⋃'), "biguplus" => op('⨄'),
    "bigoplus" => op('⨁'), "bigotimes" => op('⨂'), "bigodot" => op('⨀'),
    "bigwedge" => op('⋀'), "bigvee" => op('⋁'), "bigsqcup" => op('⨆'),
    // binary operators
    "pm" => bin('±'), "mp" => bin('∓'), "times" => bin('×'),
    "div" => bin('÷'), "cdot" => bin('⋅'), "ast" => bin('∗'),
    "star" => bin('⋆'), "circ" => bin('∘'), "bullet" => bin('•'),
    "cap" => bin('∩'), "cup" => bin('∪'), "uplus" => bin('⊎'),
    "sqcap" => bin('⊓'), "sqcup" => bin('⊔'),
    "wedge" => bin('∧'), "land" => bin('∧'), "vee" => bin('∨'), "lor" => bin('∨'),
    "oplus" => bin('⊕'), "ominus" => bin('⊖'), "otimes" => bin('⊗'),
    "oslash" => bin('⊘'), "odot" => bin('⊙'),
    "setminus" => bin('∖'), "amalg" => bin('⨿'), "wr" => bin('≀'),
    "diamond" => bin('⋄'), "triangleleft" => bin('◁'), "triangleright" => bin('▷'),
    // relations
    "le" => rel('≤'), "leq" => rel('≤'), "ge" => rel('≥'), "geq" => rel('≥'),
    "ne" => rel('≠'), "neq" => rel('≠'), "equiv" => rel('≡'),
    "sim" => rel('∼'), "simeq" => rel('≃'), "approx" => rel('≈'),
    "cong" => rel('≅'), "propto" => rel('∝'), "asymp" => rel('≍'),
    "doteq" => rel('≐'), "ll" => rel('≪'), "gg" => rel('≫'),
    "in" => rel('∈'), "ni" => rel('∋'), "notin" => rel('∉'),
    "subset" => rel('⊂'), "supset" => rel('⊃'),
    "subseteq" => rel('⊆'), "supseteq" => rel('⊇'),
    "sqsubseteq" => rel('⊑'), "sqsupseteq" => rel('⊒'),
    "prec" => rel('≺'), "succ" => rel('≻'),
    "preceq" => rel('⪯'), "succeq" => rel('⪰'),
    "mid" => rel('∣'), "parallel" => rel('∥'), "perp" => rel('⊥'),
    "models" => rel('⊨'), "vdash" => rel('⊢'), "dashv" => rel('⊣'),
    "smile" => rel('⌣'), "frown" => rel('⌢'), "bowtie" => rel('⋈'),
    // arrows
    "leftarrow" => rel('←'), "gets" => rel('←'),
    "rightarrow" => rel('→'), "to" => rel('→'),
    "uparrow" => rel('↑'), "downarrow" => rel('↓'),
    "updownarrow" => rel('↕'),
    "leftrightarrow" => rel('↔'),
    "Leftarrow" => rel('⇐'), "Rightarrow" => rel('⇒'),
    "Leftrightarrow" => rel('⇔'), "Uparrow" => rel('⇑'), "Downarrow" => rel('⇓'),
    "mapsto" => rel('↦'), "hookrightarrow" => rel('↪'), "hookleftarrow" => rel('↩'),
    "longrightarrow" => rel('⟶'), "longleftarrow" => rel('⟵'),
    "Longrightarrow" => rel('⟹'), "Longleftarrow" => rel('⟸'),
    "longleftrightarrow" => rel('⟷'), "longmapsto" => rel('⟼'),
    "implies" => rel('⟹'), "impliedby" => rel('⟸'), "iff" => rel('⟺'),
    "nearrow" => rel('↗'), "searrow" => rel('↘'),
    "swarrow" => rel('↙'), "nwarrow" => rel('↖'),
    "rightharpoonup" => rel('⇀'), "leftharpoonup" => rel('↼'),
    "rightharpoondown" => rel('⇁'), "leftharpoondown" => rel('↽'),
    "rightleftharpoons" => rel('⇌'),
    // delimiters
    "langle" => open('⟨'), "rangle" => close('⟩'),
    "lceil" => open('⌈'), "rceil" => close('⌉'),
    "lfloor" => open('⌊'), "rfloor" => close('⌋'),
    "lbrace" => open('{'), "rbrace" => close('}'),
    "lbrack" => open('['), "rbrack" => close(']'),
    "vert" => ord('|'), "Vert" => ord('‖'), "backslash" => ord('\\'),
    // ordinary symbols
    "infty" => ord('∞'), "partial" => ord('∂'), "nabla" => ord('∇'),
    "forall" => ord('∀'), "exists" => ord('∃'), "nexists" => ord('∄'),
    "emptyset" => ord('∅'), "varnothing" => ord('∅'),
    "aleph" => ord('ℵ'), "hbar" => ord('ℏ'),
    "imath" => ord('ı'), "jmath" => ord('ȷ'), "ell" => ord('ℓ'),
    "wp" => ord('℘'), "Re" => ord('ℜ'), "Im" => ord('ℑ'),
    "prime" => ord('′'), "angle" => ord('∠'), "triangle" => ord('△'),
    "surd" => ord('√'), "top" => ord('⊤'), "bot" => ord('⊥'),
    "flat" => ord('♭'), "natural" => ord('♮'), "sharp" => ord('♯'),
    "clubsuit" => ord('♣'), "diamondsuit" => ord('♢'),
    "heartsuit" => ord('♡'), "spadesuit" => ord('♠'),
    "dagger" => bin('†'), "ddagger" => bin('‡'),
    "neg" => ord('¬'), "lnot" => ord('¬'),
    "cdots" => ord('⋯'), "ldots" => ord('…'), "dots" => ord('…'),
    "vdots" => ord('⋮'), "ddots" => ord('⋱'),
    "circlearrowleft" => ord('↺'), "circlearrowright" => ord('↻'),
    "degree" => ord('°'), "checkmark" => ord('✓'),
    // punctuation-class
    "colon" => punct(':'), "cdotp" => punct('⋅'), "ldotp" => punct('.'),
};

/// The class an input character carries on its own in math mode.
pub fn char_symbol(c: char) -> Option<Symbol> {
    Some(match c {
        '+' => bin('+'),
        '-' => bin('−'),
        '*' => bin('∗'),
        '/' => ord('/'),
        '=' => rel('='),
        '<' => rel('<'),
        '>' => rel('>'),
        '(' => open('('),
        '[' => open('['),
        ')' => close(')'),
        ']' => close(']'),
        ',' => punct(','),
        ';' => punct(';'),
        ':' => rel(':'),
        '!' => close('!'),
        '?' => close('?'),
        '.' => ord('.'),
        '|' => ord('|'),
        '\'' => ord('′'),
        _ => return None,
    })
}

/// Delimiter names usable after `\left`, `\right` and `\middle`.
/// `.` maps to no delimiter at all.
pub fn delimiter(name: &str) -> Option<Option<char>> {
    Some(Some(match name {
        "(" => '(',
        ")" => ')',
        "[" | "lbrack" => '[',
        "]" | "rbrack" => ']',
        "{" | "lbrace" => '{',
        "}" | "rbrace" => '}',
        "|" | "vert" => '|',
        "\\|" | "Vert" => '‖',
        "langle" => '⟨',
        "rangle" => '⟩',
        "lceil" => '⌈',
        "rceil" => '⌉',
        "lfloor" => '⌊',
        "rfloor" => '⌋',
        "/" => '/',
        "backslash" => '\\',
        "uparrow" => '↑',
        "downarrow" => '↓',
        "updownarrow" => '↕',
        "." => return Some(None),
        _ => return None,
    }))
}

/// Unicode superscript and subscript codepoints rewritten to cumulative
/// scripts in the first pass: `(base, superscript?)`.
pub fn script_codepoint(c: char) -> Option<(char, bool)> {
    let (base, sup) = match c {
        '⁰' => ('0', true),
        '¹' => ('1', true),
        '²' => ('2', true),
        '³' => ('3', true),
        '⁴' => ('4', true),
        '⁵' => ('5', true),
        '⁶' => ('6', true),
        '⁷' => ('7', true),
        '⁸' => ('8', true),
        '⁹' => ('9', true),
        '⁺' => ('+', true),
        '⁻' => ('-', true),
        'ⁿ' => ('n', true),
        '₀' => ('0', false),
        '₁' => ('1', false),
        '₂' => ('2', false),
        '₃' => ('3', false),
        '₄' => ('4', false),
        '₅' => ('5', false),
        '₆' => ('6', false),
        '₇' => ('7', false),
        '₈' => ('8', false),
        '₉' => ('9', false),
        '₊' => ('+', false),
        '₋' => ('-', false),
        _ => return None,
    };
    Some((base, sup))
}

/// Unicode blocks rendered as text runs instead of math glyphs, keyed for
/// greedy same-block collection.
pub fn text_block(c: char) -> Option<u32> {
    let cp = c as u32;
    match cp {
        // Cyrillic
        0x0400..=0x04FF => Some(1),
        // CJK
        0x4E00..=0x9FFF => Some(2),
        // Hangul
        0xAC00..=0xD7AF => Some(3),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_assigned() {
        assert_eq!(SYMBOLS["sum"].typ, AtomType::BigOperator);
        assert_eq!(SYMBOLS["pm"].typ, AtomType::BinaryOperator);
        assert_eq!(SYMBOLS["leq"].typ, AtomType::Relation);
        assert_eq!(SYMBOLS["alpha"].typ, AtomType::Ordinary);
        assert_eq!(SYMBOLS["langle"].typ, AtomType::Opening);
    }

    #[test]
    fn aliases_share_codepoints() {
        assert_eq!(SYMBOLS["le"].code, SYMBOLS["leq"].code);
        assert_eq!(SYMBOLS["to"].code, SYMBOLS["rightarrow"].code);
        assert_eq!(SYMBOLS["land"].code, SYMBOLS["wedge"].code);
    }

    #[test]
    fn ascii_chars_have_classes() {
        assert_eq!(char_symbol('+').unwrap().typ, AtomType::BinaryOperator);
        assert_eq!(char_symbol('=').unwrap().typ, AtomType::Relation);
        assert_eq!(char_symbol('(').unwrap().typ, AtomType::Opening);
        assert_eq!(char_symbol(',').unwrap().typ, AtomType::Punctuation);
        assert!(char_symbol('a').is_none());
    }

    #[test]
    fn hyphen_becomes_minus() {
        assert_eq!(char_symbol('-').unwrap().code, '−');
    }

    #[test]
    fn empty_delimiter_is_the_dot() {
        assert_eq!(delimiter("."), Some(None));
        assert_eq!(delimiter("("), Some(Some('(')));
        assert_eq!(delimiter("nope"), None);
    }
}
