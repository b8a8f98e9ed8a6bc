//! User-defined macros and environments.
//!
//! A [`MacroRegistry`] can be filled ahead of time and handed to the
//! parser, and `\newcommand` and friends fill it further during the
//! rewriting pass. Builtins always win name lookups; whether redefining
//! one is an error is the caller's choice.

use rustc_hash::FxHashMap;

use crate::error::{ParseErrKind, ParseError};

/// A user macro: `\newcommand{\foo}[2][x]{...}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroDef {
    /// Total argument count, the optional one included.
    pub argc: usize,
    /// Default for `#1` when present; the macro then takes `[...]` first.
    pub opt: Option<String>,
    pub body: String,
}

/// A user environment: `\newenvironment{name}[n]{before}{after}`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvDef {
    pub argc: usize,
    pub opt: Option<String>,
    pub begin: String,
    pub end: String,
}

#[derive(Debug, Clone, Default)]
pub struct MacroRegistry {
    macros: FxHashMap<String, MacroDef>,
    envs: FxHashMap<String, EnvDef>,
    /// Raise an error when a registration collides with an existing name
    /// instead of silently replacing it.
    pub err_if_conflict: bool,
}

impl MacroRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn name_taken(&self, name: &str) -> bool {
        self.macros.contains_key(name)
            || crate::symbols::SYMBOLS.contains_key(name)
            || crate::commands::BUILTINS.contains_key(name)
    }

    pub fn register_macro(
        &mut self,
        pos: usize,
        name: &str,
        def: MacroDef,
    ) -> Result<(), ParseError> {
        if name.is_empty() || !name.chars().all(|c| c.is_alphabetic()) {
            return Err(ParseError(pos, ParseErrKind::InvalidMacroName(name.into())));
        }
        if self.err_if_conflict && self.name_taken(name) {
            return Err(ParseError(
                pos,
                ParseErrKind::MacroAlreadyDefined(name.into()),
            ));
        }
        self.macros.insert(name.to_string(), def);
        Ok(())
    }

    /// `\renewcommand`: the macro must already exist.
    pub fn replace_macro(
        &mut self,
        pos: usize,
        name: &str,
        def: MacroDef,
    ) -> Result<(), ParseError> {
        if !self.macros.contains_key(name) {
            return Err(ParseError(pos, ParseErrKind::UndefinedMacro(name.into())));
        }
        self.macros.insert(name.to_string(), def);
        Ok(())
    }

    pub fn register_env(&mut self, pos: usize, name: &str, def: EnvDef) -> Result<(), ParseError> {
        if name.is_empty() {
            return Err(ParseError(pos, ParseErrKind::InvalidMacroName(name.into())));
        }
        if self.err_if_conflict && self.envs.contains_key(name) {
            return Err(ParseError(
                pos,
                ParseErrKind::MacroAlreadyDefined(name.into()),
            ));
        }
        self.envs.insert(name.to_string(), def);
        Ok(())
    }

    pub fn macro_def(&self, name: &str) -> Option<&MacroDef> {
        self.macros.get(name)
    }

    pub fn env_def(&self, name: &str) -> Option<&EnvDef> {
        self.envs.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.macros.is_empty() && self.envs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(body: &str) -> MacroDef {
        MacroDef {
            argc: 0,
            opt: None,
            body: body.to_string(),
        }
    }

    #[test]
    fn register_and_look_up() {
        let mut reg = MacroRegistry::new();
        reg.register_macro(0, "foo", def("\\alpha")).unwrap();
        assert_eq!(reg.macro_def("foo").unwrap().body, "\\alpha");
        assert!(reg.macro_def("bar").is_none());
    }

    #[test]
    fn conflict_with_builtin_is_reported_when_asked() {
        let mut reg = MacroRegistry::new();
        reg.err_if_conflict = true;
        let err = reg.register_macro(7, "frac", def("x")).unwrap_err();
        assert_eq!(err.0, 7);
        assert!(matches!(err.1, ParseErrKind::MacroAlreadyDefined(_)));
        // symbols are names too
        assert!(reg.register_macro(0, "alpha", def("x")).is_err());
    }

    #[test]
    fn silent_replace_without_the_flag() {
        let mut reg = MacroRegistry::new();
        reg.register_macro(0, "foo", def("a")).unwrap();
        reg.register_macro(0, "foo", def("b")).unwrap();
        assert_eq!(reg.macro_def("foo").unwrap().body, "b");
    }

    #[test]
    fn renew_requires_existing() {
        let mut reg = MacroRegistry::new();
        assert!(reg.replace_macro(0, "foo", def("a")).is_err());
        reg.register_macro(0, "foo", def("a")).unwrap();
        assert!(reg.replace_macro(0, "foo", def("b")).is_ok());
    }

    #[test]
    fn bad_names_are_rejected() {
        let mut reg = MacroRegistry::new();
        assert!(reg.register_macro(0, "", def("x")).is_err());
        assert!(reg.register_macro(0, "a1", def("x")).is_err());
    }
}
