//! The two-pass LaTeX parser.
//!
//! The first pass rewrites the input buffer in place: comments go away,
//! macro definitions register and erase themselves, user macros inflate,
//! environments become `\name@env{...}` calls and a handful of Unicode
//! codepoints turn into equivalent commands. The second pass walks the
//! rewritten buffer left to right and builds the atom tree.

use tex_layout::atoms::basic::{
    CharAtom, PlaceholderAtom, SpaceAtom, SymbolAtom, TextAtom,
};
use tex_layout::atoms::delim::DelimitedAtom;
use tex_layout::atoms::frac::{FractionAtom, StackArg, StackAtom};
use tex_layout::atoms::matrix::{MatrixAtom, MatrixKind};
use tex_layout::atoms::row::RowAtom;
use tex_layout::atoms::scripts::{BigOpAtom, CumulativeScriptsAtom, ScriptsAtom};
use tex_layout::{
    Alignment, Atom, AtomType, Color, FontStyle, LimitsType, SpaceType, TexStyle, UnitType,
};

use crate::commands::BUILTINS;
use crate::error::{DoubleScriptKind, ParseErrKind, ParseError};
use crate::formula::{ArrayFormula, Formula};
use crate::registry::{EnvDef, MacroDef, MacroRegistry};
use crate::symbols::{self, SYMBOLS};

/// Rewriting steps allowed before giving up on a runaway macro.
const MAX_EXPANSIONS: usize = 1024;
/// Hard cap on buffer growth during rewriting.
const MAX_BUFFER: usize = 1 << 20;

/// Where a row of atoms is allowed to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    /// Top level: only the end of input.
    Eof,
    /// Inside `{...}`.
    Brace,
    /// Inside `\left...\right`.
    Right,
    /// Inside an array body: `&`, `\\` and the closing brace all end it.
    Cell,
}

/// What actually ended a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Ending {
    Eof,
    Brace,
    Amp,
    Row,
    Right(Option<char>),
}

pub struct Parser {
    buf: Vec<char>,
    pos: usize,
    pub macros: MacroRegistry,
    pub partial: bool,
    /// `@` counts as a letter in command names while positive.
    atletter: usize,
    expansions: usize,
    /// Set by `\rowcolor` / `\cellcolor`, drained by array parsing.
    pub pending_row_color: Option<Color>,
    pub pending_cell_color: Option<Color>,
    /// Errors recovered from in partial mode.
    pub errors: Vec<ParseError>,
}

/// Parses a whole math-mode input into a formula.
pub fn parse_with(input: &str, macros: MacroRegistry, partial: bool) -> Result<Formula, ParseError> {
    let mut p = Parser::new(input, macros, partial);
    p.preprocess()?;
    let (row, _) = p.parse_row_until(Stop::Eof)?;
    Ok(Formula::from_row(row))
}

/// Best-effort parse: keeps going past recoverable mistakes and returns
/// whatever formula came out along with every error met on the way.
pub fn parse_partial_with(input: &str, macros: MacroRegistry) -> (Formula, Vec<ParseError>) {
    let mut p = Parser::new(input, macros, true);
    if let Err(e) = p.preprocess() {
        p.errors.push(e);
        return (Formula::new(), p.errors);
    }
    match p.parse_row_until(Stop::Eof) {
        Ok((row, _)) => (Formula::from_row(row), p.errors),
        Err(e) => {
            p.errors.push(e);
            (Formula::new(), p.errors)
        }
    }
}

impl Parser {
    pub fn new(input: &str, macros: MacroRegistry, partial: bool) -> Self {
        Parser {
            buf: input.chars().collect(),
            pos: 0,
            macros,
            partial,
            atletter: 0,
            expansions: 0,
            pending_row_color: None,
            pending_cell_color: None,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.buf.get(self.pos).copied()
    }

    fn starts_with(&self, at: usize, s: &str) -> bool {
        s.chars()
            .enumerate()
            .all(|(i, c)| self.buf.get(at + i) == Some(&c))
    }

    pub fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// A command name starting at `at` (just past the backslash).
    fn name_at(&self, at: usize) -> (String, usize) {
        let mut end = at;
        while self
            .buf
            .get(end)
            .is_some_and(|c| c.is_alphabetic() || (*c == '@' && self.atletter > 0))
        {
            end += 1;
        }
        (self.buf[at..end].iter().collect(), end)
    }

    fn read_name(&mut self) -> String {
        let (name, end) = self.name_at(self.pos);
        self.pos = end;
        name
    }

    /// Index of the `}` matching the `{` at `open`.
    fn group_end(&self, open: usize) -> Result<usize, ParseError> {
        let mut depth = 0usize;
        let mut i = open;
        while let Some(&c) = self.buf.get(i) {
            match c {
                '\\' => i += 1,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        Err(ParseError(open, ParseErrKind::UnclosedGroup("{".into())))
    }

    /// Index of the `]` matching the `[` at `open`, ignoring brackets
    /// nested in braces.
    fn bracket_end(&self, open: usize) -> Result<usize, ParseError> {
        let mut i = open + 1;
        while let Some(&c) = self.buf.get(i) {
            match c {
                '\\' => i += 1,
                '{' => i = self.group_end(i)?,
                ']' => return Ok(i),
                _ => {}
            }
            i += 1;
        }
        Err(ParseError(open, ParseErrKind::UnclosedGroup("[".into())))
    }

    fn splice(&mut self, start: usize, end: usize, replacement: &str) {
        self.buf.splice(start..end, replacement.chars());
    }

    // ---- pass one: buffer rewriting ----

    pub fn preprocess(&mut self) -> Result<(), ParseError> {
        let mut i = 0;
        while i < self.buf.len() {
            if self.buf.len() > MAX_BUFFER {
                return Err(ParseError(i, ParseErrKind::ExpansionTooDeep(String::new())));
            }
            let c = self.buf[i];
            match c {
                '%' => {
                    let mut end = i;
                    while end < self.buf.len() && self.buf[end] != '\n' {
                        end += 1;
                    }
                    self.buf.drain(i..end);
                }
                '°' => {
                    self.splice(i, i + 1, "^{\\circ}");
                    i += 1;
                }
                '\\' => {
                    let Some(&next) = self.buf.get(i + 1) else {
                        break;
                    };
                    if !next.is_alphabetic() {
                        i += 2;
                        continue;
                    }
                    let (name, after) = self.name_at(i + 1);
                    i = self.rewrite_command(i, after, &name)?;
                }
                _ => match symbols::script_codepoint(c) {
                    Some((base, sup)) => {
                        let cmd = if sup { "\\mathcumsup{" } else { "\\mathcumsub{" };
                        let mut repl = cmd.to_string();
                        repl.push(base);
                        repl.push('}');
                        self.splice(i, i + 1, &repl);
                        i += 1;
                    }
                    None => i += 1,
                },
            }
        }
        self.atletter = 0;
        Ok(())
    }

    /// Handles one command during rewriting; returns the position to
    /// continue scanning from.
    fn rewrite_command(&mut self, start: usize, after: usize, name: &str) -> Result<usize, ParseError> {
        match name {
            "makeatletter" => {
                self.atletter += 1;
                Ok(after)
            }
            "makeatother" => {
                self.atletter = self.atletter.saturating_sub(1);
                Ok(after)
            }
            "newcommand" | "renewcommand" | "providecommand" => {
                self.scan_macro_def(start, after, name)?;
                Ok(start)
            }
            "newenvironment" | "renewenvironment" => {
                self.scan_env_def(start, after)?;
                Ok(start)
            }
            "begin" => self.rewrite_environment(start, after),
            "end" => Err(ParseError(start, ParseErrKind::UnmatchedRight("end".into()))),
            _ => match self.macros.macro_def(name) {
                Some(def) => {
                    let def = def.clone();
                    self.expand_macro(start, after, name, &def)?;
                    Ok(start)
                }
                None => Ok(after),
            },
        }
    }

    /// Raw text of a `{...}` group starting at or after `at` (whitespace
    /// skipped); returns the content and the position past the `}`.
    fn raw_group_at(&self, mut at: usize) -> Result<(String, usize), ParseError> {
        while self.buf.get(at).is_some_and(|c| c.is_whitespace()) {
            at += 1;
        }
        if self.buf.get(at) != Some(&'{') {
            return Err(ParseError(at, ParseErrKind::UnexpectedEof));
        }
        let end = self.group_end(at)?;
        Ok((self.buf[at + 1..end].iter().collect(), end + 1))
    }

    fn raw_opt_at(&self, mut at: usize) -> Result<(Option<String>, usize), ParseError> {
        while self.buf.get(at).is_some_and(|c| c.is_whitespace()) {
            at += 1;
        }
        if self.buf.get(at) != Some(&'[') {
            return Ok((None, at));
        }
        let end = self.bracket_end(at)?;
        Ok((Some(self.buf[at + 1..end].iter().collect()), end + 1))
    }

    fn scan_macro_def(&mut self, start: usize, after: usize, which: &str) -> Result<(), ParseError> {
        let mut i = after;
        while self.buf.get(i).is_some_and(|c| c.is_whitespace()) {
            i += 1;
        }
        // \newcommand{\name} or \newcommand\name
        let braced = self.buf.get(i) == Some(&'{');
        if braced {
            i += 1;
        }
        if self.buf.get(i) != Some(&'\\') {
            return Err(ParseError(
                i,
                ParseErrKind::InvalidMacroName(String::new()),
            ));
        }
        let (mac, name_end) = self.name_at(i + 1);
        i = name_end;
        if braced {
            if self.buf.get(i) != Some(&'}') {
                return Err(ParseError(i, ParseErrKind::InvalidMacroName(mac)));
            }
            i += 1;
        }

        let (argc_opt, next) = self.raw_opt_at(i)?;
        i = next;
        let argc = match argc_opt {
            None => 0,
            Some(s) => s
                .trim()
                .parse::<usize>()
                .map_err(|_| ParseError(i, ParseErrKind::ExpectedNumber(s.clone())))?,
        };
        let (opt, next) = self.raw_opt_at(i)?;
        i = next;
        let (body, end) = self.raw_group_at(i)?;

        let def = MacroDef { argc, opt, body };
        match which {
            "renewcommand" => self.macros.replace_macro(start, &mac, def)?,
            "providecommand" => {
                if self.macros.macro_def(&mac).is_none() {
                    self.macros.register_macro(start, &mac, def)?;
                }
            }
            _ => self.macros.register_macro(start, &mac, def)?,
        }
        self.buf.drain(start..end);
        Ok(())
    }

    fn scan_env_def(&mut self, start: usize, after: usize) -> Result<(), ParseError> {
        let (name, mut i) = self.raw_group_at(after)?;
        let (argc_opt, next) = self.raw_opt_at(i)?;
        i = next;
        let argc = match argc_opt {
            None => 0,
            Some(s) => s
                .trim()
                .parse::<usize>()
                .map_err(|_| ParseError(i, ParseErrKind::ExpectedNumber(s.clone())))?,
        };
        let (opt, next) = self.raw_opt_at(i)?;
        i = next;
        let (begin, next) = self.raw_group_at(i)?;
        let (end_body, end) = self.raw_group_at(next)?;
        self.macros.register_env(
            start,
            &name,
            EnvDef {
                argc,
                opt,
                begin,
                end: end_body,
            },
        )?;
        self.buf.drain(start..end);
        Ok(())
    }

    /// Substitutes `#1..#9` in a macro body.
    fn substitute(body: &str, args: &[String]) -> String {
        let mut out = String::with_capacity(body.len());
        let mut chars = body.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '#' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                Some('#') => {
                    chars.next();
                    out.push('#');
                }
                Some(d) if d.is_ascii_digit() => {
                    let idx = d.to_digit(10).unwrap() as usize;
                    chars.next();
                    if let Some(arg) = args.get(idx - 1) {
                        out += arg;
                    }
                }
                _ => out.push('#'),
            }
        }
        out
    }

    /// Collects `argc` arguments starting at `at`; the first may be
    /// optional with a default.
    fn collect_args(
        &self,
        name: &str,
        mut at: usize,
        argc: usize,
        opt: &Option<String>,
    ) -> Result<(Vec<String>, usize), ParseError> {
        let mut args = Vec::with_capacity(argc);
        if argc > 0
            && let Some(default) = opt
        {
            let (given, next) = self.raw_opt_at(at)?;
            at = next;
            args.push(given.unwrap_or_else(|| default.clone()));
        }
        while args.len() < argc {
            while self.buf.get(at).is_some_and(|c| c.is_whitespace()) {
                at += 1;
            }
            match self.buf.get(at) {
                Some('{') => {
                    let end = self.group_end(at)?;
                    args.push(self.buf[at + 1..end].iter().collect());
                    at = end + 1;
                }
                Some('\\') => {
                    let (n, end) = self.name_at(at + 1);
                    if n.is_empty() {
                        args.push(self.buf[at..(at + 2).min(self.buf.len())].iter().collect());
                        at = (at + 2).min(self.buf.len());
                    } else {
                        args.push("\\".to_string() + &n);
                        at = end;
                    }
                }
                Some(&c) => {
                    args.push(c.to_string());
                    at += 1;
                }
                None => {
                    return Err(ParseError(
                        at,
                        ParseErrKind::MissingArgument {
                            cmd: name.to_string(),
                            expected: argc,
                            got: args.len(),
                        },
                    ));
                }
            }
        }
        Ok((args, at))
    }

    fn bump_expansions(&mut self, pos: usize, name: &str) -> Result<(), ParseError> {
        self.expansions += 1;
        if self.expansions > MAX_EXPANSIONS {
            return Err(ParseError(pos, ParseErrKind::ExpansionTooDeep(name.into())));
        }
        Ok(())
    }

    fn expand_macro(
        &mut self,
        start: usize,
        after: usize,
        name: &str,
        def: &MacroDef,
    ) -> Result<(), ParseError> {
        self.bump_expansions(start, name)?;
        let (args, end) = self.collect_args(name, after, def.argc, &def.opt)?;
        let body = Self::substitute(&def.body, &args);
        self.splice(start, end, &body);
        Ok(())
    }

    /// Finds the `\end{name}` matching a `\begin{name}`, allowing the
    /// same environment to nest. Returns the start of the marker and the
    /// position past it.
    fn find_env_end(&self, from: usize, name: &str) -> Result<(usize, usize), ParseError> {
        let begin_marker = "\\begin{".to_string() + name + "}";
        let end_marker = "\\end{".to_string() + name + "}";
        let mut depth = 1usize;
        let mut i = from;
        while i < self.buf.len() {
            if self.buf[i] == '\\' {
                if self.starts_with(i, &begin_marker) {
                    depth += 1;
                    i += begin_marker.chars().count();
                    continue;
                }
                if self.starts_with(i, &end_marker) {
                    depth -= 1;
                    let past = i + end_marker.chars().count();
                    if depth == 0 {
                        return Ok((i, past));
                    }
                    i = past;
                    continue;
                }
                i += 2;
                continue;
            }
            i += 1;
        }
        Err(ParseError(
            from,
            ParseErrKind::UnclosedGroup("\\begin{".to_string() + name + "}"),
        ))
    }

    /// The name in the next `\end{...}` at or after `from`, if any.
    fn next_env_end(&self, from: usize) -> Option<String> {
        let mut i = from;
        while i < self.buf.len() {
            if self.buf[i] == '\\' && self.starts_with(i, "\\end{") {
                let (name, _) = self.raw_group_at(i + 4).ok()?;
                return Some(name);
            }
            i += 1;
        }
        None
    }

    fn rewrite_environment(&mut self, start: usize, after: usize) -> Result<usize, ParseError> {
        let (name, past_name) = self.raw_group_at(after)?;
        let (end_start, end_past) = match self.find_env_end(past_name, &name) {
            Ok(v) => v,
            Err(e) => {
                if let Some(got) = self.next_env_end(past_name).filter(|g| *g != name) {
                    return Err(ParseError(
                        start,
                        ParseErrKind::MismatchedEnvironment {
                            expected: name,
                            got,
                        },
                    ));
                }
                return Err(e);
            }
        };

        if let Some(def) = self.macros.env_def(&name).cloned() {
            self.bump_expansions(start, &name)?;
            let (args, body_start) = self.collect_args(&name, past_name, def.argc, &def.opt)?;
            let body: String = self.buf[body_start..end_start].iter().collect();
            let text =
                Self::substitute(&def.begin, &args) + &body + &Self::substitute(&def.end, &args);
            self.splice(start, end_past, &text);
            return Ok(start);
        }

        let base = name.trim_end_matches('*');
        if BUILTINS.contains_key(&(base.to_string() + "@env")) {
            self.splice(end_start, end_past, "}\\makeatother");
            let head = "\\makeatletter\\".to_string() + base + "@env{";
            self.splice(start, past_name, &head);
            return Ok(start);
        }

        if self.partial {
            self.errors
                .push(ParseError(start, ParseErrKind::UnknownEnvironment(name)));
            self.splice(end_start, end_past, "");
            self.splice(start, past_name, "");
            return Ok(start);
        }
        Err(ParseError(start, ParseErrKind::UnknownEnvironment(name)))
    }

    // ---- pass two: atoms ----

    /// In partial mode the error is recorded and parsing goes on.
    fn recover(&mut self, err: ParseError) -> Result<(), ParseError> {
        if self.partial {
            self.errors.push(err);
            Ok(())
        } else {
            Err(err)
        }
    }

    pub fn parse_row_until(&mut self, stop: Stop) -> Result<(RowAtom, Ending), ParseError> {
        let mut row = RowAtom::new();
        loop {
            let Some(c) = self.peek() else {
                if stop == Stop::Eof {
                    return Ok((row, Ending::Eof));
                }
                let opener = match stop {
                    Stop::Right => "\\left",
                    _ => "{",
                };
                let err = ParseError(self.pos, ParseErrKind::UnclosedGroup(opener.into()));
                if self.partial {
                    // unterminated groups keep their partial content
                    self.errors.push(err);
                    return Ok((row, Ending::Eof));
                }
                return Err(err);
            };
            let pos = self.pos;
            match c {
                c if c.is_whitespace() => self.pos += 1,
                '}' => {
                    if matches!(stop, Stop::Brace | Stop::Cell) {
                        self.pos += 1;
                        return Ok((row, Ending::Brace));
                    }
                    self.recover(ParseError(pos, ParseErrKind::UnexpectedClose('}')))?;
                    self.pos += 1;
                }
                '{' => {
                    self.pos += 1;
                    let (inner, _) = self.parse_row_until(Stop::Brace)?;
                    // a group is one atom: scripts attach to all of it
                    row.add(Atom::Row(inner));
                }
                '^' | '_' => self.attach_script(&mut row, c == '^')?,
                '\'' | '"' | '`' => {
                    let back = c == '`';
                    let mut n = 0usize;
                    while let Some(q) = self.peek() {
                        match q {
                            '\'' if !back => n += 1,
                            '"' if !back => n += 2,
                            '`' if back => n += 1,
                            _ => break,
                        }
                        self.pos += 1;
                    }
                    attach_primes(&mut row, n, if back { '‵' } else { '′' });
                }
                '&' => {
                    if stop == Stop::Cell {
                        self.pos += 1;
                        return Ok((row, Ending::Amp));
                    }
                    self.recover(ParseError(pos, ParseErrKind::MisplacedAlignment))?;
                    self.pos += 1;
                }
                '$' => {
                    self.recover(ParseError(pos, ParseErrKind::UnmatchedDollar))?;
                    self.pos += 1;
                }
                '~' => {
                    self.pos += 1;
                    row.add(Atom::Space(SpaceAtom::em(0.25)));
                }
                '\\' => {
                    self.pos += 1;
                    match self.peek() {
                        None => self.recover(ParseError(pos, ParseErrKind::UnexpectedEof))?,
                        Some('\\') => {
                            self.pos += 1;
                            // a bracketed extent after \\ is line spacing,
                            // which single-formula layout ignores
                            if self.peek() == Some('[') {
                                let end = self.bracket_end(self.pos)?;
                                self.pos = end + 1;
                            }
                            if stop == Stop::Cell {
                                return Ok((row, Ending::Row));
                            }
                            row.add(Atom::Break);
                        }
                        Some(e) if !e.is_alphabetic() => {
                            self.pos += 1;
                            match escape_atom(e) {
                                Some(a) => row.add(a),
                                None => self.recover(ParseError(
                                    pos,
                                    ParseErrKind::UnknownCommand(e.to_string()),
                                ))?,
                            }
                        }
                        Some(_) => {
                            let name = self.read_name();
                            match name.as_str() {
                                "right" => {
                                    if stop != Stop::Right {
                                        self.recover(ParseError(
                                            pos,
                                            ParseErrKind::UnmatchedRight("right".into()),
                                        ))?;
                                        let _ = self.get_delimiter(pos);
                                        continue;
                                    }
                                    let d = self.get_delimiter(pos)?;
                                    return Ok((row, Ending::Right(d)));
                                }
                                "middle" => {
                                    if stop != Stop::Right {
                                        self.recover(ParseError(
                                            pos,
                                            ParseErrKind::MisplacedMiddle,
                                        ))?;
                                        let _ = self.get_delimiter(pos);
                                        continue;
                                    }
                                    if let Some(code) = self.get_delimiter(pos)? {
                                        row.add(Atom::Middle(
                                            tex_layout::atoms::delim::MiddleAtom { code },
                                        ));
                                    }
                                }
                                "over" | "atop" | "choose" => {
                                    let num = std::mem::take(&mut row);
                                    let (dnom, ending) = self.parse_row_until(stop)?;
                                    let frac = FractionAtom::new(
                                        Atom::Row(num),
                                        Atom::Row(dnom),
                                        name == "over",
                                    );
                                    let atom = if name == "choose" {
                                        Atom::Delimited(DelimitedAtom {
                                            left: Some('('),
                                            right: Some(')'),
                                            base: RowAtom::from_atom(Atom::Fraction(frac)),
                                        })
                                    } else {
                                        Atom::Fraction(frac)
                                    };
                                    let mut outer = RowAtom::new();
                                    outer.add(atom);
                                    return Ok((outer, ending));
                                }
                                // switches that run to the end of the group
                                "color" => {
                                    let spec = self.get_group("color")?;
                                    let fg = crate::commands::colors::color_from(pos, &spec)?;
                                    let (rest, ending) = self.parse_row_until(stop)?;
                                    row.add(Atom::Color(
                                        tex_layout::atoms::wrappers::ColorAtom {
                                            base: Box::new(collapse(rest)),
                                            fg,
                                            bg: tex_layout::graphics::TRANSPARENT,
                                        },
                                    ));
                                    return Ok((row, ending));
                                }
                                "displaystyle" | "textstyle" | "scriptstyle"
                                | "scriptscriptstyle" => {
                                    let style = match name.as_str() {
                                        "displaystyle" => TexStyle::Display,
                                        "textstyle" => TexStyle::Text,
                                        "scriptstyle" => TexStyle::Script,
                                        _ => TexStyle::ScriptScript,
                                    };
                                    let (rest, ending) = self.parse_row_until(stop)?;
                                    row.add(Atom::Style(tex_layout::atoms::wrappers::StyleAtom {
                                        style,
                                        base: Box::new(collapse(rest)),
                                    }));
                                    return Ok((row, ending));
                                }
                                "cr" => {
                                    if stop == Stop::Cell {
                                        return Ok((row, Ending::Row));
                                    }
                                    self.recover(ParseError(
                                        pos,
                                        ParseErrKind::MisplacedAlignment,
                                    ))?;
                                }
                                "limits" | "nolimits" => {
                                    let lt = if name == "limits" {
                                        LimitsType::Limits
                                    } else {
                                        LimitsType::NoLimits
                                    };
                                    match row.last_mut() {
                                        Some(Atom::Symbol(s)) => s.limits = lt,
                                        Some(Atom::BigOperator(b)) => b.limits = lt,
                                        _ => {}
                                    }
                                }
                                // produced by the rewriting pass for
                                // Unicode script codepoints
                                "mathcumsup" | "mathcumsub" => {
                                    let script = self.parse_required(&name)?;
                                    let base = row.pop_last().unwrap_or(Atom::Empty);
                                    let mut cs = match base {
                                        Atom::CumulativeScripts(cs) => cs,
                                        b => CumulativeScriptsAtom::new(b),
                                    };
                                    if name == "mathcumsup" {
                                        cs.add_sup(script);
                                    } else {
                                        cs.add_sub(script);
                                    }
                                    row.add(Atom::CumulativeScripts(cs));
                                }
                                "makeatletter" => self.atletter += 1,
                                "makeatother" => {
                                    self.atletter = self.atletter.saturating_sub(1);
                                }
                                _ => match self.command_to_atom(pos, &name) {
                                    Ok(Some(a)) => row.add(a),
                                    Ok(None) => {}
                                    Err(e) => {
                                        self.recover(e)?;
                                        row.add(Atom::Placeholder(PlaceholderAtom {
                                            text: "\\".to_string() + &name,
                                        }));
                                    }
                                },
                            }
                        }
                    }
                }
                _ => {
                    self.pos += 1;
                    let atom = self.convert_character(c);
                    row.add(atom);
                }
            }
        }
    }

    /// Resolves a named command to an atom: symbols first, then builtin
    /// handlers. Unknown names error in strict mode and render as
    /// typewriter text in partial mode.
    pub fn command_to_atom(&mut self, pos: usize, name: &str) -> Result<Option<Atom>, ParseError> {
        if let Some(sym) = SYMBOLS.get(name) {
            return Ok(Some(Atom::Symbol(SymbolAtom::new(sym.code, sym.typ))));
        }
        if name == "left" {
            return self.parse_left(pos).map(Some);
        }
        if let Some(spec) = BUILTINS.get(name) {
            return (spec.handler)(self, pos);
        }
        if self.partial {
            self.errors
                .push(ParseError(pos, ParseErrKind::UnknownCommand(name.into())));
            return Ok(Some(Atom::Placeholder(PlaceholderAtom {
                text: "\\".to_string() + name,
            })));
        }
        Err(ParseError(pos, ParseErrKind::UnknownCommand(name.into())))
    }

    fn parse_left(&mut self, pos: usize) -> Result<Atom, ParseError> {
        let left = self.get_delimiter(pos)?;
        let (base, ending) = self.parse_row_until(Stop::Right)?;
        let right = match ending {
            Ending::Right(d) => d,
            Ending::Eof if self.partial => None,
            _ => {
                return Err(ParseError(pos, ParseErrKind::UnclosedGroup("\\left".into())));
            }
        };
        Ok(Atom::Delimited(DelimitedAtom { left, right, base }))
    }

    /// The delimiter token after `\left`, `\right`, `\middle` or a `\big`
    /// variant. `.` yields `None`.
    pub fn get_delimiter(&mut self, pos: usize) -> Result<Option<char>, ParseError> {
        self.skip_ws();
        match self.peek() {
            None => Err(ParseError(self.pos, ParseErrKind::UnexpectedEof)),
            Some('\\') => {
                self.pos += 1;
                let name = self.read_name();
                if name.is_empty() {
                    // \| and friends
                    let c = self.peek().ok_or(ParseError(
                        self.pos,
                        ParseErrKind::UnexpectedEof,
                    ))?;
                    self.pos += 1;
                    return match c {
                        '|' => Ok(Some('‖')),
                        '{' => Ok(Some('{')),
                        '}' => Ok(Some('}')),
                        _ => Err(ParseError(
                            pos,
                            ParseErrKind::InvalidDelimiter(c.to_string()),
                        )),
                    };
                }
                match symbols::delimiter(&name) {
                    Some(d) => Ok(d),
                    None => Err(ParseError(pos, ParseErrKind::InvalidDelimiter(name))),
                }
            }
            Some(c) => {
                self.pos += 1;
                let mapped = match c {
                    '<' => Some(Some('⟨')),
                    '>' => Some(Some('⟩')),
                    _ => symbols::delimiter(&c.to_string()),
                };
                mapped.ok_or(ParseError(
                    pos,
                    ParseErrKind::InvalidDelimiter(c.to_string()),
                ))
            }
        }
    }

    /// One required argument, parsed to a single atom.
    pub fn parse_required(&mut self, cmd: &str) -> Result<Atom, ParseError> {
        self.skip_ws();
        let pos = self.pos;
        match self.peek() {
            None => Err(ParseError(
                pos,
                ParseErrKind::MissingArgument {
                    cmd: cmd.to_string(),
                    expected: 1,
                    got: 0,
                },
            )),
            Some('{') => {
                self.pos += 1;
                let (row, _) = self.parse_row_until(Stop::Brace)?;
                Ok(collapse(row))
            }
            Some('\\') => {
                self.pos += 1;
                match self.peek() {
                    Some(e) if !e.is_alphabetic() => {
                        self.pos += 1;
                        escape_atom(e).ok_or(ParseError(
                            pos,
                            ParseErrKind::UnknownCommand(e.to_string()),
                        ))
                    }
                    _ => {
                        let name = self.read_name();
                        Ok(self.command_to_atom(pos, &name)?.unwrap_or(Atom::Empty))
                    }
                }
            }
            Some(c) => {
                self.pos += 1;
                Ok(self.convert_character(c))
            }
        }
    }

    /// Raw text of the next `{...}` group.
    pub fn get_group(&mut self, cmd: &str) -> Result<String, ParseError> {
        self.skip_ws();
        if self.peek() != Some('{') {
            // a lone token counts as a one-character group
            return match self.peek() {
                Some(c) if c != '\\' => {
                    self.pos += 1;
                    Ok(c.to_string())
                }
                _ => Err(ParseError(
                    self.pos,
                    ParseErrKind::MissingArgument {
                        cmd: cmd.to_string(),
                        expected: 1,
                        got: 0,
                    },
                )),
            };
        }
        let end = self.group_end(self.pos)?;
        let content = self.buf[self.pos + 1..end].iter().collect();
        self.pos = end + 1;
        Ok(content)
    }

    /// Raw text of an optional `[...]` argument.
    pub fn get_optional(&mut self) -> Result<Option<String>, ParseError> {
        self.skip_ws();
        if self.peek() != Some('[') {
            return Ok(None);
        }
        let end = self.bracket_end(self.pos)?;
        let content = self.buf[self.pos + 1..end].iter().collect();
        self.pos = end + 1;
        Ok(Some(content))
    }

    /// A length argument, braced or bare (`\kern1.5em`).
    pub fn get_length_like(&mut self, cmd: &str) -> Result<String, ParseError> {
        self.skip_ws();
        if self.peek() == Some('{') {
            return self.get_group(cmd);
        }
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if matches!(c, '0'..='9' | '.' | '+' | '-') {
                s.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        let mut letters = 0;
        while let Some(c) = self.peek() {
            if c.is_ascii_lowercase() && letters < 2 {
                s.push(c);
                self.pos += 1;
                letters += 1;
            } else {
                break;
            }
        }
        if s.is_empty() {
            return Err(ParseError(
                self.pos,
                ParseErrKind::MissingArgument {
                    cmd: cmd.to_string(),
                    expected: 1,
                    got: 0,
                },
            ));
        }
        Ok(s)
    }

    /// Parses text that has been pulled out of the buffer, carrying over
    /// macros and mode.
    pub fn parse_fragment(&mut self, pos: usize, text: &str) -> Result<Atom, ParseError> {
        let mut p = Parser::new(text, self.macros.clone(), self.partial);
        p.atletter = self.atletter;
        let result = p
            .preprocess()
            .and_then(|()| p.parse_row_until(Stop::Eof))
            .map(|(row, _)| collapse(row))
            .map_err(|e| ParseError(pos, e.1));
        self.errors.append(&mut p.errors);
        result
    }

    /// A length with units, e.g. `1.5em` or `-3mu`.
    pub fn parse_length(&mut self, pos: usize, text: &str) -> Result<(UnitType, f32), ParseError> {
        let s = text.trim();
        let split = s
            .char_indices()
            .find(|(_, c)| !matches!(c, '0'..='9' | '.' | '-' | '+'))
            .map_or(s.len(), |(i, _)| i);
        let value: f32 = s[..split]
            .parse()
            .map_err(|_| ParseError(pos, ParseErrKind::ExpectedLength(s.to_string())))?;
        let unit = UnitType::parse(s[split..].trim())
            .ok_or_else(|| ParseError(pos, ParseErrKind::ExpectedLength(s.to_string())))?;
        Ok((unit, value))
    }

    pub fn parse_float(&mut self, pos: usize, text: &str) -> Result<f32, ParseError> {
        text.trim()
            .parse()
            .map_err(|_| ParseError(pos, ParseErrKind::ExpectedNumber(text.to_string())))
    }

    /// Consumes the `{` opening an environment body.
    pub fn expect_group_open(&mut self, cmd: &str) -> Result<(), ParseError> {
        self.skip_ws();
        if self.peek() == Some('{') {
            self.pos += 1;
            Ok(())
        } else {
            Err(ParseError(
                self.pos,
                ParseErrKind::MissingArgument {
                    cmd: cmd.to_string(),
                    expected: 1,
                    got: 0,
                },
            ))
        }
    }

    /// Parses array cells up to the closing brace of the environment body.
    pub fn parse_cells(
        &mut self,
        kind: MatrixKind,
        col_aligns: Vec<Alignment>,
    ) -> Result<MatrixAtom, ParseError> {
        let mut arr = ArrayFormula::new();
        loop {
            let (row, ending) = self.parse_row_until(Stop::Cell)?;
            self.finish_cell(&mut arr, row);
            match ending {
                Ending::Amp => {}
                Ending::Row => arr.new_row(),
                _ => break,
            }
        }
        Ok(arr.into_matrix(col_aligns, kind))
    }

    fn finish_cell(&mut self, arr: &mut ArrayFormula, mut row: RowAtom) {
        // rules and intertext lines stand as rows of their own
        while matches!(row.elements.first(), Some(Atom::Hline(_))) {
            arr.special_row(row.elements.remove(0));
        }
        if row.len() == 1 && matches!(row.elements[0], Atom::InterText(_)) {
            arr.special_row(row.elements.remove(0));
            return;
        }
        if let Some(c) = self.pending_row_color.take() {
            arr.row_colors.insert(arr.row_index(), c);
        }
        if let Some(c) = self.pending_cell_color.take() {
            arr.cell_colors.insert((arr.row_index(), arr.col_index()), c);
        }
        let cell = if row.is_empty() {
            Atom::Empty
        } else {
            collapse(row)
        };
        arr.new_cell(cell);
    }

    fn attach_script(&mut self, row: &mut RowAtom, is_sup: bool) -> Result<(), ParseError> {
        let pos = self.pos;
        self.pos += 1;
        let script = self.parse_required(if is_sup { "^" } else { "_" })?;
        let kind = if is_sup {
            DoubleScriptKind::Sup
        } else {
            DoubleScriptKind::Sub
        };

        let atom = match row.pop_last() {
            Some(Atom::Scripts(mut s)) => {
                let slot = if is_sup { &mut s.sup } else { &mut s.sub };
                if slot.is_some() {
                    self.recover(ParseError(pos, ParseErrKind::DoubleScript(kind)))?;
                } else {
                    *slot = Some(Box::new(script));
                }
                Atom::Scripts(s)
            }
            Some(Atom::BigOperator(mut b)) => {
                let slot = if is_sup { &mut b.over } else { &mut b.under };
                if slot.is_some() {
                    self.recover(ParseError(pos, ParseErrKind::DoubleScript(kind)))?;
                } else {
                    *slot = Some(Box::new(script));
                }
                Atom::BigOperator(b)
            }
            Some(Atom::CumulativeScripts(mut cs)) => {
                if is_sup {
                    cs.add_sup(script);
                } else {
                    cs.add_sub(script);
                }
                Atom::CumulativeScripts(cs)
            }
            Some(base @ Atom::OverUnderDelimiter(_)) => {
                // the script becomes the brace label
                let arg = StackArg::auto(script);
                let (over, under) = if is_sup { (Some(arg), None) } else { (None, Some(arg)) };
                Atom::Stack(StackAtom {
                    base: Some(Box::new(base)),
                    over,
                    under,
                })
            }
            Some(base) if base.left_type() == AtomType::BigOperator => {
                let (under, over) = if is_sup {
                    (None, Some(script))
                } else {
                    (Some(script), None)
                };
                Atom::BigOperator(BigOpAtom::new(base, under, over))
            }
            base => {
                let (sub, sup) = if is_sup {
                    (None, Some(script))
                } else {
                    (Some(script), None)
                };
                Atom::Scripts(ScriptsAtom::new(base, sub, sup))
            }
        };
        row.add(atom);
        Ok(())
    }

    /// An input character outside any command: ASCII symbols carry their
    /// TeX class, characters from text alphabets collect into runs, and
    /// everything else is a math character.
    pub fn convert_character(&mut self, c: char) -> Atom {
        if let Some(sym) = symbols::char_symbol(c) {
            return Atom::Symbol(SymbolAtom::new(sym.code, sym.typ));
        }
        if let Some(block) = symbols::text_block(c) {
            let mut content = String::new();
            content.push(c);
            while let Some(n) = self.peek() {
                if symbols::text_block(n) != Some(block) {
                    break;
                }
                content.push(n);
                self.pos += 1;
            }
            return Atom::Text(TextAtom {
                content,
                style: FontStyle::empty(),
            });
        }
        Atom::Char(CharAtom::new(c, true))
    }
}

/// A row of one element is that element.
pub fn collapse(mut row: RowAtom) -> Atom {
    if row.len() == 1 {
        row.pop_last().unwrap_or(Atom::Empty)
    } else {
        Atom::Row(row)
    }
}

fn attach_primes(row: &mut RowAtom, n: usize, mark: char) {
    let base = row.pop_last().unwrap_or(Atom::Empty);
    let mut cs = match base {
        Atom::CumulativeScripts(cs) => cs,
        b => CumulativeScriptsAtom::new(b),
    };
    for _ in 0..n {
        cs.add_sup(Atom::Symbol(SymbolAtom::new(mark, AtomType::Ordinary)));
    }
    row.add(Atom::CumulativeScripts(cs));
}

fn escape_atom(c: char) -> Option<Atom> {
    Some(match c {
        '{' => Atom::Symbol(SymbolAtom::new('{', AtomType::Opening)),
        '}' => Atom::Symbol(SymbolAtom::new('}', AtomType::Closing)),
        '|' => Atom::Symbol(SymbolAtom::new('‖', AtomType::Ordinary)),
        '%' | '$' | '&' | '#' | '_' => Atom::Char(CharAtom::new(c, false)),
        ',' => Atom::Space(SpaceAtom::Skip(SpaceType::Thin)),
        ':' => Atom::Space(SpaceAtom::Skip(SpaceType::Medium)),
        ';' => Atom::Space(SpaceAtom::Skip(SpaceType::Thick)),
        '!' => Atom::Space(SpaceAtom::Skip(SpaceType::NegThin)),
        ' ' | '\n' => Atom::Space(SpaceAtom::em(0.25)),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Formula {
        parse_with(s, MacroRegistry::new(), false).unwrap()
    }

    fn parse_err(s: &str) -> ParseError {
        parse_with(s, MacroRegistry::new(), false).unwrap_err()
    }

    #[test]
    fn characters_become_atoms() {
        let f = parse("ab1");
        assert_eq!(f.root.len(), 3);
        assert!(matches!(f.root.elements[0], Atom::Char(_)));
    }

    #[test]
    fn ascii_operators_carry_their_class() {
        let f = parse("a+b=c");
        assert_eq!(f.root.elements[1].left_type(), AtomType::BinaryOperator);
        assert_eq!(f.root.elements[3].left_type(), AtomType::Relation);
    }

    #[test]
    fn groups_collapse_to_one_atom() {
        let f = parse("{ab}c");
        assert_eq!(f.root.len(), 2);
        assert!(matches!(f.root.elements[0], Atom::Row(_)));
    }

    #[test]
    fn comments_are_stripped() {
        let f = parse("a % a comment + b\nc");
        assert_eq!(f.root.len(), 2);
    }

    #[test]
    fn scripts_attach_to_the_previous_atom() {
        let f = parse("x^2");
        assert_eq!(f.root.len(), 1);
        let Atom::Scripts(s) = &f.root.elements[0] else {
            panic!("expected scripts");
        };
        assert!(s.sup.is_some());
        assert!(s.sub.is_none());
    }

    #[test]
    fn sup_and_sub_merge_on_one_base() {
        let f = parse("x^2_i");
        assert_eq!(f.root.len(), 1);
        let Atom::Scripts(s) = &f.root.elements[0] else {
            panic!("expected scripts");
        };
        assert!(s.sup.is_some() && s.sub.is_some());
    }

    #[test]
    fn double_superscript_is_an_error() {
        let e = parse_err("x^2^3");
        assert!(matches!(e.1, ParseErrKind::DoubleScript(DoubleScriptKind::Sup)));
    }

    #[test]
    fn script_with_no_base_gets_an_empty_one() {
        let f = parse("^2");
        let Atom::Scripts(s) = &f.root.elements[0] else {
            panic!("expected scripts");
        };
        assert!(s.base.is_none());
    }

    #[test]
    fn big_operator_scripts_become_limits() {
        let f = parse("\\sum_1^n");
        assert_eq!(f.root.len(), 1);
        let Atom::BigOperator(b) = &f.root.elements[0] else {
            panic!("expected big operator");
        };
        assert!(b.under.is_some() && b.over.is_some());
    }

    #[test]
    fn primes_accumulate() {
        let f = parse("f''");
        let Atom::CumulativeScripts(cs) = &f.root.elements[0] else {
            panic!("expected cumulative scripts");
        };
        assert_eq!(cs.sup.len(), 2);
    }

    #[test]
    fn backprime_attaches_like_a_prime() {
        let f = parse("x`");
        assert_eq!(f.root.len(), 1);
        let Atom::CumulativeScripts(cs) = &f.root.elements[0] else {
            panic!("expected cumulative scripts");
        };
        assert_eq!(cs.sup.len(), 1);
        let Atom::Symbol(s) = &cs.sup.elements[0] else {
            panic!("expected a symbol mark");
        };
        assert_eq!(s.code, '‵');
    }

    #[test]
    fn prime_then_caret_share_the_superscript() {
        let f = parse("f'^2");
        let Atom::CumulativeScripts(cs) = &f.root.elements[0] else {
            panic!("expected cumulative scripts");
        };
        assert_eq!(cs.sup.len(), 2);
    }

    #[test]
    fn unicode_superscript_rewrites() {
        let f = parse("x²");
        assert_eq!(f.root.len(), 1);
        assert!(matches!(f.root.elements[0], Atom::CumulativeScripts(_)));
    }

    #[test]
    fn degree_sign_rewrites_to_circ() {
        let f = parse("90°");
        let Atom::Scripts(s) = f.root.elements.last().unwrap() else {
            panic!("expected scripts");
        };
        assert!(s.sup.is_some());
    }

    #[test]
    fn unknown_command_errors_in_strict_mode() {
        let e = parse_err("\\nosuchthing");
        assert!(matches!(e.1, ParseErrKind::UnknownCommand(_)));
        assert_eq!(e.0, 0);
    }

    #[test]
    fn unknown_command_is_a_placeholder_in_partial_mode() {
        let f = parse_with("a\\nosuchthing b", MacroRegistry::new(), true).unwrap();
        assert!(
            f.root
                .elements
                .iter()
                .any(|a| matches!(a, Atom::Placeholder(_)))
        );
    }

    #[test]
    fn unclosed_group_is_reported() {
        let e = parse_err("{a");
        assert!(matches!(e.1, ParseErrKind::UnclosedGroup(_)));
    }

    #[test]
    fn stray_close_is_reported() {
        let e = parse_err("a}");
        assert!(matches!(e.1, ParseErrKind::UnexpectedClose('}')));
    }

    #[test]
    fn left_right_build_a_delimited_atom() {
        let f = parse("\\left( \\frac{a}{b} \\right)");
        assert_eq!(f.root.len(), 1);
        let Atom::Delimited(d) = &f.root.elements[0] else {
            panic!("expected delimited");
        };
        assert_eq!(d.left, Some('('));
        assert_eq!(d.right, Some(')'));
    }

    #[test]
    fn empty_delimiter_dot() {
        let f = parse("\\left. x \\right|");
        let Atom::Delimited(d) = &f.root.elements[0] else {
            panic!("expected delimited");
        };
        assert_eq!(d.left, None);
        assert_eq!(d.right, Some('|'));
    }

    #[test]
    fn middle_outside_left_right_is_an_error() {
        let e = parse_err("a \\middle| b");
        assert!(matches!(e.1, ParseErrKind::MisplacedMiddle));
    }

    #[test]
    fn unmatched_right_is_an_error() {
        let e = parse_err("a \\right)");
        assert!(matches!(e.1, ParseErrKind::UnmatchedRight(_)));
    }

    #[test]
    fn over_splits_the_row() {
        let f = parse("a+1 \\over b");
        assert_eq!(f.root.len(), 1);
        let Atom::Fraction(frac) = &f.root.elements[0] else {
            panic!("expected fraction");
        };
        assert!(frac.rule);
        let Atom::Row(num) = frac.num.as_ref() else {
            panic!("expected row numerator");
        };
        assert_eq!(num.len(), 3);
    }

    #[test]
    fn choose_wraps_in_parens() {
        let f = parse("n \\choose k");
        assert!(matches!(f.root.elements[0], Atom::Delimited(_)));
    }

    #[test]
    fn newcommand_defines_and_erases() {
        let f = parse("\\newcommand{\\half}{\\frac{1}{2}}\\half");
        assert_eq!(f.root.len(), 1);
        assert!(matches!(f.root.elements[0], Atom::Fraction(_)));
    }

    #[test]
    fn macro_arguments_substitute() {
        let f = parse("\\newcommand{\\sq}[1]{#1^2}\\sq{x}");
        assert_eq!(f.root.len(), 1);
        assert!(matches!(f.root.elements[0], Atom::Scripts(_)));
    }

    #[test]
    fn macro_optional_default_applies() {
        let f = parse("\\newcommand{\\pow}[2][2]{#2^{#1}}\\pow{x}\\pow[3]{y}");
        assert_eq!(f.root.len(), 2);
    }

    #[test]
    fn recursive_macro_is_caught() {
        let e = parse_err("\\newcommand{\\loopy}{\\loopy}\\loopy");
        assert!(matches!(e.1, ParseErrKind::ExpansionTooDeep(_)));
    }

    #[test]
    fn renewcommand_needs_a_target() {
        let e = parse_err("\\renewcommand{\\nope}{x}");
        assert!(matches!(e.1, ParseErrKind::UndefinedMacro(_)));
    }

    #[test]
    fn user_environment_expands() {
        let f = parse(
            "\\newenvironment{brak}{\\left[}{\\right]}\\begin{brak}x\\end{brak}",
        );
        assert_eq!(f.root.len(), 1);
        assert!(matches!(f.root.elements[0], Atom::Delimited(_)));
    }

    #[test]
    fn mismatched_environment_names_both_sides() {
        let e = parse_err("\\begin{matrix}x\\end{pmatrix}");
        let ParseErrKind::MismatchedEnvironment { expected, got } = e.1 else {
            panic!("expected a mismatch");
        };
        assert_eq!(expected, "matrix");
        assert_eq!(got, "pmatrix");
    }

    #[test]
    fn unknown_environment_is_an_error() {
        let e = parse_err("\\begin{nosuch}x\\end{nosuch}");
        assert!(matches!(e.1, ParseErrKind::UnknownEnvironment(_)));
    }

    #[test]
    fn alignment_outside_array_is_an_error() {
        let e = parse_err("a & b");
        assert!(matches!(e.1, ParseErrKind::MisplacedAlignment));
    }

    #[test]
    fn cyrillic_collects_into_a_text_run() {
        let f = parse("х+у");
        assert_eq!(f.root.len(), 3);
        assert!(matches!(f.root.elements[0], Atom::Text(_)));
    }

    #[test]
    fn limits_overrides_attachment() {
        let f = parse("\\int\\limits_0^1");
        let Atom::BigOperator(b) = &f.root.elements[0] else {
            panic!("expected big operator");
        };
        assert_eq!(b.limits, LimitsType::Limits);
    }

    #[test]
    fn error_position_points_into_the_input() {
        let e = parse_err("abc\\nope");
        assert_eq!(e.0, 3);
    }
}
