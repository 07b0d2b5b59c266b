// SPDX-License-Identifier: MIT OR Apache-2.0

//! PHP array file reader.
//!
//! Reads files of the form `<?php return [ ... ];` without executing anything. Only
//! literal data is accepted: arrays (short `[...]` or `array(...)` syntax), strings,
//! numbers, booleans and `null`. A `declare(...)`, `namespace` or `use` preamble and
//! comments are skipped.

use crate::domain::{ConfigError, ConfigValue, Mapping, Result};
use crate::ports::{ConfigParser, FileReader, Filesystem, Source};
use std::collections::HashMap;
use std::num::IntErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parser for PHP files returning an array literal.
///
/// Arrays whose keys are exactly `0..n` in insertion order become sequences; any
/// other array becomes a mapping. Numeric string keys such as `'8'` are treated as
/// integers, the way PHP does.
///
/// # Examples
///
/// ```rust
/// use dircfg::adapters::PhpArrayParser;
/// use dircfg::domain::ConfigValue;
/// use dircfg::ports::ConfigParser;
///
/// let value = PhpArrayParser::new()
///     .parse("<?php return ['name' => 'Themosis', 'debug' => true];")
///     .unwrap();
/// assert_eq!(value.lookup("name"), Some(&ConfigValue::from("Themosis")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PhpArrayParser;

impl PhpArrayParser {
    /// Creates a PHP array parser.
    pub fn new() -> Self {
        PhpArrayParser
    }
}

impl ConfigParser for PhpArrayParser {
    fn parse(&self, content: &str) -> Result<ConfigValue> {
        Parser::new(content).document()
    }

    fn supported_extensions(&self) -> &[&str] {
        &["php"]
    }
}

/// Reader for `.php` array files.
#[derive(Debug, Clone)]
pub struct PhpReader {
    filesystem: Arc<dyn Filesystem>,
    path: Option<PathBuf>,
    parser: PhpArrayParser,
}

impl PhpReader {
    /// Creates an unbound reader using `filesystem` for file access.
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            filesystem,
            path: None,
            parser: PhpArrayParser::new(),
        }
    }
}

impl FileReader for PhpReader {
    fn format(&self) -> &str {
        "php"
    }

    fn read_file(&self, path: &Path) -> Result<ConfigValue> {
        self.filesystem.evaluate_as_data(path, &self.parser)
    }

    fn supported_extensions(&self) -> &[&str] {
        self.parser.supported_extensions()
    }
}

impl Source for PhpReader {
    fn point_at(&mut self, path: &Path) {
        self.path = Some(path.to_path_buf());
    }

    fn source_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ArrayKey {
    Index(i64),
    Name(String),
}

impl ArrayKey {
    fn from_value(value: ConfigValue) -> std::result::Result<Self, &'static str> {
        match value {
            ConfigValue::Integer(i) => Ok(ArrayKey::Index(i)),
            ConfigValue::String(s) => Ok(match canonical_index(&s) {
                Some(i) => ArrayKey::Index(i),
                None => ArrayKey::Name(s),
            }),
            ConfigValue::Bool(b) => Ok(ArrayKey::Index(i64::from(b))),
            ConfigValue::Null => Ok(ArrayKey::Name(String::new())),
            ConfigValue::Float(f) if f.is_finite() => Ok(ArrayKey::Index(f.trunc() as i64)),
            ConfigValue::Float(_) => Err("non-finite numbers cannot be used as array keys"),
            ConfigValue::Sequence(_) | ConfigValue::Mapping(_) => {
                Err("arrays cannot be used as array keys")
            }
        }
    }

    fn into_string(self) -> String {
        match self {
            ArrayKey::Index(i) => i.to_string(),
            ArrayKey::Name(name) => name,
        }
    }
}

/// Returns the integer a string key stands for, if it is written canonically.
fn canonical_index(s: &str) -> Option<i64> {
    let i: i64 = s.parse().ok()?;
    (i.to_string() == s).then_some(i)
}

#[derive(Default)]
struct ArrayBuilder {
    entries: Vec<(ArrayKey, ConfigValue)>,
    positions: HashMap<ArrayKey, usize>,
    next_index: i64,
}

impl ArrayBuilder {
    fn push(&mut self, value: ConfigValue) {
        self.insert(ArrayKey::Index(self.next_index), value);
    }

    // A repeated key replaces the value but keeps its original position.
    fn insert(&mut self, key: ArrayKey, value: ConfigValue) {
        if let ArrayKey::Index(i) = key {
            if i >= self.next_index {
                self.next_index = i.saturating_add(1);
            }
        }
        match self.positions.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    fn finish(self) -> ConfigValue {
        let is_list = self
            .entries
            .iter()
            .enumerate()
            .all(|(i, (key, _))| matches!(key, ArrayKey::Index(n) if usize::try_from(*n) == Ok(i)));

        if is_list {
            ConfigValue::Sequence(self.entries.into_iter().map(|(_, value)| value).collect())
        } else {
            let mapping: Mapping = self
                .entries
                .into_iter()
                .map(|(key, value)| (key.into_string(), value))
                .collect();
            ConfigValue::Mapping(mapping)
        }
    }
}

/// Deepest nesting of arrays and signs accepted in one expression.
const MAX_NESTING_DEPTH: usize = 128;

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &str) -> Result<()> {
        self.skip_trivia()?;
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", token)))
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn error(&self, message: impl AsRef<str>) -> ConfigError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, pos: usize, message: impl AsRef<str>) -> ConfigError {
        let consumed = &self.src[..pos.min(self.src.len())];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0)
            + 1;
        ConfigError::invalid(
            format!("{} at line {}, column {}", message.as_ref(), line, column),
            None,
        )
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            let rest = self.rest();
            if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else if rest.starts_with("//") || rest.starts_with('#') {
                let line_end = rest.find('\n').unwrap_or(rest.len());
                let tag = rest.find("?>").unwrap_or(rest.len());
                self.pos += line_end.min(tag);
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(self.error("unterminated comment")),
                }
            } else {
                return Ok(());
            }
        }
    }

    fn identifier(&mut self) -> &'a str {
        self.take_while(|c| c.is_alphanumeric() || c == '_' || c == '\\')
    }

    fn document(mut self) -> Result<ConfigValue> {
        self.eat("\u{feff}");
        self.take_while(char::is_whitespace);
        if self.rest().get(..5).is_some_and(|tag| tag.eq_ignore_ascii_case("<?php")) {
            self.pos += 5;
        }

        loop {
            self.skip_trivia()?;
            let start = self.pos;
            let word = self.identifier().to_ascii_lowercase();
            match word.as_str() {
                "return" => break,
                "declare" => {
                    self.expect("(")?;
                    self.skip_balanced()?;
                    self.expect(";")?;
                }
                "namespace" | "use" => self.skip_statement()?,
                "" => return Err(self.error("expected a return statement")),
                other => {
                    return Err(self.error_at(start, format!("unsupported statement '{}'", other)))
                }
            }
        }

        let value = self.expression()?;

        self.skip_trivia()?;
        if !self.eat(";") && !self.rest().starts_with("?>") {
            return Err(self.error("expected ';'"));
        }
        self.skip_trivia()?;
        self.eat("?>");
        self.take_while(char::is_whitespace);
        if !self.rest().is_empty() {
            return Err(self.error("unexpected content after return statement"));
        }

        Ok(value)
    }

    fn skip_balanced(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.bump() {
                Some('(') => depth += 1,
                Some(')') => depth -= 1,
                Some(_) => {}
                None => return Err(self.error("expected ')'")),
            }
        }
        Ok(())
    }

    fn skip_statement(&mut self) -> Result<()> {
        match self.rest().find(';') {
            Some(end) => {
                self.pos += end + 1;
                Ok(())
            }
            None => Err(self.error("expected ';'")),
        }
    }

    fn expression(&mut self) -> Result<ConfigValue> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = self.nested_expression();
        self.depth -= 1;
        value
    }

    fn nested_expression(&mut self) -> Result<ConfigValue> {
        self.skip_trivia()?;
        let start = self.pos;

        match self.peek() {
            Some('[') => {
                self.bump();
                self.array_items("]")
            }
            Some('\'') => self.single_quoted().map(ConfigValue::String),
            Some('"') => self.double_quoted().map(ConfigValue::String),
            Some('-') => {
                self.bump();
                let operand = self.expression()?;
                negate(operand).ok_or_else(|| self.error_at(start, "only numbers can be negated"))
            }
            Some('+') => {
                self.bump();
                match self.expression()? {
                    number @ (ConfigValue::Integer(_) | ConfigValue::Float(_)) => Ok(number),
                    _ => Err(self.error_at(start, "unary '+' applies only to numbers")),
                }
            }
            Some(c) if c.is_ascii_digit() => self.number(),
            Some('.') if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => {
                let word = self.identifier().to_ascii_lowercase();
                match word.as_str() {
                    "true" => Ok(ConfigValue::Bool(true)),
                    "false" => Ok(ConfigValue::Bool(false)),
                    "null" => Ok(ConfigValue::Null),
                    "array" => {
                        self.expect("(")?;
                        self.array_items(")")
                    }
                    other => Err(self.error_at(start, format!("unsupported expression '{}'", other))),
                }
            }
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn array_items(&mut self, close: &str) -> Result<ConfigValue> {
        let mut builder = ArrayBuilder::default();

        loop {
            self.skip_trivia()?;
            if self.eat(close) {
                break;
            }

            let key_start = self.pos;
            let first = self.expression()?;
            self.skip_trivia()?;
            if self.eat("=>") {
                let key =
                    ArrayKey::from_value(first).map_err(|message| self.error_at(key_start, message))?;
                let value = self.expression()?;
                builder.insert(key, value);
            } else {
                builder.push(first);
            }

            self.skip_trivia()?;
            if self.eat(",") {
                continue;
            }
            if self.eat(close) {
                break;
            }
            return Err(self.error(format!("expected ',' or '{}'", close)));
        }

        Ok(builder.finish())
    }

    fn single_quoted(&mut self) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\'') => return Ok(out),
                Some('\\') => match self.peek() {
                    Some(c @ ('\'' | '\\')) => {
                        self.bump();
                        out.push(c);
                    }
                    _ => out.push('\\'),
                },
                Some(c) => out.push(c),
                None => return Err(self.error_at(start, "unterminated string")),
            }
        }
    }

    fn double_quoted(&mut self) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('$')
                    if self
                        .peek()
                        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '{') =>
                {
                    return Err(self.error("variable interpolation is not supported"));
                }
                Some('\\') => self.escape(&mut out)?,
                Some(c) => out.push(c),
                None => return Err(self.error_at(start, "unterminated string")),
            }
        }
    }

    fn escape(&mut self, out: &mut String) -> Result<()> {
        let simple = match self.peek() {
            Some('n') => Some('\n'),
            Some('t') => Some('\t'),
            Some('r') => Some('\r'),
            Some('v') => Some('\u{0B}'),
            Some('e') => Some('\u{1B}'),
            Some('f') => Some('\u{0C}'),
            Some(c @ ('\\' | '$' | '"')) => Some(c),
            _ => None,
        };
        if let Some(c) = simple {
            self.bump();
            out.push(c);
            return Ok(());
        }

        match self.peek() {
            Some(c) if c.is_digit(8) => {
                let digits = self.take_limited(3, |c| c.is_digit(8));
                let code = u32::from_str_radix(digits, 8).unwrap_or(0) & 0xFF;
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            Some('x') if self.peek_second().is_some_and(|c| c.is_ascii_hexdigit()) => {
                self.bump();
                let digits = self.take_limited(2, |c| c.is_ascii_hexdigit());
                let code = u32::from_str_radix(digits, 16).unwrap_or(0);
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            Some('u') if self.peek_second() == Some('{') => {
                let start = self.pos;
                self.pos += 2;
                let digits = self.take_while(|c| c.is_ascii_hexdigit());
                if !self.eat("}") {
                    return Err(self.error_at(start, "invalid unicode escape"));
                }
                let c = u32::from_str_radix(digits, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error_at(start, "invalid unicode escape"))?;
                out.push(c);
            }
            _ => out.push('\\'),
        }
        Ok(())
    }

    fn take_limited(&mut self, limit: usize, predicate: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        let mut taken = 0;
        while taken < limit && self.peek().is_some_and(&predicate) {
            self.bump();
            taken += 1;
        }
        &self.src[start..self.pos]
    }

    fn number(&mut self) -> Result<ConfigValue> {
        let start = self.pos;

        let radix = match self.rest().get(..2).map(str::to_ascii_lowercase).as_deref() {
            Some("0x") => Some(16),
            Some("0b") => Some(2),
            Some("0o") => Some(8),
            _ => None,
        };
        if let Some(radix) = radix {
            self.pos += 2;
            let digits = self.take_while(|c| c.is_digit(radix) || c == '_').replace('_', "");
            return self.integer(&digits, radix, start);
        }

        let mut text = self
            .take_while(|c| c.is_ascii_digit() || c == '_')
            .replace('_', "");
        let mut is_float = false;

        if self.peek() == Some('.') {
            self.bump();
            is_float = true;
            text.push('.');
            text.push_str(&self.take_while(|c| c.is_ascii_digit() || c == '_').replace('_', ""));
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent_start = self.pos;
            self.bump();
            let mut exponent = String::from("e");
            if let Some(sign @ ('+' | '-')) = self.peek() {
                self.bump();
                exponent.push(sign);
            }
            let digits = self.take_while(|c| c.is_ascii_digit());
            if digits.is_empty() {
                self.pos = exponent_start;
            } else {
                is_float = true;
                text.push_str(&exponent);
                text.push_str(digits);
            }
        }

        if is_float {
            return text
                .parse::<f64>()
                .map(ConfigValue::Float)
                .map_err(|_| self.error_at(start, format!("invalid number '{}'", text)));
        }

        if text.len() > 1 && text.starts_with('0') {
            self.integer(&text[1..], 8, start)
        } else {
            self.integer(&text, 10, start)
        }
    }

    fn integer(&self, digits: &str, radix: u32, start: usize) -> Result<ConfigValue> {
        if digits.is_empty() {
            return Err(self.error_at(start, "invalid number"));
        }
        match i64::from_str_radix(digits, radix) {
            Ok(i) => Ok(ConfigValue::Integer(i)),
            // Integers beyond i64 become floats.
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow) => {
                if radix == 10 {
                    if let Ok(f) = digits.parse::<f64>() {
                        return Ok(ConfigValue::Float(f));
                    }
                }
                Ok(ConfigValue::Float(digits.chars().fold(0.0, |acc, c| {
                    acc * f64::from(radix) + f64::from(c.to_digit(radix).unwrap_or(0))
                })))
            }
            Err(_) => Err(self.error_at(start, format!("invalid number '{}'", digits))),
        }
    }
}

fn negate(value: ConfigValue) -> Option<ConfigValue> {
    match value {
        ConfigValue::Integer(i) => Some(
            i.checked_neg()
                .map(ConfigValue::Integer)
                .unwrap_or(ConfigValue::Float(-(i as f64))),
        ),
        ConfigValue::Float(f) => Some(ConfigValue::Float(-f)),
        _ => None,
    }
}
