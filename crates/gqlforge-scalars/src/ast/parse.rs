use super::FloatValue;
use super::IntValue;
use super::Type;
use super::Value;
use crate::Name;
use std::str::Chars;

/// A syntax error in a value literal or type reference.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("syntax error at index {index}: {message}")]
pub struct SyntaxError {
    pub message: String,
    /// Byte offset in the source text
    pub index: usize,
}

/// Nesting depth of lists, objects and list types accepted by default
pub const DEFAULT_RECURSION_LIMIT: usize = 500;

/// Configuration for parsing value literals and type references.
///
/// ```
/// use gqlforge_scalars::ast::LiteralParser;
///
/// let parser = LiteralParser::new().recursion_limit(2);
/// assert!(parser.parse_value("[[1]]").is_ok());
/// assert!(parser.parse_value("[[[1]]]").is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LiteralParser {
    recursion_limit: usize,
}

impl Default for LiteralParser {
    fn default() -> Self {
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl LiteralParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure how deeply lists and objects may nest.
    /// Deeper input is a [`SyntaxError`].
    pub fn recursion_limit(mut self, value: usize) -> Self {
        self.recursion_limit = value;
        self
    }

    pub fn parse_value(&self, source: &str) -> Result<Value, SyntaxError> {
        let mut cursor = Cursor::new(source, self.recursion_limit);
        let value = cursor.value()?;
        cursor.expect_eof()?;
        Ok(value)
    }

    pub fn parse_type(&self, source: &str) -> Result<Type, SyntaxError> {
        let mut cursor = Cursor::new(source, self.recursion_limit);
        let ty = cursor.ty()?;
        cursor.expect_eof()?;
        Ok(ty)
    }
}

impl Value {
    /// Parses a const GraphQL input value, such as `{ name: "Luke", ids: [1, 2] }`.
    ///
    /// Variables are not allowed.
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        LiteralParser::new().parse_value(source)
    }
}

impl Type {
    /// Parses a type reference, such as `[Int!]!`.
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        LiteralParser::new().parse_type(source)
    }
}

/// Peekable iterator over a char sequence, tracking the byte offset.
#[derive(Debug, Clone)]
struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    offset: usize,
    depth: usize,
    recursion_limit: usize,
}

macro_rules! syntax_error {
    ($cursor: expr, $($arg: tt)+) => {
        return Err(SyntaxError {
            message: format!($($arg)+),
            index: $cursor.offset,
        })
    };
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str, recursion_limit: usize) -> Self {
        Self {
            source,
            chars: source.chars(),
            offset: 0,
            depth: 0,
            recursion_limit,
        }
    }

    fn enter(&mut self) -> Result<(), SyntaxError> {
        if self.depth >= self.recursion_limit {
            syntax_error!(self, "recursion limit of {} reached", self.recursion_limit)
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn first(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn second(&self) -> Option<char> {
        let mut chars = self.chars.clone();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += c.len_utf8();
        Some(c)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.offset..]
    }

    /// Skips whitespace, commas and comments.
    fn skip_ignored(&mut self) {
        while let Some(c) = self.first() {
            match c {
                '#' => {
                    while self.first().is_some_and(|c| !is_line_terminator(c)) {
                        self.bump();
                    }
                }
                ',' => {
                    self.bump();
                }
                c if is_whitespace(c) => {
                    self.bump();
                }
                _ => break,
            }
        }
    }

    fn expect_eof(&mut self) -> Result<(), SyntaxError> {
        self.skip_ignored();
        if let Some(c) = self.first() {
            syntax_error!(self, "expected end of input, found `{c}`")
        }
        Ok(())
    }

    fn expect(&mut self, expected: char) -> Result<(), SyntaxError> {
        self.skip_ignored();
        match self.first() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => syntax_error!(self, "expected `{expected}`, found `{c}`"),
            None => syntax_error!(self, "expected `{expected}`, found end of input"),
        }
    }

    fn value(&mut self) -> Result<Value, SyntaxError> {
        self.skip_ignored();
        match self.first() {
            None => syntax_error!(self, "expected a value, found end of input"),
            Some('"') => self.string_value().map(Value::String),
            Some('[') => {
                self.enter()?;
                self.bump();
                let mut items = Vec::new();
                loop {
                    self.skip_ignored();
                    match self.first() {
                        Some(']') => {
                            self.bump();
                            break;
                        }
                        None => syntax_error!(self, "unterminated list value"),
                        _ => items.push(self.value()?),
                    }
                }
                self.leave();
                Ok(Value::List(items))
            }
            Some('{') => {
                self.enter()?;
                self.bump();
                let mut fields: Vec<(Name, Value)> = Vec::new();
                loop {
                    self.skip_ignored();
                    match self.first() {
                        Some('}') => {
                            self.bump();
                            break;
                        }
                        None => syntax_error!(self, "unterminated object value"),
                        _ => {
                            let start = self.offset;
                            let name = self.name()?;
                            if fields.iter().any(|(existing, _)| *existing == name) {
                                return Err(SyntaxError {
                                    message: format!("duplicate object field `{name}`"),
                                    index: start,
                                });
                            }
                            self.expect(':')?;
                            let value = self.value()?;
                            fields.push((name, value));
                        }
                    }
                }
                self.leave();
                Ok(Value::Object(fields))
            }
            Some('$') => syntax_error!(self, "variables are not allowed in const values"),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number(),
            Some(c) if is_name_start(c) => {
                let name = self.name()?;
                Ok(match name.as_str() {
                    "true" => Value::Boolean(true),
                    "false" => Value::Boolean(false),
                    "null" => Value::Null,
                    _ => Value::Enum(name),
                })
            }
            Some(c) => syntax_error!(self, "unexpected character `{c}`"),
        }
    }

    fn name(&mut self) -> Result<Name, SyntaxError> {
        self.skip_ignored();
        let start = self.offset;
        match self.first() {
            Some(c) if is_name_start(c) => {}
            Some(c) => syntax_error!(self, "expected a name, found `{c}`"),
            None => syntax_error!(self, "expected a name, found end of input"),
        }
        while self.first().is_some_and(is_name_continue) {
            self.bump();
        }
        Name::new(&self.source[start..self.offset]).map_err(|err| SyntaxError {
            message: err.to_string(),
            index: start,
        })
    }

    fn number(&mut self) -> Result<Value, SyntaxError> {
        let start = self.offset;
        if self.first() == Some('-') {
            self.bump();
        }
        match self.first() {
            Some('0') => {
                self.bump();
                if self.first().is_some_and(|c| c.is_ascii_digit()) {
                    syntax_error!(self, "unexpected leading zero in number")
                }
            }
            Some(c) if c.is_ascii_digit() => self.digits(),
            _ => syntax_error!(self, "expected a digit"),
        }

        let mut is_float = false;
        if self.first() == Some('.') {
            is_float = true;
            self.bump();
            if !self.first().is_some_and(|c| c.is_ascii_digit()) {
                syntax_error!(self, "expected a digit after `.`")
            }
            self.digits();
        }
        if matches!(self.first(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.first(), Some('+' | '-')) {
                self.bump();
            }
            if !self.first().is_some_and(|c| c.is_ascii_digit()) {
                syntax_error!(self, "expected a digit in exponent")
            }
            self.digits();
        }
        if self
            .first()
            .is_some_and(|c| c == '.' || is_name_start(c))
        {
            syntax_error!(self, "unexpected character after number")
        }

        let text = &self.source[start..self.offset];
        if is_float {
            Ok(Value::Float(FloatValue::new_parsed(text)))
        } else {
            Ok(Value::Int(IntValue::new_parsed(text)))
        }
    }

    fn digits(&mut self) {
        while self.first().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn string_value(&mut self) -> Result<String, SyntaxError> {
        if self.rest().starts_with("\"\"\"") {
            return self.block_string_value();
        }
        self.bump(); // opening quote
        let mut buf = String::new();
        loop {
            match self.bump() {
                None => syntax_error!(self, "unterminated string value"),
                Some('"') => return Ok(buf),
                Some(c) if is_line_terminator(c) => {
                    syntax_error!(self, "unexpected line terminator in string value")
                }
                Some('\\') => match self.bump() {
                    Some('"') => buf.push('"'),
                    Some('\\') => buf.push('\\'),
                    Some('/') => buf.push('/'),
                    Some('b') => buf.push('\u{0008}'),
                    Some('f') => buf.push('\u{000c}'),
                    Some('n') => buf.push('\n'),
                    Some('r') => buf.push('\r'),
                    Some('t') => buf.push('\t'),
                    Some('u') => buf.push(self.unicode_escape()?),
                    Some(c) => syntax_error!(self, "unexpected escaped character `{c}`"),
                    None => syntax_error!(self, "unterminated string value"),
                },
                Some(c) => buf.push(c),
            }
        }
    }

    fn unicode_escape(&mut self) -> Result<char, SyntaxError> {
        let hex = self.rest().get(..4).unwrap_or_default();
        let Some(code) = hex
            .chars()
            .all(|c| c.is_ascii_hexdigit())
            .then(|| u32::from_str_radix(hex, 16).ok())
            .flatten()
            .filter(|_| hex.len() == 4)
        else {
            syntax_error!(self, "invalid unicode escape sequence")
        };
        for _ in 0..4 {
            self.bump();
        }
        match char::from_u32(code) {
            Some(c) => Ok(c),
            None => syntax_error!(self, "invalid unicode scalar value {code:#x}"),
        }
    }

    fn block_string_value(&mut self) -> Result<String, SyntaxError> {
        for _ in 0..3 {
            self.bump();
        }
        let mut raw = String::new();
        loop {
            if self.rest().starts_with("\\\"\"\"") {
                raw.push_str("\"\"\"");
                for _ in 0..4 {
                    self.bump();
                }
                continue;
            }
            if self.rest().starts_with("\"\"\"") {
                for _ in 0..3 {
                    self.bump();
                }
                return Ok(block_string_value(&raw));
            }
            match self.bump() {
                Some(c) => raw.push(c),
                None => syntax_error!(self, "unterminated block string value"),
            }
        }
    }

    fn ty(&mut self) -> Result<Type, SyntaxError> {
        self.skip_ignored();
        let ty = if self.first() == Some('[') {
            self.enter()?;
            self.bump();
            if self.first_non_ignored() == Some(']') {
                syntax_error!(self, "expected item type")
            }
            let inner = self.ty()?;
            self.expect(']')?;
            self.leave();
            Type::List(Box::new(inner))
        } else {
            Type::Named(self.name()?)
        };
        self.skip_ignored();
        if self.first() == Some('!') {
            self.bump();
            Ok(ty.non_null())
        } else {
            Ok(ty)
        }
    }

    fn first_non_ignored(&mut self) -> Option<char> {
        self.skip_ignored();
        self.first()
    }
}

/// <https://spec.graphql.org/October2021/#BlockStringValue()>
fn block_string_value(raw: &str) -> String {
    let lines: Vec<&str> = raw.split("\r\n").flat_map(|l| l.split(['\n', '\r'])).collect();
    let common_indent = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
            (indent < line.len()).then_some(indent)
        })
        .min()
        .unwrap_or(0);
    let mut lines: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line
            } else {
                line.get(common_indent..).unwrap_or_default()
            }
        })
        .collect();
    while lines
        .first()
        .is_some_and(|line| line.trim_matches([' ', '\t']).is_empty())
    {
        lines.remove(0);
    }
    while lines
        .last()
        .is_some_and(|line| line.trim_matches([' ', '\t']).is_empty())
    {
        lines.pop();
    }
    lines.join("\n")
}

fn is_whitespace(c: char) -> bool {
    matches!(c, '\t' | ' ' | '\u{FEFF}') || is_line_terminator(c)
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

fn is_name_start(c: char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_')
}

fn is_name_continue(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_scalars_and_keywords() {
        assert_eq!(Value::parse("null").unwrap(), Value::Null);
        assert_eq!(Value::parse(" true ").unwrap(), Value::Boolean(true));
        assert_eq!(
            Value::parse("-42").unwrap(),
            Value::Int(IntValue::new_parsed("-42"))
        );
        assert_eq!(
            Value::parse("6.02e23").unwrap(),
            Value::Float(FloatValue::new_parsed("6.02e23"))
        );
        assert_eq!(
            Value::parse("NEWHOPE").unwrap(),
            Value::Enum(Name::new("NEWHOPE").unwrap())
        );
    }

    #[test]
    fn parses_strings_with_escapes() {
        assert_eq!(
            Value::parse(r#""a\"b\\cé\n""#).unwrap(),
            Value::String("a\"b\\cé\n".into())
        );
        assert_eq!(
            Value::parse("\"\"\"\n    first\n      second\n    \"\"\"").unwrap(),
            Value::String("first\n  second".into())
        );
    }

    #[test]
    fn parses_nested_values() {
        let value = Value::parse("{ name: \"R2\", ids: [1, 2,, 3] # comment\n }").unwrap();
        let fields = value.as_object().unwrap();
        assert_eq!(fields[0].0, "name");
        assert_eq!(fields[1].1.as_list().unwrap().len(), 3);
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let depth = 100_000;
        let source = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let err = Value::parse(&source).unwrap_err();
        assert_eq!(err.message, "recursion limit of 500 reached");
        assert_eq!(err.index, DEFAULT_RECURSION_LIMIT);

        let objects = format!("{}1{}", "{ a: ".repeat(depth), " }".repeat(depth));
        assert!(Value::parse(&objects).is_err());
        let types = format!("{}Int{}", "[".repeat(depth), "]".repeat(depth));
        assert!(Type::parse(&types).is_err());

        let parser = LiteralParser::new().recursion_limit(3);
        assert!(parser.parse_value("{ a: [[1]] }").is_ok());
        assert!(parser.parse_value("{ a: [[[1]]] }").is_err());
        assert!(parser.parse_type("[[[Int]]]").is_ok());
        assert!(parser.parse_type("[[[[Int]]]]").is_err());
    }

    #[test]
    fn rejects_invalid_syntax() {
        assert!(Value::parse("$var").is_err());
        assert!(Value::parse("01").is_err());
        assert!(Value::parse("1.").is_err());
        assert!(Value::parse("[1, 2").is_err());
        assert!(Value::parse("{ a: 1, a: 2 }").is_err());
        assert!(Value::parse("\"unterminated").is_err());
        let err = Value::parse("1 2").unwrap_err();
        assert_eq!(err.index, 2);
    }

    #[test]
    fn parses_types() {
        assert_eq!(
            Type::parse("[Int!]!").unwrap(),
            Type::NonNullList(Box::new(Type::NonNullNamed(Name::new("Int").unwrap())))
        );
        assert_eq!(Type::parse("[[String]]").unwrap().list_depth(), 2);
        assert!(Type::parse("[]").is_err());
        assert!(Type::parse("[String").is_err());
    }
}
