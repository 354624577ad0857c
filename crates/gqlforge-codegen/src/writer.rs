//! Indentation-aware text output for generated source files.

use std::fmt;
use std::fmt::Display;
use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Accumulates source text, indenting each new line by the current level.
///
/// Owned by a single generation call. Indentation levels are scoped:
/// [`indent`][Self::indent] restores the previous level when its body returns,
/// including when it returns an error.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    output: String,
    indent_prefix: String,
    indent_level: usize,
    /// Nothing was written on the current line yet
    at_line_start: bool,
}

impl CodeWriter {
    pub fn new(indent_prefix: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            indent_prefix: indent_prefix.into(),
            indent_level: 0,
            at_line_start: true,
        }
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    /// Runs `body` one indentation level deeper
    pub fn indent<R, E>(&mut self, body: impl FnOnce(&mut Self) -> Result<R, E>) -> Result<R, E> {
        self.indent_level += 1;
        let result = body(self);
        self.indent_level -= 1;
        result
    }

    /// Writes `header`, then `body` indented between braces on their own lines
    pub fn block<E>(
        &mut self,
        header: impl Display,
        body: impl FnOnce(&mut Self) -> Result<(), E>,
    ) -> Result<(), E>
    where
        E: From<fmt::Error>,
    {
        self.write_line(header)?;
        self.braces(body)
    }

    /// Writes `body` indented between braces on their own lines
    pub fn braces<E>(&mut self, body: impl FnOnce(&mut Self) -> Result<(), E>) -> Result<(), E>
    where
        E: From<fmt::Error>,
    {
        self.write_line("{")?;
        self.indent(body)?;
        self.write_line("}")?;
        Ok(())
    }

    pub fn write_line(&mut self, line: impl Display) -> fmt::Result {
        writeln!(self, "{line}")
    }

    /// An empty line, without indentation
    pub fn blank_line(&mut self) -> fmt::Result {
        if !self.at_line_start {
            self.write_char('\n')?;
        }
        self.write_char('\n')
    }

    /// Writes `{declaration} = new byte[] { .. };` with one row per 16 bytes
    pub fn byte_array(&mut self, declaration: impl Display, bytes: &[u8]) -> fmt::Result {
        self.write_line(format_args!("{declaration} = new byte[]"))?;
        self.write_line("{")?;
        self.indent(|w| {
            let rows = bytes.chunks(BYTES_PER_LINE).count();
            for (i, row) in bytes.chunks(BYTES_PER_LINE).enumerate() {
                for (j, byte) in row.iter().enumerate() {
                    if j > 0 {
                        w.write_str(" ")?;
                    }
                    write!(w, "{byte:#04x}")?;
                    if j + 1 < row.len() || i + 1 < rows {
                        w.write_char(',')?;
                    }
                }
                w.write_char('\n')?;
            }
            Ok::<_, fmt::Error>(())
        })?;
        self.write_line("};")
    }

    /// Writes `text` as is: lines after the first are not indented
    pub fn write_unindented(&mut self, text: &str) -> fmt::Result {
        if let Some((first, rest)) = text.split_once('\n') {
            self.write_str(first)?;
            self.output.push('\n');
            self.output.push_str(rest);
            self.at_line_start = rest.is_empty() || rest.ends_with('\n');
            Ok(())
        } else {
            self.write_str(text)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}

impl Write for CodeWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for line in s.split_inclusive('\n') {
            if self.at_line_start && line != "\n" {
                for _ in 0..self.indent_level {
                    self.output.push_str(&self.indent_prefix);
                }
            }
            self.output.push_str(line);
            self.at_line_start = line.ends_with('\n');
        }
        Ok(())
    }
}

/// Quotes `value` as a regular C# string literal
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            '\0' => quoted.push_str("\\0"),
            c if c.is_control() => {
                // Writing to a String is infallible
                let _ = write!(quoted, "\\u{:04x}", c as u32);
            }
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Quotes `value` as a C# verbatim string literal, which may span lines
pub fn verbatim(value: &str) -> String {
    format!("@\"{}\"", value.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn nested_blocks() {
        let mut w = CodeWriter::new("  ");
        w.block("class A", |w| {
            w.write_line("int x;")?;
            w.blank_line()?;
            w.block("void F()", |w| w.write_line("return;"))
        })
        .unwrap();
        assert_eq!(
            w.as_str(),
            indoc! {"
                class A
                {
                  int x;

                  void F()
                  {
                    return;
                  }
                }
            "}
        );
    }

    #[test]
    fn indentation_is_restored_after_errors() {
        let mut w = CodeWriter::new("\t");
        let result: Result<(), &str> = w.indent(|w| {
            w.indent(|_| Err::<(), _>("failed"))?;
            Ok(())
        });
        assert_eq!(result, Err("failed"));
        assert_eq!(w.indent_level(), 0);
    }

    #[test]
    fn byte_arrays_wrap_every_sixteen_bytes() {
        let mut w = CodeWriter::new("    ");
        w.byte_array("private readonly byte[] _hash", b"0123456789abcdefXY")
            .unwrap();
        assert_eq!(
            w.as_str(),
            indoc! {"
                private readonly byte[] _hash = new byte[]
                {
                    0x30, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66,
                    0x58, 0x59
                };
            "}
        );
    }

    #[test]
    fn multi_line_literals_keep_their_lines() {
        let mut w = CodeWriter::new("  ");
        w.indent(|w| {
            w.write_str("return ")?;
            w.write_unindented(&verbatim("{\n  a\n}"))?;
            w.write_line(";")
        })
        .unwrap();
        assert_eq!(w.as_str(), "  return @\"{\n  a\n}\";\n");
    }

    #[test]
    fn string_literals() {
        assert_eq!(quote("say \"hi\"\n"), r#""say \"hi\"\n""#);
        assert_eq!(quote("\u{1}"), r#""\u0001""#);
        assert_eq!(verbatim("a \"b\"\nc"), "@\"a \"\"b\"\"\nc\"");
    }
}
