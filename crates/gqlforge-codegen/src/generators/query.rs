use super::CodeGenerator;
use crate::descriptors::QueryDescriptor;
use crate::writer::verbatim;
use crate::CodeWriter;
use crate::CodegenError;
use crate::TypeLookup;
use sha2::Digest;
use sha2::Sha256;

/// Holds an operation document as UTF-8 bytes, along with its hash.
///
/// The hash name, the hash and the document are exposed as byte spans,
/// so that a persisted-query transport can send either without re-encoding.
/// `ToString()` returns the document re-indented.
#[derive(Clone, Copy, Debug, Default)]
pub struct QueryGenerator;

/// Lowercase hex SHA-256 of a document, as sent in `extensions.persistedQuery.sha256Hash`
pub fn query_hash(document: &str) -> String {
    hex::encode(Sha256::digest(document.as_bytes()))
}

/// Normalizes line endings and re-indents a document by two spaces per nesting level.
///
/// Blank lines are removed, except one between top-level definitions.
/// Braces, brackets and parentheses in strings and comments do not count.
/// Lines inside a block string are kept as written.
pub fn normalize_document(document: &str) -> String {
    let document = document.replace("\r\n", "\n").replace('\r', "\n");
    let mut output = String::new();
    let mut depth = 0_usize;
    let mut scanner = DelimiterScanner::default();
    for raw_line in document.lines() {
        if scanner.in_block_string {
            output.push('\n');
            output.push_str(raw_line);
            let (opened, closed) = scanner.scan(raw_line);
            depth = (depth + opened).saturating_sub(closed);
            continue;
        }
        let line = raw_line.trim_start();
        if line.is_empty() {
            continue;
        }
        let (opened, closed) = scanner.scan(line);
        // Trailing whitespace is string content when a block string starts here
        let line = if scanner.in_block_string {
            line
        } else {
            line.trim_end()
        };
        let leading_closers = line
            .chars()
            .take_while(|c| matches!(c, '}' | ')' | ']'))
            .count();
        let indent = depth.saturating_sub(leading_closers);
        if !output.is_empty() {
            output.push('\n');
            if indent == 0 && leading_closers == 0 {
                output.push('\n');
            }
        }
        for _ in 0..indent {
            output.push_str("  ");
        }
        output.push_str(line);
        depth = (depth + opened).saturating_sub(closed);
    }
    output
}

const BLOCK_QUOTE: &[u8] = b"\"\"\"";
const ESCAPED_BLOCK_QUOTE: &[u8] = b"\\\"\"\"";

/// Counts delimiters line by line, remembering whether a block string is still open
#[derive(Debug, Default)]
struct DelimiterScanner {
    in_block_string: bool,
}

impl DelimiterScanner {
    /// Returns the number of opening and closing delimiters outside strings and comments
    fn scan(&mut self, line: &str) -> (usize, usize) {
        let bytes = line.as_bytes();
        let mut opened = 0;
        let mut closed = 0;
        let mut i = 0;
        while i < bytes.len() {
            let rest = &bytes[i..];
            if self.in_block_string {
                if rest.starts_with(ESCAPED_BLOCK_QUOTE) {
                    i += ESCAPED_BLOCK_QUOTE.len();
                } else if rest.starts_with(BLOCK_QUOTE) {
                    self.in_block_string = false;
                    i += BLOCK_QUOTE.len();
                } else {
                    i += 1;
                }
                continue;
            }
            match bytes[i] {
                b'"' if rest.starts_with(BLOCK_QUOTE) => {
                    self.in_block_string = true;
                    i += BLOCK_QUOTE.len();
                    continue;
                }
                b'"' => {
                    i = skip_string(bytes, i + 1);
                    continue;
                }
                b'#' => break,
                b'{' | b'(' | b'[' => opened += 1,
                b'}' | b')' | b']' => closed += 1,
                _ => {}
            }
            i += 1;
        }
        (opened, closed)
    }
}

/// Index just past the quote closing a single-line string whose content starts at `i`
fn skip_string(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

impl CodeGenerator<QueryDescriptor> for QueryGenerator {
    fn file_name(&self, descriptor: &QueryDescriptor) -> String {
        format!("{}.cs", descriptor.name)
    }

    fn generate(
        &self,
        writer: &mut CodeWriter,
        descriptor: &QueryDescriptor,
        _lookup: &TypeLookup<'_>,
    ) -> Result<(), CodegenError> {
        let name = &descriptor.name;
        let hash = query_hash(&descriptor.document);
        writer.block(format_args!("public partial class {name} : IDocument"), |writer| {
            writer.byte_array(
                "private readonly byte[] _hashName",
                descriptor.hash_name.as_bytes(),
            )?;
            writer.byte_array("private readonly byte[] _hash", hash.as_bytes())?;
            writer.byte_array(
                "private readonly byte[] _content",
                descriptor.document.as_bytes(),
            )?;
            writer.blank_line()?;
            writer.write_line(format_args!(
                "public static {name} Default {{ get; }} = new {name}();"
            ))?;
            writer.blank_line()?;
            writer.write_line("public ReadOnlySpan<byte> HashName => _hashName;")?;
            writer.blank_line()?;
            writer.write_line("public ReadOnlySpan<byte> Hash => _hash;")?;
            writer.blank_line()?;
            writer.write_line("public ReadOnlySpan<byte> Content => _content;")?;
            writer.blank_line()?;
            writer.block("public override string ToString()", |writer| {
                use std::fmt::Write;
                writer.write_str("return ")?;
                writer.write_unindented(&verbatim(&normalize_document(&descriptor.document)))?;
                writer.write_line(";")
            })?;
            Ok(())
        })
    }
}
