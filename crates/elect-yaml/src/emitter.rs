//! Canonical block-style YAML emitter.
//!
//! [`YamlEmitter`] turns a [`serde_yaml::Value`] into text with one fixed
//! layout, so that re-serializing a file only changes it when its content
//! changed:
//!
//! - mappings and sequences always use block style (`{}` and `[]` only for
//!   empty collections)
//! - mapping keys are sorted
//! - sequences under a mapping key are not indented
//! - non-ASCII text is written as-is
//! - the scalar style of each string is chosen by an injected
//!   [`ScalarStyleRule`]; the default rule ([`literal_for_multiline`]) writes
//!   multi-line strings as literal blocks
//!
//! # Examples
//!
//! ```
//! use elect_yaml::YamlEmitter;
//!
//! let value: serde_yaml::Value =
//!     serde_yaml::from_str("short: one line\nlong: \"two\\nlines\\n\"").unwrap();
//! let text = YamlEmitter::default().emit(&value).unwrap();
//! assert_eq!(text, "long: |\n  two\n  lines\nshort: one line\n");
//! ```

use serde_yaml::{Mapping, Value};

use crate::error::YamlError;

/// Spaces per nesting level.
const INDENT: usize = 2;

/// Characters that may not start a plain scalar.
const INDICATORS: &[char] = &[
    '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@', '`',
];

/// Words YAML readers may resolve to something other than a string.
const RESERVED_WORDS: &[&str] = &[
    "null", "~", "true", "false", "yes", "no", "on", "off", ".inf", "-.inf", "+.inf", ".nan",
];

/// How a string scalar should be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Plain when unambiguous, quoted otherwise.
    Plain,
    /// Literal block (`|`), preserving line breaks verbatim.
    Literal,
}

/// Chooses the [`ScalarStyle`] for a string value.
pub type ScalarStyleRule = fn(&str) -> ScalarStyle;

/// The default rule: literal blocks for strings containing a line break.
///
/// # Examples
///
/// ```
/// use elect_yaml::{ScalarStyle, literal_for_multiline};
///
/// assert_eq!(literal_for_multiline("a\nb"), ScalarStyle::Literal);
/// assert_eq!(literal_for_multiline("a b"), ScalarStyle::Plain);
/// ```
#[must_use]
pub fn literal_for_multiline(text: &str) -> ScalarStyle {
    if text.contains('\n') {
        ScalarStyle::Literal
    } else {
        ScalarStyle::Plain
    }
}

/// Block-style YAML serializer with an injected scalar style rule.
#[derive(Debug, Clone, Copy)]
pub struct YamlEmitter {
    style_rule: ScalarStyleRule,
}

impl Default for YamlEmitter {
    fn default() -> Self {
        Self::new(literal_for_multiline)
    }
}

impl YamlEmitter {
    /// Creates an emitter using `style_rule` for string scalars.
    #[must_use]
    pub const fn new(style_rule: ScalarStyleRule) -> Self {
        Self { style_rule }
    }

    /// Serializes a value as a complete YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`YamlError::UnsupportedKey`] if a mapping key is itself a
    /// mapping or sequence.
    pub fn emit(&self, value: &Value) -> Result<String, YamlError> {
        let mut out = String::new();
        match value {
            Value::Mapping(map) if !map.is_empty() => self.write_mapping(&mut out, map, 0, false)?,
            Value::Sequence(seq) if !seq.is_empty() => {
                self.write_sequence(&mut out, seq, 0, false)?;
            }
            Value::Tagged(tagged) => {
                out.push_str(&tagged.tag.to_string());
                self.write_node(&mut out, &tagged.value, 0, false)?;
            }
            scalar => self.write_scalar(&mut out, scalar, INDENT),
        }
        Ok(out)
    }

    fn write_mapping(
        &self,
        out: &mut String,
        map: &Mapping,
        indent: usize,
        first_inline: bool,
    ) -> Result<(), YamlError> {
        let mut entries = map
            .iter()
            .map(|(key, value)| Ok((sort_key(key)?, value, key)))
            .collect::<Result<Vec<_>, YamlError>>()?;
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        for (i, (_, value, key)) in entries.into_iter().enumerate() {
            let key = render_key(key);
            if !(first_inline && i == 0) {
                push_indent(out, indent);
            }
            out.push_str(&key);
            out.push(':');
            self.write_node(out, value, indent, false)?;
        }
        Ok(())
    }

    fn write_sequence(
        &self,
        out: &mut String,
        seq: &[Value],
        indent: usize,
        first_inline: bool,
    ) -> Result<(), YamlError> {
        for (i, item) in seq.iter().enumerate() {
            if !(first_inline && i == 0) {
                push_indent(out, indent);
            }
            out.push('-');
            self.write_node(out, item, indent, true)?;
        }
        Ok(())
    }

    /// Writes a node whose `key:` or `-` indicator sits at `indent`; the
    /// cursor is right after the indicator. Always ends with a line break.
    fn write_node(
        &self,
        out: &mut String,
        value: &Value,
        indent: usize,
        in_sequence: bool,
    ) -> Result<(), YamlError> {
        match value {
            Value::Mapping(map) if !map.is_empty() => {
                if in_sequence {
                    out.push(' ');
                    self.write_mapping(out, map, indent + INDENT, true)
                } else {
                    out.push('\n');
                    self.write_mapping(out, map, indent + INDENT, false)
                }
            }
            Value::Sequence(seq) if !seq.is_empty() => {
                if in_sequence {
                    out.push(' ');
                    self.write_sequence(out, seq, indent + INDENT, true)
                } else {
                    out.push('\n');
                    self.write_sequence(out, seq, indent, false)
                }
            }
            Value::Tagged(tagged) => {
                out.push(' ');
                out.push_str(&tagged.tag.to_string());
                match &tagged.value {
                    Value::Mapping(map) if !map.is_empty() => {
                        out.push('\n');
                        self.write_mapping(out, map, indent + INDENT, false)
                    }
                    Value::Sequence(seq) if !seq.is_empty() => {
                        out.push('\n');
                        self.write_sequence(out, seq, indent + INDENT, false)
                    }
                    inner => self.write_node(out, inner, indent, in_sequence),
                }
            }
            scalar => {
                out.push(' ');
                self.write_scalar(out, scalar, indent + INDENT);
                Ok(())
            }
        }
    }

    /// Writes a scalar (or empty collection) followed by a line break.
    /// `content_indent` is used by literal blocks.
    fn write_scalar(&self, out: &mut String, value: &Value, content_indent: usize) {
        match value {
            Value::String(text) => {
                if (self.style_rule)(text) == ScalarStyle::Literal && literal_allowed(text) {
                    write_literal(out, text, content_indent);
                    return;
                }
                out.push_str(&render_string(text));
            }
            Value::Mapping(_) => out.push_str("{}"),
            Value::Sequence(_) => out.push_str("[]"),
            other => out.push_str(&render_plain_scalar(other)),
        }
        out.push('\n');
    }

}

/// Keys sort by their content, not by their rendered (possibly quoted) form.
fn sort_key(key: &Value) -> Result<String, YamlError> {
    match key {
        Value::String(text) => Ok(text.clone()),
        Value::Mapping(_) | Value::Sequence(_) | Value::Tagged(_) => {
            Err(YamlError::UnsupportedKey(format!("{key:?}")))
        }
        other => Ok(render_plain_scalar(other)),
    }
}

fn render_key(key: &Value) -> String {
    match key {
        Value::String(text) => render_string(text),
        other => render_plain_scalar(other),
    }
}

fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat_n(' ', indent));
}

/// Renders null, booleans and numbers.
fn render_plain_scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        _ => String::new(),
    }
}

/// Renders a string on one line: plain if unambiguous, single-quoted if
/// printable, double-quoted otherwise.
fn render_string(text: &str) -> String {
    if plain_allowed(text) {
        text.to_owned()
    } else if !text.chars().any(needs_escape) {
        format!("'{}'", text.replace('\'', "''"))
    } else {
        double_quoted(text)
    }
}

/// Double-quoted scalar with every control character escaped.
fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if needs_escape(c) => push_escape(&mut out, c),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Characters YAML readers do not keep verbatim outside double quotes.
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn push_escape(out: &mut String, c: char) {
    let code = u32::from(c);
    if code <= 0xFF {
        out.push_str(&format!("\\x{code:02X}"));
    } else {
        out.push_str(&format!("\\u{code:04X}"));
    }
}

fn plain_allowed(text: &str) -> bool {
    let Some(first) = text.chars().next() else {
        return false;
    };
    if INDICATORS.contains(&first) || first.is_whitespace() || text.ends_with(char::is_whitespace)
    {
        return false;
    }
    if text.chars().any(needs_escape) {
        return false;
    }
    if text.contains(": ") || text.contains(" #") || text.ends_with(':') || text.starts_with("...")
    {
        return false;
    }
    let lowered = text.to_lowercase();
    if RESERVED_WORDS.contains(&lowered.as_str()) {
        return false;
    }
    !looks_numeric(text)
}

/// Numbers, and number-like strings such as dates, `1_000` or `0x1F`.
fn looks_numeric(text: &str) -> bool {
    if text.parse::<f64>().is_ok() {
        return true;
    }
    let lowered = text.to_lowercase();
    if lowered.starts_with("0x") || lowered.starts_with("0o") || lowered.starts_with("0b") {
        return true;
    }
    let digits = text.trim_start_matches(['+', '-']);
    digits.starts_with(|c: char| c.is_ascii_digit())
        && digits
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '_' | '.' | '-' | ':' | 'e' | 'E' | '+'))
}

/// Literal blocks cannot represent every string; those fall back to quoting.
fn literal_allowed(text: &str) -> bool {
    let body = text.trim_end_matches('\n');
    !body.is_empty()
        && !body.starts_with([' ', '\t', '\n'])
        && !text
            .chars()
            .any(|c| needs_escape(c) && c != '\n' && c != '\t')
}

fn write_literal(out: &mut String, text: &str, content_indent: usize) {
    let body = text.trim_end_matches('\n');
    let trailing = text.len() - body.len();
    let chomping = match trailing {
        0 => "-",
        1 => "",
        _ => "+",
    };
    out.push('|');
    out.push_str(chomping);
    out.push('\n');

    for line in body.split('\n') {
        if !line.is_empty() {
            push_indent(out, content_indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    for _ in 1..trailing {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emit(yaml: &str) -> String {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        YamlEmitter::default().emit(&value).unwrap()
    }

    fn round_trip(value: &Value) -> Value {
        let text = YamlEmitter::default().emit(value).unwrap();
        serde_yaml::from_str(&text).unwrap()
    }

    #[test]
    fn test_keys_are_sorted_and_nested_in_block_style() {
        let text = emit("zeta: 1\nalpha:\n  b: [x, y]\n  a: {}\n");
        insta::assert_snapshot!(text, @r"
alpha:
  a: {}
  b:
  - x
  - y
zeta: 1
");
    }

    #[test]
    fn test_multiline_strings_use_literal_blocks() {
        let mut map = Mapping::new();
        map.insert("long".into(), "first line\nsecond line\n".into());
        map.insert("short".into(), "just one line".into());
        let text = YamlEmitter::default().emit(&Value::Mapping(map)).unwrap();

        assert!(text.contains("long: |\n  first line\n  second line\n"));
        assert!(text.contains("short: just one line\n"));
        assert!(!text.contains("short: |"));
    }

    #[test]
    fn test_literal_chomping_indicators() {
        for text in ["no newline\nat end", "one\nnewline\n", "kept\nnewlines\n\n\n"] {
            let value = Value::String(text.to_owned());
            assert_eq!(round_trip(&value), value, "text: {text:?}");
        }
        let text = YamlEmitter::default()
            .emit(&Value::String("a\nb".to_owned()))
            .unwrap();
        assert!(text.starts_with("|-\n"));
    }

    #[test]
    fn test_leading_space_falls_back_to_quotes() {
        let value = Value::String("  indented\nline".to_owned());
        let text = YamlEmitter::default().emit(&value).unwrap();
        assert!(!text.starts_with('|'));
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_custom_rule_is_honoured() {
        let emitter = YamlEmitter::new(|_| ScalarStyle::Plain);
        let value = Value::String("two\nlines".to_owned());
        let text = emitter.emit(&value).unwrap();
        assert_eq!(text, "\"two\\nlines\"\n");
    }

    #[test]
    fn test_ambiguous_strings_are_quoted() {
        for text in ["yes", "null", "42", "1.5", "2016-11-08", "- dash", "key: value", "", " pad"] {
            let value = Value::String(text.to_owned());
            assert_eq!(round_trip(&value), value, "text: {text:?}");
            let emitted = YamlEmitter::default().emit(&value).unwrap();
            assert!(emitted.starts_with('\''), "expected quotes for {text:?}: {emitted}");
        }
    }

    #[test]
    fn test_non_ascii_is_kept_literal() {
        let text = emit("zh: 市長\nes: Alcaldía\n");
        assert_eq!(text, "es: Alcaldía\nzh: 市長\n");
    }

    #[test]
    fn test_sequence_of_mappings() {
        let text = emit("items:\n- {b: 2, a: 1}\n- c: 3\n");
        insta::assert_snapshot!(text, @r"
items:
- a: 1
  b: 2
- c: 3
");
    }

    #[test]
    fn test_literal_inside_sequence_round_trips() {
        let value: Value = serde_yaml::from_str("notes:\n- \"one\\ntwo\\n\"\n- plain\n").unwrap();
        assert_eq!(round_trip(&value), value);
    }

    #[test]
    fn test_mapping_keys_must_be_scalars() {
        let mut inner = Mapping::new();
        inner.insert("a".into(), 1.into());
        let mut map = Mapping::new();
        map.insert(Value::Mapping(inner), 1.into());
        let err = YamlEmitter::default().emit(&Value::Mapping(map)).unwrap_err();
        assert!(matches!(err, YamlError::UnsupportedKey(_)));
    }

    #[test]
    fn test_quoted_keys_sort_by_content() {
        let text = emit("'yes': 1\nb: 2\nz: 3\n");
        assert_eq!(text, "b: 2\n'yes': 1\nz: 3\n");
    }

    #[test]
    fn test_control_characters_round_trip() {
        for text in ["a\u{7f}b", "a\u{85}b", "a\u{1}b", "tab\tand\u{2028}sep", "quote\"back\\"] {
            let value = Value::String(text.to_owned());
            assert_eq!(round_trip(&value), value, "text: {text:?}");
        }
        let emitted = YamlEmitter::default()
            .emit(&Value::String("a\u{7f}b".to_owned()))
            .unwrap();
        assert_eq!(emitted, "\"a\\x7Fb\"\n");
    }

    #[test]
    fn test_numbers_and_booleans() {
        let text = emit("b: true\nn: 3\nf: 2.5\nz: null\n");
        assert_eq!(text, "b: true\nf: 2.5\nn: 3\nz: null\n");
    }
}
