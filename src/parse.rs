//! Document parsing.
//!
//! The lenient parser accepts a relaxed superset of JSON: `//` and `/* */`
//! comments, trailing commas before `}`/`]`, and bare unquoted scalars. It never
//! fails; malformed structure degrades into partial data. The strict mode hands
//! the text to a JSON5 parser and reports the first error instead.

use crate::error::ParseError;
use crate::statics;
use crate::value::{DocValue, Document, Entries};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Best-effort parse; malformed input yields partial data.
    #[default]
    Lenient,
    /// Reject anything that is not well-formed JSON5 with an object at the top.
    Strict,
}

/// Parse a category document into its top-level mapping.
pub fn parse_document(text: &str, mode: ParseMode) -> Result<Document, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    match mode {
        ParseMode::Lenient => Ok(parse_lenient(text)),
        ParseMode::Strict => {
            let depth = nesting_depth(&strip_comments(text));
            if depth > statics::MAX_NESTING_DEPTH {
                return Err(ParseError {
                    message: format!(
                        "nesting depth {depth} exceeds the limit of {}",
                        statics::MAX_NESTING_DEPTH
                    ),
                });
            }
            let value = json5::from_str::<DocValue>(text).map_err(|e| ParseError {
                message: e.to_string(),
            })?;
            match value {
                DocValue::Object(map) => Ok(map),
                other => Err(ParseError {
                    message: format!(
                        "expected an object at the top level, found {}",
                        other.type_name()
                    ),
                }),
            }
        }
    }
}

/// Lenient parse. A top-level value that is not an object yields an empty document.
pub fn parse_lenient(text: &str) -> Document {
    let cleaned = strip_trailing_commas(&strip_comments(text));
    Parser::new(&cleaned).parse_value().into_document()
}

/// Remove `// line` and `/* block */` comments outside of quoted strings.
/// Line comments keep their terminating newline.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                while chars.next_if(|&n| n != '\n' && n != '\r').is_some() {}
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for n in chars.by_ref() {
                    if prev == '*' && n == '/' {
                        break;
                    }
                    prev = n;
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Drop any comma that is followed only by whitespace and then `}` or `]`.
/// One pass; commas inside quoted strings are kept.
pub fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|n| !n.is_whitespace());
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out
}

/// Deepest `{`/`[` nesting outside quoted strings.
fn nesting_depth(text: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            '}' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

const NUMBER_CHARS: &str = "-+0123456789.eE";
const BARE_TOKEN_TERMINATORS: &str = ",]}:\r\n\t ";

struct Parser {
    chars: Vec<char>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    /// Skip one character that could not start anything, so the caller's loop progresses.
    fn recover(&mut self) {
        tracing::debug!(offset = self.pos, found = ?self.peek(), "lenient parse skipping character");
        self.pos += 1;
    }

    /// Step over a `{`/`[` value nested too deeply to descend into.
    fn skip_nested(&mut self) -> DocValue {
        let start = self.pos;
        let mut depth = 0usize;
        let mut in_string = false;

        while let Some(c) = self.peek() {
            self.pos += 1;
            if in_string {
                match c {
                    '\\' => self.pos += 1,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' | '[' => depth += 1,
                '}' | ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        self.pos = self.pos.min(self.chars.len());

        tracing::debug!(
            offset = start,
            limit = statics::MAX_NESTING_DEPTH,
            "lenient parse collapsing over-nested value"
        );
        DocValue::Object(Entries::new())
    }

    fn parse_value(&mut self) -> DocValue {
        self.skip_ws();
        match self.peek() {
            None => DocValue::Null,
            Some('{' | '[') if self.depth >= statics::MAX_NESTING_DEPTH => self.skip_nested(),
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => DocValue::String(self.parse_string()),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number(),
            Some('t') if self.eat_literal("true") => DocValue::Bool(true),
            Some('f') if self.eat_literal("false") => DocValue::Bool(false),
            Some('n') if self.eat_literal("null") => DocValue::Null,
            Some(_) => DocValue::String(self.parse_bare_token()),
        }
    }

    fn parse_object(&mut self) -> DocValue {
        let mut entries = Entries::new();
        self.pos += 1;
        self.depth += 1;

        loop {
            self.skip_ws();
            match self.peek() {
                None => break,
                Some('}') => {
                    self.pos += 1;
                    break;
                }
                Some(',') => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }

            let start = self.pos;
            let key = if self.peek() == Some('"') {
                self.parse_string()
            } else {
                self.parse_bare_token()
            };
            self.skip_ws();
            if self.peek() == Some(':') {
                self.pos += 1;
            }
            let value = self.parse_value();

            if self.pos == start {
                self.recover();
                continue;
            }
            entries.push((key, value));
        }

        self.depth -= 1;
        DocValue::Object(entries)
    }

    fn parse_array(&mut self) -> DocValue {
        let mut values = Vec::new();
        self.pos += 1;
        self.depth += 1;

        loop {
            self.skip_ws();
            match self.peek() {
                None => break,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                Some(',') => {
                    self.pos += 1;
                    continue;
                }
                _ => {}
            }

            let start = self.pos;
            let value = self.parse_value();
            if self.pos == start {
                self.recover();
                continue;
            }
            values.push(value);
        }

        self.depth -= 1;
        DocValue::Array(values)
    }

    /// Quoted string with `\" \\ \n \r \t` escapes; other escapes yield the escaped
    /// character itself. An unterminated string runs to the end of input.
    fn parse_string(&mut self) -> String {
        let mut out = String::new();
        self.pos += 1;

        while let Some(c) = self.peek() {
            self.pos += 1;
            match c {
                '"' => break,
                '\\' => {
                    let Some(escaped) = self.peek() else {
                        break;
                    };
                    self.pos += 1;
                    out.push(match escaped {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        other => other,
                    });
                }
                c => out.push(c),
            }
        }
        out
    }

    /// A token containing `.`, `e` or `E` is a float, anything else an integer.
    /// Unparseable tokens become zero of that kind.
    fn parse_number(&mut self) -> DocValue {
        let start = self.pos;
        while self.peek().is_some_and(|c| NUMBER_CHARS.contains(c)) {
            self.pos += 1;
        }
        let token: String = self.chars[start..self.pos].iter().collect();

        if token.contains(['.', 'e', 'E']) {
            DocValue::Float(token.parse::<f64>().unwrap_or(0.0))
        } else {
            DocValue::Int(token.parse::<i64>().unwrap_or(0))
        }
    }

    /// Consume `literal` only if it is followed by a token boundary.
    fn eat_literal(&mut self, literal: &str) -> bool {
        let end = self.pos + literal.chars().count();
        if end > self.chars.len() || !self.chars[self.pos..end].iter().copied().eq(literal.chars()) {
            return false;
        }
        if self
            .chars
            .get(end)
            .is_some_and(|c| !BARE_TOKEN_TERMINATORS.contains(*c))
        {
            return false;
        }
        self.pos = end;
        true
    }

    fn parse_bare_token(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !BARE_TOKEN_TERMINATORS.contains(c))
        {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ParseMode, parse_document, parse_lenient, strip_comments, strip_trailing_commas};
    use crate::{DocValue, Document, statics};
    use pretty_assertions::assert_eq;

    fn obj(text: &str) -> Document {
        parse_lenient(text)
    }

    fn at(doc: &Document, key: &str) -> DocValue {
        doc.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| panic!("missing key {key:?}"))
    }

    #[test]
    fn comments_and_trailing_commas_are_ignored() {
        let relaxed = obj(r#"{"1": {"A": 5, /*c*/ "B": "x",}}"#);
        let plain = obj(r#"{"1": {"A": 5, "B": "x"}}"#);
        assert_eq!(relaxed, plain);

        let relaxed = obj("{\n  // header\n  \"1\": { \"A\": [1, 2,\n ], }, // tail\n}\n");
        let plain = obj(r#"{"1": {"A": [1, 2]}}"#);
        assert_eq!(relaxed, plain);
    }

    #[test]
    fn comment_markers_inside_strings_are_kept() {
        assert_eq!(
            strip_comments(r#"{"url": "http://x/*y*/"} // gone"#),
            r#"{"url": "http://x/*y*/"} "#
        );
        assert_eq!(strip_trailing_commas(r#"["a,]", 1,]"#), r#"["a,]", 1]"#);
        assert_eq!(strip_comments(r#""a\"//b""#), r#""a\"//b""#);
    }

    #[test]
    fn trailing_comma_pass_is_single_and_local() {
        assert_eq!(strip_trailing_commas("[1,,\n ]"), "[1,\n ]");
        assert_eq!(strip_trailing_commas("{a:1 , b:2}"), "{a:1 , b:2}");
    }

    #[test]
    fn scalars() {
        let doc = obj(r#"{"i": -12, "f": 1.5, "e": 2E3, "s": "q\"\\\n\t\x", "t": true, "n": null, "b": bare_word}"#);
        assert_eq!(at(&doc, "i"), DocValue::Int(-12));
        assert_eq!(at(&doc, "f"), DocValue::Float(1.5));
        assert_eq!(at(&doc, "e"), DocValue::Float(2000.0));
        assert_eq!(at(&doc, "s"), DocValue::String("q\"\\\n\tx".to_string()));
        assert_eq!(at(&doc, "t"), DocValue::Bool(true));
        assert_eq!(at(&doc, "n"), DocValue::Null);
        assert_eq!(at(&doc, "b"), DocValue::String("bare_word".to_string()));
    }

    #[test]
    fn bad_numbers_become_zero() {
        let doc = obj(r#"{"a": 1-2, "b": 1.2.3, "c": 99999999999999999999}"#);
        assert_eq!(at(&doc, "a"), DocValue::Int(0));
        assert_eq!(at(&doc, "b"), DocValue::Float(0.0));
        assert_eq!(at(&doc, "c"), DocValue::Int(0));
    }

    #[test]
    fn literal_prefixes_are_bare_tokens() {
        let doc = obj("{a: trueish, b: nullable, c: false}");
        assert_eq!(at(&doc, "a"), DocValue::String("trueish".to_string()));
        assert_eq!(at(&doc, "b"), DocValue::String("nullable".to_string()));
        assert_eq!(at(&doc, "c"), DocValue::Bool(false));
    }

    #[test]
    fn non_object_top_level_is_empty() {
        assert!(obj("[1, 2]").is_empty());
        assert!(obj("42").is_empty());
        assert!(obj("").is_empty());
    }

    #[test]
    fn malformed_input_degrades_without_hanging() {
        let doc = obj(r#"{"1": {"A": 5 ] "B": 6}, "2": {"C": "unterminated"#);
        assert_eq!(at(&doc, "1").get("A"), Some(&DocValue::Int(5)));
        assert_eq!(at(&doc, "1").get("B"), Some(&DocValue::Int(6)));
        assert_eq!(
            at(&doc, "2").get("C"),
            Some(&DocValue::String("unterminated".to_string()))
        );

        // Stray structural characters must not loop forever.
        let _ = obj("{:::]]]}}}");
        let _ = obj("[}}}:::,,,");
        let _ = obj("{\"a\" \"b\" \"c\"");
    }

    #[test]
    fn repeated_keys_are_all_kept_in_order() {
        let doc = obj(r#"{"1": {"A": 1, "B": 2, "A": "x"}, "1": {}}"#);
        assert_eq!(doc.len(), 2);
        assert_eq!(
            at(&doc, "1"),
            DocValue::Object(vec![
                ("A".to_string(), DocValue::Int(1)),
                ("B".to_string(), DocValue::Int(2)),
                ("A".to_string(), DocValue::String("x".to_string())),
            ])
        );
    }

    #[test]
    fn deep_nesting_collapses_instead_of_overflowing() {
        let depth = 5_000;
        let text = format!(
            r#"{{"1": {{"DEEP": {}{}, "AFTER": 7}}}}"#,
            "[".repeat(depth),
            "]".repeat(depth)
        );
        let doc = obj(&text);
        let record = at(&doc, "1");
        assert_eq!(record.get("AFTER"), Some(&DocValue::Int(7)));

        let mut deep = record.get("DEEP").cloned();
        let mut levels = 0;
        while let Some(DocValue::Array(values)) = deep {
            levels += 1;
            deep = values.into_iter().next();
        }
        assert_eq!(levels, statics::MAX_NESTING_DEPTH - 2);
        assert_eq!(deep, Some(DocValue::Object(Vec::new())));

        // Unterminated nesting runs to the end of input without overflowing.
        let doc = obj(&format!(r#"{{"1": {{"DEEP": {}"#, "[".repeat(depth)));
        assert!(at(&doc, "1").get("DEEP").is_some());

        let err = parse_document(&text, ParseMode::Strict).unwrap_err();
        assert!(err.message.contains("nesting depth"), "{}", err.message);
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let doc = parse_document("\u{feff}{\"1\": {}}", ParseMode::Lenient).unwrap();
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn strict_mode_reports_errors() {
        assert!(parse_document(r#"{"1": {"A": 5,}}"#, ParseMode::Strict).is_ok());
        assert!(parse_document(r#"{"1": {"A": 5 "B": 6}}"#, ParseMode::Strict).is_err());

        let err = parse_document("[1]", ParseMode::Strict).unwrap_err();
        assert!(err.message.contains("array"), "{}", err.message);
    }
}
