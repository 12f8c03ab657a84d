//! Single-pass scanner that splits template source into `Segment`s.
//!
//! The scanner walks decoded `char`s, never bytes, so multi-byte text is
//! never split. Delimiter matches are checked at every character position
//! and are leftmost-greedy: there is no escaping and no string-literal
//! awareness inside code bodies.
//
//  Informal grammar (default delimiters):
//
//      template ::= (text | code)*
//      code     ::= '<%' marker? body '%>'
//      marker   ::= one of the configured eval markers
//      body     ::= .*?        (shortest run up to the first '%>')
//      text     ::= run of chars not starting a '<%'

use std::str::Chars;

use tracing::{debug, trace};

use crate::error::CompileError;
use crate::model::{DelimiterConfig, Segment};

#[derive(Clone)]
pub struct Scanner<'a> {
    chars: Chars<'a>,
    config: &'a DelimiterConfig,
    /// Character offset of the cursor.
    offset: usize,
    finished: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str, config: &'a DelimiterConfig) -> Result<Self, CompileError> {
        config.validate()?;
        Ok(Self {
            chars: src.chars(),
            config,
            offset: 0,
            finished: false,
        })
    }

    fn rest(&self) -> &'a str {
        self.chars.as_str()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.offset += 1;
        }
        c
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip(&mut self, delim: &str) {
        for _ in delim.chars() {
            self.next_char();
        }
    }

    fn at_start_delim(&self) -> bool {
        self.rest().starts_with(self.config.start.as_str())
    }

    fn read_text(&mut self) -> String {
        let mut txt = String::new();
        while self.peek_char().is_some() && !self.at_start_delim() {
            if let Some(c) = self.next_char() {
                txt.push(c);
            }
        }
        txt
    }

    /// Reads one `<start>[marker]code<end>` region. The cursor must sit on a
    /// start delimiter.
    fn read_code(&mut self) -> Result<Segment, CompileError> {
        let config = self.config;
        let opened_at = self.offset;
        let unterminated = || CompileError::UnterminatedDelimiter {
            start: config.start.clone(),
            end: config.end.clone(),
            offset: opened_at,
        };

        self.skip(&config.start);

        let marker = match self.peek_char() {
            None => return Err(unterminated()),
            Some(c) if config.is_eval_marker(c) => {
                self.next_char();
                Some(c)
            }
            Some(_) => None,
        };

        let mut code = String::new();
        loop {
            if self.rest().starts_with(config.end.as_str()) {
                self.skip(&config.end);
                break;
            }
            match self.next_char() {
                Some(c) => code.push(c),
                None => return Err(unterminated()),
            }
        }

        trace!(offset = opened_at, ?marker, len = code.len(), "code region");
        Ok(match marker {
            Some(marker) => Segment::EvalCode { code, marker },
            None => Segment::RawCode { code },
        })
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Segment, CompileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.peek_char().is_none() {
            self.finished = true;
            return None;
        }

        if !self.at_start_delim() {
            let content = self.read_text();
            return Some(Ok(Segment::StaticText { content }));
        }

        let res = self.read_code();
        if res.is_err() {
            self.finished = true;
        }
        Some(res)
    }
}

/// Scans the whole source. Fails without a partial result on the first
/// unterminated code region.
pub fn scan(src: &str, config: &DelimiterConfig) -> Result<Vec<Segment>, CompileError> {
    let segments = Scanner::new(src, config)?.collect::<Result<Vec<_>, _>>()?;
    debug!(chars = src.chars().count(), segments = segments.len(), "scanned template");
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Segment {
        Segment::StaticText { content: s.into() }
    }
    fn eval(s: &str, marker: char) -> Segment {
        Segment::EvalCode {
            code: s.into(),
            marker,
        }
    }
    fn raw(s: &str) -> Segment {
        Segment::RawCode { code: s.into() }
    }

    #[test]
    fn test_segmentation() {
        let config = DelimiterConfig::default();
        let test_cases = vec![
            ("", vec![]),
            (
                "text with no delimiters at all",
                vec![text("text with no delimiters at all")],
            ),
            ("A<%= b %>C", vec![text("A"), eval(" b ", '='), text("C")]),
            (
                "<% if (a) { %>hi<% } %>",
                vec![raw(" if (a) { "), text("hi"), raw(" } ")],
            ),
            ("<%=%>", vec![eval("", '=')]),
            ("<%%>", vec![raw("")]),
            ("<%a%><%=b%>", vec![raw("a"), eval("b", '=')]),
            // a lone '%' or '<' is plain text
            ("50% < 60%", vec![text("50% < 60%")]),
            ("x %> y", vec![text("x %> y")]),
        ];

        for (src, expected) in test_cases {
            let segments = scan(src, &config).unwrap();
            assert_eq!(segments, expected, "source: {src:?}");
        }
    }

    #[test]
    fn test_marker_detection() {
        let config = DelimiterConfig::new("<%", "%>", ['=', '!']);
        let test_cases = vec![
            ("<%= x %>", eval(" x ", '=')),
            ("<%! x %>", eval(" x ", '!')),
            ("<%- x %>", raw("- x ")),
            // only the first char after the delimiter is a marker
            ("<%== x %>", eval("= x ", '=')),
        ];

        for (src, expected) in test_cases {
            let segments = scan(src, &config).unwrap();
            assert_eq!(segments, vec![expected], "source: {src:?}");
        }
    }

    #[test]
    fn test_unterminated() {
        let config = DelimiterConfig::default();
        for (src, offset) in [("<% x", 0), ("ab<%", 2), ("<%=", 0), ("<%= a %> <%= b %", 9)] {
            let err = scan(src, &config).unwrap_err();
            assert_eq!(
                err,
                CompileError::UnterminatedDelimiter {
                    start: "<%".into(),
                    end: "%>".into(),
                    offset,
                },
                "source: {src:?}"
            );
        }
    }

    #[test]
    fn test_unterminated_message_names_delimiters() {
        let config = DelimiterConfig::new("{{", "}}", ['=']);
        let err = scan("hello {{ name", &config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("{{") && msg.contains("}}"), "got: {msg}");
    }

    #[test]
    fn test_multibyte_text_and_code() {
        let config = DelimiterConfig::new("«", "»", ['→']);
        let segments = scan("héllo «→ naïve »wörld «ß»", &config).unwrap();
        assert_eq!(
            segments,
            vec![
                text("héllo "),
                eval(" naïve ", '→'),
                text("wörld "),
                raw("ß"),
            ]
        );
    }

    #[test]
    fn test_end_delimiter_inside_string_ends_code() {
        let config = DelimiterConfig::default();
        let segments = scan(r#"<%= "%>" %>"#, &config).unwrap();
        assert_eq!(segments, vec![eval(r#" ""#, '='), text(r#"" %>"#)]);
    }

    #[test]
    fn test_source_reconstruction() {
        let config = DelimiterConfig::new("{{", "}}", ['=', '!']);
        let sources = [
            "",
            "plain",
            "a{{= b }}c{{ for x in y }}{{!x}}{{ end }}",
            "{{}}{{=}}{{ } }}}",
            "ünïcödé {{= 名前 }} 🎉",
        ];

        for src in sources {
            let rebuilt: String = scan(src, &config)
                .unwrap()
                .iter()
                .map(|s| s.source_text(&config))
                .collect();
            assert_eq!(rebuilt, src);
        }
    }

    #[test]
    fn test_empty_delimiters_rejected() {
        for config in [
            DelimiterConfig::new("", "%>", ['=']),
            DelimiterConfig::new("<%", "", ['=']),
        ] {
            assert!(matches!(
                scan("x", &config),
                Err(CompileError::InvalidConfiguration(_))
            ));
        }
    }
}
