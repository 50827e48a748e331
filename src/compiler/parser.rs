//! Tokenization of tokenizer patterns and placeholder modifier parsing.

use crate::error::PatternError;
use crate::ir::{Key, KeyMode};

/// Raw pieces of a pattern before validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token<'p> {
    Literal(&'p str),
    Placeholder { body: &'p str, offset: usize },
}

const OPEN: &str = "%{";
const CLOSE: char = '}';
const ELASTIC_SUFFIX: &str = "->";
const INDEX_SEPARATOR: char = '/';

/// Split a pattern into literal runs and placeholder bodies.
///
/// A `%` that does not open a placeholder and a stray `}` are literal text.
pub(crate) fn tokenize(pattern: &str) -> Result<Vec<Token<'_>>, PatternError> {
    let mut tokens = Vec::new();
    let mut position = 0;

    while let Some(relative) = pattern[position..].find(OPEN) {
        let open = position + relative;
        if open > position {
            tokens.push(Token::Literal(&pattern[position..open]));
        }

        let body_start = open + OPEN.len();
        let close = match pattern[body_start..].find(CLOSE) {
            Some(relative_close) => body_start + relative_close,
            None => return Err(PatternError::Unterminated(open)),
        };

        let body = &pattern[body_start..close];
        if body.contains(OPEN) {
            return Err(PatternError::Unterminated(open));
        }

        tokens.push(Token::Placeholder { body, offset: open });
        position = close + CLOSE.len_utf8();
    }

    if position < pattern.len() {
        tokens.push(Token::Literal(&pattern[position..]));
    }

    Ok(tokens)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Modifier,
    Name,
    Index,
}

/// Parse a placeholder body such as `+name/2->` into a [`Key`].
pub(crate) fn parse_placeholder(body: &str) -> Result<Key, PatternError> {
    let (inner, elastic) = match body.strip_suffix(ELASTIC_SUFFIX) {
        Some(inner) => (inner, true),
        None => (body, false),
    };

    if inner.is_empty() {
        let mut key = Key::new("", KeyMode::AnonymousSkip);
        key.elastic = elastic;
        return Ok(key);
    }

    let mut state = State::Modifier;
    let mut mode = KeyMode::Plain;
    let mut name_start = 0;
    let mut name_end = inner.len();
    let mut index_start = None;

    for (i, c) in inner.char_indices() {
        match state {
            State::Modifier => {
                state = State::Name;
                match c {
                    '?' | '*' => mode = KeyMode::NamedSkip,
                    '+' => mode = KeyMode::Append,
                    '&' => mode = KeyMode::Indirect,
                    _ => continue,
                }
                name_start = i + c.len_utf8();
            }
            State::Name => {
                if mode == KeyMode::Append && c == INDEX_SEPARATOR {
                    name_end = i;
                    index_start = Some(i + c.len_utf8());
                    state = State::Index;
                }
            }
            State::Index => {}
        }
    }

    let name = &inner[name_start..name_end];
    if name.is_empty() {
        return Err(PatternError::EmptyName(body.to_string()));
    }

    let append_index = match index_start {
        Some(start) => {
            let raw = &inner[start..];
            let index = raw
                .parse::<u32>()
                .map_err(|_| PatternError::InvalidAppendIndex {
                    key: name.to_string(),
                    index: raw.to_string(),
                })?;
            Some(index)
        }
        None => None,
    };

    Ok(Key {
        name: name.to_string(),
        mode,
        append_index,
        elastic,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_literals_and_placeholders() {
        let tokens = tokenize("[%{ts}] %{msg}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal("["),
                Token::Placeholder {
                    body: "ts",
                    offset: 1
                },
                Token::Literal("] "),
                Token::Placeholder {
                    body: "msg",
                    offset: 8
                },
            ]
        );
    }

    #[test]
    fn test_tokenize_keeps_stray_percent_and_brace() {
        let tokens = tokenize("100% } %{a}").unwrap();
        assert_eq!(tokens[0], Token::Literal("100% } "));
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_tokenize_unterminated() {
        assert_eq!(tokenize("%{a} %{b"), Err(PatternError::Unterminated(5)));
        assert_eq!(tokenize("%{a %{b}"), Err(PatternError::Unterminated(0)));
    }

    #[test]
    fn test_parse_plain() {
        let key = parse_placeholder("level").unwrap();
        assert_eq!(key, Key::new("level", KeyMode::Plain));
    }

    #[test]
    fn test_parse_modifiers() {
        assert_eq!(parse_placeholder("?k").unwrap().mode, KeyMode::NamedSkip);
        assert_eq!(parse_placeholder("*k").unwrap().mode, KeyMode::NamedSkip);
        assert_eq!(parse_placeholder("&k").unwrap().mode, KeyMode::Indirect);
        assert_eq!(parse_placeholder("+k").unwrap().mode, KeyMode::Append);
        assert_eq!(parse_placeholder("").unwrap().mode, KeyMode::AnonymousSkip);
    }

    #[test]
    fn test_parse_elastic() {
        let key = parse_placeholder("a->").unwrap();
        assert!(key.elastic);
        assert_eq!(key.name, "a");

        let skip = parse_placeholder("->").unwrap();
        assert_eq!(skip.mode, KeyMode::AnonymousSkip);
        assert!(skip.elastic);
    }

    #[test]
    fn test_parse_append_index() {
        let key = parse_placeholder("+msg/3->").unwrap();
        assert_eq!(key.name, "msg");
        assert_eq!(key.mode, KeyMode::Append);
        assert_eq!(key.append_index, Some(3));
        assert!(key.elastic);
    }

    #[test]
    fn test_slash_is_part_of_plain_name() {
        let key = parse_placeholder("path/to").unwrap();
        assert_eq!(key.name, "path/to");
        assert_eq!(key.append_index, None);
    }

    #[test]
    fn test_invalid_append_index() {
        assert_eq!(
            parse_placeholder("+a/x"),
            Err(PatternError::InvalidAppendIndex {
                key: "a".to_string(),
                index: "x".to_string()
            })
        );
        assert!(matches!(
            parse_placeholder("+a/"),
            Err(PatternError::InvalidAppendIndex { .. })
        ));
    }

    #[test]
    fn test_empty_names() {
        for body in ["?", "+", "&", "*", "&->", "+/1"] {
            assert!(
                matches!(parse_placeholder(body), Err(PatternError::EmptyName(_))),
                "{body} should be rejected"
            );
        }
    }
}
