//! Selector parsing.
//!
//! A selector is a `::`-separated list of segments. Splitting is depth-aware:
//! a `::` inside parentheses or brackets belongs to its segment, so a regex
//! like `(^AWS::)` survives intact. Malformed selectors fail here, before any
//! matching happens.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Error;
use crate::query::Path;
use crate::query::token::Token;

static NUMBERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

fn parse_error(selector: &str, message: impl Into<String>) -> Error {
    Error::Selector {
        selector: selector.to_string(),
        message: message.into(),
    }
}

fn split_segments(selector: &str) -> Result<Vec<String>, Error> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut parens = 0usize;
    let mut brackets = 0usize;

    let mut chars = selector.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '(' => {
                parens += 1;
                current.push(c);
            }
            ')' => {
                parens = parens
                    .checked_sub(1)
                    .ok_or_else(|| parse_error(selector, "unbalanced `)`"))?;
                current.push(c);
            }
            '[' => {
                brackets += 1;
                current.push(c);
            }
            ']' => {
                brackets = brackets
                    .checked_sub(1)
                    .ok_or_else(|| parse_error(selector, "unbalanced `]`"))?;
                current.push(c);
            }
            ':' if parens == 0 && brackets == 0 && chars.peek() == Some(&':') => {
                chars.next();
                segments.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    segments.push(current);

    if parens > 0 {
        return Err(parse_error(selector, "unbalanced `(`"));
    }
    if brackets > 0 {
        return Err(parse_error(selector, "unbalanced `[`"));
    }
    if segments.iter().any(String::is_empty) {
        return Err(parse_error(selector, "empty segment"));
    }
    Ok(segments)
}

fn compile_regex(selector: &str, pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|err| parse_error(selector, format!("invalid pattern: {err}")))
}

fn parse_range_segment(selector: &str, inner: &str) -> Result<Token, Error> {
    if inner.is_empty() {
        return Ok(Token::UnboundRange);
    }
    if inner.starts_with('(') {
        if !inner.ends_with(')') {
            return Err(parse_error(selector, "unbalanced `(` in range"));
        }
        return Ok(Token::PatternRange(compile_regex(selector, inner)?));
    }
    if inner == "*" {
        return Ok(Token::WildcardRange);
    }
    if let Some((lo, hi)) = inner.split_once('-') {
        let lo = lo.parse().unwrap_or(0);
        let hi = hi.parse().unwrap_or(usize::MAX);
        return Ok(Token::BoundRange(lo, hi));
    }
    if NUMBERS.is_match(inner) {
        // NUMBERS guarantees this parses
        return Ok(Token::Index(inner.parse().map_err(|_| {
            Error::Internal(format!("numeric segment `{inner}` failed to parse"))
        })?));
    }
    Ok(Token::Value(inner.to_string()))
}

fn parse_segment(selector: &str, segment: &str) -> Result<Token, Error> {
    if segment.starts_with('(') {
        if !segment.ends_with(')') {
            return Err(parse_error(selector, "unbalanced `(`"));
        }
        return Ok(Token::Pattern(compile_regex(selector, segment)?));
    }
    if segment == "*" {
        return Ok(Token::Wildcard);
    }
    if segment.starts_with('[') {
        if !segment.ends_with(']') {
            return Err(parse_error(selector, "unbalanced `[`"));
        }
        return parse_range_segment(selector, &segment[1..segment.len() - 1]);
    }
    Ok(Token::Key(segment.to_string()))
}

/// Parses a selector string into a [`Path`].
pub fn parse(selector: &str) -> Result<Path, Error> {
    let tokens = split_segments(selector)?
        .iter()
        .map(|segment| parse_segment(selector, segment))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Path {
        tokens,
        source: selector.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(selector: &str) -> Vec<Token> {
        parse(selector).unwrap().tokens
    }

    #[test]
    fn test_simple_keys() {
        let parsed = tokens("Resources::MyRole::Type");
        assert!(matches!(&parsed[0], Token::Key(k) if k == "Resources"));
        assert!(matches!(&parsed[1], Token::Key(k) if k == "MyRole"));
        assert!(matches!(&parsed[2], Token::Key(k) if k == "Type"));
    }

    #[test]
    fn test_wildcard_and_ranges() {
        let parsed = tokens("Resources::*::Policies::[]");
        assert!(matches!(parsed[1], Token::Wildcard));
        assert!(matches!(parsed[3], Token::UnboundRange));

        assert!(matches!(tokens("x::[*]")[1], Token::WildcardRange));
        assert!(matches!(tokens("x::[3]")[1], Token::Index(3)));
        assert!(matches!(tokens("x::[v1]")[1], Token::Value(_)));
    }

    #[test]
    fn test_bound_range_defaults() {
        assert!(matches!(tokens("x::[0-2]")[1], Token::BoundRange(0, 2)));
        assert!(matches!(tokens("x::[3-]")[1], Token::BoundRange(3, usize::MAX)));
        assert!(matches!(tokens("x::[-4]")[1], Token::BoundRange(0, 4)));
    }

    #[test]
    fn test_pattern_keeps_embedded_separator() {
        let parsed = tokens("(^AWS::)");
        assert_eq!(parsed.len(), 1);
        match &parsed[0] {
            Token::Pattern(regex) => {
                assert!(regex.is_match("AWS::Region"));
                assert!(!regex.is_match("MyAWS::Region"));
            }
            other => panic!("expected pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_pattern_range() {
        let parsed = tokens("Policies::[(Policy.*)]");
        assert!(matches!(parsed[1], Token::PatternRange(_)));
    }

    #[test]
    fn test_malformed_selectors() {
        assert!(parse("(^AWS").is_err());
        assert!(parse("x::[1-2").is_err());
        assert!(parse("x::]").is_err());
        assert!(parse("a::::b").is_err());
        assert!(parse("x::(((").is_err());
    }
}
