//! Tokenizer for dim expressions
//!
//! Produces the whole token sequence up front, terminated by `End`. Unit
//! symbols come out as plain identifiers; the parser decides whether an
//! identifier is a unit or a constant reference.

use dim_core::{DimError, LexErrorKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
}

impl Operator {
    pub fn symbol(&self) -> char {
        match self {
            Operator::Plus => '+',
            Operator::Minus => '-',
            Operator::Star => '*',
            Operator::Slash => '/',
            Operator::Caret => '^',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    Number(f64),
    Identifier(String),
    Operator(Operator),
    LParen,
    RParen,
    Comma,
    /// `->`, introduces a conversion target
    Arrow,
    End,
}

/// Byte range of a token in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Source text of the token
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end()]
    }

    /// Short description used in error messages
    pub fn describe(&self, source: &str) -> String {
        match &self.kind {
            TokenKind::Number(_) => format!("number '{}'", self.text(source)),
            TokenKind::Identifier(name) => format!("identifier '{}'", name),
            TokenKind::Operator(op) => format!("'{}'", op.symbol()),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Arrow => "'->'".to_string(),
            TokenKind::End => "end of input".to_string(),
        }
    }
}

/// Tokenize expression string
pub fn tokenize(input: &str) -> Result<Vec<Token>, DimError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        let kind = match c {
            // ASCII whitespace, vertical tab included
            b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c' => {
                pos += 1;
                continue;
            }
            b'-' if bytes.get(pos + 1) == Some(&b'>') => {
                pos += 2;
                TokenKind::Arrow
            }
            b'+' | b'-' | b'*' | b'/' | b'^' => {
                pos += 1;
                TokenKind::Operator(match c {
                    b'+' => Operator::Plus,
                    b'-' => Operator::Minus,
                    b'*' => Operator::Star,
                    b'/' => Operator::Slash,
                    _ => Operator::Caret,
                })
            }
            b'(' => {
                pos += 1;
                TokenKind::LParen
            }
            b')' => {
                pos += 1;
                TokenKind::RParen
            }
            b',' => {
                pos += 1;
                TokenKind::Comma
            }
            b'0'..=b'9' => {
                pos = scan_number(input, start)?;
                number(input, start, pos)?
            }
            b'.' if bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) => {
                pos = scan_number(input, start)?;
                number(input, start, pos)?
            }
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                    pos += 1;
                }
                TokenKind::Identifier(input[start..pos].to_string())
            }
            _ => {
                let ch = input[start..].chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                return Err(DimError::lex(start, LexErrorKind::UnexpectedChar(ch)));
            }
        };

        tokens.push(Token {
            kind,
            span: Span { start, len: pos - start },
        });
    }

    tokens.push(Token {
        kind: TokenKind::End,
        span: Span { start: input.len(), len: 0 },
    });
    Ok(tokens)
}

fn number(input: &str, start: usize, end: usize) -> Result<TokenKind, DimError> {
    let text = &input[start..end];
    text.parse::<f64>()
        .map(TokenKind::Number)
        .map_err(|_| malformed(input, start, end))
}

/// Scan `digits ['.' digits] [e [+-] digits]`, returning the end offset.
///
/// An `e` followed by a letter is left for the identifier that follows, so
/// `3eV` lexes as `3` and `eV`.
fn scan_number(input: &str, start: usize) -> Result<usize, DimError> {
    let bytes = input.as_bytes();
    let digits = |mut p: usize| {
        while p < bytes.len() && bytes[p].is_ascii_digit() {
            p += 1;
        }
        p
    };

    let mut pos = digits(start);
    if bytes.get(pos) == Some(&b'.') {
        pos = digits(pos + 1);
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        match bytes.get(pos + 1) {
            Some(b) if b.is_ascii_alphabetic() || *b == b'_' => return Ok(pos),
            Some(b'+' | b'-') | Some(b'0'..=b'9') => {
                let mut exp = pos + 1;
                if matches!(bytes[exp], b'+' | b'-') {
                    exp += 1;
                }
                let end = digits(exp);
                if end == exp {
                    return Err(malformed(input, start, end));
                }
                pos = end;
            }
            _ => return Err(malformed(input, start, pos + 1)),
        }
    }

    // A second decimal point can never start a new token
    if bytes.get(pos) == Some(&b'.') {
        let mut end = pos;
        while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
            end += 1;
        }
        return Err(malformed(input, start, end));
    }

    Ok(pos)
}

fn malformed(input: &str, start: usize, end: usize) -> DimError {
    let end = end.min(input.len());
    DimError::lex(start, LexErrorKind::MalformedNumber(input[start..end].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_simple() {
        let tokens = kinds("1 m + 1 m");
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[0], TokenKind::Number(1.0));
        assert_eq!(tokens[1], TokenKind::Identifier("m".into()));
        assert_eq!(tokens[2], TokenKind::Operator(Operator::Plus));
        assert_eq!(tokens[5], TokenKind::End);
    }

    #[test]
    fn test_compound_unit_is_split() {
        let tokens = kinds("9.8 m/s^2");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Number(9.8),
                TokenKind::Identifier("m".into()),
                TokenKind::Operator(Operator::Slash),
                TokenKind::Identifier("s".into()),
                TokenKind::Operator(Operator::Caret),
                TokenKind::Number(2.0),
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("1.5e3")[0], TokenKind::Number(1500.0));
        assert_eq!(kinds("2E-2")[0], TokenKind::Number(0.02));
        assert_eq!(kinds(".5")[0], TokenKind::Number(0.5));
        assert_eq!(kinds("7.")[0], TokenKind::Number(7.0));
    }

    #[test]
    fn test_unit_starting_with_e() {
        let tokens = kinds("3eV");
        assert_eq!(tokens[0], TokenKind::Number(3.0));
        assert_eq!(tokens[1], TokenKind::Identifier("eV".into()));
    }

    #[test]
    fn test_spans() {
        let tokens = tokenize("  12 km").unwrap();
        assert_eq!(tokens[0].span, Span { start: 2, len: 2 });
        assert_eq!(tokens[1].span, Span { start: 5, len: 2 });
        assert_eq!(tokens[2].span, Span { start: 7, len: 0 });
    }

    #[test]
    fn test_arrow() {
        let tokens = kinds("1 km -> m");
        assert_eq!(tokens[2], TokenKind::Arrow);
        let tokens = kinds("1 - -2");
        assert_eq!(tokens[1], TokenKind::Operator(Operator::Minus));
        assert_eq!(tokens[2], TokenKind::Operator(Operator::Minus));
    }

    #[test]
    fn test_unexpected_char() {
        let err = tokenize("1 m $ 2").unwrap_err();
        assert_eq!(err, DimError::lex(4, LexErrorKind::UnexpectedChar('$')));

        let err = tokenize("2 µm").unwrap_err();
        assert_eq!(err, DimError::lex(2, LexErrorKind::UnexpectedChar('µ')));
    }

    #[test]
    fn test_malformed_numbers() {
        let err = tokenize("1.2.3").unwrap_err();
        assert_eq!(err, DimError::lex(0, LexErrorKind::MalformedNumber("1.2.3".into())));

        let err = tokenize("4 + 1e+").unwrap_err();
        assert_eq!(err, DimError::lex(4, LexErrorKind::MalformedNumber("1e+".into())));

        let err = tokenize("1e").unwrap_err();
        assert!(matches!(err, DimError::Lex { position: 0, kind: LexErrorKind::MalformedNumber(_) }));

        let err = tokenize("1e5.5").unwrap_err();
        assert!(matches!(err, DimError::Lex { kind: LexErrorKind::MalformedNumber(_), .. }));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(kinds("   "), vec![TokenKind::End]);
    }

    #[test]
    fn test_whitespace() {
        let tokens = kinds("1\x0b+\x0c2\r\n");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Number(1.0),
                TokenKind::Operator(Operator::Plus),
                TokenKind::Number(2.0),
                TokenKind::End,
            ]
        );
        assert_eq!(kinds("\t\x0b\x0c"), vec![TokenKind::End]);
    }
}
