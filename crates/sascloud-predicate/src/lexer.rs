//! Tokenizer for the predicate expression grammar.
//!
//! Accepts numbers, identifiers, arithmetic and comparison operators, and
//! boolean connectives in both keyword (`and`, `or`, `not`) and symbol
//! (`&&`, `||`, `!`) form.

use crate::error::{PredicateError, Result};

/// A token in a predicate expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal.
    Number(f64),
    /// Identifier: a variable, constant, or function name.
    Ident(String),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    EqEq,
    /// `!=`
    Ne,
    /// `and` / `&&`
    And,
    /// `or` / `||`
    Or,
    /// `not` / `!`
    Not,
}

/// A token with its byte offset in the source expression.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    /// The token.
    pub token: Token,
    /// Byte offset where the token starts.
    pub pos: usize,
}

/// Tokenize an entire expression.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos];
        if ch.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let token = match ch {
            b'+' => {
                pos += 1;
                Token::Plus
            }
            b'-' => {
                pos += 1;
                Token::Minus
            }
            b'*' => {
                if bytes.get(pos + 1) == Some(&b'*') {
                    pos += 2;
                    Token::StarStar
                } else {
                    pos += 1;
                    Token::Star
                }
            }
            b'/' => {
                pos += 1;
                Token::Slash
            }
            b'(' => {
                pos += 1;
                Token::LParen
            }
            b')' => {
                pos += 1;
                Token::RParen
            }
            b'<' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    Token::Le
                } else {
                    pos += 1;
                    Token::Lt
                }
            }
            b'>' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    Token::Ge
                } else {
                    pos += 1;
                    Token::Gt
                }
            }
            b'=' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    Token::EqEq
                } else {
                    return Err(PredicateError::Lexer {
                        pos,
                        message: "single '=' is not an operator; use '=='".into(),
                    });
                }
            }
            b'!' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    Token::Ne
                } else {
                    pos += 1;
                    Token::Not
                }
            }
            b'&' => {
                if bytes.get(pos + 1) == Some(&b'&') {
                    pos += 2;
                    Token::And
                } else {
                    return Err(PredicateError::Lexer {
                        pos,
                        message: "single '&' is not an operator; use '&&' or 'and'".into(),
                    });
                }
            }
            b'|' => {
                if bytes.get(pos + 1) == Some(&b'|') {
                    pos += 2;
                    Token::Or
                } else {
                    return Err(PredicateError::Lexer {
                        pos,
                        message: "single '|' is not an operator; use '||' or 'or'".into(),
                    });
                }
            }
            b'0'..=b'9' | b'.' => {
                let text = lex_number(bytes, &mut pos);
                let value = text.parse::<f64>().map_err(|_| PredicateError::Lexer {
                    pos: start,
                    message: format!("bad number '{}'", text),
                })?;
                Token::Number(value)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while pos < bytes.len()
                    && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_')
                {
                    pos += 1;
                }
                match &input[start..pos] {
                    "and" => Token::And,
                    "or" => Token::Or,
                    "not" => Token::Not,
                    ident => Token::Ident(ident.to_string()),
                }
            }
            c => {
                return Err(PredicateError::Lexer {
                    pos,
                    message: format!("unexpected character '{}'", c as char),
                });
            }
        };

        tokens.push(SpannedToken { token, pos: start });
    }

    Ok(tokens)
}

/// Consume a numeric literal: digits, optional fraction, optional exponent.
fn lex_number<'a>(bytes: &'a [u8], pos: &mut usize) -> &'a str {
    let start = *pos;
    while *pos < bytes.len() && (bytes[*pos].is_ascii_digit() || bytes[*pos] == b'.') {
        *pos += 1;
    }
    // Exponent only counts when followed by a digit (with optional sign),
    // so a trailing `e` stays an identifier (Euler's constant).
    if *pos < bytes.len() && (bytes[*pos] == b'e' || bytes[*pos] == b'E') {
        let mut next = *pos + 1;
        if next < bytes.len() && (bytes[next] == b'+' || bytes[next] == b'-') {
            next += 1;
        }
        if next < bytes.len() && bytes[next].is_ascii_digit() {
            *pos = next;
            while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
                *pos += 1;
            }
        }
    }
    // Safety of slicing: number bytes are all ASCII.
    std::str::from_utf8(&bytes[start..*pos]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_sphere_expression() {
        let toks = kinds("x**2+y**2+z**2 <= 25");
        assert_eq!(
            toks,
            vec![
                Token::Ident("x".into()),
                Token::StarStar,
                Token::Number(2.0),
                Token::Plus,
                Token::Ident("y".into()),
                Token::StarStar,
                Token::Number(2.0),
                Token::Plus,
                Token::Ident("z".into()),
                Token::StarStar,
                Token::Number(2.0),
                Token::Le,
                Token::Number(25.0),
            ]
        );
    }

    #[test]
    fn test_keywords_and_symbols() {
        assert_eq!(
            kinds("x<1 and y>2 || not z==3"),
            kinds("x<1 && y>2 or ! z==3")
        );
    }

    #[test]
    fn test_scientific_notation_vs_euler() {
        assert_eq!(
            kinds("1.5e-3"),
            vec![Token::Number(1.5e-3)]
        );
        assert_eq!(
            kinds("2e"),
            vec![Token::Number(2.0), Token::Ident("e".into())]
        );
    }

    #[test]
    fn test_bad_character() {
        assert!(matches!(
            tokenize("x ; y"),
            Err(PredicateError::Lexer { pos: 2, .. })
        ));
    }

    #[test]
    fn test_single_equals_rejected() {
        assert!(tokenize("x = 1").is_err());
    }
}
