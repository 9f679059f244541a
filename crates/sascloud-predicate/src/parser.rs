//! Recursive-descent parser producing an untyped expression tree.
//!
//! Grammar (lowest precedence first):
//!
//! ```text
//! or      := and ( "or" and )*
//! and     := not ( "and" not )*
//! not     := "not" not | compare
//! compare := sum ( ("<=" | ">=" | "<" | ">" | "==" | "!=") sum )?
//! sum     := term ( ("+" | "-") term )*
//! term    := unary ( ("*" | "/") unary )*
//! unary   := "-" unary | power
//! power   := atom ( "**" unary )?
//! atom    := number | ident | ident "(" or ")" | "(" or ")"
//! ```
//!
//! Typing (boolean vs. numeric) and name resolution happen in a separate
//! lowering pass; the parser only cares about shape.

use crate::error::{PredicateError, Result};
use crate::lexer::{tokenize, SpannedToken, Token};

/// Arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Exponentiation (`**`).
    Pow,
}

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

/// Untyped expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// Numeric literal.
    Number(f64),
    /// Variable or named constant.
    Ident(String),
    /// Unary negation.
    Neg(Box<Ast>),
    /// Arithmetic operation.
    Arith(ArithOp, Box<Ast>, Box<Ast>),
    /// Comparison.
    Cmp(CmpOp, Box<Ast>, Box<Ast>),
    /// Boolean conjunction.
    And(Box<Ast>, Box<Ast>),
    /// Boolean disjunction.
    Or(Box<Ast>, Box<Ast>),
    /// Boolean negation.
    Not(Box<Ast>),
    /// Single-argument function call.
    Call(String, Box<Ast>),
}

/// Parse an expression string into an untyped tree.
pub fn parse(input: &str) -> Result<Ast> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        idx: 0,
        end: input.len(),
    };
    let ast = parser.parse_or()?;
    if let Some(tok) = parser.peek() {
        return Err(PredicateError::Parser {
            pos: tok.pos,
            message: format!("unexpected trailing token {:?}", tok.token),
        });
    }
    Ok(ast)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    idx: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&SpannedToken> {
        self.tokens.get(self.idx)
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.tokens.get(self.idx).cloned();
        if tok.is_some() {
            self.idx += 1;
        }
        tok
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek().map(|t| &t.token) == Some(expected) {
            self.idx += 1;
            true
        } else {
            false
        }
    }

    fn pos(&self) -> usize {
        self.peek().map(|t| t.pos).unwrap_or(self.end)
    }

    fn parse_or(&mut self) -> Result<Ast> {
        let mut lhs = self.parse_and()?;
        while self.eat(&Token::Or) {
            let rhs = self.parse_and()?;
            lhs = Ast::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Ast> {
        let mut lhs = self.parse_not()?;
        while self.eat(&Token::And) {
            let rhs = self.parse_not()?;
            lhs = Ast::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_not(&mut self) -> Result<Ast> {
        if self.eat(&Token::Not) {
            let inner = self.parse_not()?;
            return Ok(Ast::Not(Box::new(inner)));
        }
        self.parse_compare()
    }

    fn parse_compare(&mut self) -> Result<Ast> {
        let lhs = self.parse_sum()?;
        let op = match self.peek().map(|t| &t.token) {
            Some(Token::Lt) => CmpOp::Lt,
            Some(Token::Le) => CmpOp::Le,
            Some(Token::Gt) => CmpOp::Gt,
            Some(Token::Ge) => CmpOp::Ge,
            Some(Token::EqEq) => CmpOp::Eq,
            Some(Token::Ne) => CmpOp::Ne,
            _ => return Ok(lhs),
        };
        self.idx += 1;
        let rhs = self.parse_sum()?;
        Ok(Ast::Cmp(op, Box::new(lhs), Box::new(rhs)))
    }

    fn parse_sum(&mut self) -> Result<Ast> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek().map(|t| &t.token) {
                Some(Token::Plus) => ArithOp::Add,
                Some(Token::Minus) => ArithOp::Sub,
                _ => return Ok(lhs),
            };
            self.idx += 1;
            let rhs = self.parse_term()?;
            lhs = Ast::Arith(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_term(&mut self) -> Result<Ast> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek().map(|t| &t.token) {
                Some(Token::Star) => ArithOp::Mul,
                Some(Token::Slash) => ArithOp::Div,
                _ => return Ok(lhs),
            };
            self.idx += 1;
            let rhs = self.parse_unary()?;
            lhs = Ast::Arith(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn parse_unary(&mut self) -> Result<Ast> {
        if self.eat(&Token::Minus) {
            let inner = self.parse_unary()?;
            return Ok(Ast::Neg(Box::new(inner)));
        }
        self.parse_power()
    }

    fn parse_power(&mut self) -> Result<Ast> {
        let base = self.parse_atom()?;
        if self.eat(&Token::StarStar) {
            // Right-associative: 2**3**2 = 2**(3**2)
            let exp = self.parse_unary()?;
            return Ok(Ast::Arith(ArithOp::Pow, Box::new(base), Box::new(exp)));
        }
        Ok(base)
    }

    fn parse_atom(&mut self) -> Result<Ast> {
        let pos = self.pos();
        match self.advance().map(|t| t.token) {
            Some(Token::Number(v)) => Ok(Ast::Number(v)),
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let arg = self.parse_or()?;
                    if !self.eat(&Token::RParen) {
                        return Err(PredicateError::Parser {
                            pos: self.pos(),
                            message: format!("expected ')' to close call to '{}'", name),
                        });
                    }
                    Ok(Ast::Call(name, Box::new(arg)))
                } else {
                    Ok(Ast::Ident(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                if !self.eat(&Token::RParen) {
                    return Err(PredicateError::Parser {
                        pos: self.pos(),
                        message: "expected ')'".into(),
                    });
                }
                Ok(inner)
            }
            Some(tok) => Err(PredicateError::Parser {
                pos,
                message: format!("unexpected token {:?}", tok),
            }),
            None => Err(PredicateError::Parser {
                pos,
                message: "unexpected end of expression".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_pow_over_mul() {
        // 2*x**2 parses as 2*(x**2)
        let ast = parse("2*x**2").unwrap();
        assert_eq!(
            ast,
            Ast::Arith(
                ArithOp::Mul,
                Box::new(Ast::Number(2.0)),
                Box::new(Ast::Arith(
                    ArithOp::Pow,
                    Box::new(Ast::Ident("x".into())),
                    Box::new(Ast::Number(2.0)),
                )),
            )
        );
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        let ast = parse("x<1 or y<1 and z<1").unwrap();
        assert!(matches!(ast, Ast::Or(_, _)));
    }

    #[test]
    fn test_unmatched_paren() {
        assert!(matches!(
            parse("(x + 1"),
            Err(PredicateError::Parser { .. })
        ));
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert!(matches!(
            parse("x < 1 2"),
            Err(PredicateError::Parser { .. })
        ));
    }

    #[test]
    fn test_call_parses() {
        let ast = parse("sqrt(x) < 2").unwrap();
        match ast {
            Ast::Cmp(CmpOp::Lt, lhs, _) => {
                assert!(matches!(*lhs, Ast::Call(ref name, _) if name == "sqrt"));
            }
            other => panic!("unexpected ast: {:?}", other),
        }
    }
}
