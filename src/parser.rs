//! A small recursive-descent parser over the token stream below, built the
//! way the teacher's own tokenizer/parser pair is built. The grammar is
//! peripheral (spec §1, SPEC_FULL §1): it exists so the REPL and the
//! integration tests have a textual surface, not as a core deliverable.
//!
//! `(if test cons alt)` and `(lambda (formals...) body...)` parse directly
//! to `Conditional`/`LambdaExpr` nodes; every other `(op arg...)` form
//! parses to a plain `Application` — special forms like `define`, `then`,
//! `call/cc` are ordinary applications whose operator symbol happens to
//! resolve to a `SpecialForm` value in the environment, so the parser
//! does not need to know their names.

use crate::error::{Result, SchemeError};
use crate::symbol::Symbol;
use crate::value::{Application, Conditional, LambdaExpr, Sequence};
use crate::value::Expr;
use num_bigint::BigInt;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone)]
enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Symbol(String),
    Integer(String),
    Char(char),
    Str(String),
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars: Peekable<Chars> = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            '(' => { tokens.push(Token::LParen); chars.next(); }
            ')' => { tokens.push(Token::RParen); chars.next(); }
            '[' => { tokens.push(Token::LBracket); chars.next(); }
            ']' => { tokens.push(Token::RBracket); chars.next(); }
            '{' => { tokens.push(Token::LBrace); chars.next(); }
            '}' => { tokens.push(Token::RBrace); chars.next(); }
            ';' => { tokens.push(Token::Semicolon); chars.next(); }
            '#' => {
                while let Some(next_c) = chars.next() {
                    if next_c == '\n' {
                        break;
                    }
                }
            }
            c if c.is_whitespace() => { chars.next(); }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some('\\') => s.push('\\'),
                            Some('"') => s.push('"'),
                            Some(other) => {
                                return Err(SchemeError::Parser(format!("invalid escape: \\{other}")));
                            }
                            None => return Err(SchemeError::Parser("unterminated string".to_string())),
                        },
                        Some(other) => s.push(other),
                        None => return Err(SchemeError::Parser("unterminated string".to_string())),
                    }
                }
                tokens.push(Token::Str(s));
            }
            '\'' => {
                chars.next();
                let c = chars
                    .next()
                    .ok_or_else(|| SchemeError::Parser("unterminated character literal".to_string()))?;
                match chars.next() {
                    Some('\'') => tokens.push(Token::Char(c)),
                    _ => return Err(SchemeError::Parser("expected closing '\\'' after character".to_string())),
                }
            }
            c if c.is_ascii_digit() || (c == '-' && is_digit_after_minus(&chars)) => {
                let mut digits = String::new();
                if c == '-' {
                    digits.push(chars.next().unwrap());
                }
                while let Some(&next_c) = chars.peek() {
                    if next_c.is_ascii_digit() {
                        digits.push(chars.next().unwrap());
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Integer(digits));
            }
            _ => {
                let mut sym = String::new();
                while let Some(&next_c) = chars.peek() {
                    if next_c.is_whitespace() || "()[]{};\"'".contains(next_c) {
                        break;
                    }
                    sym.push(chars.next().unwrap());
                }
                if sym.is_empty() {
                    return Err(SchemeError::Parser(format!("unexpected character: {c}")));
                }
                tokens.push(Token::Symbol(sym));
            }
        }
    }
    Ok(tokens)
}

fn is_digit_after_minus(chars: &Peekable<Chars>) -> bool {
    chars.clone().nth(1).is_some_and(|c| c.is_ascii_digit())
}

struct Parser<'a> {
    tokens: Peekable<std::slice::Iter<'a, Token>>,
}

impl<'a> Parser<'a> {
    fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek().copied()
    }

    fn next_token(&mut self) -> Result<Token> {
        self.tokens
            .next()
            .cloned()
            .ok_or_else(|| SchemeError::Parser("unexpected end of input".to_string()))
    }

    fn expect(&mut self, want: &str, matches: impl Fn(&Token) -> bool) -> Result<Token> {
        let tok = self.next_token()?;
        if matches(&tok) {
            Ok(tok)
        } else {
            Err(SchemeError::Parser(format!("expected {want}")))
        }
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        match self.next_token()? {
            Token::Integer(digits) => {
                let n: BigInt = digits
                    .parse()
                    .map_err(|_| SchemeError::Parser(format!("invalid integer literal: {digits}")))?;
                Ok(Expr::Integer(n))
            }
            Token::Char(c) => Ok(Expr::Character(c)),
            Token::Str(s) => Ok(Expr::string(s)),
            Token::Symbol(s) => Ok(match s.as_str() {
                "true" => Expr::boolean(true),
                "false" => Expr::boolean(false),
                "unknown" => Expr::Boolean(crate::logic::Boolean::Unknown),
                // `back`/`exit` ignore operands and are written bare rather
                // than applied (spec §4.6/§4.8): desugar the bare keyword
                // into a zero-operand application of the special form, the
                // same node an explicit `(back)`/`(exit)` would parse to.
                "back" | "exit" => Expr::Application(std::rc::Rc::new(Application {
                    operator: Expr::Symbol(Symbol::intern(&s)),
                    operands: Expr::Null,
                })),
                _ => Expr::Symbol(Symbol::intern(&s)),
            }),
            Token::LBracket => self.parse_list_literal(),
            Token::LBrace => {
                let body = self.parse_block()?;
                Ok(Expr::Sequence(std::rc::Rc::new(Sequence { exprs: body })))
            }
            Token::LParen => self.parse_form(),
            Token::RParen => Err(SchemeError::Parser("unexpected ')'".to_string())),
            Token::RBracket => Err(SchemeError::Parser("unexpected ']'".to_string())),
            Token::RBrace => Err(SchemeError::Parser("unexpected '}'".to_string())),
            Token::Semicolon => Err(SchemeError::Parser("unexpected ';'".to_string())),
        }
    }

    fn parse_list_literal(&mut self) -> Result<Expr> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBracket) => {
                    self.next_token()?;
                    return Ok(Expr::list(items));
                }
                None => return Err(SchemeError::Parser("unmatched '['".to_string())),
                _ => items.push(self.parse_expr()?),
            }
        }
    }

    /// A `;`-separated run of expressions, used for `{...}`, `nest {...}`
    /// and `env {...}` bodies alike; returns them as a `Null`-terminated
    /// list, as `Sequence::exprs` expects.
    fn parse_block(&mut self) -> Result<Expr> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RBrace) => {
                    self.next_token()?;
                    return Ok(Expr::list(items));
                }
                None => return Err(SchemeError::Parser("unmatched '{'".to_string())),
                Some(Token::Semicolon) => {
                    self.next_token()?;
                }
                _ => items.push(self.parse_expr()?),
            }
        }
    }

    fn parse_form(&mut self) -> Result<Expr> {
        let form_name = match self.peek() {
            Some(Token::Symbol(s)) => Some(s.clone()),
            _ => None,
        };
        if let Some(s) = form_name {
            match s.as_str() {
                "if" => {
                    self.next_token()?;
                    let test = self.parse_expr()?;
                    let consequent = self.parse_expr()?;
                    let alternative = self.parse_expr()?;
                    self.expect(")", |t| matches!(t, Token::RParen))?;
                    return Ok(Expr::Conditional(std::rc::Rc::new(Conditional {
                        test,
                        consequent,
                        alternative,
                    })));
                }
                "lambda" => {
                    self.next_token()?;
                    self.expect("'('", |t| matches!(t, Token::LParen))?;
                    let mut formals = Vec::new();
                    loop {
                        match self.next_token()? {
                            Token::RParen => break,
                            Token::Symbol(name) => formals.push(Symbol::intern(&name)),
                            _ => return Err(SchemeError::Parser("lambda formals must be symbols".to_string())),
                        }
                    }
                    let mut body_exprs = Vec::new();
                    loop {
                        match self.peek() {
                            Some(Token::RParen) => {
                                self.next_token()?;
                                break;
                            }
                            None => return Err(SchemeError::Parser("unmatched '(' in lambda".to_string())),
                            _ => body_exprs.push(self.parse_expr()?),
                        }
                    }
                    let body = if body_exprs.len() == 1 {
                        body_exprs.pop().unwrap()
                    } else {
                        Expr::Sequence(std::rc::Rc::new(Sequence { exprs: Expr::list(body_exprs) }))
                    };
                    return Ok(Expr::LambdaExpr(std::rc::Rc::new(LambdaExpr { formals, body })));
                }
                "nest" => {
                    self.next_token()?;
                    self.expect("'{'", |t| matches!(t, Token::LBrace))?;
                    let body = self.parse_block()?;
                    self.expect("')'", |t| matches!(t, Token::RParen))?;
                    return Ok(Expr::Nest(Box::new(Expr::Sequence(std::rc::Rc::new(Sequence { exprs: body })))));
                }
                "env" => {
                    self.next_token()?;
                    self.expect("'{'", |t| matches!(t, Token::LBrace))?;
                    let body = self.parse_block()?;
                    self.expect("')'", |t| matches!(t, Token::RParen))?;
                    return Ok(Expr::EnvExpr(Box::new(Expr::Sequence(std::rc::Rc::new(Sequence { exprs: body })))));
                }
                // `(back)`/`(exit)` parenthesized explicitly: same
                // zero-operand node the bare-keyword case in `parse_expr`
                // builds, parsed here directly so the operator position
                // doesn't recurse back through that bare-keyword rule.
                "back" | "exit" => {
                    self.next_token()?;
                    self.expect("')'", |t| matches!(t, Token::RParen))?;
                    return Ok(Expr::Application(std::rc::Rc::new(Application {
                        operator: Expr::Symbol(Symbol::intern(&s)),
                        operands: Expr::Null,
                    })));
                }
                _ => {}
            }
        }
        let operator = self.parse_expr()?;
        let mut operands = Vec::new();
        loop {
            match self.peek() {
                Some(Token::RParen) => {
                    self.next_token()?;
                    break;
                }
                None => return Err(SchemeError::Parser("unmatched '('".to_string())),
                _ => operands.push(self.parse_expr()?),
            }
        }
        Ok(Expr::Application(std::rc::Rc::new(Application {
            operator,
            operands: Expr::list(operands),
        })))
    }
}

/// Parses a single top-level expression from `input`. Trailing whitespace
/// and comments after the expression are tolerated; leftover tokens are
/// not.
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens: tokens.iter().peekable() };
    let expr = parser.parse_expr()?;
    if parser.peek().is_some() {
        return Err(SchemeError::Parser("unexpected tokens after expression".to_string()));
    }
    Ok(expr)
}

/// Parses `input` as a `;`-separated sequence of top-level expressions
/// (used to load a whole source file at once), yielding their `Sequence`.
pub fn parse_program(input: &str) -> Result<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens: tokens.iter().peekable() };
    let mut items = Vec::new();
    loop {
        match parser.peek() {
            None => break,
            Some(Token::Semicolon) => {
                parser.next_token()?;
            }
            _ => items.push(parser.parse_expr()?),
        }
    }
    Ok(Expr::Sequence(std::rc::Rc::new(Sequence { exprs: Expr::list(items) })))
}
