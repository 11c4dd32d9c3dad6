use crate::expression::ast::{BinaryOp, Expr, UnaryOp};
use crate::expression::error::ExprError;
use crate::expression::lexer::{Span, Token, TokenKind, lex};

// nesting guard so that hostile input cannot exhaust the stack
const MAX_DEPTH: usize = 64;

pub(crate) fn parse_expr(src: &str) -> Result<Expr, ExprError> {
    let tokens = lex(src)?;
    let mut p = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = p.parse_or()?;
    p.expect(TokenKind::Eof)?;
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let t = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn span(&self) -> Span {
        self.peek().span
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), ExprError> {
        if self.peek().kind == kind {
            self.bump();
            Ok(())
        } else {
            Err(ExprError::new(
                self.span().start,
                format!("expected {kind:?}, found {:?}", self.peek().kind),
            ))
        }
    }

    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn enter(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::new(self.span().start, "expression nested too deeply"));
        }
        Ok(())
    }

    fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        self.enter()?;
        let mut e = self.parse_and()?;
        while self.consume(TokenKind::Or) {
            let r = self.parse_and()?;
            e = Self::binary(BinaryOp::Or, e, r);
        }
        self.depth -= 1;
        Ok(e)
    }

    fn parse_and(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_not()?;
        while self.consume(TokenKind::And) {
            let r = self.parse_not()?;
            e = Self::binary(BinaryOp::And, e, r);
        }
        Ok(e)
    }

    fn parse_not(&mut self) -> Result<Expr, ExprError> {
        if self.consume(TokenKind::Not) {
            self.enter()?;
            let e = self.parse_not()?;
            self.depth -= 1;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(e),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_term()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::Ne => BinaryOp::Ne,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Le => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::Ge => BinaryOp::Ge,
                _ => break,
            };
            self.bump();
            let r = self.parse_term()?;
            e = Self::binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_term(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_factor()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let r = self.parse_factor()?;
            e = Self::binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_factor(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_unary()?;
        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.bump();
            let r = self.parse_unary()?;
            e = Self::binary(op, e, r);
        }
        Ok(e)
    }

    fn parse_unary(&mut self) -> Result<Expr, ExprError> {
        let op = match self.peek().kind {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            _ => None,
        };
        if let Some(op) = op {
            self.bump();
            self.enter()?;
            let e = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Expr::Unary {
                op,
                expr: Box::new(e),
            });
        }
        self.parse_power()
    }

    // `**` is right associative and binds tighter than a unary sign on its left
    fn parse_power(&mut self) -> Result<Expr, ExprError> {
        let base = self.parse_postfix()?;
        if self.consume(TokenKind::StarStar) {
            self.enter()?;
            let exp = self.parse_unary()?;
            self.depth -= 1;
            return Ok(Self::binary(BinaryOp::Pow, base, exp));
        }
        Ok(base)
    }

    fn parse_postfix(&mut self) -> Result<Expr, ExprError> {
        let mut e = self.parse_primary()?;

        loop {
            if self.peek().kind == TokenKind::LParen {
                let at = self.span().start;
                self.bump();
                let func = match e {
                    Expr::Var(name) => name,
                    _ => return Err(ExprError::new(at, "call target must be an identifier")),
                };
                let args = self.parse_sequence(TokenKind::RParen)?;
                e = Expr::Call { func, args };
                continue;
            }

            if self.consume(TokenKind::LBracket) {
                let index = self.parse_or()?;
                self.expect(TokenKind::RBracket)?;
                e = Expr::Index {
                    target: Box::new(e),
                    index: Box::new(index),
                };
                continue;
            }

            break;
        }

        Ok(e)
    }

    // comma separated expressions up to `close`, trailing comma allowed
    fn parse_sequence(&mut self, close: TokenKind) -> Result<Vec<Expr>, ExprError> {
        let mut items = Vec::new();
        loop {
            if self.consume(close.clone()) {
                return Ok(items);
            }
            items.push(self.parse_or()?);
            if self.consume(TokenKind::Comma) {
                continue;
            }
            self.expect(close)?;
            return Ok(items);
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let t = self.bump();
        match t.kind {
            TokenKind::Number(v) => Ok(Expr::Number(v)),
            TokenKind::True => Ok(Expr::Bool(true)),
            TokenKind::False => Ok(Expr::Bool(false)),
            TokenKind::Ident(s) => Ok(Expr::Var(s)),
            TokenKind::LParen => {
                if self.consume(TokenKind::RParen) {
                    return Ok(Expr::List(Vec::new()));
                }
                let first = self.parse_or()?;
                if self.consume(TokenKind::RParen) {
                    return Ok(first);
                }
                self.expect(TokenKind::Comma)?;
                let mut items = vec![first];
                items.extend(self.parse_sequence(TokenKind::RParen)?);
                Ok(Expr::List(items))
            }
            TokenKind::LBracket => {
                if self.consume(TokenKind::RBracket) {
                    return Ok(Expr::List(Vec::new()));
                }
                let first = self.parse_or()?;
                if self.consume(TokenKind::For) {
                    let var = match self.bump() {
                        Token {
                            kind: TokenKind::Ident(name),
                            ..
                        } => name,
                        other => {
                            return Err(ExprError::new(
                                other.span.start,
                                format!("expected loop variable, found {:?}", other.kind),
                            ));
                        }
                    };
                    self.expect(TokenKind::In)?;
                    let iter = self.parse_or()?;
                    self.expect(TokenKind::RBracket)?;
                    return Ok(Expr::Comprehension {
                        body: Box::new(first),
                        var,
                        iter: Box::new(iter),
                    });
                }
                let mut items = vec![first];
                if self.consume(TokenKind::Comma) {
                    items.extend(self.parse_sequence(TokenKind::RBracket)?);
                } else {
                    self.expect(TokenKind::RBracket)?;
                }
                Ok(Expr::List(items))
            }
            other => Err(ExprError::new(
                t.span.start,
                format!("unexpected token {other:?}"),
            )),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/parser.rs"]
mod tests;
