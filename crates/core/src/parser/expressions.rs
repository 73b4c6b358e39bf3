use super::{describe, Parser};
use crate::ast::{AssocExprOp, BinaryExprOp, BuiltinSet, Expr, UnaryExprOp};
use crate::error::Diagnostic;
use crate::lexer::Token;

/// How an infix token combines its operands at one precedence level.
#[derive(Clone, Copy)]
enum Infix {
    Assoc(AssocExprOp),
    Binary(BinaryExprOp),
}

impl<'a> Parser<'a> {
    pub(super) fn parse_expr(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_maplet()
    }

    fn parse_maplet(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_function_space()?;
        while self.peek() == &Token::Maplet {
            self.advance();
            let right = self.parse_function_space()?;
            left = Expr::binary(BinaryExprOp::Maplet, left, right);
        }
        Ok(left)
    }

    fn parse_function_space(&mut self) -> Result<Expr, Diagnostic> {
        let left = self.parse_set_op()?;
        let op = match self.peek() {
            Token::PartialFun => BinaryExprOp::PartialFun,
            Token::TotalFun => BinaryExprOp::TotalFun,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_function_space()?;
        Ok(Expr::binary(op, left, right))
    }

    fn parse_set_op(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_level(Self::parse_range, |t| match t {
            Token::Union => Some(Infix::Assoc(AssocExprOp::Union)),
            Token::Inter => Some(Infix::Assoc(AssocExprOp::Inter)),
            Token::SetMinus => Some(Infix::Binary(BinaryExprOp::SetMinus)),
            Token::Cprod => Some(Infix::Binary(BinaryExprOp::Cprod)),
            _ => None,
        })
    }

    fn parse_range(&mut self) -> Result<Expr, Diagnostic> {
        let left = self.parse_additive()?;
        if self.peek() == &Token::UpTo {
            self.advance();
            let right = self.parse_additive()?;
            return Ok(Expr::binary(BinaryExprOp::UpTo, left, right));
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_level(Self::parse_multiplicative, |t| match t {
            Token::Plus => Some(Infix::Assoc(AssocExprOp::Plus)),
            Token::Minus => Some(Infix::Binary(BinaryExprOp::Minus)),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, Diagnostic> {
        self.parse_level(Self::parse_unary_expr, |t| match t {
            Token::Mul => Some(Infix::Assoc(AssocExprOp::Mul)),
            Token::Div => Some(Infix::Binary(BinaryExprOp::Div)),
            Token::Mod => Some(Infix::Binary(BinaryExprOp::Mod)),
            _ => None,
        })
    }

    /// Left-to-right operators of one precedence level. Consecutive uses of
    /// the same associative operator extend a single n-ary node; a
    /// parenthesized operand is never extended.
    fn parse_level(
        &mut self,
        operand: fn(&mut Self) -> Result<Expr, Diagnostic>,
        infix: fn(&Token) -> Option<Infix>,
    ) -> Result<Expr, Diagnostic> {
        let mut left = operand(self)?;
        let mut open_chain: Option<AssocExprOp> = None;
        while let Some(op) = infix(self.peek()) {
            self.advance();
            let right = operand(self)?;
            match op {
                Infix::Assoc(op) => {
                    if open_chain == Some(op) {
                        if let Expr::Associative { children, .. } = &mut left {
                            children.push(right);
                            continue;
                        }
                    }
                    left = Expr::Associative {
                        op,
                        children: vec![left, right],
                    };
                    open_chain = Some(op);
                }
                Infix::Binary(op) => {
                    left = Expr::binary(op, left, right);
                    open_chain = None;
                }
            }
        }
        Ok(left)
    }

    fn parse_unary_expr(&mut self) -> Result<Expr, Diagnostic> {
        if self.peek() == &Token::Minus {
            self.advance();
            let child = self.parse_unary_expr()?;
            return Ok(Expr::unary(UnaryExprOp::Neg, child));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expr, Diagnostic> {
        let mut e = self.parse_primary()?;
        while self.peek() == &Token::LParen {
            self.advance();
            let arg = self.parse_expr()?;
            self.expect(Token::RParen, "')' after function argument")?;
            e = Expr::Apply {
                func: Box::new(e),
                arg: Box::new(arg),
            };
        }
        Ok(e)
    }

    fn parse_primary(&mut self) -> Result<Expr, Diagnostic> {
        let tok = self.peek().clone();
        let simple = match &tok {
            Token::Ident(name) => Some(Expr::Ident(name.clone())),
            Token::Int(n) => Some(Expr::Int(*n)),
            Token::True => Some(Expr::Bool(true)),
            Token::False => Some(Expr::Bool(false)),
            Token::Integer => Some(Expr::Builtin(BuiltinSet::Integer)),
            Token::Natural => Some(Expr::Builtin(BuiltinSet::Natural)),
            Token::Natural1 => Some(Expr::Builtin(BuiltinSet::Natural1)),
            Token::BoolSet => Some(Expr::Builtin(BuiltinSet::Bool)),
            Token::EmptySet => Some(Expr::EmptySet),
            _ => None,
        };
        if let Some(e) = simple {
            self.advance();
            return Ok(e);
        }

        let function = match tok {
            Token::Pow => Some(UnaryExprOp::Pow),
            Token::Card => Some(UnaryExprOp::Card),
            Token::Dom => Some(UnaryExprOp::Dom),
            Token::Ran => Some(UnaryExprOp::Ran),
            Token::Min => Some(UnaryExprOp::Min),
            Token::Max => Some(UnaryExprOp::Max),
            _ => None,
        };
        if let Some(op) = function {
            self.advance();
            self.expect(Token::LParen, "'('")?;
            let child = self.parse_expr()?;
            self.expect(Token::RParen, "')'")?;
            return Ok(Expr::unary(op, child));
        }

        match tok {
            Token::LBrace => {
                self.advance();
                if self.peek() == &Token::RBrace {
                    self.advance();
                    return Ok(Expr::EmptySet);
                }
                let mut members = vec![self.parse_expr()?];
                while self.peek() == &Token::Comma {
                    self.advance();
                    members.push(self.parse_expr()?);
                }
                self.expect(Token::RBrace, "'}' or ','")?;
                Ok(Expr::SetExtension(members))
            }
            Token::LParen => {
                self.advance();
                let e = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(e)
            }
            other => Err(self.err(format!("expected expression, got {}", describe(&other)))),
        }
    }
}
