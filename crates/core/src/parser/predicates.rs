use super::{describe, Parser};
use crate::ast::{AssocPredOp, BinaryPredOp, BoundDecl, Predicate, Quantifier, RelOp};
use crate::error::Diagnostic;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    // -- Connectives ---------------------------------------------

    pub(super) fn parse_predicate(&mut self) -> Result<Predicate, Diagnostic> {
        if matches!(self.peek(), Token::Forall | Token::Exists) {
            return self.parse_quantified();
        }
        self.parse_equiv()
    }

    fn parse_quantified(&mut self) -> Result<Predicate, Diagnostic> {
        let quantifier = match self.advance().token {
            Token::Forall => Quantifier::Forall,
            _ => Quantifier::Exists,
        };
        let mut decls = vec![BoundDecl::untyped(self.take_ident()?)];
        while self.peek() == &Token::Comma {
            self.advance();
            decls.push(BoundDecl::untyped(self.take_ident()?));
        }
        self.expect(Token::Dot, "'\u{b7}' after bound identifiers")?;
        let body = self.parse_predicate()?;
        Ok(Predicate::Quantified {
            quantifier,
            decls,
            body: Box::new(body),
        })
    }

    fn parse_equiv(&mut self) -> Result<Predicate, Diagnostic> {
        let mut left = self.parse_implies()?;
        while self.peek() == &Token::Equiv {
            self.advance();
            let right = self.parse_implies()?;
            left = Predicate::Binary {
                op: BinaryPredOp::Equiv,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_implies(&mut self) -> Result<Predicate, Diagnostic> {
        let left = self.parse_or()?;
        if self.peek() == &Token::Implies {
            self.advance();
            let right = self.parse_implies()?;
            return Ok(Predicate::implies(left, right));
        }
        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Predicate, Diagnostic> {
        let first = self.parse_and()?;
        self.parse_chain(first, Token::Or, AssocPredOp::Or, Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Predicate, Diagnostic> {
        let first = self.parse_unary()?;
        self.parse_chain(first, Token::And, AssocPredOp::And, Self::parse_unary)
    }

    fn parse_chain(
        &mut self,
        first: Predicate,
        separator: Token,
        op: AssocPredOp,
        operand: fn(&mut Self) -> Result<Predicate, Diagnostic>,
    ) -> Result<Predicate, Diagnostic> {
        if self.peek() != &separator {
            return Ok(first);
        }
        let mut children = vec![first];
        while self.peek() == &separator {
            self.advance();
            children.push(operand(self)?);
        }
        Ok(Predicate::Associative { op, children })
    }

    fn parse_unary(&mut self) -> Result<Predicate, Diagnostic> {
        match self.peek() {
            Token::Not => {
                self.advance();
                let child = self.parse_unary()?;
                Ok(Predicate::not(child))
            }
            Token::Forall | Token::Exists => self.parse_quantified(),
            _ => self.parse_atom_predicate(),
        }
    }

    // -- Atoms ---------------------------------------------------

    fn parse_atom_predicate(&mut self) -> Result<Predicate, Diagnostic> {
        match self.peek() {
            Token::BTrue => {
                self.advance();
                Ok(Predicate::Literal(true))
            }
            Token::BFalse => {
                self.advance();
                Ok(Predicate::Literal(false))
            }
            Token::Finite => {
                self.advance();
                self.expect(Token::LParen, "'(' after finite")?;
                let e = self.parse_expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(Predicate::Finite(e))
            }
            Token::LParen => {
                // A parenthesis either groups a predicate or opens the left
                // operand of a relation: try the predicate first.
                let start = self.pos;
                self.advance();
                let grouped = match self.parse_predicate() {
                    Ok(p) if self.peek() == &Token::RParen => {
                        self.advance();
                        return Ok(p);
                    }
                    Ok(_) => self.err(format!("expected ')', got {}", describe(self.peek()))),
                    Err(e) => e,
                };
                self.pos = start;
                self.parse_relation().map_err(|e| {
                    if grouped.offset > e.offset {
                        grouped
                    } else {
                        e
                    }
                })
            }
            _ => self.parse_relation(),
        }
    }

    fn parse_relation(&mut self) -> Result<Predicate, Diagnostic> {
        let left = self.parse_expr()?;
        let op = match self.peek() {
            Token::Eq => RelOp::Equal,
            Token::Neq => RelOp::NotEqual,
            Token::Lt => RelOp::Lt,
            Token::Le => RelOp::Le,
            Token::Gt => RelOp::Gt,
            Token::Ge => RelOp::Ge,
            Token::In => RelOp::In,
            Token::NotIn => RelOp::NotIn,
            Token::Subset => RelOp::Subset,
            Token::NotSubset => RelOp::NotSubset,
            Token::SubsetEq => RelOp::SubsetEq,
            Token::NotSubsetEq => RelOp::NotSubsetEq,
            other => {
                return Err(self.err(format!(
                    "expected relational operator, got {}",
                    describe(other)
                )))
            }
        };
        self.advance();
        let right = self.parse_expr()?;
        Ok(Predicate::Relational { op, left, right })
    }
}
