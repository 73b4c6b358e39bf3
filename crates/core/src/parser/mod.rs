//! Recursive-descent parser for Event-B predicates and expressions.
//! No type checking is done here -- that is the type-checker's job.

use crate::ast::{Expr, Predicate};
use crate::error::Diagnostic;
use crate::lexer::{self, Spanned, Token};

mod expressions;
mod predicates;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned]) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn offset(&self) -> usize {
        self.cur().offset
    }

    fn advance(&mut self) -> &Spanned {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<(), Diagnostic> {
        if *self.peek() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected {}, got {}", what, describe(self.peek()))))
        }
    }

    fn take_ident(&mut self) -> Result<String, Diagnostic> {
        if let Token::Ident(name) = self.peek().clone() {
            self.advance();
            Ok(name)
        } else {
            Err(self.err(format!("expected identifier, got {}", describe(self.peek()))))
        }
    }

    fn err(&self, msg: impl Into<String>) -> Diagnostic {
        Diagnostic::new(self.offset(), msg)
    }

    fn expect_end(&mut self, what: &str) -> Result<(), Diagnostic> {
        if *self.peek() == Token::Eof {
            Ok(())
        } else {
            Err(self.err(format!(
                "unexpected {} after {}",
                describe(self.peek()),
                what
            )))
        }
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Eof => "end of formula".to_owned(),
        Token::Ident(name) => format!("identifier '{}'", name),
        Token::Int(n) => format!("integer {}", n),
        other => format!("{:?}", other),
    }
}

/// Parse a complete predicate.
pub fn parse_predicate(src: &str) -> Result<Predicate, Diagnostic> {
    let tokens = lexer::lex(src)?;
    let mut p = Parser::new(&tokens);
    let pred = p.parse_predicate()?;
    p.expect_end("predicate")?;
    Ok(pred)
}

/// Parse a complete expression (used for declared types).
pub fn parse_expression(src: &str) -> Result<Expr, Diagnostic> {
    let tokens = lexer::lex(src)?;
    let mut p = Parser::new(&tokens);
    let expr = p.parse_expr()?;
    p.expect_end("expression")?;
    Ok(expr)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn id(s: &str) -> Expr {
        Expr::ident(s)
    }

    fn rel(op: RelOp, l: Expr, r: Expr) -> Predicate {
        Predicate::relation(op, l, r)
    }

    #[test]
    fn worked_example_parses_into_implications() {
        let p = parse_predicate("((a=b) => (c/=a)) & ((a/=b) => (a=c))").unwrap();
        let expected = Predicate::Associative {
            op: AssocPredOp::And,
            children: vec![
                Predicate::implies(
                    rel(RelOp::Equal, id("a"), id("b")),
                    rel(RelOp::NotEqual, id("c"), id("a")),
                ),
                Predicate::implies(
                    rel(RelOp::NotEqual, id("a"), id("b")),
                    rel(RelOp::Equal, id("a"), id("c")),
                ),
            ],
        };
        assert_eq!(p, expected);
    }

    #[test]
    fn conjunction_chain_is_flat() {
        let p = parse_predicate("a=1 \u{2227} b=2 \u{2227} c=3").unwrap();
        match p {
            Predicate::Associative { op, children } => {
                assert_eq!(op, AssocPredOp::And);
                assert_eq!(children.len(), 3);
            }
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn parenthesized_conjunction_stays_nested() {
        let p = parse_predicate("(a=1 & b=2) & c=3").unwrap();
        match p {
            Predicate::Associative { children, .. } => {
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], Predicate::Associative { .. }));
            }
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn conjunction_binds_tighter_than_disjunction() {
        let p = parse_predicate("a=1 & b=2 or c=3").unwrap();
        assert_eq!(p.to_string(), "(a=1\u{2227}b=2)\u{2228}c=3");
    }

    #[test]
    fn implication_is_right_associative() {
        let p = parse_predicate("a=1 => b=2 => c=3").unwrap();
        match p {
            Predicate::Binary { op, right, .. } => {
                assert_eq!(op, BinaryPredOp::Implies);
                assert!(matches!(*right, Predicate::Binary { .. }));
            }
            other => panic!("expected implication, got {:?}", other),
        }
    }

    #[test]
    fn parenthesized_expression_on_left_of_relation() {
        let p = parse_predicate("(a + 1) * 2 = c").unwrap();
        assert_eq!(p.to_string(), "(a+1)\u{2217}2=c");
    }

    #[test]
    fn membership_in_set_extension_and_union() {
        let p = parse_predicate("x : {1, 2} \\/ S").unwrap();
        assert_eq!(
            p,
            rel(
                RelOp::In,
                id("x"),
                Expr::Associative {
                    op: AssocExprOp::Union,
                    children: vec![Expr::SetExtension(vec![Expr::Int(1), Expr::Int(2)]), id("S")],
                }
            )
        );
    }

    #[test]
    fn empty_braces_are_the_empty_set() {
        let p = parse_predicate("S = {}").unwrap();
        assert_eq!(p, rel(RelOp::Equal, id("S"), Expr::EmptySet));
    }

    #[test]
    fn quantifier_extends_to_the_right() {
        let p = parse_predicate("a=1 & !x.x:S => x>0").unwrap();
        match p {
            Predicate::Associative { children, .. } => {
                assert_eq!(children.len(), 2);
                match &children[1] {
                    Predicate::Quantified { decls, body, .. } => {
                        assert_eq!(decls, &vec![BoundDecl::untyped("x")]);
                        assert!(matches!(**body, Predicate::Binary { .. }));
                    }
                    other => panic!("expected quantifier, got {:?}", other),
                }
            }
            other => panic!("expected conjunction, got {:?}", other),
        }
    }

    #[test]
    fn function_application_and_operators() {
        let p = parse_predicate("f(x) + card(S) <= max(ran(f)) mod 3").unwrap();
        assert_eq!(
            p.to_string(),
            "f(x)+card(S)\u{2264}max(ran(f)) mod 3"
        );
    }

    #[test]
    fn rendering_reparses_to_same_tree() {
        for src in [
            "((a=b) => (c/=a)) & ((a/=b) => (a=c))",
            "not(x : S) or y /<: T & finite(T)",
            "a - (b - c) = a - b - c",
            "x |-> y : f & f : NAT +-> BOOL",
            "#y.y : 1..n & -y < 0",
            "S \\/ (T /\\ U) <<: POW(INT) ** BOOL",
        ] {
            let first = parse_predicate(src).unwrap();
            let second = parse_predicate(&first.to_string()).unwrap();
            assert_eq!(first, second, "round trip of {}", src);
        }
    }

    #[test]
    fn missing_operand_reports_offset() {
        let err = parse_predicate("a = ").unwrap_err();
        assert_eq!(err.offset, 4);
        assert!(err.message.contains("end of formula"), "{}", err.message);
    }

    #[test]
    fn trailing_tokens_rejected() {
        let err = parse_predicate("a = b c").unwrap_err();
        assert!(err.message.contains("after predicate"), "{}", err.message);
    }

    #[test]
    fn type_expression_parses() {
        let e = parse_expression("POW(INT ** COLOR)").unwrap();
        assert_eq!(e.to_string(), "\u{2119}(\u{2124}\u{d7}COLOR)");
    }
}
