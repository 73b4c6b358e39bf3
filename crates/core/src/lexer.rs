//! Tokenizer for Event-B formulas.
//!
//! Both the Unicode mathematical symbols and their ASCII spellings are
//! accepted. ASCII operators are matched longest first, so `<=>` wins over
//! `<=` and `/<<:` over `/<:`.

use crate::error::Diagnostic;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Int(i64),
    // Logical connectives
    And,
    Or,
    Implies,
    Equiv,
    Not,
    Forall,
    Exists,
    Dot,
    BTrue,
    BFalse,
    // Relations
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
    Subset,
    NotSubset,
    SubsetEq,
    NotSubsetEq,
    // Expression operators
    Union,
    Inter,
    SetMinus,
    Cprod,
    PartialFun,
    TotalFun,
    Maplet,
    UpTo,
    Plus,
    Minus,
    Mul,
    Div,
    Mod,
    // Built-in sets and constants
    Pow,
    Integer,
    Natural,
    Natural1,
    BoolSet,
    True,
    False,
    EmptySet,
    // Function-style operators
    Card,
    Dom,
    Ran,
    Min,
    Max,
    Finite,
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Comma,
    // End of input
    Eof,
}

#[derive(Debug, Clone)]
pub struct Spanned {
    pub token: Token,
    /// Character offset of the first character of the token.
    pub offset: usize,
}

/// ASCII operator spellings, longest first.
const ASCII_OPERATORS: &[(&str, Token)] = &[
    ("/<<:", Token::NotSubset),
    ("<<:", Token::Subset),
    ("/<:", Token::NotSubsetEq),
    ("<=>", Token::Equiv),
    ("+->", Token::PartialFun),
    ("-->", Token::TotalFun),
    ("|->", Token::Maplet),
    ("<=", Token::Le),
    (">=", Token::Ge),
    ("/=", Token::Neq),
    ("/:", Token::NotIn),
    ("<:", Token::SubsetEq),
    ("=>", Token::Implies),
    ("\\/", Token::Union),
    ("/\\", Token::Inter),
    ("**", Token::Cprod),
    ("..", Token::UpTo),
    ("=", Token::Eq),
    ("<", Token::Lt),
    (">", Token::Gt),
    (":", Token::In),
    ("&", Token::And),
    ("!", Token::Forall),
    ("#", Token::Exists),
    (".", Token::Dot),
    ("+", Token::Plus),
    ("-", Token::Minus),
    ("*", Token::Mul),
    ("/", Token::Div),
    ("\\", Token::SetMinus),
    ("(", Token::LParen),
    (")", Token::RParen),
    ("{", Token::LBrace),
    ("}", Token::RBrace),
    (",", Token::Comma),
];

fn unicode_operator(c: char) -> Option<Token> {
    let tok = match c {
        '\u{2227}' => Token::And,
        '\u{2228}' => Token::Or,
        '\u{21d2}' => Token::Implies,
        '\u{21d4}' => Token::Equiv,
        '\u{ac}' => Token::Not,
        '\u{2200}' => Token::Forall,
        '\u{2203}' => Token::Exists,
        '\u{b7}' => Token::Dot,
        '\u{22a4}' => Token::BTrue,
        '\u{22a5}' => Token::BFalse,
        '\u{2260}' => Token::Neq,
        '\u{2264}' => Token::Le,
        '\u{2265}' => Token::Ge,
        '\u{2208}' => Token::In,
        '\u{2209}' => Token::NotIn,
        '\u{2282}' => Token::Subset,
        '\u{2284}' => Token::NotSubset,
        '\u{2286}' => Token::SubsetEq,
        '\u{2288}' => Token::NotSubsetEq,
        '\u{222a}' => Token::Union,
        '\u{2229}' => Token::Inter,
        '\u{2216}' => Token::SetMinus,
        '\u{d7}' => Token::Cprod,
        '\u{21f8}' => Token::PartialFun,
        '\u{2192}' => Token::TotalFun,
        '\u{21a6}' => Token::Maplet,
        '\u{2025}' => Token::UpTo,
        '\u{2212}' => Token::Minus,
        '\u{2217}' => Token::Mul,
        '\u{f7}' => Token::Div,
        '\u{2119}' => Token::Pow,
        '\u{2124}' => Token::Integer,
        '\u{2205}' => Token::EmptySet,
        _ => return None,
    };
    Some(tok)
}

fn keyword(word: &str) -> Option<Token> {
    let tok = match word {
        "or" => Token::Or,
        "not" => Token::Not,
        "mod" => Token::Mod,
        "true" => Token::BTrue,
        "false" => Token::BFalse,
        "TRUE" => Token::True,
        "FALSE" => Token::False,
        "POW" => Token::Pow,
        "INT" => Token::Integer,
        "NAT" => Token::Natural,
        "NAT1" => Token::Natural1,
        "BOOL" => Token::BoolSet,
        "card" => Token::Card,
        "dom" => Token::Dom,
        "ran" => Token::Ran,
        "min" => Token::Min,
        "max" => Token::Max,
        "finite" => Token::Finite,
        _ => return None,
    };
    Some(tok)
}

pub fn lex(src: &str) -> Result<Vec<Spanned>, Diagnostic> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;

    'outer: while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;

        // Integer literal
        if c.is_ascii_digit() {
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            let s: String = chars[start..pos].iter().collect();
            let n: i64 = s
                .parse()
                .map_err(|_| Diagnostic::new(start, format!("integer literal '{}' out of range", s)))?;
            tokens.push(Spanned {
                token: Token::Int(n),
                offset: start,
            });
            continue;
        }

        // ℕ and ℕ1
        if c == '\u{2115}' {
            pos += 1;
            let token = if pos < chars.len() && chars[pos] == '1' {
                pos += 1;
                Token::Natural1
            } else {
                Token::Natural
            };
            tokens.push(Spanned {
                token,
                offset: start,
            });
            continue;
        }

        if let Some(token) = unicode_operator(c) {
            tokens.push(Spanned {
                token,
                offset: start,
            });
            pos += 1;
            continue;
        }

        // Identifier / keyword
        if c.is_alphabetic() || c == '_' {
            while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            let token = keyword(&word).unwrap_or(Token::Ident(word));
            tokens.push(Spanned {
                token,
                offset: start,
            });
            continue;
        }

        for (spelling, token) in ASCII_OPERATORS {
            let len = spelling.chars().count();
            if pos + len <= chars.len() && spelling.chars().eq(chars[pos..pos + len].iter().copied())
            {
                tokens.push(Spanned {
                    token: token.clone(),
                    offset: start,
                });
                pos += len;
                continue 'outer;
            }
        }

        return Err(Diagnostic::new(
            start,
            format!("unexpected character '{}'", c),
        ));
    }

    tokens.push(Spanned {
        token: Token::Eof,
        offset: chars.len(),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        lex(src)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .filter(|t| *t != Token::Eof)
            .collect()
    }

    #[test]
    fn ascii_and_unicode_spellings_agree() {
        assert_eq!(
            kinds("a /= b & x /: S => c <= d"),
            kinds("a \u{2260} b \u{2227} x \u{2209} S \u{21d2} c \u{2264} d")
        );
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(
            kinds("p <=> q"),
            vec![
                Token::Ident("p".into()),
                Token::Equiv,
                Token::Ident("q".into())
            ]
        );
        assert_eq!(
            kinds("A /<<: B"),
            vec![
                Token::Ident("A".into()),
                Token::NotSubset,
                Token::Ident("B".into())
            ]
        );
        assert_eq!(
            kinds("f : A +-> B"),
            vec![
                Token::Ident("f".into()),
                Token::In,
                Token::Ident("A".into()),
                Token::PartialFun,
                Token::Ident("B".into())
            ]
        );
    }

    #[test]
    fn keywords_and_builtins() {
        assert_eq!(
            kinds("x mod 2 = 0 or not finite(NAT1)"),
            vec![
                Token::Ident("x".into()),
                Token::Mod,
                Token::Int(2),
                Token::Eq,
                Token::Int(0),
                Token::Or,
                Token::Not,
                Token::Finite,
                Token::LParen,
                Token::Natural1,
                Token::RParen,
            ]
        );
        assert_eq!(kinds("\u{2115}1 \u{2115}"), vec![Token::Natural1, Token::Natural]);
    }

    #[test]
    fn range_is_not_two_dots() {
        assert_eq!(
            kinds("1..n"),
            vec![Token::Int(1), Token::UpTo, Token::Ident("n".into())]
        );
    }

    #[test]
    fn offsets_are_character_positions() {
        let toks = lex("\u{2200}x\u{b7}x>0").unwrap();
        let offsets: Vec<usize> = toks.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn unexpected_character_reported_with_offset() {
        let err = lex("a = ?").unwrap_err();
        assert_eq!(err.offset, 4);
        assert!(err.message.contains("unexpected character"));
    }

    #[test]
    fn oversized_integer_rejected() {
        let err = lex("x = 99999999999999999999").unwrap_err();
        assert!(err.message.contains("out of range"));
    }
}
