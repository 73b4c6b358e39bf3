//! Event-B types and type environments.

use crate::ast::{BinaryExprOp, BuiltinSet, Expr, UnaryExprOp};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A resolved Event-B type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    /// ℤ
    Int,
    /// BOOL
    Bool,
    /// A carrier set declared by the model.
    Given(String),
    /// ℙ(T)
    Pow(Box<Type>),
    /// T × U
    Prod(Box<Type>, Box<Type>),
}

impl Type {
    pub fn pow(t: Type) -> Type {
        Type::Pow(Box::new(t))
    }

    pub fn prod(left: Type, right: Type) -> Type {
        Type::Prod(Box::new(left), Box::new(right))
    }

    /// The type expression denoting the set of all values of this type.
    pub fn to_expr(&self) -> Expr {
        match self {
            Type::Int => Expr::Builtin(BuiltinSet::Integer),
            Type::Bool => Expr::Builtin(BuiltinSet::Bool),
            Type::Given(name) => Expr::Ident(name.clone()),
            Type::Pow(t) => Expr::unary(UnaryExprOp::Pow, t.to_expr()),
            Type::Prod(l, r) => Expr::binary(BinaryExprOp::Cprod, l.to_expr(), r.to_expr()),
        }
    }

    /// Interpret a type expression such as `ℙ(ℤ × COLOR)`.
    ///
    /// `sets` holds the carrier set names. The function-space shorthands
    /// `A ⇸ B` and `A → B` denote `ℙ(A × B)`; `ℕ` and `ℕ1` have type `ℤ`.
    pub fn from_type_expr(expr: &Expr, sets: &BTreeSet<String>) -> Result<Type, String> {
        match expr {
            Expr::Builtin(BuiltinSet::Integer | BuiltinSet::Natural | BuiltinSet::Natural1) => {
                Ok(Type::Int)
            }
            Expr::Builtin(BuiltinSet::Bool) => Ok(Type::Bool),
            Expr::Ident(name) if sets.contains(name) => Ok(Type::Given(name.clone())),
            Expr::Ident(name) => Err(format!("'{}' is not a carrier set", name)),
            Expr::Unary {
                op: UnaryExprOp::Pow,
                child,
            } => Ok(Type::pow(Type::from_type_expr(child, sets)?)),
            Expr::Binary {
                op: BinaryExprOp::Cprod,
                left,
                right,
            } => Ok(Type::prod(
                Type::from_type_expr(left, sets)?,
                Type::from_type_expr(right, sets)?,
            )),
            Expr::Binary {
                op: BinaryExprOp::PartialFun | BinaryExprOp::TotalFun,
                left,
                right,
            } => Ok(Type::pow(Type::prod(
                Type::from_type_expr(left, sets)?,
                Type::from_type_expr(right, sets)?,
            ))),
            other => Err(format!("'{}' is not a type expression", other)),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_expr())
    }
}

/// Name-to-type map used to type-check formulas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeEnv {
    entries: BTreeMap<String, Type>,
    sets: BTreeSet<String>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a carrier set: the name denotes a set of type ℙ(name).
    pub fn add_set(&mut self, name: &str) {
        self.sets.insert(name.to_owned());
        self.entries
            .insert(name.to_owned(), Type::pow(Type::Given(name.to_owned())));
    }

    /// Bind `name` to `ty`, replacing any previous binding.
    pub fn insert(&mut self, name: &str, ty: Type) -> Option<Type> {
        self.entries.insert(name.to_owned(), ty)
    }

    pub fn get(&self, name: &str) -> Option<&Type> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn sets(&self) -> &BTreeSet<String> {
        &self.sets
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_set_is_powerset_of_itself() {
        let mut env = TypeEnv::new();
        env.add_set("COLOR");
        assert_eq!(
            env.get("COLOR"),
            Some(&Type::pow(Type::Given("COLOR".into())))
        );
        assert!(env.sets().contains("COLOR"));
    }

    #[test]
    fn function_space_is_relation_type() {
        let sets = BTreeSet::new();
        let expr = Expr::binary(
            BinaryExprOp::PartialFun,
            Expr::Builtin(BuiltinSet::Integer),
            Expr::Builtin(BuiltinSet::Bool),
        );
        assert_eq!(
            Type::from_type_expr(&expr, &sets),
            Ok(Type::pow(Type::prod(Type::Int, Type::Bool)))
        );
    }

    #[test]
    fn natural_sets_have_integer_type() {
        let sets: BTreeSet<String> = ["COLOR".to_string()].into_iter().collect();
        for set in [BuiltinSet::Natural, BuiltinSet::Natural1] {
            let expr = Expr::binary(BinaryExprOp::PartialFun, Expr::Builtin(set), Expr::ident("COLOR"));
            assert_eq!(
                Type::from_type_expr(&expr, &sets),
                Ok(Type::pow(Type::prod(Type::Int, Type::Given("COLOR".into()))))
            );
        }
    }

    #[test]
    fn non_type_expression_rejected() {
        let sets = BTreeSet::new();
        let err = Type::from_type_expr(&Expr::Int(3), &sets).unwrap_err();
        assert!(err.contains("not a type expression"));
    }

    #[test]
    fn type_renders_as_type_expression() {
        let t = Type::pow(Type::prod(Type::Int, Type::Given("S".into())));
        assert_eq!(t.to_string(), "\u{2119}(\u{2124}\u{d7}S)");
    }
}
