//! Filter expression construction for document queries.
//!
//! This module provides the filter-expression model consumed by backend query
//! evaluators, along with a visitor pattern for walking expression trees.
//!
//! # Filter Expression API
//!
//! The [`Filter`] struct provides static methods for building filter expressions:
//!
//! - Comparison: `eq`, `ne`, `gt`, `gte`, `lt`, `lte`
//! - Logical: `and`, `or`
//!
//! Expressions can be combined using chainable methods for more complex queries:
//!
//! ```ignore
//! use docbase_core::query::Filter;
//!
//! let expr = Filter::eq("oscars", true)
//!     .and(Filter::gte("year", 1980));
//! ```
//!
//! Literal values are a closed set of scalar kinds ([`Literal`]); an expression
//! can never appear in value position, so malformed nested-literal trees are
//! unrepresentable by construction.

use crate::error::DocumentStoreError;

/// A scalar literal on the right-hand side of a comparison.
///
/// The literal's kind directs how the document field is compared:
/// booleans and strings support equality only, numeric literals support the
/// full ordering operators with the document value coerced to the literal's
/// numeric kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Boolean literal (equality operators only).
    Bool(bool),
    /// Integer literal (document values compare as `i64`).
    Int(i64),
    /// Floating-point literal (document values compare as `f64`).
    Float(f64),
    /// String literal (ordinal equality operators only).
    Str(String),
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value as i64)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f32> for Literal {
    fn from(value: f32) -> Self {
        Literal::Float(value as f64)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

/// Field comparison operators for filter expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CmpOp {
    /// Equal to (exact match).
    Eq,
    /// Not equal to.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Lte,
}

/// A filter expression for querying documents.
///
/// Expressions are immutable trees of comparisons combined with logical
/// `And`/`Or` nodes. They are built by the caller and consumed read-only
/// by a backend's evaluator.
///
/// # Example
///
/// ```ignore
/// use docbase_core::query::Filter;
///
/// // Simple equality check
/// let expr1 = Filter::eq("status", "active");
///
/// // Complex nested expression
/// let expr2 = Filter::and(vec![
///     Filter::eq("status", "active"),
///     Filter::gt("age", 18),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Logical AND of multiple expressions (all must match; empty list matches).
    And(Vec<Expr>),
    /// Logical OR of multiple expressions (any must match; empty list never matches).
    Or(Vec<Expr>),
    /// Field comparison expression.
    Cmp {
        /// The field name to compare.
        field: String,
        /// The comparison operator.
        op: CmpOp,
        /// The literal value to compare against.
        value: Literal,
    },
}

impl Expr {
    /// Creates a field comparison expression.
    pub fn cmp(field: String, op: CmpOp, value: Literal) -> Self {
        Expr::Cmp { field, op, value }
    }

    /// Combines this expression with another using logical AND.
    ///
    /// If this expression is already an AND, the other expression is appended
    /// to the list. Otherwise, a new AND expression is created.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::And(mut list) => {
                list.push(other);
                Expr::And(list)
            }
            _ => Expr::And(vec![self, other]),
        }
    }

    /// Combines this expression with another using logical OR.
    ///
    /// If this expression is already an OR, the other expression is appended
    /// to the list. Otherwise, a new OR expression is created.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Or(mut list) => {
                list.push(other);
                Expr::Or(list)
            }
            _ => Expr::Or(vec![self, other]),
        }
    }
}

/// Helper struct for constructing filter expressions.
///
/// Provides static methods to construct common filter expressions in a type-safe
/// manner. All methods accept field names as `Into<String>` and values as
/// `Into<Literal>` for ergonomics.
pub struct Filter;

impl Filter {
    /// Creates an equality filter expression.
    pub fn eq(field: impl Into<String>, value: impl Into<Literal>) -> Expr {
        Expr::cmp(field.into(), CmpOp::Eq, value.into())
    }

    /// Creates a not-equal filter expression.
    pub fn ne(field: impl Into<String>, value: impl Into<Literal>) -> Expr {
        Expr::cmp(field.into(), CmpOp::Ne, value.into())
    }

    /// Creates a greater-than filter expression.
    pub fn gt(field: impl Into<String>, value: impl Into<Literal>) -> Expr {
        Expr::cmp(field.into(), CmpOp::Gt, value.into())
    }

    /// Creates a greater-than-or-equal filter expression.
    pub fn gte(field: impl Into<String>, value: impl Into<Literal>) -> Expr {
        Expr::cmp(field.into(), CmpOp::Gte, value.into())
    }

    /// Creates a less-than filter expression.
    pub fn lt(field: impl Into<String>, value: impl Into<Literal>) -> Expr {
        Expr::cmp(field.into(), CmpOp::Lt, value.into())
    }

    /// Creates a less-than-or-equal filter expression.
    pub fn lte(field: impl Into<String>, value: impl Into<Literal>) -> Expr {
        Expr::cmp(field.into(), CmpOp::Lte, value.into())
    }

    /// Creates a logical AND filter expression.
    ///
    /// Combines multiple expressions such that all must match for a document
    /// to be included. An empty list matches every document.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(exprs.into_iter().collect())
    }

    /// Creates a logical OR filter expression.
    ///
    /// Combines multiple expressions such that any can match for a document
    /// to be included. An empty list matches no document.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(exprs.into_iter().collect())
    }
}

/// A field projection accepted by `select`.
///
/// Carried through the query interface for compatibility; the local backend
/// returns full documents regardless of the projection's content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(pub Vec<String>);

impl Fields {
    /// An empty projection (no field restriction requested).
    pub fn none() -> Self {
        Fields(Vec::new())
    }
}

impl<S: Into<String>> FromIterator<S> for Fields {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Fields(iter.into_iter().map(Into::into).collect())
    }
}

/// Visitor for walking a filter expression tree.
///
/// Backends implement this trait to evaluate or translate expressions;
/// [`QueryVisitor::visit_expr`] provides the dispatch over the tree shape.
pub trait QueryVisitor {
    type Output;
    type Error: Into<DocumentStoreError>;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error>;
    fn visit_cmp(
        &mut self,
        field: &str,
        op: &CmpOp,
        value: &Literal,
    ) -> Result<Self::Output, Self::Error>;

    fn visit_expr(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        match expr {
            Expr::And(exprs) => self.visit_and(exprs),
            Expr::Or(exprs) => self.visit_or(exprs),
            Expr::Cmp { field, op, value } => self.visit_cmp(field, op, value),
        }
    }
}
