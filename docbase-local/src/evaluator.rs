//! Filter expression evaluation against decoded documents.
//!
//! The evaluator walks an expression tree once per candidate document and
//! answers whether the document matches. It never mutates its inputs and may
//! be invoked concurrently from any number of scans.
//!
//! Comparison is directed by the literal's kind: boolean and string literals
//! support equality operators only, numeric literals support the full
//! ordering set with the document value coerced to the literal's numeric
//! kind. A missing field never matches, whatever the operator — including
//! not-equal.

use std::cmp::Ordering;

use serde_json::Value;

use docbase_core::{
    error::{DocumentStoreError, DocumentStoreResult},
    query::{CmpOp, Expr, Literal, QueryVisitor},
};

/// Evaluates filter expressions against one decoded document.
pub struct DocumentEvaluator<'a> {
    document: &'a Value,
}

impl<'a> DocumentEvaluator<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self { document }
    }

    pub fn evaluate(&mut self, expr: &Expr) -> DocumentStoreResult<bool> {
        self.visit_expr(expr)
    }
}

/// Returns whether the document matches the expression.
///
/// Evaluation failures fold into a non-match, so a malformed document is
/// simply filtered out rather than failing the scan.
pub fn matches(document: &Value, expr: &Expr) -> bool {
    DocumentEvaluator::new(document)
        .evaluate(expr)
        .unwrap_or(false)
}

impl<'a> QueryVisitor for DocumentEvaluator<'a> {
    type Output = bool;
    type Error = DocumentStoreError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if !self.visit_expr(expr)? {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        for expr in exprs {
            if self.visit_expr(expr)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn visit_cmp(
        &mut self,
        field: &str,
        op: &CmpOp,
        value: &Literal,
    ) -> Result<Self::Output, Self::Error> {
        match self.document.as_object().and_then(|doc| doc.get(field)) {
            Some(field_value) => Ok(compare(field_value, op, value)),
            None => Ok(false),
        }
    }
}

/// Compares a present field value against a literal, directed by the
/// literal's kind. Any kind mismatch or unsupported operator is `false`.
fn compare(field_value: &Value, op: &CmpOp, literal: &Literal) -> bool {
    match literal {
        Literal::Bool(expected) => match field_value.as_bool() {
            Some(actual) => match op {
                CmpOp::Eq => actual == *expected,
                CmpOp::Ne => actual != *expected,
                _ => false,
            },
            None => false,
        },
        Literal::Int(expected) => match field_value.as_f64() {
            Some(actual) => ordered(&(actual as i64).cmp(expected), op),
            None => false,
        },
        Literal::Float(expected) => match field_value.as_f64() {
            Some(actual) => match actual.partial_cmp(expected) {
                Some(ordering) => ordered(&ordering, op),
                None => false,
            },
            None => false,
        },
        Literal::Str(expected) => match field_value.as_str() {
            Some(actual) => match op {
                CmpOp::Eq => actual == expected,
                CmpOp::Ne => actual != expected,
                _ => false,
            },
            None => false,
        },
    }
}

fn ordered(ordering: &Ordering, op: &CmpOp) -> bool {
    match op {
        CmpOp::Eq => *ordering == Ordering::Equal,
        CmpOp::Ne => *ordering != Ordering::Equal,
        CmpOp::Gt => *ordering == Ordering::Greater,
        CmpOp::Gte => *ordering != Ordering::Less,
        CmpOp::Lt => *ordering == Ordering::Less,
        CmpOp::Lte => *ordering != Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbase_core::query::Filter;
    use serde_json::json;

    fn movie() -> Value {
        json!({
            "_id": "movie_1",
            "title": "Blade Runner",
            "year": 1982,
            "score": 8.1,
            "oscars": false,
        })
    }

    #[test]
    fn missing_field_never_matches_any_operator() {
        let doc = movie();

        assert!(!matches(&doc, &Filter::eq("genre", "scifi")));
        assert!(!matches(&doc, &Filter::ne("genre", "scifi")));
        assert!(!matches(&doc, &Filter::gt("runtime", 90)));
        assert!(!matches(&doc, &Filter::lte("runtime", 90)));
    }

    #[test]
    fn boolean_literals_support_equality_only() {
        let doc = movie();

        assert!(matches(&doc, &Filter::eq("oscars", false)));
        assert!(matches(&doc, &Filter::ne("oscars", true)));
        assert!(!matches(&doc, &Filter::gt("oscars", true)));
        assert!(!matches(&doc, &Filter::lt("oscars", true)));
    }

    #[test]
    fn integer_literals_order_the_field_value() {
        let doc = movie();

        assert!(matches(&doc, &Filter::eq("year", 1982)));
        assert!(matches(&doc, &Filter::gt("year", 1980)));
        assert!(matches(&doc, &Filter::gte("year", 1982)));
        assert!(matches(&doc, &Filter::lt("year", 1990)));
        assert!(matches(&doc, &Filter::lte("year", 1982)));
        assert!(!matches(&doc, &Filter::ne("year", 1982)));
    }

    #[test]
    fn float_literals_compare_as_doubles() {
        let doc = movie();

        assert!(matches(&doc, &Filter::eq("score", 8.1)));
        assert!(matches(&doc, &Filter::gt("score", 8.0)));
        assert!(!matches(&doc, &Filter::lt("score", 8.0)));
    }

    #[test]
    fn string_literals_support_ordinal_equality_only() {
        let doc = movie();

        assert!(matches(&doc, &Filter::eq("title", "Blade Runner")));
        assert!(matches(&doc, &Filter::ne("title", "The Matrix")));
        assert!(!matches(&doc, &Filter::gt("title", "A")));
    }

    #[test]
    fn mismatched_kinds_never_match() {
        let doc = movie();

        assert!(!matches(&doc, &Filter::eq("title", 5)));
        assert!(!matches(&doc, &Filter::eq("year", "1982")));
        assert!(!matches(&doc, &Filter::eq("oscars", "false")));
    }

    #[test]
    fn empty_and_matches_while_empty_or_does_not() {
        let doc = movie();

        assert!(matches(&doc, &Filter::and(Vec::new())));
        assert!(!matches(&doc, &Filter::or(Vec::new())));
    }

    #[test]
    fn logical_nodes_combine_children() {
        let doc = movie();

        assert!(matches(
            &doc,
            &Filter::eq("oscars", false).and(Filter::gt("year", 1980)),
        ));
        assert!(!matches(
            &doc,
            &Filter::eq("oscars", true).and(Filter::gt("year", 1980)),
        ));
        assert!(matches(
            &doc,
            &Filter::eq("year", 1982).or(Filter::eq("year", 1998)),
        ));
    }

    #[test]
    fn non_object_documents_never_match() {
        let doc = json!([1, 2, 3]);

        assert!(!matches(&doc, &Filter::eq("year", 1982)));
    }
}
