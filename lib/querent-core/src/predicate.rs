//! Structured predicates.
//!
//! Callers describe a request as a conjunction of `field == value` terms:
//!
//! ```
//! use querent_core::Predicate;
//!
//! let predicate = Predicate::eq("ID", "123").and(Predicate::eq("Status", "expired"));
//! assert_eq!(predicate.terms().expect("conjunction").len(), 2);
//! ```
//!
//! Other shapes can be expressed so that callers get a precise error
//! instead of a silently dropped term.

use derive_more::Display;

use crate::{Error, FieldValue, Result};

/// Comparison operator of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Comparison {
    /// `==`
    #[display("==")]
    Eq,
    /// `!=`
    #[display("!=")]
    NotEq,
    /// `<`
    #[display("<")]
    Lt,
    /// `>`
    #[display(">")]
    Gt,
}

/// A predicate tree over typed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Single comparison term.
    Compare {
        /// Canonical field name.
        field: String,
        /// Operator.
        op: Comparison,
        /// Right-hand side.
        value: FieldValue,
    },
    /// All sub-predicates hold.
    And(Vec<Predicate>),
    /// Any sub-predicate holds.
    Or(Vec<Predicate>),
    /// Negation.
    Not(Box<Predicate>),
}

impl Predicate {
    /// `field == value`
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::compare(field, Comparison::Eq, value)
    }

    /// `field <op> value`
    #[must_use]
    pub fn compare(
        field: impl Into<String>,
        op: Comparison,
        value: impl Into<FieldValue>,
    ) -> Self {
        Self::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Conjunction of all given predicates.
    #[must_use]
    pub fn all(predicates: impl IntoIterator<Item = Self>) -> Self {
        Self::And(predicates.into_iter().collect())
    }

    /// `self && other`, keeping the conjunction flat.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut terms = match self {
            Self::And(terms) => terms,
            single => vec![single],
        };
        match other {
            Self::And(more) => terms.extend(more),
            single => terms.push(single),
        }
        Self::And(terms)
    }

    /// `self || other`
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::Or(vec![self, other])
    }

    /// `!self`
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Flatten the conjunction into `(field, value)` equality terms, in
    /// expression order.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedPredicate`] for disjunctions, negations and any
    /// operator other than equality.
    pub fn terms(&self) -> Result<Vec<(&str, &FieldValue)>> {
        let mut terms = Vec::new();
        self.collect_terms(&mut terms)?;
        Ok(terms)
    }

    fn collect_terms<'a>(&'a self, terms: &mut Vec<(&'a str, &'a FieldValue)>) -> Result<()> {
        match self {
            Self::Compare {
                field,
                op: Comparison::Eq,
                value,
            } => {
                terms.push((field.as_str(), value));
                Ok(())
            }
            Self::Compare { field, op, .. } => Err(Error::malformed(format!(
                "unsupported comparison '{field} {op} ..', only equality is allowed"
            ))),
            Self::And(predicates) => predicates
                .iter()
                .try_for_each(|predicate| predicate.collect_terms(terms)),
            Self::Or(_) => Err(Error::malformed("disjunction is not supported")),
            Self::Not(_) => Err(Error::malformed("negation is not supported")),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[test]
    fn and_keeps_conjunction_flat() {
        let predicate = Predicate::eq("A", "1")
            .and(Predicate::eq("B", "2"))
            .and(Predicate::eq("C", "3").and(Predicate::eq("D", "4")));

        let_assert!(Predicate::And(terms) = &predicate);
        check!(terms.len() == 4);
    }

    #[test]
    fn terms_follow_expression_order() {
        let predicate = Predicate::all([Predicate::eq("B", "2"), Predicate::eq("A", "1")]);
        let terms = predicate.terms().expect("terms");
        let names: Vec<_> = terms.iter().map(|(name, _)| *name).collect();
        check!(names == ["B", "A"]);
    }

    #[test]
    fn single_comparison_is_a_conjunction_of_one() {
        let predicate = Predicate::eq("ID", "123");
        let terms = predicate.terms().expect("terms");
        check!(terms == [("ID", &FieldValue::text("123"))]);
    }

    #[test]
    fn disjunction_is_malformed() {
        let predicate = Predicate::eq("A", "1").or(Predicate::eq("B", "2"));
        let_assert!(Err(Error::MalformedPredicate(message)) = predicate.terms());
        check!(message.contains("disjunction"));
    }

    #[test]
    fn nested_negation_is_malformed() {
        let predicate = Predicate::eq("A", "1").and(Predicate::eq("B", "2").negate());
        let_assert!(Err(Error::MalformedPredicate(message)) = predicate.terms());
        check!(message.contains("negation"));
    }

    #[test]
    fn non_equality_is_malformed() {
        let predicate = Predicate::compare("Count", Comparison::Gt, "3");
        let_assert!(Err(Error::MalformedPredicate(message)) = predicate.terms());
        check!(message.contains("Count >"));
    }
}
