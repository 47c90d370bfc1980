//! Declarative validation rules.
//!
//! Each operation kind gets one [`Rule`]: required fields, mutually exclusive
//! groups, and companion requirements. Checks always run in that order, so
//! the reported error is deterministic when several rules are broken.

use crate::{Error, ParameterSet, Result};

/// Fields of which at most one may be set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusiveGroup {
    /// Group name, reported on conflict.
    pub name: &'static str,
    /// Members of the group.
    pub fields: &'static [&'static str],
}

/// `field` is only valid when `requires` is also set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Companion {
    /// Dependent field.
    pub field: &'static str,
    /// Field it depends on.
    pub requires: &'static str,
}

/// Constraints of one operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
    required: Vec<&'static str>,
    exclusive: Vec<ExclusiveGroup>,
    companions: Vec<Companion>,
}

impl Rule {
    /// Rule without constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a field. Declaration order decides which missing field is reported.
    #[must_use]
    pub fn require(mut self, field: &'static str) -> Self {
        self.required.push(field);
        self
    }

    /// Declare a mutually exclusive group.
    #[must_use]
    pub fn exclusive(mut self, name: &'static str, fields: &'static [&'static str]) -> Self {
        self.exclusive.push(ExclusiveGroup { name, fields });
        self
    }

    /// Declare that `field` needs `requires`.
    #[must_use]
    pub fn companion(mut self, field: &'static str, requires: &'static str) -> Self {
        self.companions.push(Companion { field, requires });
        self
    }

    /// Required fields, in declared order.
    #[must_use]
    pub fn required(&self) -> &[&'static str] {
        &self.required
    }

    /// Check a parameter set against this rule.
    ///
    /// # Errors
    ///
    /// [`Error::MissingRequiredField`] or [`Error::ConflictingFields`].
    pub fn check(&self, params: &ParameterSet) -> Result<()> {
        if let Some(missing) = self.required.iter().find(|field| !params.contains(field)) {
            return Err(Error::missing_field(*missing));
        }

        for group in &self.exclusive {
            let present: Vec<String> = group
                .fields
                .iter()
                .filter(|field| params.contains(field))
                .map(ToString::to_string)
                .collect();
            if present.len() > 1 {
                return Err(Error::conflicting(group.name, present));
            }
        }

        if let Some(companion) = self
            .companions
            .iter()
            .find(|c| params.contains(c.field) && !params.contains(c.requires))
        {
            return Err(Error::missing_field(companion.requires));
        }

        Ok(())
    }
}

/// Rules keyed by operation kind.
///
/// Built once per family and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable<K> {
    entries: Vec<(K, Rule)>,
}

impl<K> Default for RuleTable<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + Eq + std::fmt::Debug> RuleTable<K> {
    /// Empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the rule of a kind.
    #[must_use]
    pub fn rule(mut self, kind: K, rule: Rule) -> Self {
        self.entries.retain(|(existing, _)| *existing != kind);
        self.entries.push((kind, rule));
        self
    }

    /// Rule of a kind.
    #[must_use]
    pub fn rule_for(&self, kind: K) -> Option<&Rule> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == kind)
            .map(|(_, rule)| rule)
    }

    /// Validate a parameter set for an operation kind.
    ///
    /// # Errors
    ///
    /// - [`Error::NullInput`] when `params` is `None`, before any lookup
    /// - [`Error::InvalidRequest`] when the table has no rule for `kind`
    /// - [`Error::MissingRequiredField`] / [`Error::ConflictingFields`] from [`Rule::check`]
    pub fn validate(&self, params: Option<ParameterSet>, kind: K) -> Result<ValidatedSet<K>> {
        let params = params.ok_or(Error::NullInput)?;
        let rule = self
            .rule_for(kind)
            .ok_or_else(|| Error::invalid_request(format!("no validation rule for {kind:?}")))?;
        rule.check(&params)?;
        Ok(ValidatedSet { kind, params })
    }
}

/// A parameter set that passed validation for `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSet<K> {
    kind: K,
    params: ParameterSet,
}

impl<K: Copy> ValidatedSet<K> {
    /// Operation kind it was validated for.
    #[must_use]
    pub const fn kind(&self) -> K {
        self.kind
    }

    /// Validated parameters.
    #[must_use]
    pub const fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Consume into parameters.
    #[must_use]
    pub fn into_params(self) -> ParameterSet {
        self.params
    }
}
