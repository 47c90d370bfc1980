//! Parameter extraction from predicates.

use std::collections::HashMap;

use crate::{
    DateStyle, EndpointFamily, Error, FieldDecl, FieldKind, FieldValue, ParameterSet, Predicate,
    Result, field, join_list,
};

/// Turns a predicate into a [`ParameterSet`] ordered by field declaration.
///
/// # Example
///
/// ```
/// use querent_core::{DateStyle, FieldDecl, FieldKind, ParameterExtractor, Predicate};
///
/// static FIELDS: &[FieldDecl] = &[
///     FieldDecl::query("Status", "status", FieldKind::List),
///     FieldDecl::path("ID", "id"),
/// ];
///
/// let predicate = Predicate::eq("ID", "7").and(Predicate::eq("Status", "a, b"));
/// let params = ParameterExtractor::new(FIELDS)
///     .extract(Some(&predicate))
///     .expect("extract");
///
/// assert_eq!(params.iter().collect::<Vec<_>>(), [("Status", "a,b"), ("ID", "7")]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParameterExtractor {
    fields: &'static [FieldDecl],
    date_style: DateStyle,
}

impl ParameterExtractor {
    /// Extractor over a field table, formatting dates for URLs.
    #[must_use]
    pub const fn new(fields: &'static [FieldDecl]) -> Self {
        Self {
            fields,
            date_style: DateStyle::Url,
        }
    }

    /// Extractor over the fields of an endpoint family.
    #[must_use]
    pub const fn for_family<F: EndpointFamily>() -> Self {
        Self::new(F::FIELDS)
    }

    /// Choose how dates are rendered.
    #[must_use]
    pub const fn with_date_style(mut self, date_style: DateStyle) -> Self {
        self.date_style = date_style;
        self
    }

    /// Extract the parameter set of a predicate.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedPredicate`] for an absent predicate, a non-conjunctive
    ///   shape, a field compared twice, or a value that does not fit the field kind
    /// - [`Error::UnknownField`] for a field the table does not declare
    /// - [`Error::InvalidValue`] for text that does not parse as a date
    pub fn extract(&self, predicate: Option<&Predicate>) -> Result<ParameterSet> {
        let predicate = predicate.ok_or_else(|| Error::malformed("no predicate supplied"))?;

        let mut values: HashMap<&'static str, String> = HashMap::new();
        for (name, value) in predicate.terms()? {
            let decl = field::lookup(self.fields, name).ok_or_else(|| Error::unknown_field(name))?;
            let formatted = self.format(decl, value)?;
            if values.insert(decl.name, formatted).is_some() {
                return Err(Error::malformed(format!(
                    "field '{name}' is compared more than once"
                )));
            }
        }

        Ok(self
            .fields
            .iter()
            .filter_map(|decl| values.remove(decl.name).map(|value| (decl.name, value)))
            .collect())
    }

    fn format(&self, decl: &FieldDecl, value: &FieldValue) -> Result<String> {
        match (decl.kind, value) {
            (FieldKind::Text | FieldKind::Token, FieldValue::Text(text)) => Ok(text.clone()),
            (FieldKind::Text | FieldKind::Token | FieldKind::List, FieldValue::Token(token)) => {
                Ok((*token).to_string())
            }
            (FieldKind::Date, FieldValue::Date(date)) => Ok(self.date_style.format(date)),
            (FieldKind::Date, FieldValue::Text(text)) => DateStyle::parse_any(text)
                .map(|date| self.date_style.format(&date))
                .ok_or_else(|| Error::invalid_value(decl.name, text.as_str())),
            (FieldKind::List, FieldValue::List(items)) => {
                Ok(join_list(items.iter().map(String::as_str)))
            }
            (FieldKind::List, FieldValue::Text(text)) => Ok(join_list([text.as_str()])),
            (kind, value) => Err(Error::malformed(format!(
                "field '{}' expects {kind:?}, got a {} value",
                decl.name,
                value.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};
    use chrono::NaiveDate;

    use super::*;

    static FIELDS: &[FieldDecl] = &[
        FieldDecl::selector("Type"),
        FieldDecl::path("ID", "id"),
        FieldDecl::query("EndTime", "end_time", FieldKind::Date),
        FieldDecl::query("StartTime", "start_time", FieldKind::Date),
        FieldDecl::query("Status", "status", FieldKind::List),
    ];

    fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .expect("valid date")
    }

    fn full_predicate() -> Predicate {
        Predicate::all([
            Predicate::eq("Type", FieldValue::Token("MultipleJobs")),
            Predicate::eq("EndTime", date(2020, 8, 30)),
            Predicate::eq("ID", "123"),
            Predicate::eq("StartTime", date(2020, 8, 1)),
            Predicate::eq("Status", FieldValue::list(["in_progress", "expired"])),
        ])
    }

    #[test]
    fn diagnostic_extraction() {
        let params = ParameterExtractor::new(FIELDS)
            .with_date_style(DateStyle::Diagnostic)
            .extract(Some(&full_predicate()))
            .expect("extract");

        check!(params.get("Type") == Some("MultipleJobs"));
        check!(params.get("EndTime") == Some("08/30/2020 00:00:00"));
        check!(params.get("ID") == Some("123"));
        check!(params.get("StartTime") == Some("08/01/2020 00:00:00"));
        check!(params.get("Status") == Some("in_progress,expired"));
    }

    #[test]
    fn diagnostic_extraction_snapshot() {
        let params = ParameterExtractor::new(FIELDS)
            .with_date_style(DateStyle::Diagnostic)
            .extract(Some(&full_predicate()))
            .expect("extract");

        let rendered = params
            .iter()
            .map(|(name, value)| format!("{name} = {value}"))
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(rendered, @r"
        Type = MultipleJobs
        ID = 123
        EndTime = 08/30/2020 00:00:00
        StartTime = 08/01/2020 00:00:00
        Status = in_progress,expired
        ");
    }

    #[test]
    fn url_extraction_formats_iso_dates() {
        let params = ParameterExtractor::new(FIELDS)
            .extract(Some(&full_predicate()))
            .expect("extract");

        check!(params.get("EndTime") == Some("2020-08-30T00:00:00Z"));
        check!(params.get("StartTime") == Some("2020-08-01T00:00:00Z"));
    }

    #[test]
    fn order_follows_declaration_not_expression() {
        let params = ParameterExtractor::new(FIELDS)
            .extract(Some(&full_predicate()))
            .expect("extract");

        check!(
            params.names().collect::<Vec<_>>() == ["Type", "ID", "EndTime", "StartTime", "Status"]
        );
    }

    #[test]
    fn list_with_spaces_is_normalized() {
        let predicate = Predicate::eq("Status", "in_progress, expired");
        let params = ParameterExtractor::new(FIELDS)
            .extract(Some(&predicate))
            .expect("extract");

        check!(params.get("Status") == Some("in_progress,expired"));
    }

    #[test]
    fn list_elements_are_trimmed_individually() {
        let predicate = Predicate::eq(
            "Status",
            FieldValue::list(["  in_progress ", " expired,   failed "]),
        );
        let params = ParameterExtractor::new(FIELDS)
            .extract(Some(&predicate))
            .expect("extract");

        check!(params.get("Status") == Some("in_progress,expired,failed"));
    }

    #[test]
    fn text_dates_are_reformatted() {
        let predicate = Predicate::eq("EndTime", "2021-01-01T12:59:59");
        let params = ParameterExtractor::new(FIELDS)
            .extract(Some(&predicate))
            .expect("extract");

        check!(params.get("EndTime") == Some("2021-01-01T12:59:59Z"));
    }

    #[test]
    fn unparseable_date_is_invalid() {
        let predicate = Predicate::eq("EndTime", "soon");
        let_assert!(
            Err(Error::InvalidValue { field, value }) =
                ParameterExtractor::new(FIELDS).extract(Some(&predicate))
        );
        check!(field == "EndTime");
        check!(value == "soon");
    }

    #[test]
    fn absent_predicate_is_malformed() {
        let_assert!(
            Err(Error::MalformedPredicate(_)) = ParameterExtractor::new(FIELDS).extract(None)
        );
    }

    #[test]
    fn disjunction_is_malformed() {
        let predicate = Predicate::eq("ID", "1").or(Predicate::eq("ID", "2"));
        let_assert!(
            Err(Error::MalformedPredicate(_)) =
                ParameterExtractor::new(FIELDS).extract(Some(&predicate))
        );
    }

    #[test]
    fn unknown_field_is_named() {
        let predicate = Predicate::eq("ID", "1").and(Predicate::eq("Color", "red"));
        let_assert!(
            Err(Error::UnknownField { field }) =
                ParameterExtractor::new(FIELDS).extract(Some(&predicate))
        );
        check!(field == "Color");
    }

    #[test]
    fn repeated_field_is_malformed() {
        let predicate = Predicate::eq("ID", "1").and(Predicate::eq("ID", "2"));
        let_assert!(
            Err(Error::MalformedPredicate(message)) =
                ParameterExtractor::new(FIELDS).extract(Some(&predicate))
        );
        check!(message.contains("more than once"));
    }

    #[test]
    fn mismatched_value_type_is_malformed() {
        let predicate = Predicate::eq("ID", date(2020, 1, 1));
        let_assert!(
            Err(Error::MalformedPredicate(message)) =
                ParameterExtractor::new(FIELDS).extract(Some(&predicate))
        );
        check!(message.contains("'ID'"));
    }

    #[test]
    fn unset_fields_are_absent_not_empty() {
        let predicate = Predicate::eq("ID", "");
        let params = ParameterExtractor::new(FIELDS)
            .extract(Some(&predicate))
            .expect("extract");

        check!(params.get("ID") == Some(""));
        check!(!params.contains("Status"));
        check!(params.len() == 1);
    }
}
