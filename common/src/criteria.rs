//! Criterion builders: one piece of filter input becomes an engine fragment plus an applied-filter record.
//!
//! Builders never fail. Empty input yields `None`; anything else, however odd
//! (`min > max`, a date that is not a date), is passed through for the engine
//! to judge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    field_registry::{FieldKind, FieldRegistry, normalize_text_label, VALUE_FIELD_LABEL},
    query_escape::escape_query_literal,
    search_const::{END_OF_DAY_SUFFIX, OPEN_RANGE_BOUND, START_OF_DAY_SUFFIX},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextOperator {
    #[default]
    Contains,
    NotContains,
    Equals,
}

impl TextOperator {
    pub const ALL: [TextOperator; 3] = [TextOperator::Contains, TextOperator::NotContains, TextOperator::Equals];

    pub fn slug(&self) -> &'static str {
        match self {
            TextOperator::Contains => "contem",
            TextOperator::NotContains => "nao-contem",
            TextOperator::Equals => "igual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TextOperator::Contains => "Contém",
            TextOperator::NotContains => "Não Contém",
            TextOperator::Equals => "Igual",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.slug() == slug)
    }

    /// Operator shown after one click on the toggle.
    pub fn next(&self) -> Self {
        match self {
            TextOperator::Contains => TextOperator::NotContains,
            TextOperator::NotContains => TextOperator::Equals,
            TextOperator::Equals => TextOperator::Contains,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCriterion {
    pub field: String,
    pub operator: TextOperator,
    pub raw_value: String,
    pub escaped_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeCriterion {
    pub field: String,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Day the criterion was built; closes the range when `to` is missing.
    pub today: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRangeCriterion {
    pub field: String,
    pub min: Option<String>,
    pub max: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Criterion {
    Text(TextCriterion),
    DateRange(DateRangeCriterion),
    NumericRange(NumericRangeCriterion),
}

impl Criterion {
    pub fn fragment(&self) -> String {
        match self {
            Criterion::Text(c) => match c.operator {
                TextOperator::Contains => format!("{}:*{}*", c.field, c.escaped_value),
                TextOperator::NotContains => format!("-{}:*{}*", c.field, c.escaped_value),
                TextOperator::Equals => format!("{}:\"{}\"", c.field, c.escaped_value),
            },
            Criterion::DateRange(c) => {
                let lower = match &c.from {
                    Some(from) => format!("{from}{START_OF_DAY_SUFFIX}"),
                    None => OPEN_RANGE_BOUND.to_string(),
                };
                // an open "to" always means "until the end of today"
                let upper = match &c.to {
                    Some(to) => format!("{to}{END_OF_DAY_SUFFIX}"),
                    None => format!("{}{END_OF_DAY_SUFFIX}", c.today.format("%Y-%m-%d")),
                };
                format!("{}:[{lower} TO {upper}]", c.field)
            }
            Criterion::NumericRange(c) => {
                let min = c.min.as_deref().unwrap_or(OPEN_RANGE_BOUND);
                let max = c.max.as_deref().unwrap_or(OPEN_RANGE_BOUND);
                format!("{}:[{min} TO {max}]", c.field)
            }
        }
    }
}

/// Display projection of a criterion, rendered as a removable tag.
///
/// `criterion` is `None` for labels with no engine counterpart: the filter is
/// still shown but adds nothing to the compiled query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFilter {
    pub label: String,
    pub display_value: String,
    pub operator: Option<TextOperator>,
    pub kind: FieldKind,
    pub criterion: Option<Criterion>,
}

impl AppliedFilter {
    pub fn query_fragment(&self) -> Option<String> {
        self.criterion.as_ref().map(|c| c.fragment())
    }

    pub fn operator_label(&self) -> Option<&'static str> {
        self.operator.map(|op| op.label())
    }

    pub fn is_display_only(&self) -> bool {
        self.criterion.is_none()
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// `YYYY-MM-DD` becomes `DD/MM/YYYY`; anything else is shown as typed.
pub fn format_display_date(iso_date: &str) -> String {
    match NaiveDate::parse_from_str(iso_date, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => iso_date.to_string(),
    }
}

pub fn build_text_filter(registry: &FieldRegistry, label: &str, raw_value: &str, operator: TextOperator) -> Option<AppliedFilter> {
    let value = non_empty(Some(raw_value))?;
    let label = normalize_text_label(label);
    let criterion = registry.resolve_text(label).map(|mapping| {
        Criterion::Text(TextCriterion {
            field: mapping.engine_field.clone(),
            operator,
            escaped_value: escape_query_literal(&value),
            raw_value: value.clone(),
        })
    });
    Some(AppliedFilter {
        label: label.to_string(),
        display_value: value,
        operator: Some(operator),
        kind: FieldKind::Text,
        criterion,
    })
}

pub fn build_date_filter(registry: &FieldRegistry, label: &str, from: Option<&str>, to: Option<&str>, today: NaiveDate) -> Option<AppliedFilter> {
    let from = non_empty(from);
    let to = non_empty(to);
    let display_value = match (&from, &to) {
        (None, None) => return None,
        (Some(from), Some(to)) => format!("{} até {}", format_display_date(from), format_display_date(to)),
        (Some(from), None) => format!("A partir de {}", format_display_date(from)),
        (None, Some(to)) => format!("Até {}", format_display_date(to)),
    };
    let label = label.trim();
    let criterion = registry.resolve_date(label).map(|mapping| {
        Criterion::DateRange(DateRangeCriterion { field: mapping.engine_field.clone(), from, to, today })
    });
    Some(AppliedFilter {
        label: label.to_string(),
        display_value,
        operator: None,
        kind: FieldKind::Date,
        criterion,
    })
}

pub fn build_value_filter(registry: &FieldRegistry, min: Option<&str>, max: Option<&str>) -> Option<AppliedFilter> {
    let min = non_empty(min);
    let max = non_empty(max);
    let display_value = match (&min, &max) {
        (None, None) => return None,
        (Some(min), Some(max)) => format!("R${min} até R${max}"),
        (Some(min), None) => format!("Mínimo: R${min}"),
        (None, Some(max)) => format!("Máximo: R${max}"),
    };
    let criterion = registry.value_field().map(|mapping| {
        Criterion::NumericRange(NumericRangeCriterion { field: mapping.engine_field.clone(), min, max })
    });
    Some(AppliedFilter {
        label: VALUE_FIELD_LABEL.to_string(),
        display_value,
        operator: None,
        kind: FieldKind::Numeric,
        criterion,
    })
}
