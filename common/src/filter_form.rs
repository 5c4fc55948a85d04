//! Un-applied filter inputs, as currently typed into the filter modal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    criteria::{AppliedFilter, TextOperator, build_date_filter, build_text_filter, build_value_filter},
    field_registry::{FieldKind, FieldRegistry},
};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextInput {
    pub label: String,
    pub value: String,
    pub operator: TextOperator,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateInput {
    pub label: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValueInput {
    pub min: String,
    pub max: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterForm {
    pub text_inputs: Vec<TextInput>,
    pub date_inputs: Vec<DateInput>,
    pub value_input: ValueInput,
}

impl FilterForm {
    /// One blank input per text and date field of the registry.
    pub fn from_registry(registry: &FieldRegistry) -> Self {
        Self {
            text_inputs: registry.of_kind(FieldKind::Text).map(|m| TextInput { label: m.label.clone(), ..Default::default() }).collect(),
            date_inputs: registry.of_kind(FieldKind::Date).map(|m| DateInput { label: m.label.clone(), ..Default::default() }).collect(),
            value_input: ValueInput::default(),
        }
    }

    fn text_input_mut(&mut self, label: &str) -> &mut TextInput {
        let index = match self.text_inputs.iter().position(|i| i.label == label) {
            Some(index) => index,
            None => {
                self.text_inputs.push(TextInput { label: label.to_string(), ..Default::default() });
                self.text_inputs.len() - 1
            }
        };
        &mut self.text_inputs[index]
    }

    fn date_input_mut(&mut self, label: &str) -> &mut DateInput {
        let index = match self.date_inputs.iter().position(|i| i.label == label) {
            Some(index) => index,
            None => {
                self.date_inputs.push(DateInput { label: label.to_string(), ..Default::default() });
                self.date_inputs.len() - 1
            }
        };
        &mut self.date_inputs[index]
    }

    pub fn set_text(&mut self, label: &str, value: impl Into<String>, operator: TextOperator) {
        let input = self.text_input_mut(label);
        input.value = value.into();
        input.operator = operator;
    }

    /// Advances the operator toggle of one text input, returning the new operator.
    pub fn cycle_operator(&mut self, label: &str) -> TextOperator {
        let input = self.text_input_mut(label);
        input.operator = input.operator.next();
        input.operator
    }

    pub fn set_date_range(&mut self, label: &str, from: impl Into<String>, to: impl Into<String>) {
        let input = self.date_input_mut(label);
        input.from = from.into();
        input.to = to.into();
    }

    pub fn set_value_range(&mut self, min: impl Into<String>, max: impl Into<String>) {
        self.value_input = ValueInput { min: min.into(), max: max.into() };
    }

    /// Empties every input and puts every operator back to `Contains`; labels stay.
    pub fn reset(&mut self) {
        for input in self.text_inputs.iter_mut() {
            input.value.clear();
            input.operator = TextOperator::default();
        }
        for input in self.date_inputs.iter_mut() {
            input.from.clear();
            input.to.clear();
        }
        self.value_input = ValueInput::default();
    }

    /// Builds the applied filters: text inputs, then dates, then the value range.
    pub fn collect(&self, registry: &FieldRegistry, today: NaiveDate) -> Vec<AppliedFilter> {
        let mut filters = Vec::new();
        for input in &self.text_inputs {
            filters.extend(build_text_filter(registry, &input.label, &input.value, input.operator));
        }
        for input in &self.date_inputs {
            filters.extend(build_date_filter(registry, &input.label, Some(&input.from), Some(&input.to), today));
        }
        filters.extend(build_value_filter(registry, Some(&self.value_input.min), Some(&self.value_input.max)));
        filters
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn blank_form_collects_nothing() {
        let registry = FieldRegistry::default();
        let form = FilterForm::from_registry(&registry);
        assert_eq!(form.text_inputs.len(), 22);
        assert_eq!(form.date_inputs.len(), 4);
        assert!(form.collect(&registry, today()).is_empty());
    }

    #[test]
    fn collects_text_then_dates_then_value() {
        let registry = FieldRegistry::default();
        let mut form = FilterForm::from_registry(&registry);
        form.set_value_range("", "500");
        form.set_date_range("Protocolo", "2024-01-01", "");
        form.set_text("Nome do Contribuinte", "Acme", TextOperator::Contains);

        let filters = form.collect(&registry, today());
        let kinds = filters.iter().map(|f| f.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![FieldKind::Text, FieldKind::Date, FieldKind::Numeric]);
        assert_eq!(filters[0].query_fragment().unwrap(), "nome_contribuinte_s:*Acme*");
        assert_eq!(filters[1].query_fragment().unwrap(), "dt_protocolo_tdt:[2024-01-01T00:00:00Z TO 2024-06-01T23:59:59Z]");
        assert_eq!(filters[2].query_fragment().unwrap(), "valor_processo_d:[* TO 500]");
    }

    #[test]
    fn unknown_labels_are_added_as_inputs() {
        let registry = FieldRegistry::default();
        let mut form = FilterForm::default();
        form.set_text("Observações", "x", TextOperator::Equals);
        let filters = form.collect(&registry, today());
        assert_eq!(filters.len(), 1);
        assert!(filters[0].is_display_only());
    }

    #[test]
    fn cycling_an_operator_changes_only_that_input() {
        let registry = FieldRegistry::default();
        let mut form = FilterForm::from_registry(&registry);
        assert_eq!(form.cycle_operator("Tributo ACT"), TextOperator::NotContains);
        assert_eq!(form.cycle_operator("Tributo ACT"), TextOperator::Equals);
        let others = form.text_inputs.iter().filter(|i| i.label != "Tributo ACT");
        assert!(others.into_iter().all(|i| i.operator == TextOperator::Contains));
    }

    #[test]
    fn reset_clears_values_and_operators() {
        let registry = FieldRegistry::default();
        let mut form = FilterForm::from_registry(&registry);
        form.set_text("Nr Processo", "123", TextOperator::Equals);
        form.set_date_range("Juntada", "2024-01-01", "2024-02-01");
        form.set_value_range("1", "2");
        form.reset();
        assert_eq!(form, FilterForm::from_registry(&registry));
        assert!(form.collect(&registry, today()).is_empty());
    }
}
