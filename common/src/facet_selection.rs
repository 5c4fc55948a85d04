//! Selected facet values, per facet field.
//!
//! Fields and values keep the order in which they were first selected, which
//! is also the order the compiler emits them in. A field is present only while
//! at least one of its values is selected.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, Vec<String>>", into = "IndexMap<String, Vec<String>>")]
pub struct FacetSelection {
    fields: IndexMap<String, IndexSet<String>>,
}

impl FacetSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects `value` if absent, deselects it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, field: &str, value: &str) -> bool {
        if let Some(values) = self.fields.get_mut(field) {
            if values.shift_remove(value) {
                if values.is_empty() {
                    self.fields.shift_remove(field);
                }
                return false;
            }
            values.insert(value.to_string());
            return true;
        }
        self.fields.insert(field.to_string(), IndexSet::from([value.to_string()]));
        true
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Atomic substitution of the whole selection; empty fields are dropped.
    pub fn replace_all<I, K, V, S>(&mut self, selection: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = IndexMap::new();
        for (field, values) in selection {
            let values = values.into_iter().map(Into::into).collect::<IndexSet<String>>();
            if !values.is_empty() {
                fields.insert(field.into(), values);
            }
        }
        self.fields = fields;
    }

    pub fn is_active(&self, field: &str, value: &str) -> bool {
        self.fields.get(field).is_some_and(|values| values.contains(value))
    }

    pub fn values(&self, field: &str) -> Option<&IndexSet<String>> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexSet<String>)> {
        self.fields.iter().map(|(field, values)| (field.as_str(), values))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_map(&self) -> IndexMap<String, Vec<String>> {
        self.fields.iter().map(|(field, values)| (field.clone(), values.iter().cloned().collect())).collect()
    }
}

impl From<IndexMap<String, Vec<String>>> for FacetSelection {
    fn from(map: IndexMap<String, Vec<String>>) -> Self {
        let mut selection = Self::new();
        selection.replace_all(map);
        selection
    }
}

impl From<FacetSelection> for IndexMap<String, Vec<String>> {
    fn from(selection: FacetSelection) -> Self {
        selection.to_map()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_previous_selection() {
        let mut selection = FacetSelection::new();
        selection.toggle("tipo_documento_s", "A");
        let before = selection.clone();

        assert!(selection.toggle("tipo_documento_s", "B"));
        assert!(!selection.toggle("tipo_documento_s", "B"));
        assert_eq!(selection, before);
    }

    #[test]
    fn removing_the_last_value_prunes_the_field() {
        let mut selection = FacetSelection::new();
        selection.toggle("situacao_s", "JULGADO");
        selection.toggle("situacao_s", "JULGADO");
        assert!(selection.is_empty());
        assert!(selection.values("situacao_s").is_none());
        assert_eq!(selection, FacetSelection::new());
    }

    #[test]
    fn values_keep_selection_order() {
        let mut selection = FacetSelection::new();
        selection.toggle("tributo_act_s", "IRPJ");
        selection.toggle("tributo_act_s", "CSLL");
        selection.toggle("tributo_act_s", "PIS");
        selection.toggle("tributo_act_s", "CSLL");
        selection.toggle("tributo_act_s", "CSLL");
        let values = selection.values("tributo_act_s").unwrap().iter().cloned().collect::<Vec<_>>();
        assert_eq!(values, vec!["IRPJ", "PIS", "CSLL"]);
        assert!(selection.is_active("tributo_act_s", "PIS"));
        assert!(!selection.is_active("tributo_act_s", "IPI"));
        assert!(!selection.is_active("situacao_s", "PIS"));
    }

    #[test]
    fn replace_all_substitutes_and_prunes() {
        let mut selection = FacetSelection::new();
        selection.toggle("situacao_s", "JULGADO");
        selection.replace_all(vec![
            ("tipo_documento_s", vec!["A", "B", "A"]),
            ("unidade_origem_s", vec![]),
        ]);
        assert!(!selection.is_active("situacao_s", "JULGADO"));
        assert_eq!(selection.to_map().len(), 1);
        assert_eq!(selection.to_map()["tipo_documento_s"], vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn clear_empties_every_field() {
        let mut selection = FacetSelection::new();
        selection.toggle("a", "1");
        selection.toggle("b", "2");
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn json_form_is_a_plain_map() {
        let mut selection = FacetSelection::new();
        selection.toggle("tipo_documento_s", "A");
        selection.toggle("situacao_s", "C");
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"tipo_documento_s":["A"],"situacao_s":["C"]}"#);
        let parsed: FacetSelection = serde_json::from_str(r#"{"x":[],"y":["1"]}"#).unwrap();
        assert_eq!(parsed.to_map().keys().collect::<Vec<_>>(), vec!["y"]);
    }
}
