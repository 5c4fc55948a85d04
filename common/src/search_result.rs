use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::field_registry::FieldRegistry;


#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub documents: Vec<SearchResultDocumentItem>,
    pub total: u64,
    pub facet_counts: IndexMap<String, Vec<FacetValue>>,
}

impl SearchResponse {
    /// What the rendering side receives when the transport gave nothing usable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty() && self.total == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentField {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultDocumentItem {
    pub title: String,
    pub pdf_url: String,
    pub pdf_url_blank: String,
    pub fields: Vec<DocumentField>,
    pub result_index_in_page: u64,
}

impl SearchResultDocumentItem {
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.label == label).map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValue {
    pub value: String,
    pub label: String,
    pub count: u64,
}

impl FacetValue {
    pub fn new(value: impl Into<String>, count: u64) -> Self {
        let value = value.into();
        Self { label: value.clone(), value, count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetGroup {
    pub field: String,
    pub label: String,
    pub items: Vec<FacetValue>,
}

impl FacetGroup {
    /// One group per registered facet field that came back with non-zero counts, in registry order.
    pub fn from_facet_counts(registry: &FieldRegistry, facet_counts: &IndexMap<String, Vec<FacetValue>>) -> Vec<FacetGroup> {
        let mut groups = Vec::new();
        for field in registry.facet_fields() {
            let (Some(label), Some(values)) = (registry.facet_label(field), facet_counts.get(field)) else {
                continue;
            };
            let items = values.iter().filter(|v| v.count > 0).cloned().collect::<Vec<_>>();
            if items.is_empty() {
                continue;
            }
            groups.push(FacetGroup { field: field.to_string(), label: label.to_string(), items });
        }
        groups
    }

    /// Items whose label contains `term`, ignoring case. An empty term keeps everything.
    pub fn filter_items(&self, term: &str) -> Vec<&FacetValue> {
        let term = term.to_lowercase();
        self.items.iter().filter(|item| item.label.to_lowercase().contains(&term)).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> IndexMap<String, Vec<FacetValue>> {
        IndexMap::from([
            ("tributo_act_s".to_string(), vec![FacetValue::new("IRPJ", 145), FacetValue::new("CSLL", 0)]),
            ("campo_desconhecido_s".to_string(), vec![FacetValue::new("x", 3)]),
            ("situacao_s".to_string(), vec![FacetValue::new("JULGADO", 0)]),
            ("tipo_documento_s".to_string(), vec![FacetValue::new("AUTO DE INFRAÇÃO", 156), FacetValue::new("NOTIFICAÇÃO", 89)]),
        ])
    }

    #[test]
    fn groups_follow_registry_order_and_drop_empty_values() {
        let groups = FacetGroup::from_facet_counts(&FieldRegistry::default(), &counts());
        let fields = groups.iter().map(|g| g.field.as_str()).collect::<Vec<_>>();
        assert_eq!(fields, vec!["tipo_documento_s", "tributo_act_s"]);
        assert_eq!(groups[0].label, "Tipo de Documento");
        assert_eq!(groups[1].items, vec![FacetValue::new("IRPJ", 145)]);
    }

    #[test]
    fn in_facet_search_ignores_case() {
        let groups = FacetGroup::from_facet_counts(&FieldRegistry::default(), &counts());
        let hits = groups[0].filter_items("notif");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, "NOTIFICAÇÃO");
        assert_eq!(groups[0].filter_items("").len(), 2);
        assert!(groups[0].filter_items("recurso").is_empty());
    }

    #[test]
    fn document_field_lookup() {
        let doc = SearchResultDocumentItem {
            title: "IMPUGNAÇÃO".to_string(),
            pdf_url: "#".to_string(),
            pdf_url_blank: "#".to_string(),
            fields: vec![DocumentField { label: "Número do processo".to_string(), value: "1106".to_string() }],
            result_index_in_page: 0,
        };
        assert_eq!(doc.field("Número do processo"), Some("1106"));
        assert_eq!(doc.field("Tributo ACT"), None);
    }
}
