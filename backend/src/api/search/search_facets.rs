//! Facet request parameters and facet count parsing.

use common::{field_registry::FieldRegistry, search_result::FacetValue};
use indexmap::IndexMap;
use tracing::warn;

use crate::{config::SearchConfig, db_utils::solr_utils::RawFacetCounts};

pub fn facet_params(registry: &FieldRegistry, config: &SearchConfig) -> Vec<(String, String)> {
    let mut params = vec![("facet".to_string(), "true".to_string())];
    for field in registry.facet_fields() {
        params.push(("facet.field".to_string(), field.to_string()));
    }
    params.push(("facet.mincount".to_string(), config.facet_min_count.to_string()));
    params.push(("facet.limit".to_string(), config.facet_limit.to_string()));
    params
}

/// Turns flat `[value, count, ...]` lists into per-field values, dropping zero counts.
pub fn parse_facet_fields(raw: Option<&RawFacetCounts>) -> IndexMap<String, Vec<FacetValue>> {
    let mut result = IndexMap::new();
    let Some(raw) = raw else {
        return result;
    };
    for (field, flat) in &raw.facet_fields {
        let mut values = Vec::new();
        for pair in flat.chunks(2) {
            let [value, count] = pair else {
                warn!("facet field {field}: dangling value without count");
                continue;
            };
            let value = match value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Number(n) => n.to_string(),
                other => {
                    warn!("facet field {field}: unexpected value {other}");
                    continue;
                }
            };
            let count = count.as_u64().unwrap_or(0);
            if count == 0 {
                continue;
            }
            values.push(FacetValue::new(value, count));
        }
        result.insert(field.clone(), values);
    }
    result
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: serde_json::Value) -> RawFacetCounts {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn params_name_every_registered_facet() {
        let params = facet_params(&FieldRegistry::default(), &SearchConfig::default());
        let fields = params.iter().filter(|(k, _)| k == "facet.field").map(|(_, v)| v.as_str()).collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec!["tipo_documento_s", "grupo_processo_s", "unidade_origem_s", "tributo_act_s", "situacao_s", "tipo_processo_s"]
        );
        assert!(params.contains(&("facet.mincount".to_string(), "1".to_string())));
        assert!(params.contains(&("facet.limit".to_string(), "20".to_string())));
    }

    #[test]
    fn pairs_are_read_in_order_and_zeros_skipped() {
        let counts = raw(json!({"facet_fields": {
            "tipo_documento_s": ["Despacho", 12, "Acórdão", 0, "Intimação", 3],
            "tributo_act_s": [],
        }}));
        let parsed = parse_facet_fields(Some(&counts));
        assert_eq!(
            parsed["tipo_documento_s"],
            vec![FacetValue::new("Despacho", 12), FacetValue::new("Intimação", 3)]
        );
        assert!(parsed["tributo_act_s"].is_empty());
    }

    #[test]
    fn numeric_values_and_odd_lists() {
        let counts = raw(json!({"facet_fields": {"ano_i": [2023, 4, 2024]}}));
        let parsed = parse_facet_fields(Some(&counts));
        assert_eq!(parsed["ano_i"], vec![FacetValue::new("2023", 4)]);
        assert!(parse_facet_fields(None).is_empty());
    }
}
