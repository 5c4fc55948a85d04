//! Result page requests against the Solr `select` handler.

use common::{
    field_registry::FieldRegistry,
    search_query::SearchRequest,
    search_result::{DocumentField, SearchResponse, SearchResultDocumentItem},
};
use tracing::debug;

use crate::{
    api::search::{SearchTransport, facet_params, parse_facet_fields},
    config::SearchConfig,
    db_utils::solr_utils::{format_solr_datetime, solr_select, solr_value_to_string},
};

const UNTITLED_DOCUMENT: &str = "Documento sem título";
const MISSING_PDF_URL: &str = "#";

/// Card fields in display order: (label, stored field).
const CARD_FIELDS: &[(&str, &str)] = &[
    ("Número do processo", "processo_s"),
    ("Data anexação", "dt_anexacao_tdt"),
    ("Data protocolo", "dt_protocolo_tdt"),
    ("Data juntada", "dt_juntada_tdt"),
    ("Unidade origem", "unidade_origem_s"),
    ("Equipe origem", "equipe_origem_s"),
    ("Tipo documento", "tipo_documento_s"),
    ("Grupo processo", "grupo_processo_s"),
    ("Tipo processo", "tipo_processo_s"),
    ("Subtipo processo", "subtipo_processo_s"),
    ("NI do Contribuinte", "ni_contribuinte_s"),
    ("Nome do Contribuinte", "nome_contribuinte_s"),
    ("Nome Equipe Atual", "nome_equipe_atual_s"),
    ("Nome Unidade Atual", "nome_unidade_atual_s"),
    ("CPF Responsável", "cpf_responsavel_s"),
    ("Nome usuário juntada", "nome_usuario_juntada_doc_s"),
    ("Tributo ACT", "tributo_act_s"),
    ("Trecho", "trecho_txt"),
];

pub struct SolrTransport {
    client: reqwest::Client,
    config: SearchConfig,
    registry: FieldRegistry,
}

impl SolrTransport {
    pub fn new(config: SearchConfig, registry: FieldRegistry) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(config.http_timeout()).build()?;
        Ok(Self { client, config, registry })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl SearchTransport for SolrTransport {
    async fn search(&self, request: &SearchRequest) -> anyhow::Result<SearchResponse> {
        let params = build_select_params(request, &self.registry, &self.config);
        let raw = solr_select(&self.client, &self.config, &params).await?;
        let documents = raw
            .response
            .docs
            .iter()
            .enumerate()
            .map(|(index, doc)| transform_solr_doc(doc, index as u64))
            .collect::<Vec<_>>();
        debug!("page {} -> {} documents", request.page, documents.len());
        Ok(SearchResponse {
            documents,
            total: raw.response.num_found,
            facet_counts: parse_facet_fields(raw.facet_counts.as_ref()),
        })
    }
}

pub fn build_select_params(request: &SearchRequest, registry: &FieldRegistry, config: &SearchConfig) -> Vec<(String, String)> {
    let mut params = vec![
        ("q".to_string(), request.query_text.clone()),
        ("start".to_string(), request.start().to_string()),
        ("rows".to_string(), request.page_size.to_string()),
        ("wt".to_string(), "json".to_string()),
    ];
    params.extend(facet_params(registry, config));
    params
}

fn doc_string(doc: &serde_json::Map<String, serde_json::Value>, field: &str) -> Option<String> {
    doc.get(field).map(solr_value_to_string).filter(|s| !s.trim().is_empty())
}

/// Shapes one stored document into a result card. Empty fields are left out; dates are shown day-first.
pub fn transform_solr_doc(doc: &serde_json::Map<String, serde_json::Value>, result_index_in_page: u64) -> SearchResultDocumentItem {
    let title = doc_string(doc, "titulo_s")
        .or_else(|| doc_string(doc, "tipo_documento_s"))
        .unwrap_or_else(|| UNTITLED_DOCUMENT.to_string());

    let fields = CARD_FIELDS
        .iter()
        .filter_map(|(label, field)| {
            let value = doc_string(doc, field)?;
            let value = if field.ends_with("_tdt") { format_solr_datetime(&value) } else { value };
            Some(DocumentField { label: label.to_string(), value })
        })
        .collect();

    SearchResultDocumentItem {
        title,
        pdf_url: doc_string(doc, "url_pdf_s").unwrap_or_else(|| MISSING_PDF_URL.to_string()),
        pdf_url_blank: doc_string(doc, "url_pdf_blank_s").unwrap_or_else(|| MISSING_PDF_URL.to_string()),
        fields,
        result_index_in_page,
    }
}
