//! Mapping from human-readable filter labels to engine field identifiers.
//!
//! Lookup rules:
//! * text and numeric labels match exactly, after [`normalize_text_label`];
//! * date labels match when the registered key is contained in the visible
//!   label, so a section title like `Data de Protocolo` resolves through the
//!   `Protocolo` key. Keys are tried in declaration order.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Date,
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldMapping {
    pub label: String,
    pub engine_field: String,
    pub kind: FieldKind,
}

impl FieldMapping {
    pub fn new(label: impl Into<String>, engine_field: impl Into<String>, kind: FieldKind) -> Self {
        Self { label: label.into(), engine_field: engine_field.into(), kind }
    }
}

/// Marker appended to labels of inputs that carry autocomplete.
const AUTOCOMPLETE_LABEL_SUFFIX: &str = " (AUTO)";

pub const VALUE_FIELD_LABEL: &str = "Valor";
pub const VALUE_ENGINE_FIELD: &str = "valor_processo_d";

const TEXT_FIELDS: &[(&str, &str)] = &[
    ("Grupo Processo", "grupo_processo_s"),
    ("Tipo Processo", "tipo_processo_s"),
    ("Subtipo Processo", "subtipo_processo_s"),
    ("Nr Processo", "processo_s"),
    ("Situação do Documento", "situacao_s"),
    ("Assuntos/Objetos", "assuntos_objetos_s"),
    ("Tipo do Documento", "tipo_documento_s"),
    ("Título Documento", "titulo_s"),
    ("Nr Doc Principal", "numero_doc_principal_exp_s"),
    ("Tributo ACT", "tributo_act_s"),
    ("Unidade de Origem do Documento", "unidade_origem_s"),
    ("Equipe de Origem do Documento", "equipe_origem_s"),
    ("Unidade Atual", "nome_unidade_atual_s"),
    ("Equipe Atual", "nome_equipe_atual_s"),
    ("NI Contribuinte", "ni_contribuinte_s"),
    ("Nome do Contribuinte", "nome_contribuinte_s"),
    ("CPF Responsável", "cpf_responsavel_s"),
    ("Nome Usuário Juntada", "nome_usuario_juntada_doc_s"),
    ("Nome Relator DRJ", "nome_relator_drj_s"),
    ("Alegações no Recurso", "aleg_recurso_contrib_txt"),
    ("Result Julgamento DRJ nível 1", "result_questdrj_nivel1_s"),
    ("Result Julgamento DRJ nível 2", "result_questdrj_nivel2_s"),
];

const DATE_FIELDS: &[(&str, &str)] = &[
    ("Protocolo", "dt_protocolo_tdt"),
    ("Juntada", "dt_juntada_tdt"),
    ("Registro", "dt_registro_tdt"),
    ("Anexação", "dt_anexacao_tdt"),
];

/// Facet fields requested from the engine, with the label shown above each group.
const FACET_FIELDS: &[(&str, &str)] = &[
    ("tipo_documento_s", "Tipo de Documento"),
    ("grupo_processo_s", "Grupo de Processo"),
    ("unidade_origem_s", "Unidade"),
    ("tributo_act_s", "Tributo"),
    ("situacao_s", "Situação"),
    ("tipo_processo_s", "Tipo de Processo"),
];

/// Trims a visible label and strips the autocomplete marker.
pub fn normalize_text_label(label: &str) -> &str {
    let label = label.trim();
    label.strip_suffix(AUTOCOMPLETE_LABEL_SUFFIX).unwrap_or(label).trim_end()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRegistry {
    fields: Vec<FieldMapping>,
    facet_fields: Vec<(String, String)>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        let mut fields = Vec::new();
        for (label, field) in TEXT_FIELDS {
            fields.push(FieldMapping::new(*label, *field, FieldKind::Text));
        }
        for (label, field) in DATE_FIELDS {
            fields.push(FieldMapping::new(*label, *field, FieldKind::Date));
        }
        fields.push(FieldMapping::new(VALUE_FIELD_LABEL, VALUE_ENGINE_FIELD, FieldKind::Numeric));
        let facet_fields = FACET_FIELDS.iter().map(|(f, l)| (f.to_string(), l.to_string())).collect();
        Self::new(fields, facet_fields)
    }
}

impl FieldRegistry {
    /// Builds a registry; a label repeated within the same kind keeps its first mapping.
    pub fn new(fields: Vec<FieldMapping>, facet_fields: Vec<(String, String)>) -> Self {
        let mut unique: Vec<FieldMapping> = Vec::with_capacity(fields.len());
        for mapping in fields {
            if unique.iter().any(|m| m.kind == mapping.kind && m.label == mapping.label) {
                continue;
            }
            unique.push(mapping);
        }
        Self { fields: unique, facet_fields }
    }

    pub fn resolve(&self, label: &str) -> Option<&FieldMapping> {
        self.resolve_text(label)
            .or_else(|| self.resolve_numeric(label))
            .or_else(|| self.resolve_date(label))
    }

    pub fn resolve_text(&self, label: &str) -> Option<&FieldMapping> {
        let label = normalize_text_label(label);
        self.of_kind(FieldKind::Text).find(|m| m.label == label)
    }

    pub fn resolve_numeric(&self, label: &str) -> Option<&FieldMapping> {
        let label = normalize_text_label(label);
        self.of_kind(FieldKind::Numeric).find(|m| m.label == label)
    }

    pub fn resolve_date(&self, label: &str) -> Option<&FieldMapping> {
        self.of_kind(FieldKind::Date).find(|m| label.contains(m.label.as_str()))
    }

    /// The single numeric field targeted by value-range filters.
    pub fn value_field(&self) -> Option<&FieldMapping> {
        self.of_kind(FieldKind::Numeric).next()
    }

    pub fn of_kind(&self, kind: FieldKind) -> impl Iterator<Item = &FieldMapping> {
        self.fields.iter().filter(move |m| m.kind == kind)
    }

    pub fn facet_fields(&self) -> impl Iterator<Item = &str> {
        self.facet_fields.iter().map(|(field, _)| field.as_str())
    }

    pub fn facet_label(&self, field: &str) -> Option<&str> {
        self.facet_fields.iter().find(|(f, _)| f == field).map(|(_, label)| label.as_str())
    }
}
