//! Diagnostics emitted by the builder and the semantic validator.

use serde::{Deserialize, Serialize};

use crate::errors::{ExError, ExErrorKind};

/// Diagnostic severity. Only `Error` affects `hasErrors` and the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Stable diagnostic codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Fatal (surfaced from the error facility)
    ParseError,
    InvalidRoot,
    MissingEntities,
    DuplicateEntity,
    DuplicateField,

    // Builder warnings
    InvalidRelationshipRef,
    RelationshipMissingEntity,
    InvalidRelationshipCardinality,
    UnknownEntityKind,
    UnknownModelState,
    InvalidSectionShape,
    InvalidSectionItem,
    DuplicateMetric,
    DuplicateIndex,

    // Layer: transform
    MissingGrain,

    // Layer: report
    MissingMetrics,
    MetricDimensionNotFound,
    MetricTimeDimensionNotFound,

    // Always on
    GovernanceRefNotFound,
    IndexFieldNotFound,
    MetricEntityNotFound,
    GlossaryRefNotFound,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::ParseError => "PARSE_ERROR",
            DiagnosticCode::InvalidRoot => "INVALID_ROOT",
            DiagnosticCode::MissingEntities => "MISSING_ENTITIES",
            DiagnosticCode::DuplicateEntity => "DUPLICATE_ENTITY",
            DiagnosticCode::DuplicateField => "DUPLICATE_FIELD",
            DiagnosticCode::InvalidRelationshipRef => "INVALID_RELATIONSHIP_REF",
            DiagnosticCode::RelationshipMissingEntity => "RELATIONSHIP_MISSING_ENTITY",
            DiagnosticCode::InvalidRelationshipCardinality => "INVALID_RELATIONSHIP_CARDINALITY",
            DiagnosticCode::UnknownEntityKind => "UNKNOWN_ENTITY_KIND",
            DiagnosticCode::UnknownModelState => "UNKNOWN_MODEL_STATE",
            DiagnosticCode::InvalidSectionShape => "INVALID_SECTION_SHAPE",
            DiagnosticCode::InvalidSectionItem => "INVALID_SECTION_ITEM",
            DiagnosticCode::DuplicateMetric => "DUPLICATE_METRIC",
            DiagnosticCode::DuplicateIndex => "DUPLICATE_INDEX",
            DiagnosticCode::MissingGrain => "MISSING_GRAIN",
            DiagnosticCode::MissingMetrics => "MISSING_METRICS",
            DiagnosticCode::MetricDimensionNotFound => "METRIC_DIMENSION_NOT_FOUND",
            DiagnosticCode::MetricTimeDimensionNotFound => "METRIC_TIME_DIMENSION_NOT_FOUND",
            DiagnosticCode::GovernanceRefNotFound => "GOVERNANCE_REF_NOT_FOUND",
            DiagnosticCode::IndexFieldNotFound => "INDEX_FIELD_NOT_FOUND",
            DiagnosticCode::MetricEntityNotFound => "METRIC_ENTITY_NOT_FOUND",
            DiagnosticCode::GlossaryRefNotFound => "GLOSSARY_REF_NOT_FOUND",
        }
    }

    /// Diagnostic code for a fatal error kind; `None` for non-pipeline kinds
    pub fn for_fatal(kind: ExErrorKind) -> Option<Self> {
        match kind {
            ExErrorKind::ParseError => Some(DiagnosticCode::ParseError),
            ExErrorKind::InvalidRoot => Some(DiagnosticCode::InvalidRoot),
            ExErrorKind::MissingEntities => Some(DiagnosticCode::MissingEntities),
            ExErrorKind::DuplicateEntity => Some(DiagnosticCode::DuplicateEntity),
            ExErrorKind::DuplicateField => Some(DiagnosticCode::DuplicateField),
            _ => None,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding about a model: `{code, severity, message, path}`.
///
/// `path` is an entity name, an `entity.field` pair, a relationship/metric
/// name, or the model name, depending on what the finding is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub path: String,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: message.into(),
            path: path.into(),
        }
    }

    pub fn warning(
        code: DiagnosticCode,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            message: message.into(),
            path: path.into(),
        }
    }

    /// Single error-severity diagnostic standing in for a fatal pipeline error.
    ///
    /// Non-pipeline kinds never reach the validator; they map to `PARSE_ERROR`.
    pub fn from_fatal(err: &ExError) -> Self {
        let code = DiagnosticCode::for_fatal(err.kind()).unwrap_or(DiagnosticCode::ParseError);
        Self::error(code, err.path(), err.message())
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        if self.path.is_empty() {
            write!(f, "{}[{}]: {}", level, self.code, self.message)
        } else {
            write!(f, "{}[{}] {}: {}", level, self.code, self.path, self.message)
        }
    }
}
