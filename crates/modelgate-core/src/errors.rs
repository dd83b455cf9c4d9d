use modelgate_core_types::RequestId;
use thiserror::Error;

/// Result type alias using the canonical [`ExError`]
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable code. The first five kinds are the fatal tier of
/// the model pipeline: when one of them is raised no canonical model exists and
/// the code is surfaced verbatim as the single diagnostic of the validation
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Fatal pipeline errors
    /// Document text is not well-formed YAML
    ParseError,
    /// Document root is a scalar or a list instead of a map
    InvalidRoot,
    /// `entities` key is absent, not a list, or empty
    MissingEntities,
    /// Two entities share a name
    DuplicateEntity,
    /// Two fields of one entity share a name
    DuplicateField,

    // Document editing
    NotFound,
    AlreadyExists,

    // Configuration
    InvalidConfig,

    // Integration/IO
    Serialization,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ParseError => "PARSE_ERROR",
            ExErrorKind::InvalidRoot => "INVALID_ROOT",
            ExErrorKind::MissingEntities => "MISSING_ENTITIES",
            ExErrorKind::DuplicateEntity => "DUPLICATE_ENTITY",
            ExErrorKind::DuplicateField => "DUPLICATE_FIELD",
            ExErrorKind::NotFound => "NOT_FOUND",
            ExErrorKind::AlreadyExists => "ALREADY_EXISTS",
            ExErrorKind::InvalidConfig => "INVALID_CONFIG",
            ExErrorKind::Serialization => "SERIALIZATION",
            ExErrorKind::Io => "IO",
            ExErrorKind::Internal => "INTERNAL",
        }
    }

    /// True for the kinds that abort the pipeline before a model is built
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExErrorKind::ParseError
                | ExErrorKind::InvalidRoot
                | ExErrorKind::MissingEntities
                | ExErrorKind::DuplicateEntity
                | ExErrorKind::DuplicateField
        )
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, entity, field, request) for debugging and for mapping
/// the error back onto a diagnostic path.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            field: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity name context
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add field name context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Get the field context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Diagnostic path for this error: `entity`, `entity.field`, or empty
    pub fn path(&self) -> String {
        match (&self.entity, &self.field) {
            (Some(entity), Some(field)) => format!("{}.{}", entity, field),
            (Some(entity), None) => entity.clone(),
            (None, _) => String::new(),
        }
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        let path = self.path();
        if !path.is_empty() {
            write!(f, " (at: {})", path)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised while loading, canonicalizing, or editing a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    // ===== Loader =====
    /// Underlying YAML parser rejected the text
    #[error("Document parse error: {message}")]
    Parse { message: String },

    /// Root node is not a map
    #[error("Document root must be a map, found {found}")]
    InvalidRoot { found: String },

    /// `entities` missing, wrong type, or empty
    #[error("Document must declare a non-empty `entities` list: {reason}")]
    MissingEntities { reason: String },

    // ===== Builder =====
    #[error("Duplicate entity name: {entity}")]
    DuplicateEntity { entity: String },

    #[error("Duplicate field name {field} in entity {entity}")]
    DuplicateField { entity: String, field: String },

    // ===== Editing =====
    #[error("Entity not found: {entity}")]
    EntityNotFound { entity: String },

    #[error("Field not found: {entity}.{field}")]
    FieldNotFound { entity: String, field: String },

    #[error("Entity already exists: {entity}")]
    EntityAlreadyExists { entity: String },

    #[error("Field already exists: {entity}.{field}")]
    FieldAlreadyExists { entity: String, field: String },

    // ===== Generic =====
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

/// Conversion from ModelError to ExError
impl From<ModelError> for ExError {
    fn from(err: ModelError) -> Self {
        let message = err.to_string();
        match err {
            ModelError::Parse { .. } => ExError::new(ExErrorKind::ParseError).with_message(message),
            ModelError::InvalidRoot { .. } => {
                ExError::new(ExErrorKind::InvalidRoot).with_message(message)
            }
            ModelError::MissingEntities { .. } => {
                ExError::new(ExErrorKind::MissingEntities).with_message(message)
            }
            ModelError::DuplicateEntity { entity } => ExError::new(ExErrorKind::DuplicateEntity)
                .with_entity(entity)
                .with_message(message),
            ModelError::DuplicateField { entity, field } => {
                ExError::new(ExErrorKind::DuplicateField)
                    .with_entity(entity)
                    .with_field(field)
                    .with_message(message)
            }
            ModelError::EntityNotFound { entity } => ExError::new(ExErrorKind::NotFound)
                .with_entity(entity)
                .with_message(message),
            ModelError::FieldNotFound { entity, field } => ExError::new(ExErrorKind::NotFound)
                .with_entity(entity)
                .with_field(field)
                .with_message(message),
            ModelError::EntityAlreadyExists { entity } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity(entity)
                    .with_message(message)
            }
            ModelError::FieldAlreadyExists { entity, field } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_entity(entity)
                    .with_field(field)
                    .with_message(message)
            }
            ModelError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }
            ModelError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}
