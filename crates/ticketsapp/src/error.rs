use thiserror::Error;

#[derive(Error, Debug)]
pub enum TicketsError {
    #[error("{record} not found: {id}")]
    NotFound { record: &'static str, id: i64 },

    #[error("Cannot filter {record} by `{field}`: {reason}")]
    UnknownField {
        record: &'static str,
        field: String,
        reason: &'static str,
    },

    #[error("Invalid value for {record}.{field}: {value}")]
    InvalidFilterValue {
        record: &'static str,
        field: String,
        value: String,
    },

    #[error("Invalid {record}: {reason}")]
    Invalid {
        record: &'static str,
        reason: String,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Cannot map {from} into {into}: field `{field}` {reason}")]
    Mapping {
        from: &'static str,
        into: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl TicketsError {
    pub(crate) fn unknown_field(record: &'static str, field: &str) -> Self {
        TicketsError::UnknownField {
            record,
            field: field.to_string(),
            reason: "no such filterable field",
        }
    }

    pub(crate) fn not_textual(record: &'static str, field: &str) -> Self {
        TicketsError::UnknownField {
            record,
            field: field.to_string(),
            reason: "`contains` only applies to textual fields",
        }
    }
}

pub type Result<T> = std::result::Result<T, TicketsError>;
