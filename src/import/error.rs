use axum::http::StatusCode;
use sea_orm::DbErr;
use std::fmt;
use thiserror::Error;

/// A name lookup that did not land on exactly one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedReference {
    Brand(String),
    Warehouse(String),
    Stack { warehouse: String, stack: String },
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brand(name) => write!(f, "brand '{name}'"),
            Self::Warehouse(name) => write!(f, "warehouse '{name}'"),
            Self::Stack { warehouse, stack } => {
                write!(f, "stack '{stack}' in warehouse '{warehouse}'")
            }
        }
    }
}

/// Failures raised while turning an uploaded table into rows.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Required canonical columns are absent after renaming.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The body could not be read as a table at all. Carries the parser text.
    #[error("{0}")]
    MalformedTable(String),

    /// A cell could not be coerced to the column type.
    #[error("row {row}: invalid {column} '{value}', expected {expected}")]
    InvalidCell {
        row: usize,
        column: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("{0} not found")]
    ReferenceNotFound(UnresolvedReference),

    #[error("{0} matches more than one record")]
    AmbiguousReference(UnresolvedReference),

    #[error("store error: {0}")]
    Store(#[from] DbErr),
}

impl ImportError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingColumns(_)
            | Self::InvalidCell { .. }
            | Self::ReferenceNotFound(_)
            | Self::AmbiguousReference(_) => StatusCode::BAD_REQUEST,
            Self::MalformedTable(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Lookup failures are the only per-row errors a best-effort import may skip.
    pub fn is_reference_failure(&self) -> bool {
        matches!(
            self,
            Self::ReferenceNotFound(_) | Self::AmbiguousReference(_)
        )
    }

    pub fn row(&self) -> Option<usize> {
        match self {
            Self::InvalidCell { row, .. } => Some(*row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failed_lookup() {
        let brand = ImportError::ReferenceNotFound(UnresolvedReference::Brand("A-99".into()));
        assert_eq!(brand.to_string(), "brand 'A-99' not found");

        let stack = ImportError::ReferenceNotFound(UnresolvedReference::Stack {
            warehouse: "W2".into(),
            stack: "5".into(),
        });
        assert_eq!(stack.to_string(), "stack '5' in warehouse 'W2' not found");
    }

    #[test]
    fn missing_columns_are_listed() {
        let err = ImportError::MissingColumns(vec!["brand_name".into(), "act_date".into()]);
        assert_eq!(
            err.to_string(),
            "missing required columns: brand_name, act_date"
        );
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn only_lookups_are_skippable() {
        assert!(
            ImportError::AmbiguousReference(UnresolvedReference::Warehouse("W1".into()))
                .is_reference_failure()
        );
        assert!(!ImportError::MalformedTable("bad".into()).is_reference_failure());
        assert!(!ImportError::Store(DbErr::Custom("x".into())).is_reference_failure());
    }
}
