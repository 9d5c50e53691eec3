//! Error types for loading, transforming and plotting benchmark tables

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// File could not be read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON.
    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Document is valid JSON but not shaped as `{key: {name: value}}`.
    #[error("unexpected layout in {}: {reason}", path.display())]
    Layout { path: PathBuf, reason: String },

    /// A required column is absent from a frame.
    #[error("column `{0}` not found")]
    MissingColumn(String),

    /// A row key appears more than once.
    #[error("duplicate matrix key `{0}`")]
    DuplicateKey(String),

    /// Cell data does not match the index and column lengths.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Statistics could not be written to the console.
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),

    /// The plotting backend failed.
    #[error("plot rendering failed: {0}")]
    Plot(String),
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_missing_column() {
        let err = AnalysisError::MissingColumn("GPU COO".to_string());
        assert_eq!(err.to_string(), "column `GPU COO` not found");
    }

    #[test]
    fn test_display_layout_names_path() {
        let err = AnalysisError::Layout {
            path: PathBuf::from("results/float.json"),
            reason: "top level is not an object".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("results/float.json"));
        assert!(msg.contains("top level is not an object"));
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error as _;
        let err = AnalysisError::Io {
            path: PathBuf::from("missing.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
    }
}
