//! GraphQL response and error payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GraphQL execution result as carried in a `next` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    /// Result data, absent when execution failed before producing any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Field and request errors
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQlError>,

    /// Protocol extensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQlResponse {
    /// Create a successful response from result data
    #[must_use]
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
            extensions: None,
        }
    }

    /// Create a failed response from an error list
    #[must_use]
    pub fn from_errors(errors: Vec<GraphQlError>) -> Self {
        Self {
            data: None,
            errors,
            extensions: None,
        }
    }

    /// Create a failed response from a single error
    #[must_use]
    pub fn from_error(error: GraphQlError) -> Self {
        Self::from_errors(vec![error])
    }

    /// Check if the response carries any errors
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// A single GraphQL error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Human-readable error description
    pub message: String,

    /// Source document locations
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<ErrorLocation>,

    /// Path to the failing response field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,

    /// Additional error metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQlError {
    /// Create an error with only a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: None,
            extensions: None,
        }
    }

    /// Attach a source location
    #[must_use]
    pub fn at_location(mut self, line: u32, column: u32) -> Self {
        self.locations.push(ErrorLocation { line, column });
        self
    }

    /// Attach a response path
    #[must_use]
    pub fn with_path(mut self, path: Value) -> Self {
        self.path = Some(path);
        self
    }
}

impl std::fmt::Display for GraphQlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A line/column position in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}
