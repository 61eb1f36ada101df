//! GraphQL request payload

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GraphQL request as carried in a `subscribe` payload
///
/// Follows the standard GraphQL-over-HTTP request shape: a document plus
/// optional operation name, variables, and extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQlRequest {
    /// GraphQL document to execute
    pub query: String,

    /// Operation to run when the document defines several
    #[serde(rename = "operationName", skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,

    /// Operation variables
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,

    /// Protocol extensions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

impl GraphQlRequest {
    /// Create a request for a bare document
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: None,
            variables: None,
            extensions: None,
        }
    }

    /// Set the operation name
    #[must_use]
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }

    /// Set the operation variables
    #[must_use]
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }
}
