//! Error types for the Agency service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AgencyError>;

#[derive(Error, Debug)]
pub enum AgencyError {
    #[error("{field} is required")]
    Validation { field: String },

    #[error("Agent not found: {agent_id}")]
    AgentNotFound { agent_id: String },

    #[error("Storage operation failed: {reason}")]
    Storage { reason: String },

    #[error("Invalid configuration: {reason}")]
    Config { reason: String },
}

impl AgencyError {
    pub fn required(field: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
        }
    }

    pub fn not_found(agent_id: impl Into<String>) -> Self {
        Self::AgentNotFound {
            agent_id: agent_id.into(),
        }
    }

    pub fn storage(reason: impl ToString) -> Self {
        Self::Storage {
            reason: reason.to_string(),
        }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_reads_as_field_message() {
        assert_eq!(AgencyError::required("name").to_string(), "name is required");
        assert_eq!(
            AgencyError::required("gender").to_string(),
            "gender is required"
        );
    }

    #[test]
    fn not_found_includes_agent_id() {
        let err = AgencyError::not_found("42");
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn storage_keeps_reason() {
        let err = AgencyError::storage("connection refused");
        assert_eq!(
            err.to_string(),
            "Storage operation failed: connection refused"
        );
    }
}
