//! Conversions from external infrastructure errors into domain errors.

use console_domain::ConsoleError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ConsoleError);

impl From<InfraError> for ConsoleError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ConsoleError> for InfraError {
    fn from(value: ConsoleError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoConsoleError {
    fn into_console(self) -> ConsoleError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ConsoleError */
/* -------------------------------------------------------------------------- */

impl IntoConsoleError for HttpError {
    fn into_console(self) -> ConsoleError {
        if self.is_timeout() {
            return ConsoleError::network("HTTP request timed out");
        }

        if self.is_connect() {
            return ConsoleError::network(format!("HTTP connection failure: {self}"));
        }

        // Body decoding happens after a success status was seen.
        if self.is_decode() {
            return ConsoleError::decode(format!("failed to decode response body: {self}"));
        }

        if self.is_builder() {
            return ConsoleError::internal(format!("failed to build HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return ConsoleError::remote(status.as_u16(), reason);
        }

        ConsoleError::network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_console())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → ConsoleError */
/* -------------------------------------------------------------------------- */

impl IntoConsoleError for JsonError {
    fn into_console(self) -> ConsoleError {
        use serde_json::error::Category;

        match self.classify() {
            Category::Io => ConsoleError::network(format!("I/O error while reading JSON: {self}")),
            Category::Syntax | Category::Data | Category::Eof => {
                ConsoleError::decode(format!("response did not match contract: {self}"))
            }
        }
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_console())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → ConsoleError */
/* -------------------------------------------------------------------------- */

impl IntoConsoleError for TomlError {
    fn into_console(self) -> ConsoleError {
        ConsoleError::config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_console())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
