use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Where the API key of a request came from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum CredentialsIdent {
    /// Default key from [`crate::config::AnthropicConfig`].
    Config,
    /// Key passed explicitly as an override.
    Own,
}

impl Display for CredentialsIdent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialsIdent::Config => write!(f, "config"),
            CredentialsIdent::Own => write!(f, "own"),
        }
    }
}
