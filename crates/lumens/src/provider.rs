//! Interfaces to the network: account state lookup and envelope submission.

use std::sync::Arc;

use async_trait::async_trait;
use lumens_core::ser::SerError;
use thiserror::Error;

use crate::types::{account::AccountId, envelope::TransactionEnvelope};

/// Errors thrown by network collaborators.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The remote has no record of the requested object, e.g. an unfunded account.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bubbled up from core
    #[error(transparent)]
    SerError(#[from] SerError),

    /// Custom provider error. Indicates whether the failure happened while parsing a response.
    #[error("Provider error {e}")]
    Custom {
        /// Whether the error happened while parsing a response
        from_parsing: bool,
        /// The error
        e: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ProviderError {
    /// Shortcut for instantiating a custom error
    pub fn custom(from_parsing: bool, e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self::Custom { from_parsing, e }
    }

    /// Returns true if the request failed due to a local parsing error.
    pub fn from_parsing(&self) -> bool {
        matches!(
            self,
            ProviderError::Custom {
                from_parsing: true,
                ..
            } | ProviderError::SerError(_)
        )
    }
}

/// The result of submitting an envelope.
#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SubmitResponse {
    /// The transaction hash, as hex
    pub hash: String,
    /// The ledger that included the transaction, if known
    #[serde(default)]
    pub ledger: Option<u32>,
    /// Whether the transaction succeeded, if known
    #[serde(default)]
    pub successful: Option<bool>,
    /// The base64 transaction result, if returned
    #[serde(default)]
    pub result_xdr: Option<String>,
}

/// Looks up on-chain account state.
#[async_trait]
pub trait AccountState: Send + Sync {
    /// Fetch the current on-chain sequence number of `account`.
    async fn account_sequence(&self, account: &AccountId) -> Result<u64, ProviderError>;
}

/// Submits signed envelopes to the network.
#[async_trait]
pub trait Submitter: Send + Sync {
    /// Submit `envelope` and wait for the network's verdict.
    async fn submit_envelope(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SubmitResponse, ProviderError>;
}

#[async_trait]
impl<T> AccountState for Arc<T>
where
    T: AccountState + ?Sized,
{
    async fn account_sequence(&self, account: &AccountId) -> Result<u64, ProviderError> {
        (**self).account_sequence(account).await
    }
}

#[async_trait]
impl<T> Submitter for Arc<T>
where
    T: Submitter + ?Sized,
{
    async fn submit_envelope(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SubmitResponse, ProviderError> {
        (**self).submit_envelope(envelope).await
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_flags_parsing_errors() {
        assert!(ProviderError::from(SerError::InvalidFlag(3)).from_parsing());
        assert!(!ProviderError::NotFound("GABC".to_owned()).from_parsing());

        let e: Box<dyn std::error::Error + Send + Sync> = "bad json".into();
        assert!(ProviderError::custom(true, e).from_parsing());
    }

    #[test]
    fn it_parses_submit_responses() {
        let json = r#"{"hash": "abcd", "ledger": 12}"#;
        let response: SubmitResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.hash, "abcd");
        assert_eq!(response.ledger, Some(12));
        assert_eq!(response.successful, None);
    }
}
