//! A provider backed by the Horizon HTTP API.

mod types;
mod utils;

pub use types::*;
use utils::*;

use async_trait::async_trait;
use thiserror::Error;

use lumens::{
    nets::{Network, PUBLIC_PASSPHRASE, TESTNET_PASSPHRASE},
    provider::{AccountState, ProviderError, SubmitResponse, Submitter},
    types::{account::AccountId, envelope::TransactionEnvelope},
};
use lumens_core::ser::ByteFormat;

/// The public network's Horizon instance
pub const HORIZON_PUBLIC: &str = "https://horizon.stellar.org";

/// The test network's Horizon instance
pub const HORIZON_TESTNET: &str = "https://horizon-testnet.stellar.org";

/// Errors produced by the Horizon provider.
#[derive(Debug, Error)]
pub enum HorizonError {
    /// Serde issue
    #[error(transparent)]
    SerdeError(#[from] serde_json::Error),

    /// Reqwest issue
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    /// Horizon answered with a problem document
    #[error("{0}")]
    Problem(Problem),

    /// The account's sequence number is not a decimal u64
    #[error("Invalid sequence number: {0:?}")]
    InvalidSequence(String),

    /// Bubbled up from core
    #[error(transparent)]
    SerError(#[from] lumens_core::ser::SerError),

    /// Bubbled up from transaction encoding
    #[error(transparent)]
    TxError(#[from] lumens::types::transaction::TxError),
}

impl From<Problem> for HorizonError {
    fn from(problem: Problem) -> Self {
        HorizonError::Problem(problem)
    }
}

impl From<HorizonError> for ProviderError {
    fn from(e: HorizonError) -> ProviderError {
        let from_parsing = match e {
            HorizonError::Problem(ref problem) if problem.status == 404 => {
                return ProviderError::NotFound(problem.detail.clone());
            }
            HorizonError::SerError(e) => return ProviderError::SerError(e),
            HorizonError::SerdeError(_) | HorizonError::InvalidSequence(_) => true,
            _ => false,
        };
        ProviderError::Custom {
            from_parsing,
            e: Box::new(e),
        }
    }
}

/// A provider that talks to a Horizon server. Implements `AccountState` and `Submitter`.
#[derive(Debug, Clone)]
pub struct HorizonProvider {
    api_root: String,
    client: reqwest::Client,
}

impl Default for HorizonProvider {
    fn default() -> Self {
        Self::with_api_root(HORIZON_TESTNET)
    }
}

impl HorizonProvider {
    /// Instantiate the API pointing at a specific URL
    pub fn with_api_root(api_root: &str) -> Self {
        Self {
            api_root: api_root.trim_end_matches('/').to_owned(),
            client: Default::default(),
        }
    }

    /// Instantiate the API pointing at the well-known Horizon instance for `network`. Returns
    /// `None` for networks without one.
    pub fn for_network(network: &Network) -> Option<Self> {
        match network.passphrase() {
            PUBLIC_PASSPHRASE => Some(Self::with_api_root(HORIZON_PUBLIC)),
            TESTNET_PASSPHRASE => Some(Self::with_api_root(HORIZON_TESTNET)),
            _ => None,
        }
    }

    /// Use a preconfigured client, e.g. one with timeouts or a proxy.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// The API root, without a trailing slash.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    fn account_url(&self, account: &AccountId) -> String {
        format!("{}/accounts/{}", self.api_root, account)
    }

    fn transactions_url(&self) -> String {
        format!("{}/transactions", self.api_root)
    }

    /// Fetch an account record.
    pub async fn get_account(&self, account: &AccountId) -> Result<AccountResponse, HorizonError> {
        ez_fetch_json(&self.client, &self.account_url(account)).await
    }

    /// Post a base64 envelope to the transactions endpoint.
    pub async fn post_transaction(&self, envelope_b64: &str) -> Result<SubmitResponse, HorizonError> {
        post_form(&self.client, &self.transactions_url(), &[("tx", envelope_b64)]).await
    }
}

#[async_trait]
impl AccountState for HorizonProvider {
    #[tracing::instrument(skip(self), err)]
    async fn account_sequence(&self, account: &AccountId) -> Result<u64, ProviderError> {
        let record = self.get_account(account).await?;
        Ok(record.sequence_number()?)
    }
}

#[async_trait]
impl Submitter for HorizonProvider {
    #[tracing::instrument(skip_all, err)]
    async fn submit_envelope(
        &self,
        envelope: &TransactionEnvelope,
    ) -> Result<SubmitResponse, ProviderError> {
        let encoded = envelope
            .serialize_base64()
            .map_err(HorizonError::from)?;
        let response = self.post_transaction(&encoded).await.map_err(|e| {
            if let HorizonError::Problem(problem) = &e {
                tracing::error!(
                    status = problem.status,
                    result_codes = ?problem.result_codes(),
                    "transaction rejected"
                );
            }
            e
        })?;
        tracing::debug!(hash = %response.hash, ledger = ?response.ledger, "transaction submitted");
        Ok(response)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_builds_urls() {
        let provider = HorizonProvider::with_api_root("http://localhost:8000/");
        assert_eq!(provider.api_root(), "http://localhost:8000");
        assert_eq!(
            provider.account_url(&AccountId::from_ed25519([0u8; 32])),
            "http://localhost:8000/accounts/GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF"
        );
        assert_eq!(
            provider.transactions_url(),
            "http://localhost:8000/transactions"
        );
    }

    #[test]
    fn it_picks_well_known_servers() {
        assert_eq!(
            HorizonProvider::for_network(&Network::public())
                .unwrap()
                .api_root(),
            HORIZON_PUBLIC
        );
        assert_eq!(HorizonProvider::default().api_root(), HORIZON_TESTNET);
        assert!(HorizonProvider::for_network(&Network::new("Standalone Network ; February 2017")).is_none());
    }

    #[test]
    fn it_maps_errors() {
        let missing = Problem::from_body(404, r#"{"title":"Resource Missing","status":404,"detail":"The resource at the url requested was not found."}"#);
        match ProviderError::from(HorizonError::from(missing)) {
            ProviderError::NotFound(detail) => assert!(detail.contains("not found")),
            other => panic!("expected NotFound, got {:?}", other),
        }

        let bad_seq = ProviderError::from(HorizonError::InvalidSequence("abc".to_owned()));
        assert!(bad_seq.from_parsing());

        let failed = Problem::from_body(400, r#"{"title":"Transaction Failed","status":400}"#);
        let e = ProviderError::from(HorizonError::from(failed));
        assert!(!e.from_parsing());
        assert!(e.to_string().contains("Transaction Failed"));
    }

    #[tokio::test]
    async fn it_reports_connection_failures() {
        // nothing listens on the discard port
        let provider = HorizonProvider::with_api_root("http://127.0.0.1:9");
        let err = provider
            .account_sequence(&AccountId::from_ed25519([0u8; 32]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Custom {
                from_parsing: false,
                ..
            }
        ));
    }
}
