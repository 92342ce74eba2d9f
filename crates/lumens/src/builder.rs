//! The `TransactionBuilder` assembles transactions.
//!
//! It holds the configurable parts of a transaction: the source account, optional time bounds,
//! the memo and the ordered operation list. The fee and sequence number are never stored.
//! Every call to `build`, `encode`, `hash`, `sign` or `submit` derives the fee from the
//! builder's `FeeStrategy` and fetches a fresh sequence number from the attached
//! `AccountState`. Two encodes of the same builder can therefore differ if another transaction
//! from the source account lands in between.
//!
//! The builder has no finalized state. It can be inspected, extended and re-encoded
//! indefinitely. Operations are append-only.

use std::{fmt, sync::Arc};

use lumens_core::{enc::EncodingError, ser::ByteFormat};
use thiserror::Error;

use crate::{
    fee::{FeeStrategy, FixedFee},
    hashes::TxHash,
    nets::Network,
    provider::{AccountState, ProviderError, SubmitResponse, Submitter},
    signer::TxSigner,
    types::{
        account::AccountId,
        envelope::TransactionEnvelope,
        memo::{Memo, MemoError, MemoType},
        operation::Operation,
        time_bounds::{TimeBounds, TimePoint},
        transaction::{Transaction, TxError},
    },
};

/// The external services a builder may need.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Collaborator {
    /// Supplies the source account's sequence number
    AccountState,
    /// Submits signed envelopes
    Submitter,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collaborator::AccountState => f.write_str("account state provider"),
            Collaborator::Submitter => f.write_str("submitter"),
        }
    }
}

/// Errors raised while assembling a transaction.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// The source account is not a valid account strkey.
    #[error("Invalid account id: {0}")]
    InvalidAccountId(#[from] EncodingError),

    /// The memo payload does not fit its memo type.
    #[error("Invalid memo: {0}")]
    InvalidMemo(#[from] MemoError),

    /// A network operation was requested before the service it needs was attached.
    #[error("No {0} attached to the builder")]
    MissingCollaborator(Collaborator),

    /// A collaborator failed. Its error is passed through unchanged.
    #[error(transparent)]
    CollaboratorFailure(#[from] ProviderError),

    /// The on-chain sequence number is already at its maximum.
    #[error("Sequence number overflow")]
    SequenceOverflow,

    /// The transaction could not be encoded.
    #[error(transparent)]
    TxError(#[from] TxError),
}

/// Assembles, encodes, signs and submits transactions for one source account.
#[derive(Clone)]
pub struct TransactionBuilder {
    source_account: AccountId,
    time_bounds: Option<TimeBounds>,
    memo: Memo,
    operations: Vec<Operation>,
    network: Network,
    fee_strategy: Arc<dyn FeeStrategy>,
    account_state: Option<Arc<dyn AccountState>>,
    submitter: Option<Arc<dyn Submitter>>,
}

impl fmt::Debug for TransactionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionBuilder")
            .field("source_account", &self.source_account)
            .field("time_bounds", &self.time_bounds)
            .field("memo", &self.memo)
            .field("operations", &self.operations)
            .field("network", &self.network)
            .field("fee_strategy", &self.fee_strategy)
            .field("account_state", &self.account_state.is_some())
            .field("submitter", &self.submitter.is_some())
            .finish()
    }
}

impl TransactionBuilder {
    /// Instantiate a builder for the account with strkey `source_account`. The builder starts
    /// with no time bounds, no memo and no operations.
    pub fn new(source_account: &str) -> Result<Self, BuilderError> {
        Ok(Self::from_account(source_account.parse()?))
    }

    /// Instantiate a builder for `source_account`.
    pub fn from_account(source_account: AccountId) -> Self {
        Self {
            source_account,
            time_bounds: None,
            memo: Memo::None,
            operations: vec![],
            network: Network::default(),
            fee_strategy: Arc::new(FixedFee::default()),
            account_state: None,
            submitter: None,
        }
    }

    /// Instantiate a builder from an existing transaction. Its fee and sequence number are
    /// discarded, and will be re-derived on the next build.
    pub fn from_tx(tx: &Transaction) -> Self {
        Self {
            time_bounds: tx.time_bounds().copied(),
            memo: tx.memo().clone(),
            operations: tx.operations().to_vec(),
            ..Self::from_account(*tx.source_account())
        }
    }

    // -- CONFIGURATION -- //

    /// Set the network whose id is mixed into transaction hashes.
    pub fn network(mut self, network: Network) -> Self {
        self.network = network;
        self
    }

    /// Attach the account state collaborator used to resolve sequence numbers.
    pub fn account_state<P>(mut self, provider: P) -> Self
    where
        P: AccountState + 'static,
    {
        self.account_state = Some(Arc::new(provider));
        self
    }

    /// Attach the collaborator used by `submit`.
    pub fn submitter<S>(mut self, submitter: S) -> Self
    where
        S: Submitter + 'static,
    {
        self.submitter = Some(Arc::new(submitter));
        self
    }

    /// Replace the fee strategy.
    pub fn fee_strategy<F>(mut self, strategy: F) -> Self
    where
        F: FeeStrategy + 'static,
    {
        self.fee_strategy = Arc::new(strategy);
        self
    }

    /// Append an operation. Operations execute in the order they are appended.
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Append several operations, in iteration order.
    pub fn extend_operations<I>(mut self, operations: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.operations.extend(operations);
        self
    }

    /// Replace the memo.
    pub fn memo(mut self, memo: Memo) -> Self {
        self.memo = memo;
        self
    }

    /// Replace the memo with one built from a raw payload. The payload is validated before the
    /// builder is touched, so a rejected memo leaves the previous one in place.
    pub fn set_memo(&mut self, kind: MemoType, payload: &[u8]) -> Result<&mut Self, BuilderError> {
        self.memo = Memo::new(kind, payload)?;
        Ok(self)
    }

    /// Set either bound of the validity window. A `Some` bound is written, a `None` bound is
    /// left as it was. Setting any bound makes the window present. No ordering between the
    /// bounds is enforced.
    pub fn time_bounds(mut self, min_time: Option<TimePoint>, max_time: Option<TimePoint>) -> Self {
        if min_time.is_none() && max_time.is_none() {
            return self;
        }
        let mut bounds = self.time_bounds.unwrap_or_default();
        if let Some(min_time) = min_time {
            bounds.min_time = min_time;
        }
        if let Some(max_time) = max_time {
            bounds.max_time = max_time;
        }
        self.time_bounds = Some(bounds);
        self
    }

    /// Set the earliest time the transaction is valid.
    pub fn min_time(self, min_time: impl Into<TimePoint>) -> Self {
        self.time_bounds(Some(min_time.into()), None)
    }

    /// Set the latest time the transaction is valid.
    pub fn max_time(self, max_time: impl Into<TimePoint>) -> Self {
        self.time_bounds(None, Some(max_time.into()))
    }

    /// Remove the validity window entirely.
    pub fn clear_time_bounds(mut self) -> Self {
        self.time_bounds = None;
        self
    }

    // -- INSPECTION -- //

    /// The source account.
    pub fn source_account(&self) -> &AccountId {
        &self.source_account
    }

    /// The current memo.
    pub fn memo_ref(&self) -> &Memo {
        &self.memo
    }

    /// The current validity window.
    pub fn time_bounds_ref(&self) -> Option<&TimeBounds> {
        self.time_bounds.as_ref()
    }

    /// The operations appended so far.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The configured network.
    pub fn network_ref(&self) -> &Network {
        &self.network
    }

    // -- ASSEMBLY -- //

    /// The fee for the current operation list.
    pub fn compute_fee(&self) -> u32 {
        self.fee_strategy.fee(self.operations.len())
    }

    /// Fetch the source account's current sequence number and return the next one. This always
    /// queries the collaborator. Nothing is cached.
    #[tracing::instrument(skip_all, err, fields(account = %self.source_account))]
    pub async fn resolve_sequence_number(&self) -> Result<u64, BuilderError> {
        let provider = self
            .account_state
            .as_ref()
            .ok_or(BuilderError::MissingCollaborator(Collaborator::AccountState))?;
        let current = provider.account_sequence(&self.source_account).await?;
        let next = current
            .checked_add(1)
            .ok_or(BuilderError::SequenceOverflow)?;
        tracing::debug!(current, next, "resolved sequence number");
        Ok(next)
    }

    /// Assemble the transaction with an explicit sequence number.
    pub fn build_with_sequence(&self, seq_num: u64) -> Transaction {
        if let Some(bounds) = self.time_bounds.as_ref().filter(|b| b.is_inverted()) {
            tracing::warn!(
                min_time = bounds.min_time.as_secs(),
                max_time = bounds.max_time.as_secs(),
                "time bounds are inverted. The network will reject this transaction"
            );
        }
        Transaction::new(
            self.source_account,
            self.compute_fee(),
            seq_num,
            self.time_bounds,
            self.memo.clone(),
            self.operations.clone(),
        )
    }

    /// Resolve the sequence number and assemble the transaction.
    pub async fn build(&self) -> Result<Transaction, BuilderError> {
        let seq_num = self.resolve_sequence_number().await?;
        Ok(self.build_with_sequence(seq_num))
    }

    /// Encode the transaction with an explicit sequence number. Deterministic.
    pub fn encode_with_sequence(&self, seq_num: u64) -> Result<Vec<u8>, BuilderError> {
        let encoded = self.build_with_sequence(seq_num).to_bytes()?;
        tracing::debug!(len = encoded.len(), seq_num, "encoded transaction");
        Ok(encoded)
    }

    /// Resolve the sequence number and encode the transaction.
    pub async fn encode(&self) -> Result<Vec<u8>, BuilderError> {
        let seq_num = self.resolve_sequence_number().await?;
        self.encode_with_sequence(seq_num)
    }

    /// Resolve the sequence number and hash the transaction for the configured network.
    pub async fn hash(&self) -> Result<TxHash, BuilderError> {
        Ok(self.build().await?.hash(&self.network)?)
    }

    /// Resolve the sequence number, then build and sign an envelope.
    pub async fn sign<S>(&self, signer: &S) -> Result<TransactionEnvelope, BuilderError>
    where
        S: TxSigner + ?Sized,
    {
        let tx = self.build().await?;
        let hash = tx.hash(&self.network)?;
        let mut envelope = TransactionEnvelope::new(tx);
        envelope.add_signature(signer.decorated_signature(&hash));
        Ok(envelope)
    }

    /// Build, sign and submit the transaction. Fails before any network access if no submitter
    /// is attached.
    #[tracing::instrument(skip_all, err, fields(account = %self.source_account))]
    pub async fn submit<S>(&self, signer: &S) -> Result<SubmitResponse, BuilderError>
    where
        S: TxSigner + ?Sized,
    {
        let submitter = self
            .submitter
            .as_ref()
            .ok_or(BuilderError::MissingCollaborator(Collaborator::Submitter))?;
        let envelope = self.sign(signer).await?;
        Ok(submitter.submit_envelope(&envelope).await?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::operation::STROOPS_PER_LUMEN;

    fn builder() -> TransactionBuilder {
        TransactionBuilder::from_account(AccountId::from_ed25519([1u8; 32]))
    }

    #[test]
    fn it_starts_empty() {
        let b = TransactionBuilder::new("GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF")
            .unwrap();
        assert_eq!(b.source_account().as_bytes(), &[0u8; 32]);
        assert!(b.time_bounds_ref().is_none());
        assert!(b.memo_ref().is_none());
        assert!(b.operations().is_empty());
        assert_eq!(b.network_ref(), &Network::testnet());
        assert_eq!(b.compute_fee(), 0);
    }

    #[test]
    fn it_rejects_bad_account_ids() {
        match TransactionBuilder::new("GABC") {
            Err(BuilderError::InvalidAccountId(_)) => {}
            other => panic!("expected InvalidAccountId, got {:?}", other),
        }
    }

    #[test]
    fn it_keeps_the_old_memo_on_failure() {
        let mut b = builder().memo(Memo::id(5));
        match b.set_memo(MemoType::Text, &[b'a'; 29]) {
            Err(BuilderError::InvalidMemo(MemoError::TextTooLong(29))) => {}
            other => panic!("expected InvalidMemo, got {:?}", other),
        }
        assert_eq!(b.memo_ref(), &Memo::Id(5));

        b.set_memo(MemoType::Hash, &[7u8; 32]).unwrap();
        assert_eq!(b.memo_ref(), &Memo::Hash([7u8; 32]));
    }

    #[test]
    fn it_sets_bounds_independently() {
        let b = builder().max_time(500u64);
        assert_eq!(
            b.time_bounds_ref(),
            Some(&TimeBounds::new(0u64, 500u64))
        );

        let b = b.min_time(100u64);
        assert_eq!(
            b.time_bounds_ref(),
            Some(&TimeBounds::new(100u64, 500u64))
        );

        let b = b.time_bounds(None, None);
        assert_eq!(
            b.time_bounds_ref(),
            Some(&TimeBounds::new(100u64, 500u64))
        );

        // inverted windows are accepted
        let b = b.min_time(900u64);
        assert!(b.time_bounds_ref().unwrap().is_inverted());
        assert_eq!(b.encode_with_sequence(1).unwrap().len(), 36 + 4 + 8 + 20 + 4 + 4 + 4);

        assert!(b.clear_time_bounds().time_bounds_ref().is_none());
    }

    #[test]
    fn it_derives_the_fee_from_the_operations() {
        let op = Operation::create_account(AccountId::from_ed25519([2u8; 32]), STROOPS_PER_LUMEN);
        let b = builder().extend_operations(vec![op.clone(), op.clone(), op]);
        assert_eq!(b.compute_fee(), 300);
        assert_eq!(b.fee_strategy(FixedFee::new(1000)).compute_fee(), 3000);
    }

    #[test]
    fn it_round_trips_through_transactions() {
        let b = builder()
            .memo(Memo::text("round trip").unwrap())
            .min_time(10u64)
            .operation(Operation::bump_sequence(4));
        let tx = b.build_with_sequence(8);
        let rebuilt = TransactionBuilder::from_tx(&tx);
        assert_eq!(rebuilt.build_with_sequence(8), tx);
    }
}
