//! Multi-token batch building and submission
//!
//! A `MultiTokenBatch` lives for one form session. The user adds tokens,
//! types amounts and, for transfers, a recipient; every edit is validated on
//! the spot and the batch can only be submitted once every line is valid.
//! Submission hands the lines to a `BatchSubmitter` and then waits for an
//! explicit confirmation before the session reports that it may close.

use crate::core::validation::{validate_amount, validate_recipient};
use crate::domain::entities::{OperationEntry, OperationRequest, Token};
use crate::shared::constants::MAX_BATCH_SIZE;
use crate::shared::error::VaultError;
use crate::shared::types::{
    Address, OperationKind, RateLimitStatus, SubmissionState, TransactionHash, TransferItem,
    VaultResult,
};
use crate::shared::utils::current_timestamp_ms;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// One token line of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub token: Token,
    pub amount: String,
    pub valid: bool,
    pub error: Option<String>,
}

impl BatchEntry {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            amount: String::new(),
            valid: false,
            error: None,
        }
    }

    fn set_amount(&mut self, amount: &str) {
        self.amount = amount.to_string();
        match validate_amount(amount, &self.token) {
            Ok(_) => {
                self.valid = true;
                self.error = None;
            }
            Err(issue) => {
                self.valid = false;
                self.error = Some(issue.to_string());
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        self.valid && !self.amount.is_empty()
    }
}

/// Result of trying to add a token; rejected additions change nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddTokenOutcome {
    Added,
    Duplicate,
    BatchFull,
    NativeNotAllowed,
}

/// Ordered token lines, unique by address, at most `MAX_BATCH_SIZE` long
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    entries: Vec<BatchEntry>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_BATCH_SIZE
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&BatchEntry> {
        self.entries.get(index)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.entries.iter().any(|entry| entry.token.has_address(address))
    }

    pub fn push(&mut self, token: Token) -> AddTokenOutcome {
        if self.contains(&token.address) {
            return AddTokenOutcome::Duplicate;
        }
        if self.is_full() {
            return AddTokenOutcome::BatchFull;
        }
        self.entries.push(BatchEntry::new(token));
        AddTokenOutcome::Added
    }

    pub fn set_amount(&mut self, index: usize, amount: &str) -> VaultResult<()> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(VaultError::IndexOutOfRange { index, len })?;
        entry.set_amount(amount);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> VaultResult<BatchEntry> {
        if index >= self.entries.len() {
            return Err(VaultError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Non-empty and every line valid with an amount
    pub fn all_ready(&self) -> bool {
        !self.entries.is_empty() && self.entries.iter().all(BatchEntry::is_ready)
    }

    pub fn to_items(&self) -> Vec<TransferItem> {
        self.entries
            .iter()
            .map(|entry| TransferItem {
                token_address: entry.token.address.clone(),
                amount: entry.amount.clone(),
            })
            .collect()
    }
}

/// Payload handed to a submitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSubmission {
    pub kind: OperationKind,
    pub items: Vec<TransferItem>,
    pub recipient: Option<Address>,
    pub sender: Option<Address>,
    /// Token snapshots the items were built from, same order
    pub tokens: Vec<Token>,
}

impl BatchSubmission {
    /// Rebuild the multi-token request the items describe
    pub fn to_request(&self) -> VaultResult<OperationRequest> {
        if self.items.len() != self.tokens.len() {
            return Err(VaultError::internal(format!(
                "{} items but {} token snapshots",
                self.items.len(),
                self.tokens.len()
            )));
        }
        let entries = self
            .items
            .iter()
            .zip(&self.tokens)
            .map(|(item, token)| OperationEntry::new(token.clone(), item.amount.clone()))
            .collect();

        let mut request = OperationRequest::multi(self.kind, entries);
        if let Some(recipient) = &self.recipient {
            request = request.with_recipient(recipient.as_str());
        }
        if let Some(sender) = &self.sender {
            request = request.with_sender(sender.as_str());
        }
        Ok(request)
    }
}

/// Receives a ready batch and broadcasts it
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BatchSubmitter: Send + Sync {
    async fn submit_batch(&self, submission: &BatchSubmission) -> VaultResult<TransactionHash>;
}

/// One multi-token deposit, withdraw or transfer form session
#[derive(Debug, Clone)]
pub struct MultiTokenBatch {
    kind: OperationKind,
    batch: Batch,
    recipient: String,
    sender: Option<Address>,
    rate_limit: Option<RateLimitStatus>,
    state: SubmissionState,
    open: bool,
}

impl MultiTokenBatch {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            batch: Batch::new(),
            recipient: String::new(),
            sender: None,
            rate_limit: None,
            state: SubmissionState::Idle,
            open: false,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Start a fresh session
    pub fn open(&mut self) {
        self.reset();
        self.open = true;
        log::info!("Opened {} batch", self.kind);
    }

    /// End the session and drop everything it collected.
    /// An in-flight submission is not cancelled.
    pub fn close(&mut self) {
        if self.state.is_in_flight() {
            log::warn!("Closing {} batch with a submission still in flight", self.kind);
        }
        self.reset();
        self.open = false;
    }

    fn reset(&mut self) {
        self.batch.clear();
        self.recipient.clear();
        self.state = SubmissionState::Idle;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn batch(&self) -> &Batch {
        &self.batch
    }

    pub fn entries(&self) -> &[BatchEntry] {
        self.batch.entries()
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.recipient = recipient.into();
    }

    /// Inline message for the recipient field; `None` when valid or not needed
    pub fn recipient_error(&self) -> Option<String> {
        if !self.kind.requires_recipient() {
            return None;
        }
        validate_recipient(&self.recipient, self.sender.as_deref())
            .err()
            .map(|issue| issue.to_string())
    }

    /// Acting account, used to refuse transfers to oneself
    pub fn set_sender(&mut self, sender: Option<Address>) {
        self.sender = sender;
    }

    pub fn set_rate_limit(&mut self, status: Option<RateLimitStatus>) {
        self.rate_limit = status;
    }

    pub fn rate_limit(&self) -> Option<&RateLimitStatus> {
        self.rate_limit.as_ref()
    }

    pub fn submission_state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn add_token(&mut self, token: Token) -> AddTokenOutcome {
        if self.kind == OperationKind::Transfer && token.is_native_asset() {
            return AddTokenOutcome::NativeNotAllowed;
        }
        let symbol = token.symbol.clone();
        let outcome = self.batch.push(token);
        log::debug!("add_token {} -> {:?}", symbol, outcome);
        outcome
    }

    pub fn set_amount(&mut self, index: usize, amount: &str) -> VaultResult<()> {
        self.batch.set_amount(index, amount)
    }

    pub fn remove_token(&mut self, index: usize) -> VaultResult<Token> {
        self.batch.remove(index).map(|entry| entry.token)
    }

    /// Tokens that may still be added from `available`
    pub fn selectable_tokens(&self, available: &[Token]) -> Vec<Token> {
        available
            .iter()
            .filter(|token| !(self.kind == OperationKind::Transfer && token.is_native_asset()))
            .filter(|token| !self.batch.contains(&token.address))
            .cloned()
            .collect()
    }

    pub fn is_submit_ready(&self) -> bool {
        if !self.open {
            return false;
        }
        if self.kind.requires_recipient() && self.recipient_error().is_some() {
            return false;
        }
        self.batch.all_ready()
    }

    pub async fn submit(&mut self, submitter: &dyn BatchSubmitter) -> VaultResult<TransactionHash> {
        self.submit_at(submitter, current_timestamp_ms()).await
    }

    /// Submit with an explicit clock, for rate-limit gating
    pub async fn submit_at(
        &mut self,
        submitter: &dyn BatchSubmitter,
        now_ms: u64,
    ) -> VaultResult<TransactionHash> {
        if self.state.is_in_flight() {
            return Err(VaultError::not_ready("a submission is already in flight"));
        }
        if !self.open {
            return Err(VaultError::not_ready("batch session is closed"));
        }
        if !self.is_submit_ready() {
            return Err(VaultError::not_ready("batch has missing or invalid fields"));
        }
        if let Some(status) = &self.rate_limit {
            if !status.allows_submission(now_ms) {
                return Err(VaultError::RateLimited {
                    reset_in_secs: status.time_until_reset(now_ms).as_secs(),
                });
            }
        }

        let submission = BatchSubmission {
            kind: self.kind,
            items: self.batch.to_items(),
            recipient: self
                .kind
                .requires_recipient()
                .then(|| self.recipient.clone()),
            sender: self.sender.clone(),
            tokens: self.batch.entries().iter().map(|entry| entry.token.clone()).collect(),
        };

        self.state = SubmissionState::Submitting;
        log::info!("Submitting {} batch of {} token(s)", self.kind, submission.items.len());

        match submitter.submit_batch(&submission).await {
            Ok(hash) => {
                self.state = SubmissionState::AwaitingConfirmation(hash.clone());
                Ok(hash)
            }
            Err(err) => {
                log::warn!("{} batch submission failed: {}", self.kind, err);
                self.state = SubmissionState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Record that the transaction `hash` is confirmed; returns whether it matched.
    /// A match ends the session: the entries stay readable but nothing can be
    /// submitted again until `open`.
    pub fn confirm(&mut self, hash: &str) -> bool {
        match &self.state {
            SubmissionState::AwaitingConfirmation(pending)
                if pending.eq_ignore_ascii_case(hash) =>
            {
                log::info!("{} batch confirmed in {}", self.kind, hash);
                self.state = SubmissionState::Confirmed(pending.clone());
                self.open = false;
                true
            }
            _ => false,
        }
    }

    /// Record that the transaction `hash` failed on chain; the batch stays for a retry
    pub fn confirmation_failed(&mut self, hash: &str, reason: impl Into<String>) -> bool {
        match &self.state {
            SubmissionState::AwaitingConfirmation(pending)
                if pending.eq_ignore_ascii_case(hash) =>
            {
                self.state = SubmissionState::Failed(reason.into());
                true
            }
            _ => false,
        }
    }

    /// The form may close only after a confirmed transaction
    pub fn should_close(&self) -> bool {
        matches!(self.state, SubmissionState::Confirmed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::NATIVE_TOKEN_ADDRESS;

    const RECIPIENT: &str = "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6";

    fn token(index: usize, balance: &str) -> Token {
        Token::new(format!("0x{:040x}", index + 1), format!("TK{}", index), balance, 18)
    }

    fn transfer_batch() -> MultiTokenBatch {
        let mut batch = MultiTokenBatch::new(OperationKind::Transfer);
        batch.open();
        batch
    }

    #[test]
    fn test_add_token_rejects_duplicates() {
        let mut batch = transfer_batch();
        assert_eq!(batch.add_token(token(0, "1")), AddTokenOutcome::Added);
        let before = batch.batch().clone();

        let mut again = token(0, "5");
        again.address = again.address.to_uppercase().replacen("0X", "0x", 1);
        assert_eq!(batch.add_token(again), AddTokenOutcome::Duplicate);
        assert_eq!(batch.batch(), &before);
    }

    #[test]
    fn test_add_token_caps_at_max_batch_size() {
        let mut batch = transfer_batch();
        for i in 0..MAX_BATCH_SIZE {
            assert_eq!(batch.add_token(token(i, "1")), AddTokenOutcome::Added);
        }
        assert_eq!(batch.add_token(token(MAX_BATCH_SIZE, "1")), AddTokenOutcome::BatchFull);
        assert_eq!(batch.batch().len(), 25);
    }

    #[test]
    fn test_new_entry_starts_invalid_and_empty() {
        let mut batch = transfer_batch();
        batch.add_token(token(0, "1"));
        let entry = &batch.entries()[0];
        assert!(entry.amount.is_empty());
        assert!(!entry.valid);
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_transfer_excludes_native() {
        let mut batch = transfer_batch();
        assert_eq!(batch.add_token(Token::native("ETH", "1", 18)), AddTokenOutcome::NativeNotAllowed);
        assert!(batch.batch().is_empty());

        let mut deposit = MultiTokenBatch::new(OperationKind::Deposit);
        deposit.open();
        assert_eq!(deposit.add_token(Token::native("ETH", "1", 18)), AddTokenOutcome::Added);
    }

    #[test]
    fn test_selectable_tokens() {
        let mut batch = transfer_batch();
        let pool = vec![Token::native("ETH", "1", 18), token(0, "1"), token(1, "1")];
        batch.add_token(token(0, "1"));

        let selectable = batch.selectable_tokens(&pool);
        assert_eq!(selectable.len(), 1);
        assert_eq!(selectable[0].address, token(1, "1").address);
        assert!(selectable.iter().all(|t| t.address != NATIVE_TOKEN_ADDRESS));
    }

    #[test]
    fn test_set_amount_validates_only_that_entry() {
        let mut batch = transfer_batch();
        batch.add_token(token(0, "10"));
        batch.add_token(token(1, "10"));

        batch.set_amount(0, "11").expect("in range");
        batch.set_amount(1, "3").expect("in range");

        assert!(!batch.entries()[0].valid);
        assert_eq!(batch.entries()[0].error.as_deref(), Some("Insufficient balance"));
        assert!(batch.entries()[1].valid);
        assert!(batch.entries()[1].error.is_none());

        batch.set_amount(0, "2").expect("in range");
        assert!(batch.entries()[0].valid);
        assert!(batch.entries()[0].error.is_none());
    }

    #[test]
    fn test_set_amount_out_of_range_is_noop() {
        let mut batch = transfer_batch();
        batch.add_token(token(0, "10"));
        let before = batch.batch().clone();

        let err = batch.set_amount(3, "1").unwrap_err();
        assert!(matches!(err, VaultError::IndexOutOfRange { index: 3, len: 1 }));
        assert_eq!(batch.batch(), &before);
    }

    #[test]
    fn test_remove_token_shifts_and_keeps_validity() {
        let mut batch = transfer_batch();
        for i in 0..3 {
            batch.add_token(token(i, "10"));
        }
        batch.set_amount(2, "1").expect("in range");

        let removed = batch.remove_token(0).expect("in range");
        assert_eq!(removed.symbol, "TK0");
        assert_eq!(batch.entries().len(), 2);
        assert_eq!(batch.entries()[1].token.symbol, "TK2");
        assert!(batch.entries()[1].valid);
        assert!(batch.remove_token(5).is_err());
    }

    #[test]
    fn test_submit_ready_rules() {
        let mut batch = transfer_batch();
        batch.set_recipient(RECIPIENT);
        assert!(!batch.is_submit_ready(), "empty batch");

        batch.add_token(token(0, "10"));
        batch.add_token(token(1, "10"));
        batch.set_amount(0, "5").expect("in range");
        batch.set_amount(1, "50").expect("in range");
        assert!(!batch.is_submit_ready(), "one entry exceeds balance");

        batch.set_amount(1, "5").expect("in range");
        assert!(batch.is_submit_ready());

        for bad in ["", "0x123", "742d35Cc6634C0532925a3b8D4C9db96C4b4d8b6", "0x742d35Cc6634C0532925a3b8D4C9db96C4b4d8bZ"] {
            batch.set_recipient(bad);
            assert!(!batch.is_submit_ready(), "recipient {bad:?}");
        }
    }

    #[test]
    fn test_withdraw_needs_no_recipient() {
        let mut batch = MultiTokenBatch::new(OperationKind::Withdraw);
        batch.open();
        batch.add_token(token(0, "10"));
        batch.set_amount(0, "1").expect("in range");
        assert!(batch.recipient_error().is_none());
        assert!(batch.is_submit_ready());
    }

    #[test]
    fn test_self_transfer_is_not_ready() {
        let mut batch = transfer_batch();
        batch.set_sender(Some(RECIPIENT.to_lowercase()));
        batch.set_recipient(RECIPIENT);
        batch.add_token(token(0, "10"));
        batch.set_amount(0, "1").expect("in range");
        assert_eq!(batch.recipient_error().as_deref(), Some("Cannot transfer to yourself"));
        assert!(!batch.is_submit_ready());
    }

    #[test]
    fn test_open_and_close_reset_session() {
        let mut batch = transfer_batch();
        batch.add_token(token(0, "10"));
        batch.set_recipient(RECIPIENT);
        batch.close();
        assert!(!batch.is_open());
        assert!(batch.batch().is_empty());
        assert!(batch.recipient().is_empty());
    }

    fn ready_transfer() -> MultiTokenBatch {
        let mut batch = transfer_batch();
        batch.set_recipient(RECIPIENT);
        batch.add_token(token(0, "10"));
        batch.add_token(token(1, "10"));
        batch.set_amount(0, "1.5").expect("in range");
        batch.set_amount(1, "2").expect("in range");
        batch
    }

    #[tokio::test]
    async fn test_submit_maps_entries_and_waits_for_confirmation() {
        let mut batch = ready_transfer();
        let mut submitter = MockBatchSubmitter::new();
        submitter
            .expect_submit_batch()
            .withf(|submission| {
                submission.kind == OperationKind::Transfer
                    && submission.recipient.as_deref() == Some(RECIPIENT)
                    && submission.items
                        == vec![
                            TransferItem {
                                token_address: format!("0x{:040x}", 1),
                                amount: "1.5".to_string(),
                            },
                            TransferItem {
                                token_address: format!("0x{:040x}", 2),
                                amount: "2".to_string(),
                            },
                        ]
            })
            .times(1)
            .returning(|_| Ok("0xabc".to_string()));

        let hash = batch.submit(&submitter).await.expect("submitted");
        assert_eq!(hash, "0xabc");
        assert_eq!(
            batch.submission_state(),
            &SubmissionState::AwaitingConfirmation("0xabc".to_string())
        );
        assert!(!batch.should_close());

        assert!(!batch.confirm("0xother"));
        assert!(batch.confirm("0xABC"));
        assert!(batch.should_close());
        assert!(!batch.is_open());
    }

    #[tokio::test]
    async fn test_confirmed_batch_cannot_be_resubmitted() {
        let mut batch = MultiTokenBatch::new(OperationKind::Withdraw);
        batch.open();
        batch.add_token(token(0, "10"));
        batch.set_amount(0, "1").expect("in range");

        let mut submitter = MockBatchSubmitter::new();
        submitter.expect_submit_batch().times(1).returning(|_| Ok("0x1".to_string()));

        batch.submit(&submitter).await.expect("submitted");
        assert!(batch.confirm("0x1"));
        assert!(!batch.is_submit_ready());

        let err = batch.submit(&submitter).await.unwrap_err();
        assert!(matches!(err, VaultError::NotReady(_)));
        assert_eq!(batch.submission_state(), &SubmissionState::Confirmed("0x1".to_string()));

        // A fresh session starts over
        batch.open();
        assert!(batch.batch().is_empty());
        assert_eq!(batch.submission_state(), &SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_batch() {
        let mut batch = ready_transfer();
        let mut submitter = MockBatchSubmitter::new();
        submitter
            .expect_submit_batch()
            .times(1)
            .returning(|_| Err(VaultError::transaction("user rejected")));

        assert!(batch.submit(&submitter).await.is_err());
        assert!(matches!(batch.submission_state(), SubmissionState::Failed(_)));
        assert_eq!(batch.entries().len(), 2);
        assert!(batch.is_submit_ready());
    }

    #[tokio::test]
    async fn test_submit_refuses_unready_batch() {
        let mut batch = transfer_batch();
        let mut submitter = MockBatchSubmitter::new();
        submitter.expect_submit_batch().times(0);

        let err = batch.submit(&submitter).await.unwrap_err();
        assert!(matches!(err, VaultError::NotReady(_)));
        assert_eq!(batch.submission_state(), &SubmissionState::Idle);
    }

    #[tokio::test]
    async fn test_submit_respects_rate_limit() {
        let mut batch = ready_transfer();
        batch.set_rate_limit(Some(RateLimitStatus {
            remaining: 0,
            total: 10,
            reset_time_epoch_ms: 90_000,
        }));
        let mut submitter = MockBatchSubmitter::new();
        submitter.expect_submit_batch().times(1).returning(|_| Ok("0x1".to_string()));

        let err = batch.submit_at(&submitter, 30_000).await.unwrap_err();
        assert!(matches!(err, VaultError::RateLimited { reset_in_secs: 60 }));

        // Window elapsed
        assert!(batch.submit_at(&submitter, 90_000).await.is_ok());
    }

    #[tokio::test]
    async fn test_confirmation_failure_allows_retry() {
        let mut batch = ready_transfer();
        let mut submitter = MockBatchSubmitter::new();
        submitter.expect_submit_batch().times(2).returning(|_| Ok("0x1".to_string()));

        batch.submit(&submitter).await.expect("submitted");
        assert!(batch.submit(&submitter).await.is_err(), "in flight");
        assert!(batch.confirmation_failed("0x1", "reverted: Rate limit exceeded"));
        assert!(!batch.should_close());
        assert!(batch.submit(&submitter).await.is_ok());
    }

    #[test]
    fn test_submission_rebuilds_request() {
        let submission = BatchSubmission {
            kind: OperationKind::Deposit,
            items: vec![TransferItem {
                token_address: token(0, "1").address,
                amount: "1".to_string(),
            }],
            recipient: None,
            sender: None,
            tokens: vec![token(0, "1")],
        };
        let request = submission.to_request().expect("consistent");
        assert_eq!(request.entries.len(), 1);
        assert_eq!(request.entries[0].amount, "1");
        assert_eq!(request.recipient, None);
        assert_eq!(request.sender, None);

        let mut transfer = submission.clone();
        transfer.kind = OperationKind::Transfer;
        transfer.recipient = Some(RECIPIENT.to_string());
        transfer.sender = Some(token(5, "0").address);
        let request = transfer.to_request().expect("consistent");
        assert_eq!(request.recipient.as_deref(), Some(RECIPIENT));
        assert_eq!(request.sender, Some(token(5, "0").address));

        let mut broken = submission.clone();
        broken.tokens.clear();
        assert!(broken.to_request().is_err());
    }
}
