use {
    crate::runtime::{Receipt, RuntimeError},
    alloy::primitives::{Address, B256},
};

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// A prerequisite contract is not deployed on the connected network.
    /// Redeploying the prerequisite is the only way forward.
    #[error("could not resolve {contract}: {reason}")]
    Resolution { contract: String, reason: String },
    /// The contract refused the caller.
    #[error("{caller:?} is not authorized to call {method} on {contract}: {reason}")]
    Authorization {
        contract: String,
        method: &'static str,
        caller: Address,
        reason: String,
    },
    /// The link already points somewhere else and the policy forbids replacing
    /// it.
    #[error("admin contract is already set to {current:?}, refusing to replace it with {requested:?}")]
    AlreadyLinked { current: Address, requested: Address },
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The runtime rejected the call before or while submitting it.
    #[error("transaction rejected")]
    Rejected(#[source] RuntimeError),
    /// The transaction was mined but its execution failed.
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: B256 },
    /// The transaction succeeded but the stored value does not match.
    #[error("transaction {tx_hash} succeeded but the admin contract is {actual:?} instead of {expected:?}")]
    NotApplied {
        tx_hash: B256,
        expected: Address,
        actual: Address,
    },
}

impl LinkError {
    pub fn resolution(contract: impl Into<String>, reason: impl ToString) -> Self {
        Self::Resolution {
            contract: contract.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether running the step again without operator intervention might
    /// succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transaction(TransactionError::Rejected(err)) => err.is_transient(),
            _ => false,
        }
    }
}

impl TransactionError {
    pub(crate) fn check_receipt(receipt: Receipt) -> Result<Receipt, Self> {
        if receipt.status {
            Ok(receipt)
        } else {
            Err(Self::Reverted {
                tx_hash: receipt.transaction_hash,
            })
        }
    }
}
