//! Boundary to the chain the contracts live on.
//!
//! The linker only needs a handful of primitives: identify the network, check
//! that an address holds code, perform read-only calls and send a single
//! state-mutating call. Everything else (signing, nonce management, gas
//! estimation) is the runtime's concern.

pub mod alloy;
pub mod errors;

pub use self::errors::RuntimeError;
use {
    ::alloy::{
        primitives::{Address, B256, Bytes},
        sol_types::SolCall,
    },
    std::fmt::{self, Display, Formatter},
};

/// Confirmation record of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// Whether the transaction executed successfully.
    pub status: bool,
}

impl Display for Receipt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "tx {}", self.transaction_hash)?;
        if let Some(block) = self.block_number {
            write!(f, " in block {block}")?;
        }
        write!(f, " (gas used {})", self.gas_used)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContractRuntime: Send + Sync {
    /// Chain id of the connected network.
    async fn chain_id(&self) -> Result<u64, RuntimeError>;

    /// Account that signs and sends the transactions.
    fn sender(&self) -> Address;

    /// Size of the code deployed at `address`. Zero for accounts without code.
    async fn code_size(&self, address: Address) -> Result<usize, RuntimeError>;

    /// Executes a read-only call against the latest block.
    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, RuntimeError>;

    /// Submits a state-mutating call and waits until it is confirmed.
    async fn send_transaction(&self, to: Address, input: Bytes) -> Result<Receipt, RuntimeError>;
}

/// A contract address bound to a runtime, used to issue typed calls.
pub struct ContractHandle<'a, R: ?Sized> {
    address: Address,
    runtime: &'a R,
}

impl<'a, R> ContractHandle<'a, R>
where
    R: ContractRuntime + ?Sized,
{
    pub fn new(address: Address, runtime: &'a R) -> Self {
        Self { address, runtime }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Performs a read-only call and decodes its return value.
    pub async fn read<C: SolCall>(&self, call: &C) -> Result<C::Return, RuntimeError> {
        let output = self
            .runtime
            .call(self.address, call.abi_encode().into())
            .await?;
        C::abi_decode_returns(&output).map_err(|err| RuntimeError::Decoding {
            method: C::SIGNATURE,
            message: err.to_string(),
        })
    }

    /// Sends the call as a transaction and waits for its receipt.
    pub async fn send<C: SolCall>(&self, call: &C) -> Result<Receipt, RuntimeError> {
        tracing::debug!(to = ?self.address, method = C::SIGNATURE, "sending transaction");
        self.runtime
            .send_transaction(self.address, call.abi_encode().into())
            .await
    }
}
