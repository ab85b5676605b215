use {
    super::{ContractRuntime, Receipt, RuntimeError},
    alloy::{
        network::{EthereumWallet, ReceiptResponse as _, TransactionBuilder},
        primitives::{Address, Bytes},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::types::TransactionRequest,
        signers::local::PrivateKeySigner,
    },
    anyhow::{Context, Result},
    url::Url,
};

/// [`ContractRuntime`] backed by a JSON-RPC node.
pub struct AlloyRuntime {
    provider: DynProvider,
    sender: Address,
    confirmations: u64,
}

impl AlloyRuntime {
    /// Connects to the node at `url`.
    ///
    /// Transactions are signed locally when a `signer` is given. Otherwise
    /// they are sent from the node's first unlocked account, the way
    /// development nodes are usually set up.
    pub async fn connect(
        url: Url,
        signer: Option<PrivateKeySigner>,
        confirmations: u64,
    ) -> Result<Self> {
        let (provider, sender) = match signer {
            Some(signer) => {
                let sender = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(url)
                    .erased();
                (provider, sender)
            }
            None => {
                let provider = ProviderBuilder::new().connect_http(url).erased();
                let sender = provider
                    .get_accounts()
                    .await
                    .context("could not fetch node accounts")?
                    .into_iter()
                    .next()
                    .context("node has no unlocked accounts, a private key is required")?;
                (provider, sender)
            }
        };
        tracing::debug!(?sender, confirmations, "connected contract runtime");

        Ok(Self {
            provider,
            sender,
            confirmations,
        })
    }
}

#[async_trait::async_trait]
impl ContractRuntime for AlloyRuntime {
    async fn chain_id(&self) -> Result<u64, RuntimeError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(RuntimeError::from_transport)
    }

    fn sender(&self) -> Address {
        self.sender
    }

    async fn code_size(&self, address: Address) -> Result<usize, RuntimeError> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .map_err(RuntimeError::from_transport)?;
        Ok(code.len())
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes, RuntimeError> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(to)
            .with_input(input);
        self.provider
            .call(tx)
            .await
            .map_err(RuntimeError::from_transport)
    }

    async fn send_transaction(&self, to: Address, input: Bytes) -> Result<Receipt, RuntimeError> {
        let tx = TransactionRequest::default()
            .with_from(self.sender)
            .with_to(to)
            .with_input(input);
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(RuntimeError::from_transport)?;
        tracing::info!(tx_hash = ?pending.tx_hash(), "transaction submitted, awaiting confirmation");

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|err| RuntimeError::Node(err.into()))?;

        Ok(Receipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            status: receipt.status(),
        })
    }
}
