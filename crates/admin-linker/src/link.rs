//! Points the `Vote` contract at its `Admin` contract.

use {
    crate::{
        error::{LinkError, TransactionError},
        registry::{ContractReference, DeploymentRegistry},
        runtime::{ContractRuntime, Receipt, RuntimeError},
    },
    alloy::{primitives::Address, sol_types::SolCall},
    contracts::alloy::{Admin, Vote},
    serde::Deserialize,
    tracing::instrument,
};

/// What to do when the `Vote` contract already stores a different admin
/// contract address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LinkPolicy {
    /// Overwrite the stored address.
    #[default]
    Replace,
    /// Fail without sending a transaction.
    RejectIfSet,
}

/// Resolves the deployed `Admin` and `Vote` contracts and links them.
#[instrument(skip_all, fields(chain_id = registry.chain_id()))]
pub async fn link_deployed<R>(
    registry: &dyn DeploymentRegistry,
    runtime: &R,
    policy: LinkPolicy,
) -> Result<Receipt, LinkError>
where
    R: ContractRuntime + ?Sized,
{
    let admin = resolve(registry, runtime, Admin::NAME).await?;
    let vote = resolve(registry, runtime, Vote::NAME).await?;
    link(&vote, &admin, runtime, policy).await
}

/// Looks up a contract and checks that it has code on the connected chain.
pub async fn resolve<R>(
    registry: &dyn DeploymentRegistry,
    runtime: &R,
    name: &str,
) -> Result<ContractReference, LinkError>
where
    R: ContractRuntime + ?Sized,
{
    let reference = registry.deployed_instance(name)?;
    let code_size = runtime
        .code_size(reference.address())
        .await
        .map_err(TransactionError::Rejected)?;
    if code_size == 0 {
        return Err(LinkError::resolution(
            name,
            format!("no code at {:?}", reference.address()),
        ));
    }
    tracing::debug!(%name, address = ?reference.address(), code_size, "resolved contract");
    Ok(reference)
}

/// Sets the admin contract stored on `vote` to the address of `admin` and
/// waits for the transaction to be confirmed.
///
/// Exactly one transaction is sent unless a precondition fails. On success the
/// `Vote` contract's admin contract is the `Admin` address.
#[instrument(skip_all, fields(vote = ?vote.address(), admin = ?admin.address()))]
pub async fn link<R>(
    vote: &ContractReference,
    admin: &ContractReference,
    runtime: &R,
    policy: LinkPolicy,
) -> Result<Receipt, LinkError>
where
    R: ContractRuntime + ?Sized,
{
    if vote.chain_id() != admin.chain_id() {
        return Err(LinkError::resolution(
            admin.name(),
            format!(
                "deployed on chain {} but {} is on chain {}",
                admin.chain_id(),
                vote.name(),
                vote.chain_id()
            ),
        ));
    }

    let handle = vote.bind(runtime);
    let requested = admin.address();
    let current = handle
        .read(&Vote::Vote::adminContractCall {})
        .await
        .map_err(|err| classify(vote, runtime, Vote::Vote::adminContractCall::SIGNATURE, err))?;
    check_policy(policy, current, requested)?;

    tracing::info!("setting admin storage");
    let receipt = handle
        .send(&Vote::Vote::updateAdminContractCall { admin: requested })
        .await
        .map_err(|err| {
            classify(
                vote,
                runtime,
                Vote::Vote::updateAdminContractCall::SIGNATURE,
                err,
            )
        })?;
    let receipt = TransactionError::check_receipt(receipt)?;

    let stored = handle
        .read(&Vote::Vote::adminContractCall {})
        .await
        .map_err(TransactionError::Rejected)?;
    if stored != requested {
        return Err(TransactionError::NotApplied {
            tx_hash: receipt.transaction_hash,
            expected: requested,
            actual: stored,
        }
        .into());
    }

    tracing::info!(%receipt, "admin contract linked");
    Ok(receipt)
}

fn check_policy(policy: LinkPolicy, current: Address, requested: Address) -> Result<(), LinkError> {
    if current == requested {
        tracing::info!("admin contract already set, re-applying");
        return Ok(());
    }
    if current.is_zero() {
        return Ok(());
    }
    match policy {
        LinkPolicy::Replace => {
            tracing::warn!(?current, ?requested, "replacing existing admin contract");
            Ok(())
        }
        LinkPolicy::RejectIfSet => Err(LinkError::AlreadyLinked { current, requested }),
    }
}

fn classify<R>(
    contract: &ContractReference,
    runtime: &R,
    method: &'static str,
    err: RuntimeError,
) -> LinkError
where
    R: ContractRuntime + ?Sized,
{
    if err.is_unauthorized() {
        return LinkError::Authorization {
            contract: contract.name().to_string(),
            method,
            caller: runtime.sender(),
            reason: err.revert_reason().unwrap_or_default(),
        };
    }
    TransactionError::Rejected(err).into()
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            registry::{Deployments, MockDeploymentRegistry},
            runtime::{
                MockContractRuntime,
                errors::{testing_node_error, testing_revert},
            },
        },
        alloy::primitives::{B256, Bytes, address},
        mockall::{Sequence, predicate::eq},
    };

    const VOTE: Address = address!("0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB");
    const ADMIN: Address = address!("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA");
    const OTHER: Address = address!("0xCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC");
    const SENDER: Address = address!("0x1111111111111111111111111111111111111111");

    fn reference(name: &str, address: Address) -> ContractReference {
        ContractReference::new(name, 1337, address).unwrap()
    }

    fn receipt(status: bool) -> Receipt {
        Receipt {
            transaction_hash: B256::repeat_byte(0xab),
            block_number: Some(3),
            gas_used: 28_000,
            status,
        }
    }

    fn admin_getter() -> Bytes {
        Vote::Vote::adminContractCall {}.abi_encode().into()
    }

    fn admin_setter(admin: Address) -> Bytes {
        Vote::Vote::updateAdminContractCall { admin }.abi_encode().into()
    }

    fn stored(admin: Address) -> Bytes {
        Vote::Vote::adminContractCall::abi_encode_returns(&admin).into()
    }

    /// Runtime where `Vote` reports `before` prior to the transaction and
    /// `after` once it is confirmed.
    fn runtime(before: Address, after: Address, status: bool) -> MockContractRuntime {
        let mut runtime = MockContractRuntime::new();
        let mut seq = Sequence::new();
        runtime.expect_sender().return_const(SENDER);
        runtime
            .expect_call()
            .with(eq(VOTE), eq(admin_getter()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(stored(before)));
        runtime
            .expect_send_transaction()
            .with(eq(VOTE), eq(admin_setter(ADMIN)))
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(receipt(status)));
        if status {
            runtime
                .expect_call()
                .with(eq(VOTE), eq(admin_getter()))
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _| Ok(stored(after)));
        }
        runtime
    }

    #[tokio::test]
    async fn links_vote_to_admin() {
        let runtime = runtime(Address::ZERO, ADMIN, true);
        let result = link(
            &reference("Vote", VOTE),
            &reference("Admin", ADMIN),
            &runtime,
            LinkPolicy::Replace,
        )
        .await
        .unwrap();
        assert_eq!(result, receipt(true));
    }

    #[tokio::test]
    async fn relinking_same_admin_succeeds() {
        for policy in [LinkPolicy::Replace, LinkPolicy::RejectIfSet] {
            let runtime = runtime(ADMIN, ADMIN, true);
            let result = link(
                &reference("Vote", VOTE),
                &reference("Admin", ADMIN),
                &runtime,
                policy,
            )
            .await;
            assert!(result.is_ok(), "{policy:?}: {result:?}");
        }
    }

    #[tokio::test]
    async fn replace_policy_overwrites_other_admin() {
        let runtime = runtime(OTHER, ADMIN, true);
        link(
            &reference("Vote", VOTE),
            &reference("Admin", ADMIN),
            &runtime,
            LinkPolicy::Replace,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn reject_policy_keeps_other_admin() {
        let mut runtime = MockContractRuntime::new();
        runtime
            .expect_call()
            .returning(|_, _| Ok(stored(OTHER)));
        runtime.expect_send_transaction().never();

        let err = link(
            &reference("Vote", VOTE),
            &reference("Admin", ADMIN),
            &runtime,
            LinkPolicy::RejectIfSet,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            LinkError::AlreadyLinked { current, requested } if current == OTHER && requested == ADMIN
        ));
    }

    #[tokio::test]
    async fn unauthorized_caller_is_an_authorization_error() {
        let mut runtime = MockContractRuntime::new();
        runtime.expect_sender().return_const(SENDER);
        runtime
            .expect_call()
            .returning(|_, _| Ok(stored(Address::ZERO)));
        runtime
            .expect_send_transaction()
            .times(1)
            .returning(|_, _| Err(testing_revert("Ownable: caller is not the owner")));

        let err = link(
            &reference("Vote", VOTE),
            &reference("Admin", ADMIN),
            &runtime,
            LinkPolicy::Replace,
        )
        .await
        .unwrap_err();
        match err {
            LinkError::Authorization {
                contract,
                method,
                caller,
                reason,
            } => {
                assert_eq!(contract, "Vote");
                assert_eq!(method, "updateAdminContract(address)");
                assert_eq!(caller, SENDER);
                assert_eq!(reason, "Ownable: caller is not the owner");
            }
            err => panic!("unexpected error {err:?}"),
        }
    }

    #[tokio::test]
    async fn other_reverts_are_transaction_errors() {
        let mut runtime = MockContractRuntime::new();
        runtime
            .expect_call()
            .returning(|_, _| Ok(stored(Address::ZERO)));
        runtime
            .expect_send_transaction()
            .times(1)
            .returning(|_, _| Err(testing_revert("Vote: zero address not allowed")));

        let err = link(
            &reference("Vote", VOTE),
            &reference("Admin", ADMIN),
            &runtime,
            LinkPolicy::Replace,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            LinkError::Transaction(TransactionError::Rejected(RuntimeError::Revert { .. }))
        ));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn node_failures_are_retryable() {
        let mut runtime = MockContractRuntime::new();
        runtime
            .expect_call()
            .returning(|_, _| Ok(stored(Address::ZERO)));
        runtime
            .expect_send_transaction()
            .times(1)
            .returning(|_, _| Err(testing_node_error()));

        let err = link(
            &reference("Vote", VOTE),
            &reference("Admin", ADMIN),
            &runtime,
            LinkPolicy::Replace,
        )
        .await
        .unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn failed_receipt_is_a_transaction_error() {
        let runtime = runtime(Address::ZERO, Address::ZERO, false);
        let err = link(
            &reference("Vote", VOTE),
            &reference("Admin", ADMIN),
            &runtime,
            LinkPolicy::Replace,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            LinkError::Transaction(TransactionError::Reverted { .. })
        ));
    }

    #[tokio::test]
    async fn unchanged_storage_is_a_transaction_error() {
        let runtime = runtime(OTHER, OTHER, true);
        let err = link(
            &reference("Vote", VOTE),
            &reference("Admin", ADMIN),
            &runtime,
            LinkPolicy::Replace,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            LinkError::Transaction(TransactionError::NotApplied { expected, actual, .. })
                if expected == ADMIN && actual == OTHER
        ));
    }

    #[tokio::test]
    async fn references_on_different_chains_are_rejected() {
        let mut runtime = MockContractRuntime::new();
        runtime.expect_call().never();
        runtime.expect_send_transaction().never();

        let err = link(
            &reference("Vote", VOTE),
            &ContractReference::new("Admin", 1, ADMIN).unwrap(),
            &runtime,
            LinkPolicy::Replace,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, LinkError::Resolution { ref contract, .. } if contract == "Admin"));
    }

    #[tokio::test]
    async fn missing_admin_sends_no_transaction() {
        let mut registry = MockDeploymentRegistry::new();
        registry.expect_chain_id().return_const(1337u64);
        registry
            .expect_deployed_instance()
            .with(eq("Admin"))
            .returning(|name| Err(LinkError::resolution(name, "not deployed")));
        let mut runtime = MockContractRuntime::new();
        runtime.expect_send_transaction().never();

        let err = link_deployed(&registry, &runtime, LinkPolicy::Replace)
            .await
            .unwrap_err();
        assert!(matches!(err, LinkError::Resolution { ref contract, .. } if contract == "Admin"));
    }

    #[tokio::test]
    async fn address_without_code_is_a_resolution_error() {
        let mut deployments = Deployments::new(1337);
        deployments.insert("Admin", ADMIN);
        deployments.insert("Vote", VOTE);
        let mut runtime = MockContractRuntime::new();
        runtime
            .expect_code_size()
            .with(eq(ADMIN))
            .returning(|_| Ok(0));
        runtime.expect_send_transaction().never();

        let err = link_deployed(&deployments, &runtime, LinkPolicy::Replace)
            .await
            .unwrap_err();
        assert!(matches!(err, LinkError::Resolution { ref contract, .. } if contract == "Admin"));
    }

    #[tokio::test]
    async fn links_deployed_contracts() {
        let mut deployments = Deployments::new(1337);
        deployments.insert("Admin", ADMIN);
        deployments.insert("Vote", VOTE);
        let mut runtime = runtime(Address::ZERO, ADMIN, true);
        runtime.expect_code_size().times(2).returning(|_| Ok(1024));

        let result = link_deployed(&deployments, &runtime, LinkPolicy::Replace)
            .await
            .unwrap();
        assert_eq!(result.transaction_hash, B256::repeat_byte(0xab));
    }

    #[test]
    fn policy_checks() {
        assert!(check_policy(LinkPolicy::RejectIfSet, Address::ZERO, ADMIN).is_ok());
        assert!(check_policy(LinkPolicy::RejectIfSet, ADMIN, ADMIN).is_ok());
        assert!(check_policy(LinkPolicy::RejectIfSet, OTHER, ADMIN).is_err());
        assert!(check_policy(LinkPolicy::Replace, OTHER, ADMIN).is_ok());
    }
}
