use {
    crate::{
        arguments::Arguments,
        config::{Config, Settings},
        link,
        registry::Deployments,
        runtime::{ContractRuntime, Receipt, alloy::AlloyRuntime},
    },
    anyhow::{Context, Result},
    contracts::alloy::{Admin, Vote, networks},
};

/// Runs the linking step for the deployment described by `args`.
pub async fn run(args: Arguments) -> Result<Receipt> {
    let config = match &args.config {
        Some(path) => Config::load(path).await?,
        None => Config::default(),
    };
    let settings = Settings::new(&args, config);

    let runtime = AlloyRuntime::connect(
        settings.node_url.clone(),
        args.private_key.clone(),
        settings.confirmations,
    )
    .await
    .context("could not connect to node")?;
    link_session(&runtime, &settings).await
}

/// Checks the connected network, loads the deployment registry and links the
/// contracts, giving up after the configured timeout.
pub async fn link_session<R>(runtime: &R, settings: &Settings) -> Result<Receipt>
where
    R: ContractRuntime + ?Sized,
{
    let chain_id = runtime
        .chain_id()
        .await
        .context("could not fetch current chain id")?;
    if let Some(expected) = settings.chain_id {
        anyhow::ensure!(
            expected == chain_id,
            "configured chain id {expected} does not match the node's chain id {chain_id}"
        );
    }
    tracing::info!(
        chain_id,
        network = networks::name(chain_id),
        sender = ?runtime.sender(),
        "connected to node"
    );

    let network = settings
        .network_id
        .clone()
        .unwrap_or_else(|| chain_id.to_string());
    let registry = Deployments::from_artifacts(
        &settings.artifacts,
        &network,
        chain_id,
        &[Admin::NAME, Vote::NAME],
    )
    .await?
    .with_overrides(&settings.deployments);

    let step = link::link_deployed(&registry, runtime, settings.policy);
    let result = match settings.timeout {
        Some(timeout) => tokio::time::timeout(timeout, step)
            .await
            .with_context(|| format!("linking did not finish within {timeout:?}"))?,
        None => step.await,
    };
    if let Err(err) = &result {
        tracing::warn!(retryable = err.is_retryable(), "linking step failed");
    }
    Ok(result?)
}
