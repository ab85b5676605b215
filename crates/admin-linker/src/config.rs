use {
    crate::{arguments::Arguments, link::LinkPolicy},
    alloy::primitives::Address,
    anyhow::{Context, Result},
    serde::Deserialize,
    std::{
        collections::HashMap,
        path::{Path, PathBuf},
        time::Duration,
    },
    url::Url,
};

/// Where Truffle writes its build artifacts by default.
const DEFAULT_ARTIFACTS: &str = "build/contracts";

/// Contents of the TOML configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Optionally specify the chain ID the deployment belongs to. The actual
    /// chain ID is fetched from the node and linking aborts if it does not
    /// match this value.
    pub chain_id: Option<u64>,

    /// Network id under which the artifacts record their deployments.
    pub network_id: Option<String>,

    /// Directory containing the Truffle build artifacts.
    pub artifacts: Option<PathBuf>,

    pub policy: Option<LinkPolicy>,

    /// Number of confirmations to wait for.
    pub confirmations: Option<u64>,

    /// Upper bound on the duration of the whole step.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    /// Override deployed contract addresses by contract name.
    #[serde(default)]
    pub deployments: HashMap<String, Address>,
}

impl Config {
    /// Loads the configuration from a TOML file.
    pub async fn load(path: &Path) -> Result<Self> {
        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("I/O error while reading {path:?}"))?;
        toml::from_str(&data).with_context(|| format!("TOML syntax error while reading {path:?}"))
    }
}

/// Settings of a linking session after merging command line arguments and
/// the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub node_url: Url,
    pub chain_id: Option<u64>,
    pub network_id: Option<String>,
    pub artifacts: PathBuf,
    pub policy: LinkPolicy,
    pub confirmations: u64,
    pub timeout: Option<Duration>,
    pub deployments: HashMap<String, Address>,
}

impl Settings {
    pub fn new(args: &Arguments, config: Config) -> Self {
        Self {
            node_url: args.node_url.clone(),
            chain_id: config.chain_id,
            network_id: args.network_id.clone().or(config.network_id),
            artifacts: args
                .artifacts
                .clone()
                .or(config.artifacts)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS)),
            policy: args.policy.or(config.policy).unwrap_or_default(),
            confirmations: args.confirmations.or(config.confirmations).unwrap_or(1),
            timeout: args.timeout.or(config.timeout),
            deployments: config.deployments,
        }
    }
}
