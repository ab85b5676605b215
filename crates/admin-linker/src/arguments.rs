use {
    crate::link::LinkPolicy,
    alloy::signers::local::PrivateKeySigner,
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
    url::Url,
};

#[derive(clap::Parser)]
pub struct Arguments {
    /// The log filter.
    #[clap(long, env = "ADMIN_LINKER_LOG_FILTER", default_value = "warn,admin_linker=debug")]
    pub log_filter: String,

    /// At which log level logs should be printed to stderr instead of stdout.
    #[clap(long, env = "ADMIN_LINKER_LOG_STDERR_THRESHOLD")]
    pub log_stderr_threshold: Option<tracing::Level>,

    /// Whether to use JSON format for the logs.
    #[clap(long, env = "ADMIN_LINKER_USE_JSON_LOGS", default_value = "false")]
    pub use_json_logs: bool,

    /// The Ethereum node URL to connect to.
    #[clap(long, env = "ADMIN_LINKER_NODE_URL", default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Path to a TOML configuration file. Values given on the command line
    /// take precedence over the file.
    #[clap(long, env = "ADMIN_LINKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory containing the Truffle build artifacts of the deployment.
    #[clap(long, env = "ADMIN_LINKER_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// Network id under which the artifacts record their deployments.
    /// Defaults to the chain id of the node.
    #[clap(long, env = "ADMIN_LINKER_NETWORK_ID")]
    pub network_id: Option<String>,

    /// Private key of the account sending the transaction. When omitted the
    /// first unlocked account of the node is used.
    #[clap(long, env = "ADMIN_LINKER_PRIVATE_KEY")]
    pub private_key: Option<PrivateKeySigner>,

    /// What to do if the Vote contract already points to another admin
    /// contract.
    #[clap(long, env = "ADMIN_LINKER_POLICY", value_enum)]
    pub policy: Option<LinkPolicy>,

    /// Number of confirmations to wait for.
    #[clap(long, env = "ADMIN_LINKER_CONFIRMATIONS")]
    pub confirmations: Option<u64>,

    /// Give up if linking takes longer than this, e.g. `2m`.
    #[clap(long, env = "ADMIN_LINKER_TIMEOUT", value_parser = humantime::parse_duration)]
    pub timeout: Option<Duration>,
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "log_filter: {}", self.log_filter)?;
        writeln!(f, "log_stderr_threshold: {:?}", self.log_stderr_threshold)?;
        writeln!(f, "use_json_logs: {}", self.use_json_logs)?;
        writeln!(f, "node_url: {}", self.node_url)?;
        writeln!(f, "config: {:?}", self.config)?;
        writeln!(f, "artifacts: {:?}", self.artifacts)?;
        writeln!(f, "network_id: {:?}", self.network_id)?;
        writeln!(
            f,
            "private_key: {}",
            self.private_key.as_ref().map_or("None", |_| "SECRET")
        )?;
        writeln!(f, "policy: {:?}", self.policy)?;
        writeln!(f, "confirmations: {:?}", self.confirmations)?;
        writeln!(f, "timeout: {:?}", self.timeout)?;
        Ok(())
    }
}
