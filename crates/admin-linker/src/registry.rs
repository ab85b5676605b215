//! Deployed contract addresses of a single network.
//!
//! The registry is populated once at session start, from the build artifacts
//! of the deployment and from configured overrides, and only read afterwards.

use {
    crate::{
        error::LinkError,
        runtime::{ContractHandle, ContractRuntime},
    },
    alloy::primitives::{Address, B256},
    anyhow::{Context, Result},
    serde::Deserialize,
    std::{collections::HashMap, io, path::Path},
};

/// A contract resolved from a [`DeploymentRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractReference {
    name: String,
    chain_id: u64,
    address: Address,
}

impl ContractReference {
    /// Creates a reference, rejecting the zero address.
    pub fn new(name: impl Into<String>, chain_id: u64, address: Address) -> Result<Self, LinkError> {
        let name = name.into();
        if address.is_zero() {
            return Err(LinkError::resolution(name, "deployed address is the zero address"));
        }
        Ok(Self {
            name,
            chain_id,
            address,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Binds the reference to a runtime to call its methods.
    pub fn bind<'a, R>(&self, runtime: &'a R) -> ContractHandle<'a, R>
    where
        R: ContractRuntime + ?Sized,
    {
        ContractHandle::new(self.address, runtime)
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait DeploymentRegistry: Send + Sync {
    /// Chain id of the network the registry holds deployments for.
    fn chain_id(&self) -> u64;

    /// Looks up the deployment of the named contract.
    fn deployed_instance(&self, name: &str) -> Result<ContractReference, LinkError>;
}

#[derive(Debug, Clone)]
pub struct Deployments {
    chain_id: u64,
    addresses: HashMap<String, Address>,
}

impl Deployments {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            addresses: HashMap::new(),
        }
    }

    /// Records the address of a contract, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, address: Address) -> Option<Address> {
        self.addresses.insert(name.into(), address)
    }

    /// Loads the addresses of the named contracts from Truffle build
    /// artifacts (`<dir>/<name>.json`).
    ///
    /// Artifacts key their deployments by network id, which is not always the
    /// chain id (ganache reports network id 5777 on chain 1337). Contracts
    /// without an artifact or without a deployment on `network` are left out
    /// and fail to resolve later.
    pub async fn from_artifacts(
        dir: &Path,
        network: &str,
        chain_id: u64,
        names: &[&str],
    ) -> Result<Self> {
        let mut deployments = Self::new(chain_id);
        for name in names {
            let path = dir.join(format!("{name}.json"));
            let data = match tokio::fs::read_to_string(&path).await {
                Ok(data) => data,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(?path, "no artifact");
                    continue;
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("I/O error while reading {path:?}"));
                }
            };
            let artifact: Artifact = serde_json::from_str(&data)
                .with_context(|| format!("malformed artifact {path:?}"))?;
            if let Some(contract_name) = &artifact.contract_name {
                anyhow::ensure!(
                    contract_name == name,
                    "artifact {path:?} describes {contract_name} instead of {name}"
                );
            }
            match artifact.networks.get(network) {
                Some(deployment) => {
                    tracing::debug!(
                        %name,
                        address = ?deployment.address,
                        tx_hash = ?deployment.transaction_hash,
                        "found deployment"
                    );
                    deployments.insert(*name, deployment.address);
                }
                None => tracing::debug!(%name, %network, "artifact has no deployment on network"),
            }
        }
        Ok(deployments)
    }

    /// Applies address overrides on top of the loaded deployments.
    pub fn with_overrides(mut self, overrides: &HashMap<String, Address>) -> Self {
        for (name, address) in overrides {
            if let Some(previous) = self.insert(name.clone(), *address) {
                tracing::info!(%name, ?previous, new = ?address, "overriding deployment address");
            }
        }
        self
    }
}

impl DeploymentRegistry for Deployments {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn deployed_instance(&self, name: &str) -> Result<ContractReference, LinkError> {
        let address = self.addresses.get(name).ok_or_else(|| {
            LinkError::resolution(
                name,
                format!("no deployment recorded for chain {}", self.chain_id),
            )
        })?;
        ContractReference::new(name, self.chain_id, *address)
    }
}

/// The part of a Truffle build artifact we care about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    contract_name: Option<String>,
    #[serde(default)]
    networks: HashMap<String, NetworkDeployment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkDeployment {
    address: Address,
    transaction_hash: Option<B256>,
}
