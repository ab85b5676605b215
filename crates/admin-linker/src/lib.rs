pub mod arguments;
pub mod config;
pub mod error;
pub mod link;
pub mod registry;
mod run;
pub mod runtime;

pub use {
    error::{LinkError, TransactionError},
    link::{LinkPolicy, link, link_deployed},
    registry::{ContractReference, DeploymentRegistry, Deployments},
    run::run,
    runtime::{ContractHandle, ContractRuntime, Receipt, RuntimeError},
};
