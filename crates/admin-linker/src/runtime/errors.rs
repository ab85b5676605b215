use {
    alloy::{
        primitives::Bytes,
        sol_types::{Revert, SolError},
        transports::{RpcError, TransportError},
    },
    contracts::alloy::access_control::{
        AccessControlUnauthorizedAccount,
        OwnableUnauthorizedAccount,
    },
};

/// Revert reasons emitted only by access control modifiers, e.g.
/// "Ownable: caller is not the owner" or
/// "AccessControl: account 0x.. is missing role 0x..".
const UNAUTHORIZED_REASONS: &[&str] = &[
    "caller is not the owner",
    "caller is not the admin",
    "is missing role",
];

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The node could not be reached or answered with an error unrelated to
    /// the executed code.
    #[error("node error: {0:#}")]
    Node(#[source] anyhow::Error),
    /// The call was rejected by the EVM, either while estimating gas or while
    /// simulating it.
    #[error("execution reverted: {message}")]
    Revert {
        message: String,
        data: Option<Bytes>,
    },
    #[error("failed to decode return value of {method}: {message}")]
    Decoding {
        method: &'static str,
        message: String,
    },
}

impl RuntimeError {
    /// Classifies a transport error. Error responses that carry revert data or
    /// mention a revert are attributed to the contract, everything else to
    /// the node.
    pub fn from_transport(err: TransportError) -> Self {
        if let RpcError::ErrorResp(payload) = &err {
            let data = payload.as_revert_data();
            let message = payload.message.to_string();
            // Nodes disagree on how reverts are reported, this log line is left
            // here as a debugging tool.
            tracing::debug!(?payload, has_revert_data = data.is_some(), "rpc error response");
            if data.is_some() || message.to_lowercase().contains("revert") {
                return Self::Revert { message, data };
            }
        }
        Self::Node(err.into())
    }

    /// Whether the call was rejected because the sender lacks permission to
    /// execute it.
    pub fn is_unauthorized(&self) -> bool {
        let Self::Revert { message, data } = self else {
            return false;
        };
        if let Some(data) = data {
            if data.starts_with(&OwnableUnauthorizedAccount::SELECTOR)
                || data.starts_with(&AccessControlUnauthorizedAccount::SELECTOR)
            {
                return true;
            }
            if let Ok(revert) = Revert::abi_decode(data) {
                return is_unauthorized_reason(&revert.reason);
            }
        }
        // The node message is only consulted when the revert data is missing
        // or cannot be decoded.
        is_unauthorized_reason(message)
    }

    /// Whether the error is likely transient, for example network issues or
    /// node congestion.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    /// Human readable revert reason if one can be decoded.
    pub fn revert_reason(&self) -> Option<String> {
        let Self::Revert { message, data } = self else {
            return None;
        };
        let decoded = data.as_ref().and_then(|data| {
            if let Ok(revert) = Revert::abi_decode(data) {
                return Some(revert.reason);
            }
            if let Ok(err) = OwnableUnauthorizedAccount::abi_decode(data) {
                return Some(format!("OwnableUnauthorizedAccount({})", err.account));
            }
            if let Ok(err) = AccessControlUnauthorizedAccount::abi_decode(data) {
                return Some(format!(
                    "AccessControlUnauthorizedAccount({}, {})",
                    err.account, err.neededRole
                ));
            }
            None
        });
        Some(decoded.unwrap_or_else(|| message.clone()))
    }
}

fn is_unauthorized_reason(reason: &str) -> bool {
    let reason = reason.to_lowercase();
    UNAUTHORIZED_REASONS
        .iter()
        .any(|pattern| reason.contains(pattern))
}

/// Create an arbitrary error that will be classified as a node error.
/// Useful for testing.
#[cfg(test)]
pub fn testing_node_error() -> RuntimeError {
    RuntimeError::from_transport(TransportError::ErrorResp(
        alloy::rpc::json_rpc::ErrorPayload::internal_error(),
    ))
}

/// Create a revert carrying an `Error(string)` payload with the given reason.
/// Useful for testing.
#[cfg(test)]
pub fn testing_revert(reason: &str) -> RuntimeError {
    RuntimeError::Revert {
        message: "execution reverted".to_string(),
        data: Some(
            Revert {
                reason: reason.to_string(),
            }
            .abi_encode()
            .into(),
        ),
    }
}
