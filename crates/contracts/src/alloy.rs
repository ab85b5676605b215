pub mod networks {
    pub const MAINNET: u64 = 1;
    pub const GNOSIS: u64 = 100;
    pub const SEPOLIA: u64 = 11155111;
    pub const HOLESKY: u64 = 17000;
    /// Chain id used by ganache and anvil development nodes.
    pub const DEVELOPMENT: u64 = 1337;
    pub const ANVIL: u64 = 31337;

    /// Human readable name of a network, used in logs.
    pub fn name(chain_id: u64) -> &'static str {
        match chain_id {
            MAINNET => "Ethereum / Mainnet",
            GNOSIS => "Gnosis Chain",
            SEPOLIA => "Ethereum / Sepolia",
            HOLESKY => "Ethereum / Holesky",
            DEVELOPMENT => "Development",
            ANVIL => "Anvil",
            _ => "Unknown network",
        }
    }
}

crate::bindings!(Vote, "artifacts/Vote.json");
crate::bindings!(Admin, "artifacts/Admin.json");

/// Errors emitted by the OpenZeppelin access control contracts when a caller
/// lacks the permission to call a function.
pub mod access_control {
    alloy::sol! {
        #[derive(Debug, PartialEq, Eq)]
        error OwnableUnauthorizedAccount(address account);

        #[derive(Debug, PartialEq, Eq)]
        error AccessControlUnauthorizedAccount(address account, bytes32 neededRole);
    }
}

#[macro_export]
macro_rules! bindings {
    ($contract:ident, $abi:literal) => {
        paste::paste! {
            // Generate the main bindings in a private module. That allows
            // us to re-export all items in our own module while also adding
            // some items ourselves.
            #[allow(non_snake_case)]
            mod [<$contract Private>] {
                alloy::sol!(
                    #[allow(missing_docs)]
                    $contract,
                    $abi
                );
            }

            #[allow(non_snake_case)]
            pub mod $contract {
                pub use super::[<$contract Private>]::*;

                /// Name under which the contract is recorded in deployment
                /// artifacts.
                pub const NAME: &str = stringify!($contract);
            }
        }
    };
}
