//! Constants used in the vault scripts

use std::time::Duration;

/// The name of the vault contract whose artifact is deployed by default
pub const DEFAULT_VAULT_CONTRACT_NAME: &str = "ReaperVaultv1_4";

/// The default directory holding Hardhat compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The subdirectory of the artifacts directory in which contract sources are laid out
pub const ARTIFACTS_CONTRACTS_SEGMENT: &str = "contracts";

/// The extension of a Solidity source file, used in artifact paths
pub const SOLIDITY_EXTENSION: &str = "sol";

/// The extension of an artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The default RPC URL, a local development node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The number of confirmations to wait for by default
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// How often to poll the node for a transaction receipt
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The number of arguments taken by the vault constructor:
/// underlying asset, name, symbol, deposit fee, TVL cap
pub const VAULT_CONSTRUCTOR_ARITY: usize = 5;

/// The keyword accepted in place of a TVL cap to mean "no cap", i.e. `type(uint256).max`
pub const UNCAPPED_KEYWORD: &str = "max";

/// The line printed once a vault has been initialized
pub const VAULT_INITIALIZED_MESSAGE: &str = "Vault initialized";
