//! Definitions of CLI arguments and commands for the vault scripts

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use clap::{Args, Parser, Subcommand};

use crate::{
    artifacts::ContractArtifact,
    client::VaultClient,
    commands::{deploy_vault, initialize_vault},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIRMATIONS, DEFAULT_DEPLOYMENTS_PATH, DEFAULT_RPC_URL,
        DEFAULT_VAULT_CONTRACT_NAME,
    },
    errors::ScriptError,
    types::{
        DeployConfig, DeployRequest, InitializeConfig, InitializeRequest, ScriptOutput, TxOptions,
    },
    utils::{parse_address, read_deployment, read_json_file},
};

/// Deploy and initialize vault contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY", hide_env_values = true)]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Path to the file in which deployed addresses are recorded
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Number of block confirmations to wait for on each transaction
    #[arg(long, default_value_t = DEFAULT_CONFIRMATIONS, value_parser = clap::value_parser!(u64).range(1..))]
    pub confirmations: u64,

    /// Seconds to wait for a transaction receipt before giving up.
    /// Waits indefinitely if unset.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The scripts that can be run
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a vault contract
    DeployVault(DeployVaultArgs),
    /// Initialize a deployed vault with its strategy
    InitializeVault(InitializeVaultArgs),
}

impl Command {
    /// Run the command, returning the line to report on success
    pub async fn run(
        self,
        client: &impl VaultClient,
        deployments_path: &Path,
        tx_options: &TxOptions,
    ) -> Result<ScriptOutput, ScriptError> {
        match self {
            Command::DeployVault(args) => {
                deploy_vault(args, client, deployments_path, tx_options).await
            }
            Command::InitializeVault(args) => {
                initialize_vault(args, client, deployments_path, tx_options).await
            }
        }
    }
}

/// Build the transaction options from the global flags
pub fn tx_options(confirmations: u64, timeout_secs: Option<u64>) -> TxOptions {
    TxOptions {
        confirmations,
        timeout: timeout_secs.map(Duration::from_secs),
        ..Default::default()
    }
}

/// Deploy a vault contract.
///
/// Parameters come either from a JSON config file or from flags:
/// `{ "underlying": "0x..", "name": "..", "symbol": "..", "deposit_fee_bps": 0, "tvl_cap": "max" }`
#[derive(Args, Clone, Debug, Default)]
pub struct DeployVaultArgs {
    /// JSON file holding the deployment parameters
    #[arg(short, long, conflicts_with_all = ["underlying", "name", "symbol", "deposit_fee_bps", "tvl_cap"])]
    pub config: Option<PathBuf>,

    /// Address of the token the vault accepts as deposits
    #[arg(long, required_unless_present = "config")]
    pub underlying: Option<String>,

    /// Display name of the vault's share token
    #[arg(long, required_unless_present = "config")]
    pub name: Option<String>,

    /// Symbol of the vault's share token
    #[arg(long, required_unless_present = "config")]
    pub symbol: Option<String>,

    /// Deposit fee in basis points [default: 0]
    #[arg(long)]
    pub deposit_fee_bps: Option<u64>,

    /// TVL cap: `max`, a decimal integer, or a 0x-prefixed hex integer [default: max]
    #[arg(long)]
    pub tvl_cap: Option<String>,

    /// Name of the vault contract to deploy
    #[arg(long, default_value = DEFAULT_VAULT_CONTRACT_NAME)]
    pub contract_name: String,

    /// Hardhat artifacts directory in which to look up the contract
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Explicit path to the contract artifact, overriding the lookup by name
    #[arg(long)]
    pub artifact: Option<PathBuf>,

    /// Key under which to record the vault in the deployments file [default: the symbol]
    #[arg(long)]
    pub deployment_key: Option<String>,
}

impl DeployVaultArgs {
    /// Resolve the deployment parameters from the config file or the flags
    pub fn deploy_request(&self) -> Result<DeployRequest, ScriptError> {
        let config = match &self.config {
            Some(path) => read_json_file::<DeployConfig>(path)?,
            None => DeployConfig {
                underlying: required(&self.underlying, "underlying")?,
                name: required(&self.name, "name")?,
                symbol: required(&self.symbol, "symbol")?,
                deposit_fee_bps: self.deposit_fee_bps.unwrap_or_default(),
                tvl_cap: self.tvl_cap.clone(),
            },
        };

        DeployRequest::try_from(config)
    }

    /// The path of the artifact to deploy
    pub fn artifact_path(&self) -> PathBuf {
        self.artifact
            .clone()
            .unwrap_or_else(|| ContractArtifact::path_in(&self.artifacts_dir, &self.contract_name))
    }
}

/// Initialize a deployed vault with its strategy.
///
/// Parameters come either from a JSON config file (`{ "vault": "0x..", "strategy": "0x.." }`)
/// or from flags, in which case the vault may be named by its deployments file key.
#[derive(Args, Clone, Debug, Default)]
pub struct InitializeVaultArgs {
    /// JSON file holding the initialization parameters
    #[arg(short, long, conflicts_with_all = ["vault", "vault_key", "strategy"])]
    pub config: Option<PathBuf>,

    /// Address of the deployed vault
    #[arg(long, conflicts_with = "vault_key", required_unless_present_any = ["config", "vault_key"])]
    pub vault: Option<String>,

    /// Key of the vault in the deployments file, used in place of `--vault`
    #[arg(long)]
    pub vault_key: Option<String>,

    /// Address of the strategy to bind the vault to
    #[arg(long, required_unless_present = "config")]
    pub strategy: Option<String>,
}

impl InitializeVaultArgs {
    /// Resolve the initialization parameters from the config file or the flags,
    /// reading the vault address from the deployments file if given by key
    pub fn initialize_request(
        &self,
        deployments_path: &Path,
    ) -> Result<InitializeRequest, ScriptError> {
        if let Some(path) = &self.config {
            let config: InitializeConfig = read_json_file(path)?;
            return InitializeRequest::try_from(config);
        }

        let strategy = parse_address(&required(&self.strategy, "strategy")?, "strategy")?;
        let vault = match (&self.vault, &self.vault_key) {
            (Some(vault), _) => parse_address(vault, "vault")?,
            (None, Some(key)) => read_deployment(deployments_path, key)?,
            (None, None) => {
                return Err(ScriptError::Config(
                    "one of `vault` or `vault_key` is required".to_string(),
                ))
            }
        };

        Ok(InitializeRequest { vault, strategy })
    }
}

/// Unwrap a flag that clap requires whenever no config file is given
fn required(value: &Option<String>, name: &str) -> Result<String, ScriptError> {
    value
        .clone()
        .ok_or_else(|| ScriptError::Config(format!("`{name}` is required without a config file")))
}
