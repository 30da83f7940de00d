//! Type definitions used throughout the scripts

use std::{
    fmt::{self, Display},
    time::Duration,
};

use alloy::primitives::{Address, U256};
use serde::Deserialize;

use crate::{
    constants::{DEFAULT_CONFIRMATIONS, DEFAULT_POLL_INTERVAL, VAULT_INITIALIZED_MESSAGE},
    errors::ScriptError,
    utils::{parse_address, parse_tvl_cap},
};

/// The parameters of a single vault deployment.
///
/// Field order matches the vault constructor's argument order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployRequest {
    /// The token the vault accepts as deposits
    pub underlying: Address,
    /// The display name of the vault's share token
    pub name: String,
    /// The symbol of the vault's share token
    pub symbol: String,
    /// The deposit fee, in basis points
    pub deposit_fee_bps: u64,
    /// The ceiling on total value deposited in the vault
    pub tvl_cap: U256,
}

/// The parameters of a single vault initialization
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitializeRequest {
    /// The address of the deployed vault
    pub vault: Address,
    /// The address of the strategy to bind the vault to
    pub strategy: Address,
}

/// A [`DeployRequest`] as written in a JSON config file.
///
/// Values are kept as strings so that they go through the same parsing as
/// the command-line flags.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// The underlying asset address, in hex
    pub underlying: String,
    /// The display name of the vault's share token
    pub name: String,
    /// The symbol of the vault's share token
    pub symbol: String,
    /// The deposit fee, in basis points
    #[serde(default)]
    pub deposit_fee_bps: u64,
    /// The TVL cap, `max` if omitted
    #[serde(default)]
    pub tvl_cap: Option<String>,
}

/// An [`InitializeRequest`] as written in a JSON config file
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InitializeConfig {
    /// The vault address, in hex
    pub vault: String,
    /// The strategy address, in hex
    pub strategy: String,
}

impl TryFrom<DeployConfig> for DeployRequest {
    type Error = ScriptError;

    fn try_from(config: DeployConfig) -> Result<Self, Self::Error> {
        let tvl_cap = match config.tvl_cap.as_deref() {
            Some(cap) => parse_tvl_cap(cap)?,
            None => U256::MAX,
        };

        Ok(DeployRequest {
            underlying: parse_address(&config.underlying, "underlying")?,
            name: config.name,
            symbol: config.symbol,
            deposit_fee_bps: config.deposit_fee_bps,
            tvl_cap,
        })
    }
}

impl TryFrom<InitializeConfig> for InitializeRequest {
    type Error = ScriptError;

    fn try_from(config: InitializeConfig) -> Result<Self, Self::Error> {
        Ok(InitializeRequest {
            vault: parse_address(&config.vault, "vault")?,
            strategy: parse_address(&config.strategy, "strategy")?,
        })
    }
}

/// Options controlling how long to wait on a submitted transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxOptions {
    /// The number of block confirmations to wait for
    pub confirmations: u64,
    /// How long to wait for the receipt before giving up.
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// How often to ask the node for the receipt
    pub poll_interval: Duration,
}

impl Default for TxOptions {
    fn default() -> Self {
        Self {
            confirmations: DEFAULT_CONFIRMATIONS,
            timeout: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// The outcome of a successful script run, printed as a single line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptOutput {
    /// A vault was deployed at the given address
    Deployed(Address),
    /// A vault was initialized
    Initialized,
}

impl Display for ScriptOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptOutput::Deployed(address) => write!(f, "Vault deployed to: {}", address),
            ScriptOutput::Initialized => write!(f, "{}", VAULT_INITIALIZED_MESSAGE),
        }
    }
}
