//! Implementations of the vault scripts

use std::path::Path;

use tracing::info;

use crate::{
    artifacts::ContractArtifact,
    cli::{DeployVaultArgs, InitializeVaultArgs},
    client::VaultClient,
    constants::VAULT_CONSTRUCTOR_ARITY,
    errors::ScriptError,
    types::{ScriptOutput, TxOptions},
    utils::{check_deployments_file, write_deployed_address},
};

/// Deploy a vault and record its address in the deployments file
pub async fn deploy_vault(
    args: DeployVaultArgs,
    client: &impl VaultClient,
    deployments_path: &Path,
    tx_options: &TxOptions,
) -> Result<ScriptOutput, ScriptError> {
    // Resolve everything locally before touching the network
    let request = args.deploy_request()?;
    let artifact = ContractArtifact::from_file(&args.artifact_path(), &args.contract_name)?;
    artifact.check_constructor_arity(VAULT_CONSTRUCTOR_ARITY)?;
    check_deployments_file(deployments_path)?;

    info!(
        "Deploying `{}` for {} ({}), fee {} bps, cap {}",
        artifact.contract_name,
        request.name,
        request.symbol,
        request.deposit_fee_bps,
        request.tvl_cap
    );

    let vault_address = client
        .deploy_vault(&artifact.bytecode, &request, tx_options)
        .await?;
    info!("Vault contract deployed at {vault_address:#x}");

    let deployment_key = args.deployment_key.unwrap_or(request.symbol);
    write_deployed_address(deployments_path, &deployment_key, vault_address)?;

    Ok(ScriptOutput::Deployed(vault_address))
}

/// Bind a deployed vault to its strategy.
///
/// Initialization is one-shot on-chain; a second call reverts and the error is returned as-is.
pub async fn initialize_vault(
    args: InitializeVaultArgs,
    client: &impl VaultClient,
    deployments_path: &Path,
    tx_options: &TxOptions,
) -> Result<ScriptOutput, ScriptError> {
    let request = args.initialize_request(deployments_path)?;

    info!(
        "Initializing vault {:#x} with strategy {:#x}",
        request.vault, request.strategy
    );
    client.initialize_vault(&request, tx_options).await?;

    Ok(ScriptOutput::Initialized)
}
