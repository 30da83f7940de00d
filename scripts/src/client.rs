//! The client through which the scripts talk to the chain

use std::str::FromStr;

use alloy::{
    network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::info;

use crate::{
    errors::ScriptError,
    solidity::{vault_deploy_code, IReaperVault},
    transactions::send_and_confirm,
    types::{DeployRequest, InitializeRequest, TxOptions},
};

/// The on-chain operations the scripts perform.
///
/// Each method submits a single transaction and returns once it is confirmed.
#[allow(async_fn_in_trait)]
pub trait VaultClient {
    /// Deploy a vault from its creation bytecode, returning the new contract's address
    async fn deploy_vault(
        &self,
        bytecode: &Bytes,
        request: &DeployRequest,
        tx_options: &TxOptions,
    ) -> Result<Address, ScriptError>;

    /// Bind a deployed vault to its strategy
    async fn initialize_vault(
        &self,
        request: &InitializeRequest,
        tx_options: &TxOptions,
    ) -> Result<(), ScriptError>;
}

/// A [`VaultClient`] that signs locally and submits over JSON-RPC
#[derive(Clone)]
pub struct RpcVaultClient {
    /// The signing provider
    provider: DynProvider,
}

impl RpcVaultClient {
    /// Wrap a provider. Transactions are signed by whichever wallet it carries.
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }
}

/// Sets up the client with which to deploy & initialize vaults,
/// signing with the given private key.
///
/// No request is sent to the node here.
pub fn setup_client(priv_key: &str, rpc_url: &str) -> Result<RpcVaultClient, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let url =
        Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    info!("Using deployer {} against {}", signer.address(), url);

    let provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(signer))
        .connect_http(url);

    Ok(RpcVaultClient::new(DynProvider::new(provider)))
}

impl VaultClient for RpcVaultClient {
    async fn deploy_vault(
        &self,
        bytecode: &Bytes,
        request: &DeployRequest,
        tx_options: &TxOptions,
    ) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default().with_deploy_code(vault_deploy_code(bytecode, request));

        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        let receipt =
            send_and_confirm(pending_tx, tx_options, ScriptError::ContractDeployment).await?;

        receipt.contract_address().ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "receipt for tx {} has no contract address",
                receipt.transaction_hash
            ))
        })
    }

    async fn initialize_vault(
        &self,
        request: &InitializeRequest,
        tx_options: &TxOptions,
    ) -> Result<(), ScriptError> {
        let vault = IReaperVault::new(request.vault, self.provider.clone());

        let pending_tx = vault
            .initialize(request.strategy)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        send_and_confirm(pending_tx, tx_options, ScriptError::ContractInteraction).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use alloy::{
        primitives::{address, b256, Address, Bytes, B256, U256},
        providers::{DynProvider, ProviderBuilder},
        transports::mock::Asserter,
    };
    use serde_json::{json, Value};

    use crate::{
        errors::ScriptError,
        types::{DeployRequest, InitializeRequest, TxOptions},
    };

    use super::{RpcVaultClient, VaultClient};

    /// The hash the node reports for every submitted transaction
    const TX_HASH: B256 =
        b256!("0x5a1d5e4a0c8a3ad4e3d2b2d7f6a0c9e8b7a6f5e4d3c2b1a0f9e8d7c6b5a4f3e2");
    /// The address of the deployed vault
    const VAULT: Address = address!("0x220EF595e18465410C5b5C9CeD6DD88a44F14289");
    /// The deployer
    const DEPLOYER: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

    /// A client backed by a mocked node with no fillers, so that each
    /// provider call maps to exactly one queued response
    fn mock_client() -> (RpcVaultClient, Asserter) {
        let asserter = Asserter::new();
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());

        (RpcVaultClient::new(DynProvider::new(provider)), asserter)
    }

    /// Options that poll fast enough for tests
    fn tx_options() -> TxOptions {
        TxOptions {
            poll_interval: Duration::from_millis(1),
            ..Default::default()
        }
    }

    /// A mined EIP-1559 receipt for `TX_HASH`
    fn receipt(success: bool, contract_address: Option<Address>) -> Value {
        json!({
            "type": "0x2",
            "status": if success { "0x1" } else { "0x0" },
            "cumulativeGasUsed": "0x5208",
            "logs": [],
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "transactionHash": TX_HASH,
            "transactionIndex": "0x0",
            "blockHash": b256!("0x1111111111111111111111111111111111111111111111111111111111111111"),
            "blockNumber": "0x10",
            "gasUsed": "0x5208",
            "effectiveGasPrice": "0x3b9aca00",
            "from": DEPLOYER,
            "to": Value::Null,
            "contractAddress": contract_address,
        })
    }

    /// The FTM-DAI WigoSwap vault parameters
    fn deploy_request() -> DeployRequest {
        DeployRequest {
            underlying: address!("0x280F2F0cC01B2fd1b10d830b5deAf2343a78D3D5"),
            name: "FTM-DAI WigoSwap Crypt".to_string(),
            symbol: "rf-ws-FTM-DAI".to_string(),
            deposit_fee_bps: 0,
            tvl_cap: U256::MAX,
        }
    }

    /// Creation bytecode for the deployment
    fn bytecode() -> Bytes {
        Bytes::from_static(&[0x60, 0x80, 0x60, 0x40])
    }

    #[tokio::test]
    async fn test_deploy_returns_contract_address() {
        let (client, asserter) = mock_client();
        asserter.push_success(&TX_HASH);
        // Not mined on the first poll
        asserter.push_success(&Value::Null);
        asserter.push_success(&receipt(true, Some(VAULT)));

        let addr = client
            .deploy_vault(&bytecode(), &deploy_request(), &tx_options())
            .await
            .unwrap();
        assert_eq!(addr, VAULT);
    }

    #[tokio::test]
    async fn test_deploy_reverted_receipt() {
        let (client, asserter) = mock_client();
        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt(false, Some(VAULT)));

        let err = client
            .deploy_vault(&bytecode(), &deploy_request(), &tx_options())
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::ContractDeployment(msg) if msg.contains("reverted")));
    }

    #[tokio::test]
    async fn test_deploy_receipt_without_contract_address() {
        let (client, asserter) = mock_client();
        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt(true, None));

        let err = client
            .deploy_vault(&bytecode(), &deploy_request(), &tx_options())
            .await
            .unwrap_err();
        assert!(
            matches!(err, ScriptError::ContractDeployment(msg) if msg.contains("no contract address"))
        );
    }

    #[tokio::test]
    async fn test_deploy_rpc_error() {
        let (client, asserter) = mock_client();
        asserter.push_failure_msg("insufficient funds for gas * price + value");

        let err = client
            .deploy_vault(&bytecode(), &deploy_request(), &tx_options())
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::ContractDeployment(msg) if msg.contains("insufficient funds")));
    }

    #[tokio::test]
    async fn test_receipt_wait_times_out() {
        let (client, asserter) = mock_client();
        asserter.push_success(&TX_HASH);
        // Never mined
        for _ in 0..10_000 {
            asserter.push_success(&Value::Null);
        }

        let tx_options = TxOptions {
            timeout: Some(Duration::from_millis(50)),
            ..tx_options()
        };
        let err = client
            .deploy_vault(&bytecode(), &deploy_request(), &tx_options)
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::ContractDeployment(msg) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_waits_for_confirmations() {
        let (client, asserter) = mock_client();
        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt(true, Some(VAULT)));
        // Mined in block 0x10, 3 confirmations are reached at block 0x12
        asserter.push_success(&"0x10");
        asserter.push_success(&"0x11");
        asserter.push_success(&"0x12");

        let tx_options = TxOptions {
            confirmations: 3,
            ..tx_options()
        };
        let addr = client
            .deploy_vault(&bytecode(), &deploy_request(), &tx_options)
            .await
            .unwrap();
        assert_eq!(addr, VAULT);
    }

    #[tokio::test]
    async fn test_initialize() {
        let (client, asserter) = mock_client();
        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt(true, None));

        let request = InitializeRequest {
            vault: VAULT,
            strategy: address!("0xbB907e1E5f5FadaaE2E1A81fA064700897C8B8DB"),
        };
        client.initialize_vault(&request, &tx_options()).await.unwrap();
    }

    #[tokio::test]
    async fn test_initialize_reverted() {
        let (client, asserter) = mock_client();
        asserter.push_success(&TX_HASH);
        asserter.push_success(&receipt(false, None));

        let request = InitializeRequest {
            vault: VAULT,
            strategy: address!("0xbB907e1E5f5FadaaE2E1A81fA064700897C8B8DB"),
        };
        let err = client
            .initialize_vault(&request, &tx_options())
            .await
            .unwrap_err();
        assert!(matches!(err, ScriptError::ContractInteraction(msg) if msg.contains("reverted")));
    }
}
