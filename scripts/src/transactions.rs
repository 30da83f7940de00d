//! Utilities for sending and waiting on transactions

use alloy::{
    network::{Ethereum, ReceiptResponse},
    primitives::TxHash,
    providers::{PendingTransactionBuilder, Provider, RootProvider},
    rpc::types::TransactionReceipt,
    transports::TransportResult,
};
use tokio::time;
use tracing::info;

use crate::{errors::ScriptError, types::TxOptions};

/// Wait for a submitted transaction to be confirmed and ensure it succeeded.
///
/// Without a timeout in `tx_options` this waits for as long as the node takes.
/// Failures are reported through `to_err`, so that the caller decides which
/// stage of the script they belong to.
pub async fn send_and_confirm(
    pending_tx: PendingTransactionBuilder<Ethereum>,
    tx_options: &TxOptions,
    to_err: fn(String) -> ScriptError,
) -> Result<TransactionReceipt, ScriptError> {
    let tx_hash = *pending_tx.tx_hash();
    info!(
        "Waiting on tx {tx_hash} ({} confirmation(s))",
        tx_options.confirmations
    );

    let wait = wait_for_receipt(pending_tx.provider(), tx_hash, tx_options);
    let receipt = match tx_options.timeout {
        Some(timeout) => time::timeout(timeout, wait).await.map_err(|_| {
            to_err(format!("timed out after {timeout:?} waiting on tx {tx_hash}"))
        })?,
        None => wait.await,
    }
    .map_err(|e| to_err(format!("tx {tx_hash}: {e}")))?;

    if !receipt.status() {
        return Err(to_err(format!("tx {tx_hash} reverted")));
    }

    info!(
        "Tx {tx_hash} confirmed in block {}",
        receipt.block_number.unwrap_or_default()
    );
    Ok(receipt)
}

/// Poll the node for the receipt of `tx_hash`, then until the block it was
/// mined in has the required number of confirmations
async fn wait_for_receipt(
    provider: &RootProvider<Ethereum>,
    tx_hash: TxHash,
    tx_options: &TxOptions,
) -> TransportResult<TransactionReceipt> {
    let receipt = loop {
        match provider.get_transaction_receipt(tx_hash).await? {
            Some(receipt) => break receipt,
            None => time::sleep(tx_options.poll_interval).await,
        }
    };

    // The inclusion block counts as the first confirmation
    if let Some(mined_in) = receipt.block_number.filter(|_| tx_options.confirmations > 1) {
        let target = mined_in + tx_options.confirmations.saturating_sub(1);
        while provider.get_block_number().await? < target {
            time::sleep(tx_options.poll_interval).await;
        }
    }

    Ok(receipt)
}
