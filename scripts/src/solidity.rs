//! Definitions of the Solidity interfaces used by the scripts

use alloy::{
    primitives::{Bytes, U256},
    sol_types::SolValue,
};

use crate::types::DeployRequest;

pub use bindings::IReaperVault;

#[allow(missing_docs, clippy::missing_docs_in_private_items)]
mod bindings {
    use alloy::sol;

    sol! {
        /// The vault methods called after deployment
        #[sol(rpc)]
        interface IReaperVault {
            function initialize(address _strategy) external;
        }
    }
}

/// ABI-encode the vault constructor arguments:
/// `(address _token, string _name, string _symbol, uint256 _depositFee, uint256 _tvlCap)`
pub fn vault_constructor_args(request: &DeployRequest) -> Vec<u8> {
    (
        request.underlying,
        request.name.clone(),
        request.symbol.clone(),
        U256::from(request.deposit_fee_bps),
        request.tvl_cap,
    )
        .abi_encode_params()
}

/// Build the input of a vault creation transaction, the creation bytecode
/// followed by the encoded constructor arguments
pub fn vault_deploy_code(bytecode: &Bytes, request: &DeployRequest) -> Bytes {
    let mut code = bytecode.to_vec();
    code.extend(vault_constructor_args(request));
    code.into()
}
