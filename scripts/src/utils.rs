//! Utilities for the vault scripts: parsing operator input and managing the deployments file

use std::{fs, path::Path, str::FromStr};

use alloy::primitives::{Address, U256};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    constants::{DEPLOYMENTS_KEY, UNCAPPED_KEYWORD},
    errors::ScriptError,
};

/// Parse a hex address supplied by the operator.
///
/// `what` names the parameter in the error message.
pub fn parse_address(value: &str, what: &str) -> Result<Address, ScriptError> {
    Address::from_str(value.trim())
        .map_err(|e| ScriptError::Config(format!("invalid {what} address `{value}`: {e}")))
}

/// Parse a TVL cap: either `max`, a decimal integer, or a `0x`-prefixed hex integer
pub fn parse_tvl_cap(value: &str) -> Result<U256, ScriptError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(UNCAPPED_KEYWORD) {
        return Ok(U256::MAX);
    }

    U256::from_str(value)
        .map_err(|e| ScriptError::Config(format!("invalid TVL cap `{value}`: {e}")))
}

/// Read and deserialize a JSON file
pub fn read_json_file<T: DeserializeOwned>(file_path: &Path) -> Result<T, ScriptError> {
    let contents = fs::read_to_string(file_path)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", file_path.display(), e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| ScriptError::ReadFile(format!("{}: {}", file_path.display(), e)))
}

/// Read the address stored under `contract_key` in the deployments file
pub fn read_deployment(file_path: &Path, contract_key: &str) -> Result<Address, ScriptError> {
    let parsed_json: Value = read_json_file(file_path)?;

    let addr_str = parsed_json[DEPLOYMENTS_KEY][contract_key]
        .as_str()
        .ok_or_else(|| {
            ScriptError::ReadFile(format!(
                "no `{}` entry in deployments file {}",
                contract_key,
                file_path.display()
            ))
        })?;

    Address::from_str(addr_str).map_err(|e| {
        ScriptError::ReadFile(format!(
            "invalid `{}` address `{}` in deployments file {}: {}",
            contract_key,
            addr_str,
            file_path.display(),
            e
        ))
    })
}

/// Ensure a deployed address can later be recorded in the deployments file:
/// it is either absent with an existing parent directory, or a writable
/// JSON object whose `deployments` entry, if any, is an object
pub fn check_deployments_file(file_path: &Path) -> Result<(), ScriptError> {
    if !file_path.exists() {
        let parent = file_path.parent().filter(|p| !p.as_os_str().is_empty());
        if parent.is_some_and(|p| !p.is_dir()) {
            return Err(ScriptError::WriteFile(format!(
                "directory of deployments file {} does not exist",
                file_path.display()
            )));
        }
        return Ok(());
    }

    let metadata = fs::metadata(file_path)
        .map_err(|e| ScriptError::WriteFile(format!("{}: {}", file_path.display(), e)))?;
    if metadata.permissions().readonly() {
        return Err(ScriptError::WriteFile(format!(
            "deployments file {} is read-only",
            file_path.display()
        )));
    }

    load_deployments(file_path).map(|_| ())
}

/// Read the deployments file, or an empty object if it doesn't exist,
/// checking its shape
fn load_deployments(file_path: &Path) -> Result<Value, ScriptError> {
    if !file_path.exists() {
        return Ok(Value::Object(Map::new()));
    }

    let parsed_json: Value = read_json_file(file_path)?;
    let root = parsed_json.as_object().ok_or_else(|| {
        ScriptError::WriteFile(format!(
            "deployments file {} is not a JSON object",
            file_path.display()
        ))
    })?;
    if root.get(DEPLOYMENTS_KEY).is_some_and(|d| !d.is_object()) {
        return Err(ScriptError::WriteFile(format!(
            "`{}` in deployments file {} is not a JSON object",
            DEPLOYMENTS_KEY,
            file_path.display()
        )));
    }

    Ok(parsed_json)
}

/// Record a deployed address under `contract_key` in the deployments file,
/// creating the file if it doesn't exist and keeping all other entries
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    let mut parsed_json = load_deployments(file_path)?;

    let deployments = parsed_json
        .as_object_mut()
        .map(|root| {
            root.entry(DEPLOYMENTS_KEY)
                .or_insert_with(|| Value::Object(Map::new()))
        })
        .and_then(Value::as_object_mut)
        .ok_or_else(|| {
            ScriptError::WriteFile(format!("`{DEPLOYMENTS_KEY}` is not a JSON object"))
        })?;

    let new_value = Value::String(format!("{address:#x}"));
    if let Some(prev) = deployments.insert(contract_key.to_string(), new_value) {
        warn!("Overwriting `{contract_key}` deployment, previously {prev}");
    }

    let contents = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteFile(e.to_string()))?;
    fs::write(file_path, contents)
        .map_err(|e| ScriptError::WriteFile(format!("{}: {}", file_path.display(), e)))?;

    info!("Recorded `{contract_key}` deployment in {}", file_path.display());
    Ok(())
}
