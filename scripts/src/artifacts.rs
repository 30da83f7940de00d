//! Loading contract compilation artifacts
//!
//! An artifact is resolved by contract name from a Hardhat artifacts directory,
//! or read from an explicit path. Both Hardhat (`"bytecode": "0x..."`) and
//! Foundry (`"bytecode": { "object": "0x..." }`) layouts are accepted.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{json_abi::JsonAbi, primitives::Bytes};
use serde::Deserialize;
use tracing::warn;

use crate::{
    constants::{ARTIFACTS_CONTRACTS_SEGMENT, ARTIFACT_EXTENSION, SOLIDITY_EXTENSION},
    errors::ScriptError,
};

/// The creation bytecode as it appears in an artifact file
#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    /// Hardhat layout
    Hex(String),
    /// Foundry layout
    Object {
        /// The hex-encoded bytecode
        object: String,
    },
}

/// The subset of an artifact file the scripts need
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    /// The contract name, present in Hardhat artifacts
    #[serde(default)]
    contract_name: Option<String>,
    /// The contract ABI
    abi: JsonAbi,
    /// The creation bytecode
    bytecode: RawBytecode,
}

/// A compiled contract, ready to be deployed
#[derive(Clone, Debug)]
pub struct ContractArtifact {
    /// The name of the contract
    pub contract_name: String,
    /// The contract ABI
    pub abi: JsonAbi,
    /// The creation bytecode, without constructor arguments
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// The path of a contract's artifact in a Hardhat artifacts directory:
    /// `<dir>/contracts/<Name>.sol/<Name>.json`
    pub fn path_in(artifacts_dir: &Path, contract_name: &str) -> PathBuf {
        artifacts_dir
            .join(ARTIFACTS_CONTRACTS_SEGMENT)
            .join(format!("{contract_name}.{SOLIDITY_EXTENSION}"))
            .join(format!("{contract_name}.{ARTIFACT_EXTENSION}"))
    }

    /// Read the artifact at the given path
    pub fn from_file(file_path: &Path, contract_name: &str) -> Result<Self, ScriptError> {
        let json = fs::read_to_string(file_path)
            .map_err(|e| ScriptError::ReadFile(format!("{}: {}", file_path.display(), e)))?;
        let raw: RawArtifact = serde_json::from_str(&json).map_err(|e| {
            ScriptError::ArtifactParsing(format!("{}: {}", file_path.display(), e))
        })?;
        Self::from_raw(raw, contract_name)
    }

    /// Parse an artifact from its JSON contents
    pub fn from_json(json: &str, contract_name: &str) -> Result<Self, ScriptError> {
        let raw: RawArtifact =
            serde_json::from_str(json).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        Self::from_raw(raw, contract_name)
    }

    /// Validate a raw artifact and decode its bytecode
    fn from_raw(raw: RawArtifact, contract_name: &str) -> Result<Self, ScriptError> {
        if let Some(name) = raw.contract_name.as_deref() {
            if name != contract_name {
                warn!("Artifact is for contract `{name}`, expected `{contract_name}`");
            }
        }

        let hex = match raw.bytecode {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        };
        let bytecode = Bytes::from_str(&hex).map_err(|e| {
            ScriptError::ArtifactParsing(format!("invalid bytecode for `{contract_name}`: {e}"))
        })?;

        // Interfaces and abstract contracts compile to empty bytecode
        if bytecode.is_empty() {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{contract_name}` has no creation bytecode, is it abstract?"
            )));
        }

        Ok(Self {
            contract_name: raw.contract_name.unwrap_or_else(|| contract_name.to_string()),
            abi: raw.abi,
            bytecode,
        })
    }

    /// Ensure the constructor, if the ABI declares one, takes `arity` arguments
    pub fn check_constructor_arity(&self, arity: usize) -> Result<(), ScriptError> {
        let Some(constructor) = &self.abi.constructor else {
            return Ok(());
        };

        let found = constructor.inputs.len();
        if found != arity {
            return Err(ScriptError::ArtifactParsing(format!(
                "`{}` constructor takes {found} arguments, expected {arity}",
                self.contract_name
            )));
        }

        Ok(())
    }
}
