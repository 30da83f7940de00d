//! Scripts for deploying and initializing vault contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod artifacts;
pub mod cli;
pub mod client;
pub mod commands;
pub mod constants;
pub mod errors;
pub mod solidity;
pub mod transactions;
pub mod types;
pub mod utils;
