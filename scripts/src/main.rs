use std::{io, process};

use clap::Parser;
use vault_scripts::{
    cli::{tx_options, Cli},
    client::setup_client,
    errors::ScriptError,
};

#[tokio::main]
async fn main() {
    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// Run the selected command and print its success line
async fn run(cli: Cli) -> Result<(), ScriptError> {
    let Cli {
        priv_key,
        rpc_url,
        deployments_path,
        confirmations,
        timeout_secs,
        command,
    } = cli;

    tracing_subscriber::fmt()
        .pretty()
        .with_writer(io::stderr)
        .init();

    let client = setup_client(&priv_key, &rpc_url)?;
    let tx_options = tx_options(confirmations, timeout_secs);

    let output = command
        .run(&client, &deployments_path, &tx_options)
        .await?;
    println!("{output}");

    Ok(())
}
