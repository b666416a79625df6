#![allow(dead_code)]

use anyhow::{bail, Result};
use assert_cmd::cargo;
use serde_json::Value;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Command with an isolated HOME (database) and config path.
/// The config file does not exist, so defaults apply.
pub fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("folio"));
    cmd.env("HOME", home.path());
    cmd.env("FOLIO_CONFIG", home.path().join("config.toml"));
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-color");
    cmd
}

pub fn run_cmd(home: &TempDir, args: &[&str]) -> Result<Output> {
    let mut cmd = base_cmd(home);
    cmd.args(args);
    let output = cmd.output()?;
    if !output.status.success() {
        bail!(
            "command failed: {:?}\nstdout: {}\nstderr: {}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(output)
}

pub fn run_cmd_json(home: &TempDir, args: &[&str]) -> Result<Value> {
    let mut full_args = vec!["--json"];
    full_args.extend_from_slice(args);
    let output = run_cmd(home, &full_args)?;
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}

pub fn seed(home: &TempDir) -> Result<Value> {
    run_cmd_json(home, &["seed"])
}

pub fn performance_json(home: &TempDir, portfolio_id: i64, period: &str) -> Result<Value> {
    let id = portfolio_id.to_string();
    run_cmd_json(home, &["performance", "show", &id, period])
}

pub fn add_transaction(
    home: &TempDir,
    asset_id: i64,
    tx_type: &str,
    quantity: &str,
    price: &str,
    date: &str,
) -> Result<Value> {
    let id = asset_id.to_string();
    run_cmd_json(
        home,
        &["transactions", "add", &id, tx_type, quantity, price, date],
    )
}
