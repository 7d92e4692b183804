use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[test]
fn test_extreme_decimal_precision() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "transferPoints,U2974034,U3151672,Tip,a,none,0,0.0001,0").unwrap();
    writeln!(file, "transferPoints,U2974034,U3151672,Tip,b,none,0,0.0001,0").unwrap();
    writeln!(file, "getUserAccount,U2974034").unwrap();

    let mut cmd = Command::new(cargo_bin!("points-ledger"));
    cmd.arg(file.path()).arg("--seed").arg("demos/seed.toml");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"balance\":\"1001.0002\""));
}

#[test]
fn test_sender_balance_can_go_negative() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "transferPoints,U3151672,U2974034,Gift,big,none,0,5000,0").unwrap();
    writeln!(file, "getUserAccount,U2974034").unwrap();

    let mut cmd = Command::new(cargo_bin!("points-ledger"));
    cmd.arg(file.path()).arg("--seed").arg("demos/seed.toml");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"balance\":\"-3999\""));
}
