#![deny(unused_must_use)]

use std::{env, fs, path::PathBuf};

use xshell::cmd;

const USAGE: &str = "USAGE cargo xtask [ci | update | unit <binary>]";

fn main() -> Result<(), anyhow::Error> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let args = args.iter().map(|s| &**s).collect::<Vec<_>>();

    match &args[..] {
        ["ci"] => test_ci(),
        ["update"] => update(),
        ["unit", binary] => unit(binary),
        _ => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

fn update() -> Result<(), anyhow::Error> {
    let _p = xshell::pushd(root_dir())?;
    cmd!("cargo update").run()?;
    Ok(())
}

fn test_ci() -> Result<(), anyhow::Error> {
    let _e = xshell::pushenv("CI", "true");
    test_device()?;
    build_binaries()?;
    Ok(())
}

fn test_device() -> Result<(), anyhow::Error> {
    let _p = xshell::pushd(device_dir())?;
    cmd!("cargo test --all").run()?;
    Ok(())
}

fn build_binaries() -> Result<(), anyhow::Error> {
    let _p = xshell::pushd(device_dir())?;
    for binary in binaries()? {
        println!("Building {}", binary);
        cmd!("cargo build --release --bin {binary}").run()?;
    }
    Ok(())
}

/// Print a systemd unit that starts `binary` at boot.
fn unit(binary: &str) -> Result<(), anyhow::Error> {
    if !binaries()?.iter().any(|b| b == binary) {
        anyhow::bail!("unknown binary {}, expected one of {:?}", binary, binaries()?);
    }
    print!(
        "[Unit]\n\
         Description=Hold-to-shutdown button ({binary})\n\
         After=sysinit.target\n\
         \n\
         [Service]\n\
         ExecStart=/usr/local/bin/{binary}\n\
         Environment=RUST_LOG=info\n\
         Restart=on-failure\n\
         \n\
         [Install]\n\
         WantedBy=multi-user.target\n",
        binary = binary
    );
    Ok(())
}

/// Binary targets declared in the device manifest.
fn binaries() -> Result<Vec<String>, anyhow::Error> {
    let mut manifest = device_dir();
    manifest.push("Cargo.toml");
    let manifest: toml::Value = toml::from_str(&fs::read_to_string(&manifest)?)?;

    let bins = manifest
        .get("bin")
        .and_then(|b| b.as_array())
        .map(|bins| {
            bins.iter()
                .filter_map(|b| b.get("name").and_then(|n| n.as_str()))
                .map(|n| n.to_string())
                .collect()
        })
        .unwrap_or_default();
    Ok(bins)
}

fn device_dir() -> PathBuf {
    let mut device = root_dir();
    device.push("device");
    device
}

fn root_dir() -> PathBuf {
    let mut xtask_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    xtask_dir.pop();
    xtask_dir
}
