use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;

use sshcrack::{
    config::{CliOverrides, Mode, RunConfig, RunConfigFile},
    driver, hostlist, report, resolve, wordlist, Ssh2Dialer,
};

/// Discover which candidate secret, if any, authenticates against a target
/// SSH endpoint.
#[derive(Parser, Debug)]
#[command(name = "sshcrack", about = "SSH credential-discovery dictionary attack")]
struct Args {
    /// Optional TOML config file; CLI flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// "single" or "hostlist".
    #[arg(long)]
    mode: Option<String>,

    /// Single-target `USER@ADDRESS`. Required when `--mode single`.
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<String>,

    #[arg(long)]
    concurrency: Option<usize>,

    #[arg(long = "timeout-ms")]
    timeout_ms: Option<u64>,

    #[arg(long = "wordlist")]
    wordlist_path: Option<String>,

    #[arg(long = "hostlist")]
    hostlist_path: Option<String>,

    #[arg(long)]
    verbose: bool,

    #[arg(long)]
    output: Option<String>,
}

fn main() {
    let args = Args::parse();

    let file = match &args.config {
        Some(path) => match RunConfigFile::load(path) {
            Ok(f) => Some(f),
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                std::process::exit(1);
            }
        },
        None => None,
    };

    let overrides = CliOverrides {
        mode: args.mode.clone(),
        port: args.port.clone(),
        concurrency: args.concurrency,
        timeout_ms: args.timeout_ms,
        wordlist_path: args.wordlist_path.clone(),
        hostlist_path: args.hostlist_path.clone(),
        verbose: if args.verbose { Some(true) } else { None },
        output_path: args.output.clone(),
    };

    let config = match RunConfig::resolve(file, overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            std::process::exit(1);
        }
    };

    let secrets = match wordlist::load(std::path::Path::new(&config.wordlist_path)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", format!("could not read wordlist: {e}").red());
            std::process::exit(1);
        }
    };

    let entries = match config.mode {
        Mode::Single => {
            let host = args.host.clone().unwrap_or_else(|| {
                eprintln!("{}", "--host is required in single mode".red());
                std::process::exit(1);
            });
            match hostlist::parse_line(&host, None) {
                Ok(entry) => vec![entry],
                Err(e) => {
                    eprintln!("{}", format!("invalid --host: {e}").red());
                    std::process::exit(1);
                }
            }
        }
        Mode::Hostlist => {
            let path = config
                .hostlist_path
                .as_deref()
                .expect("RunConfig::resolve guarantees hostlist_path in hostlist mode");
            match hostlist::load(std::path::Path::new(path), None) {
                Ok(entries) => entries,
                Err(e) => {
                    eprintln!("{}", format!("could not read host list: {e}").red());
                    std::process::exit(1);
                }
            }
        }
    };

    let dialer: Arc<dyn sshcrack::Dialer> = Arc::new(Ssh2Dialer);
    let timeout: Duration = config.timeout;

    // Hosts are processed strictly one at a time, in file order; all
    // parallelism lives inside one host's dictionary sweep.
    for entry in &entries {
        let target = match resolve::resolve(entry, &config.port) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("{}", report::resolution_failure_line(&entry.host, &e.cause).yellow());
                continue;
            }
        };

        if config.verbose {
            eprintln!("[{}] resolved to {}", target.label, target.address);
        }

        let opts = driver::AttemptOptions {
            address: target.address.clone(),
            port: config.port.clone(),
            username: target.username.clone(),
            secrets: secrets.clone(),
            concurrency: config.concurrency,
            timeout,
        };

        match driver::run(opts, Arc::clone(&dialer)) {
            Ok(secret) => {
                let line = report::success_line(&target.username, &target.label, &secret);
                println!("{}", line.green());
                if let Some(output_path) = &config.output_path {
                    append_line(output_path, &line);
                }
            }
            Err(driver::DriverError::AuthenticationExhausted) => {
                let line = report::exhausted_line(&target.username, &target.label);
                println!("{}", line.yellow());
            }
            Err(driver::DriverError::TransportFailure(cause)) => {
                let line = report::transport_failure_line(&target.username, &target.label, &cause);
                println!("{}", line.red());
            }
            Err(driver::DriverError::InvalidInput(field)) => {
                eprintln!("{}", format!("invalid driver input: {field}").red());
            }
        }
    }
}

fn append_line(path: &str, line: &str) {
    use std::io::Write;
    let result = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| writeln!(f, "{line}"));
    if let Err(e) = result {
        eprintln!("{}", format!("could not append to {path}: {e}").red());
    }
}
