//! Service Configuration
//!
//! Resolves the runtime settings of the binary. Each setting is taken from the command
//! line first, then from the environment, then from a built-in default.
//!
//! | Flag        | Environment            | Default          |
//! |-------------|------------------------|------------------|
//! | `--bind`    | `POST_SERVICE_BIND`    | `127.0.0.1:3000` |
//! | `--data`    | `POST_SERVICE_DATA`    | `database.json`  |
//! | `--base`    | `POST_SERVICE_BASE`    | (none)           |
//! | `--verbose` |                        | `INFO` logging   |

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const ENV_BIND: &str = "POST_SERVICE_BIND";
pub const ENV_DATA: &str = "POST_SERVICE_DATA";
pub const ENV_BASE: &str = "POST_SERVICE_BASE";

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA: &str = "database.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub data_file: PathBuf,
    pub base_path: String,
    pub log_level: tracing::Level,
}

impl ServiceConfig {
    /// Reads the process arguments and environment.
    pub fn from_env() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        Self::resolve(&args, |key| std::env::var(key).ok())
    }

    /// Resolves the configuration from `args` (without the program name) and an
    /// environment lookup.
    pub fn resolve<F>(args: &[String], env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut bind: Option<String> = None;
        let mut data: Option<String> = None;
        let mut base: Option<String> = None;
        let mut log_level = tracing::Level::INFO;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    bind = Some(flag_value(args, i)?);
                    i += 2;
                }
                "--data" => {
                    data = Some(flag_value(args, i)?);
                    i += 2;
                }
                "--base" => {
                    base = Some(flag_value(args, i)?);
                    i += 2;
                }
                "--verbose" => {
                    log_level = tracing::Level::DEBUG;
                    i += 1;
                }
                other => {
                    anyhow::bail!("Unknown argument: {}", other);
                }
            }
        }

        let bind = bind
            .or_else(|| env(ENV_BIND))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr: SocketAddr = bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind))?;

        let data_file = PathBuf::from(
            data.or_else(|| env(ENV_DATA))
                .unwrap_or_else(|| DEFAULT_DATA.to_string()),
        );
        let base_path = base.or_else(|| env(ENV_BASE)).unwrap_or_default();

        Ok(Self {
            bind_addr,
            data_file,
            base_path,
            log_level,
        })
    }
}

/// Program name from a full argv, with a fallback when argv is empty.
pub fn program_name(argv: &[String]) -> &str {
    argv.first().map_or("post-service", String::as_str)
}

/// Everything after the program name; empty when argv is empty.
pub fn flag_args(argv: &[String]) -> &[String] {
    argv.get(1..).unwrap_or_default()
}

/// True when the arguments ask for usage text.
pub fn help_requested(args: &[String]) -> bool {
    args.iter().any(|arg| arg == "--help" || arg == "-h")
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} [--bind <addr:port>] [--data <file>] [--base <path>] [--verbose]\n\
         Example: {program} --bind 127.0.0.1:3000 --data database.json\n\
         Example: {program} --bind 0.0.0.0:8080 --base /api --verbose"
    )
}

fn flag_value(args: &[String], i: usize) -> Result<String> {
    args.get(i + 1)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("{} requires a value", args[i]))
}
