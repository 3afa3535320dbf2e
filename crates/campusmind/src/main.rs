// SPDX-FileCopyrightText: 2026 CampusMind Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CampusMind - an on-campus mental-wellness companion.
//!
//! This is the binary entry point: it loads configuration, then runs the
//! HTTP server or one of the operator commands.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod admin;
mod doctor;
mod serve;

use clap::{Parser, Subcommand};

/// CampusMind - an on-campus mental-wellness companion.
#[derive(Parser, Debug)]
#[command(name = "campusmind", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP server.
    Serve,
    /// Give an account the administrator role.
    GrantAdmin {
        /// Identity-provider uid of the account.
        uid: String,
        /// Return the account to the student role instead.
        #[arg(long)]
        revoke: bool,
    },
    /// Check configuration and collaborator connectivity.
    Doctor {
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match campusmind_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            campusmind_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::GrantAdmin { uid, revoke }) => {
            admin::run_grant_admin(&config, &uid, revoke).await
        }
        Some(Commands::Doctor { plain }) => doctor::run_doctor(&config, plain).await,
        None => {
            println!("campusmind: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands};

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc answers epoch/stats queries.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = campusmind_config::load_and_validate_str("").expect("defaults are valid");
        assert_eq!(config.app.name, "CampusMind");
    }

    #[test]
    fn grant_admin_parses_uid_and_flag() {
        let cli = Cli::try_parse_from(["campusmind", "grant-admin", "uid-7", "--revoke"]).unwrap();
        match cli.command {
            Some(Commands::GrantAdmin { uid, revoke }) => {
                assert_eq!(uid, "uid-7");
                assert!(revoke);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn grant_admin_requires_uid() {
        assert!(Cli::try_parse_from(["campusmind", "grant-admin"]).is_err());
    }
}
