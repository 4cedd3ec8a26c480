//! Print the GraphQL schema as SDL.
//!
//! # Examples
//! ```sh
//! cargo run --manifest-path backend/Cargo.toml --bin graphql-sdl-dump -- --output schema.graphql
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use accounts::domain::AccountService;
use accounts::inbound::graphql::build_schema;
use accounts::outbound::password::Argon2PasswordHasher;
use accounts::outbound::persistence::InMemoryUserRepository;
use clap::Parser;

/// `graphql-sdl-dump` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "graphql-sdl-dump",
    about = "Print the account GraphQL schema in SDL form",
    version
)]
struct CliArgs {
    /// Write the SDL to this file instead of standard output.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;

    // Adapters are never invoked; they only satisfy the schema's data.
    let service = AccountService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2PasswordHasher::new()),
    );
    let sdl = build_schema(service).sdl();

    match args.output {
        Some(path) => fs::write(&path, sdl).map_err(|error| {
            io::Error::new(
                error.kind(),
                format!("write SDL to {}: {error}", path.display()),
            )
        }),
        None => io::stdout().lock().write_all(sdl.as_bytes()),
    }
}
