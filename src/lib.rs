//! cstore-query — thin client for the `cli-shell-api` configuration store.
//!
//! Answers "does this path exist", "is this node a tag/multi/leaf node" and
//! "what value lives here" by running the store's shell API as a subprocess
//! and parsing what it prints. The configuration tree, sessions and commit
//! logic all live behind that executable.
//!
//! ```no_run
//! use cstore_query::{ClientConfig, ConfigQueryClient};
//!
//! let client = ConfigQueryClient::new(ClientConfig::default())?;
//! if client.exists("interfaces ethernet") {
//!     for nic in client.list_nodes("interfaces ethernet")? {
//!         println!("{nic}");
//!     }
//! }
//! # Ok::<(), cstore_query::QueryError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
mod invoke;
pub mod op;
pub mod parse;

pub use client::ConfigQueryClient;
pub use config::{parse_env_ref, resolve_env_vars, ClientConfig, DEFAULT_EXECUTABLE};
pub use error::{QueryError, Result};
pub use op::Operation;
pub use parse::split_quoted;
