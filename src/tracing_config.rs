//! Tracing configuration for analysis runs.
//!
//! Supports three output formats controlled by `TSHAPE_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`, one subtree per
//!   evaluation session
//! - `json`: one JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Follow one schema evaluation as a tree
//! TSHAPE_LOG=debug TSHAPE_LOG_FORMAT=tree cargo test --test scenarios
//!
//! # Fine-grained filtering
//! TSHAPE_LOG="tshape_schema=trace,tshape_resolver=debug" cargo test
//! ```
//!
//! The subscriber is only initialised when `TSHAPE_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Parse from the `TSHAPE_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        Self::parse(&std::env::var("TSHAPE_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `TSHAPE_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TSHAPE_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `TSHAPE_LOG` nor `RUST_LOG` is set. Output goes
/// to stderr. A second call, or a call after another subscriber was
/// installed, leaves the existing subscriber in place.
pub fn init_tracing() {
    let has_tshape_log = std::env::var("TSHAPE_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_tshape_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default()
                .with(filter)
                .with(tree_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default()
                .with(filter)
                .with(json_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    };
    if !installed {
        tracing::debug!("tracing subscriber already installed");
    }
}
