//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the contentapi binary.

use clap::{Parser, Subcommand, ValueEnum};

/// Content API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "contentapi", about = "Superdesk Content API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Log requests and retries to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single resource by identifier.
    Get {
        /// The type of resource to get.
        resource: Resource,

        /// The resource identifier (or its full URI).
        id: String,

        /// Replace package association references with the referenced content.
        #[arg(long)]
        resolve: bool,
    },

    /// List resources with optional search text and pagination.
    List {
        /// The type of resource to list.
        resource: Resource,

        /// Free text search query.
        #[arg(long, short)]
        query: Option<String>,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,

        /// Number of results per page.
        #[arg(long)]
        max_results: Option<u32>,

        /// Replace package association references with the referenced content.
        #[arg(long)]
        resolve: bool,
    },
}

/// Resource types that can be operated on.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
pub enum Resource {
    /// A content item.
    #[value(alias = "items")]
    Item,
    /// A package of items and other packages.
    #[value(alias = "packages")]
    Package,
}
