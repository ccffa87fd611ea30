// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Arguments shared by every command that addresses one catalog entry.
#[derive(Args, Debug, Clone)]
pub(crate) struct PolicySelector {
    #[arg(long)]
    pub(crate) category: String,
    #[arg(long)]
    pub(crate) policy: String,
    /// Environment id (dev, test, prod). Defaults to GOVHARNESS_ENVIRONMENT, then dev.
    #[arg(long)]
    pub(crate) environment: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum CatalogCommand {
    /// List catalog entries, optionally for one category.
    List {
        #[arg(long)]
        category: Option<String>,
    },
    /// Run static checks over every entry and environment overlay.
    Lint,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the effective configuration for one policy test run.
    Resolve {
        #[command(flatten)]
        selector: PolicySelector,
    },
    /// Generate a length-bounded resource name for a role.
    Name {
        #[command(flatten)]
        selector: PolicySelector,
        /// compliant, nonCompliant or exempted.
        #[arg(long)]
        role: String,
    },
    /// Resolve the policy definition file path.
    Path {
        #[arg(long)]
        category: String,
        #[arg(long)]
        policy: String,
        /// Root the definition path is joined onto. Defaults to the current directory.
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Check the active session and target scope.
    Validate {
        #[command(flatten)]
        selector: PolicySelector,
    },
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Print the modules required by a module group.
    Modules { group: String },
    /// Print the tags defined for a purpose.
    Tags { purpose: String },
    Completion {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    Version,
}
