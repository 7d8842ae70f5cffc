use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::pages::MarketplaceTab;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show stats, active loans, recent transactions and marketplace highlights
    Dashboard,
    /// List marketplace loans
    Marketplace {
        #[arg(short, long, value_enum, default_value_t = TabArg::Requests)]
        tab: TabArg,
    },
    /// Fund a loan request or take a loan offer
    Accept { id: i64 },
    /// Sign in and print the session cookie
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabArg {
    Requests,
    Offers,
}

impl From<TabArg> for MarketplaceTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Requests => MarketplaceTab::Requests,
            TabArg::Offers => MarketplaceTab::Offers,
        }
    }
}
