use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use topup::Money;

#[derive(Parser, Debug)]
#[command(version, about = "Spread new money over a portfolio towards its target allocation")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Plan whole-unit stock purchases
    Stocks {
        #[arg(help = "Invest file with holdings, target allocation and stocks")]
        invest_file: PathBuf,
        #[arg(help = "Money to invest")]
        amount: Money,
        #[arg(short, long, help = "Price CSV (Symbol,Price[,Name])")]
        prices: Option<PathBuf>,
    },
    /// Split an investment over fractional-share funds
    Funds {
        #[arg(help = "Fund file with shares, allocations and fees")]
        fund_file: PathBuf,
        #[arg(help = "Money to invest")]
        amount: Money,
        #[arg(short, long, help = "Price CSV (Symbol,Price[,Name])")]
        prices: Option<PathBuf>,
        #[arg(
            short,
            long,
            default_value = "0",
            help = "Skip funds that would get less than this"
        )]
        minimum_investment: Money,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
