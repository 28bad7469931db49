use std::path::PathBuf;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use directories::ProjectDirs;
use topup::{
    Money,
    funds::{FundPortfolio, calculate_investments},
    pricer::PriceTable,
    report,
    stocks::{InvestFile, plan_buys},
};

use crate::cli::{Cli, Command};

mod cli;

fn load_prices(path: Option<PathBuf>) -> anyhow::Result<PriceTable> {
    let Some(path) = path.or(ProjectDirs::from("org", "quotidian", "topup")
        .map(|pdirs| pdirs.config_dir().join("prices.csv")))
    else {
        anyhow::bail!("Failed to get price file path");
    };
    PriceTable::load_from_file(&path)
        .with_context(|| format!("Failed to load prices from {path:?}"))
}

fn stocks(invest_file: PathBuf, amount: Money, prices: Option<PathBuf>) -> anyhow::Result<()> {
    let pricer = load_prices(prices)?;
    let InvestFile {
        portfolio,
        target,
        available,
    } = InvestFile::load_from_file(&invest_file)
        .with_context(|| format!("Failed to load invest file {invest_file:?}"))?;

    println!("Investing {amount}");
    println!("Current portfolio");
    println!("{}", report::stock_portfolio(&portfolio, &pricer)?);
    println!("Current asset class balance");
    println!("{}", report::asset_class_balance(&portfolio, &target, &pricer)?);

    let plan = plan_buys(&portfolio, &target, &available, amount, &pricer)?;
    println!("Buys");
    println!("{}", report::buys(&plan.buys, &pricer)?);
    println!(
        "Money spent {}, remaining {}",
        plan.spent(amount),
        plan.remaining
    );
    println!("New portfolio");
    println!("{}", report::stock_portfolio(&plan.portfolio, &pricer)?);
    println!("New asset class balance");
    println!(
        "{}",
        report::asset_class_balance(&plan.portfolio, &target, &pricer)?
    );
    Ok(())
}

fn funds(
    fund_file: PathBuf,
    amount: Money,
    prices: Option<PathBuf>,
    minimum_investment: Money,
) -> anyhow::Result<()> {
    let pricer = load_prices(prices)?;
    let portfolio = FundPortfolio::load_from_file(&fund_file)
        .with_context(|| format!("Failed to load fund file {fund_file:?}"))?;

    println!("Current portfolio");
    println!("{}", report::fund_portfolio(&portfolio, &pricer)?);

    let plan = calculate_investments(&portfolio, amount, &pricer, minimum_investment)?;
    for skipped in &plan.skipped {
        println!(
            "! Fund {} falls under the minimum investment ({} < {})",
            skipped.fund.name, skipped.amount, minimum_investment
        );
    }
    println!("Investments");
    println!("{}", report::investments(&plan.investments));
    println!("New portfolio");
    println!("{}", report::fund_portfolio(&plan.portfolio, &pricer)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let opts = Cli::parse();

    match opts.command {
        Command::Stocks {
            invest_file,
            amount,
            prices,
        } => stocks(invest_file, amount, prices),
        Command::Funds {
            fund_file,
            amount,
            prices,
            minimum_investment,
        } => funds(fund_file, amount, prices, minimum_investment),
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "topup", &mut std::io::stdout());
            Ok(())
        }
    }
}
