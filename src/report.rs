//! Console tables for plans and portfolios.

use rust_decimal::{Decimal, RoundingStrategy};
use tabled::{Table, Tabled, settings::Style};

use crate::{
    Result,
    funds::{FundPortfolio, Investment},
    money::{Money, Percent},
    pricer::{SharePricer, StockPricer},
    stocks::{Buy, Portfolio, TargetAllocation},
};

fn table<T: Tabled>(rows: Vec<T>) -> String {
    Table::new(rows).with(Style::psql()).to_string()
}

fn percent(value: Decimal) -> String {
    format!("{}%", Percent::new(value))
}

fn signed_percent(value: Decimal) -> String {
    let rounded = Percent::new(value);
    if rounded.value().is_zero() {
        format!("+{}%", Percent::ZERO)
    } else if rounded.value().is_sign_negative() {
        format!("{rounded}%")
    } else {
        format!("+{rounded}%")
    }
}

#[derive(Tabled)]
struct HoldingRow {
    #[tabled(rename = "Stock")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn stock_portfolio(portfolio: &Portfolio, pricer: &impl StockPricer) -> Result<String> {
    let mut rows = Vec::new();
    for (stock, amount) in portfolio.iter() {
        let price = pricer.price(stock)?;
        rows.push(HoldingRow {
            name: pricer.name(stock)?,
            amount: amount.to_string(),
            price: price.to_string(),
            value: (price * amount).to_string(),
        });
    }
    rows.push(HoldingRow {
        name: "Total value".into(),
        amount: String::new(),
        price: String::new(),
        value: portfolio.value(pricer)?.to_string(),
    });
    Ok(table(rows))
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Asset class")]
    asset_class: String,
    #[tabled(rename = "Allocation")]
    allocation: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Deviation")]
    deviation: String,
}

pub fn asset_class_balance(
    portfolio: &Portfolio,
    target: &TargetAllocation,
    pricer: &impl StockPricer,
) -> Result<String> {
    let mut asset_classes = portfolio.asset_classes();
    asset_classes.extend(target.asset_classes());
    let mut rows = Vec::new();
    for asset_class in asset_classes {
        let current = portfolio.asset_class_percent(asset_class, pricer)?;
        let wanted = target.get(asset_class).value();
        rows.push(BalanceRow {
            asset_class: asset_class.to_string(),
            allocation: percent(current),
            target: percent(wanted),
            deviation: signed_percent(current - wanted),
        });
    }
    Ok(table(rows))
}

#[derive(Tabled)]
struct BuyRow {
    #[tabled(rename = "Buy")]
    amount: u32,
    #[tabled(rename = "Stock")]
    symbol: String,
    #[tabled(rename = "Cost")]
    cost: Money,
    #[tabled(rename = "Share")]
    share: String,
}

pub fn buys(buys: &[Buy], pricer: &impl StockPricer) -> Result<String> {
    let mut costs = Vec::with_capacity(buys.len());
    for buy in buys {
        costs.push(pricer.price(&buy.stock)? * buy.amount);
    }
    let spent: Money = costs.iter().copied().sum();
    let rows = buys
        .iter()
        .zip(costs)
        .map(|(buy, cost)| BuyRow {
            amount: buy.amount,
            symbol: buy.stock.symbol.clone(),
            cost,
            share: format!(
                "{}%",
                cost.percent_of(spent)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            ),
        })
        .collect();
    Ok(table(rows))
}

#[derive(Tabled)]
struct FundRow {
    #[tabled(rename = "Fund")]
    name: String,
    #[tabled(rename = "Value")]
    value: Money,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Deviation")]
    deviation: String,
}

pub fn fund_portfolio(portfolio: &FundPortfolio, pricer: &impl SharePricer) -> Result<String> {
    let total = portfolio.value(pricer)?;
    let mut rows = Vec::new();
    for fund in portfolio.funds() {
        let value = fund.value(pricer)?;
        let actual = value.percent_of(total);
        let target = fund.target_allocation.value();
        rows.push(FundRow {
            name: fund.name.clone(),
            value,
            share: percent(actual),
            target: percent(target),
            deviation: signed_percent(actual - target),
        });
    }
    rows.push(FundRow {
        name: "Total".into(),
        value: total,
        share: String::new(),
        target: String::new(),
        deviation: String::new(),
    });
    Ok(table(rows))
}

#[derive(Tabled)]
struct InvestmentRow {
    #[tabled(rename = "Fund")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: Money,
    #[tabled(rename = "Fee")]
    fee: Money,
    #[tabled(rename = "Invested")]
    invested: Money,
}

pub fn investments(investments: &[Investment]) -> String {
    let mut rows: Vec<InvestmentRow> = investments
        .iter()
        .map(|i| InvestmentRow {
            name: i.fund.name.clone(),
            amount: i.amount,
            fee: i.fee(),
            invested: i.real_investment(),
        })
        .collect();
    rows.push(InvestmentRow {
        name: "Total".into(),
        amount: rows.iter().map(|r| r.amount).sum(),
        fee: rows.iter().map(|r| r.fee).sum(),
        invested: rows.iter().map(|r| r.invested).sum(),
    });
    table(rows)
}
