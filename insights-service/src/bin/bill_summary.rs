use anyhow::{bail, Context, Result};
use insights_service::{observability, transform};
use std::{env, fs};
use utility_client::{domain::Bill, fixtures};

fn read_bills(path: &str) -> Result<Vec<Bill>> {
    let contents = fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    serde_json::from_str(&contents).with_context(|| format!("{path} is not a JSON array of bills"))
}

fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let (prior, current) = match args.as_slice() {
        [] => (fixtures::prior_year()?, fixtures::current_year()?),
        [prior, current] => (read_bills(prior)?, read_bills(current)?),
        _ => bail!("usage: bill_summary [<prior_year_bills.json> <current_year_bills.json>]"),
    };

    transform::validate_bills(&prior)?;
    transform::validate_bills(&current)?;

    let report = transform::TrendsReport::build(&prior, &current)?;
    let yoy = &report.year_over_year;
    tracing::info!(
        address = report.address.as_deref().unwrap_or("unknown"),
        prior_kw = yoy.total_prior_year_kw,
        current_kw = yoy.total_current_year_kw,
        difference_kw = yoy.difference_kw,
        percent_change = ?yoy.percent_change,
        slope = report.trend_line.slope,
        "bill summary"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
