//! Print the table of a generated agent premiums PDF
//!
//! Usage: read_report <report.pdf> [--json]

use agent_premiums::pdf::read_table;
use agent_premiums::report::format_currency;
use anyhow::Context;
use std::env;
use std::fs;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let path = env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .context("usage: read_report <report.pdf> [--json]")?;

    let bytes = fs::read(&path).with_context(|| format!("failed to read {}", path))?;
    let table = read_table(&bytes).with_context(|| format!("failed to read report table from {}", path))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("{:<16} {:<28} {:>16} {:>18}", "Team", "Agent", "Previous Month", "Annualized");
    for row in &table.rows {
        println!(
            "{:<16} {:<28} {:>16} {:>18}",
            row.team,
            row.agent_name,
            row.previous.map(format_currency).unwrap_or_else(|| "-".to_string()),
            format_currency(row.annualized)
        );
    }
    if let Some(totals) = &table.totals {
        println!(
            "{:<16} {:<28} {:>16} {:>18}",
            "TOTAL",
            "",
            format_currency(totals.previous),
            format_currency(totals.annualized)
        );
    }
    println!("\n{} agents", table.rows.len());

    Ok(())
}
