//! Agent Premiums CLI
//!
//! Builds the agent premium report from a submissions export, prints it and
//! optionally writes the PDF summary.

use agent_premiums::config::load_options;
use agent_premiums::pdf::{save_pdf, PdfContext};
use agent_premiums::report::{build_report, format_currency, AgentReport, FilterState, TeamFilter, TimePeriod};
use agent_premiums::submission::load_submissions;
use agent_premiums::submission::normalize::parse_submit_date;
use agent_premiums::team::load_team_assignments;
use agent_premiums::{Language, SortBy, SubmissionCatalog, SubmissionSet, TeamAssignment, YearMonth};
use anyhow::{bail, Context};
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use log::warn;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "agent_premiums")]
#[command(about = "Monthly and annualized premium totals per writing agent", long_about = None)]
struct Cli {
    /// Submissions export (.csv)
    submissions: PathBuf,

    /// Team file mapping `Writing Agent Number` to `Team ID`
    #[arg(long)]
    teams: Option<PathBuf>,

    /// `current`, `all`, `custom` or a month as YYYY-MM
    #[arg(long, default_value = "current")]
    period: String,

    /// Start of a custom range (MM/DD/YYYY or YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    from: Option<NaiveDateTime>,

    /// End of a custom range, inclusive
    #[arg(long, value_parser = parse_date_arg)]
    to: Option<NaiveDateTime>,

    /// Keep only this agent (repeatable), e.g. "Jane Doe"
    #[arg(long = "agent")]
    agents: Vec<String>,

    /// Keep only this product (repeatable)
    #[arg(long = "product")]
    products: Vec<String>,

    /// Keep only this team label (or `NO TEAM`); every team when omitted
    #[arg(long)]
    team: Option<String>,

    /// Case-insensitive agent name search
    #[arg(long, default_value = "")]
    search: String,

    /// annualized, monthly, alphabetical or aggregated
    #[arg(long, value_parser = parse_sort_arg)]
    sort: Option<SortBy>,

    /// Keep at most this many agents (0 = all)
    #[arg(long)]
    max_records: Option<usize>,

    /// Label language: en or es
    #[arg(long, value_parser = parse_language_arg)]
    language: Option<Language>,

    /// JSON file with report options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the PDF summary to this file or directory
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// List the months, agents, products and teams available for filtering
    #[arg(long)]
    list: bool,
}

fn parse_date_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_submit_date(value).ok_or_else(|| format!("unrecognized date: {}", value))
}

fn parse_sort_arg(value: &str) -> Result<SortBy, String> {
    value.parse().map_err(|e: agent_premiums::ReportError| e.to_string())
}

fn parse_language_arg(value: &str) -> Result<Language, String> {
    value.parse().map_err(|e: agent_premiums::ReportError| e.to_string())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let parsed = load_submissions(&cli.submissions)
        .with_context(|| format!("failed to read {}", cli.submissions.display()))?;
    if let Some(issue) = parsed.blocking_issue() {
        bail!("{}: {}", cli.submissions.display(), issue);
    }
    for issue in parsed.warnings() {
        warn!("{}", issue);
    }
    let submissions = SubmissionSet::new(parsed.rows);

    let teams = match &cli.teams {
        Some(path) => load_team_assignments(path)
            .with_context(|| format!("failed to read team file {}", path.display()))?,
        None => TeamAssignment::new(),
    };

    if cli.list {
        print_catalog(&SubmissionCatalog::from_rows(submissions.rows()), &teams);
        return Ok(());
    }

    let mut options = load_options(cli.config.as_deref()).context("failed to load report options")?;
    if let Some(sort) = cli.sort {
        options.sort_by = sort;
    }
    if let Some(max_records) = cli.max_records {
        options.max_records = max_records;
    }
    if let Some(language) = cli.language {
        options.language = language;
    }

    let filters = FilterState {
        period: time_period(&cli)?,
        agents: cli.agents.iter().map(|a| a.trim().to_string()).collect(),
        products: cli.products.iter().map(|p| p.trim().to_string()).collect(),
        team: TeamFilter::from_selection(cli.team.as_deref()),
        search: cli.search.clone(),
    };

    let now = Local::now().naive_local();
    let report = build_report(&submissions, &teams, &filters, &options, now.date());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, options.language);
    }

    if let Some(target) = &cli.pdf {
        let context = PdfContext { language: options.language, generated_at: now };
        let path = save_pdf(&report, &context, target)
            .with_context(|| format!("failed to write PDF to {}", target.display()))?;
        println!("\nPDF written to {}", path.display());
    }

    Ok(())
}

fn time_period(cli: &Cli) -> anyhow::Result<TimePeriod> {
    let period = match cli.period.trim().to_lowercase().as_str() {
        "current" => TimePeriod::CurrentMonth,
        "all" => TimePeriod::AllTime,
        "custom" => TimePeriod::Custom { from: cli.from, to: cli.to },
        other => TimePeriod::Month(
            other
                .parse::<YearMonth>()
                .with_context(|| format!("invalid --period {}", cli.period))?,
        ),
    };
    Ok(period)
}

fn print_report(report: &AgentReport, language: Language) {
    println!("Agent Premiums - {}", report.period.label(language));
    println!("==============================================\n");

    if report.skipped_rows > 0 {
        println!("{} rows skipped (unparseable submit date)\n", report.skipped_rows);
    }

    println!(
        "{:<16} {:<28} {:>16} {:>16} {:>18} {:>5}  Products",
        "Team", "Agent", "Monthly", "Previous Month", "Annualized", "Subs"
    );
    for row in &report.rows {
        let products = row
            .aggregate
            .products
            .iter()
            .map(|p| format!("{} ({})", p, row.aggregate.product_counts.get(p).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:<16} {:<28} {:>16} {:>16} {:>18} {:>5}  {}",
            row.team,
            row.aggregate.agent_name,
            format_currency(row.aggregate.monthly_premium),
            row.previous_annualized.map(format_currency).unwrap_or_else(|| "-".to_string()),
            format_currency(row.aggregate.annualized_premium),
            row.aggregate.submission_count(),
            products
        );
    }
    println!(
        "{:<16} {:<28} {:>16} {:>16} {:>18}",
        "TOTAL",
        "",
        format_currency(report.total_monthly),
        format_currency(report.total_previous),
        format_currency(report.total_annualized)
    );
    println!("\nShowing {} of {} agents", report.displayed_records, report.total_records);
}

fn print_catalog(catalog: &SubmissionCatalog, teams: &TeamAssignment) {
    let months = catalog.available_months.iter().map(ToString::to_string).collect::<Vec<_>>();
    println!("Months:   {}", months.join(", "));
    println!("Agents:   {}", catalog.agents.join(", "));
    println!("Products: {}", catalog.products.join(", "));
    println!("Teams:    {}", teams.teams().join(", "));
}
