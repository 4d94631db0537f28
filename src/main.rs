//! FinBuddy Notify CLI
//!
//! Process-boundary adapter around the notification engine: scripted demo
//! alerts and JSONL replay of submit requests.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use finbuddy_notify::{
    ActionButton, EngineConfig, NotificationEngine, NotificationRequest, Urgency,
};

#[derive(Parser)]
#[command(name = "fbn")]
#[command(about = "FinBuddy Notify - proactive notification decision engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one of the scripted demo alerts
    Demo(DemoArgs),
    /// Replay submit requests from a JSONL file through the engine
    Run(RunArgs),
}

#[derive(Args)]
struct DemoArgs {
    scenario: DemoScenario,
    /// User the alert is addressed to
    #[arg(long, default_value = "default_user")]
    user: String,
    /// Skip actual channel sends
    #[arg(long)]
    dry_run: bool,
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RunArgs {
    /// Input file, one submit request per line
    #[arg(long, short)]
    input: PathBuf,
    /// User for the digest and query
    #[arg(long, default_value = "default_user")]
    user: String,
    /// Evaluate every decision as if it were this hour of today (0-23)
    #[arg(long)]
    at_hour: Option<u32>,
    /// Trigger a digest after the replay
    #[arg(long)]
    digest: bool,
    /// Query only unread notifications
    #[arg(long)]
    unread_only: bool,
    /// Query limit
    #[arg(long)]
    limit: Option<usize>,
    /// Skip actual channel sends
    #[arg(long)]
    dry_run: bool,
    /// Output JSON format
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DemoScenario {
    /// Budget overspend alert from the budget guardian
    BudgetAlert,
    /// GST registration threshold warning
    GstWarning,
    /// Detected monthly surplus to allocate
    SavingsOpportunity,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Demo(args) => run_demo(args),
        Commands::Run(args) => run_replay(args),
    }
}

fn build_engine(dry_run: bool) -> Result<NotificationEngine> {
    let config = EngineConfig::load()?;
    NotificationEngine::builder()
        .config(config)
        .dry_run(dry_run)
        .build()
}

fn run_demo(args: DemoArgs) -> Result<()> {
    let engine = build_engine(args.dry_run)?;
    let request = demo_request(args.scenario, &args.user);
    let notification = engine.submit(request);
    let stored = engine.notifications(&args.user, false, None);
    let delivered = stored.iter().any(|n| n.id == notification.id);

    if args.json {
        let output = serde_json::json!({
            "notification": notification,
            "delivered": delivered,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let verdict = if delivered { "delivered" } else { "suppressed" };
        println!("{}  [{}] {}", verdict, notification.urgency, notification.title);
        println!("{}", notification.message);
    }
    Ok(())
}

fn run_replay(args: RunArgs) -> Result<()> {
    let engine = build_engine(args.dry_run)?;
    let now = match args.at_hour {
        Some(hour) => clock_at_hour(hour)?,
        None => Local::now(),
    };

    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file {}", args.input.display()))?;

    let mut submitted = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let request: NotificationRequest = serde_json::from_str(line)
            .with_context(|| format!("Invalid submit request on line {}", index + 1))?;
        submitted.push(engine.submit_at(request, now));
    }

    if args.digest {
        engine.send_digest_at(&args.user, now);
    }

    let stored = engine.notifications(&args.user, args.unread_only, args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stored)?);
        return Ok(());
    }

    for notification in &submitted {
        let delivered = stored.iter().any(|n| n.id == notification.id);
        let verdict = if delivered { "delivered " } else { "suppressed" };
        println!("{}  [{}] {}", verdict, notification.urgency, notification.title);
    }
    println!(
        "Stored {} notification(s) for query (unread_only={})",
        stored.len(),
        args.unread_only
    );
    Ok(())
}

fn clock_at_hour(hour: u32) -> Result<DateTime<Local>> {
    Local::now()
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .and_then(|naive| naive.and_local_timezone(Local).single())
        .ok_or_else(|| anyhow!("Invalid hour {}", hour))
}

fn demo_request(scenario: DemoScenario, user: &str) -> NotificationRequest {
    match scenario {
        DemoScenario::BudgetAlert => NotificationRequest::new(
            user,
            "🚨 Budget Alert: Food Category",
            "You've spent ₹8,500 of ₹10,000 food budget (85%). At this pace, you'll exceed by ₹2,300. Suggested action: Limit dining out to ₹500 for next 10 days.",
            Urgency::High,
            "budget_guardian",
        )
        .with_action_buttons(vec![
            ActionButton::new("Accept Suggestion", "accept_budget_plan"),
            ActionButton::new("Adjust Budget", "adjust_budget"),
            ActionButton::new("Ignore", "dismiss"),
        ])
        .with_data(data_map(&[
            ("category", serde_json::json!("Food")),
            ("current", serde_json::json!(8500)),
            ("budget", serde_json::json!(10000)),
            ("percentage", serde_json::json!(85)),
        ])),
        DemoScenario::GstWarning => NotificationRequest::new(
            user,
            "⚠️ GST Compliance Warning",
            "Your yearly income is ₹18,50,000 (92.5% of ₹20,00,000 threshold). Only ₹1,50,000 away from mandatory GST registration. Prepare documents now.",
            Urgency::Critical,
            "compliance_monitor",
        )
        .with_action_buttons(vec![
            ActionButton::new("View Details", "view_gst_details"),
            ActionButton::new("Set Reminder", "set_reminder"),
            ActionButton::new("Talk to AI", "open_chat"),
        ])
        .with_data(data_map(&[
            ("current_income", serde_json::json!(1850000)),
            ("threshold", serde_json::json!(2000000)),
            ("percentage", serde_json::json!(92.5)),
        ])),
        DemoScenario::SavingsOpportunity => NotificationRequest::new(
            user,
            "💡 Savings Opportunity Detected",
            "I detected ₹5,000 surplus this month! Smart allocation: ₹3,000 → Emergency Fund (60% of goal), ₹2,000 → ELSS (tax saving + growth).",
            Urgency::Medium,
            "savings_optimizer",
        )
        .with_action_buttons(vec![
            ActionButton::new("Auto-Save", "auto_save"),
            ActionButton::new("Customize", "customize_savings"),
            ActionButton::new("Skip This Month", "skip"),
        ])
        .with_data(data_map(&[
            ("surplus", serde_json::json!(5000)),
            ("emergency_allocation", serde_json::json!(3000)),
            ("investment_allocation", serde_json::json!(2000)),
        ])),
    }
}

fn data_map(entries: &[(&str, serde_json::Value)]) -> serde_json::Map<String, serde_json::Value> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}
