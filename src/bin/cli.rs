use tally::{
    Tracker, TrackerEvent, Totals, JsonStore, FileSlots, LedgerStore, TransactionKind,
    config::AppConfig,
    transaction::{format_amount, TransactionId}};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use anyhow::{bail, Context};
use colored::Colorize;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Path to a TOML configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Directory holding the ledger, overrides the configured one
    #[clap(short, long, value_parser)]
    data_dir: Option<PathBuf>,

    /// Action to perform
    #[clap(subcommand)]
    action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Show balance, total income and total expense
    Summary,
    /// List all transactions, newest first
    List,
    /// Record a new income or expense
    Add(AddTransaction),
    /// Delete a transaction after confirmation
    Remove(RemoveTransaction),
    /// Show the selectable categories
    Categories
}

#[derive(Args, Debug)]
struct AddTransaction {
    /// `expense` or `income`
    #[clap(short='t', long="type", value_parser, default_value_t = TransactionKind::Expense)]
    kind: TransactionKind,

    #[clap(short, long, value_parser)]
    amount: String,

    /// Category id, defaults to the first category of the type
    #[clap(short, long, value_parser)]
    category: Option<String>,

    #[clap(short, long, value_parser, default_value_t = String::new())]
    note: String
}

#[derive(Args, Debug)]
struct RemoveTransaction {
    /// Id of the transaction to delete
    #[clap(value_parser)]
    id: TransactionId,

    /// Skip the confirmation prompt
    #[clap(short, long)]
    yes: bool
}

fn colored_amount(amount: f64) -> colored::ColoredString {
    let text = format_amount(amount);
    if amount < 0.0 {
        text.bright_red()
    } else if amount > 0.0 {
        text.green()
    } else {
        text.normal()
    }
}

fn print_totals(totals: &Totals) {
    println!("{}: {}", "Balance".bold(), colored_amount(totals.balance));
    println!("{}: {}", "Income".bold(), format_amount(totals.income).green());
    println!("{}: {}", "Expense".bold(), format_amount(totals.expense).bright_red());
}

fn print_categories<S: LedgerStore>(tracker: &Tracker<S>) {
    for kind in [TransactionKind::Expense, TransactionKind::Income] {
        println!("{}", kind.to_string().bold());
        for category in tracker.catalog().categories(kind) {
            println!("  {} {} {}", category.id, category.icon, category.name);
        }
    }
}

impl AddTransaction {
    fn add<S: LedgerStore>(&self, tracker: &mut Tracker<S>) -> anyhow::Result<()> {
        let category = match &self.category {
            Some(id) => id.clone(),
            None => tracker.catalog().first(self.kind)
                .map(|c| c.id.clone())
                .unwrap_or_default()
        };

        match tracker.add(&self.amount, self.kind, &category, &self.note) {
            Some(id) => {
                println!("Recorded #{}", id);
                Ok(())
            },
            None => match tracker.last_event() {
                Some(TrackerEvent::Rejected { reason }) => bail!("not recorded: {}", reason),
                _ => bail!("not recorded")
            }
        }
    }
}

impl RemoveTransaction {
    fn remove<S: LedgerStore>(&self, tracker: &mut Tracker<S>) -> anyhow::Result<()> {
        let yes = self.yes;
        let removed = tracker.remove(self.id, |transaction| {
            yes || confirm(&format!("Delete {}?", transaction)).unwrap_or(false)
        });

        if removed {
            println!("Deleted #{}", self.id);
        } else if let Some(TrackerEvent::RemoveMissing { id }) = tracker.last_event() {
            bail!("no such transaction id: {}", id);
        }
        Ok(())
    }
}

fn confirm(question: &str) -> io::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn report_save_failure<S: LedgerStore>(tracker: &Tracker<S>) {
    if let Some(TrackerEvent::SaveFailed { reason }) = tracker.last_event() {
        eprintln!("{}: {}", "warning".yellow(), reason);
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();

    let config = match &args.config {
        Some(path) => AppConfig::read(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::default()
    };
    let data_dir = args.data_dir.clone().unwrap_or(config.storage.data_dir.clone());

    let store = JsonStore::with_key(FileSlots::new(&data_dir), &config.storage.key);
    let mut tracker = Tracker::open(store, config.catalog()?);

    match args.action {
        Subcommands::Summary => {
            print_totals(&tracker.totals());
        },
        Subcommands::List => {
            for t in tracker.transactions() {
                println!("{}", t);
            }
        },
        Subcommands::Add(add) => {
            add.add(&mut tracker)?;
            report_save_failure(&tracker);
        },
        Subcommands::Remove(remove) => {
            remove.remove(&mut tracker)?;
            report_save_failure(&tracker);
        },
        Subcommands::Categories => {
            print_categories(&tracker);
        }
    }

    Ok(())
}
