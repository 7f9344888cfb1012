use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "dividi")]
#[command(about = "Track shared expenses and work out who pays whom")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override the directory where sessions are stored.
    #[arg(long)]
    pub data_dir: Option<String>,
    /// Override the log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current session, balances and settlements (default).
    Show,
    /// Set the session title.
    Title { title: String },
    /// Manage participants.
    Person(Person),
    /// Manage expense rows.
    Row(Row),
    /// List saved sessions, most recent first.
    History,
    /// Make a saved session the current one.
    Restore { id: Uuid },
    /// Delete a saved session from the history.
    Delete { id: Uuid },
    /// Start a new blank session (the current one stays in the history).
    Reset,
    /// Write the current rows as CSV.
    Export(ExportArgs),
}

#[derive(Args, Debug)]
pub struct Person {
    #[command(subcommand)]
    pub command: PersonCommand,
}

#[derive(Subcommand, Debug)]
pub enum PersonCommand {
    Add { name: String },
    Rm { name: String },
}

#[derive(Args, Debug)]
pub struct Row {
    #[command(subcommand)]
    pub command: RowCommand,
}

#[derive(Subcommand, Debug)]
pub enum RowCommand {
    /// Append a row, optionally filling it in.
    Add(RowFields),
    Rm { id: u64 },
    /// Edit an existing row.
    Set {
        id: u64,
        #[command(flatten)]
        fields: RowFields,
    },
}

#[derive(Args, Debug, Default)]
pub struct RowFields {
    /// Who paid; an empty string clears it.
    #[arg(long)]
    pub payer: Option<String>,
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// Amount, `.` or `,` as separator; an empty string clears it.
    #[arg(long)]
    pub amount: Option<String>,
    /// Comma-separated receivers; replaces the current selection.
    #[arg(long = "for", value_delimiter = ',', conflicts_with_all = ["all", "none"])]
    pub receivers: Option<Vec<String>>,
    /// Everybody received this expense.
    #[arg(long, conflicts_with = "none")]
    pub all: bool,
    /// Nobody received this expense.
    #[arg(long)]
    pub none: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file; stdout when omitted.
    #[arg(long)]
    pub out: Option<String>,
}
