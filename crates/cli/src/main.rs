mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "vlens",
    version,
    about = "Search markdown notes, resurface old ones and explore backlinks"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search notes by free text, tags and frontmatter
    Search(SearchArgs),

    /// Show outbound links and backlinks of a note
    Related(RelatedArgs),

    /// List notes due for review, stalest first
    Review(ReviewArgs),

    /// Show the one-hop link neighbourhood of notes
    Graph(GraphArgs),
}

/// Output format for query commands.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Quiet,
}

/// Tag and frontmatter filters shared by query commands.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Require a tag (repeatable, all must match)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Require a frontmatter value as key=value (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    pub metadata: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Text to look for; omit to list everything matching the filters
    pub term: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct RelatedArgs {
    /// Note path or title
    pub note: String,

    /// Shorthand for --output json
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ReviewArgs {
    /// Maximum number of notes (overrides config)
    #[arg(long)]
    pub limit: Option<usize>,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct GraphArgs {
    /// Seed note paths or titles
    #[arg(required = true)]
    pub seeds: Vec<String>,

    /// Shorthand for --output json
    #[arg(long)]
    pub json: bool,
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Search(args) => cmd::search::run(config, profile, args),
        Commands::Related(args) => cmd::related::run(config, profile, args),
        Commands::Review(args) => cmd::review::run(config, profile, args),
        Commands::Graph(args) => cmd::graph::run(config, profile, args),
    }
}
