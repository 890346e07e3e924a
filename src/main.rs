//! roster - employee roster manager
//!
//! Search, sort, add, edit and delete employees from a dashboard or the shell

use clap::{Args, Parser, Subcommand};
use roster::commands::{self, FieldArgs, OutputFormat};
use roster::config::{self, RosterPaths};
use roster::logging;
use roster::models::{Gender, SortKey};

#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about = "Employee roster manager with a terminal dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize roster (first-time setup)
    Init,

    /// Launch TUI dashboard (default)
    Tui,

    /// List employees
    List {
        /// Case-insensitive substring of the name
        #[arg(short, long)]
        search: Option<String>,

        /// Sort by: id, name, or address
        #[arg(long)]
        sort: Option<SortKey>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an employee by ID
    Show {
        /// Employee ID
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an employee
    Add {
        #[command(flatten)]
        fields: FieldFlags,
    },

    /// Edit an employee; omitted fields are kept
    Edit {
        /// Employee ID
        id: u64,

        #[command(flatten)]
        fields: FieldFlags,
    },

    /// Delete an employee
    Remove {
        /// Employee ID
        id: u64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every employee and the stored roster key
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
struct FieldFlags {
    /// Full name (required when adding)
    #[arg(short, long)]
    name: Option<String>,

    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    dob: Option<String>,

    /// Gender: unspecified, male, or female
    #[arg(short, long)]
    gender: Option<Gender>,

    #[arg(short, long)]
    email: Option<String>,

    #[arg(short, long)]
    address: Option<String>,
}

impl From<FieldFlags> for FieldArgs {
    fn from(flags: FieldFlags) -> Self {
        FieldArgs {
            name: flags.name,
            dob: flags.dob,
            gender: flags.gender,
            email: flags.email,
            address: flags.address,
        }
    }
}

fn output_format(json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        OutputFormat::Summary
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let paths = RosterPaths::new()?;
    let config = config::load_config(&paths)?;
    logging::init(&paths, &config)?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Init => {
            commands::init(&paths)?;
        }
        Commands::Tui => {
            commands::tui(&paths)?;
        }
        Commands::List { search, sort, json } => {
            commands::list(&paths, search.as_deref(), sort, output_format(json))?;
        }
        Commands::Show { id, json } => {
            commands::show(&paths, id, output_format(json))?;
        }
        Commands::Add { fields } => {
            commands::add(&paths, fields.into())?;
        }
        Commands::Edit { id, fields } => {
            commands::edit(&paths, id, fields.into())?;
        }
        Commands::Remove { id, yes } => {
            commands::remove(&paths, id, yes)?;
        }
        Commands::Reset { yes } => {
            commands::reset(&paths, yes)?;
        }
    }

    Ok(())
}
