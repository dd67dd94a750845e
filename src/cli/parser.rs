//! Command-line interface definition for timekeep.
//! Thin caller over the persistence core: projects, catalog, timer
//! lifecycle, queries, backup/restore.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "timekeep",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track time against projects and tasks, backed by SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        cmd: ProjectCmd,
    },

    /// Manage companies
    Company {
        #[command(subcommand)]
        cmd: CompanyCmd,
    },

    /// Manage work types
    Worktype {
        #[command(subcommand)]
        cmd: WorktypeCmd,
    },

    /// Manage the task-name dictionary
    Task {
        #[command(subcommand)]
        cmd: TaskCmd,
    },

    /// Start a timer session
    Start {
        /// Task description (empty reuses the project's last description)
        description: Option<String>,

        #[arg(long, help = "Project id to book the session on")]
        project: Option<i64>,

        #[arg(long, help = "Work type id")]
        worktype: Option<i64>,
    },

    /// Stop the running session
    Stop,

    /// Show the running session, if any
    Status,

    /// List sessions with totals
    List {
        #[arg(
            long,
            short,
            default_value = "today",
            help = "today, week, month, a date (YYYY-MM-DD) or a range (FROM:TO)"
        )]
        period: String,

        #[arg(long, help = "Restrict to one project id")]
        project: Option<i64>,
    },

    /// Delete a session by id
    Del { id: i64 },

    /// Mark a session as paid
    Paid { id: i64 },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: Option<String>,

        #[arg(long)]
        compress: bool,
    },

    /// Restore the database from a backup file (takes effect on next run)
    Restore {
        #[arg(long, value_name = "FILE")]
        file: String,
    },
}

#[derive(Subcommand)]
pub enum ProjectCmd {
    /// Create a project
    Add {
        name: String,

        #[arg(long, default_value = "#0000FF")]
        color: String,

        #[arg(long, default_value_t = 0.0, help = "Hourly rate (0 = unbilled)")]
        rate: f64,

        #[arg(long, help = "Company id")]
        company: Option<i64>,
    },

    /// List projects
    List,

    /// Update a project's hourly rate
    Rate { id: i64, rate: f64 },

    /// Delete a project
    Del {
        id: i64,

        #[arg(long, help = "Also delete the project's sessions")]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum CompanyCmd {
    /// Create a company
    Add { code: String, name: String },

    /// List companies
    List,

    /// Delete a company (refused while projects reference it)
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum WorktypeCmd {
    /// Create a work type
    Add {
        name: String,

        #[arg(long, default_value = "")]
        desc: String,
    },

    /// List work types
    List,

    /// Delete a work type (refused while sessions reference it)
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum TaskCmd {
    /// List task names
    List,

    /// Rename a task and update every session referencing it
    Rename { id: i64, name: String },
}
