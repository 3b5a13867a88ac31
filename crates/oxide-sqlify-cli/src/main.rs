//! sqlify CLI
//!
//! Command-line tool for parsing, rendering and whitelisting SQL.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use oxide_sqlify::{CheckType, Options, RenderMode};

/// Parse SQL into a JSON AST and render it back for any supported database.
#[derive(Parser)]
#[command(name = "sqlify")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database dialect (mysql, postgresql, transactsql, ...).
    #[arg(short, long, env = "SQLIFY_DATABASE", default_value = "mysql", global = true)]
    database: String,

    /// Parse the input exactly as given, without trimming it.
    #[arg(long, global = true)]
    no_trim: bool,

    /// Fail on AST nodes that have no rendering rule.
    #[arg(long, global = true)]
    strict: bool,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse SQL and print its JSON AST.
    Astify {
        /// SQL text; read from stdin when absent or `-`.
        sql: Option<String>,
    },

    /// Render a JSON AST as SQL.
    Sqlify {
        /// File holding the JSON AST; read from stdin when absent or `-`.
        file: Option<PathBuf>,
    },

    /// Print the tables a query touches.
    Tables {
        /// SQL text; read from stdin when absent or `-`.
        sql: Option<String>,
    },

    /// Print the columns a query touches.
    Columns {
        /// SQL text; read from stdin when absent or `-`.
        sql: Option<String>,
    },

    /// Check a query against a whitelist of authority patterns.
    Check {
        /// SQL text; read from stdin when absent or `-`.
        sql: Option<String>,

        /// Allowed pattern; repeat for several.
        #[arg(short, long = "allow")]
        allow: Vec<String>,

        /// Whether patterns match tables or columns.
        #[arg(short = 't', long = "type", default_value = "table")]
        check_type: CheckType,
    },
}

impl Cli {
    fn options(&self) -> Options {
        let mode = if self.strict {
            RenderMode::Strict
        } else {
            RenderMode::BestEffort
        };
        Options::new()
            .database(self.database.as_str())
            .trim_query(!self.no_trim)
            .mode(mode)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let opts = cli.options();
    let output = match cli.command {
        Commands::Astify { sql } => commands::astify(&commands::read_sql(sql)?, &opts)?,
        Commands::Sqlify { file } => commands::sqlify(&commands::read_file(file)?, &opts)?,
        Commands::Tables { sql } => commands::tables(&commands::read_sql(sql)?, &opts)?,
        Commands::Columns { sql } => commands::columns(&commands::read_sql(sql)?, &opts)?,
        Commands::Check {
            sql,
            allow,
            check_type,
        } => {
            let opts = opts.check_type(check_type);
            commands::check(&commands::read_sql(sql)?, &allow, &opts)?
        }
    };
    println!("{output}");

    Ok(())
}
