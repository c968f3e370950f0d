use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use eyre::{Context, Result, eyre};
use sqlfilter::requests::read_queries;
use sqlfilter::{CompileOptions, DefaultNilPredicate, FilterValue, Placeholder, Query, expand_lists, rebind};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlfilter")]
#[command(about = "Compile filter and sort parameters into parameterized SQL fragments")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a single query given on the command line
    Compile {
        /// Filter as KEY=VALUE, e.g. 'amount$gte=19200' (VALUE is parsed as JSON when possible)
        #[arg(short, long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,

        /// Sort spec, e.g. 'name,-age'
        #[arg(short, long, default_value = "")]
        sort: String,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compile every query in a JSONL or YAML file
    Batch {
        /// Path to the queries file
        path: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Fail on operand type mismatches instead of degrading them
    #[arg(long)]
    strict: bool,

    /// Reject column names outside [A-Za-z0-9_.]
    #[arg(long)]
    validate_columns: bool,

    /// Expand list arguments into one placeholder per item
    #[arg(long)]
    expand: bool,

    /// Placeholder style for the WHERE fragment
    #[arg(long, value_enum, default_value_t = PlaceholderArg::Question)]
    placeholder: PlaceholderArg,

    /// Print one JSON object per query
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlaceholderArg {
    Question,
    Dollar,
}

impl From<PlaceholderArg> for Placeholder {
    fn from(arg: PlaceholderArg) -> Self {
        match arg {
            PlaceholderArg::Question => Placeholder::Question,
            PlaceholderArg::Dollar => Placeholder::Dollar,
        }
    }
}

fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile { filters, sort, output } => {
            let mut query = Query::new().with_sort(sort);
            for pair in &filters {
                let (key, value) = parse_filter_arg(pair)?;
                query = query.with_filter(key, value);
            }
            print_compiled(&query, &output)?;
        }
        Commands::Batch { path, output } => {
            let queries = read_queries(&path).with_context(|| format!("Failed to read queries from {:?}", path))?;
            for query in &queries {
                print_compiled(query, &output)?;
            }
        }
    }

    Ok(())
}

fn parse_filter_arg(pair: &str) -> Result<(String, FilterValue)> {
    let (key, raw) = pair
        .split_once('=')
        .ok_or_else(|| eyre!("Invalid filter argument: {} (expected KEY=VALUE)", pair))?;

    let value = serde_json::from_str::<FilterValue>(raw).unwrap_or_else(|_| FilterValue::from(raw));
    Ok((key.to_string(), value))
}

fn print_compiled(query: &Query, output: &OutputArgs) -> Result<()> {
    let options = CompileOptions {
        strict_types: output.strict,
        validate_columns: output.validate_columns,
    };

    let (mut where_sql, mut args) = query.where_clause_with(&options, &DefaultNilPredicate)?;
    if output.expand {
        (where_sql, args) = expand_lists(&where_sql, &args)?;
    }
    let where_sql = rebind(&where_sql, output.placeholder.into());
    let order = query.order();
    let args_json = serde_json::to_value(&args)?;

    if output.json {
        let line = serde_json::json!({
            "where": where_sql,
            "order": order,
            "args": args_json,
        });
        println!("{}", line);
        return Ok(());
    }

    println!("{} {}", "WHERE".cyan().bold(), where_sql);
    if !order.is_empty() {
        println!("{} {}", "ORDER BY".cyan().bold(), order);
    }
    println!("{} {}", "ARGS".dimmed(), args_json);
    Ok(())
}
