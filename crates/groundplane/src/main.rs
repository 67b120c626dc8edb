use clap::{Parser, Subcommand};
use colored::Colorize;

use groundplane_provider::{Provider, Registry};

#[derive(Parser)]
#[command(name = "groundplane")]
#[command(about = "Inspect the Groundplane provider", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print compiled schemas as JSON
    Schema {
        /// Limit output to a single resource type
        #[arg(short = 't', long = "type")]
        type_name: Option<String>,
    },
    /// List registered resource and data source types
    Resources,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Schema { type_name } => print_schemas(type_name.as_deref()),
        Commands::Resources => {
            print_registry();
            Ok(())
        }
    }
}

fn print_schemas(type_name: Option<&str>) -> anyhow::Result<()> {
    let registry = Registry::built_in();

    let output = match type_name {
        Some(name) => {
            let resources = registry.resource_schemas()?;
            let schema = resources
                .get(name)
                .ok_or_else(|| anyhow::anyhow!("unknown resource type {name:?}"))?;
            let mut object = serde_json::Map::new();
            object.insert(name.to_string(), serde_json::to_value(schema)?);
            serde_json::Value::Object(object)
        }
        None => serde_json::json!({
            "provider": Provider::schema()?,
            "resources": registry.resource_schemas()?,
            "data_sources": registry.data_source_schemas()?,
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_registry() {
    let registry = Registry::built_in();

    println!("{}", "Resources".bold());
    for name in registry.resource_names() {
        println!("  {name}");
    }
    println!();
    println!("{}", "Data sources".bold());
    for name in registry.data_source_names() {
        println!("  {name}");
    }
}
