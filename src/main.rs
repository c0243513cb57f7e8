use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};

use lead_enricher::config::Config;
use lead_enricher::metrics::{self, EnrichMetrics};
use lead_enricher::pipeline::ingestion::load_path;
use lead_enricher::{
    logging, report, AreaCodeFilter, EmailKindFilter, EnrichedRecord, EnrichedTable, EnricherError,
    InputFormat, Pipeline, RecordFilter,
};

#[derive(Parser)]
#[command(name = "lead_enricher")]
#[command(about = "Prospect list enrichment and lead scoring")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $LEAD_ENRICHER_CONFIG, then ./lead_enricher.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Prospect table (CSV or JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Input encoding; `auto` looks at the extension, then the content
    #[arg(long, value_enum)]
    format: Option<InputFormat>,

    /// CSV field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// DDD area code to keep, or `all`
    #[arg(long, default_value = "all")]
    area_code: AreaCodeFilter,

    /// Email kind to keep: all, corporate or free
    #[arg(long, default_value = "all")]
    kind: EmailKindFilter,
}

impl SourceArgs {
    fn filter(&self) -> RecordFilter {
        RecordFilter::new(self.area_code.clone(), self.kind)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich the table and print the filtered leads
    Enrich {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(long, value_enum, default_value = "table")]
        output: OutputFormat,
    },
    /// Print aggregate metrics and the score distribution
    Summary {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Show the detail card for one company from the filtered list
    Lookup {
        #[command(flatten)]
        source: SourceArgs,

        /// Company name, exactly as it appears in the table
        #[arg(long)]
        company: String,
    },
    /// List the distinct DDD area codes present in the table
    AreaCodes {
        #[command(flatten)]
        source: SourceArgs,
    },
}

impl Commands {
    fn source(&self) -> &SourceArgs {
        match self {
            Commands::Enrich { source, .. }
            | Commands::Summary { source }
            | Commands::Lookup { source, .. }
            | Commands::AreaCodes { source } => source,
        }
    }
}

fn load_table(
    pipeline: &Pipeline,
    config: &Config,
    args: &SourceArgs,
) -> Result<Arc<EnrichedTable>> {
    let mut input = config.input.clone();
    if let Some(format) = args.format {
        input.format = format;
    }
    if let Some(delimiter) = args.delimiter {
        input.delimiter = delimiter;
    }
    let options = input.load_options()?;

    let path: &Path = match (&args.input, &input.path) {
        (Some(path), _) | (None, Some(path)) => path.as_path(),
        (None, None) => {
            bail!("no input table given; pass --input or set [input].path in the config")
        }
    };

    let source = match load_path(path, &options) {
        Ok(source) => source,
        Err(e) => {
            if matches!(e, EnricherError::Validation { .. } | EnricherError::MissingColumn(_)) {
                EnrichMetrics::record_rejected_input();
            }
            error!(path = %path.display(), error = %e, "Rejected prospect table");
            return Err(e).with_context(|| format!("loading {}", path.display()));
        }
    };

    info!(source = %source.key.short(), records = source.records.len(), "Loaded prospect table");
    Ok(pipeline.run_source(&source))
}

fn print_records(records: &[&EnrichedRecord], output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Table => println!("{}", report::format_records_table(records)),
        OutputFormat::Json => println!("{}", report::records_to_json(records)?),
        OutputFormat::Csv => report::write_records_csv(io::stdout().lock(), records)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::discover(cli.config.as_deref()).context("loading configuration")?;
    let _log_guard = logging::init_logging(&config.logging);
    metrics::init_metrics();

    let pipeline = Pipeline::new();
    let table = load_table(&pipeline, &config, cli.command.source())?;
    let filter = cli.command.source().filter();

    match &cli.command {
        Commands::Enrich { output, .. } => {
            let view = table.filter(&filter);
            if view.is_empty() && !table.is_empty() {
                warn!(
                    area_code = %filter.area_code,
                    kind = %filter.email_kind,
                    "No leads match the current filters"
                );
            }
            print_records(view.records(), *output)?;
        }
        Commands::Summary { .. } => {
            let view = table.filter(&filter);
            println!("{}", report::format_summary(&table.summary(), &view.summary(), &filter));
        }
        Commands::Lookup { company, .. } => match table.select_company(&filter, company) {
            Ok(record) => println!("{}", report::format_detail(record)),
            Err(EnricherError::UnknownCompany(name)) => {
                println!("⚠️  '{}' is not in the current filtered list", name);
                let companies = table.filter(&filter).companies();
                if !companies.is_empty() {
                    println!("\nAvailable companies:");
                    for company in companies {
                        println!("   - {}", company);
                    }
                }
                bail!("unknown company '{}'", name);
            }
            Err(e) => return Err(e.into()),
        },
        Commands::AreaCodes { .. } => {
            let codes = table.area_code_options();
            if codes.is_empty() {
                println!("No DDD area codes found");
            }
            for code in codes {
                println!("{}", code);
            }
        }
    }

    Ok(())
}
