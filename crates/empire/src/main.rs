use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use empire::emitter::write_graph;
use empire::loader::config_loader::load_config;
use empire::loader::rdf_loader::{load_graph, GraphFormat};
use empire::model::{Graph, Iri};
use empire::source::config::TYPE_KEY;
use empire::source::{
    DataSource, DataSourceConfig, FactoryRegistry, MemoryDataSourceFactory, MutableDataSource,
    QueryForm, SupportsTransactions, TransactionalDataSource,
};

/// Load, query and export RDF through a configured data source.
#[derive(Parser)]
#[command(name = "empire", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Data source configuration file (JSON or key=value lines).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Set a configuration value, overriding the file.
    #[arg(short = 'D', global = true, value_name = "KEY=VALUE", value_parser = parse_define)]
    define: Vec<(String, String)>,

    /// Verbose output.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Quiet output.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Add the triples of RDF files in one transaction. Triples already
    /// stored are skipped.
    Load {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Apply, report, then roll back.
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove the triples of RDF files in one transaction.
    Remove {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Write every triple in the data source.
    Dump {
        /// Output format: ntriples, turtle.
        #[arg(short, long, value_name = "FORMAT", default_value = "ntriples")]
        format: String,

        /// Output file path [default: stdout].
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Run a SPARQL SELECT, CONSTRUCT or DESCRIBE query.
    Query { sparql: String },

    /// Print the description of a resource.
    Describe { iri: String },
}

fn parse_define(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{arg}`")),
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn source_config(cli: &Cli) -> Result<DataSourceConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DataSourceConfig::new(),
    };
    config.merge(cli.define.iter().cloned().collect());
    if config.kind().is_none() {
        config.insert(TYPE_KEY, MemoryDataSourceFactory::KIND);
    }
    Ok(config)
}

fn read_files(files: &[PathBuf]) -> Result<Graph, Box<dyn Error>> {
    let mut graph = Graph::new();
    for path in files {
        let loaded = load_graph(path, None)?;
        info!(path = %path.display(), triples = loaded.num_statements(), "read file");
        graph.add(&loaded);
    }
    Ok(graph)
}

fn output_writer(path: Option<&Path>) -> Result<Box<dyn Write>, Box<dyn Error>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Apply `change` inside a transaction, committing unless it fails or
/// `keep` is false.
fn transact<S, F>(source: S, keep: bool, change: F) -> Result<(), Box<dyn Error>>
where
    S: MutableDataSource,
    F: FnOnce(&mut TransactionalDataSource<S>) -> Result<(), Box<dyn Error>>,
{
    let mut tx = TransactionalDataSource::new(source);
    tx.begin()?;
    match change(&mut tx) {
        Ok(()) if keep => tx.commit()?,
        Ok(()) => {
            tx.rollback()?;
            info!("dry run, changes rolled back");
        }
        Err(e) => {
            tx.rollback()?;
            return Err(e);
        }
    }
    Ok(())
}

/// Every triple currently in the data source.
fn stored<S: DataSource + ?Sized>(source: &S) -> Result<Graph, Box<dyn Error>> {
    Ok(source.graph_query(&source.query_factory().all_triples())?)
}

fn print_graph(graph: &Graph) -> Result<(), Box<dyn Error>> {
    let mut out = output_writer(None)?;
    write_graph(&mut out, graph, GraphFormat::NTriples)?;
    out.flush()?;
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = source_config(&cli)?;
    let source = FactoryRegistry::with_defaults().create(&config)?;
    info!(config = %config, "connected");

    match cli.command {
        Command::Load { files, dry_run } => {
            let mut graph = read_files(&files)?;
            graph.remove(&stored(&source)?);
            transact(source, !dry_run, |tx| {
                if !graph.is_empty() {
                    tx.add(&graph)?;
                }
                info!(triples = tx.added().num_statements(), "loaded triples");
                Ok(())
            })?;
        }
        Command::Remove { files } => {
            let requested = read_files(&files)?;
            let mut absent = requested.clone();
            absent.remove(&stored(&source)?);
            let mut graph = requested;
            graph.remove(&absent);
            transact(source, true, |tx| {
                if !graph.is_empty() {
                    tx.remove(&graph)?;
                }
                info!(triples = tx.removed().num_statements(), "removed triples");
                Ok(())
            })?;
        }
        Command::Dump { format, output } => {
            let format = GraphFormat::from_name(&format)
                .ok_or_else(|| format!("Unknown format: {format}. Use 'ntriples' or 'turtle'."))?;
            let graph = stored(&source)?;
            let mut out = output_writer(output.as_deref())?;
            let count = write_graph(&mut out, &graph, format)?;
            out.flush()?;
            info!(triples = count, format = format.name(), "dumped data source");
        }
        Command::Query { sparql } => match source.query_factory().form(&sparql) {
            Some(form) if form.is_graph() => {
                let graph = source.graph_query(&sparql)?;
                print_graph(&graph)?;
                info!(triples = graph.num_statements(), "query finished");
            }
            Some(QueryForm::Ask) => return Err("ASK queries are not supported".into()),
            _ => {
                let results = source.select_query(&sparql)?;
                let mut out = output_writer(None)?;
                writeln!(out, "{}", results.variables().join("\t"))?;
                for row in &results {
                    let cells: Vec<String> = results
                        .variables()
                        .iter()
                        .map(|v| row.get(v).map(ToString::to_string).unwrap_or_default())
                        .collect();
                    writeln!(out, "{}", cells.join("\t"))?;
                }
                out.flush()?;
                info!(rows = results.len(), "query finished");
            }
        },
        Command::Describe { iri } => {
            let graph = source.describe(&Iri::new(iri))?;
            print_graph(&graph)?;
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
