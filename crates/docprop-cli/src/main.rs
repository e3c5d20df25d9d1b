use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docprop_core::{ColumnIdentity, Config, ImpactReport};
use docprop_dbt::{Catalog, Manifest};
use docprop_engine::{analyze_project, propagate_project, Reporter};

const DEFAULT_CONFIG_FILE: &str = "docprop.toml";
const CATALOG_FILENAME: &str = "catalog.json";

/// docprop - Column documentation propagation for dbt
#[derive(Parser)]
#[command(name = "docprop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: docprop.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the dbt artifacts live
#[derive(Args, Debug)]
struct ArtifactArgs {
    /// Folder containing the manifest and catalog.json
    #[arg(short, long, env = "DOCPROP_ARTIFACTS_FOLDER")]
    artifacts_folder: PathBuf,

    /// Manifest file name inside the artifacts folder
    #[arg(long, default_value = "manifest.json")]
    input_manifest_filename: String,
}

impl ArtifactArgs {
    fn manifest_path(&self) -> PathBuf {
        self.artifacts_folder.join(&self.input_manifest_filename)
    }

    fn catalog_path(&self) -> PathBuf {
        self.artifacts_folder.join(CATALOG_FILENAME)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Propagate column documentation and write the manifest back
    Propagate {
        #[command(flatten)]
        artifacts: ArtifactArgs,

        /// Where to write the updated manifest (default: overwrite the input)
        #[arg(short, long)]
        output_manifest_path: Option<PathBuf>,

        /// Output file for the JSON impact report
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Show documentation statistics without changing anything
    Stats {
        #[command(flatten)]
        artifacts: ArtifactArgs,
    },
}

fn main() -> Result<()> {
    // .env must be loaded before parsing so `env = ...` arguments see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    if cli.verbose {
        eprintln!(
            "{} {} ignored column patterns",
            "Using".cyan(),
            config.propagation.ignored_columns.len()
        );
    }

    match cli.command {
        Commands::Propagate {
            artifacts,
            output_manifest_path,
            report,
            markdown,
        } => propagate_command(
            &config,
            &artifacts,
            output_manifest_path.as_deref(),
            report.as_deref(),
            markdown.as_deref(),
            cli.verbose,
        ),
        Commands::Stats { artifacts } => stats_command(&config, &artifacts, cli.verbose),
    }
}

/// Config from `--config`, else `docprop.toml` in the working directory, else defaults
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let config = if let Some(config_path) = path {
        Config::from_file(config_path)?
    } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
        Config::from_file(Path::new(DEFAULT_CONFIG_FILE))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    Ok(config)
}

fn load_artifacts(artifacts: &ArtifactArgs, verbose: bool) -> Result<(Manifest, Catalog)> {
    let manifest_path = artifacts.manifest_path();
    let catalog_path = artifacts.catalog_path();

    if !manifest_path.exists() {
        return Err(anyhow::anyhow!(
            "Manifest not found at {}. Run 'dbt compile' or 'dbt build' first.",
            manifest_path.display()
        ));
    }

    if !catalog_path.exists() {
        return Err(anyhow::anyhow!(
            "Catalog not found at {}. Run 'dbt docs generate' first.",
            catalog_path.display()
        ));
    }

    if verbose {
        eprintln!("{} {}", "Loading manifest from:".cyan(), manifest_path.display());
    }
    let manifest = Manifest::from_file(&manifest_path)
        .map_err(|e| anyhow::anyhow!("Failed to load manifest: {}", e))?;

    if verbose {
        eprintln!("{} {}", "Loading catalog from:".cyan(), catalog_path.display());
    }
    let catalog = Catalog::from_file(&catalog_path)
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;

    Ok((manifest, catalog))
}

/// Propagate command - fill in missing column descriptions
fn propagate_command(
    config: &Config,
    artifacts: &ArtifactArgs,
    output_manifest_path: Option<&Path>,
    report_path: Option<&Path>,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let (mut manifest, catalog) = load_artifacts(artifacts, verbose)?;

    if verbose {
        eprintln!("{}", "Propagating column documentation...".cyan());
    }

    let mut reporter = ConsoleReporter::new(verbose, false);
    let (analysis, records) = propagate_project(&mut manifest, &catalog, config, &mut reporter)?;

    let output = output_manifest_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| artifacts.manifest_path());
    manifest
        .save_to_file(&output)
        .map_err(|e| anyhow::anyhow!("Failed to write manifest: {}", e))?;

    if verbose {
        eprintln!("{} {}", "Manifest saved to:".green(), output.display());
    }

    analysis.report(config.report.top_n, &mut reporter);

    let report = analysis.to_report(config.report.top_n, records);

    if let Some(path) = report_path {
        report.save_to_file(path)?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    Ok(())
}

/// Stats command - dry run, nothing is written
fn stats_command(config: &Config, artifacts: &ArtifactArgs, verbose: bool) -> Result<()> {
    let (manifest, catalog) = load_artifacts(artifacts, verbose)?;

    let mut reporter = ConsoleReporter::new(verbose, true);
    let analysis = analyze_project(&manifest, &catalog, config, &mut reporter)?;

    analysis.report(config.report.top_n, &mut reporter);

    println!();
    if analysis.propagations.is_empty() {
        println!("{}", "✓ Nothing to propagate".green());
    } else {
        println!("{}", "Would propagate:".bold());
        for propagation in &analysis.propagations {
            println!(
                "  {} {} {}",
                propagation.identity.to_string().yellow(),
                "<=".dimmed(),
                propagation.sources.join(", ")
            );
        }
    }

    Ok(())
}

/// Prints the impact report on stdout and run events on stderr
struct ConsoleReporter {
    verbose: bool,

    /// Nothing gets written in this run
    dry_run: bool,
}

impl ConsoleReporter {
    fn new(verbose: bool, dry_run: bool) -> Self {
        Self { verbose, dry_run }
    }

    fn propagation_label(&self) -> &'static str {
        if self.dry_run {
            "would propagate"
        } else {
            "propagated"
        }
    }
}

impl Reporter for ConsoleReporter {
    fn matched(&mut self, column: &ColumnIdentity, upstream: &ColumnIdentity) {
        tracing::trace!(%column, %upstream, "upstream match");
    }

    fn ignored(&mut self, column: &ColumnIdentity) {
        if self.verbose {
            eprintln!("  {} {}", "ignored".yellow(), column);
        }
    }

    fn propagated(&mut self, column: &ColumnIdentity, sources: &[String]) {
        if self.verbose {
            eprintln!("  {} {} ({} candidates)", self.propagation_label().green(), column, sources.len());
        }
    }

    fn report_line(&mut self, line: &str) {
        if line.starts_with("=>") {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
}

fn print_report_summary(report: &ImpactReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Documentation Propagation Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total columns:  {}", report.summary.total_columns);
    println!("  Documented:     {}", report.summary.documented.to_string().green());

    if report.summary.undocumented > 0 {
        println!("  Undocumented:   {}", report.summary.undocumented.to_string().yellow());
    } else {
        println!("  Undocumented:   {}", report.summary.undocumented.to_string().green());
    }

    println!("  Propagated:     {}", report.propagated.len());
    println!();

    if report.best_columns.is_empty() {
        println!("{}", "✓ No undocumented root columns left!".green().bold());
    } else {
        println!("{}", "Document these first:".bold());
        for best in &report.best_columns {
            println!(
                "  {}.{} ({} downstream)",
                best.node_id,
                best.column.yellow(),
                best.undocumented_descendants.len()
            );
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &ImpactReport) -> String {
    let mut md = String::new();

    md.push_str("# Documentation Propagation Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Total columns: {}\n", report.summary.total_columns));
    md.push_str(&format!("- Documented: {}\n", report.summary.documented));
    md.push_str(&format!("- Undocumented: {}\n", report.summary.undocumented));
    md.push_str(&format!(
        "- Can receive propagated documentation: {}\n",
        report.summary.can_receive_propagation
    ));
    md.push_str(&format!("- Propagated in this run: {}\n", report.propagated.len()));
    md.push('\n');

    if !report.best_columns.is_empty() {
        md.push_str("## Best columns to document\n\n");
        for best in &report.best_columns {
            md.push_str(&format!(
                "### `{}.{}` ({} downstream)\n\n",
                best.node_id,
                best.column,
                best.undocumented_descendants.len()
            ));
            for descendant in &best.undocumented_descendants {
                md.push_str(&format!("- {}\n", descendant));
            }
            md.push('\n');
        }
    }

    if !report.propagated.is_empty() {
        md.push_str("## Propagated columns\n\n");
        md.push_str("| Node | Column | Sources | New entry |\n");
        md.push_str("|------|--------|---------|-----------|\n");
        for record in &report.propagated {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                record.node_id,
                record.column,
                record.sources.join(", "),
                if record.inserted { "yes" } else { "no" }
            ));
        }
    }

    md
}
