use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pkgdiff_common::{
    load_config, AppConfig, DiffStatus, Differences, Direction, ExtensionPair, FileDifference,
    PackageReport,
};
use pkgdiff_core::{LocalSource, PackageDiffChecker, PackageWalker};
use serde::Serialize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Exit status when `--fail-on-diff` is set and the trees diverge
const EXIT_DIFFERENT: i32 = 2;

#[derive(Parser)]
#[command(name = "pkgdiff")]
#[command(author = "pkgdiff Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Reconcile two source trees written in mirrored dialects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to pkgdiff.toml in the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the files of two package directories
    Check {
        /// Source package directory
        src: PathBuf,

        /// Destination package directory
        dst: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Compare every package directory under two roots
    Walk {
        /// Source root directory
        src_root: PathBuf,

        /// Destination root directory
        dst_root: PathBuf,

        /// Ignore patterns for package directories (can be specified multiple times)
        #[arg(short, long)]
        ignore: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Source files use the secondary extension (e.g. .gno) instead of the primary one
    #[arg(short = 's', long)]
    src_is_secondary: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Show only differences (hide equal files)
    #[arg(short = 'd', long)]
    diff_only: bool,

    /// List the differing lines of each file
    #[arg(short = 'l', long)]
    lines: bool,

    /// Disable ANSI colors in output
    #[arg(long)]
    no_color: bool,

    /// Exit with status 2 when any difference is found
    #[arg(long)]
    fail_on_diff: bool,

    /// Compare files in parallel
    #[arg(short = 'p', long)]
    parallel: bool,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays clean on stdout
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let result = match cli.command {
        Commands::Check { src, dst, output } => run_check(cli.config.as_deref(), &src, &dst, &output)
            .map(|diverged| (diverged, output.fail_on_diff)),
        Commands::Walk {
            src_root,
            dst_root,
            ignore,
            output,
        } => run_walk(cli.config.as_deref(), &src_root, &dst_root, ignore, &output)
            .map(|diverged| (diverged, output.fail_on_diff)),
    };

    match result {
        Ok((true, true)) => std::process::exit(EXIT_DIFFERENT),
        Ok(_) => {}
        Err(e) => {
            error!("pkgdiff failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn resolve_config(explicit: Option<&Path>, output: &OutputArgs) -> anyhow::Result<AppConfig> {
    let loaded = load_config(explicit).context("loading configuration")?;
    if loaded.exists {
        info!("Using config {}", loaded.path.display());
    }

    let mut config = loaded.config;
    if output.parallel {
        config.parallel = true;
    }
    if output.diff_only {
        config.diff_only = true;
    }
    Ok(config)
}

/// Returns whether the two packages diverge
fn run_check(
    config_path: Option<&Path>,
    src: &Path,
    dst: &Path,
    output: &OutputArgs,
) -> anyhow::Result<bool> {
    let config = resolve_config(config_path, output)?;
    let direction = Direction::from_source_is_secondary(output.src_is_secondary);

    info!("Comparing:");
    info!("  Source:      {}", src.display());
    info!("  Destination: {}", dst.display());

    let source = LocalSource::new();
    let checker = PackageDiffChecker::new(&source, src, dst, config.dialects.clone(), direction)?
        .with_parallelism(config.parallel);
    let differences = checker.differences()?;
    let extensions = checker.extensions().clone();

    if output.json {
        let report = build_json_report(src, dst, &extensions, &differences, config.diff_only);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let style = Style::new(!output.no_color && std::io::stdout().is_terminal());
        print!(
            "{}",
            render_package(&differences, config.diff_only, output.lines, &style)
        );
        print!("{}", render_summary(&differences, &style));
    }

    Ok(!differences.is_identical())
}

/// Returns whether any package diverges
fn run_walk(
    config_path: Option<&Path>,
    src_root: &Path,
    dst_root: &Path,
    ignore: Vec<String>,
    output: &OutputArgs,
) -> anyhow::Result<bool> {
    let mut config = resolve_config(config_path, output)?;
    config.ignore_patterns.extend(ignore);
    let direction = Direction::from_source_is_secondary(output.src_is_secondary);

    let walker = PackageWalker::new(&config)?;
    let reports = walker.walk(src_root, dst_root, direction)?;
    let diverged = reports.iter().any(|r| !r.differences.is_identical());

    if output.json {
        let report = build_json_walk_report(src_root, dst_root, &reports, config.diff_only);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(diverged);
    }

    let style = Style::new(!output.no_color && std::io::stdout().is_terminal());
    for report in &reports {
        if config.diff_only && report.differences.is_identical() {
            continue;
        }
        println!("\n{}", "=".repeat(80));
        println!("Package: {}", package_label(&report.package));
        println!("{}", "=".repeat(80));
        print!(
            "{}",
            render_package(&report.differences, config.diff_only, output.lines, &style)
        );
    }

    println!("\n{}", "=".repeat(80));
    println!("Packages compared:  {}", reports.len());
    println!(
        "Packages diverging: {}",
        reports.iter().filter(|r| !r.differences.is_identical()).count()
    );
    println!("{}", "=".repeat(80));

    Ok(diverged)
}

fn package_label(package: &Path) -> String {
    if package.as_os_str().is_empty() {
        ".".to_string()
    } else {
        package.display().to_string()
    }
}

struct Style {
    color: bool,
}

impl Style {
    fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(&self, status: DiffStatus, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let code = match status {
            DiffStatus::NoDiff => "\x1b[32m",       // Green
            DiffStatus::HasDiff => "\x1b[31m",      // Red
            DiffStatus::MissingInDst => "\x1b[33m", // Yellow
            DiffStatus::MissingInSrc => "\x1b[34m", // Blue
        };
        format!("{}{}\x1b[0m", code, text)
    }
}

fn status_symbol(status: DiffStatus) -> &'static str {
    match status {
        DiffStatus::NoDiff => "==",
        DiffStatus::HasDiff => "!=",
        DiffStatus::MissingInDst => "<<",
        DiffStatus::MissingInSrc => ">>",
    }
}

fn render_package(differences: &Differences, diff_only: bool, lines: bool, style: &Style) -> String {
    let mut out = String::new();

    if !differences.same_number_of_files {
        out.push_str("warning: source and destination have a different number of files\n");
    }

    for file in &differences.files_differences {
        if diff_only && file.is_equal() {
            continue;
        }

        out.push_str(&format!(
            "  {}  {} -> {} ({})\n",
            style.paint(file.status, status_symbol(file.status)),
            file.source_name,
            file.destination_name,
            file.status
        ));

        if lines {
            out.push_str(&render_lines(file));
        }
    }

    out
}

fn render_lines(file: &FileDifference) -> String {
    let mut out = String::new();
    for line in &file.src_line_diff {
        out.push_str(&format!("      -{:>5} | {}\n", line.number, line.line));
    }
    for line in &file.dst_line_diff {
        out.push_str(&format!("      +{:>5} | {}\n", line.number, line.line));
    }
    out
}

fn render_summary(differences: &Differences, style: &Style) -> String {
    let mark = |status: DiffStatus| style.paint(status, &format!("({})", status_symbol(status)));

    let mut out = String::new();
    out.push_str(&format!("\n{}\n", "=".repeat(80)));
    out.push_str("Summary:\n");
    out.push_str(&format!(
        "  Total files:        {}\n",
        differences.files_differences.len()
    ));
    out.push_str(&format!(
        "  Equal:              {} {}\n",
        differences.count(DiffStatus::NoDiff),
        mark(DiffStatus::NoDiff)
    ));
    out.push_str(&format!(
        "  Different:          {} {}\n",
        differences.count(DiffStatus::HasDiff),
        mark(DiffStatus::HasDiff)
    ));
    out.push_str(&format!(
        "  Missing in dst:     {} {}\n",
        differences.count(DiffStatus::MissingInDst),
        mark(DiffStatus::MissingInDst)
    ));
    out.push_str(&format!(
        "  Missing in src:     {} {}\n",
        differences.count(DiffStatus::MissingInSrc),
        mark(DiffStatus::MissingInSrc)
    ));
    out.push_str(&format!(
        "  Same file count:    {}\n",
        if differences.same_number_of_files { "yes" } else { "no" }
    ));
    out.push_str(&format!("{}\n", "=".repeat(80)));
    out
}

#[derive(Serialize)]
struct JsonReport {
    src: String,
    dst: String,
    source_extension: String,
    destination_extension: String,
    summary: JsonSummary,
    same_number_of_files: bool,
    files: Vec<FileDifference>,
}

#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    equal: usize,
    different: usize,
    missing_in_src: usize,
    missing_in_dst: usize,
}

#[derive(Serialize)]
struct JsonWalkReport {
    src_root: String,
    dst_root: String,
    packages: Vec<JsonPackage>,
}

#[derive(Serialize)]
struct JsonPackage {
    package: String,
    identical: bool,
    summary: JsonSummary,
    same_number_of_files: bool,
    files: Vec<FileDifference>,
}

fn json_summary(differences: &Differences) -> JsonSummary {
    JsonSummary {
        total: differences.files_differences.len(),
        equal: differences.count(DiffStatus::NoDiff),
        different: differences.count(DiffStatus::HasDiff),
        missing_in_src: differences.count(DiffStatus::MissingInSrc),
        missing_in_dst: differences.count(DiffStatus::MissingInDst),
    }
}

fn json_files(differences: &Differences, diff_only: bool) -> Vec<FileDifference> {
    differences
        .files_differences
        .iter()
        .filter(|file| !(diff_only && file.is_equal()))
        .cloned()
        .collect()
}

fn build_json_report(
    src: &Path,
    dst: &Path,
    extensions: &ExtensionPair,
    differences: &Differences,
    diff_only: bool,
) -> JsonReport {
    JsonReport {
        src: src.to_string_lossy().to_string(),
        dst: dst.to_string_lossy().to_string(),
        source_extension: extensions.source.clone(),
        destination_extension: extensions.destination.clone(),
        summary: json_summary(differences),
        same_number_of_files: differences.same_number_of_files,
        files: json_files(differences, diff_only),
    }
}

fn build_json_walk_report(
    src_root: &Path,
    dst_root: &Path,
    reports: &[PackageReport],
    diff_only: bool,
) -> JsonWalkReport {
    JsonWalkReport {
        src_root: src_root.to_string_lossy().to_string(),
        dst_root: dst_root.to_string_lossy().to_string(),
        packages: reports
            .iter()
            .filter(|r| !(diff_only && r.differences.is_identical()))
            .map(|r| JsonPackage {
                package: package_label(&r.package),
                identical: r.differences.is_identical(),
                summary: json_summary(&r.differences),
                same_number_of_files: r.differences.same_number_of_files,
                files: json_files(&r.differences, diff_only),
            })
            .collect(),
    }
}
