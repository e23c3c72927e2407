//! addonpack - Game add-on packager
//!
//! Usage:
//!   addonpack build      # Bundle the add-on and its dependencies into a zip
//!   addonpack resolve    # Show the resolved dependency graph
//!   addonpack sync       # Pin library dependencies into .pkgmeta and manifests
//!   addonpack pkgmeta    # Generate .pkgmeta externals from sibling checkouts
//!   addonpack config     # Show the effective addonpack.toml settings

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use addonpack_core::archive::ArchiverKind;
use addonpack_core::commands::{
    BuildCommand, BuildOptions, CommandContext, ConfigCommand, ConfigOptions, PackageMetaCommand,
    PackageMetaOptions, ResolveCommand, ResolveOptions, SyncCommand, SyncOptions,
};
use addonpack_core::orchestration::{ArchiveOutcome, PackageReport};
use addonpack_core::pins::{PackageMetaReport, SyncReport};
use addonpack_core::resolver::ResolveReport;

#[derive(Parser)]
#[command(name = "addonpack")]
#[command(about = "Game add-on packager", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bundle the add-on with its dependencies and write a versioned archive
    Build(BuildArgs),

    /// Print the resolved dependency graph without building
    Resolve(AddonArgs),

    /// Pin library dependencies into .pkgmeta and every manifest variant
    Sync(AddonArgs),

    /// Generate .pkgmeta externals from the resolved sibling dependencies
    Pkgmeta(AddonArgs),

    /// Show the effective configuration
    Config {
        /// Add-on directory
        #[arg(long, default_value = ".")]
        addon_dir: PathBuf,

        /// Write the effective settings to <addon-dir>/addonpack.toml
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct AddonArgs {
    /// Add-on directory (its name is the add-on name)
    #[arg(long, default_value = ".")]
    addon_dir: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Args)]
struct BuildArgs {
    #[command(flatten)]
    addon: AddonArgs,

    /// Archiver to use (zip or 7z)
    #[arg(long)]
    archiver: Option<String>,

    /// Directory receiving <Name>/ and the archive
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Exit with an error when the archive already exists
    #[arg(long)]
    fail_on_collision: bool,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// Only show problems
    Quiet,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "addonpack=debug,info"
    } else {
        "addonpack=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let context = CommandContext::with_defaults()?;
    tracing::debug!(config_dir = %context.global_config_dir().display(), "Using global config");
    match cli.command {
        Commands::Build(args) => run_build(context, args)?,
        Commands::Resolve(args) => run_resolve(context, args)?,
        Commands::Sync(args) => run_sync(context, args)?,
        Commands::Pkgmeta(args) => run_pkgmeta(context, args)?,
        Commands::Config { addon_dir, init } => run_config(context, addon_dir, init)?,
    }

    Ok(())
}

fn run_build(context: CommandContext, args: BuildArgs) -> Result<()> {
    let mut options = BuildOptions::new(&args.addon.addon_dir);
    if let Some(archiver) = &args.archiver {
        options = options.with_archiver(archiver.parse::<ArchiverKind>()?);
    }
    if let Some(output_dir) = &args.output_dir {
        options = options.with_output_dir(std::path::absolute(output_dir)?);
    }

    let report = BuildCommand::new(context).execute(&options)?;

    match args.addon.format {
        OutputFormat::Table => print_build_table(&report),
        OutputFormat::Json => print_build_json(&report)?,
        OutputFormat::Quiet => print_warnings_quiet(&report.warnings),
    }

    if report.archive.is_collision() && args.fail_on_collision {
        std::process::exit(1);
    }
    Ok(())
}

fn print_build_table(report: &PackageReport) {
    let version = if report.version.is_empty() {
        "(no version)"
    } else {
        report.version.as_str()
    };
    println!(
        "{} {} {}",
        style("Packaged").bold(),
        style(&report.addon_name).green(),
        version
    );
    println!("  Build dir: {}", report.build_dir.display());
    if report.bundled.is_empty() {
        println!("  Bundled:   -");
    } else {
        println!("  Bundled:   {}", report.bundled.join(", "));
    }

    match &report.archive {
        ArchiveOutcome::Written { path, digest } => {
            println!("  Archive:   {}", style(path.display()).green());
            println!("  Digest:    {}", truncate(digest, 16));
        }
        ArchiveOutcome::Collision { path } => {
            println!(
                "  Archive:   {} (not written)",
                style(path.display()).red()
            );
        }
    }

    for warning in &report.warnings {
        println!("  {} {}", style("⚠").yellow(), warning);
    }
}

fn print_build_json(report: &PackageReport) -> Result<()> {
    let archive = match &report.archive {
        ArchiveOutcome::Written { path, digest } => serde_json::json!({
            "status": "written",
            "path": path,
            "digest": digest,
        }),
        ArchiveOutcome::Collision { path } => serde_json::json!({
            "status": "collision",
            "path": path,
        }),
    };
    let output = serde_json::json!({
        "addon": report.addon_name,
        "version": report.version,
        "build_dir": report.build_dir,
        "bundled": report.bundled,
        "archive": archive,
        "warnings": report.warnings,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_resolve(context: CommandContext, args: AddonArgs) -> Result<()> {
    let report = ResolveCommand::new(context).execute(&ResolveOptions::new(&args.addon_dir))?;

    match args.format {
        OutputFormat::Table => print_resolve_table(&report),
        OutputFormat::Json => {
            let dependencies: Vec<_> = report
                .dependencies
                .iter()
                .map(|d| serde_json::json!({ "name": d.name, "path": d.source_path }))
                .collect();
            let output = serde_json::json!({
                "dependencies": dependencies,
                "missing": report.missing,
                "warnings": report.warnings,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => print_warnings_quiet(&report.warnings),
    }
    Ok(())
}

fn print_resolve_table(report: &ResolveReport) {
    if report.dependencies.is_empty() && report.missing.is_empty() {
        println!("No dependencies declared.");
        return;
    }

    println!("  {:<24} Source", "Dependency");
    println!("  {}", "-".repeat(60));
    for dependency in &report.dependencies {
        println!(
            "  {:<24} {}",
            dependency.name,
            dependency.source_path.display()
        );
    }
    for name in &report.missing {
        println!("  {:<24} {}", name, style("missing").red());
    }
    for warning in &report.warnings {
        println!("  {} {}", style("⚠").yellow(), warning);
    }
}

fn run_sync(context: CommandContext, args: AddonArgs) -> Result<()> {
    let report = SyncCommand::new(context).execute(&SyncOptions::new(&args.addon_dir))?;

    match args.format {
        OutputFormat::Table => print_sync_table(&report),
        OutputFormat::Json => {
            let pins: Vec<_> = report
                .pins
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "name": p.name,
                        "url": p.url,
                        "tag": p.tag,
                        "path": p.install_path,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "pins": pins,
                "package_meta": report.package_meta_path,
                "manifests_updated": report.manifests_updated,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn print_sync_table(report: &SyncReport) {
    println!("Pins ({}):", report.pins.len());
    println!("  {:<20} {:<12} {:<24} URL", "Name", "Tag", "Path");
    println!("  {}", "-".repeat(80));
    for pin in &report.pins {
        println!(
            "  {:<20} {:<12} {:<24} {}",
            pin.name,
            truncate(&pin.tag, 12),
            pin.install_path,
            pin.url
        );
    }
    println!();
    println!(
        "{} {}",
        style("✓").green(),
        display_name(&report.package_meta_path)
    );
    for manifest in &report.manifests_updated {
        println!("{} {}", style("✓").green(), display_name(manifest));
    }
}

fn run_pkgmeta(context: CommandContext, args: AddonArgs) -> Result<()> {
    let report =
        PackageMetaCommand::new(context).execute(&PackageMetaOptions::new(&args.addon_dir))?;

    match args.format {
        OutputFormat::Table => print_pkgmeta_table(&report),
        OutputFormat::Json => {
            let externals: Vec<_> = report
                .externals
                .iter()
                .map(|(path, source)| {
                    serde_json::json!({
                        "path": path,
                        "url": source.url,
                        "tag": source.tag,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "path": report.path,
                "externals": externals,
                "warnings": report.warnings,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => print_warnings_quiet(&report.warnings),
    }
    Ok(())
}

fn print_pkgmeta_table(report: &PackageMetaReport) {
    println!("Externals ({}):", report.externals.len());
    for (path, source) in &report.externals {
        let tag = source.tag.as_deref().unwrap_or("latest");
        println!("  {:<28} {} @ {}", path, source.url, tag);
    }
    for warning in &report.warnings {
        println!("  {} {}", style("⚠").yellow(), warning);
    }
    println!("{} {}", style("✓").green(), report.path.display());
}

fn run_config(context: CommandContext, addon_dir: PathBuf, init: bool) -> Result<()> {
    let report =
        ConfigCommand::new(context).execute(&ConfigOptions::new(addon_dir).with_init(init))?;

    println!("# global:  {}", report.global_path.display());
    println!("# project: {}", report.project_path.display());
    println!();
    print!("{}", report.toml);
    if report.written {
        println!();
        println!("{} Wrote {}", style("✓").green(), report.project_path.display());
    }
    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

fn print_warnings_quiet(warnings: &[String]) {
    for warning in warnings {
        eprintln!("{}", warning);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
