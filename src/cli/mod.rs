//! # CLI Module
//!
//! Command-line interface for the HDR bracket finder.
//!
//! ## Usage
//! ```bash
//! # List brackets of three
//! findhdr ~/Pictures/2017/02
//!
//! # Brackets of three to five images
//! findhdr --min 3 --max 5 ~/Pictures/2017/02
//!
//! # Hard-link every match into ./out
//! findhdr --link ./out ~/Pictures/2017/03
//!
//! # Treat Hasselblad raw files as images too
//! findhdr --type 3fr=image/x-hasselblad-3fr ~/Pictures
//!
//! # JSON output
//! findhdr --output json ~/Pictures
//! ```

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use console::{style, Term};
use hdr_finder::core::{
    Bracket, BracketConfig, BracketLinker, FindResult, Finder, ImageTypes, LinkOutcome,
};
use hdr_finder::error::Result;
use hdr_finder::events::{DetectEvent, Event, EventChannel};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

/// Find bracketed exposures that can be merged into HDR images
#[derive(Parser, Debug)]
#[command(name = "findhdr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to search
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Minimum number of images in a bracket
    #[arg(long, default_value_t = BracketConfig::DEFAULT_MIN)]
    min: usize,

    /// Maximum number of images in a bracket
    #[arg(long, default_value_t = BracketConfig::DEFAULT_MAX)]
    max: usize,

    /// Hard-link matched images into this directory
    #[arg(short, long, value_name = "DIR")]
    link: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Extra extension mapping (repeatable)
    #[arg(short = 't', long = "type", value_name = "EXT=TYPE/SUBTYPE")]
    types: Vec<String>,

    /// Follow symbolic links
    #[arg(long)]
    follow_symlinks: bool,

    /// List files that could not be decoded, and log details
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Paths only, one bracket per paragraph
    Minimal,
}

/// Outcome of searching one root
struct RootReport {
    root: PathBuf,
    result: Result<FindResult>,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    hdr_finder::init_tracing(cli.verbose);

    let bracket_config = match BracketConfig::new(cli.min, cli.max) {
        Ok(config) => config,
        Err(e) => Cli::command().error(ErrorKind::ValueValidation, e).exit(),
    };

    let mut image_types = ImageTypes::default();
    for spec in &cli.types {
        if let Err(e) = image_types.register_spec(spec) {
            Cli::command().error(ErrorKind::ValueValidation, e).exit();
        }
    }

    let linker = match &cli.link {
        Some(dir) => Some(BracketLinker::create(dir)?),
        None => None,
    };

    let finders: Vec<Finder> = cli
        .paths
        .iter()
        .map(|root| {
            Finder::builder()
                .root(root)
                .bracket_config(bracket_config)
                .image_types(image_types.clone())
                .follow_symlinks(cli.follow_symlinks)
                .build()
        })
        .collect();

    let reports = search(&finders, cli.output, cli.verbose);

    match cli.output {
        OutputFormat::Pretty => print_pretty_results(&reports, linker.as_ref()),
        OutputFormat::Json => print_json_results(&reports, linker.as_ref()),
        OutputFormat::Minimal => print_minimal_results(&reports, linker.as_ref()),
    }

    // Report every root before failing on the first broken one
    match reports.into_iter().find_map(|r| r.result.err()) {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Search every root in parallel; each finder owns its own window
fn search(finders: &[Finder], output: OutputFormat, verbose: bool) -> Vec<RootReport> {
    let (sender, receiver) = EventChannel::new();

    let progress = if output == OutputFormat::Pretty {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::with_template("{spinner:.green} {pos} images {msg}") {
            pb.set_style(spinner);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Detect(DetectEvent::ImageAdmitted { path, .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.inc(1);
                        pb.set_message(
                            path.file_name()
                                .unwrap_or_default()
                                .to_string_lossy()
                                .into_owned(),
                        );
                    }
                }
                Event::Detect(DetectEvent::ExtractionFailed { message, .. }) if verbose => {
                    let line = format!("{} {}", style("Skipping").yellow(), message);
                    match progress_clone {
                        Some(ref pb) => pb.println(line),
                        None => eprintln!("{}", line),
                    }
                }
                _ => {}
            }
        }
    });

    let reports = finders
        .par_iter()
        .map(|finder| RootReport {
            root: finder.config().root.clone(),
            result: finder.collect_with_events(&sender),
        })
        .collect();

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    reports
}

fn link_outcomes(linker: Option<&BracketLinker>, bracket: &Bracket) -> Vec<LinkOutcome> {
    linker.map(|l| l.link(bracket)).unwrap_or_default()
}

fn print_pretty_results(reports: &[RootReport], linker: Option<&BracketLinker>) {
    let term = Term::stdout();
    let mut total_brackets = 0;
    let mut total_failures = 0;
    let mut total_pending = 0;
    let mut total_link_failures = 0;

    for report in reports {
        let found = match &report.result {
            Ok(found) => found,
            Err(e) => {
                term.write_line(&format!(
                    "{} Error trying to search {}: {}",
                    style("✗").red().bold(),
                    display_path(&report.root),
                    e
                ))
                .ok();
                continue;
            }
        };

        for bracket in &found.brackets {
            if linker.is_none() {
                term.write_line(&format!("{} {}", style("Found").green(), bracket))
                    .ok();
                continue;
            }

            for outcome in link_outcomes(linker, bracket) {
                let line = match outcome {
                    LinkOutcome::Linked(path) => {
                        format!("{} {}", style("Linking").green(), display_path(&path))
                    }
                    LinkOutcome::Skipped(path) => format!(
                        "{} {} file exists",
                        style("Skipping").yellow(),
                        display_path(&path)
                    ),
                    LinkOutcome::Failed { path, error } => {
                        total_link_failures += 1;
                        format!(
                            "{} {}: {}",
                            style("Error linking").red(),
                            display_path(&path),
                            error
                        )
                    }
                };
                term.write_line(&line).ok();
            }
        }

        total_brackets += found.summary.brackets_found;
        total_failures += found.summary.extraction_failures;
        total_pending += found.summary.pending_images;
    }

    term.write_line(&format!("Found {} hdrs.", style(total_brackets).cyan()))
        .ok();

    if total_failures > 0 {
        term.write_line(&format!(
            "  {} image files could not be read",
            style(total_failures).yellow()
        ))
        .ok();
    }
    if total_pending > 0 {
        term.write_line(&format!(
            "  {} images left over in an incomplete bracket",
            style(total_pending).dim()
        ))
        .ok();
    }
    if total_link_failures > 0 {
        term.write_line(&format!(
            "  {} images could not be linked",
            style(total_link_failures).red()
        ))
        .ok();
    }
}

fn print_json_results(reports: &[RootReport], linker: Option<&BracketLinker>) {
    let mut roots = Vec::with_capacity(reports.len());

    for report in reports {
        let entry = match &report.result {
            Ok(found) => {
                let mut brackets = Vec::with_capacity(found.brackets.len());
                for bracket in &found.brackets {
                    let links: Vec<_> = link_outcomes(linker, bracket)
                        .iter()
                        .map(|outcome| match outcome {
                            LinkOutcome::Failed { path, error } => serde_json::json!({
                                "path": path,
                                "linked": false,
                                "error": error.to_string(),
                            }),
                            _ => serde_json::json!({
                                "path": outcome.path(),
                                "linked": matches!(outcome, LinkOutcome::Linked(_)),
                            }),
                        })
                        .collect();
                    brackets.push(serde_json::json!({
                        "id": bracket.id.to_string(),
                        "images": bracket.images,
                        "links": links,
                    }));
                }
                serde_json::json!({
                    "root": report.root,
                    "brackets": brackets,
                    "summary": found.summary,
                })
            }
            Err(e) => serde_json::json!({
                "root": report.root,
                "error": e.to_string(),
            }),
        };
        roots.push(entry);
    }

    let total: usize = reports
        .iter()
        .filter_map(|r| r.result.as_ref().ok())
        .map(|f| f.summary.brackets_found)
        .sum();

    let output = serde_json::json!({
        "scanned_at": chrono::Utc::now().to_rfc3339(),
        "total_brackets": total,
        "roots": roots,
    });

    println!("{:#}", output);
}

fn print_minimal_results(reports: &[RootReport], linker: Option<&BracketLinker>) {
    for report in reports {
        match &report.result {
            Ok(found) => {
                for bracket in &found.brackets {
                    for outcome in link_outcomes(linker, bracket) {
                        if let LinkOutcome::Failed { path, error } = outcome {
                            eprintln!("{}: {}", path.display(), error);
                        }
                    }
                    for image in &bracket.images {
                        println!("{}", image.path.display());
                    }
                    println!();
                }
            }
            Err(e) => eprintln!("{}: {}", report.root.display(), e),
        }
    }
}

/// Shorten paths under the home directory to `~/...`
fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}
