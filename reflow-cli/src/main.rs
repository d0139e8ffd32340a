//! Reflow CLI
//!
//! Runs the layout probe against an HTML file and summarizes style
//! mutations across bug-report directories.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use reflow_common::logging::init_logging;
use reflow_page::Page;
use reflow_probe::extract::{
    AGGREGATE_FILE_NAME, SUMMARY_FILE_NAME, aggregate_reports, scan_reports, write_json,
};
use reflow_probe::{
    ConsoleLog, LayoutVerdict, ProbeError, ProbeEvent, ProbeLog, ProbePlan, StyleChange,
    TrackedElement, Viewport,
};

/// Reflow: compare incremental and from-scratch layout of a page
#[derive(Parser, Debug)]
#[command(name = "reflow")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Widen #box and report its size before and after a full rebuild
    reflow probe page.html --set box:width=200px --track box:width,height

    # Same, exiting with status 1 if the two layouts disagree
    reflow probe page.html --plan plan.json --check

    # Count style assignments over a directory of bug reports
    reflow styles bug_reports
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mutate styles, report geometry, rebuild the document, report again
    Probe(ProbeArgs),
    /// Count style assignments in `<root>/*/minified_bug.html`
    Styles(StylesArgs),
}

#[derive(clap::Args, Debug)]
struct ProbeArgs {
    /// HTML file to probe
    #[arg(value_name = "FILE")]
    page: PathBuf,

    /// JSON plan with viewport, changes and tracked elements
    #[arg(long, value_name = "FILE")]
    plan: Option<PathBuf>,

    /// Style change, applied after those of the plan (repeatable)
    #[arg(long = "set", value_name = "ID:PROPERTY=VALUE")]
    changes: Vec<StyleChange>,

    /// Element to report, with all fields or the listed ones (repeatable)
    #[arg(long = "track", value_name = "ID[:FIELD,FIELD]")]
    tracked: Vec<TrackedElement>,

    /// Viewport size, overriding the plan's
    #[arg(long, value_name = "WxH", value_parser = parse_viewport)]
    viewport: Option<Viewport>,

    /// Print events as JSON instead of console lines
    #[arg(long)]
    json: bool,

    /// Compare both phases and exit with status 1 on a layout bug
    #[arg(long)]
    check: bool,

    /// Largest difference still counted as equal (finite, not negative)
    #[arg(long, default_value = "0", value_parser = parse_tolerance)]
    tolerance: f64,

    /// Print the DOM tree after the rebuild
    #[arg(long)]
    dump_tree: bool,
}

#[derive(clap::Args, Debug)]
struct StylesArgs {
    /// Directory holding one folder per bug report
    #[arg(value_name = "ROOT", default_value = "bug_reports")]
    root: PathBuf,

    /// Output file (default: ROOT/style_counts.json, or
    /// ./style_counts_aggregate.json with --aggregate)
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Count distinct combinations of assignments instead of single ones
    #[arg(long)]
    aggregate: bool,
}

fn parse_viewport(input: &str) -> Result<Viewport, String> {
    let (width, height) = input
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{input}'"))?;
    let dimension = |s: &str| {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
            .ok_or_else(|| format!("invalid viewport dimension '{s}'"))
    };
    Ok(Viewport {
        width: dimension(width)?,
        height: dimension(height)?,
    })
}

fn parse_tolerance(input: &str) -> Result<f64, String> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| format!("invalid tolerance '{input}', expected a finite number >= 0"))
}

fn main() -> Result<ExitCode> {
    let _ = init_logging("warn");
    let cli = Cli::parse();

    match cli.command {
        Command::Probe(args) => run_probe(args),
        Command::Styles(args) => run_styles(&args).map(|()| ExitCode::SUCCESS),
    }
}

fn run_probe(args: ProbeArgs) -> Result<ExitCode> {
    let mut plan = match &args.plan {
        Some(path) => ProbePlan::load(path)
            .with_context(|| format!("failed to load plan '{}'", path.display()))?,
        None => ProbePlan::default(),
    };
    plan.changes.extend(args.changes);
    plan.track.extend(args.tracked);
    if let Some(viewport) = args.viewport {
        plan.viewport = Some(viewport);
    }
    if plan.track.is_empty() {
        bail!("nothing to report: pass --track or a plan with tracked elements");
    }

    let mut page = Page::load(&args.page)?;
    if let Some(Viewport { width, height }) = plan.viewport {
        page = page.with_viewport(width, height);
    }
    log::info!(
        "probing {} with {} changes, {} tracked elements",
        args.page.display(),
        plan.changes.len(),
        plan.track.len()
    );

    let mut sequencer = plan.into_sequencer();
    let mut events: Vec<ProbeEvent> = Vec::new();
    let stdout = io::stdout();
    if args.json {
        sequencer.run(&mut page, &mut events)?;
    } else {
        // Keep the events for the verdict while printing them as they happen.
        let mut console = ConsoleLog::new(stdout.lock());
        sequencer.run(&mut page, &mut Tee(&mut console, &mut events))?;
    }

    let verdict = args
        .check
        .then(|| LayoutVerdict::from_events(&events, args.tolerance))
        .transpose()?;

    let mut out = stdout.lock();
    if args.json {
        let json = serde_json::json!({ "events": events, "verdict": verdict });
        writeln!(out, "{}", serde_json::to_string_pretty(&json)?)?;
    }
    if args.dump_tree {
        writeln!(out, "\n=== DOM Tree ===")?;
        write!(out, "{}", page.dump_tree())?;
    }

    match verdict {
        Some(verdict) if verdict.is_bug() => {
            if !args.json {
                writeln!(out, "{}", verdict.red().bold())?;
            }
            Ok(ExitCode::FAILURE)
        }
        Some(verdict) => {
            if !args.json {
                writeln!(out, "{}", verdict.green().bold())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        None => Ok(ExitCode::SUCCESS),
    }
}

/// Records every event in two sinks.
struct Tee<'a, A: ?Sized, B: ?Sized>(&'a mut A, &'a mut B);

impl<A, B> ProbeLog for Tee<'_, A, B>
where
    A: ProbeLog + ?Sized,
    B: ProbeLog + ?Sized,
{
    fn record(&mut self, event: ProbeEvent) -> Result<(), ProbeError> {
        self.0.record(event.clone())?;
        self.1.record(event)
    }
}

fn run_styles(args: &StylesArgs) -> Result<()> {
    let out = if args.aggregate {
        let aggregate = aggregate_reports(&args.root)
            .with_context(|| format!("failed to scan '{}'", args.root.display()))?;
        let out = args
            .out
            .clone()
            .unwrap_or_else(|| PathBuf::from(AGGREGATE_FILE_NAME));
        write_json(&out, &aggregate)?;
        out
    } else {
        let summary = scan_reports(&args.root)
            .with_context(|| format!("failed to scan '{}'", args.root.display()))?;
        let out = args
            .out
            .clone()
            .unwrap_or_else(|| args.root.join(SUMMARY_FILE_NAME));
        write_json(&out, &summary)?;
        out
    };
    println!("{}", out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, parse_tolerance, parse_viewport};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn viewport_syntax() {
        let viewport = parse_viewport("640x480").expect("viewport");
        assert_eq!((viewport.width, viewport.height), (640.0, 480.0));
        assert!(parse_viewport("640").is_err());
        assert!(parse_viewport("0x480").is_err());
    }

    #[test]
    fn tolerance_syntax() {
        assert!(parse_tolerance("0.25").is_ok());
        for bad in ["-1", "NaN", "inf", "wide"] {
            assert!(parse_tolerance(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn probe_arguments_parse() {
        let cli = Cli::try_parse_from([
            "reflow",
            "probe",
            "page.html",
            "--set",
            "box:width=200px",
            "--track",
            "box:width,height",
            "--check",
            "--tolerance",
            "0.5",
        ])
        .expect("arguments");
        let Command::Probe(args) = cli.command else {
            panic!("expected probe");
        };
        assert_eq!(args.changes[0].value, "200px");
        assert_eq!(args.tracked[0].fields.len(), 2);
        assert!(args.check);
        assert!((args.tolerance - 0.5).abs() < f64::EPSILON);
    }
}
