//! # u-spc
//!
//! Command-line front end: reads a labeled measurement table, prints the
//! X-bar/R chart statistics with out-of-control flags and, unless disabled,
//! the capability section for the configured specification.
//!
//! The report goes to stdout (plain text or `--json`); logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::EnvFilter;

use u_spc::capability::{SigmaMethod, SpecificationLimits};
use u_spc::config::SpcConfig;
use u_spc::dataset::Dataset;
use u_spc::distribution::BinMethod;
use u_spc::report::{analyze, AnalysisOptions, SpcReport};
use u_spc::spc::{ChartPoint, ControlLimits};

/// X-bar/R control charts and process capability for subgrouped data
#[derive(Parser, Debug)]
#[command(name = "u-spc")]
#[command(version)]
#[command(about = "X-bar/R control chart statistics and Cp/Cpk for subgrouped measurements")]
struct Args {
    /// Dataset TOML: `rows = [["label", x1, x2, ...], ...]`.
    dataset: PathBuf,

    /// Configuration TOML (specification and histogram settings).
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Specification target (nominal value).
    #[arg(long)]
    target: Option<f64>,

    /// Lower tolerance: LSL = target - tol_lower.
    #[arg(long)]
    tol_lower: Option<f64>,

    /// Upper tolerance: USL = target + tol_upper.
    #[arg(long)]
    tol_upper: Option<f64>,

    /// Fixed number of histogram bins (capped at the larger of the value count and 15).
    #[arg(long)]
    bins: Option<usize>,

    /// Skip the capability section.
    #[arg(long)]
    no_capability: bool,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    log_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_tracing(&args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => SpcConfig::from_file(path)?,
        None => SpcConfig::default(),
    };
    let dataset = Dataset::from_file(&args.dataset)?;

    let spec = if args.no_capability {
        None
    } else {
        Some(specification(args, &config))
    };
    let bins = match args.bins {
        Some(k) => BinMethod::Fixed(k),
        None => config.histogram.method(),
    };

    let report = analyze(&dataset.matrix, spec.as_ref(), AnalysisOptions { bins })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        print_report(&mut out, &dataset, &report)?;
    }
    Ok(())
}

/// CLI flags override the configuration file, which overrides the defaults.
fn specification(args: &Args, config: &SpcConfig) -> SpecificationLimits {
    let base = config.specification;
    SpecificationLimits {
        target: args.target.unwrap_or(base.target),
        tolerance_lower: args.tol_lower.unwrap_or(base.tolerance_lower),
        tolerance_upper: args.tol_upper.unwrap_or(base.tolerance_upper),
    }
}

fn print_report(out: &mut impl Write, dataset: &Dataset, report: &SpcReport) -> io::Result<()> {
    let limits = report.chart.limits();

    writeln!(out, "Process statistics (n={}, k={})", report.subgroup_size, report.subgroup_count)?;
    writeln!(out, "  Grand mean (X-double-bar): {:.2}", limits.grand_mean)?;
    writeln!(out, "  Mean range (R-bar):        {:.2}", limits.mean_range)?;
    writeln!(out)?;

    print_chart(out, "X-bar chart", &limits.xbar, report.chart.xbar_points(), dataset)?;
    print_chart(out, "R chart", &limits.range, report.chart.range_points(), dataset)?;

    if let Some(cap) = &report.capability {
        let method = match cap.sigma.method {
            SigmaMethod::RangeOverD2 => "R-bar/d2",
            SigmaMethod::SampleStdDev => "sample std dev",
        };
        writeln!(out, "Process capability")?;
        writeln!(out, "  Target:                    {:.2}", cap.specification.target)?;
        writeln!(out, "  Upper spec limit (USL):    {:.2}", cap.indices.usl)?;
        writeln!(out, "  Lower spec limit (LSL):    {:.2}", cap.indices.lsl)?;
        writeln!(out, "  Estimated sigma:           {:.3} ({method})", cap.sigma.value)?;
        writeln!(out, "  Cp:                        {:.3}", cap.indices.cp)?;
        writeln!(out, "  Cpk:                       {:.3}", cap.indices.cpk)?;
        writeln!(out, "  Cpm:                       {:.3}", cap.indices.cpm)?;
    }

    if let Some(hist) = &report.histogram {
        writeln!(out)?;
        writeln!(out, "Histogram ({} bins, width {:.3})", hist.n_bins, hist.bin_width)?;
        for (i, (&count, &density)) in hist.counts.iter().zip(&hist.density).enumerate() {
            writeln!(
                out,
                "  [{:>10.3}, {:>10.3}{} {:>5}  {:.4}",
                hist.edges[i],
                hist.edges[i + 1],
                if i + 1 == hist.n_bins { ']' } else { ')' },
                count,
                density
            )?;
        }
    }
    Ok(())
}

fn print_chart(
    out: &mut impl Write,
    title: &str,
    limits: &ControlLimits,
    points: &[ChartPoint],
    dataset: &Dataset,
) -> io::Result<()> {
    writeln!(
        out,
        "{title}: LSC = {:.3}, LC = {:.3}, LIC = {:.3}",
        limits.ucl, limits.cl, limits.lcl
    )?;
    for p in points {
        let label = dataset.labels.get(p.index).map_or("", String::as_str);
        let flag = if p.is_out_of_control() { "  OUT OF CONTROL" } else { "" };
        writeln!(out, "  {:>4} {:<12} {:>12.3}{flag}", p.index + 1, label, p.value)?;
    }
    writeln!(out)
}

fn setup_tracing(args: &Args) {
    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init();
    }
}
