//! Shotlength - plasma discharge termination time
//!
//! Command-line front end: computes the shot length of one or more shots
//! stored in a tree archive.

use anyhow::{bail, Result};
use shotlength::config::AppConfig;
use shotlength::{run_batch, Archive, ShotLength};
use std::path::PathBuf;

struct Options {
    archive: Option<PathBuf>,
    tree: Option<String>,
    threshold: Option<f64>,
    json: bool,
    shots: Vec<i64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("shotlength=info".parse()?)
                .add_directive("shotlength_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(options) = parse_args(&args)? else {
        return Ok(());
    };

    let config = AppConfig::load_from(&AppConfig::path());
    let Some(root) = options.archive.or(config.archive) else {
        bail!("No archive given; use --archive DIR or set \"archive\" in {}", AppConfig::path().display());
    };
    let tree = options.tree.unwrap_or(config.tree);
    let threshold = options.threshold.unwrap_or(config.threshold);

    let archive = Archive::new(root);
    let shots = if options.shots.is_empty() {
        archive.shots(&tree)?
    } else {
        options.shots
    };

    let report = run_batch(&archive, &tree, &shots, threshold);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{:>12}  {:<12}  {:<16}  {:>10}", "SHOT", "TREE", "STATUS", "TIME (s)");
    for record in &report.records {
        let time = match record.length {
            ShotLength::Terminated { time } => format!("{:.4}", time),
            _ => "-".to_string(),
        };
        println!(
            "{:>12}  {:<12}  {:<16}  {:>10}",
            record.shot,
            record.tree,
            record.length.label(),
            time
        );
    }
    println!();
    println!(
        "{} shot(s): {} terminated, {} without termination, {} unavailable",
        report.records.len(),
        report.terminated(),
        report.no_termination(),
        report.unavailable()
    );

    Ok(())
}

/// Parse command line arguments; `None` means the run is already done (help/version)
fn parse_args(args: &[String]) -> Result<Option<Options>> {
    let mut options = Options {
        archive: None,
        tree: None,
        threshold: None,
        json: false,
        shots: Vec::new(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("shotlength {}", shotlength::VERSION);
                return Ok(None);
            }
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            "--json" | "-j" => options.json = true,
            "--archive" | "-a" => match iter.next() {
                Some(dir) => options.archive = Some(PathBuf::from(dir)),
                None => bail!("--archive requires a directory"),
            },
            "--tree" | "-t" => match iter.next() {
                Some(name) => options.tree = Some(name.clone()),
                None => bail!("--tree requires a tree name"),
            },
            "--threshold" | "-T" => match iter.next().map(|v| v.parse::<f64>()) {
                Some(Ok(amps)) => options.threshold = Some(amps),
                Some(Err(e)) => bail!("Invalid threshold: {}", e),
                None => bail!("--threshold requires a value in amperes"),
            },
            flag if flag.starts_with('-') => {
                print_help();
                bail!("Unknown argument: {}", flag);
            }
            shot => match shot.parse() {
                Ok(n) => options.shots.push(n),
                Err(_) => bail!("Invalid shot number: {}", shot),
            },
        }
    }

    Ok(Some(options))
}

fn print_help() {
    println!("Usage: shotlength [OPTIONS] [SHOT...]");
    println!();
    println!("Options:");
    println!("  -a, --archive DIR       Tree archive root (default: from config)");
    println!("  -t, --tree NAME         Tree to read Ip from (default: magnetics)");
    println!("  -T, --threshold AMPS    Termination threshold (default: 1.2e5)");
    println!("  -j, --json              Print the report as JSON");
    println!("  -v, --version           Show version");
    println!("  -h, --help              Show this help");
    println!();
    println!("Without SHOT arguments, every shot in the archive tree is processed.");
    println!("Config file: {}", AppConfig::path().display());
}
