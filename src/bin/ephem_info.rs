//! DE Dataset Information Tool
//!
//! Analyzes a JPL DE export binary and prints what it contains: release
//! number, time coverage, header constants, per-series coefficient layout
//! and the bodies the dataset can evaluate.
//!
//! Usage:
//!   cargo run --bin ephem_info -- [--constants] [--sample-jd 2451545.0] path/to/dataset

use std::path::Path;
use std::time::Instant;

use clap::{ArgAction, Parser};
use swingby::jplde::header::{series_components, SERIES_COUNT};
use swingby::jplde::{calendar, ids};
use swingby::EphemerisSource;

/// DE Dataset Information Tool
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Analyzes and displays information about JPL DE export binary datasets",
    long_about = None
)]
struct Args {
    /// Also list every header constant with its value
    #[arg(short, long, action = ArgAction::SetTrue)]
    constants: bool,

    /// Evaluate a sample heliocentric Earth state at this Julian date
    #[arg(short, long)]
    sample_jd: Option<f64>,

    /// Ephemeris dataset to analyze
    filename: String,
}

/// Format bytes as KB, MB, or GB
fn format_size(size_bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size_bytes >= GB {
        format!("{:.2} GB", size_bytes as f64 / GB as f64)
    } else if size_bytes >= MB {
        format!("{:.2} MB", size_bytes as f64 / MB as f64)
    } else if size_bytes >= KB {
        format!("{:.2} KB", size_bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", size_bytes)
    }
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

fn display_coverage(source: &EphemerisSource) {
    let (start_jd, end_jd) = source.jd_range();
    let duration_days = end_jd - start_jd;

    print_section_header("Time Coverage");
    println!(
        "Start date: {} (JD {:.1})",
        calendar::format_date(start_jd),
        start_jd
    );
    println!(
        "End date:   {} (JD {:.1})",
        calendar::format_date(end_jd),
        end_jd
    );
    println!(
        "Duration:   {:.1} days ({:.1} years)",
        duration_days,
        duration_days / 365.25
    );
}

fn display_layout(source: &EphemerisSource) {
    let header = source.dataset().header();

    print_section_header("Coefficient Layout");
    println!(
        "{:<8} {:<10} {:<14} {:<14} {:<10}",
        "Series", "Offset", "Coefficients", "Sub-intervals", "Components"
    );
    for series in 0..SERIES_COUNT {
        let slot = header.layout[series];
        if !slot.is_present() {
            continue;
        }
        println!(
            "{:<8} {:<10} {:<14} {:<14} {:<10}",
            series,
            slot.offset,
            slot.n_coeffs,
            slot.n_subintervals,
            series_components(series)
        );
    }
}

fn display_bodies(source: &EphemerisSource) {
    print_section_header("Evaluable Bodies");
    for id in ids::MERCURY..=ids::EARTH_MOON_BARYCENTER {
        if source.recognizes(id) {
            println!(
                "  - {} (ID: {})",
                ids::body_name(id).unwrap_or("Unknown"),
                id
            );
        }
    }
}

fn display_constants(source: &EphemerisSource) {
    let constants = source.dataset().constants();
    print_section_header(format!("Header Constants ({} total)", constants.len()).as_str());
    for (name, value) in constants {
        println!("{:<8} = {}", name, value);
    }
}

fn display_sample(source: &EphemerisSource, jd: f64) {
    print_section_header(&format!("Heliocentric Earth state at JD {}", jd));
    match source.evaluate_state(jd, ids::SUN, ids::EARTH) {
        Ok((position, velocity)) => {
            println!(
                "Position [km]:   ({:+.3e}, {:+.3e}, {:+.3e})",
                position.x, position.y, position.z
            );
            println!(
                "Velocity [km/s]: ({:+.6e}, {:+.6e}, {:+.6e})",
                velocity.x, velocity.y, velocity.z
            );
        }
        Err(e) => println!("Evaluation failed: {}", e),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Analyzing DE dataset: {}", args.filename);
    println!("-------------------------------------------------------");

    let metadata = std::fs::metadata(Path::new(&args.filename))?;
    println!("File size: {}", format_size(metadata.len()));

    let start_time = Instant::now();
    let source = EphemerisSource::open(&args.filename)?;
    println!("Dataset loaded in {:.2?}", start_time.elapsed());

    let header = source.dataset().header();
    print_section_header("Dataset");
    println!("Release:     DE{}", source.de_number());
    println!("Title:       {}", header.title);
    println!("Byte order:  {:?}", header.endian);
    println!("Record size: {}", format_size(header.record_bytes as u64));
    println!("AU:          {} km", source.au_km());
    println!("EMRAT:       {}", header.emrat);

    display_coverage(&source);
    display_layout(&source);
    display_bodies(&source);

    if args.constants {
        display_constants(&source);
    }

    if let Some(jd) = args.sample_jd {
        display_sample(&source, jd);
    }

    Ok(())
}
