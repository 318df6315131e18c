//! CLI binary for Enfora Parser
//!
//! Decodes files of hex-encoded Enfora frames, one connection per file.

use anyhow::Result;
use clap::{Arg, Command};
use enfora_parser::{
    export_capture, parse_frame_file, DecodedFrame, ExportOptions, FrameCapture,
    InMemorySessions, IMEI_LENGTH,
};
use glob::glob;
use log::{debug, error, warn, LevelFilter};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

fn build_command() -> Command {
    Command::new("Enfora Parser")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Decode Enfora GPS tracker frames (hex, one frame per line). Optionally export to CSV/JSON.")
        .arg(
            Arg::new("files")
                .help("Frame files to decode, one connection per file (supports globbing)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Enable debug output, including the reason each discarded frame was dropped")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("imei")
                .long("imei")
                .help("Register a known device IMEI (repeatable)")
                .value_name("IMEI")
                .action(clap::ArgAction::Append),
        )
        .arg(
            Arg::new("register-all")
                .long("register-all")
                .help("Accept frames from any IMEI, registering unknown devices on first sight")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("csv")
                .long("csv")
                .help("Export positions and command results to CSV files")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Export all decoded records to a JSON lines file (requires the `json` feature)")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .help("Directory for output files (default: same as input file)")
                .value_name("DIR"),
        )
}

fn expand_patterns(patterns: &[&String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        if pattern.contains('*') || pattern.contains('?') {
            match glob(pattern) {
                Ok(entries) => {
                    let before = paths.len();
                    paths.extend(entries.filter_map(|entry| match entry {
                        Ok(path) => Some(path),
                        Err(e) => {
                            warn!("Skipping unreadable glob match: {e}");
                            None
                        }
                    }));
                    debug!("Glob pattern '{pattern}' matched {} files", paths.len() - before);
                }
                Err(e) => error!("Invalid glob pattern '{pattern}': {e}"),
            }
        } else {
            paths.push(PathBuf::from(pattern.as_str()));
        }
    }
    paths
}

fn print_capture(capture: &FrameCapture) {
    for record in &capture.records {
        match record {
            DecodedFrame::Position(position) => {
                let attributes: Vec<String> = position
                    .attributes
                    .iter()
                    .map(|(key, value)| format!("{key}={value}"))
                    .collect();
                println!(
                    "  position device={} time={} valid={} lat={:.6} lon={:.6} speed={} course={} {}",
                    position.device_id,
                    position.fix_time.to_rfc3339(),
                    position.valid,
                    position.latitude,
                    position.longitude,
                    position.speed,
                    position.course,
                    attributes.join(" ")
                );
            }
            DecodedFrame::Result(result) => {
                println!(
                    "  result   device={} last_fix={} result={:?}",
                    result.device_id,
                    result.fix.fix_time.to_rfc3339(),
                    result.result()
                );
            }
        }
    }
    println!(
        "  {} frames: {} positions, {} results, {} discarded",
        capture.stats.total_frames,
        capture.stats.positions,
        capture.stats.results,
        capture.stats.discarded
    );
}

fn main() -> Result<()> {
    let matches = build_command().get_matches();

    let debug = matches.get_flag("debug");
    env_logger::Builder::new()
        .filter_level(if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .parse_default_env()
        .init();
    debug!(
        "enfora_parser {} ({})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown")
    );

    let export_options = ExportOptions {
        csv: matches.get_flag("csv"),
        json: matches.get_flag("json"),
        output_dir: matches.get_one::<String>("output-dir").cloned(),
    };

    let sessions =
        InMemorySessions::new().with_register_unknown(matches.get_flag("register-all"));
    for imei in matches.get_many::<String>("imei").into_iter().flatten() {
        if imei.len() != IMEI_LENGTH || !imei.bytes().all(|b| b.is_ascii_digit()) {
            warn!("IMEI '{imei}' is not {IMEI_LENGTH} digits; frames will never match it");
        }
        let device_id = sessions.register(imei);
        debug!("Registered device {imei} as {device_id}");
    }

    let file_patterns: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|files| files.collect())
        .unwrap_or_default();
    let paths = expand_patterns(&file_patterns);

    if paths.is_empty() {
        eprintln!("Error: No files found to process.");
        eprintln!("Input patterns were: {file_patterns:?}");
        std::process::exit(1);
    }

    let mut processed_files = 0;
    for (index, path) in paths.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("Processing: {}", display_name(path));

        // Each file stands for one connection
        let remote = SocketAddr::from(([127, 0, 0, 1], 10_000 + (index % 50_000) as u16));

        let capture = match parse_frame_file(path, &sessions, &remote) {
            Ok(capture) => capture,
            Err(e) => {
                eprintln!("Error processing {}: {e}", display_name(path));
                eprintln!("Continuing with next file...");
                continue;
            }
        };
        print_capture(&capture);

        if capture.stats.discarded > 0 && !debug {
            println!("  (use --debug to see why frames were discarded)");
        }

        match export_capture(&capture, path, &export_options) {
            Ok(report) => {
                for written in [report.positions_csv, report.results_csv, report.json_path]
                    .into_iter()
                    .flatten()
                {
                    println!("  Exported: {}", written.display());
                }
            }
            Err(e) => eprintln!("Export failed for {}: {e}", display_name(path)),
        }

        processed_files += 1;
    }

    if processed_files == 0 {
        eprintln!(
            "Error: No files were successfully processed out of {} files found.",
            paths.len()
        );
        eprintln!("Frame files hold one hex-encoded frame per line; '#' starts a comment.");
        std::process::exit(1);
    }

    Ok(())
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
}
