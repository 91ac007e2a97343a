//! CSPM Cluster Analysis Core - Main Entry Point
//!
//! Reads an analysis request (JSON file or stdin), runs one clustering
//! analysis, and prints the result JSON to stdout.
//!
//! Usage:
//!   cspm-cluster-core <request.json | -> [--preset NAME]

mod api;
mod logic;
pub mod constants;

use std::io::Read;

use api::{engine_status, presets, requests::AnalysisRequest};
use logic::analysis;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!(
        "Starting {} v{}...",
        constants::APP_NAME,
        constants::APP_VERSION
    );

    let (input, preset) = match parse_args() {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: cspm-cluster-core <request.json | -> [--preset NAME]");
            std::process::exit(2);
        }
    };

    let raw = match read_input(&input) {
        Ok(raw) => raw,
        Err(error) => {
            log::error!("failed to read request from '{}': {}", input, error);
            std::process::exit(1);
        }
    };

    let request = match AnalysisRequest::parse(&raw) {
        Ok(request) => request,
        Err(error) => {
            log::error!("failed to parse request JSON: {}", error);
            std::process::exit(1);
        }
    };

    let params = match preset.as_deref() {
        Some(name) => match presets::get_preset(name) {
            Some(params) => params,
            None => {
                log::error!(
                    "unknown preset '{}'; available: {}",
                    name,
                    presets::preset_names().join(", ")
                );
                std::process::exit(2);
            }
        },
        None => request.resolved_params(),
    };

    if let Err(error) = request.precheck(&params) {
        log::error!("request rejected: {}", error);
        std::process::exit(1);
    }

    match analysis::run_analysis(&request.events, &params) {
        Ok(result) => {
            engine_status::record_run(&result);
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{json}"),
                Err(error) => {
                    log::error!("failed to serialize result: {}", error);
                    std::process::exit(1);
                }
            }
        }
        Err(error) => {
            log::error!("analysis failed: {}", error);
            std::process::exit(1);
        }
    }
}

/// (input path or "-", optional preset name)
fn parse_args() -> Result<(String, Option<String>), String> {
    let mut input: Option<String> = None;
    let mut preset: Option<String> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--preset" => {
                preset = Some(
                    args.next()
                        .ok_or_else(|| "--preset requires a name".to_string())?,
                );
            }
            other if input.is_none() => input = Some(other.to_string()),
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    Ok((input.ok_or_else(|| "missing request input".to_string())?, preset))
}

fn read_input(input: &str) -> std::io::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(input)
    }
}
