mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

use qc_av::{FfmpegCutter, SystemTrash, ToolRegistry};
use qc_core::config::Config;
use qc_export::{ExportJob, ExportReport, Segment, SegmentExporter};

fn load_config(config_path: Option<&Path>) -> Config {
    let mut config = Config::load_or_default(config_path);
    config.apply_env();
    config
}

async fn start_server(
    host: Option<String>,
    port: Option<u16>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path);

    // CLI flags win over config file and environment.
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    qc_server::start(config).await?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "quickcut=trace,qc_core=debug,qc_av=debug,qc_export=debug,qc_server=debug,tower_http=debug"
                .to_string()
        } else {
            "quickcut=info,qc_core=info,qc_av=info,qc_export=info,qc_server=info,tower_http=info"
                .to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Cut {
            file,
            segments,
            trash,
            json,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cut_file(&file, &segments, trash, json, cli.config.as_deref()))
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("quickcut {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Parse a `START-END` command-line segment.
fn parse_segment_arg(arg: &str) -> Result<Segment> {
    match arg.split_once('-') {
        Some((start, end)) if !start.trim().is_empty() && !end.trim().is_empty() => {
            Ok(Segment::new(start.trim(), end.trim()))
        }
        _ => anyhow::bail!("Invalid segment {arg:?}; expected START-END, e.g. 0:05-0:15"),
    }
}

async fn cut_file(
    file: &Path,
    segment_args: &[String],
    trash: bool,
    json: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path);
    let segments = segment_args
        .iter()
        .map(|s| parse_segment_arg(s))
        .collect::<Result<Vec<_>>>()?;

    let tools = Arc::new(ToolRegistry::discover(&config.tools));
    let timeout = config.export.cut_timeout_secs.map(Duration::from_secs);
    let exporter = SegmentExporter::new(
        Arc::new(FfmpegCutter::new(tools.clone(), timeout)),
        Arc::new(SystemTrash),
        tools,
    )
    .with_max_workers(config.export.max_workers.unwrap_or(0));

    let job = ExportJob {
        source: file.to_path_buf(),
        segments,
        trash_original: trash,
    };
    let report = exporter.export(&job).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.all_succeeded() {
        anyhow::bail!("{} of {} entries failed", report.failures(), report.results.len());
    }
    Ok(())
}

fn print_report(report: &ExportReport) {
    for entry in &report.results {
        let label = entry
            .segment
            .map(|i| format!("[{i:02}]"))
            .unwrap_or_else(|| "[--]".to_string());

        if entry.ok {
            println!("✓ {label} {}", entry.output.as_deref().unwrap_or(""));
            if let (Some(birth), Some(modified)) = (&entry.birth, &entry.modified) {
                println!("       created {birth}, modified {modified}");
            }
        } else {
            println!("✗ {label} {}", entry.error.as_deref().unwrap_or("unknown error"));
        }
    }

    if report.trashed_original {
        println!("\nOriginal moved to trash.");
    }
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = load_config(config_path);
    let tools = ToolRegistry::discover(&config.tools);
    let infos = tools.check_all();

    for tool in &infos {
        let status = if tool.available { "✓" } else { "✗" };
        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if tools.get(qc_av::tools::FFMPEG).is_some() {
        println!("ffmpeg is available; exports are enabled.");
    } else {
        println!("ffmpeg is missing. Install it to enable exports.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = Config::load(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("  Server: {}:{}", config.server.host, config.server.port);
    match &config.server.static_dir {
        Some(dir) => println!("  Static dir: {}", dir.display()),
        None => println!("  Static dir: (none)"),
    }
    match config.export.max_workers {
        Some(n) if n > 0 => println!("  Export workers: {n}"),
        _ => println!("  Export workers: {} (default)", qc_export::default_workers()),
    }
    match config.export.cut_timeout_secs {
        Some(secs) => println!("  Cut timeout: {secs}s"),
        None => println!("  Cut timeout: none"),
    }

    for warning in config.validate() {
        println!("  ⚠ {warning}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_arg_splits_on_dash() {
        assert_eq!(
            parse_segment_arg("0:05-0:15").unwrap(),
            Segment::new("0:05", "0:15")
        );
        assert_eq!(
            parse_segment_arg(" 1:00:00 - 1:00:30 ").unwrap(),
            Segment::new("1:00:00", "1:00:30")
        );
    }

    #[test]
    fn segment_arg_requires_both_bounds() {
        assert!(parse_segment_arg("0:05").is_err());
        assert!(parse_segment_arg("-0:15").is_err());
        assert!(parse_segment_arg("0:05-").is_err());
    }
}
