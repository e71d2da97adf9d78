//! Print the viseme sequence generated for some text or word timing.
//!
//! ```text
//! fae-viseme-dump [--config lipsync.toml] hello world
//! fae-viseme-dump [--config lipsync.toml] --whisper timing.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, bail};
use fae_lipsync::{LipsyncDriver, VisemeConfig, VisemeState, WhisperData};

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("fae-viseme-dump failed: {e:#}");
        std::process::exit(1);
    }
}

struct Args {
    config: Option<PathBuf>,
    whisper: Option<PathBuf>,
    words: Vec<String>,
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut args = Args {
        config: None,
        whisper: None,
        words: Vec::new(),
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--whisper" => {
                let path = iter.next().context("--whisper requires a path")?;
                args.whisper = Some(PathBuf::from(path));
            }
            "help" | "--help" | "-h" => return Ok(None),
            other if other.starts_with("--") => bail!("unknown option `{other}`"),
            _ => args.words.push(arg),
        }
    }
    Ok(Some(args))
}

fn run() -> anyhow::Result<()> {
    let Some(args) = parse_args()? else {
        print_usage();
        return Ok(());
    };

    let config = match &args.config {
        Some(path) => VisemeConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => VisemeConfig::default(),
    };
    let driver = LipsyncDriver::new(config)?;
    let mut state = VisemeState::default();

    match &args.whisper {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let whisper = WhisperData::from_json(&json)?;
            driver.speak(&mut state, &whisper);
        }
        None if args.words.is_empty() => {
            print_usage();
            return Ok(());
        }
        None => {
            driver.speak_text(&mut state, &args.words.join(" "));
        }
    }

    println!("{}", serde_json::to_string_pretty(&state.sequence)?);
    Ok(())
}

fn print_usage() {
    println!("usage: fae-viseme-dump [--config <toml>] (--whisper <json> | <words>...)");
}
