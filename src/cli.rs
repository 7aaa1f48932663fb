use std::{env, path::PathBuf};

use anyhow::{Context, Result, anyhow};

use crate::config::DEFAULT_CONFIG_FILE;

const USAGE: &str = "usage: atelier [--config <path>] [--layer preset|strategy] [--sector <name>] \
[--occasion <name>]... [--calendar <id>] [--brand <id>] [--count <n>] [--seed <n>] \
[--objective <name>] [--country <name>] [--platform <name>]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewLayer {
    Preset,
    Strategy,
}

/// Arguments of the preview binary: one calendar worth of selections printed as JSON lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewArgs {
    pub config_path: PathBuf,
    pub layer: PreviewLayer,
    pub sector: String,
    pub occasions: Vec<String>,
    pub calendar_id: String,
    pub brand_id: Option<String>,
    pub count: u64,
    pub seed: Option<u64>,
    pub objective: Option<String>,
    pub country: String,
    pub platform: String,
}

impl Default for PreviewArgs {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(format!("./{DEFAULT_CONFIG_FILE}")),
            layer: PreviewLayer::Preset,
            sector: "default".to_string(),
            occasions: Vec::new(),
            calendar_id: "preview".to_string(),
            brand_id: None,
            count: 5,
            seed: None,
            objective: None,
            country: "France".to_string(),
            platform: "instagram".to_string(),
        }
    }
}

pub fn preview_args_from_args() -> Result<PreviewArgs> {
    parse_preview_args(env::args().skip(1))
}

pub fn parse_preview_args(args: impl IntoIterator<Item = String>) -> Result<PreviewArgs> {
    let mut args = args.into_iter();
    let mut parsed = PreviewArgs::default();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| anyhow!("missing value for {flag}. {USAGE}"))
        };
        match arg.as_str() {
            "--config" => parsed.config_path = PathBuf::from(value("--config")?),
            "--layer" => {
                parsed.layer = match value("--layer")?.as_str() {
                    "preset" => PreviewLayer::Preset,
                    "strategy" => PreviewLayer::Strategy,
                    other => return Err(anyhow!("unknown layer: {other}. {USAGE}")),
                }
            }
            "--sector" => parsed.sector = value("--sector")?,
            "--occasion" => parsed.occasions.push(value("--occasion")?),
            "--calendar" => parsed.calendar_id = value("--calendar")?,
            "--brand" => parsed.brand_id = Some(value("--brand")?),
            "--count" => {
                let raw = value("--count")?;
                parsed.count = raw
                    .parse()
                    .with_context(|| format!("invalid --count value '{raw}'"))?;
            }
            "--seed" => {
                let raw = value("--seed")?;
                parsed.seed = Some(
                    raw.parse()
                        .with_context(|| format!("invalid --seed value '{raw}'"))?,
                );
            }
            "--objective" => parsed.objective = Some(value("--objective")?),
            "--country" => parsed.country = value("--country")?,
            "--platform" => parsed.platform = value("--platform")?,
            other => return Err(anyhow!("unknown argument: {other}. {USAGE}")),
        }
    }

    if parsed.calendar_id.trim().is_empty() {
        return Err(anyhow!("--calendar cannot be empty"));
    }
    Ok(parsed)
}
