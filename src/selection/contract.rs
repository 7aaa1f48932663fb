use std::{
    collections::BTreeMap,
    fmt::Write as _,
    sync::LazyLock,
};

use regex::Regex;

use crate::{
    catalog::Dimension,
    relevance::FilteredSet,
    selection::AssistedContext,
};

pub const BLOCK_OPEN: &str = "---SELECTION---";
pub const BLOCK_CLOSE: &str = "---END---";
pub const CONTRACT_VERSION: u32 = 1;

const VERSION_FIELD: &str = "Version";
const JUSTIFICATION_FIELD: &str = "Justification";
const DESCRIPTOR_PREVIEW_CHARS: usize = 90;

static FIELD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*]?\s*([A-Za-z][A-Za-z _-]*?)\s*:\s*(.*?)\s*$")
        .unwrap_or_else(|err| panic!("field line pattern must compile: {err}"))
});

/// Recoverable failure of the assisted path. Never surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SoftFailure {
    #[error("assisted selection is disabled")]
    Disabled,
    #[error("reasoning service failed: {0}")]
    Service(String),
    #[error("reasoning service timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("reasoning service returned an empty response")]
    EmptyResponse,
    #[error("response has no ---SELECTION--- ... ---END--- block")]
    MissingBlock,
    #[error("response block is missing field '{label}'")]
    MissingField { label: &'static str },
    #[error("response block repeats field '{label}'")]
    DuplicateField { label: &'static str },
    #[error("field '{label}' is not an integer: '{raw}'")]
    InvalidIndex { label: &'static str, raw: String },
    #[error("field '{label}' index {index} is outside [0, {len})")]
    OutOfRange {
        label: &'static str,
        index: i64,
        len: usize,
    },
    #[error("unsupported response version '{found}'")]
    UnsupportedVersion { found: String },
}

impl SoftFailure {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Service(_) => "service",
            Self::Timeout { .. } => "timeout",
            Self::EmptyResponse => "empty_response",
            Self::MissingBlock => "missing_block",
            Self::MissingField { .. } => "missing_field",
            Self::DuplicateField { .. } => "duplicate_field",
            Self::InvalidIndex { .. } => "invalid_index",
            Self::OutOfRange { .. } => "out_of_range",
            Self::UnsupportedVersion { .. } => "unsupported_version",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelection<D: Dimension> {
    pub indices: BTreeMap<D, usize>,
    pub justification: Option<String>,
}

pub fn system_prompt() -> String {
    format!(
        "You are an art director planning a social media calendar. You pick one option per \
         dimension so that every post looks different from the recent ones while staying \
         relevant to the brand. Reply with exactly one {BLOCK_OPEN} block and nothing else \
         of importance."
    )
}

/// Lists candidate indices per dimension, the brand context, the recently used
/// names and the exact reply format.
pub fn build_user_prompt<D: Dimension>(
    set: &FilteredSet<D>,
    context: &AssistedContext,
    recent: &BTreeMap<D, Vec<String>>,
    post_index: u64,
) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "CONTEXT");
    let _ = writeln!(prompt, "Brand: {}", context.brand);
    for (label, value) in [
        ("Product", &context.product),
        ("Campaign objective", &context.campaign_objective),
        ("Audience", &context.audience),
        ("Tone", &context.tone),
        ("Platform", &context.platform),
    ] {
        if let Some(value) = value.as_deref().filter(|value| !value.trim().is_empty()) {
            let _ = writeln!(prompt, "{label}: {}", value.trim());
        }
    }
    let _ = writeln!(prompt, "Post index: {post_index}");

    for dimension in D::ALL {
        let pool = set.pool(*dimension);
        let _ = writeln!(prompt);
        let _ = writeln!(
            prompt,
            "{} ({} options, indices 0-{}):",
            dimension.label().to_uppercase(),
            pool.len(),
            pool.len().saturating_sub(1)
        );
        for (index, entry) in pool.iter().enumerate() {
            let preview: String = entry.descriptor.chars().take(DESCRIPTOR_PREVIEW_CHARS).collect();
            if preview.is_empty() {
                let _ = writeln!(prompt, "[{index}] {}", entry.name);
            } else {
                let _ = writeln!(prompt, "[{index}] {} - {preview}", entry.name);
            }
        }
        if let Some(names) = recent.get(dimension).filter(|names| !names.is_empty()) {
            let _ = writeln!(prompt, "Recently used, avoid: {}", names.join(", "));
        }
    }

    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "REPLY FORMAT (strict):");
    let _ = writeln!(prompt, "{BLOCK_OPEN}");
    let _ = writeln!(prompt, "{VERSION_FIELD}: {CONTRACT_VERSION}");
    for dimension in D::ALL {
        let _ = writeln!(prompt, "{}: [index]", dimension.label());
    }
    let _ = writeln!(prompt, "{JUSTIFICATION_FIELD}: [one short sentence]");
    let _ = write!(prompt, "{BLOCK_CLOSE}");

    prompt
}

/// Strict parse of the reply block. Any schema deviation is a typed soft failure.
pub fn parse_selection<D: Dimension>(
    text: &str,
    set: &FilteredSet<D>,
) -> Result<ParsedSelection<D>, SoftFailure> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SoftFailure::EmptyResponse);
    }
    let body = extract_block(text).ok_or(SoftFailure::MissingBlock)?;

    let mut indices = BTreeMap::new();
    let mut justification = None;
    for line in body.lines() {
        let Some(captures) = FIELD_LINE.captures(line) else {
            continue;
        };
        let key = captures.get(1).map_or("", |m| m.as_str());
        let value = captures.get(2).map_or("", |m| m.as_str());

        if key.eq_ignore_ascii_case(VERSION_FIELD) {
            if value.parse::<u32>().ok() != Some(CONTRACT_VERSION) {
                return Err(SoftFailure::UnsupportedVersion {
                    found: value.to_string(),
                });
            }
            continue;
        }
        if key.eq_ignore_ascii_case(JUSTIFICATION_FIELD) {
            justification = Some(value.to_string()).filter(|value| !value.is_empty());
            continue;
        }
        let Some(dimension) = D::from_label(key) else {
            continue;
        };

        let label = dimension.label();
        let raw = value.trim_start_matches('[').trim_end_matches(']').trim();
        let index: i64 = raw.parse().map_err(|_| SoftFailure::InvalidIndex {
            label,
            raw: value.to_string(),
        })?;
        let len = set.len(dimension);
        let index = usize::try_from(index)
            .ok()
            .filter(|index| *index < len)
            .ok_or(SoftFailure::OutOfRange { label, index, len })?;

        if indices.insert(dimension, index).is_some() {
            return Err(SoftFailure::DuplicateField { label });
        }
    }

    if let Some(missing) = D::ALL
        .iter()
        .find(|dimension| !indices.contains_key(dimension))
    {
        return Err(SoftFailure::MissingField {
            label: missing.label(),
        });
    }

    Ok(ParsedSelection {
        indices,
        justification,
    })
}

fn extract_block(text: &str) -> Option<&str> {
    let start = text.find(BLOCK_OPEN)? + BLOCK_OPEN.len();
    let end = text[start..].find(BLOCK_CLOSE)?;
    Some(&text[start..start + end])
}
