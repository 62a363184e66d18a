/*!
Inspect command - display CBOR data in various formats
*/

use super::io::{Input, Output};
use base64::prelude::*;
use cbor_item::{Config, DEFAULT_MAX_DEPTH, FloatCtrl, Item, Kind, Sequence, Str, Value, load};
use clap::Parser;

/// Inspect and display CBOR data
#[derive(Parser, Debug)]
#[command(about = "Inspect and display CBOR information", long_about = None)]
pub struct Command {
    /// Output format
    #[arg(
        long,
        default_value = "diag",
        value_name = "FORMAT",
        help = "Output format: diag/diagnostic (human-readable), json (lossy), hex"
    )]
    format: OutputFormat,

    /// Decode every item of a CBOR sequence instead of a single item
    #[arg(short = 's', long)]
    sequence: bool,

    /// Reject arguments not encoded in their shortest form
    #[arg(long)]
    strict: bool,

    /// Maximum nesting depth of containers and tags
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH, value_name = "DEPTH")]
    max_depth: usize,

    /// Maximum bytes allocated while decoding one item
    #[arg(long, value_name = "BYTES")]
    max_alloc: Option<usize>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input CBOR file (use '-' for stdin)
    input: Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// CBOR Diagnostic Notation (human-readable, lossless)
    #[value(alias = "diagnostic")]
    Diag,
    /// JSON format (lossy - loses CBOR tags, types, etc.)
    Json,
    /// Hexadecimal dump of each item's encoding
    Hex,
}

impl Command {
    fn config(&self) -> Config {
        let config = Config::default()
            .with_max_depth(self.max_depth)
            .with_strict(self.strict);
        match self.max_alloc {
            Some(max_alloc) => config.with_max_alloc(max_alloc),
            None => config,
        }
    }

    /// Render one item, `encoded` being the bytes it was decoded from.
    fn render(&self, item: &Item, encoded: &[u8]) -> anyhow::Result<String> {
        Ok(match self.format {
            OutputFormat::Diag => item.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(&to_json(item))?,
            OutputFormat::Hex => hex::encode(encoded),
        })
    }

    /// One rendered line per decoded item of `data`.
    fn lines(&self, data: &[u8]) -> anyhow::Result<Vec<String>> {
        let config = self.config();
        let mut lines = Vec::new();
        if self.sequence {
            let mut items = Sequence::new(data, config);
            let mut start = 0;
            while let Some(item) = items.next() {
                let item = item
                    .map_err(|e| anyhow::anyhow!("Failed to decode item at offset {start}: {e}"))?;
                lines.push(self.render(&item, &data[start..items.offset()])?);
                start = items.offset();
            }
        } else {
            let (item, len) = load(data, &config)
                .map_err(|e| anyhow::anyhow!("Failed to decode item: {e}"))?;
            lines.push(self.render(&item, &data[..len])?);

            if len < data.len() {
                eprintln!(
                    "Warning: {} trailing bytes after the first item",
                    data.len() - len
                );
            }
        }
        Ok(lines)
    }

    pub fn exec(self) -> anyhow::Result<()> {
        let data = self.input.read_all()?;
        let lines = self.lines(&data)?;
        self.output.unwrap_or_default().write_text(&lines.join("\n"))
    }
}

/// Convert an item to JSON, lossily: tags are dropped, byte strings become
/// base64url text, and values with no JSON equivalent become `null`.
fn to_json(item: &Item) -> serde_json::Value {
    use serde_json::Value as J;

    match item.value() {
        Value::Uint(i) => J::from(i.value()),
        Value::NegInt(_) => match item.as_i64() {
            Some(i) => J::from(i),
            // Beyond i64, fall back to a float approximation
            None => item
                .as_i128()
                .and_then(|i| serde_json::Number::from_f64(i as f64))
                .map_or(J::Null, J::Number),
        },
        Value::Bytes(_) | Value::Text(Str::Chunked(_)) => match item.flatten() {
            Ok(flat) => match (flat.as_bytes(), flat.as_str()) {
                (Some(b), _) => J::String(BASE64_URL_SAFE_NO_PAD.encode(b)),
                (_, Some(s)) => J::String(s.to_string()),
                _ => J::Null,
            },
            Err(_) => J::Null,
        },
        Value::Text(Str::Definite(s)) => J::String(s.clone()),
        Value::Array(a) => J::Array(a.iter().map(to_json).collect()),
        Value::Map(m) => J::Object(
            m.iter()
                .map(|pair| {
                    // In JSON, all keys must be strings
                    let key = match pair.key.flatten() {
                        Ok(flat) if pair.key.kind() == Kind::Text => {
                            flat.as_str().unwrap_or_default().to_string()
                        }
                        _ => pair.key.to_string(),
                    };
                    (key, to_json(&pair.value))
                })
                .collect(),
        ),
        Value::Tag(t) => to_json(t.item()),
        Value::FloatCtrl(FloatCtrl::Bool(b)) => J::Bool(*b),
        Value::FloatCtrl(f) => f
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map_or(J::Null, J::Number),
    }
}
