/*!
Compose command - convert JSON to CBOR
*/

use crate::io::{Input, Output};
use cbor_item::{Item, serialize_alloc};
use clap::Parser;

/// Convert JSON to CBOR binary
#[derive(Parser, Debug)]
#[command(
    about = "Convert JSON to CBOR binary",
    long_about = "Parse JSON and convert it to CBOR binary.\n\n\
                  Integers use their shortest encoding and floats the narrowest \
                  precision that represents them exactly.  Containers are \
                  written with definite lengths unless --indefinite is given."
)]
pub struct Command {
    /// Write arrays and maps with indefinite lengths
    #[arg(long)]
    indefinite: bool,

    /// Write the CBOR as a hex string instead of binary
    #[arg(long)]
    hex: bool,

    /// Output file (default: stdout)
    #[arg(short = 'o', long)]
    output: Option<Output>,

    /// Input file (use '-' for stdin)
    input: Input,
}

impl Command {
    pub fn exec(self) -> anyhow::Result<()> {
        let input_text = self.input.read_to_string()?;
        let json: serde_json::Value = serde_json::from_str(&input_text)?;

        let item = json_to_item(json, self.indefinite)?;
        let cbor_bytes = serialize_alloc(&item)?;

        let output = self.output.unwrap_or_default();
        if self.hex {
            output.write_text(&hex::encode(&cbor_bytes))
        } else {
            output.write_all(&cbor_bytes)
        }
    }
}

/// Convert a JSON value to an item
fn json_to_item(value: serde_json::Value, indefinite: bool) -> anyhow::Result<Item> {
    use serde_json::Value as J;

    Ok(match value {
        J::Null => Item::null(),
        J::Bool(b) => Item::bool(b),

        J::Number(n) => {
            if let Some(u) = n.as_u64() {
                Item::uint(u)
            } else if let Some(i) = n.as_i64() {
                Item::int(i)
            } else if let Some(f) = n.as_f64() {
                Item::float(f)
            } else {
                anyhow::bail!("Invalid JSON number: {}", n)
            }
        }

        J::String(s) => Item::text(s),

        J::Array(arr) => {
            let mut array = Item::array((!indefinite).then_some(arr.len()));
            for v in arr {
                array.push(json_to_item(v, indefinite)?)?;
            }
            array
        }

        J::Object(obj) => {
            let mut map = Item::map((!indefinite).then_some(obj.len()));
            for (key, val) in obj {
                // JSON object keys are always strings
                map.add_pair(Item::text(key), json_to_item(val, indefinite)?)?;
            }
            map
        }
    })
}
