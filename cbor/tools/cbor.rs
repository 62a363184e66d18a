/*!
CBOR Tools - A CLI for working with CBOR data

# Commands

- `inspect`: Display CBOR data as diagnostic notation, JSON or hex
- `compose`: Convert JSON to CBOR binary

# Examples

```bash
# Inspect a CBOR file as diagnostic notation
cbor inspect data.cbor

# Inspect every item of a CBOR sequence, rejecting non-shortest encodings
cbor inspect --sequence --strict stream.cbor

# Inspect as JSON (lossy)
cbor inspect --format json data.cbor

# Convert JSON to CBOR
echo '{"name": "Alice", "age": 30}' | cbor compose -o data.cbor -

# Round trip
cbor compose data.json | cbor inspect -
```
*/

use clap::{Parser, Subcommand};

mod compose;
mod inspect;
mod io;

/// A CLI tool for working with CBOR data
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "A CLI tool for inspecting and composing CBOR data",
    long_about = "CBOR Tools provides utilities for working with CBOR (Concise Binary Object Representation) data.\n\n\
                  Features:\n\
                  - Inspect CBOR data as diagnostic notation, JSON or hex\n\
                  - Decode CBOR sequences with configurable depth, allocation and strictness limits\n\
                  - Convert JSON to CBOR"
)]
struct Cli {
    /// Log decoder diagnostics to stderr, repeat for more detail
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect and display CBOR data in various formats
    Inspect(inspect::Command),

    /// Convert JSON to CBOR binary
    Compose(compose::Command),
}

fn init_logger(verbose: u8) {
    let log_level = match verbose {
        0 => return,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Commands::Inspect(args) => args.exec(),
        Commands::Compose(args) => args.exec(),
    }
}
