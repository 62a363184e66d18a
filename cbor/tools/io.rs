/*!
Reading the input and writing the output of a command, either a file or
stdin/stdout when given `-`.
*/

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    pub fn read_all(&self) -> anyhow::Result<Vec<u8>> {
        let data = match self {
            Input::Stdin => {
                let mut buffer = Vec::new();
                io::stdin().lock().read_to_end(&mut buffer)?;
                buffer
            }
            Input::File(path) => fs::read(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?,
        };
        Ok(data)
    }

    pub fn read_to_string(&self) -> anyhow::Result<String> {
        String::from_utf8(self.read_all()?).map_err(|_| anyhow::anyhow!("Input is not valid UTF-8"))
    }
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Input::Stdin,
            path => Input::File(PathBuf::from(path)),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub enum Output {
    #[default]
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn write_all(&self, data: &[u8]) -> anyhow::Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data)?;
                stdout.flush()?;
            }
            Output::File(path) => fs::write(path, data)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))?,
        }
        Ok(())
    }

    /// Write text, newline terminated when going to a terminal.
    pub fn write_text(&self, text: &str) -> anyhow::Result<()> {
        match self {
            Output::Stdout => self.write_all(format!("{text}\n").as_bytes()),
            Output::File(_) => self.write_all(text.as_bytes()),
        }
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "-" => Output::Stdout,
            path => Output::File(PathBuf::from(path)),
        })
    }
}
