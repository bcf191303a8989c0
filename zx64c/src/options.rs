use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};

pub const USAGE: &str = "Usage: zx64c [--snapshot] [--output <path>] <input.zx>";
pub const SNAPSHOT_VARIABLE: &str = "ZX64C_SNAPSHOT";

#[derive(Debug, PartialEq, Eq)]
pub struct Options {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    /// Name of the `.sna` file, set only when a snapshot was asked for.
    pub snapshot: Option<String>,
}

impl Options {
    /// Parses the arguments that follow the program name. `snapshot_variable` is the value of
    /// `ZX64C_SNAPSHOT`, which turns snapshots on when set to `1`.
    pub fn parse(
        arguments: impl IntoIterator<Item = String>,
        snapshot_variable: Option<&str>,
    ) -> Result<Self> {
        let mut arguments = arguments.into_iter();
        let mut input = None;
        let mut output = None;
        let mut snapshot = snapshot_variable == Some("1");

        while let Some(argument) = arguments.next() {
            match argument.as_str() {
                "--snapshot" => snapshot = true,
                "--output" | "-o" => {
                    let path = arguments
                        .next()
                        .ok_or_else(|| anyhow!("Missing path after {argument}"))?;
                    output = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => bail!("Unknown option {flag}\n{USAGE}"),
                _ => {
                    if input.is_some() {
                        bail!("Only one input file is supported\n{USAGE}");
                    }
                    input = Some(PathBuf::from(argument));
                }
            }
        }

        let input = input.ok_or_else(|| anyhow!("Missing input file\n{USAGE}"))?;
        let snapshot = snapshot.then(|| snapshot_name(&input)).transpose()?;

        Ok(Self {
            input,
            output,
            snapshot,
        })
    }
}

fn snapshot_name(input: &Path) -> Result<String> {
    input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(ToString::to_string)
        .with_context(|| format!("Cannot name a snapshot after {}", input.display()))
}
