//! Comment input from the command line, stdin or an editor.

use anyhow::{bail, Context, Result};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::Read;
use std::os::unix::ffi::OsStringExt;
use std::process::Command;

/// Reads the comment for this run as raw bytes.
///
/// `-` as the argument reads stdin to the end. With `editor` the user
/// writes the comment in `$EDITOR` (falling back to `vi`). One trailing
/// newline is dropped. An empty comment counts as no comment.
pub fn read_comment(arg: Option<OsString>, editor: bool) -> Result<Option<Vec<u8>>> {
    let mut bytes = if editor {
        edit_comment()?
    } else {
        match arg {
            Some(a) if a == "-" => {
                let mut buf = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buf)
                    .context("Failed to read comment from stdin")?;
                buf
            }
            Some(a) => a.into_vec(),
            None => return Ok(None),
        }
    };

    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(if bytes.is_empty() { None } else { Some(bytes) })
}

fn edit_comment() -> Result<Vec<u8>> {
    let file = tempfile::Builder::new()
        .prefix("suuid-comment-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create temporary file for the comment")?;

    let editor = env::var("EDITOR")
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string());
    let mut words = editor.split_whitespace();
    let program = words.next().unwrap_or("vi");

    let status = Command::new(program)
        .args(words)
        .arg(file.path())
        .status()
        .with_context(|| format!("Failed to start editor '{}'", editor))?;
    if !status.success() {
        bail!("Editor '{}' exited with {}", editor, status);
    }

    fs::read(file.path()).context("Failed to read the edited comment")
}

/// Splits `--tag` values on commas.
pub fn split_tags(values: Vec<OsString>) -> Vec<Vec<u8>> {
    values
        .into_iter()
        .flat_map(|v| {
            v.into_vec()
                .split(|&b| b == b',')
                .filter(|t| !t.is_empty())
                .map(<[u8]>::to_vec)
                .collect::<Vec<_>>()
        })
        .collect()
}
