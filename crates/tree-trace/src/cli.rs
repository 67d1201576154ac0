//! Script runner behind the `tree-trace` binary.
//!
//! A script is one command per line:
//!
//! ```text
//! # comment
//! insert 10
//! delete 10
//! find 10
//! print
//! ```
//!
//! Each command yields one JSON object. Contract violations (inserting a
//! present key, deleting a missing one) are reported in an `error` field and
//! do not stop the script.

use serde_json::{json, Value};
use thiserror::Error;

use crate::action::Trace;
use crate::error::TreeError;
use crate::print::print;
use crate::tree::Tree;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Insert(i64),
    Delete(i64),
    Find(i64),
    Print,
}

pub fn parse_script(src: &str) -> Result<Vec<Command>, CliError> {
    let mut out = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_err = |message: String| CliError::Parse {
            line: i + 1,
            message,
        };
        let mut parts = line.split_whitespace();
        let op = parts.next().unwrap_or_default();
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(parse_err(format!("too many arguments in {line:?}")));
        }
        let key = || -> Result<i64, CliError> {
            let arg = arg.ok_or_else(|| parse_err(format!("{op} needs a key")))?;
            arg.parse::<i64>()
                .map_err(|e| parse_err(format!("invalid key {arg:?}: {e}")))
        };
        let command = match op {
            "insert" | "i" => Command::Insert(key()?),
            "delete" | "d" => Command::Delete(key()?),
            "find" | "f" => Command::Find(key()?),
            "print" | "p" if arg.is_none() => Command::Print,
            _ => return Err(parse_err(format!("unknown command {line:?}"))),
        };
        out.push(command);
    }
    Ok(out)
}

pub fn run_command(tree: &mut Tree<i64>, command: Command) -> Result<Value, CliError> {
    let result = |op: &str, key: i64, outcome: Result<Trace<i64>, TreeError>| -> Result<Value, CliError> {
        Ok(match outcome {
            Ok(trace) => json!({ "op": op, "key": key, "trace": trace }),
            Err(e @ (TreeError::DuplicateKey(_) | TreeError::KeyNotFound(_))) => {
                json!({ "op": op, "key": key, "error": e.to_string() })
            }
            Err(e) => return Err(e.into()),
        })
    };
    match command {
        Command::Insert(key) => result("insert", key, tree.insert(key)),
        Command::Delete(key) => result("delete", key, tree.delete(&key)),
        Command::Find(key) => Ok(json!({ "op": "find", "key": key, "found": tree.contains(&key) })),
        Command::Print => {
            let snapshot = tree.snapshot();
            Ok(json!({ "op": "print", "text": print(&snapshot), "tree": snapshot }))
        }
    }
}

/// Runs every command of `script` against `tree`.
pub fn run_script(tree: &mut Tree<i64>, script: &str) -> Result<Vec<Value>, CliError> {
    parse_script(script)?
        .into_iter()
        .map(|command| run_command(tree, command))
        .collect()
}
