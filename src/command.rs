//! Line-to-command parsing.
//!
//! Parsing is structural only: it checks the shape of the line, never
//! whether an index exists or a path is readable. Semantic checks happen
//! at dispatch, against the listing the user is looking at.

use std::path::PathBuf;

use crate::error::{DriveshError, Result};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `cd <index>`, 0 meaning the parent folder
    Chdir(usize),
    /// `dl <index> <dest-path>`
    Download { index: usize, dest: PathBuf },
    /// `up <index> <src-path>`
    Upload { index: usize, src: PathBuf },
    /// `mkfile <name>`
    Mkfile(String),
    /// `help`
    Help,
}

/// Parse one raw input line (line ending already stripped).
pub fn parse(line: &str) -> Result<Command> {
    if let Some(rest) = line.strip_prefix("cd ") {
        return Ok(Command::Chdir(parse_index(rest)?));
    }
    if let Some(rest) = line.strip_prefix("dl ") {
        let (index, dest) = parse_index_and_path(rest)?;
        return Ok(Command::Download { index, dest });
    }
    if let Some(rest) = line.strip_prefix("up ") {
        let (index, src) = parse_index_and_path(rest)?;
        return Ok(Command::Upload { index, src });
    }
    if let Some(rest) = line.strip_prefix("mkfile ") {
        return Ok(Command::Mkfile(rest.to_string()));
    }
    if line.starts_with("help") {
        return Ok(Command::Help);
    }
    Err(DriveshError::UnknownCommand(line.to_string()))
}

fn parse_index(token: &str) -> Result<usize> {
    token
        .trim()
        .parse()
        .map_err(|_| DriveshError::Parse(format!("not an index: {token}")))
}

/// Split `<index> <path>` at the first space; the path is the rest of the
/// line verbatim, spaces included.
fn parse_index_and_path(rest: &str) -> Result<(usize, PathBuf)> {
    let (index_token, path) = rest
        .split_once(' ')
        .ok_or_else(|| DriveshError::Parse(format!("expected <index> <path>, got: {rest}")))?;
    Ok((parse_index(index_token)?, PathBuf::from(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cd_parses_index() {
        assert_eq!(parse("cd 3").unwrap(), Command::Chdir(3));
        assert_eq!(parse("cd 0").unwrap(), Command::Chdir(0));
        assert_eq!(parse("cd 12 ").unwrap(), Command::Chdir(12));
    }

    #[test]
    fn test_cd_rejects_non_integers() {
        assert!(matches!(parse("cd docs").unwrap_err(), DriveshError::Parse(_)));
        assert!(matches!(parse("cd -1").unwrap_err(), DriveshError::Parse(_)));
        assert!(matches!(parse("cd ").unwrap_err(), DriveshError::Parse(_)));
    }

    #[test]
    fn test_dl_keeps_rest_of_line_as_path() {
        assert_eq!(
            parse("dl 2 ./out.bin").unwrap(),
            Command::Download {
                index: 2,
                dest: PathBuf::from("./out.bin"),
            }
        );
        assert_eq!(
            parse("dl 1 my downloads/some file.txt").unwrap(),
            Command::Download {
                index: 1,
                dest: PathBuf::from("my downloads/some file.txt"),
            }
        );
    }

    #[test]
    fn test_up_mirrors_dl_shape() {
        assert_eq!(
            parse("up 2 ./local.bin").unwrap(),
            Command::Upload {
                index: 2,
                src: PathBuf::from("./local.bin"),
            }
        );
        assert!(matches!(parse("up x y").unwrap_err(), DriveshError::Parse(_)));
    }

    #[test]
    fn test_transfer_without_path_is_a_parse_error() {
        assert!(matches!(parse("dl 2").unwrap_err(), DriveshError::Parse(_)));
        assert!(matches!(parse("up 2").unwrap_err(), DriveshError::Parse(_)));
    }

    #[test]
    fn test_mkfile_takes_name_verbatim() {
        assert_eq!(
            parse("mkfile notes.txt").unwrap(),
            Command::Mkfile("notes.txt".to_string())
        );
        assert_eq!(
            parse("mkfile name with spaces").unwrap(),
            Command::Mkfile("name with spaces".to_string())
        );
    }

    #[test]
    fn test_help_matches_by_prefix() {
        assert_eq!(parse("help").unwrap(), Command::Help);
        assert_eq!(parse("help me").unwrap(), Command::Help);
    }

    #[test]
    fn test_unknown_input_is_named_in_the_error() {
        match parse("foo bar").unwrap_err() {
            DriveshError::UnknownCommand(raw) => assert_eq!(raw, "foo bar"),
            other => panic!("expected UnknownCommand, got {other:?}"),
        }
        assert!(matches!(parse("").unwrap_err(), DriveshError::UnknownCommand(_)));
        // no trailing space means no match for prefix commands
        assert!(matches!(parse("cd").unwrap_err(), DriveshError::UnknownCommand(_)));
    }
}
