//! Sectioned key/value configuration files.
//!
//! ```text
//! [topic]
//! auto.offset.reset=earliest  # trailing comment
//!
//! # full-line comment
//! [global]
//! bootstrap.servers=localhost:9092
//! group.id=readers
//! ```
//!
//! Headers must be exactly `[global]` or `[topic]`; every other non-blank,
//! non-comment line must be `key=value` with a single `=`. A `#` preceded by a
//! backslash is kept as a literal `#` in the value. Any deviation, and any key
//! the native library rejects, aborts the whole parse.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::config::{GlobalConfig, TopicConfig};
use crate::error::ConfigFileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Global,
    Topic,
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Byte offset of the first `#` not preceded by a backslash.
fn comment_start(line: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, b) in line.bytes().enumerate() {
        match b {
            b'\\' if !escaped => escaped = true,
            b'#' if !escaped => return Some(i),
            _ => escaped = false,
        }
    }
    None
}

/// Parse configuration lines from `reader`; `name` identifies the source in
/// error messages.
pub fn parse_config<R: BufRead>(
    name: &str,
    reader: R,
) -> Result<(GlobalConfig, TopicConfig), ConfigFileError> {
    let mut global = GlobalConfig::new();
    let mut topic = TopicConfig::new();
    let mut section = Section::None;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let raw = line.map_err(|source| ConfigFileError::Read {
            file: name.to_string(),
            line: line_no,
            source,
        })?;

        let stripped = raw.trim_matches(is_blank);
        let content = match comment_start(stripped) {
            Some(pos) => stripped[..pos].trim_end_matches(is_blank),
            None => stripped,
        };
        if content.is_empty() {
            continue;
        }

        if content.starts_with('[') {
            if content.len() < 2 || !content.ends_with(']') {
                return Err(ConfigFileError::InvalidHeader {
                    file: name.to_string(),
                    line: line_no,
                    raw,
                });
            }
            section = match &content[1..content.len() - 1] {
                "global" => Section::Global,
                "topic" => Section::Topic,
                header => {
                    return Err(ConfigFileError::UnknownSection {
                        file: name.to_string(),
                        line: line_no,
                        header: header.to_string(),
                    })
                }
            };
            continue;
        }

        if section == Section::None {
            return Err(ConfigFileError::MissingSection {
                file: name.to_string(),
                line: line_no,
            });
        }

        let Some((key, value)) = content
            .split_once('=')
            .filter(|(_, value)| !value.contains('='))
        else {
            return Err(ConfigFileError::MalformedEntry {
                file: name.to_string(),
                line: line_no,
                raw,
            });
        };
        let key = key.trim_matches(is_blank);
        let value = value.trim_matches(is_blank).replace("\\#", "#");

        debug!(file = name, line = line_no, "--CONFIG [{}={}]", key, value);
        let put = if section == Section::Global {
            global.try_put(key, &value)
        } else {
            topic.try_put(key, &value)
        };
        put.map_err(|source| ConfigFileError::Rejected {
            file: name.to_string(),
            line: line_no,
            source,
        })?;
    }

    Ok((global, topic))
}

/// Parse configuration held in memory.
pub fn parse_config_str(
    name: &str,
    text: &str,
) -> Result<(GlobalConfig, TopicConfig), ConfigFileError> {
    parse_config(name, text.as_bytes())
}

/// Read and parse the configuration file at `path`.
pub fn read_config(path: impl AsRef<Path>) -> Result<(GlobalConfig, TopicConfig), ConfigFileError> {
    let path = path.as_ref();
    let name = path.display().to_string();
    let file = File::open(path).map_err(|source| ConfigFileError::Open {
        path: name.clone(),
        source,
    })?;
    parse_config(&name, BufReader::new(file))
}

/// [`read_config`], treating any error as fatal: the diagnostic goes to
/// stderr and the process exits with status 1.
pub fn read_config_or_exit(path: impl AsRef<Path>) -> (GlobalConfig, TopicConfig) {
    match read_config(path) {
        Ok(configs) => configs,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_start_skips_escaped_hash() {
        assert_eq!(comment_start("a=b # c"), Some(4));
        assert_eq!(comment_start("a=b\\#c"), None);
        assert_eq!(comment_start("a=b\\#c # d"), Some(7));
        assert_eq!(comment_start("a=b\\\\#c"), Some(5));
        assert_eq!(comment_start("#"), Some(0));
    }
}
