use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::engine::Inventory;
use crate::{Command, ItemId, OfferId, UserId};

/// Errors that can occur when parsing csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized command type '{op}'")]
    UnrecognizedType { line: usize, op: String },

    #[error("line {line}: {op} missing {field}")]
    MissingField {
        line: usize,
        op: &'static str,
        field: &'static str,
    },

    #[error("line {line}: invalid id list '{value}'")]
    BadIdList { line: usize, value: String },

    #[error("line {line}: {op} expects {expected} item ids, found {found}")]
    InvalidArity {
        line: usize,
        op: &'static str,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    r#type: String,
    user: UserId,
    peer: Option<UserId>,
    /// Item ids separated by ';' (a template name for grant).
    items: Option<String>,
    requested: Option<String>,
    coins: Option<u64>,
    offer: Option<OfferId>,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    user: UserId,
    balance: u64,
    items: usize,
    composites: usize,
}

fn require<T>(
    line: usize,
    op: &'static str,
    field: &'static str,
    value: Option<T>,
) -> Result<T, CsvError> {
    value.ok_or(CsvError::MissingField { line, op, field })
}

fn parse_ids(line: usize, value: &str) -> Result<Vec<ItemId>, CsvError> {
    value
        .split(';')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim().parse().map_err(|_| CsvError::BadIdList {
                line,
                value: value.to_string(),
            })
        })
        .collect()
}

fn fixed_ids<const N: usize>(
    line: usize,
    op: &'static str,
    ids: Vec<ItemId>,
) -> Result<[ItemId; N], CsvError> {
    let found = ids.len();
    ids.try_into().map_err(|_| CsvError::InvalidArity {
        line,
        op,
        expected: N,
        found,
    })
}

/// Read commands from a csv file
pub fn read_commands(path: impl AsRef<Path>) -> impl Iterator<Item = Result<Command, CsvError>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .expect("failed to open csv file");

    reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            match row.r#type.as_str() {
                "draw" => Ok(Command::Draw { user: row.user }),
                "grant" => {
                    let template = require(line, "grant", "items", row.items)?;
                    Ok(Command::Grant {
                        user: row.user,
                        template,
                    })
                }
                "sell" => {
                    let items = require(line, "sell", "items", row.items)?;
                    let [item] = fixed_ids(line, "sell", parse_ids(line, &items)?)?;
                    Ok(Command::Sell {
                        user: row.user,
                        item,
                    })
                }
                "build" => {
                    let items = require(line, "build", "items", row.items)?;
                    let [gpu, cpu, mb] = fixed_ids(line, "build", parse_ids(line, &items)?)?;
                    Ok(Command::Build {
                        user: row.user,
                        gpu,
                        cpu,
                        mb,
                    })
                }
                "eject" => {
                    let items = require(line, "eject", "items", row.items)?;
                    let [composite, part] = fixed_ids(line, "eject", parse_ids(line, &items)?)?;
                    Ok(Command::Eject {
                        user: row.user,
                        composite,
                        part,
                    })
                }
                "propose" => {
                    let to = require(line, "propose", "peer", row.peer)?;
                    let offered = match &row.items {
                        Some(value) => parse_ids(line, value)?,
                        None => Vec::new(),
                    };
                    let requested = match &row.requested {
                        Some(value) => parse_ids(line, value)?,
                        None => Vec::new(),
                    };
                    Ok(Command::Propose {
                        from: row.user,
                        to,
                        offered,
                        requested,
                        coins: row.coins.unwrap_or(0),
                    })
                }
                "accept" => {
                    let offer = require(line, "accept", "offer", row.offer)?;
                    Ok(Command::Accept {
                        offer,
                        user: row.user,
                    })
                }
                "reject" => {
                    let offer = require(line, "reject", "offer", row.offer)?;
                    Ok(Command::Reject {
                        offer,
                        user: row.user,
                    })
                }
                other => Err(CsvError::UnrecognizedType {
                    line,
                    op: other.to_string(),
                }),
            }
        })
}

/// Write per-user inventory summaries to stdout in csv format
pub fn write_report<'a>(inventories: impl IntoIterator<Item = (UserId, &'a Inventory)>) {
    let stdout = io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());

    for (user, inv) in inventories {
        let composites = inv.composite_count();
        let row = OutputRow {
            user,
            balance: inv.balance(),
            items: inv.item_count() - composites,
            composites,
        };
        writer.serialize(&row).expect("failed to write csv row");
    }

    writer.flush().expect("failed to flush csv writer");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "type,user,peer,items,requested,coins,offer\n";

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn read_one(row: &str) -> Result<Command, CsvError> {
        let file = write_csv(&format!("{HEADER}{row}\n"));
        let mut results: Vec<_> = read_commands(file.path()).collect();
        assert_eq!(results.len(), 1);
        results.remove(0)
    }

    #[test]
    fn read_draw() {
        let cmd = read_one("draw,1,,,,,").unwrap();
        assert_eq!(cmd, Command::Draw { user: 1 });
    }

    #[test]
    fn read_grant() {
        let cmd = read_one("grant,1,,iPhone 15,,,").unwrap();
        assert_eq!(
            cmd,
            Command::Grant {
                user: 1,
                template: "iPhone 15".to_string(),
            }
        );
    }

    #[test]
    fn read_build_with_id_list() {
        let cmd = read_one("build,1,,1;2;3,,,").unwrap();
        assert_eq!(
            cmd,
            Command::Build {
                user: 1,
                gpu: 1,
                cpu: 2,
                mb: 3,
            }
        );
    }

    #[test]
    fn read_propose() {
        let cmd = read_one("propose,1,2,5,7;8,100,").unwrap();
        assert_eq!(
            cmd,
            Command::Propose {
                from: 1,
                to: 2,
                offered: vec![5],
                requested: vec![7, 8],
                coins: 100,
            }
        );
    }

    #[test]
    fn read_propose_with_empty_sides() {
        let cmd = read_one("propose,1,2,,,,").unwrap();
        assert_eq!(
            cmd,
            Command::Propose {
                from: 1,
                to: 2,
                offered: vec![],
                requested: vec![],
                coins: 0,
            }
        );
    }

    #[test]
    fn read_accept() {
        let cmd = read_one("accept,2,,,,,4").unwrap();
        assert_eq!(cmd, Command::Accept { offer: 4, user: 2 });
    }

    #[test]
    fn read_with_whitespace() {
        let cmd = read_one("sell, 1, , 3, , ,").unwrap();
        assert_eq!(cmd, Command::Sell { user: 1, item: 3 });
    }

    #[test]
    fn read_returns_error_for_unknown_type() {
        let err = read_one("teleport,1,,,,,").unwrap_err();
        assert!(matches!(err, CsvError::UnrecognizedType { line: 2, .. }));
    }

    #[test]
    fn read_returns_error_for_missing_field() {
        let err = read_one("sell,1,,,,,").unwrap_err();
        assert!(matches!(
            err,
            CsvError::MissingField {
                line: 2,
                op: "sell",
                field: "items",
            }
        ));
    }

    #[test]
    fn read_returns_error_for_bad_id_list() {
        let err = read_one("build,1,,1;x;3,,,").unwrap_err();
        assert!(matches!(err, CsvError::BadIdList { line: 2, .. }));
    }

    #[test]
    fn read_returns_error_for_wrong_arity() {
        let err = read_one("build,1,,1;2,,,").unwrap_err();
        assert!(matches!(
            err,
            CsvError::InvalidArity {
                line: 2,
                op: "build",
                expected: 3,
                found: 2,
            }
        ));
    }

    #[test]
    fn errors_carry_following_line_numbers() {
        let file = write_csv(&format!("{HEADER}draw,1,,,,,\nwarp,1,,,,,\n"));
        let results: Vec<_> = read_commands(file.path()).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1].as_ref().unwrap_err(),
            CsvError::UnrecognizedType { line: 3, .. }
        ));
    }
}
