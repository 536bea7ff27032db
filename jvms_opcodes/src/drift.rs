// Copyright 2026 the JVMS Opcodes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Comparison of a freshly rendered table against the one checked into a source file.

use core::fmt;
use std::collections::BTreeMap;

use crate::normalize::parse_int_prefix;

/// One difference between the rendered and the existing table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Drift {
    /// Rendered, but absent from the existing table.
    Missing {
        /// Opcode of the line.
        op_code: i32,
        /// The rendered line.
        rendered: String,
    },
    /// Present in the existing table, but no longer rendered.
    Unexpected {
        /// Opcode of the line.
        op_code: i32,
        /// The existing line.
        existing: String,
    },
    /// Present in both, with different text.
    Changed {
        /// Opcode of the line.
        op_code: i32,
        /// The rendered line.
        rendered: String,
        /// The existing line.
        existing: String,
    },
}

impl Drift {
    /// Opcode the difference is about.
    #[must_use]
    pub fn op_code(&self) -> i32 {
        match self {
            Self::Missing { op_code, .. }
            | Self::Unexpected { op_code, .. }
            | Self::Changed { op_code, .. } => *op_code,
        }
    }
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { op_code, rendered } => {
                write!(f, "opcode {op_code} missing from existing table:\n  + {rendered}")
            }
            Self::Unexpected { op_code, existing } => {
                write!(f, "opcode {op_code} no longer generated:\n  - {existing}")
            }
            Self::Changed {
                op_code,
                rendered,
                existing,
            } => write!(f, "opcode {op_code} changed:\n  - {existing}\n  + {rendered}"),
        }
    }
}

/// Picks the table lines (`/* <decimal> <hex> */...`) out of a source file, trimmed.
///
/// Other block comments, such as Javadoc, are skipped because they carry no
/// leading opcode.
#[must_use]
pub fn table_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.contains("*/") && line_op_code(line).is_some())
        .collect()
}

/// Decimal opcode in the leading comment of a table line.
fn line_op_code(line: &str) -> Option<i32> {
    parse_int_prefix(line.strip_prefix("/*")?)
}

/// Table lines keyed by opcode and by their position among lines sharing it.
fn keyed(text: &str) -> BTreeMap<(i32, usize), &str> {
    let mut seen: BTreeMap<i32, usize> = BTreeMap::new();
    let mut map = BTreeMap::new();
    for line in table_lines(text) {
        if let Some(op_code) = line_op_code(line) {
            let occurrence = seen.entry(op_code).or_default();
            map.insert((op_code, *occurrence), line);
            *occurrence += 1;
        }
    }
    map
}

/// Compares two tables keyed by opcode, in ascending opcode order.
///
/// Lines sharing an opcode are compared in the order they appear. Lines are
/// compared after trimming, so indentation and line endings do not count as
/// drift.
#[must_use]
pub fn diff_tables(rendered: &str, existing: &str) -> Vec<Drift> {
    let rendered = keyed(rendered);
    let mut existing = keyed(existing);

    let mut drift = Vec::new();
    for (key, line) in rendered {
        let (op_code, _) = key;
        match existing.remove(&key) {
            None => drift.push(Drift::Missing {
                op_code,
                rendered: line.to_string(),
            }),
            Some(old) if old != line => drift.push(Drift::Changed {
                op_code,
                rendered: line.to_string(),
                existing: old.to_string(),
            }),
            Some(_) => {}
        }
    }
    drift.extend(
        existing
            .into_iter()
            .map(|((op_code, _), line)| Drift::Unexpected {
                op_code,
                existing: line.to_string(),
            }),
    );
    drift.sort_by_key(Drift::op_code);
    drift
}
