// Copyright 2026 the JVMS Opcodes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Expansion of sections into one record per opcode.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::record::{InstructionRecord, Section, UNDEFINED_OP_CODE};

const IMPDEP_DESCRIPTION: &str = "These instructions are intended to provide \"back doors\" or traps to implementation-specific functionality implemented in software and hardware, respectively";

/// A `name = decimal (0xhex)` form split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedForm {
    /// Text before the first `" = "`.
    pub name: String,
    /// Decimal opcode, if the form carries a numeric one.
    pub op_code: Option<i32>,
}

/// Parses the leading integer of `s` the way `parseInt` does.
///
/// Leading whitespace and a sign are accepted, a `0x` prefix switches to hex,
/// and anything after the digits is ignored. Returns `None` when no digits
/// are found or the value does not fit an `i32`.
#[must_use]
pub fn parse_int_prefix(s: &str) -> Option<i32> {
    let s = s.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, s) = match s.get(..2) {
        Some("0x" | "0X") => (16, &s[2..]),
        _ => (10, s),
    };
    let end = s
        .find(|c: char| !c.is_digit(radix))
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = i64::from_str_radix(&s[..end], radix).ok()?;
    i32::try_from(if negative { -value } else { value }).ok()
}

/// Splits a form string on `" = "` and `" ("`.
#[must_use]
pub fn parse_form(form: &str) -> ParsedForm {
    let mut parts = form.split(" = ");
    let name = parts.next().unwrap_or_default().to_string();
    let op_code = parts
        .next()
        .and_then(|rest| rest.split(" (").next())
        .and_then(parse_int_prefix);
    ParsedForm { name, op_code }
}

/// Expands `section` into one record per form.
///
/// Forms without a numeric opcode (the mnemonic example at the top of the
/// page) are dropped.
#[must_use]
pub fn expand_section(section: &Section) -> Vec<InstructionRecord> {
    section
        .forms
        .iter()
        .filter_map(|form| {
            let ParsedForm { name, op_code } = parse_form(form);
            let Some(op_code) = op_code else {
                debug!(index = section.index, form = %form, "dropping form without a numeric opcode");
                return None;
            };
            Some(InstructionRecord {
                name,
                op_code,
                operation: section.operation.clone(),
                formats: section.formats.clone(),
                forms: section.forms.clone(),
                operand_stack: section.operand_stack.clone(),
                description: section.description.clone(),
                hash_link: section.hash_link.clone(),
            })
        })
        .collect()
}

/// Opcodes that exist in the numeric space but have no section on the page.
#[must_use]
pub fn reserved_records() -> Vec<InstructionRecord> {
    vec![
        InstructionRecord::fixed(
            "breakpoint",
            202,
            "reserved for debuggers",
            "No change",
            "Intended to be used by debuggers to implement breakpoints",
        ),
        InstructionRecord::fixed("impdep1", 254, "reserved opcode", "", IMPDEP_DESCRIPTION),
        InstructionRecord::fixed("impdep2", 255, "reserved opcode", "", IMPDEP_DESCRIPTION),
    ]
}

/// The trailing "undefined" record.
#[must_use]
pub fn undefined_record() -> InstructionRecord {
    InstructionRecord {
        name: "undefined".to_string(),
        op_code: UNDEFINED_OP_CODE,
        operation: String::new(),
        formats: vec![Vec::new()],
        forms: Vec::new(),
        operand_stack: vec![String::new()],
        description: String::new(),
        hash_link: None,
    }
}

/// Opcodes claimed by more than one record, with the claiming names in record order.
#[must_use]
pub fn duplicate_op_codes(records: &[InstructionRecord]) -> Vec<(i32, Vec<String>)> {
    let mut by_op_code: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    for rec in records {
        by_op_code
            .entry(rec.op_code)
            .or_default()
            .push(rec.name.clone());
    }
    by_op_code
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .collect()
}

/// Builds the final record sequence.
///
/// Records are sorted ascending by opcode with a stable sort, so records that
/// share an opcode keep their document order. Duplicates are reported but kept.
/// The "undefined" sentinel is always last.
#[must_use]
pub fn normalize(sections: &[Section]) -> Vec<InstructionRecord> {
    let mut records: Vec<InstructionRecord> = sections
        .iter()
        .flat_map(expand_section)
        .chain(reserved_records())
        .collect();
    records.sort_by_key(|rec| rec.op_code);

    for (op_code, names) in duplicate_op_codes(&records) {
        warn!(op_code, names = ?names, "opcode claimed by more than one instruction");
    }
    for rec in records.iter().filter(|rec| !(0..=255).contains(&rec.op_code)) {
        warn!(op_code = rec.op_code, name = %rec.name, "opcode outside of the byte range");
    }

    info!(
        sections = sections.len(),
        records = records.len(),
        "normalized instruction records"
    );
    records.push(undefined_record());
    records
}
