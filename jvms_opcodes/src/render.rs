// Copyright 2026 the JVMS Opcodes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering of classified records as opcode table lines.
//!
//! Each line is one enum constant of the consuming bytecode library:
//!
//! ```text
//! 	/* 18 0x12 */LDC             (18, 1, enums(Type.PUSH1, Type.CP_INDEX), Op.of(IoUtility.cpIndex(1, 2))), // Push item from run-time constant pool, stack: [ "...", "..., value" ], link: ...
//! ```

use core::fmt;

use crate::classify::{Classification, OperandCount, Patcher, Tag, classify};
use crate::record::InstructionRecord;

/// Chapter 6 of the Java SE 9 JVM specification.
pub const DEFAULT_BASE_URL: &str = "https://docs.oracle.com/javase/specs/jvms/se9/html/jvms-6.html";

/// Width of the mnemonic column.
const NAME_COLUMN: usize = 16;

/// Rendering options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Page URL that section anchors are appended to.
    pub base_url: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl fmt::Display for OperandCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Unpredictable => f.write_str("Const.UNPREDICTABLE"),
            Self::Reserved => f.write_str("Const.RESERVED"),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackManipulate => f.write_str("Type.STACK_MANIPULATE"),
            Self::PopUnpredictable => f.write_str("Type.POP_UNPREDICTABLE"),
            Self::Pop(n) => write!(f, "Type.POP{n}"),
            Self::Push(n) => write!(f, "Type.PUSH{n}"),
            Self::VarLoad => f.write_str("Type.VAR_LOAD"),
            Self::VarStore => f.write_str("Type.VAR_STORE"),
            Self::ArrayLoad => f.write_str("Type.ARRAY_LOAD"),
            Self::ArrayStore => f.write_str("Type.ARRAY_STORE"),
            Self::Return => f.write_str("Type.RETURN"),
            Self::Condition => f.write_str("Type.CONDITION"),
            Self::Jump => f.write_str("Type.JUMP"),
            Self::CpIndex => f.write_str("Type.CP_INDEX"),
        }
    }
}

impl fmt::Display for Patcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OffsetModifier { offset, width } => {
                write!(f, "IoUtility.offsetModifier({offset}, {width})")
            }
            Self::CpIndex { offset, width } => write!(f, "IoUtility.cpIndex({offset}, {width})"),
            Self::TableswitchOffsetModifier => f.write_str("IoUtility.TableswitchOffsetModifier"),
            Self::LookupswitchOffsetModifier => f.write_str("IoUtility.LookupswitchOffsetModifier"),
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Upper-case hex with a sign for negative values (`0x-1`).
fn fmt_hex(n: i32) -> String {
    if n < 0 {
        format!("0x-{:X}", n.unsigned_abs())
    } else {
        format!("0x{n:X}")
    }
}

/// Renders stack lines as single-line JSON: `[ "a", "b" ]`, or `[]` when empty.
#[must_use]
pub fn stack_json(lines: &[String]) -> String {
    if lines.is_empty() {
        return "[]".to_string();
    }
    let items: Vec<String> = lines
        .iter()
        .map(|s| serde_json::Value::String(s.clone()).to_string())
        .collect();
    format!("[ {} ]", items.join(", "))
}

/// Renders one table line.
///
/// The last line of the table ends with `;`, every other line with `,`.
#[must_use]
pub fn render_line(
    rec: &InstructionRecord,
    class: &Classification,
    is_last: bool,
    options: &RenderOptions,
) -> String {
    let tags = if class.tags.is_empty() {
        "none(Type.class)".to_string()
    } else {
        format!("enums({})", join(&class.tags))
    };
    let patchers = if class.patchers.is_empty() {
        "null".to_string()
    } else {
        format!("Op.of({})", join(&class.patchers))
    };

    let mut line = format!(
        "\t/* {:>2} {:>4} */{:<width$}({}, {}, {}, {}){} // {},",
        rec.op_code,
        fmt_hex(rec.op_code),
        rec.name.to_uppercase(),
        rec.op_code,
        class.operand_count,
        tags,
        patchers,
        if is_last { ";" } else { "," },
        rec.operation,
        width = NAME_COLUMN,
    );
    if !class.stack_manipulation {
        line.push_str(" stack: ");
        line.push_str(&stack_json(&rec.operand_stack));
        line.push(',');
    }
    if let Some(hash_link) = &rec.hash_link {
        line.push_str(&format!(" link: {}#{hash_link}", options.base_url));
    }
    line
}

/// Classifies and renders every record, one line each.
#[must_use]
pub fn render_table(records: &[InstructionRecord], options: &RenderOptions) -> String {
    let last = records.len().saturating_sub(1);
    records
        .iter()
        .enumerate()
        .map(|(i, rec)| render_line(rec, &classify(rec), i == last, options))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the records as a pretty-printed JSON array.
pub fn render_records_json(records: &[InstructionRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

#[cfg(test)]
mod tests {
    use super::{RenderOptions, fmt_hex, render_line, render_records_json, render_table, stack_json};
    use crate::classify::classify;
    use crate::normalize::{reserved_records, undefined_record};
    use crate::record::InstructionRecord;

    fn ldc() -> InstructionRecord {
        InstructionRecord {
            name: "ldc".to_string(),
            op_code: 18,
            operation: "Push item from run-time constant pool".to_string(),
            formats: vec![vec!["ldc".to_string(), "index".to_string()]],
            forms: vec!["ldc = 18 (0x12)".to_string()],
            operand_stack: vec!["...".to_string(), "..., value".to_string()],
            description: "The index is an unsigned byte that must be a valid index into the run-time constant pool of the current class".to_string(),
            hash_link: Some("jvms-6.5.ldc".to_string()),
        }
    }

    #[test]
    fn hex_matches_number_to_string() {
        assert_eq!(fmt_hex(0), "0x0");
        assert_eq!(fmt_hex(202), "0xCA");
        assert_eq!(fmt_hex(-1), "0x-1");
    }

    #[test]
    fn stack_dump() {
        assert_eq!(stack_json(&[]), "[]");
        assert_eq!(stack_json(&["".to_string()]), r#"[ "" ]"#);
        assert_eq!(
            stack_json(&["...".to_string(), "..., \"q\"".to_string()]),
            r#"[ "...", "..., \"q\"" ]"#
        );
    }

    #[test]
    fn constant_pool_line() {
        let rec = ldc();
        let line = render_line(&rec, &classify(&rec), false, &RenderOptions::default());
        assert_eq!(
            line,
            "\t/* 18 0x12 */LDC             (18, 1, enums(Type.PUSH1, Type.CP_INDEX), Op.of(IoUtility.cpIndex(1, 2))), // Push item from run-time constant pool, stack: [ \"...\", \"..., value\" ], link: https://docs.oracle.com/javase/specs/jvms/se9/html/jvms-6.html#jvms-6.5.ldc"
        );
    }

    #[test]
    fn stack_manipulation_omits_stack_dump() {
        let rec = InstructionRecord {
            name: "swap".to_string(),
            op_code: 95,
            operation: "Swap the top two operand stack values".to_string(),
            formats: vec![vec!["swap".to_string()]],
            forms: vec!["swap = 95 (0x5f)".to_string()],
            operand_stack: vec!["..., value2, value1".to_string(), "..., value1, value2".to_string()],
            description: String::new(),
            hash_link: None,
        };
        let line = render_line(&rec, &classify(&rec), true, &RenderOptions::default());
        assert_eq!(
            line,
            "\t/* 95 0x5F */SWAP            (95, 0, enums(Type.STACK_MANIPULATE), null); // Swap the top two operand stack values,"
        );
    }

    #[test]
    fn fixed_records_and_sentinel() {
        let mut records = reserved_records();
        records.push(undefined_record());
        let options = RenderOptions {
            base_url: "https://example.invalid/jvms-6.html".to_string(),
        };
        let table = render_table(&records, &options);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines,
            vec![
                "\t/* 202 0xCA */BREAKPOINT      (202, Const.RESERVED, none(Type.class), null), // reserved for debuggers, stack: [ \"No change\" ],",
                "\t/* 254 0xFE */IMPDEP1         (254, Const.RESERVED, none(Type.class), null), // reserved opcode, stack: [ \"\" ],",
                "\t/* 255 0xFF */IMPDEP2         (255, Const.RESERVED, none(Type.class), null), // reserved opcode, stack: [ \"\" ],",
                "\t/* -1 0x-1 */UNDEFINED       (-1, -1, none(Type.class), null); // , stack: [ \"\" ],",
            ]
        );
    }

    #[test]
    fn empty_table_is_empty() {
        assert_eq!(render_table(&[], &RenderOptions::default()), "");
    }

    #[test]
    fn records_json_round_trips() {
        let json = render_records_json(&[ldc()]).unwrap();
        let back: Vec<InstructionRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![ldc()]);
    }
}
