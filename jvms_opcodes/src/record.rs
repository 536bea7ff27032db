// Copyright 2026 the JVMS Opcodes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instruction records extracted from the JVMS chapter 6 page.

use serde::{Deserialize, Serialize};

/// Op code carried by the trailing sentinel record.
pub const UNDEFINED_OP_CODE: i32 = -1;

/// Raw fields pulled from one `.section-execution` element.
///
/// A section documents one or more forms that share the same operation,
/// layouts, stack diagram, and description.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    /// Position of the section in document order.
    pub index: usize,
    /// One-line operation summary, whitespace collapsed.
    pub operation: String,
    /// Byte layouts, one line per encoded byte.
    pub formats: Vec<Vec<String>>,
    /// Raw `name = decimal (0xhex)` strings.
    pub forms: Vec<String>,
    /// Stack diagram lines that survived the notation filter.
    pub operand_stack: Vec<String>,
    /// Descriptive prose, whitespace collapsed.
    pub description: String,
    /// Anchor name of the section title, if any.
    pub hash_link: Option<String>,
}

/// One instruction, i.e. one concrete name/opcode pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionRecord {
    /// Mnemonic as printed in the document.
    pub name: String,
    /// Opcode byte, or [`UNDEFINED_OP_CODE`] for the sentinel.
    pub op_code: i32,
    /// One-line operation summary.
    pub operation: String,
    /// Byte layouts shared by every form of the section.
    pub formats: Vec<Vec<String>>,
    /// Every form string of the section this record came from.
    pub forms: Vec<String>,
    /// Stack diagram lines.
    pub operand_stack: Vec<String>,
    /// Descriptive prose.
    pub description: String,
    /// Anchor used to build the documentation link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_link: Option<String>,
}

impl InstructionRecord {
    /// Builds a record that has no section on the page.
    pub(crate) fn fixed(
        name: &str,
        op_code: i32,
        operation: &str,
        operand_stack: &str,
        description: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            op_code,
            operation: operation.to_string(),
            formats: vec![vec![name.to_string()]],
            forms: vec![name.to_string()],
            operand_stack: vec![operand_stack.to_string()],
            description: description.to_string(),
            hash_link: None,
        }
    }

    /// Returns `true` for the trailing "undefined" sentinel.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        self.op_code == UNDEFINED_OP_CODE
    }
}

#[cfg(test)]
mod tests {
    use super::{InstructionRecord, UNDEFINED_OP_CODE};

    #[test]
    fn json_uses_camel_case_field_names() {
        let mut rec = InstructionRecord::fixed("nop", 0, "Do nothing", "No change", "");
        rec.hash_link = Some("jvms-6.5.nop".to_string());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["opCode"], 0);
        assert_eq!(json["operandStack"][0], "No change");
        assert_eq!(json["hashLink"], "jvms-6.5.nop");
    }

    #[test]
    fn missing_hash_link_is_omitted() {
        let rec = InstructionRecord::fixed("impdep1", 254, "reserved opcode", "", "");
        let json = serde_json::to_string(&rec).unwrap();
        assert!(!json.contains("hashLink"));
        assert!(!rec.is_undefined());
        let back: InstructionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
        assert_eq!(UNDEFINED_OP_CODE, -1);
    }
}
