// Copyright 2026 the JVMS Opcodes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Heuristic classification of instruction records.
//!
//! Everything here is derived from substring and prefix tests over the
//! mnemonic, the operation summary, the stack diagram, and the description.
//! The tests are tuned to the wording of the JVMS chapter 6 page.

use crate::record::InstructionRecord;

/// Description phrase marking `tableswitch`/`lookupswitch`.
const VARIABLE_LENGTH: &str = "variable-length instruction";
/// Description phrase marking a constant pool index operand.
const CP_INDEX: &str = "index into the run-time constant pool of the current class";
/// Stack token standing for a variable number of call arguments.
const ARG_PLACEHOLDER: &str = "[arg";

/// Values popped and pushed by an instruction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StackEffect {
    /// Number of values popped.
    pub pop: usize,
    /// Number of values pushed.
    pub push: usize,
}

/// Number of operand bytes following the opcode.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperandCount {
    /// A fixed count taken from the byte layout.
    ///
    /// This is `-1` for a record whose first layout is empty.
    Fixed(i64),
    /// Length depends on alignment or on the modified instruction.
    Unpredictable,
    /// Reserved opcode with no defined encoding.
    Reserved,
}

/// Semantic tags, declared in rendering order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tag {
    /// `dup*` or `swap`.
    StackManipulate,
    /// Pops a number of values only known from the call site descriptor.
    PopUnpredictable,
    /// Pops a fixed number of values.
    Pop(usize),
    /// Pushes a fixed number of values.
    Push(usize),
    /// Loads a local variable.
    VarLoad,
    /// Stores a local variable.
    VarStore,
    /// Loads an array element.
    ArrayLoad,
    /// Stores an array element.
    ArrayStore,
    /// Returns from the current method.
    Return,
    /// Conditional branch.
    Condition,
    /// Unconditional branch or subroutine jump.
    Jump,
    /// Carries a constant pool index operand.
    CpIndex,
}

/// Operand patchers applied when code is relocated or the constant pool is rewritten.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Patcher {
    /// Relative branch offset at `offset`, `width` bytes wide.
    OffsetModifier {
        /// Byte offset of the operand from the opcode.
        offset: u8,
        /// Operand width in bytes.
        width: u8,
    },
    /// Constant pool index at `offset`, `width` bytes wide.
    CpIndex {
        /// Byte offset of the operand from the opcode.
        offset: u8,
        /// Operand width in bytes.
        width: u8,
    },
    /// Jump table of `tableswitch`.
    TableswitchOffsetModifier,
    /// Match/offset pairs of `lookupswitch`.
    LookupswitchOffsetModifier,
}

/// Everything the table renderer needs to know about one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Values popped and pushed.
    pub stack: StackEffect,
    /// Operand byte count or sentinel.
    pub operand_count: OperandCount,
    /// Semantic tags in rendering order.
    pub tags: Vec<Tag>,
    /// Operand patchers, usually at most one.
    pub patchers: Vec<Patcher>,
    /// Whether the instruction only shuffles stack values.
    pub stack_manipulation: bool,
}

/// Counts the values on a stack diagram line, minus the leading `...`.
fn stack_depth(line: Option<&String>) -> usize {
    line.map_or("", String::as_str).split(", ").count() - 1
}

/// Index of the "before" line: diagrams of multi-form instructions start with a `Form N:` label.
fn stack_offset(rec: &InstructionRecord) -> usize {
    match rec.operand_stack.first() {
        Some(first) if first.starts_with("Form ") => 1,
        _ => 0,
    }
}

/// Computes the stack effect from the "before" and "after" diagram lines.
#[must_use]
pub fn stack_effect(rec: &InstructionRecord) -> StackEffect {
    let offset = stack_offset(rec);
    StackEffect {
        pop: stack_depth(rec.operand_stack.get(offset)),
        push: stack_depth(rec.operand_stack.get(offset + 1)),
    }
}

/// Computes the operand byte count.
#[must_use]
pub fn operand_count(rec: &InstructionRecord) -> OperandCount {
    if rec.description.contains(VARIABLE_LENGTH) || rec.name == "wide" {
        OperandCount::Unpredictable
    } else if rec.operation.starts_with("reserved") {
        OperandCount::Reserved
    } else {
        let tokens = rec.formats.first().map_or(0, Vec::len);
        OperandCount::Fixed(i64::try_from(tokens).unwrap_or(i64::MAX) - 1)
    }
}

/// Returns `true` if `needle` first occurs right after the type prefix character.
fn at_type_prefix(name: &str, needle: &str) -> bool {
    name.find(needle) == Some(1)
}

fn operand_width(name: &str) -> u8 {
    if name.ends_with("_w") { 4 } else { 2 }
}

/// Classifies one record.
#[must_use]
pub fn classify(rec: &InstructionRecord) -> Classification {
    let name = rec.name.as_str();
    let stack = stack_effect(rec);

    let is_condition = name.starts_with("if");
    let is_jump = rec.operation.starts_with("Branch ") || name == "jsr" || name == "jsr_w";
    let is_cp_index = rec.description.contains(CP_INDEX);
    let is_stack_manipulate = name.starts_with("dup") || name == "swap";
    let is_variable_pop = rec
        .operand_stack
        .get(stack_offset(rec))
        .is_some_and(|line| line.contains(ARG_PLACEHOLDER));

    let tags = [
        is_stack_manipulate.then_some(Tag::StackManipulate),
        is_variable_pop.then_some(Tag::PopUnpredictable),
        (stack.pop > 0 && !is_stack_manipulate && !is_variable_pop).then_some(Tag::Pop(stack.pop)),
        (stack.push > 0 && !is_stack_manipulate).then_some(Tag::Push(stack.push)),
        at_type_prefix(name, "load").then_some(Tag::VarLoad),
        at_type_prefix(name, "store").then_some(Tag::VarStore),
        at_type_prefix(name, "aload").then_some(Tag::ArrayLoad),
        at_type_prefix(name, "astore").then_some(Tag::ArrayStore),
        name.contains("return").then_some(Tag::Return),
        is_condition.then_some(Tag::Condition),
        is_jump.then_some(Tag::Jump),
        is_cp_index.then_some(Tag::CpIndex),
    ]
    .into_iter()
    .flatten()
    .collect();

    let width = operand_width(name);
    let patchers = [
        (is_condition || is_jump).then_some(Patcher::OffsetModifier { offset: 1, width }),
        is_cp_index.then_some(Patcher::CpIndex { offset: 1, width }),
        (name == "tableswitch").then_some(Patcher::TableswitchOffsetModifier),
        (name == "lookupswitch").then_some(Patcher::LookupswitchOffsetModifier),
    ]
    .into_iter()
    .flatten()
    .collect();

    Classification {
        stack,
        operand_count: operand_count(rec),
        tags,
        patchers,
        stack_manipulation: is_stack_manipulate,
    }
}
