//! Instruction evaluation
//!
//! Every [`Instruction`] evaluates against an [`EvalContext`] and yields an
//! [`Outcome`]: the value to show in a step trace (if any) and what the
//! engine should do with the instruction pointer next.
//!
//! # Step Accounting
//!
//! - Assignments, `goto` and `if` conditions count one step each
//! - The body of an `if` counts its own steps when it runs
//! - `halt`, `$init` and `$print` do not count

use crate::interpreter::engine::ExecutionState;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::generators::init_len;
use crate::interpreter::ops::{apply_binary, apply_unary};
use crate::memory::{Address, Memory, Word};
use crate::parser::ast::{Condition, Instruction, SliceRange, ValueSpec};
use rand::RngCore;
use rustc_hash::FxHashMap;
use std::fmt;
use std::io::Write;

/// Everything an instruction may read or modify while it runs
pub struct EvalContext<'a> {
    pub labels: &'a FxHashMap<String, usize>,
    pub state: &'a mut ExecutionState,
    pub rng: &'a mut dyn RngCore,
    pub out: &'a mut dyn Write,
}

/// What the engine does after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Continue with the next instruction
    Advance,
    /// Continue at this instruction index
    Jump(usize),
    Halt,
}

/// Value reported in the step trace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceValue {
    Int(Word),
    Bool(bool),
}

impl fmt::Display for TraceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceValue::Int(n) => write!(f, "{}", n),
            TraceValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub value: Option<TraceValue>,
    pub control: Control,
}

impl Outcome {
    fn advance(value: Option<TraceValue>) -> Self {
        Outcome {
            value,
            control: Control::Advance,
        }
    }
}

impl Instruction {
    /// Evaluate this instruction
    pub fn eval(&self, ctx: &mut EvalContext<'_>) -> Result<Outcome, RuntimeError> {
        match self {
            Instruction::Assign {
                target,
                op,
                operand,
            } => {
                ctx.state.counter += 1;
                let memory = &mut ctx.state.memory;
                let value = apply_unary(*op, operand.value(memory)?)?;
                ctx.state.last_written = Some(target.set(memory, value)?);
                Ok(Outcome::advance(Some(TraceValue::Int(value))))
            }

            Instruction::Binary {
                target,
                op,
                left,
                right,
            } => {
                ctx.state.counter += 1;
                let memory = &mut ctx.state.memory;
                let a = left.value(memory)?;
                let b = right.value(memory)?;
                let value = apply_binary(*op, a, b)?;
                ctx.state.last_written = Some(target.set(memory, value)?);
                Ok(Outcome::advance(Some(TraceValue::Int(value))))
            }

            Instruction::Halt => Ok(Outcome {
                value: None,
                control: Control::Halt,
            }),

            Instruction::Goto(label) => {
                ctx.state.counter += 1;
                let target = ctx
                    .labels
                    .get(label)
                    .copied()
                    .ok_or_else(|| RuntimeError::UnknownLabel {
                        label: label.clone(),
                    })?;
                Ok(Outcome {
                    value: None,
                    control: Control::Jump(target),
                })
            }

            Instruction::If { condition, body } => {
                let taken = condition.eval(ctx)?;
                let control = if taken {
                    body.eval(ctx)?.control
                } else {
                    Control::Advance
                };
                Ok(Outcome {
                    value: Some(TraceValue::Bool(taken)),
                    control,
                })
            }

            Instruction::Init { start, specs } => {
                execute_init(*start, specs, ctx)?;
                Ok(Outcome::advance(None))
            }

            Instruction::Print(ranges) => {
                for range in ranges {
                    writeln!(ctx.out, "{}", print_block(&ctx.state.memory, range))?;
                }
                Ok(Outcome::advance(None))
            }
        }
    }

    /// Text of the step trace line for this instruction
    pub fn trace_line(&self, label: Option<&str>, value: Option<TraceValue>) -> String {
        let mut line = String::new();
        if let Some(label) = label {
            line.push_str(label);
            line.push_str(": ");
        }
        line.push_str(&self.to_string());
        if let Some(value) = value {
            line.push_str(&format!(" ({})", value));
        }
        line
    }
}

impl Condition {
    /// Compare both operands; counts one step
    pub fn eval(&self, ctx: &mut EvalContext<'_>) -> Result<bool, RuntimeError> {
        ctx.state.counter += 1;
        let memory = &ctx.state.memory;
        let left = self.left.value(memory)?;
        let right = self.right.value(memory)?;
        Ok(self.op.apply(left, right))
    }
}

/// Write the values of `specs` to consecutive cells from `start`
///
/// Every check runs before the first write, so a failing `$init` leaves
/// memory untouched.
fn execute_init(
    start: Address,
    specs: &[ValueSpec],
    ctx: &mut EvalContext<'_>,
) -> Result<(), RuntimeError> {
    let total = init_len(specs)?;
    if total == 0 {
        return Ok(());
    }

    let last = (start as i128).checked_add_unsigned(total - 1);
    if last.map_or(true, |last| last > Address::MAX as i128) {
        return Err(RuntimeError::IntegerOverflow {
            operation: format!("$init address {} + {}", start, total - 1),
        });
    }

    let cells =
        usize::try_from(total).map_err(|_| RuntimeError::AllocationFailed { cells: total })?;
    let state = &mut *ctx.state;
    let rng = &mut *ctx.rng;
    state.memory.try_reserve(cells)?;

    // Every address up to `last` fits, so the narrowing below is exact
    let mut next = start as i128;
    for spec in specs {
        spec.emit(rng, |value| {
            let address = next as Address;
            state.memory.write(address, value);
            state.last_written = Some(address);
            next += 1;
        })?;
    }
    Ok(())
}

/// Memory block for one `$print` range
///
/// Ranges wider than the number of stored cells are answered from the stored
/// cells instead of walking every address.
fn print_block(memory: &Memory, range: &SliceRange) -> String {
    if range.len() <= memory.len() as u64 {
        return memory.format_block(range.values());
    }

    let mut addresses: Vec<Address> = memory
        .iter()
        .map(|(address, _)| address)
        .filter(|&address| range.contains(address))
        .collect();
    if range.step < 0 {
        addresses.reverse();
    }
    memory.format_block(addresses)
}
