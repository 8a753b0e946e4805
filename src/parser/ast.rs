// Instruction definitions for the RAM interpreter

use crate::memory::link::{MemoryLink, Operand};
use crate::memory::{Address, Word};
use rustc_hash::FxHashMap;
use std::fmt;

/// Column span of a token within its source line (0-based, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Unary assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Copy, // x
    Neg,  // - x
}

/// Binary arithmetic and bitwise operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div, // floor division
    Mod, // floor remainder
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinOp {
    pub const ALL: [BinOp; 10] = [
        BinOp::Add,
        BinOp::Sub,
        BinOp::Mul,
        BinOp::Div,
        BinOp::Mod,
        BinOp::BitAnd,
        BinOp::BitOr,
        BinOp::BitXor,
        BinOp::Shl,
        BinOp::Shr,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
        }
    }
}

/// Relational operators used in `if` conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Eq, // =
    Ne, // <>
    Le, // <=
    Lt, // <
    Ge, // >=
    Gt, // >
}

impl RelOp {
    pub const ALL: [RelOp; 6] = [RelOp::Eq, RelOp::Ne, RelOp::Le, RelOp::Lt, RelOp::Ge, RelOp::Gt];

    pub fn symbol(self) -> &'static str {
        match self {
            RelOp::Eq => "=",
            RelOp::Ne => "<>",
            RelOp::Le => "<=",
            RelOp::Lt => "<",
            RelOp::Ge => ">=",
            RelOp::Gt => ">",
        }
    }

    pub fn apply(self, left: Word, right: Word) -> bool {
        match self {
            RelOp::Eq => left == right,
            RelOp::Ne => left != right,
            RelOp::Le => left <= right,
            RelOp::Lt => left < right,
            RelOp::Ge => left >= right,
            RelOp::Gt => left > right,
        }
    }
}

/// `left relop right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub op: RelOp,
    pub left: Operand,
    pub right: Operand,
}

/// Half-open arithmetic range `start:stop[:step]` (step is never zero)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceRange {
    pub start: Word,
    pub stop: Word,
    pub step: Word,
}

/// Where the values of one `$init` item come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// `n`
    Literal(Word),
    /// `a:b[:s]`, every value of the range in order
    Range(SliceRange),
    /// `@a:b[:s]`, a fresh random value from the range for every slot
    Random(SliceRange),
    /// `@@a:b[:s]`, one random value from the range, repeated
    FixedRandom(SliceRange),
}

/// One `$init` item: a value source with its repeat count (`*n`, default 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSpec {
    pub source: ValueSource,
    pub repeat: usize,
}

/// A single compiled instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `target := operand` / `target := - operand`
    Assign {
        target: MemoryLink,
        op: UnaryOp,
        operand: Operand,
    },
    /// `target := left op right`
    Binary {
        target: MemoryLink,
        op: BinOp,
        left: Operand,
        right: Operand,
    },
    Halt,
    Goto(String),
    /// `if condition then body`; the body is never an `if` or a directive
    If {
        condition: Condition,
        body: Box<Instruction>,
    },
    /// `$init [start] spec, spec, ...`
    Init { start: Address, specs: Vec<ValueSpec> },
    /// `$print range, range, ...`
    Print(Vec<SliceRange>),
}

impl Instruction {
    /// Label this instruction may jump to, if it is a (conditional) `goto`
    pub fn jump_target(&self) -> Option<&str> {
        match self {
            Instruction::Goto(label) => Some(label),
            Instruction::If { body, .. } => body.jump_target(),
            _ => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op.symbol(), self.right)
    }
}

impl fmt::Display for SliceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.step == 1 {
            write!(f, "{}:{}", self.start, self.stop)
        } else {
            write!(f, "{}:{}:{}", self.start, self.stop, self.step)
        }
    }
}

impl fmt::Display for ValueSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            ValueSource::Literal(n) => write!(f, "{}", n)?,
            ValueSource::Range(r) => write!(f, "{}", r)?,
            ValueSource::Random(r) => write!(f, "@{}", r)?,
            ValueSource::FixedRandom(r) => write!(f, "@@{}", r)?,
        }
        if self.repeat != 1 {
            write!(f, "*{}", self.repeat)?;
        }
        Ok(())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Assign {
                target,
                op: UnaryOp::Copy,
                operand,
            } => write!(f, "{} := {}", target, operand),
            Instruction::Assign {
                target,
                op: UnaryOp::Neg,
                operand,
            } => write!(f, "{} := - {}", target, operand),
            Instruction::Binary {
                target,
                op,
                left,
                right,
            } => write!(f, "{} := {} {} {}", target, left, op.symbol(), right),
            Instruction::Halt => write!(f, "halt"),
            Instruction::Goto(label) => write!(f, "goto {}", label),
            Instruction::If { condition, body } => write!(f, "if {} then {}", condition, body),
            Instruction::Init { start, specs } => {
                write!(f, "$init [{}] ", start)?;
                for (i, spec) in specs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", spec)?;
                }
                Ok(())
            }
            Instruction::Print(ranges) => {
                write!(f, "$print ")?;
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    // single-address specs are stored as n:n+1
                    if range.step == 1 && range.stop.checked_sub(range.start) == Some(1) {
                        write!(f, "{}", range.start)?;
                    } else {
                        write!(f, "{}", range)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Result of parsing one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub label: Option<String>,
    pub instruction: Instruction,
}

/// A compiled program: instructions in execution order plus the label tables
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub statements: Vec<Instruction>,
    /// label -> instruction index
    pub labels: FxHashMap<String, usize>,
    /// instruction index -> label
    pub label_at: FxHashMap<usize, String>,
    /// 1-based source line of every instruction
    pub source_lines: Vec<usize>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.statements.get(index)
    }

    /// Instruction index a label is bound to
    pub fn target(&self, label: &str) -> Option<usize> {
        self.labels.get(label).copied()
    }

    /// Label bound to an instruction index
    pub fn label_for(&self, index: usize) -> Option<&str> {
        self.label_at.get(&index).map(String::as_str)
    }

    pub fn source_line(&self, index: usize) -> Option<usize> {
        self.source_lines.get(index).copied()
    }

    /// `goto` targets with no matching label, in program order
    pub fn undefined_targets(&self) -> Vec<(usize, &str)> {
        self.statements
            .iter()
            .enumerate()
            .filter_map(|(i, st)| st.jump_target().map(|label| (i, label)))
            .filter(|(_, label)| !self.labels.contains_key(*label))
            .collect()
    }

    /// The program in canonical form, one instruction per line
    pub fn listing(&self) -> String {
        self.statements
            .iter()
            .enumerate()
            .map(|(i, st)| match self.label_for(i) {
                Some(label) => format!("{}: {}", label, st),
                None => st.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_forms() {
        let copy = Instruction::Assign {
            target: MemoryLink::Direct(-1),
            op: UnaryOp::Copy,
            operand: Operand::Literal(-5),
        };
        assert_eq!(copy.to_string(), "A := -5");

        let neg = Instruction::Assign {
            target: MemoryLink::Indirect(-2),
            op: UnaryOp::Neg,
            operand: Operand::Literal(5),
        };
        assert_eq!(neg.to_string(), "[B] := - 5");

        let bin = Instruction::Binary {
            target: MemoryLink::Direct(3),
            op: BinOp::Shl,
            left: Operand::Link(MemoryLink::Indirect(4)),
            right: Operand::Literal(2),
        };
        assert_eq!(bin.to_string(), "[3] := [[4]] << 2");

        let cond = Instruction::If {
            condition: Condition {
                op: RelOp::Ne,
                left: Operand::Link(MemoryLink::Direct(-1)),
                right: Operand::Literal(5),
            },
            body: Box::new(Instruction::Goto("LOOP".to_string())),
        };
        assert_eq!(cond.to_string(), "if A <> 5 then goto LOOP");
        assert_eq!(cond.jump_target(), Some("LOOP"));
    }

    #[test]
    fn test_directive_forms() {
        let init = Instruction::Init {
            start: 0,
            specs: vec![
                ValueSpec {
                    source: ValueSource::Literal(9),
                    repeat: 3,
                },
                ValueSpec {
                    source: ValueSource::Range(SliceRange {
                        start: 10,
                        stop: 0,
                        step: -2,
                    }),
                    repeat: 1,
                },
                ValueSpec {
                    source: ValueSource::FixedRandom(SliceRange {
                        start: 1,
                        stop: 7,
                        step: 1,
                    }),
                    repeat: 2,
                },
            ],
        };
        assert_eq!(init.to_string(), "$init [0] 9*3, 10:0:-2, @@1:7*2");

        let print = Instruction::Print(vec![
            SliceRange {
                start: 0,
                stop: 3,
                step: 1,
            },
            SliceRange {
                start: 7,
                stop: 8,
                step: 1,
            },
        ]);
        assert_eq!(print.to_string(), "$print 0:3, 7");
    }

    #[test]
    fn test_relop_apply() {
        assert!(RelOp::Eq.apply(2, 2));
        assert!(RelOp::Ne.apply(2, 3));
        assert!(RelOp::Le.apply(2, 2));
        assert!(RelOp::Lt.apply(1, 2));
        assert!(RelOp::Ge.apply(2, 2));
        assert!(RelOp::Gt.apply(3, 2));
        assert!(!RelOp::Gt.apply(2, 2));
    }

    #[test]
    fn test_listing_and_undefined_targets() {
        let mut program = Program::new();
        program.statements.push(Instruction::Goto("END".to_string()));
        program.statements.push(Instruction::Goto("NOWHERE".to_string()));
        program.statements.push(Instruction::Halt);
        program.labels.insert("END".to_string(), 2);
        program.label_at.insert(2, "END".to_string());

        assert_eq!(program.listing(), "goto END\ngoto NOWHERE\nEND: halt");
        assert_eq!(program.undefined_targets(), vec![(1, "NOWHERE")]);
        assert_eq!(program.target("END"), Some(2));
        assert_eq!(program.label_for(2), Some("END"));
    }
}
