// Property tests: canonical text re-parses to the same instruction, and
// word arithmetic agrees with a wide-integer reference.

use proptest::prelude::*;
use rami::interpreter::ops::apply_binary;
use rami::memory::link::{MemoryLink, Operand};
use rami::parser::ast::{
    BinOp, Condition, Instruction, RelOp, SliceRange, UnaryOp, ValueSource, ValueSpec,
};
use rami::parser::Parser;

fn address() -> impl Strategy<Value = i64> {
    prop_oneof![-26i64..=-1, -1000i64..1000, any::<i64>()]
}

fn link() -> impl Strategy<Value = MemoryLink> {
    prop_oneof![
        address().prop_map(MemoryLink::Direct),
        address().prop_map(MemoryLink::Indirect),
    ]
}

fn operand() -> impl Strategy<Value = Operand> {
    prop_oneof![
        any::<i64>().prop_map(Operand::Literal),
        link().prop_map(Operand::Link),
    ]
}

fn label() -> impl Strategy<Value = String> {
    "[A-Z_]{1,8}"
}

fn range() -> impl Strategy<Value = SliceRange> {
    (-500i64..500, -500i64..500, prop_oneof![-5i64..=-1, 1i64..=5])
        .prop_map(|(start, stop, step)| SliceRange { start, stop, step })
}

fn value_spec() -> impl Strategy<Value = ValueSpec> {
    let source = prop_oneof![
        any::<i64>().prop_map(ValueSource::Literal),
        range().prop_map(ValueSource::Range),
        range().prop_map(ValueSource::Random),
        range().prop_map(ValueSource::FixedRandom),
    ];
    (source, 0usize..20).prop_map(|(source, repeat)| ValueSpec { source, repeat })
}

fn simple_instruction() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        (link(), operand()).prop_map(|(target, operand)| Instruction::Assign {
            target,
            op: UnaryOp::Copy,
            operand,
        }),
        (link(), operand()).prop_map(|(target, operand)| Instruction::Assign {
            target,
            op: UnaryOp::Neg,
            operand,
        }),
        (link(), prop::sample::select(BinOp::ALL.to_vec()), operand(), operand()).prop_map(
            |(target, op, left, right)| Instruction::Binary {
                target,
                op,
                left,
                right,
            }
        ),
        Just(Instruction::Halt),
        label().prop_map(Instruction::Goto),
    ]
}

fn instruction() -> impl Strategy<Value = Instruction> {
    let condition = (prop::sample::select(RelOp::ALL.to_vec()), operand(), operand())
        .prop_map(|(op, left, right)| Condition { op, left, right });
    prop_oneof![
        4 => simple_instruction(),
        1 => (condition, simple_instruction()).prop_map(|(condition, body)| Instruction::If {
            condition,
            body: Box::new(body),
        }),
        1 => (address(), prop::collection::vec(value_spec(), 1..4))
            .prop_map(|(start, specs)| Instruction::Init { start, specs }),
        1 => prop::collection::vec(range(), 1..4).prop_map(Instruction::Print),
    ]
}

proptest! {
    /// Rendering an instruction and parsing it back yields the same instruction.
    #[test]
    fn prop_canonical_form_round_trips(instruction in instruction()) {
        let text = instruction.to_string();
        let parsed = Parser::new(&text)
            .and_then(|mut parser| parser.parse_line())
            .map_err(|e| TestCaseError::fail(format!("`{}`: {}", text, e)))?;
        prop_assert_eq!(parsed.label, None);
        prop_assert_eq!(parsed.instruction, instruction);
    }

    /// A label prefix survives the round trip too.
    #[test]
    fn prop_labeled_line_round_trips(name in label(), instruction in simple_instruction()) {
        let text = format!("{}: {}", name, instruction);
        let parsed = Parser::new(&text)
            .and_then(|mut parser| parser.parse_line())
            .map_err(|e| TestCaseError::fail(format!("`{}`: {}", text, e)))?;
        prop_assert_eq!(parsed.label, Some(name));
        prop_assert_eq!(parsed.instruction, instruction);
    }

    /// Floor division and remainder satisfy `a = b*q + r` with `r` taking the sign of `b`.
    #[test]
    fn prop_floor_division_identity(a in any::<i64>(), b in any::<i64>().prop_filter("non-zero", |b| *b != 0)) {
        let q = apply_binary(BinOp::Div, a, b);
        let r = apply_binary(BinOp::Mod, a, b).expect("remainder never overflows");
        match q {
            Ok(q) => {
                prop_assert_eq!(a as i128, b as i128 * q as i128 + r as i128);
                prop_assert!(r == 0 || (r < 0) == (b < 0));
                prop_assert!((r as i128).abs() < (b as i128).abs());
            }
            Err(_) => prop_assert!(a == i64::MIN && b == -1),
        }
    }

    /// Checked addition and multiplication agree with 128-bit arithmetic.
    #[test]
    fn prop_checked_arithmetic(a in any::<i64>(), b in any::<i64>()) {
        for (op, wide) in [
            (BinOp::Add, a as i128 + b as i128),
            (BinOp::Mul, a as i128 * b as i128),
        ] {
            match apply_binary(op, a, b) {
                Ok(v) => prop_assert_eq!(v as i128, wide),
                Err(_) => prop_assert!(wide > i64::MAX as i128 || wide < i64::MIN as i128),
            }
        }
    }
}
