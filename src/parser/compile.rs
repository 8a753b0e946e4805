//! Compilation of source lines into a [`Program`]
//!
//! Each raw line is trimmed, preprocessed and parsed on its own. Blank lines
//! (before or after preprocessing) take no instruction slot. A label prefix
//! binds the label to the index of the instruction on the same line.
//!
//! Compilation stops at the first error; no partial program is returned.

use crate::interpreter::errors::CompileError;
use crate::parser::ast::Program;
use crate::parser::parse::Parser;
use crate::parser::preprocessor::{Preprocessor, Substitutions};
use log::{debug, warn};

/// Compile `lines` into a program
pub fn compile<I, S>(
    lines: I,
    substitutions: &Substitutions,
    preprocessor: &dyn Preprocessor,
) -> Result<Program, CompileError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut program = Program::new();

    for (index, raw) in lines.into_iter().enumerate() {
        let line_number = index + 1;
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            continue;
        }

        let text = preprocessor.process_line(raw, substitutions)?;
        if text.trim().is_empty() {
            continue;
        }

        let parsed = Parser::new(&text)
            .and_then(|mut parser| parser.parse_line())
            .map_err(|source| CompileError::Syntax {
                line: line_number,
                text: text.clone(),
                source,
            })?;

        let slot = program.statements.len();
        if let Some(label) = parsed.label {
            if let Some(&first) = program.labels.get(&label) {
                return Err(CompileError::DuplicateLabel {
                    label,
                    line: line_number,
                    first,
                });
            }
            program.labels.insert(label.clone(), slot);
            program.label_at.insert(slot, label);
        }
        program.statements.push(parsed.instruction);
        program.source_lines.push(line_number);
    }

    for (index, label) in program.undefined_targets() {
        warn!(
            "instruction {} jumps to undefined label {}",
            index, label
        );
    }
    debug!(
        "compiled {} instructions, {} labels",
        program.len(),
        program.labels.len()
    );

    Ok(program)
}

/// Compile a whole source text, splitting it into lines
pub fn compile_source(
    source: &str,
    substitutions: &Substitutions,
    preprocessor: &dyn Preprocessor,
) -> Result<Program, CompileError> {
    compile(source.lines(), substitutions, preprocessor)
}
