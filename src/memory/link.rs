//! References into memory
//!
//! A [`MemoryLink`] names a cell either directly (`A`, `[12]`) or through one
//! level of indirection (`[A]`, `[[12]]`): the indirect form reads the address
//! stored in its inner cell and then accesses that address.
//!
//! An [`Operand`] is what may appear on the right-hand side of an
//! instruction: a literal or a link.

use super::{format_address, register_name, Address, Memory, Word};
use crate::interpreter::errors::RuntimeError;
use std::fmt;

/// Direct or one-level indirect reference to a memory cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryLink {
    /// The cell at this address
    Direct(Address),
    /// The cell whose address is stored at this address
    Indirect(Address),
}

impl MemoryLink {
    /// Resolve the link to the address it currently designates
    pub fn resolve(&self, memory: &Memory) -> Result<Address, RuntimeError> {
        match *self {
            MemoryLink::Direct(address) => Ok(address),
            MemoryLink::Indirect(pointer) => memory.read(pointer),
        }
    }

    pub fn get(&self, memory: &Memory) -> Result<Word, RuntimeError> {
        let address = self.resolve(memory)?;
        memory.read(address)
    }

    /// Store `value` at the designated address; returns the address written
    pub fn set(&self, memory: &mut Memory, value: Word) -> Result<Address, RuntimeError> {
        let address = self.resolve(memory)?;
        memory.write(address, value);
        Ok(address)
    }
}

fn fmt_direct(f: &mut fmt::Formatter<'_>, address: Address) -> fmt::Result {
    if register_name(address).is_some() {
        write!(f, "{}", format_address(address))
    } else {
        write!(f, "[{}]", address)
    }
}

impl fmt::Display for MemoryLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MemoryLink::Direct(address) => fmt_direct(f, address),
            MemoryLink::Indirect(pointer) => {
                write!(f, "[")?;
                fmt_direct(f, pointer)?;
                write!(f, "]")
            }
        }
    }
}

/// Right-hand side value: an integer literal or a memory reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Literal(Word),
    Link(MemoryLink),
}

impl Operand {
    pub fn value(&self, memory: &Memory) -> Result<Word, RuntimeError> {
        match self {
            Operand::Literal(n) => Ok(*n),
            Operand::Link(link) => link.get(memory),
        }
    }
}

impl From<MemoryLink> for Operand {
    fn from(link: MemoryLink) -> Self {
        Operand::Link(link)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(n) => write!(f, "{}", n),
            Operand::Link(link) => write!(f, "{}", link),
        }
    }
}
