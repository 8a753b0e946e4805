//! Memory model for the Random Access Machine
//!
//! This module provides the core memory abstractions:
//! - [`Memory`]: sparse map from [`Address`] to [`Word`] with initialization tracking
//! - [`link`]: direct and one-level indirect references into memory
//!
//! # Address Space
//!
//! Addresses are signed 64-bit integers. The 26 addresses `-1..=-26` are the
//! registers `A..=Z`:
//!
//! ```text
//! A = -1, B = -2, ..., Z = -26
//! ```
//!
//! Every other address is a general memory cell. A register is an ordinary
//! cell, so `A` and `[-1]` name the same storage.
//!
//! # Initialization Tracking
//!
//! A cell that has never been written is absent from the map. Reading it is a
//! [`RuntimeError::UninitializedCell`] fault rather than a default-zero read.

pub mod link;

use crate::interpreter::constants::{REGISTER_COUNT, REGISTER_FIRST, REGISTER_LAST};
use crate::interpreter::errors::RuntimeError;
use rustc_hash::FxHashMap;
use std::fmt::Write as _;

/// Memory address type (signed; registers live at -1..=-26)
pub type Address = i64;

/// Value stored in a memory cell
pub type Word = i64;

/// Register address for an uppercase letter, or `None` if `c` is not `A..=Z`
pub fn register_address(c: char) -> Option<Address> {
    if c.is_ascii_uppercase() {
        Some(-((c as u8 - b'A') as Address) - 1)
    } else {
        None
    }
}

/// Register letter for an address in `-1..=-26`
pub fn register_name(address: Address) -> Option<char> {
    if (REGISTER_LAST..=REGISTER_FIRST).contains(&address) {
        Some((b'A' + (-address - 1) as u8) as char)
    } else {
        None
    }
}

/// Render an address the way listings and error messages show it:
/// registers as letters, everything else in decimal.
pub fn format_address(address: Address) -> String {
    match register_name(address) {
        Some(c) => c.to_string(),
        None => address.to_string(),
    }
}

/// Sparse integer memory of the machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    cells: FxHashMap<Address, Word>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            cells: FxHashMap::default(),
        }
    }

    /// Read a cell, failing if it was never written
    pub fn read(&self, address: Address) -> Result<Word, RuntimeError> {
        self.cells
            .get(&address)
            .copied()
            .ok_or(RuntimeError::UninitializedCell { address })
    }

    /// Write a cell, creating it if absent
    pub fn write(&mut self, address: Address, value: Word) {
        self.cells.insert(address, value);
    }

    /// Make room for `additional` more cells up front
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), RuntimeError> {
        self.cells
            .try_reserve(additional)
            .map_err(|_| RuntimeError::AllocationFailed {
                cells: additional as u128,
            })
    }

    pub fn get(&self, address: Address) -> Option<Word> {
        self.cells.get(&address).copied()
    }

    pub fn contains(&self, address: Address) -> bool {
        self.cells.contains_key(&address)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Lowest written address
    pub fn min_address(&self) -> Result<Address, RuntimeError> {
        self.cells
            .keys()
            .copied()
            .min()
            .ok_or(RuntimeError::EmptyMemory)
    }

    /// Highest written address
    pub fn max_address(&self) -> Result<Address, RuntimeError> {
        self.cells
            .keys()
            .copied()
            .max()
            .ok_or(RuntimeError::EmptyMemory)
    }

    /// All written cells in ascending address order (registers come first,
    /// from `Z` up to `A`, then `0, 1, ...`).
    pub fn iter(&self) -> impl Iterator<Item = (Address, Word)> {
        let mut entries: Vec<(Address, Word)> =
            self.cells.iter().map(|(&a, &v)| (a, v)).collect();
        entries.sort_unstable_by_key(|&(a, _)| a);
        entries.into_iter()
    }

    /// Written registers in letter order `A..=Z`
    pub fn registers(&self) -> Vec<(char, Word)> {
        (0..REGISTER_COUNT)
            .filter_map(|i| {
                let address = REGISTER_FIRST - i;
                let name = register_name(address)?;
                self.get(address).map(|v| (name, v))
            })
            .collect()
    }

    /// Format the written cells of `addresses` as `addr: value` pairs joined by `", "`.
    ///
    /// Addresses without a stored value are skipped.
    pub fn format_block<I>(&self, addresses: I) -> String
    where
        I: IntoIterator<Item = Address>,
    {
        let mut out = String::new();
        for address in addresses {
            if let Some(value) = self.get(address) {
                if !out.is_empty() {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}: {}", format_address(address), value);
            }
        }
        out
    }
}

impl FromIterator<(Address, Word)> for Memory {
    fn from_iter<T: IntoIterator<Item = (Address, Word)>>(iter: T) -> Self {
        Memory {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<(Address, Word)> for Memory {
    fn extend<T: IntoIterator<Item = (Address, Word)>>(&mut self, iter: T) {
        self.cells.extend(iter);
    }
}
