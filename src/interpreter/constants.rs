// Constants for the RAM interpreter

use crate::memory::Address;

/// Address of register `A`
pub const REGISTER_FIRST: Address = -1;

/// Address of register `Z`
pub const REGISTER_LAST: Address = -26;

/// Number of letter registers
pub const REGISTER_COUNT: Address = 26;

/// Default end-of-line comment marker used by the command-line driver
pub const DEFAULT_COMMENT_MARKER: &str = "#";

/// Default snapshot history limit for the stepping UI (256 MB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 256 * 1024 * 1024;

/// Message written to the output when the program halts
pub const HALT_MESSAGE: &str = "Halt";
