//! Word-level operators used by assignments

pub mod binary;
pub mod unary;

pub use binary::apply_binary;
pub use unary::apply_unary;
