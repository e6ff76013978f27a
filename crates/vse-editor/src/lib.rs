pub mod commands;
pub mod ops;

pub use commands::{Command, CommandStack};
pub use ops::{ApplyReport, EditOp, OpsError, apply_ops, parse_ops};
