//! Auth configuration dump.
//!
//! - [`engine`] - read sequence and revision consistency check
//! - [`keyrange`] - `[key, range_end)` to exact / prefix / range
//! - [`command`] - setup commands and their text form
//! - [`quote`] - shell quoting of names and keys

pub mod command;
pub mod engine;
pub mod keyrange;
pub mod quote;

pub use command::Command;
pub use engine::{dump, AuthDump, Dumper};
pub use keyrange::{classify, is_prefix_bound, KeyExpr};
pub use quote::{PosixQuoter, ShellQuote};
