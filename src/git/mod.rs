//! Git-specific pieces: locating the invocation, classifying push
//! arguments, and reading the checked-out branch.

pub mod locate;
pub mod oracle;
pub mod push;
pub mod refspec;

pub use locate::{Invocation, OptionSpec, locate};
pub use oracle::{BranchOracle, BranchState, GitOracle};
pub use push::{Classification, PushClassifier};
pub use refspec::{RefspecMatcher, RefspecRule};
