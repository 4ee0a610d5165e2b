pub mod shell;
pub mod tokenize;
pub mod types;

pub use shell::{parse, strip_heredocs};
pub use tokenize::{program_name, tokenize};
pub use types::{Operator, ParsedPipeline, ShellSegment};
