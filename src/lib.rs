//! deadsweep - find and remove unused code and resources in Android projects
//!
//! "Used" means textual: a symbol is used when some other file of the
//! project matches its usage pattern. No parsing or type resolution happens.
//!
//! # Architecture
//!
//! A sweep consists of:
//! 1. **Corpus loading** - Snapshot the project's `.kt`, `.java` and `.xml` files
//! 2. **Extraction** - Derive candidates (classes, functions, layouts, strings)
//! 3. **Usage check** - Search every other file for each candidate
//! 4. **Mutation** - Delete files, excise spans or rebuild string tables,
//!    unless running dry
//! 5. **Reporting** - Write a timestamped report per tool

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod parser;
pub mod progress;
pub mod refactor;
pub mod report;
pub mod resources;
pub mod tools;

pub use analysis::{Candidate, CandidateKind, Decision, Span, Sweeper, UsageOracle, UsageVerdict};
pub use config::Config;
pub use discovery::{Corpus, CorpusLoader, InclusionRules};
pub use error::{Result, SweepError};
pub use refactor::MutationEngine;
pub use report::{Report, ReportFormat, Reporter};
pub use tools::{run_tool, run_tools, SweepOptions, Tool, ToolOutcome};
