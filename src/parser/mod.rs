//! Lightweight text scanners for Kotlin/Java sources and Android XML

mod function;
mod lexer;
pub mod xml;

pub use function::{block_end, locate_span, split_lines, strip_eol, BodyKind, FunctionDeclaration, FunctionScanner};
pub use lexer::CodeScanner;
