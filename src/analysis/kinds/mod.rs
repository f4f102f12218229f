// Candidate kinds, one per artifact the sweeper can remove

mod class;
mod function;
mod layout;
mod string;

pub use class::ClassKind;
pub use function::FunctionKind;
pub use layout::{binding_class_name, LayoutKind};
pub use string::StringKind;
