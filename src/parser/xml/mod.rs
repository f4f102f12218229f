mod strings;

pub use strings::{text_content, EntryType, PluralItem, StringEntry, StringResources};
