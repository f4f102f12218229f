mod corpus;

pub use corpus::{read_text_or_empty, Corpus, CorpusFile, CorpusLoader, FileKind, InclusionRules};
