pub mod entry;
pub mod ignored;

pub use entry::{DictionaryEntry, DictionaryError, WordType};
pub use ignored::IgnoredWords;
