pub mod mock;
pub mod summary;
pub mod translate;

pub use mock::{MockSummarizer, MockTranslator};
pub use summary::ChatSummarizer;
pub use translate::MyMemoryTranslator;
