pub mod errors;
pub mod ids;
pub mod lang;
pub mod record;
pub mod upstream;

pub use errors::UpstreamError;
pub use ids::{RequestId, TranslationId};
pub use lang::LanguagePair;
pub use record::{NewTranslation, TranslationRecord};
pub use upstream::{Summarizer, Translator};
