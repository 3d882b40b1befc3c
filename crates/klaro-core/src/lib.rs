pub mod catalog;
pub mod error;
pub mod manager;
pub mod notifier;
pub mod preferences;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::Catalog;
pub use error::{FetchError, PreferenceError, TranslationError};
pub use manager::{TranslationJob, TranslationManager};
pub use notifier::Notifier;
pub use preferences::{JsonPreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences};
