//! Natural-language photo search
//!
//! Free text goes to the intent-resolution service, recognized slot values
//! become keywords, keywords become a disjunctive label query, and every hit
//! is returned as a time-limited download link with its labels.

pub mod intent;
pub mod keywords;
pub mod query;
pub mod resolver;
pub mod response;

pub use intent::{IntentResolution, IntentResolver, LexIntentResolver, RecognizedSlot};
pub use keywords::extract_keywords;
pub use query::{build_query, search_photos};
pub use resolver::{QueryResolver, ResolverStage};
pub use response::{SearchBody, SearchResponse};
