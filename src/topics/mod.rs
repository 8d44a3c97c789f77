//! Topic derivation: title terms, clustering and ranking.
//!
//! - [`terms`]: turns a title into phrase and unigram terms
//! - [`aggregate`]: groups items by term and ranks the groups

pub mod aggregate;
pub mod terms;

pub use aggregate::TopicAggregator;
pub use terms::{StopWords, TermExtractor};
