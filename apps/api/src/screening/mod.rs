// Resume screening core.
// normalizer → vectorizer → scorer → ranker, assembled by pipeline::screen.
// Pure and synchronous: handlers are the only async code that touches it.

pub mod duplicates;
pub mod handlers;
pub mod normalizer;
pub mod pipeline;
pub mod ranker;
pub mod scorer;
pub mod vectorizer;
