//! Sentence-embedding encoder.

pub mod bert;

pub use bert::MiniLmEncoder;
