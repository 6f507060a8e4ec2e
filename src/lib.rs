//! Client-side listing engine for the HostelBite meal-subscription service:
//! filter vocabulary, page accumulation, and the sources that serve pages.
//! The binary wraps this in a terminal browser; the engine itself has no
//! rendering dependencies.

pub mod config;
pub mod engine;
pub mod source;
