//! Service layer - pure building blocks of the orchestration engine.
//!
//! - Prompt rendering from role templates
//! - Error-stream event decoding
//! - Control-signal classification of agent output
//! - Role template loading

pub mod event_decoder;
pub mod prompt_builder;
pub mod signal_classifier;
pub mod templates;

pub use event_decoder::{classify_line, decode_line, LineAssembler, StreamLine};
pub use prompt_builder::{build_prompt, PromptInputs};
pub use signal_classifier::{classify, extract_tasks_block};
