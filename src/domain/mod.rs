pub mod analysis;
pub mod error;
pub mod llm_config;
pub mod qa_document;
pub mod qa_profile;
pub mod qa_suggestion;
pub mod ticket;
