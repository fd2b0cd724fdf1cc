pub mod document_schema;
pub mod qa_canvas;
pub mod ticket_analysis;
