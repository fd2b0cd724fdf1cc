mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod shared;

pub use app::run;
pub use application::use_cases::document_schema::{
    create_minimal_document, validate_qa_canvas_document, FieldDoc, Validation,
};
pub use application::use_cases::qa_canvas::QaCanvasUseCase;
pub use application::use_cases::ticket_analysis::{
    analyze_ticket_content, detect_configuration_conflicts, estimate_test_complexity,
    generate_test_case_categories,
};
pub use domain::error::{AppError, FieldError, Result};
