#![forbid(unsafe_code)]

pub mod catalog_service;
pub mod error;
pub mod response_service;
pub mod sanitize;
pub mod select;
pub mod summary_service;
pub mod view;

pub use quiz_core::validate::validate_answer;
pub use quiz_core::Clock;

pub use catalog_service::CatalogService;
pub use error::{CatalogError, ResponseError, SummaryError};
pub use response_service::{ResponseService, SaveOutcome};
pub use sanitize::sanitize_answer;
pub use select::{select_quiz_set, QUIZ_SET_SIZE};
pub use summary_service::SummaryService;
pub use view::{OptionItem, QuestionGridItem, QuizQuestion};
