mod ids;
mod question;
mod response;
mod session;
mod summary;

pub use ids::{OptionId, ParseIdError, QuestionId, ResponseId, SessionId};
pub use question::{ParseQuestionTypeError, Question, QuestionError, QuestionOption, QuestionType};
pub use response::Response;
pub use session::Session;
pub use summary::{QuizSummary, SummaryItem, SummaryStats};
