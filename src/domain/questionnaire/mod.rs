//! Fixed questionnaire domain module.
//!
//! A statically ordered list of multiple-choice questions answered one at a
//! time before the adaptive interview starts.

mod answers;
mod question;
mod runner;

pub use answers::AnswerSet;
pub use question::{default_questions, Question, QuestionCategory};
pub use runner::{AnswerOutcome, QuestionView, QuestionnaireError, QuestionnaireRunner};
