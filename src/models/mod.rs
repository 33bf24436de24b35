mod answer;
mod question;

pub use answer::{normalize, NormalizedAnswer, OptionLetter};
pub use question::{QuestionRecord, ValidationError, MAX_OPTIONS, MIN_OPTIONS};
