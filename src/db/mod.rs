mod answer;
mod level;
mod setup;
pub mod token;
mod user;

pub use answer::{Answer, AnswerId, AnswerStatus, AnswerWithAuthor, ReviewDecision};
pub use level::{Level, LevelId};
pub use user::{Role, User, UserId};

/// Authorization for changing the status of an answer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReviewAuthorization {
    /// Admin who can review any answer.
    Admin,
    /// Regular user reviewing someone else's answer.
    Peer,
}
