pub mod customer_survey;
pub mod support_ticket;
pub mod timed_quiz;

pub use customer_survey::{CUSTOMER_SURVEY_JSON, customer_survey};
pub use support_ticket::{MAX_ATTACHMENT_BYTES, support_ticket};
pub use timed_quiz::timed_quiz;
