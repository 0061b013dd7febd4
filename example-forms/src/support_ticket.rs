use flow_form_types::{
    ChoiceOption, FormDefinition, Jump, PHONE_US_MASK, Question, QuestionType,
};

/// Upper bound for all attachments together.
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

/// A support ticket that branches on the preferred contact channel and
/// skips the attachment step for critical issues.
///
/// Declared order: `name`, `channel`, `email`, `phone`, `issue`, `severity`,
/// `attachments`.
pub fn support_ticket() -> FormDefinition {
    FormDefinition::new(vec![
        Question::new(QuestionType::Text, "What's your name?")
            .with_id("name")
            .required()
            .with_max_length(80),
        Question::new(QuestionType::MultipleChoice, "How should we reach you?")
            .with_id("channel")
            .required()
            .with_next_step_on_answer(true)
            .with_options([
                ChoiceOption::with_value("Email", "email"),
                ChoiceOption::with_value("Phone", "phone"),
            ])
            .with_jump(Jump::map([("email", "email"), ("phone", "phone")])),
        Question::new(QuestionType::Email, "Your email address?")
            .with_id("email")
            .required()
            .with_jump(Jump::map([("_other", "issue")])),
        Question::new(QuestionType::Phone, "Your phone number?")
            .with_id("phone")
            .required()
            .with_mask(PHONE_US_MASK),
        Question::new(QuestionType::LongText, "Describe the problem")
            .with_id("issue")
            .required(),
        Question::new(QuestionType::OpinionScale, "How severe is it?")
            .with_id("severity")
            .required()
            .with_max(5)
            .with_next_step_on_answer(true)
            .with_jump(Jump::map([("5", "_submit")])),
        Question::new(QuestionType::File, "Screenshots, if any")
            .with_id("attachments")
            .with_multiple(true)
            .with_max(3)
            .with_accept(".png,.jpg,image/*")
            .with_max_size(MAX_ATTACHMENT_BYTES),
    ])
}
