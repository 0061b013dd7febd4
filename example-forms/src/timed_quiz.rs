use flow_form_types::{ChoiceOption, FormConfig, FormDefinition, Question, QuestionType};

/// A short quiz. The timer runs from the first question until the submit
/// step is reached; the intro is not timed.
pub fn timed_quiz() -> FormDefinition {
    FormDefinition::new(vec![
        Question::new(QuestionType::SectionBreak, "Three questions, no pressure")
            .with_id("intro")
            .with_content("The clock starts on the next screen."),
        Question::new(QuestionType::MultipleChoice, "Which planet is closest to the sun?")
            .with_id("planet")
            .required()
            .with_choices(["Venus", "Mercury", "Mars"]),
        Question::new(QuestionType::Number, "How many legs does a spider have?")
            .with_id("legs")
            .required()
            .with_min(0)
            .with_max(100),
        Question::new(QuestionType::MultiplePictureChoice, "Which of these are mammals?")
            .with_id("mammals")
            .required()
            .with_multiple(true)
            .with_options([
                ChoiceOption {
                    image_src: Some("whale.png".into()),
                    image_alt: Some("Whale".into()),
                    ..ChoiceOption::default()
                },
                ChoiceOption {
                    image_src: Some("shark.png".into()),
                    image_alt: Some("Shark".into()),
                    ..ChoiceOption::default()
                },
                ChoiceOption {
                    image_src: Some("bat.png".into()),
                    image_alt: Some("Bat".into()),
                    ..ChoiceOption::default()
                },
            ]),
    ])
    .with_config(
        FormConfig::default()
            .with_timer_start_step("planet")
            .with_timer_stop_step("_submit"),
    )
}
