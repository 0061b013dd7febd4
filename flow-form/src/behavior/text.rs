use std::sync::LazyLock;

use flow_form_types::{AnswerValue, Language, Question};
use regex::Regex;

use super::{QuestionBehavior, answer_text, require};

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@]+@.+[^.]$").expect("email pattern is valid"));

/// Default rules: required questions need a value. Used by Dropdown and
/// LongText.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseBehavior;

impl QuestionBehavior for BaseBehavior {}

/// Single-line text with optional mask and maximum length. Used by Text,
/// Password and Phone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBehavior;

impl QuestionBehavior for TextBehavior {
    fn validate(&self, question: &Question, language: &Language) -> Result<(), String> {
        if let Some(text) = answer_text(question.answer())
            && !text.trim().is_empty()
        {
            if let Some(max) = question.max_length()
                && text.chars().count() > max
            {
                return Err(language.invalid_prompt.clone());
            }
            if let Some(mask) = question.mask()
                && !mask.fits(&text)
            {
                return Err(language.invalid_prompt.clone());
            }
        }

        require(self.has_value(question), question, language)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EmailBehavior;

impl QuestionBehavior for EmailBehavior {
    fn validate(&self, question: &Question, language: &Language) -> Result<(), String> {
        if self.has_value(question) {
            let text = answer_text(question.answer()).unwrap_or_default();
            return if EMAIL.is_match(&text) {
                Ok(())
            } else {
                Err(language.invalid_prompt.clone())
            };
        }

        require(false, question, language)
    }
}

/// Numeric input within `min`/`max`. A mask replaces the numeric check.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberBehavior;

impl QuestionBehavior for NumberBehavior {
    fn validate(&self, question: &Question, language: &Language) -> Result<(), String> {
        if !self.has_value(question) {
            return require(false, question, language);
        }

        let invalid = || Err(language.invalid_prompt.clone());

        if let Some(mask) = question.mask() {
            let text = answer_text(question.answer()).unwrap_or_default();
            return if mask.fits(&text) { Ok(()) } else { invalid() };
        }

        let Some(number) = question.answer().as_number() else {
            return invalid();
        };
        if let Some(min) = question.min().and_then(|b| b.as_number())
            && number < min
        {
            return invalid();
        }
        if let Some(max) = question.max().and_then(|b| b.as_number())
            && number > max
        {
            return invalid();
        }

        Ok(())
    }
}

/// URLs are completed with `https://` when no scheme is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlBehavior;

impl UrlBehavior {
    fn with_scheme(text: &str) -> String {
        if !text.is_empty() && !text.contains("://") {
            format!("https://{text}")
        } else {
            text.to_string()
        }
    }
}

impl QuestionBehavior for UrlBehavior {
    fn fix_answer(&self, question: &Question) -> AnswerValue {
        match question.answer() {
            AnswerValue::Text(text) => AnswerValue::Text(Self::with_scheme(text)),
            other => other.clone(),
        }
    }

    fn validate(&self, question: &Question, language: &Language) -> Result<(), String> {
        if self.has_value(question) {
            let text = answer_text(question.answer()).unwrap_or_default();
            return url::Url::parse(&Self::with_scheme(text.trim()))
                .map(|_| ())
                .map_err(|_| language.invalid_prompt.clone());
        }

        require(false, question, language)
    }
}

/// Dates compare textually against `min`/`max`, so ISO dates order
/// correctly.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateBehavior;

impl QuestionBehavior for DateBehavior {
    fn validate(&self, question: &Question, language: &Language) -> Result<(), String> {
        if let Some(text) = answer_text(question.answer())
            && !text.trim().is_empty()
        {
            let out_of_range = question.min().is_some_and(|min| text < min.as_text())
                || question.max().is_some_and(|max| text > max.as_text())
                || question.mask().is_some_and(|mask| !mask.fits(&text));
            if out_of_range {
                return Err(language.invalid_prompt.clone());
            }
        }

        require(self.has_value(question), question, language)
    }
}

/// Content-only step: always valid.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionBreakBehavior;

impl QuestionBehavior for SectionBreakBehavior {
    fn is_valid(&self, _question: &Question, _language: &Language) -> bool {
        true
    }

    fn validate(&self, _question: &Question, _language: &Language) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use flow_form_types::{DATE_ISO_MASK, PHONE_US_MASK, QuestionType};

    use super::*;

    fn check(behavior: &dyn QuestionBehavior, question: &Question) -> bool {
        behavior.is_valid(question, &Language::default())
    }

    #[test]
    fn required_needs_value() {
        let question = Question::new(QuestionType::LongText, "Story?").required();
        assert!(!check(&BaseBehavior, &question));
        assert!(!check(&BaseBehavior, &question.clone().with_answer("   ")));
        assert!(check(&BaseBehavior, &question.with_answer("Once upon a time")));
    }

    #[test]
    fn optional_empty_is_valid_even_with_rules() {
        let question = Question::new(QuestionType::Email, "Email?");
        assert!(check(&EmailBehavior, &question));
        let question = Question::new(QuestionType::Phone, "Phone?").with_mask(PHONE_US_MASK);
        assert!(check(&TextBehavior, &question));
    }

    #[test]
    fn text_mask_and_max_length() {
        let question = Question::new(QuestionType::Phone, "Phone?")
            .required()
            .with_mask(PHONE_US_MASK);
        assert!(check(&TextBehavior, &question.clone().with_answer("(555) 123-4567")));
        assert!(!check(&TextBehavior, &question.with_answer("555-1234")));

        let question = Question::new(QuestionType::Text, "Nick?").with_max_length(4);
        assert!(check(&TextBehavior, &question.clone().with_answer("abcd")));
        assert!(!check(&TextBehavior, &question.with_answer("abcde")));
    }

    #[test]
    fn email_shape() {
        let question = Question::new(QuestionType::Email, "Email?").required();
        assert!(check(&EmailBehavior, &question.clone().with_answer("ada@example.com")));
        assert!(!check(&EmailBehavior, &question.clone().with_answer("ada.example.com")));
        assert!(!check(&EmailBehavior, &question.with_answer("ada@example.")));
    }

    #[test]
    fn number_bounds() {
        let mut question = Question::new(QuestionType::Number, "Age?")
            .required()
            .with_min(18)
            .with_max(99);
        question.set_answer("42");
        assert!(check(&NumberBehavior, &question));
        question.set_answer("12");
        assert!(!check(&NumberBehavior, &question));
        question.set_answer("120");
        assert!(!check(&NumberBehavior, &question));
        question.set_answer("old");
        assert!(!check(&NumberBehavior, &question));
    }

    #[test]
    fn url_gets_scheme() {
        let question = Question::new(QuestionType::Url, "Website?")
            .required()
            .with_answer("example.com");
        assert!(check(&UrlBehavior, &question));
        assert_eq!(
            UrlBehavior.fix_answer(&question),
            AnswerValue::from("https://example.com")
        );

        let question = question.with_answer("http://exa mple.com");
        assert!(!check(&UrlBehavior, &question));
        assert_eq!(
            UrlBehavior.fix_answer(&question),
            AnswerValue::from("http://exa mple.com")
        );
    }

    #[test]
    fn date_range() {
        let question = Question::new(QuestionType::Date, "When?")
            .required()
            .with_min("2024-01-01")
            .with_max("2024-12-31")
            .with_mask(DATE_ISO_MASK);
        assert!(check(&DateBehavior, &question.clone().with_answer("2024-06-15")));
        assert!(!check(&DateBehavior, &question.clone().with_answer("2023-12-31")));
        assert!(!check(&DateBehavior, &question.clone().with_answer("2025-01-01")));
        assert!(!check(&DateBehavior, &question.with_answer("June 15")));
    }

    #[test]
    fn section_break_is_always_valid() {
        let question = Question::new(QuestionType::SectionBreak, "Part two").required();
        assert!(check(&SectionBreakBehavior, &question));
        assert_eq!(
            SectionBreakBehavior.error_message(&question, &Language::default()),
            None
        );
    }

    #[test]
    fn error_message_and_show_invalid() {
        let language = Language::default();
        let mut question = Question::new(QuestionType::Email, "Email?")
            .required()
            .with_answer("nope");
        assert_eq!(
            EmailBehavior.error_message(&question, &language).as_deref(),
            Some("Please fill out the field correctly")
        );
        assert!(!EmailBehavior.show_invalid(&question, &language));
        question.interaction_mut().enter_pressed = true;
        assert!(EmailBehavior.show_invalid(&question, &language));
    }
}
