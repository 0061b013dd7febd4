use std::path::Path;

use serde::Deserialize;

use crate::{FormError, Language, Question, StepRef};

/// Form-level settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormConfig {
    /// Run the elapsed-time counter.
    pub timer: bool,

    /// Step at which the timer starts. Without one it starts on the first
    /// question.
    pub timer_start_step: Option<StepRef>,

    /// Step at which the timer stops. Submission always stops it.
    pub timer_stop_step: Option<StepRef>,
}

impl FormConfig {
    pub fn with_timer(mut self) -> Self {
        self.timer = true;
        self
    }

    pub fn with_timer_start_step(mut self, step: impl Into<StepRef>) -> Self {
        self.timer = true;
        self.timer_start_step = Some(step.into());
        self
    }

    pub fn with_timer_stop_step(mut self, step: impl Into<StepRef>) -> Self {
        self.timer = true;
        self.timer_stop_step = Some(step.into());
        self
    }
}

/// The top-level structure containing all questions and settings of a form.
///
/// A definition is plain data. It can be built in code or loaded from JSON:
///
/// ```
/// use flow_form_types::{FormDefinition, QuestionType};
///
/// let definition = FormDefinition::from_json(r#"{
///     "questions": [
///         {"id": "name", "type": "text", "title": "Your name?", "required": true}
///     ],
///     "config": {"timer": true}
/// }"#).unwrap();
///
/// assert_eq!(definition.questions[0].kind(), QuestionType::Text);
/// assert!(definition.config.timer);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormDefinition {
    /// All questions in declaration order.
    pub questions: Vec<Question>,

    pub language: Language,

    pub config: FormConfig,
}

impl FormDefinition {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse a definition from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, FormError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON definition file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FormError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_timer_steps_by_id_or_index() {
        let definition = FormDefinition::from_json(
            r#"{
                "questions": [],
                "config": {"timer": true, "timerStartStep": "intro", "timerStopStep": 3}
            }"#,
        )
        .unwrap();

        assert_eq!(
            definition.config.timer_start_step,
            Some(StepRef::Id("intro".into()))
        );
        assert_eq!(definition.config.timer_stop_step, Some(StepRef::Index(3)));
    }

    #[test]
    fn rejects_unknown_types() {
        let err = FormDefinition::from_json(r#"{"questions": [{"type": "slider"}]}"#).unwrap_err();
        assert!(matches!(err, FormError::Json(_)));
        assert!(err.to_string().contains("slider"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = FormDefinition::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, FormError::Io(_)));
        assert!(!err.is_definition_error());
    }
}
