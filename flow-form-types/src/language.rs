use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Deserialize;

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":(\w+)").expect("token pattern is valid"));

/// User-facing strings. Every field can be overridden from JSON
/// (camelCase keys); missing keys keep the English default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Language {
    pub enter_key: String,
    pub shift_key: String,
    pub ok: String,
    #[serde(rename = "continue")]
    pub continue_text: String,
    pub skip: String,
    pub press_enter: String,
    pub multiple_choice_help_text: String,
    pub multiple_choice_help_text_single: String,
    pub other_prompt: String,
    pub placeholder: String,
    pub submit_text: String,
    pub long_text_help_text: String,
    pub prev: String,
    pub next: String,
    pub percent_completed: String,
    pub invalid_prompt: String,
    pub thank_you_text: String,
    pub success_text: String,
    pub error_allowed_file_types: String,
    pub error_max_file_size: String,
    pub error_min_files: String,
    pub error_max_files: String,
}

impl Default for Language {
    fn default() -> Self {
        Self {
            enter_key: "Enter".into(),
            shift_key: "Shift".into(),
            ok: "OK".into(),
            continue_text: "Continue".into(),
            skip: "Skip".into(),
            press_enter: "Press :enterKey".into(),
            multiple_choice_help_text: "Choose as many as you like".into(),
            multiple_choice_help_text_single: "Choose only one answer".into(),
            other_prompt: "Other".into(),
            placeholder: "Type your answer here...".into(),
            submit_text: "Submit".into(),
            long_text_help_text: ":shiftKey + :enterKey to make a line break.".into(),
            prev: "Prev".into(),
            next: "Next".into(),
            percent_completed: ":percent% completed".into(),
            invalid_prompt: "Please fill out the field correctly".into(),
            thank_you_text: "Thank you!".into(),
            success_text: "Your submission has been sent.".into(),
            error_allowed_file_types: "Invalid file type. Allowed file types: :fileTypes.".into(),
            error_max_file_size: "File(s) too large. Maximum allowed file size: :size.".into(),
            error_min_files: "Too few files added. Minimum allowed files: :min.".into(),
            error_max_files: "Too many files added. Maximum allowed files: :max.".into(),
        }
    }
}

impl Language {
    /// Look up a string by its camelCase key.
    pub fn get(&self, key: &str) -> Option<&str> {
        let value = match key {
            "enterKey" => &self.enter_key,
            "shiftKey" => &self.shift_key,
            "ok" => &self.ok,
            "continue" => &self.continue_text,
            "skip" => &self.skip,
            "pressEnter" => &self.press_enter,
            "multipleChoiceHelpText" => &self.multiple_choice_help_text,
            "multipleChoiceHelpTextSingle" => &self.multiple_choice_help_text_single,
            "otherPrompt" => &self.other_prompt,
            "placeholder" => &self.placeholder,
            "submitText" => &self.submit_text,
            "longTextHelpText" => &self.long_text_help_text,
            "prev" => &self.prev,
            "next" => &self.next,
            "percentCompleted" => &self.percent_completed,
            "invalidPrompt" => &self.invalid_prompt,
            "thankYouText" => &self.thank_you_text,
            "successText" => &self.success_text,
            "errorAllowedFileTypes" => &self.error_allowed_file_types,
            "errorMaxFileSize" => &self.error_max_file_size,
            "errorMinFiles" => &self.error_min_files,
            "errorMaxFiles" => &self.error_max_files,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Replace `:word` tokens, first with this language's own strings, then
    /// with `replacements`. Unknown tokens are left as they are.
    pub fn format_string(&self, template: &str, replacements: &HashMap<&str, String>) -> String {
        TOKEN
            .replace_all(template, |caps: &Captures<'_>| {
                let word = &caps[1];
                self.get(word)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .or_else(|| replacements.get(word).filter(|s| !s.is_empty()).cloned())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Human-readable size with up to two decimals, e.g. `1.5 kB`.
    pub fn format_file_size(&self, bytes: u64) -> String {
        const UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];

        let mut size = bytes as f64;
        let mut unit = 0;
        while size >= 1024.0 && unit < UNITS.len() - 1 {
            size /= 1024.0;
            unit += 1;
        }

        let rounded = (size * 100.0).round() / 100.0;
        format!("{rounded} {}", UNITS[unit])
    }

    /// The progress label, e.g. `42% completed`.
    pub fn percent_label(&self, percent: u8) -> String {
        let replacements = HashMap::from([("percent", percent.to_string())]);
        self.format_string(&self.percent_completed, &replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_strings_win_over_replacements() {
        let language = Language::default();
        let replacements = HashMap::from([("enterKey", "Return".to_string())]);
        assert_eq!(
            language.format_string(&language.press_enter, &replacements),
            "Press Enter"
        );
    }

    #[test]
    fn replacements_fill_remaining_tokens() {
        let language = Language::default();
        let replacements = HashMap::from([("min", "2".to_string())]);
        assert_eq!(
            language.format_string(&language.error_min_files, &replacements),
            "Too few files added. Minimum allowed files: 2."
        );
        assert_eq!(
            language.format_string("Hello :stranger", &HashMap::new()),
            "Hello :stranger"
        );
    }

    #[test]
    fn percent_label() {
        assert_eq!(Language::default().percent_label(42), "42% completed");
    }

    #[test]
    fn file_sizes() {
        let language = Language::default();
        assert_eq!(language.format_file_size(0), "0 B");
        assert_eq!(language.format_file_size(512), "512 B");
        assert_eq!(language.format_file_size(1536), "1.5 kB");
        assert_eq!(language.format_file_size(10 * 1024 * 1024), "10 MB");
    }

    #[test]
    fn overrides_from_json() {
        let language: Language =
            serde_json::from_str(r#"{"submitText": "Senden", "continue": "Weiter"}"#).unwrap();
        assert_eq!(language.submit_text, "Senden");
        assert_eq!(language.continue_text, "Weiter");
        assert_eq!(language.ok, "OK");
    }
}
