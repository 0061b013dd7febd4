use std::collections::HashMap;

use flow_form_types::{FileInfo, Language, Question};
use regex::Regex;

use super::{QuestionBehavior, require};

/// Attached files checked against the accept list, count limits (for
/// `multiple` questions) and total size.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileBehavior;

/// Parsed `accept` attribute: `.ext` entries and mime globs like `image/*`.
struct AcceptList {
    extensions: Vec<String>,
    mimes: Vec<Regex>,
}

impl AcceptList {
    fn parse(accept: &str) -> Self {
        let mut extensions = Vec::new();
        let mut mimes = Vec::new();

        for entry in accept.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            if entry.starts_with('.') {
                extensions.push(entry.to_lowercase());
            } else {
                let pattern = format!("^{}$", regex::escape(entry).replace(r"\*", ".*"));
                if let Ok(mime) = Regex::new(&pattern) {
                    mimes.push(mime);
                }
            }
        }

        Self { extensions, mimes }
    }

    fn accepts(&self, file: &FileInfo) -> bool {
        let by_extension = file
            .extension()
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()));

        by_extension || self.mimes.iter().any(|mime| mime.is_match(&file.mime))
    }
}

impl QuestionBehavior for FileBehavior {
    fn validate(&self, question: &Question, language: &Language) -> Result<(), String> {
        let files = question.answer().as_files().unwrap_or_default();
        require(!files.is_empty(), question, language)?;

        if let Some(accept) = question.accept() {
            let accept_list = AcceptList::parse(accept);
            if !files.iter().all(|file| accept_list.accepts(file)) {
                let replacements = HashMap::from([("fileTypes", accept.to_string())]);
                return Err(language.format_string(&language.error_allowed_file_types, &replacements));
            }
        }

        if question.is_multiple() {
            let count = files.len() as f64;
            if let Some(min) = question.min()
                && min.as_number().is_some_and(|min| count < min)
            {
                let replacements = HashMap::from([("min", min.as_text())]);
                return Err(language.format_string(&language.error_min_files, &replacements));
            }
            if let Some(max) = question.max()
                && max.as_number().is_some_and(|max| count > max)
            {
                let replacements = HashMap::from([("max", max.as_text())]);
                return Err(language.format_string(&language.error_max_files, &replacements));
            }
        }

        if let Some(max_size) = question.max_size() {
            let total: u64 = files.iter().map(|file| file.size).sum();
            if total > max_size {
                let replacements = HashMap::from([("size", language.format_file_size(max_size))]);
                return Err(language.format_string(&language.error_max_file_size, &replacements));
            }
        }

        Ok(())
    }

    /// File errors show as soon as files are attached.
    fn show_invalid(&self, question: &Question, language: &Language) -> bool {
        (self.has_value(question) || question.interaction().enter_pressed)
            && !self.is_valid(question, language)
    }
}

#[cfg(test)]
mod tests {
    use flow_form_types::QuestionType;

    use super::*;

    fn upload() -> Question {
        Question::new(QuestionType::File, "Upload your CV").required()
    }

    fn message(question: &Question) -> Option<String> {
        FileBehavior.error_message(question, &Language::default())
    }

    #[test]
    fn accepts_extensions_and_mime_globs() {
        let question = upload().with_accept(".pdf, image/*");
        let ok = question.clone().with_answer(vec![
            FileInfo::new("cv.PDF", "application/octet-stream", 10),
            FileInfo::new("me.jpg", "image/jpeg", 10),
        ]);
        assert_eq!(message(&ok), None);

        let bad = question.with_answer(vec![FileInfo::new("cv.docx", "application/msword", 10)]);
        assert_eq!(
            message(&bad).as_deref(),
            Some("Invalid file type. Allowed file types: .pdf, image/*.")
        );
    }

    #[test]
    fn counts_files_when_multiple() {
        let question = upload().with_multiple(true).with_min(2).with_max(3);
        let one = question.clone().with_answer(vec![FileInfo::new("a.txt", "text/plain", 1)]);
        assert_eq!(
            message(&one).as_deref(),
            Some("Too few files added. Minimum allowed files: 2.")
        );

        let four = question.with_answer(
            (0..4)
                .map(|i| FileInfo::new(format!("{i}.txt"), "text/plain", 1))
                .collect::<Vec<_>>(),
        );
        assert_eq!(
            message(&four).as_deref(),
            Some("Too many files added. Maximum allowed files: 3.")
        );
    }

    #[test]
    fn limits_total_size() {
        let question = upload()
            .with_max_size(1024)
            .with_answer(vec![FileInfo::new("big.bin", "", 2048)]);
        assert_eq!(
            message(&question).as_deref(),
            Some("File(s) too large. Maximum allowed file size: 1 kB.")
        );
        assert!(FileBehavior.show_invalid(&question, &Language::default()));
    }

    #[test]
    fn required_needs_files() {
        assert_eq!(
            message(&upload()).as_deref(),
            Some("Please fill out the field correctly")
        );
        assert_eq!(message(&Question::new(QuestionType::File, "Optional")), None);
    }
}
