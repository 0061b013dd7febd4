use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::{AnswerValue, FormError, Jump};

/// Tag selecting which rendering and validation behavior applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum QuestionType {
    #[default]
    Text,
    LongText,
    Email,
    Number,
    Password,
    Phone,
    Url,
    Date,
    File,
    Dropdown,
    MultipleChoice,
    MultiplePictureChoice,
    MultipleText,
    Matrix,
    OpinionScale,
    IconRate,
    SectionBreak,
}

impl QuestionType {
    pub const ALL: [QuestionType; 17] = [
        Self::Text,
        Self::LongText,
        Self::Email,
        Self::Number,
        Self::Password,
        Self::Phone,
        Self::Url,
        Self::Date,
        Self::File,
        Self::Dropdown,
        Self::MultipleChoice,
        Self::MultiplePictureChoice,
        Self::MultipleText,
        Self::Matrix,
        Self::OpinionScale,
        Self::IconRate,
        Self::SectionBreak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::LongText => "LongText",
            Self::Email => "Email",
            Self::Number => "Number",
            Self::Password => "Password",
            Self::Phone => "Phone",
            Self::Url => "Url",
            Self::Date => "Date",
            Self::File => "File",
            Self::Dropdown => "Dropdown",
            Self::MultipleChoice => "MultipleChoice",
            Self::MultiplePictureChoice => "MultiplePictureChoice",
            Self::MultipleText => "MultipleText",
            Self::Matrix => "Matrix",
            Self::OpinionScale => "OpinionScale",
            Self::IconRate => "IconRate",
            Self::SectionBreak => "SectionBreak",
        }
    }

    /// Choice types that can auto-advance after a single selection.
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::MultiplePictureChoice)
    }

    /// Rating scales built from numbered options.
    pub fn is_scale(&self) -> bool {
        matches!(self, Self::OpinionScale | Self::IconRate)
    }

    /// Types whose answer maps subquestion ids to strings.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::MultipleText)
    }

    /// Types whose options track the current answer.
    pub fn has_options(&self) -> bool {
        self.is_multiple_choice() || self.is_scale() || matches!(self, Self::Dropdown)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = FormError;

    /// Accepts `"MultipleChoice"`, `"multiple_choice"`, `"multiplechoice"` and
    /// the long `"FlowFormMultipleChoiceType"` form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        let short = normalized
            .strip_prefix("flowform")
            .and_then(|rest| rest.strip_suffix("type"))
            .unwrap_or(&normalized);

        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().to_lowercase() == short)
            .ok_or_else(|| FormError::UnknownQuestionType(s.to_string()))
    }
}

impl TryFrom<String> for QuestionType {
    type Error = FormError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A selectable choice of a choice-based question.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChoiceOption {
    pub label: String,
    pub value: Option<String>,
    pub selected: bool,
    pub image_src: Option<String>,
    pub image_alt: Option<String>,
    pub disabled: bool,
}

impl ChoiceOption {
    /// An option whose value is its label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// An option with a distinct stored value.
    pub fn with_value(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn choice_label(&self) -> &str {
        if self.label.is_empty() {
            self.choice_value()
        } else {
            &self.label
        }
    }

    /// The stored value: explicit value, else label, image alt, image src.
    pub fn choice_value(&self) -> &str {
        if let Some(value) = &self.value {
            return value;
        }

        [Some(&self.label), self.image_alt.as_ref(), self.image_src.as_ref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .map_or("", String::as_str)
    }

    pub fn toggle(&mut self) {
        self.selected = !self.selected;
    }
}

/// A labelled input of a composite (multi-field) question.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Subquestion {
    pub id: String,
    pub label: String,
}

impl Subquestion {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatrixRow {
    pub id: String,
    pub label: String,
}

impl MatrixRow {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatrixColumn {
    pub value: String,
    pub label: String,
}

impl MatrixColumn {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Input mask: `#` digit, `X` alphanumeric, `S` letter, `A` uppercase letter,
/// `a` lowercase letter, `!` escapes the next character. Anything else is a
/// literal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Mask {
    One(String),
    Any(Vec<String>),
}

pub const DATE_MASK: &str = "##/##/####";
pub const DATE_ISO_MASK: &str = "####-##-##";
pub const PHONE_US_MASK: &str = "(###) ###-####";

impl Mask {
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::One(pattern) => std::slice::from_ref(pattern),
            Self::Any(patterns) => patterns,
        }
    }

    /// Check `value` against any pattern, either fully masked (literals
    /// included) or raw (token characters only).
    pub fn fits(&self, value: &str) -> bool {
        self.patterns()
            .iter()
            .any(|pattern| fits_pattern(pattern, value))
    }
}

impl From<&str> for Mask {
    fn from(pattern: &str) -> Self {
        Self::One(pattern.to_string())
    }
}

enum MaskSlot {
    Token(char),
    Literal(char),
}

fn mask_slots(pattern: &str) -> Vec<MaskSlot> {
    let mut slots = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '!' => {
                if let Some(escaped) = chars.next() {
                    slots.push(MaskSlot::Literal(escaped));
                }
            }
            '#' | 'X' | 'S' | 'A' | 'a' => slots.push(MaskSlot::Token(c)),
            other => slots.push(MaskSlot::Literal(other)),
        }
    }
    slots
}

fn token_accepts(token: char, c: char) -> bool {
    match token {
        '#' => c.is_ascii_digit(),
        'X' => c.is_alphanumeric(),
        'S' => c.is_alphabetic(),
        'A' => c.is_alphabetic() && c.is_uppercase(),
        'a' => c.is_alphabetic() && c.is_lowercase(),
        _ => false,
    }
}

fn fits_pattern(pattern: &str, value: &str) -> bool {
    let slots = mask_slots(pattern);
    let chars: Vec<char> = value.chars().collect();

    let masked = chars.len() == slots.len()
        && slots.iter().zip(&chars).all(|(slot, &c)| match slot {
            MaskSlot::Token(token) => token_accepts(*token, c),
            MaskSlot::Literal(literal) => *literal == c,
        });
    if masked {
        return true;
    }

    let tokens: Vec<char> = slots
        .iter()
        .filter_map(|slot| match slot {
            MaskSlot::Token(token) => Some(*token),
            MaskSlot::Literal(_) => None,
        })
        .collect();

    chars.len() == tokens.len()
        && tokens
            .iter()
            .zip(&chars)
            .all(|(&token, &c)| token_accepts(token, c))
}

/// A `min`/`max` limit. Numbers bound numeric answers and file counts,
/// text bounds dates (compared lexically, so ISO dates order correctly).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Number(f64),
    Text(String),
}

impl Bound {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<f64> for Bound {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Bound {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Bound {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Interaction bookkeeping that feeds `show_invalid` and composite
/// validation. Cleared by [`Question::reset_answer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interaction {
    /// The user changed the input at least once.
    pub dirty: bool,

    /// The user tried to confirm the answer.
    pub enter_pressed: bool,

    /// Subquestion ids the user has filled in.
    pub touched: BTreeSet<String>,
}

/// A single question of a form.
///
/// Configuration fields are set through the `with_*` builder methods or
/// loaded from JSON (camelCase keys). The answer state is mutated through
/// [`set_answer`](Self::set_answer) and the choice helpers; `answered` and
/// `index` belong to the navigation engine.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Question {
    id: Option<String>,

    #[serde(rename = "type")]
    kind: QuestionType,

    title: String,
    subtitle: Option<String>,
    tagline: Option<String>,
    description: Option<String>,
    content: Option<String>,
    help_text: Option<String>,
    placeholder: Option<String>,

    required: bool,
    multiple: bool,
    allow_other: bool,
    next_step_on_answer: bool,

    answer: AnswerValue,
    #[serde(skip)]
    answered: bool,
    #[serde(skip)]
    other: Option<String>,

    jump: Option<Jump>,
    #[serde(skip)]
    index: usize,

    options: Vec<ChoiceOption>,
    subquestions: Vec<Subquestion>,
    rows: Vec<MatrixRow>,
    columns: Vec<MatrixColumn>,

    mask: Option<Mask>,
    min: Option<Bound>,
    max: Option<Bound>,
    max_length: Option<usize>,
    accept: Option<String>,
    max_size: Option<u64>,

    #[serde(skip)]
    interaction: Interaction,
}

impl Question {
    /// Create a new question of the given type.
    pub fn new(kind: QuestionType, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            ..Self::default()
        }
    }

    // === Builder ===

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Shorthand for `with_required(true)`.
    pub fn required(self) -> Self {
        self.with_required(true)
    }

    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn with_allow_other(mut self, allow_other: bool) -> Self {
        self.allow_other = allow_other;
        self
    }

    pub fn with_next_step_on_answer(mut self, next_step_on_answer: bool) -> Self {
        self.next_step_on_answer = next_step_on_answer;
        self
    }

    /// Pre-fill the answer.
    pub fn with_answer(mut self, answer: impl Into<AnswerValue>) -> Self {
        self.answer = answer.into();
        self
    }

    pub fn with_jump(mut self, jump: Jump) -> Self {
        self.jump = Some(jump);
        self
    }

    pub fn with_options(mut self, options: impl IntoIterator<Item = ChoiceOption>) -> Self {
        self.options = options.into_iter().collect();
        self
    }

    /// Add options whose values are their labels.
    pub fn with_choices<S: Into<String>>(self, labels: impl IntoIterator<Item = S>) -> Self {
        self.with_options(labels.into_iter().map(ChoiceOption::new))
    }

    pub fn with_subquestions(
        mut self,
        subquestions: impl IntoIterator<Item = Subquestion>,
    ) -> Self {
        self.subquestions = subquestions.into_iter().collect();
        self
    }

    pub fn with_rows(mut self, rows: impl IntoIterator<Item = MatrixRow>) -> Self {
        self.rows = rows.into_iter().collect();
        self
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = MatrixColumn>) -> Self {
        self.columns = columns.into_iter().collect();
        self
    }

    pub fn with_mask(mut self, mask: impl Into<Mask>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    pub fn with_min(mut self, min: impl Into<Bound>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn with_max(mut self, max: impl Into<Bound>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Comma-separated extensions (`.pdf`) and mime patterns (`image/*`).
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    /// Maximum total size in bytes of attached files.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_tagline(mut self, tagline: impl Into<String>) -> Self {
        self.tagline = Some(tagline.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Body text of a section break.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    // === Accessors ===

    /// The question id; empty until one is assigned.
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn tagline(&self) -> Option<&str> {
        self.tagline.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn allows_other(&self) -> bool {
        self.allow_other
    }

    pub fn next_step_on_answer(&self) -> bool {
        self.next_step_on_answer
    }

    pub fn answer(&self) -> &AnswerValue {
        &self.answer
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// The free-text value entered next to the fixed options.
    pub fn other(&self) -> Option<&str> {
        self.other.as_deref()
    }

    pub fn jump(&self) -> Option<&Jump> {
        self.jump.as_ref()
    }

    /// Serial index in the active path, valid for the latest resolution.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    pub fn subquestions(&self) -> &[Subquestion] {
        &self.subquestions
    }

    pub fn rows(&self) -> &[MatrixRow] {
        &self.rows
    }

    pub fn columns(&self) -> &[MatrixColumn] {
        &self.columns
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    pub fn min(&self) -> Option<&Bound> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&Bound> {
        self.max.as_ref()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn accept(&self) -> Option<&str> {
        self.accept.as_deref()
    }

    pub fn max_size(&self) -> Option<u64> {
        self.max_size
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn interaction_mut(&mut self) -> &mut Interaction {
        &mut self.interaction
    }

    pub fn is_composite(&self) -> bool {
        self.kind.is_composite()
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.kind.is_multiple_choice()
    }

    /// Multi-select answers are lists of option values. Matrices key by row
    /// and file questions hold file lists instead.
    fn has_list_answer(&self) -> bool {
        self.multiple && !matches!(self.kind, QuestionType::Matrix | QuestionType::File)
    }

    /// A jump rule is configured and not empty.
    pub fn has_jump(&self) -> bool {
        self.jump.as_ref().is_some_and(|jump| !jump.is_empty())
    }

    // === Engine-maintained state ===

    /// Give the question the id `q_<position>` unless it already has one.
    pub fn assign_id(&mut self, position: usize) {
        if !self.has_id() {
            self.id = Some(format!("q_{position}"));
        }
    }

    pub fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn set_answered(&mut self, answered: bool) {
        self.answered = answered;
    }

    // === Answer operations ===

    /// Store a new answer. Number questions coerce numeric-looking text;
    /// composite questions keep one entry per subquestion.
    pub fn set_answer(&mut self, answer: impl Into<AnswerValue>) {
        let mut answer = answer.into();

        if self.is_composite() {
            answer = self.composite_answer(&answer);
        } else if self.kind == QuestionType::Number
            && let AnswerValue::Text(text) = &answer
            && !text.trim().is_empty()
            && let Ok(number) = text.trim().parse::<f64>()
            && number.is_finite()
        {
            answer = AnswerValue::Number(number);
        }

        self.answer = answer;
    }

    /// The id of the question to visit next, or `None` to continue in
    /// declaration order.
    pub fn jump_target(&self) -> Option<String> {
        self.jump.as_ref().and_then(|jump| jump.target(self))
    }

    /// Re-sync each option's `selected` flag with the current answer and,
    /// when other values are allowed, capture any unmatched part of the
    /// answer as the free-text value.
    pub fn reset_options(&mut self) {
        let mut num_selected = 0;

        for option in &mut self.options {
            option.selected = self.answer.contains(option.choice_value());
            if option.selected {
                num_selected += 1;
            }
        }

        if !self.allow_other {
            return;
        }

        let other_answer = match &self.answer {
            AnswerValue::List(items) if !items.is_empty() && items.len() != num_selected => {
                items.last().cloned()
            }
            AnswerValue::Text(text)
                if !self.options.iter().any(|o| o.choice_value() == text) =>
            {
                Some(text.clone())
            }
            _ => None,
        };

        if other_answer.is_some() {
            self.other = other_answer;
        }
    }

    /// Restore the unanswered default without touching configuration.
    pub fn reset_answer(&mut self) {
        self.answered = false;
        self.answer = if self.is_composite() {
            self.composite_empty_answer()
        } else if self.has_list_answer() {
            AnswerValue::List(Vec::new())
        } else {
            AnswerValue::Empty
        };
        self.other = None;
        self.interaction = Interaction::default();

        self.reset_options();
    }

    /// Empty answer of a composite question: each subquestion id mapped to
    /// an empty string.
    pub fn composite_empty_answer(&self) -> AnswerValue {
        AnswerValue::Map(
            self.subquestions
                .iter()
                .map(|sub| (sub.id.clone(), AnswerValue::Text(String::new())))
                .collect(),
        )
    }

    /// Map `given` onto the subquestion ids. Unknown keys are dropped,
    /// missing ones are empty, and fields with text count as touched.
    fn composite_answer(&mut self, given: &AnswerValue) -> AnswerValue {
        let mut answer = self.composite_empty_answer();
        if let (AnswerValue::Map(filled), AnswerValue::Map(given)) = (&mut answer, given) {
            for (id, value) in filled.iter_mut() {
                if let Some(text) = given.get(id).and_then(AnswerValue::as_text) {
                    *value = AnswerValue::Text(text.to_string());
                    if !text.trim().is_empty() {
                        self.interaction.touched.insert(id.clone());
                    }
                }
            }
        }
        answer
    }

    /// Normalize configuration and pre-filled answers.
    ///
    /// Composite answers get exactly one entry per subquestion, `multiple`
    /// answers become lists, scales without options get `1..=n`, and a
    /// pre-filled answer marks the question answered.
    pub fn prepare(&mut self) {
        match self.kind {
            QuestionType::Url => self.mask = None,
            QuestionType::Date if self.placeholder.is_none() => {
                self.placeholder = Some("yyyy-mm-dd".to_string());
            }
            kind if kind.is_scale() && self.options.is_empty() => {
                let size = self.max.as_ref().and_then(Bound::as_number).unwrap_or(5.0);
                let count = size.clamp(1.0, 10.0) as usize;
                self.options = (1..=count)
                    .map(|n| ChoiceOption::new(n.to_string()))
                    .collect();
            }
            _ => {}
        }

        if self.is_composite() {
            let given = std::mem::take(&mut self.answer);
            self.answer = self.composite_answer(&given);
        } else if self.has_list_answer() {
            self.answer = match std::mem::take(&mut self.answer) {
                AnswerValue::Empty => AnswerValue::List(Vec::new()),
                AnswerValue::Text(text) => AnswerValue::List(vec![text]),
                AnswerValue::Number(n) => AnswerValue::List(vec![n.to_string()]),
                other => other,
            };
        }

        self.answered = self.answer.has_value();
        self.reset_options();
    }

    /// Toggle the option whose value is `value`.
    ///
    /// Single-select questions keep exactly the picked option selected and
    /// clear any other value; multi-select questions add or remove it.
    /// Returns `false` when no enabled option has that value.
    pub fn toggle_option(&mut self, value: &str) -> bool {
        let Some(position) = self
            .options
            .iter()
            .position(|o| o.choice_value() == value && !o.disabled)
        else {
            return false;
        };

        if self.multiple {
            self.options[position].toggle();
            let mut items = self.answer.as_list().map(<[String]>::to_vec).unwrap_or_default();
            if self.options[position].selected {
                if !items.iter().any(|item| item == value) {
                    items.push(value.to_string());
                }
            } else {
                items.retain(|item| item != value);
            }
            self.answer = AnswerValue::List(items);
        } else {
            if self.allow_other {
                self.other = None;
            }
            for (i, option) in self.options.iter_mut().enumerate() {
                option.selected = i == position;
            }
            self.answer = AnswerValue::Text(value.to_string());
        }

        true
    }

    /// Set the free-text value entered next to the options.
    ///
    /// Multi-select answers keep the selected options and append the text;
    /// single-select answers drop the selection and take the text.
    pub fn set_other(&mut self, text: impl Into<String>) -> bool {
        if !self.allow_other {
            return false;
        }

        let text = text.into();
        let other = (!text.trim().is_empty()).then_some(text);

        if self.multiple {
            let mut items: Vec<String> = self
                .options
                .iter()
                .filter(|o| o.selected)
                .map(|o| o.choice_value().to_string())
                .collect();
            items.extend(other.iter().cloned());
            self.answer = AnswerValue::List(items);
        } else {
            for option in &mut self.options {
                option.selected = false;
            }
            self.answer = other.clone().into();
        }

        self.other = other;
        true
    }

    /// Fill one field of a composite question and mark it touched.
    pub fn set_subanswer(&mut self, sub_id: &str, text: impl Into<String>) -> bool {
        if !self.is_composite() || !self.subquestions.iter().any(|sub| sub.id == sub_id) {
            return false;
        }

        if !matches!(self.answer, AnswerValue::Map(_)) {
            self.answer = self.composite_empty_answer();
        }
        if let AnswerValue::Map(entries) = &mut self.answer {
            entries.insert(sub_id.to_string(), AnswerValue::Text(text.into()));
        }
        self.interaction.touched.insert(sub_id.to_string());
        true
    }

    /// Pick `column` in matrix `row`. Multiple matrices toggle the cell,
    /// single ones replace the row's value.
    pub fn set_matrix_cell(&mut self, row: &str, column: &str) -> bool {
        if self.kind != QuestionType::Matrix
            || !self.rows.iter().any(|r| r.id == row)
            || !self.columns.iter().any(|c| c.value == column)
        {
            return false;
        }

        if !matches!(self.answer, AnswerValue::Map(_)) {
            self.answer = AnswerValue::Map(BTreeMap::new());
        }
        let multiple = self.multiple;
        if let AnswerValue::Map(entries) = &mut self.answer {
            if multiple {
                let cell = entries
                    .entry(row.to_string())
                    .or_insert_with(|| AnswerValue::List(Vec::new()));
                let mut items = cell.as_list().map(<[String]>::to_vec).unwrap_or_default();
                if let Some(pos) = items.iter().position(|item| item == column) {
                    items.remove(pos);
                } else {
                    items.push(column.to_string());
                }
                *cell = AnswerValue::List(items);
            } else {
                entries.insert(row.to_string(), AnswerValue::Text(column.to_string()));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> Question {
        Question::new(QuestionType::MultipleChoice, "Favourite colour?")
            .with_choices(["Red", "Green", "Blue"])
    }

    #[test]
    fn parses_type_names() {
        assert_eq!("text".parse::<QuestionType>().unwrap(), QuestionType::Text);
        assert_eq!(
            "FlowFormMultipleChoiceType".parse::<QuestionType>().unwrap(),
            QuestionType::MultipleChoice
        );
        assert_eq!(
            "opinion_scale".parse::<QuestionType>().unwrap(),
            QuestionType::OpinionScale
        );
        assert!(matches!(
            "slider".parse::<QuestionType>(),
            Err(FormError::UnknownQuestionType(_))
        ));
    }

    #[test]
    fn number_answers_are_coerced() {
        let mut question = Question::new(QuestionType::Number, "Age?");
        question.set_answer(" 42 ");
        assert_eq!(question.answer(), &AnswerValue::Number(42.0));

        question.set_answer("");
        assert_eq!(question.answer(), &AnswerValue::from(""));

        question.set_answer("forty");
        assert_eq!(question.answer(), &AnswerValue::from("forty"));
    }

    #[test]
    fn text_answers_are_not_coerced() {
        let mut question = Question::new(QuestionType::Text, "Zip?");
        question.set_answer("01234");
        assert_eq!(question.answer(), &AnswerValue::from("01234"));
    }

    #[test]
    fn assign_id_keeps_explicit_ids() {
        let mut named = Question::new(QuestionType::Text, "Name?").with_id("name");
        named.assign_id(3);
        assert_eq!(named.id(), "name");

        let mut anonymous = Question::new(QuestionType::Text, "Name?");
        anonymous.assign_id(3);
        assert_eq!(anonymous.id(), "q_3");
    }

    #[test]
    fn reset_options_syncs_selection() {
        let mut question = colors().with_answer("Green");
        question.reset_options();
        let selected: Vec<_> = question.options().iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![false, true, false]);

        let mut question = colors().with_multiple(true).with_answer(vec!["Red", "Blue"]);
        question.reset_options();
        let selected: Vec<_> = question.options().iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![true, false, true]);
    }

    #[test]
    fn reset_options_captures_other() {
        let mut question = colors().with_allow_other(true).with_answer("Purple");
        question.reset_options();
        assert_eq!(question.other(), Some("Purple"));

        let mut question = colors()
            .with_allow_other(true)
            .with_multiple(true)
            .with_answer(vec!["Red", "Teal"]);
        question.reset_options();
        assert_eq!(question.other(), Some("Teal"));
    }

    #[test]
    fn reset_answer_restores_defaults() {
        let mut question = colors()
            .with_multiple(true)
            .with_allow_other(true)
            .with_answer(vec!["Red", "Teal"]);
        question.prepare();
        assert!(question.is_answered());
        question.interaction_mut().dirty = true;

        question.reset_answer();
        assert!(!question.is_answered());
        assert_eq!(question.answer(), &AnswerValue::List(Vec::new()));
        assert_eq!(question.other(), None);
        assert!(question.options().iter().all(|o| !o.selected));
        assert!(!question.interaction().dirty);
    }

    #[test]
    fn composite_answer_has_one_entry_per_subquestion() {
        let mut question = Question::new(QuestionType::MultipleText, "Your name")
            .with_subquestions([Subquestion::new("first", "First"), Subquestion::new("last", "Last")])
            .with_answer(AnswerValue::Map(BTreeMap::from([
                ("first".to_string(), AnswerValue::from("Ada")),
                ("middle".to_string(), AnswerValue::from("X")),
            ])));
        question.prepare();

        let entries = question.answer().as_map().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["first"], AnswerValue::from("Ada"));
        assert_eq!(entries["last"], AnswerValue::from(""));
    }

    #[test]
    fn set_answer_keeps_composite_shape() {
        let mut question = Question::new(QuestionType::MultipleText, "Your name")
            .with_subquestions([Subquestion::new("first", "First"), Subquestion::new("last", "Last")]);
        question.prepare();

        question.set_answer(BTreeMap::from([
            ("first".to_string(), AnswerValue::from("Ada")),
            ("bogus".to_string(), AnswerValue::from("x")),
        ]));
        let keys: Vec<_> = question.answer().as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, ["first", "last"]);
        assert_eq!(question.answer().as_map().unwrap()["first"], AnswerValue::from("Ada"));
        assert!(question.interaction().touched.contains("first"));
        assert!(!question.interaction().touched.contains("last"));

        question.set_answer("not a map");
        assert_eq!(question.answer(), &question.composite_empty_answer());
    }

    #[test]
    fn prepare_builds_scale_options() {
        let mut question = Question::new(QuestionType::OpinionScale, "Rate us").with_max(3);
        question.prepare();
        let values: Vec<_> = question.options().iter().map(ChoiceOption::choice_value).collect();
        assert_eq!(values, vec!["1", "2", "3"]);

        let mut question = Question::new(QuestionType::IconRate, "Rate us").with_max(40);
        question.prepare();
        assert_eq!(question.options().len(), 10);
    }

    #[test]
    fn prepare_wraps_multiple_answers() {
        let mut question = colors().with_multiple(true).with_answer("Red");
        question.prepare();
        assert_eq!(question.answer(), &AnswerValue::from(vec!["Red"]));
        assert!(question.options()[0].selected);
    }

    #[test]
    fn single_select_toggle_replaces_selection() {
        let mut question = colors();
        assert!(question.toggle_option("Red"));
        assert!(question.toggle_option("Blue"));
        assert_eq!(question.answer(), &AnswerValue::from("Blue"));
        let selected: Vec<_> = question.options().iter().map(|o| o.selected).collect();
        assert_eq!(selected, vec![false, false, true]);

        // Picking the same option again keeps it.
        assert!(question.toggle_option("Blue"));
        assert_eq!(question.answer(), &AnswerValue::from("Blue"));
        assert!(!question.toggle_option("Mauve"));
    }

    #[test]
    fn multi_select_toggle_adds_and_removes() {
        let mut question = colors().with_multiple(true);
        question.prepare();
        question.toggle_option("Red");
        question.toggle_option("Blue");
        assert_eq!(question.answer(), &AnswerValue::from(vec!["Red", "Blue"]));
        question.toggle_option("Red");
        assert_eq!(question.answer(), &AnswerValue::from(vec!["Blue"]));
    }

    #[test]
    fn other_value_for_single_select() {
        let mut question = colors().with_allow_other(true);
        question.toggle_option("Red");
        assert!(question.set_other("Magenta"));
        assert_eq!(question.answer(), &AnswerValue::from("Magenta"));
        assert!(question.options().iter().all(|o| !o.selected));

        question.toggle_option("Green");
        assert_eq!(question.other(), None);
        assert!(!colors().set_other("x"));
    }

    #[test]
    fn other_value_for_multi_select() {
        let mut question = colors().with_allow_other(true).with_multiple(true);
        question.prepare();
        question.toggle_option("Green");
        question.set_other("Magenta");
        assert_eq!(question.answer(), &AnswerValue::from(vec!["Green", "Magenta"]));
    }

    #[test]
    fn matrix_cells() {
        let mut question = Question::new(QuestionType::Matrix, "Rate")
            .with_rows([MatrixRow::new("food", "Food"), MatrixRow::new("service", "Service")])
            .with_columns([MatrixColumn::new("good", "Good"), MatrixColumn::new("bad", "Bad")]);
        assert!(question.set_matrix_cell("food", "good"));
        assert!(question.set_matrix_cell("food", "bad"));
        assert!(!question.set_matrix_cell("drinks", "bad"));
        assert_eq!(
            question.answer().as_map().unwrap()["food"],
            AnswerValue::from("bad")
        );

        let mut question = question.with_multiple(true);
        question.reset_answer();
        question.set_matrix_cell("service", "good");
        question.set_matrix_cell("service", "bad");
        question.set_matrix_cell("service", "good");
        assert_eq!(
            question.answer().as_map().unwrap()["service"],
            AnswerValue::from(vec!["bad"])
        );
    }

    #[test]
    fn choice_value_fallbacks() {
        assert_eq!(ChoiceOption::with_value("Yes", "y").choice_value(), "y");
        assert_eq!(ChoiceOption::new("Yes").choice_value(), "Yes");
        let picture = ChoiceOption {
            image_alt: Some("A cat".into()),
            image_src: Some("cat.png".into()),
            ..ChoiceOption::default()
        };
        assert_eq!(picture.choice_value(), "A cat");
        assert_eq!(picture.choice_label(), "A cat");
    }

    #[test]
    fn masks_accept_masked_and_raw_values() {
        let mask = Mask::from(PHONE_US_MASK);
        assert!(mask.fits("(555) 123-4567"));
        assert!(mask.fits("5551234567"));
        assert!(!mask.fits("555123456"));
        assert!(!mask.fits("(555) 123-456a"));

        let any = Mask::Any(vec![DATE_ISO_MASK.into(), DATE_MASK.into()]);
        assert!(any.fits("2024-01-31"));
        assert!(any.fits("31/01/2024"));
        assert!(!any.fits("2024-1-31"));
    }

    #[test]
    fn deserializes_with_camel_case_keys() {
        let question: Question = serde_json::from_str(
            r#"{
                "id": "colour",
                "type": "multiplechoice",
                "title": "Favourite colour?",
                "required": true,
                "allowOther": true,
                "nextStepOnAnswer": true,
                "options": [{"label": "Red"}, {"label": "Blue", "value": "blue"}],
                "jump": {"blue": "sky", "_other": "_submit"}
            }"#,
        )
        .unwrap();

        assert_eq!(question.id(), "colour");
        assert_eq!(question.kind(), QuestionType::MultipleChoice);
        assert!(question.is_required());
        assert!(question.allows_other());
        assert!(question.next_step_on_answer());
        assert_eq!(question.options()[1].choice_value(), "blue");
        assert!(question.has_jump());
    }
}
