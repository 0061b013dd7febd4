use std::collections::{HashSet, VecDeque};

use flow_form_types::{
    AnswerValue, Answers, FileInfo, FormConfig, FormDefinition, FormError, Language, Question,
    QuestionType, SUBMIT_TARGET, StepRef,
};
use tracing::debug;

use crate::event::FormEvent;
use crate::path::{ActivePath, resolve_active_path};
use crate::progress::Progress;
use crate::registry::BehaviorRegistry;
use crate::timer::Timer;

/// The navigation controller of a conversational form.
///
/// Owns every question, the active path and the position in it. A renderer
/// edits answers through the `set_*` methods, confirms with [`enter`], and
/// reads back the active question, progress and queued [`FormEvent`]s.
///
/// The active index ranges over `0..=path length`; the upper bound is the
/// submit step past the last question. Once submitted, navigation and edits
/// are no-ops.
///
/// [`enter`]: Self::enter
#[derive(Debug)]
pub struct Form {
    questions: Vec<Question>,
    path: Vec<usize>,
    active_index: usize,
    completed: bool,
    submitted: bool,
    disabled: bool,
    pending_advance: Option<usize>,
    timer: Timer,
    config: FormConfig,
    language: Language,
    registry: BehaviorRegistry,
    events: VecDeque<FormEvent>,
}

impl Form {
    /// Build a form with the built-in question behaviors.
    pub fn new(definition: FormDefinition) -> Result<Self, FormError> {
        Self::with_registry(definition, BehaviorRegistry::builtin())
    }

    /// Build a form with custom question behaviors.
    ///
    /// Assigns missing ids, rejects duplicates, normalizes every question and
    /// marks valid pre-filled answers as answered.
    pub fn with_registry(
        definition: FormDefinition,
        registry: BehaviorRegistry,
    ) -> Result<Self, FormError> {
        let FormDefinition {
            mut questions,
            language,
            config,
        } = definition;

        let mut seen = HashSet::new();
        for (position, question) in questions.iter_mut().enumerate() {
            question.assign_id(position);
            if !seen.insert(question.id().to_string()) {
                return Err(FormError::DuplicateId(question.id().to_string()));
            }

            question.prepare();
            let behavior = registry.get(question.kind());
            let answered = behavior.has_value(question) && behavior.is_valid(question, &language);
            question.set_answered(answered);
        }

        let mut form = Self {
            questions,
            path: Vec::new(),
            active_index: 0,
            completed: false,
            submitted: false,
            disabled: false,
            pending_advance: None,
            timer: Timer::new(),
            config,
            language,
            registry,
            events: VecDeque::new(),
        };

        form.recompute(0);
        form.check_timer();
        debug!(
            questions = form.questions.len(),
            active = form.path.len(),
            "Form ready"
        );

        Ok(form)
    }

    // === Read access ===

    /// All questions in declaration order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Questions of the active path, in path order.
    pub fn active_path(&self) -> impl Iterator<Item = &Question> {
        self.path.iter().map(|&position| &self.questions[position])
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The question at the active index; `None` on the submit step.
    pub fn active_question(&self) -> Option<&Question> {
        self.active_position().map(|position| &self.questions[position])
    }

    /// The active question's id, `_submit` on the submit step.
    pub fn active_question_id(&self) -> Option<&str> {
        if self.is_on_last_step() {
            return Some(SUBMIT_TARGET);
        }
        self.active_question().map(Question::id)
    }

    /// Past the last question of a non-empty path.
    pub fn is_on_last_step(&self) -> bool {
        !self.path.is_empty() && self.active_index == self.path.len()
    }

    pub fn num_active_questions(&self) -> usize {
        self.path.len()
    }

    pub fn num_completed_questions(&self) -> usize {
        self.active_path().filter(|q| q.is_answered()).count()
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.num_completed_questions(), self.num_active_questions())
    }

    pub fn percent_completed(&self) -> u8 {
        self.progress().percent()
    }

    /// The localized progress label, e.g. `50% completed`.
    pub fn percent_label(&self) -> String {
        self.language.percent_label(self.percent_completed())
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Input is suppressed while an auto-advance is pending.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn elapsed(&self) -> u64 {
        self.timer.elapsed()
    }

    pub fn formatted_time(&self) -> String {
        self.timer.formatted()
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn registry(&self) -> &BehaviorRegistry {
        &self.registry
    }

    pub fn has_value(&self, id: &str) -> bool {
        self.question(id)
            .is_some_and(|q| self.registry.get(q.kind()).has_value(q))
    }

    pub fn is_valid(&self, id: &str) -> bool {
        self.question(id)
            .is_some_and(|q| self.registry.get(q.kind()).is_valid(q, &self.language))
    }

    pub fn show_invalid(&self, id: &str) -> bool {
        self.question(id)
            .is_some_and(|q| self.registry.get(q.kind()).show_invalid(q, &self.language))
    }

    pub fn error_message(&self, id: &str) -> Option<String> {
        let question = self.question(id)?;
        self.registry
            .get(question.kind())
            .error_message(question, &self.language)
    }

    /// Answers of every answered question on the active path.
    pub fn answers(&self) -> Answers {
        self.active_path()
            .filter(|q| q.is_answered())
            .map(|q| (q.id().to_string(), q.answer().clone()))
            .collect()
    }

    /// Take all queued events in emission order.
    pub fn drain_events(&mut self) -> Vec<FormEvent> {
        self.events.drain(..).collect()
    }

    // === Edits ===

    /// Store a new answer for the question `id`.
    pub fn set_answer(&mut self, id: &str, value: impl Into<AnswerValue>) -> bool {
        let value = value.into();
        self.edit(id, |question| {
            question.set_answer(value);
            if question.kind().has_options() {
                question.reset_options();
            }
            true
        })
        .is_some()
    }

    /// Select or deselect an option. Single-select questions that advance
    /// on answer move on by themselves.
    pub fn toggle_option(&mut self, id: &str, value: &str) -> bool {
        let Some(position) = self.edit(id, |question| question.toggle_option(value)) else {
            return false;
        };
        self.auto_advance(position);
        true
    }

    /// Set the free-text value next to the fixed options.
    pub fn set_other(&mut self, id: &str, text: impl Into<String>) -> bool {
        let text = text.into();
        self.edit(id, |question| question.set_other(text)).is_some()
    }

    /// Fill one field of a composite question.
    pub fn set_subanswer(&mut self, id: &str, sub_id: &str, text: impl Into<String>) -> bool {
        let text = text.into();
        self.edit(id, |question| question.set_subanswer(sub_id, text))
            .is_some()
    }

    /// Pick a column in a matrix row.
    pub fn set_matrix_cell(&mut self, id: &str, row: &str, column: &str) -> bool {
        self.edit(id, |question| question.set_matrix_cell(row, column))
            .is_some()
    }

    /// Replace the files attached to a file question.
    pub fn attach_files(&mut self, id: &str, files: Vec<FileInfo>) -> bool {
        self.edit(id, |question| {
            if question.kind() != QuestionType::File {
                return false;
            }
            question.set_answer(files);
            true
        })
        .is_some()
    }

    fn edit(&mut self, id: &str, apply: impl FnOnce(&mut Question) -> bool) -> Option<usize> {
        if self.submitted {
            debug!(id, "Edit ignored, form already submitted");
            return None;
        }

        let position = self.position_of(id)?;
        let behavior = self.registry.get(self.questions[position].kind());
        let question = &mut self.questions[position];
        if !apply(question) {
            return None;
        }

        question.interaction_mut().dirty = true;
        let answered = behavior.is_valid(question, &self.language);
        question.set_answered(answered);

        if !answered && self.path.contains(&position) {
            self.set_completed(false);
        }

        // A branch behind the active question decides what comes next.
        if self.questions[position].has_jump()
            && self
                .path
                .iter()
                .position(|&p| p == position)
                .is_some_and(|serial| serial < self.active_index)
        {
            self.reroute();
        }

        Some(position)
    }

    // === Navigation ===

    /// Confirm the active question, or submit from the submit step.
    ///
    /// A valid answer is accepted and the form moves on; an invalid one stays
    /// put and is flagged for display.
    pub fn enter(&mut self) {
        if self.submitted || self.disabled {
            return;
        }

        let Some(position) = self.active_position() else {
            if self.completed && self.is_on_last_step() {
                self.submit();
            }
            return;
        };

        let behavior = self.registry.get(self.questions[position].kind());
        let question = &mut self.questions[position];
        question.interaction_mut().enter_pressed = true;
        let fixed = behavior.fix_answer(question);
        question.set_answer(fixed);

        let valid = behavior.is_valid(question, &self.language);
        question.set_answered(valid);
        if !valid {
            debug!(id = question.id(), "Answer rejected");
            self.set_completed(false);
            return;
        }

        if question.is_multiple_choice()
            && question.next_step_on_answer()
            && !question.is_multiple()
        {
            self.begin_auto_advance(position);
        } else {
            self.accept(position);
        }
    }

    /// Finish a pending auto-advance: accept the question and re-enable
    /// input. Renderers call this once their transition is done.
    pub fn finish_auto_advance(&mut self) {
        let Some(position) = self.pending_advance.take() else {
            return;
        };

        self.disabled = false;
        if !self.submitted
            && self.active_position() == Some(position)
            && self.questions[position].is_answered()
        {
            self.accept(position);
        }
        self.events.push_back(FormEvent::Disable(false));
    }

    /// Whether moving forward is currently allowed.
    pub fn is_next_question_available(&self) -> bool {
        if self.submitted || self.disabled {
            return false;
        }

        match self.active_question() {
            Some(question) => {
                !question.is_required()
                    || self
                        .registry
                        .get(question.kind())
                        .is_valid(question, &self.language)
            }
            None => self.completed,
        }
    }

    pub fn go_to_next_question(&mut self) {
        if self.is_next_question_available() {
            self.enter();
        } else if !self.submitted
            && !self.disabled
            && let Some(position) = self.active_position()
        {
            self.questions[position].interaction_mut().enter_pressed = true;
        }
    }

    pub fn go_to_previous_question(&mut self) {
        if self.submitted || self.active_index == 0 {
            return;
        }

        if self.config.timer && self.is_on_timer_stop_step() {
            self.timer.start();
        }

        self.active_index -= 1;
        debug!(active_index = self.active_index, "Moved back");
        self.check_timer();
        self.emit_step();
    }

    /// Jump to a question of the active path by id or serial index.
    ///
    /// Unknown ids keep the current position. The target is pulled back to
    /// the first unanswered question before it, and the submit step cannot be
    /// addressed directly.
    pub fn go_to_question(&mut self, step: impl Into<StepRef>) {
        if self.submitted {
            return;
        }

        let index = match step.into() {
            StepRef::Index(index) => index,
            StepRef::Id(id) => self
                .path
                .iter()
                .position(|&position| self.questions[position].id() == id)
                .unwrap_or(self.active_index),
        };

        if index == self.active_index || index >= self.path.len() {
            return;
        }

        let index = index.min(self.first_unanswered().unwrap_or(index));
        if index != self.active_index {
            self.active_index = index;
            debug!(active_index = index, "Moved to question");
            self.check_timer();
            self.emit_step();
        }
    }

    /// Submit a completed form. Ignored unless completed and not yet
    /// submitted.
    pub fn submit(&mut self) {
        if self.submitted || !self.completed {
            debug!(
                completed = self.completed,
                submitted = self.submitted,
                "Submit ignored"
            );
            return;
        }

        self.submitted = true;
        self.timer.stop();
        let questions = self.active_path().cloned().collect();
        debug!(answers = self.num_completed_questions(), "Form submitted");
        self.events.push_back(FormEvent::Submit(questions));
    }

    /// Clear every answer and return to the first question. A submitted form
    /// stays submitted.
    pub fn reset(&mut self) {
        for question in &mut self.questions {
            question.reset_answer();
        }

        self.pending_advance = None;
        if self.disabled {
            self.disabled = false;
            self.events.push_back(FormEvent::Disable(false));
        }

        if self.submitted {
            let ActivePath { nodes, .. } = resolve_active_path(&mut self.questions, 0);
            self.path = nodes;
            self.active_index = 0;
            self.set_completed(false);
            debug!("Answers cleared on submitted form");
            return;
        }

        self.recompute(0);
        self.set_completed(false);
        debug!("Form reset");
        self.check_timer();
        self.emit_step();
    }

    /// Count one second of the timer. Owners call this once per second,
    /// see [`Ticker`](crate::Ticker).
    pub fn tick(&mut self) {
        if let Some(seconds) = self.timer.tick() {
            self.events.push_back(FormEvent::Timer {
                seconds,
                formatted: self.timer.formatted(),
            });
        }
    }

    // === Internals ===

    fn position_of(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id() == id)
    }

    fn active_position(&self) -> Option<usize> {
        self.path.get(self.active_index).copied()
    }

    /// Serial index of the first unanswered question on the path.
    fn first_unanswered(&self) -> Option<usize> {
        self.path
            .iter()
            .position(|&position| !self.questions[position].is_answered())
    }

    fn auto_advance(&mut self, position: usize) {
        if self.disabled || self.active_position() != Some(position) {
            return;
        }

        let question = &self.questions[position];
        if !question.next_step_on_answer() || question.is_multiple() || !question.is_answered() {
            return;
        }

        if question.is_multiple_choice() {
            self.begin_auto_advance(position);
        } else if question.kind().is_scale() {
            self.accept(position);
        }
    }

    fn begin_auto_advance(&mut self, position: usize) {
        debug!(id = self.questions[position].id(), "Auto-advance pending");
        self.disabled = true;
        self.pending_advance = Some(position);
        self.events.push_back(FormEvent::Disable(true));
    }

    fn accept(&mut self, position: usize) {
        let id = self.questions[position].id().to_string();
        debug!(id, "Answer accepted");
        self.questions[position].set_answered(true);
        self.events.push_back(FormEvent::Answer { id });

        if self.active_index < self.path.len() {
            self.active_index += 1;
        }

        self.recompute(self.active_index);
        self.check_timer();
        self.emit_step();
    }

    /// Recompute the path in place after an edit and report a moved step.
    fn reroute(&mut self) {
        let before = (
            self.active_index,
            self.active_question_id().map(str::to_string),
        );
        self.recompute(self.active_index);
        debug!(active = self.path.len(), "Path rerouted by edit");

        if before != (self.active_index, self.active_question_id().map(str::to_string)) {
            self.check_timer();
            self.emit_step();
        }
    }

    fn recompute(&mut self, requested: usize) {
        let ActivePath {
            nodes,
            active_index,
        } = resolve_active_path(&mut self.questions, requested);
        self.path = nodes;
        self.settle(active_index);
    }

    /// Place the active index after a path change. The submit step is only
    /// reachable with every question answered; otherwise the index is pulled
    /// back to the first unanswered question.
    fn settle(&mut self, requested: usize) {
        let len = self.path.len();
        let first_unanswered = self.first_unanswered();

        if requested >= len {
            match first_unanswered {
                Some(index) => {
                    self.active_index = index;
                    self.set_completed(false);
                }
                None if len > 0 => {
                    self.active_index = len;
                    self.set_completed(true);
                }
                None => self.active_index = 0,
            }
        } else {
            self.active_index = requested.min(first_unanswered.unwrap_or(len));
            if first_unanswered.is_some() {
                self.set_completed(false);
            }
        }
    }

    fn set_completed(&mut self, completed: bool) {
        if self.completed != completed {
            self.completed = completed;
            debug!(completed, "Completion changed");
            self.events.push_back(FormEvent::Complete(completed));
        }
    }

    fn emit_step(&mut self) {
        let id = self.active_question_id().map(str::to_string);
        self.events.push_back(FormEvent::Step {
            id,
            index: self.active_index,
        });
    }

    fn is_on_timer_stop_step(&self) -> bool {
        self.submitted
            || self
                .config
                .timer_stop_step
                .as_ref()
                .is_some_and(|step| step.matches(self.active_question_id(), self.active_index))
    }

    fn check_timer(&mut self) {
        if !self.config.timer {
            return;
        }
        if self.submitted {
            self.timer.stop();
            return;
        }

        let id = self.active_question_id();
        let on_start = match &self.config.timer_start_step {
            Some(step) => step.matches(id, self.active_index),
            None => !self.timer.is_running() && self.active_index == 0,
        };
        let on_stop = self
            .config
            .timer_stop_step
            .as_ref()
            .is_some_and(|step| step.matches(id, self.active_index));

        if on_start {
            self.timer.start();
        } else if on_stop {
            self.timer.stop();
        }
    }
}
