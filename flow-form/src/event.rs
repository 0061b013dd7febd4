use flow_form_types::Question;

/// Notification for the renderer, queued in emission order and drained
/// with [`Form::drain_events`](crate::Form::drain_events).
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// A question passed validation and was accepted.
    Answer { id: String },

    /// Navigation settled. `id` is the active question, `_submit` past the
    /// last question, or `None` for an empty form; `index` is its serial
    /// index in the active path. Renderers read the node itself from
    /// [`Form::active_question`](crate::Form::active_question).
    Step { id: Option<String>, index: usize },

    /// The completed state flipped.
    Complete(bool),

    /// The form was submitted with the questions of the active path.
    Submit(Vec<Question>),

    /// One second elapsed while the timer runs.
    Timer { seconds: u64, formatted: String },

    /// Suppress input while an auto-advance is pending.
    Disable(bool),
}

impl FormEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Answer { .. } => "answer",
            Self::Step { .. } => "step",
            Self::Complete(_) => "complete",
            Self::Submit(_) => "submit",
            Self::Timer { .. } => "timer",
            Self::Disable(_) => "disable",
        }
    }
}
