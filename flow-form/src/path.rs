//! Active path resolution.
//!
//! The active path is the subsequence of questions reachable from the first
//! one given the current answers. Resolution is a single forward pass with
//! one cursor and one visited check:
//!
//! - questions without a jump fall through to the next declared question,
//! - an unanswered question with a jump ends the path (nothing after it is
//!   reachable yet),
//! - an answered question with a jump continues at its target, ends the path
//!   on the submit target, and falls through when the target is unknown,
//! - a jump back to a question already on the path marks the jumping
//!   question unanswered, moves the active index to the target and ends the
//!   path,
//! - reaching a question a second time ends the path.
//!
//! Each step either adds a new question or stops, so resolution takes at most
//! as many steps as there are questions.

use flow_form_types::{Question, SUBMIT_TARGET};
use tracing::{debug, warn};

/// Result of a path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePath {
    /// Declaration positions of the reachable questions, in path order.
    pub nodes: Vec<usize>,

    /// The active index after resolution; redirected by backward jumps.
    pub active_index: usize,
}

impl ActivePath {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Serial index of the question declared at `position`.
    pub fn serial_index(&self, position: usize) -> Option<usize> {
        self.nodes.iter().position(|&node| node == position)
    }
}

/// Compute the active path through `questions`.
///
/// Assigns each reachable question its serial index and clears `answered`
/// on questions whose jump points back into the path.
pub fn resolve_active_path(questions: &mut [Question], active_index: usize) -> ActivePath {
    let count = questions.len();
    let mut nodes = Vec::with_capacity(count);
    let mut on_path = vec![false; count];
    let mut active_index = active_index;
    let mut position = 0;

    while position < count {
        if on_path[position] {
            warn!(
                id = questions[position].id(),
                "Jump cycle detected, truncating active path"
            );
            break;
        }

        let question = &mut questions[position];
        question.set_index(nodes.len());
        nodes.push(position);
        on_path[position] = true;

        if !question.has_jump() {
            position += 1;
            continue;
        }

        if !question.is_answered() {
            break;
        }

        let Some(target) = question.jump_target() else {
            position += 1;
            continue;
        };

        if target == SUBMIT_TARGET {
            debug!(id = question.id(), "Jump to submit");
            break;
        }

        match questions.iter().position(|q| q.id() == target) {
            None => {
                warn!(
                    id = questions[position].id(),
                    jump_target = %target,
                    "Jump target not found, continuing in order"
                );
                position += 1;
            }
            Some(target_position) if on_path[target_position] => {
                let redirect = questions[target_position].index();
                let question = &mut questions[position];
                debug!(
                    id = question.id(),
                    jump_target = %target,
                    active_index = redirect,
                    "Backward jump, question must be answered again"
                );
                question.set_answered(false);
                active_index = redirect;
                // The jumping question is now an unanswered gate; stopping
                // here keeps resolution idempotent.
                break;
            }
            Some(target_position) => position = target_position,
        }
    }

    debug!(
        path = ?nodes.iter().map(|&p| questions[p].id()).collect::<Vec<_>>(),
        active_index,
        "Resolved active path"
    );

    ActivePath {
        nodes,
        active_index,
    }
}

#[cfg(test)]
mod tests {
    use flow_form_types::{Jump, QuestionType};

    use super::*;

    fn question(id: &str) -> Question {
        Question::new(QuestionType::Text, id).with_id(id).required()
    }

    fn answered(mut question: Question, answer: &str) -> Question {
        question.set_answer(answer);
        question.set_answered(true);
        question
    }

    fn ids(questions: &[Question], path: &ActivePath) -> Vec<String> {
        path.nodes
            .iter()
            .map(|&p| questions[p].id().to_string())
            .collect()
    }

    #[test]
    fn sequential_without_jumps() {
        let mut questions = vec![question("a"), question("b"), question("c")];
        let path = resolve_active_path(&mut questions, 1);

        assert_eq!(ids(&questions, &path), ["a", "b", "c"]);
        assert_eq!(path.active_index, 1);
        assert_eq!(
            questions.iter().map(Question::index).collect::<Vec<_>>(),
            [0, 1, 2]
        );
    }

    #[test]
    fn forward_jump_skips_questions() {
        let mut questions = vec![
            answered(question("a").with_jump(Jump::map([("yes", "c")])), "yes"),
            question("b"),
            question("c"),
            question("d"),
        ];
        let path = resolve_active_path(&mut questions, 0);

        assert_eq!(ids(&questions, &path), ["a", "c", "d"]);
        assert_eq!(questions[2].index(), 1);
    }

    #[test]
    fn unanswered_jump_gate_truncates() {
        let mut questions = vec![
            question("a"),
            question("b").with_jump(Jump::map([("yes", "d")])),
            question("c"),
            question("d"),
        ];
        let path = resolve_active_path(&mut questions, 0);
        assert_eq!(ids(&questions, &path), ["a", "b"]);
    }

    #[test]
    fn unmatched_answer_falls_through() {
        let mut questions = vec![
            answered(question("a").with_jump(Jump::map([("yes", "c")])), "no"),
            question("b"),
            question("c"),
        ];
        let path = resolve_active_path(&mut questions, 0);
        assert_eq!(ids(&questions, &path), ["a", "b", "c"]);
    }

    #[test]
    fn other_key_catches_remaining_answers() {
        let mut questions = vec![
            answered(
                question("a").with_jump(Jump::map([("yes", "b"), ("_other", "c")])),
                "maybe",
            ),
            question("b"),
            question("c"),
        ];
        let path = resolve_active_path(&mut questions, 0);
        assert_eq!(ids(&questions, &path), ["a", "c"]);
    }

    #[test]
    fn submit_target_ends_path() {
        let mut questions = vec![
            answered(question("a").with_jump(Jump::map([("done", "_submit")])), "done"),
            question("b"),
        ];
        let path = resolve_active_path(&mut questions, 0);
        assert_eq!(ids(&questions, &path), ["a"]);
    }

    #[test]
    fn unknown_target_falls_through() {
        let mut questions = vec![
            answered(question("a").with_jump(Jump::map([("x", "nowhere")])), "x"),
            question("b"),
        ];
        let path = resolve_active_path(&mut questions, 0);
        assert_eq!(ids(&questions, &path), ["a", "b"]);
    }

    #[test]
    fn function_jump() {
        let jump = Jump::function(|q| (q.answer().as_text() == Some("skip")).then(|| "c".into()));
        let mut questions = vec![
            answered(question("a").with_jump(jump), "skip"),
            question("b"),
            question("c"),
        ];
        let path = resolve_active_path(&mut questions, 0);
        assert_eq!(ids(&questions, &path), ["a", "c"]);
    }

    #[test]
    fn empty_jump_map_counts_as_no_jump() {
        let mut questions = vec![
            question("a").with_jump(Jump::map(Vec::<(String, String)>::new())),
            question("b"),
        ];
        let path = resolve_active_path(&mut questions, 0);
        assert_eq!(ids(&questions, &path), ["a", "b"]);
    }

    #[test]
    fn self_loop_resets_answered_and_stops() {
        let mut questions = vec![
            answered(question("a").with_jump(Jump::map([("x", "a")])), "x"),
            question("b"),
        ];
        let path = resolve_active_path(&mut questions, 1);

        assert_eq!(ids(&questions, &path), ["a"]);
        assert!(!questions[0].is_answered());
        assert_eq!(path.active_index, 0);
    }

    #[test]
    fn backward_jump_redirects_to_target() {
        let mut questions = vec![
            answered(question("a"), "1"),
            answered(question("b"), "2"),
            answered(question("c").with_jump(Jump::map([("again", "a")])), "again"),
            question("d"),
        ];
        let path = resolve_active_path(&mut questions, 3);

        assert_eq!(ids(&questions, &path), ["a", "b", "c"]);
        assert!(!questions[2].is_answered());
        assert_eq!(path.active_index, 0);

        // Recomputing is stable.
        let again = resolve_active_path(&mut questions, path.active_index);
        assert_eq!(again, path);
    }

    #[test]
    fn jump_to_skipped_question_then_cycle_guard() {
        // a skips b, c sends us back to b, b falls through into c again.
        let mut questions = vec![
            answered(question("a").with_jump(Jump::map([("go", "c")])), "go"),
            answered(question("b"), "ok"),
            answered(question("c").with_jump(Jump::map([("back", "b")])), "back"),
        ];
        let path = resolve_active_path(&mut questions, 0);
        assert_eq!(ids(&questions, &path), ["a", "c", "b"]);
    }

    #[test]
    fn empty_question_list() {
        let path = resolve_active_path(&mut [], 0);
        assert!(path.is_empty());
        assert_eq!(path.active_index, 0);
    }
}
