use log::debug;

use crate::config::BusyPolicy;
use crate::graph::{Graph, NodeId};

/// The four logical navigation inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    SelectPrevious,
    SelectNext,
    CommitForward,
    CommitBackward,
}

impl Command {
    fn is_commit(self) -> bool {
        matches!(self, Self::CommitForward | Self::CommitBackward)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    Transitioning,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransitionKind {
    /// The current node changed.
    Move,
    /// Only the previewed neighbor changed.
    Rotate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TransitionRequest {
    pub node: NodeId,
    pub kind: TransitionKind,
}

/// Current node, tentative neighbor selection and the back-history.
///
/// Invariants: `history` is never empty and ends with `current`; `selected`
/// is `None` or an index into `current`'s neighbor list and is cleared on
/// every move.
#[derive(Clone, Debug)]
pub(crate) struct Navigation {
    current: NodeId,
    selected: Option<usize>,
    history: Vec<NodeId>,
    policy: BusyPolicy,
}

impl Navigation {
    pub(crate) fn new(start: NodeId, policy: BusyPolicy) -> Self {
        Self {
            current: start,
            selected: None,
            history: vec![start],
            policy,
        }
    }

    pub(crate) fn current(&self) -> NodeId {
        self.current
    }

    pub(crate) fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Selection as a signed index, `-1` meaning nothing is selected.
    pub(crate) fn selected_index(&self) -> isize {
        self.selected.map_or(-1, |index| index as isize)
    }

    /// The previewed neighbor, if any.
    pub(crate) fn target(&self, graph: &Graph) -> Option<NodeId> {
        self.selected
            .and_then(|index| graph.neighbors(self.current).get(index).copied())
    }

    pub(crate) fn history(&self) -> &[NodeId] {
        &self.history
    }

    pub(crate) fn policy(&self) -> BusyPolicy {
        self.policy
    }

    pub(crate) fn set_policy(&mut self, policy: BusyPolicy) {
        self.policy = policy;
    }

    /// Applies one input. Inputs that do not apply to the current state are
    /// dropped silently and leave the state untouched.
    pub(crate) fn handle(
        &mut self,
        graph: &Graph,
        command: Command,
        phase: Phase,
    ) -> Option<TransitionRequest> {
        if phase == Phase::Transitioning
            && self.policy == BusyPolicy::IgnoreCommits
            && command.is_commit()
        {
            debug!("dropping {command:?} while a transition is running");
            return None;
        }

        let neighbors = graph.neighbors(self.current);
        let count = neighbors.len();

        let request = match command {
            Command::SelectPrevious => {
                if count == 0 {
                    return None;
                }
                self.selected = Some(match self.selected {
                    None => count - 1,
                    Some(index) => (index + count - 1) % count,
                });
                TransitionRequest {
                    node: self.current,
                    kind: TransitionKind::Rotate,
                }
            }
            Command::SelectNext => {
                if count == 0 {
                    return None;
                }
                self.selected = Some(match self.selected {
                    None => 0,
                    Some(index) => (index + 1) % count,
                });
                TransitionRequest {
                    node: self.current,
                    kind: TransitionKind::Rotate,
                }
            }
            Command::CommitForward => {
                let target = neighbors.get(self.selected?).copied()?;
                self.current = target;
                self.selected = None;
                self.history.push(target);
                TransitionRequest {
                    node: target,
                    kind: TransitionKind::Move,
                }
            }
            Command::CommitBackward => {
                if self.history.len() <= 1 {
                    return None;
                }
                self.history.pop();
                self.current = *self.history.last()?;
                self.selected = None;
                TransitionRequest {
                    node: self.current,
                    kind: TransitionKind::Move,
                }
            }
        };

        debug!(
            "{command:?}: current {:?}, selected {}, history depth {}",
            self.current,
            self.selected_index(),
            self.history.len()
        );
        Some(request)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn line_graph() -> Graph {
        Graph::from_labels(&["A", "B", "C"], &[("A", "B"), ("B", "C")])
    }

    fn id(graph: &Graph, label: &str) -> NodeId {
        graph.find_by_label(label).unwrap()
    }

    fn assert_invariants(nav: &Navigation, graph: &Graph) {
        let count = graph.neighbors(nav.current()).len();
        if let Some(index) = nav.selected() {
            assert!(index < count);
        }
        assert_eq!(nav.history().last(), Some(&nav.current()));
        for pair in nav.history().windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn walks_a_line_graph_forward_and_back() {
        let graph = line_graph();
        let (a, b, c) = (id(&graph, "A"), id(&graph, "B"), id(&graph, "C"));
        let mut nav = Navigation::new(a, BusyPolicy::IgnoreCommits);

        let request = nav.handle(&graph, Command::SelectNext, Phase::Idle);
        assert_eq!(
            request,
            Some(TransitionRequest {
                node: a,
                kind: TransitionKind::Rotate
            })
        );
        assert_eq!(nav.selected_index(), 0);
        assert_eq!(nav.target(&graph), Some(b));

        let request = nav.handle(&graph, Command::CommitForward, Phase::Idle);
        assert_eq!(
            request,
            Some(TransitionRequest {
                node: b,
                kind: TransitionKind::Move
            })
        );
        assert_eq!(nav.current(), b);
        assert_eq!(nav.history(), &[a, b]);
        assert_eq!(nav.selected_index(), -1);

        nav.handle(&graph, Command::SelectNext, Phase::Idle);
        assert_eq!(nav.target(&graph), Some(a));
        nav.handle(&graph, Command::SelectNext, Phase::Idle);
        assert_eq!(nav.target(&graph), Some(c));

        let request = nav.handle(&graph, Command::CommitBackward, Phase::Idle);
        assert_eq!(request.map(|r| r.node), Some(a));
        assert_eq!(nav.current(), a);
        assert_eq!(nav.history(), &[a]);
        assert_eq!(nav.selected(), None);
    }

    #[test]
    fn select_previous_from_nothing_picks_the_last_neighbor() {
        let graph = line_graph();
        let b = id(&graph, "B");
        let mut nav = Navigation::new(b, BusyPolicy::IgnoreCommits);

        nav.handle(&graph, Command::SelectPrevious, Phase::Idle);
        assert_eq!(nav.selected(), Some(1));
        nav.handle(&graph, Command::SelectPrevious, Phase::Idle);
        assert_eq!(nav.selected(), Some(0));
        nav.handle(&graph, Command::SelectPrevious, Phase::Idle);
        assert_eq!(nav.selected(), Some(1));
    }

    #[test]
    fn isolated_node_ignores_everything() {
        let graph = Graph::fallback("Home");
        let home = graph.first().unwrap();
        let mut nav = Navigation::new(home, BusyPolicy::IgnoreCommits);

        for command in [
            Command::SelectPrevious,
            Command::SelectNext,
            Command::CommitForward,
            Command::CommitBackward,
        ] {
            assert_eq!(nav.handle(&graph, command, Phase::Idle), None);
            assert_eq!(nav.selected_index(), -1);
            assert_eq!(nav.current(), home);
            assert_eq!(nav.history(), &[home]);
        }
    }

    #[test]
    fn commit_forward_without_selection_is_a_no_op() {
        let graph = line_graph();
        let a = id(&graph, "A");
        let mut nav = Navigation::new(a, BusyPolicy::IgnoreCommits);
        assert_eq!(nav.handle(&graph, Command::CommitForward, Phase::Idle), None);
        assert_eq!(nav.history(), &[a]);
    }

    #[test]
    fn backward_at_root_is_a_no_op() {
        let graph = line_graph();
        let a = id(&graph, "A");
        let mut nav = Navigation::new(a, BusyPolicy::IgnoreCommits);
        nav.handle(&graph, Command::SelectNext, Phase::Idle);
        assert_eq!(nav.handle(&graph, Command::CommitBackward, Phase::Idle), None);
        assert_eq!(nav.selected(), Some(0));
    }

    #[test]
    fn commits_are_dropped_while_transitioning_by_default() {
        let graph = line_graph();
        let a = id(&graph, "A");
        let mut nav = Navigation::new(a, BusyPolicy::IgnoreCommits);

        assert!(nav.handle(&graph, Command::SelectNext, Phase::Transitioning).is_some());
        assert_eq!(nav.handle(&graph, Command::CommitForward, Phase::Transitioning), None);
        assert_eq!(nav.current(), a);
        assert_eq!(nav.selected(), Some(0));
    }

    #[test]
    fn supersede_policy_accepts_commits_mid_transition() {
        let graph = line_graph();
        let (a, b) = (id(&graph, "A"), id(&graph, "B"));
        let mut nav = Navigation::new(a, BusyPolicy::Supersede);

        nav.handle(&graph, Command::SelectNext, Phase::Transitioning);
        let request = nav.handle(&graph, Command::CommitForward, Phase::Transitioning);
        assert_eq!(request.map(|r| r.node), Some(b));
        assert_eq!(nav.current(), b);
    }

    fn command() -> impl Strategy<Value = Command> {
        prop_oneof![
            Just(Command::SelectPrevious),
            Just(Command::SelectNext),
            Just(Command::CommitForward),
            Just(Command::CommitBackward),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

        #[test]
        fn every_reachable_state_keeps_its_invariants(
            seed in any::<u64>(),
            probability in 0.0f64..=1.0,
            commands in proptest::collection::vec(command(), 0..80),
        ) {
            let graph = Graph::random(9, probability, seed);
            let mut nav = Navigation::new(graph.first().unwrap(), BusyPolicy::IgnoreCommits);

            for command in commands {
                let before = nav.history().len();
                let request = nav.handle(&graph, command, Phase::Idle);
                let after = nav.history().len();
                match (command, request) {
                    (Command::CommitForward, Some(_)) => {
                        prop_assert_eq!(after, before + 1);
                    }
                    (Command::CommitBackward, Some(_)) => {
                        prop_assert_eq!(after, before - 1);
                    }
                    _ => {
                        prop_assert_eq!(after, before);
                    }
                }
                assert_invariants(&nav, &graph);
            }
        }

        #[test]
        fn forward_moves_are_undone_by_as_many_backward_moves(
            seed in any::<u64>(),
            steps in 0usize..20,
        ) {
            let graph = Graph::random(9, 0.5, seed);
            let start = graph.first().unwrap();
            let mut nav = Navigation::new(start, BusyPolicy::IgnoreCommits);

            let mut moved = 0;
            for _ in 0..steps {
                nav.handle(&graph, Command::SelectNext, Phase::Idle);
                if nav.handle(&graph, Command::CommitForward, Phase::Idle).is_some() {
                    moved += 1;
                }
            }
            prop_assert_eq!(nav.history().len(), moved + 1);

            for _ in 0..moved {
                prop_assert!(nav.handle(&graph, Command::CommitBackward, Phase::Idle).is_some());
            }
            prop_assert_eq!(nav.current(), start);
            prop_assert_eq!(nav.history().len(), 1);
        }
    }
}
