//! Transition table between pipeline steps
//!
//! The engine walks a [`Graph`] from its entry step until it reaches
//! [`Node::End`]. [`Graph::linear`] is the table the engine uses. The
//! input-gated table ends the turn right after admission when the input is
//! blank; it is available only to callers that opt in explicitly.

use super::state::ConversationState;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// A pipeline step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    AdmitInput,
    GenerateReply,
    RefreshMetadata,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::AdmitInput, Step::GenerateReply, Step::RefreshMetadata];

    pub fn name(self) -> &'static str {
        match self {
            Step::AdmitInput => "admit_input",
            Step::GenerateReply => "generate_reply",
            Step::RefreshMetadata => "refresh_metadata",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where control goes after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Step(Step),
    End,
}

/// Outcome of a routing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Process,
    Skip,
}

/// Routing decision over the state as it stands after the source step
pub type Decide = fn(&ConversationState) -> Route;

/// Outgoing edge of a step
#[derive(Debug, Clone, Copy)]
pub enum Edge {
    Always(Node),
    Branch {
        decide: Decide,
        process: Node,
        skip: Node,
    },
}

impl Edge {
    fn targets(&self) -> Vec<Node> {
        match *self {
            Edge::Always(node) => vec![node],
            Edge::Branch { process, skip, .. } => vec![process, skip],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("step {0} is reachable but has no outgoing edge")]
    MissingEdge(Step),
    #[error("cycle through step {0}")]
    Cycle(Step),
}

/// Route after admission: continue only if there is input to answer
pub fn should_process_input(state: &ConversationState) -> Route {
    if state.user_input.trim().is_empty() {
        Route::Skip
    } else {
        Route::Process
    }
}

/// Validated, acyclic transition table
#[derive(Debug, Clone)]
pub struct Graph {
    name: &'static str,
    entry: Step,
    edges: HashMap<Step, Edge>,
}

impl Graph {
    /// Build a table, rejecting dangling steps and cycles so every walk ends.
    pub fn new(
        name: &'static str,
        entry: Step,
        edges: impl IntoIterator<Item = (Step, Edge)>,
    ) -> Result<Self, RouteError> {
        let graph = Self {
            name,
            entry,
            edges: edges.into_iter().collect(),
        };
        graph.validate()?;
        Ok(graph)
    }

    /// Admission, reply generation, metadata refresh, unconditionally.
    pub fn linear() -> Self {
        Self {
            name: "linear",
            entry: Step::AdmitInput,
            edges: HashMap::from([
                (Step::AdmitInput, Edge::Always(Node::Step(Step::GenerateReply))),
                (Step::GenerateReply, Edge::Always(Node::Step(Step::RefreshMetadata))),
                (Step::RefreshMetadata, Edge::Always(Node::End)),
            ]),
        }
    }

    /// Like [`Graph::linear`], but blank input ends the turn after admission.
    pub fn input_gated() -> Self {
        Self {
            name: "input_gated",
            entry: Step::AdmitInput,
            edges: HashMap::from([
                (
                    Step::AdmitInput,
                    Edge::Branch {
                        decide: should_process_input,
                        process: Node::Step(Step::GenerateReply),
                        skip: Node::End,
                    },
                ),
                (Step::GenerateReply, Edge::Always(Node::Step(Step::RefreshMetadata))),
                (Step::RefreshMetadata, Edge::Always(Node::End)),
            ]),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn entry(&self) -> Step {
        self.entry
    }

    /// Successor of `step` given the state after `step` ran
    pub fn next(&self, step: Step, state: &ConversationState) -> Node {
        match self.edges.get(&step) {
            Some(Edge::Always(node)) => *node,
            Some(Edge::Branch {
                decide,
                process,
                skip,
            }) => match decide(state) {
                Route::Process => *process,
                Route::Skip => *skip,
            },
            // validate() guarantees every reachable step has an edge
            None => Node::End,
        }
    }

    fn validate(&self) -> Result<(), RouteError> {
        let mut done = HashSet::new();
        let mut on_path = HashSet::new();
        self.visit(self.entry, &mut on_path, &mut done)
    }

    fn visit(
        &self,
        step: Step,
        on_path: &mut HashSet<Step>,
        done: &mut HashSet<Step>,
    ) -> Result<(), RouteError> {
        if done.contains(&step) {
            return Ok(());
        }
        if !on_path.insert(step) {
            return Err(RouteError::Cycle(step));
        }
        let edge = self.edges.get(&step).ok_or(RouteError::MissingEdge(step))?;
        for target in edge.targets() {
            if let Node::Step(next) = target {
                self.visit(next, on_path, done)?;
            }
        }
        on_path.remove(&step);
        done.insert(step);
        Ok(())
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::linear()
    }
}
