//! Conversation state and the pure pipeline steps over it
//!
//! Steps return partial [`StateUpdate`]s; the runtime folds them into the
//! state in the order given by a [`Graph`].

pub mod graph;
pub mod state;
pub mod steps;
pub mod update;

#[cfg(test)]
mod proptests;

pub use graph::{Graph, Node, Route, RouteError, Step};
pub use state::{ConversationState, Message, Metadata, Role};
pub use steps::{admit_input, apply_reply, plan_reply, refresh_metadata, ReplyPlan};
pub use update::StateUpdate;
