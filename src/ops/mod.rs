//! Algorithms over whole repertoire trees.
//!
//! * [merge] - fold several trees into one, matching moves by their text
//! * [transposition] - collapse positions reached by different move orders
//! * [extract] - split a subtree off into a tree of its own
//! * [edit] - add a move, delete a node, set a comment
//!
//! All operations work on trees in memory and never touch storage; see
//! [service](crate::service) for the variants that do.

pub mod edit;
pub mod extract;
pub mod merge;
pub mod transposition;

pub use edit::{add_move, delete_node, set_comment};
pub use extract::{Extraction, extract};
pub use merge::{merge_children, merge_into, merge_trees};
pub use transposition::{CanonicalizeReport, canonicalize};
