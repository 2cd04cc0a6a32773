//! # Recipe Suggestion Engine
//!
//! Picks one recipe for a home to cook next.
//!
//! | Stage | Module | Input | Output |
//! |-------|--------|-------|--------|
//! | Rank | [`ranker`] | favourites | least recently cooked first |
//! | Check | [`feasibility`] | requirements + inventory | [`Feasibility`] |
//! | Select | [`selector`] | ranked favourites | first feasible [`Suggestion`] |
//!
//! The engine is pure: it reads a snapshot handed to it by the caller and
//! never touches storage or mutates anything. An empty result is not an
//! error; it means nothing on the favourites list can be cooked right now.

pub mod ranker;
pub mod feasibility;
pub mod selector;

pub use feasibility::{check, is_feasible, Feasibility};
pub use ranker::rank;
pub use selector::{explain, suggest, suggest_for_home, Candidate, RecipeBook, Suggestion};
