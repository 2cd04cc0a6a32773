//! Candidate ranking
//!
//! Orders a home's favourites so the recipe that has gone longest without
//! being cooked comes first. Never-cooked favourites lead the list.

use crate::domain::Favourite;

/// Ranks favourites from least to most recently cooked
///
/// `None < Some(_)` for `Option<NaiveDate>`, so never-cooked favourites sort
/// ahead of every dated one. Equal dates fall back to recipe ID, which makes
/// the order independent of the input order.
pub fn rank<'a>(favourites: impl IntoIterator<Item = &'a Favourite>) -> Vec<&'a Favourite> {
    let mut ranked: Vec<&Favourite> = favourites.into_iter().collect();
    ranked.sort_by(|a, b| {
        a.last_cooked
            .cmp(&b.last_cooked)
            .then_with(|| a.recipe.cmp(&b.recipe))
    });
    ranked
}
