//! Feasibility checking
//!
//! A recipe is feasible for a home when every mandatory requirement is met
//! or exceeded by the quantity on hand. Optional requirements are ignored.
//! Units are not converted: amounts are compared as raw numbers.

use serde::Serialize;
use tracing::debug;

use crate::domain::{Amount, IngredientId, IngredientRequirement, Inventory};

/// Outcome of checking one recipe against one inventory
///
/// Infeasible verdicts name the first mandatory requirement that failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Feasibility {
    Feasible,

    /// The ingredient has no inventory entry at all
    Missing { ingredient: IngredientId },

    /// The ingredient is stocked but below the required amount
    Short {
        ingredient: IngredientId,
        required: Amount,
        available: Amount,
    },
}

impl Feasibility {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Feasibility::Feasible)
    }

    /// The ingredient that blocked the recipe, if any
    pub fn blocking_ingredient(&self) -> Option<&IngredientId> {
        match self {
            Feasibility::Feasible => None,
            Feasibility::Missing { ingredient } | Feasibility::Short { ingredient, .. } => {
                Some(ingredient)
            }
        }
    }
}

/// Checks the mandatory requirements against the inventory
///
/// Stops at the first requirement that can't be met.
pub fn check<'a>(
    requirements: impl IntoIterator<Item = &'a IngredientRequirement>,
    inventory: &Inventory,
) -> Feasibility {
    for req in requirements.into_iter().filter(|r| r.mandatory) {
        let Some(entry) = inventory.get(&req.ingredient) else {
            return Feasibility::Missing {
                ingredient: req.ingredient.clone(),
            };
        };

        if entry.unit != req.unit {
            debug!(
                ingredient = %req.ingredient,
                required_unit = %req.unit,
                stocked_unit = %entry.unit,
                "Unit mismatch, comparing raw amounts"
            );
        }

        if entry.quantity < req.amount {
            return Feasibility::Short {
                ingredient: req.ingredient.clone(),
                required: req.amount,
                available: entry.quantity,
            };
        }
    }

    Feasibility::Feasible
}

/// Returns true if every mandatory requirement is satisfiable from stock
pub fn is_feasible<'a>(
    requirements: impl IntoIterator<Item = &'a IngredientRequirement>,
    inventory: &Inventory,
) -> bool {
    check(requirements, inventory).is_feasible()
}
