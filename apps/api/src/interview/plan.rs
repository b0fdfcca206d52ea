//! Tech plan construction: flattens the candidate's categorized stack into the
//! ordered list of technologies the interview walks through.

use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::candidate::TechStackCategory;
use crate::models::interview::{ProficiencyLevel, TechPlanEntry};

/// Builds the interview plan in category order, then within-category order.
///
/// Entries with a missing name, or a missing or unrecognised proficiency, are
/// skipped. Duplicate names across categories are kept as separate entries.
pub fn build_tech_plan(stack: &[TechStackCategory]) -> Result<Vec<TechPlanEntry>, AppError> {
    let mut plan = Vec::new();

    for category in stack {
        for tech in &category.technologies {
            let Some(name) = tech.name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };
            let Some(raw_level) = tech.proficiency.as_deref().filter(|p| !p.is_empty()) else {
                continue;
            };
            let Some(proficiency) = ProficiencyLevel::parse(raw_level) else {
                warn!(
                    "Skipping {name} in category {}: unknown proficiency {raw_level:?}",
                    category.category
                );
                continue;
            };

            debug!("Plan entry: {name} ({proficiency})");
            plan.push(TechPlanEntry::new(name, proficiency));
        }
    }

    if plan.is_empty() {
        return Err(AppError::EmptyPlan);
    }
    Ok(plan)
}
