//! Restaurant suggestions generated from a dining plan.

use serde::Serialize;
use utoipa::ToSchema;

use super::wizard::DiningPlan;

/// Generated suggestions for one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub title: String,
    pub text: String,
}

/// Prompt asking the model for restaurants matching `plan`.
pub fn recommendation_prompt(plan: &DiningPlan) -> String {
    let date_time = &plan.date_time;
    format!(
        "You are a helpful restaurant recommendation assistant. Based on the following user \
         preferences in {location}, provide personalized restaurant recommendations:\n\n\
         User preferences: a {vibe} outing for {group} on {date} at {time}.\n\n\
         Please provide:\n\
         1. 3-5 restaurant recommendations\n\
         2. Brief description of each restaurant's cuisine and atmosphere\n\
         3. Why each recommendation matches the user's preferences\n\
         4. Estimated price range ($ to $$$$)",
        location = plan.location,
        vibe = plan.vibe.label().to_lowercase(),
        group = plan.group_type.as_str(),
        date = date_time.date.format("%A, %B %-d, %Y"),
        time = date_time.time,
    )
}
