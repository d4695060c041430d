//! Dashboard aggregates over a user's experiences.

use serde::Serialize;
use utoipa::ToSchema;

use super::{DiningExperience, ExperienceStatus};

/// Summary counts and average rating for a list of experiences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceStats {
    pub total: usize,
    pub completed: usize,
    pub upcoming: usize,
    pub cancelled: usize,
    /// Mean of present ratings rounded half-up to one decimal; `0` when
    /// nothing is rated.
    pub avg_rating: f64,
}

/// Compute [`ExperienceStats`] for `experiences`.
///
/// Unrated experiences do not count towards the average. The result does not
/// depend on input order.
///
/// # Examples
/// ```
/// use eatopia::domain::{ExperienceStats, aggregate};
///
/// assert_eq!(aggregate(&[]), ExperienceStats::default());
/// ```
pub fn aggregate(experiences: &[DiningExperience]) -> ExperienceStats {
    let mut stats = ExperienceStats {
        total: experiences.len(),
        ..ExperienceStats::default()
    };
    let mut rating_sum: u64 = 0;
    let mut rated: u64 = 0;

    for experience in experiences {
        match experience.status() {
            ExperienceStatus::Upcoming => stats.upcoming += 1,
            ExperienceStatus::Completed => stats.completed += 1,
            ExperienceStatus::Cancelled => stats.cancelled += 1,
        }
        if let Some(rating) = experience.rating() {
            rating_sum += u64::from(rating.get());
            rated += 1;
        }
    }

    stats.avg_rating = rounded_mean(rating_sum, rated);
    stats
}

/// Half-up rounding to tenths in integer arithmetic so `1.95` becomes `2.0`
/// rather than falling foul of binary floating point.
fn rounded_mean(sum: u64, count: u64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let tenths = (20 * sum + count) / (2 * count);
    // Ratings cap at 5, so tenths never exceed 50.
    let tenths = u32::try_from(tenths).unwrap_or(u32::MAX);
    f64::from(tenths) / 10.0
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(9, 2, 4.5)]
    #[case(39, 20, 2.0)]
    #[case(10, 3, 3.3)]
    #[case(11, 3, 3.7)]
    #[case(0, 0, 0.0)]
    fn rounds_half_up_to_one_decimal(#[case] sum: u64, #[case] count: u64, #[case] expected: f64) {
        assert!((rounded_mean(sum, count) - expected).abs() < f64::EPSILON);
    }
}
