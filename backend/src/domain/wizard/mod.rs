//! Four-step dining wizard.
//!
//! The wizard walks `Location → DateTime → GroupType → Vibe` and produces a
//! [`DiningPlan`] once the last step advances. Each step gates on its own
//! pending selection. Entering a step, forwards or backwards, clears that
//! pending selection, so gating re-applies even when the accumulated plan
//! already holds a value for the step.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::experience::{ExperienceDetails, ExperienceDetailsDraft, ExperienceValidationError};

mod options;

pub use options::{BOOKABLE_DAYS, GroupType, TimeSlot, UnknownOption, Vibe, bookable_dates};

/// Wizard steps in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Location,
    DateTime,
    GroupType,
    Vibe,
}

impl WizardStep {
    /// One-based position shown to users.
    pub const fn number(self) -> u8 {
        match self {
            Self::Location => 1,
            Self::DateTime => 2,
            Self::GroupType => 3,
            Self::Vibe => 4,
        }
    }

    const fn previous(self) -> Option<Self> {
        match self {
            Self::Location => None,
            Self::DateTime => Some(Self::Location),
            Self::GroupType => Some(Self::DateTime),
            Self::Vibe => Some(Self::GroupType),
        }
    }
}

/// Reasons a wizard action was refused. The wizard state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("location must not be empty")]
    EmptyLocation,
    #[error("select a date")]
    MissingDate,
    #[error("select a time")]
    MissingTime,
    #[error("{date} is not a bookable date")]
    DateUnavailable { date: NaiveDate },
    #[error("select a group type")]
    MissingGroupType,
    #[error("select a vibe")]
    MissingVibe,
    #[error("expected the {expected:?} step but the wizard is on {actual:?}")]
    NotOnStep {
        expected: WizardStep,
        actual: WizardStep,
    },
    #[error("already on the first step")]
    AtFirstStep,
    #[error(transparent)]
    UnknownOption(#[from] UnknownOption),
}

impl WizardError {
    /// Field the error refers to, for client-side highlighting.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyLocation => Some("location"),
            Self::MissingDate | Self::DateUnavailable { .. } => Some("date"),
            Self::MissingTime => Some("time"),
            Self::MissingGroupType => Some("groupType"),
            Self::MissingVibe => Some("vibe"),
            Self::UnknownOption(option) => match option.kind {
                "time slot" => Some("time"),
                "group type" => Some("groupType"),
                "vibe" => Some("vibe"),
                _ => None,
            },
            Self::NotOnStep { .. } | Self::AtFirstStep => None,
        }
    }
}

/// Chosen date and time slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PlanDateTime {
    pub date: NaiveDate,
    #[schema(value_type = String, example = "7:00 PM")]
    pub time: TimeSlot,
}

impl PlanDateTime {
    /// Combined instant, interpreting the slot in UTC.
    pub fn instant(&self) -> DateTime<Utc> {
        self.date.and_time(self.time.time()).and_utc()
    }
}

/// Completed wizard output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiningPlan {
    pub location: String,
    pub date_time: PlanDateTime,
    pub group_type: GroupType,
    pub vibe: Vibe,
}

impl DiningPlan {
    /// Short description, e.g. `"Romantic couple outing in Boston"`.
    pub fn title(&self) -> String {
        format!(
            "{} {} outing in {}",
            self.vibe.label(),
            self.group_type.as_str(),
            self.location
        )
    }

    /// Turn the plan into an experience booked at `restaurant`.
    pub fn into_experience_details(
        self,
        restaurant: &str,
    ) -> Result<ExperienceDetails, ExperienceValidationError> {
        ExperienceDetails::new(ExperienceDetailsDraft {
            name: self.title(),
            restaurant: restaurant.to_owned(),
            location: self.location,
            date: Some(self.date_time.instant()),
            guests: self.group_type.implied_guests(),
            ..ExperienceDetailsDraft::default()
        })
    }
}

/// Whole-wizard payload used to replay every step at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanSubmission {
    #[serde(default)]
    pub location: String,
    pub date: Option<NaiveDate>,
    #[schema(example = "7:00 PM")]
    pub time: Option<String>,
    #[schema(example = "couple")]
    pub group_type: Option<String>,
    #[schema(example = "romantic")]
    pub vibe: Option<String>,
}

/// Outcome of [`DiningWizard::next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given step.
    Moved(WizardStep),
    /// The last step advanced and produced a plan.
    Completed(DiningPlan),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Selections {
    location: Option<String>,
    date: Option<NaiveDate>,
    time: Option<TimeSlot>,
    group_type: Option<GroupType>,
    vibe: Option<Vibe>,
}

/// Wizard state for one planning session.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use eatopia::domain::{Advance, DiningWizard, WizardStep};
///
/// let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("date");
/// let mut wizard = DiningWizard::new(today);
/// wizard.enter_location("   ").expect("location step");
/// assert!(wizard.next().is_err());
/// wizard.enter_location("Boston").expect("location step");
/// assert_eq!(wizard.next(), Ok(Advance::Moved(WizardStep::DateTime)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiningWizard {
    today: NaiveDate,
    step: WizardStep,
    accepted: Selections,
    pending: Selections,
}

impl DiningWizard {
    /// Start a wizard whose date list begins at `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            step: WizardStep::Location,
            accepted: Selections::default(),
            pending: Selections::default(),
        }
    }

    /// Current step.
    pub fn step(&self) -> WizardStep {
        self.step
    }

    /// Dates offered on the date/time step.
    pub fn available_dates(&self) -> Vec<NaiveDate> {
        bookable_dates(self.today)
    }

    /// Location accepted so far, kept when navigating back.
    pub fn accepted_location(&self) -> Option<&str> {
        self.accepted.location.as_deref()
    }

    fn require_step(&self, expected: WizardStep) -> Result<(), WizardError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(WizardError::NotOnStep {
                expected,
                actual: self.step,
            })
        }
    }

    pub fn enter_location(&mut self, text: &str) -> Result<(), WizardError> {
        self.require_step(WizardStep::Location)?;
        self.pending.location = Some(text.to_owned());
        Ok(())
    }

    pub fn select_date(&mut self, date: NaiveDate) -> Result<(), WizardError> {
        self.require_step(WizardStep::DateTime)?;
        if !self.available_dates().contains(&date) {
            return Err(WizardError::DateUnavailable { date });
        }
        self.pending.date = Some(date);
        Ok(())
    }

    pub fn select_time(&mut self, time: TimeSlot) -> Result<(), WizardError> {
        self.require_step(WizardStep::DateTime)?;
        self.pending.time = Some(time);
        Ok(())
    }

    pub fn select_group_type(&mut self, group_type: GroupType) -> Result<(), WizardError> {
        self.require_step(WizardStep::GroupType)?;
        self.pending.group_type = Some(group_type);
        Ok(())
    }

    pub fn select_vibe(&mut self, vibe: Vibe) -> Result<(), WizardError> {
        self.require_step(WizardStep::Vibe)?;
        self.pending.vibe = Some(vibe);
        Ok(())
    }

    fn enter(&mut self, step: WizardStep) {
        self.step = step;
        self.pending = Selections::default();
    }

    /// Advance past the current step if its selection is complete.
    pub fn next(&mut self) -> Result<Advance, WizardError> {
        match self.step {
            WizardStep::Location => {
                let location = self
                    .pending
                    .location
                    .as_deref()
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .ok_or(WizardError::EmptyLocation)?
                    .to_owned();
                self.accepted.location = Some(location);
                self.enter(WizardStep::DateTime);
                Ok(Advance::Moved(WizardStep::DateTime))
            }
            WizardStep::DateTime => {
                let date = self.pending.date.ok_or(WizardError::MissingDate)?;
                let time = self.pending.time.ok_or(WizardError::MissingTime)?;
                self.accepted.date = Some(date);
                self.accepted.time = Some(time);
                self.enter(WizardStep::GroupType);
                Ok(Advance::Moved(WizardStep::GroupType))
            }
            WizardStep::GroupType => {
                let group_type = self.pending.group_type.ok_or(WizardError::MissingGroupType)?;
                self.accepted.group_type = Some(group_type);
                self.enter(WizardStep::Vibe);
                Ok(Advance::Moved(WizardStep::Vibe))
            }
            WizardStep::Vibe => {
                let vibe = self.pending.vibe.ok_or(WizardError::MissingVibe)?;
                self.accepted.vibe = Some(vibe);
                self.finalise().map(Advance::Completed)
            }
        }
    }

    fn finalise(&self) -> Result<DiningPlan, WizardError> {
        let accepted = &self.accepted;
        Ok(DiningPlan {
            location: accepted
                .location
                .clone()
                .ok_or(WizardError::EmptyLocation)?,
            date_time: PlanDateTime {
                date: accepted.date.ok_or(WizardError::MissingDate)?,
                time: accepted.time.ok_or(WizardError::MissingTime)?,
            },
            group_type: accepted.group_type.ok_or(WizardError::MissingGroupType)?,
            vibe: accepted.vibe.ok_or(WizardError::MissingVibe)?,
        })
    }

    /// Return to the previous step.
    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let previous = self.step.previous().ok_or(WizardError::AtFirstStep)?;
        self.enter(previous);
        Ok(previous)
    }

    /// Drive every step from one submission, stopping at the first gate that
    /// refuses to advance.
    pub fn replay(today: NaiveDate, submission: PlanSubmission) -> Result<DiningPlan, WizardError> {
        let mut wizard = Self::new(today);

        wizard.enter_location(&submission.location)?;
        wizard.next()?;

        if let Some(date) = submission.date {
            wizard.select_date(date)?;
        }
        if let Some(time) = submission.time.as_deref() {
            wizard.select_time(TimeSlot::parse(time)?)?;
        }
        wizard.next()?;

        if let Some(group_type) = submission.group_type.as_deref() {
            wizard.select_group_type(group_type.parse()?)?;
        }
        wizard.next()?;

        if let Some(vibe) = submission.vibe.as_deref() {
            wizard.select_vibe(vibe.parse()?)?;
        }
        match wizard.next()? {
            Advance::Completed(plan) => Ok(plan),
            Advance::Moved(step) => Err(WizardError::NotOnStep {
                expected: WizardStep::Vibe,
                actual: step,
            }),
        }
    }
}
