//! Behaviour tests for the dining plan wizard.

use std::cell::RefCell;

use chrono::NaiveDate;
use eatopia::domain::{
    Advance, DiningPlan, DiningWizard, GroupType, TimeSlot, Vibe, WizardError, WizardStep,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

struct WizardWorld {
    wizard: RefCell<Option<DiningWizard>>,
    last_error: RefCell<Option<WizardError>>,
    plan: RefCell<Option<DiningPlan>>,
}

impl WizardWorld {
    fn new() -> Self {
        Self {
            wizard: RefCell::new(None),
            last_error: RefCell::new(None),
            plan: RefCell::new(None),
        }
    }

    fn with_wizard<T>(&self, f: impl FnOnce(&mut DiningWizard) -> Result<T, WizardError>) {
        let mut wizard = self.wizard.borrow_mut();
        let wizard = wizard.as_mut().expect("wizard started");
        if let Err(error) = f(wizard) {
            *self.last_error.borrow_mut() = Some(error);
        }
    }

    fn expect_error(&self, check: impl FnOnce(&WizardError) -> bool) {
        let error = self.last_error.borrow();
        let error = error.as_ref().expect("wizard reported an error");
        assert!(check(error), "unexpected wizard error: {error}");
    }

    fn expect_step(&self, expected: WizardStep) {
        let wizard = self.wizard.borrow();
        assert_eq!(wizard.as_ref().expect("wizard started").step(), expected);
    }

    fn with_plan(&self, check: impl FnOnce(&DiningPlan)) {
        let plan = self.plan.borrow();
        check(plan.as_ref().expect("wizard produced a plan"));
    }
}

fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").expect("ISO date")
}

#[fixture]
fn world() -> WizardWorld {
    WizardWorld::new()
}

#[given("a wizard started on {today}")]
fn a_wizard_started_on(world: &WizardWorld, today: String) {
    *world.wizard.borrow_mut() = Some(DiningWizard::new(date(&today)));
}

#[when("the diner enters a blank location")]
fn the_diner_enters_a_blank_location(world: &WizardWorld) {
    world.with_wizard(|wizard| wizard.enter_location("   "));
}

#[when("the diner enters the location {location}")]
fn the_diner_enters_the_location(world: &WizardWorld, location: String) {
    world.with_wizard(|wizard| wizard.enter_location(&location));
}

#[when("the diner presses next")]
fn the_diner_presses_next(world: &WizardWorld) {
    let mut plan = None;
    world.with_wizard(|wizard| {
        if let Advance::Completed(completed) = wizard.next()? {
            plan = Some(completed);
        }
        Ok(())
    });
    if plan.is_some() {
        *world.plan.borrow_mut() = plan;
    }
}

#[when("the diner presses back")]
fn the_diner_presses_back(world: &WizardWorld) {
    world.with_wizard(DiningWizard::back);
}

#[when("the diner picks the bookable date {day}")]
fn the_diner_picks_the_bookable_date(world: &WizardWorld, day: String) {
    world.with_wizard(|wizard| wizard.select_date(date(&day)));
}

#[when("the diner picks the time {label}")]
fn the_diner_picks_the_time(world: &WizardWorld, label: String) {
    world.with_wizard(|wizard| wizard.select_time(TimeSlot::parse(&label)?));
}

#[when("the diner picks the group type {group}")]
fn the_diner_picks_the_group_type(world: &WizardWorld, group: String) {
    world.with_wizard(|wizard| wizard.select_group_type(group.trim().parse()?));
}

#[when("the diner picks the vibe {vibe}")]
fn the_diner_picks_the_vibe(world: &WizardWorld, vibe: String) {
    world.with_wizard(|wizard| wizard.select_vibe(vibe.trim().parse()?));
}

#[then("the wizard reports a missing location")]
fn the_wizard_reports_a_missing_location(world: &WizardWorld) {
    world.expect_error(|error| matches!(error, WizardError::EmptyLocation));
}

#[then("the wizard reports a missing group type")]
fn the_wizard_reports_a_missing_group_type(world: &WizardWorld) {
    world.expect_error(|error| matches!(error, WizardError::MissingGroupType));
}

#[then("the wizard reports an unavailable date")]
fn the_wizard_reports_an_unavailable_date(world: &WizardWorld) {
    world.expect_error(|error| matches!(error, WizardError::DateUnavailable { .. }));
}

#[then("the wizard is on the location step")]
fn the_wizard_is_on_the_location_step(world: &WizardWorld) {
    world.expect_step(WizardStep::Location);
}

#[then("the wizard is on the group type step")]
fn the_wizard_is_on_the_group_type_step(world: &WizardWorld) {
    world.expect_step(WizardStep::GroupType);
}

#[then("the plan is a romantic couple outing in Boston")]
fn the_plan_is_a_romantic_couple_outing_in_boston(world: &WizardWorld) {
    world.with_plan(|plan| {
        assert_eq!(plan.location, "Boston");
        assert_eq!(plan.group_type, GroupType::Couple);
        assert_eq!(plan.vibe, Vibe::Romantic);
        assert_eq!(plan.title(), "Romantic couple outing in Boston");
    });
}

#[then("the plan is booked for 2025-05-02 at 7:00 PM")]
fn the_plan_is_booked_for_the_chosen_slot(world: &WizardWorld) {
    world.with_plan(|plan| {
        assert_eq!(plan.date_time.date, date("2025-05-02"));
        assert_eq!(plan.date_time.time.label(), "7:00 PM");
    });
}

#[scenario(path = "tests/features/dining_wizard.feature")]
fn dining_wizard_scenarios(world: WizardWorld) {
    drop(world);
}
