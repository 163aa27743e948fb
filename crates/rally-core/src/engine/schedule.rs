//! Deterministic expansion of a start time, duration and meal set into a
//! time-ordered itinerary.
//!
//! The heuristic walks a single clock through the morning, afternoon and
//! evening segments that the activity overlaps, dropping meal and break
//! blocks into the windows where they fit. A requested meal whose window is
//! never reached produces no block.

use log::warn;

use super::catalog::{Meal, MealSet};
use crate::models::{ClockTime, ScheduleBlock};

pub const MEET: &str = "Meet at the location";
pub const BEGINS: &str = "Activity begins";
pub const BREAKFAST: &str = "Breakfast";
pub const MORNING_SNACK: &str = "Morning break with snacks";
pub const LUNCH: &str = "Lunch break";
pub const AFTERNOON_ACTIVITY: &str = "Afternoon activity";
pub const AFTERNOON_SNACK: &str = "Afternoon break with refreshments";
pub const EVENING_ACTIVITY: &str = "Evening activity";
pub const DINNER: &str = "Dinner";
pub const CONCLUDES: &str = "Activity concludes";

const NOON: u32 = 12 * 60;
const LUNCH_EARLIEST: u32 = 12 * 60 + 30;
const LUNCH_LATEST: u32 = 13 * 60;
const EVENING: u32 = 17 * 60;
const DINNER_EARLIEST: u32 = 18 * 60;
const DINNER_LATEST: u32 = 19 * 60 + 30;

const MIN_DURATION_MINUTES: u32 = 60;

/// Builds the itinerary for an activity starting at `start` and lasting
/// `hours`.
///
/// The first block is always the meet block and the last is always the
/// conclusion at `start + hours`. Durations under an hour (or not finite)
/// are raised to one hour and the end is kept before midnight.
///
/// # Examples
///
/// ```rust
/// use rally_core::engine::{Meal, MealSet, synthesize};
/// use rally_core::models::ClockTime;
///
/// let meals = MealSet::from([Meal::Breakfast]);
/// let schedule = synthesize(ClockTime::from_hm(9, 0).unwrap(), 3.0, &meals);
///
/// assert_eq!(schedule.first().unwrap().activity, "Meet at the location");
/// assert!(schedule.iter().any(|b| b.activity == "Breakfast"));
/// assert_eq!(schedule.last().unwrap().time, "12:00 PM");
/// ```
pub fn synthesize(start: ClockTime, hours: f64, meals: &MealSet) -> Vec<ScheduleBlock> {
    let start_min = start.minutes();
    let end = ClockTime::saturating_from_minutes(start_min + clamp_duration(start, hours));
    let end_min = end.minutes();

    let mut plan = Itinerary::new(end);
    plan.push(start_min, MEET);

    let mut clock = (start_min + 15).min(end_min);
    plan.push(clock, BEGINS);

    if start.hour() < 11 {
        if meals.contains(&Meal::Breakfast) && start.hour() <= 9 {
            let breakfast = start_min + 60;
            plan.push_before_end(breakfast, BREAKFAST);
            clock = breakfast + 60;
        } else {
            clock += 90;
        }

        let morning_span = end_min.min(NOON).saturating_sub(start_min);
        if meals.contains(&Meal::Snacks)
            && morning_span > 120
            && start.hour() < 10
            && plan.push_before_end(clock, MORNING_SNACK)
        {
            clock += 30;
        }
    }

    if end_min > NOON && start.hour() < 17 {
        let window_start = start_min.max(NOON);
        let window_end = end_min.min(EVENING);
        let window = window_end.saturating_sub(window_start);

        if meals.contains(&Meal::Lunch) {
            let lunch = clock.max(LUNCH_EARLIEST);
            if lunch <= LUNCH_LATEST && plan.push_before_end(lunch, LUNCH) {
                clock = lunch + 60;
            }
        }

        let activity = clock.max(window_start);
        if window_end.saturating_sub(activity) > 60 && plan.push_before_end(activity, AFTERNOON_ACTIVITY)
        {
            clock = activity + 90;
        }

        if meals.contains(&Meal::Snacks)
            && window > 180
            && plan.push_before_end(clock, AFTERNOON_SNACK)
        {
            clock += 30;
        }
    }

    if end_min > EVENING {
        let evening = clock.max(EVENING);
        if plan.push_before_end(evening, EVENING_ACTIVITY) {
            clock = evening;
        }

        if meals.contains(&Meal::Dinner) {
            let dinner = (clock + 30).max(DINNER_EARLIEST);
            if dinner <= DINNER_LATEST && plan.push_before_end(dinner, DINNER) {
                clock = dinner + 90;
            }
        }
    }
    log::trace!("Schedule clock stopped at minute {clock}");

    plan.push(end_min, CONCLUDES);
    plan.blocks
}

/// Requested duration in whole minutes, clamped to `[1h, end of day]`.
fn clamp_duration(start: ClockTime, hours: f64) -> u32 {
    let requested = if hours.is_finite() {
        (hours * 60.0).round()
    } else {
        warn!("Duration {hours} is not a number, using one hour");
        f64::from(MIN_DURATION_MINUTES)
    };

    let remaining = ClockTime::LAST_MINUTE.minutes() - start.minutes();
    let mut minutes = if requested < f64::from(MIN_DURATION_MINUTES) {
        warn!("Duration of {hours} hours is too short, using one hour");
        MIN_DURATION_MINUTES
    } else {
        requested.min(f64::from(u32::MAX)) as u32
    };
    if minutes > remaining {
        warn!("Activity starting at {start} would run past midnight, ending at 11:59 PM");
        minutes = remaining;
    }
    minutes
}

struct Itinerary {
    end: u32,
    blocks: Vec<ScheduleBlock>,
}

impl Itinerary {
    fn new(end: ClockTime) -> Self {
        Self {
            end: end.minutes(),
            blocks: Vec::new(),
        }
    }

    fn push(&mut self, minutes: u32, label: &str) {
        self.blocks
            .push(ScheduleBlock::at(ClockTime::saturating_from_minutes(minutes), label));
    }

    /// Emits an intermediate block only when it falls strictly before the end.
    fn push_before_end(&mut self, minutes: u32, label: &str) -> bool {
        if minutes < self.end {
            self.push(minutes, label);
            true
        } else {
            false
        }
    }
}
