//! Result wrapper types for displaying operation outcomes.

use std::fmt;

use crate::models::{Activity, Participant, Plan};

/// Wrapper type for displaying the result of create operations: a
/// confirmation line followed by the created resource.
///
/// # Examples
///
/// ```rust
/// use jiff::Timestamp;
/// use rally_core::{display::CreateResult, models::{Activity, ActivityStatus}};
///
/// let activity = Activity {
///     id: 3,
///     title: Some("Kayaking".to_string()),
///     description: None,
///     start_time: None,
///     location_address: None,
///     status: ActivityStatus::Planning,
///     created_at: Timestamp::now(),
///     updated_at: Timestamp::now(),
///     participants: Vec::new(),
/// };
///
/// let output = CreateResult::new(activity).to_string();
/// assert!(output.starts_with("Created activity with ID: 3"));
/// ```
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Activity> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created activity with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Participant> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Added participant with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resource.revised_from {
            Some(original) => writeln!(
                f,
                "Revised plan {original} as plan with ID: {}",
                self.resource.id
            )?,
            None => writeln!(f, "Created plan with ID: {}", self.resource.id)?,
        }
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of update operations, optionally
/// listing what changed.
pub struct UpdateResult<T> {
    pub resource: T,
    pub changes: Vec<String>,
}

impl<T> UpdateResult<T> {
    /// Create a new UpdateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self {
            resource,
            changes: Vec::new(),
        }
    }

    /// Create an UpdateResult with a list of changes made.
    pub fn with_changes(resource: T, changes: Vec<String>) -> Self {
        Self { resource, changes }
    }
}

impl<T: fmt::Display> UpdateResult<T> {
    fn fmt_update(&self, f: &mut fmt::Formatter<'_>, kind: &str, id: u64) -> fmt::Result {
        writeln!(f, "Updated {kind} with ID: {id}")?;

        if !self.changes.is_empty() {
            writeln!(f)?;
            writeln!(f, "Changes made:")?;
            for change in &self.changes {
                writeln!(f, "- {change}")?;
            }
        }

        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for UpdateResult<Activity> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_update(f, "activity", self.resource.id)
    }
}

impl fmt::Display for UpdateResult<Participant> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_update(f, "participant", self.resource.id)
    }
}

impl fmt::Display for UpdateResult<Plan> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_update(f, "plan", self.resource.id)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult<T> {
    pub resource: T,
}

impl<T> DeleteResult<T> {
    /// Create a new DeleteResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for DeleteResult<Activity> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Deleted activity '{}' (ID: {}) with {} participants",
            self.resource.display_title(),
            self.resource.id,
            self.resource.participants.len()
        )
    }
}
