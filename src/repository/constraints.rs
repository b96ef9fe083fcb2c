//! Translation of Postgres constraint violations into domain errors
//!
//! Integrity rules (overlap, foreign keys, checks) are enforced by the
//! database. Each store owns a table mapping the constraint names of its
//! schema to the error returned to callers; anything not in the table is
//! logged and surfaces as an internal error.

use crate::error::AppError;

/// Error class a constraint violation maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    NotFound,
    BadRequest,
    Conflict,
}

/// One entry of a constraint table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintRule {
    pub constraint: &'static str,
    pub kind: ViolationKind,
    pub message: &'static str,
}

impl ConstraintRule {
    pub const fn new(constraint: &'static str, kind: ViolationKind, message: &'static str) -> Self {
        Self { constraint, kind, message }
    }

    pub fn to_error(&self) -> AppError {
        let message = self.message.to_string();
        match self.kind {
            ViolationKind::NotFound => AppError::NotFound(message),
            ViolationKind::BadRequest => AppError::BadRequest(message),
            ViolationKind::Conflict => AppError::Conflict(message),
        }
    }
}

/// `haircut_events`
pub const HAIRCUT_EVENT_CONSTRAINTS: &[ConstraintRule] = &[
    ConstraintRule::new(
        "fk_barber",
        ViolationKind::NotFound,
        "Barber with the associated ID doesn't exist",
    ),
    ConstraintRule::new(
        "fk_customer",
        ViolationKind::NotFound,
        "Customer with the associated ID doesn't exist",
    ),
    ConstraintRule::new(
        "fk_service_type",
        ViolationKind::NotFound,
        "Service with the associated ID doesn't exist",
    ),
    ConstraintRule::new(
        "check_end_time",
        ViolationKind::BadRequest,
        "end_time must be after start_time",
    ),
    ConstraintRule::new(
        "unique_schedule",
        ViolationKind::Conflict,
        "An event at this schedule overlaps with an existing event",
    ),
];

/// `barber_availability`
pub const AVAILABILITY_CONSTRAINTS: &[ConstraintRule] = &[
    ConstraintRule::new(
        "unique_barber_day_start",
        ViolationKind::Conflict,
        "Availability already exists for this day and start time",
    ),
    ConstraintRule::new(
        "check_availability_time",
        ViolationKind::BadRequest,
        "end_time must be after start_time",
    ),
    ConstraintRule::new(
        "barber_availability_barber_id_fkey",
        ViolationKind::NotFound,
        "Barber with the associated ID doesn't exist",
    ),
];

/// `barber_services`
pub const BARBER_SERVICE_CONSTRAINTS: &[ConstraintRule] = &[
    ConstraintRule::new(
        "unique_barber_service",
        ViolationKind::Conflict,
        "The barber with the haircut service already exists",
    ),
    ConstraintRule::new(
        "barber_services_barber_id_fkey",
        ViolationKind::NotFound,
        "Barber with the associated ID doesn't exist",
    ),
    ConstraintRule::new(
        "barber_services_service_id_fkey",
        ViolationKind::NotFound,
        "Service with the associated ID doesn't exist",
    ),
];

/// `haircut_services`; bookings keep their service row alive
pub const HAIRCUT_SERVICE_CONSTRAINTS: &[ConstraintRule] = &[
    ConstraintRule::new(
        "haircut_services_name_key",
        ViolationKind::Conflict,
        "A haircut service with the same name already exists",
    ),
    ConstraintRule::new(
        "haircut_services_duration_minutes_check",
        ViolationKind::BadRequest,
        "duration_minutes must be greater than 0",
    ),
    ConstraintRule::new(
        "fk_service_type",
        ViolationKind::Conflict,
        "Haircut service is referenced by existing bookings",
    ),
];

/// `discounts` and `discount_restricted_plans`
pub const DISCOUNT_CONSTRAINTS: &[ConstraintRule] = &[
    ConstraintRule::new(
        "unique_discount_name",
        ViolationKind::Conflict,
        "Discount already exists",
    ),
    ConstraintRule::new(
        "discount_restricted_plans_membership_plan_id_fkey",
        ViolationKind::NotFound,
        "Membership plan with the associated ID doesn't exist",
    ),
];

/// Rule matching the constraint named by a database error, if any
pub fn violated_rule<'a>(err: &sqlx::Error, rules: &'a [ConstraintRule]) -> Option<&'a ConstraintRule> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };
    let name = db_err.constraint()?;
    rules.iter().find(|rule| rule.constraint == name)
}

/// Map a write error through `rules`; unmapped errors are logged and hidden
pub fn translate(err: sqlx::Error, rules: &[ConstraintRule], operation: &str) -> AppError {
    match violated_rule(&err, rules) {
        Some(rule) => rule.to_error(),
        None => {
            tracing::error!(error = ?err, "Failed to {}", operation);
            AppError::Internal(format!("Failed to {}", operation))
        }
    }
}
