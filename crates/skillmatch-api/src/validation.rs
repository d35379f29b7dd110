//! Payload checks. Each returns every issue found, not just the first.
//! Lengths count characters, not bytes.

use skillmatch_types::Role;
use skillmatch_types::api::{FieldIssue, JobPayload, RegisterRequest};
use uuid::Uuid;

pub fn validate_job(payload: &JobPayload) -> Result<(), Vec<FieldIssue>> {
    let mut issues = Vec::new();

    check_length(
        &mut issues,
        "title",
        &payload.title,
        1,
        100,
        "Title is required",
        "Title must be less than 100 characters",
    );
    check_length(
        &mut issues,
        "description",
        &payload.description,
        10,
        5000,
        "Description must be at least 10 characters",
        "Description must be less than 5000 characters",
    );
    check_length(
        &mut issues,
        "location",
        &payload.location,
        1,
        100,
        "Location is required",
        "Location must be less than 100 characters",
    );
    check_length(
        &mut issues,
        "company",
        &payload.company,
        1,
        100,
        "Company name is required",
        "Company name must be less than 100 characters",
    );

    if payload.salary.is_some_and(|salary| salary < 0) {
        issues.push(FieldIssue::new("salary", "Salary must be positive"));
    }

    finish(issues)
}

/// Checks a registration and resolves the role, defaulting to candidate.
pub fn validate_registration(req: &RegisterRequest) -> Result<Role, Vec<FieldIssue>> {
    let mut issues = Vec::new();

    if req.name.trim().chars().count() < 2 {
        issues.push(FieldIssue::new("name", "Name must be at least 2 characters"));
    }
    // Stored trimmed, so judged trimmed
    if !is_valid_email(req.email.trim()) {
        issues.push(FieldIssue::new("email", "Invalid email"));
    }
    if req.password.chars().count() < 6 {
        issues.push(FieldIssue::new("password", "Password must be at least 6 characters"));
    }

    let role = req.role.unwrap_or(Role::Candidate);
    if !role.is_self_assignable() {
        issues.push(FieldIssue::new("role", "Role must be CANDIDATE or RECRUITER"));
    }

    finish(issues).map(|()| role)
}

pub fn parse_uuid_field(field: &str, value: &str) -> Result<Uuid, Vec<FieldIssue>> {
    value
        .parse::<Uuid>()
        .map_err(|_| vec![FieldIssue::new(field, "Invalid uuid")])
}

/// One `@`, non-empty local part, dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

fn check_length(
    issues: &mut Vec<FieldIssue>,
    field: &str,
    value: &str,
    min: usize,
    max: usize,
    too_short: &str,
    too_long: &str,
) {
    let len = value.chars().count();
    if len < min {
        issues.push(FieldIssue::new(field, too_short));
    } else if len > max {
        issues.push(FieldIssue::new(field, too_long));
    }
}

fn finish(issues: Vec<FieldIssue>) -> Result<(), Vec<FieldIssue>> {
    if issues.is_empty() { Ok(()) } else { Err(issues) }
}
