//! Database row types. These map directly to SQLite rows (joined where a
//! view needs a name or a count). Enum columns stay as text here; the API
//! layer parses them into skillmatch-types enums.

pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: String,
}

pub struct JobRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub company: String,
    pub salary: Option<i64>,
    pub category: Option<String>,
    pub created_at: String,
    pub recruiter_id: String,
    pub recruiter_name: Option<String>,
    pub application_count: i64,
}

/// Writable job columns, shared by insert and update.
pub struct JobFields<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub company: &'a str,
    pub salary: Option<i64>,
    pub category: Option<&'a str>,
}

/// Application joined with its candidate and job, as a recruiter lists it.
pub struct RecruiterApplicationRow {
    pub id: String,
    pub job_id: String,
    pub candidate_id: String,
    pub status: String,
    pub created_at: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub job_title: String,
    pub job_location: String,
}

/// Outcome of a status update: what the application was, and what it is now.
pub struct StatusChange {
    pub previous: String,
    pub application: RecruiterApplicationRow,
}

/// Application joined with its job and the job's recruiter, as a candidate lists it.
pub struct CandidateApplicationRow {
    pub id: String,
    pub job_id: String,
    pub status: String,
    pub created_at: String,
    pub job_title: String,
    pub job_location: String,
    pub job_salary: Option<i64>,
    pub recruiter_name: Option<String>,
}

pub struct CategoryCountRow {
    pub category: String,
    pub count: i64,
}
