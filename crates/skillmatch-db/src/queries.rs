use crate::Database;
use crate::models::{
    CandidateApplicationRow, CategoryCountRow, JobFields, JobRow, RecruiterApplicationRow, StatusChange,
    UserRow,
};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row, params};
use skillmatch_types::{ApplicationStatus, Role};
use tracing::debug;

/// Result of an insert guarded by a uniqueness rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Created,
    AlreadyApplied,
    JobMissing,
}

const JOB_SELECT: &str = "
    SELECT j.id, j.title, j.description, j.location, j.company, j.salary, j.category,
           j.created_at, j.recruiter_id, u.name,
           (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id)
    FROM jobs j
    LEFT JOIN users u ON u.id = j.recruiter_id";

const RECRUITER_APPLICATION_SELECT: &str = "
    SELECT a.id, a.job_id, a.candidate_id, a.status, a.created_at,
           c.name, c.email, j.title, j.location
    FROM applications a
    JOIN users c ON c.id = a.candidate_id
    JOIN jobs j ON j.id = a.job_id";

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        created_at: &str,
    ) -> Result<InsertOutcome> {
        self.with_conn_mut(|conn| {
            let res = conn.execute(
                "INSERT INTO users (id, name, email, password, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, name, email, password_hash, role.as_str(), created_at],
            );
            match res {
                Ok(_) => Ok(InsertOutcome::Inserted),
                Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::Duplicate),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Jobs --

    pub fn create_job(
        &self,
        id: &str,
        recruiter_id: &str,
        fields: &JobFields<'_>,
        created_at: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO jobs (id, title, description, location, company, salary, category, created_at, recruiter_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    id,
                    fields.title,
                    fields.description,
                    fields.location,
                    fields.company,
                    fields.salary,
                    fields.category,
                    created_at,
                    recruiter_id
                ],
            )?;
            Ok(())
        })
    }

    /// Job by id, but only if `recruiter_id` owns it.
    pub fn get_job_for_recruiter(&self, job_id: &str, recruiter_id: &str) -> Result<Option<JobRow>> {
        self.with_conn(|conn| {
            let sql = format!("{JOB_SELECT} WHERE j.id = ?1 AND j.recruiter_id = ?2");
            let row = conn
                .query_row(&sql, params![job_id, recruiter_id], job_from_row)
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_jobs_for_recruiter(&self, recruiter_id: &str) -> Result<Vec<JobRow>> {
        self.with_conn(|conn| {
            let sql = format!("{JOB_SELECT} WHERE j.recruiter_id = ?1 ORDER BY j.created_at DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([recruiter_id], job_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Every job, newest first. `limit` of `None` returns all of them.
    pub fn list_jobs(&self, limit: Option<u32>) -> Result<Vec<JobRow>> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map(i64::from).unwrap_or(-1);
        self.with_conn(|conn| {
            let sql = format!("{JOB_SELECT} ORDER BY j.created_at DESC LIMIT ?1");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([limit], job_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_jobs(&self) -> Result<i64> {
        self.with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM jobs", [], |r| r.get(0))?))
    }

    pub fn count_jobs_by_category(&self) -> Result<Vec<CategoryCountRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT category, COUNT(*) FROM jobs WHERE category IS NOT NULL GROUP BY category",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(CategoryCountRow {
                        category: row.get(0)?,
                        count: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Returns false when the job is missing or owned by someone else.
    pub fn update_job(&self, job_id: &str, recruiter_id: &str, fields: &JobFields<'_>) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE jobs
                 SET title = ?1, description = ?2, location = ?3, company = ?4, salary = ?5, category = ?6
                 WHERE id = ?7 AND recruiter_id = ?8",
                params![
                    fields.title,
                    fields.description,
                    fields.location,
                    fields.company,
                    fields.salary,
                    fields.category,
                    job_id,
                    recruiter_id
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Deletes the job and, through the foreign keys, its applications and bookmarks.
    pub fn delete_job(&self, job_id: &str, recruiter_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "DELETE FROM jobs WHERE id = ?1 AND recruiter_id = ?2",
                params![job_id, recruiter_id],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Applications --

    /// Existence checks and insert run under the writer lock in one
    /// transaction; the UNIQUE(job_id, candidate_id) constraint backs them up.
    pub fn create_application(
        &self,
        id: &str,
        job_id: &str,
        candidate_id: &str,
        created_at: &str,
    ) -> Result<ApplyOutcome> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let job_exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM jobs WHERE id = ?1)",
                [job_id],
                |r| r.get(0),
            )?;
            if !job_exists {
                return Ok(ApplyOutcome::JobMissing);
            }

            let existing: Option<String> = tx
                .query_row(
                    "SELECT id FROM applications WHERE job_id = ?1 AND candidate_id = ?2",
                    params![job_id, candidate_id],
                    |r| r.get(0),
                )
                .optional()?;
            if existing.is_some() {
                return Ok(ApplyOutcome::AlreadyApplied);
            }

            let res = tx.execute(
                "INSERT INTO applications (id, job_id, candidate_id, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id, job_id, candidate_id, ApplicationStatus::Pending.as_str(), created_at],
            );
            match res {
                Ok(_) => {}
                Err(e) if is_unique_violation(&e) => return Ok(ApplyOutcome::AlreadyApplied),
                Err(e) => return Err(e.into()),
            }

            tx.commit()?;
            Ok(ApplyOutcome::Created)
        })
    }

    /// Application by id, but only if its job belongs to `recruiter_id`.
    pub fn get_application_for_recruiter(
        &self,
        application_id: &str,
        recruiter_id: &str,
    ) -> Result<Option<RecruiterApplicationRow>> {
        self.with_conn(|conn| {
            let sql = format!("{RECRUITER_APPLICATION_SELECT} WHERE a.id = ?1 AND j.recruiter_id = ?2");
            let row = conn
                .query_row(&sql, params![application_id, recruiter_id], recruiter_application_from_row)
                .optional()?;
            Ok(row)
        })
    }

    /// Sets the status of an application the recruiter owns. The previous
    /// status is read, the row updated and re-read in one transaction, so the
    /// returned change describes exactly this write.
    pub fn update_application_status(
        &self,
        application_id: &str,
        recruiter_id: &str,
        status: ApplicationStatus,
    ) -> Result<Option<StatusChange>> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let owned_sql = format!("{RECRUITER_APPLICATION_SELECT} WHERE a.id = ?1 AND j.recruiter_id = ?2");

            let Some(before) = tx
                .query_row(&owned_sql, params![application_id, recruiter_id], recruiter_application_from_row)
                .optional()?
            else {
                return Ok(None);
            };

            tx.execute(
                "UPDATE applications SET status = ?1 WHERE id = ?2",
                params![status.as_str(), application_id],
            )?;
            let application =
                tx.query_row(&owned_sql, params![application_id, recruiter_id], recruiter_application_from_row)?;
            tx.commit()?;

            debug!("Application {} {} -> {}", application_id, before.status, status);
            Ok(Some(StatusChange {
                previous: before.status,
                application,
            }))
        })
    }

    pub fn list_applications_for_recruiter(&self, recruiter_id: &str) -> Result<Vec<RecruiterApplicationRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{RECRUITER_APPLICATION_SELECT} WHERE j.recruiter_id = ?1 ORDER BY a.created_at DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([recruiter_id], recruiter_application_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_applications_for_job(&self, job_id: &str) -> Result<Vec<RecruiterApplicationRow>> {
        self.with_conn(|conn| {
            let sql = format!("{RECRUITER_APPLICATION_SELECT} WHERE a.job_id = ?1 ORDER BY a.created_at DESC");
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([job_id], recruiter_application_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_applications_for_candidate(&self, candidate_id: &str) -> Result<Vec<CandidateApplicationRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT a.id, a.job_id, a.status, a.created_at, j.title, j.location, j.salary, r.name
                 FROM applications a
                 JOIN jobs j ON j.id = a.job_id
                 LEFT JOIN users r ON r.id = j.recruiter_id
                 WHERE a.candidate_id = ?1
                 ORDER BY a.created_at DESC",
            )?;
            let rows = stmt
                .query_map([candidate_id], |row| {
                    Ok(CandidateApplicationRow {
                        id: row.get(0)?,
                        job_id: row.get(1)?,
                        status: row.get(2)?,
                        created_at: row.get(3)?,
                        job_title: row.get(4)?,
                        job_location: row.get(5)?,
                        job_salary: row.get(6)?,
                        recruiter_name: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Saved jobs --

    /// Bookmarks a job. Returns false if the job does not exist; saving twice is a no-op.
    pub fn save_job(&self, candidate_id: &str, job_id: &str, created_at: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let job_exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM jobs WHERE id = ?1)",
                [job_id],
                |r| r.get(0),
            )?;
            if !job_exists {
                return Ok(false);
            }
            tx.execute(
                "INSERT OR IGNORE INTO saved_jobs (candidate_id, job_id, created_at) VALUES (?1, ?2, ?3)",
                params![candidate_id, job_id, created_at],
            )?;
            tx.commit()?;
            Ok(true)
        })
    }

    pub fn unsave_job(&self, candidate_id: &str, job_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM saved_jobs WHERE candidate_id = ?1 AND job_id = ?2",
                params![candidate_id, job_id],
            )?;
            Ok(())
        })
    }

    pub fn list_saved_job_ids(&self, candidate_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT job_id FROM saved_jobs WHERE candidate_id = ?1 ORDER BY created_at DESC",
            )?;
            let ids = stmt
                .query_map([candidate_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(ids)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is always a literal from this module
    let sql = format!(
        "SELECT id, name, email, password, role, created_at FROM users WHERE {column} = ?1"
    );
    let row = conn
        .query_row(&sql, [value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                role: row.get(4)?,
                created_at: row.get(5)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<JobRow> {
    Ok(JobRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        location: row.get(3)?,
        company: row.get(4)?,
        salary: row.get(5)?,
        category: row.get(6)?,
        created_at: row.get(7)?,
        recruiter_id: row.get(8)?,
        recruiter_name: row.get(9)?,
        application_count: row.get(10)?,
    })
}

fn recruiter_application_from_row(row: &Row<'_>) -> rusqlite::Result<RecruiterApplicationRow> {
    Ok(RecruiterApplicationRow {
        id: row.get(0)?,
        job_id: row.get(1)?,
        candidate_id: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
        candidate_name: row.get(5)?,
        candidate_email: row.get(6)?,
        job_title: row.get(7)?,
        job_location: row.get(8)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        }
        _ => false,
    }
}
