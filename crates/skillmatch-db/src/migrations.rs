use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (users, jobs, applications)");
        let tx = conn.transaction()?;
        tx.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                role        TEXT NOT NULL DEFAULT 'CANDIDATE'
                            CHECK (role IN ('CANDIDATE', 'RECRUITER', 'ADMIN')),
                created_at  TEXT NOT NULL
            );

            CREATE TABLE jobs (
                id            TEXT PRIMARY KEY,
                title         TEXT NOT NULL,
                description   TEXT NOT NULL,
                location      TEXT NOT NULL,
                company       TEXT NOT NULL,
                salary        INTEGER CHECK (salary IS NULL OR salary >= 0),
                created_at    TEXT NOT NULL,
                recruiter_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
            );

            CREATE INDEX idx_jobs_recruiter ON jobs(recruiter_id, created_at);
            CREATE INDEX idx_jobs_created ON jobs(created_at);

            CREATE TABLE applications (
                id            TEXT PRIMARY KEY,
                job_id        TEXT NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
                candidate_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                status        TEXT NOT NULL DEFAULT 'PENDING'
                              CHECK (status IN ('PENDING', 'SHORTLISTED', 'REJECTED', 'HIRED')),
                created_at    TEXT NOT NULL,
                UNIQUE (job_id, candidate_id)
            );

            CREATE INDEX idx_applications_candidate ON applications(candidate_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
        tx.commit()?;
    }

    if version < 2 {
        info!("Running migration v2 (job categories, saved jobs)");
        let tx = conn.transaction()?;
        tx.execute_batch(
            "
            ALTER TABLE jobs ADD COLUMN category TEXT;

            CREATE TABLE saved_jobs (
                candidate_id  TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                job_id        TEXT NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
                created_at    TEXT NOT NULL,
                PRIMARY KEY (candidate_id, job_id)
            );

            INSERT INTO schema_version (version) VALUES (2);
            ",
        )?;
        tx.commit()?;
    }

    info!("Database migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        run(&mut conn).unwrap();
        run(&mut conn).unwrap();

        let version: i64 = conn
            .query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(version, 2);
    }
}
