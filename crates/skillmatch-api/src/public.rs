use axum::{Json, extract::State};

use skillmatch_db::models::CategoryCountRow;
use skillmatch_types::JobCategory;
use skillmatch_types::api::{CategoryCount, PublicJobsResponse};

use crate::convert::candidate_job;
use crate::error::ApiResult;
use crate::state::{AppState, with_db};

/// Jobs shown on the landing page.
const FEATURED_JOBS: u32 = 10;

/// GET /api/public/jobs: landing page listing, no session required.
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<PublicJobsResponse>> {
    let (rows, total_jobs, category_rows) = with_db(&state, |db| {
        Ok((
            db.list_jobs(Some(FEATURED_JOBS))?,
            db.count_jobs()?,
            db.count_jobs_by_category()?,
        ))
    })
    .await?;

    Ok(Json(PublicJobsResponse {
        jobs: rows.into_iter().map(candidate_job).collect(),
        categories: category_counts(&category_rows),
        total_jobs,
    }))
}

pub async fn health() -> &'static str {
    "ok"
}

/// One entry per known category, zero-filled, in display order.
fn category_counts(rows: &[CategoryCountRow]) -> Vec<CategoryCount> {
    JobCategory::ALL
        .iter()
        .map(|category| CategoryCount {
            name: category.display_name().to_string(),
            count: rows
                .iter()
                .find(|row| row.category == category.as_str())
                .map_or(0, |row| row.count),
        })
        .collect()
}
