//! Cached user stats maintenance
//!
//! The stats stored on a user are a cache. Any operation that changes the course set or a
//! course's progress calls [`refresh_user_stats`], which recomputes from scratch and
//! overwrites the cache.

use courseforge_common::types::UserStats;
use courseforge_generator::compute_stats;
use uuid::Uuid;

use crate::db::DbResult;
use crate::repository::Repositories;

#[tracing::instrument(skip(repos))]
pub async fn refresh_user_stats(repos: &Repositories, user_id: Uuid) -> DbResult<UserStats> {
    let courses = repos.courses.all_courses(user_id).await?;
    let stats = compute_stats(&courses);
    repos.users.update_stats(user_id, stats).await?;

    tracing::debug!(
        total_courses = stats.total_courses,
        completed_courses = stats.completed_courses,
        "User stats refreshed"
    );
    Ok(stats)
}
