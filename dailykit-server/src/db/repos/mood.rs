//! Mood journal repository
//!
//! Date filters are inclusive UTC days applied to `recorded_at`: the start
//! bound is midnight of `start_date`, the end bound is the midnight after
//! `end_date`, exclusive.

use chrono::{DateTime, Utc};
use dailykit_core::{DateRange, Limit, Score, Text};
use sqlx::{FromRow, SqlitePool};

use crate::db::guard::delete_by_id;
use crate::db::DbError;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MoodEntry {
    pub id: i64,
    pub user_id: String,
    pub mood_score: i64,
    pub energy_level: Option<i64>,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMoodEntry {
    pub user_id: Text,
    pub mood_score: Score,
    pub energy_level: Option<Score>,
    pub notes: Option<Text>,
    /// Defaults to the insert time
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct MoodEntryPatch {
    pub mood_score: Option<Score>,
    pub energy_level: Option<Score>,
    pub notes: Option<Text>,
}

#[derive(Debug, Clone)]
pub struct MoodFilter {
    pub user_id: Option<Text>,
    pub range: DateRange,
    pub limit: Limit,
}

/// Aggregate over a user's entries
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MoodStats {
    pub entry_count: i64,
    pub average_mood: Option<f64>,
    pub average_energy: Option<f64>,
}

const COLUMNS: &str =
    "id, user_id, mood_score, energy_level, notes, recorded_at, created_at, updated_at";

/// Mood entry repository
pub struct MoodRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MoodRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NewMoodEntry) -> Result<MoodEntry, DbError> {
        let now = Utc::now();
        let sql = format!(
            r#"
            INSERT INTO mood_entries
                (user_id, mood_score, energy_level, notes, recorded_at, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            RETURNING {COLUMNS}
            "#
        );
        let entry: MoodEntry = sqlx::query_as(&sql)
            .bind(input.user_id.as_str())
            .bind(input.mood_score.value())
            .bind(input.energy_level.map(|s| s.value()))
            .bind(input.notes.as_ref().map(Text::as_str))
            .bind(input.recorded_at.unwrap_or(now))
            .bind(now)
            .fetch_one(self.pool)
            .await?;

        tracing::debug!(id = entry.id, user_id = %entry.user_id, "mood entry created");
        Ok(entry)
    }

    /// Entries newest first, optionally for one user and within a date range.
    pub async fn list(&self, filter: &MoodFilter) -> Result<Vec<MoodEntry>, DbError> {
        let sql = format!(
            r#"
            SELECT {COLUMNS}
            FROM mood_entries
            WHERE (?1 IS NULL OR user_id = ?1)
              AND (?2 IS NULL OR recorded_at >= ?2)
              AND (?3 IS NULL OR recorded_at < ?3)
            ORDER BY recorded_at DESC, id DESC
            LIMIT ?4
            "#
        );
        let entries = sqlx::query_as(&sql)
            .bind(filter.user_id.as_ref().map(Text::as_str))
            .bind(filter.range.start_instant())
            .bind(filter.range.end_instant_exclusive())
            .bind(filter.limit.as_i64())
            .fetch_all(self.pool)
            .await?;

        Ok(entries)
    }

    pub async fn update(&self, id: i64, patch: MoodEntryPatch) -> Result<MoodEntry, DbError> {
        let sql = format!(
            r#"
            UPDATE mood_entries
            SET mood_score = COALESCE(?1, mood_score),
                energy_level = COALESCE(?2, energy_level),
                notes = COALESCE(?3, notes),
                updated_at = ?4
            WHERE id = ?5
            RETURNING {COLUMNS}
            "#
        );
        sqlx::query_as(&sql)
            .bind(patch.mood_score.map(|s| s.value()))
            .bind(patch.energy_level.map(|s| s.value()))
            .bind(patch.notes.as_ref().map(Text::as_str))
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("mood entry", id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        delete_by_id(self.pool, "mood entry", "mood_entries", id).await
    }

    /// Count and averages for one user within `range`.
    pub async fn stats(&self, user_id: &Text, range: DateRange) -> Result<MoodStats, DbError> {
        let stats = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS entry_count,
                AVG(mood_score) AS average_mood,
                AVG(energy_level) AS average_energy
            FROM mood_entries
            WHERE user_id = ?1
              AND (?2 IS NULL OR recorded_at >= ?2)
              AND (?3 IS NULL OR recorded_at < ?3)
            "#,
        )
        .bind(user_id.as_str())
        .bind(range.start_instant())
        .bind(range.end_instant_exclusive())
        .fetch_one(self.pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::test_support;
    use chrono::{NaiveDate, TimeZone};
    use dailykit_core::schema::limit::DEFAULT_JOURNAL_LIMIT;

    fn user(s: &str) -> Text {
        Text::new("user_id", s, Text::NAME_MAX).unwrap()
    }

    fn entry(user_id: &str, score: i64, recorded_at: DateTime<Utc>) -> NewMoodEntry {
        NewMoodEntry {
            user_id: user(user_id),
            mood_score: Score::new("mood_score", score).unwrap(),
            energy_level: None,
            notes: None,
            recorded_at: Some(recorded_at),
        }
    }

    fn at(day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, day, hour, min, sec).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn filter(user_id: Option<&str>, range: DateRange, limit: Option<u32>) -> MoodFilter {
        MoodFilter {
            user_id: user_id.map(user),
            range,
            limit: Limit::resolve(limit, DEFAULT_JOURNAL_LIMIT),
        }
    }

    #[tokio::test]
    async fn single_day_range_returns_exactly_that_day() {
        let pool = test_support::pool().await;
        let repo = MoodRepo::new(&pool);

        repo.create(entry("u1", 3, at(9, 23, 59, 59))).await.unwrap();
        let a = repo.create(entry("u1", 5, at(10, 0, 0, 0))).await.unwrap();
        let b = repo.create(entry("u1", 7, at(10, 23, 59, 59))).await.unwrap();
        repo.create(entry("u1", 9, at(11, 0, 0, 0))).await.unwrap();

        let range = DateRange::new(Some(day(10)), Some(day(10))).unwrap();
        let listed = repo.list(&filter(Some("u1"), range, None)).await.unwrap();

        let ids: Vec<_> = listed.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn default_limit_and_user_scope() {
        let pool = test_support::pool().await;
        let repo = MoodRepo::new(&pool);

        for i in 0..35 {
            repo.create(entry("u1", 5, at(1, 0, i, 0))).await.unwrap();
        }
        repo.create(entry("u2", 5, at(2, 0, 0, 0))).await.unwrap();

        let u1 = repo
            .list(&filter(Some("u1"), DateRange::default(), None))
            .await
            .unwrap();
        assert_eq!(u1.len(), 30);
        assert!(u1.iter().all(|e| e.user_id == "u1"));
        assert!(u1.windows(2).all(|w| w[0].recorded_at >= w[1].recorded_at));

        let everyone = repo
            .list(&filter(None, DateRange::default(), Some(100)))
            .await
            .unwrap();
        assert_eq!(everyone.len(), 36);
        assert_eq!(everyone[0].user_id, "u2");
    }

    #[tokio::test]
    async fn recorded_at_defaults_to_now() {
        let pool = test_support::pool().await;
        let before = Utc::now();
        let created = MoodRepo::new(&pool)
            .create(NewMoodEntry {
                recorded_at: None,
                ..entry("u1", 6, before)
            })
            .await
            .unwrap();
        assert!(created.recorded_at >= before);
        assert_eq!(created.recorded_at, created.created_at);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let pool = test_support::pool().await;
        let repo = MoodRepo::new(&pool);
        let created = repo.create(entry("u1", 4, at(1, 8, 0, 0))).await.unwrap();

        let updated = repo
            .update(
                created.id,
                MoodEntryPatch {
                    energy_level: Some(Score::new("energy_level", 8).unwrap()),
                    notes: Some(Text::new("notes", "slept well", Text::BODY_MAX).unwrap()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.mood_score, 4);
        assert_eq!(updated.energy_level, Some(8));
        assert_eq!(updated.notes.as_deref(), Some("slept well"));

        repo.delete(created.id).await.unwrap();
        assert!(matches!(
            repo.update(created.id, MoodEntryPatch::default()).await.unwrap_err(),
            DbError::NotFound { resource: "mood entry", .. }
        ));
    }

    #[tokio::test]
    async fn stats_average_within_range() {
        let pool = test_support::pool().await;
        let repo = MoodRepo::new(&pool);

        repo.create(NewMoodEntry {
            energy_level: Some(Score::new("energy_level", 6).unwrap()),
            ..entry("u1", 4, at(3, 12, 0, 0))
        })
        .await
        .unwrap();
        repo.create(entry("u1", 8, at(4, 12, 0, 0))).await.unwrap();
        repo.create(entry("u1", 1, at(20, 12, 0, 0))).await.unwrap();

        let range = DateRange::new(Some(day(1)), Some(day(5))).unwrap();
        let stats = repo.stats(&user("u1"), range).await.unwrap();
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.average_mood, Some(6.0));
        assert_eq!(stats.average_energy, Some(6.0));

        let empty = repo.stats(&user("nobody"), DateRange::default()).await.unwrap();
        assert_eq!(empty.entry_count, 0);
        assert_eq!(empty.average_mood, None);
    }
}
