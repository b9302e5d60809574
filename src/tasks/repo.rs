use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// The three fixed buckets a task moves through. Stored as the
/// `task_status` enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
}

impl TaskStatus {
    /// Accepts exactly the three valid wire values.
    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "Pending" => Some(TaskStatus::Pending),
            "Processing" => Some(TaskStatus::Processing),
            "Completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Task record as stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub status: TaskStatus,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Task {
    /// All tasks owned by one user, oldest first.
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<Task>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, status, user_id, created_at, updated_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn create(db: &PgPool, user_id: Uuid, title: &str) -> Result<Task, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, user_id)
            VALUES ($1, $2)
            RETURNING id, title, status, user_id, created_at, updated_at
            "#,
        )
        .bind(title)
        .bind(user_id)
        .fetch_one(db)
        .await
    }

    /// Partial update scoped by id AND owner in one statement; omitted fields
    /// are left as they are, `updated_at` always refreshes. Returns the row
    /// count, which is zero when the task is absent or foreign-owned.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        user_id: Uuid,
        title: Option<&str>,
        status: Option<TaskStatus>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = COALESCE($3, title),
                status = COALESCE($4, status),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(title)
        .bind(status)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete scoped by id AND owner. Zero rows means absent or foreign-owned.
    pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"DELETE FROM tasks WHERE id = $1 AND user_id = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Existence probe used only to tell 404 from 403 after a zero-row
    /// mutation.
    pub async fn exists(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS (SELECT 1 FROM tasks WHERE id = $1)"#)
            .bind(id)
            .fetch_one(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_the_three_buckets() {
        assert_eq!(TaskStatus::parse("Pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("Processing"), Some(TaskStatus::Processing));
        assert_eq!(TaskStatus::parse("Completed"), Some(TaskStatus::Completed));
    }

    #[test]
    fn parse_rejects_anything_else() {
        assert_eq!(TaskStatus::parse("pending"), None);
        assert_eq!(TaskStatus::parse("Done"), None);
        assert_eq!(TaskStatus::parse(""), None);
        assert_eq!(TaskStatus::parse("COMPLETED"), None);
    }

    #[test]
    fn status_serializes_to_wire_value() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Processing).unwrap(),
            "\"Processing\""
        );
    }

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            id: Uuid::new_v4(),
            title: "write report".into(),
            status: TaskStatus::Pending,
            user_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"userId\""));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"updatedAt\""));
        assert!(json.contains("\"Pending\""));
    }
}
