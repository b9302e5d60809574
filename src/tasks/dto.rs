use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tasks::repo::{Task, TaskStatus};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
}

/// Partial update: omitted fields stay unchanged. `task_id` and `status`
/// arrive as strings and are validated in the handler so a bad value is a
/// 400, not a framework rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub task_id: Option<String>,
    pub title: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTaskRequest {
    pub task_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTaskResponse {
    pub success: bool,
    pub task_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub affected: u64,
}

/// The dashboard's three columns.
#[derive(Debug, Default, Serialize)]
pub struct TaskBoard {
    pub pending: Vec<Task>,
    pub processing: Vec<Task>,
    pub completed: Vec<Task>,
}

/// Splits a user's tasks into the three buckets, preserving input order
/// within each.
pub fn partition(tasks: Vec<Task>) -> TaskBoard {
    let mut board = TaskBoard::default();
    for task in tasks {
        match task.status {
            TaskStatus::Pending => board.pending.push(task),
            TaskStatus::Processing => board.processing.push(task),
            TaskStatus::Completed => board.completed.push(task),
        }
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn task(title: &str, status: TaskStatus) -> Task {
        Task {
            id: Uuid::new_v4(),
            title: title.into(),
            status,
            user_id: Uuid::new_v4(),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn every_task_lands_in_exactly_one_bucket() {
        let board = partition(vec![
            task("a", TaskStatus::Pending),
            task("b", TaskStatus::Completed),
            task("c", TaskStatus::Processing),
            task("d", TaskStatus::Completed),
        ]);
        assert_eq!(board.pending.len(), 1);
        assert_eq!(board.processing.len(), 1);
        assert_eq!(board.completed.len(), 2);
        let total = board.pending.len() + board.processing.len() + board.completed.len();
        assert_eq!(total, 4);
    }

    #[test]
    fn partition_preserves_order_within_a_bucket() {
        let board = partition(vec![
            task("first", TaskStatus::Pending),
            task("second", TaskStatus::Pending),
            task("third", TaskStatus::Pending),
        ]);
        let titles: Vec<&str> = board.pending.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "second", "third"]);
        assert!(board.processing.is_empty());
        assert!(board.completed.is_empty());
    }

    #[test]
    fn created_response_uses_task_id_key() {
        let json = serde_json::to_string(&CreatedTaskResponse {
            success: true,
            task_id: Uuid::new_v4(),
        })
        .unwrap();
        assert!(json.contains("\"taskId\""));
    }

    #[test]
    fn update_request_reads_camel_case_task_id() {
        let req: UpdateTaskRequest =
            serde_json::from_str("{\"taskId\":\"abc\",\"status\":\"Completed\"}").unwrap();
        assert_eq!(req.task_id.as_deref(), Some("abc"));
        assert_eq!(req.status.as_deref(), Some("Completed"));
        assert!(req.title.is_none());
    }
}
