use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{
    Project, ProjectInput, ProjectMember, ProjectStatus, ProjectTask, ProjectTaskInput, TaskStatus,
};

const PROJECT_COLUMNS: &str = r#"
    id,
    organization_id,
    name,
    description,
    status,
    manager_id,
    created_at,
    updated_at
"#;

const TASK_COLUMNS: &str = r#"
    id,
    project_id,
    title,
    status,
    assigned_to,
    due_date,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, organization_id: Uuid, input: ProjectInput) -> Result<Project> {
        let now = Utc::now();

        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO
                projects (id, organization_id, name, description, status, manager_id, created_at, updated_at)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(input.status.unwrap_or(ProjectStatus::Planned))
        .bind(input.manager_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn list(
        &self,
        organization_id: Uuid,
        status: Option<ProjectStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64)> {
        let mut conditions = vec!["organization_id = $1".to_string()];
        let mut param_index = 2;

        if status.is_some() {
            conditions.push(format!("status = ${param_index}"));
            param_index += 1;
        }

        let where_clause = conditions.join(" AND ");
        let list_query = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT ${param_index} OFFSET ${}",
            param_index + 1
        );
        let count_query = format!("SELECT COUNT(*) FROM projects WHERE {where_clause}");

        let mut list = sqlx::query_as::<_, Project>(&list_query).bind(organization_id);
        let mut count = sqlx::query_scalar::<_, i64>(&count_query).bind(organization_id);

        if let Some(s) = status {
            list = list.bind(s);
            count = count.bind(s);
        }

        let projects = list.bind(limit).bind(offset).fetch_all(&self.pool).await?;
        let total = count.fetch_one(&self.pool).await?;

        Ok((projects, total))
    }

    pub async fn update(&self, id: Uuid, input: ProjectInput) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE
                projects
            SET
                name = $1,
                description = $2,
                status = COALESCE($3, status),
                manager_id = COALESCE($4, manager_id),
                updated_at = $5
            WHERE
                id = $6
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.description.as_deref())
        .bind(input.status)
        .bind(input.manager_id)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Tasks

    pub async fn create_task(&self, project_id: Uuid, input: ProjectTaskInput) -> Result<ProjectTask> {
        let now = Utc::now();

        let task = sqlx::query_as::<_, ProjectTask>(&format!(
            r#"
            INSERT INTO
                project_tasks (id, project_id, title, status, assigned_to, due_date, created_at, updated_at)
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(&input.title)
        .bind(input.status.unwrap_or(TaskStatus::Todo))
        .bind(input.assigned_to)
        .bind(input.due_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn find_task(&self, id: Uuid) -> Result<Option<ProjectTask>> {
        let task = sqlx::query_as::<_, ProjectTask>(&format!(
            "SELECT {TASK_COLUMNS} FROM project_tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<ProjectTask>> {
        let tasks = sqlx::query_as::<_, ProjectTask>(&format!(
            "SELECT {TASK_COLUMNS} FROM project_tasks WHERE project_id = $1 ORDER BY created_at"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn update_task(&self, id: Uuid, input: ProjectTaskInput) -> Result<ProjectTask> {
        let task = sqlx::query_as::<_, ProjectTask>(&format!(
            r#"
            UPDATE
                project_tasks
            SET
                title = $1,
                status = COALESCE($2, status),
                assigned_to = COALESCE($3, assigned_to),
                due_date = COALESCE($4, due_date),
                updated_at = $5
            WHERE
                id = $6
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(&input.title)
        .bind(input.status)
        .bind(input.assigned_to)
        .bind(input.due_date)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM project_tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Members

    pub async fn add_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO
                project_members (project_id, user_id, created_at)
            VALUES
                ($1, $2, $3)
            ON CONFLICT (project_id, user_id) DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn remove_member(&self, project_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_members(&self, project_id: Uuid) -> Result<Vec<ProjectMember>> {
        let members = sqlx::query_as::<_, ProjectMember>(
            "SELECT project_id, user_id, created_at FROM project_members WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}
