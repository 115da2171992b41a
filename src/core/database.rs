// src/core/database.rs
//! Job storage on SQLite: connection management, migrations and queries

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::Path;
use uuid::Uuid;

use crate::app_log;
use crate::core::query::{fold_case, JobFilter, Pagination};
use crate::types::{Job, JobId, JobType, JobTypeStats, NewJob};

const JOB_COLUMNS: &str = "id, company, position, description, logo, experience, \
    location_type, salary, salary_lpa, job_type, posted_time, application_deadline, \
    is_active, created_at, updated_at";

/// Case-folded copies of the searchable text, written alongside every job
const FOLDED_COLUMNS: &str = "search_text, company_folded";

// ===== Core Database Connection Management =====

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and run migrations
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to database: {}", database_path.display())
            })?;

        app_log!(
            info,
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    /// Private in-memory database; a single long-lived connection keeps the data alive
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory database")?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn jobs(&self) -> JobRepository<'_> {
        JobRepository::new(&self.pool)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                id BLOB PRIMARY KEY NOT NULL,
                company TEXT NOT NULL,
                position TEXT NOT NULL,
                description TEXT NOT NULL,
                logo TEXT NOT NULL,
                experience TEXT NOT NULL,
                location_type TEXT NOT NULL,
                salary TEXT NOT NULL,
                salary_lpa INTEGER,
                job_type TEXT NOT NULL,
                posted_time TEXT NOT NULL,
                application_deadline TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                search_text TEXT NOT NULL DEFAULT '',
                company_folded TEXT NOT NULL DEFAULT ''
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create jobs table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_jobs_active_created ON jobs(is_active, created_at);",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_job_type ON jobs(job_type);")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_jobs_company ON jobs(company);")
            .execute(&self.pool)
            .await?;

        app_log!(info, "Database migrations completed");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

/// True when the storage layer rejected a write because of a duplicate key.
pub fn is_unique_violation(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .map(|e| e.is_unique_violation())
        .unwrap_or(false)
}

// ===== Row mapping =====

fn search_text(job: &Job) -> String {
    fold_case(&format!("{} {} {}", job.company, job.position, job.description))
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    company: String,
    position: String,
    description: String,
    logo: String,
    experience: String,
    location_type: String,
    salary: String,
    salary_lpa: Option<i64>,
    job_type: String,
    posted_time: String,
    application_deadline: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self> {
        let job_type = row
            .job_type
            .parse::<JobType>()
            .with_context(|| format!("Stored job {} has an invalid job type", row.id))?;

        Ok(Job {
            id: JobId::from_uuid(row.id),
            company: row.company,
            position: row.position,
            description: row.description,
            logo: row.logo,
            experience: row.experience,
            location_type: row.location_type,
            salary: row.salary,
            salary_lpa: row.salary_lpa,
            job_type,
            posted_time: row.posted_time,
            application_deadline: row.application_deadline,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ===== Job Repository =====

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of matching jobs, newest first, plus the total match count
    pub async fn list(&self, filter: &JobFilter, page: Pagination) -> Result<(Vec<Job>, u64)> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM jobs");
        filter.push_where(&mut count);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await
            .context("Failed to count jobs")?;

        let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM jobs", JOB_COLUMNS));
        filter.push_where(&mut select);
        select
            .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<JobRow>()
            .fetch_all(self.pool)
            .await
            .context("Failed to fetch jobs")?;

        let jobs = rows
            .into_iter()
            .map(Job::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok((jobs, u64::try_from(total).unwrap_or_default()))
    }

    pub async fn get(&self, id: JobId) -> Result<Option<Job>> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {} FROM jobs WHERE id = ?",
            JOB_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await
        .with_context(|| format!("Failed to fetch job {}", id))?;

        row.map(Job::try_from).transpose()
    }

    pub async fn insert(&self, new_job: NewJob) -> Result<Job> {
        self.insert_with_id(JobId::new(), new_job).await
    }

    pub async fn insert_with_id(&self, id: JobId, new_job: NewJob) -> Result<Job> {
        let job = new_job.into_job(id, Utc::now());

        sqlx::query(&format!(
            "INSERT INTO jobs ({}, {}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            JOB_COLUMNS, FOLDED_COLUMNS
        ))
        .bind(job.id.as_uuid())
        .bind(&job.company)
        .bind(&job.position)
        .bind(&job.description)
        .bind(&job.logo)
        .bind(&job.experience)
        .bind(&job.location_type)
        .bind(&job.salary)
        .bind(job.salary_lpa)
        .bind(job.job_type.label())
        .bind(&job.posted_time)
        .bind(&job.application_deadline)
        .bind(job.is_active)
        .bind(job.created_at)
        .bind(job.updated_at)
        .bind(search_text(&job))
        .bind(fold_case(&job.company))
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to insert job {}", job.id))?;

        app_log!(
            info,
            "Created job {}: {} at {}",
            job.id,
            job.position,
            job.company
        );
        Ok(job)
    }

    /// Persist every mutable column of an existing job. Returns false when the id is unknown.
    pub async fn save(&self, job: &Job) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET company = ?, position = ?, description = ?, logo = ?, experience = ?,
                location_type = ?, salary = ?, salary_lpa = ?, job_type = ?, posted_time = ?,
                application_deadline = ?, is_active = ?, updated_at = ?,
                search_text = ?, company_folded = ?
            WHERE id = ?
            "#,
        )
        .bind(&job.company)
        .bind(&job.position)
        .bind(&job.description)
        .bind(&job.logo)
        .bind(&job.experience)
        .bind(&job.location_type)
        .bind(&job.salary)
        .bind(job.salary_lpa)
        .bind(job.job_type.label())
        .bind(&job.posted_time)
        .bind(&job.application_deadline)
        .bind(job.is_active)
        .bind(job.updated_at)
        .bind(search_text(job))
        .bind(fold_case(&job.company))
        .bind(job.id.as_uuid())
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to update job {}", job.id))?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: JobId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await
            .with_context(|| format!("Failed to delete job {}", id))?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            app_log!(info, "Deleted job {}", id);
        }
        Ok(deleted)
    }

    /// Count and average LPA per job type, most common type first
    pub async fn stats(&self, active_only: bool) -> Result<Vec<JobTypeStats>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT job_type, COUNT(*) AS count, AVG(salary_lpa) AS avg_salary FROM jobs",
        );
        if active_only {
            builder.push(" WHERE is_active = 1");
        }
        builder.push(" GROUP BY job_type ORDER BY count DESC, job_type ASC");

        let rows = builder
            .build_query_as::<(String, i64, Option<f64>)>()
            .fetch_all(self.pool)
            .await
            .context("Failed to aggregate job statistics")?;

        Ok(rows
            .into_iter()
            .map(|(job_type, count, avg_salary)| JobTypeStats {
                job_type,
                count,
                avg_salary,
            })
            .collect())
    }
}
