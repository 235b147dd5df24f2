//! Relational adapter for ImprovementRepository
//!
//! Works with any SeaORM backend; PostgreSQL in production, SQLite in tests.

use async_trait::async_trait;
use chrono::DateTime;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Schema, Set, SqlErr,
};

use crate::domain::entities::{Improvement, ImprovementId, Original};
use crate::domain::ports::ImprovementRepository;
use crate::entity::improvements;
use crate::error::DomainError;

/// SeaORM implementation of ImprovementRepository
pub struct PostgresImprovementRepository {
    db: DatabaseConnection,
}

impl PostgresImprovementRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Connect and make sure the `improvements` table exists
    pub async fn connect(database_url: &str) -> Result<Self, DomainError> {
        let db = Database::connect(database_url).await.map_err(db_error)?;
        let repo = Self::new(db);
        repo.ensure_schema().await?;
        Ok(repo)
    }

    /// Create the `improvements` table if it is missing
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        let mut stmt = schema.create_table_from_entity(improvements::Entity);
        stmt.if_not_exists();

        self.db
            .execute(backend.build(&stmt))
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl ImprovementRepository for PostgresImprovementRepository {
    async fn add(&self, improvement: &Improvement) -> Result<(), DomainError> {
        improvements::Entity::insert(to_active_model(improvement))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    DomainError::AlreadyExists(improvement.id.to_string())
                }
                _ => db_error(e),
            })?;

        tracing::debug!(id = %improvement.id, "Inserted improvement row");
        Ok(())
    }

    async fn add_all(&self, improvements: &[Improvement]) -> Result<usize, DomainError> {
        if improvements.is_empty() {
            return Ok(0);
        }

        let inserted = improvements::Entity::insert_many(improvements.iter().map(to_active_model))
            .on_conflict(
                OnConflict::column(improvements::Column::Uuid)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(db_error)?;

        let inserted = inserted as usize;
        if inserted < improvements.len() {
            tracing::warn!(
                skipped = improvements.len() - inserted,
                "Skipped improvements whose id already exists"
            );
        }
        Ok(inserted)
    }

    async fn get(&self, id: &ImprovementId) -> Result<Improvement, DomainError> {
        let model = improvements::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| DomainError::NotFound(id.to_string()))?;

        to_domain(model)
    }

    async fn get_all(&self) -> Result<Vec<Improvement>, DomainError> {
        let models = improvements::Entity::find()
            .order_by_desc(improvements::Column::DateOrigTs)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn replace(&self, improvement: &Improvement) -> Result<(), DomainError> {
        let result = improvements::Entity::update_many()
            .set(to_active_model(improvement))
            .filter(improvements::Column::Uuid.eq(improvement.id.0))
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(improvement.id.to_string()));
        }
        tracing::debug!(id = %improvement.id, "Replaced improvement row");
        Ok(())
    }

    async fn delete(&self, id: &ImprovementId) -> Result<(), DomainError> {
        let result = improvements::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected == 0 {
            return Err(DomainError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

fn db_error(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

/// Flatten an Improvement and its Original into a table row
fn to_active_model(improvement: &Improvement) -> improvements::ActiveModel {
    let original = &improvement.original;
    improvements::ActiveModel {
        uuid: Set(improvement.id.0),
        title: Set(improvement.title.clone()),
        summary: Set(improvement.summary.clone()),
        title_orig: Set(original.title.clone()),
        summary_orig: Set(original.summary.clone()),
        link_orig: Set(original.link.clone()),
        image_link_orig: Set(original.image_link.clone().unwrap_or_default()),
        date_orig_ts: Set(original.date.timestamp()),
    }
}

/// Rebuild the domain entity from a table row, dates in UTC
fn to_domain(model: improvements::Model) -> Result<Improvement, DomainError> {
    let date = DateTime::from_timestamp(model.date_orig_ts, 0).ok_or_else(|| {
        DomainError::Database(format!(
            "Row {} has an out-of-range timestamp {}",
            model.uuid, model.date_orig_ts
        ))
    })?;

    Ok(Improvement {
        id: ImprovementId(model.uuid),
        title: model.title,
        summary: model.summary,
        original: Original::restore(
            model.title_orig,
            model.summary_orig,
            model.link_orig,
            date,
            Some(model.image_link_orig),
        ),
    })
}
