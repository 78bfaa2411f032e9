pub mod sequence;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection, EntityTrait,
    TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::config::Config;
use crate::core::stores::SequenceAllocator;
use crate::error::AppError;

pub async fn connect(config: &Config) -> Result<DatabaseConnection, AppError> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Configuration("DATABASE_URL is not set".to_string()))?;

    debug!("Connecting to database...");
    let db = Database::connect(database_url).await?;
    debug!("Database connected successfully");

    if config.run_migrations {
        debug!("Running database migrations...");
        migration::Migrator::up(&db, None).await?;
        debug!("Migrations completed successfully");
    }

    Ok(db)
}

/// Sequence allocator backed by the `sequences` table.
#[derive(Debug, Clone)]
pub struct SeaOrmSequenceAllocator {
    db: DatabaseConnection,
}

impl SeaOrmSequenceAllocator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SequenceAllocator for SeaOrmSequenceAllocator {
    async fn next_suffix_for(&self, entity_kind: &str, scope: &str) -> Result<String, AppError> {
        let name = format!("{}{}", entity_kind, scope);
        let txn = self.db.begin().await?;

        let next_number = match sequence::Entity::find_by_id(name.clone()).one(&txn).await? {
            Some(row) => {
                let next_number = row.next_number + 1;
                let mut active: sequence::ActiveModel = row.into();
                active.next_number = Set(next_number);
                active.update(&txn).await?;
                next_number
            }
            None => {
                sequence::ActiveModel {
                    name: Set(name.clone()),
                    next_number: Set(1),
                }
                .insert(&txn)
                .await?;
                1
            }
        };

        txn.commit().await?;
        info!("Allocated sequence number {} for {}", next_number, name);

        Ok(if next_number > 1 {
            next_number.to_string()
        } else {
            String::new()
        })
    }
}
