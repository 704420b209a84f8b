use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::debug;
use uuid::Uuid;

use models::office;

use crate::errors::ServiceError;
use crate::office::domain::Office;
use crate::office::repository::OfficeRepository;

/// Postgres-backed office collection.
pub struct SeaOrmOfficeRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl OfficeRepository for SeaOrmOfficeRepository {
    async fn insert(&self, o: &Office) -> Result<(), ServiceError> {
        office::validate(o)?;
        office::Entity::insert(office::to_active_model(o.clone()))
            .exec_without_returning(&self.db)
            .await?;
        debug!(office_id = %o.id, "office row inserted");
        Ok(())
    }

    async fn replace(&self, id: Uuid, o: &Office) -> Result<bool, ServiceError> {
        office::validate(o)?;
        let am = office::to_active_model(Office { id, ..o.clone() });
        match office::Entity::update(am).exec(&self.db).await {
            Ok(_) => Ok(true),
            Err(DbErr::RecordNotUpdated) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_status(&self, id: Uuid, is_active: bool) -> Result<bool, ServiceError> {
        let res = office::Entity::update_many()
            .col_expr(office::Column::IsActive, Expr::value(is_active))
            .filter(office::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let res = office::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn find_all(&self) -> Result<Vec<Office>, ServiceError> {
        Ok(office::Entity::find().order_by_asc(office::Column::Id).all(&self.db).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Office>, ServiceError> {
        Ok(office::Entity::find_by_id(id).one(&self.db).await?)
    }
}
