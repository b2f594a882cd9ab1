use sea_orm::prelude::*;
use sea_orm::QuerySelect;

use crate::entities::sessions::{ActiveModel, Column, Entity, Model};

use super::now;

impl Model {
    /// Live sessions only; an expired row reads as logged out.
    pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Option<Self> {
        let query = Entity::find()
            .filter(Column::Id.eq(id))
            .filter(Column::ExpiresAt.gt(now()));

        match query.one(db).await {
            Ok(session) => session,
            Err(e) => {
                ::tracing::error!("Failed to find session by id");
                ::tracing::error!("Error: {}", e);

                None
            }
        }
    }

    pub async fn store(&self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        ActiveModel::from(self.clone()).insert(db).await
    }

    pub async fn delete(db: &DatabaseConnection, id: Uuid) -> Result<(), DbErr> {
        Entity::delete_by_id(id).exec(db).await?;

        Ok(())
    }

    pub async fn ids_for_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Vec<Uuid>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::UserId.eq(user_id))
            .into_tuple::<Uuid>()
            .all(db)
            .await
    }

    /// Drop every other session the same account holds. Runs after a
    /// password change so stolen cookies stop working.
    pub async fn revoke_others(
        db: &DatabaseConnection,
        user_id: Uuid,
        current: Uuid,
    ) -> Result<u64, DbErr> {
        let result = Entity::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Id.ne(current))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete_expired(db: &DatabaseConnection) -> Result<u64, DbErr> {
        let result = Entity::delete_many()
            .filter(Column::ExpiresAt.lte(now()))
            .exec(db)
            .await?;

        Ok(result.rows_affected)
    }
}
