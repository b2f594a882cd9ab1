use sea_orm::Set;
use sea_orm::prelude::*;

use crate::entities::sessions;
use crate::entities::users::{ActiveModel, Column, Entity, Model};

use super::now;

impl Model {
    pub async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Option<Self> {
        let query = Entity::find().filter(Column::Id.eq(id));

        match query.one(db).await {
            Ok(user) => user,
            Err(e) => {
                ::tracing::error!("Failed to find user by id");
                ::tracing::error!("Error: {}", e);

                None
            }
        }
    }

    pub async fn find_by_username<T: ToString>(
        db: &DatabaseConnection,
        username: T,
    ) -> Option<Self> {
        let query = Entity::find().filter(Column::Username.eq(username.to_string()));

        match query.one(db).await {
            Ok(user) => user,
            Err(e) => {
                ::tracing::error!("Failed to find user by username");
                ::tracing::error!("Error: {}", e);

                None
            }
        }
    }

    pub async fn username_exists<T: ToString>(db: &DatabaseConnection, username: T) -> bool {
        let query = Entity::find()
            .filter(Column::Username.eq(username.to_string()))
            .count(db);

        query.await.unwrap_or(0) > 0
    }

    pub async fn store(&self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        ActiveModel::from(self.clone()).insert(db).await
    }

    pub async fn update_password<T: ToString>(
        &self,
        db: &DatabaseConnection,
        password: T,
    ) -> Result<Self, DbErr> {
        let mut model = ActiveModel::from(self.clone());

        model.password = Set(password.to_string());
        model.updated_at = Set(now());
        model.update(db).await
    }

    /// Stamp `last_login`, mirroring what the login flow expects to read
    /// back on the profile page.
    pub async fn record_login(&self, db: &DatabaseConnection) -> Result<Self, DbErr> {
        let mut model = ActiveModel::from(self.clone());

        model.last_login = Set(Some(now()));
        model.updated_at = Set(now());
        model.update(db).await
    }

    pub async fn start_session(
        &self,
        db: &DatabaseConnection,
        lifetime: u64,
    ) -> Result<sessions::Model, DbErr> {
        let session = sessions::Model {
            id: Uuid::new_v4(),
            user_id: self.id,
            created_at: now(),
            expires_at: now() + chrono::Duration::seconds(lifetime as i64),
        };

        session.store(db).await
    }
}
