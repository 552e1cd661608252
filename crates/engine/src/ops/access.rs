use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use super::Engine;
use crate::{EngineError, ResultEngine, Role, config_types, configs, status_approves, users};

/// Generates an existence probe plus a `require_*` helper returning
/// `KeyNotFound` when the row is missing.
macro_rules! impl_require_exists {
    ($exists_fn:ident, $require_fn:ident, $entity:path, $id_ty:ty) => {
        async fn $exists_fn(&self, db: &DatabaseTransaction, id: $id_ty) -> ResultEngine<bool> {
            <$entity>::find_by_id(id)
                .one(db)
                .await
                .map(|model| model.is_some())
                .map_err(Into::into)
        }

        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: $id_ty,
        ) -> ResultEngine<()> {
            let key = id.to_string();
            if !self.$exists_fn(db, id).await? {
                return Err(EngineError::KeyNotFound(key));
            }
            Ok(())
        }
    };
}

impl Engine {
    impl_require_exists!(
        status_approve_exists,
        require_status_approve,
        status_approves::Entity,
        i32
    );
    impl_require_exists!(
        config_type_exists,
        require_config_type,
        config_types::Entity,
        String
    );
    impl_require_exists!(config_exists, require_config, configs::Entity, String);
    impl_require_exists!(user_exists, require_user, users::Entity, String);

    pub(super) async fn require_user_by_id(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(user_id.to_string()))
    }

    pub(super) async fn require_admin(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        let model = self.require_user_by_id(db, user_id).await?;
        if Role::try_from(model.role.as_str())? != Role::Admin {
            return Err(EngineError::Forbidden("admin role required".to_string()));
        }
        Ok(model)
    }

    /// Admits the record owner and any admin, rejects everyone else.
    pub(super) async fn require_owner_or_admin(
        &self,
        db: &DatabaseTransaction,
        owner_id: &str,
        user_id: Uuid,
    ) -> ResultEngine<users::Model> {
        let model = self.require_user_by_id(db, user_id).await?;
        if model.id != owner_id && Role::try_from(model.role.as_str())? != Role::Admin {
            return Err(EngineError::Forbidden(
                "owner or admin role required".to_string(),
            ));
        }
        Ok(model)
    }

    pub(super) async fn find_user_by_email(
        &self,
        db: &DatabaseTransaction,
        email: &str,
    ) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await
            .map_err(Into::into)
    }
}
