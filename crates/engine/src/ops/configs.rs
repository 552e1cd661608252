use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};
use uuid::Uuid;

use super::{Engine, normalize_required_name, with_tx};
use crate::{
    Config, ConfigType, EngineError, ResultEngine, approve_lists, config_types, configs,
};

/// Filters for config listings.
#[derive(Clone, Debug, Default)]
pub struct ConfigFilter {
    /// Substring match on the name.
    pub search: Option<String>,
}

/// A config joined with its category.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigRow {
    pub config: Config,
    pub config_type: Option<ConfigType>,
}

impl Engine {
    /// Creates a config category. Names are unique.
    pub async fn create_config_type(&self, name: &str) -> ResultEngine<ConfigType> {
        let name = normalize_required_name(name, "config type name")?;

        with_tx!(self, |db_tx| {
            let existing = config_types::Entity::find()
                .filter(config_types::Column::Name.eq(name.as_str()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(name));
            }
            let config_type = ConfigType::new(name);
            config_types::ActiveModel::from(&config_type)
                .insert(&db_tx)
                .await?;
            Ok(config_type)
        })
    }

    pub async fn list_config_types(&self) -> ResultEngine<Vec<ConfigType>> {
        with_tx!(self, |db_tx| {
            let models = config_types::Entity::find()
                .order_by_asc(config_types::Column::Name)
                .all(&db_tx)
                .await?;
            models.into_iter().map(ConfigType::try_from).collect()
        })
    }

    pub async fn create_config(&self, name: &str, config_type_id: Uuid) -> ResultEngine<ConfigRow> {
        let name = normalize_required_name(name, "config name")?;

        with_tx!(self, |db_tx| {
            self.require_config_type(&db_tx, config_type_id.to_string())
                .await?;
            let config = Config::new(name, config_type_id);
            configs::ActiveModel::from(&config).insert(&db_tx).await?;
            let config_type = self.load_config_type(&db_tx, config_type_id).await?;
            Ok(ConfigRow {
                config,
                config_type,
            })
        })
    }

    /// Configs with their categories, newest first.
    pub async fn list_configs(
        &self,
        page: u64,
        size: u64,
        filter: &ConfigFilter,
    ) -> ResultEngine<(Vec<ConfigRow>, u64)> {
        with_tx!(self, |db_tx| {
            let mut query = configs::Entity::find();
            if let Some(search) = filter.search.as_deref() {
                query = query.filter(configs::Column::Name.contains(search));
            }
            let total = query.clone().count(&db_tx).await?;
            let models = query
                .order_by_desc(configs::Column::CreatedAt)
                .order_by_desc(configs::Column::Id)
                .offset(page.saturating_sub(1) * size)
                .limit(size)
                .all(&db_tx)
                .await?;
            let rows = self.config_rows(&db_tx, models).await?;
            Ok((rows, total))
        })
    }

    pub async fn config_detail(&self, config_id: Uuid) -> ResultEngine<ConfigRow> {
        with_tx!(self, |db_tx| {
            let model = configs::Entity::find_by_id(config_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(config_id.to_string()))?;
            let config = Config::try_from(model)?;
            let config_type = self.load_config_type(&db_tx, config.config_type_id).await?;
            Ok(ConfigRow {
                config,
                config_type,
            })
        })
    }

    pub async fn update_config(
        &self,
        config_id: Uuid,
        name: Option<&str>,
        config_type_id: Option<Uuid>,
    ) -> ResultEngine<ConfigRow> {
        let name = name
            .map(|value| normalize_required_name(value, "config name"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = configs::Entity::find_by_id(config_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(config_id.to_string()))?;
            let mut config = Config::try_from(model)?;
            if let Some(name) = name {
                config.name = name;
            }
            if let Some(config_type_id) = config_type_id {
                self.require_config_type(&db_tx, config_type_id.to_string())
                    .await?;
                config.config_type_id = config_type_id;
            }
            config.updated_at = Utc::now();
            let update = configs::ActiveModel {
                id: ActiveValue::Set(config.id.to_string()),
                name: ActiveValue::Set(config.name.clone()),
                config_type_id: ActiveValue::Set(config.config_type_id.to_string()),
                updated_at: ActiveValue::Set(config.updated_at),
                ..Default::default()
            };
            update.update(&db_tx).await?;
            let config_type = self.load_config_type(&db_tx, config.config_type_id).await?;
            Ok(ConfigRow {
                config,
                config_type,
            })
        })
    }

    /// Deletes a config unless an approval request still points at it.
    pub async fn delete_config(&self, config_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_config(&db_tx, config_id.to_string()).await?;
            let referenced = approve_lists::Entity::find()
                .filter(approve_lists::Column::ConfigId.eq(config_id.to_string()))
                .count(&db_tx)
                .await?;
            if referenced > 0 {
                return Err(EngineError::Conflict(
                    "config is referenced by approve lists".to_string(),
                ));
            }
            configs::Entity::delete_by_id(config_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn load_config_type(
        &self,
        db: &DatabaseTransaction,
        config_type_id: Uuid,
    ) -> ResultEngine<Option<ConfigType>> {
        config_types::Entity::find_by_id(config_type_id.to_string())
            .one(db)
            .await?
            .map(ConfigType::try_from)
            .transpose()
    }

    pub(super) async fn config_rows(
        &self,
        db: &DatabaseTransaction,
        models: Vec<configs::Model>,
    ) -> ResultEngine<Vec<ConfigRow>> {
        let type_ids: Vec<String> = models
            .iter()
            .map(|model| model.config_type_id.clone())
            .collect();
        let mut types = HashMap::new();
        if !type_ids.is_empty() {
            for model in config_types::Entity::find()
                .filter(config_types::Column::Id.is_in(type_ids))
                .all(db)
                .await?
            {
                types.insert(model.id.clone(), ConfigType::try_from(model)?);
            }
        }

        let mut rows = Vec::with_capacity(models.len());
        for model in models {
            let config_type = types.get(&model.config_type_id).cloned();
            rows.push(ConfigRow {
                config: Config::try_from(model)?,
                config_type,
            });
        }
        Ok(rows)
    }
}
