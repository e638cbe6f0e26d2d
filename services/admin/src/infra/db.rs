use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr,
    sea_query::{Expr, OnConflict},
};

use daehan_admin_schema::profiles;

use crate::domain::repository::ProfileRepository;
use crate::domain::types::{Profile, ProfilePatch};
use crate::error::AdminServiceError;

// ── Profile repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProfileRepository {
    pub db: Arc<DatabaseConnection>,
}

impl ProfileRepository for DbProfileRepository {
    async fn upsert(&self, profile: &Profile) -> Result<(), AdminServiceError> {
        let now = Utc::now();
        profiles::Entity::insert(profiles::ActiveModel {
            id: Set(profile.id.clone()),
            role: Set(profile.role.clone()),
            is_active: Set(profile.is_active),
            display_name: Set(profile.display_name.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::column(profiles::Column::Id)
                .update_columns([
                    profiles::Column::Role,
                    profiles::Column::IsActive,
                    profiles::Column::DisplayName,
                    profiles::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(self.db.as_ref())
        .await
        .map_err(|e| store_error(e, "upsert profile"))?;
        Ok(())
    }

    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Profile>, AdminServiceError> {
        let models = profiles::Entity::find()
            .filter(profiles::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| store_error(e, "find profiles by ids"))?;
        Ok(models.into_iter().map(profile_from_model).collect())
    }

    async fn update(&self, id: &str, patch: &ProfilePatch) -> Result<(), AdminServiceError> {
        let mut query = profiles::Entity::update_many()
            .col_expr(profiles::Column::UpdatedAt, Expr::value(Utc::now()));
        if let Some(role) = &patch.role {
            query = query.col_expr(profiles::Column::Role, Expr::value(role.clone()));
        }
        if let Some(is_active) = patch.is_active {
            query = query.col_expr(profiles::Column::IsActive, Expr::value(is_active));
        }
        let result = query
            .filter(profiles::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| store_error(e, "update profile"))?;
        if result.rows_affected == 0 {
            return Err(AdminServiceError::StoreRejected("profile not found".to_owned()));
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, AdminServiceError> {
        let result = profiles::Entity::delete_by_id(id.to_owned())
            .exec(self.db.as_ref())
            .await
            .map_err(|e| store_error(e, "delete profile"))?;
        Ok(result.rows_affected > 0)
    }
}

/// Constraint violations are rejections of the request; everything else is unexpected.
fn store_error(err: DbErr, op: &'static str) -> AdminServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(message))
        | Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
            AdminServiceError::StoreRejected(message)
        }
        _ => AdminServiceError::Store(anyhow::Error::new(err).context(op)),
    }
}

fn profile_from_model(model: profiles::Model) -> Profile {
    Profile {
        id: model.id,
        role: model.role,
        is_active: model.is_active,
        display_name: model.display_name,
    }
}
