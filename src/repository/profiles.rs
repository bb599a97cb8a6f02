//! Profiles repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::profile::{avatar_url_for, Profile, UpdateProfile},
};

#[derive(Clone)]
pub struct ProfilesRepository {
    pool: Pool<Postgres>,
}

impl ProfilesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: Uuid) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Profile> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", id)))
    }

    /// Create the profile on first sign-in, or update name and phone.
    ///
    /// New profiles start as clients with no loyalty points; role and
    /// points are never changed here.
    pub async fn upsert(
        &self,
        id: Uuid,
        data: &UpdateProfile,
        fallback_email: Option<&str>,
    ) -> AppResult<Profile> {
        let email = data.email.as_deref().or(fallback_email);
        let row = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (id, full_name, phone, email, avatar_url, role, loyalty_points)
            VALUES ($1, $2, $3, $4, $5, 'client', 0)
            ON CONFLICT (id) DO UPDATE SET
                full_name = EXCLUDED.full_name,
                phone = EXCLUDED.phone,
                email = COALESCE(EXCLUDED.email, profiles.email),
                avatar_url = COALESCE(profiles.avatar_url, EXCLUDED.avatar_url),
                modif_date = NOW()
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.full_name.trim())
        .bind(data.phone.trim())
        .bind(email)
        .bind(avatar_url_for(&data.full_name))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Client directory search (name or email, case-insensitive; phone substring)
    pub async fn search_clients(&self, text: Option<&str>) -> AppResult<Vec<Profile>> {
        let pattern = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{}%", t.replace('%', "\\%").replace('_', "\\_")));

        let rows = sqlx::query_as::<_, Profile>(
            r#"
            SELECT * FROM profiles
            WHERE role = 'client'
              AND ($1::TEXT IS NULL
                   OR full_name ILIKE $1
                   OR email ILIKE $1
                   OR phone LIKE $1)
            ORDER BY full_name NULLS LAST
            LIMIT 200
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
