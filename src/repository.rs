use crate::{
    models::{Difficulty, Image, Region, User, Walk, WalkDetail},
    query::{SortDirection, SortField, WalkListQuery},
};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool, query_builder::QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// The abstract contract for all persistence operations. Handlers only ever
/// talk to this trait, so the concrete store can be swapped (Postgres in
/// production, a mock in tests) without touching endpoint logic.
///
/// Errors propagate to the caller; translating them into HTTP responses is
/// the endpoint layer's job, not the repository's.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Regions ---
    async fn list_regions(&self) -> Result<Vec<Region>, sqlx::Error>;
    async fn find_region(&self, id: Uuid) -> Result<Option<Region>, sqlx::Error>;
    async fn create_region(&self, region: Region) -> Result<Region, sqlx::Error>;
    // Returns None when no row matched the id; never inserts.
    async fn update_region(&self, id: Uuid, region: Region) -> Result<Option<Region>, sqlx::Error>;
    // Hard delete. Returns the deleted row so the caller can echo it back.
    async fn delete_region(&self, id: Uuid) -> Result<Option<Region>, sqlx::Error>;

    // --- Walks ---
    async fn list_walks(&self, query: &WalkListQuery) -> Result<Vec<WalkDetail>, sqlx::Error>;
    async fn find_walk(&self, id: Uuid) -> Result<Option<WalkDetail>, sqlx::Error>;
    async fn create_walk(&self, walk: Walk) -> Result<WalkDetail, sqlx::Error>;
    async fn update_walk(&self, id: Uuid, walk: Walk) -> Result<Option<WalkDetail>, sqlx::Error>;
    async fn delete_walk(&self, id: Uuid) -> Result<Option<WalkDetail>, sqlx::Error>;

    // --- Difficulties (seeded reference data, read-only) ---
    async fn list_difficulties(&self) -> Result<Vec<Difficulty>, sqlx::Error>;

    // --- Users & Roles ---
    // Creates the user row and its role assignments in one transaction, so a
    // failed role assignment leaves no partial account behind.
    async fn create_user_with_roles(
        &self,
        user: User,
        roles: &[String],
    ) -> Result<(), sqlx::Error>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;
    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<String>, sqlx::Error>;

    // --- Images (append-only) ---
    async fn record_image(&self, image: Image) -> Result<Image, sqlx::Error>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by Postgres.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Flat row shape for the walk + region + difficulty join.
#[derive(FromRow)]
struct WalkRow {
    id: Uuid,
    name: String,
    description: String,
    length_km: f64,
    walk_image_url: Option<String>,
    region_id: Uuid,
    difficulty_id: Uuid,
    r_code: String,
    r_name: String,
    r_region_image_url: Option<String>,
    d_name: String,
}

impl WalkRow {
    fn into_detail(self) -> WalkDetail {
        WalkDetail {
            region: Region {
                id: self.region_id,
                code: self.r_code,
                name: self.r_name,
                region_image_url: self.r_region_image_url,
            },
            difficulty: Difficulty {
                id: self.difficulty_id,
                name: self.d_name,
            },
            walk: Walk {
                id: self.id,
                name: self.name,
                description: self.description,
                length_km: self.length_km,
                walk_image_url: self.walk_image_url,
                region_id: self.region_id,
                difficulty_id: self.difficulty_id,
            },
        }
    }
}

const WALK_SELECT: &str = "SELECT w.id, w.name, w.description, w.length_km, w.walk_image_url, \
     w.region_id, w.difficulty_id, \
     r.code AS r_code, r.name AS r_name, r.region_image_url AS r_region_image_url, \
     d.name AS d_name \
     FROM walks w \
     JOIN regions r ON w.region_id = r.id \
     JOIN difficulties d ON w.difficulty_id = d.id";

#[async_trait]
impl Repository for PostgresRepository {
    async fn list_regions(&self) -> Result<Vec<Region>, sqlx::Error> {
        sqlx::query_as::<_, Region>(
            "SELECT id, code, name, region_image_url FROM regions ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn find_region(&self, id: Uuid) -> Result<Option<Region>, sqlx::Error> {
        sqlx::query_as::<_, Region>(
            "SELECT id, code, name, region_image_url FROM regions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_region(&self, region: Region) -> Result<Region, sqlx::Error> {
        sqlx::query_as::<_, Region>(
            "INSERT INTO regions (id, code, name, region_image_url) VALUES ($1, $2, $3, $4) \
             RETURNING id, code, name, region_image_url",
        )
        .bind(region.id)
        .bind(region.code)
        .bind(region.name)
        .bind(region.region_image_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_region(&self, id: Uuid, region: Region) -> Result<Option<Region>, sqlx::Error> {
        sqlx::query_as::<_, Region>(
            "UPDATE regions SET code = $2, name = $3, region_image_url = $4 WHERE id = $1 \
             RETURNING id, code, name, region_image_url",
        )
        .bind(id)
        .bind(region.code)
        .bind(region.name)
        .bind(region.region_image_url)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_region(&self, id: Uuid) -> Result<Option<Region>, sqlx::Error> {
        sqlx::query_as::<_, Region>(
            "DELETE FROM regions WHERE id = $1 RETURNING id, code, name, region_image_url",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// list_walks
    ///
    /// Composes the resolved list query into SQL: case-insensitive substring
    /// filter, recognized sort fields, pagination after both. Semantics match
    /// `WalkListQuery::apply`.
    async fn list_walks(&self, query: &WalkListQuery) -> Result<Vec<WalkDetail>, sqlx::Error> {
        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(WALK_SELECT);

        if let Some((_, filter_query)) = &query.filter {
            builder.push(" WHERE w.name ILIKE ");
            builder.push_bind(format!("%{filter_query}%"));
        }

        if let Some((field, direction)) = &query.sort {
            match field {
                SortField::Name => builder.push(" ORDER BY w.name"),
                SortField::LengthInKm => builder.push(" ORDER BY w.length_km"),
            };
            match direction {
                SortDirection::Ascending => builder.push(" ASC"),
                SortDirection::Descending => builder.push(" DESC"),
            };
        }

        builder.push(" LIMIT ");
        builder.push_bind(query.limit());
        builder.push(" OFFSET ");
        builder.push_bind(query.offset());

        let rows = builder
            .build_query_as::<WalkRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(WalkRow::into_detail).collect())
    }

    async fn find_walk(&self, id: Uuid) -> Result<Option<WalkDetail>, sqlx::Error> {
        let row = sqlx::query_as::<_, WalkRow>(&format!("{WALK_SELECT} WHERE w.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(WalkRow::into_detail))
    }

    async fn create_walk(&self, walk: Walk) -> Result<WalkDetail, sqlx::Error> {
        sqlx::query(
            "INSERT INTO walks (id, name, description, length_km, walk_image_url, region_id, difficulty_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(walk.id)
        .bind(&walk.name)
        .bind(&walk.description)
        .bind(walk.length_km)
        .bind(&walk.walk_image_url)
        .bind(walk.region_id)
        .bind(walk.difficulty_id)
        .execute(&self.pool)
        .await?;

        // Re-read through the join so the caller gets the related rows too.
        self.find_walk(walk.id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    async fn update_walk(&self, id: Uuid, walk: Walk) -> Result<Option<WalkDetail>, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE walks SET name = $2, description = $3, length_km = $4, walk_image_url = $5, \
             region_id = $6, difficulty_id = $7 WHERE id = $1",
        )
        .bind(id)
        .bind(&walk.name)
        .bind(&walk.description)
        .bind(walk.length_km)
        .bind(&walk.walk_image_url)
        .bind(walk.region_id)
        .bind(walk.difficulty_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_walk(id).await
    }

    async fn delete_walk(&self, id: Uuid) -> Result<Option<WalkDetail>, sqlx::Error> {
        // Capture the joined row before the delete so it can be returned.
        let Some(detail) = self.find_walk(id).await? else {
            return Ok(None);
        };
        sqlx::query("DELETE FROM walks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(Some(detail))
    }

    async fn list_difficulties(&self) -> Result<Vec<Difficulty>, sqlx::Error> {
        sqlx::query_as::<_, Difficulty>("SELECT id, name FROM difficulties ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await
    }

    /// create_user_with_roles
    ///
    /// The user row and every role assignment commit together or not at all.
    /// An unknown role name affects zero rows and rolls the whole
    /// registration back.
    async fn create_user_with_roles(
        &self,
        user: User,
        roles: &[String],
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO users (id, username, password_hash) VALUES ($1, $2, $3)")
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.password_hash)
            .execute(&mut *tx)
            .await?;

        for role in roles {
            let result = sqlx::query(
                "INSERT INTO user_roles (user_id, role_id) \
                 SELECT $1, id FROM roles WHERE name = $2",
            )
            .bind(user.id)
            .bind(role)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                // Dropping the transaction rolls back the user row as well.
                return Err(sqlx::Error::RowNotFound);
            }
        }

        tx.commit().await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    async fn roles_of(&self, user_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT r.name FROM roles r \
             JOIN user_roles ur ON ur.role_id = r.id \
             WHERE ur.user_id = $1 ORDER BY r.name ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn record_image(&self, image: Image) -> Result<Image, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "INSERT INTO images (id, file_name, file_description, file_extension, file_size_bytes, file_path) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, file_name, file_description, file_extension, file_size_bytes, file_path",
        )
        .bind(image.id)
        .bind(image.file_name)
        .bind(image.file_description)
        .bind(image.file_extension)
        .bind(image.file_size_bytes)
        .bind(image.file_path)
        .fetch_one(&self.pool)
        .await
    }
}
