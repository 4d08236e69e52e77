//! Cafe repository for database operations.
//!
//! Queries are runtime-checked (`query_as`) so the crate builds without a
//! live database or an offline query cache.

use rand::Rng;
use sqlx::SqlitePool;
use sqlx::error::ErrorKind;
use tracing::instrument;

use cafe_api_core::{Cafe, CafeId, NewCafe};

use super::RepositoryError;

/// Repository for cafe database operations.
pub struct CafeRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CafeRepository<'a> {
    /// Create a new cafe repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every cafe in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<Cafe>, RepositoryError> {
        let cafes = sqlx::query_as::<_, Cafe>(
            r"
            SELECT id, name, map_url, img_url, location, seats,
                   has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            FROM cafe
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(cafes)
    }

    /// Pick one cafe uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::EmptyStore` if there are no cafes.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn pick_random(&self) -> Result<Cafe, RepositoryError> {
        let mut cafes = self.list_all().await?;
        if cafes.is_empty() {
            return Err(RepositoryError::EmptyStore);
        }

        let index = rand::rng().random_range(0..cafes.len());
        Ok(cafes.swap_remove(index))
    }

    /// Find cafes whose location equals `location` exactly (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn find_by_location(&self, location: &str) -> Result<Vec<Cafe>, RepositoryError> {
        let cafes = sqlx::query_as::<_, Cafe>(
            r"
            SELECT id, name, map_url, img_url, location, seats,
                   has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            FROM cafe
            WHERE location = ?
            ORDER BY id
            ",
        )
        .bind(location)
        .fetch_all(self.pool)
        .await?;

        Ok(cafes)
    }

    /// Get a cafe by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: CafeId) -> Result<Option<Cafe>, RepositoryError> {
        let cafe = sqlx::query_as::<_, Cafe>(
            r"
            SELECT id, name, map_url, img_url, location, seats,
                   has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            FROM cafe
            WHERE id = ?
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cafe)
    }

    /// Insert a new cafe and return it with its assigned ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a required field is absent or
    /// the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, new), fields(name = ?new.name))]
    pub async fn insert(&self, new: NewCafe) -> Result<Cafe, RepositoryError> {
        new.validate()
            .map_err(|e| RepositoryError::Conflict(e.to_string()))?;

        let cafe = sqlx::query_as::<_, Cafe>(
            r"
            INSERT INTO cafe (name, map_url, img_url, location, seats,
                              has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, map_url, img_url, location, seats,
                      has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price
            ",
        )
        .bind(new.name)
        .bind(new.map_url)
        .bind(new.img_url)
        .bind(new.location)
        .bind(new.seats)
        .bind(new.has_toilet)
        .bind(new.has_wifi)
        .bind(new.has_sockets)
        .bind(new.can_take_calls)
        .bind(new.coffee_price)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                match db_err.kind() {
                    ErrorKind::UniqueViolation => {
                        return RepositoryError::Conflict(
                            "a cafe with that name already exists".to_owned(),
                        );
                    }
                    ErrorKind::NotNullViolation => {
                        return RepositoryError::Conflict(db_err.message().to_owned());
                    }
                    _ => {}
                }
            }
            RepositoryError::Database(e)
        })?;

        tracing::info!(cafe_id = %cafe.id, "cafe added");
        Ok(cafe)
    }

    /// Set the coffee price of a cafe. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no cafe has that ID.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn update_coffee_price(
        &self,
        id: CafeId,
        new_price: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE cafe SET coffee_price = ? WHERE id = ?")
            .bind(new_price)
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a cafe.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no cafe has that ID.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CafeId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cafe WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::info!(cafe_id = %id, "cafe deleted");
        Ok(())
    }
}
