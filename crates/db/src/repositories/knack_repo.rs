//! Repository for the `knacks` table.

use sqlx::PgPool;
use knacks_core::listing::ListingQuery;
use knacks_core::types::DbId;

use crate::models::knack::{CreateKnack, KnackRow, UpdateKnack};
use crate::repositories::listing_filter::{
    bind_listing_values, bind_listing_values_scalar, build_listing_filter, order_clause,
};

/// Select list for knack queries; expects the knack as `k`, owner as `u`
/// and category as `c`.
const COLUMNS: &str = "\
    k.id, k.owner_id, k.category_id, k.name, k.description, k.type AS kind, \
    k.price, k.photo, k.video, k.created_at, k.modified_at, \
    c.name AS category_name, \
    u.first_name AS owner_first_name, u.last_name AS owner_last_name, \
    u.college AS owner_college, u.age AS owner_age, \
    u.is_online AS owner_online, u.picture AS owner_picture";

/// Owner and category joins for a knack aliased as `k`.
const JOINS: &str = "\
    JOIN users u ON u.id = k.owner_id \
    JOIN categories c ON c.id = k.category_id";

/// Provides CRUD and filtered listing for knacks.
pub struct KnackRepo;

impl KnackRepo {
    /// List knacks matching `query`, one page at a time.
    pub async fn list(
        pool: &PgPool,
        query: &ListingQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<KnackRow>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_listing_filter(query, "k");
        let order = order_clause(query.sort, "k");

        let sql = format!(
            "SELECT {COLUMNS} FROM knacks k {JOINS} {where_clause} {order} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_listing_values(sqlx::query_as::<_, KnackRow>(&sql), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count knacks matching `query` (for pagination metadata).
    pub async fn count(pool: &PgPool, query: &ListingQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_listing_filter(query, "k");

        let sql = format!(
            "SELECT COUNT(*)::BIGINT FROM knacks k \
             JOIN users u ON u.id = k.owner_id {where_clause}"
        );

        let q = bind_listing_values_scalar(sqlx::query_scalar::<_, i64>(&sql), &bind_values);
        q.fetch_one(pool).await
    }

    /// Find a knack by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<KnackRow>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM knacks k {JOINS} WHERE k.id = $1");
        sqlx::query_as::<_, KnackRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a new knack, returning the joined row.
    pub async fn create(pool: &PgPool, input: &CreateKnack) -> Result<KnackRow, sqlx::Error> {
        let sql = format!(
            "WITH k AS (
                INSERT INTO knacks (owner_id, category_id, name, description, type, price, photo)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
             )
             SELECT {COLUMNS} FROM k {JOINS}"
        );
        sqlx::query_as::<_, KnackRow>(&sql)
            .bind(input.owner_id)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(input.price)
            .bind(&input.photo)
            .fetch_one(pool)
            .await
    }

    /// Update a knack by ID, returning the joined row.
    ///
    /// Fields left as `None` keep their stored value.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateKnack,
    ) -> Result<Option<KnackRow>, sqlx::Error> {
        let sql = format!(
            "WITH k AS (
                UPDATE knacks SET
                    category_id = COALESCE($2, category_id),
                    name = COALESCE($3, name),
                    description = COALESCE($4, description),
                    type = COALESCE($5, type),
                    price = COALESCE($6, price),
                    photo = COALESCE($7, photo)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM k {JOINS}"
        );
        sqlx::query_as::<_, KnackRow>(&sql)
            .bind(id)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(input.price)
            .bind(&input.photo)
            .fetch_optional(pool)
            .await
    }

    /// Delete a knack by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM knacks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
