//! Repository for the `knack_ideas` and `knack_idea_images` tables.

use sqlx::{PgPool, Postgres, Transaction};
use knacks_core::listing::ListingQuery;
use knacks_core::types::DbId;

use crate::models::knack_idea::{CreateKnackIdea, KnackIdeaImage, KnackIdeaRow, UpdateKnackIdea};
use crate::repositories::listing_filter::{
    bind_listing_values, bind_listing_values_scalar, build_listing_filter, order_clause,
};

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

/// Select list for knack idea queries; expects the idea as `ki` and the
/// category as `c`.
const COLUMNS: &str = "\
    ki.id, ki.owner_id, ki.category_id, ki.name, ki.description, ki.type AS kind, \
    ki.price, ki.created_at, ki.modified_at, c.name AS category_name";

/// Owner and category joins for an idea aliased as `ki`.
const JOINS: &str = "\
    JOIN users u ON u.id = ki.owner_id \
    JOIN categories c ON c.id = ki.category_id";

/// Column list for `knack_idea_images` queries.
const IMAGE_COLUMNS: &str = "id, knack_idea_id, photo, created_at";

// ---------------------------------------------------------------------------
// KnackIdeaRepo
// ---------------------------------------------------------------------------

/// Provides CRUD and filtered listing for knack ideas.
pub struct KnackIdeaRepo;

impl KnackIdeaRepo {
    /// List knack ideas matching `query`, one page at a time.
    pub async fn list(
        pool: &PgPool,
        query: &ListingQuery,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<KnackIdeaRow>, sqlx::Error> {
        let (where_clause, bind_values, bind_idx) = build_listing_filter(query, "ki");
        let order = order_clause(query.sort, "ki");

        let sql = format!(
            "SELECT {COLUMNS} FROM knack_ideas ki {JOINS} {where_clause} {order} \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );

        let q = bind_listing_values(sqlx::query_as::<_, KnackIdeaRow>(&sql), &bind_values);
        q.bind(limit).bind(offset).fetch_all(pool).await
    }

    /// Count knack ideas matching `query`.
    pub async fn count(pool: &PgPool, query: &ListingQuery) -> Result<i64, sqlx::Error> {
        let (where_clause, bind_values, _) = build_listing_filter(query, "ki");

        let sql = format!(
            "SELECT COUNT(*)::BIGINT FROM knack_ideas ki \
             JOIN users u ON u.id = ki.owner_id {where_clause}"
        );

        let q = bind_listing_values_scalar(sqlx::query_scalar::<_, i64>(&sql), &bind_values);
        q.fetch_one(pool).await
    }

    /// Find a knack idea by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<KnackIdeaRow>, sqlx::Error> {
        let sql = format!("SELECT {COLUMNS} FROM knack_ideas ki {JOINS} WHERE ki.id = $1");
        sqlx::query_as::<_, KnackIdeaRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Create a new knack idea, returning the joined row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateKnackIdea,
    ) -> Result<KnackIdeaRow, sqlx::Error> {
        Self::create_with_images(pool, input, &[]).await
    }

    /// Create a knack idea and attach `photos` to it in one transaction.
    ///
    /// Nothing is written unless every image insert succeeds.
    pub async fn create_with_images(
        pool: &PgPool,
        input: &CreateKnackIdea,
        photos: &[String],
    ) -> Result<KnackIdeaRow, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            "WITH ki AS (
                INSERT INTO knack_ideas (owner_id, category_id, name, description, type, price)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
             )
             SELECT {COLUMNS} FROM ki {JOINS}"
        );
        let row = sqlx::query_as::<_, KnackIdeaRow>(&sql)
            .bind(input.owner_id)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(input.price)
            .fetch_one(&mut *tx)
            .await?;

        insert_images(&mut tx, row.id, photos).await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Update a knack idea and append `photos` to it in one transaction.
    ///
    /// Returns `None` (and writes nothing) if the idea does not exist.
    pub async fn update_with_images(
        pool: &PgPool,
        id: DbId,
        input: &UpdateKnackIdea,
        photos: &[String],
    ) -> Result<Option<KnackIdeaRow>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sql = format!(
            "WITH ki AS (
                UPDATE knack_ideas SET
                    category_id = COALESCE($2, category_id),
                    name = COALESCE($3, name),
                    description = COALESCE($4, description),
                    type = COALESCE($5, type),
                    price = COALESCE($6, price)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM ki {JOINS}"
        );
        let row = sqlx::query_as::<_, KnackIdeaRow>(&sql)
            .bind(id)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.kind)
            .bind(input.price)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        insert_images(&mut tx, id, photos).await?;

        tx.commit().await?;
        Ok(Some(row))
    }

    /// Bump `modified_at` without changing any field.
    pub async fn touch(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE knack_ideas SET modified_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a knack idea (and its images) by ID. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM knack_ideas WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Append image rows for `knack_idea_id` inside an open transaction.
async fn insert_images(
    tx: &mut Transaction<'_, Postgres>,
    knack_idea_id: DbId,
    photos: &[String],
) -> Result<(), sqlx::Error> {
    for photo in photos {
        sqlx::query("INSERT INTO knack_idea_images (knack_idea_id, photo) VALUES ($1, $2)")
            .bind(knack_idea_id)
            .bind(photo)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// KnackIdeaImageRepo
// ---------------------------------------------------------------------------

/// Provides access to the photos attached to knack ideas.
pub struct KnackIdeaImageRepo;

impl KnackIdeaImageRepo {
    /// List the images of one idea in insertion order.
    pub async fn list_by_idea(
        pool: &PgPool,
        knack_idea_id: DbId,
    ) -> Result<Vec<KnackIdeaImage>, sqlx::Error> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM knack_idea_images \
             WHERE knack_idea_id = $1 ORDER BY id ASC"
        );
        sqlx::query_as::<_, KnackIdeaImage>(&sql)
            .bind(knack_idea_id)
            .fetch_all(pool)
            .await
    }

    /// List the images of several ideas at once, grouped by idea and in
    /// insertion order within each idea.
    pub async fn list_for_ideas(
        pool: &PgPool,
        knack_idea_ids: &[DbId],
    ) -> Result<Vec<KnackIdeaImage>, sqlx::Error> {
        if knack_idea_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM knack_idea_images \
             WHERE knack_idea_id = ANY($1) ORDER BY knack_idea_id ASC, id ASC"
        );
        sqlx::query_as::<_, KnackIdeaImage>(&sql)
            .bind(knack_idea_ids)
            .fetch_all(pool)
            .await
    }
}
