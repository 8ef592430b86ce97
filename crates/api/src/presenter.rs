//! Output records for knacks and knack ideas.
//!
//! Rows come back from the repositories with owner and category columns
//! already joined; the presenter turns them into the public field set,
//! resolving media URLs and deriving thumbnails. Which fields appear is
//! fixed by [`knacks_core::schema`]; the tests below pin the two together.

use std::collections::HashMap;

use knacks_core::error::CoreError;
use knacks_core::thumbnail::{
    optional_thumbnail, ThumbnailService, IDEA_PHOTO, KNACK_PHOTO, OWNER_PICTURE,
    OWNER_PICTURE_MEDIUM,
};
use knacks_core::types::{DbId, Timestamp};
use knacks_db::models::knack::KnackRow;
use knacks_db::models::knack_idea::{KnackIdeaImage, KnackIdeaRow};
use knacks_db::models::user::full_name;
use serde::Serialize;

use crate::media::MediaStorage;
use crate::state::AppState;

/// Public representation of a knack.
#[derive(Debug, Serialize)]
pub struct KnackRecord {
    pub id: DbId,
    pub category: DbId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub photo: Option<String>,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
    pub category_name: String,
    pub owner_id: DbId,
    pub owner_name: String,
    pub owner_college: Option<String>,
    pub owner_age: Option<i32>,
    pub owner_online: bool,
    pub owner_picture: Option<String>,
    pub owner_picture_medium: Option<String>,
    pub thumb_photo: Option<String>,
}

/// Public representation of a knack idea.
#[derive(Debug, Serialize)]
pub struct KnackIdeaRecord {
    pub id: DbId,
    pub owner: DbId,
    pub category: DbId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
    pub category_name: String,
    /// One thumbnail per attached image, in upload order.
    pub thumb_photo: Vec<String>,
}

/// Builds output records from joined rows.
pub struct Presenter<'a> {
    thumbnails: &'a dyn ThumbnailService,
    media: &'a MediaStorage,
}

impl<'a> Presenter<'a> {
    pub fn new(thumbnails: &'a dyn ThumbnailService, media: &'a MediaStorage) -> Self {
        Self { thumbnails, media }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(state.thumbnails.as_ref(), state.media.as_ref())
    }

    pub fn knack(&self, row: KnackRow) -> Result<KnackRecord, CoreError> {
        let picture = row.owner_picture.as_deref();
        let photo = row.photo.as_deref();

        Ok(KnackRecord {
            owner_picture: optional_thumbnail(self.thumbnails, picture, OWNER_PICTURE)?,
            owner_picture_medium: optional_thumbnail(
                self.thumbnails,
                picture,
                OWNER_PICTURE_MEDIUM,
            )?,
            thumb_photo: optional_thumbnail(self.thumbnails, photo, KNACK_PHOTO)?,
            photo: photo
                .filter(|p| !p.is_empty())
                .map(|p| self.media.url_for(p)),
            owner_name: full_name(&row.owner_first_name, &row.owner_last_name),
            id: row.id,
            category: row.category_id,
            name: row.name,
            description: row.description,
            kind: row.kind,
            price: row.price,
            created_at: row.created_at,
            modified_at: row.modified_at,
            category_name: row.category_name,
            owner_id: row.owner_id,
            owner_college: row.owner_college,
            owner_age: row.owner_age,
            owner_online: row.owner_online,
        })
    }

    pub fn knacks(&self, rows: Vec<KnackRow>) -> Result<Vec<KnackRecord>, CoreError> {
        rows.into_iter().map(|row| self.knack(row)).collect()
    }

    pub fn knack_idea(
        &self,
        row: KnackIdeaRow,
        images: &[KnackIdeaImage],
    ) -> Result<KnackIdeaRecord, CoreError> {
        let thumb_photo = images
            .iter()
            .filter_map(|image| {
                optional_thumbnail(self.thumbnails, Some(&image.photo), IDEA_PHOTO).transpose()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(KnackIdeaRecord {
            id: row.id,
            owner: row.owner_id,
            category: row.category_id,
            name: row.name,
            description: row.description,
            kind: row.kind,
            price: row.price,
            created_at: row.created_at,
            modified_at: row.modified_at,
            category_name: row.category_name,
            thumb_photo,
        })
    }

    /// Present a page of ideas, pairing each with its images.
    ///
    /// `images` may hold images of any idea in any order.
    pub fn knack_ideas(
        &self,
        rows: Vec<KnackIdeaRow>,
        images: Vec<KnackIdeaImage>,
    ) -> Result<Vec<KnackIdeaRecord>, CoreError> {
        let mut by_idea: HashMap<DbId, Vec<KnackIdeaImage>> = HashMap::new();
        for image in images {
            by_idea.entry(image.knack_idea_id).or_default().push(image);
        }
        for group in by_idea.values_mut() {
            group.sort_by_key(|image| image.id);
        }

        rows.into_iter()
            .map(|row| {
                let images = by_idea.get(&row.id).map(Vec::as_slice).unwrap_or(&[]);
                self.knack_idea(row, images)
            })
            .collect()
    }
}
