//! Typed write requests built from multipart form payloads.
//!
//! The HTTP layer reads a multipart body into a list of named [`FormValue`]s.
//! [`KnackWriteRequest::from_form`] and [`KnackIdeaWriteRequest::from_form`]
//! turn that list into typed, validated requests exactly once. Fields that
//! the resource schema does not mark writable (`owner`, `video`, ids and
//! timestamps) are dropped, so ownership can only come from the server.

use image::ImageFormat;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::schema::{ResourceSchema, KNACK, KNACK_IDEA};
use crate::types::DbId;

/// Form field carrying photo uploads.
pub const PHOTO_FIELD: &str = "photo";

/// Image formats accepted for uploaded photos.
const ACCEPTED_IMAGE_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

// ---------------------------------------------------------------------------
// Raw form values
// ---------------------------------------------------------------------------

/// A file received in a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Lowercased extension of the client-side file name, if any.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }

    /// Sniff the image format from the file contents.
    pub fn image_format(&self) -> Option<ImageFormat> {
        image::guess_format(&self.bytes)
            .ok()
            .filter(|format| ACCEPTED_IMAGE_FORMATS.contains(format))
    }
}

/// One value of a multipart form part.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File(UploadedFile),
}

/// A multipart body as an ordered list of `(name, value)` pairs.
pub type FormParts = Vec<(String, FormValue)>;

// ---------------------------------------------------------------------------
// Listing fields
// ---------------------------------------------------------------------------

/// Scalar fields shared by knacks and knack ideas, all optional so the same
/// struct serves create, full update and partial update.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct ListingFields {
    pub category: Option<DbId>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, max = 64))]
    pub kind: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

/// [`ListingFields`] with every required value present.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteListingFields {
    pub category: DbId,
    pub name: String,
    pub description: String,
    pub kind: String,
    pub price: f64,
}

impl ListingFields {
    /// Check that every field required for a create or full update is set.
    ///
    /// `description` defaults to an empty string.
    pub fn require_complete(&self) -> Result<CompleteListingFields, CoreError> {
        let required = "This field is required.";
        Ok(CompleteListingFields {
            category: self.category.ok_or_else(|| CoreError::field("category", required))?,
            name: self
                .name
                .clone()
                .ok_or_else(|| CoreError::field("name", required))?,
            description: self.description.clone().unwrap_or_default(),
            kind: self
                .kind
                .clone()
                .ok_or_else(|| CoreError::field("type", required))?,
            price: self.price.ok_or_else(|| CoreError::field("price", required))?,
        })
    }

    fn set_text(&mut self, field: &str, text: String) -> Result<(), CoreError> {
        match field {
            "category" => {
                self.category = Some(text.trim().parse::<DbId>().map_err(|_| {
                    CoreError::field("category", format!("'{text}' is not a valid category id"))
                })?);
            }
            "name" => self.name = Some(text),
            "description" => self.description = Some(text),
            "type" => self.kind = Some(text),
            "price" => {
                self.price = match text.trim().parse::<f64>() {
                    Ok(value) if value.is_finite() => Some(value),
                    _ => {
                        return Err(CoreError::field(
                            "price",
                            format!("'{text}' is not a valid number"),
                        ))
                    }
                };
            }
            _ => {}
        }
        Ok(())
    }

    fn check(&self) -> Result<(), CoreError> {
        self.validate().map_err(first_field_error)
    }
}

/// Map validator output to a [`CoreError::FieldValidation`] on the first
/// failing field, using wire field names.
fn first_field_error(errors: ValidationErrors) -> CoreError {
    let failing = errors.field_errors();
    for (field, wire) in [("name", "name"), ("kind", "type"), ("price", "price")] {
        if let Some(errs) = failing.get(field) {
            let message = errs
                .first()
                .map(|e| e.code.to_string())
                .unwrap_or_else(|| "invalid".to_string());
            return CoreError::field(wire, message);
        }
    }
    CoreError::Validation(errors.to_string())
}

/// Fill `fields` from the writable text parts of `parts`, handing every
/// `photo` part to `on_photo` in order.
///
/// A file part with an empty file name is what browsers send for a file
/// input left blank; it is treated as absent.
fn collect_parts(
    schema: &ResourceSchema,
    parts: FormParts,
    fields: &mut ListingFields,
    mut on_photo: impl FnMut(FormValue),
) -> Result<(), CoreError> {
    for (name, value) in parts {
        if matches!(&value, FormValue::File(file) if file.file_name.is_empty()) {
            continue;
        }
        if name == PHOTO_FIELD {
            on_photo(value);
            continue;
        }
        if !schema.is_writable(&name) {
            continue;
        }
        match value {
            FormValue::Text(text) => fields.set_text(&name, text)?,
            FormValue::File(_) => {
                return Err(CoreError::Validation(format!(
                    "Field '{name}' expects a text value, not a file"
                )))
            }
        }
    }
    Ok(())
}

/// Reject uploads that are not a recognised image.
pub fn ensure_image(file: &UploadedFile) -> Result<(), CoreError> {
    if file.bytes.is_empty() {
        return Err(CoreError::field(PHOTO_FIELD, "The submitted file is empty."));
    }
    if file.image_format().is_none() {
        return Err(CoreError::field(
            PHOTO_FIELD,
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        ));
    }
    Ok(())
}

/// Apply the photo rule to the ordered `photo` values of a payload.
///
/// Only the first value counts. An uploaded file replaces the stored photo;
/// a plain string is an already-stored reference and leaves it untouched.
pub fn first_uploaded_photo(values: Vec<FormValue>) -> Option<UploadedFile> {
    match values.into_iter().next() {
        Some(FormValue::File(file)) => Some(file),
        Some(FormValue::Text(_)) | None => None,
    }
}

// ---------------------------------------------------------------------------
// Knack
// ---------------------------------------------------------------------------

/// Incoming knack create/update payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnackWriteRequest {
    pub fields: ListingFields,
    /// New photo to store. `None` keeps the current one.
    pub photo: Option<UploadedFile>,
}

impl KnackWriteRequest {
    pub fn from_form(parts: FormParts) -> Result<Self, CoreError> {
        let mut fields = ListingFields::default();
        let mut photos = Vec::new();
        collect_parts(&KNACK, parts, &mut fields, |value| photos.push(value))?;

        let photo = first_uploaded_photo(photos);
        if let Some(file) = &photo {
            ensure_image(file)?;
        }
        fields.check()?;

        Ok(Self { fields, photo })
    }
}

// ---------------------------------------------------------------------------
// Knack idea
// ---------------------------------------------------------------------------

/// Incoming knack idea create/update payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnackIdeaWriteRequest {
    pub fields: ListingFields,
    /// Images to append to the idea, in upload order.
    pub photos: Vec<UploadedFile>,
}

impl KnackIdeaWriteRequest {
    pub fn from_form(parts: FormParts) -> Result<Self, CoreError> {
        let mut fields = ListingFields::default();
        let mut photos = Vec::new();
        collect_parts(&KNACK_IDEA, parts, &mut fields, |value| {
            if let FormValue::File(file) = value {
                photos.push(file);
            }
        })?;

        for file in &photos {
            ensure_image(file)?;
        }
        fields.check()?;

        Ok(Self { fields, photos })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    /// Smallest valid PNG signature followed by an IHDR chunk header.
    const PNG_BYTES: &[u8] = &[
        0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D',
        b'R',
    ];

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: PNG_BYTES.to_vec(),
        }
    }

    fn text(name: &str, value: &str) -> (String, FormValue) {
        (name.to_string(), FormValue::Text(value.to_string()))
    }

    fn file(name: &str, upload: UploadedFile) -> (String, FormValue) {
        (name.to_string(), FormValue::File(upload))
    }

    fn full_knack_form() -> FormParts {
        vec![
            text("category", "2"),
            text("name", "Guitar lessons"),
            text("description", "Beginner friendly"),
            text("type", "offer"),
            text("price", "15.5"),
        ]
    }

    #[test]
    fn parses_complete_knack_form() {
        let request = KnackWriteRequest::from_form(full_knack_form()).unwrap();
        let complete = request.fields.require_complete().unwrap();
        assert_eq!(complete.category, 2);
        assert_eq!(complete.name, "Guitar lessons");
        assert_eq!(complete.kind, "offer");
        assert_eq!(complete.price, 15.5);
        assert_eq!(request.photo, None);
    }

    #[test]
    fn uploaded_photo_is_taken() {
        let mut parts = full_knack_form();
        parts.push(file("photo", png("a.png")));
        parts.push(file("photo", png("b.png")));

        let request = KnackWriteRequest::from_form(parts).unwrap();
        assert_eq!(request.photo.map(|p| p.file_name).as_deref(), Some("a.png"));
    }

    #[test]
    fn string_photo_leaves_stored_photo_untouched() {
        let mut parts = full_knack_form();
        parts.push(text("photo", "knacks/existing.png"));

        let request = KnackWriteRequest::from_form(parts).unwrap();
        assert_eq!(request.photo, None);
    }

    #[test]
    fn only_first_photo_value_counts() {
        let values = vec![
            FormValue::Text("knacks/existing.png".into()),
            FormValue::File(png("late.png")),
        ];
        assert_eq!(first_uploaded_photo(values), None);
    }

    #[test]
    fn missing_photo_is_not_an_error() {
        let request = KnackWriteRequest::from_form(vec![text("name", "Renamed")]).unwrap();
        assert_eq!(request.fields.name.as_deref(), Some("Renamed"));
        assert_eq!(request.photo, None);
    }

    fn blank_file_input() -> UploadedFile {
        UploadedFile {
            file_name: String::new(),
            content_type: Some("application/octet-stream".into()),
            bytes: Vec::new(),
        }
    }

    #[test]
    fn blank_file_input_counts_as_no_photo() {
        let parts = vec![text("name", "Renamed"), file("photo", blank_file_input())];

        let request = KnackWriteRequest::from_form(parts).unwrap();
        assert_eq!(request.fields.name.as_deref(), Some("Renamed"));
        assert_eq!(request.photo, None);
    }

    #[test]
    fn blank_file_input_does_not_shadow_later_upload() {
        let mut parts = full_knack_form();
        parts.push(file("photo", blank_file_input()));
        parts.push(file("photo", png("real.png")));

        let request = KnackWriteRequest::from_form(parts).unwrap();
        assert_eq!(request.photo.map(|p| p.file_name).as_deref(), Some("real.png"));
    }

    #[test]
    fn idea_skips_blank_file_inputs() {
        let mut parts = full_knack_form();
        parts.push(file("photo", blank_file_input()));

        let request = KnackIdeaWriteRequest::from_form(parts).unwrap();
        assert!(request.photos.is_empty());
    }

    #[test]
    fn empty_named_upload_is_rejected() {
        let mut parts = full_knack_form();
        parts.push(file(
            "photo",
            UploadedFile {
                file_name: "empty.png".into(),
                content_type: Some("image/png".into()),
                bytes: Vec::new(),
            },
        ));

        let err = KnackWriteRequest::from_form(parts).unwrap_err();
        assert_matches!(err, CoreError::FieldValidation { field: "photo", .. });
    }

    #[test]
    fn owner_and_video_parts_are_ignored() {
        let mut parts = full_knack_form();
        parts.push(text("owner", "999"));
        parts.push(text("owner_id", "999"));
        parts.push(file("video", png("clip.png")));

        let request = KnackWriteRequest::from_form(parts).unwrap();
        assert_eq!(request.fields.category, Some(2));
    }

    #[test]
    fn non_image_photo_is_rejected() {
        let mut parts = full_knack_form();
        parts.push(file(
            "photo",
            UploadedFile {
                file_name: "notes.txt".into(),
                content_type: Some("text/plain".into()),
                bytes: b"hello".to_vec(),
            },
        ));

        let err = KnackWriteRequest::from_form(parts).unwrap_err();
        assert_matches!(err, CoreError::FieldValidation { field: "photo", .. });
    }

    #[test]
    fn malformed_price_names_field() {
        let err = KnackWriteRequest::from_form(vec![text("price", "free")]).unwrap_err();
        assert_matches!(err, CoreError::FieldValidation { field: "price", .. });
    }

    #[test]
    fn negative_price_fails_validation() {
        let err = KnackWriteRequest::from_form(vec![text("price", "-1")]).unwrap_err();
        assert_matches!(err, CoreError::FieldValidation { field: "price", .. });
    }

    #[test]
    fn empty_name_fails_validation() {
        let err = KnackWriteRequest::from_form(vec![text("name", "")]).unwrap_err();
        assert_matches!(err, CoreError::FieldValidation { field: "name", .. });
    }

    #[test]
    fn incomplete_fields_name_missing_field() {
        let request = KnackWriteRequest::from_form(vec![text("name", "x")]).unwrap();
        let err = request.fields.require_complete().unwrap_err();
        assert_matches!(err, CoreError::FieldValidation { field: "category", .. });
    }

    #[test]
    fn description_defaults_to_empty() {
        let mut parts = full_knack_form();
        parts.retain(|(name, _)| name != "description");
        let request = KnackWriteRequest::from_form(parts).unwrap();
        assert_eq!(request.fields.require_complete().unwrap().description, "");
    }

    #[test]
    fn file_for_text_field_is_rejected() {
        let err = KnackWriteRequest::from_form(vec![file("name", png("a.png"))]).unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[test]
    fn idea_collects_every_uploaded_photo() {
        let mut parts = full_knack_form();
        parts.push(file("photo", png("1.png")));
        parts.push(text("photo", "ignored"));
        parts.push(file("photo", png("2.png")));

        let request = KnackIdeaWriteRequest::from_form(parts).unwrap();
        let names: Vec<_> = request.photos.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["1.png", "2.png"]);
    }

    #[test]
    fn idea_ignores_owner() {
        let mut parts = full_knack_form();
        parts.push(text("owner", "42"));
        let request = KnackIdeaWriteRequest::from_form(parts).unwrap();
        assert!(request.photos.is_empty());
        assert_eq!(request.fields.category, Some(2));
    }

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(png("A.PNG").extension().as_deref(), Some("png"));
        assert_eq!(png("noext").extension(), None);
    }
}
