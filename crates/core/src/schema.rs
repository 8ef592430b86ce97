//! Static field schemas for the exposed resources.
//!
//! Each resource declares its stored columns, which of them are hidden from
//! output, which are read-only, and which derived fields the presenter adds.
//! Output shape and writability are resolved from these lists rather than
//! discovered at runtime.

/// Field layout of one API resource.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSchema {
    pub name: &'static str,
    /// Columns persisted for the entity, in declaration order.
    pub stored_fields: &'static [&'static str],
    /// Stored columns never exposed nor accepted by the API.
    pub excluded_fields: &'static [&'static str],
    /// Stored columns that are exposed but assigned by the server.
    pub read_only_fields: &'static [&'static str],
    /// Derived fields appended to the output record.
    pub computed_fields: &'static [&'static str],
}

impl ResourceSchema {
    /// Fields of the output record: stored minus excluded, then computed.
    pub fn output_fields(&self) -> Vec<&'static str> {
        self.stored_fields
            .iter()
            .filter(|f| !self.excluded_fields.contains(f))
            .chain(self.computed_fields.iter())
            .copied()
            .collect()
    }

    /// Whether a client may supply `field` on create or update.
    pub fn is_writable(&self, field: &str) -> bool {
        self.stored_fields.contains(&field)
            && !self.excluded_fields.contains(&field)
            && !self.read_only_fields.contains(&field)
    }
}

pub const CATEGORY: ResourceSchema = ResourceSchema {
    name: "Category",
    stored_fields: &["id", "name"],
    excluded_fields: &[],
    read_only_fields: &["id"],
    computed_fields: &[],
};

pub const KNACK: ResourceSchema = ResourceSchema {
    name: "Knack",
    stored_fields: &[
        "id",
        "owner",
        "category",
        "name",
        "description",
        "type",
        "price",
        "photo",
        "video",
        "created_at",
        "modified_at",
    ],
    excluded_fields: &["owner", "video"],
    read_only_fields: &["id", "created_at", "modified_at"],
    computed_fields: &[
        "category_name",
        "owner_id",
        "owner_name",
        "owner_college",
        "owner_age",
        "owner_online",
        "owner_picture",
        "owner_picture_medium",
        "thumb_photo",
    ],
};

pub const KNACK_IDEA: ResourceSchema = ResourceSchema {
    name: "KnackIdea",
    stored_fields: &[
        "id",
        "owner",
        "category",
        "name",
        "description",
        "type",
        "price",
        "created_at",
        "modified_at",
    ],
    excluded_fields: &[],
    read_only_fields: &["id", "owner", "created_at", "modified_at"],
    computed_fields: &["category_name", "thumb_photo"],
};
