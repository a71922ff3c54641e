//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{availability_records, favorites, notifications, products};

/// Database row for a product (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductRow {
    pub id: i32,
    pub name: String,
    pub roastery: String,
    pub url: String,
    pub price: f32,
    pub description: Option<String>,
    pub organic: bool,
    pub available: bool,
    pub size_token: Option<String>,
    pub size_grams: Option<i32>,
    pub group_id: Option<String>,
    pub tags_json: Option<String>,
    pub tagged_at: Option<String>,
    pub first_seen_at: String,
    pub updated_at: String,
}

/// Database row for a product (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = products)]
pub struct NewProductRow {
    pub name: String,
    pub roastery: String,
    pub url: String,
    pub price: f32,
    pub description: Option<String>,
    pub organic: bool,
    pub available: bool,
    pub size_token: Option<String>,
    pub size_grams: Option<i32>,
    pub first_seen_at: String,
    pub updated_at: String,
}

/// Database row for an availability record (queryable).
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = availability_records)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AvailabilityRow {
    pub id: i32,
    pub product_id: i32,
    pub available: bool,
    pub price: f32,
    pub checked_at: String,
}

/// Database row for an availability record (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = availability_records)]
pub struct NewAvailabilityRow {
    pub product_id: i32,
    pub available: bool,
    pub price: f32,
    pub checked_at: String,
}

/// Database row for a notification log entry (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = notifications)]
pub struct NewNotificationRow {
    pub product_id: i32,
    pub kind: String,
    pub sent_at: String,
}

/// Database row for a favorite.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct FavoriteRow {
    pub id: String,
    pub name: String,
    pub terms: String,
    pub size_preference: Option<String>,
    pub organic_only: bool,
}
