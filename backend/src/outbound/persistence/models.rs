//! Row structs mapping between the schema and domain entities.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::attraction::{Attraction, Location, PlaceId};
use crate::domain::compilation::{Compilation, CompilationItem};
use crate::domain::ports::StoreError;
use crate::domain::user::{User, UserId};
use crate::outbound::persistence::schema::{attractions, compilation_items, compilations, users};

fn place_id_from_store(raw: String) -> Result<PlaceId, StoreError> {
    PlaceId::new(raw).map_err(|_| StoreError::Query("blank place_id in store".into()))
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = attractions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AttractionRow {
    pub place_id: String,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: i32,
    pub price_level: Option<i32>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub photo_reference: Option<String>,
    pub photos_count: i32,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub opening_hours: Option<Value>,
    pub raw_data: Option<Value>,
    pub likes: i32,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttractionRow {
    pub fn into_domain(self) -> Result<Attraction, StoreError> {
        Ok(Attraction {
            place_id: place_id_from_store(self.place_id)?,
            name: self.name,
            formatted_address: self.formatted_address,
            country: self.country,
            city: self.city,
            category: self.category,
            types: self.types,
            rating: self.rating,
            user_ratings_total: self.user_ratings_total,
            price_level: self.price_level,
            location: Location {
                lat: self.lat,
                lng: self.lng,
            },
            photo_reference: self.photo_reference,
            photos_count: self.photos_count,
            website: self.website,
            phone_number: self.phone_number,
            opening_hours: self.opening_hours,
            raw_data: self.raw_data,
            likes: self.likes,
            is_featured: self.is_featured,
        })
    }
}

/// Insert and conflict-update payload for an attraction. Leaves `likes`,
/// `is_featured`, and the timestamps to column defaults so a re-upsert never
/// resets curation state.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = attractions)]
#[diesel(treat_none_as_null = true)]
pub struct AttractionUpsert {
    pub place_id: String,
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub types: Vec<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: i32,
    pub price_level: Option<i32>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub photo_reference: Option<String>,
    pub photos_count: i32,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub opening_hours: Option<Value>,
    pub raw_data: Option<Value>,
}

impl From<&Attraction> for AttractionUpsert {
    fn from(attraction: &Attraction) -> Self {
        Self {
            place_id: attraction.place_id.as_str().to_owned(),
            name: attraction.name.clone(),
            formatted_address: attraction.formatted_address.clone(),
            country: attraction.country.clone(),
            city: attraction.city.clone(),
            category: attraction.category.clone(),
            types: attraction.types.clone(),
            rating: attraction.rating,
            user_ratings_total: attraction.user_ratings_total,
            price_level: attraction.price_level,
            lat: attraction.location.lat,
            lng: attraction.location.lng,
            photo_reference: attraction.photo_reference.clone(),
            photos_count: attraction.photos_count,
            website: attraction.website.clone(),
            phone_number: attraction.phone_number.clone(),
            opening_hours: attraction.opening_hours.clone(),
            raw_data: attraction.raw_data.clone(),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = compilations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompilationRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CompilationRow {
    pub fn into_domain(
        self,
        items: Vec<CompilationItemRow>,
    ) -> Result<Compilation, StoreError> {
        let items = items
            .into_iter()
            .map(CompilationItemRow::into_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Compilation {
            id: self.id,
            owner: UserId::from_uuid(self.owner_id),
            name: self.name,
            items,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = compilations)]
pub struct NewCompilationRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = compilation_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CompilationItemRow {
    pub compilation_id: Uuid,
    pub place_id: String,
    pub position: i32,
    pub added_at: DateTime<Utc>,
}

impl CompilationItemRow {
    pub fn into_domain(self) -> Result<CompilationItem, StoreError> {
        Ok(CompilationItem {
            place_id: place_id_from_store(self.place_id)?,
            position: self.position,
            added_at: self.added_at,
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = compilation_items)]
pub struct NewCompilationItemRow<'a> {
    pub compilation_id: Uuid,
    pub place_id: &'a str,
    pub position: i32,
}
