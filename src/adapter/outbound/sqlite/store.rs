//! SQLite catalog store implementation using Diesel.

use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use super::model::{AvailabilityRow, FavoriteRow, NewAvailabilityRow, NewNotificationRow, NewProductRow, ProductRow};
use super::schema::{availability_records, favorites, notifications, products};
use super::DbPool;
use crate::domain::{
    AvailabilityRecord, Favorite, FavoriteId, GroupId, NotificationKind, Product, ProductId,
    ProductTags, SizePreference,
};
use crate::error::{Error, Result};
use crate::port::outbound::store::{CatalogStore, ProductSighting};

type PooledConn =
    diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<diesel::SqliteConnection>>;

/// SQLite-backed catalog store.
pub struct SqliteCatalogStore {
    pool: DbPool,
}

impl SqliteCatalogStore {
    /// Create a new SQLite catalog store.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<PooledConn> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    fn product_from_row(row: ProductRow) -> Result<Product> {
        let tags: ProductTags = match row.tags_json.as_deref() {
            Some(json) => serde_json::from_str(json).map_err(|e| Error::Parse(e.to_string()))?,
            None => ProductTags::default(),
        };
        Ok(Product {
            id: ProductId::new(row.id),
            name: row.name,
            roastery: row.roastery,
            url: row.url,
            price: decimal_from_f32(row.price)?,
            description: row.description,
            organic: row.organic,
            size_token: row.size_token,
            size_grams: row.size_grams.map(|g| g as u32),
            group_id: row.group_id.map(GroupId::from),
            tags,
            tagged_at: row.tagged_at.as_deref().map(parse_timestamp).transpose()?,
            first_seen_at: parse_timestamp(&row.first_seen_at)?,
        })
    }

    fn availability_from_row(row: AvailabilityRow) -> Result<AvailabilityRecord> {
        Ok(AvailabilityRecord {
            product_id: ProductId::new(row.product_id),
            available: row.available,
            price: decimal_from_f32(row.price)?,
            checked_at: parse_timestamp(&row.checked_at)?,
        })
    }

    fn favorite_from_row(row: FavoriteRow) -> Result<Favorite> {
        Ok(Favorite {
            id: FavoriteId::parse(&row.id).map_err(|e| Error::Parse(e.to_string()))?,
            name: row.name,
            terms: serde_json::from_str(&row.terms).map_err(|e| Error::Parse(e.to_string()))?,
            size_preference: row
                .size_preference
                .as_deref()
                .map(|s| {
                    SizePreference::parse(s)
                        .ok_or_else(|| Error::Parse(format!("unknown size preference: {s}")))
                })
                .transpose()?,
            organic_only: row.organic_only,
        })
    }

    fn favorite_to_row(favorite: &Favorite) -> Result<FavoriteRow> {
        Ok(FavoriteRow {
            id: favorite.id.to_string(),
            name: favorite.name.clone(),
            terms: serde_json::to_string(&favorite.terms)
                .map_err(|e| Error::Parse(e.to_string()))?,
            size_preference: favorite.size_preference.map(|p| p.as_str().to_string()),
            organic_only: favorite.organic_only,
        })
    }
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .map_err(|e| Error::Parse(e.to_string()))?
        .with_timezone(&Utc))
}

fn decimal_from_f32(value: f32) -> Result<Decimal> {
    Decimal::from_f32(value).ok_or_else(|| Error::Parse(format!("non-finite price: {value}")))
}

fn decimal_to_f32(value: Decimal) -> f32 {
    value.to_f32().unwrap_or_default()
}

impl CatalogStore for SqliteCatalogStore {
    async fn upsert_product(&self, sighting: &ProductSighting) -> Result<Product> {
        let mut conn = self.conn()?;
        let now = Utc::now().to_rfc3339();

        let new_row = NewProductRow {
            name: sighting.name.clone(),
            roastery: sighting.roastery.clone(),
            url: sighting.url.clone(),
            price: decimal_to_f32(sighting.price),
            description: sighting.description.clone(),
            organic: sighting.organic,
            available: false,
            size_token: sighting.size_token.clone(),
            size_grams: sighting.size_grams.map(|g| g as i32),
            first_seen_at: now.clone(),
            updated_at: now.clone(),
        };

        diesel::insert_into(products::table)
            .values(&new_row)
            .on_conflict((products::name, products::roastery))
            .do_update()
            .set((
                products::url.eq(sighting.url.clone()),
                products::price.eq(decimal_to_f32(sighting.price)),
                products::description.eq(sighting.description.clone()),
                products::organic.eq(sighting.organic),
                products::size_token.eq(sighting.size_token.clone()),
                products::size_grams.eq(sighting.size_grams.map(|g| g as i32)),
                products::updated_at.eq(now.clone()),
            ))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        let row: ProductRow = products::table
            .filter(products::name.eq(&sighting.name))
            .filter(products::roastery.eq(&sighting.roastery))
            .first(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Self::product_from_row(row)
    }

    async fn append_availability(&self, record: &AvailabilityRecord) -> Result<()> {
        let mut conn = self.conn()?;

        let row = NewAvailabilityRow {
            product_id: record.product_id.as_i32(),
            available: record.available,
            price: decimal_to_f32(record.price),
            checked_at: record.checked_at.to_rfc3339(),
        };
        diesel::insert_into(availability_records::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        // Keep the product's availability mirror in sync with the newest record.
        diesel::update(products::table.find(record.product_id.as_i32()))
            .set((
                products::available.eq(record.available),
                products::price.eq(decimal_to_f32(record.price)),
                products::updated_at.eq(record.checked_at.to_rfc3339()),
            ))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn recent_availability(
        &self,
        product_id: ProductId,
        limit: u32,
    ) -> Result<Vec<AvailabilityRecord>> {
        let mut conn = self.conn()?;

        let rows: Vec<AvailabilityRow> = availability_records::table
            .filter(availability_records::product_id.eq(product_id.as_i32()))
            .order((
                availability_records::checked_at.desc(),
                availability_records::id.desc(),
            ))
            .limit(i64::from(limit))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::availability_from_row).collect()
    }

    async fn available_products(&self, roastery: Option<&str>) -> Result<Vec<Product>> {
        let mut conn = self.conn()?;

        let mut query = products::table
            .filter(products::available.eq(true))
            .into_boxed();
        if let Some(roastery) = roastery {
            query = query.filter(products::roastery.eq(roastery.to_string()));
        }

        let rows: Vec<ProductRow> = query
            .order((products::roastery.asc(), products::name.asc()))
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::product_from_row).collect()
    }

    async fn untagged_products(&self) -> Result<Vec<Product>> {
        let mut conn = self.conn()?;

        let rows: Vec<ProductRow> = products::table
            .filter(products::tagged_at.is_null())
            .order(products::id.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::product_from_row).collect()
    }

    async fn apply_tags(
        &self,
        product_id: ProductId,
        tags: &ProductTags,
        group_id: Option<&GroupId>,
        tagged_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = self.conn()?;

        let tags_json = serde_json::to_string(tags).map_err(|e| Error::Parse(e.to_string()))?;
        diesel::update(products::table.find(product_id.as_i32()))
            .set((
                products::tags_json.eq(Some(tags_json)),
                products::group_id.eq(group_id.map(|g| g.as_str().to_string())),
                products::tagged_at.eq(Some(tagged_at.to_rfc3339())),
            ))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn record_notification(
        &self,
        product_id: ProductId,
        kind: NotificationKind,
        sent_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = self.conn()?;

        let row = NewNotificationRow {
            product_id: product_id.as_i32(),
            kind: kind.as_str().to_string(),
            sent_at: sent_at.to_rfc3339(),
        };
        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn was_notified_recently(
        &self,
        product_id: ProductId,
        kind: NotificationKind,
        window_hours: u32,
    ) -> Result<bool> {
        let mut conn = self.conn()?;

        let cutoff = (Utc::now() - Duration::hours(i64::from(window_hours))).to_rfc3339();
        let count: i64 = notifications::table
            .filter(notifications::product_id.eq(product_id.as_i32()))
            .filter(notifications::kind.eq(kind.as_str()))
            .filter(notifications::sent_at.gt(cutoff))
            .count()
            .get_result(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(count > 0)
    }

    async fn save_favorite(&self, favorite: &Favorite) -> Result<()> {
        let mut conn = self.conn()?;

        let row = Self::favorite_to_row(favorite)?;
        diesel::insert_into(favorites::table)
            .values(&row)
            .on_conflict(favorites::name)
            .do_update()
            .set((
                favorites::id.eq(row.id.clone()),
                favorites::terms.eq(row.terms.clone()),
                favorites::size_preference.eq(row.size_preference.clone()),
                favorites::organic_only.eq(row.organic_only),
            ))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_favorite(&self, name: &str) -> Result<bool> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(favorites::table.filter(favorites::name.eq(name)))
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(deleted > 0)
    }

    async fn list_favorites(&self) -> Result<Vec<Favorite>> {
        let mut conn = self.conn()?;

        let rows: Vec<FavoriteRow> = favorites::table
            .order(favorites::name.asc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::favorite_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::super::{create_pool, run_migrations};
    use super::*;

    fn setup_store() -> SqliteCatalogStore {
        let pool = create_pool(":memory:").expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        SqliteCatalogStore::new(pool)
    }

    fn sighting(name: &str, price: Decimal) -> ProductSighting {
        ProductSighting {
            name: name.to_string(),
            roastery: "Roastery Co".to_string(),
            url: "https://shop.example/p".to_string(),
            price,
            description: Some("juicy".to_string()),
            organic: false,
            size_token: Some("250g".to_string()),
            size_grams: Some(250),
        }
    }

    #[tokio::test]
    async fn upsert_updates_in_place() {
        let store = setup_store();

        let first = store.upsert_product(&sighting("Guji 250g", dec!(12.5))).await.unwrap();
        let second = store.upsert_product(&sighting("Guji 250g", dec!(13.5))).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.price, dec!(13.5));
    }

    #[tokio::test]
    async fn availability_history_is_newest_first() {
        let store = setup_store();
        let product = store.upsert_product(&sighting("Guji 250g", dec!(12.5))).await.unwrap();

        for (available, minutes) in [(true, 120), (true, 60), (false, 0)] {
            store
                .append_availability(&AvailabilityRecord {
                    product_id: product.id,
                    available,
                    price: dec!(12.5),
                    checked_at: Utc::now() - Duration::minutes(minutes),
                })
                .await
                .unwrap();
        }

        let records = store.recent_availability(product.id, 2).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].available);
        assert!(records[1].available);
    }

    #[tokio::test]
    async fn availability_mirror_drives_available_products() {
        let store = setup_store();
        let product = store.upsert_product(&sighting("Guji 250g", dec!(12.5))).await.unwrap();

        assert!(store.available_products(None).await.unwrap().is_empty());

        store
            .append_availability(&AvailabilityRecord {
                product_id: product.id,
                available: true,
                price: dec!(12.5),
                checked_at: Utc::now(),
            })
            .await
            .unwrap();

        let available = store.available_products(Some("Roastery Co")).await.unwrap();
        assert_eq!(available.len(), 1);
        assert!(store.available_products(Some("Other")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn tags_and_group_persist() {
        let store = setup_store();
        let product = store.upsert_product(&sighting("Guji 250g", dec!(12.5))).await.unwrap();
        assert_eq!(store.untagged_products().await.unwrap().len(), 1);

        let tags = ProductTags {
            country_of_origin: Some("Ethiopia".to_string()),
            confidence: 85,
            ..ProductTags::default()
        };
        let group = GroupId::from("abc123");
        store
            .apply_tags(product.id, &tags, Some(&group), Utc::now())
            .await
            .unwrap();

        assert!(store.untagged_products().await.unwrap().is_empty());
        let reloaded = store.upsert_product(&sighting("Guji 250g", dec!(12.5))).await.unwrap();
        assert_eq!(reloaded.tags, tags);
        assert_eq!(reloaded.group_id, Some(group));
        assert!(reloaded.is_tagged());
    }

    #[tokio::test]
    async fn notification_window_bounds_dedup() {
        let store = setup_store();
        let product = store.upsert_product(&sighting("Guji 250g", dec!(12.5))).await.unwrap();
        let kind = NotificationKind::FavoriteAvailable;

        assert!(!store.was_notified_recently(product.id, kind, 24).await.unwrap());

        store
            .record_notification(product.id, kind, Utc::now() - Duration::hours(1))
            .await
            .unwrap();
        assert!(store.was_notified_recently(product.id, kind, 24).await.unwrap());

        // A different kind is tracked independently.
        assert!(!store
            .was_notified_recently(product.id, NotificationKind::FavoriteUnavailable, 24)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn notifications_outside_window_do_not_count() {
        let store = setup_store();
        let product = store.upsert_product(&sighting("Guji 250g", dec!(12.5))).await.unwrap();
        let kind = NotificationKind::FavoriteAvailable;

        store
            .record_notification(product.id, kind, Utc::now() - Duration::hours(25))
            .await
            .unwrap();
        assert!(!store.was_notified_recently(product.id, kind, 24).await.unwrap());
    }

    #[tokio::test]
    async fn favorites_roundtrip_and_replace_by_name() {
        let store = setup_store();

        let favorite = Favorite::new(
            "guji",
            vec!["guji".to_string()],
            Some(SizePreference::Small),
            true,
        );
        store.save_favorite(&favorite).await.unwrap();

        let listed = store.list_favorites().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "guji");
        assert_eq!(listed[0].size_preference, Some(SizePreference::Small));
        assert!(listed[0].organic_only);

        // Saving under the same name replaces rather than duplicates.
        let replacement = Favorite::new("guji", vec!["yirgacheffe".to_string()], None, false);
        store.save_favorite(&replacement).await.unwrap();
        let listed = store.list_favorites().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].terms, vec!["yirgacheffe".to_string()]);

        assert!(store.delete_favorite("guji").await.unwrap());
        assert!(!store.delete_favorite("guji").await.unwrap());
    }
}
