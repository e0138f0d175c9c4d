//! Subscription model and the closed service-name enumeration.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::AsExpression;
use diesel::FromSqlRow;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use serde::{Deserialize, Serialize};
use std::io::Write;
use uuid::Uuid;

use crate::models::User;

// ============================================================================
// Enums
// ============================================================================

/// Closed set of subscribable services.
///
/// The machine token (SCREAMING_SNAKE_CASE, also the JSON and storage form)
/// is the identity used for uniqueness and grouping; the display name is
/// attached to responses only.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceName {
    YoutubePremium,
    VkMusic,
    YandexPlus,
    NetflixStandard,
    SpotifyPremium,
    AppleMusic,
}

impl ServiceName {
    /// Stable machine token used in storage, JSON, and uniqueness checks.
    pub fn as_token(&self) -> &'static str {
        match self {
            ServiceName::YoutubePremium => "YOUTUBE_PREMIUM",
            ServiceName::VkMusic => "VK_MUSIC",
            ServiceName::YandexPlus => "YANDEX_PLUS",
            ServiceName::NetflixStandard => "NETFLIX_STANDARD",
            ServiceName::SpotifyPremium => "SPOTIFY_PREMIUM",
            ServiceName::AppleMusic => "APPLE_MUSIC",
        }
    }

    /// Human-readable label, output only.
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceName::YoutubePremium => "YouTube Premium",
            ServiceName::VkMusic => "VK Музыка",
            ServiceName::YandexPlus => "Яндекс.Плюс",
            ServiceName::NetflixStandard => "Netflix Standard",
            ServiceName::SpotifyPremium => "Spotify Premium",
            ServiceName::AppleMusic => "Apple Music",
        }
    }
}

impl diesel::query_builder::QueryId for ServiceName {
    type QueryId = ServiceName;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for ServiceName {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_token().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for ServiceName {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        match s.as_str() {
            "YOUTUBE_PREMIUM" => Ok(ServiceName::YoutubePremium),
            "VK_MUSIC" => Ok(ServiceName::VkMusic),
            "YANDEX_PLUS" => Ok(ServiceName::YandexPlus),
            "NETFLIX_STANDARD" => Ok(ServiceName::NetflixStandard),
            "SPOTIFY_PREMIUM" => Ok(ServiceName::SpotifyPremium),
            "APPLE_MUSIC" => Ok(ServiceName::AppleMusic),
            _ => Err(format!("Unrecognized service_name: {}", s).into()),
        }
    }
}

// ============================================================================
// Models
// ============================================================================

/// Subscription model for reading from database.
///
/// `belongs_to(User)` enables the batched `belonging_to` + `grouped_by`
/// fetch used by the paginated listing.
#[derive(Debug, Queryable, Selectable, Identifiable, Associations, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
#[diesel(belongs_to(User))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_name: ServiceName,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// NewSubscription model for inserting new records.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::subscriptions)]
pub struct NewSubscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_name: ServiceName,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewSubscription {
    /// Builds an insertable subscription with a freshly generated id.
    pub fn new(
        user_id: Uuid,
        service_name: ServiceName,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            service_name,
            start_date,
            end_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_machine_tokens() {
        let json = serde_json::to_string(&ServiceName::YoutubePremium).unwrap();
        assert_eq!(json, "\"YOUTUBE_PREMIUM\"");

        let parsed: ServiceName = serde_json::from_str("\"VK_MUSIC\"").unwrap();
        assert_eq!(parsed, ServiceName::VkMusic);
    }

    #[test]
    fn unknown_token_is_rejected() {
        let result = serde_json::from_str::<ServiceName>("\"DISNEY_PLUS\"");
        assert!(result.is_err());
    }

    #[test]
    fn display_names_are_attached_per_variant() {
        assert_eq!(ServiceName::VkMusic.display_name(), "VK Музыка");
        assert_eq!(ServiceName::YandexPlus.display_name(), "Яндекс.Плюс");
        assert_eq!(
            ServiceName::NetflixStandard.display_name(),
            "Netflix Standard"
        );
    }

    #[test]
    fn tokens_order_deterministically() {
        // the top-N tie-break orders by token ascending
        assert!(ServiceName::VkMusic.as_token() < ServiceName::YandexPlus.as_token());
    }
}
