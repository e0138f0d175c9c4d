//! One-time demo data bootstrap.
//!
//! Runs once at startup, before the server accepts requests. The guard is
//! "the users table is empty": a populated store is left untouched, so the
//! step is idempotent and has no request-time effect.

use chrono::{Days, Months, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{NewSubscription, NewUser, ServiceName};

/// Seeds demo users and subscriptions when the store is empty.
pub async fn seed_if_empty(pool: &AsyncDbPool) -> AppResult<()> {
    use crate::schema::{subscriptions, users};

    let mut conn = pool.get().await?;

    let user_count: i64 = users::table.count().get_result(&mut conn).await?;
    if user_count > 0 {
        tracing::info!("Database already contains data, skipping seed");
        return Ok(());
    }

    let today = Utc::now().date_naive();

    let max = NewUser::new(
        "max.iv".to_string(),
        "max.iv@example.com".to_string(),
        "password123".to_string(),
        Some("Max".to_string()),
        Some("Iv".to_string()),
    );
    let sveta = NewUser::new(
        "Sveta.Iv".to_string(),
        "Sveta.Iv@example.com".to_string(),
        "securePass!".to_string(),
        Some("Sveta".to_string()),
        Some("Iv".to_string()),
    );
    let alisia = NewUser::new(
        "alisia.milano".to_string(),
        "alisia.milano@example.com".to_string(),
        "alisiasPass".to_string(),
        Some("Alisia".to_string()),
        Some("Milano".to_string()),
    );

    let seed_subscriptions = vec![
        NewSubscription::new(
            max.id,
            ServiceName::YoutubePremium,
            today - Months::new(1),
            Some(today + Months::new(11)),
        ),
        NewSubscription::new(
            max.id,
            ServiceName::NetflixStandard,
            today - Days::new(10),
            Some(today + Days::new(20)),
        ),
        NewSubscription::new(sveta.id, ServiceName::YandexPlus, today, None),
        NewSubscription::new(
            sveta.id,
            ServiceName::VkMusic,
            today - Days::new(14),
            Some(today + Months::new(3)),
        ),
        NewSubscription::new(
            sveta.id,
            ServiceName::YoutubePremium,
            today - Days::new(5),
            Some(today + Months::new(1)),
        ),
        NewSubscription::new(
            alisia.id,
            ServiceName::SpotifyPremium,
            today,
            Some(today + Months::new(12)),
        ),
    ];

    let seed_users = vec![max, sveta, alisia];

    conn.transaction(|conn| {
        async move {
            diesel::insert_into(users::table)
                .values(&seed_users)
                .execute(conn)
                .await?;
            diesel::insert_into(subscriptions::table)
                .values(&seed_subscriptions)
                .execute(conn)
                .await?;
            Ok::<_, diesel::result::Error>(())
        }
        .scope_boxed()
    })
    .await?;

    tracing::info!("Seeded demo users and subscriptions");
    Ok(())
}
