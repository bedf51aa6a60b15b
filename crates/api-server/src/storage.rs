//! Storage access layer.
//!
//! CRUD operations over the relational store, shared by the HTTP handlers.
//! Uniqueness invariants are enforced by the store's unique constraints;
//! callers map the resulting unique-violation errors to conflicts. Writes
//! that must be atomic (cascading deletes, vote plus counter) run inside a
//! single transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use kol_core::{
    aggregate, RatingScores, RatingStats, TraderBadgeInputs, TraderBadgeKind, UserBadgeInputs,
    UserBadgeKind,
};

/// `users.role` value for a regular account.
pub const ROLE_USER: i16 = 0;
/// `users.role` value for an administrator.
pub const ROLE_ADMIN: i16 = 1;

/// `users.user_type` value for a regular account.
pub const USER_TYPE_REGULAR: i16 = 0;
/// `users.user_type` value for an account linked to a trader profile.
pub const USER_TYPE_TRADER: i16 = 1;

/// Maximum rows returned by trader search.
pub const SEARCH_LIMIT: i64 = 50;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub oauth_subject: Option<String>,
    pub role: i16,
    pub user_type: i16,
    pub linked_trader_id: Option<Uuid>,
    pub bio: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TraderRecord {
    pub id: Uuid,
    pub name: String,
    pub wallet_address: String,
    pub bio: Option<String>,
    pub specialty: Option<String>,
    pub verified: bool,
    pub twitter_url: Option<String>,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a new trader record.
#[derive(Debug, Clone)]
pub struct NewTrader {
    pub name: String,
    pub wallet_address: String,
    pub bio: Option<String>,
    pub specialty: Option<String>,
    pub verified: bool,
    pub twitter_url: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Partial trader update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct TraderUpdate {
    pub name: Option<String>,
    pub wallet_address: Option<String>,
    pub bio: Option<String>,
    pub specialty: Option<String>,
    pub verified: Option<bool>,
    pub twitter_url: Option<String>,
    pub profile_image_url: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RatingRecord {
    pub id: Uuid,
    pub trader_id: Uuid,
    pub user_id: Uuid,
    pub overall: i16,
    pub strategy: i16,
    pub communication: i16,
    pub reliability: i16,
    pub profitability: i16,
    pub comment: String,
    pub tags: Vec<String>,
    pub helpful_count: i32,
    pub not_helpful_count: i32,
    pub created_at: DateTime<Utc>,
}

impl RatingRecord {
    pub fn scores(&self) -> RatingScores {
        RatingScores {
            overall: self.overall,
            strategy: self.strategy,
            communication: self.communication,
            reliability: self.reliability,
            profitability: self.profitability,
        }
    }
}

/// Rating joined with the reviewer's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RatingWithAuthor {
    pub id: Uuid,
    pub trader_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub overall: i16,
    pub strategy: i16,
    pub communication: i16,
    pub reliability: i16,
    pub profitability: i16,
    pub comment: String,
    pub tags: Vec<String>,
    pub helpful_count: i32,
    pub not_helpful_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BadgeRow {
    pub kind: i16,
    pub tier: i16,
    pub awarded_at: DateTime<Utc>,
}

// ───────────────────────── users ─────────────────────────

const USER_COLUMNS: &str = "id, username, email, password_hash, oauth_subject, role, user_type, \
                            linked_trader_id, bio, profile_image_url, created_at, last_login";

pub async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_user_by_oauth_subject(
    pool: &PgPool,
    subject: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE oauth_subject = $1"
    ))
    .bind(subject)
    .fetch_optional(pool)
    .await
}

/// Insert a locally registered user (username + password hash).
pub async fn insert_local_user(
    pool: &PgPool,
    username: &str,
    email: Option<&str>,
    password_hash: &str,
) -> Result<UserRecord, sqlx::Error> {
    let record = UserRecord {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: email.map(str::to_string),
        password_hash: Some(password_hash.to_string()),
        oauth_subject: None,
        role: ROLE_USER,
        user_type: USER_TYPE_REGULAR,
        linked_trader_id: None,
        bio: None,
        profile_image_url: None,
        created_at: Utc::now(),
        last_login: None,
    };
    insert_user(pool, &record).await?;
    Ok(record)
}

/// Insert a user created through the OAuth flow (no password hash).
pub async fn insert_oauth_user(
    pool: &PgPool,
    username: &str,
    email: Option<&str>,
    oauth_subject: &str,
    profile_image_url: Option<&str>,
) -> Result<UserRecord, sqlx::Error> {
    let record = UserRecord {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: email.map(str::to_string),
        password_hash: None,
        oauth_subject: Some(oauth_subject.to_string()),
        role: ROLE_USER,
        user_type: USER_TYPE_REGULAR,
        linked_trader_id: None,
        bio: None,
        profile_image_url: profile_image_url.map(str::to_string),
        created_at: Utc::now(),
        last_login: None,
    };
    insert_user(pool, &record).await?;
    Ok(record)
}

async fn insert_user(pool: &PgPool, record: &UserRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, oauth_subject, role, user_type,
                           linked_trader_id, bio, profile_image_url, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(record.id)
    .bind(&record.username)
    .bind(&record.email)
    .bind(&record.password_hash)
    .bind(&record.oauth_subject)
    .bind(record.role)
    .bind(record.user_type)
    .bind(record.linked_trader_id)
    .bind(&record.bio)
    .bind(&record.profile_image_url)
    .bind(record.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn touch_last_login(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_user_profile(
    pool: &PgPool,
    id: Uuid,
    bio: Option<&str>,
    profile_image_url: Option<&str>,
) -> Result<Option<UserRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        UPDATE users
        SET bio = COALESCE($2, bio),
            profile_image_url = COALESCE($3, profile_image_url)
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(bio)
    .bind(profile_image_url)
    .fetch_optional(pool)
    .await
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<UserRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

/// Delete a user and everything hanging off them in one transaction:
/// their votes, votes on their ratings, their ratings, and their badges.
pub async fn delete_user_cascade(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM review_votes WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        "DELETE FROM review_votes WHERE rating_id IN (SELECT id FROM ratings WHERE user_id = $1)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM ratings WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM user_badges WHERE user_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}

// ───────────────────────── traders ─────────────────────────

const TRADER_COLUMNS: &str = "id, name, wallet_address, bio, specialty, verified, twitter_url, \
                              profile_image_url, created_at, updated_at";

pub async fn insert_trader(pool: &PgPool, new: &NewTrader) -> Result<TraderRecord, sqlx::Error> {
    let now = Utc::now();
    let record = TraderRecord {
        id: Uuid::new_v4(),
        name: new.name.clone(),
        wallet_address: new.wallet_address.clone(),
        bio: new.bio.clone(),
        specialty: new.specialty.clone(),
        verified: new.verified,
        twitter_url: new.twitter_url.clone(),
        profile_image_url: new.profile_image_url.clone(),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO traders (id, name, wallet_address, bio, specialty, verified, twitter_url,
                             profile_image_url, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        "#,
    )
    .bind(record.id)
    .bind(&record.name)
    .bind(&record.wallet_address)
    .bind(&record.bio)
    .bind(&record.specialty)
    .bind(record.verified)
    .bind(&record.twitter_url)
    .bind(&record.profile_image_url)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(record)
}

pub async fn find_trader(pool: &PgPool, id: Uuid) -> Result<Option<TraderRecord>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {TRADER_COLUMNS} FROM traders WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn trader_wallet_exists(pool: &PgPool, wallet: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM traders WHERE wallet_address = $1")
        .bind(wallet)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Case-insensitive substring search over name and wallet address, in
/// insertion order, capped at [`SEARCH_LIMIT`]. No query returns the full
/// list (also capped).
pub async fn search_traders(
    pool: &PgPool,
    query: Option<&str>,
) -> Result<Vec<TraderRecord>, sqlx::Error> {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => {
            let pattern = format!("%{}%", q);
            sqlx::query_as(&format!(
                r#"
                SELECT {TRADER_COLUMNS}
                FROM traders
                WHERE name ILIKE $1 OR wallet_address ILIKE $1
                ORDER BY created_at
                LIMIT $2
                "#
            ))
            .bind(pattern)
            .bind(SEARCH_LIMIT)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as(&format!(
                "SELECT {TRADER_COLUMNS} FROM traders ORDER BY created_at LIMIT $1"
            ))
            .bind(SEARCH_LIMIT)
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn update_trader(
    pool: &PgPool,
    id: Uuid,
    update: &TraderUpdate,
) -> Result<Option<TraderRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"
        UPDATE traders
        SET name = COALESCE($2, name),
            wallet_address = COALESCE($3, wallet_address),
            bio = COALESCE($4, bio),
            specialty = COALESCE($5, specialty),
            verified = COALESCE($6, verified),
            twitter_url = COALESCE($7, twitter_url),
            profile_image_url = COALESCE($8, profile_image_url),
            updated_at = $9
        WHERE id = $1
        RETURNING {TRADER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&update.name)
    .bind(&update.wallet_address)
    .bind(&update.bio)
    .bind(&update.specialty)
    .bind(update.verified)
    .bind(&update.twitter_url)
    .bind(&update.profile_image_url)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
}

/// Delete a trader and its ratings, votes, and badges in one transaction,
/// so a crash mid-delete cannot leave orphaned trader-less ratings behind.
pub async fn delete_trader_cascade(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "DELETE FROM review_votes WHERE rating_id IN (SELECT id FROM ratings WHERE trader_id = $1)",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    sqlx::query("DELETE FROM ratings WHERE trader_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM trader_badges WHERE trader_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let deleted = sqlx::query("DELETE FROM traders WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(deleted > 0)
}

// ───────────────────────── ratings ─────────────────────────

const RATING_COLUMNS: &str = "id, trader_id, user_id, overall, strategy, communication, \
                              reliability, profitability, comment, tags, helpful_count, \
                              not_helpful_count, created_at";

/// Fields for a new rating row.
#[derive(Debug, Clone)]
pub struct NewRating {
    pub trader_id: Uuid,
    pub user_id: Uuid,
    pub scores: RatingScores,
    pub comment: String,
    pub tags: Vec<String>,
}

pub async fn insert_rating(pool: &PgPool, new: &NewRating) -> Result<RatingRecord, sqlx::Error> {
    let record = RatingRecord {
        id: Uuid::new_v4(),
        trader_id: new.trader_id,
        user_id: new.user_id,
        overall: new.scores.overall,
        strategy: new.scores.strategy,
        communication: new.scores.communication,
        reliability: new.scores.reliability,
        profitability: new.scores.profitability,
        comment: new.comment.clone(),
        tags: new.tags.clone(),
        helpful_count: 0,
        not_helpful_count: 0,
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO ratings (id, trader_id, user_id, overall, strategy, communication,
                             reliability, profitability, comment, tags, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(record.id)
    .bind(record.trader_id)
    .bind(record.user_id)
    .bind(record.overall)
    .bind(record.strategy)
    .bind(record.communication)
    .bind(record.reliability)
    .bind(record.profitability)
    .bind(&record.comment)
    .bind(&record.tags)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(record)
}

pub async fn find_rating(pool: &PgPool, id: Uuid) -> Result<Option<RatingRecord>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {RATING_COLUMNS} FROM ratings WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn ratings_for_trader(
    pool: &PgPool,
    trader_id: Uuid,
) -> Result<Vec<RatingWithAuthor>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT r.id, r.trader_id, r.user_id, u.username, r.overall, r.strategy,
               r.communication, r.reliability, r.profitability, r.comment, r.tags,
               r.helpful_count, r.not_helpful_count, r.created_at
        FROM ratings r
        JOIN users u ON u.id = r.user_id
        WHERE r.trader_id = $1
        ORDER BY r.created_at DESC
        "#,
    )
    .bind(trader_id)
    .fetch_all(pool)
    .await
}

#[derive(Debug, sqlx::FromRow)]
struct ScoreRow {
    overall: i16,
    strategy: i16,
    communication: i16,
    reliability: i16,
    profitability: i16,
}

pub async fn trader_scores(
    pool: &PgPool,
    trader_id: Uuid,
) -> Result<Vec<RatingScores>, sqlx::Error> {
    let rows: Vec<ScoreRow> = sqlx::query_as(
        r#"
        SELECT overall, strategy, communication, reliability, profitability
        FROM ratings
        WHERE trader_id = $1
        "#,
    )
    .bind(trader_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| RatingScores {
            overall: r.overall,
            strategy: r.strategy,
            communication: r.communication,
            reliability: r.reliability,
            profitability: r.profitability,
        })
        .collect())
}

/// Aggregate statistics for one trader, recomputed from the rating rows.
pub async fn trader_stats(pool: &PgPool, trader_id: Uuid) -> Result<RatingStats, sqlx::Error> {
    let scores = trader_scores(pool, trader_id).await?;
    Ok(aggregate(&scores))
}

/// Record a helpful/not-helpful vote and bump the rating's counter in one
/// transaction. Returns the updated counters. A duplicate vote surfaces as
/// a unique-violation database error.
pub async fn record_vote(
    pool: &PgPool,
    rating_id: Uuid,
    user_id: Uuid,
    helpful: bool,
) -> Result<(i32, i32), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO review_votes (id, rating_id, user_id, helpful, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(rating_id)
    .bind(user_id)
    .bind(helpful)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;

    let column = if helpful {
        "helpful_count"
    } else {
        "not_helpful_count"
    };
    let counters: (i32, i32) = sqlx::query_as(&format!(
        "UPDATE ratings SET {column} = {column} + 1 WHERE id = $1 \
         RETURNING helpful_count, not_helpful_count"
    ))
    .bind(rating_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(counters)
}

// ───────────────────────── badges ─────────────────────────

pub async fn user_badge_inputs(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<UserBadgeInputs, sqlx::Error> {
    let (reviews_written, helpful_votes_received): (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COALESCE(SUM(helpful_count), 0)::bigint
        FROM ratings
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(UserBadgeInputs {
        reviews_written,
        helpful_votes_received,
    })
}

pub async fn trader_badge_inputs(
    pool: &PgPool,
    trader_id: Uuid,
) -> Result<TraderBadgeInputs, sqlx::Error> {
    let scores = trader_scores(pool, trader_id).await?;
    let stats = aggregate(&scores);
    let five_star_count = scores.iter().filter(|s| s.overall == 5).count() as i64;

    Ok(TraderBadgeInputs {
        review_count: stats.total_ratings,
        average_rating: stats.average_rating,
        five_star_count,
        average_profitability: stats.average_profitability,
    })
}

/// Insert eligible user badges, returning only the ones newly awarded.
/// Existing rows are untouched (`ON CONFLICT DO NOTHING`), which is what
/// makes the celebratory notification fire at most once per badge.
pub async fn award_user_badges(
    pool: &PgPool,
    user_id: Uuid,
    eligible: &[(UserBadgeKind, kol_core::BadgeTier)],
) -> Result<Vec<(UserBadgeKind, kol_core::BadgeTier)>, sqlx::Error> {
    let mut newly = Vec::new();
    for (kind, tier) in eligible {
        let inserted = sqlx::query(
            r#"
            INSERT INTO user_badges (id, user_id, kind, tier, awarded_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, kind, tier) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(kind.as_i16())
        .bind(tier.as_i16())
        .bind(Utc::now())
        .execute(pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            newly.push((*kind, *tier));
        }
    }
    Ok(newly)
}

/// Insert eligible trader badges, returning only the ones newly awarded.
pub async fn award_trader_badges(
    pool: &PgPool,
    trader_id: Uuid,
    eligible: &[(TraderBadgeKind, kol_core::BadgeTier)],
) -> Result<Vec<(TraderBadgeKind, kol_core::BadgeTier)>, sqlx::Error> {
    let mut newly = Vec::new();
    for (kind, tier) in eligible {
        let inserted = sqlx::query(
            r#"
            INSERT INTO trader_badges (id, trader_id, kind, tier, awarded_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (trader_id, kind, tier) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(trader_id)
        .bind(kind.as_i16())
        .bind(tier.as_i16())
        .bind(Utc::now())
        .execute(pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            newly.push((*kind, *tier));
        }
    }
    Ok(newly)
}

pub async fn badges_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<BadgeRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT kind, tier, awarded_at FROM user_badges WHERE user_id = $1 ORDER BY awarded_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn badges_for_trader(
    pool: &PgPool,
    trader_id: Uuid,
) -> Result<Vec<BadgeRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT kind, tier, awarded_at FROM trader_badges WHERE trader_id = $1 ORDER BY awarded_at",
    )
    .bind(trader_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_mapping() {
        let user = UserRecord {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: None,
            password_hash: Some("hash".to_string()),
            oauth_subject: None,
            role: ROLE_ADMIN,
            user_type: USER_TYPE_REGULAR,
            linked_trader_id: None,
            bio: None,
            profile_image_url: None,
            created_at: Utc::now(),
            last_login: None,
        };
        assert!(user.is_admin());

        let user = UserRecord {
            role: ROLE_USER,
            ..user
        };
        assert!(!user.is_admin());
    }

    #[test]
    fn test_rating_record_scores() {
        let record = RatingRecord {
            id: Uuid::new_v4(),
            trader_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            overall: 5,
            strategy: 4,
            communication: 3,
            reliability: 2,
            profitability: 1,
            comment: String::new(),
            tags: vec![],
            helpful_count: 0,
            not_helpful_count: 0,
            created_at: Utc::now(),
        };
        let scores = record.scores();
        assert_eq!(scores.overall, 5);
        assert_eq!(scores.profitability, 1);
    }
}
