use crate::entities::analytics_entity as analytics;
use crate::error::AppResult;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ConnectionTrait, EntityTrait, Insert, Set};

/// 一次事件对日汇总行的增量; 全部字段加法语义, 不存在减量
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsDelta {
    pub views: i64,
    pub plays: i64,
    pub wins: i64,
    pub claims: i64,
    pub redemptions: i64,
    pub revenue_cents: i64,
}

impl AnalyticsDelta {
    pub fn view() -> Self {
        AnalyticsDelta {
            views: 1,
            ..Default::default()
        }
    }

    pub fn claim() -> Self {
        AnalyticsDelta {
            claims: 1,
            ..Default::default()
        }
    }

    pub fn play(win: bool) -> Self {
        AnalyticsDelta {
            plays: 1,
            wins: if win { 1 } else { 0 },
            ..Default::default()
        }
    }

    pub fn redemption(revenue_cents: i64) -> Self {
        AnalyticsDelta {
            redemptions: 1,
            revenue_cents,
            ..Default::default()
        }
    }

    fn is_empty(&self) -> bool {
        *self == AnalyticsDelta::default()
    }
}

/// 今天的汇总桶 (按 UTC 日切)
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// 加法 upsert: 单语句 INSERT ... ON CONFLICT ... DO UPDATE SET c = c + n
///
/// 必须是单语句: play 事务里若先 INSERT 撞唯一索引, 整个事务会进入
/// aborted 状态, 任何补救 UPDATE 都发不出去; 也不做读-改-写,
/// 并发自增才能正确合成
pub async fn bump<C: ConnectionTrait>(
    conn: &C,
    shop_id: i64,
    game_id: Option<i64>,
    day: NaiveDate,
    delta: AnalyticsDelta,
) -> AppResult<()> {
    if delta.is_empty() {
        return Ok(());
    }
    upsert(shop_id, game_id, day, delta).exec(conn).await?;
    Ok(())
}

/// 冲突目标必须与 game_id NULL / 非 NULL 对应的部分唯一索引完全一致,
/// 否则 Postgres 不认这个 ON CONFLICT
fn upsert(
    shop_id: i64,
    game_id: Option<i64>,
    day: NaiveDate,
    delta: AnalyticsDelta,
) -> Insert<analytics::ActiveModel> {
    let row = analytics::ActiveModel {
        shop_id: Set(shop_id),
        game_id: Set(game_id),
        day: Set(day),
        views: Set(delta.views),
        plays: Set(delta.plays),
        wins: Set(delta.wins),
        claims: Set(delta.claims),
        redemptions: Set(delta.redemptions),
        revenue_cents: Set(delta.revenue_cents),
        ..Default::default()
    };

    let mut on_conflict = if game_id.is_some() {
        let mut oc = OnConflict::columns([
            analytics::Column::ShopId,
            analytics::Column::GameId,
            analytics::Column::Day,
        ]);
        oc.target_and_where(Expr::col(analytics::Column::GameId).is_not_null());
        oc
    } else {
        let mut oc = OnConflict::columns([analytics::Column::ShopId, analytics::Column::Day]);
        oc.target_and_where(Expr::col(analytics::Column::GameId).is_null());
        oc
    };

    if delta.views != 0 {
        on_conflict.value(
            analytics::Column::Views,
            Expr::col(analytics::Column::Views).add(delta.views),
        );
    }
    if delta.plays != 0 {
        on_conflict.value(
            analytics::Column::Plays,
            Expr::col(analytics::Column::Plays).add(delta.plays),
        );
    }
    if delta.wins != 0 {
        on_conflict.value(
            analytics::Column::Wins,
            Expr::col(analytics::Column::Wins).add(delta.wins),
        );
    }
    if delta.claims != 0 {
        on_conflict.value(
            analytics::Column::Claims,
            Expr::col(analytics::Column::Claims).add(delta.claims),
        );
    }
    if delta.redemptions != 0 {
        on_conflict.value(
            analytics::Column::Redemptions,
            Expr::col(analytics::Column::Redemptions).add(delta.redemptions),
        );
    }
    if delta.revenue_cents != 0 {
        on_conflict.value(
            analytics::Column::RevenueCents,
            Expr::col(analytics::Column::RevenueCents).add(delta.revenue_cents),
        );
    }
    on_conflict.value(analytics::Column::UpdatedAt, Expr::cust("NOW()"));

    analytics::Entity::insert(row).on_conflict(on_conflict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn test_upsert_is_single_statement_on_partial_index() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

        // 按活动行: 冲突目标带 game_id IS NOT NULL 谓词
        let sql = upsert(1, Some(7), day, AnalyticsDelta::play(true))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(
            sql.contains(r#"ON CONFLICT ("shop_id", "game_id", "day") WHERE "game_id" IS NOT NULL"#),
            "{sql}"
        );
        assert!(sql.contains(r#""plays" = "plays" + 1"#), "{sql}");
        assert!(sql.contains(r#""wins" = "wins" + 1"#), "{sql}");

        // 全局行: 冲突目标是 (shop_id, day) 加 IS NULL 谓词
        let sql = upsert(1, None, day, AnalyticsDelta::view())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(
            sql.contains(r#"ON CONFLICT ("shop_id", "day") WHERE "game_id" IS NULL"#),
            "{sql}"
        );
        assert!(sql.contains(r#""views" = "views" + 1"#), "{sql}");
    }

    #[test]
    fn test_upsert_skips_untouched_counters() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let sql = upsert(1, Some(7), day, AnalyticsDelta::view())
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""views" = "views" + 1"#), "{sql}");
        assert!(!sql.contains(r#""plays" = "plays""#), "{sql}");
        assert!(!sql.contains(r#""revenue_cents" = "revenue_cents""#), "{sql}");
    }

    #[test]
    fn test_delta_builders() {
        assert_eq!(AnalyticsDelta::view().views, 1);
        assert_eq!(AnalyticsDelta::play(true).wins, 1);
        assert_eq!(AnalyticsDelta::play(false).wins, 0);
        assert_eq!(AnalyticsDelta::play(false).plays, 1);
        let r = AnalyticsDelta::redemption(2599);
        assert_eq!(r.redemptions, 1);
        assert_eq!(r.revenue_cents, 2599);
    }

    #[test]
    fn test_empty_delta_detected() {
        assert!(AnalyticsDelta::default().is_empty());
        assert!(!AnalyticsDelta::view().is_empty());
    }
}
