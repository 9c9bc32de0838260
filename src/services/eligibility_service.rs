use crate::entities::{
    discount_rule_entity as rules, game_entity as games, play_entity as plays,
    segment_entity as segments, targeting_rule_entity as targeting,
};
use crate::error::AppResult;
use crate::models::VisitContext;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use serde_json::Value;

/// 冷却判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    pub can_play: bool,
    pub cooldown_remaining_ms: i64,
}

impl Eligibility {
    pub fn allowed() -> Self {
        Eligibility {
            can_play: true,
            cooldown_remaining_ms: 0,
        }
    }
}

/// 适用规则选择 (纯函数): 入参按 created_at 倒序
/// 优先最新的活动专属规则, 其次最新的店铺默认规则 (game_id NULL)
pub fn select_applicable_rule(list: &[rules::Model], game_id: i64) -> Option<&rules::Model> {
    list.iter()
        .find(|r| r.game_id == Some(game_id))
        .or_else(|| list.iter().find(|r| r.game_id.is_none()))
}

/// 距下次可玩的剩余毫秒: (最近一次 play + 冷却时长) - now, 下限 0
pub fn remaining_cooldown_ms(
    latest_play_at: DateTime<Utc>,
    cooldown_hours: i32,
    now: DateTime<Utc>,
) -> i64 {
    let reopens_at = latest_play_at + Duration::hours(cooldown_hours as i64);
    (reopens_at - now).num_milliseconds().max(0)
}

/// JSON 字符串数组的集合匹配; NULL / 空数组 = 不限制
fn set_matches(field: &Option<Value>, value: &str) -> bool {
    match field {
        None => true,
        Some(Value::Array(items)) if items.is_empty() => true,
        Some(Value::Array(items)) => items.iter().any(|v| v.as_str() == Some(value)),
        // 非数组按配置损坏处理, 不匹配任何访问
        Some(_) => false,
    }
}

fn day_matches(field: &Option<Value>, weekday: u8) -> bool {
    match field {
        None => true,
        Some(Value::Array(items)) if items.is_empty() => true,
        Some(Value::Array(items)) => items.iter().any(|v| v.as_i64() == Some(weekday as i64)),
        Some(_) => false,
    }
}

/// 投放规则谓词 (纯函数): 非空字段的合取, 空字段全匹配
pub fn rule_matches(rule: &targeting::Model, ctx: &VisitContext) -> bool {
    if !set_matches(&rule.page_types, ctx.page_type.as_str()) {
        return false;
    }
    if !set_matches(&rule.devices, &ctx.device.to_string()) {
        return false;
    }
    if !ctx.matches_visitor_type(rule.visitor_type) {
        return false;
    }
    if !set_matches(&rule.traffic_sources, ctx.traffic_source.as_str()) {
        return false;
    }
    if !set_matches(&rule.utm_sources, ctx.utm_source.as_deref().unwrap_or("")) {
        return false;
    }
    if rule.schedule_enabled {
        if !day_matches(&rule.schedule_days, ctx.weekday) {
            return false;
        }
        let start = rule.start_hour.unwrap_or(0);
        let end = rule.end_hour.unwrap_or(23);
        let hour = ctx.hour as i16;
        if hour < start || hour > end {
            return false;
        }
    }
    true
}

/// 本次访问的活动选择 (纯函数)
/// 默认 = 第一个可投放的活动; 规则按优先级从高到低, 第一个完全匹配且
/// 目标活动可投放的规则覆盖默认选择
pub fn resolve_active_game<'a>(
    live_games: &'a [games::Model],
    rule_list: &[targeting::Model],
    ctx: &VisitContext,
    now: DateTime<Utc>,
) -> Option<&'a games::Model> {
    for rule in rule_list {
        if !rule.is_active || !rule_matches(rule, ctx) {
            continue;
        }
        if let Some(game) = live_games
            .iter()
            .find(|g| g.id == rule.target_game_id && g.is_live(now))
        {
            return Some(game);
        }
        // 目标活动不在投放期: 规则不适用, 继续尝试下一条
    }
    live_games.iter().find(|g| g.is_live(now))
}

#[derive(Clone)]
pub struct EligibilityService {
    pool: DatabaseConnection,
}

impl EligibilityService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// 取活动适用的折扣规则 (活动专属优先, 否则店铺默认)
    pub async fn applicable_rule(
        &self,
        shop_id: i64,
        game_id: i64,
    ) -> AppResult<Option<rules::Model>> {
        let list = rules::Entity::find()
            .filter(rules::Column::ShopId.eq(shop_id))
            .filter(rules::Column::IsActive.eq(true))
            .order_by(rules::Column::CreatedAt, Order::Desc)
            .all(&self.pool)
            .await?;
        Ok(select_applicable_rule(&list, game_id).cloned())
    }

    /// 冷却判定: 统计窗口内 play 数 (输赢都计入限额)
    ///
    /// init 阶段用连接池即可 (仅用于给客户端展示倒计时);
    /// play 阶段必须传入事务连接重查, 否则并发下会超发
    pub async fn check_cooldown<C: ConnectionTrait>(
        conn: &C,
        visitor_id: i64,
        game_id: i64,
        rule: &rules::Model,
        now: DateTime<Utc>,
    ) -> AppResult<Eligibility> {
        let cutoff = now - Duration::hours(rule.cooldown_hours as i64);
        let recent = plays::Entity::find()
            .filter(plays::Column::VisitorId.eq(visitor_id))
            .filter(plays::Column::GameId.eq(game_id))
            .filter(plays::Column::PlayedAt.gte(cutoff))
            .count(conn)
            .await?;

        if (recent as i64) < rule.max_plays_per_visitor as i64 {
            return Ok(Eligibility::allowed());
        }

        let latest = plays::Entity::find()
            .filter(plays::Column::VisitorId.eq(visitor_id))
            .filter(plays::Column::GameId.eq(game_id))
            .order_by(plays::Column::PlayedAt, Order::Desc)
            .one(conn)
            .await?;

        let remaining = latest
            .and_then(|p| p.played_at)
            .map(|at| remaining_cooldown_ms(at, rule.cooldown_hours, now))
            .unwrap_or(0);

        Ok(Eligibility {
            can_play: false,
            cooldown_remaining_ms: remaining,
        })
    }

    /// 本次访问命中的活动及其槽位
    pub async fn active_game(
        &self,
        shop_id: i64,
        ctx: &VisitContext,
        now: DateTime<Utc>,
    ) -> AppResult<Option<(games::Model, Vec<segments::Model>)>> {
        let live_games: Vec<games::Model> = games::Entity::find()
            .filter(games::Column::ShopId.eq(shop_id))
            .filter(games::Column::IsActive.eq(true))
            .order_by(games::Column::Id, Order::Asc)
            .all(&self.pool)
            .await?
            .into_iter()
            .filter(|g| g.is_live(now))
            .collect();

        // 优先级高在前, 平局按创建顺序 (id)
        let rule_list = targeting::Entity::find()
            .filter(targeting::Column::ShopId.eq(shop_id))
            .filter(targeting::Column::IsActive.eq(true))
            .order_by(targeting::Column::Priority, Order::Desc)
            .order_by(targeting::Column::Id, Order::Asc)
            .all(&self.pool)
            .await?;

        let Some(game) = resolve_active_game(&live_games, &rule_list, ctx, now).cloned() else {
            return Ok(None);
        };

        let segment_list = segments::Entity::find()
            .filter(segments::Column::GameId.eq(game.id))
            .order_by(segments::Column::Position, Order::Asc)
            .all(&self.pool)
            .await?;

        Ok(Some((game, segment_list)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        DeviceType, GameType, PageType, TrafficSource, VisitorTypeFilter,
    };
    use serde_json::json;

    fn rule(id: i64, game_id: Option<i64>) -> rules::Model {
        rules::Model {
            id,
            shop_id: 1,
            game_id,
            is_active: true,
            max_plays_per_visitor: 1,
            cooldown_hours: 24,
            require_email: false,
            validity_days: 7,
            max_redemptions: 1,
            min_order_cents: None,
            combines_with_products: false,
            combines_with_shipping: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn game(id: i64) -> games::Model {
        games::Model {
            id,
            shop_id: 1,
            game_type: GameType::SpinWheel,
            name: format!("game-{id}"),
            is_active: true,
            starts_at: None,
            ends_at: None,
            trigger_kind: "delay".to_string(),
            trigger_value: Some(3000),
            display_config: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn targeting_rule(id: i64, priority: i32, target_game_id: i64) -> targeting::Model {
        targeting::Model {
            id,
            shop_id: 1,
            name: format!("rule-{id}"),
            priority,
            is_active: true,
            target_game_id,
            page_types: None,
            devices: None,
            visitor_type: VisitorTypeFilter::All,
            traffic_sources: None,
            utm_sources: None,
            schedule_enabled: false,
            schedule_days: None,
            start_hour: None,
            end_hour: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn ctx() -> VisitContext {
        VisitContext {
            page_type: PageType::Product,
            device: DeviceType::Mobile,
            is_new_visitor: true,
            has_customer_ref: false,
            has_email: false,
            traffic_source: TrafficSource::Direct,
            utm_source: None,
            weekday: 2,
            hour: 14,
        }
    }

    #[test]
    fn test_game_specific_rule_preferred() {
        // created_at 倒序: 专属规则即便更老也优先于默认规则
        let list = vec![rule(3, None), rule(2, Some(7)), rule(1, None)];
        assert_eq!(select_applicable_rule(&list, 7).unwrap().id, 2);
        assert_eq!(select_applicable_rule(&list, 99).unwrap().id, 3);
    }

    #[test]
    fn test_no_rule_resolves() {
        let list = vec![rule(1, Some(5))];
        assert!(select_applicable_rule(&list, 7).is_none());
    }

    #[test]
    fn test_remaining_cooldown_math() {
        let now = Utc::now();
        let latest = now - Duration::hours(10);
        // 24h 冷却, 10h 前玩过 -> 还剩 14h
        let ms = remaining_cooldown_ms(latest, 24, now);
        assert_eq!(ms, Duration::hours(14).num_milliseconds());
        // 窗口已过 -> 0
        assert_eq!(remaining_cooldown_ms(now - Duration::hours(30), 24, now), 0);
    }

    #[test]
    fn test_empty_rule_matches_everything() {
        assert!(rule_matches(&targeting_rule(1, 0, 1), &ctx()));
    }

    #[test]
    fn test_page_type_conjunction() {
        let mut r = targeting_rule(1, 0, 1);
        r.page_types = Some(json!(["product", "cart"]));
        assert!(rule_matches(&r, &ctx()));
        r.page_types = Some(json!(["index"]));
        assert!(!rule_matches(&r, &ctx()));
    }

    #[test]
    fn test_device_and_visitor_type() {
        let mut r = targeting_rule(1, 0, 1);
        r.devices = Some(json!(["mobile"]));
        r.visitor_type = VisitorTypeFilter::New;
        assert!(rule_matches(&r, &ctx()));

        let mut returning = ctx();
        returning.is_new_visitor = false;
        assert!(!rule_matches(&r, &returning));
    }

    #[test]
    fn test_utm_source_exact_list() {
        let mut r = targeting_rule(1, 0, 1);
        r.utm_sources = Some(json!(["newsletter"]));
        // 该维度受限但访问无 utm -> 不匹配
        assert!(!rule_matches(&r, &ctx()));

        let mut with_utm = ctx();
        with_utm.utm_source = Some("newsletter".to_string());
        assert!(rule_matches(&r, &with_utm));
    }

    #[test]
    fn test_schedule_window() {
        let mut r = targeting_rule(1, 0, 1);
        r.schedule_enabled = true;
        r.schedule_days = Some(json!([2, 3]));
        r.start_hour = Some(9);
        r.end_hour = Some(17);
        assert!(rule_matches(&r, &ctx())); // 周三 14 点

        let mut evening = ctx();
        evening.hour = 20;
        assert!(!rule_matches(&r, &evening));

        let mut monday = ctx();
        monday.weekday = 0;
        assert!(!rule_matches(&r, &monday));
    }

    #[test]
    fn test_schedule_hours_inclusive() {
        let mut r = targeting_rule(1, 0, 1);
        r.schedule_enabled = true;
        r.start_hour = Some(9);
        r.end_hour = Some(17);
        let mut at_start = ctx();
        at_start.hour = 9;
        assert!(rule_matches(&r, &at_start));
        let mut at_end = ctx();
        at_end.hour = 17;
        assert!(rule_matches(&r, &at_end));
    }

    #[test]
    fn test_default_game_when_no_rule_matches() {
        let live = vec![game(1), game(2)];
        let mut r = targeting_rule(1, 10, 2);
        r.page_types = Some(json!(["cart"]));
        let picked = resolve_active_game(&live, &[r], &ctx(), Utc::now()).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn test_matching_rule_overrides_default() {
        let live = vec![game(1), game(2)];
        let mut r = targeting_rule(1, 10, 2);
        r.page_types = Some(json!(["product"]));
        r.visitor_type = VisitorTypeFilter::New;
        let picked = resolve_active_game(&live, &[r], &ctx(), Utc::now()).unwrap();
        assert_eq!(picked.id, 2);

        // 回访访客不命中规则, 回落默认活动
        let mut returning = ctx();
        returning.is_new_visitor = false;
        let mut r2 = targeting_rule(1, 10, 2);
        r2.page_types = Some(json!(["product"]));
        r2.visitor_type = VisitorTypeFilter::New;
        let picked = resolve_active_game(&live, &[r2], &returning, Utc::now()).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn test_higher_priority_rule_wins() {
        let live = vec![game(1), game(2), game(3)];
        let low = targeting_rule(1, 1, 2);
        let high = targeting_rule(2, 10, 3);
        // 入参已按优先级排序 (服务层查询负责)
        let picked =
            resolve_active_game(&live, &[high, low], &ctx(), Utc::now()).unwrap();
        assert_eq!(picked.id, 3);
    }

    #[test]
    fn test_rule_targeting_dead_game_is_skipped() {
        let mut dead = game(2);
        dead.is_active = false;
        let live = vec![game(1), dead];
        let r = targeting_rule(1, 10, 2);
        let picked = resolve_active_game(&live, &[r], &ctx(), Utc::now()).unwrap();
        assert_eq!(picked.id, 1);
    }

    #[test]
    fn test_no_live_game_yields_none() {
        let mut g = game(1);
        g.ends_at = Some(Utc::now() - Duration::days(1));
        assert!(resolve_active_game(&[g], &[], &ctx(), Utc::now()).is_none());
    }
}
