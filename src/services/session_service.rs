use crate::entities::{
    discount_entity as discounts, play_entity as plays, session_entity as sessions,
    visitor_entity as visitors,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    ActiveGameResponse, DiscountStatus, InitRequest, InitResponse, StatusResponse, TrackRequest,
    VisitContext,
};
use crate::services::analytics_service::{self, AnalyticsDelta};
use crate::services::{EligibilityService, RequestSignals, VisitorService};
use crate::utils::{derive_page_type, derive_traffic_source, generate_session_token};
use chrono::{Datelike, Timelike, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

const RECENT_PLAYS_LIMIT: u64 = 10;

#[derive(Clone)]
pub struct SessionService {
    pool: DatabaseConnection,
    visitor_service: VisitorService,
    eligibility_service: EligibilityService,
}

impl SessionService {
    pub fn new(
        pool: DatabaseConnection,
        visitor_service: VisitorService,
        eligibility_service: EligibilityService,
    ) -> Self {
        Self {
            pool,
            visitor_service,
            eligibility_service,
        }
    }

    /// init: 识别访客 -> 发会话 -> 选活动 -> 预判冷却
    ///
    /// 这里的 can_play/倒计时只用于客户端展示, play 时会在事务内重查
    pub async fn init(
        &self,
        req: &InitRequest,
        signals: &RequestSignals,
    ) -> AppResult<InitResponse> {
        let now = Utc::now();
        let shop = self.visitor_service.find_shop(&req.shop).await?;
        let (visitor, is_new) = self
            .visitor_service
            .resolve(&shop, req.fingerprint.as_deref(), signals)
            .await?;

        let session = sessions::ActiveModel {
            visitor_id: Set(visitor.id),
            token: Set(generate_session_token()),
            page: Set(req.page.clone()),
            referrer: Set(req.referrer.clone()),
            utm_source: Set(req.utm_source.clone()),
            utm_medium: Set(req.utm_medium.clone()),
            utm_campaign: Set(req.utm_campaign.clone()),
            is_active: Set(true),
            last_activity_at: Set(Some(now)),
            created_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        let ctx = VisitContext {
            page_type: derive_page_type(&req.page),
            device: visitor.device_type,
            is_new_visitor: is_new,
            has_customer_ref: visitor.external_customer_id.is_some(),
            has_email: visitor.email.is_some(),
            traffic_source: derive_traffic_source(
                req.referrer.as_deref(),
                req.utm_source.as_deref(),
            ),
            utm_source: req.utm_source.clone(),
            weekday: now.weekday().num_days_from_monday() as u8,
            hour: now.hour() as u8,
        };

        let active = self.eligibility_service.active_game(shop.id, &ctx, now).await?;

        let (can_play, cooldown_remaining_ms, active_game) = match active {
            None => (false, 0, None),
            Some((game, segment_list)) => {
                let rule = self
                    .eligibility_service
                    .applicable_rule(shop.id, game.id)
                    .await?;
                let (can_play, remaining) = match rule {
                    // 未配置折扣规则的活动不可玩
                    None => (false, 0),
                    Some(rule) => {
                        let eligibility = EligibilityService::check_cooldown(
                            &self.pool, visitor.id, game.id, &rule, now,
                        )
                        .await?;
                        (eligibility.can_play, eligibility.cooldown_remaining_ms)
                    }
                };
                (
                    can_play,
                    remaining,
                    Some(ActiveGameResponse::from_game(game, segment_list)),
                )
            }
        };

        Ok(InitResponse {
            session_token: session.token,
            visitor_id: visitor.id,
            is_new_visitor: is_new,
            can_play,
            cooldown_remaining_ms,
            active_game,
        })
    }

    /// 按 token 取会话与访客 (play / track / status 的统一入口)
    pub async fn find_with_visitor(
        &self,
        token: &str,
    ) -> AppResult<(sessions::Model, visitors::Model)> {
        let session = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid session token".to_string()))?;

        let visitor = visitors::Entity::find_by_id(session.visitor_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Session visitor missing".to_string()))?;

        Ok((session, visitor))
    }

    /// status: 不重放任何抽奖逻辑, 只读当前状态
    pub async fn status(&self, token: &str) -> AppResult<StatusResponse> {
        let now = Utc::now();
        let (session, visitor) = self.find_with_visitor(token).await?;

        // 会话里存了落地页/归因, 可据此重建访问上下文
        let ctx = VisitContext {
            page_type: derive_page_type(&session.page),
            device: visitor.device_type,
            is_new_visitor: false,
            has_customer_ref: visitor.external_customer_id.is_some(),
            has_email: visitor.email.is_some(),
            traffic_source: derive_traffic_source(
                session.referrer.as_deref(),
                session.utm_source.as_deref(),
            ),
            utm_source: session.utm_source.clone(),
            weekday: now.weekday().num_days_from_monday() as u8,
            hour: now.hour() as u8,
        };

        let (can_play, cooldown_remaining_ms) = match self
            .eligibility_service
            .active_game(visitor.shop_id, &ctx, now)
            .await?
        {
            None => (false, 0),
            Some((game, _)) => {
                match self
                    .eligibility_service
                    .applicable_rule(visitor.shop_id, game.id)
                    .await?
                {
                    None => (false, 0),
                    Some(rule) => {
                        let e = EligibilityService::check_cooldown(
                            &self.pool, visitor.id, game.id, &rule, now,
                        )
                        .await?;
                        (e.can_play, e.cooldown_remaining_ms)
                    }
                }
            }
        };

        let recent_plays = plays::Entity::find()
            .filter(plays::Column::VisitorId.eq(visitor.id))
            .order_by(plays::Column::PlayedAt, Order::Desc)
            .limit(RECENT_PLAYS_LIMIT)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let active_discounts = discounts::Entity::find()
            .filter(discounts::Column::VisitorId.eq(visitor.id))
            .filter(discounts::Column::Status.eq(DiscountStatus::Created))
            .filter(discounts::Column::ExpiresAt.gt(now))
            .order_by(discounts::Column::CreatedAt, Order::Desc)
            .all(&self.pool)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(StatusResponse {
            session_active: session.is_active,
            visitor: visitor.into(),
            can_play,
            cooldown_remaining_ms,
            recent_plays,
            active_discounts,
        })
    }

    /// 客户端埋点: view (挂件曝光) / claim (奖品领取)
    pub async fn track(&self, req: &TrackRequest) -> AppResult<()> {
        let (session, visitor) = self.find_with_visitor(&req.session_token).await?;
        if !session.is_active {
            return Err(AppError::AuthError("Session is inactive".to_string()));
        }

        let delta = match req.event.as_str() {
            "view" => AnalyticsDelta::view(),
            "claim" => AnalyticsDelta::claim(),
            other => {
                return Err(AppError::ValidationError(format!(
                    "Unknown track event: {other}"
                )))
            }
        };

        analytics_service::bump(
            &self.pool,
            visitor.shop_id,
            req.game_id,
            analytics_service::today(),
            delta,
        )
        .await?;

        self.touch(session.id).await?;
        Ok(())
    }

    /// 会话活跃时间戳 bump
    pub async fn touch(&self, session_id: i64) -> AppResult<()> {
        sessions::Entity::update_many()
            .col_expr(sessions::Column::LastActivityAt, Expr::cust("NOW()"))
            .filter(sessions::Column::Id.eq(session_id))
            .exec(&self.pool)
            .await?;
        Ok(())
    }
}
