use crate::entities::{
    game_entity as games, plays, segment_entity as segments, sessions, shop_entity as shops,
    visitor_entity as visitors,
};
use crate::error::{AppError, AppResult};
use crate::models::{PlayRequest, PlayResponse, PlayResult};
use crate::services::analytics_service::{self, AnalyticsDelta};
use crate::services::eligibility_service::Eligibility;
use crate::services::{outcome_service, EligibilityService, RewardService, SessionService};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    IsolationLevel, Order, QueryFilter, QueryOrder, Set, TransactionTrait,
};

const PLAY_TXN_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct PlayService {
    pool: DatabaseConnection,
    session_service: SessionService,
    eligibility_service: EligibilityService,
    reward_service: RewardService,
}

impl PlayService {
    pub fn new(
        pool: DatabaseConnection,
        session_service: SessionService,
        eligibility_service: EligibilityService,
        reward_service: RewardService,
    ) -> Self {
        Self {
            pool,
            session_service,
            eligibility_service,
            reward_service,
        }
    }

    /// 抽奖 (play)
    ///
    /// 逻辑:
    /// 1. 校验会话与活动, 选出适用折扣规则
    /// 2. 在 SERIALIZABLE 事务内重查冷却计数 (init 时的判定可能已过期)
    /// 3. 按权重抽槽位; 中奖先走外部发码, 再落 Discount
    /// 4. 写 Play 行, 原子累加访客计数, bump 会话活跃与日汇总
    /// 5. 整个事务要么全部可见要么全不可见; 串行化冲突有界重试,
    ///    重试耗尽且重查确认不可玩才按限流返回
    pub async fn play(&self, req: &PlayRequest) -> AppResult<PlayResponse> {
        let (session, visitor) = self
            .session_service
            .find_with_visitor(&req.session_token)
            .await?;
        if !session.is_active {
            return Err(AppError::AuthError("Session is inactive".to_string()));
        }

        let now = Utc::now();
        let shop = shops::Entity::find_by_id(visitor.shop_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Shop not found".to_string()))?;

        let game = games::Entity::find_by_id(req.game_id)
            .filter(games::Column::ShopId.eq(shop.id))
            .one(&self.pool)
            .await?
            .filter(|g| g.is_live(now))
            .ok_or_else(|| AppError::NotFound("Game not found or not active".to_string()))?;

        let rule = self
            .eligibility_service
            .applicable_rule(shop.id, game.id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No discount rule configured for this game".to_string())
            })?;

        let email = req
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);
        if rule.require_email && visitor.email.is_none() && email.is_none() {
            return Err(AppError::ValidationError(
                "Email is required to play this game".to_string(),
            ));
        }

        let segment_list = segments::Entity::find()
            .filter(segments::Column::GameId.eq(game.id))
            .order_by(segments::Column::Position, Order::Asc)
            .all(&self.pool)
            .await?;

        // 串行化冲突不一定是同访客双击: 同一天的首笔 play 也会在共享的
        // 日汇总行上互相碰撞, 先重试, 重试耗尽再重查冷却定性
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = self
                .play_in_txn(
                    &session,
                    &visitor,
                    &shop,
                    &game,
                    &rule,
                    &segment_list,
                    email.clone(),
                )
                .await;

            match outcome {
                Ok(response) => return Ok(response),
                Err(AppError::DatabaseError(err)) if is_serialization_conflict(&err) => {
                    if attempt >= PLAY_TXN_ATTEMPTS {
                        let eligibility = EligibilityService::check_cooldown(
                            &self.pool,
                            visitor.id,
                            game.id,
                            &rule,
                            Utc::now(),
                        )
                        .await?;
                        return Err(conflict_error(eligibility, err));
                    }
                    log::info!(
                        "Play transaction conflict for visitor {} game {}, retrying (attempt {attempt})",
                        visitor.id,
                        game.id
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn play_in_txn(
        &self,
        session: &sessions::Model,
        visitor: &visitors::Model,
        shop: &shops::Model,
        game: &games::Model,
        rule: &crate::entities::discount_rule_entity::Model,
        segment_list: &[segments::Model],
        email: Option<String>,
    ) -> AppResult<PlayResponse> {
        let now = Utc::now();

        // 冷却计数与 Play 插入必须同事务, 否则 read-then-act 会超发
        let txn: DatabaseTransaction = self
            .pool
            .begin_with_config(Some(IsolationLevel::Serializable), None)
            .await?;

        let eligibility =
            EligibilityService::check_cooldown(&txn, visitor.id, game.id, rule, now).await?;
        if !eligibility.can_play {
            // 未写任何东西, 直接丢弃事务
            return Err(AppError::RateLimited {
                remaining_ms: eligibility.cooldown_remaining_ms,
            });
        }

        let segment = outcome_service::resolve_outcome(segment_list)?.clone();
        let won = segment.is_winning();
        let result = if won { PlayResult::Win } else { PlayResult::Lose };

        // 中奖先确认外部发码成功, 失败则整体回滚 (不留无码的 Play)
        let discount = if won {
            Some(
                self.reward_service
                    .issue(&txn, shop, visitor.id, rule, &segment, now)
                    .await?,
            )
        } else {
            None
        };

        plays::ActiveModel {
            shop_id: Set(shop.id),
            visitor_id: Set(visitor.id),
            game_id: Set(game.id),
            segment_id: Set(segment.id),
            result: Set(result),
            prize_kind: Set(segment.prize_kind),
            prize_value: Set(segment.prize_value),
            prize_label: Set(segment.label.clone()),
            discount_id: Set(discount.as_ref().map(|d| d.id)),
            played_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        // 访客生命周期计数原子自增, 顺带回填邮箱
        let mut update = visitors::Entity::update_many()
            .col_expr(
                visitors::Column::TotalPlays,
                Expr::col(visitors::Column::TotalPlays).add(1),
            )
            .filter(visitors::Column::Id.eq(visitor.id));
        if won {
            update = update.col_expr(
                visitors::Column::TotalWins,
                Expr::col(visitors::Column::TotalWins).add(1),
            );
        }
        if visitor.email.is_none() {
            if let Some(email) = email {
                update = update.set(visitors::ActiveModel {
                    email: Set(Some(email)),
                    ..Default::default()
                });
            }
        }
        update.exec(&txn).await?;

        sessions::Entity::update_many()
            .col_expr(sessions::Column::LastActivityAt, Expr::cust("NOW()"))
            .filter(sessions::Column::Id.eq(session.id))
            .exec(&txn)
            .await?;

        analytics_service::bump(
            &txn,
            shop.id,
            Some(game.id),
            analytics_service::today(),
            AnalyticsDelta::play(won),
        )
        .await?;

        txn.commit().await?;

        Ok(PlayResponse {
            result,
            segment: segment.into(),
            discount: discount.map(Into::into),
        })
    }
}

/// Postgres 串行化冲突 (SQLSTATE 40001) / 死锁 (40P01) 判定
fn is_serialization_conflict(err: &DbErr) -> bool {
    let msg = err.to_string().to_ascii_lowercase();
    msg.contains("could not serialize")
        || msg.contains("serialization failure")
        || msg.contains("40001")
        || msg.contains("deadlock detected")
}

/// 重试耗尽后的定性: 限流 (429) 只代表冷却耗尽, 重查显示可玩时
/// 冲突来自无关竞争, 按数据库错误上抛
fn conflict_error(eligibility: Eligibility, err: DbErr) -> AppError {
    if eligibility.can_play {
        AppError::DatabaseError(err)
    } else {
        AppError::RateLimited {
            remaining_ms: eligibility.cooldown_remaining_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_conflict_detection() {
        let err = DbErr::Custom(
            "Execution Error: could not serialize access due to concurrent update".to_string(),
        );
        assert!(is_serialization_conflict(&err));

        let err = DbErr::Custom("deadlock detected".to_string());
        assert!(is_serialization_conflict(&err));

        let err = DbErr::Custom("duplicate key value violates unique constraint".to_string());
        assert!(!is_serialization_conflict(&err));
    }

    #[test]
    fn test_conflict_resolution_rechecks_eligibility() {
        let conflict = || DbErr::Custom("could not serialize access".to_string());

        // 重查显示可玩: 冲突不是冷却造成的, 不得按限流返回
        let e = conflict_error(Eligibility::allowed(), conflict());
        assert!(matches!(e, AppError::DatabaseError(_)));

        // 重查显示确实不可玩: 才是限流, 并带上剩余等待
        let e = conflict_error(
            Eligibility {
                can_play: false,
                cooldown_remaining_ms: 5000,
            },
            conflict(),
        );
        assert!(matches!(e, AppError::RateLimited { remaining_ms: 5000 }));
    }
}
