use sea_orm_migration::prelude::*;

/// Shops (店铺/租户根)
#[derive(DeriveIden)]
enum Shops {
    Table,
    Id,
    Domain,
    Name,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

/// Visitors (访客身份, 每店铺指纹唯一)
#[derive(DeriveIden)]
enum Visitors {
    Table,
    Id,
    ShopId,
    Fingerprint,
    Email,
    ExternalCustomerId,
    DeviceType,
    Browser,
    Os,
    Country,
    FirstSeenAt,
    LastSeenAt,
    TotalPlays,
    TotalWins,
}

/// Sessions (一次浏览会话, token 为唯一查找键)
#[derive(DeriveIden)]
enum Sessions {
    Table,
    Id,
    VisitorId,
    Token,
    Page,
    Referrer,
    UtmSource,
    UtmMedium,
    UtmCampaign,
    IsActive,
    LastActivityAt,
    CreatedAt,
}

/// Games (活动配置)
#[derive(DeriveIden)]
enum Games {
    Table,
    Id,
    ShopId,
    GameType,
    Name,
    IsActive,
    StartsAt,
    EndsAt,
    TriggerKind,
    TriggerValue,
    DisplayConfig,
    CreatedAt,
    UpdatedAt,
}

/// Game Segments (奖品槽位, weight 无需归一化)
#[derive(DeriveIden)]
enum GameSegments {
    Table,
    Id,
    GameId,
    Label,
    PrizeKind,
    PrizeValue,
    Weight,
    Color,
    Position,
}

/// Discount Rules (玩法限制与奖励形状, game_id NULL = 店铺默认)
#[derive(DeriveIden)]
enum DiscountRules {
    Table,
    Id,
    ShopId,
    GameId,
    IsActive,
    MaxPlaysPerVisitor,
    CooldownHours,
    RequireEmail,
    ValidityDays,
    MaxRedemptions,
    MinOrderCents,
    CombinesWithProducts,
    CombinesWithShipping,
    CreatedAt,
    UpdatedAt,
}

/// Plays (抽奖记录, 不可变审计轨迹, 奖品字段为历史快照)
#[derive(DeriveIden)]
enum Plays {
    Table,
    Id,
    ShopId,
    VisitorId,
    GameId,
    SegmentId,
    Result,
    PrizeKind,
    PrizeValue,
    PrizeLabel,
    DiscountId,
    PlayedAt,
}

/// Discounts (已发放奖励, code 店铺内唯一)
#[derive(DeriveIden)]
enum Discounts {
    Table,
    Id,
    ShopId,
    VisitorId,
    RuleId,
    Code,
    ExternalId,
    PrizeKind,
    PrizeValue,
    Status,
    ExpiresAt,
    UsedAt,
    OrderId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 店铺表
        manager
            .create_table(
                Table::create()
                    .table(Shops::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Shops::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Shops::Domain).string_len(255).not_null())
                    .col(ColumnDef::new(Shops::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Shops::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Shops::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Shops::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_shops_domain_unique")
                    .table(Shops::Table)
                    .col(Shops::Domain)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 访客表
        manager
            .create_table(
                Table::create()
                    .table(Visitors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Visitors::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Visitors::ShopId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Visitors::Fingerprint)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Visitors::Email).string_len(255).null())
                    .col(
                        ColumnDef::new(Visitors::ExternalCustomerId)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Visitors::DeviceType)
                            .string_len(32)
                            .not_null()
                            .default("desktop"),
                    )
                    .col(
                        ColumnDef::new(Visitors::Browser)
                            .string_len(64)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(
                        ColumnDef::new(Visitors::Os)
                            .string_len(64)
                            .not_null()
                            .default("unknown"),
                    )
                    .col(ColumnDef::new(Visitors::Country).string_len(8).null())
                    .col(
                        ColumnDef::new(Visitors::FirstSeenAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Visitors::LastSeenAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Visitors::TotalPlays)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Visitors::TotalWins)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // 指纹在店铺内唯一（并发首次访问靠它去重）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_visitors_shop_fingerprint_unique")
                    .table(Visitors::Table)
                    .col(Visitors::ShopId)
                    .col(Visitors::Fingerprint)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 会话表
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::VisitorId).big_integer().not_null())
                    .col(ColumnDef::new(Sessions::Token).string_len(64).not_null())
                    .col(ColumnDef::new(Sessions::Page).string_len(1024).not_null())
                    .col(ColumnDef::new(Sessions::Referrer).string_len(1024).null())
                    .col(ColumnDef::new(Sessions::UtmSource).string_len(255).null())
                    .col(ColumnDef::new(Sessions::UtmMedium).string_len(255).null())
                    .col(ColumnDef::new(Sessions::UtmCampaign).string_len(255).null())
                    .col(
                        ColumnDef::new(Sessions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sessions::LastActivityAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Sessions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sessions_token_unique")
                    .table(Sessions::Table)
                    .col(Sessions::Token)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sessions_visitor")
                    .table(Sessions::Table)
                    .col(Sessions::VisitorId)
                    .to_owned(),
            )
            .await?;

        // 活动表
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::ShopId).big_integer().not_null())
                    .col(ColumnDef::new(Games::GameType).string_len(32).not_null())
                    .col(ColumnDef::new(Games::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Games::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Games::StartsAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Games::EndsAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Games::TriggerKind)
                            .string_len(32)
                            .not_null()
                            .default("delay"),
                    )
                    .col(ColumnDef::new(Games::TriggerValue).integer().null())
                    .col(ColumnDef::new(Games::DisplayConfig).json_binary().null())
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_games_shop")
                    .table(Games::Table)
                    .col(Games::ShopId)
                    .to_owned(),
            )
            .await?;

        // 奖品槽位表
        manager
            .create_table(
                Table::create()
                    .table(GameSegments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameSegments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameSegments::GameId).big_integer().not_null())
                    .col(ColumnDef::new(GameSegments::Label).string_len(255).not_null())
                    .col(
                        ColumnDef::new(GameSegments::PrizeKind)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameSegments::PrizeValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(GameSegments::Weight).double().not_null())
                    .col(ColumnDef::new(GameSegments::Color).string_len(32).null())
                    .col(
                        ColumnDef::new(GameSegments::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_game_segments_game")
                    .table(GameSegments::Table)
                    .col(GameSegments::GameId)
                    .to_owned(),
            )
            .await?;

        // 折扣规则表
        manager
            .create_table(
                Table::create()
                    .table(DiscountRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiscountRules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DiscountRules::ShopId).big_integer().not_null())
                    .col(ColumnDef::new(DiscountRules::GameId).big_integer().null())
                    .col(
                        ColumnDef::new(DiscountRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(DiscountRules::MaxPlaysPerVisitor)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(DiscountRules::CooldownHours)
                            .integer()
                            .not_null()
                            .default(24),
                    )
                    .col(
                        ColumnDef::new(DiscountRules::RequireEmail)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DiscountRules::ValidityDays)
                            .integer()
                            .not_null()
                            .default(7),
                    )
                    .col(
                        ColumnDef::new(DiscountRules::MaxRedemptions)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(DiscountRules::MinOrderCents).big_integer().null())
                    .col(
                        ColumnDef::new(DiscountRules::CombinesWithProducts)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DiscountRules::CombinesWithShipping)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DiscountRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(DiscountRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_discount_rules_shop")
                    .table(DiscountRules::Table)
                    .col(DiscountRules::ShopId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_discount_rules_game")
                    .table(DiscountRules::Table)
                    .col(DiscountRules::GameId)
                    .to_owned(),
            )
            .await?;

        // 抽奖记录表
        manager
            .create_table(
                Table::create()
                    .table(Plays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plays::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Plays::ShopId).big_integer().not_null())
                    .col(ColumnDef::new(Plays::VisitorId).big_integer().not_null())
                    .col(ColumnDef::new(Plays::GameId).big_integer().not_null())
                    .col(ColumnDef::new(Plays::SegmentId).big_integer().not_null())
                    .col(ColumnDef::new(Plays::Result).string_len(16).not_null())
                    .col(ColumnDef::new(Plays::PrizeKind).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Plays::PrizeValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Plays::PrizeLabel).string_len(255).not_null())
                    .col(ColumnDef::new(Plays::DiscountId).big_integer().null())
                    .col(
                        ColumnDef::new(Plays::PlayedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 冷却窗口内的计数查询靠这个索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_plays_visitor_game_played_at")
                    .table(Plays::Table)
                    .col(Plays::VisitorId)
                    .col(Plays::GameId)
                    .col(Plays::PlayedAt)
                    .to_owned(),
            )
            .await?;

        // 折扣表
        manager
            .create_table(
                Table::create()
                    .table(Discounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Discounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Discounts::ShopId).big_integer().not_null())
                    .col(ColumnDef::new(Discounts::VisitorId).big_integer().not_null())
                    .col(ColumnDef::new(Discounts::RuleId).big_integer().not_null())
                    .col(ColumnDef::new(Discounts::Code).string_len(64).not_null())
                    .col(ColumnDef::new(Discounts::ExternalId).string_len(255).null())
                    .col(ColumnDef::new(Discounts::PrizeKind).string_len(32).not_null())
                    .col(
                        ColumnDef::new(Discounts::PrizeValue)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Discounts::Status)
                            .string_len(16)
                            .not_null()
                            .default("created"),
                    )
                    .col(
                        ColumnDef::new(Discounts::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Discounts::UsedAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Discounts::OrderId).string_len(255).null())
                    .col(
                        ColumnDef::new(Discounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // code 店铺内唯一（发码碰撞重试靠它兜底）
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_discounts_shop_code_unique")
                    .table(Discounts::Table)
                    .col(Discounts::ShopId)
                    .col(Discounts::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_discounts_visitor")
                    .table(Discounts::Table)
                    .col(Discounts::VisitorId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序: 折扣 -> 记录 -> 规则 -> 槽位 -> 活动 -> 会话 -> 访客 -> 店铺
        for table in [
            Table::drop().if_exists().table(Discounts::Table).to_owned(),
            Table::drop().if_exists().table(Plays::Table).to_owned(),
            Table::drop().if_exists().table(DiscountRules::Table).to_owned(),
            Table::drop().if_exists().table(GameSegments::Table).to_owned(),
            Table::drop().if_exists().table(Games::Table).to_owned(),
            Table::drop().if_exists().table(Sessions::Table).to_owned(),
            Table::drop().if_exists().table(Visitors::Table).to_owned(),
            Table::drop().if_exists().table(Shops::Table).to_owned(),
        ] {
            manager.drop_table(table).await?;
        }

        Ok(())
    }
}
