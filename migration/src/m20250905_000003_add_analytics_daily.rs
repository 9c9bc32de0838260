use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

/// Analytics Daily (按天滚动汇总, 只增不减)
/// 键为 (shop_id, game_id 或 NULL 表示全局, day)
#[derive(DeriveIden)]
enum AnalyticsDaily {
    Table,
    Id,
    ShopId,
    GameId,
    Day,
    Views,
    Plays,
    Wins,
    Claims,
    Redemptions,
    RevenueCents,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AnalyticsDaily::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AnalyticsDaily::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AnalyticsDaily::ShopId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AnalyticsDaily::GameId).big_integer().null())
                    .col(ColumnDef::new(AnalyticsDaily::Day).date().not_null())
                    .col(
                        ColumnDef::new(AnalyticsDaily::Views)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AnalyticsDaily::Plays)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AnalyticsDaily::Wins)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AnalyticsDaily::Claims)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AnalyticsDaily::Redemptions)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AnalyticsDaily::RevenueCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AnalyticsDaily::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(AnalyticsDaily::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .to_owned(),
            )
            .await?;

        // 部分唯一索引: game_id 为 NULL 的全局行与按活动行分别去重
        // (sea-query 的 Index builder 不支持 partial index, 用原生 SQL)
        let conn = manager.get_connection();
        conn.execute(Statement::from_string(
            manager.get_database_backend(),
            r#"CREATE UNIQUE INDEX IF NOT EXISTS idx_analytics_daily_game_unique
               ON analytics_daily (shop_id, game_id, day) WHERE game_id IS NOT NULL;"#
                .to_string(),
        ))
        .await?;
        conn.execute(Statement::from_string(
            manager.get_database_backend(),
            r#"CREATE UNIQUE INDEX IF NOT EXISTS idx_analytics_daily_global_unique
               ON analytics_daily (shop_id, day) WHERE game_id IS NULL;"#
                .to_string(),
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(AnalyticsDaily::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
