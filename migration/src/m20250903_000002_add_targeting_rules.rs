use sea_orm_migration::prelude::*;

/// Targeting Rules (按优先级保存的投放规则)
/// 说明:
/// - 集合类字段 (page_types / devices / traffic_sources / utm_sources /
///   schedule_days) 存 JSON 数组, NULL 表示不限制
/// - priority 越大越先匹配, 相同时按创建顺序
#[derive(DeriveIden)]
enum TargetingRules {
    Table,
    Id,
    ShopId,
    Name,
    Priority,
    IsActive,
    TargetGameId,
    PageTypes,
    Devices,
    VisitorType,
    TrafficSources,
    UtmSources,
    ScheduleEnabled,
    ScheduleDays,
    StartHour,
    EndHour,
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
                    .table(TargetingRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TargetingRules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TargetingRules::ShopId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TargetingRules::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TargetingRules::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(TargetingRules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(TargetingRules::TargetGameId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TargetingRules::PageTypes).json_binary().null())
                    .col(ColumnDef::new(TargetingRules::Devices).json_binary().null())
                    .col(
                        ColumnDef::new(TargetingRules::VisitorType)
                            .string_len(32)
                            .not_null()
                            .default("all"),
                    )
                    .col(
                        ColumnDef::new(TargetingRules::TrafficSources)
                            .json_binary()
                            .null(),
                    )
                    .col(ColumnDef::new(TargetingRules::UtmSources).json_binary().null())
                    .col(
                        ColumnDef::new(TargetingRules::ScheduleEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(TargetingRules::ScheduleDays).json_binary().null())
                    .col(ColumnDef::new(TargetingRules::StartHour).small_integer().null())
                    .col(ColumnDef::new(TargetingRules::EndHour).small_integer().null())
                    .col(
                        ColumnDef::new(TargetingRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("NOW()")),
                    )
                    .col(
                        ColumnDef::new(TargetingRules::UpdatedAt)
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
                    .name("idx_targeting_rules_shop_priority")
                    .table(TargetingRules::Table)
                    .col(TargetingRules::ShopId)
                    .col(TargetingRules::Priority)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(TargetingRules::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
