pub use sea_orm_migration::prelude::*;

mod m20250901_000001_initial;
mod m20250903_000002_add_targeting_rules;
mod m20250905_000003_add_analytics_daily;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_initial::Migration),
            Box::new(m20250903_000002_add_targeting_rules::Migration),
            Box::new(m20250905_000003_add_analytics_daily::Migration),
        ]
    }
}
