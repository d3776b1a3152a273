use bloghaven_core::domain::DEFAULT_CATEGORIES;
use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_tables::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert
            .into_table(Categories::Table)
            .columns([Categories::Id, Categories::Name]);

        for name in DEFAULT_CATEGORIES {
            insert
                .values([uuid::Uuid::new_v4().into(), name.into()])
                .map_err(|e| DbErr::Migration(e.to_string()))?;
        }

        manager.exec_stmt(insert).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Categories::Table)
            .and_where(Expr::col(Categories::Name).is_in(DEFAULT_CATEGORIES))
            .to_owned();

        manager.exec_stmt(delete).await
    }
}
