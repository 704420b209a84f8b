use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Offices: filter by status is the common listing query
        manager
            .create_index(
                Index::create()
                    .name("idx_offices_is_active")
                    .table(Offices::Table)
                    .col(Offices::IsActive)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_offices_is_active").table(Offices::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Offices {
    Table,
    IsActive,
}
