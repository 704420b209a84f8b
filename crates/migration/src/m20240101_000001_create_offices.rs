//! Create `offices` table.
//! One row per office document; `photo_id` holds the blob URL when a photo exists.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Offices::Table)
                    .if_not_exists()
                    .col(uuid(Offices::Id).primary_key())
                    .col(string_len(Offices::Address, 100).not_null())
                    .col(string_len(Offices::RegistryPhoneNumber, 32).not_null())
                    .col(string_len_null(Offices::PhotoId, 1024))
                    .col(boolean(Offices::IsActive).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Offices::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Offices {
    Table,
    Id,
    Address,
    RegistryPhoneNumber,
    PhotoId,
    IsActive,
}
