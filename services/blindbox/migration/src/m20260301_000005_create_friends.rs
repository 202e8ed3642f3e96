use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Friends::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Friends::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Friends::FromUserId).uuid().not_null())
                    .col(ColumnDef::new(Friends::ToUserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Friends::Status)
                            .string_len(10)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Friends::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Friends::Table, Friends::FromUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Friends::Table, Friends::ToUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .check(Expr::col(Friends::FromUserId).ne(Expr::col(Friends::ToUserId)))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Friends::Table)
                    .col(Friends::FromUserId)
                    .col(Friends::ToUserId)
                    .unique()
                    .name("uq_friends_from_user_id_to_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Friends::Table)
                    .col(Friends::ToUserId)
                    .name("idx_friends_to_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Friends::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Friends {
    Table,
    Id,
    FromUserId,
    ToUserId,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
