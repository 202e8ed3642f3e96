use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::UserId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Nickname).string_len(100))
                    .col(ColumnDef::new(Profiles::AvatarUrl).string())
                    .col(ColumnDef::new(Profiles::Age).integer())
                    .col(ColumnDef::new(Profiles::Gender).string_len(10))
                    .col(ColumnDef::new(Profiles::HeightCm).integer())
                    .col(ColumnDef::new(Profiles::WeightKg).double())
                    .col(ColumnDef::new(Profiles::Hobbies).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Profiles::Table, Profiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profiles {
    Table,
    UserId,
    Nickname,
    AvatarUrl,
    Age,
    Gender,
    HeightCm,
    WeightKg,
    Hobbies,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
