pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users;
mod m20260301_000002_create_profiles;
mod m20260301_000003_create_blogs;
mod m20260301_000004_create_comments;
mod m20260301_000005_create_friends;
mod m20260301_000006_create_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users::Migration),
            Box::new(m20260301_000002_create_profiles::Migration),
            Box::new(m20260301_000003_create_blogs::Migration),
            Box::new(m20260301_000004_create_comments::Migration),
            Box::new(m20260301_000005_create_friends::Migration),
            Box::new(m20260301_000006_create_messages::Migration),
        ]
    }
}
