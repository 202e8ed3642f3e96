use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(blindbox_migration::Migrator).await;
}
