use tokio::process::Command;

use crate::settings::Config;

/// Shells out to the sqlx cli against the configured database.
async fn sqlx_migrate(args: &[&str], config: &Config) {
    let _ = Command::new("sqlx")
        .arg("migrate")
        .args(args)
        .arg("-D")
        .arg(&config.database_url)
        .status()
        .await
        .unwrap();
}

pub async fn db_generate(migration_name: &String) {
    let _ = Command::new("sqlx")
        .arg("migrate")
        .arg("add")
        .arg(migration_name)
        .arg("-r")
        .status()
        .await
        .unwrap();
}

pub async fn db_list(config: &Config) {
    sqlx_migrate(&["info"], config).await;
}

pub async fn db_migrate(config: &Config) {
    sqlx_migrate(&["run"], config).await;
}

pub async fn db_revert(config: &Config) {
    sqlx_migrate(&["revert"], config).await;
}
