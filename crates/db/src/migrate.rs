//! Module migration runner.
//!
//! Applied migrations are recorded in `shelf_migrations` keyed by
//! `(module, id)`, so `up` is idempotent. `drop_all` runs `down` scripts in reverse
//! and forgets them.

use anyhow::Context;
use shelf_kernel::Migration;
use sqlx::PgPool;

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS shelf_migrations (
        module TEXT NOT NULL,
        id TEXT NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (module, id)
    )
"#;

async fn ensure_ledger(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(LEDGER_DDL)
        .execute(pool)
        .await
        .with_context(|| "failed to create migration ledger")?;
    Ok(())
}

async fn is_applied(pool: &PgPool, module: &str, id: &str) -> anyhow::Result<bool> {
    let (applied,): (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM shelf_migrations WHERE module = $1 AND id = $2)",
    )
    .bind(module)
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(applied)
}

/// Apply every migration not yet recorded. Returns how many ran.
pub async fn up(pool: &PgPool, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    ensure_ledger(pool).await?;

    let mut applied = 0;
    for (module, migration) in migrations {
        if is_applied(pool, module, migration.id).await? {
            tracing::debug!(module = %module, id = migration.id, "migration already applied");
            continue;
        }

        tracing::info!(module = %module, id = migration.id, "applying migration");

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        sqlx::query("INSERT INTO shelf_migrations (module, id) VALUES ($1, $2)")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        applied += 1;
    }

    Ok(applied)
}

/// Revert every recorded migration, newest first. Returns how many ran.
pub async fn drop_all(pool: &PgPool, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    ensure_ledger(pool).await?;

    let mut reverted = 0;
    for (module, migration) in migrations.iter().rev() {
        if !is_applied(pool, module, migration.id).await? {
            continue;
        }

        tracing::info!(module = %module, id = migration.id, "reverting migration");

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.down)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("revert of {}/{} failed", module, migration.id))?;
        sqlx::query("DELETE FROM shelf_migrations WHERE module = $1 AND id = $2")
            .bind(module)
            .bind(migration.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        reverted += 1;
    }

    Ok(reverted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_migrations() -> Vec<(String, Migration)> {
        vec![(
            "scratch".to_string(),
            Migration {
                id: "001_init",
                up: "CREATE TABLE migrate_scratch (id BIGSERIAL PRIMARY KEY); \
                     INSERT INTO migrate_scratch DEFAULT VALUES;",
                down: "DROP TABLE IF EXISTS migrate_scratch;",
            },
        )]
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn up_is_idempotent_and_drop_reverts() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = PgPool::connect(&url).await.expect("pool creation failed");
        let migrations = scratch_migrations();

        drop_all(&pool, &migrations).await.unwrap();

        assert_eq!(up(&pool, &migrations).await.unwrap(), 1);
        assert_eq!(up(&pool, &migrations).await.unwrap(), 0);

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM migrate_scratch")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        assert_eq!(drop_all(&pool, &migrations).await.unwrap(), 1);
        assert_eq!(drop_all(&pool, &migrations).await.unwrap(), 0);
    }
}
