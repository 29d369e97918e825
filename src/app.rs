//! Boot sequence shared by the `shelf-app` binary and the `shelf` CLI.

use anyhow::Context;
use shelf_db::PgPool;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Which way to move the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateDirection {
    Up,
    Drop,
}

/// Build a registry holding every module, backed by `pool`
pub fn build_registry(pool: &PgPool, settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool, &settings.database)?;
    Ok(registry)
}

async fn run_migrations(
    pool: &PgPool,
    registry: &ModuleRegistry,
    direction: MigrateDirection,
) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    match direction {
        MigrateDirection::Up => shelf_db::migrate::up(pool, &migrations).await,
        MigrateDirection::Drop => shelf_db::migrate::drop_all(pool, &migrations).await,
    }
}

/// Apply or revert every module's schema
pub async fn migrate(settings: &Settings, direction: MigrateDirection) -> anyhow::Result<usize> {
    let pool = shelf_db::connect(&settings.database).await?;
    let registry = build_registry(&pool, settings)?;

    let result = run_migrations(&pool, &registry, direction).await;
    pool.close().await;

    let count = result.with_context(|| format!("migrate {:?} failed", direction))?;
    tracing::info!(?direction, count, "migrations finished");
    Ok(count)
}

/// Check that every module can reach its backing store
pub async fn ping(settings: &Settings) -> anyhow::Result<()> {
    let pool = shelf_db::connect_lazy(&settings.database)?;
    let registry = build_registry(&pool, settings)?;

    let result = registry.check_ready().await;
    pool.close().await;
    result
}

/// Run the HTTP service until a shutdown signal arrives
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        "shelf-app bootstrap starting"
    );

    // Lazy so the process comes up during a database outage and `/ready` says so
    let pool = shelf_db::connect_lazy(&settings.database)?;
    let registry = build_registry(&pool, &settings)?;

    if settings.database.run_migrations {
        let applied = run_migrations(&pool, &registry, MigrateDirection::Up)
            .await
            .with_context(|| "startup migrations failed")?;
        tracing::info!(applied, "schema up to date");
    }

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!("shelf-app bootstrap complete");

    let served =
        shelf_http::start_server(&registry, &settings, shelf_http::shutdown_signal()).await;

    let stopped = registry.stop_modules().await;
    served?;
    stopped
}
