//! Process wiring shared by `stacks-app` and the `stacks` CLI.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use stacks_db::{apply_migrations, Database, IN_MEMORY};
use stacks_kernel::{
    settings::{DatabaseSettings, Settings},
    InitCtx, ModuleRegistry,
};

use crate::modules::{
    self,
    books::{fixtures, store::BookStore, store::SqliteBookStore},
};

/// Registry with every application module registered.
pub fn build_registry() -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);
    registry
}

/// Open the configured database, creating the parent directory of a file path.
pub fn open_database(settings: &DatabaseSettings) -> anyhow::Result<Arc<Database>> {
    if settings.path != IN_MEMORY {
        if let Some(parent) = Path::new(&settings.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }
    }

    let db = Database::open(&settings.path)
        .with_context(|| format!("failed to open database '{}'", settings.path))?;
    Ok(Arc::new(db))
}

/// Apply every pending module migration. Returns how many ran.
pub fn migrate(registry: &ModuleRegistry, db: &Database) -> anyhow::Result<usize> {
    let migrations = registry.collect_migrations();
    let applied = apply_migrations(db, &migrations).context("failed to apply migrations")?;
    tracing::info!(applied, total = migrations.len(), "migrations complete");
    Ok(applied)
}

/// Modules registered, migrated and initialized against one database.
pub struct App {
    pub registry: ModuleRegistry,
    pub db: Arc<Database>,
}

impl App {
    pub async fn boot(settings: &Settings) -> anyhow::Result<Self> {
        let registry = build_registry();
        let db = open_database(&settings.database)?;
        migrate(&registry, &db)?;

        let ctx = InitCtx {
            settings,
            db: &db,
        };
        registry.init_all(&ctx).await?;

        Ok(Self { registry, db })
    }
}

/// Boot, serve until Ctrl-C, then stop modules in reverse order.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let app = App::boot(settings).await?;
    let ctx = InitCtx {
        settings,
        db: &app.db,
    };
    app.registry.start_all(&ctx).await?;

    let served = stacks_http::start_server(&app.registry, settings).await;
    app.registry.stop_all().await?;
    served
}

/// Insert `count` sample books. Returns how many were written.
pub async fn seed(settings: &Settings, count: usize, generated_only: bool) -> anyhow::Result<usize> {
    let registry = build_registry();
    let db = open_database(&settings.database)?;
    migrate(&registry, &db)?;

    let store = SqliteBookStore::new(db);
    let books = fixtures::sample_books(&mut rand::thread_rng(), count, generated_only);
    let total = books.len();
    for book in books {
        store
            .insert(book)
            .await
            .context("failed to insert sample book")?;
    }

    tracing::info!(inserted = total, "catalog seeded");
    Ok(total)
}
