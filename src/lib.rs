//! Bookshelf application library
//!
//! Application modules plus the bootstrap shared by the `bookshelf-app` and
//! `bookshelf` binaries.

pub mod modules;

use anyhow::Context;
use bookshelf_kernel::{InitCtx, ModuleRegistry, Settings};

/// Build the registry with every application module registered
pub fn build_registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry).context("failed to register modules")?;
    Ok(registry)
}

/// Run the service until ctrl-c: init and start modules, serve HTTP, then
/// stop modules in reverse order.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        address = %settings.bind_address(),
        "bookshelf bootstrap starting"
    );

    let registry = build_registry()?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;

    tracing::info!(
        modules = registry.module_count(),
        "bookshelf bootstrap complete"
    );

    let served = bookshelf_http::start_server(
        &registry,
        &settings,
        bookshelf_http::shutdown_signal(),
    )
    .await;

    registry.stop_modules().await?;
    served
}
