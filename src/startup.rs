use juzeng_admin::components::{Calendar, ComponentManager, Documents, LessonLinks, Staff};
use juzeng_admin::config::Config;
use juzeng_admin::context::AppContext;
use juzeng_admin::error::other_error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging(verbose: bool) -> miette::Result<()> {
    let default_filter = if verbose {
        "debug,reqwest=info,hyper=info"
    } else {
        "info,reqwest=warn,hyper=warn"
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| other_error(&format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load configuration and apply the console locale
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => {
            rust_i18n::set_locale(&config.locale);
            info!("Using API at {} (locale {})", config.api_base_url, config.locale);
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the shared context and register every enabled page
pub async fn build_app(config: Config) -> miette::Result<(AppContext, Arc<ComponentManager>)> {
    let documents = config.documents.clone();
    let ctx = AppContext::from_config(config)?;

    let mut component_manager = ComponentManager::new(Arc::clone(&ctx.config));

    component_manager.register_if_enabled(Calendar::new()).await;
    component_manager
        .register_if_enabled(Staff::new(ctx.api.users.clone(), ctx.session().clone()))
        .await;
    component_manager
        .register_if_enabled(LessonLinks::new(ctx.api.lessons.clone(), ctx.session().clone()))
        .await;
    component_manager.register_if_enabled(Documents::new(documents)).await;

    component_manager.init_all(&ctx).await?;

    Ok((ctx, Arc::new(component_manager)))
}
