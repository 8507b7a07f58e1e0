use crate::config::Config;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::session::Role;
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

// Export components
pub mod calendar;
pub mod documents;
pub mod header;
pub mod lessons;
pub mod staff;

pub use calendar::{Calendar, CalendarHandle};
pub use documents::Documents;
pub use header::Header;
pub use lessons::LessonLinks;
pub use staff::Staff;

/// Component trait that every page implements
#[async_trait]
pub trait Component: Send + Sync + Any {
    /// Get the name of the component
    fn name(&self) -> &'static str;

    /// Route the page is reachable under
    fn route(&self) -> &'static str;

    /// Localized sidebar label
    fn title(&self) -> String;

    /// Only supervisors and superadmins see the page
    fn requires_privilege(&self) -> bool {
        false
    }

    /// Initialize the component
    async fn init(&self, ctx: &AppContext) -> AppResult<()>;

    /// Shutdown the component
    async fn shutdown(&self) -> AppResult<()>;

    /// Convert to Any for downcasting
    fn as_any(&self) -> &dyn Any;
}

/// One sidebar link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub name: &'static str,
    pub title: String,
    pub route: &'static str,
}

/// Manager for all components
pub struct ComponentManager {
    components: Vec<Box<dyn Component>>,
    config: Arc<RwLock<Config>>,
}

impl fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentManager")
            .field("component_count", &self.components.len())
            .field("config", &self.config)
            .finish()
    }
}

impl ComponentManager {
    /// Create a new component manager
    pub fn new(config: Arc<RwLock<Config>>) -> Self {
        Self {
            components: Vec::new(),
            config,
        }
    }

    /// Register a component
    pub fn register<T: Component + 'static>(&mut self, component: T) {
        info!("Registering component: {}", component.name());
        self.components.push(Box::new(component));
    }

    /// Register a component only if the configuration enables it
    pub async fn register_if_enabled<T: Component + 'static>(&mut self, component: T) -> bool {
        let enabled = self.config.read().await.is_component_enabled(component.name());
        if enabled {
            self.register(component);
        } else {
            info!("Component disabled by configuration: {}", component.name());
        }
        enabled
    }

    /// Initialize all registered components
    pub async fn init_all(&self, ctx: &AppContext) -> AppResult<()> {
        for component in &self.components {
            info!("Initializing component: {}", component.name());

            if let Err(e) = component.init(ctx).await {
                // Log error but continue with other components
                tracing::error!("Error initializing component {}: {:?}", component.name(), e);
            }
        }

        Ok(())
    }

    /// Shutdown all components
    pub async fn shutdown_all(&self) -> AppResult<()> {
        info!("Shutting down all components");

        for component in &self.components {
            if let Err(e) = component.shutdown().await {
                // Log error but continue with other components
                tracing::error!(
                    "Error shutting down component {}: {:?}",
                    component.name(),
                    e
                );
            }
        }

        Ok(())
    }

    /// Get a component by name
    pub fn get_component_by_name(&self, name: &str) -> Option<&dyn Component> {
        self.components
            .iter()
            .find(|c| c.name() == name)
            .map(|c| c.as_ref())
    }

    /// Get a registered component by its concrete type
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<T>())
    }

    /// Sidebar entries visible to a role, in registration order
    pub fn navigation(&self, role: Option<Role>) -> Vec<NavEntry> {
        let privileged = role.map(Role::is_privileged).unwrap_or(false);
        self.components
            .iter()
            .filter(|c| privileged || !c.requires_privilege())
            .map(|c| NavEntry {
                name: c.name(),
                title: c.title(),
                route: c.route(),
            })
            .collect()
    }
}
