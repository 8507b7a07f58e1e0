use clap::Subcommand;
use juzeng_admin::components::ComponentManager;
use juzeng_admin::context::AppContext;
use juzeng_admin::error::{component_error, AppResult};
use std::sync::Arc;

// Export submodules
pub mod auth;
pub mod calendar;
pub mod documents;
pub mod lessons;
pub mod staff;

/// Shared context for all commands
pub struct CommandContext<'a> {
    pub app: &'a AppContext,
    pub component_manager: &'a Arc<ComponentManager>,
}

impl CommandContext<'_> {
    /// Look up an initialized page by type
    pub fn page<T: juzeng_admin::components::Component>(&self, name: &str) -> AppResult<&T> {
        self.component_manager
            .get::<T>()
            .ok_or_else(|| component_error(&format!("The {} page is disabled", name)))
    }
}

/// Type alias for command result
pub type CommandResult = AppResult<()>;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "JUZENG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List the pages available to the current role
    Nav,
    /// Calendar events
    #[command(subcommand)]
    Calendar(calendar::CalendarCommand),
    /// Staff accounts
    #[command(subcommand)]
    Staff(staff::StaffCommand),
    /// Bulk lesson links
    #[command(subcommand)]
    Lessons(lessons::LessonsCommand),
    /// Shared documents
    #[command(subcommand)]
    Documents(documents::DocumentsCommand),
}

/// Dispatch a parsed command
pub async fn run(
    command: Command,
    app: &AppContext,
    component_manager: &Arc<ComponentManager>,
) -> CommandResult {
    let ctx = CommandContext {
        app,
        component_manager,
    };

    match command {
        Command::Login { email, password } => auth::login(&ctx, &email, &password).await,
        Command::Logout => auth::logout(&ctx).await,
        Command::Whoami => auth::whoami(&ctx).await,
        Command::Nav => auth::nav(&ctx).await,
        Command::Calendar(cmd) => calendar::run(&ctx, cmd).await,
        Command::Staff(cmd) => staff::run(&ctx, cmd).await,
        Command::Lessons(cmd) => lessons::run(&ctx, cmd).await,
        Command::Documents(cmd) => documents::run(&ctx, cmd).await,
    }
}

/// Read a line from stdin without blocking the runtime
pub async fn read_line() -> AppResult<String> {
    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line).map(|_| line)
    })
    .await
    .map_err(|e| component_error(&format!("Failed to read input: {}", e)))??;
    Ok(line)
}
