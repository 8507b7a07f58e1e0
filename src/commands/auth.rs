use super::{CommandContext, CommandResult};
use juzeng_admin::api::auth::LANDING_ROUTE;
use juzeng_admin::components::Header;
use juzeng_admin::error::Error;

/// Log in and report where to continue
pub async fn login(ctx: &CommandContext<'_>, email: &str, password: &str) -> CommandResult {
    match ctx.app.api.auth.login(email, password).await {
        Ok(tokens) => {
            println!("{}", t!("login_success", role = tokens.role, route = LANDING_ROUTE));
            Ok(())
        }
        Err(Error::Transport(e)) => {
            tracing::debug!("Login transport failure: {}", e);
            Err(Error::Login(t!("login_network_error").to_string()))
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(ctx: &CommandContext<'_>) -> CommandResult {
    Header::new(ctx.app.api.auth.clone()).logout().await?;
    println!("{}", t!("logout_success"));
    Ok(())
}

pub async fn whoami(ctx: &CommandContext<'_>) -> CommandResult {
    let info = Header::new(ctx.app.api.auth.clone()).info().await?;
    println!("{}", t!("whoami", name = info.name, role = info.role));
    Ok(())
}

/// Print the sidebar for the stored role
pub async fn nav(ctx: &CommandContext<'_>) -> CommandResult {
    let role = ctx.app.session().role().await?;
    let role_name = role.map(|r| r.as_str()).unwrap_or("-");

    println!("{}", t!("nav_header", role = role_name));
    for entry in ctx.component_manager.navigation(role) {
        println!("  {:<12} {}", entry.route, entry.title);
    }
    Ok(())
}
