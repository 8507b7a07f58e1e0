use crate::api::users::{NewStaffMember, StaffMember, UsersClient};
use crate::context::AppContext;
use crate::error::{AppResult, Error};
use crate::session::{Role, SessionContext};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Roles a caller may give to a new account
pub fn assignable_roles(caller: Option<Role>) -> Vec<Role> {
    let mut roles = vec![Role::Teacher, Role::Curator];
    if caller == Some(Role::Superadmin) {
        roles.push(Role::Supervisor);
    }
    roles
}

/// Staff page: account table with add and delete
pub struct Staff {
    users: UsersClient,
    session: SessionContext,
    members: RwLock<Vec<StaffMember>>,
}

impl Staff {
    pub fn new(users: UsersClient, session: SessionContext) -> Self {
        Self {
            users,
            session,
            members: RwLock::new(Vec::new()),
        }
    }

    /// Currently displayed accounts
    pub async fn members(&self) -> Vec<StaffMember> {
        self.members.read().await.clone()
    }

    async fn require_privileged(&self) -> AppResult<Role> {
        if self.session.access_token().await?.is_none() {
            return Err(Error::NotAuthenticated);
        }
        match self.session.role().await? {
            Some(role) if role.is_privileged() => Ok(role),
            _ => Err(Error::PermissionDenied(
                "staff management is limited to supervisors".to_string(),
            )),
        }
    }

    /// Re-fetch the account list; a failure keeps the current list
    pub async fn load(&self) -> AppResult<Vec<StaffMember>> {
        self.require_privileged().await?;
        self.refresh().await
    }

    async fn refresh(&self) -> AppResult<Vec<StaffMember>> {
        let members = self.users.list().await.map_err(|e| {
            if e.requires_login() {
                e
            } else {
                Error::Staff(format!("Failed to load staff data: {}", e))
            }
        })?;

        *self.members.write().await = members.clone();
        info!("Loaded {} staff members", members.len());
        Ok(members)
    }

    /// Create an account and refresh the list
    pub async fn add(&self, member: NewStaffMember) -> AppResult<()> {
        let caller = self.require_privileged().await?;
        if !assignable_roles(Some(caller)).contains(&member.role) {
            return Err(Error::PermissionDenied(format!(
                "a {} cannot create {} accounts",
                caller, member.role
            )));
        }

        self.users.create(&member).await?;
        info!("Added staff member {}", member.email);

        if let Err(e) = self.refresh().await {
            warn!("User added but refreshing the staff list failed: {}", e);
        }
        Ok(())
    }

    /// Delete an account; the list only changes once the backend confirms
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.require_privileged().await?;

        self.users.delete(id).await?;
        info!("Deleted staff member {}", id);

        if let Err(e) = self.refresh().await {
            warn!("User deleted but refreshing the staff list failed: {}", e);
            self.members.write().await.retain(|member| member.id != id);
        }
        Ok(())
    }
}

#[async_trait]
impl super::Component for Staff {
    fn name(&self) -> &'static str {
        "staff"
    }

    fn route(&self) -> &'static str {
        "/staff"
    }

    fn title(&self) -> String {
        t!("nav_staff").to_string()
    }

    fn requires_privilege(&self) -> bool {
        true
    }

    async fn init(&self, _ctx: &AppContext) -> AppResult<()> {
        Ok(())
    }

    async fn shutdown(&self) -> AppResult<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
