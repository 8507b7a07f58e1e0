use super::client::ApiClient;
use super::transport::{ApiRequest, ApiResponse};
use crate::error::{AppResult, Error};
use crate::session::Role;
use serde::{Deserialize, Serialize};

const USERS_PATH: &str = "users/";

/// A staff account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl StaffMember {
    pub fn first_name_or_na(&self) -> &str {
        non_empty(self.first_name.as_deref()).unwrap_or("N/A")
    }

    pub fn last_name_or_na(&self) -> &str {
        non_empty(self.last_name.as_deref()).unwrap_or("N/A")
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name_or_na(), self.last_name_or_na())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Body of `POST /users/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewStaffMember {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

impl NewStaffMember {
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            role: Role::Teacher,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Staff account endpoints
#[derive(Clone)]
pub struct UsersClient {
    api: ApiClient,
}

impl UsersClient {
    pub(crate) fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> AppResult<Vec<StaffMember>> {
        self.api
            .send(ApiRequest::get(USERS_PATH))
            .await?
            .error_for_status()?
            .json()
    }

    /// Teacher roster for assignment dropdowns
    pub async fn teachers(&self) -> AppResult<Vec<StaffMember>> {
        self.api
            .send(ApiRequest::get(USERS_PATH).with_query("role", Role::Teacher.as_str()))
            .await?
            .error_for_status()?
            .json()
    }

    /// Create an account; only 201 counts as success
    pub async fn create(&self, member: &NewStaffMember) -> AppResult<()> {
        let body = serde_json::to_value(member)?;
        let response = self.api.send(ApiRequest::post(USERS_PATH, body)).await?;
        if response.status != 201 {
            return Err(Error::Staff(format!(
                "Failed to add user: {}",
                failure_reason(&response)
            )));
        }
        Ok(())
    }

    /// Delete an account; only 204 counts as success
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let response = self
            .api
            .send(ApiRequest::delete(format!("{}{}/", USERS_PATH, id)))
            .await?;
        if response.status != 204 {
            return Err(Error::Staff(format!(
                "Failed to delete user: {}",
                failure_reason(&response)
            )));
        }
        Ok(())
    }
}

// `detail` from the response body, else the status line
fn failure_reason(response: &ApiResponse) -> String {
    response
        .json_value()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| format!("Unexpected response status: {}", response.status))
}
