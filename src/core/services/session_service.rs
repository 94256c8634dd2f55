//! Signed-in user and subscription plan, as kept in the key-value store.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::Plan;
use crate::gateway::{AuthGateway, ProxyResponse, ProxyRoute};
use crate::storage::{keys, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub plan: Plan,
    #[serde(default)]
    pub is_authenticated: bool,
}

pub struct SessionService;

impl SessionService {
    /// Reads the stored user, rewriting a legacy plan name in place.
    /// A corrupt entry is removed and treated as signed out.
    pub fn load_user(storage: &dyn KeyValueStore) -> ServiceResult<Option<User>> {
        let Some(raw) = storage.get(keys::USER)? else {
            return Ok(None);
        };
        let mut value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "failed to parse stored user; signing out");
                storage.remove(keys::USER)?;
                return Ok(None);
            }
        };

        let legacy = value
            .get("plan")
            .and_then(Value::as_str)
            .and_then(Plan::migrate_legacy);
        if let Some(plan) = legacy {
            value["plan"] = json!(plan.as_str());
        }

        match serde_json::from_value::<User>(value) {
            Ok(user) => {
                if legacy.is_some() {
                    tracing::info!(plan = user.plan.as_str(), "migrated legacy plan on stored user");
                    storage.set(keys::USER, &serde_json::to_string(&user).map_err(storage_err)?)?;
                }
                Ok(Some(user))
            }
            Err(err) => {
                tracing::warn!(error = %err, "stored user has an unexpected shape; signing out");
                storage.remove(keys::USER)?;
                Ok(None)
            }
        }
    }

    /// Current plan: the stored user's plan, else the plan key, else Starter.
    pub fn load_plan(storage: &dyn KeyValueStore) -> ServiceResult<Plan> {
        if let Some(user) = Self::load_user(storage)? {
            return Ok(user.plan);
        }
        let Some(raw) = storage.get(keys::USER_PLAN)? else {
            return Ok(Plan::default());
        };
        if let Some(plan) = Plan::migrate_legacy(&raw) {
            tracing::info!(from = raw.as_str(), to = plan.as_str(), "migrated legacy plan");
            storage.set(keys::USER_PLAN, plan.as_str())?;
            return Ok(plan);
        }
        Ok(Plan::parse_lenient(&raw))
    }

    /// Switches plan. Works signed out too, as the demo plan switcher does.
    pub fn update_plan(storage: &dyn KeyValueStore, plan: Plan) -> ServiceResult<()> {
        if let Some(mut user) = Self::load_user(storage)? {
            user.plan = plan;
            storage.set(keys::USER, &serde_json::to_string(&user).map_err(storage_err)?)?;
        }
        storage.set(keys::USER_PLAN, plan.as_str())?;
        tracing::info!(plan = plan.as_str(), "plan updated");
        Ok(())
    }

    pub fn login(
        storage: &dyn KeyValueStore,
        gateway: &AuthGateway,
        email: &str,
        password: &str,
        plan: Plan,
    ) -> ServiceResult<User> {
        let response = gateway.forward(
            ProxyRoute::Login,
            &json!({ "email": email, "password": password }),
        );
        let payload = accepted(response, "Login failed")?;
        let user_json = &payload["user"];
        let id = text(user_json, "id")?;
        let user = User {
            id: id.strip_prefix("auth0|").unwrap_or(&id).to_string(),
            name: text(user_json, "name").unwrap_or_default(),
            email: text(user_json, "email")?,
            plan,
            is_authenticated: true,
        };
        Self::store_session(storage, &user, &payload)?;
        Ok(user)
    }

    pub fn register(
        storage: &dyn KeyValueStore,
        gateway: &AuthGateway,
        email: &str,
        password: &str,
        name: &str,
        plan: Plan,
    ) -> ServiceResult<User> {
        let response = gateway.forward(
            ProxyRoute::Register,
            &json!({ "email": email, "password": password, "name": name }),
        );
        let payload = accepted(response, "Registration failed")?;
        let user_json = &payload["user"];
        let user = User {
            id: text(user_json, "auth0_id")?,
            name: text(user_json, "name").unwrap_or_default(),
            email: text(user_json, "email")?,
            plan,
            is_authenticated: true,
        };
        Self::store_session(storage, &user, &payload)?;
        Ok(user)
    }

    /// Clears the whole store, firm preferences included.
    pub fn logout(storage: &dyn KeyValueStore) -> ServiceResult<()> {
        storage.clear()?;
        tracing::info!("signed out; local data cleared");
        Ok(())
    }

    fn store_session(storage: &dyn KeyValueStore, user: &User, payload: &Value) -> ServiceResult<()> {
        storage.set(keys::USER, &serde_json::to_string(user).map_err(storage_err)?)?;
        storage.set(keys::USER_PLAN, user.plan.as_str())?;
        if let Some(token) = payload.get("accessToken").and_then(Value::as_str) {
            storage.set(keys::ACCESS_TOKEN, token)?;
        }
        tracing::info!(email = user.email.as_str(), "signed in");
        Ok(())
    }
}

fn accepted(response: ProxyResponse, fallback: &str) -> ServiceResult<Value> {
    if response.is_success() {
        Ok(response.body)
    } else {
        let message = response.message().unwrap_or(fallback).to_string();
        Err(ServiceError::Auth(message))
    }
}

fn text(value: &Value, field: &str) -> ServiceResult<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ServiceError::Auth(format!("Unexpected response: missing user {field}")))
}

fn storage_err(err: serde_json::Error) -> ServiceError {
    ServiceError::Storage(err.into())
}
