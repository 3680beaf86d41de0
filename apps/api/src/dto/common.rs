use serde::{Deserialize, Deserializer, Serialize};
use tenantdesk_core::UserIdentity;
use tenantdesk_domain::{Actor, EffectiveScope};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Development session bootstrap payload.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bootstrap-request.ts"
)]
pub struct BootstrapRequest {
    pub token: String,
    pub user_id: i64,
}

/// Identity context of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/actor-context-response.ts"
)]
pub struct ActorContextResponse {
    pub user_id: i64,
    pub display_name: String,
    pub email: Option<String>,
    pub role: String,
    pub organization_id: Option<i64>,
    pub organization_type: Option<String>,
    pub department_id: Option<i64>,
    pub is_super_user: bool,
    pub can_cross_organizations: bool,
    pub can_cross_departments: bool,
    /// Effective scope kind: `global`, `cross_departments`, `department`,
    /// `organization` or `none`.
    pub effective_scope: String,
    pub permissions: Vec<String>,
}

impl ActorContextResponse {
    /// Builds the response from the session identity and the loaded actor.
    #[must_use]
    pub fn from_actor(identity: &UserIdentity, actor: &Actor) -> Self {
        Self {
            user_id: actor.id().as_i64(),
            display_name: actor.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            role: actor.role().as_str().to_owned(),
            organization_id: actor.organization_id().map(|value| value.as_i64()),
            organization_type: actor
                .organization_type()
                .map(|value| value.as_str().to_owned()),
            department_id: actor.department_id().map(|value| value.as_i64()),
            is_super_user: actor.is_super_user(),
            can_cross_organizations: actor.can_cross_organizations(),
            can_cross_departments: actor.can_cross_departments(),
            effective_scope: scope_kind(actor.scope()).to_owned(),
            permissions: actor
                .permissions()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

fn scope_kind(scope: EffectiveScope) -> &'static str {
    match scope {
        EffectiveScope::Global => "global",
        EffectiveScope::CrossDepartments { .. } => "cross_departments",
        EffectiveScope::Department { .. } => "department",
        EffectiveScope::Organization(_) => "organization",
        EffectiveScope::None => "none",
    }
}

/// Distinguishes an absent field from an explicit `null`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
