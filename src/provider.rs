use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A plugin-provided searchable source together with the profile instances it
/// is available in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableScope {
    pub plugin_id: String,
    pub label: String,
    #[serde(default)]
    pub instances: Vec<ScopeInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeInstance {
    pub id: String,
    pub label: String,
}

/// One search hit as returned by the backend. Immutable once received; the
/// engine only reorders and groups, never mutates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchApiResult {
    pub plugin_id: String,
    pub instance_id: String,
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub launch: LaunchSpec,
}

/// How a result is opened: the panel type to spawn and the payload handed to
/// it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSpec {
    pub panel_type: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchApiResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing_ms: Option<u64>,
}

/// The data source behind the palette. Both operations may fail; failures are
/// logged and surfaced as a status message, never propagated into input
/// handling.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn fetch_scopes(&self) -> anyhow::Result<Vec<SearchableScope>>;
    async fn fetch_results(&self, request: SearchRequest) -> anyhow::Result<SearchResponse>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchAction {
    /// Default open, in a modal panel.
    Modal,
    /// Open as a workspace panel.
    Workspace,
    /// Pin the result without opening it.
    Pin,
    /// Replace the currently selected panel.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// Launch succeeded, the palette should close.
    Close,
    /// Keep the palette open (e.g. validation failed on the host side).
    KeepOpen,
}

/// Host-side collaborator: panel selection, launching and status display.
/// The icon and viewport hooks are presentation hints only.
pub trait PaletteHost: Send + Sync {
    fn selected_panel_id(&self) -> Option<String>;
    fn launch(&self, result: &SearchApiResult, action: LaunchAction) -> LaunchOutcome;
    fn status(&self, message: &str);

    fn resolve_icon(&self, _result: &SearchApiResult) -> Option<String> {
        None
    }

    fn is_mobile_viewport(&self) -> bool {
        false
    }
}
