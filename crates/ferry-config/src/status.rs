use serde::Deserialize;

/// Status middleware configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusConfig {
    /// Layer wrapping request handlers
    #[serde(default)]
    pub server: RoleConfig,
    /// Layer wrapping outgoing calls
    #[serde(default)]
    pub client: RoleConfig,
}

/// Settings for one side of a call
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleConfig {
    /// Error handler; the role's default applies when unset
    #[serde(default)]
    pub handler: Option<HandlerKind>,
}

/// Built-in error handlers selectable from the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    /// Encode errors into wire statuses
    Encode,
    /// Decode wire statuses into structured errors
    Decode,
    /// Leave errors untouched
    Passthrough,
}
