//! OIDC (OpenID Connect) configuration.
//!
//! Configuration types for connecting to an external OIDC identity provider
//! for user authentication.

use serde::{Deserialize, Serialize};

/// Configuration for the OIDC identity provider.
///
/// Used to connect to an external OIDC provider (e.g., Keycloak, Auth0,
/// Authentik) for user authentication.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcConfig {
    /// The OIDC issuer URL (e.g., "https://auth.example.com/realms/main").
    /// Used for OIDC discovery.
    issuer_url: String,
    /// The OAuth2 client ID registered with the provider.
    client_id: String,
    /// The OAuth2 client secret.
    client_secret: String,
    /// The redirect URI for the OAuth2 callback (e.g., "https://app.example.com/auth/callback").
    redirect_uri: String,
    /// OAuth2 scopes to request as a comma-separated string.
    /// Default: "openid,email,profile"
    #[serde(default = "default_scopes")]
    scopes: String,
    /// The claim name in the ID token that contains user groups.
    /// Default: "groups"
    #[serde(default = "default_groups_claim")]
    groups_claim: String,
    /// The group name that grants the admin global role.
    /// Default: "waypost-admins"
    #[serde(default = "default_admin_group")]
    admin_group: String,
}

fn default_scopes() -> String {
    "openid,email,profile".to_string()
}

fn default_groups_claim() -> String {
    "groups".to_string()
}

fn default_admin_group() -> String {
    "waypost-admins".to_string()
}

impl OidcConfig {
    /// Creates a new OIDC configuration with defaults for optional fields.
    #[must_use]
    pub fn new(
        issuer_url: String,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        Self {
            issuer_url,
            client_id,
            client_secret,
            redirect_uri,
            scopes: default_scopes(),
            groups_claim: default_groups_claim(),
            admin_group: default_admin_group(),
        }
    }

    /// Returns the OIDC issuer URL.
    #[must_use]
    pub fn issuer_url(&self) -> &str {
        &self.issuer_url
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the OAuth2 redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the OAuth2 scopes to request, parsed from comma-separated string.
    #[must_use]
    pub fn scopes(&self) -> Vec<&str> {
        self.scopes.split(',').map(str::trim).collect()
    }

    /// Returns the name of the claim containing user groups.
    #[must_use]
    pub fn groups_claim(&self) -> &str {
        &self.groups_claim
    }

    /// Returns the group name for the admin global role.
    #[must_use]
    pub fn admin_group(&self) -> &str {
        &self.admin_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_has_defaults() {
        let config = OidcConfig::new(
            "https://auth.example.com".to_string(),
            "client-id".to_string(),
            "client-secret".to_string(),
            "https://app.example.com/auth/callback".to_string(),
        );

        assert_eq!(config.issuer_url(), "https://auth.example.com");
        assert_eq!(config.client_id(), "client-id");
        assert!(config.scopes().contains(&"openid"));
        assert!(config.scopes().contains(&"email"));
        assert!(config.scopes().contains(&"profile"));
        assert_eq!(config.groups_claim(), "groups");
        assert_eq!(config.admin_group(), "waypost-admins");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let json = r#"{
            "issuer_url": "https://auth.example.com",
            "client_id": "my-client",
            "client_secret": "secret",
            "redirect_uri": "https://app.example.com/callback"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(config.issuer_url(), "https://auth.example.com");
        assert_eq!(config.scopes(), vec!["openid", "email", "profile"]);
        assert_eq!(config.admin_group(), "waypost-admins");
    }

    #[test]
    fn scopes_parses_comma_separated() {
        let json = r#"{
            "issuer_url": "https://auth.example.com",
            "client_id": "my-client",
            "client_secret": "secret",
            "redirect_uri": "https://app.example.com/callback",
            "scopes": "openid, email, profile, groups"
        }"#;

        let config: OidcConfig = serde_json::from_str(json).expect("deserialize");

        assert_eq!(
            config.scopes(),
            vec!["openid", "email", "profile", "groups"]
        );
    }
}
