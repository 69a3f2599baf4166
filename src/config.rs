use std::fmt;

use serde::{Deserialize, Serialize};

/// How the demo schema is constructed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchemaStyle {
    /// Type-language text plus a resolver map
    #[default]
    Sdl,
    /// Type descriptors built in code
    Programmatic,
}

impl fmt::Display for SchemaStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaStyle::Sdl => write!(f, "sdl"),
            SchemaStyle::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// Server configuration, fixed once the server starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Path the GraphQL endpoint is mounted on
    pub route: String,

    pub schema_style: SchemaStyle,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, route: &str, schema_style: SchemaStyle) -> Self {
        // Tolerate "graphqlAPI" and "/graphqlAPI/"
        let trimmed = route.trim().trim_end_matches('/');
        let route = if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{}", trimmed)
        };

        Self {
            host: host.into(),
            port,
            route,
            schema_style,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", 80, "/graphqlAPI", SchemaStyle::default())
    }
}
