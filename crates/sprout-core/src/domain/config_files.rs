//! Renderers for the generated configuration files.
//!
//! Pure functions of their inputs; no I/O.

use serde_json::{Map, Value, json};

use crate::domain::{
    entities::request::ConnectionParams, error::DomainError, value_objects::DatabaseClient,
};

/// Render `config/database.js` for the given client and connection.
///
/// The connection parameters are merged into `settings` after `client`, so
/// a `client` key in the parameters cannot override the selected client.
pub fn render_database_config(
    client: DatabaseClient,
    connection: &ConnectionParams,
) -> Result<String, DomainError> {
    let mut settings = Map::new();
    settings.extend(connection.iter().map(|(k, v)| (k.clone(), v.clone())));
    settings.insert("client".into(), Value::from(client.as_str()));

    let options = if client.is_file_based() {
        json!({ "useNullAsDefault": true })
    } else {
        json!({})
    };

    let config = json!({
        "defaultConnection": "default",
        "connections": {
            "default": {
                "connector": client.connector(),
                "settings": settings,
                "options": options,
            }
        }
    });

    let body = serde_json::to_string_pretty(&config).map_err(|e| DomainError::RenderFailed {
        artifact: "database config",
        reason: e.to_string(),
    })?;

    Ok(format!("module.exports = ({{ env }}) => ({body});\n"))
}

/// Render the Optic API-monitoring config (`optic.yml`).
///
/// `project_name` is expected to be kebab-cased already.
pub fn render_docs_config(project_name: &str) -> String {
    format!(
        "name: {project_name}
tasks:
  # The default task, invoke using `api run start`
  # Learn how to finish setting up Optic at http://docs.useoptic.com/setup
  start:
    command: export PORT=$OPTIC_API_PORT && npm run develop
    baseUrl: http://localhost:1337
ignoreRequests:
- OPTIONS *
-  /admin(.*)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::naming::to_kebab_case;

    #[test]
    fn docs_config_uses_kebab_name() {
        let rendered = render_docs_config(&to_kebab_case("My App"));
        assert_eq!(rendered.lines().next(), Some("name: my-app"));
    }

    #[test]
    fn docs_config_has_fixed_task_and_ignores() {
        let rendered = render_docs_config("blog");
        assert!(rendered.contains("command: export PORT=$OPTIC_API_PORT && npm run develop"));
        assert!(rendered.contains("baseUrl: http://localhost:1337"));
        assert!(rendered.contains("- OPTIONS *"));
        assert!(rendered.contains("/admin(.*)"));
    }

    #[test]
    fn sqlite_config_sets_null_default() {
        let mut conn = ConnectionParams::new();
        conn.insert("filename".into(), Value::from(".tmp/data.db"));

        let rendered = render_database_config(DatabaseClient::Sqlite, &conn).unwrap();

        assert!(rendered.starts_with("module.exports = ({ env }) => ({\n"));
        assert!(rendered.ends_with("});\n"));
        assert!(rendered.contains("\"connector\": \"bookshelf\""));
        assert!(rendered.contains("\"filename\": \".tmp/data.db\""));
        assert!(rendered.contains("\"useNullAsDefault\": true"));
    }

    #[test]
    fn selected_client_wins_over_parameter() {
        let mut conn = ConnectionParams::new();
        conn.insert("client".into(), Value::from("mysql"));
        conn.insert("host".into(), Value::from("db.local"));

        let rendered = render_database_config(DatabaseClient::Mongo, &conn).unwrap();

        assert!(rendered.contains("\"client\": \"mongo\""));
        assert!(rendered.contains("\"connector\": \"mongoose\""));
        assert!(!rendered.contains("useNullAsDefault"));
    }

    #[test]
    fn database_config_is_deterministic() {
        let mut conn = ConnectionParams::new();
        conn.insert("port".into(), Value::from(5432));
        conn.insert("host".into(), Value::from("localhost"));

        let a = render_database_config(DatabaseClient::Postgres, &conn).unwrap();
        let b = render_database_config(DatabaseClient::Postgres, &conn).unwrap();
        assert_eq!(a, b);
    }
}
