use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{entities::request::ProvisionRequest, error::DomainError};

/// Dependency added when API docs monitoring is enabled.
pub const DOCS_CLI_DEPENDENCY: (&str, &str) = ("@useoptic/cli", "latest");

/// The generated `package.json`.
///
/// Derived once from a [`ProvisionRequest`]. Maps are `BTreeMap`s and the
/// struct field order is fixed, so serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSpec {
    pub name: String,
    pub private: bool,
    pub version: String,
    pub description: String,
    pub scripts: BTreeMap<String, String>,
    pub dev_dependencies: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, String>,
    pub author: Author,
    pub strapi: StrapiMetadata,
    pub engines: Engines,
    pub license: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrapiMetadata {
    pub uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engines {
    pub node: String,
    pub npm: String,
}

impl ManifestSpec {
    pub fn from_request(request: &ProvisionRequest) -> Self {
        Self {
            name: request.package_name(),
            private: true,
            version: "0.1.0".into(),
            description: "A Strapi application".into(),
            scripts: scripts(request.docs()),
            dev_dependencies: BTreeMap::new(),
            dependencies: merge_dependencies(
                request.pinned_dependencies(),
                request.pinned_version(),
                request.additional_dependencies(),
                request.docs(),
            ),
            author: Author {
                name: "A Strapi developer".into(),
            },
            strapi: StrapiMetadata {
                uuid: request.uuid(),
            },
            engines: Engines {
                node: ">=10.0.0".into(),
                npm: ">=6.0.0".into(),
            },
            license: "MIT".into(),
        }
    }

    /// Serialize with 2-space indentation and a trailing newline.
    pub fn to_json(&self) -> Result<String, DomainError> {
        let mut json =
            serde_json::to_string_pretty(self).map_err(|e| DomainError::RenderFailed {
                artifact: "package manifest",
                reason: e.to_string(),
            })?;
        json.push('\n');
        Ok(json)
    }
}

/// Build and serialize the manifest for a request.
pub fn render_manifest(request: &ProvisionRequest) -> Result<String, DomainError> {
    ManifestSpec::from_request(request).to_json()
}

fn scripts(docs: bool) -> BTreeMap<String, String> {
    let mut scripts = BTreeMap::from([
        ("develop".to_string(), "strapi develop".to_string()),
        ("start".to_string(), "strapi start".to_string()),
        ("build".to_string(), "strapi build".to_string()),
        ("strapi".to_string(), "strapi".to_string()),
    ]);
    if docs {
        scripts.insert("monitor".into(), "api start".into());
        scripts.insert("spec".into(), "api spec".into());
    }
    scripts
}

/// Pinned names all get `version`; additional pairs are applied afterwards
/// and win on collision.
fn merge_dependencies(
    pinned: &[String],
    version: &str,
    additional: &BTreeMap<String, String>,
    docs: bool,
) -> BTreeMap<String, String> {
    let mut deps: BTreeMap<String, String> = pinned
        .iter()
        .map(|name| (name.clone(), version.to_string()))
        .collect();

    deps.extend(additional.iter().map(|(k, v)| (k.clone(), v.clone())));

    if docs {
        let (name, version) = DOCS_CLI_DEPENDENCY;
        deps.insert(name.into(), version.into());
    }

    deps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(docs: bool) -> ProvisionRequest {
        ProvisionRequest::builder()
            .root_path("/tmp/my-app")
            .name("My App")
            .uuid(Uuid::nil())
            .pinned_version("3.6.8")
            .pinned_dependencies(["strapi", "strapi-admin"])
            .docs(docs)
            .build()
            .unwrap()
    }

    #[test]
    fn additional_dependency_wins_on_collision() {
        let pinned = vec!["a".to_string()];
        let additional = BTreeMap::from([("a".to_string(), "2.0.0".to_string())]);

        let deps = merge_dependencies(&pinned, "1.0.0", &additional, false);

        assert_eq!(deps, BTreeMap::from([("a".to_string(), "2.0.0".to_string())]));
    }

    #[test]
    fn disjoint_dependencies_are_unioned() {
        let pinned = vec!["a".to_string(), "b".to_string()];
        let additional = BTreeMap::from([("c".to_string(), "^3.0.0".to_string())]);

        let deps = merge_dependencies(&pinned, "1.0.0", &additional, false);

        assert_eq!(deps.len(), 3);
        assert_eq!(deps["a"], "1.0.0");
        assert_eq!(deps["b"], "1.0.0");
        assert_eq!(deps["c"], "^3.0.0");
    }

    #[test]
    fn scripts_without_docs() {
        let keys: Vec<_> = scripts(false).into_keys().collect();
        assert_eq!(keys, vec!["build", "develop", "start", "strapi"]);
    }

    #[test]
    fn scripts_with_docs() {
        let s = scripts(true);
        assert_eq!(s.len(), 6);
        assert_eq!(s["monitor"], "api start");
        assert_eq!(s["spec"], "api spec");
    }

    #[test]
    fn docs_adds_optic_cli() {
        let manifest = ManifestSpec::from_request(&request(true));
        assert_eq!(manifest.dependencies["@useoptic/cli"], "latest");

        let manifest = ManifestSpec::from_request(&request(false));
        assert!(!manifest.dependencies.contains_key("@useoptic/cli"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let request = request(true);
        assert_eq!(
            render_manifest(&request).unwrap(),
            render_manifest(&request).unwrap()
        );
    }

    #[test]
    fn json_uses_two_space_indent_and_expected_fields() {
        let json = render_manifest(&request(false)).unwrap();

        assert!(json.starts_with("{\n  \"name\": \"my-app\",\n"));
        assert!(json.ends_with("}\n"));
        assert!(json.contains("\"devDependencies\": {}"));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["strapi"]["uuid"], Uuid::nil().to_string());
        assert_eq!(value["engines"]["node"], ">=10.0.0");
        assert_eq!(value["license"], "MIT");
        assert_eq!(value["dependencies"]["strapi-admin"], "3.6.8");
    }
}
