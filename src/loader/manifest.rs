//! TOML manifest discovery.
//!
//! One manifest file describes one handler class. The class identifier is
//! derived from the file's location: `admin/Users.toml` under namespace
//! `app` becomes `app.admin.Users`.
//!
//! ```toml
//! [group]
//! path = "api"
//! priority = 5
//!
//! [[methods]]
//! name = "index"
//! routes = [{ attribute = "get", path = "users", name = "users.index" }]
//!
//! [response]
//! status = 200
//! body = "ok"
//! headers = { "content-type" = "text/plain" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::ClassSource;
use crate::attribute::{Group, HandlerClass, HandlerMethod, RouteAttribute};
use crate::http::response::FixedResponse;

const MANIFEST_EXTENSION: &str = "toml";

/// Parsed manifest file.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub group: Option<GroupDef>,

    #[serde(default)]
    pub methods: Vec<MethodDef>,

    /// Canned response served for every route of this class.
    #[serde(default)]
    pub response: Option<ResponseDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupDef {
    pub path: String,
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MethodDef {
    pub name: String,
    #[serde(default)]
    pub routes: Vec<RouteDef>,
}

/// Which attribute shorthand a route entry uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Route,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Any,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteDef {
    pub attribute: AttributeKind,
    pub path: String,
    /// Only read for `attribute = "route"`.
    #[serde(default)]
    pub methods: Vec<String>,
    pub name: Option<String>,
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseDef {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_status() -> u16 {
    200
}

impl RouteDef {
    fn to_attribute(&self) -> Option<RouteAttribute> {
        let attribute = match self.attribute {
            AttributeKind::Route => {
                let mut methods = Vec::with_capacity(self.methods.len());
                for token in &self.methods {
                    methods.push(Method::from_bytes(token.to_ascii_uppercase().as_bytes()).ok()?);
                }
                RouteAttribute::route(&self.path, methods)
            }
            AttributeKind::Get => RouteAttribute::get(&self.path),
            AttributeKind::Post => RouteAttribute::post(&self.path),
            AttributeKind::Put => RouteAttribute::put(&self.path),
            AttributeKind::Patch => RouteAttribute::patch(&self.path),
            AttributeKind::Delete => RouteAttribute::delete(&self.path),
            AttributeKind::Any => RouteAttribute::any(&self.path),
        };

        Some(RouteAttribute {
            name: self.name.clone(),
            priority: self.priority,
            ..attribute
        })
    }
}

impl ResponseDef {
    /// Build the canned response; `None` if the status or a header is invalid.
    pub fn to_fixed_response(&self) -> Option<FixedResponse> {
        let status = StatusCode::from_u16(self.status).ok()?;
        let mut response = FixedResponse::new(status).with_body(self.body.clone());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
            let value = HeaderValue::from_str(value).ok()?;
            response = response.with_header(name, value);
        }
        Some(response)
    }
}

impl Manifest {
    /// Convert into the loader's class record. `None` if any route entry
    /// names an invalid method token.
    pub fn into_class(self, id: String) -> Option<HandlerClass> {
        let mut class = HandlerClass::new(id);
        if let Some(group) = self.group {
            class.groups.push(Group {
                path: group.path,
                priority: group.priority,
            });
        }
        for method in self.methods {
            let routes = method
                .routes
                .iter()
                .map(RouteDef::to_attribute)
                .collect::<Option<Vec<_>>>()?;
            class.methods.push(HandlerMethod {
                name: method.name,
                routes,
            });
        }
        Some(class)
    }
}

/// Class source backed by a directory of manifest files.
#[derive(Debug, Clone)]
pub struct ManifestSource {
    root: PathBuf,
    namespace: String,
}

impl ManifestSource {
    pub fn new(root: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        let namespace: String = namespace.into();
        Self {
            root: root.into(),
            namespace: namespace.trim_end_matches('.').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Class identifier for a manifest path under the root.
    pub fn class_id(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?.with_extension("");
        let mut parts: Vec<String> = Vec::new();
        if !self.namespace.is_empty() {
            parts.push(self.namespace.clone());
        }
        for component in relative.components() {
            parts.push(component.as_os_str().to_str()?.to_string());
        }
        Some(parts.join("."))
    }

    /// Read and parse one manifest file.
    pub fn read_manifest(&self, path: &Path) -> Option<Manifest> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Manifest unreadable");
                return None;
            }
        };
        match toml::from_str(&content) {
            Ok(manifest) => Some(manifest),
            Err(err) => {
                debug!(path = %path.display(), error = %err, "Manifest does not parse");
                None
            }
        }
    }

    /// Canned responses declared by manifests, keyed by class identifier.
    pub fn responders(&self) -> Vec<(String, FixedResponse)> {
        let mut responders = Vec::new();
        for candidate in self.candidates() {
            let path = Path::new(&candidate);
            let (Some(id), Some(manifest)) = (self.class_id(path), self.read_manifest(path)) else {
                continue;
            };
            let Some(def) = manifest.response else {
                continue;
            };
            match def.to_fixed_response() {
                Some(response) => responders.push((id, response)),
                None => warn!(class = %id, "Manifest response is invalid, class has no responder"),
            }
        }
        responders
    }
}

impl ClassSource for ManifestSource {
    fn candidates(&self) -> Vec<String> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry.path().extension().and_then(|ext| ext.to_str()) == Some(MANIFEST_EXTENSION)
            })
            .filter_map(|entry| entry.path().to_str().map(str::to_string))
            .collect()
    }

    fn load(&self, candidate: &str) -> Option<HandlerClass> {
        let path = Path::new(candidate);
        let id = self.class_id(path)?;
        let class = self.read_manifest(path)?.into_class(id);
        if class.is_none() {
            debug!(path = %candidate, "Manifest names an invalid method token");
        }
        class
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest: Manifest = toml::from_str(
            r#"
            [group]
            path = "api"
            priority = 5

            [[methods]]
            name = "index"
            routes = [
                { attribute = "get", path = "users", name = "users.index", priority = 1 },
                { attribute = "route", path = "users", methods = ["put", "PATCH"] },
            ]
            "#,
        )
        .unwrap();

        let class = manifest.into_class("app.Users".into()).unwrap();
        assert_eq!(class.effective_group(), Some(&Group::new("api").with_priority(5)));
        let routes = &class.methods[0].routes;
        assert_eq!(routes[0].name.as_deref(), Some("users.index"));
        assert_eq!(routes[0].priority, Some(1));
        assert_eq!(routes[1].methods, vec![Method::PUT, Method::PATCH]);
    }

    #[test]
    fn test_any_attribute() {
        let manifest: Manifest = toml::from_str(
            r#"
            [[methods]]
            name = "ping"
            routes = [{ attribute = "any", path = "/ping" }]
            "#,
        )
        .unwrap();
        let class = manifest.into_class("Ping".into()).unwrap();
        assert_eq!(class.methods[0].routes[0].methods.len(), 7);
    }

    #[test]
    fn test_class_id_from_path() {
        let source = ManifestSource::new("/srv/routes", "app.");
        assert_eq!(
            source.class_id(Path::new("/srv/routes/admin/Users.toml")),
            Some("app.admin.Users".to_string())
        );
        assert_eq!(source.class_id(Path::new("/elsewhere/Users.toml")), None);

        let bare = ManifestSource::new("/srv/routes", "");
        assert_eq!(
            bare.class_id(Path::new("/srv/routes/Users.toml")),
            Some("Users".to_string())
        );
    }

    #[test]
    fn test_response_def() {
        let def = ResponseDef {
            status: 201,
            body: "created".into(),
            headers: BTreeMap::from([("content-type".to_string(), "text/plain".to_string())]),
        };
        let response = def.to_fixed_response().unwrap().to_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["content-type"], "text/plain");

        let bad = ResponseDef {
            status: 42,
            body: String::new(),
            headers: BTreeMap::new(),
        };
        assert!(bad.to_fixed_response().is_none());
    }
}
