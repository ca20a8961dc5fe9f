//! Go module proxy protocol types.
//!
//! Path classification for the GOPROXY read endpoints and the case-escaping
//! used in request paths (uppercase letters travel as `!` + lowercase,
//! e.g. `github.com/!azure/go-sdk` for `github.com/Azure/go-sdk`).

pub mod archive;
pub mod version_list;

use serde::{Deserialize, Serialize};

/// Parsed GOPROXY request.
///
/// `version` is the full version file stem as it appears in the path,
/// `v` prefix included (`v1.2.3`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoProxyRequest {
    /// `/@v/list` — list all versions
    List { module: String },
    /// `/@v/{version}.info` — version metadata JSON
    Info { module: String, version: String },
    /// `/@v/{version}.mod` — go.mod file
    Mod { module: String, version: String },
    /// `/@v/{version}.zip` — module zip
    Zip { module: String, version: String },
    /// `/@latest` — latest version info
    Latest { module: String },
}

impl GoProxyRequest {
    /// Classify a request path.
    ///
    /// Rules are tried in a fixed order, first match wins; anything left
    /// over is `None` and falls through to the router's 404. Version file
    /// stems must carry the `v` prefix, mirroring the published key layout.
    pub fn parse(raw_path: &str) -> Option<Self> {
        let path = raw_path.strip_prefix('/').unwrap_or(raw_path);

        if let Some(module_encoded) = path.strip_suffix("/@latest") {
            if module_encoded.is_empty() {
                return None;
            }
            return Some(GoProxyRequest::Latest {
                module: decode_module_path(module_encoded),
            });
        }

        let av_pos = path.find("/@v/")?;
        let module_encoded = &path[..av_pos];
        let operation = &path[av_pos + 4..];
        if module_encoded.is_empty() {
            return None;
        }
        let module = decode_module_path(module_encoded);

        if operation == "list" {
            return Some(GoProxyRequest::List { module });
        }

        if let Some(version) = operation.strip_suffix(".info") {
            if !version.starts_with('v') {
                return None;
            }
            return Some(GoProxyRequest::Info {
                module,
                version: version.to_string(),
            });
        }

        if let Some(version) = operation.strip_suffix(".mod") {
            if !version.starts_with('v') {
                return None;
            }
            return Some(GoProxyRequest::Mod {
                module,
                version: version.to_string(),
            });
        }

        if let Some(version) = operation.strip_suffix(".zip") {
            if !version.starts_with('v') {
                return None;
            }
            return Some(GoProxyRequest::Zip {
                module,
                version: version.to_string(),
            });
        }

        None
    }
}

/// Decode a GOPROXY-encoded module path.
/// Capital letters are encoded as `!` followed by the lowercase letter.
pub fn decode_module_path(encoded: &str) -> String {
    let mut result = String::with_capacity(encoded.len());
    let mut chars = encoded.chars();
    while let Some(c) = chars.next() {
        if c == '!' {
            if let Some(next) = chars.next() {
                result.push(next.to_ascii_uppercase());
            }
        } else {
            result.push(c);
        }
    }
    result
}

/// Encode a module path for GOPROXY.
/// Capital letters become `!` + lowercase.
pub fn encode_module_path(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            result.push('!');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Version info response body (`/@v/<version>.info`, `/@latest`)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionInfo {
    pub version: String,
    pub time: String,
}
