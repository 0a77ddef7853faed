//! Type-safe dependency edges for the module graph
//!
//! Registries describe edges as a `kind` tag plus a target name. This module
//! turns that loose shape into a closed enum so every consumer has to match on
//! all edge kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Separator between a module name and its sub-component suffix (`org.foo/2`)
pub const SUBCOMPONENT_SEPARATOR: char = '/';

/// Edge kinds a registry may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Hard reference to another module by name
    Module,
    /// Optional capability, satisfied opportunistically
    Needs,
    /// Mandatory capability
    Requires,
    /// Soft recommendation, never pulled in
    Recommends,
    /// Platform/runtime constraint
    #[strum(to_string = "java", serialize = "platform")]
    Java,
}

/// A single dependency edge declared by a module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDependency", into = "RawDependency")]
pub enum Dependency {
    ModuleRef(String),
    CapabilityNeed(String),
    CapabilityRequire(String),
    CapabilityRecommend(String),
    PlatformConstraint(String),
    /// Any edge kind the resolver does not understand, kept verbatim
    Unknown {
        kind: String,
        name: String,
        version: Option<String>,
    },
}

impl Dependency {
    /// Build an edge from a kind tag and a target name.
    ///
    /// Kind tags that do not parse become [`Dependency::Unknown`].
    pub fn from_parts(kind: &str, name: impl Into<String>) -> Self {
        let name = name.into();
        match kind.parse::<DependencyKind>() {
            Ok(DependencyKind::Module) => Self::ModuleRef(name),
            Ok(DependencyKind::Needs) => Self::CapabilityNeed(name),
            Ok(DependencyKind::Requires) => Self::CapabilityRequire(name),
            Ok(DependencyKind::Recommends) => Self::CapabilityRecommend(name),
            Ok(DependencyKind::Java) => Self::PlatformConstraint(name),
            Err(_) => Self::Unknown {
                kind: kind.to_string(),
                name,
                version: None,
            },
        }
    }

    /// Kind tag as written in a registry
    pub fn kind(&self) -> String {
        match self {
            Self::ModuleRef(_) => DependencyKind::Module.to_string(),
            Self::CapabilityNeed(_) => DependencyKind::Needs.to_string(),
            Self::CapabilityRequire(_) => DependencyKind::Requires.to_string(),
            Self::CapabilityRecommend(_) => DependencyKind::Recommends.to_string(),
            Self::PlatformConstraint(_) => DependencyKind::Java.to_string(),
            Self::Unknown { kind, .. } => kind.clone(),
        }
    }

    /// Target name (module or capability)
    pub fn name(&self) -> &str {
        match self {
            Self::ModuleRef(name)
            | Self::CapabilityNeed(name)
            | Self::CapabilityRequire(name)
            | Self::CapabilityRecommend(name)
            | Self::PlatformConstraint(name) => name,
            Self::Unknown { name, .. } => name,
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency[{}:{}", self.kind(), self.name())?;
        if let Self::Unknown {
            version: Some(version),
            ..
        } = self
        {
            write!(f, " {}", version)?;
        }
        write!(f, "]")
    }
}

/// Wire shape of an edge inside a registry file
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawDependency {
    kind: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl From<RawDependency> for Dependency {
    fn from(raw: RawDependency) -> Self {
        match Dependency::from_parts(&raw.kind, raw.name) {
            Dependency::Unknown { kind, name, .. } => Dependency::Unknown {
                kind,
                name,
                version: raw.version,
            },
            known => known,
        }
    }
}

impl From<Dependency> for RawDependency {
    fn from(dep: Dependency) -> Self {
        let kind = dep.kind();
        match dep {
            Dependency::Unknown { name, version, .. } => RawDependency {
                kind,
                name,
                version,
            },
            other => RawDependency {
                kind,
                name: other.name().to_string(),
                version: None,
            },
        }
    }
}

/// Strip a sub-component suffix: `org.foo/2` becomes `org.foo`.
pub fn module_base_name(name: &str) -> &str {
    match name.find(SUBCOMPONENT_SEPARATOR) {
        Some(idx) => &name[..idx],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_parses_aliases() {
        assert_eq!("java".parse::<DependencyKind>().unwrap(), DependencyKind::Java);
        assert_eq!(
            "platform".parse::<DependencyKind>().unwrap(),
            DependencyKind::Java
        );
        assert_eq!(DependencyKind::Java.to_string(), "java");
        assert!("package".parse::<DependencyKind>().is_err());
    }

    #[test]
    fn test_every_kind_maps_to_known_edge() {
        for kind in DependencyKind::iter() {
            let dep = Dependency::from_parts(&kind.to_string(), "x");
            assert!(!matches!(dep, Dependency::Unknown { .. }), "{kind} unmapped");
            assert_eq!(dep.kind(), kind.to_string());
        }
    }

    #[test]
    fn test_unknown_kind_kept_verbatim() {
        let dep: Dependency =
            serde_json::from_str(r#"{"kind":"package","name":"org.foo","version":"[1.0"}"#)
                .unwrap();
        assert_eq!(
            dep,
            Dependency::Unknown {
                kind: "package".to_string(),
                name: "org.foo".to_string(),
                version: Some("[1.0".to_string()),
            }
        );
        assert_eq!(dep.to_string(), "Dependency[package:org.foo [1.0]");
    }

    #[test]
    fn test_deserialize_known_edges() {
        let deps: Vec<Dependency> = serde_json::from_str(
            r#"[
                {"kind":"module","name":"org.a/2","version":"> 1.0"},
                {"kind":"needs","name":"cap.x"},
                {"kind":"requires","name":"cap.y"},
                {"kind":"recommends","name":"cap.z"},
                {"kind":"java","name":"Java"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            deps,
            vec![
                Dependency::ModuleRef("org.a/2".to_string()),
                Dependency::CapabilityNeed("cap.x".to_string()),
                Dependency::CapabilityRequire("cap.y".to_string()),
                Dependency::CapabilityRecommend("cap.z".to_string()),
                Dependency::PlatformConstraint("Java".to_string()),
            ]
        );
    }

    #[test]
    fn test_serialize_uses_kind_tags() {
        let json = serde_json::to_string(&Dependency::CapabilityNeed("cap".to_string())).unwrap();
        assert_eq!(json, r#"{"kind":"needs","name":"cap"}"#);
    }

    #[test]
    fn test_module_base_name() {
        assert_eq!(module_base_name("org.foo/2"), "org.foo");
        assert_eq!(module_base_name("org.foo"), "org.foo");
        assert_eq!(module_base_name("org.foo/1/2"), "org.foo");
        assert_eq!(module_base_name("/x"), "");
    }
}
