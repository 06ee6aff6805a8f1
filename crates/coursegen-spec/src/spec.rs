//! Render specification trees.

use std::path::Path;

use crate::error::SpecError;
use crate::value::{PropValue, Props};

/// Output base name used when a specification omits `filename`.
const DEFAULT_FILENAME: &str = "output";

/// One typed node in a component tree.
///
/// A `ComponentSpec` is pure, backend-independent data: built once from a
/// source document, consumed once during a render pass, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentSpec {
    /// Type tag resolved against the selected backend's component registry.
    pub type_tag: String,
    /// Component-specific configuration.
    pub props: Props,
    /// Nested components, rendered before this node.
    pub children: Vec<ComponentSpec>,
}

impl ComponentSpec {
    /// Build a leaf component spec.
    #[must_use]
    pub fn new(type_tag: &str, props: Props) -> Self {
        Self {
            type_tag: type_tag.to_owned(),
            props,
            children: Vec::new(),
        }
    }

    /// Attach children to a component spec.
    #[must_use]
    pub fn with_children(mut self, children: Vec<ComponentSpec>) -> Self {
        self.children = children;
        self
    }

    /// Build a component spec from a raw value.
    ///
    /// `index` is the node's position within its sibling list, used for
    /// error reporting. Recurses into `children`; any malformed descendant
    /// fails the whole construction.
    pub fn from_value(value: &PropValue, index: usize) -> Result<Self, SpecError> {
        let PropValue::Map(map) = value else {
            return Err(SpecError::ComponentNotAMap {
                index,
                kind: value.kind(),
            });
        };

        let type_tag = match map.get("type") {
            Some(PropValue::String(tag)) if !tag.is_empty() => tag.clone(),
            _ => return Err(SpecError::MissingComponentType(index)),
        };

        let props = match map.get("props") {
            None | Some(PropValue::Null) => Props::new(),
            Some(PropValue::Map(props)) => props
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            Some(other) => {
                return Err(SpecError::PropsNotAMap {
                    tag: type_tag,
                    kind: other.kind(),
                });
            }
        };

        let children = match map.get("children") {
            None | Some(PropValue::Null) => Vec::new(),
            Some(PropValue::List(raw)) => raw
                .iter()
                .enumerate()
                .map(|(child_index, child)| Self::from_value(child, child_index))
                .collect::<Result<_, _>>()?,
            Some(other) => {
                return Err(SpecError::ChildrenNotAList {
                    tag: type_tag,
                    kind: other.kind(),
                });
            }
        };

        Ok(Self {
            type_tag,
            props,
            children,
        })
    }
}

/// Top-level specification document.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSpec {
    /// Name of the backend that renders this document.
    pub engine: String,
    /// Output base name, without extension.
    pub filename: String,
    /// Document-wide settings (title, size, theme, ...).
    pub config: Props,
    /// Document body, in render order. May be empty.
    pub components: Vec<ComponentSpec>,
}

impl RenderSpec {
    /// Build a minimal spec for a given engine.
    #[must_use]
    pub fn new(engine: &str, filename: &str) -> Self {
        Self {
            engine: engine.to_owned(),
            filename: filename.to_owned(),
            config: Props::new(),
            components: Vec::new(),
        }
    }

    /// Replace the document-wide configuration.
    #[must_use]
    pub fn with_config(mut self, config: Props) -> Self {
        self.config = config;
        self
    }

    /// Replace the component list.
    #[must_use]
    pub fn with_components(mut self, components: Vec<ComponentSpec>) -> Self {
        self.components = components;
        self
    }

    /// Build and shape-validate a spec from a raw document value.
    ///
    /// Enforced up front, before any backend exists: `engine` present and a
    /// non-empty string; `components` present and a list (possibly empty).
    /// Component type tags are resolved later, at render time, against the
    /// selected backend's registry.
    pub fn from_value(value: &PropValue) -> Result<Self, SpecError> {
        let PropValue::Map(map) = value else {
            return Err(SpecError::NotAMap(value.kind()));
        };

        let engine = match map.get("engine") {
            None | Some(PropValue::Null) => return Err(SpecError::MissingEngine),
            Some(PropValue::String(name)) if !name.is_empty() => name.clone(),
            Some(PropValue::String(_)) => return Err(SpecError::MissingEngine),
            Some(other) => return Err(SpecError::EngineNotAString(other.kind())),
        };

        let filename = match map.get("filename") {
            None | Some(PropValue::Null) => DEFAULT_FILENAME.to_owned(),
            Some(PropValue::String(name)) => name.clone(),
            Some(other) => return Err(SpecError::FilenameNotAString(other.kind())),
        };

        let config = match map.get("config") {
            None | Some(PropValue::Null) => Props::new(),
            Some(PropValue::Map(config)) => config
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            Some(other) => return Err(SpecError::ConfigNotAMap(other.kind())),
        };

        let components = match map.get("components") {
            None | Some(PropValue::Null) => return Err(SpecError::MissingComponents),
            Some(PropValue::List(raw)) => raw
                .iter()
                .enumerate()
                .map(|(index, component)| ComponentSpec::from_value(component, index))
                .collect::<Result<_, _>>()?,
            Some(other) => return Err(SpecError::ComponentsNotAList(other.kind())),
        };

        Ok(Self {
            engine,
            filename,
            config,
            components,
        })
    }

    /// Parse a YAML source document.
    pub fn from_yaml_str(source: &str) -> Result<Self, SpecError> {
        let value: PropValue = serde_yaml::from_str(source)?;
        Self::from_value(&value)
    }

    /// Parse a JSON source document.
    pub fn from_json_str(source: &str) -> Result<Self, SpecError> {
        let value: PropValue = serde_json::from_str(source)?;
        Self::from_value(&value)
    }

    /// Parse a source file, dispatching on its extension.
    ///
    /// `.yaml`/`.yml` parse as YAML, `.json` as JSON; anything else is
    /// [`SpecError::UnsupportedFormat`].
    pub fn from_file(path: &Path) -> Result<Self, SpecError> {
        let source = std::fs::read_to_string(path).map_err(|source| SpecError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&source),
            Some("json") => Self::from_json_str(&source),
            _ => Err(SpecError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}
