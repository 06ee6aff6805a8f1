//! The component capability contract.

use coursegen_spec::{PropError, Props, PropValue};

/// Error raised while validating or rendering a single component.
///
/// Component-level errors never abort a document; the dispatcher catches
/// them, logs them with the component's tag, and continues with the
/// remaining siblings.
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    /// One or more required properties are absent.
    #[error("missing required properties: {}", missing.join(", "))]
    MissingProps {
        /// Every absent required property name.
        missing: Vec<String>,
    },
    /// A property is present but has the wrong shape.
    #[error(transparent)]
    Prop(#[from] PropError),
    /// The type tag is not registered on the selected backend.
    #[error("unsupported component type `{0}`")]
    UnknownComponent(String),
    /// Any other failure raised during `render`.
    #[error("{0}")]
    Render(String),
}

impl ComponentError {
    /// Build a render-failure error from a displayable cause.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}

/// One unit of rendering logic, parameterized over the backend's canvas.
///
/// A component declares its type tag, its required property names, and
/// defaults for optional properties. `render` receives the normalized
/// property map and may mutate the canvas (draw a shape, accumulate a
/// trace); it must never mutate the originating spec tree.
///
/// When the spec node has children, the dispatcher renders them first and
/// injects the resulting fragments under the reserved
/// [`CHILDREN_PROP`](crate::CHILDREN_PROP) key, so composite components lay
/// out already-rendered child results.
///
/// The returned [`PropValue`] is the component's fragment. What a fragment
/// means is backend-specific: a markdown string, a trace map, or
/// [`PropValue::Null`] for components that only draw on the canvas.
pub trait Component<C> {
    /// Type tag this component handles.
    fn tag(&self) -> &'static str;

    /// Property names that must be present.
    fn required_props(&self) -> &'static [&'static str] {
        &[]
    }

    /// Defaults filled in for absent optional properties.
    fn default_props(&self) -> Props {
        Props::new()
    }

    /// Render with normalized props, mutating the canvas as needed.
    fn render(&self, props: &Props, canvas: &mut C) -> Result<PropValue, ComponentError>;
}

/// Check required props and fill defaults, returning the merged map.
///
/// Side-effect-free. Fails with [`ComponentError::MissingProps`] naming
/// every absent required key at once.
pub fn validate_props<C>(
    component: &dyn Component<C>,
    props: &Props,
) -> Result<Props, ComponentError> {
    let missing: Vec<String> = component
        .required_props()
        .iter()
        .filter(|name| !props.contains(name))
        .map(|name| (*name).to_owned())
        .collect();

    if !missing.is_empty() {
        return Err(ComponentError::MissingProps { missing });
    }

    Ok(Props::merged(&component.default_props(), props))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Probe;

    impl Component<()> for Probe {
        fn tag(&self) -> &'static str {
            "Probe"
        }

        fn required_props(&self) -> &'static [&'static str] {
            &["content", "level"]
        }

        fn default_props(&self) -> Props {
            Props::new().with("level", 2i64).with("anchor", "start")
        }

        fn render(&self, _props: &Props, _canvas: &mut ()) -> Result<PropValue, ComponentError> {
            Ok(PropValue::Null)
        }
    }

    #[test]
    fn test_validate_reports_all_missing() {
        let err = validate_props(&Probe, &Props::new()).unwrap_err();
        let ComponentError::MissingProps { missing } = err else {
            panic!("expected MissingProps");
        };
        assert_eq!(missing, vec!["content".to_owned(), "level".to_owned()]);
    }

    #[test]
    fn test_validate_fills_defaults() {
        let props = Props::new().with("content", "hi").with("level", 1i64);
        let normalized = validate_props(&Probe, &props).unwrap();

        assert_eq!(normalized.str_prop("anchor").unwrap(), "start");
        // Caller value wins over the default.
        assert_eq!(normalized.i64_prop("level").unwrap(), 1);
    }

    #[test]
    fn test_validate_is_pure() {
        let props = Props::new().with("content", "hi").with("level", 1i64);
        let _ = validate_props(&Probe, &props).unwrap();
        assert_eq!(props.len(), 2);
    }
}
