//! Backend-local component registries and tree dispatch.

use std::collections::BTreeMap;

use coursegen_spec::{ComponentSpec, PropValue};

use crate::component::{Component, ComponentError, validate_props};

/// Reserved property key under which rendered child fragments are injected.
pub const CHILDREN_PROP: &str = "children";

/// Outcome of dispatching one top-level component.
#[derive(Debug)]
pub struct ComponentOutcome {
    /// The component's type tag.
    pub tag: String,
    /// Its fragment, or the error that caused it to be omitted.
    pub result: Result<PropValue, ComponentError>,
}

/// Result of one dispatch pass over a component list.
#[derive(Debug, Default)]
pub struct RenderPass {
    /// Fragments of the components that rendered, in document order.
    pub fragments: Vec<PropValue>,
    /// Ordered `(tag, result)` pairs for every top-level component.
    pub outcomes: Vec<ComponentOutcome>,
    /// Human-readable descriptions of every isolated failure.
    pub warnings: Vec<String>,
}

impl RenderPass {
    /// Whether every component rendered.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Map from component type tag to implementation, local to one backend.
///
/// The same tag (say `"Shape"`) may be registered with entirely different
/// implementations on different backends; nothing is shared across engines.
pub struct ComponentRegistry<C> {
    components: BTreeMap<String, Box<dyn Component<C>>>,
}

impl<C> Default for ComponentRegistry<C> {
    fn default() -> Self {
        Self {
            components: BTreeMap::new(),
        }
    }
}

impl<C> ComponentRegistry<C> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under its declared tag, replacing any previous
    /// implementation of that tag.
    pub fn register(&mut self, component: impl Component<C> + 'static) {
        let tag = component.tag().to_owned();
        if self
            .components
            .insert(tag.clone(), Box::new(component))
            .is_some()
        {
            tracing::debug!(tag = %tag, "replacing registered component");
        }
    }

    /// Registered tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        self.components.keys().cloned().collect()
    }

    /// Whether `tag` is registered.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.components.contains_key(tag)
    }

    /// Dispatch a component list depth-first, in document order.
    ///
    /// For each node: children render first (same rule, recursively), then
    /// the node's props are validated and `render` is called with child
    /// fragments injected under [`CHILDREN_PROP`].
    ///
    /// Per-component failure isolation: a failing node — unknown tag,
    /// validation error, or render error — is logged and omitted, and the
    /// pass continues with its siblings. A failed child is likewise dropped
    /// from the injected fragment list while its parent still renders.
    pub fn render_all(&self, components: &[ComponentSpec], canvas: &mut C) -> RenderPass {
        let mut pass = RenderPass::default();

        for spec in components {
            let result = self.render_node(spec, canvas, &mut pass.warnings);
            match &result {
                Ok(fragment) => pass.fragments.push(fragment.clone()),
                Err(err) => Self::record_failure(&spec.type_tag, err, &mut pass.warnings),
            }
            pass.outcomes.push(ComponentOutcome {
                tag: spec.type_tag.clone(),
                result,
            });
        }

        pass
    }

    fn render_node(
        &self,
        spec: &ComponentSpec,
        canvas: &mut C,
        warnings: &mut Vec<String>,
    ) -> Result<PropValue, ComponentError> {
        let Some(component) = self.components.get(&spec.type_tag) else {
            return Err(ComponentError::UnknownComponent(spec.type_tag.clone()));
        };

        let mut child_fragments = Vec::with_capacity(spec.children.len());
        for child in &spec.children {
            match self.render_node(child, canvas, warnings) {
                Ok(fragment) => child_fragments.push(fragment),
                Err(err) => Self::record_failure(&child.type_tag, &err, warnings),
            }
        }

        let mut props = validate_props(component.as_ref(), &spec.props)?;
        if !spec.children.is_empty() {
            props.insert(CHILDREN_PROP, PropValue::List(child_fragments));
        }

        component.render(&props, canvas)
    }

    fn record_failure(tag: &str, err: &ComponentError, warnings: &mut Vec<String>) {
        tracing::warn!(component = %tag, error = %err, "component failed; omitting from output");
        warnings.push(format!("component `{tag}` failed: {err}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coursegen_spec::Props;
    use pretty_assertions::assert_eq;

    /// Canvas that records draw calls in order.
    #[derive(Default)]
    struct Log {
        lines: Vec<String>,
    }

    struct Emit;

    impl Component<Log> for Emit {
        fn tag(&self) -> &'static str {
            "Emit"
        }

        fn required_props(&self) -> &'static [&'static str] {
            &["content"]
        }

        fn render(&self, props: &Props, canvas: &mut Log) -> Result<PropValue, ComponentError> {
            let content = props.str_prop("content")?;
            canvas.lines.push(content.to_owned());
            Ok(PropValue::from(content))
        }
    }

    struct Fail;

    impl Component<Log> for Fail {
        fn tag(&self) -> &'static str {
            "Fail"
        }

        fn render(&self, _props: &Props, _canvas: &mut Log) -> Result<PropValue, ComponentError> {
            Err(ComponentError::render("boom"))
        }
    }

    /// Composite that joins its children's string fragments.
    struct Join;

    impl Component<Log> for Join {
        fn tag(&self) -> &'static str {
            "Join"
        }

        fn render(&self, props: &Props, canvas: &mut Log) -> Result<PropValue, ComponentError> {
            let parts: Vec<&str> = props
                .opt_list(CHILDREN_PROP)?
                .unwrap_or_default()
                .iter()
                .filter_map(PropValue::as_str)
                .collect();
            let joined = parts.join("+");
            canvas.lines.push(format!("join({joined})"));
            Ok(PropValue::from(joined))
        }
    }

    fn registry() -> ComponentRegistry<Log> {
        let mut registry = ComponentRegistry::new();
        registry.register(Emit);
        registry.register(Fail);
        registry.register(Join);
        registry
    }

    fn emit(content: &str) -> ComponentSpec {
        ComponentSpec::new("Emit", Props::new().with("content", content))
    }

    #[test]
    fn test_order_preserving_dispatch() {
        let mut canvas = Log::default();
        let pass = registry().render_all(&[emit("a"), emit("b"), emit("c")], &mut canvas);

        assert_eq!(canvas.lines, vec!["a", "b", "c"]);
        assert_eq!(pass.fragments.len(), 3);
        assert!(pass.is_clean());
    }

    #[test]
    fn test_failure_isolation_keeps_siblings() {
        let mut canvas = Log::default();
        let specs = [
            emit("before"),
            ComponentSpec::new("Fail", Props::new()),
            emit("after"),
        ];
        let pass = registry().render_all(&specs, &mut canvas);

        assert_eq!(canvas.lines, vec!["before", "after"]);
        assert_eq!(pass.fragments.len(), 2);
        assert_eq!(pass.outcomes.len(), 3);
        assert!(pass.outcomes[1].result.is_err());
        assert_eq!(pass.warnings.len(), 1);
        assert!(pass.warnings[0].contains("`Fail`"));
    }

    #[test]
    fn test_unknown_tag_isolated() {
        let mut canvas = Log::default();
        let specs = [ComponentSpec::new("Mystery", Props::new()), emit("ok")];
        let pass = registry().render_all(&specs, &mut canvas);

        assert_eq!(canvas.lines, vec!["ok"]);
        assert!(matches!(
            pass.outcomes[0].result,
            Err(ComponentError::UnknownComponent(_))
        ));
    }

    #[test]
    fn test_missing_props_isolated() {
        let mut canvas = Log::default();
        let specs = [ComponentSpec::new("Emit", Props::new()), emit("ok")];
        let pass = registry().render_all(&specs, &mut canvas);

        assert_eq!(canvas.lines, vec!["ok"]);
        assert!(pass.warnings[0].contains("missing required properties"));
    }

    #[test]
    fn test_children_render_before_parent() {
        let mut canvas = Log::default();
        let composite = ComponentSpec::new("Join", Props::new())
            .with_children(vec![emit("x"), emit("y")]);
        let pass = registry().render_all(&[composite], &mut canvas);

        assert_eq!(canvas.lines, vec!["x", "y", "join(x+y)"]);
        assert_eq!(pass.fragments, vec![PropValue::from("x+y")]);
    }

    #[test]
    fn test_failed_child_dropped_parent_renders() {
        let mut canvas = Log::default();
        let composite = ComponentSpec::new("Join", Props::new()).with_children(vec![
            emit("x"),
            ComponentSpec::new("Fail", Props::new()),
            emit("y"),
        ]);
        let pass = registry().render_all(&[composite], &mut canvas);

        assert_eq!(canvas.lines, vec!["x", "y", "join(x+y)"]);
        assert_eq!(pass.warnings.len(), 1);
        assert!(pass.outcomes[0].result.is_ok());
    }

    #[test]
    fn test_last_registration_wins() {
        struct Emit2;

        impl Component<Log> for Emit2 {
            fn tag(&self) -> &'static str {
                "Emit"
            }

            fn render(
                &self,
                _props: &Props,
                canvas: &mut Log,
            ) -> Result<PropValue, ComponentError> {
                canvas.lines.push("override".to_owned());
                Ok(PropValue::Null)
            }
        }

        let mut registry = registry();
        registry.register(Emit2);

        let mut canvas = Log::default();
        let pass = registry.render_all(&[ComponentSpec::new("Emit", Props::new())], &mut canvas);

        assert_eq!(canvas.lines, vec!["override"]);
        assert!(pass.is_clean());
    }

    #[test]
    fn test_empty_component_list() {
        let mut canvas = Log::default();
        let pass = registry().render_all(&[], &mut canvas);
        assert!(pass.fragments.is_empty());
        assert!(pass.outcomes.is_empty());
    }
}
