//! Renderer façade
//!
//! Bundles a prototype registry with materializer options so callers can go from
//! source text to [`RenderOutput`] in one call. The standard renderer borrows the
//! process-wide [`STANDARD`] registry; configured renderers own theirs behind an
//! `Arc` so they can be cloned into worker threads cheaply.

use super::args::BBArgs;
use super::building::TreeBuilder;
use super::registry::{Registry, STANDARD};
use super::rendering::{MaterializeOptions, Materializer, RenderOutput};
use super::tree::Tree;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
enum RegistryHandle {
    Standard,
    Owned(Arc<Registry>),
}

#[derive(Debug, Clone)]
pub struct Renderer {
    registry: RegistryHandle,
    materializer: Materializer,
}

impl Renderer {
    /// Built-in tags and default materializer options.
    pub fn standard() -> Self {
        Self {
            registry: RegistryHandle::Standard,
            materializer: Materializer::default(),
        }
    }

    pub fn new(registry: Arc<Registry>, options: MaterializeOptions) -> Self {
        Self {
            registry: RegistryHandle::Owned(registry),
            materializer: Materializer::new(options),
        }
    }

    /// Same registry, different materializer options.
    pub fn with_options(mut self, options: MaterializeOptions) -> Self {
        self.materializer = Materializer::new(options);
        self
    }

    pub fn registry(&self) -> &Registry {
        match &self.registry {
            RegistryHandle::Standard => &STANDARD,
            RegistryHandle::Owned(registry) => registry,
        }
    }

    pub fn options(&self) -> &MaterializeOptions {
        self.materializer.options()
    }

    pub fn parse(&self, source: &str) -> Tree {
        TreeBuilder::new(self.registry()).build(source)
    }

    pub fn render_tree(&self, tree: &Tree, args: &BBArgs) -> RenderOutput {
        self.materializer.materialize(tree, args)
    }

    /// Parse and materialize `source` in one pass.
    pub fn render(&self, source: &str, args: &BBArgs) -> RenderOutput {
        let tree = self.parse(source);
        let output = self.render_tree(&tree, args);
        debug!(
            bytes = source.len(),
            nodes = tree.len(),
            fragments = output.fragments.len(),
            errors = output.errors.len(),
            "rendered document"
        );
        output
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::standard()
    }
}

/// Render `source` with the standard renderer.
pub fn render(source: &str, args: &BBArgs) -> RenderOutput {
    Renderer::standard().render(source, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbcode::registry::RegistryOptions;

    #[test]
    fn standard_renderer_uses_standard_registry() {
        let renderer = Renderer::standard();
        assert_eq!(renderer.registry().len(), STANDARD.len());
    }

    #[test]
    fn owned_registry_is_used_for_parsing() {
        let options = RegistryOptions {
            passthrough_tags: vec!["box".into()],
            ..RegistryOptions::default()
        };
        let registry = Arc::new(Registry::with_options(&options).unwrap());
        let renderer = Renderer::new(registry, MaterializeOptions::default());
        let tree = renderer.parse("[box]x[/box]");
        let child = tree.children(tree.root())[0];
        assert_eq!(tree.kind(child).name(), "box");
    }

    #[test]
    fn renderers_can_be_shared_across_threads() {
        let renderer = Renderer::standard();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let renderer = renderer.clone();
                std::thread::spawn(move || {
                    renderer
                        .render(&format!("[b]{i}[/b]"), &BBArgs::new())
                        .plain_text()
                })
            })
            .collect();
        let texts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(texts, vec!["0", "1", "2", "3"]);
    }
}
