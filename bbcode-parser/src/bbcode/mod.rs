//! Main module for bbcode library functionality

pub mod args;
pub mod building;
pub mod error;
pub mod formats;
pub mod matching;
pub mod registry;
pub mod renderer;
pub mod rendering;
pub mod style;
pub mod tree;

pub use args::{ArgValue, BBArgs, ImageLoader};
pub use building::TreeBuilder;
pub use error::{MutateError, RegistryError, RenderError};
pub use matching::{Edge, TagMatch, TagMatcher};
pub use registry::{
    Behavior, PollOptions, Prototype, PrototypeId, Registry, RegistryOptions, TagKind,
};
pub use renderer::{render, Renderer};
pub use rendering::{Fragment, MaterializeOptions, Materializer, RenderOutput, TextRun, Widget};
pub use style::{Alignment, Rgb, Style, StyledText};
pub use tree::{Node, NodeId, NodeKind, Tree};
