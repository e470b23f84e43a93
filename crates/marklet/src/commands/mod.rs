//! CLI command implementations.

pub(crate) mod features;
pub(crate) mod render;
pub(crate) mod slug;

pub(crate) use features::FeaturesArgs;
pub(crate) use render::RenderArgs;
pub(crate) use slug::SlugArgs;
