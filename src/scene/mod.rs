//! Scene graph adapter: the model tree the inspector queries and mutates

pub mod description;
pub mod flatten;
pub mod graph;
pub mod loader;
pub mod node;

pub use description::SceneDescription;
pub use flatten::DrawItem;
pub use graph::{Hit, SceneGraph};
pub use loader::{LoadResult, ModelLoader, DEMO_KEY};
pub use node::{LocalTransform, NodeContent, SceneNode, SceneNodeId};
