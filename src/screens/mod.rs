//! Concrete dashboard panels. Each one is configuration over the generic
//! table engine or a small renderable unit; none of them talk to the
//! control plane directly.

mod dataflow;
mod detail;
mod home;
mod visualization;

pub use dataflow::DataflowListPanel;
pub use detail::DataflowDetailPanel;
pub use home::HomePanel;
pub use visualization::VisualizationPanel;
