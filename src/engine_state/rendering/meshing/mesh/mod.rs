pub mod face;
pub mod greedy;
#[allow(clippy::module_inception)]
pub mod mesh;
