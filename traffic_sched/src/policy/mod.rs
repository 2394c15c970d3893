//! The three independent planners the meta-scheduler can dispatch to. All
//! three share the same skeleton: pick a target green, prepend a transition
//! if the axis changes, append the clipped green.

mod priority;
mod round_robin;
mod sjf;

pub use priority::priority_schedule;
pub use round_robin::round_robin_schedule;
pub use sjf::sjf_schedule;
