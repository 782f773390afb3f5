pub mod chart;
pub mod readouts;

pub use chart::{ChartSurface, ChartWidget};
pub use readouts::ReadoutsWidget;
