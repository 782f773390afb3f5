pub mod error;
pub mod event;
pub mod state;
pub mod window;

pub use error::{Result, VibeError};
pub use event::{DataEvent, Message, SeriesSource};
pub use state::{AppState, SensorReadouts};
pub use window::{Chart, HistoricData, RenderSurface, SamplePolicy, SlidingSeriesBuffer};
