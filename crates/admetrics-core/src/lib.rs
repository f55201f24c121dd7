pub mod align;
pub mod error;
pub mod join;
pub mod metrics;
pub mod pipeline;
pub mod schema;
pub mod unify;
pub mod validation;
pub mod views;

pub use error::{PipelineError, Result};
pub use pipeline::{run, ChannelTable, PipelineOptions, PipelineOutput};
