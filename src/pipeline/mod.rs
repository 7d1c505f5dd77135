//! Pipeline module for orchestrating map rendering.
//!
//! Every map product (composite, animated terrain slices, cloud frames and
//! the single-field views) is an [`OutputStage`] over the same fields. The
//! pipeline renders each stage across rows in parallel and hands the
//! finished buffer to an image writer.

mod stage;

pub use stage::{
    render_height_field, render_stage, CloudFrameStage, CompositeStage, HeightStage,
    HumidityStage, MapContext, MapProduct, OutputStage, Pipeline, PipelineError, StageId,
    TemperatureStage, TerrainSliceStage,
};
