pub mod components;
pub mod config;
pub mod normalize;
pub mod orchestrator;
pub mod temporal;
pub mod threshold;

pub use config::{HuRange, SegmentationConfig};
pub use orchestrator::{produce_mask, produce_mask_dyn, SegmentationOutput, SegmentationStats};
