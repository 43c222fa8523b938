pub mod settings;

pub use settings::{
    AppConfig, CollaborativeSettings, FusionSettings, FusionWeights, GeocoderSettings,
    QuerySettings,
};
