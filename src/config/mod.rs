pub mod settings;

pub use settings::{DictConfig, ENV_PREFIX};
