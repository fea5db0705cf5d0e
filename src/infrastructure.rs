// Infrastructure layer modules
pub mod binary;
pub mod correlation;
pub mod cors_config;
pub mod logging;
pub mod sdk_attribute;
pub mod stream_image;

// Re-exports
pub use correlation::{
    current_correlation_id, get_correlation_id, reset_correlation_id, set_correlation_id,
};
pub use cors_config::CorsConfig;
pub use logging::{init_logging, start_logger, LogMetadata};
pub use sdk_attribute::{
    clean_sdk_item, from_sdk_attribute, to_sdk_attribute, to_sdk_item, AttributeConversionError,
};
pub use stream_image::{clean_stream_image, from_stream_attribute};
