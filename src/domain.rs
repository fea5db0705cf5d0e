// Domain layer modules
pub mod attribute_decoder;
pub mod attribute_encoder;
pub mod attribute_value;

// Re-exports
pub use attribute_decoder::{
    clean_item, clean_item_json, clean_items, clean_items_json, extract_json_value, extract_value,
    ItemBatch,
};
pub use attribute_encoder::{render_number, to_attribute, to_attribute_opt, to_item};
pub use attribute_value::{AttributeValue, Item, RESERVED_KEYS};
