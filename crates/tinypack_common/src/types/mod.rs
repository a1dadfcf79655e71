pub mod asset_content;
pub mod chunk_kind;
pub mod entry_point;
pub mod import_kind;
pub mod import_record;
pub mod instantiated_chunk;
pub mod module_id;
pub mod module_table;
pub mod output_asset;
pub mod raw_idx;
pub mod resolved_id;
