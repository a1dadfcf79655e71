pub mod apply_rules;
pub mod normalize_options;
pub mod resolve_id;
pub mod scan_imports;
pub mod unique_filenames;
