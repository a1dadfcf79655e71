pub mod bitset;
pub mod indexmap;
pub mod path_ext;
pub mod rayon;
pub mod sanitize_file_name;
pub mod xxhash;
