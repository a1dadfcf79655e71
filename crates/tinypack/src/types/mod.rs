pub mod bundle_output;

use std::sync::Arc;

use tinypack_common::NormalizedBundlerOptions;
use tinypack_resolver::Resolver;

pub type SharedOptions = Arc<NormalizedBundlerOptions>;
pub type SharedResolver = Arc<Resolver>;
