/// Channel used for variant prices when the caller does not specify one
pub const DEFAULT_CHANNEL_ID: &str = "default";

/// Maximum number of data rows accepted in a single import run
pub const MAX_IMPORT_ROWS: usize = 5_000;

/// Number of staged rows applied per storage transaction
pub const APPLY_CHUNK_SIZE: usize = 100;

/// Fixed columns every import file must carry, checked in this order
pub const REQUIRED_IMPORT_COLUMNS: [&str; 11] = [
    "id",
    "name",
    "slug",
    "enabled",
    "assetIds",
    "description",
    "facetValueIds",
    "featuredAssetId",
    "productVariantName",
    "productVariantSKU",
    "productVariantPrice",
];
