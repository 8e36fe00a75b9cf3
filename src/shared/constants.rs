/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// DISCOVERY LIMITS
// =============================================================================

/// Maximum number of services returned by the recommendation tiers
pub const RECOMMENDATION_LIMIT: i64 = 12;

/// Number of most recently created services in the terminal fallback tier
pub const RECENT_FALLBACK_LIMIT: i64 = 5;
