//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;

/// Default refresh token expiry in days
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const SCHOLARSHIP_HOLDER: &str = "scholarshipHolder";
    pub const PROMOTION_RESPONSIBLE: &str = "promotionResponsible";
    pub const AREA_RESPONSIBLE: &str = "areaResponsible";
    pub const ACTIVITY_RESPONSIBLE: &str = "activityResponsible";

    /// All user roles
    pub const ALL: &[&str] = &[
        ADMIN,
        SCHOLARSHIP_HOLDER,
        PROMOTION_RESPONSIBLE,
        AREA_RESPONSIBLE,
        ACTIVITY_RESPONSIBLE,
    ];
}

// =============================================================================
// PROMOTIONS
// =============================================================================

/// Promotion group identifiers
pub mod promotion_groups {
    pub const CHICK: &str = "chick";
    pub const STUDENT: &str = "student";
    pub const GRADUATE: &str = "graduate";

    /// All promotion groups
    pub const ALL: &[&str] = &[CHICK, STUDENT, GRADUATE];
}

/// Lowest promotion year accepted in a restriction list
pub const MIN_PROMOTION_YEAR: i32 = 2000;

/// Highest promotion year accepted in a restriction list
pub const MAX_PROMOTION_YEAR: i32 = 2100;

// =============================================================================
// PAGINATION
// =============================================================================

/// Fixed page size for paginated assignment listings
pub const RESULTS_PER_PAGE: u32 = 10;

/// Default page size for paginated results
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum page size for paginated results
pub const MAX_PAGE_SIZE: u32 = 100;

// =============================================================================
// VALIDATION
// =============================================================================

/// Maximum activity/area/payment name length
pub const MAX_NAME_LENGTH: u64 = 256;

/// Maximum description length
pub const MAX_DESCRIPTION_LENGTH: u64 = 65535;

// =============================================================================
// API VERSIONING
// =============================================================================

/// Current API version
pub const API_VERSION: &str = "v1";

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
