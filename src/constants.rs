pub const API_VERSION: &str = "1.0.0";

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;

pub const EMAIL_UNIQUE_INDEX: &str = "users_email_lower_unique_idx";
pub const UNIQUE_VIOLATION: &str = "23505";

// Response messages
pub const USER_CREATED: &str = "User created successfully";
pub const USER_UPDATED: &str = "User updated successfully";
pub const USER_DELETED: &str = "User deleted successfully";
pub const USER_NOT_FOUND: &str = "User not found";
pub const EMAIL_EXISTS: &str = "Email already exists";
pub const VALIDATION_FAILED: &str = "Validation failed";
pub const INVALID_USER_ID: &str = "Invalid user ID";
pub const USER_ID_POSITIVE: &str = "User ID must be a positive integer";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const ROUTE_NOT_FOUND: &str = "Route not found";
