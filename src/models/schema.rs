//! Current export schema versions. Applications stamped with anything else
//! have been migrated since their last commit.

pub const CLIENT_SCHEMA_VERSION: i32 = 1;
pub const SERVER_SCHEMA_VERSION: i32 = 6;
