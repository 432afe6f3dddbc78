//! Fixed API paths

pub const ARTIFACTS_PATH: &str = "/pulp/api/v3/artifacts/";

pub const FILE_CONTENT_PATH: &str = "/pulp/api/v3/content/file/";

pub const FILE_REMOTE_PATH: &str = "/pulp/api/v3/remotes/file/";

pub const REPO_PATH: &str = "/pulp/api/v3/repositories/";

pub const JWT_PATH: &str = "/pulp/api/v3/jwt/";
