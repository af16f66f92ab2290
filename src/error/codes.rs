/// Error code registry for wool
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 4000-4999: Execution errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_INVALID_YAML: u16 = 1002;
    pub const CONFIG_INVALID_TOML: u16 = 1003;
    pub const CONFIG_UNSUPPORTED_FORMAT: u16 = 1004;
    pub const CONFIG_INVALID_VALUE: u16 = 1005;

    // Execution errors (4000-4999)
    pub const EXEC_TIMEOUT: u16 = 4002;
    pub const EXEC_INTERRUPTED: u16 = 4006;
    pub const EXEC_SPAWN_FAILED: u16 = 4007;
    pub const EXEC_TRANSFORM_PANICKED: u16 = 4011;
    pub const EXEC_TASK_FAILED: u16 = 4012;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Configuration errors
        1000 => "Generic configuration error",
        1001 => "Configuration file not found",
        1002 => "Invalid YAML syntax in configuration",
        1003 => "Invalid TOML syntax in configuration",
        1004 => "Unsupported configuration file format",
        1005 => "Invalid value in configuration",

        // Execution errors
        4002 => "Execution exceeded its deadline",
        4006 => "Execution was cancelled",
        4007 => "Failed to start the async runtime",
        4011 => "A transform panicked while processing an item",
        4012 => "A pipeline task terminated abnormally",

        _ => "Unknown error code",
    }
}
