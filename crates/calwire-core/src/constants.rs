/// Product identity used in generated calendar data
pub const PRODUCT_NAME: &str = "calwire";

pub const DEFAULT_PRODID: &str =
    const_str::concat!("-//", PRODUCT_NAME, "//", PRODUCT_NAME, " iCalendar codec//EN");
pub const DEFAULT_VERSION: &str = "2.0";
pub const DEFAULT_METHOD: &str = "PUBLISH";

/// Prefix for environment variables read by [`crate::config::Settings::load`]
pub const ENV_PREFIX: &str = "CALWIRE";
pub const CONFIG_FILE: &str = "calwire.toml";
