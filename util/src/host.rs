//! Host platform (linux for example) utility functions

use std::env;
use std::path::PathBuf;
use uname;

/// Name of the environment variable pointing at the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "CLAW_SW_ROOT";

/// Get the software root directory from the `CLAW_SW_ROOT` environment
/// variable.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// Retrieve uname information.
pub fn get_uname() -> std::io::Result<uname::Info> {
    uname::uname()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_get_uname() {
        let info = get_uname().unwrap();

        assert!(!info.sysname.is_empty());
        assert!(!info.machine.is_empty());
    }
}
