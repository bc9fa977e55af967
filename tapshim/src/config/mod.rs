pub mod error;

use std::{fmt, path::PathBuf, str::FromStr};

use self::error::Error;

/// Directory shared with virt-launcher in which hook sockets are discovered.
pub const HOOK_SOCKETS_SHARED_DIR: &str = "/var/run/kubevirt-hooks";

/// Name the hook registers itself under.
pub const HOOK_NAME: &str = "shim";

pub const SUPPORTED_VERSIONS: [&str; 2] = ["v1alpha1", "v1alpha2"];

/// Callback API version negotiated on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookVersion {
    V1Alpha1,
    V1Alpha2,
}

impl HookVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookVersion::V1Alpha1 => SUPPORTED_VERSIONS[0],
            HookVersion::V1Alpha2 => SUPPORTED_VERSIONS[1],
        }
    }
}

impl FromStr for HookVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1alpha1" => Ok(HookVersion::V1Alpha1),
            "v1alpha2" => Ok(HookVersion::V1Alpha2),
            "" => Err(Error::MissingVersion),
            other => Err(Error::UnsupportedVersion(other.into())),
        }
    }
}

impl fmt::Display for HookVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Startup configuration. Built once and shared read-only for the lifetime of
/// the process.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub version: HookVersion,
    pub hooks_dir: PathBuf,
}

impl Config {
    pub fn new(version: Option<&str>, hooks_dir: PathBuf) -> Result<Self, Error> {
        let version = version.ok_or(Error::MissingVersion)?.parse()?;

        Ok(Config {
            name: HOOK_NAME.into(),
            version,
            hooks_dir,
        })
    }
}
