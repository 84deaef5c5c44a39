//! Toolchain strategy tables
//!
//! All OS/architecture-conditional knowledge lives here as lookup tables
//! keyed by (platform, architecture), consulted once per build instead of
//! branched on repeatedly.

use crate::error::{BuildError, BuildResult};

/// Base name of the native library artifacts
pub const LIB_NAME: &str = "spx";

/// Go architecture tags supported per desktop host OS
pub fn desktop_archs(os: &str) -> &'static [&'static str] {
    match os {
        "windows" => &["amd64", "386"],
        "macos" => &["amd64", "arm64"],
        "linux" => &["amd64", "arm", "arm64", "386"],
        _ => &[],
    }
}

/// Shared library extension per desktop OS
pub fn lib_extension(os: &str) -> &'static str {
    match os {
        "windows" => "dll",
        "macos" => "dylib",
        _ => "so",
    }
}

/// OS token used in artifact filenames (`darwin` rather than `macos`, the
/// Go toolchain's spelling)
pub fn go_os(os: &str) -> &'static str {
    match os {
        "windows" => "windows",
        "macos" => "darwin",
        _ => "linux",
    }
}

/// Library filename templating: `<name>-<os>-<arch>.<ext>`
pub fn lib_file_name(os: &str, arch: &str) -> String {
    format!("{}-{}-{}.{}", LIB_NAME, go_os(os), arch, lib_extension(os))
}

/// Host OS as reported by the standard library
pub fn host_os() -> &'static str {
    std::env::consts::OS
}

/// Host architecture mapped to its Go tag
pub fn host_go_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "arm" => "arm",
        other => other,
    }
}

/// Expand an architecture request into the concrete build list.
///
/// Empty request → the host architecture (macOS always builds both slices);
/// `all` → the host OS's full supported set; anything else must be a member
/// of that set or the request is rejected before any build starts.
pub fn expand_archs(request: &str, os: &str, host_arch: &str) -> BuildResult<Vec<&'static str>> {
    let supported = desktop_archs(os);

    match request {
        "" => {
            if os == "macos" {
                Ok(supported.to_vec())
            } else {
                supported
                    .iter()
                    .find(|a| **a == host_arch)
                    .map(|a| vec![*a])
                    .ok_or_else(|| BuildError::invalid_arch(host_arch, supported))
            }
        }
        "all" => {
            if supported.is_empty() {
                Err(BuildError::invalid_arch("all", supported))
            } else {
                Ok(supported.to_vec())
            }
        }
        explicit => supported
            .iter()
            .find(|a| **a == explicit)
            .map(|a| vec![*a])
            .ok_or_else(|| BuildError::invalid_arch(explicit, supported)),
    }
}

/// NDK prebuilt toolchain directory name for a host
pub fn ndk_host_tag(os: &str, arch: &str) -> BuildResult<&'static str> {
    match (os, arch) {
        ("windows", _) => Ok("windows-x86_64"),
        ("linux", "amd64") => Ok("linux-x86_64"),
        ("linux", "arm64") => Ok("linux-aarch64"),
        ("macos", _) => Ok("darwin-x86_64"),
        _ => Err(BuildError::ToolchainMissing {
            os: os.to_string(),
            arch: arch.to_string(),
        }),
    }
}

/// One Android ABI target
pub struct AndroidAbi {
    pub abi: &'static str,
    pub goarch: &'static str,
    pub clang_prefix: &'static str,
    pub lib_name: &'static str,
}

/// ABIs built for the Android export
pub const ANDROID_ABIS: [AndroidAbi; 2] = [
    AndroidAbi {
        abi: "arm64-v8a",
        goarch: "arm64",
        clang_prefix: "aarch64-linux-android",
        lib_name: "spx-android-arm64.so",
    },
    AndroidAbi {
        abi: "armeabi-v7a",
        goarch: "arm",
        clang_prefix: "armv7a-linux-androideabi",
        lib_name: "spx-android-arm32.so",
    },
];

/// One iOS build slice
pub struct IosSlice {
    pub name: &'static str,
    pub goarch: &'static str,
    /// SDK name passed to the system SDK locator
    pub sdk: &'static str,
    pub min_version_flag: &'static str,
    pub arch_flag: &'static str,
    /// Archive filename inside the scratch dir
    pub archive: &'static str,
    pub simulator: bool,
}

/// Slices built for the iOS export: two simulator archives (later combined
/// into one universal artifact) and one device archive.
pub const IOS_SLICES: [IosSlice; 3] = [
    IosSlice {
        name: "iOS Simulator (x86_64)",
        goarch: "amd64",
        sdk: "iphonesimulator",
        min_version_flag: "-mios-simulator-version-min=12.0",
        arch_flag: "x86_64",
        archive: "libspx-x86_64.a",
        simulator: true,
    },
    IosSlice {
        name: "iOS Simulator (arm64)",
        goarch: "arm64",
        sdk: "iphonesimulator",
        min_version_flag: "-mios-simulator-version-min=12.0",
        arch_flag: "arm64",
        archive: "libspx-arm64-sim.a",
        simulator: true,
    },
    IosSlice {
        name: "iOS Device (arm64)",
        goarch: "arm64",
        sdk: "iphoneos",
        min_version_flag: "-mios-version-min=12.0",
        arch_flag: "arm64",
        archive: "libspx-arm64.a",
        simulator: false,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("windows", &["amd64", "386"])]
    #[case("macos", &["amd64", "arm64"])]
    #[case("linux", &["amd64", "arm", "arm64", "386"])]
    fn test_desktop_arch_table(#[case] os: &str, #[case] expected: &[&str]) {
        assert_eq!(desktop_archs(os), expected);
    }

    #[test]
    fn test_lib_file_name_templating() {
        assert_eq!(lib_file_name("linux", "amd64"), "spx-linux-amd64.so");
        assert_eq!(lib_file_name("windows", "386"), "spx-windows-386.dll");
        assert_eq!(lib_file_name("macos", "arm64"), "spx-darwin-arm64.dylib");
    }

    #[test]
    fn test_expand_all_on_linux_yields_four() {
        let archs = expand_archs("all", "linux", "amd64").unwrap();
        assert_eq!(archs, vec!["amd64", "arm", "arm64", "386"]);
    }

    #[test]
    fn test_expand_default_is_host_arch() {
        assert_eq!(expand_archs("", "linux", "amd64").unwrap(), vec!["amd64"]);
    }

    #[test]
    fn test_expand_default_on_macos_builds_both() {
        assert_eq!(
            expand_archs("", "macos", "arm64").unwrap(),
            vec!["amd64", "arm64"]
        );
    }

    #[test]
    fn test_expand_explicit_arch() {
        assert_eq!(expand_archs("arm", "linux", "amd64").unwrap(), vec!["arm"]);
    }

    #[test]
    fn test_expand_rejects_unsupported_arch() {
        let err = expand_archs("mips", "linux", "amd64").unwrap_err();
        match err {
            BuildError::InvalidArchitecture { arch, valid } => {
                assert_eq!(arch, "mips");
                assert_eq!(valid, "amd64,arm,arm64,386");
            }
            other => panic!("expected InvalidArchitecture, got {other:?}"),
        }
    }

    #[test]
    fn test_expand_rejects_arch_valid_elsewhere() {
        // arm is a linux arch, not a windows one
        assert!(expand_archs("arm", "windows", "amd64").is_err());
    }

    #[rstest]
    #[case("windows", "amd64", "windows-x86_64")]
    #[case("linux", "amd64", "linux-x86_64")]
    #[case("linux", "arm64", "linux-aarch64")]
    #[case("macos", "arm64", "darwin-x86_64")]
    fn test_ndk_host_tag_table(#[case] os: &str, #[case] arch: &str, #[case] expected: &str) {
        assert_eq!(ndk_host_tag(os, arch).unwrap(), expected);
    }

    #[test]
    fn test_ndk_host_tag_unsupported_host() {
        let err = ndk_host_tag("freebsd", "amd64").unwrap_err();
        assert!(matches!(err, BuildError::ToolchainMissing { .. }));
    }

    #[test]
    fn test_android_abi_table() {
        assert_eq!(ANDROID_ABIS[0].abi, "arm64-v8a");
        assert_eq!(ANDROID_ABIS[1].goarch, "arm");
    }

    #[test]
    fn test_ios_slice_table() {
        let simulators: Vec<_> = IOS_SLICES.iter().filter(|s| s.simulator).collect();
        assert_eq!(simulators.len(), 2);
        assert!(IOS_SLICES.iter().all(|s| !s.archive.is_empty()));
    }
}
