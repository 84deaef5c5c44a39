//! Flags shared by every project command

use clap::Args;

/// Flags accepted by all project commands; unknown to a given action, a
/// flag is simply ignored by it.
#[derive(Args, Debug, Clone, Default)]
pub struct SharedArgs {
    /// Project path
    #[arg(long, default_value = ".")]
    pub path: String,

    /// Server address as host:port
    #[arg(long = "serveraddr")]
    pub server_addr: Option<String>,

    /// Controller's type name
    #[arg(long)]
    pub controller: Option<String>,

    /// Server mode
    #[arg(long = "servermode")]
    pub server_mode: bool,

    /// Headless mode (no display)
    #[arg(long)]
    pub headless: bool,

    /// Target cpu architecture, or "all"
    #[arg(long, default_value = "")]
    pub arch: String,

    /// Build tags
    #[arg(long, default_value = "simulation")]
    pub tags: String,

    /// No map mode
    #[arg(long = "nomap")]
    pub no_map: bool,

    /// Install the exported package on a connected device
    #[arg(long)]
    pub install: bool,

    /// Open the debug web service
    #[arg(long = "debugweb")]
    pub debug_web: bool,

    /// Full screen
    #[arg(long)]
    pub fullscreen: bool,

    /// Build mode: normal or fast
    #[arg(long = "build", default_value = "normal")]
    pub build_mode: String,

    /// Multiplayer mode, server only
    #[arg(long = "onlys")]
    pub only_server: bool,

    /// Multiplayer mode, clients only
    #[arg(long = "onlyc")]
    pub only_client: bool,
}

impl SharedArgs {
    /// Flags forwarded verbatim to the host engine process. The project
    /// path is not included here; the orchestrator prepends the resolved
    /// `--path` itself.
    pub fn forward_flags(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(addr) = &self.server_addr {
            args.push("--serveraddr".to_string());
            args.push(addr.clone());
        }
        if self.server_mode {
            args.push("--servermode".to_string());
        }
        if let Some(controller) = &self.controller {
            args.push("--controller".to_string());
            args.push(controller.clone());
        }
        if self.headless {
            args.push("--headless".to_string());
        }
        if self.no_map {
            args.push("--nomap".to_string());
        }
        if self.debug_web {
            args.push("--debugweb".to_string());
        }
        if self.fullscreen {
            args.push("--fullscreen".to_string());
        }
        args
    }

    /// Extra flags for multiplayer runs
    pub fn multiplayer_flags(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.only_server {
            args.push("--onlys".to_string());
        }
        if self.only_client {
            args.push("--onlyc".to_string());
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_flags_empty_by_default() {
        let flags = SharedArgs::default();
        assert!(flags.forward_flags().is_empty());
    }

    #[test]
    fn test_forward_flags_include_set_values() {
        let flags = SharedArgs {
            server_addr: Some("127.0.0.1:8005".to_string()),
            headless: true,
            fullscreen: true,
            ..Default::default()
        };
        let forwarded = flags.forward_flags();
        assert_eq!(
            forwarded,
            vec![
                "--serveraddr",
                "127.0.0.1:8005",
                "--headless",
                "--fullscreen"
            ]
        );
    }

    #[test]
    fn test_multiplayer_flags() {
        let flags = SharedArgs {
            only_server: true,
            ..Default::default()
        };
        assert_eq!(flags.multiplayer_flags(), vec!["--onlys"]);
    }
}
