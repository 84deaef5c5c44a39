//! Read-only template trees for project scaffolding
//!
//! Packaging and environment setup consume templates through the
//! [`TemplateProvider`] trait — a read-only virtual file tree — so neither
//! cares how the content is embedded.

use crate::{EnvError, EnvResult};
use std::path::Path;

/// One file in a template tree
#[derive(Debug, Clone, Copy)]
pub struct TemplateEntry {
    /// Relative path inside the materialized tree (forward slashes)
    pub path: &'static str,
    /// File contents
    pub contents: &'static str,
}

/// A read-only virtual file tree
pub trait TemplateProvider {
    fn entries(&self) -> &[TemplateEntry];

    /// Materialize the tree under `dir`.
    ///
    /// With `overwrite` false, files already present on disk are kept.
    fn write_to(&self, dir: &Path, overwrite: bool) -> EnvResult<()> {
        for entry in self.entries() {
            let dst = dir.join(entry.path);
            if !overwrite && dst.exists() {
                continue;
            }
            if let Some(parent) = dst.parent() {
                std::fs::create_dir_all(parent).map_err(|e| EnvError::io(parent, e))?;
            }
            std::fs::write(&dst, entry.contents).map_err(|e| EnvError::io(&dst, e))?;
        }
        Ok(())
    }
}

/// Engine project scaffolding (descriptor, boot scene, engine config)
pub struct ProjectTemplates;

impl TemplateProvider for ProjectTemplates {
    fn entries(&self) -> &[TemplateEntry] {
        PROJECT_ENTRIES
    }
}

const PROJECT_ENTRIES: &[TemplateEntry] = &[
    TemplateEntry {
        path: "project.engine",
        contents: PROJECT_DESCRIPTOR,
    },
    TemplateEntry {
        path: "main.scene",
        contents: MAIN_SCENE,
    },
    TemplateEntry {
        path: "engine/boot.cfg",
        contents: ENGINE_BOOT_CFG,
    },
];

const PROJECT_DESCRIPTOR: &str = r#"; engine project descriptor

config_version=5

[application]
config/name="spxgame"
run/main_scene="main.scene"

[rendering]
renderer/rendering_method="mobile"
"#;

const MAIN_SCENE: &str = r#"[scene format=3]

[node name="Main" type="Node2D"]
script = "res://engine/boot.cfg"
"#;

const ENGINE_BOOT_CFG: &str = r#"[boot]
entry="spx"
autoload=true
"#;

/// Default dependency descriptor for a standalone generated module
pub const DEFAULT_GO_MOD: &str = r#"module spxgame

go 1.22

require github.com/spx-lang/spx v0.3.0
"#;

/// Starter script written by `spx init`
pub const STARTER_MAIN_SPX: &str = r#"// spx project entry point

onStart => {
	println("Hello, spx!")
	println("Project started successfully!")
}
"#;

/// Ignore-file written next to the engine project
pub const GITIGNORE: &str = r#"project/
.temp/
*.import
"#;
