//! Project initialization command (spx init)

use anyhow::{Context, Result};
use spx_env::templates::STARTER_MAIN_SPX;
use spx_env::{adapt_module_graph, ProjectContext, PROJECT_REL_DIR};
use std::path::Path;

/// Default stage size of a fresh project
const MAP_WIDTH: u32 = 480;
const MAP_HEIGHT: u32 = 360;

/// Initialize a new spx project in the target directory.
pub fn run(path: &str, version: &str) -> Result<()> {
    let ctx = ProjectContext::resolve(path, PROJECT_REL_DIR, version)
        .context("Failed to resolve target path")?;
    std::fs::create_dir_all(&ctx.target_dir)
        .with_context(|| format!("Failed to create {}", ctx.target_dir.display()))?;

    println!("Initializing spx project in: {}", ctx.target_dir.display());

    write_assets_index(&ctx.target_dir)?;

    let main_spx = ctx.target_dir.join("main.spx");
    std::fs::write(&main_spx, STARTER_MAIN_SPX)
        .with_context(|| format!("Failed to create {}", main_spx.display()))?;

    adapt_module_graph(&ctx.project_dir, &ctx.go_dir)?;

    println!();
    println!("spx project initialized successfully!");
    println!("You can now run 'spx run' to start your project.");
    Ok(())
}

/// Write `assets/index.json` with the default map dimensions.
fn write_assets_index(target_dir: &Path) -> Result<()> {
    let assets_dir = target_dir.join("assets");
    std::fs::create_dir_all(&assets_dir)
        .with_context(|| format!("Failed to create {}", assets_dir.display()))?;

    let index = serde_json::json!({
        "map": {
            "width": MAP_WIDTH,
            "height": MAP_HEIGHT,
        }
    });
    let index_path = assets_dir.join("index.json");
    std::fs::write(&index_path, serde_json::to_string_pretty(&index)?)
        .with_context(|| format!("Failed to create {}", index_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_starter_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("demo");

        run(target.to_str().unwrap(), "0.3.0").unwrap();

        let index: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(target.join("assets/index.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(index["map"]["width"], 480);
        assert_eq!(index["map"]["height"], 360);

        let main_spx = std::fs::read_to_string(target.join("main.spx")).unwrap();
        assert!(!main_spx.is_empty());
        assert!(target.join("project/go/go.mod").is_file());
    }
}
