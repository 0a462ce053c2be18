//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Isolated workspace with a settings file and a stand-in compiler.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Create a workspace declaring `ids` as components under `packages/`.
  pub fn with_components(ids: &[&str]) -> Self {
    let temp = TempDir::new().unwrap();
    let env = Self { temp };

    let components: Vec<_> = ids
      .iter()
      .map(|id| {
        env.write_file(&format!("packages/{}/src/index.ts", id), "export const x = 1;\n");
        serde_json::json!({
          "id": id,
          "rootDir": format!("packages/{}/src", id),
          "packageDir": format!("packages/{}", id),
        })
      })
      .collect();

    let settings = serde_json::json!({
      "cacheDir": ".cache",
      "compiler": { "tsconfig": { "compilerOptions": { "module": "commonjs" } } },
      "backend": { "command": env.fake_tsc().to_string_lossy(), "args": ["--pretty", "false"] },
      "components": components,
    });
    env.write_file("compbuild.json", &serde_json::to_string_pretty(&settings).unwrap());
    env
  }

  /// Canonical workspace root.
  pub fn root(&self) -> PathBuf {
    dunce::canonicalize(self.temp.path()).unwrap()
  }

  /// Write a file relative to the workspace root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  /// Script standing in for the compiler.
  ///
  /// Fails any project whose config path contains `broken`.
  #[cfg(unix)]
  fn fake_tsc(&self) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = self.temp.path().join("fake-tsc");
    std::fs::write(
      &path,
      r#"#!/bin/sh
for last; do :; done
case "$last" in
  *broken*) echo "packages/broken/src/index.ts(1,14): error TS2322: Type 'number' is not assignable to type 'string'."; exit 2 ;;
esac
exit 0
"#,
    )
    .unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
  }

  #[cfg(not(unix))]
  fn fake_tsc(&self) -> PathBuf {
    PathBuf::from("tsc")
  }

  /// Command for the compbuild binary, pointed at this workspace.
  pub fn cmd(&self) -> Command {
    let mut cmd = cargo_bin_cmd!("compbuild");
    cmd.arg("--workspace").arg(self.temp.path());
    cmd.env_remove("COMPBUILD_CACHE_DIR");
    cmd
  }

  pub fn cache_root(&self) -> PathBuf {
    self.root().join(".cache").join("typescript")
  }
}
