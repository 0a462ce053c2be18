//! Pre-build and build phases against a scripted backend.

use serde_json::json;

use compbuild_lib::backend::scripted::{ScriptedBackend, ScriptedGraph, ScriptedUnit};
use compbuild_lib::diagnostics::Diagnostic;
use compbuild_lib::error::BuildError;
use compbuild_lib::logger::MemoryLogger;

use super::common::{TestWorkspace, read_json};

#[tokio::test]
async fn component_configs_merge_template_override_and_forced_fields() {
  let ws = TestWorkspace::new(&["button", "card"]);
  ws.write_file(
    "packages/button/tsconfig.json",
    r#"{
      // package tweaks
      "compilerOptions": { "module": "esnext", "strict": true, "types": ["node"] },
      "exclude": ["src/legacy"],
    }"#,
  );
  let logger = MemoryLogger::new();
  let mut compiler = ws.compiler(
    json!({ "compilerOptions": { "module": "commonjs", "types": ["jest"] } }),
    &logger,
  );

  let paths = compiler.pre_build(&ws.context()).await.unwrap().clone();
  let button = read_json(&paths["button"]);
  let package_dir = ws.package_dir("button");

  assert_eq!(button["compilerOptions"]["module"], "commonjs");
  assert_eq!(button["compilerOptions"]["strict"], true);
  assert_eq!(button["compilerOptions"]["types"], json!(["jest", "node"]));
  assert_eq!(
    button["compilerOptions"]["outDir"],
    json!(package_dir.join("dist").to_string_lossy())
  );
  assert_eq!(
    button["include"],
    json!([ws.root().join("packages/button/src").to_string_lossy()])
  );

  let exclude: Vec<String> = serde_json::from_value(button["exclude"].clone()).unwrap();
  assert!(exclude.contains(&package_dir.join("src/legacy").to_string_lossy().to_string()));
  assert!(exclude.iter().any(|e| e.ends_with("**/__tests__/**")));

  let card = read_json(&paths["card"]);
  assert_eq!(card["compilerOptions"]["types"], json!(["jest"]));
}

#[tokio::test]
async fn broken_override_is_reported_and_ignored() {
  let ws = TestWorkspace::new(&["button"]);
  ws.write_file("packages/button/tsconfig.json", "{ not json");
  let logger = MemoryLogger::new();
  let mut compiler = ws.compiler(json!({ "compilerOptions": { "strict": false } }), &logger);

  let paths = compiler.pre_build(&ws.context()).await.unwrap().clone();

  assert_eq!(read_json(&paths["button"])["compilerOptions"]["strict"], false);
  assert_eq!(logger.failures().len(), 1);
}

#[tokio::test]
async fn manifest_references_every_component_config() {
  let ws = TestWorkspace::new(&["lib", "app"]);
  let logger = MemoryLogger::new();
  let mut compiler = ws.compiler(json!({}), &logger);
  let ctx = ws.context();

  let paths = compiler.pre_build(&ctx).await.unwrap().clone();
  let backend = ScriptedBackend::new(ScriptedGraph::default());
  let result = compiler.build(&ctx, &backend).unwrap();
  assert!(result.components_results.is_empty());

  let manifest = read_json(&ctx.cache_root.join("tsconfig.json"));
  assert_eq!(manifest["files"], json!([]));
  assert_eq!(
    manifest["references"],
    json!([
      { "path": paths["lib"].to_string_lossy() },
      { "path": paths["app"].to_string_lossy() },
    ])
  );
}

#[tokio::test]
async fn diagnostics_are_isolated_per_component() {
  let ws = TestWorkspace::new(&["x", "y"]);
  let logger = MemoryLogger::new();
  let mut compiler = ws.compiler(json!({}), &logger);
  let ctx = ws.context();
  let paths = compiler.pre_build(&ctx).await.unwrap().clone();

  let file = ws.package_dir("x").join("src/index.ts");
  let backend = ScriptedBackend::new(ScriptedGraph::new([
    ScriptedUnit::new(paths["x"].clone())
      .with_diagnostic(Diagnostic::scoped(&file, 1, 14, Some(2322), "Type 'number' is not assignable."))
      .with_diagnostic(Diagnostic::scoped(&file, 2, 1, Some(2304), "Cannot find name 'foo'.")),
    ScriptedUnit::new(paths["y"].clone()),
  ]));

  let result = compiler.build(&ctx, &backend).unwrap();

  assert_eq!(result.components_results.len(), 2);
  assert_eq!(result.components_results[0].id, "x");
  assert_eq!(result.components_results[0].errors.len(), 2);
  assert_eq!(result.components_results[1].id, "y");
  assert!(result.components_results[1].errors.is_empty());
  assert_eq!(logger.failures().len(), 2);
}

#[tokio::test]
async fn general_diagnostic_fails_the_whole_run() {
  let ws = TestWorkspace::new(&["x", "y"]);
  let logger = MemoryLogger::new();
  let mut compiler = ws.compiler(json!({}), &logger);
  let ctx = ws.context();
  let paths = compiler.pre_build(&ctx).await.unwrap().clone();

  let backend = ScriptedBackend::new(ScriptedGraph::new([
    ScriptedUnit::new(paths["x"].clone()),
    ScriptedUnit::new(paths["y"].clone()).with_diagnostic(Diagnostic::general(Some(5083), "Cannot read file.")),
  ]));

  let err = compiler.build(&ctx, &backend).unwrap_err();
  assert!(err.is_compilation_failure());
  assert_eq!(err.to_string(), "error TS5083: Cannot read file.");
}

#[tokio::test]
async fn unit_outside_workspace_is_fatal() {
  let ws = TestWorkspace::new(&["x"]);
  let logger = MemoryLogger::new();
  let mut compiler = ws.compiler(json!({}), &logger);
  let ctx = ws.context();
  compiler.pre_build(&ctx).await.unwrap();

  let backend = ScriptedBackend::new(ScriptedGraph::new([ScriptedUnit::new("/elsewhere/tsconfig.json")]));

  assert!(matches!(
    compiler.build(&ctx, &backend),
    Err(BuildError::UnknownUnit { .. })
  ));
}
