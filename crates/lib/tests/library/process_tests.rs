//! Full runs through the process backend with a stand-in compiler script.
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use serde_json::json;

use compbuild_lib::backend::CompilerBackend;
use compbuild_lib::backend::process::{ProcessBackend, ProcessSettings};
use compbuild_lib::logger::MemoryLogger;

use super::common::TestWorkspace;

/// A compiler that fails for any project whose config path contains `broken`.
fn fake_tsc(dir: &Path) -> PathBuf {
  let path = dir.join("fake-tsc");
  fs::write(
    &path,
    r#"#!/bin/sh
for last; do :; done
echo "$last" >> "$(dirname "$0")/invocations.log"
case "$last" in
  *broken*) echo "packages/broken/src/index.ts(1,7): error TS2322: Type 'number' is not assignable to type 'string'."; exit 2 ;;
esac
exit 0
"#,
  )
  .unwrap();
  fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
  path
}

fn backend(ws: &TestWorkspace) -> ProcessBackend {
  ProcessBackend::new(ProcessSettings {
    command: fake_tsc(&ws.root()).to_string_lossy().to_string(),
    args: vec!["--pretty".into(), "false".into()],
    working_dir: ws.root(),
  })
}

fn invocations(ws: &TestWorkspace) -> usize {
  fs::read_to_string(ws.root().join("invocations.log"))
    .map(|log| log.lines().count())
    .unwrap_or(0)
}

#[tokio::test]
async fn unchanged_components_are_skipped_on_rebuild() {
  let ws = TestWorkspace::new(&["lib", "app"]);
  let logger = MemoryLogger::new();
  let mut compiler = ws.compiler(json!({}), &logger);
  let ctx = ws.context();
  let backend = backend(&ws);

  compiler.pre_build(&ctx).await.unwrap();
  let first = compiler.build(&ctx, &backend).unwrap();
  assert_eq!(first.components_results.len(), 2);
  assert_eq!(invocations(&ws), 2);

  compiler.pre_build(&ctx).await.unwrap();
  let second = compiler.build(&ctx, &backend).unwrap();
  assert!(second.components_results.is_empty());
  assert_eq!(invocations(&ws), 2);

  ws.write_file("packages/app/src/index.ts", "export const name = 'changed';\n");
  compiler.pre_build(&ctx).await.unwrap();
  let third = compiler.build(&ctx, &backend).unwrap();
  let ids: Vec<_> = third.components_results.iter().map(|r| r.id.as_str()).collect();
  assert_eq!(ids, vec!["app"]);
}

#[tokio::test]
async fn compiler_errors_attach_to_failing_component() {
  let ws = TestWorkspace::new(&["ok", "broken"]);
  let logger = MemoryLogger::new();
  let mut compiler = ws.compiler(json!({}), &logger);
  let ctx = ws.context();

  compiler.pre_build(&ctx).await.unwrap();
  let result = compiler.build(&ctx, &backend(&ws)).unwrap();

  assert_eq!(result.total_errors(), 1);
  let broken = result.components_results.iter().find(|r| r.id == "broken").unwrap();
  assert!(broken.errors[0].contains("TS2322"));
  assert!(broken.errors[0].contains(&ws.package_dir("broken").join("src/index.ts").to_string_lossy().to_string()));

  // Failed components are never stamped, so they are retried
  let again = compiler.build(&ctx, &backend(&ws)).unwrap();
  let ids: Vec<_> = again.components_results.iter().map(|r| r.id.as_str()).collect();
  assert_eq!(ids, vec!["broken"]);
}

#[tokio::test]
async fn components_build_after_components_they_reference() {
  let ws = TestWorkspace::new(&["app", "lib"]);
  ws.write_file("packages/app/tsconfig.json", r#"{ "references": [{ "path": "../lib" }] }"#);
  ws.write_file("packages/lib/tsconfig.json", "{}");
  let logger = MemoryLogger::new();
  let mut compiler = ws.compiler(json!({}), &logger);
  let ctx = ws.context();
  let backend = backend(&ws);

  compiler.pre_build(&ctx).await.unwrap();
  let first = compiler.build(&ctx, &backend).unwrap();
  let ids: Vec<_> = first.components_results.iter().map(|r| r.id.as_str()).collect();
  assert_eq!(ids, vec!["lib", "app"]);
  assert_eq!(invocations(&ws), 2);

  // A rebuilt dependency rebuilds its dependents
  ws.write_file("packages/lib/src/index.ts", "export const name = 'changed';\n");
  compiler.pre_build(&ctx).await.unwrap();
  let second = compiler.build(&ctx, &backend).unwrap();
  let ids: Vec<_> = second.components_results.iter().map(|r| r.id.as_str()).collect();
  assert_eq!(ids, vec!["lib", "app"]);
}

#[test]
fn process_backend_reports_its_command() {
  let settings = ProcessSettings::default();
  assert_eq!(ProcessBackend::new(settings).name(), "tsc");
}
