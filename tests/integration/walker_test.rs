use codemap::{
    core::walker::{self, Walker},
    error::{CodemapError, Result},
    models::config::{DepthPolicy, Settings},
    models::grammar::Grammar,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn create_typescript_project(base_dir: &Path) -> Result<()> {
    fs::create_dir_all(base_dir.join("src").join("components"))?;
    fs::write(
        base_dir.join("src").join("app.ts"),
        "import express from 'express';\nexport class App extends Base {\n  start() {}\n}\n",
    )?;
    fs::write(
        base_dir.join("src").join("components").join("Button.tsx"),
        "import React from 'react';\nexport function Button() {\n  return <button />;\n}\n",
    )?;
    fs::write(base_dir.join("src").join("types.d.ts"), "export interface Ambient {}\n")?;
    fs::write(base_dir.join("README.md"), "# readme\n")?;

    // Nothing below here may be reached
    let vendored = base_dir.join("node_modules").join("left-pad");
    fs::create_dir_all(&vendored)?;
    fs::write(vendored.join("index.js"), "export class LeftPad {}\n")?;
    fs::create_dir_all(base_dir.join("dist"))?;
    fs::write(base_dir.join("dist").join("app.js"), "export class Built {}\n")?;
    fs::create_dir_all(base_dir.join(".cache"))?;
    fs::write(base_dir.join(".cache").join("x.ts"), "export class Hidden {}\n")?;
    fs::create_dir_all(base_dir.join("src").join("generated"))?;
    fs::write(
        base_dir.join("src").join("generated").join("api.ts"),
        "export class Generated {}\n",
    )?;

    Ok(())
}

fn typescript_settings(root: &Path) -> Settings {
    Settings {
        root: root.to_path_buf(),
        grammar: Grammar::TypeScript,
        ..Settings::default()
    }
}

#[test]
fn test_walker_skips_default_and_configured_excludes() -> Result<()> {
    let temp_dir = tempdir()?;
    create_typescript_project(temp_dir.path())?;

    let mut settings = typescript_settings(temp_dir.path());
    settings.exclude = vec!["generated".to_string()];
    let model = Walker::new(settings)?.walk()?;

    let mut paths: Vec<&str> = model.files().map(|f| f.path.as_str()).collect();
    paths.sort();
    assert_eq!(paths, vec!["src/app.ts", "src/components/Button.tsx"]);

    let names: Vec<&str> = model
        .files()
        .flat_map(|f| f.types.iter().map(|t| t.name.as_str()))
        .collect();
    assert!(names.contains(&"App"));
    assert!(names.contains(&"Button"));
    for excluded in ["LeftPad", "Built", "Hidden", "Generated", "Ambient"] {
        assert!(!names.contains(&excluded), "{} should be excluded", excluded);
    }

    assert!(model.imports.contains("express"));
    assert!(model.imports.contains("react"));
    Ok(())
}

#[test]
fn test_walker_groups_typescript_by_directory() -> Result<()> {
    let temp_dir = tempdir()?;
    create_typescript_project(temp_dir.path())?;

    let model = Walker::new(typescript_settings(temp_dir.path()))?.walk()?;
    let groups: Vec<&str> = model.groups.keys().map(String::as_str).collect();
    assert_eq!(groups, vec!["src", "src/components", "src/generated"]);
    Ok(())
}

#[test]
fn test_walker_glob_exclude() -> Result<()> {
    let temp_dir = tempdir()?;
    create_typescript_project(temp_dir.path())?;

    let model = walker::walk(
        temp_dir.path(),
        Grammar::TypeScript,
        &["*.tsx".to_string(), "gen*".to_string()],
        DepthPolicy::Methods,
    )?;
    let paths: Vec<&str> = model.files().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["src/app.ts"]);
    Ok(())
}

#[test]
fn test_walker_csharp_namespaces() -> Result<()> {
    let temp_dir = tempdir()?;
    let base = temp_dir.path();
    fs::create_dir_all(base.join("Api"))?;
    fs::create_dir_all(base.join("bin").join("Debug"))?;
    fs::write(
        base.join("Api").join("OrdersController.cs"),
        "using Microsoft.AspNetCore.Mvc;\nnamespace Shop.Api;\npublic class OrdersController : ControllerBase\n{\n    public IActionResult List() => Ok();\n}\n",
    )?;
    fs::write(
        base.join("bin").join("Debug").join("Generated.cs"),
        "namespace Shop.Bin { public class Generated {} }\n",
    )?;

    let model = walker::walk(base, Grammar::CSharp, &[], DepthPolicy::Methods)?;
    assert_eq!(model.file_count(), 1);
    assert!(model.groups.contains_key("Shop.Api"));
    assert!(!model.groups.contains_key("Shop.Bin"));
    assert!(model.imports.contains("Microsoft.AspNetCore.Mvc"));
    Ok(())
}

#[test]
fn test_walker_records_skipped_python_files() -> Result<()> {
    let temp_dir = tempdir()?;
    let base = temp_dir.path();
    fs::write(base.join("good.py"), "class Good:\n    pass\n")?;
    fs::write(base.join("broken.py"), "def broken(:\n    pass\n")?;
    fs::create_dir_all(base.join("__pycache__"))?;
    fs::write(base.join("__pycache__").join("cached.py"), "class Cached:\n    pass\n")?;

    let model = walker::walk(base, Grammar::Python, &[], DepthPolicy::Methods)?;

    assert_eq!(model.file_count(), 1);
    assert_eq!(model.skipped.len(), 1);
    assert_eq!(model.skipped[0].path, "broken.py");
    Ok(())
}

#[test]
fn test_walker_missing_root_is_fatal() {
    let temp_dir = tempdir().unwrap();
    let missing = temp_dir.path().join("missing");

    match walker::walk(&missing, Grammar::Python, &[], DepthPolicy::Methods) {
        Err(err @ CodemapError::InvalidPath { .. }) => assert!(err.is_critical()),
        other => panic!("Expected InvalidPath error, got {:?}", other),
    }
}

#[test]
fn test_walker_depth_monotonicity() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(
        temp_dir.path().join("UserService.cs"),
        "namespace App {\n    public class UserService {\n        private int _count;\n        public void Load() {}\n        private void Reset() {}\n    }\n}\n",
    )?;

    let walk = |depth| walker::walk(temp_dir.path(), Grammar::CSharp, &[], depth);
    let classes = walk(DepthPolicy::Classes)?;
    let methods = walk(DepthPolicy::Methods)?;
    let full = walk(DepthPolicy::Full)?;

    assert_eq!(classes.type_count(), 1);
    assert_eq!(methods.type_count(), 1);
    assert_eq!(full.type_count(), 1);
    assert_eq!(classes.member_count(), 0);
    assert_eq!(methods.member_count(), 1);
    assert_eq!(full.member_count(), 3);
    Ok(())
}
