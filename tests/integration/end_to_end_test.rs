use codemap::{
    cli::commands::{generate_map, MapRun},
    error::Result,
    models::config::{DepthPolicy, OutputFormat, Settings},
    models::grammar::Grammar,
    output::{render, ProgressReporter},
    AggregateModel,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run(root: &Path, grammar: Grammar, depth: DepthPolicy, format: OutputFormat) -> Result<MapRun> {
    let settings = Settings {
        root: root.to_path_buf(),
        grammar,
        depth,
        output_format: format,
        ..Settings::default()
    };
    generate_map(&settings, &ProgressReporter::hidden())
}

#[test]
fn test_empty_root_renders_title_and_zero_stats() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("empty");
    fs::create_dir(&root)?;

    let map = run(&root, Grammar::CSharp, DepthPolicy::Methods, OutputFormat::Text)?;
    assert_eq!(map.output, "### C#: empty/\n\n<!-- C#: 0 files, 0 types, 0 members -->\n");
    assert!(map.frameworks.is_empty());
    Ok(())
}

#[test]
fn test_python_frameworks_listed_once() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("svc");
    fs::create_dir_all(root.join("api"))?;
    fs::write(root.join("main.py"), "import fastapi\nfrom pydantic.main import BaseModel\n")?;
    fs::write(
        root.join("api").join("routes.py"),
        "from fastapi import APIRouter\nimport pydantic\n\nasync def list_items():\n    return []\n",
    )?;

    let map = run(&root, Grammar::Python, DepthPolicy::Methods, OutputFormat::Text)?;
    assert_eq!(map.frameworks, vec!["FastAPI", "Pydantic"]);
    assert_eq!(map.output.matches("FastAPI").count(), 1);
    assert!(map.output.starts_with("### Python: svc/\n**Frameworks detected:** FastAPI, Pydantic\n"));
    assert!(map.output.contains("Functions: async list_items()"));
    Ok(())
}

#[test]
fn test_typescript_map_lists_exported_types() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path().join("web");
    fs::create_dir_all(root.join("src"))?;
    fs::write(
        root.join("src").join("foo.ts"),
        "class Foo extends Bar { public void Baz() {} private void Hidden() {} }\nexport class Shown {\n  run() {}\n}\n",
    )?;

    let methods = run(&root, Grammar::TypeScript, DepthPolicy::Methods, OutputFormat::Text)?;
    assert!(methods.output.contains("`Shown` → run()"));
    assert!(!methods.output.contains("`Foo`"));

    let foo = methods
        .model
        .files()
        .flat_map(|f| f.types.iter())
        .find(|t| t.name == "Foo")
        .expect("Foo is still modelled");
    assert_eq!(foo.bases, vec!["Bar"]);
    let members: Vec<&str> = foo.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(members, vec!["Baz()"]);
    Ok(())
}

#[test]
fn test_rendering_is_stable_across_runs() -> Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    fs::write(root.join("b.py"), "class B:\n    def go(self):\n        pass\n")?;
    fs::write(root.join("a.py"), "class A:\n    pass\n")?;

    let first = run(root, Grammar::Python, DepthPolicy::Full, OutputFormat::Text)?;
    let second = run(root, Grammar::Python, DepthPolicy::Full, OutputFormat::Text)?;
    assert_eq!(first.output, second.output);
    assert_eq!(
        render(&first.model, &first.root_label, &first.frameworks),
        first.output
    );
    assert!(first.output.find("`a.py`").unwrap() < first.output.find("`b.py`").unwrap());
    Ok(())
}

#[test]
fn test_json_output_parses() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(
        temp_dir.path().join("Program.cs"),
        "namespace Demo { public class Program { public static void Main() {} } }\n",
    )?;

    let map = run(temp_dir.path(), Grammar::CSharp, DepthPolicy::Methods, OutputFormat::Json)?;
    let value: serde_json::Value = serde_json::from_str(&map.output).unwrap();
    assert_eq!(value["label"], "C#");
    assert_eq!(value["stats"]["types"], 1);
    assert_eq!(value["groups"]["Demo"][0]["types"][0]["name"], "Program");
    Ok(())
}

#[test]
fn test_csv_output_has_header_and_rows() -> Result<()> {
    let temp_dir = tempdir()?;
    fs::write(temp_dir.path().join("models.py"), "class User:\n    pass\n\nclass Order:\n    pass\n")?;

    let map = run(temp_dir.path(), Grammar::Python, DepthPolicy::Classes, OutputFormat::Csv)?;
    let lines: Vec<&str> = map.output.lines().collect();
    assert_eq!(lines[0], "group,file,type,kind,bases,members,exported");
    assert_eq!(lines.len(), 3);
    Ok(())
}

#[test]
fn test_empty_model_stats() {
    let model = AggregateModel::new(Grammar::TypeScript);
    let stats = model.stats();
    assert_eq!((stats.files, stats.types, stats.members), (0, 0, 0));
}
