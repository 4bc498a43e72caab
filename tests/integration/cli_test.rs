use clap::Parser;
use codemap::{
    cli::{args::Args, Command, Commands},
    config::{load_config_with_env_prefix, CliArgs},
    models::config::{DepthPolicy, OutputFormat},
    models::grammar::Grammar,
};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_cli_map_parsing() {
    let args = Args::parse_from([
        "codemap", "map", "--lang", "cs", "--root", "/test/path", "--exclude", "Migrations", "--exclude", "Tests",
        "--format", "csv", "--output", "map.csv", "--no-progress",
    ]);

    let Commands::Map(map) = &args.command else {
        panic!("expected map command");
    };
    let cli_args = CliArgs::from(map);
    assert_eq!(cli_args.grammar, Some(Grammar::CSharp));
    assert_eq!(cli_args.root, Some(PathBuf::from("/test/path")));
    assert_eq!(
        cli_args.exclude,
        Some(vec!["Migrations".to_string(), "Tests".to_string()])
    );
    assert_eq!(cli_args.output_format, Some(OutputFormat::Csv));
    assert_eq!(cli_args.output_file, Some(PathBuf::from("map.csv")));
    assert!(cli_args.no_progress);

    assert!(matches!(Command::from_args(args), Command::Map(_)));
}

#[test]
fn test_cli_rejects_unknown_language() {
    assert!(Args::try_parse_from(["codemap", "map", "--lang", "cobol"]).is_err());
}

#[test]
fn test_cli_requires_subcommand() {
    assert!(Args::try_parse_from(["codemap"]).is_err());
}

#[test]
fn test_cli_flags_override_config_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("codemap.toml");
    fs::write(
        &config_path,
        "grammar = \"python\"\ndepth = \"classes\"\noutput_format = \"json\"\nuse_colors = true\n",
    )
    .unwrap();

    let root = temp_dir.path().display().to_string();
    let config = config_path.display().to_string();
    let args = Args::parse_from([
        "codemap", "map", "--root", &root, "--config", &config, "--depth", "full", "--no-colors",
    ]);
    let Commands::Map(map) = &args.command else {
        panic!("expected map command");
    };

    let settings = load_config_with_env_prefix(CliArgs::from(map), "CODEMAP_CLI_TEST").unwrap();
    assert_eq!(settings.grammar, Grammar::Python);
    assert_eq!(settings.depth, DepthPolicy::Full);
    assert_eq!(settings.output_format, OutputFormat::Json);
    assert!(!settings.use_colors);
}

#[test]
fn test_init_writes_default_config() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join(".codemap.toml");
    let path_arg = path.display().to_string();

    let command = Command::from_args(Args::parse_from(["codemap", "init", "--path", &path_arg]));
    command.execute().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("# grammar = \"python\""));

    // A second run without --force leaves the file alone
    fs::write(&path, "depth = \"full\"\n").unwrap();
    command.execute().unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "depth = \"full\"\n");
}
