//! Tests for configuration layering

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::error::CodemapError;
    use crate::models::config::{DepthPolicy, OutputFormat};
    use crate::models::grammar::Grammar;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    // Every test uses its own prefix so parallel tests never see each other's variables

    #[test]
    fn test_env_config() {
        std::env::set_var("CODEMAP_T1_ROOT", "/env/path");
        std::env::set_var("CODEMAP_T1_GRAMMAR", "cs");
        std::env::set_var("CODEMAP_T1_EXCLUDE", "Migrations, generated,");
        std::env::set_var("CODEMAP_T1_QUIET", "true");

        let env_config = EnvConfig::new("CODEMAP_T1");
        assert!(env_config.is_available());

        let settings = env_config.load().unwrap();
        assert_eq!(settings.root, Some(PathBuf::from("/env/path")));
        assert_eq!(settings.grammar, Some(Grammar::CSharp));
        assert_eq!(
            settings.exclude,
            Some(vec!["Migrations".to_string(), "generated".to_string()])
        );
        assert_eq!(settings.quiet, Some(true));
        assert_eq!(settings.depth, None);

        std::env::remove_var("CODEMAP_T1_ROOT");
        std::env::remove_var("CODEMAP_T1_GRAMMAR");
        std::env::remove_var("CODEMAP_T1_EXCLUDE");
        std::env::remove_var("CODEMAP_T1_QUIET");
    }

    #[test]
    fn test_env_config_rejects_bad_value() {
        std::env::set_var("CODEMAP_T2_DEPTH", "deep");

        let result = EnvConfig::new("CODEMAP_T2").load();
        match result {
            Err(CodemapError::Config { message }) => assert!(message.contains("CODEMAP_T2_DEPTH")),
            other => panic!("Expected Config error, got {:?}", other),
        }

        std::env::remove_var("CODEMAP_T2_DEPTH");
    }

    #[test]
    fn test_env_config_rejects_unknown_grammar() {
        std::env::set_var("CODEMAP_T7_GRAMMAR", "cobol");

        match EnvConfig::new("CODEMAP_T7").load() {
            Err(CodemapError::Config { message }) => {
                assert!(message.contains("CODEMAP_T7_GRAMMAR"));
                assert!(message.contains("cobol"));
            }
            other => panic!("Expected Config error, got {:?}", other),
        }

        std::env::remove_var("CODEMAP_T7_GRAMMAR");
    }

    #[test]
    fn test_env_config_unavailable_without_variables() {
        assert!(!EnvConfig::new("CODEMAP_T3_UNSET").is_available());
    }

    #[test]
    fn test_file_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("codemap.toml");
        fs::write(&config_path, "grammar = \"typescript\"\ndepth = \"classes\"\n").unwrap();

        let file_config = FileConfig::with_path(&config_path);
        assert!(file_config.is_available());
        assert_eq!(file_config.priority(), 20);

        let settings = file_config.load().unwrap();
        assert_eq!(settings.grammar, Some(Grammar::TypeScript));
        assert_eq!(settings.depth, Some(DepthPolicy::Classes));
    }

    #[test]
    fn test_missing_file_config() {
        let file_config = FileConfig::with_path("/nonexistent/.codemap.toml");
        assert!(!file_config.is_available());
        assert!(matches!(file_config.load(), Err(CodemapError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_create_default_through_file_config() {
        let temp_dir = tempdir().unwrap();
        let file_config = FileConfig::with_path(temp_dir.path().join(DEFAULT_CONFIG_FILE));

        file_config.create_default().unwrap();
        assert!(file_config.path().exists());
        assert_eq!(file_config.load().unwrap(), PartialSettings::default());
    }

    #[test]
    fn test_config_builder_precedence() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().to_path_buf();
        let config_path = temp_dir.path().join("codemap.toml");
        fs::write(
            &config_path,
            format!(
                "root = {:?}\ngrammar = \"csharp\"\ndepth = \"full\"\noutput_format = \"json\"\n",
                root.display().to_string()
            ),
        )
        .unwrap();

        std::env::set_var("CODEMAP_T4_DEPTH", "classes");

        let cli = CliConfig::new(CliArgs {
            output_format: Some(OutputFormat::Csv),
            ..Default::default()
        });

        let settings = ConfigBuilder::new()
            .add_config_file(&config_path)
            .unwrap()
            .load_from(&EnvConfig::new("CODEMAP_T4"))
            .unwrap()
            .load_from(&cli)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(settings.root, root);
        assert_eq!(settings.grammar, Grammar::CSharp);
        assert_eq!(settings.depth, DepthPolicy::Classes);
        assert_eq!(settings.output_format, OutputFormat::Csv);

        std::env::remove_var("CODEMAP_T4_DEPTH");
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let result = ConfigBuilder::new().add_config_file(std::path::Path::new("/nonexistent/codemap.toml"));
        assert!(matches!(result, Err(CodemapError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_try_load_from_ignores_failures() {
        std::env::set_var("CODEMAP_T5_GRAMMAR", "cobol");

        let settings = ConfigBuilder::new()
            .try_load_from(&EnvConfig::new("CODEMAP_T5"))
            .merge(PartialSettings {
                root: Some(std::env::temp_dir()),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(settings.grammar, Grammar::Python);

        std::env::remove_var("CODEMAP_T5_GRAMMAR");
    }

    #[test]
    fn test_load_config_with_explicit_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.toml");
        fs::write(&config_path, "depth = \"full\"\nexclude = [\"stories\"]\n").unwrap();

        let cli_args = CliArgs {
            root: Some(temp_dir.path().to_path_buf()),
            grammar: Some(Grammar::TypeScript),
            config: Some(config_path),
            quiet: true,
            ..Default::default()
        };

        let settings = load_config_with_env_prefix(cli_args, "CODEMAP_T6").unwrap();
        assert_eq!(settings.grammar, Grammar::TypeScript);
        assert_eq!(settings.depth, DepthPolicy::Full);
        assert_eq!(settings.exclude, vec!["stories".to_string()]);
        assert!(settings.quiet);
    }

    #[test]
    fn test_validation_errors() {
        let missing_root = PartialSettings {
            root: Some(PathBuf::from("/nonexistent/codemap/root")),
            ..Default::default()
        };
        assert!(matches!(
            ConfigBuilder::new().merge(missing_root).build(),
            Err(CodemapError::InvalidPath { .. })
        ));

        let bad_output = PartialSettings {
            root: Some(std::env::temp_dir()),
            output_file: Some(PathBuf::from("/nonexistent/dir/map.md")),
            ..Default::default()
        };
        assert!(matches!(
            ConfigBuilder::new().merge(bad_output).build(),
            Err(CodemapError::OutputDirectoryNotFound { .. })
        ));

        let bad_pattern = PartialSettings {
            root: Some(std::env::temp_dir()),
            exclude: Some(vec!["[unclosed".to_string()]),
            ..Default::default()
        };
        assert!(ConfigBuilder::new().merge(bad_pattern).build().is_err());
    }

    #[test]
    fn test_relative_output_file_is_valid() {
        let settings = PartialSettings {
            root: Some(std::env::temp_dir()),
            output_file: Some(PathBuf::from("map.md")),
            ..Default::default()
        };
        assert!(ConfigBuilder::new().merge(settings).build().is_ok());
    }
}
