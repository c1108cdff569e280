use std::fs;
use std::path::Path;
use std::sync::Arc;

use conjure_config::{
    ConfigError, ConjurePluginConfig, IrLocatorConfig, LocatorType, ProductDependencyConfig,
    ProviderContext, SingleConjureConfig,
};
use conjure_core::StaticVersion;
use conjure_ir::{Compiler, IrProvider, ProjectParam, ProjectParams, ProviderKind};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn context(project_dir: &Path) -> ProviderContext {
    let client = reqwest::Client::new();
    ProviderContext {
        project_dir: project_dir.to_path_buf(),
        compiler: Arc::new(Compiler::on_path(client.clone())),
        client,
        versions: Arc::new(StaticVersion("1.2.3".to_string())),
    }
}

fn parse(yaml: &str) -> ConjurePluginConfig {
    ConjurePluginConfig::from_yaml(yaml.as_bytes()).expect("config should parse")
}

fn project<'a>(params: &'a ProjectParams, key: &str) -> &'a ProjectParam {
    params
        .ordered()
        .find_map(|(k, param)| (k == key).then_some(param))
        .expect("project param")
}

fn locator(locator_type: LocatorType, locator: &str) -> IrLocatorConfig {
    IrLocatorConfig {
        locator_type,
        locator: locator.to_string(),
        product_dependencies: Vec::new(),
    }
}

#[test]
fn string_locator_is_auto() {
    let config = parse(
        r"
projects:
  project:
    output-dir: outputDir
    ir-locator: local/yaml-dir
",
    );
    assert_eq!(
        config.projects["project"],
        SingleConjureConfig {
            output_dir: "outputDir".to_string(),
            ir_locator: locator(LocatorType::Auto, "local/yaml-dir"),
            publish: None,
            server: false,
        }
    );
}

#[test]
fn full_locator_with_dependencies() {
    let config = parse(
        r#"
version: 1
projects:
  project:
    output-dir: outputDir
    ir-locator:
      type: yaml
      locator: explicit/yaml-dir
      product-dependencies:
        - product-group: com.palantir.foo
          product-name: foo-service
          minimum-version: "{{ProjectVersion}}"
          maximum-version: "{{ProjectVersion.Major}}.x.x"
    publish: false
    server: true
"#,
    );
    let project = &config.projects["project"];
    assert_eq!(project.ir_locator.locator_type, LocatorType::Yaml);
    assert_eq!(project.ir_locator.locator, "explicit/yaml-dir");
    assert_eq!(project.publish, Some(false));
    assert!(project.server);
    assert_eq!(
        project.ir_locator.product_dependencies,
        vec![ProductDependencyConfig {
            product_group: "com.palantir.foo".to_string(),
            product_name: "foo-service".to_string(),
            minimum_version: "{{ProjectVersion}}".to_string(),
            maximum_version: "{{ProjectVersion.Major}}.x.x".to_string(),
            recommended_version: String::new(),
        }]
    );
}

#[rstest]
#[case::unknown_project_key("projects:\n  p:\n    output-dir: out\n    ir-locator: a.yml\n    extra: 1\n")]
#[case::unknown_top_level_key("projects: {}\nlegacy: true\n")]
#[case::unknown_locator_key("projects:\n  p:\n    ir-locator:\n      locator: a.yml\n      kind: yaml\n")]
#[case::unknown_locator_type("projects:\n  p:\n    ir-locator:\n      type: grpc\n      locator: a.yml\n")]
fn strict_parsing_rejects(#[case] yaml: &str) {
    let err = ConjurePluginConfig::from_yaml(yaml.as_bytes()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "{err}");
}

#[test]
fn unsupported_version_is_rejected() {
    let err = ConjurePluginConfig::from_yaml(b"version: 2\nprojects: {}\n").unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedVersion { ref version } if version == "2"));
}

#[test]
fn empty_file_has_no_projects() {
    let config = ConjurePluginConfig::from_yaml(b"\n").expect("empty config");
    assert!(config.projects.is_empty());
}

#[test]
fn yaml_locator_defaults_to_publish() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = parse("projects:\n  project:\n    output-dir: out\n    ir-locator: dir/api.yml\n")
        .to_params(&context(temp.path()))
        .expect("params");

    let param = project(&params, "project");
    assert!(param.publish);
    assert_eq!(param.output_dir, Path::new("out"));
    match &param.ir_provider {
        IrProvider::LocalYaml { path, .. } => assert_eq!(path, &temp.path().join("dir/api.yml")),
        other => panic!("expected YAML provider, got {other:?}"),
    }
}

#[test]
fn remote_locator_defaults_to_not_publish() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = parse("projects:\n  project:\n    output-dir: out\n    ir-locator: http://foo.com/ir.json\n")
        .to_params(&context(temp.path()))
        .expect("params");

    let param = project(&params, "project");
    assert!(!param.publish);
    assert_eq!(param.ir_provider.kind(), ProviderKind::Remote);
    assert_eq!(param.ir_provider.locator(), "http://foo.com/ir.json");
}

#[rstest]
#[case::remote_forced_on(
    "    ir-locator: http://foo.com/ir.json\n    publish: true\n",
    true
)]
#[case::yaml_forced_off("    ir-locator: local/yaml-dir\n    publish: false\n", false)]
fn explicit_publish_wins(#[case] project_yaml: &str, #[case] want: bool) {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let yaml = format!("projects:\n  project:\n    output-dir: out\n{project_yaml}");
    let params = parse(&yaml).to_params(&context(temp.path())).expect("params");
    assert_eq!(project(&params, "project").publish, want);
}

#[rstest]
#[case::url_with_scheme("http://foo.com/ir.json", LocatorType::Remote)]
#[case::host_port_parses_as_scheme("localhost:8080/ir.json", LocatorType::Remote)]
#[case::yml_suffix("input.yml", LocatorType::Yaml)]
#[case::uppercase_yaml_suffix("API.YAML", LocatorType::Yaml)]
#[case::json_suffix("local/nonexistent-ir-file.json", LocatorType::IrFile)]
#[case::missing_directory("local/yaml-dir", LocatorType::Yaml)]
fn auto_locator_inference(#[case] value: &str, #[case] want: LocatorType) {
    let temp = tempfile::tempdir().expect("tempdir should create");
    assert_eq!(
        locator(LocatorType::Auto, value).resolved_type(temp.path()),
        want
    );
}

#[test]
fn existing_extensionless_file_is_an_ir_file() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    fs::write(temp.path().join("api-ir"), "{}").expect("write");
    fs::create_dir(temp.path().join("api-dir")).expect("mkdir");

    assert_eq!(
        locator(LocatorType::Auto, "api-ir").resolved_type(temp.path()),
        LocatorType::IrFile
    );
    assert_eq!(
        locator(LocatorType::Auto, "api-dir").resolved_type(temp.path()),
        LocatorType::Yaml
    );
}

#[test]
fn explicit_type_is_not_inferred() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    assert_eq!(
        locator(LocatorType::IrFile, "http://foo.com/ir.json").resolved_type(temp.path()),
        LocatorType::IrFile
    );
}

#[test]
fn empty_locator_is_an_error() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let err = parse("projects:\n  broken:\n    output-dir: out\n    ir-locator: \"\"\n")
        .to_params(&context(temp.path()))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to convert configuration for broken to provider: locator cannot be empty"
    );
}

#[test]
fn params_are_sorted_by_key() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = parse(
        "projects:\n  zulu:\n    ir-locator: z.yml\n  alpha:\n    ir-locator: a.yml\n  mike:\n    ir-locator: m.json\n",
    )
    .to_params(&context(temp.path()))
    .expect("params");
    assert_eq!(params.keys(), ["alpha", "mike", "zulu"]);
}

#[test]
fn product_dependencies_attach_to_yaml_provider() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = parse(
        r#"
projects:
  api:
    output-dir: out
    ir-locator:
      locator: api.yml
      product-dependencies:
        - product-group: com.palantir.foo
          product-name: foo
          minimum-version: "{{ProjectVersion}}"
          maximum-version: "{{ProjectVersion.Major}}.x.x"
          recommended-version: "1.2.0"
"#,
    )
    .to_params(&context(temp.path()))
    .expect("params");

    match &project(&params, "api").ir_provider {
        IrProvider::LocalYaml {
            product_dependencies: Some(deps),
            ..
        } => {
            let rendered = deps.render_all().expect("dependencies render");
            assert_eq!(rendered[0].minimum_version, "1.2.3");
            assert_eq!(rendered[0].maximum_version, "1.x.x");
            assert_eq!(rendered[0].recommended_version, "1.2.0");
        }
        other => panic!("expected YAML provider with dependencies, got {other:?}"),
    }
}

#[test]
fn reads_config_from_file() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let path = temp.path().join("conjure-plugin.yml");
    fs::write(&path, "projects:\n  api:\n    ir-locator: api.yml\n").expect("write");

    let config = ConjurePluginConfig::from_file(&path).expect("read");
    assert_eq!(config.projects.len(), 1);

    let err = ConjurePluginConfig::from_file(&temp.path().join("missing.yml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
