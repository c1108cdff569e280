use std::fs;
use std::path::Path;

use conjure_checksum::{ChecksumSet, OutputFile, sha256_hex};
use conjure_core::ConjureDefinition;
use conjure_generator::{
    Generator, GeneratorError, OutputConfiguration, RunError, RunMode, run, verify,
};
use conjure_ir::{IrProvider, ProjectParam, ProjectParams};
use pretty_assertions::assert_eq;
use serde_json::json;

/// Writes one file per IR type: `<output_dir>/<name>.go` containing the type's
/// JSON, plus `server.go` when server generation is on.
struct TypeFileGenerator;

impl TypeFileGenerator {
    fn render(definition: &ConjureDefinition, config: &OutputConfiguration) -> Vec<(String, String)> {
        let mut files = definition
            .types
            .iter()
            .map(|ty| {
                let name = ty["name"].as_str().unwrap_or("unnamed").to_string();
                (format!("{name}.go"), format!("// generated\n{ty}\n"))
            })
            .collect::<Vec<_>>();
        if config.generate_server {
            files.push(("server.go".to_string(), "// server\n".to_string()));
        }
        files
    }
}

impl Generator for TypeFileGenerator {
    async fn generate(
        &self,
        definition: &ConjureDefinition,
        config: &OutputConfiguration,
    ) -> Result<(), GeneratorError> {
        fs::create_dir_all(&config.output_dir).expect("mkdir");
        for (name, content) in Self::render(definition, config) {
            fs::write(config.output_dir.join(name), content).expect("write");
        }
        Ok(())
    }

    async fn output_files(
        &self,
        definition: &ConjureDefinition,
        config: &OutputConfiguration,
    ) -> Result<Vec<OutputFile>, GeneratorError> {
        Ok(Self::render(definition, config)
            .into_iter()
            .map(|(name, content)| OutputFile::from_bytes(config.output_dir.join(name), content))
            .collect())
    }
}

struct FailingGenerator;

impl Generator for FailingGenerator {
    async fn generate(
        &self,
        _definition: &ConjureDefinition,
        _config: &OutputConfiguration,
    ) -> Result<(), GeneratorError> {
        Err(GeneratorError::Failed {
            command: "conjure-go".to_string(),
            output: "boom".to_string(),
        })
    }

    async fn output_files(
        &self,
        _definition: &ConjureDefinition,
        _config: &OutputConfiguration,
    ) -> Result<Vec<OutputFile>, GeneratorError> {
        Err(GeneratorError::Failed {
            command: "conjure-go".to_string(),
            output: "boom".to_string(),
        })
    }
}

fn write_ir(dir: &Path, file: &str, type_names: &[&str]) -> std::path::PathBuf {
    let types = type_names
        .iter()
        .map(|name| json!({ "name": name, "type": "object" }))
        .collect::<Vec<_>>();
    let path = dir.join(file);
    fs::write(
        &path,
        serde_json::to_vec(&json!({ "version": 1, "types": types })).expect("serialize"),
    )
    .expect("write IR");
    path
}

fn project(ir_path: std::path::PathBuf, output_dir: &str) -> ProjectParam {
    ProjectParam {
        output_dir: output_dir.into(),
        ir_provider: IrProvider::LocalFile { path: ir_path },
        publish: false,
        server: false,
    }
}

fn two_projects(project_dir: &Path) -> ProjectParams {
    [
        (
            "api".to_string(),
            project(write_ir(project_dir, "api.json", &["Pet", "Owner"]), "gen/api"),
        ),
        (
            "billing".to_string(),
            project(write_ir(project_dir, "billing.json", &["Invoice"]), "gen/billing"),
        ),
    ]
    .into_iter()
    .collect()
}

#[tokio::test]
async fn verify_after_generate_passes_and_prints_nothing() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = two_projects(temp.path());

    let mut out = Vec::new();
    run(&params, RunMode::Generate, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .expect("generate should succeed");
    assert!(temp.path().join("gen/api/Pet.go").is_file());

    run(&params, RunMode::Verify, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .expect("verify should pass");
    assert!(out.is_empty());
}

#[tokio::test]
async fn generating_twice_is_idempotent() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = two_projects(temp.path());
    let gen_dir = temp.path().join("gen");

    let mut out = Vec::new();
    run(&params, RunMode::Generate, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .expect("first generate");
    let first = ChecksumSet::for_directory(&gen_dir).expect("snapshot");
    run(&params, RunMode::Generate, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .expect("second generate");
    let second = ChecksumSet::for_directory(&gen_dir).expect("snapshot");

    assert!(first.diff(&second).is_empty());
}

#[tokio::test]
async fn drift_is_reported_per_project_and_fails() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = two_projects(temp.path());
    let mut out = Vec::new();
    run(&params, RunMode::Generate, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .expect("generate should succeed");

    let pet = temp.path().join("gen/api/Pet.go");
    let expected = fs::read(&pet).expect("read");
    fs::write(&pet, "// hand edited\n").expect("edit");
    fs::remove_file(temp.path().join("gen/billing/Invoice.go")).expect("remove");

    let err = run(&params, RunMode::Verify, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::VerifyFailed));
    assert_eq!(err.to_string(), "conjure verify failed");

    let report = String::from_utf8(out).expect("utf8 report");
    assert_eq!(
        report,
        format!(
            "Conjure output differs from what currently exists: [0 1]\n  0 api:\n    gen/api/Pet.go: checksum changed from {} to {}\n  1 billing:\n    gen/billing/Invoice.go: did not exist before, now exists\n",
            sha256_hex(b"// hand edited\n"),
            sha256_hex(&expected),
        )
    );
}

#[tokio::test]
async fn only_drifting_projects_are_listed() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = two_projects(temp.path());
    let mut out = Vec::new();
    run(&params, RunMode::Generate, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .expect("generate should succeed");
    fs::write(temp.path().join("gen/billing/Invoice.go"), "stale").expect("edit");

    let report = verify(&params, temp.path(), &TypeFileGenerator)
        .await
        .expect("verify should complete");
    let listed = report
        .failures()
        .iter()
        .map(|f| (f.index, f.key.as_str(), f.diff.len()))
        .collect::<Vec<_>>();
    assert_eq!(listed, vec![(1, "billing", 1)]);
}

#[tokio::test]
async fn verify_never_writes_output() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = two_projects(temp.path());

    let mut out = Vec::new();
    let err = run(&params, RunMode::Verify, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::VerifyFailed));
    assert!(!temp.path().join("gen").exists());
}

#[tokio::test]
async fn server_flag_reaches_the_generator() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let mut param = project(write_ir(temp.path(), "api.json", &["Pet"]), "gen");
    param.server = true;
    let params = [("api".to_string(), param)].into_iter().collect::<ProjectParams>();

    let mut out = Vec::new();
    run(&params, RunMode::Generate, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .expect("generate should succeed");
    assert!(temp.path().join("gen/server.go").is_file());
}

#[tokio::test]
async fn ir_failure_aborts_before_later_projects() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = [
        (
            "a-broken".to_string(),
            project(temp.path().join("missing.json"), "gen/broken"),
        ),
        (
            "b-fine".to_string(),
            project(write_ir(temp.path(), "fine.json", &["Pet"]), "gen/fine"),
        ),
    ]
    .into_iter()
    .collect::<ProjectParams>();

    let mut out = Vec::new();
    let err = run(&params, RunMode::Generate, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Ir { ref key, .. } if key == "a-broken"));
    assert!(!temp.path().join("gen/fine").exists());
}

#[tokio::test]
async fn invalid_ir_is_a_definition_error() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let ir = temp.path().join("api.json");
    fs::write(&ir, "types: {}").expect("write");
    let params = [("api".to_string(), project(ir, "gen"))]
        .into_iter()
        .collect::<ProjectParams>();

    let mut out = Vec::new();
    let err = run(&params, RunMode::Verify, temp.path(), &TypeFileGenerator, &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Definition { .. }));
}

#[tokio::test]
async fn generator_failure_aborts_verify() {
    let temp = tempfile::tempdir().expect("tempdir should create");
    let params = two_projects(temp.path());

    let mut out = Vec::new();
    let err = run(&params, RunMode::Verify, temp.path(), &FailingGenerator, &mut out)
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Generate { ref key, .. } if key == "api"));
    assert!(out.is_empty());
}
