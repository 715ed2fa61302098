//! End-to-end tests wiring the real adapters into the core services:
//! init → add → apply against a temporary directory, driven through the
//! same ports the CLI uses.

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use sous_adapters::{
    LocalFilesystem, MemoryFetcher, ShellRunner, TomlManifestParser, TomlStateStore,
};
use sous_core::application::{
    ApplyService, GenerationEngine, ManifestLoader, ValidationService,
    ports::StateStore,
};
use sous_core::domain::{DEFAULT_BRANCH, DEFAULT_REGISTRY};

fn service_for(fetcher: MemoryFetcher) -> ApplyService {
    let filesystem = Arc::new(LocalFilesystem::new());
    let loader = ManifestLoader::new(
        filesystem.clone(),
        Arc::new(TomlManifestParser::new()),
        Arc::new(fetcher),
        None,
    );
    let engine = GenerationEngine::new(filesystem, Arc::new(ShellRunner::new()));
    ApplyService::new(loader, engine, Arc::new(TomlStateStore::new()))
}

fn write_recipe(root: &Path, name: &str, manifest: &str) {
    let dir = root.join(".sous/recipes").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("recipe.toml"), manifest).unwrap();
}

#[test]
fn full_workflow_generates_and_persists() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let worktree = root.join("main");
    std::fs::create_dir_all(&worktree).unwrap();

    let service = service_for(MemoryFetcher::new());
    service.init(root, "demo").unwrap();

    write_recipe(
        root,
        "editor",
        r#"
name    = "editor"
version = "1.0.0"

[variables.line_width]
type    = "number"
default = 80

[[generates]]
path    = ".editorconfig"
content = "max_line_length = {{ line_width }}\n"
"#,
    );

    write_recipe(
        root,
        "gitignore",
        r#"
name     = "gitignore"
version  = "1.0.0"
requires = ["editor"]

[[generates]]
path   = ".gitignore"
append = "target/\n"
"#,
    );

    service.add(root, &["gitignore".to_string()]).unwrap();
    let report = service.apply(root, &worktree, "demo").unwrap();

    // Dependency order: editor before gitignore.
    let names: Vec<&str> = report.applied.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["editor", "gitignore"]);

    assert_eq!(
        std::fs::read_to_string(worktree.join(".editorconfig")).unwrap(),
        "max_line_length = 80\n"
    );
    assert_eq!(
        std::fs::read_to_string(worktree.join(".gitignore")).unwrap(),
        "target/\n"
    );

    // Config and lock both landed on disk.
    let store = TomlStateStore::new();
    let config = store.load_config(root).unwrap().unwrap();
    assert!(config.pending.is_empty());
    assert!(config.is_installed("editor"));
    assert!(config.is_installed("gitignore"));
    let lock = store.load_lock(root).unwrap().unwrap();
    assert_eq!(lock.recipes, config.recipes);
}

#[test]
fn reapply_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let worktree = root.join("main");
    std::fs::create_dir_all(&worktree).unwrap();

    let service = service_for(MemoryFetcher::new());
    service.init(root, "demo").unwrap();

    write_recipe(
        root,
        "gitignore",
        r#"
name    = "gitignore"
version = "1.0.0"

[[generates]]
path   = ".gitignore"
append = "target/\n"
"#,
    );

    service.add(root, &["gitignore".to_string()]).unwrap();
    service.apply(root, &worktree, "demo").unwrap();

    // Adding again is a no-op: the recipe is already installed.
    let outcome = service.add(root, &["gitignore".to_string()]).unwrap();
    assert_eq!(outcome.already_present, vec!["gitignore"]);
    assert!(service.apply(root, &worktree, "demo").unwrap().is_noop());

    // Force a re-application to exercise the append idempotence guard.
    let store = TomlStateStore::new();
    let mut config = store.load_config(root).unwrap().unwrap();
    config.recipes.clear();
    config.pending.push("gitignore".into());
    store.save_config(root, &config).unwrap();
    service.apply(root, &worktree, "demo").unwrap();

    let content = std::fs::read_to_string(worktree.join(".gitignore")).unwrap();
    assert_eq!(content.matches("target/").count(), 1);
}

#[test]
fn template_and_hooks_run_against_real_disk() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let worktree = root.join("main");
    std::fs::create_dir_all(&worktree).unwrap();

    let service = service_for(MemoryFetcher::new());
    service.init(root, "demo").unwrap();

    write_recipe(
        root,
        "ci",
        r#"
name    = "ci"
version = "1.0.0"

[[generates]]
path     = "ci.yml"
template = "ci.yml.tmpl"

[hooks]
post_apply = ["touch hook-ran"]
"#,
    );
    std::fs::write(
        root.join(".sous/recipes/ci/ci.yml.tmpl"),
        "project: {{ project_name }}\n",
    )
    .unwrap();

    service.add(root, &["ci".to_string()]).unwrap();
    service.apply(root, &worktree, "demo").unwrap();

    assert_eq!(
        std::fs::read_to_string(worktree.join("ci.yml")).unwrap(),
        "project: demo\n"
    );
    // The post_apply hook ran in the worktree.
    assert!(worktree.join("hook-ran").exists());
}

#[test]
fn remote_recipe_loads_through_fetcher() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let worktree = root.join("main");
    std::fs::create_dir_all(&worktree).unwrap();

    // Simulate the registry checkout on disk.
    let registry = TempDir::new().unwrap();
    let recipe_dir = registry.path().join("remote-lint");
    std::fs::create_dir_all(&recipe_dir).unwrap();
    std::fs::write(
        recipe_dir.join("recipe.toml"),
        r#"
name    = "remote-lint"
version = "0.2.0"

[[generates]]
path    = "lint.txt"
content = "linted"
"#,
    )
    .unwrap();

    let fetcher = MemoryFetcher::new();
    fetcher.insert(DEFAULT_REGISTRY, DEFAULT_BRANCH, registry.path());

    let service = service_for(fetcher);
    service.init(root, "demo").unwrap();

    // A bare name resolves against the default registry.
    service.add(root, &["remote-lint".to_string()]).unwrap();
    service.apply(root, &worktree, "demo").unwrap();

    assert_eq!(
        std::fs::read_to_string(worktree.join("lint.txt")).unwrap(),
        "linted"
    );
}

#[test]
fn validation_checks_run_against_generated_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let worktree = root.join("main");
    std::fs::create_dir_all(&worktree).unwrap();

    let filesystem = Arc::new(LocalFilesystem::new());
    let loader = ManifestLoader::new(
        filesystem.clone(),
        Arc::new(TomlManifestParser::new()),
        Arc::new(MemoryFetcher::new()),
        None,
    );
    let engine = GenerationEngine::new(filesystem.clone(), Arc::new(ShellRunner::new()));
    let service = ApplyService::new(loader, engine, Arc::new(TomlStateStore::new()));

    service.init(root, "demo").unwrap();
    write_recipe(
        root,
        "checked",
        r#"
name    = "checked"
version = "1.0.0"

[[generates]]
path    = "package.json"
merge   = { scripts = { test = "jest" } }

[[validates]]
check = "file_exists"
path  = "package.json"

[[validates]]
check   = "json_field"
path    = "package.json"
pointer = "/scripts/test"
equals  = "jest"

[[validates]]
check = "command_succeeds"
run   = "test -f package.json"
"#,
    );

    service.add(root, &["checked".to_string()]).unwrap();
    service.apply(root, &worktree, "demo").unwrap();

    let loaded = service.loader().load("checked", Some(root)).unwrap().unwrap();
    let validator = ValidationService::new(
        Arc::new(LocalFilesystem::new()),
        Arc::new(ShellRunner::new()),
    );
    let report = validator.validate(&loaded, &worktree).unwrap();
    assert!(report.passed(), "failing checks: {:?}", report.results);
}
