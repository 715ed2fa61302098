//! Integration tests driving the real `sous` binary.
//!
//! Recipes are written under the temp workspace's `.sous/recipes/`
//! directory so no network or git binary is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sous() -> Command {
    Command::cargo_bin("sous").unwrap()
}

fn write_recipe(root: &Path, name: &str, manifest: &str) {
    let dir = root.join(".sous/recipes").join(name);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("recipe.toml"), manifest).unwrap();
}

#[test]
fn help_flag() {
    sous()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("recipes"))
        .stdout(predicate::str::contains("apply"));
}

#[test]
fn version_flag() {
    sous()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn init_creates_state() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();

    assert!(temp.path().join(".sous/config.toml").exists());
    assert!(temp.path().join(".sous/recipes").is_dir());
}

#[test]
fn init_twice_fails_with_config_exit_code() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn add_then_apply_generates_files() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();

    write_recipe(
        temp.path(),
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

    sous()
        .current_dir(temp.path())
        .args(["add", "editor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued 'editor'"));

    sous()
        .current_dir(temp.path())
        .arg("apply")
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied editor @ 1.0.0"));

    let generated = fs::read_to_string(temp.path().join(".editorconfig")).unwrap();
    assert_eq!(generated, "max_line_length = 80\n");
}

#[test]
fn apply_resolves_dependencies_in_order() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();

    write_recipe(
        temp.path(),
        "base",
        r#"
name    = "base"
version = "1.0.0"

[[generates]]
path    = "base.txt"
content = "base"
"#,
    );
    write_recipe(
        temp.path(),
        "app",
        r#"
name     = "app"
version  = "1.0.0"
requires = ["base"]

[[generates]]
path    = "app.txt"
content = "app"
"#,
    );

    sous()
        .current_dir(temp.path())
        .args(["add", "app"])
        .assert()
        .success();
    sous()
        .current_dir(temp.path())
        .arg("apply")
        .assert()
        .success();

    assert!(temp.path().join("base.txt").exists());
    assert!(temp.path().join("app.txt").exists());
}

#[test]
fn conflicting_recipes_abort_apply() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();

    write_recipe(
        temp.path(),
        "npm-lock",
        r#"
name      = "npm-lock"
version   = "1.0.0"
conflicts = ["yarn-lock"]

[[generates]]
path    = "n.txt"
content = "n"
"#,
    );
    write_recipe(
        temp.path(),
        "yarn-lock",
        r#"
name    = "yarn-lock"
version = "1.0.0"

[[generates]]
path    = "y.txt"
content = "y"
"#,
    );

    sous()
        .current_dir(temp.path())
        .args(["add", "npm-lock", "yarn-lock"])
        .assert()
        .success();

    sous()
        .current_dir(temp.path())
        .arg("apply")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("npm-lock"))
        .stderr(predicate::str::contains("yarn-lock"));

    assert!(!temp.path().join("n.txt").exists());
    assert!(!temp.path().join("y.txt").exists());
}

#[test]
fn add_unknown_recipe_fails_not_found() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();

    sous()
        .current_dir(temp.path())
        .args(["add", "./does/not/exist"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn list_shows_installed_and_pending() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();

    write_recipe(
        temp.path(),
        "editor",
        r#"
name    = "editor"
version = "1.0.0"

[[generates]]
path    = "e.txt"
content = "e"
"#,
    );

    sous()
        .current_dir(temp.path())
        .args(["add", "editor"])
        .assert()
        .success();
    sous()
        .current_dir(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("editor"))
        .stdout(predicate::str::contains("pending"));

    sous()
        .current_dir(temp.path())
        .arg("apply")
        .assert()
        .success();
    sous()
        .current_dir(temp.path())
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"installed\""))
        .stdout(predicate::str::contains("\"editor\""));
}

#[test]
fn validate_reports_check_results() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();

    write_recipe(
        temp.path(),
        "checked",
        r#"
name    = "checked"
version = "1.0.0"

[[generates]]
path    = "marker.txt"
content = "ready"

[[validates]]
check = "file_exists"
path  = "marker.txt"

[[validates]]
check  = "file_contains"
path   = "marker.txt"
needle = "ready"
"#,
    );

    sous()
        .current_dir(temp.path())
        .args(["add", "checked"])
        .assert()
        .success();
    sous()
        .current_dir(temp.path())
        .arg("apply")
        .assert()
        .success();
    sous()
        .current_dir(temp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed"));
}

#[test]
fn run_executes_recipe_command() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();

    write_recipe(
        temp.path(),
        "tools",
        r#"
name    = "tools"
version = "1.0.0"

[commands.hello]
run = "echo hello-from-recipe"
"#,
    );

    sous()
        .current_dir(temp.path())
        .args(["run", "tools", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello-from-recipe"));
}

#[test]
fn stack_expands_to_recipes() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["init", "demo"])
        .assert()
        .success();

    write_recipe(
        temp.path(),
        "fmt",
        r#"
name    = "fmt"
version = "1.0.0"

[variables.line_width]
type    = "number"
default = 80

[[generates]]
path    = "fmt.txt"
content = "{{ line_width }}"
"#,
    );
    write_recipe(
        temp.path(),
        "web-stack",
        r#"
name     = "web-stack"
version  = "1.0.0"
type     = "stack"
includes = ["fmt"]

[defaults.fmt]
line_width = 120
"#,
    );

    sous()
        .current_dir(temp.path())
        .args(["add", "web-stack"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Queued 'fmt'"));
    sous()
        .current_dir(temp.path())
        .arg("apply")
        .assert()
        .success();

    // Stack default overrode the declared default.
    assert_eq!(
        fs::read_to_string(temp.path().join("fmt.txt")).unwrap(),
        "120"
    );
}

#[test]
fn quiet_flag_suppresses_stdout() {
    let temp = TempDir::new().unwrap();
    sous()
        .current_dir(temp.path())
        .args(["-q", "init", "demo"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn shell_completions_generate() {
    sous()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}
