//! Smoke tests driving the `catalog` binary end to end

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary isolated from the caller's HOME, .env and DATABASE_URL
fn catalog(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("catalog").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG")
        .arg("--quiet");
    cmd
}

// === Help ===

#[test]
fn test_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    catalog(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("walkthrough"))
        .stdout(predicate::str::contains("--database-url"));
}

#[test]
fn test_products_help() {
    let home = TempDir::new().unwrap();
    catalog(&home)
        .arg("products")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("strictly above"));
}

// === Walkthrough ===

#[test]
fn test_walkthrough_in_memory() {
    let home = TempDir::new().unwrap();
    catalog(&home)
        .args(["--database-url", "sqlite::memory:", "walkthrough"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Criando Filiais\n"))
        .stdout(predicate::str::contains(
            "ID: 2, Nome: Monitor, Preco: 890.00, CategoriaID: 2",
        ))
        .stdout(predicate::str::contains("Nome: Mouse Razer, Preco: 160.00"))
        .stdout(predicate::str::contains("ID: 1, Nome: Mouse Razer, Serial: 12"))
        .stdout(predicate::str::contains("Produtos por Filial"));
}

#[test]
fn test_default_command_is_walkthrough() {
    let home = TempDir::new().unwrap();
    catalog(&home)
        .args(["--database-url", "sqlite::memory:"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Todos os Produtos com Numero Serial"));
}

#[test]
fn test_database_url_from_env() {
    let home = TempDir::new().unwrap();
    catalog(&home)
        .env("DATABASE_URL", "sqlite::memory:")
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("ID: 3, Nome: Placa mãe"));

    assert!(!home.path().join("catalog.db").exists());
}

// === File database ===

#[test]
fn test_seed_then_list_products_from_file() {
    let home = TempDir::new().unwrap();
    let url = format!("sqlite://{}", home.path().join("shop.db").display());

    catalog(&home).args(["--database-url", &url, "migrate"]).assert().success();
    catalog(&home).args(["--database-url", &url, "seed"]).assert().success();

    catalog(&home)
        .args([
            "--database-url",
            &url,
            "products",
            "--min-price",
            "500",
            "--with-serial",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nome: Notebook"))
        .stdout(predicate::str::contains("Serial: 41"))
        .stdout(predicate::str::contains("Mouse").not())
        .stdout(predicate::str::contains("Pagina 1/1 (3 produtos)"));

    catalog(&home)
        .args([
            "--database-url",
            &url,
            "products",
            "--per-page",
            "2",
            "--page",
            "3",
            "--format",
            "json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Teclado\""))
        .stdout(predicate::str::contains("\"total\": 5"));
}

// === Configuration ===

#[test]
fn test_config_file_supplies_database() {
    let home = TempDir::new().unwrap();
    let db = home.path().join("from-config.db");
    let config_path = home.path().join("catalog.toml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    writeln!(file, "[database]\nurl = \"sqlite://{}\"", db.display()).unwrap();

    catalog(&home)
        .arg("--config")
        .arg(&config_path)
        .arg("migrate")
        .assert()
        .success();

    assert!(db.exists());
}

#[test]
fn test_invalid_config_fails() {
    let home = TempDir::new().unwrap();
    let config_path = home.path().join("broken.toml");
    std::fs::write(&config_path, "[database\nurl = ").unwrap();

    catalog(&home)
        .arg("--config")
        .arg(&config_path)
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
