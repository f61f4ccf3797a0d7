//! Test fixtures and constants.

/// Key file name used by every fixture project.
pub const KEY_FILE: &str = "vault.key";

/// Sample plaintext secrets.
pub const APP_ENV: &str = "DATABASE_URL=postgres://localhost/mydb\nAPI_KEY=sk-test-12345\n";
pub const DB_ENV: &str = "PGPASSWORD=hunter2\n";

/// `.vaulttool.toml` contents using the age backend and `vault.key`.
pub fn config_toml(include: &[&str], exclude: &[&str]) -> String {
    format!(
        r#"include_directories = ["."]
exclude_directories = ["node_modules"]
include_patterns = {}
exclude_patterns = {}

[options]
key_file = "{}"
backend = "age"
"#,
        toml_list(include),
        toml_list(exclude),
        KEY_FILE
    )
}

fn toml_list(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("\"{}\"", s)).collect();
    format!("[{}]", quoted.join(", "))
}
