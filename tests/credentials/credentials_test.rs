//! Coverage for credential loading, permission checks and persona keys.

use std::fs;
use std::path::PathBuf;

use bizprofile::config::AiConfig;
use bizprofile::credentials::{
    enforce_private_file_permissions, load_credentials, load_optional_credentials, Credentials,
    PersonaKeys,
};

fn temp_env_path() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bizprofile_test_{}", uuid::Uuid::new_v4()));
    let create = fs::create_dir_all(&dir);
    assert!(create.is_ok());
    dir.join(".env")
}

#[test]
fn loads_env_credentials() {
    let env_path = temp_env_path();
    let write = fs::write(
        &env_path,
        "BIZPROFILE_BACKEND_KEY=anon\nBIZPROFILE_SALES_API_KEY=sales123\n",
    );
    assert!(write.is_ok());
    let perms = enforce_private_file_permissions(&env_path);
    assert!(perms.is_ok());

    let loaded = load_credentials(&env_path);
    let credentials = match loaded {
        Ok(credentials) => credentials,
        Err(err) => panic!("credentials should load: {err}"),
    };

    assert_eq!(credentials.get("BIZPROFILE_BACKEND_KEY"), Some("anon"));
    assert_eq!(credentials.get("BIZPROFILE_SALES_API_KEY"), Some("sales123"));
    assert!(!format!("{credentials:?}").contains("sales123"));
}

#[cfg(unix)]
#[test]
fn rejects_world_readable_env_file() {
    use std::os::unix::fs::PermissionsExt;

    let env_path = temp_env_path();
    let write = fs::write(&env_path, "BIZPROFILE_BACKEND_KEY=anon\n");
    assert!(write.is_ok());

    let perms = fs::set_permissions(&env_path, fs::Permissions::from_mode(0o644));
    assert!(perms.is_ok());

    assert!(load_credentials(&env_path).is_err());
    assert!(load_optional_credentials(&env_path).is_err());
}

#[test]
fn missing_file_is_optional() {
    let env_path = temp_env_path();
    assert!(load_credentials(&env_path).is_err());

    let loaded = load_optional_credentials(&env_path);
    assert!(matches!(loaded, Ok(ref c) if c.get("BIZPROFILE_BACKEND_KEY").is_none()));
}

#[test]
fn persona_keys_fall_back_to_default_persona() {
    let mut vars = std::collections::BTreeMap::new();
    vars.insert("BIZPROFILE_BUSINESS_API_KEY".to_owned(), "biz".to_owned());
    vars.insert("BIZPROFILE_SALES_API_KEY".to_owned(), "sales".to_owned());
    vars.insert("BIZPROFILE_HR_API_KEY".to_owned(), " ".to_owned());
    let credentials = Credentials::from_map(vars);

    let keys = PersonaKeys::from_config(&AiConfig::default(), &credentials);
    assert_eq!(keys.resolve("sales"), Some("sales"));
    assert_eq!(keys.resolve("hr"), Some("biz"));
    assert_eq!(keys.resolve("unknown"), Some("biz"));
}

#[test]
fn persona_keys_without_fallback_resolve_nothing() {
    let keys = PersonaKeys::from_config(&AiConfig::default(), &Credentials::default());
    assert_eq!(keys.resolve("business"), None);
}
