//! End-to-end tests for directory discovery and ordered loading.
//!
//! Each test builds a real directory tree, registers stub loadables, and
//! drives the full pipeline: walk, classify, cache, invoke.

use std::fs;
use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::TempDir;

use conscript_core::{
    CacheSettings, InvokeContext, Loadable, Loader, LoaderConfig, PluginError, PluginRegistry,
};

/// Shared log of unit invocations, in the order they happened.
type CallLog = Arc<Mutex<Vec<String>>>;

fn recording_unit(tag: &str, log: &CallLog) -> Arc<dyn Loadable> {
    let tag = tag.to_string();
    let log = Arc::clone(log);
    Arc::new(move |_: &InvokeContext<'_>| -> Result<Value, PluginError> {
        log.lock().push(tag.clone());
        Ok(json!(tag))
    })
}

fn failing_unit() -> Arc<dyn Loadable> {
    Arc::new(|_: &InvokeContext<'_>| -> Result<Value, PluginError> {
        Err(PluginError::invoke("broken unit"))
    })
}

/// `app/users/` with one tagged model and one tagged controller.
fn app_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    let users = temp.path().join("users");
    fs::create_dir(&users).unwrap();
    fs::write(users.join("users_model.js"), "// ~> model\n").unwrap();
    fs::write(users.join("users_controller.js"), "// ~> controller\n").unwrap();
    temp
}

fn caching_config(cache_path: &std::path::Path) -> LoaderConfig {
    LoaderConfig {
        cache: CacheSettings {
            enable: true,
            path: cache_path.to_string_lossy().into_owned(),
        },
        ..LoaderConfig::default()
    }
}

mod discovery {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn loads_models_before_controllers() {
        let temp = app_tree();
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));

        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", recording_unit("model", &log));
        registry.register("users_controller.js", recording_unit("controller", &log));

        let mut loader = Loader::new(LoaderConfig::default(), registry, json!({}));
        let outcome = loader
            .load_directory(
                temp.path().to_str().unwrap(),
                Some(&["model", "controller"]),
                &[],
            )
            .await
            .unwrap();

        assert!(outcome.errors.is_empty());
        assert!(outcome.loaded[0].ends_with("users_model.js"));
        assert!(outcome.loaded[1].ends_with("users_controller.js"));
        assert_eq!(*log.lock(), vec!["model", "controller"]);
    }

    #[tokio::test]
    async fn type_priority_beats_directory_order() {
        let temp = app_tree();
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));

        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", recording_unit("model", &log));
        registry.register("users_controller.js", recording_unit("controller", &log));

        let mut loader = Loader::new(LoaderConfig::default(), registry, json!({}));
        loader
            .load_directory(
                temp.path().to_str().unwrap(),
                Some(&["controller", "model"]),
                &[],
            )
            .await
            .unwrap();

        // Every controller loads before any model, whatever the walk saw first.
        assert_eq!(*log.lock(), vec!["controller", "model"]);
    }

    #[tokio::test]
    async fn hidden_and_vendor_files_never_load() {
        let temp = app_tree();
        fs::write(temp.path().join(".secret_model.js"), "// ~> model\n").unwrap();
        let vendor = temp.path().join("node_modules");
        fs::create_dir(&vendor).unwrap();
        fs::write(vendor.join("dep_model.js"), "// ~> model\n").unwrap();

        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", recording_unit("model", &log));
        registry.register("users_controller.js", recording_unit("controller", &log));
        registry.register(".secret_model.js", recording_unit("hidden", &log));
        registry.register("dep_model.js", recording_unit("vendored", &log));

        let mut loader = Loader::new(LoaderConfig::default(), registry, json!({}));
        let outcome = loader
            .load_directory(
                temp.path().to_str().unwrap(),
                Some(&["model", "controller"]),
                &[],
            )
            .await
            .unwrap();

        assert_eq!(outcome.loaded.len(), 2);
        assert!(!log.lock().iter().any(|t| t == "hidden" || t == "vendored"));
    }

    #[tokio::test]
    async fn untagged_files_are_left_out() {
        let temp = app_tree();
        fs::write(temp.path().join("users").join("helpers.js"), "plain\n").unwrap();

        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", failing_unit());
        registry.register("users_controller.js", failing_unit());

        let mut loader = Loader::new(LoaderConfig::default(), registry, json!({}));
        let outcome = loader
            .load_directory(
                temp.path().to_str().unwrap(),
                Some(&["model", "controller"]),
                &[],
            )
            .await
            .unwrap();

        assert!(!outcome.loaded.iter().any(|p| p.ends_with("helpers.js")));
    }
}

mod invocation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn one_broken_unit_does_not_abort_the_batch() {
        let temp = app_tree();
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));

        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", failing_unit());
        registry.register("users_controller.js", recording_unit("controller", &log));

        let mut loader = Loader::new(LoaderConfig::default(), registry, json!({}));
        let outcome = loader
            .load_directory(
                temp.path().to_str().unwrap(),
                Some(&["model", "controller"]),
                &[],
            )
            .await
            .unwrap();

        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.loaded.len(), 2);
        assert_eq!(*log.lock(), vec!["controller"]);
        // The broken unit keeps its slot in the return values.
        assert_eq!(outcome.returns[0], Value::Null);
        assert_eq!(outcome.returns[1], json!("controller"));
    }

    #[tokio::test]
    async fn host_config_and_extras_reach_each_unit() {
        let temp = app_tree();

        let mut registry = PluginRegistry::new();
        registry.register(
            "users_model.js",
            Arc::new(|ctx: &InvokeContext<'_>| -> Result<Value, PluginError> {
                Ok(json!({
                    "host": ctx.host.clone(),
                    "identifier": ctx.config["identification"]["identifier"].clone(),
                    "extras": ctx.extras.to_vec(),
                }))
            }) as Arc<dyn Loadable>,
        );

        let mut loader = Loader::new(
            LoaderConfig::default(),
            registry,
            json!({ "app": "demo-server" }),
        );
        let outcome = loader
            .load_directory(
                temp.path().to_str().unwrap(),
                Some(&["model"]),
                &[json!("db-handle"), json!(42)],
            )
            .await
            .unwrap();

        let value = &outcome.returns[0];
        assert_eq!(value["host"]["app"], "demo-server");
        assert_eq!(value["identifier"], "~>");
        assert_eq!(value["extras"], json!(["db-handle", 42]));
    }

    #[tokio::test]
    async fn invoke_files_loads_an_explicit_list() {
        let temp = app_tree();
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));

        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", recording_unit("model", &log));

        let loader = Loader::new(LoaderConfig::default(), registry, json!({}));
        let model = temp
            .path()
            .join("users")
            .join("users_model.js")
            .to_string_lossy()
            .into_owned();

        let outcome = loader.invoke_files(&[model.clone()], &[]);

        assert_eq!(outcome.loaded, vec![model]);
        assert_eq!(*log.lock(), vec!["model"]);
    }
}

mod caching {
    use super::*;
    use pretty_assertions::assert_eq;
    use conscript_cache::CacheRecord;

    #[tokio::test]
    async fn first_load_persists_the_expected_record() {
        let temp = app_tree();
        let cache_dir = TempDir::new().unwrap();
        let cache_path = cache_dir.path().join("data").join("cache.json");

        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", failing_unit());
        registry.register("users_controller.js", failing_unit());

        let mut loader = Loader::new(caching_config(&cache_path), registry, json!({}));
        loader
            .load_directory(
                temp.path().to_str().unwrap(),
                Some(&["model", "controller"]),
                &[],
            )
            .await
            .unwrap();

        let content = fs::read_to_string(&cache_path).unwrap();
        let records: Vec<CacheRecord> = serde_json::from_str(&content).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].directory, temp.path().to_string_lossy());
        assert!(records[0].files[0].ends_with("users_model.js"));
        assert!(records[0].files[1].ends_with("users_controller.js"));
    }

    #[tokio::test]
    async fn second_load_reuses_the_list_without_revalidation() {
        let temp = app_tree();
        let cache_dir = TempDir::new().unwrap();
        let cache_path = cache_dir.path().join("cache.json");
        let log: CallLog = Arc::new(Mutex::new(Vec::new()));

        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", recording_unit("model", &log));
        registry.register("users_controller.js", recording_unit("controller", &log));

        let mut loader = Loader::new(caching_config(&cache_path), registry.clone(), json!({}));
        loader
            .load_directory(
                temp.path().to_str().unwrap(),
                Some(&["model", "controller"]),
                &[],
            )
            .await
            .unwrap();

        // Strip the tag: a fresh walk would classify nothing now.
        let model = temp.path().join("users").join("users_model.js");
        fs::write(&model, "// tag removed\n").unwrap();

        let mut second = Loader::new(caching_config(&cache_path), registry, json!({}));
        let outcome = second
            .load_directory(
                temp.path().to_str().unwrap(),
                Some(&["model", "controller"]),
                &[],
            )
            .await
            .unwrap();

        // The cached list is used verbatim; both units load again.
        assert_eq!(outcome.loaded.len(), 2);
        assert_eq!(*log.lock(), vec!["model", "controller", "model", "controller"]);
    }

    #[tokio::test]
    async fn corrupt_cache_file_fails_the_load() {
        let temp = app_tree();
        let cache_dir = TempDir::new().unwrap();
        let cache_path = cache_dir.path().join("cache.json");
        fs::write(&cache_path, "not json at all").unwrap();

        let mut loader =
            Loader::new(caching_config(&cache_path), PluginRegistry::new(), json!({}));
        let result = loader
            .load_directory(temp.path().to_str().unwrap(), None, &[])
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn clear_deletes_the_file_and_empties_the_list() {
        let temp = app_tree();
        let cache_dir = TempDir::new().unwrap();
        let cache_path = cache_dir.path().join("cache.json");

        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", failing_unit());
        registry.register("users_controller.js", failing_unit());

        let mut loader = Loader::new(caching_config(&cache_path), registry, json!({}));
        loader
            .load_directory(temp.path().to_str().unwrap(), None, &[])
            .await
            .unwrap();
        assert!(cache_path.exists());

        loader.clear_cache().await.unwrap();

        assert!(!cache_path.exists());
        assert!(loader.cached_files().is_empty());

        // Idempotent, in both variants.
        loader.clear_cache().await.unwrap();
        loader.clear_cache_sync().unwrap();
    }

    #[tokio::test]
    async fn disabling_the_cache_removes_persistence() {
        let temp = app_tree();
        let cache_dir = TempDir::new().unwrap();
        let cache_path = cache_dir.path().join("cache.json");

        let mut registry = PluginRegistry::new();
        registry.register("users_model.js", failing_unit());
        registry.register("users_controller.js", failing_unit());

        let config = caching_config(&cache_path);
        let mut loader = Loader::new(config.clone(), registry, json!({}));
        loader
            .load_directory(temp.path().to_str().unwrap(), None, &[])
            .await
            .unwrap();
        assert!(cache_path.exists());

        let disabled = LoaderConfig {
            cache: CacheSettings {
                enable: false,
                path: config.cache.path.clone(),
            },
            ..config
        };
        loader.set_config(disabled).unwrap();

        assert!(!cache_path.exists());
        assert!(loader.cached_files().is_empty());
    }
}
