mod common;

use appbundle::core::context::BuildContext;
use appbundle::core::core_bundle::CORE_POLYFILLS;
use appbundle::core::interfaces::FileSystemService;
use appbundle::core::models::*;
use appbundle::core::naming::CORE_STATIC_NAME;
use appbundle::infrastructure::{InMemoryAssetLoader, TokioFileSystemService};
use common::*;
use std::path::{Path, PathBuf};

#[tokio::test]
async fn test_minimal_dev_app() {
    let config = dev_config("myapp");
    let service = service(FakeBundler::new(), client_assets());
    let ctx = BuildContext::new();

    let registry = service
        .generate_app_files(&config, &AppBuildInput::default(), &ctx)
        .await
        .unwrap()
        .expect("registry should be produced");

    assert_eq!(registry.namespace, "myapp");
    assert_eq!(registry.core.as_deref(), Some("myapp.core.js"));
    assert_eq!(registry.core_polyfilled.as_deref(), Some("es5-build-disabled.js"));
    assert_eq!(registry.loader.as_deref(), Some("../myapp.js"));
    assert!(registry.global.is_none());
    assert!(ctx.diagnostics.is_empty());

    let core = ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.core.js"))
        .expect("core should be queued");
    assert!(core.contains("(function(Context,appNamespace,hydratedCssClass,publicPath){"));
    assert!(core.contains("})({},\"myapp\",\"hydrated\",\"/build/myapp/\");"));
    assert!(core.contains("script[data-core='myapp.core.js'][data-path]"));
    assert!(core.contains("var modernRuntime=true;"));
    assert!(!core.contains("legacyRuntime"));
    assert!(!core.contains("/*#"));

    let loader = ctx
        .pending_content(Path::new("/project/www/build/myapp.js"))
        .expect("loader should be queued");
    assert!(loader.contains(r#""myapp","/build/myapp/","myapp.core.js","es5-build-disabled.js",[]"#));
    assert!(!loader.contains("__APP__"));

    assert!(ctx
        .pending_content(Path::new("/project/www/build/myapp/es5-build-disabled.js"))
        .is_some());
    assert!(ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.registry.json"))
        .is_some());

    // core, es5 message, loader, registry
    assert_eq!(ctx.pending_writes(), 4);
    assert_eq!(ctx.files_changed(), 4);
}

#[tokio::test]
async fn test_upstream_fatal_skips_generation() {
    let config = dev_config("myapp");
    let service = service(FakeBundler::new(), client_assets());
    let ctx = BuildContext::new();
    ctx.diagnostics.push(Diagnostic::fatal("component failed to compile"));

    let result = service
        .generate_app_files(&config, &input(vec![component("my-cmp")]), &ctx)
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(ctx.pending_writes(), 0);
    assert_eq!(ctx.files_changed(), 0);
    assert_eq!(ctx.diagnostics.len(), 1);
}

#[tokio::test]
async fn test_recoverable_upstream_errors_do_not_skip() {
    let config = dev_config("myapp");
    let service = service(FakeBundler::new(), client_assets());
    let ctx = BuildContext::new();
    ctx.diagnostics.push(Diagnostic::error("style warning promoted to error"));

    let result = service
        .generate_app_files(&config, &AppBuildInput::default(), &ctx)
        .await
        .unwrap();

    assert!(result.is_some());
    assert!(ctx.pending_writes() > 0);
}

#[tokio::test]
async fn test_globals_keep_dependency_then_project_order() {
    let mut config = dev_config("myapp");
    config.global = Some(PathBuf::from("src/global.js"));

    // completion order is the reverse of declaration order
    let bundler = FakeBundler::new()
        .with_entry("deps/a/global.js", "window.fromA = 1;")
        .with_delay("deps/a/global.js", 40)
        .with_entry("deps/b/global.js", "window.fromB = 2;")
        .with_delay("deps/b/global.js", 20)
        .with_entry("src/global.js", "window.fromProject = 3;");

    let mut build_input = input(vec![component("my-cmp")]);
    build_input.dependent_manifests = vec![
        DependentManifest {
            manifest_name: "a".to_string(),
            global: Some(PathBuf::from("deps/a/global.js")),
        },
        DependentManifest {
            manifest_name: "b".to_string(),
            global: Some(PathBuf::from("deps/b/global.js")),
        },
        DependentManifest {
            manifest_name: "no-global".to_string(),
            global: None,
        },
    ];

    let service = service(bundler, client_assets());
    let ctx = BuildContext::new();
    let registry = service
        .generate_app_files(&config, &build_input, &ctx)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(registry.global.as_deref(), Some("myapp.global.js"));
    assert!(ctx.diagnostics.is_empty());

    let core = ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.core.js"))
        .unwrap();
    let a = core.find("window.fromA = 1;").unwrap();
    let b = core.find("window.fromB = 2;").unwrap();
    let project = core.find("window.fromProject = 3;").unwrap();
    let runtime = core.find("var core=true;").unwrap();
    assert!(a < b && b < project && project < runtime);
    assert!(core.contains("/** a global **/"));
    assert!(core.contains("(function(publicPath){"));

    let global = ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.global.js"))
        .unwrap();
    assert!(global.find("window.fromA").unwrap() < global.find("window.fromProject").unwrap());
    assert!(global.contains("})(\"myapp\",\"/build/myapp/\");"));
}

#[tokio::test]
async fn test_unresolvable_global_reports_and_continues() {
    let mut config = dev_config("myapp");
    config.global = Some(PathBuf::from("src/global.js"));

    let bundler = FakeBundler::new().with_entry("src/global.js", "window.fromProject = 3;");
    let mut build_input = input(vec![component("my-cmp")]);
    build_input.dependent_manifests = vec![DependentManifest {
        manifest_name: "broken".to_string(),
        global: Some(PathBuf::from("missing.js")),
    }];

    let service = service(bundler, client_assets());
    let ctx = BuildContext::new();
    let registry = service
        .generate_app_files(&config, &build_input, &ctx)
        .await
        .unwrap()
        .unwrap();

    let diagnostics = ctx.diagnostics.snapshot();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].source.as_deref(), Some("missing.js"));

    assert_eq!(registry.core.as_deref(), Some("myapp.core.js"));
    let core = ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.core.js"))
        .unwrap();
    assert!(core.contains("window.fromProject = 3;"));
}

#[tokio::test]
async fn test_component_usage_gates_runtime_blocks() {
    let config = dev_config("myapp");
    let mut with_listener = component("my-button");
    with_listener.listeners.push(ListenerMeta {
        event_name: "click".to_string(),
        method_name: "onClick".to_string(),
        capture: false,
        passive: true,
        enabled: true,
    });

    let service = service(FakeBundler::new(), client_assets());

    let ctx = BuildContext::new();
    service
        .generate_app_files(&config, &input(vec![with_listener]), &ctx)
        .await
        .unwrap();
    let core = ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.core.js"))
        .unwrap();
    assert!(core.contains("function attachListeners(){}"));
    assert!(!core.contains("relocateSlots"));

    let ctx = BuildContext::new();
    service
        .generate_app_files(&config, &input(vec![component("my-plain")]), &ctx)
        .await
        .unwrap();
    let core = ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.core.js"))
        .unwrap();
    assert!(!core.contains("attachListeners"));
}

#[tokio::test]
async fn test_prod_build_hashes_and_polyfills_legacy_core() {
    let config = prod_config("myapp");
    let service = service(FakeBundler::new(), client_assets());
    let ctx = BuildContext::new();

    let registry = service
        .generate_app_files(&config, &input(vec![component("my-cmp")]), &ctx)
        .await
        .unwrap()
        .unwrap();

    let core_name = registry.core.clone().unwrap();
    let pf_name = registry.core_polyfilled.clone().unwrap();
    assert_ne!(core_name, "myapp.core.js");
    assert_ne!(core_name, pf_name);
    assert_eq!(core_name.len(), "myapp..js".len() + config.hashed_file_name_length);

    let core = ctx
        .pending_content(&PathBuf::from("/project/www/build/myapp").join(&core_name))
        .unwrap();
    assert!(core.contains(&format!("script[data-core='{}'][data-path]", core_name)));
    assert!(core.starts_with("/*! Built with appbundle */"));
    assert!(!core.contains("polyfill:"));
    assert!(!core.contains("relocateSlots"));

    let legacy = ctx
        .pending_content(&PathBuf::from("/project/www/build/myapp").join(&pf_name))
        .unwrap();
    let expected_prefix: Vec<String> = CORE_POLYFILLS
        .iter()
        .map(|file| format!("/*polyfill:{}*/", file))
        .collect();
    assert!(legacy.starts_with(&expected_prefix.join("\n")));
    assert!(legacy.contains("var legacyRuntime=true;"));
    assert!(!legacy.contains("modernRuntime"));
    // custom slot polyfill pulls in the slot block
    assert!(legacy.contains("function relocateSlots(){}"));

    let loader = ctx
        .pending_content(Path::new("/project/www/build/myapp.js"))
        .unwrap();
    assert!(loader.contains(&format!("\"{}\",\"{}\"", core_name, pf_name)));

    // no es5-disabled message when a real fallback exists
    assert!(ctx
        .pending_content(Path::new("/project/www/build/myapp/es5-build-disabled.js"))
        .is_none());
}

#[tokio::test]
async fn test_minified_prod_build_keeps_legacy_files_es5() {
    let mut config = prod_config("myapp");
    config.minify_js = true;
    config.global = Some(PathBuf::from("src/global.js"));

    let bundler = FakeBundler::new().with_entry(
        "src/global.js",
        r#"var greeting = "hello"; window.greet = function (name) { return greeting + ", " + name; };"#,
    );
    let service = minifying_service(bundler, client_assets());
    let ctx = BuildContext::new();

    let registry = service
        .generate_app_files(&config, &input(vec![component("my-cmp")]), &ctx)
        .await
        .unwrap()
        .unwrap();

    assert!(ctx.diagnostics.is_empty(), "{:?}", ctx.diagnostics.snapshot());
    let core_name = registry.core.clone().unwrap();
    let pf_name = registry.core_polyfilled.clone().unwrap();
    let app_dir = PathBuf::from("/project/www/build/myapp");

    let core = ctx.pending_content(&app_dir.join(&core_name)).unwrap();
    assert!(core.contains(&format!("script[data-core='{}'][data-path]", core_name)));
    assert!(core.contains("greet"));

    let legacy = ctx.pending_content(&app_dir.join(&pf_name)).unwrap();
    assert!(legacy.contains(&format!("script[data-core='{}'][data-path]", pf_name)));
    assert!(legacy.contains("\"hello\""));
    assert!(!legacy.contains('`'), "backtick in {}", legacy);
    assert!(!legacy.contains("=>"), "arrow in {}", legacy);

    let loader = ctx
        .pending_content(Path::new("/project/www/build/myapp.js"))
        .unwrap();
    assert!(!loader.contains("__APP__"));
    assert!(!loader.contains('`'), "backtick in {}", loader);
    assert!(!loader.contains("=>"), "arrow in {}", loader);
    for value in ["\"myapp\"", "\"/build/myapp/\""] {
        assert!(loader.contains(value), "{} missing from {}", value, loader);
    }
    assert!(loader.contains(&format!("\"{}\"", core_name)));
    assert!(loader.contains(&format!("\"{}\"", pf_name)));

    for content in [&core, &legacy, &loader] {
        assert!(!content.contains("__APP_CORE_FILENAME__"));
    }
}

#[tokio::test]
async fn test_failed_legacy_core_leaves_modern_core() {
    let config = prod_config("myapp");
    // no polyfill sources, so only the polyfilled variant can fail
    let assets = InMemoryAssetLoader::new()
        .with_asset(CORE_STATIC_NAME, CORE_TEMPLATE)
        .with_asset("loader.js", LOADER_TEMPLATE);
    let service = service(FakeBundler::new(), assets);
    let ctx = BuildContext::new();

    let registry = service
        .generate_app_files(&config, &AppBuildInput::default(), &ctx)
        .await
        .unwrap()
        .unwrap();

    assert!(registry.core.is_some());
    assert!(registry.core_polyfilled.is_none());
    assert!(registry.loader.is_some());

    let diagnostics = ctx.diagnostics.snapshot();
    assert!(diagnostics
        .iter()
        .any(|d| d.severity == Severity::Error && d.source.as_deref() == Some("core.pf")));

    let core_path = PathBuf::from("/project/www/build/myapp").join(registry.core.unwrap());
    assert!(ctx.pending_content(&core_path).is_some());
}

#[tokio::test]
async fn test_loader_without_marker_is_reported() {
    let config = dev_config("myapp");
    let assets = client_assets().with_asset("loader.js", "window.loader = true;");
    let service = service(FakeBundler::new(), assets);
    let ctx = BuildContext::new();

    let registry = service
        .generate_app_files(&config, &AppBuildInput::default(), &ctx)
        .await
        .unwrap()
        .unwrap();

    assert!(registry.loader.is_none());
    assert!(ctx.diagnostics.has_errors());
    assert!(ctx
        .diagnostics
        .snapshot()
        .iter()
        .any(|d| d.source.as_deref() == Some("loader")));

    assert!(ctx.pending_content(Path::new("/project/www/build/myapp.js")).is_none());
    assert!(ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.core.js"))
        .is_some());
    assert!(ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.registry.json"))
        .is_some());
}

#[tokio::test]
async fn test_www_and_distribution_receive_identical_files() {
    let mut config = dev_config("MyApp");
    config.generate_distribution = true;
    let service = service(FakeBundler::new(), client_assets());
    let ctx = BuildContext::new();

    service
        .generate_app_files(&config, &input(vec![component("my-cmp")]), &ctx)
        .await
        .unwrap();

    let pairs = [
        ("/project/www/build/myapp/myapp.core.js", "/project/dist/myapp/myapp.core.js"),
        ("/project/www/build/myapp.js", "/project/dist/myapp.js"),
        ("/project/www/build/myapp/myapp.registry.json", "/project/dist/myapp.registry.json"),
    ];

    for (www, dist) in pairs {
        let www_content = ctx.pending_content(Path::new(www)).unwrap();
        let dist_content = ctx.pending_content(Path::new(dist)).unwrap();
        assert_eq!(www_content, dist_content, "{} and {} differ", www, dist);
    }

    // the loader still carries the original namespace casing
    let loader = ctx.pending_content(Path::new("/project/dist/myapp.js")).unwrap();
    assert!(loader.contains("\"MyApp\",\"/build/myapp/\",\"myapp.core.js\""));
}

#[tokio::test]
async fn test_registry_lists_components_and_files() {
    let config = dev_config("myapp");
    let service = service(FakeBundler::new(), client_assets());
    let ctx = BuildContext::new();

    service
        .generate_app_files(&config, &input(vec![component("z-cmp"), component("a-cmp")]), &ctx)
        .await
        .unwrap();

    let json = ctx
        .pending_content(Path::new("/project/www/build/myapp/myapp.registry.json"))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["namespace"], "myapp");
    assert_eq!(value["core"], "myapp.core.js");
    assert_eq!(value["loader"], "../myapp.js");
    assert_eq!(value["components"][0][0], "a-cmp");
    assert_eq!(value["components"][1][0], "z-cmp");
    assert!(value.get("global").is_none());
}

#[tokio::test]
async fn test_write_set_flushes_to_disk() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = dev_config("myapp");
    config.build_dir = temp_dir.path().join("www/build");
    config.dist_dir = temp_dir.path().join("dist");

    let service = service(FakeBundler::new(), client_assets());
    let ctx = BuildContext::new();
    service
        .generate_app_files(&config, &AppBuildInput::default(), &ctx)
        .await
        .unwrap();

    let written = TokioFileSystemService
        .write_files(&ctx.take_files_to_write())
        .await
        .unwrap();

    assert_eq!(written.len(), 4);
    assert_eq!(ctx.pending_writes(), 0);

    let loader = std::fs::read_to_string(temp_dir.path().join("www/build/myapp.js")).unwrap();
    assert!(loader.starts_with("/*! Built with appbundle */"));
    assert!(temp_dir.path().join("www/build/myapp/myapp.core.js").exists());
    assert!(!temp_dir.path().join("dist").exists());
}
