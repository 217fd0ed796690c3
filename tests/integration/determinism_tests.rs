mod common;

use appbundle::core::context::BuildContext;
use appbundle::core::models::*;
use common::*;
use std::path::{Path, PathBuf};

fn input_with_globals() -> AppBuildInput {
    let mut build_input = input(vec![component("my-cmp"), component("other-cmp")]);
    build_input.dependent_manifests = vec![
        DependentManifest {
            manifest_name: "a".to_string(),
            global: Some(PathBuf::from("deps/a/global.js")),
        },
        DependentManifest {
            manifest_name: "b".to_string(),
            global: Some(PathBuf::from("deps/b/global.js")),
        },
    ];
    build_input
}

fn bundler(slow_first: bool) -> FakeBundler {
    let (a_delay, b_delay) = if slow_first { (30, 0) } else { (0, 30) };
    FakeBundler::new()
        .with_entry("deps/a/global.js", "window.a = 1;")
        .with_delay("deps/a/global.js", a_delay)
        .with_entry("deps/b/global.js", "window.b = 2;")
        .with_delay("deps/b/global.js", b_delay)
        .with_entry("src/global.js", "window.project = 3;")
}

#[tokio::test]
async fn test_identical_inputs_give_identical_output() {
    let mut config = prod_config("myapp");
    config.global = Some(PathBuf::from("src/global.js"));
    let build_input = input_with_globals();

    let first_ctx = BuildContext::new();
    let first = service(bundler(true), client_assets())
        .generate_app_files(&config, &build_input, &first_ctx)
        .await
        .unwrap()
        .unwrap();

    // same inputs, opposite completion order
    let second_ctx = BuildContext::new();
    let second = service(bundler(false), client_assets())
        .generate_app_files(&config, &build_input, &second_ctx)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first_ctx.take_files_to_write(), second_ctx.take_files_to_write());
}

#[tokio::test]
async fn test_unchanged_rebuild_writes_nothing() {
    let mut config = prod_config("myapp");
    config.global = Some(PathBuf::from("src/global.js"));
    let build_input = input_with_globals();
    let service = service(bundler(true), client_assets());

    let ctx = BuildContext::new();
    let first = service
        .generate_app_files(&config, &build_input, &ctx)
        .await
        .unwrap()
        .unwrap();
    assert!(ctx.files_changed() > 0);

    let rebuild = ctx.next_build();
    assert!(rebuild.is_rebuild());
    let second = service
        .generate_app_files(&config, &build_input, &rebuild)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(rebuild.pending_writes(), 0);
    assert_eq!(rebuild.files_changed(), 0);
}

#[tokio::test]
async fn test_dev_rebuild_rewrites_only_changed_artifacts() {
    let mut config = dev_config("myapp");
    config.global = Some(PathBuf::from("src/global.js"));
    let build_input = input_with_globals();

    let ctx = BuildContext::new();
    service(bundler(true), client_assets())
        .generate_app_files(&config, &build_input, &ctx)
        .await
        .unwrap();

    let edited = FakeBundler::new()
        .with_entry("deps/a/global.js", "window.a = 1;")
        .with_entry("deps/b/global.js", "window.b = 2;")
        .with_entry("src/global.js", "window.project = 4;");

    let rebuild = ctx.next_build();
    service(edited, client_assets())
        .generate_app_files(&config, &build_input, &rebuild)
        .await
        .unwrap();

    // dev names are stable, so the loader and registry do not change
    let mut written: Vec<PathBuf> = rebuild
        .take_files_to_write()
        .into_iter()
        .map(|(path, _)| path)
        .collect();
    written.sort();
    assert_eq!(
        written,
        vec![
            PathBuf::from("/project/www/build/myapp/myapp.core.js"),
            PathBuf::from("/project/www/build/myapp/myapp.global.js"),
        ]
    );
    assert_eq!(rebuild.files_changed(), 2);
}

#[tokio::test]
async fn test_prod_rebuild_renames_core_and_updates_loader() {
    let config = prod_config("myapp");
    let ctx = BuildContext::new();

    let first = service(FakeBundler::new(), client_assets())
        .generate_app_files(&config, &input(vec![component("my-cmp")]), &ctx)
        .await
        .unwrap()
        .unwrap();

    let mut with_slot = component("my-cmp");
    with_slot.slot = SlotUsage::Default;

    let rebuild = ctx.next_build();
    let second = service(FakeBundler::new(), client_assets())
        .generate_app_files(&config, &input(vec![with_slot]), &rebuild)
        .await
        .unwrap()
        .unwrap();

    assert_ne!(first.core, second.core);
    // the polyfilled core already carried the slot block
    assert_eq!(first.core_polyfilled, second.core_polyfilled);

    let loader = rebuild
        .pending_content(Path::new("/project/www/build/myapp.js"))
        .expect("loader should be rewritten");
    assert!(loader.contains(second.core.as_deref().unwrap()));
}
