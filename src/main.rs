//! hookline demo — registers a few callbacks of every kind and dispatches them.

use std::sync::Arc;

use anyhow::Context;
use serde_json::{Value, json};
use tracing_subscriber::{EnvFilter, fmt};

use hookline::prelude::*;
use hookline::render::{render_call_log, render_listing};
use hookline_core::config::HooklineConfig;

fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(&config) {
        tracing::error!("Demo failed: {e:#}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> anyhow::Result<HooklineConfig> {
    let config_path =
        std::env::var("HOOKLINE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    HooklineConfig::load(&config_path)
        .with_context(|| format!("loading configuration from '{config_path}'"))
}

/// Initialize tracing/logging
fn init_logging(config: &HooklineConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

struct Greeter;

impl HookTarget for Greeter {
    fn class_name(&self) -> &str {
        "Greeter"
    }

    fn has_method(&self, method: &str) -> bool {
        method == "normal_hello"
    }

    fn call_method(&self, _method: &str, args: &[Value]) -> CallbackResult {
        let value = format!("{} !normal!", as_text(&args[0]));
        println!("normal_hello: {value}");
        Ok(json!(value))
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn run(config: &HooklineConfig) -> anyhow::Result<()> {
    let hooks = HookManager::from_config(&config.hooks);
    hooks.set_debug(true);

    // A chain whose second link stops processing.
    hooks.define_function("filter", |args| {
        println!("filter: {}", args[0]);
        Ok(json!(args[0].as_i64().unwrap_or(0) + 1))
    });
    hooks.define_function("filter2", |args| {
        println!("filter2: {} (filter3 will not run)", args[0]);
        stop(args[0].clone())
    });
    hooks.define_function("filter3", |args| {
        println!("filter3: {}", args[0]);
        Ok(json!(args[0].as_i64().unwrap_or(0) + 1))
    });

    hooks.add_filter("filtertest", "filter", SYSTEM_PRIORITY);
    hooks.add_filter("filtertest", "filter2", SYSTEM_PRIORITY);
    hooks.add_filter("filtertest", "filter3", SYSTEM_PRIORITY);

    let result = hooks.filter("filtertest", json!(123))?;
    println!("filtertest => {result}");

    // Every callback representation on one tag.
    hooks.define_function("app", |args| Ok(json!(format!("{} !mytest!", as_text(&args[0])))));
    hooks.define_static("Greeter", "static_hello", |args| {
        Ok(json!(format!("{} !static!", as_text(&args[0]))))
    });
    let greeter: Arc<dyn HookTarget> = Arc::new(Greeter);

    hooks.add_filter("test", "abc", SYSTEM_PRIORITY);
    hooks.add_filter("test", "app", SYSTEM_PRIORITY);
    hooks.add_filter(
        "test",
        Callback::closure(|args| Ok(json!(format!("{} !closure!", as_text(&args[0]))))),
        SYSTEM_PRIORITY,
    );
    hooks.add_event("test", Callback::method(greeter, "normal_hello"), 99);
    hooks.add_filter("test", Callback::static_method("Greeter", "static_hello"), SYSTEM_PRIORITY);
    hooks.add_filter("test", "Greeter::static_hello", SYSTEM_PRIORITY);

    println!("has_filter(test) = {}", hooks.has_filter("test"));
    println!(
        "find_filter(test, Greeter::static_hello) = {:?}",
        hooks.find_filter("test", Callback::static_method("Greeter", "static_hello"))
    );
    println!(
        "find_filter(test, xyz) = {:?}",
        hooks.find_filter("test", "xyz")
    );
    println!("has_filter(test123) = {}", hooks.has_filter("test123"));

    println!("test => {}", hooks.filter("test", json!(123))?);
    println!("testa => {}", hooks.filter("testa", json!(false))?);

    println!();
    print!("{}", render_call_log(&hooks.debug_calls()));
    println!();
    print!("{}", render_listing(&hooks.snapshot()));

    Ok(())
}
