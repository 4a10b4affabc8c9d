use std::env;
use std::fs;
use std::sync::{Mutex, OnceLock};

use advisor_cli::commands::{advise, config, doctor, insights, products, profiles};
use advisor_core::domain::advice::{AdviceType, CategoryFilter};
use advisor_core::domain::profile::{Interest, ProfileId};
use serde_json::Value;
use tempfile::TempDir;

#[test]
fn profiles_lists_seed_personas() {
    with_env(&[], || {
        let result = profiles::run();
        assert_eq!(result.exit_code, 0, "expected profile listing to succeed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "profiles");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"].as_array().map(Vec::len), Some(3));
        assert_eq!(payload["data"][0]["name"], "Emily Chen");
        assert_eq!(payload["data"][0]["buying_stage"], "Consideration");
    });
}

#[test]
fn products_are_ranked_by_price_for_price_sensitive_persona() {
    with_env(&[], || {
        let result = products::run(ProfileId(1), CategoryFilter::All);
        assert_eq!(result.exit_code, 0, "expected product preview to succeed");

        let payload = parse_payload(&result.output);
        let names = payload["data"]["products"]
            .as_array()
            .map(|products| {
                products.iter().filter_map(|product| product["name"].as_str()).collect::<Vec<_>>()
            })
            .unwrap_or_default();
        assert_eq!(
            names,
            vec![
                "Organic Meal Kit Subscription",
                "Eco-Friendly Water Bottle",
                "Family Board Game Set",
                "Premium Fitness Tracker",
            ]
        );
        assert_eq!(payload["data"]["category"], "All Categories");
    });
}

#[test]
fn products_reports_missing_profile() {
    with_env(&[], || {
        let result = products::run(ProfileId(99), CategoryFilter::Only(Interest::Technology));
        assert_eq!(result.exit_code, 4, "expected profile lookup failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "profile_not_found");
    });
}

#[test]
fn advise_generates_in_order_and_returns_previous_history() {
    with_env(&[], || {
        let result = advise::run(
            ProfileId(2),
            &[
                AdviceType::ProductRecommendations,
                AdviceType::MarketingMessaging,
                AdviceType::PricingStrategy,
            ],
            CategoryFilter::All,
        );
        assert_eq!(result.exit_code, 0, "expected advice generation to succeed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "advise");
        assert_eq!(payload["data"]["generated"], 3);
        assert_eq!(payload["data"]["latest"]["advice_type"], "Pricing Strategy");
        assert_eq!(payload["data"]["latest"]["profile_id"], 2);

        let previous = payload["data"]["previous"].as_array().cloned().unwrap_or_default();
        assert_eq!(previous.len(), 2);
        assert_eq!(previous[0]["advice_type"], "Marketing Messaging");
        assert_eq!(previous[1]["advice_type"], "Product Recommendations");
        let preview = previous[0]["preview"].as_str().unwrap_or_default();
        assert!(preview.starts_with("Recommended messaging approach for James Wilson:"));
        assert!(preview.ends_with("..."));
    });
}

#[test]
fn advise_history_respects_configured_limit() {
    with_env(&[("ADVISOR_HISTORY_LIMIT", "1")], || {
        let result = advise::run(
            ProfileId(3),
            &[
                AdviceType::PricingStrategy,
                AdviceType::PricingStrategy,
                AdviceType::MarketingMessaging,
            ],
            CategoryFilter::All,
        );
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["previous"].as_array().map(Vec::len), Some(1));
    });
}

#[test]
fn advise_rejects_advice_type_without_rule_table() {
    with_env(&[], || {
        let result =
            advise::run(ProfileId(1), &[AdviceType::FeaturePrioritization], CategoryFilter::All);
        assert_eq!(result.exit_code, 5, "expected advisory failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "unknown_advice_type");
    });
}

#[test]
fn advise_rejects_disabled_advice_type() {
    with_env(&[("ADVISOR_ENABLED_ADVICE_TYPES", "pricing-strategy")], || {
        let result =
            advise::run(ProfileId(1), &[AdviceType::ProductRecommendations], CategoryFilter::All);
        assert_eq!(result.exit_code, 5);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "advice_type_disabled");
    });
}

#[test]
fn invalid_config_is_reported_as_config_validation() {
    with_env(&[("ADVISOR_HISTORY_LIMIT", "0")], || {
        let result = profiles::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload["message"].as_str().unwrap_or_default().contains("history_limit"));
    });
}

#[test]
fn missing_catalog_file_is_reported_as_data_load() {
    with_env(&[("ADVISOR_CATALOG_PATH", "does-not-exist/catalog.json")], || {
        let result = insights::run();
        assert_eq!(result.exit_code, 3, "expected data load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "data_load");
    });
}

#[test]
fn catalog_file_replaces_seed_catalog() {
    let dir = TempDir::new().expect("temp dir");
    let catalog_path = dir.path().join("catalog.json");
    fs::write(
        &catalog_path,
        r#"[
            {"name":"Trail Shoes","category":"Fitness","price":"89.00","eco_friendly":false},
            {"name":"Yoga Mat","category":"Fitness","price":"25.50","eco_friendly":true}
        ]"#,
    )
    .expect("write catalog");
    let catalog_path = catalog_path.display().to_string();

    with_env(&[("ADVISOR_CATALOG_PATH", catalog_path.as_str())], || {
        let result = products::run(ProfileId(1), CategoryFilter::Only(Interest::Fitness));
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["products"][0]["name"], "Yoga Mat");
        assert_eq!(payload["data"]["products"][1]["name"], "Trail Shoes");
    });
}

#[test]
fn insights_summarize_seed_personas() {
    with_env(&[], || {
        let result = insights::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["profile_count"], 3);
        assert_eq!(payload["data"]["buying_stages"][0]["label"], "Awareness");
        assert_eq!(payload["data"]["age"]["min"], 28);
    });
}

#[test]
fn advise_profile_file_advises_unsaved_persona() {
    let dir = TempDir::new().expect("temp dir");
    let persona_path = dir.path().join("persona.json");
    fs::write(
        &persona_path,
        r#"{"name":"Noor Haddad","age":51,"interests":["Reading","Music"],
            "pain_points":["Price sensitivity"],"buying_stage":"Decision"}"#,
    )
    .expect("write persona");

    with_env(&[], || {
        let result = advise::run_with_profile_file(
            &persona_path,
            false,
            &[AdviceType::PricingStrategy],
            CategoryFilter::All,
        );
        assert_eq!(result.exit_code, 0, "expected unsaved persona advice to succeed");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["latest"]["profile_id"], 4);
        let content = payload["data"]["latest"]["content"].as_str().unwrap_or_default();
        assert!(content.starts_with("Pricing strategy recommendations for Noor Haddad:"));
        assert!(payload["data"].get("saved").is_none());
    });
}

#[test]
fn advise_profile_file_with_save_reports_created() {
    let dir = TempDir::new().expect("temp dir");
    let persona_path = dir.path().join("persona.json");
    fs::write(&persona_path, r#"{"name":"Ravi Patel","occupation":"Teacher"}"#)
        .expect("write persona");

    with_env(&[], || {
        let result = advise::run_with_profile_file(
            &persona_path,
            true,
            &[AdviceType::MarketingMessaging],
            CategoryFilter::All,
        );
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["data"]["saved"], "created");
        assert_eq!(payload["data"]["latest"]["advice_type"], "Marketing Messaging");
    });
}

#[test]
fn advise_profile_file_rejects_out_of_range_age() {
    let dir = TempDir::new().expect("temp dir");
    let persona_path = dir.path().join("persona.json");
    fs::write(&persona_path, r#"{"name":"Kid","age":12}"#).expect("write persona");

    with_env(&[], || {
        let result = advise::run_with_profile_file(
            &persona_path,
            true,
            &[AdviceType::PricingStrategy],
            CategoryFilter::All,
        );
        assert_eq!(result.exit_code, 3, "expected data load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "data_load");
    });
}

#[test]
fn config_reports_env_source_and_redacts_api_key() {
    with_env(&[("ADVISOR_HISTORY_LIMIT", "7"), ("ADVISOR_API_KEY", "sk-very-secret")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);
        assert!(!result.output.contains("very-secret"));

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        let history = config_field(&payload, "advisor.history_limit");
        assert_eq!(history["value"], "7");
        assert_eq!(history["source"], "env (ADVISOR_HISTORY_LIMIT)");
        let preview = config_field(&payload, "advisor.preview_chars");
        assert_eq!(preview["value"], "150");
        assert_eq!(preview["source"], "default");
        let api_key = config_field(&payload, "integrations.api_key");
        assert_eq!(api_key["value"], "sk-***");
        assert_eq!(api_key["source"], "env (ADVISOR_API_KEY)");
    });
}

#[test]
fn config_ignores_blank_env_values_when_attributing_sources() {
    with_env(&[("ADVISOR_PREVIEW_CHARS", "   "), ("ADVISOR_LOG_LEVEL", "")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(config_field(&payload, "advisor.preview_chars")["source"], "default");
        assert_eq!(config_field(&payload, "logging.level")["source"], "default");
    });
}

#[test]
fn config_fails_with_config_exit_code_when_invalid() {
    with_env(&[("ADVISOR_PREVIEW_CHARS", "5")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        assert!(payload["message"].as_str().unwrap_or_default().contains("preview_chars"));
    });
}

#[test]
fn doctor_passes_with_default_config() {
    with_env(&[], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 0, "expected doctor to pass");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["overall_status"], "pass");
        let names: Vec<&str> = payload["data"]["checks"]
            .as_array()
            .map(|checks| checks.iter().filter_map(|check| check["name"].as_str()).collect())
            .unwrap_or_default();
        assert_eq!(
            names,
            vec!["config_validation", "data_files", "catalog_readiness", "advice_generation"]
        );
    });
}

#[test]
fn doctor_skips_downstream_checks_when_config_invalid() {
    with_env(&[("ADVISOR_LOG_FORMAT", "xml")], || {
        let result = doctor::run(true);
        assert_eq!(result.exit_code, 2, "expected config failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "config_validation");
        assert_eq!(payload["data"]["overall_status"], "fail");
        assert_eq!(payload["data"]["checks"][0]["status"], "fail");
        assert_eq!(payload["data"]["checks"][3]["status"], "skipped");
    });
}

#[test]
fn doctor_human_output_exits_non_zero_on_data_failure() {
    with_env(&[("ADVISOR_PROFILES_PATH", "does-not-exist/profiles.json")], || {
        let result = doctor::run(false);
        assert_eq!(result.exit_code, 3, "expected data load failure code");
        assert!(result.output.starts_with("doctor: one or more readiness checks failed"));
        assert!(result.output.contains("- [fail] data_files:"));
    });
}

fn config_field(payload: &Value, key: &str) -> Value {
    payload["data"]
        .as_array()
        .and_then(|fields| fields.iter().find(|field| field["key"] == key))
        .cloned()
        .unwrap_or(Value::Null)
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let keys = [
        "ADVISOR_ENABLED_ADVICE_TYPES",
        "ADVISOR_HISTORY_LIMIT",
        "ADVISOR_PREVIEW_CHARS",
        "ADVISOR_MAX_PROFILES",
        "ADVISOR_PROFILES_PATH",
        "ADVISOR_CATALOG_PATH",
        "ADVISOR_API_KEY",
        "ADVISOR_LOGGING_LEVEL",
        "ADVISOR_LOGGING_FORMAT",
        "ADVISOR_LOG_LEVEL",
        "ADVISOR_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
