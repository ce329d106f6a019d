#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use flowline_node::config::{self, NodeRole};

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
node:
  role: broker
broker:
  subscribe_wait_mss: 5000 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
node:
  role: dispatcher
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.node.listen, "0.0.0.0:8000");
    // Default topics: one per priority level.
    assert_eq!(cfg.dispatcher.topics, vec!["high", "low"]);
    assert_eq!(cfg.broker.subscribe_wait_ms, 5000);
    assert_eq!(cfg.trigger.forward_retries, 3);
}

#[test]
fn load_from_file_reads_yaml() {
    let path = std::env::temp_dir().join(format!("flowline-cfg-{}.yaml", std::process::id()));
    std::fs::write(&path, "version: 1\nnode:\n  role: broker\n").unwrap();

    let cfg = config::load_from_file(&path).expect("must load");
    assert_eq!(cfg.node.role, NodeRole::Broker);

    std::fs::remove_file(&path).ok();
}

#[test]
fn load_from_file_names_missing_path() {
    let err = config::load_from_file("/definitely/not/here.yaml").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
    assert!(err.to_string().contains("/definitely/not/here.yaml"));
}

#[test]
fn unknown_role_is_rejected() {
    let bad = r#"
version: 1
node:
  role: mixer
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn out_of_range_subscribe_wait_is_rejected() {
    let bad = r#"
version: 1
node:
  role: broker
broker:
  subscribe_wait_ms: 10
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn wrong_version_is_rejected() {
    let bad = r#"
version: 2
node:
  role: broker
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn binding_must_reference_consumed_topic() {
    let bad = r#"
version: 1
node:
  role: dispatcher
dispatcher:
  topics: ["high"]
  bindings:
    - topic: "urgent"
      invoke_url: "http://functions:8000/fn/greeter"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}
