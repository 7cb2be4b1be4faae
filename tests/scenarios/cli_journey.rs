//! Scenario: Operator Journey Through the CLI
//!
//! Journey: An operator writes a model file, checks it, applies it, evolves
//! it and finally tears the instance down using only the `strata` binary.
//!
//! Steps:
//! 1. `strata validate` the model
//! 2. `strata plan` shows two creates
//! 3. `strata apply` writes the file store under `.strata/t1`
//! 4. `strata resources`, `status` and `instances` reflect the apply
//! 5. Resize the host and apply again
//! 6. Apply an empty model
//!
//! Success Criteria:
//! - Every command exits 0
//! - State survives between processes
//! - Output names the instance and the counts

use crate::common::*;

/// SCENARIO: full lifecycle through separate CLI invocations
#[test]
fn scenario_cli_apply_evolve_teardown() {
    let env = TestEnv::new();
    env.write_file("model.yaml", SINGLE_HOST);

    // Step 1
    let result = env.run(&["validate", "model.yaml"]);
    assert!(result.success, "validate failed:\n{}", result.combined_output());
    assert!(result.stdout.contains("model.yaml is valid"));

    // Step 2
    let result = env.run(&["plan", "model.yaml"]);
    assert!(result.success, "plan failed:\n{}", result.combined_output());
    assert!(
        result
            .stdout
            .contains("Plan [t1]: 2 to create, 0 to update, 0 to delete"),
        "unexpected plan:\n{}",
        result.stdout
    );
    assert!(!env.store_root().exists(), "plan must not write state");

    // Step 3
    let result = env.run(&["apply", "model.yaml"]);
    assert!(result.success, "apply failed:\n{}", result.combined_output());
    assert!(result.stdout.contains("Reconcile complete [t1]"));
    assert!(result.stdout.contains("created:   2"));
    assert!(env.path(".strata/t1/resources.json").is_file());
    assert!(env.path(".strata/t1/label.json").is_file());

    // Step 4
    let result = env.run(&["resources", "t1"]);
    assert!(result.success);
    assert!(result.stdout.starts_with("Resources [t1] (2):"));
    assert!(result.stdout.contains("h1/c1"));

    let result = env.run(&["status", "t1"]);
    assert!(result.success);
    assert!(result.stdout.contains("State:    applied"));

    let result = env.run(&["instances"]);
    assert_eq!(result.stdout, "t1\n");

    // Step 5
    env.write_file("model.yaml", SINGLE_HOST_RESIZED);
    let result = env.run(&["apply", "model.yaml"]);
    assert!(result.success, "resize failed:\n{}", result.combined_output());
    assert!(result.stdout.contains("updated:   1"));
    assert!(result.stdout.contains("unchanged: 1"));
    assert!(env.read_file(".strata/t1/resources.json").contains("large"));

    // Re-running is a no-op
    let result = env.run(&["apply", "model.yaml"]);
    assert!(result.stdout.contains("Already up-to-date [t1]"));

    // Step 6
    env.write_file("model.yaml", EMPTY_MODEL);
    let result = env.run(&["apply", "model.yaml"]);
    assert!(result.success, "teardown failed:\n{}", result.combined_output());
    assert!(result.stdout.contains("deleted:   2"));

    let result = env.run(&["resources", "t1"]);
    assert_eq!(result.stdout, "No resources recorded for [t1]\n");
}
