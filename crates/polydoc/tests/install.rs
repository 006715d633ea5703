//! Process-wide registry install. Kept in its own test binary because the
//! install is write-once for the whole process.

use polydoc::{
    error::{ErrorKind, RegistryErrorKind},
    install_schema,
    prelude::*,
};
use serde_json::json;

#[test]
fn installed_schema_serves_every_thread_and_is_write_once() {
    let registry = install_schema().expect("first install");
    assert!(registry.contains(RecordRoot::PATH, "object", "page"));

    let decoded = std::thread::spawn(|| {
        Adaptive::<RecordRoot>::from_value(json!({"object": "block", "type": "divider", "divider": {}}))
            .map(|record| record.variant_name())
    })
    .join()
    .expect("thread completes")
    .expect("decodes through the global registry");
    assert_eq!(decoded, "Divider");

    let err = install_schema().expect_err("second install");
    assert_eq!(err.kind, ErrorKind::Registry(RegistryErrorKind::Duplicate));
}
