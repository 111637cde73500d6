//! Integration tests for the signature gate
//!
//! These tests drive the validator through a plugin tree the way the loader
//! does: parents first, with the parent links resolved by the tree.

use plugin_signature::{Environment, PluginTree, SignaturePolicy, SignatureValidator};
use sdk::errors::SignatureError;
use sdk::types::{Plugin, PluginClass, SignatureStatus, SignatureType};
use std::io;
use std::sync::{Arc, Mutex};
use std::thread;

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with every event at debug and above written to the returned sink
fn capture_logs(f: impl FnOnce()) -> CapturedLogs {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    logs
}

fn warn_lines(logs: &CapturedLogs) -> Vec<String> {
    logs.lines()
        .into_iter()
        .filter(|line| line.contains("WARN"))
        .collect()
}

#[test]
fn test_allow_list_example() {
    let allowed = SignatureValidator::new(
        SignaturePolicy::new(Environment::Production, ["p1"]),
        None,
    );
    let denied = SignatureValidator::new(
        SignaturePolicy::new(Environment::Production, Vec::<String>::new()),
        None,
    );

    let mut plugin = Plugin::new("p1", SignatureStatus::Unsigned);
    assert!(allowed.validate(&mut plugin, None).is_ok());

    let mut plugin = Plugin::new("p1", SignatureStatus::Unsigned);
    assert_eq!(
        denied.validate(&mut plugin, None),
        Err(SignatureError::new("p1", Some(SignatureStatus::Unsigned)))
    );
}

#[test]
fn test_app_bundle_with_nested_plugins() {
    let mut tree = PluginTree::new();
    let app = tree
        .insert_root(
            Plugin::new("acme-app", SignatureStatus::Valid)
                .with_dir("/var/lib/plugins/acme-app")
                .with_signature_type(SignatureType::Commercial)
                .with_signature_org("Acme Corp"),
        )
        .unwrap();
    let panel = tree
        .insert_child(
            app,
            Plugin::new("acme-panel", SignatureStatus::Unsigned)
                .with_dir("/var/lib/plugins/acme-app/panel"),
        )
        .unwrap();
    let datasource = tree
        .insert_child(
            app,
            Plugin::new("acme-datasource", SignatureStatus::Modified)
                .with_dir("/var/lib/plugins/acme-app/datasource"),
        )
        .unwrap();
    let rogue = tree
        .insert_root(Plugin::new("rogue-panel", SignatureStatus::Modified))
        .unwrap();

    let validator = SignatureValidator::new(SignaturePolicy::default(), None);
    let outcomes = tree.validate_all(&validator);

    for (index, result) in &outcomes {
        if *index == rogue {
            assert_eq!(
                result,
                &Err(SignatureError::new("rogue-panel", Some(SignatureStatus::Modified)))
            );
        } else {
            assert!(result.is_ok(), "{} should load", tree.get(*index).unwrap().id);
        }
    }

    for index in [panel, datasource] {
        let plugin = tree.get(index).unwrap();
        assert_eq!(plugin.signature, SignatureStatus::Valid);
        assert_eq!(plugin.signature_type, Some(SignatureType::Commercial));
        assert_eq!(plugin.signature_org, "Acme Corp");
    }
}

#[test]
fn test_bundled_plugins_load_in_production() {
    let mut tree = PluginTree::new();
    tree.insert_root(
        Plugin::new("host-logs", SignatureStatus::Internal).with_class(PluginClass::Core),
    )
    .unwrap();
    tree.insert_root(
        Plugin::new("host-extras", SignatureStatus::Unsigned).with_class(PluginClass::Bundled),
    )
    .unwrap();

    let validator = SignatureValidator::new(SignaturePolicy::default(), None);
    assert!(tree
        .validate_all(&validator)
        .iter()
        .all(|(_, result)| result.is_ok()));
}

#[test]
fn test_shared_validator_across_threads() {
    let validator = Arc::new(SignatureValidator::new(
        SignaturePolicy::new(Environment::Production, ["p0", "p2"]),
        None,
    ));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let mut plugin = Plugin::new(format!("p{}", i), SignatureStatus::Unsigned);
                validator.validate(&mut plugin, None).is_ok()
            })
        })
        .collect();

    let results: Vec<bool> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(results, vec![true, false, true, false]);
}

#[test]
fn test_allowed_unsigned_plugin_logs_warning() {
    let validator = SignatureValidator::new(
        SignaturePolicy::new(Environment::Production, ["p1"]),
        None,
    );
    let mut plugin =
        Plugin::new("p1", SignatureStatus::Unsigned).with_dir("/var/lib/plugins/p1");

    let logs = capture_logs(|| {
        assert!(validator.validate(&mut plugin, None).is_ok());
    });

    let warnings = warn_lines(&logs);
    assert_eq!(warnings.len(), 1, "{:?}", logs.lines());
    assert!(warnings[0].contains("plugin_id=p1"));
    assert!(warnings[0].contains("plugin_dir=/var/lib/plugins/p1"));
}

#[test]
fn test_valid_plugin_logs_no_warning() {
    let validator = SignatureValidator::new(SignaturePolicy::default(), None);
    let mut plugin = Plugin::new("p1", SignatureStatus::Valid).with_dir("/var/lib/plugins/p1");

    let logs = capture_logs(|| {
        assert!(validator.validate(&mut plugin, None).is_ok());
    });

    assert!(warn_lines(&logs).is_empty(), "{:?}", logs.lines());
    assert!(logs
        .lines()
        .iter()
        .any(|line| line.contains("DEBUG") && line.contains("plugin_id=p1")));
}
