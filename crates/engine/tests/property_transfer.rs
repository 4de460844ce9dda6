// Property-based tests for transfer invariants.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::BTreeSet;

use proptest::prelude::*;
use robocfg_engine::records::{match_line, RecordKey};
use robocfg_engine::resolver::resolve;
use robocfg_engine::{transfer, EventCollector, KindSet, LineStore, RecordKind, TransferOptions};

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn arb_number() -> impl Strategy<Value = String> {
    r"-?[0-9]{1,3}\.[0-9]{1,2}"
}

/// `X 1.0,Z -3.25` over a random subset of axes, occasionally with junk.
fn arb_frame_payload() -> impl Strategy<Value = String> {
    let field = prop_oneof![
        6 => (prop::sample::select(vec!["X", "Y", "Z", "A", "B", "C"]), arb_number())
            .prop_map(|(axis, n)| format!("{axis} {n}")),
        1 => Just("Q 1.0".to_string()),
        1 => Just("X".to_string()),
    ];
    prop::collection::vec(field, 0..6).prop_map(|f| f.join(","))
}

fn arb_joint_payload() -> impl Strategy<Value = String> {
    let field = (prop::sample::select(vec!["A1", "A2", "A3", "E1", "E2"]), arb_number())
        .prop_map(|(axis, n)| format!("{axis} {n}"));
    prop::collection::vec(field, 0..4).prop_map(|f| f.join(","))
}

/// `M 12.5,CM {X 1.0,Y 2.0},J {X 0.1}`.
fn arb_load_payload() -> impl Strategy<Value = String> {
    (arb_number(), arb_number(), arb_number(), arb_number())
        .prop_map(|(m, x, y, j)| format!("M {m},CM {{X {x},Y {y}}},J {{X {j}}}"))
}

fn arb_tag() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["NONE", "BASE", "FIXED"])
}

fn arb_line(e6_names: Vec<&'static str>) -> impl Strategy<Value = String> {
    prop_oneof![
        (0u64..5, arb_frame_payload()).prop_map(|(k, p)| format!("BASE_DATA[{k}]={{{p}}}")),
        (0u64..5, r"[A-Za-z0-9 ]{0,8}").prop_map(|(k, s)| format!("BASE_NAME[{k},]=\"{s}\"")),
        (0u64..5, arb_tag()).prop_map(|(k, t)| format!("BASE_TYPE[{k}]=#{t}")),
        (0u64..5, arb_frame_payload()).prop_map(|(k, p)| format!("TOOL_DATA[{k}]={{{p}}}")),
        (0u64..5, arb_tag()).prop_map(|(k, t)| format!("TOOL_TYPE[{k}]=#{t}")),
        (0u64..5, r"[A-Za-z0-9 ]{0,8}").prop_map(|(k, s)| format!("TOOL_NAME[{k},]=\"{s}\"")),
        (0u64..5, arb_load_payload()).prop_map(|(k, p)| format!("LOAD_DATA[{k}]={{{p}}}")),
        (prop::sample::select(e6_names), arb_joint_payload())
            .prop_map(|(n, p)| format!("DECL E6AXIS {n}={{{p}}}")),
        r";[a-z ]{0,12}",
    ]
}

fn arb_source() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_line(vec!["HOME", "HOME1", "HOME2", "HOME10"]), 0..16)
}

fn arb_target() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_line(vec!["XHOME", "XHOME1", "XHOME2", "XPARK"]), 1..16)
}

fn record_keys(store: &LineStore, kind: RecordKind) -> BTreeSet<RecordKey> {
    store
        .iter()
        .filter_map(|(_, line)| Some(match_line(kind, line)?.key))
        .collect()
}

/// Source key a target record reads from: the index itself, or the E6AXIS
/// name after resolving it against the source's names.
fn source_key_for(key: RecordKey, source_names: &[String], options: &TransferOptions) -> RecordKey {
    match key {
        RecordKey::Index(_) => key,
        RecordKey::Name(name) => {
            let mapping = resolve(&options.e6axis_seed, source_names, options.resolver, &mut EventCollector::new());
            RecordKey::Name(mapping.source_for(&name).to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn line_count_is_preserved(source in arb_source(), target in arb_target()) {
        let source = LineStore::from_lines(source);
        let mut target = LineStore::from_lines(target);
        let before = target.len();
        let mut events = EventCollector::new();
        transfer(&source, &mut target, &TransferOptions::default(), &mut events);
        prop_assert_eq!(target.len(), before);
    }

    #[test]
    fn transfer_is_idempotent(source in arb_source(), target in arb_target()) {
        let source = LineStore::from_lines(source);
        let mut target = LineStore::from_lines(target);
        let options = TransferOptions::default();
        let mut events = EventCollector::new();

        transfer(&source, &mut target, &options, &mut events);
        let first = target.render();
        let second = transfer(&source, &mut target, &options, &mut events);

        prop_assert!(!second.changed);
        prop_assert_eq!(target.render(), first);
    }

    #[test]
    fn keys_absent_from_source_are_untouched(source in arb_source(), target in arb_target()) {
        let source = LineStore::from_lines(source);
        let original = LineStore::from_lines(target);
        let mut target = original.clone();
        let options = TransferOptions::default();
        let mut events = EventCollector::new();
        transfer(&source, &mut target, &options, &mut events);

        for kind in RecordKind::ALL {
            let source_keys = record_keys(&source, kind);
            let source_names: Vec<String> = source_keys
                .iter()
                .filter_map(|k| match k {
                    RecordKey::Name(n) => Some(n.clone()),
                    RecordKey::Index(_) => None,
                })
                .collect();
            for (i, line) in original.iter() {
                let Some(m) = match_line(kind, line) else { continue };
                if !source_keys.contains(&source_key_for(m.key, &source_names, &options)) {
                    prop_assert_eq!(target.get(i), Some(line), "{} line {} changed", kind, i);
                }
            }
        }
    }

    #[test]
    fn disabled_transfer_is_a_no_op(source in arb_source(), target in arb_target()) {
        let source = LineStore::from_lines(source);
        let original = LineStore::from_lines(target);
        let mut target = original.clone();
        let mut events = EventCollector::new();
        let options = TransferOptions { kinds: KindSet::none(), ..Default::default() };

        let report = transfer(&source, &mut target, &options, &mut events);

        prop_assert!(!report.changed);
        prop_assert_eq!(target, original);
    }
}
