use config::{resolve, GeneratorConfiguration};
use planner::{plan, LogicalUnit, OutputPlan, PlanError, SlotKind};

fn planned(parameter: &str, messages: usize, extensions: usize) -> OutputPlan {
    let config = resolve(parameter, true).expect("parameter resolves");
    plan(&config, "acme/orders", messages, extensions).expect("plan succeeds")
}

fn kinds(plan: &OutputPlan) -> Vec<SlotKind> { plan.slots().iter().map(|s| s.kind).collect() }

fn source_family(plan: &OutputPlan) -> usize {
    plan.slots().iter().filter(|s| !s.kind.is_header()).count()
}

#[test]
fn without_weak_fields_there_is_exactly_one_source() {
    for (messages, extensions) in [(0, 0), (1, 0), (3, 4), (40, 2)] {
        let plan = planned("", messages, extensions);
        assert_eq!(kinds(&plan), vec![SlotKind::PrimaryHeader, SlotKind::SingleSource]);
        assert_eq!(source_family(&plan), 1);

        let plan = planned("proto_h,lite", messages, extensions);
        assert_eq!(
            kinds(&plan),
            vec![SlotKind::ForwardDeclHeader, SlotKind::PrimaryHeader, SlotKind::SingleSource]
        );
    }
}

#[test]
fn weak_fields_without_count_has_no_placeholders() {
    let plan = planned("lite_implicit_weak_fields", 2, 0);
    assert_eq!(
        kinds(&plan),
        vec![
            SlotKind::PrimaryHeader,
            SlotKind::GlobalSource,
            SlotKind::IndexedSource { ordinal: 0, unit: LogicalUnit::Message(0) },
            SlotKind::IndexedSource { ordinal: 1, unit: LogicalUnit::Message(1) },
        ]
    );
    assert_eq!(plan.placeholder_count(), 0);
    assert_eq!(
        plan.artifact_names(),
        vec![
            "acme/orders.pb.h",
            "acme/orders.pb.cc",
            "acme/orders.out/0.cc",
            "acme/orders.out/1.cc",
        ]
    );
}

#[test]
fn weak_fields_pad_up_to_requested_count() {
    let plan = planned("lite_implicit_weak_fields=6", 3, 1);
    assert_eq!(
        kinds(&plan),
        vec![
            SlotKind::PrimaryHeader,
            SlotKind::GlobalSource,
            SlotKind::IndexedSource { ordinal: 0, unit: LogicalUnit::Message(0) },
            SlotKind::IndexedSource { ordinal: 1, unit: LogicalUnit::Message(1) },
            SlotKind::IndexedSource { ordinal: 2, unit: LogicalUnit::Message(2) },
            SlotKind::IndexedSource { ordinal: 3, unit: LogicalUnit::Extension(0) },
            SlotKind::PlaceholderSource { ordinal: 4 },
            SlotKind::PlaceholderSource { ordinal: 5 },
        ]
    );
    assert_eq!(plan.indexed_count() + plan.placeholder_count(), 6);
    assert_eq!(plan.slots()[7].name, "acme/orders.out/5.cc");
}

#[test]
fn extra_requested_files_become_trailing_placeholders() {
    for k in 1..5 {
        let (messages, extensions) = (2, 3);
        let parameter = format!("lite_implicit_weak_fields={}", messages + extensions + k);
        let plan = planned(&parameter, messages, extensions);

        assert_eq!(plan.placeholder_count(), k);
        assert_eq!(plan.indexed_count(), messages + extensions);
        let first_placeholder = plan
            .slots()
            .iter()
            .position(|s| matches!(s.kind, SlotKind::PlaceholderSource { .. }))
            .expect("has placeholders");
        assert!(plan.slots()[first_placeholder..]
            .iter()
            .all(|s| matches!(s.kind, SlotKind::PlaceholderSource { .. })));
    }
}

#[test]
fn exact_requested_count_adds_nothing() {
    let plan = planned("lite_implicit_weak_fields=3", 2, 1);
    assert_eq!(plan.indexed_count(), 3);
    assert_eq!(plan.placeholder_count(), 0);
}

#[test]
fn requested_count_below_units_fails() {
    let config = resolve("lite_implicit_weak_fields=3", true).expect("resolves");
    let err = plan(&config, "acme/orders", 3, 1).expect_err("too few files");
    assert_eq!(err, PlanError::FileCountTooSmall { requested: 3, required: 4 });
}

#[test]
fn later_code_size_disables_splitting() {
    let plan = planned("lite_implicit_weak_fields=10,code_size", 3, 1);
    assert_eq!(kinds(&plan), vec![SlotKind::PrimaryHeader, SlotKind::SingleSource]);
}

#[test]
fn planning_is_deterministic() {
    let config = GeneratorConfiguration {
        emit_reflection_free_header: true,
        ..resolve("lite_implicit_weak_fields=9", true).expect("resolves")
    };
    let first = plan(&config, "acme/orders", 4, 2).expect("plans");
    let second = plan(&config, "acme/orders", 4, 2).expect("plans");
    assert_eq!(first, second);
    assert_eq!(first.len(), 2 + 1 + 9);
}

#[test]
fn both_headers_are_planned_with_proto_h() {
    let plan = planned("proto_h,annotate_headers", 1, 1);
    let headers: Vec<SlotKind> =
        plan.slots().iter().filter(|s| s.kind.is_header()).map(|s| s.kind).collect();
    assert_eq!(headers, vec![SlotKind::ForwardDeclHeader, SlotKind::PrimaryHeader]);
    assert_eq!(plan.slots()[0].name, "acme/orders.proto.h");
}
