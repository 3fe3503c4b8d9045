use config::{resolve, GeneratorConfiguration};
use planner::{LogicalUnit, SlotKind};
use protogen_codegen::annotation::AnnotationSemantic;
use protogen_codegen::{
    common_vars, with_capture, AnnotationSidecar, CodegenError, EmissionEngine, EmissionRequest,
    Printer, SkeletonEngine,
};
use schema::{
    EnumDecl, EnumValueDecl, ExtensionDecl, FieldDecl, MessageDecl, SchemaFile, SchemaPath,
};

fn orders() -> SchemaFile {
    let mut schema = SchemaFile::new("acme/orders.proto");
    schema.package = "acme.orders".to_string();
    schema.messages = vec![
        MessageDecl::new(
            "Order",
            vec![FieldDecl::new("id", 1, "uint64"), FieldDecl::new("note", 2, "string")],
        ),
        MessageDecl::new("Line", vec![FieldDecl::new("sku", 1, "int32")]),
    ];
    schema.enums = vec![EnumDecl {
        name: "Status".to_string(),
        values: vec![EnumValueDecl { name: "OPEN".to_string(), number: 0 }],
    }];
    schema.extensions = vec![ExtensionDecl::new("audit_tag", ".acme.common.Meta", 1000, "string")];
    schema
}

fn render(
    config: &GeneratorConfiguration,
    schema: &SchemaFile,
    slot: SlotKind,
    capture: bool,
) -> Result<(String, Option<AnnotationSidecar>), CodegenError> {
    let vars = common_vars(config);
    let artifact = slot.artifact_name("acme/orders");
    let mut annotations = with_capture(&artifact, capture);
    let sidecar_name = annotations.sidecar_name();
    let request = EmissionRequest {
        schema,
        config,
        basename: "acme/orders",
        slot,
        annotation_sidecar: sidecar_name.as_deref(),
    };
    let contents = {
        let mut printer = Printer::new(&vars, annotations.sink(), &schema.name);
        SkeletonEngine.emit(&request, &mut printer)?;
        printer.into_contents()
    };
    Ok((contents, annotations.finish()))
}

#[test]
fn primary_header_declares_each_message() {
    let config = resolve("", true).expect("resolves");
    let (header, sidecar) =
        render(&config, &orders(), SlotKind::PrimaryHeader, false).expect("renders");

    assert!(header.contains("#ifndef PROTOBUF_INCLUDED_acme_2forders_PB_H"));
    assert!(header.contains("#include \"google/protobuf/message.h\""));
    assert!(header.contains("namespace acme {\nnamespace orders {\n"));
    assert!(header.contains("class Order final : public ::google::protobuf::Message {"));
    assert!(header.contains("class Line final : public ::google::protobuf::Message {"));
    assert!(header.contains("  ::uint64_t id() const;"));
    assert!(header.contains("  std::string* mutable_note();"));
    assert!(header.contains("extern ::google::protobuf::internal::ExtensionIdentifier audit_tag;"));
    assert!(sidecar.is_none());
}

#[test]
fn lite_headers_derive_from_message_lite() {
    let config = resolve("lite,dllexport_decl=ACME_EXPORT", true).expect("resolves");
    let (header, _) = render(&config, &orders(), SlotKind::PrimaryHeader, false).expect("renders");
    assert!(header.contains("#include \"google/protobuf/message_lite.h\""));
    assert!(header
        .contains("class ACME_EXPORT Order final : public ::google::protobuf::MessageLite {"));
}

#[test]
fn reflection_free_header_carries_forward_declarations() {
    let config = resolve("proto_h", true).expect("resolves");
    let schema = orders();

    let (forward, _) =
        render(&config, &schema, SlotKind::ForwardDeclHeader, false).expect("renders");
    assert!(forward.contains("class Order;\nclass Line;\n"));
    assert!(forward.contains("enum Status : int {\n  OPEN = 0,\n};"));

    let (primary, _) = render(&config, &schema, SlotKind::PrimaryHeader, false).expect("renders");
    assert!(primary.contains("#include \"acme/orders.proto.h\"  // IWYU pragma: export"));
    assert!(!primary.contains("class Order;\n"));
}

#[test]
fn annotated_ranges_point_at_declarations() {
    let config = resolve("annotate_headers", true).expect("resolves");
    let (header, sidecar) =
        render(&config, &orders(), SlotKind::PrimaryHeader, true).expect("renders");
    let sidecar = sidecar.expect("capture enabled");
    assert_eq!(sidecar.name(), "acme/orders.pb.h.meta");

    let getter = sidecar
        .annotations
        .iter()
        .find(|r| r.path == SchemaPath::message(0).member(0))
        .expect("first field of Order is annotated");
    assert_eq!(&header[getter.begin..getter.end], "::uint64_t id() const;");
    assert_eq!(getter.source_file, "acme/orders.proto");
    assert!(sidecar.annotations.iter().all(|r| r.semantic.is_none()));

    let class = sidecar
        .annotations
        .iter()
        .find(|r| r.path == SchemaPath::message(1))
        .expect("Line is annotated");
    assert!(header[class.begin..class.end].starts_with("class Line final"));
}

#[test]
fn accessor_annotations_carry_semantics() {
    let config = resolve("annotate_headers,annotate_accessor", true).expect("resolves");
    let (header, sidecar) =
        render(&config, &orders(), SlotKind::PrimaryHeader, true).expect("renders");
    let sidecar = sidecar.expect("capture enabled");

    let setter = sidecar
        .annotations
        .iter()
        .find(|r| r.semantic == Some(AnnotationSemantic::Set))
        .expect("a setter is annotated");
    assert_eq!(&header[setter.begin..setter.end], "void set_id(::uint64_t value);");

    let alias = sidecar
        .annotations
        .iter()
        .find(|r| r.semantic == Some(AnnotationSemantic::Alias))
        .expect("a mutable accessor is annotated");
    assert_eq!(&header[alias.begin..alias.end], "std::string* mutable_note();");
}

#[test]
fn pragma_references_the_sidecar_inside_the_guard() {
    let config = resolve(
        "annotate_headers,annotation_pragma_name=kythe_metadata,\
         annotation_guard_name=KYTHE_IS_RUNNING",
        true,
    )
    .expect("resolves");
    let (header, _) = render(&config, &orders(), SlotKind::PrimaryHeader, true).expect("renders");
    assert!(header.contains(
        "#ifdef KYTHE_IS_RUNNING\n\
         #pragma kythe_metadata \"acme/orders.pb.h.meta\"\n\
         #endif  // KYTHE_IS_RUNNING\n"
    ));

    let (without_capture, _) =
        render(&config, &orders(), SlotKind::PrimaryHeader, false).expect("renders");
    assert!(!without_capture.contains("#pragma"));
}

#[test]
fn listener_events_respect_the_forbidden_set() {
    let parameter = "inject_field_listener_events,forbidden_field_listener_events=set+clear";
    let config = resolve(parameter, true).expect("resolves");
    let (header, _) = render(&config, &orders(), SlotKind::PrimaryHeader, false).expect("renders");
    assert!(header.contains("kFieldListenerEvents[] = {\"get\", \"mutable\", \"serialize\"};"));

    let quiet = resolve("", true).expect("resolves");
    let (header, _) = render(&quiet, &orders(), SlotKind::PrimaryHeader, false).expect("renders");
    assert!(!header.contains("kFieldListenerEvents"));
}

#[test]
fn numbered_sources_hold_one_unit_each() {
    let config = resolve("lite,lite_implicit_weak_fields", true).expect("resolves");
    let schema = orders();

    let message = SlotKind::IndexedSource { ordinal: 1, unit: LogicalUnit::Message(1) };
    let (source, _) = render(&config, &schema, message, false).expect("renders");
    assert!(source.contains("#include \"acme/orders.pb.h\""));
    assert!(source.contains("// Line\n"));
    assert!(!source.contains("// Order\n"));

    let extension = SlotKind::IndexedSource { ordinal: 2, unit: LogicalUnit::Extension(0) };
    let (source, _) = render(&config, &schema, extension, false).expect("renders");
    assert!(source.contains("audit_tag(1000, \".acme.common.Meta\");"));
}

#[test]
fn unit_outside_the_schema_is_rejected() {
    let config = resolve("lite,lite_implicit_weak_fields", true).expect("resolves");
    let slot = SlotKind::IndexedSource { ordinal: 0, unit: LogicalUnit::Message(7) };
    match render(&config, &orders(), slot, false).expect_err("unit 7 does not exist") {
        CodegenError::UnitOutOfRange { available, .. } => assert_eq!(available, 2),
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn placeholder_sources_are_empty() {
    let config = resolve("lite,lite_implicit_weak_fields=5", true).expect("resolves");
    let (source, _) =
        render(&config, &orders(), SlotKind::PlaceholderSource { ordinal: 4 }, false)
            .expect("renders");
    assert!(source.is_empty());
}

#[test]
fn single_source_defines_everything_and_notes_parser_settings() {
    let config =
        resolve("experimental_tail_call_table_mode=always,unverified_lazy_message_sets", true)
            .expect("resolves");
    let (source, _) = render(&config, &orders(), SlotKind::SingleSource, false).expect("renders");
    assert!(source.contains("Order::Order() = default;"));
    assert!(source.contains("Line::Line() = default;"));
    assert!(source.contains("// parse table: tail-call always"));
    assert!(source.contains("// lazy fields: unverified lazy message sets"));
    assert!(source.contains("const std::string& Status_Name(int value);"));
    assert!(source.contains("descriptor_table_acme_2forders_2eproto"));
}

#[test]
fn internal_builds_use_the_internal_namespace() {
    let config = resolve("", false).expect("resolves");
    let (header, _) = render(&config, &orders(), SlotKind::PrimaryHeader, false).expect("renders");
    assert!(header.contains("public ::proto2::Message"));
}
